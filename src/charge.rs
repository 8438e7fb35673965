use log::{info, warn};
use nalgebra::Point3;

/// Maximum number of charges of each sign a scene will hold.
pub const CAPACITY_PER_SIGN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub fn value(&self) -> f64 {
        match self {
            Sign::Positive => 1.0,
            Sign::Negative => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Charge {
    pub position: Point3<f64>,
    pub sign: Sign,
}

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    Placed,
    CapacityExceeded,
}

/// Charges placed so far, kept per sign in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ChargeSet {
    positive: Vec<Point3<f64>>,
    negative: Vec<Point3<f64>>,
}

impl ChargeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&mut self, position: Point3<f64>, sign: Sign) -> PlaceOutcome {
        let charges = match sign {
            Sign::Positive => &mut self.positive,
            Sign::Negative => &mut self.negative,
        };
        if charges.len() >= CAPACITY_PER_SIGN {
            warn!(
                "Ignoring {:?} charge at {}: already holding {} of that sign",
                sign, position, CAPACITY_PER_SIGN
            );
            return PlaceOutcome::CapacityExceeded;
        }
        charges.push(position);
        info!(
            "Placed {:?} charge #{} at {}",
            sign,
            charges.len(),
            position
        );
        PlaceOutcome::Placed
    }

    pub fn all(&self, sign: Sign) -> &[Point3<f64>] {
        match sign {
            Sign::Positive => &self.positive,
            Sign::Negative => &self.negative,
        }
    }

    /// Every charge, positive ones first, each sign in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Charge> + '_ {
        let pos = self.positive.iter().map(|&position| Charge {
            position,
            sign: Sign::Positive,
        });
        let neg = self.negative.iter().map(|&position| Charge {
            position,
            sign: Sign::Negative,
        });
        pos.chain(neg)
    }

    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eleventh_charge_of_a_sign_is_rejected() {
        let mut charges = ChargeSet::new();
        for i in 0..CAPACITY_PER_SIGN {
            let outcome = charges.place(Point3::new(i as f64, 0.0, 0.0), Sign::Positive);
            assert_eq!(outcome, PlaceOutcome::Placed);
        }
        let outcome = charges.place(Point3::new(99.0, 0.0, 0.0), Sign::Positive);
        assert_eq!(outcome, PlaceOutcome::CapacityExceeded);
        assert_eq!(charges.all(Sign::Positive).len(), CAPACITY_PER_SIGN);
        assert!(charges
            .all(Sign::Positive)
            .iter()
            .all(|p| p.x < CAPACITY_PER_SIGN as f64));
    }

    #[test]
    fn signs_have_separate_capacity() {
        let mut charges = ChargeSet::new();
        for _ in 0..(CAPACITY_PER_SIGN + 3) {
            let _ = charges.place(Point3::origin(), Sign::Positive);
        }
        assert_eq!(
            charges.place(Point3::origin(), Sign::Negative),
            PlaceOutcome::Placed
        );
        assert_eq!(charges.all(Sign::Negative).len(), 1);
        assert_eq!(charges.len(), CAPACITY_PER_SIGN + 1);
    }

    #[test]
    fn iteration_is_positive_then_negative_in_insertion_order() {
        let mut charges = ChargeSet::new();
        let _ = charges.place(Point3::new(0.0, 0.0, 1.0), Sign::Negative);
        let _ = charges.place(Point3::new(0.0, 0.0, 2.0), Sign::Positive);
        let _ = charges.place(Point3::new(0.0, 0.0, 3.0), Sign::Positive);

        let order: Vec<(f64, Sign)> = charges.iter().map(|c| (c.position.z, c.sign)).collect();
        assert_eq!(
            order,
            vec![
                (2.0, Sign::Positive),
                (3.0, Sign::Positive),
                (1.0, Sign::Negative)
            ]
        );
    }

    #[test]
    fn new_set_is_empty() {
        let charges = ChargeSet::new();
        assert!(charges.is_empty());
        assert!(charges.all(Sign::Positive).is_empty());
        assert!(charges.all(Sign::Negative).is_empty());
    }
}
