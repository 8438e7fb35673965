use nalgebra::{Point3, Vector3};

use crate::charge::{ChargeSet, Sign};

// A charge closer than this to a sample point contributes no direction.
const MIN_SEPARATION: f64 = 1e-9;

/// Largest lattice a scene will sample every frame.
pub const MAX_LATTICE_POINTS: usize = 1_000_000;

/// Which rule orients the glyphs. The opacity fade uses the nearest charge in
/// both modes.
#[derive(
    serde::Serialize, serde::Deserialize, clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default,
)]
pub enum FieldVisualizationMode {
    /// Point away from the nearest charge if positive, towards it if negative.
    NearestChargeOnly,
    /// Sum of unit vectors away from every positive and towards every negative
    /// charge.
    #[default]
    FullSuperposition,
}

/// Cubic grid of sample points at `(x, y, z) * spacing` for integer
/// coordinates in `0..edge_size`.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct LatticeSpec {
    pub edge_size: usize,
    pub spacing: f64,
}

impl Default for LatticeSpec {
    fn default() -> Self {
        LatticeSpec {
            edge_size: 10,
            spacing: 10.0,
        }
    }
}

impl LatticeSpec {
    /// Number of sample points, or `None` if it does not fit in `usize`.
    pub fn checked_len(&self) -> Option<usize> {
        self.edge_size.checked_pow(3)
    }

    pub fn len(&self) -> usize {
        self.checked_len().unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.edge_size == 0
    }

    pub fn points(&self) -> Vec<Point3<f64>> {
        let n = self.edge_size;
        let mut samples = Vec::with_capacity(self.len().min(MAX_LATTICE_POINTS));
        for x in 0..n {
            for y in 0..n {
                for z in 0..n {
                    samples.push(Point3::new(x as f64, y as f64, z as f64) * self.spacing);
                }
            }
        }
        samples
    }

    pub fn centre(&self) -> Point3<f64> {
        let half = self.edge_size.saturating_sub(1) as f64 * self.spacing / 2.0;
        Point3::new(half, half, half)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestCharge {
    pub distance: f64,
    pub sign: Sign,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    pub direction: Vector3<f64>,
    /// `None` while the scene holds no charges.
    pub nearest: Option<NearestCharge>,
}

impl FieldSample {
    pub fn nearest_distance(&self) -> f64 {
        self.nearest.map_or(f64::INFINITY, |n| n.distance)
    }

    /// +1, -1, or 0 when there is no charge.
    pub fn nearest_sign(&self) -> i8 {
        match self.nearest {
            Some(NearestCharge {
                sign: Sign::Positive,
                ..
            }) => 1,
            Some(NearestCharge {
                sign: Sign::Negative,
                ..
            }) => -1,
            None => 0,
        }
    }
}

/// Unit vector the field contribution of a charge points along at `p`: away
/// from positive charges, towards negative ones.
fn unit_contribution(p: &Point3<f64>, c: &Point3<f64>, sign: Sign) -> Vector3<f64> {
    let away = match sign {
        Sign::Positive => p - c,
        Sign::Negative => c - p,
    };
    away.try_normalize(MIN_SEPARATION)
        .unwrap_or_else(Vector3::zeros)
}

pub struct FieldSampler {
    points: Vec<Point3<f64>>,
    pub mode: FieldVisualizationMode,
}

impl FieldSampler {
    pub fn new(lattice: &LatticeSpec, mode: FieldVisualizationMode) -> Self {
        FieldSampler {
            points: lattice.points(),
            mode,
        }
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn sample_at(&self, p: &Point3<f64>, charges: &ChargeSet) -> FieldSample {
        let mut nearest: Option<(NearestCharge, Point3<f64>)> = None;
        let mut superposed = Vector3::zeros();

        for c in charges.iter() {
            if self.mode == FieldVisualizationMode::FullSuperposition {
                superposed += unit_contribution(p, &c.position, c.sign);
            }
            let distance = (p - c.position).norm();
            // Strict comparison: on a tie the earlier charge stays nearest.
            if nearest.map_or(true, |(n, _)| distance < n.distance) {
                nearest = Some((
                    NearestCharge {
                        distance,
                        sign: c.sign,
                    },
                    c.position,
                ));
            }
        }

        let direction = match (self.mode, nearest) {
            (FieldVisualizationMode::FullSuperposition, _) => superposed,
            (FieldVisualizationMode::NearestChargeOnly, Some((n, c))) => {
                unit_contribution(p, &c, n.sign)
            }
            (FieldVisualizationMode::NearestChargeOnly, None) => Vector3::zeros(),
        };

        FieldSample {
            direction,
            nearest: nearest.map(|(n, _)| n),
        }
    }

    /// Samples for every lattice point, in lattice order.
    pub fn sample_all(&self, charges: &ChargeSet) -> Vec<FieldSample> {
        self.points
            .iter()
            .map(|p| self.sample_at(p, charges))
            .collect()
    }
}
