use crate::charge::Sign;

/// Latches a press of each placement key and fires once when it is released.
/// Holding a key down places nothing until it comes back up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputEdgeTracker {
    positive_held: bool,
    negative_held: bool,
}

impl InputEdgeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn latch(&mut self, sign: Sign) -> &mut bool {
        match sign {
            Sign::Positive => &mut self.positive_held,
            Sign::Negative => &mut self.negative_held,
        }
    }

    /// Feed the key state for this frame. Returns true on the frame the key is
    /// released after having been seen down.
    pub fn update(&mut self, sign: Sign, down: bool) -> bool {
        let held = self.latch(sign);
        match (*held, down) {
            (_, true) => {
                *held = true;
                false
            }
            (true, false) => {
                *held = false;
                true
            }
            (false, false) => false,
        }
    }

    pub fn is_held(&self, sign: Sign) -> bool {
        match sign {
            Sign::Positive => self.positive_held,
            Sign::Negative => self.negative_held,
        }
    }
}
