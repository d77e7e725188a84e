//! Hint charges available to one sub-level attempt.

/// Per-attempt hint counter bounded by the tier's allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintAllowance {
    max: u32,
    used: u32,
}

impl HintAllowance {
    pub fn new(max: u32) -> Self {
        Self { max, used: 0 }
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn remaining(&self) -> u32 {
        self.max - self.used
    }

    /// Spends one hint. Returns false when none are left.
    pub fn try_consume(&mut self) -> bool {
        if self.used >= self.max {
            return false;
        }
        self.used += 1;
        true
    }
}
