// src/tracking/debounce.rs

/// Consecutive-tick counter that rejects single-tick perception noise.
#[derive(Debug, Clone)]
pub struct Debouncer {
    count: u32,
    threshold: u32,
}

impl Debouncer {
    pub fn new(threshold: u32) -> Self {
        Self {
            count: 0,
            threshold: threshold.max(1),
        }
    }

    /// Count one agreeing tick. Returns true once the threshold is reached.
    pub fn observe(&mut self) -> bool {
        self.count = (self.count + 1).min(self.threshold);
        self.is_confirmed()
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn is_confirmed(&self) -> bool {
        self.count >= self.threshold
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirms_exactly_on_threshold() {
        let mut debouncer = Debouncer::new(3);
        assert!(!debouncer.observe());
        assert!(!debouncer.observe());
        assert!(debouncer.observe());
        assert_eq!(debouncer.count(), 3);
    }

    #[test]
    fn test_saturates_and_resets() {
        let mut debouncer = Debouncer::new(3);
        for _ in 0..10 {
            debouncer.observe();
        }
        assert_eq!(debouncer.count(), 3);
        debouncer.reset();
        assert!(!debouncer.is_confirmed());
        assert_eq!(debouncer.count(), 0);
    }

    #[test]
    fn test_zero_threshold_is_treated_as_one() {
        let mut debouncer = Debouncer::new(0);
        assert!(debouncer.observe());
    }
}
