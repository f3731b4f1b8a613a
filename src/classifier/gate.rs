/// Suppresses signal emission when volatility shifted too abruptly since
/// the previous bar. Tracks only the last observed reading.
#[derive(Debug, Clone)]
pub struct VolatilityGate {
    threshold: f64,
    previous: Option<f64>,
}

impl VolatilityGate {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            previous: None,
        }
    }

    /// Record the current reading and report whether the regime is stable
    /// enough to act on. The first evaluation always passes, as does a
    /// zero previous reading.
    pub fn check(&mut self, current: f64) -> bool {
        let stable = match self.previous {
            None => true,
            Some(prev) if prev == 0.0 => true,
            Some(prev) => {
                let relative_change = (current - prev).abs() / prev;
                relative_change < self.threshold
            }
        };
        self.previous = Some(current);
        stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_evaluation_passes() {
        let mut gate = VolatilityGate::new(0.15);
        assert!(gate.check(2.0));
    }

    #[test]
    fn small_change_passes_large_change_fails() {
        let mut gate = VolatilityGate::new(0.15);
        gate.check(1.0);
        assert!(gate.check(1.1));
        assert!(!gate.check(1.5));
    }

    #[test]
    fn zero_previous_reading_is_treated_as_stable() {
        let mut gate = VolatilityGate::new(0.15);
        gate.check(0.0);
        assert!(gate.check(5.0));
    }

    #[test]
    fn previous_updates_even_on_failure() {
        let mut gate = VolatilityGate::new(0.15);
        gate.check(1.0);
        assert!(!gate.check(2.0));
        // relative to 2.0 now, not 1.0
        assert!(gate.check(2.1));
    }

    #[test]
    fn change_at_threshold_fails() {
        let mut gate = VolatilityGate::new(0.15);
        gate.check(1.0);
        assert!(!gate.check(1.16));
    }
}
