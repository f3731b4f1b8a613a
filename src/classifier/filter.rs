use super::aggregate::Probabilities;
use crate::config::FilterSettings;
use crate::types::Direction;

/// Final acceptance check: probability threshold plus corroborating
/// indicator conditions (trend strength floor, oscillator bands).
#[derive(Debug, Clone)]
pub struct SignalFilter {
    trend_threshold: f64,
    settings: FilterSettings,
}

impl SignalFilter {
    pub fn new(trend_threshold: f64, settings: FilterSettings) -> Self {
        Self {
            trend_threshold,
            settings,
        }
    }

    /// Long wins deterministically if both sides somehow qualify (only
    /// possible with a threshold below 0.5).
    pub fn evaluate(&self, probabilities: &Probabilities, rsi: f64, adx: f64) -> Direction {
        if adx <= self.settings.min_adx {
            return Direction::Neutral;
        }

        let long_ok = probabilities.long > self.trend_threshold
            && rsi > self.settings.rsi_long_min
            && rsi < self.settings.rsi_long_max;
        let short_ok = probabilities.short > self.trend_threshold
            && rsi > self.settings.rsi_short_min
            && rsi < self.settings.rsi_short_max;

        if long_ok {
            Direction::Long
        } else if short_ok {
            Direction::Short
        } else {
            Direction::Neutral
        }
    }
}
