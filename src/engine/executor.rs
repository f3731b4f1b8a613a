use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use crate::config::ExecutionSettings;
use crate::types::Direction;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("position volume {volume} units outside tradable range [{min}, {max}]")]
    VolumeOutOfRange {
        volume: Decimal,
        min: Decimal,
        max: Decimal,
    },
    #[error("order rejected: {0}")]
    Rejected(String),
}

/// Resolve the configured lot volume into tradable units. Volumes outside
/// the instrument's range fail fast; off-step volumes are rounded to the
/// nearest step.
pub fn resolve_volume_units(settings: &ExecutionSettings) -> Result<Decimal, ExecutionError> {
    let mut volume = settings.volume_units();

    if volume < settings.volume_units_min || volume > settings.volume_units_max {
        return Err(ExecutionError::VolumeOutOfRange {
            volume,
            min: settings.volume_units_min,
            max: settings.volume_units_max,
        });
    }

    let step = settings.volume_units_step;
    let remainder = volume % step;
    if !remainder.is_zero() {
        volume = (volume / step).round() * step;
        warn!(
            "volume adjusted to {} lots to match instrument step",
            volume / settings.lot_size
        );
    }

    Ok(volume)
}

/// A filled order
#[derive(Debug, Clone)]
pub struct Fill {
    pub direction: Direction,
    pub volume_units: Decimal,
    pub entry_price: Decimal,
}

/// Execution collaborator: invoked only with a directional signal, returns
/// the realized entry price on success. The classifier never sees the
/// outcome.
pub trait ExecutionClient {
    fn execute_market_order(
        &mut self,
        direction: Direction,
        volume_units: Decimal,
        price: Decimal,
    ) -> Result<Decimal, ExecutionError>;
}

/// Fills every order at the requested price and remembers the fills
#[derive(Debug, Default)]
pub struct PaperExecutor {
    fills: Vec<Fill>,
}

impl PaperExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fills(&self) -> &[Fill] {
        &self.fills
    }
}

impl ExecutionClient for PaperExecutor {
    fn execute_market_order(
        &mut self,
        direction: Direction,
        volume_units: Decimal,
        price: Decimal,
    ) -> Result<Decimal, ExecutionError> {
        self.fills.push(Fill {
            direction,
            volume_units,
            entry_price: price,
        });
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn in_range_on_step_volume_passes_through() {
        let settings = ExecutionSettings::default();
        let volume = resolve_volume_units(&settings).unwrap();
        assert_eq!(volume, dec!(10000));
    }

    #[test]
    fn out_of_range_volume_is_rejected() {
        let mut settings = ExecutionSettings::default();
        settings.position_volume_lots = dec!(1000);
        let err = resolve_volume_units(&settings).unwrap_err();
        assert!(matches!(err, ExecutionError::VolumeOutOfRange { .. }));
    }

    #[test]
    fn off_step_volume_rounds_to_nearest_step() {
        let mut settings = ExecutionSettings::default();
        settings.position_volume_lots = dec!(0.1043);
        let volume = resolve_volume_units(&settings).unwrap();
        assert_eq!(volume, dec!(10000));
    }

    #[test]
    fn paper_executor_fills_at_requested_price() {
        let mut executor = PaperExecutor::new();
        let entry = executor
            .execute_market_order(Direction::Long, dec!(10000), dec!(1.2345))
            .unwrap();
        assert_eq!(entry, dec!(1.2345));
        assert_eq!(executor.fills().len(), 1);
    }
}
