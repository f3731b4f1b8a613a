#![allow(dead_code)]
pub mod executor;

pub use executor::*;

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::classifier::LorentzianClassifier;
use crate::config::BotConfig;
use crate::data::SeriesData;
use crate::indicators::{Adx, Indicator, MovingAverage, Rsi, StdDev};
use crate::types::{Candle, Direction, TradeSignal};

#[derive(Debug, Clone)]
struct OpenPosition {
    direction: Direction,
    entry_price: Decimal,
}

/// Per-bar driver: maintains the indicator bank, appends aligned series
/// rows once every indicator is warm, runs the classifier, and routes
/// directional signals to the execution collaborator.
pub struct TradingEngine<E: ExecutionClient> {
    classifier: LorentzianClassifier,
    rsi: Rsi,
    adx: Adx,
    ma: MovingAverage,
    volatility: StdDev,
    series: SeriesData,
    executor: E,
    volume_units: Decimal,
    position: Option<OpenPosition>,
    prev_close: Option<f64>,
}

impl<E: ExecutionClient> TradingEngine<E> {
    pub fn new(config: BotConfig, executor: E) -> Result<Self> {
        config
            .validate()
            .map_err(|errors| anyhow!("invalid config: {}", errors.join("; ")))?;
        let volume_units = resolve_volume_units(&config.execution)?;

        Ok(Self {
            classifier: LorentzianClassifier::new(config.classifier)?,
            rsi: Rsi::new(config.indicators.rsi_period),
            adx: Adx::new(config.indicators.adx_period),
            ma: MovingAverage::new(config.indicators.ma_period, config.indicators.ma_type),
            volatility: StdDev::new(config.indicators.volatility_period),
            series: SeriesData::new(),
            executor,
            volume_units,
            position: None,
            prev_close: None,
        })
    }

    /// Process one closed candle. Returns the classifier's signal once the
    /// indicator bank is warm, `None` while it is still filling.
    pub fn on_candle(&mut self, candle: &Candle) -> Option<TradeSignal> {
        let close = candle.close_f64();
        let rsi = self.rsi.update(close);
        let adx = self.adx.update(candle.high_f64(), candle.low_f64(), close);
        let ma = self.ma.update(close);
        // volatility estimator runs on one-bar returns, matching the units
        // of the forward returns it is compared against in labeling
        let bar_return = match self.prev_close {
            Some(prev) if prev != 0.0 => (close - prev) / prev,
            _ => 0.0,
        };
        self.prev_close = Some(close);
        let volatility = self.volatility.update(bar_return);

        let (Some(rsi), Some(adx), Some(ma), Some(volatility)) = (rsi, adx, ma, volatility)
        else {
            return None;
        };

        self.series.push_bar(close, rsi, adx, ma, volatility);
        let signal = self.classifier.on_bar(&self.series);

        if signal.is_actionable() {
            self.handle_signal(&signal, candle.close);
        }

        Some(signal)
    }

    /// Opposite signal closes the open position first; a duplicate
    /// direction is ignored. Execution failure leaves all state untouched.
    fn handle_signal(&mut self, signal: &TradeSignal, price: Decimal) {
        if let Some(open) = &self.position {
            if open.direction == signal.direction {
                debug!("{} signal but position already open", signal.direction);
                return;
            }
            info!(
                "closing {} position from {} on opposite signal",
                open.direction, open.entry_price
            );
            self.position = None;
        }

        match self
            .executor
            .execute_market_order(signal.direction, self.volume_units, price)
        {
            Ok(entry_price) => {
                info!(
                    "opened {} position at {} (long {:.4} / short {:.4})",
                    signal.direction, entry_price, signal.long_probability, signal.short_probability
                );
                self.position = Some(OpenPosition {
                    direction: signal.direction,
                    entry_price,
                });
            }
            Err(e) => {
                warn!("order execution failed: {}", e);
            }
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn bars_classified(&self) -> usize {
        self.series.len()
    }

    pub fn has_open_position(&self) -> bool {
        self.position.is_some()
    }

    /// Reset indicators and series, keeping classifier configuration
    pub fn reset_indicators(&mut self) {
        self.rsi.reset();
        self.adx.reset();
        self.ma.reset();
        self.volatility.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClassifierConfig, FeatureKind, FilterSettings, MaType};
    use chrono::Utc;
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal_macros::dec;

    fn candle(close: f64) -> Candle {
        let price = Decimal::from_f64(close).unwrap();
        Candle {
            open_time: Utc::now(),
            open: price,
            high: price + dec!(0.5),
            low: price - dec!(0.5),
            close: price,
            volume: dec!(1000),
        }
    }

    fn small_config() -> BotConfig {
        let mut config = BotConfig::default();
        config.classifier = ClassifierConfig {
            features: vec![FeatureKind::Rsi, FeatureKind::Adx],
            neighbors_count: 8,
            max_bars_back: 50,
            future_bars: 4,
            trend_threshold: 0.65,
            min_pattern_similarity: 0.0,
            volatility_stability_threshold: 0.5,
            subsample_stride: 1,
            label_sensitivity: 0.5,
            pattern_window: 5,
            volatility_norm_window: 100,
            filter: FilterSettings {
                min_adx: 5.0,
                rsi_long_min: 0.0,
                rsi_long_max: 100.0,
                rsi_short_min: 0.0,
                rsi_short_max: 100.0,
            },
        };
        config.indicators.rsi_period = 5;
        config.indicators.adx_period = 5;
        config.indicators.ma_period = 5;
        config.indicators.ma_type = MaType::Simple;
        config.indicators.volatility_period = 5;
        config
    }

    #[test]
    fn rejects_invalid_volume_at_construction() {
        let mut config = small_config();
        config.execution.position_volume_lots = dec!(1000);
        assert!(TradingEngine::new(config, PaperExecutor::new()).is_err());
    }

    #[test]
    fn warmup_produces_no_signal() {
        let mut engine = TradingEngine::new(small_config(), PaperExecutor::new()).unwrap();
        for i in 0..5 {
            assert!(engine.on_candle(&candle(100.0 + i as f64)).is_none());
        }
    }

    /// Uptrend with periodic pullbacks; keeps RSI off its 100 saturation
    fn trending_closes(n: usize) -> Vec<f64> {
        let mut closes = Vec::with_capacity(n);
        let mut price = 100.0;
        for i in 0..n {
            price += if i % 3 == 2 { -0.5 } else { 2.0 };
            closes.push(price);
        }
        closes
    }

    #[test]
    fn rising_market_opens_a_long() {
        let mut engine = TradingEngine::new(small_config(), PaperExecutor::new()).unwrap();
        for close in trending_closes(120) {
            engine.on_candle(&candle(close));
        }
        assert!(engine.has_open_position());
        let fills = engine.executor().fills();
        assert!(!fills.is_empty());
        assert!(fills.iter().all(|f| f.direction == Direction::Long));
    }

    #[test]
    fn duplicate_signals_do_not_stack_positions() {
        let mut engine = TradingEngine::new(small_config(), PaperExecutor::new()).unwrap();
        for close in trending_closes(200) {
            engine.on_candle(&candle(close));
        }
        // long signals repeat after warmup; only the first one fills
        assert_eq!(engine.executor().fills().len(), 1);
    }

    struct RejectingExecutor;

    impl ExecutionClient for RejectingExecutor {
        fn execute_market_order(
            &mut self,
            _direction: Direction,
            _volume_units: Decimal,
            _price: Decimal,
        ) -> Result<Decimal, ExecutionError> {
            Err(ExecutionError::Rejected("no liquidity".to_string()))
        }
    }

    #[test]
    fn rejected_execution_leaves_state_unchanged() {
        let mut engine = TradingEngine::new(small_config(), RejectingExecutor).unwrap();
        let mut signals = Vec::new();
        for close in trending_closes(200) {
            if let Some(signal) = engine.on_candle(&candle(close)) {
                signals.push(signal);
            }
        }
        assert!(!engine.has_open_position());
        // the classifier kept producing signals despite every rejection
        assert!(signals.iter().any(|s| s.is_actionable()));
    }
}
