//! Streaming nearest-neighbor regime classifier. Each bar it rebuilds a
//! feature vector, lazily labels matured history by realized forward
//! return, ranks the most similar historical bars under a Lorentzian
//! metric, and aggregates their labels into directional probabilities.
#![allow(dead_code)]

pub mod aggregate;
pub mod features;
pub mod filter;
pub mod gate;
pub mod metric;
pub mod neighbors;
pub mod store;

pub use aggregate::Probabilities;
pub use features::{FeatureExtractor, FeatureVector};
pub use neighbors::{NeighborCandidate, NeighborSelector};
pub use store::{HistoricalSample, Label, SampleStore};

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::config::ClassifierConfig;
use crate::data::MarketData;
use crate::types::{Direction, TradeSignal};

use filter::SignalFilter;
use gate::VolatilityGate;

/// Per-instrument classifier state: the sample store, the stability gate's
/// last volatility reading, and the configuration. Created at strategy
/// start, mutated once per bar.
pub struct LorentzianClassifier {
    config: ClassifierConfig,
    extractor: FeatureExtractor,
    selector: NeighborSelector,
    store: SampleStore,
    gate: VolatilityGate,
    filter: SignalFilter,
}

impl LorentzianClassifier {
    /// Validates the configuration up front; no cycle runs against an
    /// invalid parameter set.
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|errors| anyhow!("invalid classifier config: {}", errors.join("; ")))?;

        let extractor =
            FeatureExtractor::new(config.features.clone(), config.volatility_norm_window);
        let selector = NeighborSelector {
            neighbors_count: config.neighbors_count,
            subsample_stride: config.subsample_stride,
            min_pattern_similarity: config.min_pattern_similarity,
            pattern_window: config.pattern_window,
        };
        let store = SampleStore::new(config.max_bars_back);
        let gate = VolatilityGate::new(config.volatility_stability_threshold);
        let filter = SignalFilter::new(config.trend_threshold, config.filter.clone());

        Ok(Self {
            config,
            extractor,
            selector,
            store,
            gate,
            filter,
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Run one full cycle against the latest bar of `data`: feature update,
    /// label resolution, neighbor search, aggregation, stability check,
    /// filtering. Always updates internal state; emits a directional
    /// signal only when every acceptance check passes.
    pub fn on_bar(&mut self, data: &impl MarketData) -> TradeSignal {
        if data.bar_count() == 0 {
            return TradeSignal::neutral();
        }
        let index = data.bar_count() - 1;

        let current = self.extractor.extract(data, index);
        self.store.append(index, current.clone());
        self.store
            .resolve_labels(data, index, self.config.future_bars, self.config.label_sensitivity);

        // Warmup: keep accumulating state, emit nothing
        if data.bar_count() < self.config.max_bars_back {
            return TradeSignal::neutral();
        }

        let neighbors = self.selector.select(data, &self.store, &current, index);
        let probabilities = aggregate::aggregate(&neighbors);
        debug!(
            bar = index,
            neighbors = neighbors.len(),
            long = probabilities.long,
            short = probabilities.short,
            "probabilities"
        );

        let stable = self.gate.check(data.volatility(index));
        let direction = if stable {
            self.filter
                .evaluate(&probabilities, data.rsi(index), data.adx(index))
        } else {
            debug!(bar = index, "volatility unstable, signal suppressed");
            Direction::Neutral
        };

        TradeSignal {
            direction,
            long_probability: probabilities.long,
            short_probability: probabilities.short,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FeatureKind, FilterSettings};
    use crate::data::SeriesData;

    /// Small-history config with the quality floors opened up, so scenario
    /// behavior is driven purely by the labeling and aggregation rules.
    fn test_config() -> ClassifierConfig {
        ClassifierConfig {
            features: vec![FeatureKind::Rsi, FeatureKind::Adx],
            neighbors_count: 10,
            max_bars_back: 40,
            future_bars: 4,
            trend_threshold: 0.65,
            min_pattern_similarity: 0.0,
            volatility_stability_threshold: 0.15,
            subsample_stride: 1,
            label_sensitivity: 0.5,
            pattern_window: 5,
            volatility_norm_window: 500,
            filter: FilterSettings::default(),
        }
    }

    fn run_series(config: ClassifierConfig, closes: &[f64], volatility: f64) -> Vec<TradeSignal> {
        let mut classifier = LorentzianClassifier::new(config).unwrap();
        let mut data = SeriesData::new();
        let mut signals = Vec::new();
        for (i, close) in closes.iter().enumerate() {
            // mildly trending RSI/ADX so the filter bands stay satisfied
            let rsi = 55.0 + (i % 5) as f64;
            data.push_bar(*close, rsi, 30.0, *close, volatility);
            signals.push(classifier.on_bar(&data));
        }
        signals
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = test_config();
        config.neighbors_count = 0;
        assert!(LorentzianClassifier::new(config).is_err());
    }

    #[test]
    fn warmup_emits_neutral() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let signals = run_series(test_config(), &closes, 0.001);
        assert!(signals.iter().all(|s| !s.is_actionable()));
        assert!(signals
            .iter()
            .all(|s| s.long_probability == 0.0 && s.short_probability == 0.0));
    }

    #[test]
    fn rising_market_converges_to_certain_long() {
        // Scenario: strictly increasing prices, constant volatility. Every
        // resolved label is Up, so the probability mass must be all long.
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
        let signals = run_series(test_config(), &closes, 0.001);

        let last = signals.last().unwrap();
        assert_eq!(last.long_probability, 1.0);
        assert_eq!(last.short_probability, 0.0);
        assert_eq!(last.direction, Direction::Long);
    }

    #[test]
    fn flat_market_stays_silent() {
        // Scenario: constant prices. All labels resolve Flat, the neighbor
        // set stays empty, and no signal is ever emitted.
        let closes = vec![100.0; 80];
        let signals = run_series(test_config(), &closes, 0.001);
        for signal in &signals {
            assert_eq!(signal.direction, Direction::Neutral);
            assert_eq!(signal.long_probability, 0.0);
            assert_eq!(signal.short_probability, 0.0);
        }
    }

    #[test]
    fn falling_market_converges_to_certain_short() {
        let closes: Vec<f64> = (0..80).map(|i| 200.0 - i as f64).collect();
        let mut config = test_config();
        // keep RSI corroboration out of the way for the short side
        config.filter = FilterSettings {
            min_adx: 10.0,
            rsi_long_min: 0.0,
            rsi_long_max: 100.0,
            rsi_short_min: 0.0,
            rsi_short_max: 100.0,
        };
        let signals = run_series(config, &closes, 0.001);
        let last = signals.last().unwrap();
        assert_eq!(last.short_probability, 1.0);
        assert_eq!(last.direction, Direction::Short);
    }

    #[test]
    fn identical_runs_are_bit_identical() {
        let closes: Vec<f64> = (0..100)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.2)
            .collect();
        let a = run_series(test_config(), &closes, 0.01);
        let b = run_series(test_config(), &closes, 0.01);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.direction, y.direction);
            assert_eq!(x.long_probability.to_bits(), y.long_probability.to_bits());
            assert_eq!(x.short_probability.to_bits(), y.short_probability.to_bits());
        }
    }

    #[test]
    fn volatility_shock_suppresses_signal_but_not_state() {
        let mut classifier = LorentzianClassifier::new(test_config()).unwrap();
        let mut data = SeriesData::new();
        // warm up with a rising market and constant volatility
        for i in 0..60 {
            let close = 100.0 + i as f64;
            data.push_bar(close, 55.0, 30.0, close, 0.001);
            classifier.on_bar(&data);
        }
        // volatility doubles: probabilities still computed, direction gated
        data.push_bar(160.0, 55.0, 30.0, 160.0, 0.002);
        let shocked = classifier.on_bar(&data);
        assert_eq!(shocked.direction, Direction::Neutral);
        assert_eq!(shocked.long_probability, 1.0);

        // next bar is stable again relative to the new reading
        data.push_bar(161.0, 55.0, 30.0, 161.0, 0.002);
        let recovered = classifier.on_bar(&data);
        assert_eq!(recovered.direction, Direction::Long);
    }

    #[test]
    fn twin_bars_are_mutual_nearest_neighbors() {
        // Scenario: two bars with identical feature vectors and identical
        // trailing windows have distance 0 and similarity 1.
        let data = SeriesData::from_columns(
            vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0],
            vec![60.0; 6],
            vec![30.0; 6],
            vec![2.0; 6],
            vec![0.5; 6],
        );
        let extractor = FeatureExtractor::new(vec![FeatureKind::Rsi, FeatureKind::Adx], 500);
        let a = extractor.extract(&data, 2);
        let b = extractor.extract(&data, 5);
        assert_eq!(metric::lorentzian_distance(&a, &b), 0.0);
        assert_eq!(metric::pattern_similarity(&data, 5, 2, 3), 1.0);
    }
}
