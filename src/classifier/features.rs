use crate::config::FeatureKind;
use crate::data::MarketData;

/// Immutable, fixed-dimension feature vector for one bar
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Builds the bounded feature vector for a bar from the indicator series.
/// Pure function of recent history; the only window it carries is the
/// rolling maximum used to normalize the volatility feature.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    features: Vec<FeatureKind>,
    volatility_norm_window: usize,
}

impl FeatureExtractor {
    pub fn new(features: Vec<FeatureKind>, volatility_norm_window: usize) -> Self {
        Self {
            features,
            volatility_norm_window,
        }
    }

    pub fn dimension(&self) -> usize {
        self.features.len()
    }

    pub fn extract(&self, data: &impl MarketData, index: usize) -> FeatureVector {
        let values = self
            .features
            .iter()
            .map(|kind| self.feature_value(*kind, data, index))
            .collect();
        FeatureVector::new(values)
    }

    fn feature_value(&self, kind: FeatureKind, data: &impl MarketData, index: usize) -> f64 {
        match kind {
            FeatureKind::Rsi => normalize_oscillator(data.rsi(index)),
            FeatureKind::Adx => normalize_oscillator(data.adx(index)),
            FeatureKind::PricePosition => price_position(data, index),
            FeatureKind::Volatility => self.normalize_volatility(data, index),
        }
    }

    /// Current volatility over the maximum observed in the trailing window.
    /// Denominator is floored at 1 when the rolling max is not positive.
    fn normalize_volatility(&self, data: &impl MarketData, index: usize) -> f64 {
        let start = index.saturating_sub(self.volatility_norm_window - 1);
        let mut max_vol = f64::MIN;
        for i in start..=index {
            let v = data.volatility(i);
            if v > max_vol {
                max_vol = v;
            }
        }
        let denom = if max_vol > 0.0 { max_vol } else { 1.0 };
        let value = data.volatility(index) / denom;
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

/// RSI and ADX both live in [0, 100]; map onto [0, 1]
fn normalize_oscillator(value: f64) -> f64 {
    if value.is_finite() {
        value / 100.0
    } else {
        0.0
    }
}

/// Relative distance of the close from its moving average. A degenerate
/// average contributes nothing rather than poisoning the distance.
fn price_position(data: &impl MarketData, index: usize) -> f64 {
    let ma = data.moving_average(index);
    if !ma.is_finite() || ma <= 0.0 {
        return 0.0;
    }
    let value = (data.close(index) - ma) / ma;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SeriesData;

    fn single_bar(close: f64, rsi: f64, adx: f64, ma: f64, vol: f64) -> SeriesData {
        SeriesData::from_columns(vec![close], vec![rsi], vec![adx], vec![ma], vec![vol])
    }

    #[test]
    fn oscillator_features_stay_in_unit_range() {
        for raw in [0.0, 12.5, 50.0, 99.9, 100.0] {
            let v = normalize_oscillator(raw);
            assert!((0.0..=1.0).contains(&v), "raw {raw} mapped to {v}");
        }
    }

    #[test]
    fn non_finite_oscillator_reading_is_dropped() {
        assert_eq!(normalize_oscillator(f64::NAN), 0.0);
        assert_eq!(normalize_oscillator(f64::INFINITY), 0.0);
    }

    #[test]
    fn extracts_in_slot_order() {
        let extractor = FeatureExtractor::new(
            vec![FeatureKind::Rsi, FeatureKind::Adx, FeatureKind::PricePosition],
            500,
        );
        let data = single_bar(105.0, 60.0, 30.0, 100.0, 1.0);
        let fv = extractor.extract(&data, 0);
        assert_eq!(fv.dimension(), 3);
        assert_eq!(fv.values()[0], 0.6);
        assert_eq!(fv.values()[1], 0.3);
        assert!((fv.values()[2] - 0.05).abs() < 1e-12);
    }

    #[test]
    fn zero_moving_average_contributes_nothing() {
        let data = single_bar(105.0, 60.0, 30.0, 0.0, 1.0);
        assert_eq!(price_position(&data, 0), 0.0);
    }

    #[test]
    fn volatility_normalized_by_rolling_max() {
        let extractor = FeatureExtractor::new(vec![FeatureKind::Volatility], 3);
        let data = SeriesData::from_columns(
            vec![1.0; 5],
            vec![50.0; 5],
            vec![20.0; 5],
            vec![1.0; 5],
            vec![2.0, 4.0, 1.0, 1.0, 1.0],
        );
        // window at index 4 covers indices 2..=4, max 1.0
        let fv = extractor.extract(&data, 4);
        assert_eq!(fv.values()[0], 1.0);
        // window at index 2 covers indices 0..=2, max 4.0
        let fv = extractor.extract(&data, 2);
        assert_eq!(fv.values()[0], 0.25);
    }

    #[test]
    fn non_positive_rolling_max_floors_denominator() {
        let extractor = FeatureExtractor::new(vec![FeatureKind::Volatility], 10);
        let data = single_bar(100.0, 50.0, 20.0, 100.0, 0.0);
        let fv = extractor.extract(&data, 0);
        assert_eq!(fv.values()[0], 0.0);
    }
}
