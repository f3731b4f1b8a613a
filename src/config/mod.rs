use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One slot of the feature vector. The 2-feature and 4-feature bot variants
/// are both instances of this descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    /// RSI reading divided by 100
    Rsi,
    /// ADX reading divided by 100
    Adx,
    /// (close - moving average) / moving average
    PricePosition,
    /// Volatility divided by its rolling maximum
    Volatility,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub indicators: IndicatorSettings,
    #[serde(default)]
    pub execution: ExecutionSettings,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            indicators: IndicatorSettings::default(),
            execution: ExecutionSettings::default(),
        }
    }
}

impl BotConfig {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if let Err(mut e) = self.classifier.validate() {
            errors.append(&mut e);
        }
        if let Err(mut e) = self.indicators.validate() {
            errors.append(&mut e);
        }
        if let Err(mut e) = self.execution.validate() {
            errors.append(&mut e);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Feature slots in vector order; length is the feature dimension
    pub features: Vec<FeatureKind>,
    pub neighbors_count: usize,
    /// Hard cap on stored history and the warmup requirement for evaluation
    pub max_bars_back: usize,
    /// Forward-return horizon used for label resolution
    pub future_bars: usize,
    /// Probability a direction must exceed before the filter considers it
    pub trend_threshold: f64,
    /// Quality floor on local price-shape similarity
    pub min_pattern_similarity: f64,
    /// Maximum relative volatility change the stability gate tolerates
    pub volatility_stability_threshold: f64,
    /// Scan every n-th stored sample; recall/throughput tradeoff
    pub subsample_stride: usize,
    /// Label sensitivity `c`: |forward return| below volatility * c is noise.
    /// Calibration knob with no derived rationale; set it deliberately.
    pub label_sensitivity: f64,
    /// Trailing close-price window length for pattern similarity
    pub pattern_window: usize,
    /// Rolling window for the volatility feature's normalizing maximum
    pub volatility_norm_window: usize,
    pub filter: FilterSettings,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            features: vec![
                FeatureKind::Rsi,
                FeatureKind::Adx,
                FeatureKind::PricePosition,
                FeatureKind::Volatility,
            ],
            neighbors_count: 12,
            max_bars_back: 2000,
            future_bars: 6,
            trend_threshold: 0.65,
            min_pattern_similarity: 0.75,
            volatility_stability_threshold: 0.15,
            subsample_stride: 2,
            label_sensitivity: 0.5,
            pattern_window: 5,
            volatility_norm_window: 500,
            filter: FilterSettings::default(),
        }
    }
}

impl ClassifierConfig {
    pub fn feature_dimension(&self) -> usize {
        self.features.len()
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.features.is_empty() {
            errors.push("features must contain at least one slot".to_string());
        }
        for (i, kind) in self.features.iter().enumerate() {
            if self.features[..i].contains(kind) {
                errors.push(format!("duplicate feature slot {:?}", kind));
            }
        }
        if self.neighbors_count < 1 {
            errors.push("neighbors_count must be >= 1".to_string());
        }
        if self.max_bars_back <= self.future_bars {
            errors.push("max_bars_back must be > future_bars".to_string());
        }
        if self.future_bars < 1 {
            errors.push("future_bars must be >= 1".to_string());
        }
        if !(self.trend_threshold > 0.0 && self.trend_threshold <= 1.0) {
            errors.push("trend_threshold must be in (0, 1]".to_string());
        }
        if !(0.0..=1.0).contains(&self.min_pattern_similarity) {
            errors.push("min_pattern_similarity must be in [0, 1]".to_string());
        }
        if !(self.volatility_stability_threshold > 0.0) {
            errors.push("volatility_stability_threshold must be > 0".to_string());
        }
        if self.subsample_stride < 1 {
            errors.push("subsample_stride must be >= 1".to_string());
        }
        if !self.label_sensitivity.is_finite() || self.label_sensitivity <= 0.0 {
            errors.push("label_sensitivity must be finite and > 0".to_string());
        }
        if self.pattern_window < 1 {
            errors.push("pattern_window must be >= 1".to_string());
        }
        if self.volatility_norm_window < 1 {
            errors.push("volatility_norm_window must be >= 1".to_string());
        }

        if let Err(mut e) = self.filter.validate() {
            errors.append(&mut e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Corroborating conditions applied after the probability threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Minimum trend strength (ADX) for any signal
    pub min_adx: f64,
    /// RSI band a long must sit inside
    pub rsi_long_min: f64,
    pub rsi_long_max: f64,
    /// RSI band a short must sit inside
    pub rsi_short_min: f64,
    pub rsi_short_max: f64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            min_adx: 10.0,
            rsi_long_min: 35.0,
            rsi_long_max: 80.0,
            rsi_short_min: 20.0,
            rsi_short_max: 65.0,
        }
    }
}

impl FilterSettings {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.min_adx < 0.0 {
            errors.push("filter: min_adx must be >= 0".to_string());
        }
        if self.rsi_long_min >= self.rsi_long_max {
            errors.push("filter: rsi_long_min must be < rsi_long_max".to_string());
        }
        if self.rsi_short_min >= self.rsi_short_max {
            errors.push("filter: rsi_short_min must be < rsi_short_max".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaType {
    Simple,
    Exponential,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSettings {
    pub rsi_period: usize,
    pub adx_period: usize,
    pub ma_period: usize,
    pub ma_type: MaType,
    pub volatility_period: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            adx_period: 14,
            ma_period: 200,
            ma_type: MaType::Exponential,
            volatility_period: 20,
        }
    }
}

impl IndicatorSettings {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.rsi_period < 2 {
            errors.push("rsi_period must be >= 2".to_string());
        }
        if self.adx_period < 2 {
            errors.push("adx_period must be >= 2".to_string());
        }
        if self.ma_period < 1 {
            errors.push("ma_period must be >= 1".to_string());
        }
        if self.volatility_period < 2 {
            errors.push("volatility_period must be >= 2".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Instrument and position-volume settings for the execution collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionSettings {
    /// Units per lot for the instrument
    pub lot_size: Decimal,
    /// Desired position size in lots
    pub position_volume_lots: Decimal,
    /// Tradable volume range and increment, in units
    pub volume_units_min: Decimal,
    pub volume_units_max: Decimal,
    pub volume_units_step: Decimal,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            lot_size: dec!(100000),
            position_volume_lots: dec!(0.1),
            volume_units_min: dec!(1000),
            volume_units_max: dec!(10000000),
            volume_units_step: dec!(1000),
        }
    }
}

impl ExecutionSettings {
    pub fn volume_units(&self) -> Decimal {
        self.position_volume_lots * self.lot_size
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.lot_size <= Decimal::ZERO {
            errors.push("execution: lot_size must be > 0".to_string());
        }
        if self.position_volume_lots <= Decimal::ZERO {
            errors.push("execution: position_volume_lots must be > 0".to_string());
        }
        if self.volume_units_step <= Decimal::ZERO {
            errors.push("execution: volume_units_step must be > 0".to_string());
        }
        if self.volume_units_min > self.volume_units_max {
            errors.push("execution: volume_units_min must be <= volume_units_max".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
