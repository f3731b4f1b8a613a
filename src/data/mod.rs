//! Market data capability consumed by the classifier: an indexable bar
//! history plus indicator series aligned to the same bar indices.
#![allow(dead_code)]

/// Indexable view over close prices and the indicator series the classifier
/// reads. Index 0 is the oldest bar; `bar_count() - 1` is the current bar.
pub trait MarketData {
    fn bar_count(&self) -> usize;
    fn close(&self, index: usize) -> f64;
    fn rsi(&self, index: usize) -> f64;
    fn adx(&self, index: usize) -> f64;
    fn moving_average(&self, index: usize) -> f64;
    fn volatility(&self, index: usize) -> f64;
}

/// In-memory column store of aligned series. The engine appends one row per
/// bar once every indicator is warm, so every index holds valid readings.
#[derive(Debug, Clone, Default)]
pub struct SeriesData {
    closes: Vec<f64>,
    rsi: Vec<f64>,
    adx: Vec<f64>,
    ma: Vec<f64>,
    volatility: Vec<f64>,
}

impl SeriesData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_bar(&mut self, close: f64, rsi: f64, adx: f64, ma: f64, volatility: f64) {
        self.closes.push(close);
        self.rsi.push(rsi);
        self.adx.push(adx);
        self.ma.push(ma);
        self.volatility.push(volatility);
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Build from pre-made columns; lengths must match. Test and replay helper.
    pub fn from_columns(
        closes: Vec<f64>,
        rsi: Vec<f64>,
        adx: Vec<f64>,
        ma: Vec<f64>,
        volatility: Vec<f64>,
    ) -> Self {
        assert_eq!(closes.len(), rsi.len());
        assert_eq!(closes.len(), adx.len());
        assert_eq!(closes.len(), ma.len());
        assert_eq!(closes.len(), volatility.len());
        Self {
            closes,
            rsi,
            adx,
            ma,
            volatility,
        }
    }
}

impl MarketData for SeriesData {
    fn bar_count(&self) -> usize {
        self.closes.len()
    }

    fn close(&self, index: usize) -> f64 {
        self.closes[index]
    }

    fn rsi(&self, index: usize) -> f64 {
        self.rsi[index]
    }

    fn adx(&self, index: usize) -> f64 {
        self.adx[index]
    }

    fn moving_average(&self, index: usize) -> f64 {
        self.ma[index]
    }

    fn volatility(&self, index: usize) -> f64 {
        self.volatility[index]
    }
}
