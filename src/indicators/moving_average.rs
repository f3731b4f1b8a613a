use super::Indicator;
use crate::config::MaType;

/// Simple or exponential moving average over close prices
#[derive(Debug, Clone)]
pub struct MovingAverage {
    period: usize,
    ma_type: MaType,
    window: Vec<f64>,
    value: Option<f64>,
}

impl MovingAverage {
    pub fn new(period: usize, ma_type: MaType) -> Self {
        Self {
            period,
            ma_type,
            window: Vec::with_capacity(period),
            value: None,
        }
    }

    pub fn update(&mut self, price: f64) -> Option<f64> {
        match self.ma_type {
            MaType::Simple => {
                self.window.push(price);
                if self.window.len() > self.period {
                    self.window.remove(0);
                }
                if self.window.len() == self.period {
                    self.value = Some(self.window.iter().sum::<f64>() / self.period as f64);
                }
            }
            MaType::Exponential => {
                // Seed with an SMA of the first `period` prices, then recurse
                match self.value {
                    None => {
                        self.window.push(price);
                        if self.window.len() == self.period {
                            self.value =
                                Some(self.window.iter().sum::<f64>() / self.period as f64);
                            self.window.clear();
                        }
                    }
                    Some(prev) => {
                        let multiplier = 2.0 / (self.period as f64 + 1.0);
                        self.value = Some((price - prev) * multiplier + prev);
                    }
                }
            }
        }
        self.value
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

impl Indicator for MovingAverage {
    fn name(&self) -> &'static str {
        "MovingAverage"
    }

    fn is_ready(&self) -> bool {
        self.value.is_some()
    }

    fn reset(&mut self) {
        self.window.clear();
        self.value = None;
    }
}
