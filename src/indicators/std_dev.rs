use super::Indicator;

/// Rolling population standard deviation of close prices, used as the
/// volatility estimator
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
    window: Vec<f64>,
    value: Option<f64>,
}

impl StdDev {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            window: Vec::with_capacity(period),
            value: None,
        }
    }

    pub fn update(&mut self, price: f64) -> Option<f64> {
        self.window.push(price);
        if self.window.len() > self.period {
            self.window.remove(0);
        }
        if self.window.len() < self.period {
            return None;
        }

        let n = self.period as f64;
        let mean = self.window.iter().sum::<f64>() / n;
        let variance = self
            .window
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / n;
        self.value = Some(variance.sqrt());
        self.value
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

impl Indicator for StdDev {
    fn name(&self) -> &'static str {
        "StdDev"
    }

    fn is_ready(&self) -> bool {
        self.value.is_some()
    }

    fn reset(&mut self) {
        self.window.clear();
        self.value = None;
    }
}
