use super::Indicator;

/// Wilder directional movement system; exposes the ADX trend-strength line
#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    prev_high: Option<f64>,
    prev_low: Option<f64>,
    prev_close: Option<f64>,
    smoothed_tr: Option<f64>,
    smoothed_plus_dm: Option<f64>,
    smoothed_minus_dm: Option<f64>,
    warmup_tr: Vec<f64>,
    warmup_plus_dm: Vec<f64>,
    warmup_minus_dm: Vec<f64>,
    dx_warmup: Vec<f64>,
    value: Option<f64>,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            prev_high: None,
            prev_low: None,
            prev_close: None,
            smoothed_tr: None,
            smoothed_plus_dm: None,
            smoothed_minus_dm: None,
            warmup_tr: Vec::with_capacity(period),
            warmup_plus_dm: Vec::with_capacity(period),
            warmup_minus_dm: Vec::with_capacity(period),
            dx_warmup: Vec::with_capacity(period),
            value: None,
        }
    }

    pub fn update(&mut self, high: f64, low: f64, close: f64) -> Option<f64> {
        let (prev_high, prev_low, prev_close) =
            match (self.prev_high, self.prev_low, self.prev_close) {
                (Some(h), Some(l), Some(c)) => (h, l, c),
                _ => {
                    self.prev_high = Some(high);
                    self.prev_low = Some(low);
                    self.prev_close = Some(close);
                    return None;
                }
            };

        let tr = (high - low)
            .max((high - prev_close).abs())
            .max((low - prev_close).abs());

        let up_move = high - prev_high;
        let down_move = prev_low - low;
        let plus_dm = if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        };
        let minus_dm = if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        };

        self.prev_high = Some(high);
        self.prev_low = Some(low);
        self.prev_close = Some(close);

        match (
            self.smoothed_tr,
            self.smoothed_plus_dm,
            self.smoothed_minus_dm,
        ) {
            (Some(str_), Some(spd), Some(smd)) => {
                let n = self.period as f64;
                self.smoothed_tr = Some(str_ - str_ / n + tr);
                self.smoothed_plus_dm = Some(spd - spd / n + plus_dm);
                self.smoothed_minus_dm = Some(smd - smd / n + minus_dm);
            }
            _ => {
                self.warmup_tr.push(tr);
                self.warmup_plus_dm.push(plus_dm);
                self.warmup_minus_dm.push(minus_dm);
                if self.warmup_tr.len() == self.period {
                    self.smoothed_tr = Some(self.warmup_tr.iter().sum());
                    self.smoothed_plus_dm = Some(self.warmup_plus_dm.iter().sum());
                    self.smoothed_minus_dm = Some(self.warmup_minus_dm.iter().sum());
                } else {
                    return None;
                }
            }
        }

        let dx = self.directional_index()?;

        match self.value {
            Some(prev_adx) => {
                let n = self.period as f64;
                self.value = Some((prev_adx * (n - 1.0) + dx) / n);
            }
            None => {
                self.dx_warmup.push(dx);
                if self.dx_warmup.len() == self.period {
                    self.value =
                        Some(self.dx_warmup.iter().sum::<f64>() / self.period as f64);
                }
            }
        }

        self.value
    }

    fn directional_index(&self) -> Option<f64> {
        let tr = self.smoothed_tr?;
        if tr <= 0.0 {
            return Some(0.0);
        }
        let plus_di = 100.0 * self.smoothed_plus_dm? / tr;
        let minus_di = 100.0 * self.smoothed_minus_dm? / tr;
        let di_sum = plus_di + minus_di;
        if di_sum == 0.0 {
            return Some(0.0);
        }
        Some(100.0 * (plus_di - minus_di).abs() / di_sum)
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

impl Indicator for Adx {
    fn name(&self) -> &'static str {
        "ADX"
    }

    fn is_ready(&self) -> bool {
        self.value.is_some()
    }

    fn reset(&mut self) {
        self.prev_high = None;
        self.prev_low = None;
        self.prev_close = None;
        self.smoothed_tr = None;
        self.smoothed_plus_dm = None;
        self.smoothed_minus_dm = None;
        self.warmup_tr.clear();
        self.warmup_plus_dm.clear();
        self.warmup_minus_dm.clear();
        self.dx_warmup.clear();
        self.value = None;
    }
}
