//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a lookback window.
//! Lookback: period - 1 (first valid value at index period-1).

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    /// A period of zero is treated as one.
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            name: format!("MA{period}"),
        }
    }

    /// Legend label, e.g. `MA20`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One value per input; NaN where the window is incomplete or holds a NaN.
    pub fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let n = closes.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        let mut sum = 0.0;
        let mut nan_in_window = false;
        for &close in closes.iter().take(self.period) {
            if close.is_nan() {
                nan_in_window = true;
            }
            sum += close;
        }

        if !nan_in_window {
            result[self.period - 1] = sum / self.period as f64;
        }

        for i in self.period..n {
            let leaving = closes[i - self.period];
            let entering = closes[i];
            sum = sum - leaving + entering;

            // A NaN poisons the running sum; rescan the window instead.
            if entering.is_nan() || leaving.is_nan() || nan_in_window {
                nan_in_window = false;
                sum = 0.0;
                for &close in &closes[(i + 1 - self.period)..=i] {
                    if close.is_nan() {
                        nan_in_window = true;
                    }
                    sum += close;
                }
                if nan_in_window {
                    continue;
                }
            }

            result[i] = sum / self.period as f64;
        }

        result
    }
}
