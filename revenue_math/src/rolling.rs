//! Bounded rolling mean over the most recent observations

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Mean of the last `window` values pushed.
///
/// Unlike a strict moving average this reports a value as soon as one
/// observation is buffered, so short histories still produce an estimate.
#[derive(Debug, Clone)]
pub struct RollingMean {
    window: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl RollingMean {
    /// Create a rolling mean over at most `window` values
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(MathError::InvalidInput(
                "Window must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            window,
            values: VecDeque::with_capacity(window),
            sum: 0.0,
        })
    }

    /// Push a value, evicting the oldest one once the window is full
    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
        self.sum += value;

        if self.values.len() > self.window {
            if let Some(old) = self.values.pop_front() {
                self.sum -= old;
            }
        }
    }

    /// Current mean, `None` before the first push
    pub fn value(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.sum / self.values.len() as f64)
        }
    }

    /// Number of buffered values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been pushed yet
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
