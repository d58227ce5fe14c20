use std::collections::VecDeque;

use super::MovingAverage;

/// The average over the `window_size` most recent terms.
#[derive(Debug, Clone)]
pub(crate) struct WindowedMovingAverage {
    window_size: u64,
    windowed_sum: u64,
    values_in_window: VecDeque<u64>,
}

impl WindowedMovingAverage {
    pub(crate) fn new(window_size: u64) -> WindowedMovingAverage {
        assert!(window_size > 0, "the window should hold at least one value");
        WindowedMovingAverage {
            window_size,
            windowed_sum: 0,
            values_in_window: VecDeque::with_capacity(window_size as usize),
        }
    }

    fn evict_oldest(&mut self) {
        if let Some(oldest) = self.values_in_window.pop_front() {
            self.windowed_sum -= oldest;
        }
    }
}

impl MovingAverage for WindowedMovingAverage {
    fn add_term(&mut self, new_term: u64) {
        // If the window is full, an element is removed to make room for the new term
        if self.values_in_window.len() as u64 == self.window_size {
            self.evict_oldest();
        }

        self.windowed_sum += new_term;
        self.values_in_window.push_back(new_term);
    }

    fn value(&self) -> f64 {
        if self.values_in_window.is_empty() {
            0.0
        } else {
            self.windowed_sum as f64 / self.values_in_window.len() as f64
        }
    }

    fn adapt(&mut self, interval_length: u64) {
        assert!(interval_length > 0, "the window should hold at least one value");

        while self.values_in_window.len() as u64 > interval_length {
            self.evict_oldest();
        }
        self.window_size = interval_length;
    }
}
