//! A max-heap over the keys `[0, ..., n - 1]` with floating point values. Keys can be removed
//! temporarily and restored later with their value intact, and all values can be rescaled at once.

use super::Variable;

#[derive(Debug, Default, Clone)]
pub(crate) struct KeyValueHeap {
    /// The values stored as a heap; the value of key `i` is at `values[key_to_position[i]]`.
    values: Vec<f64>,
    key_to_position: Vec<usize>,
    position_to_key: Vec<Variable>,
    /// Positions `[0, end_position)` form the heap; the keys after it are removed.
    end_position: usize,
}

impl KeyValueHeap {
    /// Adds the next key with the given value.
    pub(crate) fn grow(&mut self, value: f64) {
        let last_position = self.values.len();
        self.values.push(value);
        self.key_to_position.push(last_position);
        self.position_to_key
            .push(Variable::new(last_position as u32));

        self.swap_positions(self.end_position, last_position);
        self.end_position += 1;
        self.sift_up(self.end_position - 1);
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.end_position == 0
    }

    pub(crate) fn peek_max(&self) -> Option<Variable> {
        if self.is_empty() {
            None
        } else {
            Some(self.position_to_key[0])
        }
    }

    pub(crate) fn pop_max(&mut self) -> Option<Variable> {
        let best = self.peek_max()?;
        self.delete_key(best);
        Some(best)
    }

    pub(crate) fn value(&self, key: Variable) -> f64 {
        self.values[self.key_to_position[key.index()]]
    }

    pub(crate) fn is_key_present(&self, key: Variable) -> bool {
        self.key_to_position[key.index()] < self.end_position
    }

    /// Increments the value of `key`; removed keys keep the new value for when they are restored.
    pub(crate) fn increment(&mut self, key: Variable, increment: f64) {
        let position = self.key_to_position[key.index()];
        self.values[position] += increment;
        if self.is_key_present(key) {
            self.sift_up(position);
        }
    }

    pub(crate) fn restore_key(&mut self, key: Variable) {
        if self.is_key_present(key) {
            return;
        }

        let position = self.key_to_position[key.index()];
        self.swap_positions(position, self.end_position);
        self.end_position += 1;
        self.sift_up(self.end_position - 1);
    }

    pub(crate) fn delete_key(&mut self, key: Variable) {
        if !self.is_key_present(key) {
            return;
        }

        let position = self.key_to_position[key.index()];
        self.swap_positions(position, self.end_position - 1);
        self.end_position -= 1;
        if position < self.end_position {
            self.sift_down(position);
        }
    }

    /// Divides every value, including those of removed keys.
    pub(crate) fn divide_values(&mut self, divisor: f64) {
        for value in self.values.iter_mut() {
            *value /= divisor;
        }
    }

    /// Restores the heap property after values were changed in bulk.
    pub(crate) fn rebuild(&mut self, mut new_value: impl FnMut(Variable, f64) -> f64) {
        for position in 0..self.values.len() {
            let key = self.position_to_key[position];
            self.values[position] = new_value(key, self.values[position]);
        }
        for position in (0..self.end_position / 2).rev() {
            self.sift_down(position);
        }
    }

    fn swap_positions(&mut self, a: usize, b: usize) {
        let key_a = self.position_to_key[a];
        let key_b = self.position_to_key[b];

        self.values.swap(a, b);
        self.position_to_key.swap(a, b);
        self.key_to_position.swap(key_a.index(), key_b.index());
    }

    fn sift_up(&mut self, mut position: usize) {
        while position > 0 {
            let parent = (position - 1) / 2;
            if self.values[parent] >= self.values[position] {
                return;
            }
            self.swap_positions(parent, position);
            position = parent;
        }
    }

    fn sift_down(&mut self, mut position: usize) {
        loop {
            let left = 2 * position + 1;
            if left >= self.end_position {
                return;
            }

            let right = left + 1;
            let largest_child = if right < self.end_position && self.values[right] > self.values[left]
            {
                right
            } else {
                left
            };

            if self.values[position] >= self.values[largest_child] {
                return;
            }
            self.swap_positions(position, largest_child);
            position = largest_child;
        }
    }
}
