use serde::{Deserialize, Serialize};

use crate::animation::values::Interpolatable;

const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the keyframe interval used by the previous sample so that
/// monotonic playback finds the next interval in O(1).
#[derive(Debug, Clone, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

/// One channel's keyframes: `keys` and `values` are index aligned.
///
/// Keys are normalized times and are expected in ascending order. The
/// order is not enforced: tracks keep the order frames were supplied in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeTrack<T> {
    pub keys: Vec<f32>,
    pub values: Vec<T>,
}

impl<T> Default for KeyframeTrack<T> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<T> KeyframeTrack<T> {
    #[must_use]
    pub fn new(keys: Vec<f32>, values: Vec<T>) -> Self {
        debug_assert_eq!(keys.len(), values.len(), "keys and values must be index aligned");
        Self { keys, values }
    }

    pub fn push(&mut self, key: f32, value: T) {
        self.keys.push(key);
        self.values.push(value);
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<T: Interpolatable> KeyframeTrack<T> {
    /// Stateless sampling with a binary search. `None` for an empty track.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let next_idx = self.keys.partition_point(|&k| k <= time);
        Some(self.sample_at_frame(next_idx.saturating_sub(1), time))
    }

    /// Sampling that reuses and updates `cursor`. `None` for an empty track.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        let len = self.keys.len();
        match len {
            0 => return None,
            1 => return Some(self.values[0].clone()),
            _ => {}
        }

        let i = cursor.last_index.min(len - 1);
        let t_curr = self.keys[i];

        let found = if time >= t_curr {
            // Forward playback: scan ahead a few intervals.
            let mut res = None;
            for offset in 0..=MAX_SCAN_OFFSET {
                let idx = i + offset;
                if idx >= len - 1 {
                    if time >= self.keys[len - 1] {
                        res = Some(len - 1);
                    }
                    break;
                }
                if time < self.keys[idx + 1] {
                    res = Some(idx);
                    break;
                }
            }
            res
        } else {
            // Loop restart or reverse playback: scan back a few intervals.
            (0..=MAX_SCAN_OFFSET)
                .take_while(|&offset| offset <= i)
                .map(|offset| i - offset)
                .find(|&idx| time >= self.keys[idx])
        };

        let index = found.unwrap_or_else(|| {
            // Large jump: fall back to a binary search.
            self.keys.partition_point(|&k| k <= time).saturating_sub(1)
        });
        cursor.last_index = index;

        Some(self.sample_at_frame(index, time))
    }

    fn sample_at_frame(&self, index: usize, time: f32) -> T {
        let len = self.keys.len();
        if index >= len - 1 {
            return self.values[len - 1].clone();
        }

        let t0 = self.keys[index];
        let t1 = self.keys[index + 1];
        let dt = t1 - t0;

        // Before the first key, or a zero-length interval.
        let t = if dt > 1e-6 { (time - t0) / dt } else { 0.0 };
        let t = t.clamp(0.0, 1.0);

        T::interpolate_linear(&self.values[index], &self.values[index + 1], t)
    }
}
