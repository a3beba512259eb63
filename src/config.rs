//! Capacity management thresholds.

/// Slot count of tables built with `HashTable::new`.
pub const DEFAULT_CAPACITY: usize = 32;

/// Default lower load-factor bound.
pub const DEFAULT_MIN_LOAD: f32 = 0.2;

/// Default upper load-factor bound.
pub const DEFAULT_MAX_LOAD: f32 = 0.6;

/// Load-factor bounds that drive automatic growth and shrinking.
///
/// A managed table doubles once `len / capacity` exceeds `max_load` and
/// halves once it falls below `min_load`, as long as the halved capacity
/// stays at or above `min_capacity` and the halved table would not itself
/// exceed `max_load`. Both comparisons are strict, so `max_load` must stay
/// below 1 for a managed table to keep a free slot.
///
/// The `with_*` builders do not check their input; the bounds are
/// validated once the value reaches `new` or a table.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Management {
    min_load: f32,
    max_load: f32,
    min_capacity: usize,
}

impl Management {
    /// Panics unless `0 <= min_load < max_load < 1` and `min_capacity > 0`.
    pub fn new(min_load: f32, max_load: f32, min_capacity: usize) -> Self {
        let m = Self {
            min_load,
            max_load,
            min_capacity,
        };
        m.validate();
        m
    }

    pub(crate) fn validate(&self) {
        assert!(
            self.min_load >= 0.0 && self.min_load < self.max_load && self.max_load < 1.0,
            "invalid load bounds: min {} max {}",
            self.min_load,
            self.max_load
        );
        assert!(self.min_capacity > 0, "minimum capacity must be positive");
    }

    pub fn with_min_load(mut self, min_load: f32) -> Self {
        self.min_load = min_load;
        self
    }

    pub fn with_max_load(mut self, max_load: f32) -> Self {
        self.max_load = max_load;
        self
    }

    pub fn with_min_capacity(mut self, min_capacity: usize) -> Self {
        self.min_capacity = min_capacity;
        self
    }

    pub fn min_load(&self) -> f32 {
        self.min_load
    }

    pub fn max_load(&self) -> f32 {
        self.max_load
    }

    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// Capacity a table of `len` items in `capacity` slots should move to,
    /// or `None` if it is within bounds.
    pub(crate) fn target(&self, len: usize, capacity: usize) -> Option<usize> {
        let load = len as f32 / capacity as f32;
        let half = capacity / 2;
        if load < self.min_load
            && half >= self.min_capacity
            && len as f32 / half as f32 <= self.max_load
        {
            Some(half)
        } else if load > self.max_load {
            Some(capacity * 2)
        } else {
            None
        }
    }
}

impl Default for Management {
    fn default() -> Self {
        Self {
            min_load: DEFAULT_MIN_LOAD,
            max_load: DEFAULT_MAX_LOAD,
            min_capacity: DEFAULT_CAPACITY,
        }
    }
}
