//! Counters that own their state.
//!
//! [`make_counter`] is the closure form: the returned function captures the
//! seed by value and bumps it on every call. [`Counter`] is the same thing as a
//! struct, for when the counter has to be named in a type or iterated.

/// Returns a function that increments a private copy of `start` and yields the
/// new value on each call.
///
/// Every call to `make_counter` creates fresh state, so two counters never
/// observe each other even when built from the same seed.
///
/// ```
/// let mut inc = counter::make_counter(-5);
/// assert_eq!(inc(), -4);
/// assert_eq!(inc(), -3);
/// ```
pub fn make_counter(start: i64) -> impl FnMut() -> i64 {
    let mut count = start;
    move || {
        count += 1;
        count
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    value: i64,
}

impl Counter {
    pub fn new(start: i64) -> Self {
        Self { value: start }
    }

    pub fn increment(&mut self) -> i64 {
        self.value += 1;
        self.value
    }

    /// Last value returned by [`Counter::increment`], or the seed.
    pub fn current(&self) -> i64 {
        self.value
    }
}

impl Iterator for Counter {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        Some(self.increment())
    }
}
