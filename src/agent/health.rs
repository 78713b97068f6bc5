//! Hit points with change notification

use std::fmt;

/// Callback invoked with `(current, max)` whenever HP changes.
pub type HpCallback = Box<dyn FnMut(f32, f32) + Send>;

/// Hit points clamped to `[0, max]`
pub struct Health {
    current: f32,
    max: f32,
    on_change: Option<HpCallback>,
}

impl Health {
    /// Full health. A negative or non-finite maximum is treated as zero.
    #[must_use]
    pub fn new(max: f32) -> Self {
        let max = if max.is_finite() { max.max(0.0) } else { 0.0 };
        Self {
            current: max,
            max,
            on_change: None,
        }
    }

    /// Register the HP-change callback, replacing any previous one
    pub fn set_on_change(&mut self, callback: impl FnMut(f32, f32) + Send + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    #[must_use]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[must_use]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Current HP as a fraction of the maximum (0 when max is 0)
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Subtract `amount` (negative amounts are ignored). Returns the new HP.
    pub fn damage(&mut self, amount: f32) -> f32 {
        if amount > 0.0 {
            self.set(self.current - amount);
        }
        self.current
    }

    /// Add `amount` (negative amounts are ignored). Returns the new HP.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if amount > 0.0 {
            self.set(self.current + amount);
        }
        self.current
    }

    /// Restore to full
    pub fn reset(&mut self) {
        self.set(self.max);
    }

    fn set(&mut self, value: f32) {
        let clamped = value.clamp(0.0, self.max);
        if clamped == self.current {
            return;
        }
        self.current = clamped;
        if let Some(callback) = self.on_change.as_mut() {
            callback(self.current, self.max);
        }
    }
}

impl fmt::Debug for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Health")
            .field("current", &self.current)
            .field("max", &self.max)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}
