//! Click-trigger rate limiting.

/// Accepts at most one trigger per window. One instance per coordinator,
/// not per element: the host page replaces media elements constantly, and
/// per-element state would reset with every replacement.
#[derive(Debug)]
pub struct DebounceGate {
    window_ms: u64,
    last_acquired_ms: Option<u64>,
}

impl DebounceGate {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_acquired_ms: None,
        }
    }

    /// Acquire the gate at `now_ms`. Succeeds iff at least the window has
    /// elapsed since the last successful acquire; a rejected attempt leaves
    /// the gate untouched.
    pub fn try_acquire(&mut self, now_ms: u64) -> bool {
        match self.last_acquired_ms {
            Some(last) if now_ms.saturating_sub(last) < self.window_ms => false,
            _ => {
                self.last_acquired_ms = Some(now_ms);
                true
            }
        }
    }
}
