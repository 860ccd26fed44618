//! Monotonic time source

/// Millisecond clock
///
/// Must be monotonic. Counts from an arbitrary origin (usually boot).
pub trait Clock {
    /// Milliseconds elapsed since the clock's origin
    fn now_ms(&self) -> u64;
}
