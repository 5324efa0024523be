//! Clock access for time-based nodes.

/// Millisecond clock read by time-based nodes ([`crate::Timeout`]).
///
/// The engine never consults wall-clock time directly. Contexts expose the
/// simulation's notion of "now", which keeps ticks deterministic and lets
/// tests drive time explicitly.
pub trait TickClock {
    /// Current simulation time in milliseconds.
    fn now_ms(&self) -> u64;
}
