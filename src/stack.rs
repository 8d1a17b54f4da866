//! Stack growth for the evaluator's recursion.
//!
//! Every Lox call nests several Rust frames, so deep user recursion would
//! exhaust a fixed thread stack long before the configured call-depth limit.
//! [`ensure_sufficient_stack`] grows the stack on the heap when little of it
//! is left.

/// Grow when less than this remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 2 * 1024 * 1024;

/// Runs `f`, first switching to a fresh stack segment if the current one is
/// nearly exhausted.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
