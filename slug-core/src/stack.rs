//! Stack headroom for the recursive parser and evaluator.
//!
//! Deeply nested source (or deep recursion in a script) recurses the host
//! stack. Wrapping the recursive entry points keeps enough stack available so
//! that the interpreter's own call-depth limit is reached before a native
//! overflow.

/// Grow the stack when less than this remains.
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
