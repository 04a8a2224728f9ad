//! Stack growth for the recursive parser, evaluator and executor.
//!
//! Nested blocks, nested parentheses and recursive `call`s all recurse on the
//! host stack.  Wrapping each recursive step in [`ensure_sufficient_stack`]
//! moves execution onto a fresh heap-allocated segment whenever the remaining
//! stack drops below the red zone, so the language-level limits
//! (`max_call_depth`, the parser's nesting limit) are what stop a runaway
//! program rather than the host's stack size.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first switching to a new stack segment if the current one is
/// nearly exhausted.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
