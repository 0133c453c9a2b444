//! Stack growth for the recursive sub-routines.
//!
//! Inline, array and quoted sequencing recurse into each other. Depth is
//! already capped by the sequencer's `max_depth`, but a generous limit can
//! still exceed a small thread stack, so each recursive entry runs through
//! [`ensure_sufficient_stack`].
//!
//! - **Red zone**: 100KB. If less than this remains, the stack grows.
//! - **Growth size**: 1MB per growth.

/// Minimum stack space to keep available.
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing.
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
#[cfg(not(target_arch = "wasm32"))]
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack; run `f` directly.
#[cfg(target_arch = "wasm32")]
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
