//! Stack growth for the evaluator's native recursion points.
//!
//! Eager calls are walked on an explicit work-stack, but deferred builtins
//! (`?`, `while`, `$`, `try`, ...) and closure bodies re-enter `eval` from
//! native code. A script such as a deeply recursive closure would otherwise
//! be bounded by the thread's stack rather than by the configured call depth.
//!
//! On native targets the stack is grown on demand with `stacker`; on WASM the
//! closure is simply called.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if the remaining space is inside the red zone.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mimics a deferred builtin re-entering evaluation for a nested child.
    fn nested_depth(depth: u32) -> Result<u32, String> {
        ensure_sufficient_stack(|| {
            if depth == 0 {
                Ok(0)
            } else {
                let inner = nested_depth(depth - 1)?;
                Ok(inner + 1)
            }
        })
    }

    #[test]
    fn test_shallow_nesting() {
        assert_eq!(nested_depth(16), Ok(16));
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        assert_eq!(nested_depth(200_000), Ok(200_000));
    }

    #[test]
    fn test_error_passes_through() {
        let result: Result<(), String> = ensure_sufficient_stack(|| Err("interrupted".to_owned()));
        assert_eq!(result, Err("interrupted".to_owned()));
    }
}
