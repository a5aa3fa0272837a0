//! Blocking Bridge
//!
//! Drives the async cache operations for the synchronous API variants.
//!
//! - no runtime on this thread: run on a private multi-thread runtime
//! - inside a multi-thread runtime: `block_in_place` on the current handle
//! - inside a current-thread runtime: hand the future to the private runtime
//!   from a scoped thread so the caller's scheduler is never re-entered

use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime, RuntimeFlavor};

use crate::error::{CacheError, Result};

static BLOCKING_RUNTIME: OnceLock<Runtime> = OnceLock::new();

fn blocking_runtime() -> Result<&'static Runtime> {
    if let Some(runtime) = BLOCKING_RUNTIME.get() {
        return Ok(runtime);
    }

    let runtime = Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("explorer-cache-blocking")
        .enable_all()
        .build()
        .map_err(|e| CacheError::Internal(format!("failed to build blocking runtime: {}", e)))?;

    // A racing builder may have won; ours is dropped outside any async context
    Ok(BLOCKING_RUNTIME.get_or_init(|| runtime))
}

/// Runs `future` to completion from synchronous code.
pub fn block_on<F>(future: F) -> Result<F::Output>
where
    F: Future + Send,
    F::Output: Send,
{
    match Handle::try_current() {
        Err(_) => Ok(blocking_runtime()?.block_on(future)),
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::CurrentThread => {
            std::thread::scope(|scope| {
                scope
                    .spawn(|| blocking_runtime().map(|runtime| runtime.block_on(future)))
                    .join()
                    .map_err(|_| CacheError::Internal("blocking cache call panicked".to_string()))
                    .and_then(|result| result)
            })
        }
        Ok(handle) => Ok(tokio::task::block_in_place(|| handle.block_on(future))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_runtime() {
        assert_eq!(block_on(async { 40 + 2 }).unwrap(), 42);
    }

    #[tokio::test]
    async fn test_inside_current_thread_runtime() {
        assert_eq!(block_on(async { "done" }).unwrap(), "done");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_inside_multi_thread_runtime() {
        let value = block_on(async {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            7
        })
        .unwrap();
        assert_eq!(value, 7);
    }
}
