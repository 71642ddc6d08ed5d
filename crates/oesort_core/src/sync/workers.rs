//! # Worker Threads
//!
//! Named scoped threads whose spawn and join failures surface as
//! [`SortError::ExecutionFailure`] instead of panics.

use std::thread::{self, Scope, ScopedJoinHandle};

use crate::error::{SortError, SortResult};

/// Spawns a named worker inside `scope`.
///
/// # Errors
///
/// `ExecutionFailure` if the OS refuses the thread.
pub fn spawn<'scope, 'env, F, R>(
    scope: &'scope Scope<'scope, 'env>,
    name: String,
    body: F,
) -> SortResult<ScopedJoinHandle<'scope, R>>
where
    F: FnOnce() -> R + Send + 'scope,
    R: Send + 'scope,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn_scoped(scope, body)
        .map_err(|e| SortError::execution(format!("failed to spawn {name}: {e}")))
}

/// Joins every handle, collecting results in spawn order.
///
/// All handles are joined even after a failure so none outlives the call.
///
/// # Errors
///
/// `ExecutionFailure` if any worker panicked.
pub fn join_all<R>(handles: Vec<ScopedJoinHandle<'_, R>>) -> SortResult<Vec<R>> {
    let mut results = Vec::with_capacity(handles.len());
    let mut panicked = 0usize;
    for handle in handles {
        match handle.join() {
            Ok(r) => results.push(r),
            Err(_) => panicked += 1,
        }
    }
    if panicked > 0 {
        return Err(SortError::execution(format!("{panicked} worker(s) panicked")));
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_all_preserves_order() {
        let results = thread::scope(|s| {
            let handles = (0..4)
                .map(|i| spawn(s, format!("w{i}"), move || i * 10).unwrap())
                .collect();
            join_all(handles)
        })
        .unwrap();
        assert_eq!(results, vec![0, 10, 20, 30]);
    }

    #[test]
    fn test_join_all_reports_panics() {
        let result = thread::scope(|s| {
            let handles = vec![
                spawn(s, "ok".to_string(), || 1).unwrap(),
                spawn(s, "boom".to_string(), || -> i32 { panic!("boom") }).unwrap(),
            ];
            join_all(handles)
        });
        assert!(matches!(result, Err(SortError::ExecutionFailure { .. })));
    }
}
