use std::sync::{Mutex, MutexGuard};

use tracing::warn;

/// Locks shared client state owned by `component`. A poisoned lock is
/// recovered and its poison flag cleared.
pub(crate) fn mutex_lock<'a, T>(
    lock: &'a Mutex<T>,
    component: &'static str,
    op: &'static str,
) -> MutexGuard<'a, T> {
    lock.lock().unwrap_or_else(|poisoned| {
        warn!(component, op, "client state lock poisoned; continuing with last written value");
        lock.clear_poison();
        poisoned.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn poisoned_state_stays_usable() {
        let state = Arc::new(Mutex::new(vec![1]));
        let writer = Arc::clone(&state);
        let result = thread::spawn(move || {
            let mut guard = writer.lock().expect("fresh lock");
            guard.push(2);
            panic!("writer died");
        })
        .join();
        assert!(result.is_err());
        assert!(state.is_poisoned());

        mutex_lock(&state, "test", "read").push(3);
        assert!(!state.is_poisoned());
        assert_eq!(*mutex_lock(&state, "test", "read"), [1, 2, 3]);
    }
}
