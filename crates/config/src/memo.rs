//! Compute-once value holder.
//!
//! `Memo<T>` caches the first successful result of a fallible computation.
//! A failed computation is not cached, so the next call retries it. `reset()`
//! drops the cached value and forces the next access to recompute.

use once_cell::unsync::OnceCell;

#[derive(Debug, Clone)]
pub struct Memo<T> {
    cell: OnceCell<T>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Returns the cached value, computing it with `init` on first access.
    pub fn get_or_try_init<E, F>(&self, init: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.cell.get_or_try_init(init)
    }

    /// Returns the cached value without computing it.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Drops the cached value.
    pub fn reset(&mut self) {
        self.cell.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_computes_once() {
        let calls = Cell::new(0);
        let memo: Memo<u32> = Memo::new();

        for _ in 0..3 {
            let value = memo
                .get_or_try_init(|| {
                    calls.set(calls.get() + 1);
                    Ok::<_, ()>(42)
                })
                .unwrap();
            assert_eq!(*value, 42);
        }

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_failure_is_not_cached() {
        let memo: Memo<u32> = Memo::new();

        let first = memo.get_or_try_init(|| Err("boom"));
        assert_eq!(first, Err("boom"));
        assert!(!memo.is_computed());

        let second = memo.get_or_try_init(|| Ok::<_, &str>(7));
        assert_eq!(second, Ok(&7));
    }

    #[test]
    fn test_reset_forces_recompute() {
        let mut memo: Memo<&str> = Memo::new();
        memo.get_or_try_init(|| Ok::<_, ()>("first")).unwrap();
        assert_eq!(memo.get(), Some(&"first"));

        memo.reset();
        assert!(memo.get().is_none());

        let value = memo.get_or_try_init(|| Ok::<_, ()>("second")).unwrap();
        assert_eq!(*value, "second");
    }
}
