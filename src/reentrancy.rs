//! Debug-only detection of callbacks that re-enter a map.
//!
//! `HashMap` runs user `hash_code`/`equals` code while it walks a bucket.
//! Shared lookups may nest: a predicate that reads the same map through an
//! `Rc<RefCell<_>>` sees a consistent table. A predicate that reaches the map
//! while a `&mut self` operation is in flight (through a raw pointer) would
//! observe it mid-update. In debug builds that entry panics; in release
//! builds the check compiles away.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

/// Embedded in each map. Read paths open a guard with
/// `let _g = self.reentrancy.enter_shared();`, `&mut self` paths with
/// `enter_exclusive()`.
#[derive(Debug)]
pub(crate) struct ReentrancyCheck {
    #[cfg(debug_assertions)]
    readers: Cell<u32>,
    #[cfg(debug_assertions)]
    writing: Cell<bool>,
    _nosend: PhantomData<*mut ()>,
}

#[cfg(debug_assertions)]
#[derive(Copy, Clone, Debug)]
enum Mode {
    Shared,
    Exclusive,
}

impl ReentrancyCheck {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            readers: Cell::new(0),
            #[cfg(debug_assertions)]
            writing: Cell::new(false),
            _nosend: PhantomData,
        }
    }

    /// Any number of shared entries may be open at once, but none while an
    /// exclusive one is.
    #[inline]
    pub(crate) fn enter_shared(&self) -> ProbeGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.writing.get(),
                "HashMap read from a hash_code/equals callback during a mutation"
            );
            self.readers.set(self.readers.get() + 1);
            ProbeGuard {
                owner: self,
                mode: Mode::Shared,
            }
        }

        #[cfg(not(debug_assertions))]
        {
            ProbeGuard { _z: PhantomData }
        }
    }

    /// Exclusive entries admit nothing else, nested or not.
    #[inline]
    pub(crate) fn enter_exclusive(&self) -> ProbeGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.writing.get() && self.readers.get() == 0,
                "HashMap re-entered from a hash_code/equals callback during a mutation"
            );
            self.writing.set(true);
            ProbeGuard {
                owner: self,
                mode: Mode::Exclusive,
            }
        }

        #[cfg(not(debug_assertions))]
        {
            ProbeGuard { _z: PhantomData }
        }
    }
}

impl Default for ReentrancyCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// Clearing happens on drop, so a panic inside a predicate does not leave
/// the map locked.
pub(crate) struct ProbeGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a ReentrancyCheck,
    #[cfg(debug_assertions)]
    mode: Mode,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            match self.mode {
                Mode::Shared => {
                    let n = self.owner.readers.get();
                    debug_assert!(n > 0);
                    self.owner.readers.set(n - 1);
                }
                Mode::Exclusive => {
                    debug_assert!(self.owner.writing.get());
                    self.owner.writing.set(false);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ReentrancyCheck;

    #[test]
    fn sequential_entries_are_allowed() {
        let r = ReentrancyCheck::new();
        {
            let _g = r.enter_exclusive();
        }
        {
            let _g = r.enter_shared();
        }
        let _g = r.enter_exclusive();
    }

    #[test]
    fn nested_shared_entries_are_allowed() {
        let r = ReentrancyCheck::new();
        let _outer = r.enter_shared();
        let _inner = r.enter_shared();
        drop(_inner);
        drop(_outer);
        let _g = r.enter_exclusive();
    }

    #[cfg(debug_assertions)]
    #[test]
    fn shared_entry_during_exclusive_panics_in_debug() {
        let r = ReentrancyCheck::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _outer = r.enter_exclusive();
            let _inner = r.enter_shared();
        }));
        assert!(res.is_err(), "expected a read during a mutation to panic");
        // the outer guard was released while unwinding
        let _g = r.enter_exclusive();
    }

    #[cfg(debug_assertions)]
    #[test]
    fn nested_exclusive_entry_panics_in_debug() {
        let r = ReentrancyCheck::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _outer = r.enter_exclusive();
            let _inner = r.enter_exclusive();
        }));
        assert!(res.is_err(), "expected nested mutation to panic");
        let _g = r.enter_shared();
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn nested_entry_is_free_in_release() {
        let r = ReentrancyCheck::new();
        let _outer = r.enter_exclusive();
        let _inner = r.enter_shared();
    }
}
