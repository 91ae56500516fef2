//! Synchronization primitives for ISR-safe access.
//!
//! Low-level building blocks used by [`IrqSignal`](super::IrqSignal).

use core::cell::RefCell;
#[cfg(feature = "async")]
use core::task::Waker;
use critical_section::Mutex;

/// Value shared between the interrupt handler and the worker.
///
/// Every access runs inside `critical_section::with`, so the ISR can never
/// observe a half-finished update made from task context.
pub struct CriticalSectionCell<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> CriticalSectionCell<T> {
    /// Create a new cell (const, suitable for static initialization).
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Run `f` on the value inside a critical section.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            let mut value = self.inner.borrow_ref_mut(cs);
            f(&mut value)
        })
    }
}

impl<T: Copy> CriticalSectionCell<T> {
    /// Copy the current value out.
    #[inline]
    pub fn get(&self) -> T {
        critical_section::with(|cs| *self.inner.borrow_ref(cs))
    }

    /// Store a value, returning the previous one.
    #[inline]
    pub fn replace(&self, value: T) -> T {
        critical_section::with(|cs| self.inner.borrow(cs).replace(value))
    }
}

// SAFETY: every access runs inside a critical section, so at most one context
// touches the value at a time. `T: Send` because that context may be an ISR.
unsafe impl<T: Send> Sync for CriticalSectionCell<T> {}

/// Interrupt-safe waker slot for an async worker task.
///
/// The worker registers its waker while waiting; the interrupt handler wakes it.
#[cfg(feature = "async")]
pub struct AtomicWaker {
    waker: CriticalSectionCell<Option<Waker>>,
}

#[cfg(feature = "async")]
impl AtomicWaker {
    /// Create an empty slot (const, suitable for static initialization).
    pub const fn new() -> Self {
        Self {
            waker: CriticalSectionCell::new(None),
        }
    }

    /// Register a waker to be woken later.
    pub fn register(&self, waker: &Waker) {
        self.waker.with(|slot| {
            if !slot.as_ref().is_some_and(|w| w.will_wake(waker)) {
                *slot = Some(waker.clone());
            }
        });
    }

    /// Wake and clear the registered waker, if any.
    #[inline]
    pub fn wake(&self) {
        if let Some(w) = self.waker.with(Option::take) {
            w.wake();
        }
    }

    /// Check if a waker is currently registered.
    pub fn is_registered(&self) -> bool {
        self.waker.with(|slot| slot.is_some())
    }
}

#[cfg(feature = "async")]
impl Default for AtomicWaker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sync<T: Sync>() {}

    #[test]
    fn cell_is_sync_for_send_values() {
        assert_sync::<CriticalSectionCell<bool>>();
        assert_sync::<CriticalSectionCell<Option<core::task::Waker>>>();
    }

    #[test]
    fn cell_with_mutates() {
        let cell = CriticalSectionCell::new(0u32);
        cell.with(|v| *v += 10);
        assert_eq!(cell.with(|v| *v), 10);
    }

    #[test]
    fn cell_get_and_replace() {
        let cell = CriticalSectionCell::new(false);
        assert!(!cell.replace(true));
        assert!(cell.get());
        assert!(cell.replace(false));
        assert!(!cell.get());
    }

    #[test]
    fn cell_static_usage() {
        static CELL: CriticalSectionCell<u8> = CriticalSectionCell::new(0);
        CELL.with(|v| *v = 7);
        assert_eq!(CELL.get(), 7);
    }

    #[cfg(feature = "async")]
    #[test]
    fn waker_register_then_wake_clears() {
        let slot = AtomicWaker::new();
        assert!(!slot.is_registered());

        slot.register(Waker::noop());
        assert!(slot.is_registered());

        slot.wake();
        assert!(!slot.is_registered());
    }

    #[cfg(feature = "async")]
    #[test]
    fn waker_wake_without_registration_is_noop() {
        let slot = AtomicWaker::default();
        slot.wake();
        assert!(!slot.is_registered());
    }
}
