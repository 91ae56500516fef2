//! Interrupt-to-worker signal.
//!
//! The device interrupt must not touch the bus. The handler only calls
//! [`IrqSignal::signal`]; the worker later calls
//! [`Ssed::run_pending`](crate::Ssed::run_pending), which consumes the token
//! and services the device from task context.
//!
//! Edges coalesce: while a run is pending, further edges add nothing. The
//! worker always reads the live status register, so a coalesced edge loses
//! no events.

use super::primitives::CriticalSectionCell;
#[cfg(feature = "async")]
use super::primitives::AtomicWaker;

/// Single-slot, coalescing work token from interrupt to worker
///
/// # Example
///
/// ```ignore
/// static SSED_IRQ: IrqSignal = IrqSignal::new();
///
/// #[interrupt]
/// fn GPIO() {
///     SSED_IRQ.signal();
/// }
///
/// loop {
///     ssed.run_pending(&SSED_IRQ, &mut net)?;
/// }
/// ```
pub struct IrqSignal {
    pending: CriticalSectionCell<bool>,
    #[cfg(feature = "async")]
    waker: AtomicWaker,
}

impl IrqSignal {
    /// Create an idle signal (const, suitable for static initialization)
    pub const fn new() -> Self {
        Self {
            pending: CriticalSectionCell::new(false),
            #[cfg(feature = "async")]
            waker: AtomicWaker::new(),
        }
    }

    /// Queue a worker run; safe to call from interrupt context
    ///
    /// Returns `true` if a new run was queued, `false` if one was already
    /// pending.
    #[inline]
    pub fn signal(&self) -> bool {
        let queued = !self.pending.replace(true);
        #[cfg(feature = "async")]
        if queued {
            self.waker.wake();
        }
        queued
    }

    /// Consume the pending run, if any
    ///
    /// An edge arriving after this call queues exactly one further run.
    #[inline]
    pub fn take(&self) -> bool {
        self.pending.replace(false)
    }

    /// Whether a run is queued and not yet started
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Wait until a run is queued, then consume it
    #[cfg(feature = "async")]
    pub async fn wait(&self) {
        core::future::poll_fn(|cx| {
            if self.take() {
                return core::task::Poll::Ready(());
            }
            self.waker.register(cx.waker());
            // An edge may have landed between the check and the registration.
            if self.take() {
                core::task::Poll::Ready(())
            } else {
                core::task::Poll::Pending
            }
        })
        .await;
    }
}

impl Default for IrqSignal {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
