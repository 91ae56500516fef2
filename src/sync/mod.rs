//! Synchronization and Concurrency Support
//!
//! This module provides the primitives that connect the device interrupt to
//! the worker that services it:
//!
//! - **Primitives** (`primitives`): Low-level synchronization types
//!   - [`CriticalSectionCell`] - ISR-safe interior mutability
//!   - `AtomicWaker` - Async waker storage for interrupts (feature `async`)
//!
//! - **Signal** (`signal`): Interrupt-to-worker dispatch
//!   - [`IrqSignal`] - Coalescing single-slot work token
//!
//! The bus lock itself is a `spin::Mutex` inside [`Ssed`](crate::Ssed) and is
//! never taken from interrupt context.
//!
//! # Feature Flags
//!
//! - `async`: Enables `AtomicWaker` and `IrqSignal::wait`
//!
//! # Example
//!
//! ```ignore
//! use ph_ssed::sync::IrqSignal;
//!
//! static SSED_IRQ: IrqSignal = IrqSignal::new();
//!
//! #[interrupt]
//! fn GPIO() {
//!     SSED_IRQ.signal();
//! }
//!
//! #[embassy_executor::task]
//! async fn ssed_worker(ssed: &'static Ssed<Spi, Delay>, mut net: Net) {
//!     loop {
//!         SSED_IRQ.wait().await;
//!         let _ = ssed.service_interrupt(&mut net);
//!     }
//! }
//! ```

mod primitives;
mod signal;

#[cfg(feature = "async")]
pub use primitives::AtomicWaker;
pub use primitives::CriticalSectionCell;
pub use signal::IrqSignal;
