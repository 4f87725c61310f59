//! # CPU Control Block
//!
//! The shared state through which host threads steer the emulation thread:
//! pending-interrupt latches, the pause flag with its condition variable,
//! and the shutdown flag. The CPU holds this in an `Arc` and hands out
//! clones, so injection and pause requests work from any thread while the
//! emulation thread owns the register file.
//!
//! Interrupts are modeled as latches, not edge counts: two injections of
//! the same kind without an intervening step coalesce into one. An
//! injection that completes before a step begins is observed by that step.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard};

/// Which interrupt line a step should service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// Non-maskable interrupt, vector at `0xFFFA`.
    Nmi,
    /// Maskable interrupt request, vector at `0xFFFE`.
    Irq,
}

#[derive(Default)]
struct Latches {
    irq: bool,
    nmi: bool,
}

/// Thread-safe latches and pause/shutdown flags for one CPU.
///
/// # Examples
///
/// ```
/// use mos6502_emu::{CpuControl, Interrupt};
///
/// let control = CpuControl::new();
/// control.inject_nmi();
/// control.inject_irq();
///
/// // NMI wins; IRQ stays latched for a later step.
/// assert_eq!(control.take_interrupt(false), Some(Interrupt::Nmi));
/// assert_eq!(control.take_interrupt(false), Some(Interrupt::Irq));
/// assert_eq!(control.take_interrupt(false), None);
/// ```
pub struct CpuControl {
    latches: Mutex<Latches>,
    paused: Mutex<bool>,
    resumed: Condvar,
    exit: AtomicBool,
}

impl CpuControl {
    pub fn new() -> Self {
        Self {
            latches: Mutex::new(Latches::default()),
            paused: Mutex::new(false),
            resumed: Condvar::new(),
            exit: AtomicBool::new(false),
        }
    }

    fn lock_latches(&self) -> MutexGuard<'_, Latches> {
        self.latches.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_paused(&self) -> MutexGuard<'_, bool> {
        self.paused.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Latches a maskable interrupt request.
    pub fn inject_irq(&self) {
        self.lock_latches().irq = true;
    }

    /// Latches a non-maskable interrupt.
    pub fn inject_nmi(&self) {
        self.lock_latches().nmi = true;
    }

    /// Samples and clears the highest-priority serviceable latch.
    ///
    /// NMI is serviced ahead of IRQ; an IRQ is only taken when
    /// `irq_masked` is `false` (the I flag is clear). Only the latch being
    /// serviced is cleared, so a pending IRQ survives an NMI and is
    /// observed on a later step.
    pub fn take_interrupt(&self, irq_masked: bool) -> Option<Interrupt> {
        let mut latches = self.lock_latches();

        if latches.nmi {
            latches.nmi = false;
            Some(Interrupt::Nmi)
        } else if latches.irq && !irq_masked {
            latches.irq = false;
            Some(Interrupt::Irq)
        } else {
            None
        }
    }

    /// Clears both latches (used by CPU reset).
    pub fn clear_interrupts(&self) {
        let mut latches = self.lock_latches();
        latches.irq = false;
        latches.nmi = false;
    }

    /// Requests that the emulation thread stop before its next step.
    pub fn pause(&self) {
        *self.lock_paused() = true;
    }

    /// Clears the pause flag and wakes the emulation thread.
    pub fn resume(&self) {
        *self.lock_paused() = false;
        self.resumed.notify_all();
    }

    /// Returns `true` while the pause flag is set.
    pub fn is_paused(&self) -> bool {
        *self.lock_paused()
    }

    /// Blocks the calling thread while the pause flag is set.
    ///
    /// Returns immediately once shutdown has been requested so a paused
    /// emulator can still be torn down.
    pub fn wait_while_paused(&self) {
        let mut paused = self.lock_paused();
        while *paused && !self.exit_requested() {
            paused = self
                .resumed
                .wait(paused)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// Signals every long-running thread to wind down.
    pub fn request_exit(&self) {
        self.exit.store(true, Ordering::SeqCst);
        // Wake the emulation thread if it is parked on the pause condvar.
        // Taking the pause lock first closes the window where a waiter has
        // checked the exit flag but not yet started waiting.
        let _paused = self.lock_paused();
        self.resumed.notify_all();
    }

    /// Returns `true` once shutdown has been requested.
    pub fn exit_requested(&self) -> bool {
        self.exit.load(Ordering::SeqCst)
    }
}

impl Default for CpuControl {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_injections_coalesce() {
        let control = CpuControl::new();

        control.inject_irq();
        control.inject_irq();

        assert_eq!(control.take_interrupt(false), Some(Interrupt::Irq));
        assert_eq!(control.take_interrupt(false), None);
    }

    #[test]
    fn test_irq_respects_mask() {
        let control = CpuControl::new();

        control.inject_irq();
        assert_eq!(control.take_interrupt(true), None);

        // Still latched once the mask drops.
        assert_eq!(control.take_interrupt(false), Some(Interrupt::Irq));
    }

    #[test]
    fn test_nmi_ignores_mask_and_outranks_irq() {
        let control = CpuControl::new();

        control.inject_irq();
        control.inject_nmi();

        assert_eq!(control.take_interrupt(true), Some(Interrupt::Nmi));
        assert_eq!(control.take_interrupt(true), None);
        assert_eq!(control.take_interrupt(false), Some(Interrupt::Irq));
    }

    #[test]
    fn test_clear_interrupts() {
        let control = CpuControl::new();

        control.inject_irq();
        control.inject_nmi();
        control.clear_interrupts();

        assert_eq!(control.take_interrupt(false), None);
    }

    #[test]
    fn test_resume_wakes_paused_thread() {
        let control = Arc::new(CpuControl::new());
        control.pause();

        let waiter = {
            let control = Arc::clone(&control);
            std::thread::spawn(move || control.wait_while_paused())
        };

        // Give the waiter time to park, then release it.
        std::thread::sleep(Duration::from_millis(20));
        control.resume();

        waiter.join().unwrap();
        assert!(!control.is_paused());
    }

    #[test]
    fn test_exit_unblocks_paused_thread() {
        let control = Arc::new(CpuControl::new());
        control.pause();

        let waiter = {
            let control = Arc::clone(&control);
            std::thread::spawn(move || control.wait_while_paused())
        };

        std::thread::sleep(Duration::from_millis(20));
        control.request_exit();

        waiter.join().unwrap();
        assert!(control.exit_requested());
    }
}
