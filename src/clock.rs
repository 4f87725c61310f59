//! # Clock Pacer
//!
//! Throttles instruction execution to a nominal clock frequency using the
//! host's monotonic clock. The pacer tracks how many cycles have been
//! accounted since its origin timestamp; [`ClockPacer::wait_next_cycle`]
//! sleeps whenever emulation runs ahead of the schedule
//! `origin + cycle_count / frequency` and returns immediately when behind.
//!
//! The pacer carries no lock of its own: it is owned by the CPU, and hosts
//! serialize CPU access (step, reset, frequency changes) behind one coarse
//! mutex.

use crate::EmulatorError;
use std::time::{Duration, Instant};

/// Wall-clock pacing state for the emulated CPU clock.
///
/// # Examples
///
/// ```
/// use mos6502_emu::ClockPacer;
///
/// // Pace at 4 MHz; a single tick sleeps well under a millisecond.
/// let mut clock = ClockPacer::new(4_000_000.0).unwrap();
/// clock.wait_next_cycle();
/// assert_eq!(clock.cycle_count(), 1);
/// ```
pub struct ClockPacer {
    frequency: f64,
    cycle_duration: Duration,
    cycle_count: u64,
    origin: Instant,
}

impl ClockPacer {
    /// NTSC Apple I clock rate.
    pub const APPLE_I_HZ: f64 = 1_022_727.0;

    /// NTSC Atari 2600 clock rate.
    pub const ATARI_2600_HZ: f64 = 1_193_182.0;

    /// PAL Commodore 64 clock rate.
    pub const COMMODORE_64_HZ: f64 = 985_248.0;

    /// Default nominal frequency (1 MHz).
    pub const DEFAULT_HZ: f64 = 1_000_000.0;

    /// When emulation falls this far behind the nominal schedule, the
    /// timeline is rebased instead of racing to catch up.
    const CATCH_UP_LIMIT: Duration = Duration::from_millis(100);

    /// Creates a pacer for the given nominal frequency.
    ///
    /// Returns [`EmulatorError::InvalidArgument`] unless `frequency` is a
    /// finite value greater than zero.
    pub fn new(frequency: f64) -> Result<Self, EmulatorError> {
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(EmulatorError::InvalidArgument(
                "clock frequency must be positive",
            ));
        }

        Ok(Self {
            frequency,
            cycle_duration: Duration::from_secs_f64(1.0 / frequency),
            cycle_count: 0,
            origin: Instant::now(),
        })
    }

    /// Changes the nominal frequency.
    ///
    /// The pacing timeline restarts from now: the cycle counter is zeroed
    /// and the origin rebased, so no sleep debt or credit carries across
    /// the change.
    pub fn set_frequency(&mut self, frequency: f64) -> Result<(), EmulatorError> {
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(EmulatorError::InvalidArgument(
                "clock frequency must be positive",
            ));
        }

        self.frequency = frequency;
        self.cycle_duration = Duration::from_secs_f64(1.0 / frequency);
        self.reset();
        Ok(())
    }

    /// Restarts the pacing timeline from the current instant.
    pub fn reset(&mut self) {
        self.cycle_count = 0;
        self.origin = Instant::now();
    }

    /// Accounts `n` cycles without sleeping.
    ///
    /// Used by multi-cycle instructions; the accounted cycles fold into the
    /// target of the next [`ClockPacer::wait_next_cycle`] call.
    pub fn advance(&mut self, n: u64) {
        self.cycle_count += n;
    }

    /// Accounts one cycle and sleeps until the nominal schedule catches up.
    ///
    /// If emulation is behind schedule this returns immediately; behind by
    /// more than 100 ms, the timeline is rebased so the deficit is written
    /// off rather than burst through.
    pub fn wait_next_cycle(&mut self) {
        self.cycle_count += 1;

        let target = self.origin + Duration::from_secs_f64(self.cycle_count as f64 / self.frequency);
        let now = Instant::now();

        if target > now {
            std::thread::sleep(target - now);
        } else if now - target > Self::CATCH_UP_LIMIT {
            self.reset();
        }
    }

    /// Cycles accounted since the last reset or frequency change.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// The nominal frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Duration of one nominal cycle.
    pub fn cycle_duration(&self) -> Duration {
        self.cycle_duration
    }
}

impl Default for ClockPacer {
    /// A pacer at [`ClockPacer::DEFAULT_HZ`].
    fn default() -> Self {
        Self {
            frequency: Self::DEFAULT_HZ,
            cycle_duration: Duration::from_secs_f64(1.0 / Self::DEFAULT_HZ),
            cycle_count: 0,
            origin: Instant::now(),
        }
    }
}
