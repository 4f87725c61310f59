//! Monitored RAM: the default full-address-space memory device.
//!
//! Behaves like 64 KiB of plain RAM, except that writes to three
//! designated addresses additionally feed the host-facing output queue.
//! Guest test ROMs use these hooks to print characters and report
//! pass/fail status without any I/O hardware of their own.
//!
//! Reads never have side effects.

use super::Device;
use crate::queue::ByteQueue;
use std::sync::Arc;

/// Writes here emit the written byte on the output queue as a raw
/// character.
pub const CHAR_OUTPUT_ADDR: u16 = 0x6000;

/// Writes here report the primary test status: `0x00` is a pass, anything
/// else a failure.
pub const TEST_STATUS_ADDR: u16 = 0x6001;

/// Writes here report a secondary test status with the failing code.
pub const ADDITIONAL_STATUS_ADDR: u16 = 0x6002;

const TEST_PASSED_MSG: &[u8] = b"6502 FUNCTIONAL TEST PASSED\r\n";
const TEST_FAILED_MSG: &[u8] = b"6502 FUNCTIONAL TEST FAILED\r\n";
const ADDITIONAL_PASSED_MSG: &[u8] = b"ADDITIONAL TEST PASSED\n";

/// 64 KiB RAM whose writes to the monitored addresses mirror into the
/// output queue.
///
/// The device stores every write in its backing array first, then
/// dispatches on the address, so the guest always reads back what it
/// wrote. The queue is shared with the CPU and the host output consumer
/// via `Arc`; when it is full the message bytes are dropped, since the
/// guest must not observe host backpressure.
///
/// # Examples
///
/// ```
/// use mos6502_emu::devices::monitored::CHAR_OUTPUT_ADDR;
/// use mos6502_emu::{ByteQueue, Device, MonitoredRam};
/// use std::sync::Arc;
///
/// let output = Arc::new(ByteQueue::new());
/// let mut ram = MonitoredRam::new(Arc::clone(&output));
///
/// ram.write(CHAR_OUTPUT_ADDR, b'A');
///
/// assert_eq!(ram.read(CHAR_OUTPUT_ADDR), b'A');
/// assert_eq!(output.dequeue(), Some(b'A'));
/// ```
pub struct MonitoredRam {
    data: Box<[u8; 0x10000]>,
    output: Arc<ByteQueue>,
}

impl MonitoredRam {
    /// Creates a zero-filled monitored RAM feeding `output`.
    pub fn new(output: Arc<ByteQueue>) -> Self {
        Self {
            data: Box::new([0; 0x10000]),
            output,
        }
    }

    /// Copies `bytes` into the backing store starting at `offset`, without
    /// triggering the write hooks.
    ///
    /// # Panics
    ///
    /// Panics if the slice does not fit below `0x10000`.
    pub fn load_bytes(&mut self, offset: u16, bytes: &[u8]) {
        let start = offset as usize;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
    }

    fn emit(&self, bytes: &[u8]) {
        for &byte in bytes {
            if self.output.enqueue(byte).is_err() {
                log::warn!("output queue full, dropping monitored-RAM message tail");
                return;
            }
        }
    }
}

impl Device for MonitoredRam {
    fn read(&self, offset: u16) -> u8 {
        self.data[offset as usize]
    }

    fn write(&mut self, offset: u16, value: u8) {
        self.data[offset as usize] = value;

        match offset {
            CHAR_OUTPUT_ADDR => self.emit(&[value]),
            TEST_STATUS_ADDR => {
                self.emit(if value == 0x00 {
                    TEST_PASSED_MSG
                } else {
                    TEST_FAILED_MSG
                });
            }
            ADDITIONAL_STATUS_ADDR => {
                if value == 0x00 {
                    self.emit(ADDITIONAL_PASSED_MSG);
                } else {
                    let message = format!("ADDITIONAL TEST FAILED: CODE 0x{:02X}\n", value);
                    self.emit(message.as_bytes());
                }
            }
            _ => {}
        }
    }
}
