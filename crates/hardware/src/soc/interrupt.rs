//! Interrupt delivery between device threads and the CPU.
//!
//! Devices run on their own host threads and must never touch simulator state
//! directly. This module provides the only channel between them:
//! 1. **Lines:** Cloneable sending endpoints handed to devices.
//! 2. **Controller:** The CPU-side receiver, which orders pending interrupts by priority.
//! 3. **Handshake:** A raised interrupt carries a single-slot completion token; the
//!    raising thread blocks until the kernel acknowledges (or drops) the interrupt.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};

use thiserror::Error;

/// Errors raised by interrupt lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InterruptError {
    /// The controller that owned the receiving end has been dropped.
    #[error("interrupt controller disconnected")]
    Disconnected,
}

/// Hardware that can raise an interrupt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InterruptSource {
    /// The periodic scheduling timer.
    Timer,
    /// An I/O device, identified by number.
    Device(u8),
}

/// One pending interrupt.
///
/// Dropping an interrupt acknowledges it, so a raiser is never left blocked
/// on an interrupt that nobody will service.
#[derive(Debug)]
pub struct Interrupt {
    source: InterruptSource,
    priority: u8,
    seq: u64,
    ack: Option<SyncSender<()>>,
}

impl Interrupt {
    /// Returns the hardware that raised this interrupt.
    pub const fn source(&self) -> InterruptSource {
        self.source
    }

    /// Returns the priority; lower values are serviced first.
    pub const fn priority(&self) -> u8 {
        self.priority
    }

    /// Consumes the interrupt and releases the raising thread.
    pub fn acknowledge(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(ack) = self.ack.take() {
            // The raiser may have given up already.
            let _ = ack.send(());
        }
    }
}

impl Drop for Interrupt {
    fn drop(&mut self) {
        self.release();
    }
}

impl PartialEq for Interrupt {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for Interrupt {}

impl PartialOrd for Interrupt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Interrupt {
    /// `BinaryHeap` is a max-heap: the lowest priority value, then the earliest
    /// raised, compares greatest.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Sending endpoint for one interrupt source.
#[derive(Clone, Debug)]
pub struct InterruptLine {
    source: InterruptSource,
    priority: u8,
    tx: Sender<Interrupt>,
    seq: Arc<AtomicU64>,
}

impl InterruptLine {
    /// Returns the source this line raises interrupts for.
    pub const fn source(&self) -> InterruptSource {
        self.source
    }

    fn make(&self, ack: Option<SyncSender<()>>) -> Interrupt {
        Interrupt {
            source: self.source,
            priority: self.priority,
            seq: self.seq.fetch_add(1, AtomicOrdering::Relaxed),
            ack,
        }
    }

    /// Raises an interrupt and blocks until it is acknowledged.
    ///
    /// # Returns
    ///
    /// `Ok(())` once the kernel acknowledges, or [`InterruptError::Disconnected`]
    /// if the controller is gone.
    pub fn raise(&self) -> Result<(), InterruptError> {
        let (ack_tx, ack_rx) = mpsc::sync_channel(1);
        self.tx
            .send(self.make(Some(ack_tx)))
            .map_err(|_| InterruptError::Disconnected)?;
        ack_rx.recv().map_err(|_| InterruptError::Disconnected)
    }

    /// Posts an interrupt without waiting for acknowledgement.
    pub fn post(&self) -> Result<(), InterruptError> {
        self.tx
            .send(self.make(None))
            .map_err(|_| InterruptError::Disconnected)
    }
}

/// CPU-side receiver of all interrupt lines.
#[derive(Debug)]
pub struct InterruptController {
    tx: Sender<Interrupt>,
    rx: Receiver<Interrupt>,
    pending: BinaryHeap<Interrupt>,
    seq: Arc<AtomicU64>,
}

impl InterruptController {
    /// Creates a controller with no pending interrupts.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            pending: BinaryHeap::new(),
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Creates a line for `source`.
    ///
    /// # Arguments
    ///
    /// * `source` - The hardware that will raise through this line.
    /// * `priority` - Service priority; lower values are serviced first.
    pub fn line(&self, source: InterruptSource, priority: u8) -> InterruptLine {
        InterruptLine {
            source,
            priority,
            tx: self.tx.clone(),
            seq: Arc::clone(&self.seq),
        }
    }

    /// Returns the most urgent pending interrupt, if any.
    ///
    /// Everything raised since the last poll is collected first, so an urgent
    /// interrupt raised later still overtakes a less urgent one.
    pub fn poll(&mut self) -> Option<Interrupt> {
        while let Ok(irq) = self.rx.try_recv() {
            self.pending.push(irq);
        }
        self.pending.pop()
    }

    /// Returns the number of interrupts collected but not yet polled.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Default for InterruptController {
    fn default() -> Self {
        Self::new()
    }
}
