//! Periodic scheduling timer.
//!
//! The timer runs on its own named host thread and raises a timer interrupt
//! every period. Each raise blocks until the kernel acknowledges it, so a slow
//! simulation never accumulates a backlog of ticks.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::soc::interrupt::InterruptLine;

/// Handle to a running timer thread.
#[derive(Debug)]
pub struct Timer {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Timer {
    /// Starts a timer thread.
    ///
    /// # Arguments
    ///
    /// * `line` - Interrupt line the timer raises through.
    /// * `period` - Time between interrupts.
    ///
    /// # Returns
    ///
    /// The running timer, or the host error if the thread could not be spawned.
    pub fn start(line: InterruptLine, period: Duration) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("timer".into())
            .spawn(move || {
                while !flag.load(Ordering::Acquire) {
                    thread::sleep(period);
                    if flag.load(Ordering::Acquire) || line.raise().is_err() {
                        break;
                    }
                }
                tracing::debug!("timer thread exiting");
            })?;
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Returns `true` while the timer thread is alive.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Asks the timer thread to exit.
    ///
    /// The thread notices at its next period boundary, or as soon as its
    /// in-flight interrupt is acknowledged or the controller is dropped.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take_if(|h| h.is_finished()) {
            let _ = handle.join();
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.stop();
    }
}
