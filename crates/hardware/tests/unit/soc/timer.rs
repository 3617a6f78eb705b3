//! Timer Tests.

use std::time::{Duration, Instant};

use mipsim_core::soc::devices::Timer;
use mipsim_core::soc::{InterruptController, InterruptSource};

#[test]
fn timer_raises_periodically_until_stopped() {
    let mut ctrl = InterruptController::new();
    let mut timer = Timer::start(ctrl.line(InterruptSource::Timer, 0), Duration::from_millis(1)).unwrap();
    assert!(timer.is_running());

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut ticks = 0;
    while ticks < 3 && Instant::now() < deadline {
        if let Some(irq) = ctrl.poll() {
            assert_eq!(irq.source(), InterruptSource::Timer);
            irq.acknowledge();
            ticks += 1;
        }
    }
    assert_eq!(ticks, 3);

    timer.stop();
    // Release a tick raised just before the stop request, then let the thread exit.
    let deadline = Instant::now() + Duration::from_secs(10);
    while timer.is_running() && Instant::now() < deadline {
        drop(ctrl.poll());
        std::thread::sleep(Duration::from_millis(1));
    }
    assert!(!timer.is_running());
}
