//! Interrupt Delivery Tests.

use std::thread;

use mipsim_core::soc::interrupt::InterruptError;
use mipsim_core::soc::{InterruptController, InterruptSource};
use pretty_assertions::assert_eq;

#[test]
fn most_urgent_interrupt_is_served_first() {
    let mut ctrl = InterruptController::new();
    let disk = ctrl.line(InterruptSource::Device(1), 5);
    let timer = ctrl.line(InterruptSource::Timer, 0);

    disk.post().unwrap();
    timer.post().unwrap();
    disk.post().unwrap();

    let order: Vec<_> = std::iter::from_fn(|| ctrl.poll()).map(|irq| irq.source()).collect();
    assert_eq!(
        order,
        [InterruptSource::Timer, InterruptSource::Device(1), InterruptSource::Device(1)]
    );
    assert_eq!(ctrl.pending(), 0);
}

#[test]
fn equal_priority_is_first_come_first_served() {
    let mut ctrl = InterruptController::new();
    let a = ctrl.line(InterruptSource::Device(1), 3);
    let b = ctrl.line(InterruptSource::Device(2), 3);
    b.post().unwrap();
    a.post().unwrap();

    assert_eq!(ctrl.poll().unwrap().source(), InterruptSource::Device(2));
    assert_eq!(ctrl.poll().unwrap().source(), InterruptSource::Device(1));
    assert!(ctrl.poll().is_none());
}

#[test]
fn raise_blocks_until_acknowledged() {
    let mut ctrl = InterruptController::new();
    let line = ctrl.line(InterruptSource::Device(7), 1);
    let raiser = thread::spawn(move || line.raise());

    let irq = loop {
        if let Some(irq) = ctrl.poll() {
            break irq;
        }
        thread::yield_now();
    };
    assert_eq!(irq.priority(), 1);
    assert!(!raiser.is_finished());
    irq.acknowledge();
    assert_eq!(raiser.join().unwrap(), Ok(()));
}

#[test]
fn dropping_an_interrupt_releases_the_raiser() {
    let mut ctrl = InterruptController::new();
    let line = ctrl.line(InterruptSource::Timer, 0);
    let raiser = thread::spawn(move || line.raise());

    let irq = loop {
        if let Some(irq) = ctrl.poll() {
            break irq;
        }
        thread::yield_now();
    };
    drop(irq);
    assert_eq!(raiser.join().unwrap(), Ok(()));
}

#[test]
fn lines_outliving_the_controller_report_disconnection() {
    let ctrl = InterruptController::new();
    let line = ctrl.line(InterruptSource::Timer, 0);
    drop(ctrl);
    assert_eq!(line.post(), Err(InterruptError::Disconnected));
}
