//! System Call Tests.
//!
//! Programs keep results in their data page at 0x400 and halt, so the test
//! reads them back through the still-installed address space.

use mipsim_core::common::VirtAddr;
use mipsim_core::core::Cpu;
use mipsim_core::isa::abi::{REG_A0, REG_A1, REG_V0, REG_ZERO};
use mipsim_core::kernel::process::ExitStatus;
use mipsim_core::kernel::{Control, Kernel};
use pretty_assertions::assert_eq;

use super::run;
use crate::common::builder::InstructionBuilder as I;
use crate::common::harness::{image, image_with_data, kernel_config, kernel_with};

const T0: usize = 8;
const T1: usize = 9;
const DATA: i32 = 0x400;

fn word(cpu: &mut Cpu, addr: i32) -> u32 {
    cpu.read_mem(VirtAddr::new(addr as u32), 4).unwrap()
}

fn program(parts: &[&[u32]]) -> Vec<u32> {
    parts.concat()
}

/// Joins `child` with the status pointer at `DATA`, then stores
/// `(v0 << 8) + status` at `DATA + 4` and halts.
fn joiner(child: i32) -> Vec<u32> {
    program(&[
        &[
            I::addiu(REG_A0, REG_ZERO, child).build(),
            I::addiu(REG_A1, REG_ZERO, DATA).build(),
        ],
        &I::call(3),
        &[
            I::lw(T0, DATA, REG_ZERO).build(),
            I::nop().build(),
            I::sll(T1, REG_V0, 8).build(),
            I::addu(T1, T1, T0).build(),
            I::sw(T1, DATA + 4, REG_ZERO).build(),
        ],
        &I::call(0),
    ])
}

fn exits_with(status: i32) -> Vec<u32> {
    program(&[&[I::addiu(REG_A0, REG_ZERO, status).build()], &I::call(1)])
}

fn setup() -> (Kernel, Cpu) {
    kernel_with(&kernel_config(4))
}

#[test]
fn halt_stops_the_machine() {
    let (mut kernel, mut cpu) = setup();
    let pid = kernel.spawn(&mut cpu, "h", &image(&I::call(0)), &[], None).unwrap();
    assert_eq!(run(&mut kernel, &mut cpu, 50), Control::Halt);
    assert_eq!(kernel.current(), Some(pid));
    assert_eq!(cpu.pc(), 8);
}

#[test]
fn exit_ends_the_caller() {
    let (mut kernel, mut cpu) = setup();
    let _ = kernel.spawn(&mut cpu, "e", &image(&exits_with(3)), &[], None).unwrap();
    assert_eq!(run(&mut kernel, &mut cpu, 50), Control::Continue);
    assert_eq!(kernel.user_processes(), 0);
    assert_eq!(cpu.stats.syscalls, 1);
    assert_eq!(cpu.stats.processes_exited, 1);
}

#[test]
fn unsupported_call_returns_minus_one() {
    let (mut kernel, mut cpu) = setup();
    let code = program(&[
        &I::call(42),
        &[I::sw(REG_V0, DATA, REG_ZERO).build()],
        &I::call(0),
    ]);
    let _ = kernel.spawn(&mut cpu, "u", &image_with_data(&code, &[0; 8]), &[], None).unwrap();
    assert_eq!(run(&mut kernel, &mut cpu, 50), Control::Halt);
    assert_eq!(word(&mut cpu, DATA), u32::MAX);
}

#[test]
fn join_blocks_until_child_exits() {
    let (mut kernel, mut cpu) = setup();
    let parent = kernel.spawn(&mut cpu, "parent", &image_with_data(&joiner(2), &[0; 8]), &[], None).unwrap();
    let child = kernel.spawn(&mut cpu, "child", &image(&exits_with(7)), &[], Some(parent)).unwrap();
    assert_eq!(child, 2);

    assert_eq!(run(&mut kernel, &mut cpu, 200), Control::Halt);
    assert_eq!(kernel.current(), Some(parent));
    assert_eq!(word(&mut cpu, DATA + 4), 0x107);
}

#[test]
fn join_of_already_exited_child_returns_at_once() {
    let (mut kernel, mut cpu) = setup();
    let parent = kernel.spawn(&mut cpu, "parent", &image_with_data(&joiner(2), &[0; 8]), &[], None).unwrap();
    let child = kernel.spawn(&mut cpu, "child", &image(&exits_with(7)), &[], Some(parent)).unwrap();
    kernel.terminate(&mut cpu, child, ExitStatus::Exited(5)).unwrap();

    assert_eq!(run(&mut kernel, &mut cpu, 200), Control::Halt);
    assert_eq!(word(&mut cpu, DATA + 4), 0x105);
    assert!(kernel.process(parent).unwrap().exited_children.is_empty());
}

#[test]
fn join_of_faulting_child_reports_abnormal_exit() {
    let (mut kernel, mut cpu) = setup();
    let parent = kernel.spawn(&mut cpu, "parent", &image_with_data(&joiner(2), &[0; 8]), &[], None).unwrap();
    let bad = [I::sw(REG_ZERO, 0, REG_ZERO).build(), I::nop().build()];
    let _ = kernel.spawn(&mut cpu, "child", &image(&bad), &[], Some(parent)).unwrap();

    assert_eq!(run(&mut kernel, &mut cpu, 200), Control::Halt);
    // v0 = 0, status = -1.
    assert_eq!(word(&mut cpu, DATA + 4), u32::MAX);
    assert_eq!(cpu.stats.fatal_exceptions, 1);
}

#[test]
fn join_of_a_stranger_fails() {
    let (mut kernel, mut cpu) = setup();
    let _ = kernel.spawn(&mut cpu, "parent", &image_with_data(&joiner(9), &[0; 8]), &[], None).unwrap();

    assert_eq!(run(&mut kernel, &mut cpu, 200), Control::Halt);
    assert_eq!(word(&mut cpu, DATA + 4), 0xFFFF_FF00);
}
