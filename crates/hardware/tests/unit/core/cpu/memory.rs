//! Load/Store Tests.
//!
//! Loads are delayed by one instruction: the instruction after a load still
//! reads the old register value, and the load lands during its writeback.

use crate::common::builder::InstructionBuilder as I;
use crate::common::harness::TestContext;
use mipsim_core::isa::abi::REG_ZERO;

const T0: usize = 8;
const T1: usize = 9;
const T2: usize = 10;
const T3: usize = 11;
const BASE: u32 = 0x100;
const DATA: u32 = 0x1000;

#[test]
fn load_lands_one_instruction_late() {
    let mut tc = TestContext::new().load_program(
        BASE,
        &[
            I::lw(T0, 0, T1).build(),
            I::addu(T2, T0, REG_ZERO).build(),
            I::addu(T3, T0, REG_ZERO).build(),
        ],
    );
    tc.write_word(DATA, 0x1234_5678);
    tc.set_reg(T0, 7).set_reg(T1, DATA as i32);

    tc.run(1);
    assert_eq!(tc.get_reg(T0), 7, "value not yet visible");
    assert_eq!(tc.cpu.pending_load().target, T0);

    tc.run(1);
    assert_eq!(tc.get_reg(T2), 7, "delay slot reads the old value");
    assert_eq!(tc.get_reg(T0), 0x1234_5678);

    tc.run(1);
    assert_eq!(tc.get_reg(T3), 0x1234_5678);
}

#[test]
fn back_to_back_loads_complete_in_order() {
    let mut tc = TestContext::new().load_program(
        BASE,
        &[
            I::lw(T0, 0, T1).build(),
            I::lw(T2, 4, T1).build(),
            I::nop().build(),
        ],
    );
    tc.write_word(DATA, 11);
    tc.write_word(DATA + 4, 22);
    tc.set_reg(T1, DATA as i32);

    tc.run(2);
    assert_eq!(tc.get_reg(T0), 11);
    assert_eq!(tc.get_reg(T2), 0);
    tc.run(1);
    assert_eq!(tc.get_reg(T2), 22);
}

#[test]
fn negative_offsets_address_below_base() {
    let mut tc = TestContext::new().load_program(
        BASE,
        &[I::lw(T0, -4, T1).build(), I::nop().build()],
    );
    tc.write_word(DATA - 4, 0xABCD);
    tc.set_reg(T1, DATA as i32);
    tc.run(2);
    assert_eq!(tc.get_reg(T0), 0xABCD);
}

#[test]
fn store_word_then_load_back() {
    let mut tc = TestContext::new().load_program(
        BASE,
        &[
            I::sw(T0, 8, T1).build(),
            I::lw(T2, 8, T1).build(),
            I::nop().build(),
        ],
    );
    tc.set_reg(T0, -42).set_reg(T1, DATA as i32);
    tc.run(3);
    assert_eq!(tc.read_word(DATA + 8), -42i32 as u32);
    assert_eq!(tc.get_reg(T2), -42);
}

#[test]
fn byte_loads_sign_and_zero_extend() {
    let mut tc = TestContext::new().load_program(
        BASE,
        &[
            I::lb(T0, 0, T1).build(),
            I::lbu(T2, 0, T1).build(),
            I::nop().build(),
        ],
    );
    tc.write_word(DATA, 0x0000_00F0);
    tc.set_reg(T1, DATA as i32);
    tc.run(3);
    assert_eq!(tc.get_reg(T0), -16);
    assert_eq!(tc.get_reg(T2), 0xF0);
}

#[test]
fn halfword_and_byte_stores_touch_only_their_bytes() {
    let mut tc = TestContext::new().load_program(
        BASE,
        &[I::sh(T0, 2, T1).build(), I::sb(T0, 1, T1).build()],
    );
    tc.write_word(DATA, 0x1111_1111);
    tc.set_reg(T0, 0x0000_ABCD).set_reg(T1, DATA as i32);
    tc.run(2);
    assert_eq!(tc.read_word(DATA), 0xABCD_CD11);
}

#[test]
fn lwl_lwr_load_an_unaligned_word() {
    let mut tc = TestContext::new().load_program(
        BASE,
        &[
            I::lwl(T0, 4, T1).build(),
            I::lwr(T0, 1, T1).build(),
            I::nop().build(),
        ],
    );
    tc.write_word(DATA, 0x4433_2211);
    tc.write_word(DATA + 4, 0x8877_6655);
    tc.set_reg(T1, DATA as i32);
    tc.run(3);
    assert_eq!(tc.get_reg(T0) as u32, 0x5544_3322);
}

#[test]
fn store_to_unaligned_address_leaves_memory_untouched() {
    let mut tc = TestContext::new().load_program(BASE, &[I::sw(T0, 2, T1).build()]);
    tc.write_word(DATA, 0x5555_5555);
    tc.set_reg(T0, -1).set_reg(T1, DATA as i32);
    assert!(tc.step().is_err());
    assert_eq!(tc.read_word(DATA), 0x5555_5555);
}
