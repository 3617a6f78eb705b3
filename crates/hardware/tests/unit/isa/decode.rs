//! Decode Tests.
//!
//! Field extraction, immediate sign extension and table classification for
//! each of the three opcode tables.

use crate::common::builder::InstructionBuilder as I;
use mipsim_core::isa::decode::decode;
use mipsim_core::isa::opcodes::flags::{BRANCH, DELAYEDLOAD, DST, DSTRA, LINK, OVERFLOW, UNSIGNED};
use mipsim_core::isa::opcodes::{Format, Operation};
use proptest::prelude::*;
use rstest::rstest;

#[test]
fn r_format_fields() {
    let d = decode(I::addu(3, 4, 5).build());
    assert_eq!((d.rd, d.rs, d.rt), (3, 4, 5));
    assert_eq!(d.info.name, "addu");
    assert_eq!(d.info.format, Format::R);
}

#[test]
fn immediate_is_sign_extended() {
    let d = decode(I::addiu(8, 0, -2).build());
    assert_eq!(d.imm, -2);
    assert_eq!(d.rt, 8);
}

#[test]
fn jump_target_field() {
    let d = decode(I::j(0x0040_0000).build());
    assert_eq!(d.target, 0x0010_0000);
    assert_eq!(d.info.format, Format::J);
}

#[rstest]
#[case(I::add(1, 2, 3).build(), Operation::Add, DST | OVERFLOW)]
#[case(I::addu(1, 2, 3).build(), Operation::Add, DST)]
#[case(I::lw(1, 0, 2).build(), Operation::Load, DELAYEDLOAD)]
#[case(I::jal(0).build(), Operation::Jump, BRANCH | LINK | DST | DSTRA)]
#[case(I::j(0).build(), Operation::Jump, BRANCH)]
#[case(I::multu(1, 2).build(), Operation::Mult, UNSIGNED)]
#[case(I::bgezal(1, 0).build(), Operation::Bgez, BRANCH | LINK | DSTRA)]
fn classification_and_flags(#[case] word: u32, #[case] op: Operation, #[case] flags: u16) {
    let info = decode(word).info;
    assert_eq!(info.op, op);
    assert!(info.has(flags), "{} lacks {flags:#06x}", info.name);
}

#[test]
fn loads_do_not_write_immediately() {
    assert!(!decode(I::lw(1, 0, 2).build()).info.has(DST));
}

#[test]
fn access_sizes() {
    assert_eq!(decode(I::lb(1, 0, 2).build()).info.access_size(), 1);
    assert_eq!(decode(I::lh(1, 0, 2).build()).info.access_size(), 2);
    assert_eq!(decode(I::sw(1, 0, 2).build()).info.access_size(), 4);
    assert_eq!(decode(I::lwl(1, 0, 2).build()).info.access_size(), 0);
}

#[rstest]
#[case(0x0000_000D, Operation::Unimpl)] // break
#[case(0xC000_0000, Operation::Unimpl)] // ll
#[case(0xFC00_0000, Operation::Invalid)]
#[case(0x0000_0001, Operation::Invalid)] // special funct 1
#[case(0x0404_0000, Operation::Invalid)] // regimm rt 4
fn unimplemented_and_unassigned(#[case] word: u32, #[case] op: Operation) {
    assert_eq!(decode(word).info.op, op);
}

proptest! {
    #[test]
    fn decode_never_panics_and_preserves_raw(word in any::<u32>()) {
        let d = decode(word);
        prop_assert_eq!(d.raw, word);
        prop_assert!(d.rs < 32 && d.rt < 32 && d.rd < 32);
        prop_assert!(d.shamt < 32);
        prop_assert_eq!(d.imm, i32::from(word as u16 as i16));
    }
}
