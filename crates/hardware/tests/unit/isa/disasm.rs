//! Disassembler Tests.

use crate::common::builder::InstructionBuilder as I;
use mipsim_core::isa::disasm::{disassemble, disassemble_at};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case(I::addiu(8, 0, 5).build(), "addiu $t0, $zero, 5")]
#[case(I::addu(2, 4, 5).build(), "addu $v0, $a0, $a1")]
#[case(I::lw(8, 4, 29).build(), "lw $t0, 4($sp)")]
#[case(I::sw(31, -8, 29).build(), "sw $ra, -8($sp)")]
#[case(I::sll(8, 9, 3).build(), "sll $t0, $t1, 3")]
#[case(I::jr(31).build(), "jr $ra")]
#[case(I::syscall().build(), "syscall")]
#[case(I::mflo(2).build(), "mflo $v0")]
#[case(I::mult(4, 5).build(), "mult $a0, $a1")]
#[case(I::lui(1, 0x1234).build(), "lui $at, 4660")]
fn renders_mnemonics(#[case] word: u32, #[case] text: &str) {
    assert_eq!(disassemble(word), text);
}

#[test]
fn jalr_omits_default_link_register() {
    assert_eq!(disassemble(I::jalr(31, 9).build()), "jalr $t1");
    assert_eq!(disassemble(I::jalr(10, 9).build()), "jalr $t2, $t1");
}

#[test]
fn branch_targets_resolve_against_pc() {
    assert_eq!(
        disassemble_at(I::beq(8, 0, -1).build(), 0x100),
        "beq $t0, $zero, 0x00000100"
    );
    assert_eq!(disassemble_at(I::j(0x400).build(), 0x100), "j 0x00000400");
}

#[test]
fn invalid_words_show_raw_encoding() {
    assert_eq!(disassemble(0xFC00_0000), "invalid 0xfc000000");
}
