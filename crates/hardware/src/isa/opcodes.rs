//! MIPS opcode tables.
//!
//! Every instruction is classified through one of three tables:
//! 1. **Primary:** Indexed by the 6-bit opcode field.
//! 2. **Special:** Indexed by the 6-bit function field when the opcode is 0.
//! 3. **Reg-Imm:** Indexed by the 5-bit `rt` field when the opcode is 1.
//!
//! Each entry carries the operation, a mnemonic and argument format used by the
//! disassembler, the instruction format, and a set of behavior flags consumed by
//! the pipeline stages. Empty slots classify as [`Operation::Invalid`].

use crate::isa::instruction::InstructionBits;

/// Primary opcode selecting the special table.
pub const OP_SPECIAL: u32 = 0;

/// Primary opcode selecting the reg-imm table.
pub const OP_REGIMM: u32 = 1;

/// Operation performed by an instruction, shared by all its encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Unassigned encoding.
    Invalid,
    /// Recognized but unimplemented (`ll`, `sc`, `break`, `sync`).
    Unimpl,
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// 32x32 to 64-bit multiplication into hi/lo.
    Mult,
    /// Division into lo (quotient) and hi (remainder).
    Div,
    /// Shift left logical.
    Sll,
    /// Shift right arithmetic.
    Sra,
    /// Shift right logical.
    Srl,
    /// Set on less than.
    Slt,
    /// Bitwise and.
    And,
    /// Bitwise or.
    Or,
    /// Bitwise nor.
    Nor,
    /// Bitwise exclusive or.
    Xor,
    /// Load upper immediate.
    Lui,
    /// Move from lo.
    Mflo,
    /// Move from hi.
    Mfhi,
    /// Move to lo.
    Mtlo,
    /// Move to hi.
    Mthi,
    /// Unconditional jump.
    Jump,
    /// Branch on equal.
    Beq,
    /// Branch on not equal.
    Bne,
    /// Branch on less than or equal to zero.
    Blez,
    /// Branch on greater than zero.
    Bgtz,
    /// Branch on less than zero.
    Bltz,
    /// Branch on greater than or equal to zero.
    Bgez,
    /// System call.
    Syscall,
    /// Aligned load of 1, 2 or 4 bytes.
    Load,
    /// Load word left.
    Lwl,
    /// Load word right.
    Lwr,
    /// Aligned store of 1, 2 or 4 bytes.
    Store,
    /// Store word left.
    Swl,
    /// Store word right.
    Swr,
}

/// Instruction encoding format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Immediate format: `op rs rt imm16`.
    I,
    /// Jump format: `op target26`.
    J,
    /// Register format: `op rs rt rd shamt funct`.
    R,
    /// No format (invalid or unimplemented entries).
    None,
}

/// Behavior flags attached to each table entry.
pub mod flags {
    /// Writes a destination register.
    pub const DST: u16 = 0x0001;
    /// Destination is the return address register regardless of format.
    pub const DSTRA: u16 = 0x0002;
    /// Signed overflow raises an exception.
    pub const OVERFLOW: u16 = 0x0004;
    /// First source operand is the shift amount field.
    pub const SRC1SH: u16 = 0x0008;
    /// Second source operand is the immediate.
    pub const SRC2IMM: u16 = 0x0010;
    /// Immediate is zero-extended and sources are treated as unsigned.
    pub const UNSIGNED: u16 = 0x0020;
    /// Destination receives the return address.
    pub const LINK: u16 = 0x0040;
    /// Destination is written one instruction late.
    pub const DELAYEDLOAD: u16 = 0x0080;
    /// Memory access of one byte.
    pub const SIZEB: u16 = 0x0100;
    /// Memory access of one half-word.
    pub const SIZEH: u16 = 0x0200;
    /// Memory access of one word.
    pub const SIZEW: u16 = 0x0400;
    /// Transfers control when taken.
    pub const BRANCH: u16 = 0x0800;
}

use flags::{
    BRANCH, DELAYEDLOAD, DST, DSTRA, LINK, OVERFLOW, SIZEB, SIZEH, SIZEW, SRC1SH, SRC2IMM,
    UNSIGNED,
};

/// One opcode table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpInfo {
    /// Operation performed.
    pub op: Operation,
    /// Assembly mnemonic.
    pub name: &'static str,
    /// Argument format string for the disassembler.
    ///
    /// `s`, `t`, `d` name registers, `i` the immediate, `h` the shift amount,
    /// `a` an `imm(rs)` address, `j` the branch or jump target, and `r` the
    /// link register unless it is `ra`.
    pub args: &'static str,
    /// Encoding format.
    pub format: Format,
    /// Behavior flags from [`flags`].
    pub flags: u16,
}

impl OpInfo {
    /// Entry used for every unassigned slot.
    pub const INVALID: Self = Self {
        op: Operation::Invalid,
        name: "invalid",
        args: "",
        format: Format::None,
        flags: 0,
    };

    const fn new(
        op: Operation,
        name: &'static str,
        args: &'static str,
        format: Format,
        flags: u16,
    ) -> Self {
        Self {
            op,
            name,
            args,
            format,
            flags,
        }
    }

    const fn unimpl(name: &'static str) -> Self {
        Self::new(Operation::Unimpl, name, "", Format::None, 0)
    }

    /// Returns `true` if every bit of `flag` is set.
    #[inline(always)]
    pub const fn has(&self, flag: u16) -> bool {
        self.flags & flag == flag
    }

    /// Returns the memory access size in bytes, or 0 for non-sized operations.
    pub const fn access_size(&self) -> u32 {
        if self.has(SIZEB) {
            1
        } else if self.has(SIZEH) {
            2
        } else if self.has(SIZEW) {
            4
        } else {
            0
        }
    }
}

const fn build_primary() -> [OpInfo; 64] {
    use Format::{I, J};
    use Operation as Op;

    let mut t = [OpInfo::INVALID; 64];
    t[2] = OpInfo::new(Op::Jump, "j", "j", J, BRANCH);
    t[3] = OpInfo::new(Op::Jump, "jal", "j", J, BRANCH | LINK | DST | DSTRA);
    t[4] = OpInfo::new(Op::Beq, "beq", "stj", I, BRANCH);
    t[5] = OpInfo::new(Op::Bne, "bne", "stj", I, BRANCH);
    t[6] = OpInfo::new(Op::Blez, "blez", "sj", I, BRANCH);
    t[7] = OpInfo::new(Op::Bgtz, "bgtz", "sj", I, BRANCH);
    t[8] = OpInfo::new(Op::Add, "addi", "tsi", I, DST | SRC2IMM | OVERFLOW);
    t[9] = OpInfo::new(Op::Add, "addiu", "tsi", I, DST | SRC2IMM);
    t[10] = OpInfo::new(Op::Slt, "slti", "tsi", I, DST | SRC2IMM);
    t[11] = OpInfo::new(Op::Slt, "sltiu", "tsi", I, DST | SRC2IMM | UNSIGNED);
    t[12] = OpInfo::new(Op::And, "andi", "tsi", I, DST | SRC2IMM);
    t[13] = OpInfo::new(Op::Or, "ori", "tsi", I, DST | SRC2IMM);
    t[14] = OpInfo::new(Op::Xor, "xori", "tsi", I, DST | SRC2IMM);
    t[15] = OpInfo::new(Op::Lui, "lui", "ti", I, DST | SRC2IMM | UNSIGNED);
    t[20] = OpInfo::new(Op::Beq, "beql", "stj", I, BRANCH);
    t[21] = OpInfo::new(Op::Bne, "bnel", "stj", I, BRANCH);
    t[22] = OpInfo::new(Op::Blez, "blezl", "sj", I, BRANCH);
    t[23] = OpInfo::new(Op::Bgtz, "bgtzl", "sj", I, BRANCH);
    t[32] = OpInfo::new(Op::Load, "lb", "ta", I, DELAYEDLOAD | SIZEB);
    t[33] = OpInfo::new(Op::Load, "lh", "ta", I, DELAYEDLOAD | SIZEH);
    t[34] = OpInfo::new(Op::Lwl, "lwl", "ta", I, DELAYEDLOAD);
    t[35] = OpInfo::new(Op::Load, "lw", "ta", I, DELAYEDLOAD | SIZEW);
    t[36] = OpInfo::new(Op::Load, "lbu", "ta", I, DELAYEDLOAD | SIZEB | UNSIGNED);
    t[37] = OpInfo::new(Op::Load, "lhu", "ta", I, DELAYEDLOAD | SIZEH | UNSIGNED);
    t[38] = OpInfo::new(Op::Lwr, "lwr", "ta", I, DELAYEDLOAD);
    t[40] = OpInfo::new(Op::Store, "sb", "ta", I, SIZEB);
    t[41] = OpInfo::new(Op::Store, "sh", "ta", I, SIZEH);
    t[42] = OpInfo::new(Op::Swl, "swl", "ta", I, 0);
    t[43] = OpInfo::new(Op::Store, "sw", "ta", I, SIZEW);
    t[46] = OpInfo::new(Op::Swr, "swr", "ta", I, 0);
    t[48] = OpInfo::unimpl("ll");
    t[56] = OpInfo::unimpl("sc");
    t
}

const fn build_special() -> [OpInfo; 64] {
    use Format::R;
    use Operation as Op;

    let mut t = [OpInfo::INVALID; 64];
    t[0] = OpInfo::new(Op::Sll, "sll", "dth", R, DST | SRC1SH);
    t[2] = OpInfo::new(Op::Srl, "srl", "dth", R, DST | SRC1SH);
    t[3] = OpInfo::new(Op::Sra, "sra", "dth", R, DST | SRC1SH);
    t[4] = OpInfo::new(Op::Sll, "sllv", "dts", R, DST);
    t[6] = OpInfo::new(Op::Srl, "srlv", "dts", R, DST);
    t[7] = OpInfo::new(Op::Sra, "srav", "dts", R, DST);
    t[8] = OpInfo::new(Op::Jump, "jr", "s", R, BRANCH);
    t[9] = OpInfo::new(Op::Jump, "jalr", "rs", R, BRANCH | LINK | DST);
    t[12] = OpInfo::new(Op::Syscall, "syscall", "", Format::None, 0);
    t[13] = OpInfo::unimpl("break");
    t[15] = OpInfo::unimpl("sync");
    t[16] = OpInfo::new(Op::Mfhi, "mfhi", "d", R, DST);
    t[17] = OpInfo::new(Op::Mthi, "mthi", "s", R, 0);
    t[18] = OpInfo::new(Op::Mflo, "mflo", "d", R, DST);
    t[19] = OpInfo::new(Op::Mtlo, "mtlo", "s", R, 0);
    t[24] = OpInfo::new(Op::Mult, "mult", "st", R, 0);
    t[25] = OpInfo::new(Op::Mult, "multu", "st", R, UNSIGNED);
    t[26] = OpInfo::new(Op::Div, "div", "st", R, 0);
    t[27] = OpInfo::new(Op::Div, "divu", "st", R, UNSIGNED);
    t[32] = OpInfo::new(Op::Add, "add", "dst", R, DST | OVERFLOW);
    t[33] = OpInfo::new(Op::Add, "addu", "dst", R, DST);
    t[34] = OpInfo::new(Op::Sub, "sub", "dst", R, DST | OVERFLOW);
    t[35] = OpInfo::new(Op::Sub, "subu", "dst", R, DST);
    t[36] = OpInfo::new(Op::And, "and", "dst", R, DST);
    t[37] = OpInfo::new(Op::Or, "or", "dst", R, DST);
    t[38] = OpInfo::new(Op::Xor, "xor", "dst", R, DST);
    t[39] = OpInfo::new(Op::Nor, "nor", "dst", R, DST);
    t[42] = OpInfo::new(Op::Slt, "slt", "dst", R, DST);
    t[43] = OpInfo::new(Op::Slt, "sltu", "dst", R, DST | UNSIGNED);
    t
}

const fn build_regimm() -> [OpInfo; 32] {
    use Format::I;
    use Operation as Op;

    let mut t = [OpInfo::INVALID; 32];
    t[0] = OpInfo::new(Op::Bltz, "bltz", "sj", I, BRANCH);
    t[1] = OpInfo::new(Op::Bgez, "bgez", "sj", I, BRANCH);
    t[2] = OpInfo::new(Op::Bltz, "bltzl", "sj", I, BRANCH);
    t[3] = OpInfo::new(Op::Bgez, "bgezl", "sj", I, BRANCH);
    t[16] = OpInfo::new(Op::Bltz, "bltzal", "sj", I, BRANCH | LINK | DST | DSTRA);
    t[17] = OpInfo::new(Op::Bgez, "bgezal", "sj", I, BRANCH | LINK | DST | DSTRA);
    t[18] = OpInfo::new(Op::Bltz, "bltzall", "sj", I, BRANCH | LINK | DST | DSTRA);
    t[19] = OpInfo::new(Op::Bgez, "bgezall", "sj", I, BRANCH | LINK | DST | DSTRA);
    t
}

/// Primary opcode table, indexed by bits 26-31.
pub static PRIMARY_TABLE: [OpInfo; 64] = build_primary();

/// Special function table, indexed by bits 0-5 when the opcode is 0.
pub static SPECIAL_TABLE: [OpInfo; 64] = build_special();

/// Reg-imm table, indexed by bits 16-20 when the opcode is 1.
pub static REGIMM_TABLE: [OpInfo; 32] = build_regimm();

/// Classifies an instruction word through the three opcode tables.
///
/// # Arguments
///
/// * `inst` - The raw 32-bit instruction encoding.
///
/// # Returns
///
/// The matching table entry; unassigned encodings yield [`OpInfo::INVALID`].
pub fn lookup(inst: u32) -> &'static OpInfo {
    match inst.opcode() {
        OP_SPECIAL => &SPECIAL_TABLE[inst.funct() as usize],
        OP_REGIMM => &REGIMM_TABLE[inst.rt()],
        op => &PRIMARY_TABLE[op as usize],
    }
}
