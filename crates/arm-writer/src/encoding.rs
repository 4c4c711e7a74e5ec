//! A32 instruction word encoders.
//!
//! Pure functions from operands to 32-bit instruction words. All words use
//! condition code AL (0xE). Byte order is applied by the writer, not here.
//!
//! ```text
//! 31..28  27..25  24  23  22  21  20  19..16  15..12  11..0
//! cond    op1     P   U   B   W   L   Rn      Rd      imm12
//! ```

use crate::error::AsmError;

/// Instruction word size in bytes.
pub const WORD_SIZE: usize = 4;

/// Mask for a 12-bit immediate field.
pub const INT12_MASK: u32 = 0x0000_0FFF;

/// Mask for a 24-bit signed word-offset field.
pub const INT24_MASK: u32 = 0x00FF_FFFF;

/// PC-relative addressing reads PC as the instruction address plus two words.
pub const PIPELINE_BIAS: i64 = 8;

/// Largest byte displacement a `B` instruction accepts (26-bit signed).
pub const MAX_BRANCH_DISP: i64 = (1 << 25) - 1;

/// Smallest byte displacement a `B` instruction accepts (26-bit signed).
pub const MIN_BRANCH_DISP: i64 = -(1 << 25);

/// Largest byte distance a literal `LDR` can encode in its imm12 field.
pub const MAX_LITERAL_DISP: i64 = 4095;

/// U bit (bit 23): add the offset when set, subtract when clear.
pub const U_BIT: u32 = 1 << 23;

const B_AL: u32 = 0xEA00_0000;
const LDR_LITERAL: u32 = 0xE51F_0000;
const ADD_IMM: u32 = 0xE280_0000;
const LDR_IMM: u32 = 0xE590_0000;
const BX: u32 = 0xE12F_FF10;

/// `MOV R0, R0`, the canonical A32 no-op.
pub const NOP: u32 = 0xE1A0_0000;

/// Permanently-undefined instruction the Linux kernel treats as a breakpoint.
pub const BREAKPOINT_LINUX: u32 = 0xE7F0_01F0;

/// Byte displacement from the pipeline-adjusted `pc` to `target`.
///
/// A32 addresses are 32 bits wide, so both operands are reduced modulo 2^32
/// and the distance wraps around the top of the address space.
#[inline]
pub fn branch_disp(pc: u64, target: u64) -> i64 {
    let pipeline_pc = (pc as u32).wrapping_add(PIPELINE_BIAS as u32);
    (target as u32).wrapping_sub(pipeline_pc) as i32 as i64
}

/// Whether a byte displacement fits the 26-bit signed branch range.
#[inline]
pub fn is_within_branch_range(disp: i64) -> bool {
    (MIN_BRANCH_DISP..=MAX_BRANCH_DISP).contains(&disp)
}

/// Encode `B target` for an instruction located at `pc`.
///
/// Fails without side effects if the target is outside ±32 MiB.
pub fn encode_b_imm(pc: u64, target: u64) -> Result<u32, AsmError> {
    let disp = branch_disp(pc, target);
    if !is_within_branch_range(disp) {
        return Err(AsmError::BranchOutOfRange {
            target,
            disp,
            max: MAX_BRANCH_DISP,
        });
    }
    // cond|101|L=0|imm24; division truncates toward zero
    let words = (disp / 4) as u32;
    Ok(B_AL | (words & INT24_MASK))
}

/// `LDR Rd, [PC, #-0]` placeholder; the displacement is patched on flush.
#[inline]
pub fn encode_ldr_literal(rd: u8) -> u32 {
    LDR_LITERAL | ((rd as u32) << 12)
}

/// Rewrite the U bit and imm12 field of a literal load.
///
/// `disp` is the byte distance from the pipeline-adjusted PC to the pool
/// word. The caller checks that `|disp|` fits in 12 bits.
#[inline]
pub fn patch_ldr_literal(word: u32, disp: i64) -> u32 {
    let u = if disp >= 0 { U_BIT } else { 0 };
    let imm12 = (disp.unsigned_abs() as u32) & INT12_MASK;
    (word & !(U_BIT | INT12_MASK)) | u | imm12
}

/// `ADD Rd, Rn, #imm` with `imm` masked to 12 bits.
#[inline]
pub fn encode_add_imm(rd: u8, rn: u8, imm: u32) -> u32 {
    ADD_IMM | ((rd as u32) << 12) | ((rn as u32) << 16) | (imm & INT12_MASK)
}

/// `LDR Rd, [Rn, #imm]` with `imm` masked to 12 bits.
#[inline]
pub fn encode_ldr_imm(rd: u8, rn: u8, imm: u32) -> u32 {
    LDR_IMM | ((rd as u32) << 12) | ((rn as u32) << 16) | (imm & INT12_MASK)
}

/// `BX Rm`.
#[inline]
pub fn encode_bx(rm: u8) -> u32 {
    BX | (rm as u32 & 0xF)
}

/// Decode the byte address a patched literal load reads from.
///
/// Mirrors the hardware: `PC + 8 ± imm12` with the sign taken from the U bit.
pub fn ldr_literal_target(pc: u64, word: u32) -> u64 {
    let imm12 = (word & INT12_MASK) as i64;
    let offset = if word & U_BIT != 0 { imm12 } else { -imm12 };
    (pc as i64)
        .wrapping_add(PIPELINE_BIAS)
        .wrapping_add(offset) as u64
}
