//! Regression tests for bug fixes.
//!
//! Each test documents a specific bug that was found and fixed, ensuring the
//! fix is never accidentally reverted.

use arm_writer::{ArmReg, ArmWriter, AsmError, TargetOs};

fn word(code: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(code[offset..offset + 4].try_into().unwrap())
}

/// Regression: a literal at distance zero (pool word exactly at PC + 8) must
/// set the U bit. `LDR Rd, [PC, #-0]` and `[PC, #+0]` read the same address,
/// but disassemblers and relocators treat the subtract form as a placeholder.
#[test]
fn zero_distance_literal_sets_add_bit() {
    let mut code = [0u8; 16];
    let mut w = ArmWriter::new(&mut code, 0, TargetOs::Linux);
    w.put_ldr_reg_u32(ArmReg::R0, 3).unwrap();
    w.put_nop().unwrap();
    w.flush().unwrap();
    assert_eq!(word(w.code(), 0), 0xE59F_0000);
}

/// Regression: patching must clear the previous displacement instead of
/// OR-ing into it, so a load word is never left with stale offset bits.
#[test]
fn backward_literal_clears_add_bit() {
    let mut code = [0u8; 16];
    let mut w = ArmWriter::new(&mut code, 0, TargetOs::Linux);
    w.put_ldr_reg_u32(ArmReg::R0, 3).unwrap();
    w.flush().unwrap();
    assert_eq!(word(w.code(), 0) & (1 << 23), 0);
    assert_eq!(word(w.code(), 0) & 0xFFF, 4);
}

/// Regression: pool words are stored little-endian like instructions, not
/// in host order.
#[test]
fn pool_words_are_little_endian() {
    let mut code = [0u8; 8];
    let mut w = ArmWriter::new(&mut code, 0, TargetOs::Linux);
    w.put_ldr_reg_u32(ArmReg::R0, 0x0102_0304).unwrap();
    w.flush().unwrap();
    assert_eq!(&w.code()[4..8], &[0x04, 0x03, 0x02, 0x01]);
}

/// Regression: branch distances are measured from the logical PC, which
/// differs from the buffer offset whenever the writer targets a remote
/// address.
#[test]
fn branch_uses_logical_pc() {
    let mut code = [0u8; 4];
    let mut w = ArmWriter::new(&mut code, 0x7FFF_0000, TargetOs::Linux);
    w.put_b_imm(0x7FFF_0010).unwrap();
    // (0x10 - 8) / 4 = 2
    assert_eq!(word(w.code(), 0), 0xEA00_0002);
}

/// Regression: branch distances are 32-bit, so a branch just past the top of
/// the address space reaches low addresses instead of being rejected as
/// 4 GiB away.
#[test]
fn branch_wraps_around_address_space() {
    let mut code = [0u8; 4];
    let mut w = ArmWriter::new(&mut code, 0xFFFF_FFF0, TargetOs::Linux);
    w.put_b_imm(0x10).unwrap();
    // 0x10 - 0xFFFF_FFF8 = +0x18 → 6 words
    assert_eq!(word(w.code(), 0), 0xEA00_0006);
}

/// Regression: `skip` keeps the cursor word-aligned, so later loads and the
/// literal pool never land on a half-word offset.
#[test]
fn unaligned_skip_is_rejected() {
    let mut code = [0u8; 16];
    let mut w = ArmWriter::new(&mut code, 0, TargetOs::Linux);
    assert_eq!(w.skip(2), Err(AsmError::Misaligned { len: 2 }));
    w.put_ldr_reg_u32(ArmReg::R0, 0xDEAD_BEEF).unwrap();
    w.put_nop().unwrap();
    w.flush().unwrap();
    assert_eq!(w.offset() % 4, 0);
    assert_eq!(word(w.code(), 8), 0xDEAD_BEEF);
}
