#![no_main]
use libfuzzer_sys::fuzz_target;

use arm_writer::{ArmReg, ArmWriter, TargetOs};

fuzz_target!(|data: &[u8]| {
    // First four bytes pick the base address, the rest drive the writer.
    if data.len() < 4 {
        return;
    }
    let base = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as u64;
    let mut code = [0u8; 4096];
    let mut w = ArmWriter::new(&mut code, base, TargetOs::Linux);

    for pair in data[4..].chunks(2) {
        let op = pair[0];
        let arg = pair.get(1).copied().unwrap_or(0);
        let reg = ArmReg::from_index(arg & 0xF).unwrap_or(ArmReg::R0);
        let _ = match op % 9 {
            0 => w.put_ldr_reg_u32(reg, arg as u32 * 0x0101_0101),
            1 => w.put_ldr_reg_address(reg, base ^ ((arg as u64) << 12)),
            2 => w.put_b_imm(base.wrapping_add((arg as u64) << 20)),
            3 => w.put_add_reg_reg_imm(reg, reg, arg as u32),
            4 => w.put_ldr_reg_reg_imm(reg, ArmReg::Sp, arg as u32),
            5 => w.put_nop(),
            6 => w.put_breakpoint(),
            7 => w.skip(arg as usize * 4),
            _ => w.flush(),
        };
    }
    let _ = w.finish();
});
