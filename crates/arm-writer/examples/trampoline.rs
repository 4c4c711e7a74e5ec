//! Trampoline generation example.
//!
//! Builds a small inline-hook trampoline for a 32-bit ARM Linux process:
//! - load the hook's absolute address through the literal pool
//! - pass a tagged context pointer in R0
//! - jump to the hook, or trap when no hook is installed
//!
//! Run with: `cargo run --example trampoline`

use arm_writer::{ArmReg, ArmWriter, AsmError, TargetOs};

const TRAMPOLINE_ADDR: u64 = 0x7000_0000;
const HOOK_ADDR: u64 = 0x7001_2340;
const CONTEXT_ADDR: u32 = 0xBEEF_0000;

fn main() -> Result<(), AsmError> {
    println!("=== arm_writer trampoline example ===\n");

    let mut code = [0u8; 64];
    let mut w = ArmWriter::new(&mut code, TRAMPOLINE_ADDR, TargetOs::native());
    w.put_ldr_reg_u32(ArmReg::R0, CONTEXT_ADDR)?;
    w.put_add_reg_reg_imm(ArmReg::R0, ArmReg::R0, 0x10)?;
    w.put_ldr_reg_address(ArmReg::R12, HOOK_ADDR)?;
    w.put_bx_reg(ArmReg::R12)?;
    w.put_breakpoint()?;
    let len = w.finish()?;

    println!("Trampoline @ 0x{:08X} ({} bytes):", TRAMPOLINE_ADDR, len);
    for (i, chunk) in code[..len].chunks(4).enumerate() {
        let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        println!("   0x{:08X}:  {:08X}", TRAMPOLINE_ADDR + (i * 4) as u64, word);
    }

    let far = TRAMPOLINE_ADDR + 0x1000_0000;
    println!(
        "\nDirect branch to 0x{:08X} possible: {}",
        far,
        ArmWriter::can_branch_directly_between(TRAMPOLINE_ADDR, far)
    );
    Ok(())
}
