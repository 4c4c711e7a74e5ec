//! A32 core register descriptors.

use core::fmt;

/// An A32 core register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArmReg {
    /// R0.
    R0,
    /// R1.
    R1,
    /// R2.
    R2,
    /// R3.
    R3,
    /// R4.
    R4,
    /// R5.
    R5,
    /// R6.
    R6,
    /// R7.
    R7,
    /// R8.
    R8,
    /// R9.
    R9,
    /// R10.
    R10,
    /// R11 (FP by convention).
    R11,
    /// R12 (IP, intra-procedure scratch).
    R12,
    /// R13 / SP, the stack pointer.
    Sp,
    /// R14 / LR, the link register.
    Lr,
    /// R15 / PC, the program counter.
    Pc,
}

/// Encoding facts about a register, as consumed by instruction builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegInfo {
    /// 4-bit register number placed in the Rd/Rn/Rm fields.
    pub index: u8,
    /// Register width in bits.
    pub width: u32,
}

impl ArmReg {
    /// All core registers in encoding order.
    pub const ALL: [ArmReg; 16] = [
        ArmReg::R0,
        ArmReg::R1,
        ArmReg::R2,
        ArmReg::R3,
        ArmReg::R4,
        ArmReg::R5,
        ArmReg::R6,
        ArmReg::R7,
        ArmReg::R8,
        ArmReg::R9,
        ArmReg::R10,
        ArmReg::R11,
        ArmReg::R12,
        ArmReg::Sp,
        ArmReg::Lr,
        ArmReg::Pc,
    ];

    /// 4-bit register number (0–15).
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Describe the register for encoding.
    #[must_use]
    pub const fn describe(self) -> RegInfo {
        RegInfo {
            index: self.index(),
            width: 32,
        }
    }

    /// Register from its 4-bit number, or `None` above 15.
    #[must_use]
    pub fn from_index(n: u8) -> Option<ArmReg> {
        ArmReg::ALL.get(n as usize).copied()
    }
}

impl fmt::Display for ArmReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArmReg::Sp => write!(f, "sp"),
            ArmReg::Lr => write!(f, "lr"),
            ArmReg::Pc => write!(f, "pc"),
            other => write!(f, "r{}", other.index()),
        }
    }
}
