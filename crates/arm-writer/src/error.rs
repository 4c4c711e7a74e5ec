//! Error types for code emission.

use core::fmt;

/// Code emission error.
///
/// Every error is reported synchronously to the caller of the failing
/// operation. A failing operation leaves the output buffer untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AsmError {
    /// Branch target is outside the reach of the `B` instruction.
    BranchOutOfRange {
        /// The absolute branch target.
        target: u64,
        /// Byte displacement from the pipeline-adjusted PC to the target.
        disp: i64,
        /// Largest encodable displacement magnitude.
        max: i64,
    },

    /// The pending literal batch is full; flush before adding more.
    LiteralPoolFull {
        /// Maximum number of pending literal references per batch.
        capacity: usize,
    },

    /// A pool word landed too far from the load that references it.
    LiteralOutOfRange {
        /// Byte offset of the load instruction from the start of the buffer.
        offset: usize,
        /// Byte displacement from the pipeline-adjusted PC to the pool word.
        disp: i64,
        /// Largest encodable displacement magnitude.
        max: i64,
    },

    /// A raw data or skip length is not a multiple of the instruction word size.
    Misaligned {
        /// The rejected length in bytes.
        len: usize,
    },

    /// The output buffer cannot hold the requested bytes.
    BufferOverflow {
        /// Byte offset at which the write was attempted.
        offset: usize,
        /// Number of bytes the write needed.
        needed: usize,
        /// Total size of the output buffer.
        capacity: usize,
    },

    /// A checked reset found literal references that were never flushed.
    UnflushedLiterals {
        /// Number of pending references that would have been lost.
        pending: usize,
    },
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmError::BranchOutOfRange { target, disp, max } => {
                write!(
                    f,
                    "branch target 0x{:X} out of range (displacement={}, max=±{})",
                    target, disp, max
                )
            }
            AsmError::LiteralPoolFull { capacity } => {
                write!(
                    f,
                    "literal pool full: {} pending references (flush first)",
                    capacity
                )
            }
            AsmError::LiteralOutOfRange { offset, disp, max } => {
                write!(
                    f,
                    "literal load at offset {} cannot reach its pool slot (displacement={}, max=±{})",
                    offset, disp, max
                )
            }
            AsmError::Misaligned { len } => {
                write!(f, "length {} is not a multiple of 4 bytes", len)
            }
            AsmError::BufferOverflow {
                offset,
                needed,
                capacity,
            } => {
                write!(
                    f,
                    "buffer overflow: {} bytes at offset {} exceed capacity {}",
                    needed, offset, capacity
                )
            }
            AsmError::UnflushedLiterals { pending } => {
                write!(f, "reset with {} unflushed literal references", pending)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AsmError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn error_branch_out_of_range_display() {
        let err = AsmError::BranchOutOfRange {
            target: 0x0200_0008,
            disp: 33_554_432,
            max: 33_554_431,
        };
        assert_eq!(
            format!("{}", err),
            "branch target 0x2000008 out of range (displacement=33554432, max=±33554431)"
        );
    }

    #[test]
    fn error_literal_pool_full_display() {
        let err = AsmError::LiteralPoolFull { capacity: 100 };
        assert_eq!(
            format!("{}", err),
            "literal pool full: 100 pending references (flush first)"
        );
    }

    #[test]
    fn error_literal_out_of_range_display() {
        let err = AsmError::LiteralOutOfRange {
            offset: 8,
            disp: 5000,
            max: 4095,
        };
        assert_eq!(
            format!("{}", err),
            "literal load at offset 8 cannot reach its pool slot (displacement=5000, max=±4095)"
        );
    }

    #[test]
    fn error_misaligned_display() {
        let err = AsmError::Misaligned { len: 3 };
        assert_eq!(format!("{}", err), "length 3 is not a multiple of 4 bytes");
    }

    #[test]
    fn error_buffer_overflow_display() {
        let err = AsmError::BufferOverflow {
            offset: 12,
            needed: 4,
            capacity: 12,
        };
        assert_eq!(
            format!("{}", err),
            "buffer overflow: 4 bytes at offset 12 exceed capacity 12"
        );
    }

    #[test]
    fn error_unflushed_literals_display() {
        let err = AsmError::UnflushedLiterals { pending: 2 };
        assert_eq!(format!("{}", err), "reset with 2 unflushed literal references");
    }
}
