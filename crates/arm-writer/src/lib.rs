//! # arm-writer: runtime A32 code writer
//!
//! `arm-writer` emits ARM (A32) machine code at run time into a buffer that
//! will execute at a known address. It is meant for building trampolines and
//! hooks without an external toolchain: branch offsets are computed from the
//! target address, and 32-bit constants are loaded through literal pools that
//! are laid out and patched when the writer is flushed.
//!
//! ## Quick Start
//!
//! ```rust
//! use arm_writer::{ArmReg, ArmWriter, TargetOs};
//!
//! let mut code = [0u8; 16];
//! let mut w = ArmWriter::new(&mut code, 0x1000, TargetOs::Linux);
//! w.put_ldr_reg_u32(ArmReg::R0, 0xDEAD_BEEF)?;
//! w.put_b_imm(0x1000)?;
//! let len = w.finish()?;
//! assert_eq!(len, 12);
//! assert_eq!(&code[8..12], &0xDEAD_BEEFu32.to_le_bytes());
//! # Ok::<(), arm_writer::AsmError>(())
//! ```
//!
//! ## Features
//!
//! - **Pure Rust**: no unsafe code, no raw pointers; the writer fills a slice.
//! - **`no_std` + `alloc`**: embeddable in agents injected into other processes.
//! - **Deferred literal pools**: deduplicated per flush, patched in place.
//! - **Little-endian output**: independent of the host byte order.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
// An encoder narrows and reinterprets integer widths constantly, and the
// opcode constants read best as plain hex.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::cast_possible_wrap,
    clippy::unreadable_literal,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args,
    clippy::doc_markdown,
    clippy::missing_errors_doc
)]

extern crate alloc;

/// Writer configuration.
pub mod config;
/// Pure A32 instruction word encoders.
pub mod encoding;
/// Error types.
pub mod error;
/// Deferred literal pool bookkeeping and patching.
pub mod literal;
/// Target operating system selection.
pub mod os;
/// A32 core register descriptors.
pub mod reg;
/// The incremental code writer.
pub mod writer;

// Re-exports
pub use config::{WriterConfig, MAX_LITERAL_COUNT};
pub use error::AsmError;
pub use literal::LiteralRef;
pub use os::TargetOs;
pub use reg::{ArmReg, RegInfo};
pub use writer::ArmWriter;
