//! The A32 code writer.
//!
//! [`ArmWriter`] emits instruction words into a caller-provided buffer that
//! will run at a caller-chosen address. Branch targets are absolute
//! addresses; distances are computed from the writer's program counter.
//! Constants too wide for an immediate field go through the literal pool
//! (see [`ArmWriter::put_ldr_reg_u32`] and [`ArmWriter::flush`]).
//!
//! ## Ownership
//!
//! A writer is owned by one code-generation session. Code that must share a
//! writer wraps it (`Rc<RefCell<_>>`, `Arc<Mutex<_>>`) and serializes every
//! mutating call. Dropping the last owner flushes pending literals at the
//! current cursor.

use log::{debug, trace, warn};

use crate::config::WriterConfig;
use crate::encoding::{self, WORD_SIZE};
use crate::error::AsmError;
use crate::literal::{LiteralPool, LiteralRef};
use crate::os::TargetOs;
use crate::reg::ArmReg;

/// Incremental A32 machine-code writer.
///
/// # Examples
///
/// ```
/// use arm_writer::{ArmReg, ArmWriter, TargetOs};
///
/// let mut code = [0u8; 32];
/// let mut w = ArmWriter::new(&mut code, 0x8000, TargetOs::Linux);
/// w.put_ldr_reg_u32(ArmReg::R0, 0xDEAD_BEEF)?;
/// w.put_bx_reg(ArmReg::Lr)?;
/// w.flush()?;
/// assert_eq!(w.offset(), 12);
/// assert_eq!(&w.code()[8..12], &0xDEAD_BEEFu32.to_le_bytes());
/// # Ok::<(), arm_writer::AsmError>(())
/// ```
#[derive(Debug)]
pub struct ArmWriter<'a> {
    code: &'a mut [u8],
    cursor: usize,
    base: u64,
    pc: u64,
    target_os: TargetOs,
    literals: LiteralPool,
}

impl<'a> ArmWriter<'a> {
    /// Create a writer that fills `code`, whose first byte will live at `pc`.
    pub fn new(code: &'a mut [u8], pc: u64, target_os: TargetOs) -> Self {
        Self::with_config(code, pc, WriterConfig::new(target_os))
    }

    /// Create a writer with explicit configuration.
    pub fn with_config(code: &'a mut [u8], pc: u64, config: WriterConfig) -> Self {
        debug!(
            "arm writer: {} bytes @ 0x{:X} for {}",
            code.len(),
            pc,
            config.target_os
        );
        Self {
            code,
            cursor: 0,
            base: pc,
            pc,
            target_os: config.target_os,
            literals: LiteralPool::with_capacity(config.max_literal_refs),
        }
    }

    /// Retarget the writer at a new buffer and address.
    ///
    /// Pending literal references are discarded, not flushed: their loads
    /// keep a zero displacement. Flush first, or use
    /// [`try_reset`](Self::try_reset) to have this checked. The target OS
    /// and literal capacity are kept.
    pub fn reset(&mut self, code: &'a mut [u8], pc: u64) {
        let lost = self.literals.discard();
        if lost > 0 {
            warn!(
                "arm writer reset @ 0x{:X} discarded {} unflushed literal references",
                self.pc, lost
            );
        }
        self.code = code;
        self.cursor = 0;
        self.base = pc;
        self.pc = pc;
    }

    /// Like [`reset`](Self::reset), but refuses to drop pending literals.
    ///
    /// On error the writer is unchanged and `code` is not taken.
    pub fn try_reset(&mut self, code: &'a mut [u8], pc: u64) -> Result<(), AsmError> {
        if !self.literals.is_empty() {
            return Err(AsmError::UnflushedLiterals {
                pending: self.literals.len(),
            });
        }
        self.reset(code, pc);
        Ok(())
    }

    /// Override the target OS. Only affects [`put_breakpoint`](Self::put_breakpoint).
    pub fn set_target_os(&mut self, os: TargetOs) {
        self.target_os = os;
    }

    /// The target OS used for OS-specific encodings.
    #[must_use]
    pub fn target_os(&self) -> TargetOs {
        self.target_os
    }

    /// Flush pending literals and return the number of bytes written.
    pub fn finish(mut self) -> Result<usize, AsmError> {
        self.flush()?;
        Ok(self.cursor)
    }

    // ── Cursor state ─────────────────────────────────────────────────────

    /// Address of the first byte of the buffer.
    #[must_use]
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Address the next emitted instruction will run at.
    #[must_use]
    pub fn pc(&self) -> u64 {
        self.pc
    }

    /// Bytes from the start of the buffer to the cursor.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.cursor
    }

    /// Total size of the bound buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.code.len()
    }

    /// Bytes emitted so far (`[0, cursor)`).
    ///
    /// Literal loads still pending carry a zero displacement until the next
    /// flush.
    #[must_use]
    pub fn code(&self) -> &[u8] {
        &self.code[..self.cursor]
    }

    /// Literal references that the next flush will resolve, in emission order.
    #[must_use]
    pub fn pending_literals(&self) -> &[LiteralRef] {
        self.literals.refs()
    }

    fn ensure_room(&self, needed: usize) -> Result<(), AsmError> {
        if needed > self.code.len() - self.cursor {
            return Err(AsmError::BufferOverflow {
                offset: self.cursor,
                needed,
                capacity: self.code.len(),
            });
        }
        Ok(())
    }

    /// Advance the cursor and PC by `n_bytes` without writing.
    ///
    /// The skipped range keeps whatever the buffer held; the caller fills it
    /// through another path. `n_bytes` must be a multiple of 4 so the cursor
    /// stays word-aligned.
    pub fn skip(&mut self, n_bytes: usize) -> Result<(), AsmError> {
        if n_bytes % WORD_SIZE != 0 {
            return Err(AsmError::Misaligned { len: n_bytes });
        }
        self.ensure_room(n_bytes)?;
        trace!("skip @ {}: {} bytes", self.cursor, n_bytes);
        self.cursor += n_bytes;
        self.pc = self.pc.wrapping_add(n_bytes as u64);
        Ok(())
    }

    // ── Emission primitives ──────────────────────────────────────────────

    /// Write one instruction word at the cursor (little-endian).
    pub fn put_instruction(&mut self, insn: u32) -> Result<(), AsmError> {
        self.ensure_room(WORD_SIZE)?;
        trace!("put insn @ {} (pc 0x{:X}): {:08X}", self.cursor, self.pc, insn);
        self.code[self.cursor..self.cursor + WORD_SIZE].copy_from_slice(&insn.to_le_bytes());
        self.cursor += WORD_SIZE;
        self.pc = self.pc.wrapping_add(WORD_SIZE as u64);
        Ok(())
    }

    /// Copy raw bytes to the cursor. The length must be a multiple of 4.
    pub fn put_bytes(&mut self, data: &[u8]) -> Result<(), AsmError> {
        if data.len() % WORD_SIZE != 0 {
            return Err(AsmError::Misaligned { len: data.len() });
        }
        self.ensure_room(data.len())?;
        trace!("put data @ {}: len {}", self.cursor, data.len());
        self.code[self.cursor..self.cursor + data.len()].copy_from_slice(data);
        self.cursor += data.len();
        self.pc = self.pc.wrapping_add(data.len() as u64);
        Ok(())
    }

    // ── Literal pool ─────────────────────────────────────────────────────

    /// Record that the instruction about to be written at the cursor loads `value`.
    fn add_literal_reference_here(&mut self, value: u32) -> Result<(), AsmError> {
        self.literals.push(self.cursor, value)
    }

    /// Place the pending literal pool at the cursor and patch every load.
    ///
    /// Identical values in one batch share a pool word. Cursor and PC move
    /// past the pool. With nothing pending this is a no-op. On error nothing
    /// is written and the references stay pending.
    pub fn flush(&mut self) -> Result<(), AsmError> {
        if self.literals.is_empty() {
            return Ok(());
        }
        let pool_len = self.literals.resolve(&mut *self.code, self.cursor)?;
        self.cursor += pool_len;
        self.pc = self.pc.wrapping_add(pool_len as u64);
        Ok(())
    }

    // ── Branches ─────────────────────────────────────────────────────────

    /// Whether a `B` placed at `from` can reach `to`.
    ///
    /// Both addresses are taken modulo 2^32, like the hardware PC.
    #[must_use]
    pub fn can_branch_directly_between(from: u64, to: u64) -> bool {
        encoding::is_within_branch_range(encoding::branch_disp(from, to))
    }

    /// `B target`. Fails if `target` is beyond ±32 MiB of the PC.
    pub fn put_b_imm(&mut self, target: u64) -> Result<(), AsmError> {
        let insn = encoding::encode_b_imm(self.pc, target)?;
        self.put_instruction(insn)
    }

    /// `BX reg`.
    pub fn put_bx_reg(&mut self, reg: ArmReg) -> Result<(), AsmError> {
        let rm = reg.describe();
        self.put_instruction(encoding::encode_bx(rm.index))
    }

    // ── Loads ────────────────────────────────────────────────────────────

    /// Load `address` into `reg` through the literal pool.
    ///
    /// Only the low 32 bits of `address` are kept.
    pub fn put_ldr_reg_address(&mut self, reg: ArmReg, address: u64) -> Result<(), AsmError> {
        self.put_ldr_reg_u32(reg, address as u32)
    }

    /// Load the constant `value` into `reg` through the literal pool.
    ///
    /// Emits `LDR reg, [PC, #…]` whose displacement is filled in by the next
    /// [`flush`](Self::flush).
    pub fn put_ldr_reg_u32(&mut self, reg: ArmReg, value: u32) -> Result<(), AsmError> {
        let rd = reg.describe();
        self.ensure_room(WORD_SIZE)?;
        self.add_literal_reference_here(value)?;
        self.put_instruction(encoding::encode_ldr_literal(rd.index))
    }

    /// `LDR dst, [src, #imm]` with `imm` masked to 12 bits.
    pub fn put_ldr_reg_reg_imm(
        &mut self,
        dst: ArmReg,
        src: ArmReg,
        imm: u32,
    ) -> Result<(), AsmError> {
        let rd = dst.describe();
        let rs = src.describe();
        self.put_instruction(encoding::encode_ldr_imm(rd.index, rs.index, imm))
    }

    /// `LDR dst, [src]`.
    pub fn put_ldr_reg_reg(&mut self, dst: ArmReg, src: ArmReg) -> Result<(), AsmError> {
        self.put_ldr_reg_reg_imm(dst, src, 0)
    }

    // ── Arithmetic ───────────────────────────────────────────────────────

    /// `ADD dst, src, #imm` with `imm` masked to 12 bits.
    pub fn put_add_reg_reg_imm(
        &mut self,
        dst: ArmReg,
        src: ArmReg,
        imm: u32,
    ) -> Result<(), AsmError> {
        let rd = dst.describe();
        let rs = src.describe();
        self.put_instruction(encoding::encode_add_imm(rd.index, rs.index, imm))
    }

    // ── Misc ─────────────────────────────────────────────────────────────

    /// `NOP` (encoded as `MOV R0, R0`).
    pub fn put_nop(&mut self) -> Result<(), AsmError> {
        self.put_instruction(encoding::NOP)
    }

    /// Software breakpoint for the target OS.
    pub fn put_breakpoint(&mut self) -> Result<(), AsmError> {
        let insn = match self.target_os {
            TargetOs::Linux | TargetOs::Android => encoding::BREAKPOINT_LINUX,
            // TODO: give Windows, Darwin, FreeBSD and QNX their own breakpoint encodings.
            other => {
                debug!("no breakpoint encoding for {}, using the Linux one", other);
                encoding::BREAKPOINT_LINUX
            }
        };
        self.put_instruction(insn)
    }
}

impl Drop for ArmWriter<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!("arm writer dropped with unresolved literals: {}", e);
        }
    }
}
