//! Deferred literal pools.
//!
//! A literal load is emitted with a zero displacement and a [`LiteralRef`]
//! pointing at it. On flush the pending batch is laid out as a pool of
//! deduplicated 32-bit words starting at the cursor, and every load is
//! patched to address its word.
//!
//! Pool placement is order-stable: values get slots in the order of their
//! first reference, and the lookup is a linear scan over the words placed so
//! far in the current batch.

use alloc::vec::Vec;

use log::{debug, trace};

use crate::encoding::{self, MAX_LITERAL_DISP, PIPELINE_BIAS, WORD_SIZE};
use crate::error::AsmError;

/// A literal load waiting for its pool word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LiteralRef {
    /// Byte offset of the load instruction in the output buffer.
    pub insn_offset: usize,
    /// The constant the load should produce.
    pub value: u32,
}

/// Pending literal references plus scratch space for pool layout.
///
/// All vectors are allocated once and reused across flushes and resets.
/// During a resolve `slots[i]` is the pool slot of `refs[i]`.
#[derive(Debug)]
pub(crate) struct LiteralPool {
    refs: Vec<LiteralRef>,
    words: Vec<u32>,
    slots: Vec<usize>,
    capacity: usize,
}

/// Read a little-endian u32 from `code` at `offset`.
fn read_le32(code: &[u8], offset: usize) -> Result<u32, AsmError> {
    match code.get(offset..offset + WORD_SIZE) {
        Some(b) => Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]])),
        None => Err(AsmError::BufferOverflow {
            offset,
            needed: WORD_SIZE,
            capacity: code.len(),
        }),
    }
}

#[inline]
fn write_le32(code: &mut [u8], offset: usize, word: u32) {
    code[offset..offset + WORD_SIZE].copy_from_slice(&word.to_le_bytes());
}

impl LiteralPool {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            refs: Vec::with_capacity(capacity),
            words: Vec::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub(crate) fn refs(&self) -> &[LiteralRef] {
        &self.refs
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.refs.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.refs.len() >= self.capacity
    }

    /// Record a load at `insn_offset` that must read `value`.
    pub(crate) fn push(&mut self, insn_offset: usize, value: u32) -> Result<(), AsmError> {
        if self.is_full() {
            return Err(AsmError::LiteralPoolFull {
                capacity: self.capacity,
            });
        }
        trace!(
            "literal ref #{} @ {}: 0x{:08X}",
            self.refs.len(),
            insn_offset,
            value
        );
        self.refs.push(LiteralRef { insn_offset, value });
        Ok(())
    }

    /// Drop every pending reference without patching. Returns how many were lost.
    pub(crate) fn discard(&mut self) -> usize {
        let n = self.refs.len();
        self.refs.clear();
        self.clear_layout();
        n
    }

    fn clear_layout(&mut self) {
        self.words.clear();
        self.slots.clear();
    }

    /// Slot of `value` in the current layout, appending it if new.
    fn slot_for(&mut self, value: u32) -> usize {
        match self.words.iter().position(|&w| w == value) {
            Some(slot) => slot,
            None => {
                self.words.push(value);
                self.words.len() - 1
            }
        }
    }

    /// Lay out the pending batch as a pool at `pool_start` and patch every load.
    ///
    /// The whole batch is validated before the first byte is written: on
    /// error `code` is untouched and the references stay pending. On success
    /// the batch is consumed and the pool size in bytes is returned.
    pub(crate) fn resolve(&mut self, code: &mut [u8], pool_start: usize) -> Result<usize, AsmError> {
        if self.refs.is_empty() {
            return Ok(0);
        }

        self.clear_layout();
        for i in 0..self.refs.len() {
            let r = self.refs[i];
            let slot = self.slot_for(r.value);
            self.slots.push(slot);
            let disp = Self::displacement(pool_start, slot, r.insn_offset);
            if disp.unsigned_abs() > MAX_LITERAL_DISP as u64 {
                self.clear_layout();
                return Err(AsmError::LiteralOutOfRange {
                    offset: r.insn_offset,
                    disp,
                    max: MAX_LITERAL_DISP,
                });
            }
            if let Err(e) = read_le32(code, r.insn_offset) {
                self.clear_layout();
                return Err(e);
            }
        }

        let pool_len = self.words.len() * WORD_SIZE;
        if pool_start + pool_len > code.len() {
            self.clear_layout();
            return Err(AsmError::BufferOverflow {
                offset: pool_start,
                needed: pool_len,
                capacity: code.len(),
            });
        }

        for (slot, &value) in self.words.iter().enumerate() {
            write_le32(code, pool_start + slot * WORD_SIZE, value);
        }

        for (r, &slot) in self.refs.iter().zip(&self.slots) {
            let disp = Self::displacement(pool_start, slot, r.insn_offset);
            let word = read_le32(code, r.insn_offset)?;
            let patched = encoding::patch_ldr_literal(word, disp);
            trace!(
                "patch ldr @ {}: 0x{:08X} -> 0x{:08X} (slot {}, disp {})",
                r.insn_offset,
                word,
                patched,
                slot,
                disp
            );
            write_le32(code, r.insn_offset, patched);
        }

        debug!(
            "literal pool @ {}: {} refs, {} words",
            pool_start,
            self.refs.len(),
            self.words.len()
        );

        self.refs.clear();
        self.clear_layout();
        Ok(pool_len)
    }

    /// Byte distance from a load's pipeline-adjusted PC to pool slot `slot`.
    #[inline]
    fn displacement(pool_start: usize, slot: usize, insn_offset: usize) -> i64 {
        let slot_offset = (pool_start + slot * WORD_SIZE) as i64;
        slot_offset - (insn_offset as i64 + PIPELINE_BIAS)
    }
}
