//! Writer configuration.

use crate::os::TargetOs;

/// Default number of literal references a writer can hold between flushes.
pub const MAX_LITERAL_COUNT: usize = 100;

/// Construction-time settings for an [`ArmWriter`](crate::ArmWriter).
///
/// # Examples
///
/// ```
/// use arm_writer::{ArmWriter, TargetOs, WriterConfig};
///
/// let mut code = [0u8; 64];
/// let config = WriterConfig {
///     max_literal_refs: 8,
///     ..WriterConfig::new(TargetOs::Android)
/// };
/// let w = ArmWriter::with_config(&mut code, 0x1000, config);
/// assert_eq!(w.target_os(), TargetOs::Android);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriterConfig {
    /// Operating system the emitted code targets.
    pub target_os: TargetOs,
    /// Maximum pending literal references per flush batch.
    /// Zero is accepted and makes every literal load fail.
    pub max_literal_refs: usize,
}

impl WriterConfig {
    /// Configuration for `target_os` with the default literal capacity.
    #[must_use]
    pub const fn new(target_os: TargetOs) -> Self {
        Self {
            target_os,
            max_literal_refs: MAX_LITERAL_COUNT,
        }
    }
}
