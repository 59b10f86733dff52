//! Fatal condition types for the CPU core.

use thiserror::Error;

/// A condition that halts forward progress of the CPU in a well-defined,
/// non-panicking way. The host reads this via `Cpu::is_fatal()` after a
/// `step()` rather than via the `Result` returned by `step()` itself, since
/// `step()` always returns a cycle count once latched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FaultKind {
    #[error("invalid opcode {0:#04X} at PC={1:#06X}")]
    InvalidOpcode(u8, u16),
}
