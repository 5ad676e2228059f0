use rvia_isa::{Opcode, RegFile};
use thiserror::Error;

/// Errors from building a machine instruction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("{opcode}: expected {expected} operands, got {actual}")]
    OperandCount {
        opcode: Opcode,
        expected: usize,
        actual: usize,
    },
    #[error("{opcode}: operand {index} must be a {expected}, got {actual}")]
    OperandKind {
        opcode: Opcode,
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("{opcode}: operand {index} must be a {expected} register, got {actual}")]
    RegisterFile {
        opcode: Opcode,
        index: usize,
        expected: RegFile,
        actual: RegFile,
    },
    #[error("{opcode}: immediate {imm} out of range")]
    ImmediateRange { opcode: Opcode, imm: i64 },
}

/// Errors from decoding a machine instruction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("truncated instruction: {0} bytes available")]
    Truncated(usize),
    #[error("compressed instructions are not supported: {0:#06x}")]
    Compressed(u16),
    #[error("unrecognized encoding {0:#010x}")]
    Unrecognized(u32),
    #[error("{opcode} is not available on {target}")]
    NotAvailable {
        opcode: Opcode,
        target: &'static str,
    },
    #[error("invalid instruction: {0}")]
    Build(#[from] BuildError),
}
