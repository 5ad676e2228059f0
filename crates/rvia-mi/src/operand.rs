//! Machine operands.

use std::fmt::{self, Display};
use std::sync::Arc;

use rvia_isa::Register;

/// One explicit operand of a machine instruction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    /// A physical or virtual register.
    Reg(Register),
    /// A sign-extended immediate.
    Imm(i64),
    /// Abstract stack slot, resolved to `sp`/`fp` + offset after frame lowering.
    FrameIndex(i32),
    /// Symbol reference with a constant addend.
    Global { symbol: Arc<str>, offset: i64 },
    /// Anything the analyses do not model (e.g. rounding modes, metadata).
    Other(u64),
}

impl Operand {
    /// Register held by this operand.
    #[must_use]
    pub const fn reg(&self) -> Option<Register> {
        match *self {
            Self::Reg(reg) => Some(reg),
            _ => None,
        }
    }

    /// Immediate held by this operand.
    #[must_use]
    pub const fn imm(&self) -> Option<i64> {
        match *self {
            Self::Imm(imm) => Some(imm),
            _ => None,
        }
    }

    /// Short kind name for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Reg(_) => "register",
            Self::Imm(_) => "immediate",
            Self::FrameIndex(_) => "frame-index",
            Self::Global { .. } => "global",
            Self::Other(_) => "other",
        }
    }
}

impl From<Register> for Operand {
    fn from(reg: Register) -> Self {
        Self::Reg(reg)
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reg(reg) => write!(f, "{reg}"),
            Self::Imm(imm) => write!(f, "{imm}"),
            Self::FrameIndex(fi) => write!(f, "%stack.{fi}"),
            Self::Global { symbol, offset: 0 } => write!(f, "@{symbol}"),
            Self::Global { symbol, offset } => write!(f, "@{symbol}{offset:+}"),
            Self::Other(raw) => write!(f, "<{raw:#x}>"),
        }
    }
}
