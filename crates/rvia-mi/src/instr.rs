//! Machine instruction.

use std::fmt::{self, Display};
use std::marker::PhantomData;

use rvia_isa::{OpInfo, Opcode, OperandLayout, Register, Xlen};

use crate::{MemOperand, Operand};

/// One machine instruction for target `X`.
///
/// Immutable once built. Operands are in assembly order: the defined (or
/// stored) value first, then sources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachineInstr<X: Xlen> {
    opcode: Opcode,
    operands: Vec<Operand>,
    mem_operands: Vec<MemOperand>,
    _xlen: PhantomData<X>,
}

impl<X: Xlen> MachineInstr<X> {
    pub(crate) const fn new(
        opcode: Opcode,
        operands: Vec<Operand>,
        mem_operands: Vec<MemOperand>,
    ) -> Self {
        Self {
            opcode,
            operands,
            mem_operands,
            _xlen: PhantomData,
        }
    }

    #[inline]
    #[must_use]
    pub const fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Static description of the opcode.
    #[inline]
    #[must_use]
    pub fn info(&self) -> &'static OpInfo {
        self.opcode.info()
    }

    #[inline]
    #[must_use]
    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    /// Operand at `index`, if present.
    #[inline]
    #[must_use]
    pub fn operand(&self, index: usize) -> Option<&Operand> {
        self.operands.get(index)
    }

    #[inline]
    #[must_use]
    pub fn num_operands(&self) -> usize {
        self.operands.len()
    }

    #[inline]
    #[must_use]
    pub fn mem_operands(&self) -> &[MemOperand] {
        &self.mem_operands
    }

    /// Register defined by this instruction, if any.
    #[must_use]
    pub fn defined_reg(&self) -> Option<Register> {
        if self.info().defines_operand0() {
            self.operands.first().and_then(Operand::reg)
        } else {
            None
        }
    }

    #[must_use]
    pub fn may_load(&self) -> bool {
        self.info().may_load() || self.mem_operands.iter().any(|m| m.kind.is_load())
    }

    #[must_use]
    pub fn may_store(&self) -> bool {
        self.info().may_store() || self.mem_operands.iter().any(|m| m.kind.is_store())
    }
}

impl<X: Xlen> Display for MachineInstr<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.opcode.mnemonic();
        match (self.info().layout, self.operands.as_slice()) {
            (OperandLayout::ValueBaseOffset, [value, base, offset]) => {
                write!(f, "{name} {value}, {offset}({base})")
            }
            (OperandLayout::VectorUnitStride, [vd, base]) => write!(f, "{name} {vd}, ({base})"),
            (
                OperandLayout::VectorStrided | OperandLayout::VectorIndexed,
                [vd, base, extra],
            ) => write!(f, "{name} {vd}, ({base}), {extra}"),
            (_, operands) => {
                f.write_str(name)?;
                for (i, op) in operands.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{sep}{op}")?;
                }
                Ok(())
            }
        }
    }
}
