//! Machine instruction builder fluent API.

use std::marker::PhantomData;
use std::sync::Arc;

use rvia_isa::{
    OpClass, Opcode, OperandLayout, RegFile, Register, Xlen, fits_simm12, fits_uimm20,
};

use crate::{BuildError, MachineInstr, MemOperand, Operand};

/// Builder for machine instructions.
///
/// Operands are appended in assembly order. [`InstrBuilder::build`] checks
/// them against the opcode's operand layout.
#[derive(Clone, Debug)]
pub struct InstrBuilder<X: Xlen> {
    opcode: Opcode,
    operands: Vec<Operand>,
    mem_operands: Vec<MemOperand>,
    _xlen: PhantomData<X>,
}

impl<X: Xlen> InstrBuilder<X> {
    /// Create a new builder for `opcode`.
    #[must_use]
    pub const fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            operands: Vec::new(),
            mem_operands: Vec::new(),
            _xlen: PhantomData,
        }
    }

    /// Add the defined register. Must be the first operand.
    #[must_use]
    pub fn def(self, reg: Register) -> Self {
        debug_assert!(self.operands.is_empty(), "def must be the first operand");
        self.operand(Operand::Reg(reg))
    }

    /// Add a register use.
    #[must_use]
    pub fn reg(self, reg: Register) -> Self {
        self.operand(Operand::Reg(reg))
    }

    /// Add an immediate.
    #[must_use]
    pub fn imm(self, imm: i64) -> Self {
        self.operand(Operand::Imm(imm))
    }

    /// Add an abstract stack slot reference.
    #[must_use]
    pub fn frame_index(self, fi: i32) -> Self {
        self.operand(Operand::FrameIndex(fi))
    }

    /// Add a symbol reference.
    #[must_use]
    pub fn global(self, symbol: &str, offset: i64) -> Self {
        self.operand(Operand::Global {
            symbol: Arc::from(symbol),
            offset,
        })
    }

    /// Add a raw operand.
    #[must_use]
    pub fn operand(mut self, op: Operand) -> Self {
        self.operands.push(op);
        self
    }

    /// Attach a memory-access descriptor.
    #[must_use]
    pub fn mem_operand(mut self, mmo: MemOperand) -> Self {
        self.mem_operands.push(mmo);
        self
    }

    /// Validate operands against the opcode layout and build.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the operand count, operand kinds, register
    /// files, or immediate ranges do not match the opcode.
    pub fn build(self) -> Result<MachineInstr<X>, BuildError> {
        self.validate()?;
        Ok(MachineInstr::new(self.opcode, self.operands, self.mem_operands))
    }

    /// Build without validation.
    ///
    /// Intended for producers that already guarantee operand shape. The
    /// analyses still treat shape mismatches conservatively.
    #[must_use]
    pub fn build_unchecked(self) -> MachineInstr<X> {
        MachineInstr::new(self.opcode, self.operands, self.mem_operands)
    }

    fn validate(&self) -> Result<(), BuildError> {
        let info = self.opcode.info();
        let expected = info.layout.arity();
        if self.operands.len() != expected {
            return Err(BuildError::OperandCount {
                opcode: self.opcode,
                expected,
                actual: self.operands.len(),
            });
        }

        self.expect_reg(0, info.value_file)?;
        match info.layout {
            OperandLayout::RegImm => self.expect_imm(1, fits_uimm20),
            OperandLayout::RegRegImm => {
                self.expect_reg(1, RegFile::Gpr)?;
                match info.class {
                    OpClass::Alu if is_shift(self.opcode) => {
                        self.expect_imm(2, |imm| (0..i64::from(X::VALUE)).contains(&imm))
                    }
                    OpClass::AluNarrow if is_shift(self.opcode) => {
                        self.expect_imm(2, |imm| (0..32).contains(&imm))
                    }
                    _ => self.expect_imm(2, fits_simm12),
                }
            }
            OperandLayout::RegRegReg => {
                self.expect_reg(1, info.value_file)?;
                self.expect_reg(2, info.value_file)
            }
            OperandLayout::ValueBaseOffset => {
                self.expect_address_base(1)?;
                match &self.operands[2] {
                    Operand::Global { .. } => Ok(()),
                    _ => self.expect_imm(2, fits_simm12),
                }
            }
            OperandLayout::VectorUnitStride => self.expect_reg(1, RegFile::Gpr),
            OperandLayout::VectorStrided => {
                self.expect_reg(1, RegFile::Gpr)?;
                self.expect_reg(2, RegFile::Gpr)
            }
            OperandLayout::VectorIndexed => {
                self.expect_reg(1, RegFile::Gpr)?;
                self.expect_reg(2, RegFile::Vr)
            }
        }
    }

    fn expect_reg(&self, index: usize, file: RegFile) -> Result<(), BuildError> {
        match &self.operands[index] {
            Operand::Reg(reg) if reg.file() == file => Ok(()),
            Operand::Reg(reg) => Err(BuildError::RegisterFile {
                opcode: self.opcode,
                index,
                expected: file,
                actual: reg.file(),
            }),
            other => Err(self.kind_error(index, "register", other)),
        }
    }

    fn expect_imm(&self, index: usize, in_range: impl Fn(i64) -> bool) -> Result<(), BuildError> {
        match &self.operands[index] {
            Operand::Imm(imm) if in_range(*imm) => Ok(()),
            Operand::Imm(imm) => Err(BuildError::ImmediateRange {
                opcode: self.opcode,
                imm: *imm,
            }),
            other => Err(self.kind_error(index, "immediate", other)),
        }
    }

    /// Memory base: an integer register, a stack slot, or a symbol.
    fn expect_address_base(&self, index: usize) -> Result<(), BuildError> {
        match &self.operands[index] {
            Operand::FrameIndex(_) | Operand::Global { .. } => Ok(()),
            _ => self.expect_reg(index, RegFile::Gpr),
        }
    }

    const fn kind_error(&self, index: usize, expected: &'static str, got: &Operand) -> BuildError {
        BuildError::OperandKind {
            opcode: self.opcode,
            index,
            expected,
            actual: got.kind(),
        }
    }
}

const fn is_shift(opcode: Opcode) -> bool {
    matches!(
        opcode,
        Opcode::Slli
            | Opcode::Srli
            | Opcode::Srai
            | Opcode::Slliw
            | Opcode::Srliw
            | Opcode::Sraiw
    )
}
