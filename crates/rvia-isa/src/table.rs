//! Opcode classification table.
//!
//! Each opcode maps to an [`OpInfo`] describing what it does, how its
//! operands are laid out, and how it touches memory. Analyses dispatch on
//! this table instead of matching opcodes directly, so adding an addressing
//! form is a table edit.

use crate::{Opcode, RegFile, Xlen};

/// Coarse instruction class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpClass {
    /// Full-width add-immediate: `rd = rs1 + imm` with no truncation.
    AddImm,
    /// Other full-width register-immediate arithmetic.
    Alu,
    /// 32-bit arithmetic whose result is sign-extended to XLEN (RV64 `*W`).
    AluNarrow,
    /// Upper-immediate materialization (`lui`, `auipc`).
    UpperImm,
    /// Floating-point sign injection (register move when sources match).
    FpSignInject,
    /// Scalar load.
    Load,
    /// Scalar store.
    Store,
    /// Vector load.
    VectorLoad,
    /// Vector store.
    VectorStore,
}

/// Explicit operand layout, in assembly order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperandLayout {
    /// `rd, imm`
    RegImm,
    /// `rd, rs1, imm`
    RegRegImm,
    /// `rd, rs1, rs2`
    RegRegReg,
    /// `value, base, offset`: the loaded/stored register, then `offset(base)`.
    ValueBaseOffset,
    /// `vd, (base)`
    VectorUnitStride,
    /// `vd, (base), stride`
    VectorStrided,
    /// `vd, (base), vindex`
    VectorIndexed,
}

impl OperandLayout {
    /// Number of explicit operands.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::RegImm | Self::VectorUnitStride => 2,
            Self::RegRegImm
            | Self::RegRegReg
            | Self::ValueBaseOffset
            | Self::VectorStrided
            | Self::VectorIndexed => 3,
        }
    }

    /// Operand index of the memory base, if the layout addresses memory.
    #[must_use]
    pub const fn base_index(self) -> Option<usize> {
        match self {
            Self::ValueBaseOffset
            | Self::VectorUnitStride
            | Self::VectorStrided
            | Self::VectorIndexed => Some(1),
            Self::RegImm | Self::RegRegImm | Self::RegRegReg => None,
        }
    }

    /// Operand index of the fixed immediate offset, if the layout has one.
    #[must_use]
    pub const fn offset_index(self) -> Option<usize> {
        match self {
            Self::ValueBaseOffset => Some(2),
            _ => None,
        }
    }
}

/// How an opcode accesses memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemAccess {
    /// Does not access memory.
    None,
    /// One fixed-width access at `base + offset`.
    Scalar { width: u8 },
    /// Vector-length-dependent access; `eew` is the element (or index) width in bytes.
    Vector { eew: u8 },
}

/// Static description of an opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpInfo {
    pub opcode: Opcode,
    pub class: OpClass,
    pub layout: OperandLayout,
    pub mem: MemAccess,
    /// Register file of operand 0 (the defined or stored value).
    pub value_file: RegFile,
    /// Only exists on RV64.
    pub rv64_only: bool,
}

impl OpInfo {
    #[must_use]
    pub const fn may_load(&self) -> bool {
        matches!(self.class, OpClass::Load | OpClass::VectorLoad)
    }

    #[must_use]
    pub const fn may_store(&self) -> bool {
        matches!(self.class, OpClass::Store | OpClass::VectorStore)
    }

    #[must_use]
    pub const fn is_vector(&self) -> bool {
        matches!(self.mem, MemAccess::Vector { .. })
    }

    /// Byte width of a fixed-size scalar access.
    #[must_use]
    pub const fn scalar_width(&self) -> Option<u8> {
        match self.mem {
            MemAccess::Scalar { width } => Some(width),
            MemAccess::None | MemAccess::Vector { .. } => None,
        }
    }

    /// Whether operand 0 is defined (written) rather than read.
    #[must_use]
    pub const fn defines_operand0(&self) -> bool {
        !self.may_store()
    }

    /// Whether the opcode exists on the given register width.
    #[must_use]
    pub fn is_available<X: Xlen>(&self) -> bool {
        !self.rv64_only || X::is_64bit()
    }
}

const fn add_imm(opcode: Opcode) -> OpInfo {
    OpInfo {
        class: OpClass::AddImm,
        ..alu(opcode)
    }
}

const fn alu(opcode: Opcode) -> OpInfo {
    OpInfo {
        opcode,
        class: OpClass::Alu,
        layout: OperandLayout::RegRegImm,
        mem: MemAccess::None,
        value_file: RegFile::Gpr,
        rv64_only: false,
    }
}

const fn alu_w(opcode: Opcode) -> OpInfo {
    OpInfo {
        opcode,
        class: OpClass::AluNarrow,
        layout: OperandLayout::RegRegImm,
        mem: MemAccess::None,
        value_file: RegFile::Gpr,
        rv64_only: true,
    }
}

const fn upper(opcode: Opcode) -> OpInfo {
    OpInfo {
        opcode,
        class: OpClass::UpperImm,
        layout: OperandLayout::RegImm,
        mem: MemAccess::None,
        value_file: RegFile::Gpr,
        rv64_only: false,
    }
}

const fn fsgnj(opcode: Opcode) -> OpInfo {
    OpInfo {
        opcode,
        class: OpClass::FpSignInject,
        layout: OperandLayout::RegRegReg,
        mem: MemAccess::None,
        value_file: RegFile::Fpr,
        rv64_only: false,
    }
}

const fn scalar(opcode: Opcode, class: OpClass, width: u8, value_file: RegFile) -> OpInfo {
    OpInfo {
        opcode,
        class,
        layout: OperandLayout::ValueBaseOffset,
        mem: MemAccess::Scalar { width },
        value_file,
        rv64_only: false,
    }
}

const fn load(opcode: Opcode, width: u8) -> OpInfo {
    scalar(opcode, OpClass::Load, width, RegFile::Gpr)
}

const fn store(opcode: Opcode, width: u8) -> OpInfo {
    scalar(opcode, OpClass::Store, width, RegFile::Gpr)
}

const fn fp_load(opcode: Opcode, width: u8) -> OpInfo {
    scalar(opcode, OpClass::Load, width, RegFile::Fpr)
}

const fn fp_store(opcode: Opcode, width: u8) -> OpInfo {
    scalar(opcode, OpClass::Store, width, RegFile::Fpr)
}

const fn rv64(info: OpInfo) -> OpInfo {
    OpInfo {
        rv64_only: true,
        ..info
    }
}

const fn vector(opcode: Opcode, class: OpClass, layout: OperandLayout, eew: u8) -> OpInfo {
    OpInfo {
        opcode,
        class,
        layout,
        mem: MemAccess::Vector { eew },
        value_file: RegFile::Vr,
        rv64_only: false,
    }
}

const fn vl(opcode: Opcode, layout: OperandLayout, eew: u8) -> OpInfo {
    vector(opcode, OpClass::VectorLoad, layout, eew)
}

const fn vs(opcode: Opcode, layout: OperandLayout, eew: u8) -> OpInfo {
    vector(opcode, OpClass::VectorStore, layout, eew)
}

use OperandLayout::{VectorIndexed as Idx, VectorStrided as Str, VectorUnitStride as Unit};

/// Table-driven `OpInfo`, indexed by [`Opcode::index`].
static OP_INFO: [OpInfo; Opcode::COUNT] = [
    upper(Opcode::Lui),
    upper(Opcode::Auipc),
    load(Opcode::Lb, 1),
    load(Opcode::Lh, 2),
    load(Opcode::Lw, 4),
    load(Opcode::Lbu, 1),
    load(Opcode::Lhu, 2),
    store(Opcode::Sb, 1),
    store(Opcode::Sh, 2),
    store(Opcode::Sw, 4),
    add_imm(Opcode::Addi),
    alu(Opcode::Slti),
    alu(Opcode::Sltiu),
    alu(Opcode::Xori),
    alu(Opcode::Ori),
    alu(Opcode::Andi),
    alu(Opcode::Slli),
    alu(Opcode::Srli),
    alu(Opcode::Srai),
    // RV64I
    rv64(load(Opcode::Ld, 8)),
    rv64(load(Opcode::Lwu, 4)),
    rv64(store(Opcode::Sd, 8)),
    alu_w(Opcode::Addiw),
    alu_w(Opcode::Slliw),
    alu_w(Opcode::Srliw),
    alu_w(Opcode::Sraiw),
    // F/D/Q/Zfh
    fp_load(Opcode::Flh, 2),
    fp_load(Opcode::Flw, 4),
    fp_load(Opcode::Fld, 8),
    fp_load(Opcode::Flq, 16),
    fp_store(Opcode::Fsh, 2),
    fp_store(Opcode::Fsw, 4),
    fp_store(Opcode::Fsd, 8),
    fp_store(Opcode::Fsq, 16),
    fsgnj(Opcode::FsgnjH),
    fsgnj(Opcode::FsgnjS),
    fsgnj(Opcode::FsgnjD),
    // V unit-stride
    vl(Opcode::Vle8V, Unit, 1),
    vl(Opcode::Vle16V, Unit, 2),
    vl(Opcode::Vle32V, Unit, 4),
    vl(Opcode::Vle64V, Unit, 8),
    vs(Opcode::Vse8V, Unit, 1),
    vs(Opcode::Vse16V, Unit, 2),
    vs(Opcode::Vse32V, Unit, 4),
    vs(Opcode::Vse64V, Unit, 8),
    // V strided
    vl(Opcode::Vlse8V, Str, 1),
    vl(Opcode::Vlse16V, Str, 2),
    vl(Opcode::Vlse32V, Str, 4),
    vl(Opcode::Vlse64V, Str, 8),
    vs(Opcode::Vsse8V, Str, 1),
    vs(Opcode::Vsse16V, Str, 2),
    vs(Opcode::Vsse32V, Str, 4),
    vs(Opcode::Vsse64V, Str, 8),
    // V indexed
    vl(Opcode::Vluxei8V, Idx, 1),
    vl(Opcode::Vluxei16V, Idx, 2),
    vl(Opcode::Vluxei32V, Idx, 4),
    vl(Opcode::Vluxei64V, Idx, 8),
    vl(Opcode::Vloxei8V, Idx, 1),
    vl(Opcode::Vloxei16V, Idx, 2),
    vl(Opcode::Vloxei32V, Idx, 4),
    vl(Opcode::Vloxei64V, Idx, 8),
    vs(Opcode::Vsuxei8V, Idx, 1),
    vs(Opcode::Vsuxei16V, Idx, 2),
    vs(Opcode::Vsuxei32V, Idx, 4),
    vs(Opcode::Vsuxei64V, Idx, 8),
    vs(Opcode::Vsoxei8V, Idx, 1),
    vs(Opcode::Vsoxei16V, Idx, 2),
    vs(Opcode::Vsoxei32V, Idx, 4),
    vs(Opcode::Vsoxei64V, Idx, 8),
];

/// Look up the static description of an opcode.
#[inline]
#[must_use]
pub fn op_info(opcode: Opcode) -> &'static OpInfo {
    &OP_INFO[opcode.index()]
}

impl Opcode {
    /// Static description of this opcode.
    #[inline]
    #[must_use]
    pub fn info(self) -> &'static OpInfo {
        op_info(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rv32, Rv64};

    #[test]
    fn test_table_order_matches_opcodes() {
        for &op in Opcode::ALL {
            assert_eq!(op_info(op).opcode, op, "table entry out of order for {op}");
        }
    }

    #[test]
    fn test_layout_arity_consistent() {
        for &op in Opcode::ALL {
            let info = op.info();
            if let Some(base) = info.layout.base_index() {
                assert!(base < info.layout.arity());
            }
            if let Some(offset) = info.layout.offset_index() {
                assert!(offset < info.layout.arity());
            }
        }
    }

    #[test]
    fn test_scalar_widths() {
        let expected = [
            (Opcode::Lb, 1),
            (Opcode::Lbu, 1),
            (Opcode::Sb, 1),
            (Opcode::Lh, 2),
            (Opcode::Sh, 2),
            (Opcode::Flh, 2),
            (Opcode::Lw, 4),
            (Opcode::Lwu, 4),
            (Opcode::Fsw, 4),
            (Opcode::Ld, 8),
            (Opcode::Fsd, 8),
            (Opcode::Flq, 16),
            (Opcode::Fsq, 16),
        ];
        for (op, width) in expected {
            assert_eq!(op.info().scalar_width(), Some(width), "{op}");
        }
        assert_eq!(Opcode::Addi.info().scalar_width(), None);
        assert_eq!(Opcode::Vle32V.info().scalar_width(), None);
    }

    #[test]
    fn test_memory_classes() {
        assert!(Opcode::Lw.info().may_load());
        assert!(!Opcode::Lw.info().may_store());
        assert!(Opcode::Fsw.info().may_store());
        assert!(!Opcode::Fsw.info().defines_operand0());
        assert!(Opcode::Vluxei32V.info().may_load());
        assert!(Opcode::Vluxei32V.info().is_vector());
        assert!(!Opcode::Addi.info().may_load());
        assert!(!Opcode::Addi.info().may_store());
    }

    #[test]
    fn test_add_immediate_class() {
        let add_imm: Vec<_> = Opcode::ALL
            .iter()
            .filter(|op| op.info().class == OpClass::AddImm)
            .collect();
        assert_eq!(add_imm, [&Opcode::Addi]);
        assert_eq!(Opcode::Addiw.info().class, OpClass::AluNarrow);
    }

    #[test]
    fn test_availability() {
        assert!(Opcode::Addi.info().is_available::<Rv32>());
        assert!(!Opcode::Ld.info().is_available::<Rv32>());
        assert!(!Opcode::Addiw.info().is_available::<Rv32>());
        assert!(Opcode::Addiw.info().is_available::<Rv64>());
        assert!(Opcode::Fld.info().is_available::<Rv32>());
    }
}
