//! RISC-V implementation of the instruction queries.

use std::marker::PhantomData;

use rvia_isa::{MemAccess, OpClass, OpInfo, RegFile, Register, Xlen};
use rvia_mi::{MachineInstr, Operand};
use tracing::trace;

use crate::{DestSourcePair, MemOperandInfo, RegImmPair, StackSlotAccess, TargetInstrInfo};

/// Instruction queries for RV32 or RV64.
///
/// Stateless: all answers come from the instruction and the static opcode
/// table, so one value can be shared freely across threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct RiscvInstrInfo<X: Xlen> {
    _xlen: PhantomData<X>,
}

impl<X: Xlen> RiscvInstrInfo<X> {
    #[must_use]
    pub const fn new() -> Self {
        Self { _xlen: PhantomData }
    }

    /// Opcode description, if the opcode exists on this target.
    fn target_info(mi: &MachineInstr<X>) -> Option<&'static OpInfo> {
        let info = mi.info();
        if info.is_available::<X>() {
            Some(info)
        } else {
            trace!(opcode = %mi.opcode(), target = X::NAME, "opcode not available");
            None
        }
    }

    /// Scalar `value, offset(base)` access whose base is a stack slot at offset 0.
    fn stack_slot_access(mi: &MachineInstr<X>, info: &OpInfo) -> Option<StackSlotAccess> {
        let width = info.scalar_width()?;
        let [Operand::Reg(reg), Operand::FrameIndex(frame_index), Operand::Imm(0)] =
            mi.operands()
        else {
            return None;
        };
        Some(StackSlotAccess {
            reg: *reg,
            frame_index: *frame_index,
            width: u64::from(width),
        })
    }
}

impl<X: Xlen> TargetInstrInfo<X> for RiscvInstrInfo<X> {
    fn is_add_immediate(&self, mi: &MachineInstr<X>, reg: Register) -> Option<RegImmPair> {
        if mi.operand(0)?.reg()? != reg {
            return None;
        }
        // Narrowing adds (ADDIW) truncate and sign-extend, so only the
        // full-width form qualifies.
        let info = Self::target_info(mi)?;
        if info.class != OpClass::AddImm {
            return None;
        }
        let [_, Operand::Reg(source), Operand::Imm(imm)] = mi.operands() else {
            trace!(opcode = %mi.opcode(), "add-immediate operand shape mismatch");
            return None;
        };
        Some(RegImmPair {
            reg: *source,
            imm: *imm,
        })
    }

    fn get_mem_operands_with_offset_width<'a>(
        &self,
        mi: &'a MachineInstr<X>,
    ) -> Option<MemOperandInfo<'a>> {
        let info = Self::target_info(mi)?;
        let width = match info.mem {
            MemAccess::Scalar { width } => width,
            MemAccess::Vector { .. } => {
                // Scalable offsets cannot be expressed as a fixed offset.
                trace!(opcode = %mi.opcode(), "vector memory access not supported");
                return None;
            }
            MemAccess::None => return None,
        };

        let layout = info.layout;
        let (Some(base_index), Some(offset_index)) = (layout.base_index(), layout.offset_index())
        else {
            return None;
        };
        if mi.num_operands() != layout.arity() {
            trace!(
                opcode = %mi.opcode(),
                expected = layout.arity(),
                actual = mi.num_operands(),
                "memory operand count mismatch"
            );
            return None;
        }

        let base = mi.operand(base_index)?;
        // TODO: frame-index bases could be reported once callers can consume
        // non-register base operands.
        if base.reg().map(Register::file) != Some(RegFile::Gpr) {
            trace!(opcode = %mi.opcode(), base = %base, "base is not an integer register");
            return None;
        }
        let Some(offset) = mi.operand(offset_index)?.imm() else {
            trace!(opcode = %mi.opcode(), "non-immediate offset");
            return None;
        };

        Some(MemOperandInfo {
            base_ops: vec![base],
            offset,
            offset_is_scalable: false,
            width: u64::from(width),
        })
    }

    fn is_copy_instr(&self, mi: &MachineInstr<X>) -> Option<DestSourcePair> {
        let info = Self::target_info(mi)?;
        match (info.class, mi.operands()) {
            (OpClass::AddImm, [Operand::Reg(dest), Operand::Reg(source), Operand::Imm(0)]) => {
                Some(DestSourcePair {
                    dest: *dest,
                    source: *source,
                })
            }
            (
                OpClass::FpSignInject,
                [Operand::Reg(dest), Operand::Reg(rs1), Operand::Reg(rs2)],
            ) if rs1 == rs2 => Some(DestSourcePair {
                dest: *dest,
                source: *rs1,
            }),
            _ => None,
        }
    }

    fn is_load_from_stack_slot(&self, mi: &MachineInstr<X>) -> Option<StackSlotAccess> {
        let info = Self::target_info(mi)?;
        if !mi.may_load() || mi.may_store() {
            return None;
        }
        Self::stack_slot_access(mi, info)
    }

    fn is_store_to_stack_slot(&self, mi: &MachineInstr<X>) -> Option<StackSlotAccess> {
        let info = Self::target_info(mi)?;
        if !mi.may_store() || mi.may_load() {
            return None;
        }
        Self::stack_slot_access(mi, info)
    }
}

#[cfg(test)]
mod tests {
    use rvia_isa::{Opcode, Rv32, Rv64};
    use rvia_mi::{AccessKind, InstrBuilder, MemOperand};

    use super::*;

    fn addi<X: Xlen>(rd: Register, rs: Register, imm: i64) -> MachineInstr<X> {
        InstrBuilder::new(Opcode::Addi)
            .def(rd)
            .reg(rs)
            .imm(imm)
            .build()
            .unwrap()
    }

    #[test]
    fn test_add_immediate_shape_mismatch() {
        let tii = RiscvInstrInfo::<Rv64>::new();
        // Symbolic low part (%lo) instead of an immediate.
        let mi = InstrBuilder::<Rv64>::new(Opcode::Addi)
            .def(Register::x(1))
            .reg(Register::x(2))
            .global("table", 0)
            .build_unchecked();
        assert_eq!(tii.is_add_immediate(&mi, Register::x(1)), None);
    }

    #[test]
    fn test_add_immediate_virtual_registers() {
        let tii = RiscvInstrInfo::<Rv32>::new();
        let dst = Register::virt(RegFile::Gpr, 0);
        let src = Register::virt(RegFile::Gpr, 1);
        let mi = addi::<Rv32>(dst, src, 2047);
        assert_eq!(
            tii.is_add_immediate(&mi, dst),
            Some(RegImmPair {
                reg: src,
                imm: 2047
            })
        );
    }

    #[test]
    fn test_mem_operands_shape_mismatch() {
        let tii = RiscvInstrInfo::<Rv64>::new();
        let missing_offset = InstrBuilder::<Rv64>::new(Opcode::Lw)
            .def(Register::x(1))
            .reg(Register::x(2))
            .build_unchecked();
        assert!(tii.get_mem_operands_with_offset_width(&missing_offset).is_none());

        let symbolic_offset = InstrBuilder::<Rv64>::new(Opcode::Lw)
            .def(Register::x(1))
            .reg(Register::x(2))
            .global("table", 0)
            .build()
            .unwrap();
        assert!(tii.get_mem_operands_with_offset_width(&symbolic_offset).is_none());
    }

    #[test]
    fn test_mem_operands_base_register_file() {
        let tii = RiscvInstrInfo::<Rv64>::new();
        // lw x1, 4(f2)
        let fpr_base = InstrBuilder::<Rv64>::new(Opcode::Lw)
            .def(Register::x(1))
            .reg(Register::f(2))
            .imm(4)
            .build_unchecked();
        assert!(tii.get_mem_operands_with_offset_width(&fpr_base).is_none());
        assert!(tii.get_mem_operand_with_offset_width(&fpr_base).is_none());

        let vr_base = InstrBuilder::<Rv64>::new(Opcode::Fsw)
            .reg(Register::f(1))
            .reg(Register::v(2))
            .imm(0)
            .build_unchecked();
        assert!(tii.get_mem_operands_with_offset_width(&vr_base).is_none());

        let virtual_base = InstrBuilder::<Rv64>::new(Opcode::Lw)
            .def(Register::x(1))
            .reg(Register::virt(RegFile::Gpr, 7))
            .imm(4)
            .build()
            .unwrap();
        let info = tii.get_mem_operands_with_offset_width(&virtual_base).unwrap();
        assert_eq!(info.base_ops, [&Operand::Reg(Register::virt(RegFile::Gpr, 7))]);
    }

    #[test]
    fn test_mem_operands_width_from_opcode() {
        let tii = RiscvInstrInfo::<Rv64>::new();
        // Descriptor disagrees with the opcode; the opcode wins.
        let mi = InstrBuilder::<Rv64>::new(Opcode::Ld)
            .def(Register::x(1))
            .reg(Register::SP)
            .imm(8)
            .mem_operand(MemOperand::load(4))
            .build()
            .unwrap();
        let info = tii.get_mem_operands_with_offset_width(&mi).unwrap();
        assert_eq!(info.width, 8);

        // No descriptor at all.
        let mi = InstrBuilder::<Rv64>::new(Opcode::Fsq)
            .reg(Register::f(1))
            .reg(Register::SP)
            .imm(-16)
            .build()
            .unwrap();
        let info = tii.get_mem_operands_with_offset_width(&mi).unwrap();
        assert_eq!(info.width, 16);
        assert_eq!(info.offset, -16);
    }

    #[test]
    fn test_rv64_only_opcodes_rejected_on_rv32() {
        let tii = RiscvInstrInfo::<Rv32>::new();
        let mi = InstrBuilder::<Rv32>::new(Opcode::Sd)
            .reg(Register::x(1))
            .reg(Register::SP)
            .imm(0)
            .build()
            .unwrap();
        assert!(tii.get_mem_operands_with_offset_width(&mi).is_none());
    }

    #[test]
    fn test_copy_instr() {
        let tii = RiscvInstrInfo::<Rv64>::new();
        let mv = addi::<Rv64>(Register::x(10), Register::x(11), 0);
        assert_eq!(
            tii.is_copy_instr(&mv),
            Some(DestSourcePair {
                dest: Register::x(10),
                source: Register::x(11),
            })
        );
        assert_eq!(
            tii.is_copy_instr(&addi::<Rv64>(Register::x(10), Register::x(11), 1)),
            None
        );

        let fmv = InstrBuilder::<Rv64>::new(Opcode::FsgnjD)
            .def(Register::f(10))
            .reg(Register::f(11))
            .reg(Register::f(11))
            .build()
            .unwrap();
        assert_eq!(
            tii.is_copy_instr(&fmv),
            Some(DestSourcePair {
                dest: Register::f(10),
                source: Register::f(11),
            })
        );

        let fsgnj = InstrBuilder::<Rv64>::new(Opcode::FsgnjS)
            .def(Register::f(10))
            .reg(Register::f(11))
            .reg(Register::f(12))
            .build()
            .unwrap();
        assert_eq!(tii.is_copy_instr(&fsgnj), None);
    }

    #[test]
    fn test_stack_slot_access() {
        let tii = RiscvInstrInfo::<Rv64>::new();
        let spill = InstrBuilder::<Rv64>::new(Opcode::Sd)
            .reg(Register::x(9))
            .frame_index(3)
            .imm(0)
            .mem_operand(MemOperand::store(8))
            .build()
            .unwrap();
        assert_eq!(
            tii.is_store_to_stack_slot(&spill),
            Some(StackSlotAccess {
                reg: Register::x(9),
                frame_index: 3,
                width: 8,
            })
        );
        assert_eq!(tii.is_load_from_stack_slot(&spill), None);
        // The core extractor still declines frame-index bases.
        assert!(tii.get_mem_operands_with_offset_width(&spill).is_none());

        let reload = InstrBuilder::<Rv64>::new(Opcode::Fld)
            .def(Register::f(8))
            .frame_index(1)
            .imm(0)
            .build()
            .unwrap();
        assert_eq!(
            tii.is_load_from_stack_slot(&reload),
            Some(StackSlotAccess {
                reg: Register::f(8),
                frame_index: 1,
                width: 8,
            })
        );

        let offset_slot = InstrBuilder::<Rv64>::new(Opcode::Lw)
            .def(Register::x(1))
            .frame_index(1)
            .imm(4)
            .build()
            .unwrap();
        assert_eq!(tii.is_load_from_stack_slot(&offset_slot), None);

        // Read-modify-write descriptor on a load: neither a plain reload nor a spill.
        let rmw = InstrBuilder::<Rv64>::new(Opcode::Lw)
            .def(Register::x(1))
            .frame_index(1)
            .imm(0)
            .mem_operand(MemOperand::new(AccessKind::LoadStore, 4, 4))
            .build()
            .unwrap();
        assert_eq!(tii.is_load_from_stack_slot(&rmw), None);
        assert_eq!(tii.is_store_to_stack_slot(&rmw), None);
    }
}
