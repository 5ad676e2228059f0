//! Target-independent query interface and result types.

use rvia_isa::{Register, Xlen};
use rvia_mi::{MachineInstr, Operand};

/// `reg + imm`, as computed by an add-immediate instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegImmPair {
    pub reg: Register,
    pub imm: i64,
}

/// Destination and source of a register copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DestSourcePair {
    pub dest: Register,
    pub source: Register,
}

/// Address and width of a simple memory access.
///
/// The effective address is the sum of `base_ops` plus `offset`. Every
/// supported access has exactly one register base and a fixed offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemOperandInfo<'a> {
    /// Base operands, never empty.
    pub base_ops: Vec<&'a Operand>,
    pub offset: i64,
    /// Offset is scaled by the runtime vector length.
    pub offset_is_scalable: bool,
    /// Access width in bytes.
    pub width: u64,
}

/// Single-base form of [`MemOperandInfo`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemOperandWithOffset<'a> {
    pub base_op: &'a Operand,
    pub offset: i64,
    pub offset_is_scalable: bool,
    pub width: u64,
}

/// A load or store whose address is an abstract stack slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StackSlotAccess {
    /// Register loaded into or stored from.
    pub reg: Register,
    pub frame_index: i32,
    /// Access width in bytes.
    pub width: u64,
}

/// Instruction queries consumed by target-agnostic passes.
///
/// A `None` or `false` answer means "unknown": callers must assume the
/// worst case and skip the optimization, never treat it as an error.
pub trait TargetInstrInfo<X: Xlen>: Send + Sync {
    /// If `mi` computes `reg = source + imm` in one full-width add, return
    /// `(source, imm)`.
    fn is_add_immediate(&self, mi: &MachineInstr<X>, reg: Register) -> Option<RegImmPair>;

    /// If `mi` is a simple (non-vector) load or store with a register base,
    /// return its base operands, offset, and width.
    fn get_mem_operands_with_offset_width<'a>(
        &self,
        mi: &'a MachineInstr<X>,
    ) -> Option<MemOperandInfo<'a>>;

    /// Like [`TargetInstrInfo::get_mem_operands_with_offset_width`], but only
    /// for accesses with exactly one base operand.
    fn get_mem_operand_with_offset_width<'a>(
        &self,
        mi: &'a MachineInstr<X>,
    ) -> Option<MemOperandWithOffset<'a>> {
        let info = self.get_mem_operands_with_offset_width(mi)?;
        let &[base_op] = info.base_ops.as_slice() else {
            return None;
        };
        Some(MemOperandWithOffset {
            base_op,
            offset: info.offset,
            offset_is_scalable: info.offset_is_scalable,
            width: info.width,
        })
    }

    /// If `mi` is a register-to-register copy, return its operands.
    fn is_copy_instr(&self, _mi: &MachineInstr<X>) -> Option<DestSourcePair> {
        None
    }

    /// If `mi` loads a register directly from a stack slot, describe it.
    fn is_load_from_stack_slot(&self, _mi: &MachineInstr<X>) -> Option<StackSlotAccess> {
        None
    }

    /// If `mi` stores a register directly to a stack slot, describe it.
    fn is_store_to_stack_slot(&self, _mi: &MachineInstr<X>) -> Option<StackSlotAccess> {
        None
    }

    /// Whether two memory accesses provably do not overlap.
    ///
    /// Only accesses off the same register base with fixed offsets are
    /// compared; anything else answers `false`.
    fn are_mem_accesses_trivially_disjoint(
        &self,
        a: &MachineInstr<X>,
        b: &MachineInstr<X>,
    ) -> bool {
        let (Some(ma), Some(mb)) = (
            self.get_mem_operand_with_offset_width(a),
            self.get_mem_operand_with_offset_width(b),
        ) else {
            return false;
        };
        if ma.offset_is_scalable || mb.offset_is_scalable {
            return false;
        }
        let (Some(base_a), Some(base_b)) = (ma.base_op.reg(), mb.base_op.reg()) else {
            return false;
        };
        if base_a != base_b {
            return false;
        }

        let (low, high) = if ma.offset <= mb.offset {
            (ma, mb)
        } else {
            (mb, ma)
        };
        i128::from(low.offset) + i128::from(low.width) <= i128::from(high.offset)
    }
}
