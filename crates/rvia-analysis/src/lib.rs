//! Target instruction queries for RISC-V.
//!
//! Target-agnostic passes (alias analysis, load/store clustering, peephole
//! folding) ask these questions through [`TargetInstrInfo`]; [`RiscvInstrInfo`]
//! answers them from the opcode classification table. Every query is pure
//! and answers "no result" whenever the instruction is not one it fully
//! understands.

mod info;
mod riscv;

pub use info::*;
pub use riscv::*;
