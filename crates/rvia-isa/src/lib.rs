//! RISC-V opcodes, registers, and opcode classification.
//!
//! This crate holds the leaf data the instruction analyses key on: the
//! opcode enumeration, the register files, and a static table describing
//! each opcode's class, operand layout, and memory access width.

mod encode;
mod opcode;
mod reg;
mod table;
mod xlen;

pub use encode::*;
pub use opcode::*;
pub use reg::*;
pub use table::*;
pub use xlen::*;
