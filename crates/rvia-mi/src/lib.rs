//! Machine instruction model for RISC-V instruction analysis.
//!
//! A [`MachineInstr`] is a read-only view of one instruction: its opcode,
//! its explicit operands in assembly order, and the memory-access
//! descriptors attached to it. Instructions are built with
//! [`InstrBuilder`] or decoded from 32-bit encodings with [`decode`].

mod builder;
mod decode;
mod error;
mod instr;
mod mem;
mod operand;

pub use builder::*;
pub use decode::*;
pub use error::*;
pub use instr::*;
pub use mem::*;
pub use operand::*;
