//! Decode 32-bit RISC-V encodings into machine instructions.
//!
//! Covers the instructions the analyses classify: scalar and FP loads and
//! stores, OP-IMM, OP-IMM-32, LUI/AUIPC, FP sign injection, and vector
//! unit-stride/strided/indexed loads and stores. Scalar memory instructions
//! get a memory descriptor sized by the opcode.

use rvia_isa::{
    Opcode, Register, Xlen, decode_funct3, decode_funct7, decode_i_imm, decode_opcode, decode_rd,
    decode_rs1, decode_rs2, decode_s_imm, decode_u_field, decode_vec_mew, decode_vec_mop,
    decode_vec_nf,
};
use tracing::trace;

use crate::{DecodeError, InstrBuilder, MachineInstr, MemOperand};

/// Decode the instruction at the start of `bytes` (little-endian).
///
/// # Errors
///
/// Returns [`DecodeError`] if the input is truncated, compressed, not a
/// recognized encoding, or uses an opcode unavailable on `X`.
pub fn decode<X: Xlen>(bytes: &[u8]) -> Result<MachineInstr<X>, DecodeError> {
    let [b0, b1, rest @ ..] = bytes else {
        return Err(DecodeError::Truncated(bytes.len()));
    };
    // Compressed if bits [1:0] != 0b11
    if b0 & 0x03 != 0x03 {
        return Err(DecodeError::Compressed(u16::from_le_bytes([*b0, *b1])));
    }
    let [b2, b3, ..] = rest else {
        return Err(DecodeError::Truncated(bytes.len()));
    };
    decode_word(u32::from_le_bytes([*b0, *b1, *b2, *b3]))
}

/// Decode one 32-bit instruction word.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_word<X: Xlen>(instr: u32) -> Result<MachineInstr<X>, DecodeError> {
    let funct3 = decode_funct3(instr);
    let funct7 = decode_funct7(instr);
    let rd = decode_rd(instr);
    let rs1 = decode_rs1(instr);
    let rs2 = decode_rs2(instr);
    let unrecognized = || DecodeError::Unrecognized(instr);

    let builder = match decode_opcode(instr) {
        0x37 => upper::<X>(Opcode::Lui, rd, instr),
        0x17 => upper::<X>(Opcode::Auipc, rd, instr),
        0x03 => {
            let op = decode_load(funct3).ok_or_else(unrecognized)?;
            scalar_load::<X>(op, Register::X(rd), rs1, instr)
        }
        0x23 => {
            let op = decode_store(funct3).ok_or_else(unrecognized)?;
            scalar_store::<X>(op, Register::X(rs2), rs1, instr)
        }
        0x13 => {
            let (op, imm) = decode_op_imm::<X>(funct3, funct7, instr).ok_or_else(unrecognized)?;
            reg_reg_imm::<X>(op, rd, rs1, imm)
        }
        0x1B => {
            let (op, imm) = decode_op_imm_32(funct3, funct7, instr).ok_or_else(unrecognized)?;
            reg_reg_imm::<X>(op, rd, rs1, imm)
        }
        0x07 => match funct3 {
            1..=4 => {
                let op = [Opcode::Flh, Opcode::Flw, Opcode::Fld, Opcode::Flq]
                    [usize::from(funct3 - 1)];
                scalar_load::<X>(op, Register::F(rd), rs1, instr)
            }
            _ => decode_vector::<X>(false, funct3, rd, rs1, rs2, instr).ok_or_else(unrecognized)?,
        },
        0x27 => match funct3 {
            1..=4 => {
                let op = [Opcode::Fsh, Opcode::Fsw, Opcode::Fsd, Opcode::Fsq]
                    [usize::from(funct3 - 1)];
                scalar_store::<X>(op, Register::F(rs2), rs1, instr)
            }
            _ => decode_vector::<X>(true, funct3, rd, rs1, rs2, instr).ok_or_else(unrecognized)?,
        },
        0x53 if funct3 == 0 => {
            let op = match funct7 {
                0x10 => Opcode::FsgnjS,
                0x11 => Opcode::FsgnjD,
                0x12 => Opcode::FsgnjH,
                _ => return Err(unrecognized()),
            };
            InstrBuilder::new(op)
                .def(Register::F(rd))
                .reg(Register::F(rs1))
                .reg(Register::F(rs2))
        }
        _ => return Err(unrecognized()),
    };

    let mi = builder.build()?;
    let opcode = mi.opcode();
    if !opcode.info().is_available::<X>() {
        return Err(DecodeError::NotAvailable {
            opcode,
            target: X::NAME,
        });
    }
    trace!(raw = instr, %opcode, "decoded");
    Ok(mi)
}

fn upper<X: Xlen>(op: Opcode, rd: u8, instr: u32) -> InstrBuilder<X> {
    InstrBuilder::new(op)
        .def(Register::X(rd))
        .imm(i64::from(decode_u_field(instr)))
}

fn reg_reg_imm<X: Xlen>(op: Opcode, rd: u8, rs1: u8, imm: i32) -> InstrBuilder<X> {
    InstrBuilder::new(op)
        .def(Register::X(rd))
        .reg(Register::X(rs1))
        .imm(i64::from(imm))
}

fn scalar_load<X: Xlen>(op: Opcode, value: Register, rs1: u8, instr: u32) -> InstrBuilder<X> {
    let width = op.info().scalar_width().unwrap_or_default();
    InstrBuilder::new(op)
        .def(value)
        .reg(Register::X(rs1))
        .imm(i64::from(decode_i_imm(instr)))
        .mem_operand(MemOperand::load(u64::from(width)))
}

fn scalar_store<X: Xlen>(op: Opcode, value: Register, rs1: u8, instr: u32) -> InstrBuilder<X> {
    let width = op.info().scalar_width().unwrap_or_default();
    InstrBuilder::new(op)
        .reg(value)
        .reg(Register::X(rs1))
        .imm(i64::from(decode_s_imm(instr)))
        .mem_operand(MemOperand::store(u64::from(width)))
}

const fn decode_load(funct3: u8) -> Option<Opcode> {
    Some(match funct3 {
        0 => Opcode::Lb,
        1 => Opcode::Lh,
        2 => Opcode::Lw,
        3 => Opcode::Ld,
        4 => Opcode::Lbu,
        5 => Opcode::Lhu,
        6 => Opcode::Lwu,
        _ => return None,
    })
}

const fn decode_store(funct3: u8) -> Option<Opcode> {
    Some(match funct3 {
        0 => Opcode::Sb,
        1 => Opcode::Sh,
        2 => Opcode::Sw,
        3 => Opcode::Sd,
        _ => return None,
    })
}

fn decode_op_imm<X: Xlen>(funct3: u8, funct7: u8, instr: u32) -> Option<(Opcode, i32)> {
    let shamt = (instr >> 20) & 0x3F;
    let op = match funct3 {
        0 => Opcode::Addi,
        1 if (funct7 & 0xFE) == 0 => Opcode::Slli,
        2 => Opcode::Slti,
        3 => Opcode::Sltiu,
        4 => Opcode::Xori,
        5 if (funct7 & 0xFE) == 0 => Opcode::Srli,
        5 if (funct7 & 0xFE) == 0x20 => Opcode::Srai,
        6 => Opcode::Ori,
        7 => Opcode::Andi,
        _ => return None,
    };
    if funct3 == 1 || funct3 == 5 {
        // shamt[5] is reserved on RV32
        if shamt >= u32::from(X::VALUE) {
            return None;
        }
        return Some((op, shamt.cast_signed()));
    }
    Some((op, decode_i_imm(instr)))
}

const fn decode_op_imm_32(funct3: u8, funct7: u8, instr: u32) -> Option<(Opcode, i32)> {
    let shamt = ((instr >> 20) & 0x1F).cast_signed();
    let op = match funct3 {
        0 => Opcode::Addiw,
        1 if funct7 == 0 => Opcode::Slliw,
        5 if funct7 == 0 => Opcode::Srliw,
        5 if funct7 == 0x20 => Opcode::Sraiw,
        _ => return None,
    };
    let imm = if funct3 == 1 || funct3 == 5 {
        shamt
    } else {
        decode_i_imm(instr)
    };
    Some((op, imm))
}

const VLE: [Opcode; 4] = [Opcode::Vle8V, Opcode::Vle16V, Opcode::Vle32V, Opcode::Vle64V];
const VSE: [Opcode; 4] = [Opcode::Vse8V, Opcode::Vse16V, Opcode::Vse32V, Opcode::Vse64V];
const VLSE: [Opcode; 4] = [Opcode::Vlse8V, Opcode::Vlse16V, Opcode::Vlse32V, Opcode::Vlse64V];
const VSSE: [Opcode; 4] = [Opcode::Vsse8V, Opcode::Vsse16V, Opcode::Vsse32V, Opcode::Vsse64V];
const VLUXEI: [Opcode; 4] = [
    Opcode::Vluxei8V,
    Opcode::Vluxei16V,
    Opcode::Vluxei32V,
    Opcode::Vluxei64V,
];
const VLOXEI: [Opcode; 4] = [
    Opcode::Vloxei8V,
    Opcode::Vloxei16V,
    Opcode::Vloxei32V,
    Opcode::Vloxei64V,
];
const VSUXEI: [Opcode; 4] = [
    Opcode::Vsuxei8V,
    Opcode::Vsuxei16V,
    Opcode::Vsuxei32V,
    Opcode::Vsuxei64V,
];
const VSOXEI: [Opcode; 4] = [
    Opcode::Vsoxei8V,
    Opcode::Vsoxei16V,
    Opcode::Vsoxei32V,
    Opcode::Vsoxei64V,
];

/// Vector loads/stores in the LOAD-FP/STORE-FP major opcodes.
///
/// Segment, fault-only-first, whole-register and mask forms are not
/// recognized. The mask operand (`vm`) is not modeled.
fn decode_vector<X: Xlen>(
    is_store: bool,
    width: u8,
    rd: u8,
    rs1: u8,
    rs2: u8,
    instr: u32,
) -> Option<InstrBuilder<X>> {
    let eew = match width {
        0 => 0,
        5 => 1,
        6 => 2,
        7 => 3,
        _ => return None,
    };
    if decode_vec_nf(instr) != 0 || decode_vec_mew(instr) {
        return None;
    }

    // vd for loads, vs3 for stores; both live in the rd field.
    let data = Register::V(rd);
    let base = Register::X(rs1);
    let builder = match (decode_vec_mop(instr), is_store) {
        // lumop/sumop must select the plain unit-stride form
        (0b00, _) if rs2 != 0 => return None,
        (0b00, false) => InstrBuilder::new(VLE[eew]).def(data).reg(base),
        (0b00, true) => InstrBuilder::new(VSE[eew]).reg(data).reg(base),
        (0b10, false) => InstrBuilder::new(VLSE[eew]).def(data).reg(base).reg(Register::X(rs2)),
        (0b10, true) => InstrBuilder::new(VSSE[eew]).reg(data).reg(base).reg(Register::X(rs2)),
        (0b01, false) => InstrBuilder::new(VLUXEI[eew]).def(data).reg(base).reg(Register::V(rs2)),
        (0b11, false) => InstrBuilder::new(VLOXEI[eew]).def(data).reg(base).reg(Register::V(rs2)),
        (0b01, true) => InstrBuilder::new(VSUXEI[eew]).reg(data).reg(base).reg(Register::V(rs2)),
        (0b11, true) => InstrBuilder::new(VSOXEI[eew]).reg(data).reg(base).reg(Register::V(rs2)),
        _ => return None,
    };
    Some(builder)
}

#[cfg(test)]
mod tests {
    use rvia_isa::{Rv32, Rv64};

    use super::*;
    use crate::Operand;

    #[test]
    fn test_decode_addi() {
        // addi x1, x2, 100
        let mi = decode_word::<Rv64>(0x0641_0093).unwrap();
        assert_eq!(mi.opcode(), Opcode::Addi);
        assert_eq!(
            mi.operands(),
            &[
                Operand::Reg(Register::x(1)),
                Operand::Reg(Register::x(2)),
                Operand::Imm(100),
            ]
        );
    }

    #[test]
    fn test_decode_bytes() {
        // addi x1, x0, 42
        let bytes = [0x93, 0x00, 0xa0, 0x02];
        let mi = decode::<Rv32>(&bytes).unwrap();
        assert_eq!(mi.opcode(), Opcode::Addi);
        assert_eq!(mi.operand(2), Some(&Operand::Imm(42)));
    }

    #[test]
    fn test_decode_load_attaches_mem_operand() {
        // lb x1, -128(x2): imm=0xF80
        let word = (0xF80 << 20) | (2 << 15) | (1 << 7) | 0x03;
        let mi = decode_word::<Rv64>(word).unwrap();
        assert_eq!(mi.opcode(), Opcode::Lb);
        assert_eq!(mi.operand(2), Some(&Operand::Imm(-128)));
        assert_eq!(mi.mem_operands(), &[MemOperand::load(1)]);
    }

    #[test]
    fn test_decode_fsw() {
        // fsw f3, 36(x3)
        let word = (1 << 25) | (3 << 20) | (3 << 15) | (2 << 12) | (4 << 7) | 0x27;
        let mi = decode_word::<Rv32>(word).unwrap();
        assert_eq!(mi.opcode(), Opcode::Fsw);
        assert_eq!(mi.to_string(), "fsw ft3, 36(gp)");
        assert_eq!(mi.mem_operands(), &[MemOperand::store(4)]);
    }

    #[test]
    fn test_decode_rv64_only_on_rv32() {
        // ld x1, 0(x2)
        let word = (2 << 15) | (3 << 12) | (1 << 7) | 0x03;
        assert!(decode_word::<Rv64>(word).is_ok());
        assert_eq!(
            decode_word::<Rv32>(word),
            Err(DecodeError::NotAvailable {
                opcode: Opcode::Ld,
                target: "riscv32",
            })
        );
    }

    #[test]
    fn test_decode_addiw() {
        // addiw x1, x2, -128
        let word = (0xF80 << 20) | (2 << 15) | (1 << 7) | 0x1B;
        let mi = decode_word::<Rv64>(word).unwrap();
        assert_eq!(mi.opcode(), Opcode::Addiw);
        assert_eq!(mi.operand(2), Some(&Operand::Imm(-128)));
        assert!(decode_word::<Rv32>(word).is_err());
    }

    #[test]
    fn test_decode_rv32_shamt_reserved() {
        // slli x1, x1, 32
        let word = (32 << 20) | (1 << 15) | (1 << 12) | (1 << 7) | 0x13;
        assert!(decode_word::<Rv64>(word).is_ok());
        assert_eq!(
            decode_word::<Rv32>(word),
            Err(DecodeError::Unrecognized(word))
        );
    }

    #[test]
    fn test_decode_shift_amounts() {
        // srai x1, x2, 63
        let word = (0x20 << 25) | (63 << 20) | (2 << 15) | (5 << 12) | (1 << 7) | 0x13;
        let mi = decode_word::<Rv64>(word).unwrap();
        assert_eq!(mi.opcode(), Opcode::Srai);
        assert_eq!(mi.operand(2), Some(&Operand::Imm(63)));

        // sraiw x1, x2, 31
        let word = (0x20 << 25) | (31 << 20) | (2 << 15) | (5 << 12) | (1 << 7) | 0x1B;
        let mi = decode_word::<Rv64>(word).unwrap();
        assert_eq!(mi.opcode(), Opcode::Sraiw);
        assert_eq!(mi.operand(2), Some(&Operand::Imm(31)));
    }

    #[test]
    fn test_decode_lui() {
        // lui x1, 0x12345
        let mi = decode_word::<Rv64>(0x1234_50B7).unwrap();
        assert_eq!(mi.opcode(), Opcode::Lui);
        assert_eq!(mi.operand(1), Some(&Operand::Imm(0x12345)));
    }

    #[test]
    fn test_decode_vector_unit_stride() {
        // vle32.v v8, (x3)
        let word = (1 << 25) | (3 << 15) | (6 << 12) | (8 << 7) | 0x07;
        let mi = decode_word::<Rv64>(word).unwrap();
        assert_eq!(mi.opcode(), Opcode::Vle32V);
        assert_eq!(mi.to_string(), "vle32.v v8, (gp)");
        assert!(mi.mem_operands().is_empty());
    }

    #[test]
    fn test_decode_vector_indexed_store() {
        // vsoxei32.v v8, (x3), v4
        let word = (0b11 << 26) | (1 << 25) | (4 << 20) | (3 << 15) | (6 << 12) | (8 << 7) | 0x27;
        let mi = decode_word::<Rv64>(word).unwrap();
        assert_eq!(mi.opcode(), Opcode::Vsoxei32V);
        assert_eq!(mi.operand(2), Some(&Operand::Reg(Register::v(4))));
    }

    #[test]
    fn test_decode_vector_segment_rejected() {
        // vlseg2e32.v v8, (x3): nf=1
        let word = (1 << 29) | (1 << 25) | (3 << 15) | (6 << 12) | (8 << 7) | 0x07;
        assert_eq!(
            decode_word::<Rv64>(word),
            Err(DecodeError::Unrecognized(word))
        );
    }

    #[test]
    fn test_decode_fsgnj() {
        // fsgnj.d f10, f11, f11 (fmv.d fa0, fa1)
        let word = (0x11 << 25) | (11 << 20) | (11 << 15) | (10 << 7) | 0x53;
        let mi = decode_word::<Rv64>(word).unwrap();
        assert_eq!(mi.opcode(), Opcode::FsgnjD);
        assert_eq!(mi.to_string(), "fsgnj.d fa0, fa1, fa1");
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode::<Rv64>(&[0x93]), Err(DecodeError::Truncated(1)));
        assert_eq!(decode::<Rv64>(&[0x93, 0x00]), Err(DecodeError::Truncated(2)));
        // c.nop
        assert_eq!(
            decode::<Rv64>(&[0x01, 0x00]),
            Err(DecodeError::Compressed(0x0001))
        );
        // ecall
        assert_eq!(
            decode_word::<Rv64>(0x0000_0073),
            Err(DecodeError::Unrecognized(0x0000_0073))
        );
    }
}
