//! Instruction field and immediate helpers for 32-bit RISC-V encodings.

/// Smallest signed 12-bit immediate.
pub const SIMM12_MIN: i64 = -2048;
/// Largest signed 12-bit immediate.
pub const SIMM12_MAX: i64 = 2047;

/// Whether `imm` fits the signed 12-bit I/S-type immediate.
#[inline]
#[must_use]
pub const fn fits_simm12(imm: i64) -> bool {
    imm >= SIMM12_MIN && imm <= SIMM12_MAX
}

/// Whether `imm` is a valid U-type (`lui`/`auipc`) operand.
///
/// Accepts the 20-bit field either as unsigned or as its signed reading.
#[inline]
#[must_use]
pub const fn fits_uimm20(imm: i64) -> bool {
    imm >= -(1 << 19) && imm < (1 << 20)
}

/// Decode I-type immediate (bits [31:20] sign-extended).
#[inline]
#[must_use]
pub const fn decode_i_imm(instr: u32) -> i32 {
    (instr as i32) >> 20
}

/// Decode S-type immediate (bits [31:25] | [11:7] sign-extended).
#[inline]
#[must_use]
pub const fn decode_s_imm(instr: u32) -> i32 {
    let imm11_5 = (instr >> 25) & 0x7F;
    let imm4_0 = (instr >> 7) & 0x1F;
    let imm = (imm11_5 << 5) | imm4_0;
    // Sign extend from 12 bits
    ((imm as i32) << 20) >> 20
}

/// Decode U-type immediate as the raw 20-bit field (bits [31:12]).
#[inline]
#[must_use]
pub const fn decode_u_field(instr: u32) -> u32 {
    instr >> 12
}

/// Extract rd field (bits [11:7]).
#[inline]
#[must_use]
pub const fn decode_rd(instr: u32) -> u8 {
    ((instr >> 7) & 0x1F) as u8
}

/// Extract rs1 field (bits [19:15]).
#[inline]
#[must_use]
pub const fn decode_rs1(instr: u32) -> u8 {
    ((instr >> 15) & 0x1F) as u8
}

/// Extract rs2 field (bits [24:20]).
#[inline]
#[must_use]
pub const fn decode_rs2(instr: u32) -> u8 {
    ((instr >> 20) & 0x1F) as u8
}

/// Extract funct3 field (bits [14:12]).
#[inline]
#[must_use]
pub const fn decode_funct3(instr: u32) -> u8 {
    ((instr >> 12) & 0x7) as u8
}

/// Extract funct7 field (bits [31:25]).
#[inline]
#[must_use]
pub const fn decode_funct7(instr: u32) -> u8 {
    ((instr >> 25) & 0x7F) as u8
}

/// Extract opcode field (bits [6:0]).
#[inline]
#[must_use]
pub const fn decode_opcode(instr: u32) -> u8 {
    (instr & 0x7F) as u8
}

/// Extract vector memory addressing mode `mop` (bits [27:26]).
#[inline]
#[must_use]
pub const fn decode_vec_mop(instr: u32) -> u8 {
    ((instr >> 26) & 0x3) as u8
}

/// Extract vector extended-memory bit `mew` (bit 28).
#[inline]
#[must_use]
pub const fn decode_vec_mew(instr: u32) -> bool {
    (instr >> 28) & 0x1 != 0
}

/// Extract vector segment field `nf` (bits [31:29]).
#[inline]
#[must_use]
pub const fn decode_vec_nf(instr: u32) -> u8 {
    ((instr >> 29) & 0x7) as u8
}
