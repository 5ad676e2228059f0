//! Register files and register identities.

use std::fmt::{self, Display};

/// Number of architectural registers in each register file.
pub const NUM_REGS: u8 = 32;

/// Register file a register belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegFile {
    /// Integer registers `x0..x31`.
    Gpr,
    /// Floating-point registers `f0..f31`.
    Fpr,
    /// Vector registers `v0..v31`.
    Vr,
}

impl RegFile {
    /// Short lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gpr => "gpr",
            Self::Fpr => "fpr",
            Self::Vr => "vr",
        }
    }
}

impl Display for RegFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A physical or virtual register.
///
/// Physical registers are identified by file and index. Virtual registers
/// exist before register allocation and carry the file they will be
/// assigned from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Register {
    /// Integer register `x{n}`.
    X(u8),
    /// Floating-point register `f{n}`.
    F(u8),
    /// Vector register `v{n}`.
    V(u8),
    /// Virtual register awaiting allocation.
    Virtual { file: RegFile, id: u32 },
}

impl Register {
    pub const ZERO: Self = Self::X(0);
    pub const RA: Self = Self::X(1);
    pub const SP: Self = Self::X(2);
    pub const GP: Self = Self::X(3);
    pub const TP: Self = Self::X(4);
    pub const FP: Self = Self::X(8); // Frame pointer alias for s0

    /// Integer register `x{n}`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is not a valid register index.
    #[must_use]
    pub const fn x(n: u8) -> Self {
        assert!(n < NUM_REGS, "integer register index out of range");
        Self::X(n)
    }

    /// Floating-point register `f{n}`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is not a valid register index.
    #[must_use]
    pub const fn f(n: u8) -> Self {
        assert!(n < NUM_REGS, "floating-point register index out of range");
        Self::F(n)
    }

    /// Vector register `v{n}`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is not a valid register index.
    #[must_use]
    pub const fn v(n: u8) -> Self {
        assert!(n < NUM_REGS, "vector register index out of range");
        Self::V(n)
    }

    /// Virtual register `id` in `file`.
    #[must_use]
    pub const fn virt(file: RegFile, id: u32) -> Self {
        Self::Virtual { file, id }
    }

    /// Register file this register belongs to.
    #[must_use]
    pub const fn file(self) -> RegFile {
        match self {
            Self::X(_) => RegFile::Gpr,
            Self::F(_) => RegFile::Fpr,
            Self::V(_) => RegFile::Vr,
            Self::Virtual { file, .. } => file,
        }
    }

    #[must_use]
    pub const fn is_virtual(self) -> bool {
        matches!(self, Self::Virtual { .. })
    }

    #[must_use]
    pub const fn is_physical(self) -> bool {
        !self.is_virtual()
    }
}

impl Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::X(n) => f.write_str(gpr_name(n)),
            Self::F(n) => f.write_str(fpr_name(n)),
            Self::V(n) => write!(f, "v{n}"),
            Self::Virtual { file, id } => write!(f, "%{id}:{file}"),
        }
    }
}

/// Get integer register ABI name.
#[must_use]
pub const fn gpr_name(reg: u8) -> &'static str {
    match reg {
        0 => "zero",
        1 => "ra",
        2 => "sp",
        3 => "gp",
        4 => "tp",
        5 => "t0",
        6 => "t1",
        7 => "t2",
        8 => "s0",
        9 => "s1",
        10 => "a0",
        11 => "a1",
        12 => "a2",
        13 => "a3",
        14 => "a4",
        15 => "a5",
        16 => "a6",
        17 => "a7",
        18 => "s2",
        19 => "s3",
        20 => "s4",
        21 => "s5",
        22 => "s6",
        23 => "s7",
        24 => "s8",
        25 => "s9",
        26 => "s10",
        27 => "s11",
        28 => "t3",
        29 => "t4",
        30 => "t5",
        31 => "t6",
        _ => "??",
    }
}

/// Get floating-point register ABI name.
#[must_use]
pub const fn fpr_name(reg: u8) -> &'static str {
    match reg {
        0 => "ft0",
        1 => "ft1",
        2 => "ft2",
        3 => "ft3",
        4 => "ft4",
        5 => "ft5",
        6 => "ft6",
        7 => "ft7",
        8 => "fs0",
        9 => "fs1",
        10 => "fa0",
        11 => "fa1",
        12 => "fa2",
        13 => "fa3",
        14 => "fa4",
        15 => "fa5",
        16 => "fa6",
        17 => "fa7",
        18 => "fs2",
        19 => "fs3",
        20 => "fs4",
        21 => "fs5",
        22 => "fs6",
        23 => "fs7",
        24 => "fs8",
        25 => "fs9",
        26 => "fs10",
        27 => "fs11",
        28 => "ft8",
        29 => "ft9",
        30 => "ft10",
        31 => "ft11",
        _ => "??",
    }
}
