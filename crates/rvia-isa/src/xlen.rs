//! Register width types (XLEN).

use std::fmt::Debug;

/// Marker type for RV32.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rv32;

/// Marker type for RV64.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rv64;

/// Trait for register-width-dependent behavior.
///
/// Uses marker types (Rv32/Rv64) so instruction models and queries are
/// specialized per target at compile time.
pub trait Xlen: Copy + Clone + Send + Sync + Default + Debug + 'static {
    /// XLEN value (32 or 64).
    const VALUE: u8;

    /// Target name used in diagnostics.
    const NAME: &'static str;

    /// Whether this is a 64-bit target.
    #[inline]
    #[must_use]
    fn is_64bit() -> bool {
        Self::VALUE == 64
    }
}

impl Xlen for Rv32 {
    const VALUE: u8 = 32;
    const NAME: &'static str = "riscv32";
}

impl Xlen for Rv64 {
    const VALUE: u8 = 64;
    const NAME: &'static str = "riscv64";
}
