//! Memory-access descriptors attached to instructions.

use std::fmt::{self, Display};

/// Direction of a memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessKind {
    Load,
    Store,
    /// Read-modify-write.
    LoadStore,
}

impl AccessKind {
    #[must_use]
    pub const fn is_load(self) -> bool {
        matches!(self, Self::Load | Self::LoadStore)
    }

    #[must_use]
    pub const fn is_store(self) -> bool {
        matches!(self, Self::Store | Self::LoadStore)
    }
}

/// Describes one memory access performed by an instruction.
///
/// The size is what the producer recorded; analyses that classify by
/// opcode do not consult it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MemOperand {
    pub kind: AccessKind,
    /// Access size in bytes.
    pub size: u64,
    /// Alignment in bytes (power of two).
    pub align: u64,
}

impl MemOperand {
    #[must_use]
    pub const fn new(kind: AccessKind, size: u64, align: u64) -> Self {
        Self { kind, size, align }
    }

    /// Naturally aligned load of `size` bytes.
    #[must_use]
    pub const fn load(size: u64) -> Self {
        Self::new(AccessKind::Load, size, size)
    }

    /// Naturally aligned store of `size` bytes.
    #[must_use]
    pub const fn store(size: u64) -> Self {
        Self::new(AccessKind::Store, size, size)
    }
}

impl Display for MemOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            AccessKind::Load => "load",
            AccessKind::Store => "store",
            AccessKind::LoadStore => "load-store",
        };
        write!(f, "{kind} ({} bytes, align {})", self.size, self.align)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let mmo = MemOperand::load(4);
        assert!(mmo.kind.is_load());
        assert!(!mmo.kind.is_store());
        assert_eq!(mmo.align, 4);
        assert!(AccessKind::LoadStore.is_store());
        assert_eq!(MemOperand::store(1).to_string(), "store (1 bytes, align 1)");
    }
}
