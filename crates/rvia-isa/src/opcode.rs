//! Opcode enumeration.

use std::fmt::{self, Display};
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

macro_rules! opcodes {
    ($($(#[$meta:meta])* $name:ident => $mnemonic:literal,)*) => {
        /// Instruction opcodes known to the analyses.
        ///
        /// Opcodes are target-level instruction variants, independent of
        /// their binary encoding.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum Opcode {
            $($(#[$meta])* $name,)*
        }

        impl Opcode {
            /// Every opcode, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$name,)*];

            /// Number of opcodes.
            pub const COUNT: usize = Self::ALL.len();

            /// Assembly mnemonic.
            #[must_use]
            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $(Self::$name => $mnemonic,)*
                }
            }
        }
    };
}

opcodes! {
    // ===== RV32I/RV64I =====
    Lui => "lui",
    Auipc => "auipc",
    Lb => "lb",
    Lh => "lh",
    Lw => "lw",
    Lbu => "lbu",
    Lhu => "lhu",
    Sb => "sb",
    Sh => "sh",
    Sw => "sw",
    Addi => "addi",
    Slti => "slti",
    Sltiu => "sltiu",
    Xori => "xori",
    Ori => "ori",
    Andi => "andi",
    Slli => "slli",
    Srli => "srli",
    Srai => "srai",
    // RV64I
    Ld => "ld",
    Lwu => "lwu",
    Sd => "sd",
    /// 32-bit add-immediate with sign-extended result (RV64 only).
    Addiw => "addiw",
    Slliw => "slliw",
    Srliw => "srliw",
    Sraiw => "sraiw",

    // ===== F/D/Q/Zfh loads, stores, moves =====
    Flh => "flh",
    Flw => "flw",
    Fld => "fld",
    Flq => "flq",
    Fsh => "fsh",
    Fsw => "fsw",
    Fsd => "fsd",
    Fsq => "fsq",
    FsgnjH => "fsgnj.h",
    FsgnjS => "fsgnj.s",
    FsgnjD => "fsgnj.d",

    // ===== V: unit-stride =====
    Vle8V => "vle8.v",
    Vle16V => "vle16.v",
    Vle32V => "vle32.v",
    Vle64V => "vle64.v",
    Vse8V => "vse8.v",
    Vse16V => "vse16.v",
    Vse32V => "vse32.v",
    Vse64V => "vse64.v",

    // ===== V: strided =====
    Vlse8V => "vlse8.v",
    Vlse16V => "vlse16.v",
    Vlse32V => "vlse32.v",
    Vlse64V => "vlse64.v",
    Vsse8V => "vsse8.v",
    Vsse16V => "vsse16.v",
    Vsse32V => "vsse32.v",
    Vsse64V => "vsse64.v",

    // ===== V: indexed =====
    Vluxei8V => "vluxei8.v",
    Vluxei16V => "vluxei16.v",
    Vluxei32V => "vluxei32.v",
    Vluxei64V => "vluxei64.v",
    Vloxei8V => "vloxei8.v",
    Vloxei16V => "vloxei16.v",
    Vloxei32V => "vloxei32.v",
    Vloxei64V => "vloxei64.v",
    Vsuxei8V => "vsuxei8.v",
    Vsuxei16V => "vsuxei16.v",
    Vsuxei32V => "vsuxei32.v",
    Vsuxei64V => "vsuxei64.v",
    Vsoxei8V => "vsoxei8.v",
    Vsoxei16V => "vsoxei16.v",
    Vsoxei32V => "vsoxei32.v",
    Vsoxei64V => "vsoxei64.v",
}

static MNEMONICS: LazyLock<FxHashMap<&'static str, Opcode>> =
    LazyLock::new(|| Opcode::ALL.iter().map(|&op| (op.mnemonic(), op)).collect());

impl Opcode {
    /// Look up an opcode by its assembly mnemonic (case-insensitive).
    #[must_use]
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        MNEMONICS.get(name.to_ascii_lowercase().as_str()).copied()
    }

    /// Index of this opcode in [`Opcode::ALL`].
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
