use std::fmt;

bitflags::bitflags! {
    /// Control-flow properties of an opcode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpcodeFlags: u8 {
        /// Transfers control to a label operand.
        const JUMP = 1 << 0;
        /// The jump is taken only when its predicate holds.
        const CONDITIONAL = 1 << 1;
        /// Leaves the method.
        const RETURN = 1 << 2;
    }
}

/// Operand encoding that follows the opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// No operand.
    None,
    /// Signed 8-bit immediate (`bipush`).
    Byte,
    /// Signed 16-bit immediate (`sipush`).
    Short,
    /// Unsigned 8-bit local variable slot.
    Local,
    /// Unsigned 8-bit constant pool index (`ldc`).
    PoolIndex,
    /// Local slot followed by a signed 8-bit increment (`iinc`).
    Iinc,
    /// Signed 16-bit branch offset relative to the opcode.
    Branch,
}

impl Format {
    /// Encoded instruction size in bytes, opcode included.
    pub const fn size(self) -> usize {
        match self {
            Format::None => 1,
            Format::Byte | Format::Local | Format::PoolIndex => 2,
            Format::Short | Format::Iinc | Format::Branch => 3,
        }
    }
}

macro_rules! define_opcodes {
    ($(
        $variant:ident = $byte:literal, $mnemonic:literal, $format:ident,
        ($pops:literal, $pushes:literal) [$($flag:ident)|*];
    )*) => {
        /// A supported JVM opcode.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum Opcode {
            $($variant = $byte,)*
        }

        impl Opcode {
            /// Every opcode in ascending byte order.
            pub const ALL: &'static [Opcode] = &[$(Opcode::$variant,)*];

            /// Look up an opcode by its encoded byte.
            pub fn from_u8(byte: u8) -> Option<Self> {
                match byte {
                    $($byte => Some(Opcode::$variant),)*
                    _ => None,
                }
            }

            /// Lower-case JVM mnemonic.
            pub fn mnemonic(self) -> &'static str {
                match self {
                    $(Opcode::$variant => $mnemonic,)*
                }
            }

            /// Operand format.
            pub fn format(self) -> Format {
                match self {
                    $(Opcode::$variant => Format::$format,)*
                }
            }

            /// Number of operand stack values consumed and produced.
            pub fn stack_effect(self) -> (usize, usize) {
                match self {
                    $(Opcode::$variant => ($pops, $pushes),)*
                }
            }

            /// Control-flow flags.
            pub fn flags(self) -> OpcodeFlags {
                match self {
                    $(Opcode::$variant => OpcodeFlags::empty() $(| OpcodeFlags::$flag)*,)*
                }
            }
        }
    };
}

define_opcodes! {
    Nop = 0x00, "nop", None, (0, 0) [];
    AconstNull = 0x01, "aconst_null", None, (0, 1) [];
    IconstM1 = 0x02, "iconst_m1", None, (0, 1) [];
    Iconst0 = 0x03, "iconst_0", None, (0, 1) [];
    Iconst1 = 0x04, "iconst_1", None, (0, 1) [];
    Iconst2 = 0x05, "iconst_2", None, (0, 1) [];
    Iconst3 = 0x06, "iconst_3", None, (0, 1) [];
    Iconst4 = 0x07, "iconst_4", None, (0, 1) [];
    Iconst5 = 0x08, "iconst_5", None, (0, 1) [];
    Bipush = 0x10, "bipush", Byte, (0, 1) [];
    Sipush = 0x11, "sipush", Short, (0, 1) [];
    Ldc = 0x12, "ldc", PoolIndex, (0, 1) [];
    Iload = 0x15, "iload", Local, (0, 1) [];
    Aload = 0x19, "aload", Local, (0, 1) [];
    Iload0 = 0x1a, "iload_0", None, (0, 1) [];
    Iload1 = 0x1b, "iload_1", None, (0, 1) [];
    Iload2 = 0x1c, "iload_2", None, (0, 1) [];
    Iload3 = 0x1d, "iload_3", None, (0, 1) [];
    Aload0 = 0x2a, "aload_0", None, (0, 1) [];
    Aload1 = 0x2b, "aload_1", None, (0, 1) [];
    Aload2 = 0x2c, "aload_2", None, (0, 1) [];
    Aload3 = 0x2d, "aload_3", None, (0, 1) [];
    Iaload = 0x2e, "iaload", None, (2, 1) [];
    Aaload = 0x32, "aaload", None, (2, 1) [];
    Baload = 0x33, "baload", None, (2, 1) [];
    Caload = 0x34, "caload", None, (2, 1) [];
    Istore = 0x36, "istore", Local, (1, 0) [];
    Astore = 0x3a, "astore", Local, (1, 0) [];
    Istore0 = 0x3b, "istore_0", None, (1, 0) [];
    Istore1 = 0x3c, "istore_1", None, (1, 0) [];
    Istore2 = 0x3d, "istore_2", None, (1, 0) [];
    Istore3 = 0x3e, "istore_3", None, (1, 0) [];
    Astore0 = 0x4b, "astore_0", None, (1, 0) [];
    Astore1 = 0x4c, "astore_1", None, (1, 0) [];
    Astore2 = 0x4d, "astore_2", None, (1, 0) [];
    Astore3 = 0x4e, "astore_3", None, (1, 0) [];
    Iastore = 0x4f, "iastore", None, (3, 0) [];
    Aastore = 0x53, "aastore", None, (3, 0) [];
    Pop = 0x57, "pop", None, (1, 0) [];
    Dup = 0x59, "dup", None, (1, 2) [];
    Iadd = 0x60, "iadd", None, (2, 1) [];
    Isub = 0x64, "isub", None, (2, 1) [];
    Imul = 0x68, "imul", None, (2, 1) [];
    Idiv = 0x6c, "idiv", None, (2, 1) [];
    Irem = 0x70, "irem", None, (2, 1) [];
    Ineg = 0x74, "ineg", None, (1, 1) [];
    Ishl = 0x78, "ishl", None, (2, 1) [];
    Ishr = 0x7a, "ishr", None, (2, 1) [];
    Iand = 0x7e, "iand", None, (2, 1) [];
    Ior = 0x80, "ior", None, (2, 1) [];
    Ixor = 0x82, "ixor", None, (2, 1) [];
    Iinc = 0x84, "iinc", Iinc, (0, 0) [];
    Ifeq = 0x99, "ifeq", Branch, (1, 0) [JUMP | CONDITIONAL];
    Ifne = 0x9a, "ifne", Branch, (1, 0) [JUMP | CONDITIONAL];
    Iflt = 0x9b, "iflt", Branch, (1, 0) [JUMP | CONDITIONAL];
    Ifge = 0x9c, "ifge", Branch, (1, 0) [JUMP | CONDITIONAL];
    Ifgt = 0x9d, "ifgt", Branch, (1, 0) [JUMP | CONDITIONAL];
    Ifle = 0x9e, "ifle", Branch, (1, 0) [JUMP | CONDITIONAL];
    IfIcmpeq = 0x9f, "if_icmpeq", Branch, (2, 0) [JUMP | CONDITIONAL];
    IfIcmpne = 0xa0, "if_icmpne", Branch, (2, 0) [JUMP | CONDITIONAL];
    IfIcmplt = 0xa1, "if_icmplt", Branch, (2, 0) [JUMP | CONDITIONAL];
    IfIcmpge = 0xa2, "if_icmpge", Branch, (2, 0) [JUMP | CONDITIONAL];
    IfIcmpgt = 0xa3, "if_icmpgt", Branch, (2, 0) [JUMP | CONDITIONAL];
    IfIcmple = 0xa4, "if_icmple", Branch, (2, 0) [JUMP | CONDITIONAL];
    IfAcmpeq = 0xa5, "if_acmpeq", Branch, (2, 0) [JUMP | CONDITIONAL];
    IfAcmpne = 0xa6, "if_acmpne", Branch, (2, 0) [JUMP | CONDITIONAL];
    Goto = 0xa7, "goto", Branch, (0, 0) [JUMP];
    Ireturn = 0xac, "ireturn", None, (1, 0) [RETURN];
    Areturn = 0xb0, "areturn", None, (1, 0) [RETURN];
    Return = 0xb1, "return", None, (0, 0) [RETURN];
    Ifnull = 0xc6, "ifnull", Branch, (1, 0) [JUMP | CONDITIONAL];
    Ifnonnull = 0xc7, "ifnonnull", Branch, (1, 0) [JUMP | CONDITIONAL];
}

impl Opcode {
    /// Look up an opcode by mnemonic.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.mnemonic() == mnemonic)
    }

    /// Encoded opcode byte.
    #[inline]
    pub const fn byte(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn is_jump(self) -> bool {
        self.flags().contains(OpcodeFlags::JUMP)
    }

    #[inline]
    pub fn is_conditional(self) -> bool {
        self.flags().contains(OpcodeFlags::CONDITIONAL)
    }

    #[inline]
    pub fn is_return(self) -> bool {
        self.flags().contains(OpcodeFlags::RETURN)
    }

    /// Jumps and returns end a basic block.
    #[inline]
    pub fn is_terminator(self) -> bool {
        self.is_jump() || self.is_return()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
