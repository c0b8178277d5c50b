//! Static opcode registry shared by the tokenizer and the validator.
//!
//! The table is ordered by numeric opcode id. Each entry records which kinds
//! of immediate the instruction accepts; an empty mask means the instruction
//! takes no immediate at all.

use std::collections::HashMap;
use std::fmt;
use std::ops::BitOr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
  Add,
  Sub,
  Mul,
  Sdiv,
  Udiv,
  Srem,
  Urem,
  And,
  Or,
  Xor,
  Shl,
  Shr,
  Rotl,
  Rotr,
  Eq,
  Ne,
  Slt,
  Sgt,
  Sle,
  Sge,
  Ult,
  Ugt,
  Ule,
  Uge,
  Clz,
  Ctz,
  Cbit,
  Load,
  Store,
  Ldc,
  Ldv,
  Ldo,
  Ldz,
  Lget,
  Lset,
  Gget,
  Gset,
  Call,
  Return,
  Jmp,
  Jt,
  Jf,
  Drop,
  Dup,
  Nop,
  Trap,
  Cat,
  Fmt,
  Len,
}

impl Opcode {
  pub fn id(self) -> u8 {
    self as u8
  }

  pub fn mnemonic(self) -> &'static str {
    OPCODES[usize::from(self.id())].mnemonic
  }
}

impl fmt::Display for Opcode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.mnemonic())
  }
}

/// The syntactic form of an instruction immediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImmediateKind {
  Integer,
  String,
  Name,
}

impl ImmediateKind {
  pub fn mask(self) -> ImmediateMask {
    match self {
      Self::Integer => ImmediateMask::INTEGER,
      Self::String => ImmediateMask::STRING,
      Self::Name => ImmediateMask::NAME,
    }
  }
}

impl fmt::Display for ImmediateKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Integer => "integer",
      Self::String => "string",
      Self::Name => "name",
    })
  }
}

/// Set of [`ImmediateKind`]s an opcode accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImmediateMask(u8);

impl ImmediateMask {
  pub const NONE: Self = Self(0);
  pub const INTEGER: Self = Self(1);
  pub const STRING: Self = Self(2);
  pub const NAME: Self = Self(4);
  pub const INTEGER_OR_NAME: Self = Self::INTEGER.union(Self::NAME);
  pub const ANY: Self = Self::INTEGER.union(Self::STRING).union(Self::NAME);

  pub const fn union(self, other: Self) -> Self {
    Self(self.0 | other.0)
  }

  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  pub fn allows(self, kind: ImmediateKind) -> bool {
    self.0 & kind.mask().0 != 0
  }
}

impl BitOr for ImmediateMask {
  type Output = Self;

  fn bitor(self, rhs: Self) -> Self {
    self.union(rhs)
  }
}

/// Registry entry: mnemonic, opcode and accepted immediates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeDetail {
  pub mnemonic: &'static str,
  pub opcode: Opcode,
  pub immediates: ImmediateMask,
}

impl OpcodeDetail {
  pub fn requires_immediate(&self) -> bool {
    !self.immediates.is_empty()
  }
}

const fn entry(mnemonic: &'static str, opcode: Opcode, immediates: ImmediateMask) -> OpcodeDetail {
  OpcodeDetail {
    mnemonic,
    opcode,
    immediates,
  }
}

use ImmediateMask as M;

/// Every opcode, indexed by its numeric id.
pub static OPCODES: [OpcodeDetail; 49] = [
  entry("add", Opcode::Add, M::NONE),
  entry("sub", Opcode::Sub, M::NONE),
  entry("mul", Opcode::Mul, M::NONE),
  entry("sdiv", Opcode::Sdiv, M::NONE),
  entry("udiv", Opcode::Udiv, M::NONE),
  entry("srem", Opcode::Srem, M::NONE),
  entry("urem", Opcode::Urem, M::NONE),
  entry("and", Opcode::And, M::NONE),
  entry("or", Opcode::Or, M::NONE),
  entry("xor", Opcode::Xor, M::NONE),
  entry("shl", Opcode::Shl, M::NONE),
  entry("shr", Opcode::Shr, M::NONE),
  entry("rotl", Opcode::Rotl, M::NONE),
  entry("rotr", Opcode::Rotr, M::NONE),
  entry("eq", Opcode::Eq, M::NONE),
  entry("ne", Opcode::Ne, M::NONE),
  entry("slt", Opcode::Slt, M::NONE),
  entry("sgt", Opcode::Sgt, M::NONE),
  entry("sle", Opcode::Sle, M::NONE),
  entry("sge", Opcode::Sge, M::NONE),
  entry("ult", Opcode::Ult, M::NONE),
  entry("ugt", Opcode::Ugt, M::NONE),
  entry("ule", Opcode::Ule, M::NONE),
  entry("uge", Opcode::Uge, M::NONE),
  entry("clz", Opcode::Clz, M::NONE),
  entry("ctz", Opcode::Ctz, M::NONE),
  entry("cbit", Opcode::Cbit, M::NONE),
  entry("load", Opcode::Load, M::NONE),
  entry("store", Opcode::Store, M::NONE),
  entry("ldc", Opcode::Ldc, M::ANY),
  entry("ldv", Opcode::Ldv, M::INTEGER_OR_NAME),
  entry("ldo", Opcode::Ldo, M::NONE),
  entry("ldz", Opcode::Ldz, M::NONE),
  entry("lget", Opcode::Lget, M::INTEGER_OR_NAME),
  entry("lset", Opcode::Lset, M::INTEGER_OR_NAME),
  entry("gget", Opcode::Gget, M::INTEGER_OR_NAME),
  entry("gset", Opcode::Gset, M::INTEGER_OR_NAME),
  entry("call", Opcode::Call, M::INTEGER_OR_NAME),
  entry("return", Opcode::Return, M::INTEGER),
  entry("jmp", Opcode::Jmp, M::NAME),
  entry("jt", Opcode::Jt, M::NAME),
  entry("jf", Opcode::Jf, M::NAME),
  entry("drop", Opcode::Drop, M::NONE),
  entry("dup", Opcode::Dup, M::NONE),
  entry("nop", Opcode::Nop, M::NONE),
  entry("trap", Opcode::Trap, M::NONE),
  entry("cat", Opcode::Cat, M::NONE),
  entry("fmt", Opcode::Fmt, M::NONE),
  entry("len", Opcode::Len, M::NONE),
];

/// Look up an opcode by its mnemonic.
pub fn lookup(mnemonic: &str) -> Option<&'static OpcodeDetail> {
  static INDEX: OnceLock<HashMap<&'static str, &'static OpcodeDetail>> = OnceLock::new();
  INDEX
    .get_or_init(|| OPCODES.iter().map(|detail| (detail.mnemonic, detail)).collect())
    .get(mnemonic)
    .copied()
}
