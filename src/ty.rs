use std::fmt;
use std::ops::RangeInclusive;

/// Storage type a declared type name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
  Int,
  Str,
}

impl fmt::Display for ValueType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Int => "int",
      Self::Str => "str",
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDetails {
  pub name: &'static str,
  pub value_type: ValueType,
  /// Accepted literal values; `None` for non-numeric storage.
  pub range: Option<RangeInclusive<i64>>,
}

/// `int` accepts anything that fits in 32 bits, signed or unsigned.
static TYPES: [TypeDetails; 2] = [
  TypeDetails {
    name: "int",
    value_type: ValueType::Int,
    range: Some(i32::MIN as i64..=u32::MAX as i64),
  },
  TypeDetails {
    name: "str",
    value_type: ValueType::Str,
    range: None,
  },
];

pub fn lookup(name: &str) -> Option<&'static TypeDetails> {
  TYPES.iter().find(|details| details.name == name)
}
