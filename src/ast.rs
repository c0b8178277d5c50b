//! Syntax tree produced by the parser and annotated by the validator.
//!
//! Every parent owns its children by value. Fields the validator fills in
//! (`resolved`, `opcode`, `value`) stay `None` until [`crate::validate`] runs.
//!
//! `Display` writes each node back out in source form, so a printed
//! [`Program`] parses to an equal tree.

use std::fmt;

use crate::opcode::{ImmediateKind, Opcode};
use crate::ty::ValueType;

/// Declared type name plus the storage type it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
  pub name: String,
  pub resolved: Option<ValueType>,
}

impl TypeInfo {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      resolved: None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
  Global,
  Local,
  Const,
}

impl VariableKind {
  pub fn keyword(self) -> &'static str {
    match self {
      Self::Global => "global",
      Self::Local => "local",
      Self::Const => "const",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
  Integer,
  String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
  pub text: String,
  pub kind: LiteralKind,
}

/// A `global`, `local` or `const` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
  pub name: String,
  pub ty: TypeInfo,
  pub value: Literal,
  pub kind: VariableKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
  pub name: String,
  pub ty: TypeInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcodeInfo {
  pub literal: String,
  pub opcode: Option<Opcode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Immediate {
  pub literal: String,
  pub kind: ImmediateKind,
  /// Numeric value of an integer immediate.
  pub value: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
  pub opcode: OpcodeInfo,
  pub immediate: Option<Immediate>,
}

impl Instruction {
  pub fn new(mnemonic: impl Into<String>, immediate: Option<(ImmediateKind, String)>) -> Self {
    Self {
      opcode: OpcodeInfo {
        literal: mnemonic.into(),
        opcode: None,
      },
      immediate: immediate.map(|(kind, literal)| Immediate {
        literal,
        kind,
        value: None,
      }),
    }
  }
}

/// A function with its signature, storage and instruction body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Function {
  pub name: String,
  pub params: Vec<Parameter>,
  pub returns: Vec<TypeInfo>,
  pub locals: Vec<Variable>,
  pub constants: Vec<Variable>,
  pub body: Vec<Instruction>,
}

/// Root of the tree: globals and functions in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
  pub globals: Vec<Variable>,
  pub functions: Vec<Function>,
}

impl Program {
  pub fn function(&self, name: &str) -> Option<&Function> {
    self.functions.iter().find(|func| func.name == name)
  }
}

impl fmt::Display for Literal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.kind {
      LiteralKind::Integer => f.write_str(&self.text),
      LiteralKind::String => write!(f, "\"{}\"", self.text),
    }
  }
}

impl fmt::Display for Variable {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} ${} {} {}",
      self.kind.keyword(),
      self.name,
      self.ty.name,
      self.value
    )
  }
}

impl fmt::Display for Immediate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.kind {
      ImmediateKind::Integer => f.write_str(&self.literal),
      ImmediateKind::String => write!(f, "\"{}\"", self.literal),
      ImmediateKind::Name => write!(f, "${}", self.literal),
    }
  }
}

impl fmt::Display for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.opcode.literal)?;
    if let Some(immediate) = &self.immediate {
      write!(f, " {immediate}")?;
    }
    Ok(())
  }
}

impl fmt::Display for Function {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "func ${}(", self.name)?;
    for (i, param) in self.params.iter().enumerate() {
      if i != 0 {
        f.write_str(", ")?;
      }
      write!(f, "${} {}", param.name, param.ty.name)?;
    }
    f.write_str(")(")?;
    for (i, ty) in self.returns.iter().enumerate() {
      if i != 0 {
        f.write_str(", ")?;
      }
      f.write_str(&ty.name)?;
    }
    f.write_str(")\n")?;

    for var in self.locals.iter().chain(&self.constants) {
      writeln!(f, "    {var}")?;
    }
    for instr in &self.body {
      writeln!(f, "    {instr}")?;
    }
    f.write_str("end\n")
  }
}

impl fmt::Display for Program {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for var in &self.globals {
      writeln!(f, "{var}")?;
    }
    for (i, func) in self.functions.iter().enumerate() {
      if i != 0 || !self.globals.is_empty() {
        f.write_str("\n")?;
      }
      write!(f, "{func}")?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn prints_function_in_source_form() {
    let func = Function {
      name: "main".into(),
      params: vec![Parameter {
        name: "argc".into(),
        ty: TypeInfo::new("int"),
      }],
      returns: vec![TypeInfo::new("int"), TypeInfo::new("str")],
      locals: vec![Variable {
        name: "msg".into(),
        ty: TypeInfo::new("str"),
        value: Literal {
          text: "hi there".into(),
          kind: LiteralKind::String,
        },
        kind: VariableKind::Local,
      }],
      constants: Vec::new(),
      body: vec![
        Instruction::new("ldc", Some((ImmediateKind::Name, "msg".into()))),
        Instruction::new("return", Some((ImmediateKind::Integer, "2".into()))),
        Instruction::new("nop", None),
      ],
    };

    assert_eq!(
      func.to_string(),
      "func $main($argc int)(int, str)\n    local $msg str \"hi there\"\n    ldc $msg\n    return 2\n    nop\nend\n"
    );
  }

  #[test]
  fn program_without_globals_starts_with_func() {
    let program = Program {
      globals: Vec::new(),
      functions: vec![
        Function {
          name: "a".into(),
          ..Function::default()
        },
        Function {
          name: "b".into(),
          ..Function::default()
        },
      ],
    };
    assert_eq!(program.to_string(), "func $a()()\nend\n\nfunc $b()()\nend\n");
  }
}
