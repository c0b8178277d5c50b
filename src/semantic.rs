//! Semantic validation over a parsed [`Program`].
//!
//! A single in-order pass resolves declared types and opcodes in place and
//! stops at the first violation. Name uniqueness is checked per function
//! across parameters, locals and constants; globals live in their own
//! namespace.

use std::collections::HashSet;
use std::num::IntErrorKind;

use log::debug;
use snafu::{OptionExt, ensure};

use crate::ast::{Function, Instruction, LiteralKind, Program, TypeInfo, Variable};
use crate::error::{
  DuplicateNameSnafu, ExpectedIntegerLiteralSnafu, ExpectedStringLiteralSnafu,
  ImmediateKindNotAllowedSnafu, ImmediateOutOfRangeSnafu, InvalidStorageTypeSnafu,
  MissingImmediateSnafu, NotAnIntegerSnafu, ReturnArityMismatchSnafu, SemanticResult,
  UnexpectedImmediateSnafu, UnknownOpcodeSnafu, ValueOutOfRangeSnafu,
};
use crate::opcode::{self, ImmediateKind, Opcode};
use crate::ty::{self, TypeDetails, ValueType};

/// Largest integer immediate an instruction can encode (10 bits).
pub const IMMEDIATE_MAX: u16 = (1 << 10) - 1;

/// Validate `program`, returning it with every resolved field filled in.
pub fn validate(mut program: Program) -> SemanticResult<Program> {
  for var in &mut program.globals {
    validate_variable(var)?;
  }
  for func in &mut program.functions {
    validate_function(func)?;
    debug!("validated function ${}", func.name);
  }
  Ok(program)
}

/// Resolve a declared type name against the storage type table.
pub fn validate_type(ty: &mut TypeInfo) -> SemanticResult<&'static TypeDetails> {
  let details = ty::lookup(&ty.name).context(InvalidStorageTypeSnafu { name: &ty.name })?;
  ty.resolved = Some(details.value_type);
  Ok(details)
}

fn validate_variable(var: &mut Variable) -> SemanticResult<()> {
  let details = validate_type(&mut var.ty)?;
  let literal = &var.value;

  match details.value_type {
    ValueType::Str => ensure!(
      literal.kind == LiteralKind::String,
      ExpectedStringLiteralSnafu {
        variable: &var.name,
        literal: &literal.text,
      }
    ),
    ValueType::Int => {
      ensure!(
        literal.kind == LiteralKind::Integer,
        ExpectedIntegerLiteralSnafu {
          variable: &var.name,
          literal: &literal.text,
        }
      );
      let out_of_range = ValueOutOfRangeSnafu {
        literal: &literal.text,
        type_name: &var.ty.name,
      };
      let value = parse_integer(&literal.text)?.context(out_of_range)?;
      let in_range = details
        .range
        .as_ref()
        .is_none_or(|range| range.contains(&value));
      ensure!(in_range, out_of_range);
    }
  }
  Ok(())
}

/// Parse integer literal text. `Ok(None)` means the text is numeric but does
/// not fit in 64 bits.
fn parse_integer(text: &str) -> SemanticResult<Option<i64>> {
  match text.parse::<i64>() {
    Ok(value) => Ok(Some(value)),
    Err(err) if matches!(err.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
      Ok(None)
    }
    Err(_) => NotAnIntegerSnafu { literal: text }.fail(),
  }
}

fn validate_function(func: &mut Function) -> SemanticResult<()> {
  let function = func.name.clone();
  let mut names: HashSet<String> = HashSet::new();
  let mut declare = |name: &str| -> SemanticResult<()> {
    ensure!(
      names.insert(name.to_string()),
      DuplicateNameSnafu {
        name,
        function: &function,
      }
    );
    Ok(())
  };

  for param in &mut func.params {
    validate_type(&mut param.ty)?;
    declare(&param.name)?;
  }
  for ty in &mut func.returns {
    validate_type(ty)?;
  }
  for var in func.locals.iter_mut().chain(func.constants.iter_mut()) {
    validate_variable(var)?;
    declare(&var.name)?;
  }

  let returns = func.returns.len();
  for instr in &mut func.body {
    validate_instruction(&function, returns, instr)?;
  }
  Ok(())
}

fn validate_instruction(
  function: &str,
  returns: usize,
  instr: &mut Instruction,
) -> SemanticResult<()> {
  let mnemonic = &instr.opcode.literal;
  let detail = opcode::lookup(mnemonic).context(UnknownOpcodeSnafu { mnemonic, function })?;
  instr.opcode.opcode = Some(detail.opcode);

  let Some(immediate) = &mut instr.immediate else {
    ensure!(
      !detail.requires_immediate(),
      MissingImmediateSnafu { mnemonic, function }
    );
    return Ok(());
  };

  ensure!(
    detail.requires_immediate(),
    UnexpectedImmediateSnafu {
      mnemonic,
      immediate: &immediate.literal,
      function,
    }
  );
  ensure!(
    detail.immediates.allows(immediate.kind),
    ImmediateKindNotAllowedSnafu {
      mnemonic,
      immediate: &immediate.literal,
      kind: immediate.kind,
      function,
    }
  );

  if immediate.kind != ImmediateKind::Integer {
    return Ok(());
  }

  let out_of_range = ImmediateOutOfRangeSnafu {
    immediate: &immediate.literal,
    function,
  };
  let value = parse_integer(&immediate.literal)?
    .and_then(|value| u16::try_from(value).ok())
    .filter(|value| *value <= IMMEDIATE_MAX)
    .context(out_of_range)?;
  immediate.value = Some(value);

  if detail.opcode == Opcode::Return {
    ensure!(
      usize::from(value) == returns,
      ReturnArityMismatchSnafu {
        expected: returns,
        found: value,
        function,
      }
    );
  }
  Ok(())
}
