//! Shared error types used across the assembly pipeline.
//!
//! Every failure is fatal to a run: the tokenizer and parser raise
//! [`SyntaxError`], the validator raises [`SemanticError`], and
//! [`CompileError`] lets `?` carry either one out of [`crate::compile`].

use snafu::Snafu;

use crate::tokenizer::TokenKind;

pub type SyntaxResult<T> = Result<T, SyntaxError>;
pub type SemanticResult<T> = Result<T, SemanticError>;
pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SyntaxError {
  #[snafu(display("line {line}: unterminated string"))]
  UnterminatedString { line: usize },

  #[snafu(display("line {line}: symbol not recognized: {symbol:?} ({})", u32::from(*symbol)))]
  UnrecognizedSymbol { symbol: char, line: usize },

  #[snafu(display("line {line}: expected {} but found {found}", describe_kinds(expected)))]
  UnexpectedToken {
    expected: Vec<TokenKind>,
    found: TokenKind,
    line: usize,
  },
}

fn describe_kinds(kinds: &[TokenKind]) -> String {
  match kinds {
    [single] => single.to_string(),
    _ => {
      let names: Vec<&str> = kinds.iter().map(|kind| kind.name()).collect();
      format!("( {} )", names.join(" "))
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SemanticError {
  #[snafu(display("invalid storage type '{name}'"))]
  InvalidStorageType { name: String },

  #[snafu(display("expected string literal for '{variable}', found {literal}"))]
  ExpectedStringLiteral { variable: String, literal: String },

  #[snafu(display("expected integer literal for '{variable}', found \"{literal}\""))]
  ExpectedIntegerLiteral { variable: String, literal: String },

  #[snafu(display("value '{literal}' is not an integer"))]
  NotAnInteger { literal: String },

  #[snafu(display("value '{literal}' out of range for '{type_name}'"))]
  ValueOutOfRange { literal: String, type_name: String },

  #[snafu(display("name '{name}' already defined in function '{function}'"))]
  DuplicateName { name: String, function: String },

  #[snafu(display("unknown instruction '{mnemonic}' in function '{function}'"))]
  UnknownOpcode { mnemonic: String, function: String },

  #[snafu(display("expected immediate for '{mnemonic}' in function '{function}'"))]
  MissingImmediate { mnemonic: String, function: String },

  #[snafu(display("unexpected immediate '{immediate}' for '{mnemonic}' in function '{function}'"))]
  UnexpectedImmediate {
    mnemonic: String,
    immediate: String,
    function: String,
  },

  #[snafu(display(
    "{kind} immediate '{immediate}' not allowed for '{mnemonic}' in function '{function}'"
  ))]
  ImmediateKindNotAllowed {
    mnemonic: String,
    immediate: String,
    kind: crate::opcode::ImmediateKind,
    function: String,
  },

  #[snafu(display("immediate value out of range '{immediate}' in function '{function}'"))]
  ImmediateOutOfRange { immediate: String, function: String },

  #[snafu(display(
    "expected {expected} return values instead of {found} in function '{function}'"
  ))]
  ReturnArityMismatch {
    expected: usize,
    found: u16,
    function: String,
  },
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CompileError {
  #[snafu(display("syntax error: {source}"), context(false))]
  Syntax { source: SyntaxError },

  #[snafu(display("semantic error: {source}"), context(false))]
  Semantic { source: SemanticError },
}
