//! Crate root: wires together the assembler front end.
//!
//! Source text flows strictly forward through the stages:
//! - `scanner` walks the characters and collapses blank lines.
//! - `tokenizer` classifies them into tokens with one token of lookahead.
//! - `parser` builds the [`Program`] tree by recursive descent.
//! - `semantic` resolves types and opcodes and checks the tree.
//!
//! `opcode` and `ty` hold the static tables shared by the stages, and
//! `error` the failure types each one raises.

pub mod ast;
pub mod error;
pub mod opcode;
pub mod parser;
pub mod scanner;
pub mod semantic;
pub mod tokenizer;
pub mod ty;

pub use ast::Program;
pub use error::{CompileError, CompileResult, SemanticError, SyntaxError};
pub use parser::parse;
pub use semantic::validate;
pub use tokenizer::{Token, TokenKind, Tokenizer, tokenize};

/// Parse and validate a source buffer.
pub fn compile(source: &str) -> CompileResult<Program> {
  let program = parse(tokenize(source))?;
  log::debug!(
    "parsed {} globals and {} functions",
    program.globals.len(),
    program.functions.len()
  );
  Ok(validate(program)?)
}
