//! Recursive-descent parser producing a [`Program`] from the token stream.
//!
//! The grammar is line oriented: every declaration and instruction ends with
//! a line break token. Parsing stops at the first grammar violation.

use log::debug;

use crate::ast::{
  Function, Instruction, Literal, LiteralKind, Parameter, Program, TypeInfo, Variable, VariableKind,
};
use crate::error::{SyntaxResult, UnexpectedTokenSnafu};
use crate::opcode::ImmediateKind;
use crate::tokenizer::{TokenKind, Tokenizer};

/// Parse a whole program. Consumes the stream up to end of input.
pub fn parse(mut tokens: Tokenizer<'_>) -> SyntaxResult<Program> {
  let mut program = Program::default();

  loop {
    let (kind, line) = {
      let token = tokens.peek()?;
      (token.kind, token.line)
    };
    match kind {
      TokenKind::Global => {
        let var = parse_variable(&mut tokens, TokenKind::Global, VariableKind::Global)?;
        debug!("parsed global ${}", var.name);
        program.globals.push(var);
      }
      TokenKind::Func => {
        let func = parse_function(&mut tokens)?;
        debug!(
          "parsed function ${} ({} instructions)",
          func.name,
          func.body.len()
        );
        program.functions.push(func);
      }
      TokenKind::Eof => break,
      found => {
        return UnexpectedTokenSnafu {
          expected: vec![TokenKind::Global, TokenKind::Func, TokenKind::Eof],
          found,
          line,
        }
        .fail();
      }
    }
  }

  Ok(program)
}

/// `<keyword> NAME IDENT literal LBREAK`
fn parse_variable(
  tokens: &mut Tokenizer<'_>,
  keyword: TokenKind,
  kind: VariableKind,
) -> SyntaxResult<Variable> {
  tokens.expected(keyword)?;
  let name = tokens.expected(TokenKind::Name)?.into_text();
  let ty = TypeInfo::new(tokens.expected(TokenKind::Identifier)?.into_text());

  let token = tokens.expected_any(&[TokenKind::Integer, TokenKind::String])?;
  let literal_kind = match token.kind {
    TokenKind::String => LiteralKind::String,
    _ => LiteralKind::Integer,
  };
  let value = Literal {
    text: token.into_text(),
    kind: literal_kind,
  };
  tokens.expected(TokenKind::LBreak)?;

  Ok(Variable {
    name,
    ty,
    value,
    kind,
  })
}

fn parse_function(tokens: &mut Tokenizer<'_>) -> SyntaxResult<Function> {
  tokens.expected(TokenKind::Func)?;
  let mut func = Function {
    name: tokens.expected(TokenKind::Name)?.into_text(),
    ..Function::default()
  };

  tokens.expected(TokenKind::LParen)?;
  func.params = parse_parameter_list(tokens)?;
  tokens.expected(TokenKind::LParen)?;
  func.returns = parse_type_list(tokens)?;
  tokens.expected(TokenKind::LBreak)?;

  while tokens.peek_kind()? == TokenKind::Local {
    func
      .locals
      .push(parse_variable(tokens, TokenKind::Local, VariableKind::Local)?);
  }
  while tokens.peek_kind()? == TokenKind::Const {
    func
      .constants
      .push(parse_variable(tokens, TokenKind::Const, VariableKind::Const)?);
  }
  func.body = parse_body(tokens)?;

  tokens.expected(TokenKind::End)?;
  tokens.expected(TokenKind::LBreak)?;
  Ok(func)
}

/// Parameters up to and including the closing parenthesis.
fn parse_parameter_list(tokens: &mut Tokenizer<'_>) -> SyntaxResult<Vec<Parameter>> {
  let mut params = Vec::new();
  if tokens.peek_kind()? == TokenKind::RParen {
    tokens.advance()?;
    return Ok(params);
  }

  loop {
    let name = tokens.expected(TokenKind::Name)?.into_text();
    let ty = TypeInfo::new(tokens.expected(TokenKind::Identifier)?.into_text());
    params.push(Parameter { name, ty });

    if tokens.expected_any(&[TokenKind::Comma, TokenKind::RParen])?.kind == TokenKind::RParen {
      return Ok(params);
    }
  }
}

/// Type names up to and including the closing parenthesis.
fn parse_type_list(tokens: &mut Tokenizer<'_>) -> SyntaxResult<Vec<TypeInfo>> {
  let mut types = Vec::new();
  if tokens.peek_kind()? == TokenKind::RParen {
    tokens.advance()?;
    return Ok(types);
  }

  loop {
    types.push(TypeInfo::new(tokens.expected(TokenKind::Identifier)?.into_text()));

    if tokens.expected_any(&[TokenKind::Comma, TokenKind::RParen])?.kind == TokenKind::RParen {
      return Ok(types);
    }
  }
}

fn parse_body(tokens: &mut Tokenizer<'_>) -> SyntaxResult<Vec<Instruction>> {
  let mut body = Vec::new();

  while tokens.peek_kind()? == TokenKind::Opcode {
    let mnemonic = tokens.advance()?.into_text();
    let kind = match tokens.peek_kind()? {
      TokenKind::Integer => Some(ImmediateKind::Integer),
      TokenKind::String => Some(ImmediateKind::String),
      TokenKind::Name => Some(ImmediateKind::Name),
      _ => None,
    };
    let immediate = match kind {
      Some(kind) => Some((kind, tokens.advance()?.into_text())),
      None => None,
    };
    tokens.expected(TokenKind::LBreak)?;
    body.push(Instruction::new(mnemonic, immediate));
  }

  Ok(body)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::SyntaxError;
  use crate::tokenizer::tokenize;

  fn parse_str(source: &str) -> SyntaxResult<Program> {
    parse(tokenize(source))
  }

  #[test]
  fn parses_globals_and_functions() {
    let program = parse_str(
      "global $count int 10\n\
       global $name str \"fasm\"\n\
       func $add($a int, $b int)(int)\n\
       \tlocal $tmp int 0\n\
       \tconst $one int 1\n\
       \tlget $a\n\
       \tlget $b\n\
       \tadd\n\
       \treturn 1\n\
       end\n",
    )
    .unwrap();

    assert_eq!(program.globals.len(), 2);
    assert_eq!(program.globals[1].value.kind, LiteralKind::String);
    assert_eq!(program.globals[1].value.text, "fasm");

    let func = program.function("add").unwrap();
    assert_eq!(func.params.len(), 2);
    assert_eq!(func.params[1].name, "b");
    assert_eq!(func.returns, vec![TypeInfo::new("int")]);
    assert_eq!(func.locals[0].kind, VariableKind::Local);
    assert_eq!(func.constants[0].kind, VariableKind::Const);
    assert_eq!(func.body.len(), 4);
    assert_eq!(func.body[2].immediate, None);
    let ret = func.body[3].immediate.as_ref().unwrap();
    assert_eq!((ret.kind, ret.literal.as_str()), (ImmediateKind::Integer, "1"));
  }

  #[test]
  fn empty_lists_and_body() {
    let program = parse_str("func $noop()()\nend\n").unwrap();
    let func = &program.functions[0];
    assert!(func.params.is_empty());
    assert!(func.returns.is_empty());
    assert!(func.body.is_empty());
  }

  #[test]
  fn empty_source_is_an_empty_program() {
    assert_eq!(parse_str("").unwrap(), Program::default());
  }

  #[test]
  fn rejects_unexpected_top_level_token() {
    let err = parse_str("add\n").unwrap_err();
    assert!(matches!(
      err,
      SyntaxError::UnexpectedToken {
        found: TokenKind::Opcode,
        ..
      }
    ));
  }

  #[test]
  fn global_requires_literal() {
    let err = parse_str("global $x int $y\n").unwrap_err();
    assert_eq!(
      err,
      SyntaxError::UnexpectedToken {
        expected: vec![TokenKind::Integer, TokenKind::String],
        found: TokenKind::Name,
        line: 1,
      }
    );
  }

  #[test]
  fn parameters_need_commas() {
    let err = parse_str("func $f($a int $b int)()\nend\n").unwrap_err();
    assert_eq!(
      err,
      SyntaxError::UnexpectedToken {
        expected: vec![TokenKind::Comma, TokenKind::RParen],
        found: TokenKind::Name,
        line: 1,
      }
    );
  }

  #[test]
  fn trailing_comma_is_rejected() {
    assert!(parse_str("func $f()(int,)\nend\n").is_err());
  }

  #[test]
  fn locals_must_precede_constants() {
    let err = parse_str("func $f()()\nconst $c int 1\nlocal $l int 2\nend\n").unwrap_err();
    assert!(matches!(
      err,
      SyntaxError::UnexpectedToken {
        expected,
        found: TokenKind::Local,
        line: 3,
      } if expected == vec![TokenKind::End]
    ));
  }

  #[test]
  fn instruction_needs_line_break() {
    let err = parse_str("func $f()()\nldc 1 2\nend\n").unwrap_err();
    assert!(matches!(
      err,
      SyntaxError::UnexpectedToken {
        found: TokenKind::Integer,
        ..
      }
    ));
  }

  #[test]
  fn missing_end_is_reported() {
    let err = parse_str("func $f()()\nnop\n").unwrap_err();
    assert_eq!(
      err,
      SyntaxError::UnexpectedToken {
        expected: vec![TokenKind::End],
        found: TokenKind::Eof,
        line: 3,
      }
    );
  }

  #[test]
  fn name_literal_matches_in_every_position() {
    let program = parse_str("func $f($count int)()\nlget $count\nend\n").unwrap();
    let func = &program.functions[0];
    let imm = func.body[0].immediate.as_ref().unwrap();
    assert_eq!(func.params[0].name, "count");
    assert_eq!(imm.literal, "count");
    assert_eq!(imm.kind, ImmediateKind::Name);
  }
}
