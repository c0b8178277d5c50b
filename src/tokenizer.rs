//! Lexical analysis: turns the scanner's characters into typed tokens.
//!
//! Tokens are produced on demand with one token of lookahead. Identifiers
//! are reclassified as keywords or opcodes after capture, so `end` and `add`
//! never reach the parser as plain identifiers.

use std::fmt;

use log::trace;

use crate::error::{
  SyntaxError, SyntaxResult, UnexpectedTokenSnafu, UnrecognizedSymbolSnafu, UnterminatedStringSnafu,
};
use crate::opcode;
use crate::scanner::Scanner;

/// Kinds of tokens recognised by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
  Eof,
  Dot,
  Func,
  Global,
  Identifier,
  Local,
  Opcode,
  Name,
  LParen,
  RParen,
  Comma,
  Integer,
  Comment,
  End,
  LBreak,
  Const,
  String,
  Invalid,
}

impl TokenKind {
  /// Stable name used in diagnostics.
  pub fn name(self) -> &'static str {
    match self {
      Self::Eof => "TOK_EOF",
      Self::Dot => "TOK_DOT",
      Self::Func => "TOK_FUNC",
      Self::Global => "TOK_GLOBAL",
      Self::Identifier => "TOK_IDENTIFIER",
      Self::Local => "TOK_LOCAL",
      Self::Opcode => "TOK_OPCODE",
      Self::Name => "TOK_NAME",
      Self::LParen => "TOK_LPAREN",
      Self::RParen => "TOK_RPAREN",
      Self::Comma => "TOK_COMMA",
      Self::Integer => "TOK_INTEGER",
      Self::Comment => "TOK_COMMENT",
      Self::End => "TOK_END",
      Self::LBreak => "TOK_LBREAK",
      Self::Const => "TOK_CONST",
      Self::String => "TOK_STRING",
      Self::Invalid => "TOK_INVALID",
    }
  }
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

const KEYWORDS: [(&str, TokenKind); 5] = [
  ("global", TokenKind::Global),
  ("local", TokenKind::Local),
  ("const", TokenKind::Const),
  ("end", TokenKind::End),
  ("func", TokenKind::Func),
];

/// A classified token with its literal text and source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub literal: Option<String>,
  pub line: usize,
}

impl Token {
  pub fn new(kind: TokenKind, line: usize) -> Self {
    Self {
      kind,
      literal: None,
      line,
    }
  }

  pub fn with_literal(kind: TokenKind, literal: impl Into<String>, line: usize) -> Self {
    Self {
      kind,
      literal: Some(literal.into()),
      line,
    }
  }

  /// Literal text, or an empty string for tokens without a payload.
  pub fn text(&self) -> &str {
    self.literal.as_deref().unwrap_or("")
  }

  /// Consume the token, returning its literal text.
  pub fn into_text(self) -> String {
    self.literal.unwrap_or_default()
  }
}

fn is_word_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '_'
}

/// Pull-based token stream with a single cached lookahead token.
pub struct Tokenizer<'a> {
  scanner: Scanner<'a>,
  peeked: Option<Token>,
  finished: bool,
}

impl<'a> Tokenizer<'a> {
  pub fn new(scanner: Scanner<'a>) -> Self {
    Self {
      scanner,
      peeked: None,
      finished: false,
    }
  }

  /// Return the next token without consuming it.
  pub fn peek(&mut self) -> SyntaxResult<&Token> {
    let token = match self.peeked.take() {
      Some(token) => token,
      None => self.next_token()?,
    };
    Ok(self.peeked.insert(token))
  }

  pub fn peek_kind(&mut self) -> SyntaxResult<TokenKind> {
    self.peek().map(|token| token.kind)
  }

  pub fn advance(&mut self) -> SyntaxResult<Token> {
    match self.peeked.take() {
      Some(token) => Ok(token),
      None => self.next_token(),
    }
  }

  /// Consume the next token, failing unless it is of the given kind.
  pub fn expected(&mut self, kind: TokenKind) -> SyntaxResult<Token> {
    self.expected_any(&[kind])
  }

  /// Consume the next token, failing unless it is one of the given kinds.
  pub fn expected_any(&mut self, kinds: &[TokenKind]) -> SyntaxResult<Token> {
    let token = self.advance()?;
    if kinds.contains(&token.kind) {
      return Ok(token);
    }
    UnexpectedTokenSnafu {
      expected: kinds.to_vec(),
      found: token.kind,
      line: token.line,
    }
    .fail()
  }

  fn next_token(&mut self) -> SyntaxResult<Token> {
    self.scanner.skip_spaces();
    let line = self.scanner.line();
    let Some(c) = self.scanner.get() else {
      return Ok(Token::new(TokenKind::Eof, line));
    };

    let token = if c.is_ascii_alphabetic() {
      self.capture_identifier(c, line)
    } else if c.is_ascii_digit() || c == '+' || c == '-' {
      self.capture_integer(c, line)
    } else {
      match c {
        '$' => self.capture_name(line),
        '"' => self.capture_string(line)?,
        '.' => Token::with_literal(TokenKind::Dot, ".", line),
        '(' => Token::with_literal(TokenKind::LParen, "(", line),
        ')' => Token::with_literal(TokenKind::RParen, ")", line),
        ',' => Token::with_literal(TokenKind::Comma, ",", line),
        '\n' => Token::with_literal(TokenKind::LBreak, "\n", line),
        symbol => return UnrecognizedSymbolSnafu { symbol, line }.fail(),
      }
    };

    trace!("token {} {:?} on line {}", token.kind, token.text(), token.line);
    Ok(token)
  }

  fn capture_word(&mut self, literal: &mut String) {
    while let Some(c) = self.scanner.peek()
      && is_word_char(c)
    {
      literal.push(c);
      self.scanner.get();
    }
  }

  fn capture_identifier(&mut self, first: char, line: usize) -> Token {
    let mut literal = String::from(first);
    self.capture_word(&mut literal);

    let kind = KEYWORDS
      .iter()
      .find(|(keyword, _)| *keyword == literal)
      .map(|&(_, kind)| kind)
      .or_else(|| opcode::lookup(&literal).map(|_| TokenKind::Opcode))
      .unwrap_or(TokenKind::Identifier);
    Token::with_literal(kind, literal, line)
  }

  fn capture_name(&mut self, line: usize) -> Token {
    let mut literal = String::new();
    self.capture_word(&mut literal);
    Token::with_literal(TokenKind::Name, literal, line)
  }

  fn capture_integer(&mut self, first: char, line: usize) -> Token {
    let mut literal = String::from(first);
    while let Some(c) = self.scanner.peek()
      && c.is_ascii_digit()
    {
      literal.push(c);
      self.scanner.get();
    }
    Token::with_literal(TokenKind::Integer, literal, line)
  }

  fn capture_string(&mut self, line: usize) -> SyntaxResult<Token> {
    let mut literal = String::new();
    loop {
      match self.scanner.get() {
        Some('"') => return Ok(Token::with_literal(TokenKind::String, literal, line)),
        Some('\n') | None => return UnterminatedStringSnafu { line }.fail(),
        Some(c) => literal.push(c),
      }
    }
  }
}

/// Yields every token up to and including the end-of-input token, or the
/// first error.
impl Iterator for Tokenizer<'_> {
  type Item = SyntaxResult<Token>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.finished {
      return None;
    }
    let result = self.advance();
    if matches!(&result, Ok(token) if token.kind == TokenKind::Eof) || result.is_err() {
      self.finished = true;
    }
    Some(result)
  }
}

/// Build a token stream over `source`.
pub fn tokenize(source: &str) -> Tokenizer<'_> {
  Tokenizer::new(Scanner::new(source))
}

/// Lex the whole input eagerly, stopping at the first error.
pub fn collect_tokens(source: &str) -> Result<Vec<Token>, SyntaxError> {
  tokenize(source).collect()
}
