//! Character-level cursor over the source buffer.
//!
//! The scanner never fails: end of input is reported as `None`. Any run of
//! newlines and surrounding whitespace is collapsed into a single `'\n'`, so
//! blank lines never reach the tokenizer.

use std::iter::Peekable;
use std::str::Chars;

/// Whitespace as the dialect defines it; includes vertical tab.
fn is_space(c: char) -> bool {
  c.is_ascii_whitespace() || c == '\x0B'
}

pub struct Scanner<'a> {
  chars: Peekable<Chars<'a>>,
  line: usize,
}

impl<'a> Scanner<'a> {
  pub fn new(source: &'a str) -> Self {
    Self {
      chars: source.chars().peekable(),
      line: 1,
    }
  }

  /// Consume the next character. A newline also swallows every whitespace
  /// character that follows it, including further newlines.
  pub fn get(&mut self) -> Option<char> {
    let c = self.chars.next()?;
    if c != '\n' {
      return Some(c);
    }

    self.line += 1;
    while let Some(&next) = self.chars.peek()
      && is_space(next)
    {
      if next == '\n' {
        self.line += 1;
      }
      self.chars.next();
    }
    Some('\n')
  }

  pub fn peek(&mut self) -> Option<char> {
    self.chars.peek().copied()
  }

  /// Skip horizontal whitespace; stops on a newline.
  pub fn skip_spaces(&mut self) {
    while let Some(&next) = self.chars.peek()
      && next != '\n'
      && is_space(next)
    {
      self.chars.next();
    }
  }

  /// 1-based line of the next unconsumed character.
  pub fn line(&self) -> usize {
    self.line
  }
}
