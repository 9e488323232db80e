//! # Scanner
//!
//! Converts source text into a stream of [`Token`]s. The scanner is pull-based: the
//! compiler drives it one token at a time via [`Scanner::scan_next`]; past end-of-input
//! it returns `Eof` indefinitely.

use crate::utils::Init;

/// ## TokenType
///
/// The kind of a [`Token`]. Keywords that the compiler never consumes (`print`, `var`,
/// `class`, ...) are still produced — the lexer recognizes the full Lox keyword set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
  // Single-character tokens.
  LeftParen,
  RightParen,
  LeftBrace,
  RightBrace,
  Comma,
  Dot,
  Minus,
  Plus,
  Semicolon,
  Slash,
  Star,
  // One or two character tokens.
  Bang,
  BangEqual,
  Equal,
  EqualEqual,
  Greater,
  GreaterEqual,
  Less,
  LessEqual,
  // Literals.
  Identifier,
  String,
  Number,
  // Keywords.
  And,
  Class,
  Else,
  False,
  For,
  Fun,
  If,
  Nil,
  Or,
  Print,
  Return,
  Super,
  This,
  True,
  Var,
  While,
  // Error and EOF.
  Error,
  Eof,
}

/// ## Token
///
/// An immutable record: a kind, a borrowed view into the source buffer, and a 1-based
/// line/column of its first character. `Error` tokens carry a diagnostic message in the
/// `lexeme` field instead of a source slice.
#[derive(Debug, Clone, Copy)]
pub struct Token<'a> {
  pub(crate) token_type: TokenType,
  pub(crate) line: u32,
  pub(crate) column: u32,
  pub(crate) lexeme: &'a str,
}

impl<'a> Init for Token<'a> {}

impl<'a> Default for Token<'a> {
  fn default() -> Self {
    Self {
      token_type: TokenType::Eof,
      line: 1,
      column: 1,
      lexeme: "",
    }
  }
}

fn is_alpha(c: u8) -> bool {
  c.is_ascii_alphabetic() || c == b'_'
}

/// ## Scanner
///
/// Cursors over a borrowed source buffer. `column` tracks the column of the most
/// recently consumed byte; `token_start_column` snapshots it right after the first byte
/// of the token in progress is consumed, so multi-byte lexemes still report the column
/// of their first character.
#[derive(Debug)]
pub struct Scanner<'a> {
  pub(crate) source: &'a str,
  pub(crate) start: usize,
  pub(crate) current: usize,
  pub(crate) line: u32,
  pub(crate) column: i64,
  pub(crate) token_start_column: u32,
}

impl<'a> Scanner<'a> {
  fn string(&mut self) -> Token<'a> {
    while self.peek() != b'"' && !self.is_at_end() {
      if self.peek() == b'\n' {
        self.line += 1;
        self.column = -1;
      }
      self.advance();
    }

    if self.is_at_end() {
      return self.error_token("Unterminated string.");
    }

    self.advance();
    self.make_token(TokenType::String)
  }

  fn number(&mut self) -> Token<'a> {
    while self.peek().is_ascii_digit() {
      self.advance();
    }

    if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
      self.advance();
      while self.peek().is_ascii_digit() {
        self.advance();
      }
    }

    self.make_token(TokenType::Number)
  }

  fn identifier(&mut self) -> Token<'a> {
    while is_alpha(self.peek()) || self.peek().is_ascii_digit() {
      self.advance();
    }
    let token_type = self.identifier_type();
    self.make_token(token_type)
  }

  /// A trie over the first (and occasionally second) character of the lexeme, matching
  /// the reserved-word set exactly or falling back to `Identifier`.
  fn identifier_type(&self) -> TokenType {
    let lexeme = &self.source[self.start..self.current];
    let bytes = lexeme.as_bytes();
    match bytes.first() {
      Some(b'a') => self.check_keyword(lexeme, 1, "nd", TokenType::And),
      Some(b'c') => self.check_keyword(lexeme, 1, "lass", TokenType::Class),
      Some(b'e') => self.check_keyword(lexeme, 1, "lse", TokenType::Else),
      Some(b'f') if bytes.len() > 1 => match bytes[1] {
        b'a' => self.check_keyword(lexeme, 2, "lse", TokenType::False),
        b'o' => self.check_keyword(lexeme, 2, "r", TokenType::For),
        b'u' => self.check_keyword(lexeme, 2, "n", TokenType::Fun),
        _ => TokenType::Identifier,
      },
      Some(b'i') => self.check_keyword(lexeme, 1, "f", TokenType::If),
      Some(b'n') => self.check_keyword(lexeme, 1, "il", TokenType::Nil),
      Some(b'o') => self.check_keyword(lexeme, 1, "r", TokenType::Or),
      Some(b'p') => self.check_keyword(lexeme, 1, "rint", TokenType::Print),
      Some(b'r') => self.check_keyword(lexeme, 1, "eturn", TokenType::Return),
      Some(b's') => self.check_keyword(lexeme, 1, "uper", TokenType::Super),
      Some(b't') if bytes.len() > 1 => match bytes[1] {
        b'h' => self.check_keyword(lexeme, 2, "is", TokenType::This),
        b'r' => self.check_keyword(lexeme, 2, "ue", TokenType::True),
        _ => TokenType::Identifier,
      },
      Some(b'v') => self.check_keyword(lexeme, 1, "ar", TokenType::Var),
      Some(b'w') => self.check_keyword(lexeme, 1, "hile", TokenType::While),
      _ => TokenType::Identifier,
    }
  }

  fn check_keyword(&self, lexeme: &str, offset: usize, rest: &str, token_type: TokenType) -> TokenType {
    if lexeme.len() == offset + rest.len() && &lexeme[offset..] == rest {
      token_type
    } else {
      TokenType::Identifier
    }
  }
}

impl<'a> Scanner<'a> {
  fn make_token(&self, token_type: TokenType) -> Token<'a> {
    Token {
      token_type,
      line: self.line,
      column: self.token_start_column,
      lexeme: &self.source[self.start..self.current],
    }
  }

  fn error_token(&self, message: &'a str) -> Token<'a> {
    Token {
      token_type: TokenType::Error,
      line: self.line,
      column: self.token_start_column,
      lexeme: message,
    }
  }
}

impl<'a> Scanner<'a> {
  /// Return the next token and advance internal cursors. Past end-of-input, returns
  /// `Eof` forever.
  pub fn scan_next(&mut self) -> Token<'a> {
    self.skip_white_space();

    self.start = self.current;

    if self.is_at_end() {
      // Every other branch captures its column right after `advance()` has consumed the
      // token's first character, which already carries that character's "+1". `Eof`
      // never calls `advance()`, so it needs the same "+1" applied explicitly.
      self.token_start_column = self.column.max(0) as u32 + 1;
      return self.make_token(TokenType::Eof);
    }

    let c = self.advance();
    self.token_start_column = self.column.max(0) as u32;

    if c.is_ascii_digit() {
      return self.number();
    }
    if is_alpha(c) {
      return self.identifier();
    }

    match c {
      b'(' => self.make_token(TokenType::LeftParen),
      b')' => self.make_token(TokenType::RightParen),
      b'{' => self.make_token(TokenType::LeftBrace),
      b'}' => self.make_token(TokenType::RightBrace),
      b';' => self.make_token(TokenType::Semicolon),
      b',' => self.make_token(TokenType::Comma),
      b'.' => self.make_token(TokenType::Dot),
      b'-' => self.make_token(TokenType::Minus),
      b'+' => self.make_token(TokenType::Plus),
      b'/' => self.make_token(TokenType::Slash),
      b'*' => self.make_token(TokenType::Star),
      b'!' => {
        if self.match_next(b'=') {
          self.make_token(TokenType::BangEqual)
        } else {
          self.make_token(TokenType::Bang)
        }
      }
      b'=' => {
        if self.match_next(b'=') {
          self.make_token(TokenType::EqualEqual)
        } else {
          self.make_token(TokenType::Equal)
        }
      }
      b'<' => {
        if self.match_next(b'=') {
          self.make_token(TokenType::LessEqual)
        } else {
          self.make_token(TokenType::Less)
        }
      }
      b'>' => {
        if self.match_next(b'=') {
          self.make_token(TokenType::GreaterEqual)
        } else {
          self.make_token(TokenType::Greater)
        }
      }
      b'"' => self.string(),
      _ => self.error_token("Unexpected character."),
    }
  }
}

impl<'a> Scanner<'a> {
  fn is_at_end(&self) -> bool {
    self.current >= self.source.len()
  }

  fn advance(&mut self) -> u8 {
    self.current += 1;
    self.column += 1;
    self.source.as_bytes()[self.current - 1]
  }

  fn match_next(&mut self, expected: u8) -> bool {
    if self.is_at_end() {
      return false;
    }
    if self.source.as_bytes()[self.current] != expected {
      return false;
    }
    self.current += 1;
    self.column += 1;
    true
  }

  fn peek(&self) -> u8 {
    if self.is_at_end() {
      return b'\0';
    }
    self.source.as_bytes()[self.current]
  }

  fn peek_next(&self) -> u8 {
    if self.current + 1 >= self.source.len() {
      return b'\0';
    }
    self.source.as_bytes()[self.current + 1]
  }

  fn skip_white_space(&mut self) {
    loop {
      let c = self.peek();
      match c {
        b' ' | b'\r' | b'\t' => {
          self.advance();
        }
        b'\n' => {
          self.line += 1;
          self.column = -1;
          self.advance();
        }
        b'/' => {
          if self.peek_next() == b'/' {
            while self.peek() != b'\n' && !self.is_at_end() {
              self.advance();
            }
          } else {
            return;
          }
        }
        _ => return,
      }
    }
  }
}

impl<'a> Scanner<'a> {
  #[inline]
  pub fn init(src: &'a str) -> Self {
    Self {
      source: src,
      start: 0,
      current: 0,
      line: 1,
      column: 0,
      token_start_column: 1,
    }
  }

  #[inline]
  pub fn bind(src: &'a str) -> Self {
    Scanner::init(src)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scans_single_char_tokens() {
    let mut scanner = Scanner::init("(+)");
    assert_eq!(scanner.scan_next().token_type, TokenType::LeftParen);
    assert_eq!(scanner.scan_next().token_type, TokenType::Plus);
    assert_eq!(scanner.scan_next().token_type, TokenType::RightParen);
    assert_eq!(scanner.scan_next().token_type, TokenType::Eof);
  }

  #[test]
  fn equal_equal_is_not_two_equal_tokens() {
    let mut scanner = Scanner::init("==");
    let token = scanner.scan_next();
    assert_eq!(token.token_type, TokenType::EqualEqual);
    assert_eq!(token.lexeme, "==");
  }

  #[test]
  fn keywords_resolve_through_the_trie() {
    for (src, expected) in [
      ("and", TokenType::And),
      ("class", TokenType::Class),
      ("false", TokenType::False),
      ("for", TokenType::For),
      ("fun", TokenType::Fun),
      ("nil", TokenType::Nil),
      ("print", TokenType::Print),
      ("this", TokenType::This),
      ("true", TokenType::True),
      ("while", TokenType::While),
    ] {
      let mut scanner = Scanner::init(src);
      assert_eq!(scanner.scan_next().token_type, expected, "{src}");
    }
  }

  #[test]
  fn identifiers_are_not_keyword_prefixes() {
    let mut scanner = Scanner::init("printer");
    let token = scanner.scan_next();
    assert_eq!(token.token_type, TokenType::Identifier);
    assert_eq!(token.lexeme, "printer");
  }

  #[test]
  fn column_tracks_first_character_of_multi_byte_lexeme() {
    let mut scanner = Scanner::init("  foo");
    let token = scanner.scan_next();
    assert_eq!(token.column, 3);
    assert_eq!(token.lexeme, "foo");
  }

  #[test]
  fn newline_resets_column_for_next_token() {
    let mut scanner = Scanner::init("1\nfoo");
    scanner.scan_next();
    let token = scanner.scan_next();
    assert_eq!(token.line, 2);
    assert_eq!(token.column, 1);
  }

  #[test]
  fn eof_column_lands_one_past_the_last_character() {
    let mut scanner = Scanner::init("(1 + 2");
    loop {
      let token = scanner.scan_next();
      if token.token_type == TokenType::Eof {
        assert_eq!(token.line, 1);
        assert_eq!(token.column, 7);
        break;
      }
    }
  }

  #[test]
  fn unterminated_string_is_an_error_token() {
    let mut scanner = Scanner::init("\"abc");
    let token = scanner.scan_next();
    assert_eq!(token.token_type, TokenType::Error);
    assert_eq!(token.lexeme, "Unterminated string.");
  }

  #[test]
  fn unexpected_character_is_an_error_token() {
    let mut scanner = Scanner::init("@");
    let token = scanner.scan_next();
    assert_eq!(token.token_type, TokenType::Error);
  }
}
