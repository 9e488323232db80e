//! # Parser
//!
//! Submodule of `compiler`: single-token-lookahead Pratt parser driving the [`Scanner`]
//! and emitting directly into a [`Chunk`]. The chunk and the [`Heap`] are passed as
//! explicit parameters through every parse step rather than reached through statics —
//! there is no `compiling_chunk` pointer to keep in sync.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::{chunk::Chunk, memory::Heap, scanner::{Scanner, Token, TokenType}};

mod compile_time_error_handlers;
mod emit_methods;
mod ops_after_get_parse_rule;

type ParseFn = for<'src> fn(&mut Parser<'src>, &mut Heap, &mut Chunk);

/// ## Precedence
///
/// Strictly increasing in declaration order, so comparisons (`<=`, `<`) between levels
/// are just derived `Ord`. Note `==` is registered at `Comparison` rather than
/// `Equality` in [`RULES`] below — a deliberate quirk, not a bug: combined with `!=` at
/// `Equality`, `a == b != c` parses as `a == (b != c)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
  None,
  Assignment,
  Or,
  And,
  Equality,
  Comparison,
  Term,
  Factor,
  Unary,
  Call,
  Primary,
}

impl Precedence {
  /// The next-tighter level, used to parse a binary operator's right operand so that
  /// same-precedence operators are left-associative.
  pub fn next(self) -> Self {
    match self {
      Precedence::None => Precedence::Assignment,
      Precedence::Assignment => Precedence::Or,
      Precedence::Or => Precedence::And,
      Precedence::And => Precedence::Equality,
      Precedence::Equality => Precedence::Comparison,
      Precedence::Comparison => Precedence::Term,
      Precedence::Term => Precedence::Factor,
      Precedence::Factor => Precedence::Unary,
      Precedence::Unary => Precedence::Call,
      Precedence::Call | Precedence::Primary => Precedence::Primary,
    }
  }
}

/// ## ParseRule
///
/// A token's prefix parser, infix parser, and infix precedence. Rows with no parse
/// function are simply absent from [`RULES`]; [`Parser::get_rule`] substitutes
/// [`ParseRule::none`] for any token not listed.
#[derive(Clone, Copy)]
pub struct ParseRule {
  pub prefix: Option<ParseFn>,
  pub infix: Option<ParseFn>,
  pub precedence: Precedence,
}

impl ParseRule {
  const fn none() -> Self {
    Self {
      prefix: None,
      infix: None,
      precedence: Precedence::None,
    }
  }

  const fn new(prefix: Option<ParseFn>, infix: Option<ParseFn>, precedence: Precedence) -> Self {
    Self {
      prefix,
      infix,
      precedence,
    }
  }
}

static RULES: Lazy<HashMap<TokenType, ParseRule>> = Lazy::new(|| {
  use ops_after_get_parse_rule::{binary, grouping, literal, number, unary};
  use Precedence::*;
  use TokenType::*;

  HashMap::from([
    (LeftParen, ParseRule::new(Some(grouping), None, None)),
    (Minus, ParseRule::new(Some(unary), Some(binary), Term)),
    (Plus, ParseRule::new(Some(unary), Some(binary), Term)),
    (Slash, ParseRule::new(None, Some(binary), Factor)),
    (Star, ParseRule::new(None, Some(binary), Factor)),
    (Bang, ParseRule::new(Some(unary), None, None)),
    (BangEqual, ParseRule::new(None, Some(binary), Equality)),
    (EqualEqual, ParseRule::new(None, Some(binary), Comparison)),
    (Greater, ParseRule::new(None, Some(binary), Comparison)),
    (GreaterEqual, ParseRule::new(None, Some(binary), Comparison)),
    (Less, ParseRule::new(None, Some(binary), Comparison)),
    (LessEqual, ParseRule::new(None, Some(binary), Comparison)),
    (Number, ParseRule::new(Some(number), None, None)),
    (False, ParseRule::new(Some(literal), None, None)),
    (Nil, ParseRule::new(Some(literal), None, None)),
    (True, ParseRule::new(Some(literal), None, None)),
  ])
});

/// ## Parser
///
/// Single-token-lookahead parser state. `had_error`/`panic_mode` implement the error
/// recovery policy: the first error sets both, later ones are suppressed until a
/// synchronization point — which this grammar, having no statements, never reaches.
pub struct Parser<'src> {
  scanner: Scanner<'src>,
  current: Token<'src>,
  previous: Token<'src>,
  had_error: bool,
  panic_mode: bool,
  /// The exact text of the first diagnostic reported this parse, if any — the same
  /// string written to stderr, kept around so it can be asserted on in tests.
  last_error: Option<String>,
}

impl<'src> Parser<'src> {
  pub fn new(source: &'src str) -> Self {
    Self {
      scanner: Scanner::init(source),
      current: Token::default(),
      previous: Token::default(),
      had_error: false,
      panic_mode: false,
      last_error: None,
    }
  }

  pub fn had_error(&self) -> bool {
    self.had_error
  }

  /// The exact text of the first diagnostic reported this parse, if any.
  pub fn last_error(&self) -> Option<&str> {
    self.last_error.as_deref()
  }

  /// Advance past error tokens automatically, reporting each and continuing — mirrors
  /// the contract that the lexer never throws: errors are tokens the parser consumes.
  pub fn advance_token(&mut self) {
    self.previous = self.current;
    loop {
      self.current = self.scanner.scan_next();
      if self.current.token_type != TokenType::Error {
        break;
      }
      let message = self.current.lexeme.to_owned();
      self.error_at_current(&message);
    }
  }

  pub fn consume_token(&mut self, token_type: TokenType, message: &str) {
    if self.current.token_type == token_type {
      self.advance_token();
      return;
    }
    self.error_at_current(message);
  }

  pub fn get_rule(&self, token_type: TokenType) -> ParseRule {
    RULES.get(&token_type).copied().unwrap_or(ParseRule::none())
  }

  /// Parse anything at `precedence` or tighter: a prefix parse, then as many infix
  /// parses as the lookahead token's precedence allows.
  pub fn parse_precedence(&mut self, precedence: Precedence, heap: &mut Heap, chunk: &mut Chunk) {
    self.advance_token();
    let Some(prefix_rule) = self.get_rule(self.previous.token_type).prefix else {
      self.error("Expected expression");
      return;
    };
    prefix_rule(self, heap, chunk);

    while precedence <= self.get_rule(self.current.token_type).precedence {
      self.advance_token();
      let infix_rule = self
        .get_rule(self.previous.token_type)
        .infix
        .expect("precedence loop only continues for tokens with an infix rule");
      infix_rule(self, heap, chunk);
    }
  }

  pub fn expression(&mut self, heap: &mut Heap, chunk: &mut Chunk) {
    self.parse_precedence(Precedence::Assignment, heap, chunk);
  }
}
