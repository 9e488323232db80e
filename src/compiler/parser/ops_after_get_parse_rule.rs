//! Prefix/infix parse functions reachable through the Pratt table. Each is a free
//! function rather than a method so it can be stored as a plain function pointer in a
//! [`super::ParseRule`].

use crate::{chunk::{Chunk, OpCode}, memory::Heap, scanner::TokenType, value::Value};

use super::Parser;

pub(super) fn number<'src>(parser: &mut Parser<'src>, _heap: &mut Heap, chunk: &mut Chunk) {
  let value: f64 = parser
    .previous
    .lexeme
    .parse()
    .expect("scanner only produces well-formed number lexemes");
  parser.emit_constant(chunk, Value::number_val(value));
}

pub(super) fn grouping<'src>(parser: &mut Parser<'src>, heap: &mut Heap, chunk: &mut Chunk) {
  parser.expression(heap, chunk);
  parser.consume_token(TokenType::RightParen, "Expect ')' after expression.");
}

pub(super) fn unary<'src>(parser: &mut Parser<'src>, heap: &mut Heap, chunk: &mut Chunk) {
  let operator = parser.previous;
  parser.parse_precedence(super::Precedence::Unary, heap, chunk);
  match operator.token_type {
    TokenType::Minus => parser.emit_byte(chunk, OpCode::Negate as u8, operator.line, operator.column),
    TokenType::Bang => parser.emit_byte(chunk, OpCode::Not as u8, operator.line, operator.column),
    TokenType::Plus => {}
    _ => unreachable!("unary is only registered as the prefix rule for -, ! and +"),
  }
}

pub(super) fn binary<'src>(parser: &mut Parser<'src>, heap: &mut Heap, chunk: &mut Chunk) {
  let operator = parser.previous;
  let rule = parser.get_rule(operator.token_type);
  parser.parse_precedence(rule.precedence.next(), heap, chunk);

  let opcode = match operator.token_type {
    TokenType::Plus => OpCode::Add,
    TokenType::Minus => OpCode::Subtract,
    TokenType::Star => OpCode::Multiply,
    TokenType::Slash => OpCode::Divide,
    TokenType::EqualEqual => OpCode::Equal,
    TokenType::BangEqual => OpCode::NotEqual,
    TokenType::Less => OpCode::Less,
    TokenType::LessEqual => OpCode::LessEqual,
    TokenType::Greater => OpCode::Greater,
    TokenType::GreaterEqual => OpCode::GreaterEqual,
    _ => unreachable!("binary is only registered as the infix rule for arithmetic/comparison operators"),
  };
  parser.emit_byte(chunk, opcode as u8, operator.line, operator.column);
}

pub(super) fn literal<'src>(parser: &mut Parser<'src>, _heap: &mut Heap, chunk: &mut Chunk) {
  let opcode = match parser.previous.token_type {
    TokenType::False => OpCode::False,
    TokenType::Nil => OpCode::Nil,
    TokenType::True => OpCode::True,
    _ => unreachable!("literal is only registered as the prefix rule for false/nil/true"),
  };
  parser.emit_default_byte(chunk, opcode as u8);
}
