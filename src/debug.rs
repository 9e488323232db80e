//! # Debug
//!
//! Disassembler: a pretty-printer over a [`Chunk`]'s opcode buffer, gated behind the
//! `debug_print_code`/`debug_trace_execution` features. Treated as a black box per the
//! crate's scope — it affects only stdout formatting, never program semantics, and its
//! exact text is not part of the interpreter's contract.

use crate::chunk::{Chunk, OpCode};

/// Pretty-prints a [`Chunk`]'s bytecode, one instruction per line, annotated with the
/// source line and column each byte was emitted at.
pub trait Disassemble {
  /// Disassemble every instruction in the chunk under a banner labeled `name`.
  fn disassemble(&self, name: &str);

  /// Disassemble the single instruction at `offset`, returning the offset of the next
  /// one (`offset + 1`, or more for multi-byte operands).
  fn disassemble_instruction(&self, offset: usize) -> usize;
}

impl Disassemble for Chunk {
  fn disassemble(&self, name: &str) {
    println!("== {name} ==");
    let mut offset = 0;
    while offset < self.code_len() {
      offset = self.disassemble_instruction(offset);
    }
  }

  fn disassemble_instruction(&self, offset: usize) -> usize {
    print!("{offset:04} ");

    if offset > 0 && self.line_at(offset) == self.line_at(offset - 1) {
      print!("   | ");
    } else {
      print!("{:4} ", self.line_at(offset));
    }
    if offset > 0 && self.column_at(offset) == self.column_at(offset - 1) {
      print!("  | ");
    } else {
      print!("{:3} ", self.column_at(offset));
    }

    match OpCode::from(self.read_byte(offset)) {
      OpCode::Nil => simple_instruction("OP_NIL", offset),
      OpCode::True => simple_instruction("OP_TRUE", offset),
      OpCode::False => simple_instruction("OP_FALSE", offset),
      OpCode::Not => simple_instruction("OP_NOT", offset),
      OpCode::Equal => simple_instruction("OP_EQUAL", offset),
      OpCode::NotEqual => simple_instruction("OP_NOT_EQUAL", offset),
      OpCode::Greater => simple_instruction("OP_GREATER", offset),
      OpCode::GreaterEqual => simple_instruction("OP_GREATER_EQUAL", offset),
      OpCode::Less => simple_instruction("OP_LESS", offset),
      OpCode::LessEqual => simple_instruction("OP_LESS_EQUAL", offset),
      OpCode::Negate => simple_instruction("OP_NEGATE", offset),
      OpCode::Add => simple_instruction("OP_ADD", offset),
      OpCode::Subtract => simple_instruction("OP_SUBTRACT", offset),
      OpCode::Multiply => simple_instruction("OP_MULTIPLY", offset),
      OpCode::Divide => simple_instruction("OP_DIVIDE", offset),
      OpCode::Return => simple_instruction("OP_RETURN", offset),
      OpCode::Constant => self.constant_instruction("OP_CONSTANT", offset),
      OpCode::ConstantLong => self.constant_long_instruction("OP_CONSTANT_LONG", offset),
    }
  }
}

impl Chunk {
  fn constant_instruction(&self, name: &str, offset: usize) -> usize {
    let index = self.read_byte(offset + 1);
    println!("{name:<18} {index:4} '{}'", self.read_constant(index as usize));
    offset + 2
  }

  fn constant_long_instruction(&self, name: &str, offset: usize) -> usize {
    let lo = self.read_byte(offset + 1) as usize;
    let mid = self.read_byte(offset + 2) as usize;
    let hi = self.read_byte(offset + 3) as usize;
    let index = lo | (mid << 8) | (hi << 16);
    println!("{name:<18} {index:4} '{}'", self.read_constant(index));
    offset + 4
  }
}

fn simple_instruction(name: &str, offset: usize) -> usize {
  println!("{name}");
  offset + 1
}
