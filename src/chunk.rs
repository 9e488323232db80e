//! # Chunk
//!
//! A chunk is an executable unit: an opcode byte buffer, a constant pool, and two
//! run-length-encoded tables mapping each byte offset back to a source line and column.

use enum_repr::EnumFromU8;

use crate::{
  common::MAX_SHORT_CONSTANT_INDEX,
  rle::RunLengthTable,
  utils::Init,
  value::{Value, ValueArray},
};

/// ## OpCode
///
/// Byte-exact; the encoding is part of the interpreter's contract, not an
/// implementation detail — `Constant` and `ConstantLong` in particular must keep their
/// operand-size difference so the compiler and disassembler agree on instruction length.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumFromU8)]
pub enum OpCode {
  Nil = 0x00,
  True = 0x01,
  False = 0x02,
  Constant = 0x03,
  ConstantLong = 0x04,
  Not = 0x05,
  Equal = 0x06,
  NotEqual = 0x07,
  Greater = 0x08,
  GreaterEqual = 0x09,
  Less = 0x0A,
  LessEqual = 0x0B,
  Negate = 0x0C,
  Add = 0x0D,
  Subtract = 0x0E,
  Multiply = 0x0F,
  Divide = 0x10,
  Return = 0x11,
}

/// ## Chunk
///
/// Opcode buffer + constant pool + line/column tables. After every public mutation,
/// `lines.total_len() == columns.total_len() == code.len()`.
#[derive(Debug, Default, Clone)]
pub struct Chunk {
  pub(crate) code: Vec<u8>,
  pub(crate) constants: ValueArray,
  pub(crate) lines: RunLengthTable,
  pub(crate) columns: RunLengthTable,
}

impl Init for Chunk {}

impl Chunk {
  /// Append one byte, recording its source location in both RLE tables.
  pub fn write(&mut self, byte: u8, line: u32, column: u32) {
    self.code.push(byte);
    self.lines.append(line);
    self.columns.append(column);
  }

  /// Add `value` to the constant pool, returning its index. Does not touch `code`.
  pub fn add_constant(&mut self, value: Value) -> usize {
    self.constants.write(value)
  }

  /// Emit a `Constant`/`ConstantLong` instruction for `value` in one step, choosing the
  /// short or long form from the resulting constant-pool index.
  pub fn write_constant(&mut self, value: Value, line: u32, column: u32) {
    let index = self.add_constant(value);
    if index < MAX_SHORT_CONSTANT_INDEX {
      self.write(OpCode::Constant as u8, line, column);
      self.write(index as u8, line, column);
    } else {
      self.write(OpCode::ConstantLong as u8, line, column);
      self.write((index & 0xff) as u8, line, column);
      self.write(((index >> 8) & 0xff) as u8, line, column);
      self.write(((index >> 16) & 0xff) as u8, line, column);
    }
  }

  pub fn code_len(&self) -> usize {
    self.code.len()
  }

  pub fn read_byte(&self, offset: usize) -> u8 {
    self.code[offset]
  }

  pub fn read_constant(&self, index: usize) -> Value {
    self
      .constants
      .get(index)
      .expect("constant index out of bounds")
  }

  pub fn line_at(&self, offset: usize) -> u32 {
    self.lines.get(offset).unwrap_or(0)
  }

  pub fn column_at(&self, offset: usize) -> u32 {
    self.columns.get(offset).unwrap_or(0)
  }

  pub fn clear(&mut self) {
    self.code.clear();
    self.constants.clear();
    self.lines.clear();
    self.columns.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn location_tables_track_code_length() {
    let mut chunk = Chunk::init();
    chunk.write(OpCode::Nil as u8, 1, 1);
    chunk.write(OpCode::Return as u8, 1, 2);
    assert_eq!(chunk.lines.total_len(), chunk.code_len());
    assert_eq!(chunk.columns.total_len(), chunk.code_len());
  }

  #[test]
  fn short_constant_uses_one_byte_index() {
    let mut chunk = Chunk::init();
    chunk.write_constant(Value::number_val(1.0), 1, 1);
    assert_eq!(chunk.read_byte(0), OpCode::Constant as u8);
    assert_eq!(chunk.read_byte(1), 0);
    assert_eq!(chunk.code_len(), 2);
  }

  #[test]
  fn two_hundred_fifty_sixth_constant_uses_long_form() {
    let mut chunk = Chunk::init();
    for i in 0..255 {
      chunk.write_constant(Value::number_val(i as f64), 1, 1);
    }
    let offset_before = chunk.code_len();
    chunk.write_constant(Value::number_val(255.0), 1, 1);
    assert_eq!(chunk.read_byte(offset_before), OpCode::ConstantLong as u8);
    let lo = chunk.read_byte(offset_before + 1) as usize;
    let mid = chunk.read_byte(offset_before + 2) as usize;
    let hi = chunk.read_byte(offset_before + 3) as usize;
    let decoded = lo | (mid << 8) | (hi << 16);
    assert_eq!(decoded, 255);
    assert_eq!(chunk.read_constant(decoded), Value::number_val(255.0));
  }

  #[test]
  fn opcode_byte_values_are_stable() {
    assert_eq!(OpCode::Nil as u8, 0x00);
    assert_eq!(OpCode::Return as u8, 0x11);
    assert_eq!(OpCode::from(0x03), OpCode::Constant);
  }
}
