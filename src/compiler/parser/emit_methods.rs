//! Bytecode emission for [`super::Parser`]. Every emitted byte is tagged with a source
//! location; the chunk is passed in explicitly rather than reached through a static, so
//! nothing here needs a `compiling_chunk` pointer.

use crate::{chunk::{Chunk, OpCode}, value::Value};

use super::Parser;

impl<'src> Parser<'src> {
  /// Append one byte at an explicit location — used when the emitting token (an
  /// operator) isn't `previous` by the time the opcode is chosen, e.g. in `unary`/
  /// `binary`, which parse a right operand before emitting.
  pub(super) fn emit_byte(&self, chunk: &mut Chunk, byte: u8, line: u32, column: u32) {
    chunk.write(byte, line, column);
  }

  /// Append one byte at the `previous` token's location.
  pub(super) fn emit_default_byte(&self, chunk: &mut Chunk, byte: u8) {
    self.emit_byte(chunk, byte, self.previous.line, self.previous.column);
  }

  pub(super) fn emit_constant(&self, chunk: &mut Chunk, value: Value) {
    chunk.write_constant(value, self.previous.line, self.previous.column);
  }

  pub(super) fn emit_return(&self, chunk: &mut Chunk) {
    self.emit_default_byte(chunk, OpCode::Return as u8);
  }

  pub(super) fn end_compiler(&self, chunk: &mut Chunk) {
    self.emit_return(chunk);
    #[cfg(feature = "debug_print_code")]
    if !self.had_error {
      crate::debug::Disassemble::disassemble(chunk, "code");
    }
  }
}
