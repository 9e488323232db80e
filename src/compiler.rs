//! # Compiler
//!
//! Compiles source text into bytecode in one pass: a Pratt parser that emits directly
//! into a [`Chunk`] without ever building an intermediate tree.

use crate::{chunk::Chunk, memory::Heap};

mod parser;

pub use parser::{ParseRule, Precedence};

/// Compile `source` into `out_chunk`. On success, `out_chunk` holds a well-formed
/// program terminated by `Return` and this returns `true`. On failure, `out_chunk` may
/// hold partial output and must not be executed.
pub fn compile(source: &str, heap: &mut Heap, out_chunk: &mut Chunk) -> bool {
  let mut parser = parser::Parser::new(source);
  parser.advance_token();
  parser.expression(heap, out_chunk);
  parser.consume_token(crate::scanner::TokenType::Eof, "Expect end of expression.");
  parser.end_compiler(out_chunk);
  !parser.had_error()
}
