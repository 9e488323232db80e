//! Thin CLI shell around [`loxvm`]: reads a file or runs a REPL, maps an
//! [`InterpretError`] to the conventional compile/runtime exit codes. Flag parsing,
//! the REPL loop, and file I/O are the one piece of this crate explicitly out of scope
//! for the interpreter itself — this binary exists only to drive it.

use std::io::Write;
use std::process::ExitCode;

use loxvm::vm::{InterpretError, VM};

fn main() -> ExitCode {
  env_logger::init();

  let mut args = std::env::args().skip(1);
  match args.next() {
    None => {
      run_repl();
      ExitCode::SUCCESS
    }
    Some(path) => run_file(&path),
  }
}

fn run_file(path: &str) -> ExitCode {
  let source = match std::fs::read_to_string(path) {
    Ok(source) => source,
    Err(err) => {
      eprintln!("Error: could not read '{path}': {err}");
      return ExitCode::from(74);
    }
  };

  let mut vm = VM::default();
  match vm.interpret(&source) {
    Ok(()) => ExitCode::SUCCESS,
    Err(InterpretError::CompileError(_)) => ExitCode::from(65),
    Err(InterpretError::RuntimeError(_)) => ExitCode::from(70),
  }
}

fn run_repl() {
  let mut vm = VM::default();
  let mut line = String::new();
  loop {
    print!("> ");
    std::io::stdout().flush().expect("flush stdout");
    line.clear();
    match std::io::stdin().read_line(&mut line) {
      Ok(0) => break,
      Ok(_) => {
        if let Err(err) = vm.interpret(&line) {
          log::debug!("repl line failed: {err}");
        }
      }
      Err(err) => {
        eprintln!("Error: failed to read from stdin: {err}");
        break;
      }
    }
  }
}
