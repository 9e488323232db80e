//! Exercises the interpreter over a fixture `.lox` file, located via `project-root`
//! rather than a path relative to the test binary's own working directory (which cargo
//! does not guarantee).

use std::fs::read_to_string;
use std::io::Write;

use loxvm::vm::VM;
use project_root::get_project_root;

#[test]
fn interprets_a_fixture_file() {
  let project_root = get_project_root().expect("there is no project root");
  let fixture_path = project_root.join("tests/fixtures/arithmetic.lox");
  let source = read_to_string(&fixture_path)
    .unwrap_or_else(|err| panic!("failed to read {fixture_path:?}: {err}"));

  let mut buf = Vec::new();
  let result = {
    let mut vm = VM::with_output(Default::default(), Box::new(&mut buf));
    vm.interpret(&source)
  };

  assert!(result.is_ok(), "{result:?}");
  assert_eq!(String::from_utf8(buf).unwrap(), "5\n");
}
