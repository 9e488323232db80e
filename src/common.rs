//! # Common
//!
//! Shared constants and run-time configuration for the interpreter.

#![allow(dead_code)]

/// Upper bound on the value stack used by the source implementation (2^24 entries).
///
/// We document a much smaller default (see [`VmConfig::default`]) rather than actually
/// reserving 16 million [`crate::value::Value`] slots up front; a smaller, documented
/// bound is sufficient for any program this interpreter will actually run.
pub const STACK_MAX_UPPER_BOUND: usize = 1 << 24;

/// Default value-stack capacity.
pub const DEFAULT_STACK_MAX: usize = 4096;

/// Minimum capacity a growable table (intern table, RLE run buffer) starts at.
pub const DEFAULT_CAPACITY: usize = 8;

/// Load factor above which the intern table grows.
pub const TABLE_MAX_LOAD: f64 = 0.75;

/// Largest constant-pool index representable by the single-byte `Constant` opcode.
///
/// Indices at or above this value require `ConstantLong`.
pub const MAX_SHORT_CONSTANT_INDEX: usize = 255;

/// Run-time configuration for a [`crate::vm::VM`].
///
/// Mirrors the shape of plain configuration structs in the wider codebase (a flat
/// `Default`-able struct with a `validate` step) rather than reading environment
/// variables directly — the interpreter has no deployment-time knobs beyond these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VmConfig {
  /// Maximum number of entries the value stack may hold before a push aborts.
  pub stack_max: usize,
  /// Whether the VM logs one `log::trace!` line per executed opcode. Independent of the
  /// `debug_trace_execution`/`debug_trace_stack` feature flags, which gate the
  /// disassembler's own stdout pretty-printing rather than the `log` facade.
  pub trace_execution: bool,
}

impl Default for VmConfig {
  fn default() -> Self {
    Self {
      stack_max: DEFAULT_STACK_MAX,
      trace_execution: false,
    }
  }
}

impl VmConfig {
  /// Reject configurations that could not back a working VM.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.stack_max == 0 {
      return Err(ConfigError::InvalidStackMax(
        "stack_max must be greater than zero".into(),
      ));
    }
    if self.stack_max > STACK_MAX_UPPER_BOUND {
      return Err(ConfigError::InvalidStackMax(format!(
        "stack_max must not exceed {STACK_MAX_UPPER_BOUND}"
      )));
    }
    Ok(())
  }
}

/// Errors raised while validating a [`VmConfig`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
  #[error("invalid stack_max: {0}")]
  InvalidStackMax(String),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_config_validates() {
    assert!(VmConfig::default().validate().is_ok());
  }

  #[test]
  fn zero_stack_is_rejected() {
    let config = VmConfig {
      stack_max: 0,
      ..VmConfig::default()
    };
    assert!(config.validate().is_err());
  }

  #[test]
  fn oversized_stack_is_rejected() {
    let config = VmConfig {
      stack_max: STACK_MAX_UPPER_BOUND + 1,
      ..VmConfig::default()
    };
    assert!(config.validate().is_err());
  }
}
