//! Environment variable management for testing
//!
//! This module provides utilities for setting and clearing `AUTOHCK_*`
//! environment variables during testing without leaking values between
//! tests.

use std::env;

/// RAII guard that overrides a set of environment variables and restores
/// the originals when dropped
pub struct EnvVarGuard {
  saved: Vec<(String, Option<String>)>,
}

impl EnvVarGuard {
  /// Set each `(name, value)` pair, remembering the original values
  pub fn set(vars: &[(&str, &str)]) -> Self {
    let saved = vars
      .iter()
      .map(|(name, value)| {
        let original = env::var(name).ok();
        unsafe {
          env::set_var(name, value);
        }
        (name.to_string(), original)
      })
      .collect();

    Self { saved }
  }

  /// Remove each named variable, remembering the original values
  pub fn clear(names: &[&str]) -> Self {
    let saved = names
      .iter()
      .map(|name| {
        let original = env::var(name).ok();
        unsafe {
          env::remove_var(name);
        }
        (name.to_string(), original)
      })
      .collect();

    Self { saved }
  }
}

impl Drop for EnvVarGuard {
  fn drop(&mut self) {
    for (name, original) in &self.saved {
      match original {
        Some(value) => unsafe {
          env::set_var(name, value);
        },
        None => unsafe {
          env::remove_var(name);
        },
      }
    }
  }
}
