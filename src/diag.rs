//! Diagnostic logger.
//!
//! Counts errors and warnings in a thread-local state, and prints them to
//! stderr unless the `no-logger` feature is enabled.

use std::cell::RefCell;

#[cfg(not(feature = "no-logger"))]
use colored::*;

thread_local! {
  static STATE: RefCell<GlobalState> = RefCell::new(GlobalState::default());
}

/// Error and warning counters.
#[derive(Default)]
struct GlobalState {
  err_num: usize,
  warn_num: usize,
}

/// Resets the global state.
pub fn reset() {
  STATE.with(|gs| *gs.borrow_mut() = GlobalState::default());
}

/// Logs an error message.
#[cfg(feature = "no-logger")]
pub fn log_error(_: &str) {
  STATE.with(|gs| gs.borrow_mut().err_num += 1);
}

/// Logs an error message.
#[cfg(not(feature = "no-logger"))]
pub fn log_error(message: &str) {
  STATE.with(|gs| {
    gs.borrow_mut().err_num += 1;
    eprintln!("{}: {}", "error".bright_red(), message);
  });
}

/// Logs a warning message.
#[cfg(feature = "no-logger")]
pub fn log_warning(_: &str) {
  STATE.with(|gs| gs.borrow_mut().warn_num += 1);
}

/// Logs a warning message.
#[cfg(not(feature = "no-logger"))]
pub fn log_warning(message: &str) {
  STATE.with(|gs| {
    gs.borrow_mut().warn_num += 1;
    eprintln!("{}: {}", "warning".yellow(), message);
  });
}

/// Logs global information (total error/warning number).
#[cfg(feature = "no-logger")]
pub fn log_global() {}

/// Logs global information (total error/warning number).
#[cfg(not(feature = "no-logger"))]
pub fn log_global() {
  STATE.with(|gs| {
    let gs = gs.borrow();
    if gs.err_num == 0 && gs.warn_num == 0 {
      return;
    }
    if gs.err_num != 0 {
      eprint!("{} {}", gs.err_num, "error".bright_red());
      if gs.err_num > 1 {
        eprint!("{}", "s".bright_red());
      }
    }
    if gs.err_num != 0 && gs.warn_num != 0 {
      eprint!(" and ");
    }
    if gs.warn_num != 0 {
      eprint!("{} {}", gs.warn_num, "warning".yellow());
      if gs.warn_num > 1 {
        eprint!("{}", "s".yellow());
      }
    }
    eprintln!(" emitted");
  });
}

/// Returns the number of logged errors.
pub fn error_num() -> usize {
  STATE.with(|gs| gs.borrow().err_num)
}

/// Returns the number of logged warnings.
pub fn warning_num() -> usize {
  STATE.with(|gs| gs.borrow().warn_num)
}

/// Checks if there are some errors.
pub fn has_error() -> bool {
  error_num() != 0
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn counters() {
    reset();
    log_error("first");
    log_error("second");
    log_warning("third");
    assert_eq!(error_num(), 2);
    assert_eq!(warning_num(), 1);
    assert!(has_error());
    log_global();
    reset();
    assert!(!has_error());
    assert_eq!(warning_num(), 0);
  }
}
