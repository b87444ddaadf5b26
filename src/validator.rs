//! Composable validation.
//!
//! A type contributes any number of independent [`Rule`]s, and so may every
//! trait it is composed with. After an instance is fully assigned, all rules
//! run in no particular order and every failure is collected into a single
//! [`ValidationError`], rather than stopping at the first one.
//!
//! Rules must not depend on each other having run.
//!
//! ```
//! use mlir_core::validator::{rule, Validator};
//!
//! struct Bounded {
//!   x: i64,
//!   lo: i64,
//!   hi: i64,
//! }
//!
//! let lower = rule("lower-bound", |b: &Bounded| {
//!   if b.x < b.lo {
//!     return Err("x must be greater than or equal to lo".into());
//!   }
//!   Ok(())
//! });
//! let upper = rule("upper-bound", |b: &Bounded| {
//!   if b.x > b.hi {
//!     return Err("x must be less than or equal to hi".into());
//!   }
//!   Ok(())
//! });
//! let mut validator = Validator::new();
//! validator.add(lower).add(upper);
//! assert!(validator.run(&Bounded { x: 3, lo: 0, hi: 10 }).is_ok());
//! let err = validator.run(&Bounded { x: 30, lo: 40, hi: 10 }).unwrap_err();
//! assert_eq!(err.len(), 2);
//! ```

use derive_more::Error;
use std::fmt;
use std::marker::PhantomData;

/// A named, pure check over a fully constructed `T`.
pub trait Rule<T: ?Sized> {
  /// Returns the name of the rule, used in failure records.
  fn name(&self) -> &str;

  /// Checks the given target, returns a description of the problem
  /// on failure.
  fn check(&self, target: &T) -> Result<(), String>;
}

/// A [`Rule`] made of a name and a closure.
pub struct FnRule<T: ?Sized, F> {
  name: &'static str,
  f: F,
  _target: PhantomData<fn(&T)>,
}

impl<T: ?Sized, F> Rule<T> for FnRule<T, F>
where
  F: Fn(&T) -> Result<(), String>,
{
  fn name(&self) -> &str {
    self.name
  }

  fn check(&self, target: &T) -> Result<(), String> {
    (self.f)(target)
  }
}

/// Creates a new rule from the given name and check function.
pub fn rule<T: ?Sized, F>(name: &'static str, f: F) -> FnRule<T, F>
where
  F: Fn(&T) -> Result<(), String>,
{
  FnRule {
    name,
    f,
    _target: PhantomData,
  }
}

/// A set of rules to run over one target.
pub struct Validator<'r, T: ?Sized> {
  rules: Vec<Box<dyn Rule<T> + 'r>>,
}

impl<'r, T: ?Sized> Validator<'r, T> {
  /// Creates an empty validator.
  pub fn new() -> Self {
    Self { rules: Vec::new() }
  }

  /// Adds a rule to the current validator.
  pub fn add<R: Rule<T> + 'r>(&mut self, rule: R) -> &mut Self {
    self.rules.push(Box::new(rule));
    self
  }

  /// Adds a boxed rule to the current validator.
  pub fn add_boxed(&mut self, rule: Box<dyn Rule<T> + 'r>) -> &mut Self {
    self.rules.push(rule);
    self
  }

  /// Returns the number of rules.
  pub fn len(&self) -> usize {
    self.rules.len()
  }

  /// Returns `true` if there is no rule in the validator.
  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  /// Runs every rule on the given target and collects all failures.
  pub fn run(&self, target: &T) -> Result<(), ValidationError> {
    let failures = self.collect(target);
    ValidationError::from_failures(failures).map_or(Ok(()), Err)
  }

  /// Runs every rule on the given target, returns all failures.
  pub fn collect(&self, target: &T) -> Vec<RuleFailure> {
    self
      .rules
      .iter()
      .filter_map(|r| {
        r.check(target).err().map(|message| RuleFailure {
          rule: r.name().to_string(),
          message,
        })
      })
      .collect()
  }
}

impl<'r, T: ?Sized> Default for Validator<'r, T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<'r, T: ?Sized> Extend<Box<dyn Rule<T> + 'r>> for Validator<'r, T> {
  fn extend<I: IntoIterator<Item = Box<dyn Rule<T> + 'r>>>(&mut self, iter: I) {
    self.rules.extend(iter);
  }
}

/// Types whose instances are checked by their own set of rules.
pub trait Validate {
  /// Returns all rules that apply to the current instance.
  fn rules(&self) -> Validator<'_, Self>;

  /// Runs all rules on the current instance.
  fn validate(&self) -> Result<(), ValidationError> {
    self.rules().run(self)
  }
}

/// Failure record of a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFailure {
  /// Name of the failed rule.
  pub rule: String,
  /// Description of the failure.
  pub message: String,
}

impl fmt::Display for RuleFailure {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(&self.message)
  }
}

/// Aggregate of one or more rule failures collected in one pass.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub struct ValidationError {
  failures: Vec<RuleFailure>,
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "Validation failed with the following errors:")?;
    for failure in &self.failures {
      write!(f, "\n    {}", failure)?;
    }
    Ok(())
  }
}

impl ValidationError {
  /// Creates an aggregate error, returns `None` if there is no failure.
  pub fn from_failures(failures: Vec<RuleFailure>) -> Option<Self> {
    if failures.is_empty() {
      None
    } else {
      Some(Self { failures })
    }
  }

  /// Creates an aggregate error with a single failure.
  pub fn single(rule: &str, message: String) -> Self {
    Self {
      failures: vec![RuleFailure {
        rule: rule.into(),
        message,
      }],
    }
  }

  /// Returns all failures.
  pub fn failures(&self) -> &[RuleFailure] {
    &self.failures
  }

  /// Returns the number of failures, which is never zero.
  pub fn len(&self) -> usize {
    self.failures.len()
  }

  /// Always returns `false`, an aggregate holds at least one failure.
  pub fn is_empty(&self) -> bool {
    self.failures.is_empty()
  }

  /// Returns `true` if any failure message contains the given text.
  pub fn contains(&self, text: &str) -> bool {
    self.failures.iter().any(|f| f.message.contains(text))
  }

  /// Returns `true` if the given rule failed.
  pub fn has_rule(&self, rule: &str) -> bool {
    self.failures.iter().any(|f| f.rule == rule)
  }
}
