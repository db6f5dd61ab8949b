//! Caller-supplied validation rules.
//!
//! Rules map paths to validator functions. Running them never fails: every
//! rejected value becomes a message in the [`ValidationReport`].

use std::fmt;

use serde_json::Value;

/// Result of one validator applied to one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The value is acceptable.
    Valid,
    /// The value is rejected without an explanation.
    Invalid,
    /// The value is rejected for the given reason.
    Reason(String),
}

impl From<bool> for Verdict {
    fn from(valid: bool) -> Self {
        if valid { Verdict::Valid } else { Verdict::Invalid }
    }
}

impl From<String> for Verdict {
    fn from(reason: String) -> Self {
        Verdict::Reason(reason)
    }
}

impl From<&str> for Verdict {
    fn from(reason: &str) -> Self {
        Verdict::Reason(reason.to_string())
    }
}

/// A validator receives the value at its path, `None` if absent.
pub type Validator = Box<dyn Fn(Option<&Value>) -> Verdict + Send + Sync>;

/// Ordered rule set: paths in insertion order, validators in insertion order.
#[derive(Default)]
pub struct Rules {
    entries: Vec<(String, Vec<Validator>)>,
}

impl Rules {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a validator for `path`, after any already registered for it.
    pub fn rule<F, V>(mut self, path: &str, validator: F) -> Self
    where
        F: Fn(Option<&Value>) -> V + Send + Sync + 'static,
        V: Into<Verdict>,
    {
        let validator: Validator = Box::new(move |value| validator(value).into());

        match self.entries.iter_mut().find(|(existing, _)| existing == path) {
            Some((_, validators)) => validators.push(validator),
            None => self.entries.push((path.to_string(), vec![validator])),
        }

        self
    }

    /// Number of paths with at least one validator.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no rule has been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Applies every rule, looking values up through `lookup`.
    pub(super) fn check<'a>(&self, lookup: impl Fn(&str) -> Option<&'a Value>) -> ValidationReport {
        let mut errors = Vec::new();

        for (path, validators) in &self.entries {
            let value = lookup(path);

            for validator in validators {
                match validator(value) {
                    Verdict::Valid => {}
                    Verdict::Reason(reason) => {
                        errors.push(format!("Validation failed for \"{path}\": {reason}"));
                    }
                    Verdict::Invalid => {
                        errors.push(format!(
                            "Validation failed for \"{path}\" with value: {}",
                            DisplayValue(value)
                        ));
                    }
                }
            }
        }

        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(path, validators)| (path, validators.len())),
            )
            .finish()
    }
}

/// Outcome of [`ConfigStore::validate`](super::ConfigStore::validate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// `true` when no validator rejected its value.
    pub valid: bool,
    /// One message per rejection, in rule order.
    pub errors: Vec<String>,
}

struct DisplayValue<'a>(Option<&'a Value>);

impl fmt::Display for DisplayValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(Value::String(s)) => f.write_str(s),
            Some(value) => write!(f, "{value}"),
            None => f.write_str("undefined"),
        }
    }
}

/// Ready-made validators for common checks.
pub mod validators {
    use serde_json::Value;

    use super::Verdict;

    /// Rejects absent and `null` values.
    pub fn required() -> impl Fn(Option<&Value>) -> Verdict + Send + Sync + 'static {
        |value| match value {
            None | Some(Value::Null) => Verdict::Reason("is required".to_string()),
            Some(_) => Verdict::Valid,
        }
    }

    /// Accepts strings; absent values pass.
    pub fn is_string() -> impl Fn(Option<&Value>) -> Verdict + Send + Sync + 'static {
        |value| expect_type(value, Value::is_string, "a string")
    }

    /// Accepts booleans; absent values pass.
    pub fn is_bool() -> impl Fn(Option<&Value>) -> Verdict + Send + Sync + 'static {
        |value| expect_type(value, Value::is_boolean, "a boolean")
    }

    /// Accepts numbers; absent values pass.
    pub fn is_number() -> impl Fn(Option<&Value>) -> Verdict + Send + Sync + 'static {
        |value| expect_type(value, Value::is_number, "a number")
    }

    /// Accepts numbers within `min..=max`; absent values pass.
    pub fn in_range(
        min: f64,
        max: f64,
    ) -> impl Fn(Option<&Value>) -> Verdict + Send + Sync + 'static {
        move |value| match value {
            None => Verdict::Valid,
            Some(value) => match value.as_f64() {
                Some(n) if (min..=max).contains(&n) => Verdict::Valid,
                Some(n) => Verdict::Reason(format!("{n} is outside {min}..={max}")),
                None => Verdict::Reason("must be a number".to_string()),
            },
        }
    }

    /// Accepts values equal to one of `allowed`; absent values pass.
    pub fn one_of(
        allowed: Vec<Value>,
    ) -> impl Fn(Option<&Value>) -> Verdict + Send + Sync + 'static {
        move |value| match value {
            None => Verdict::Valid,
            Some(value) if allowed.contains(value) => Verdict::Valid,
            Some(_) => Verdict::Invalid,
        }
    }

    fn expect_type(value: Option<&Value>, check: fn(&Value) -> bool, expected: &str) -> Verdict {
        match value {
            Some(value) if !check(value) => Verdict::Reason(format!("must be {expected}")),
            _ => Verdict::Valid,
        }
    }
}
