use std::sync::OnceLock;

use regex::Regex;

use crate::Error;

/// A header or query parameter pattern that must match a whole value.
///
/// The pattern is compiled on first use and reused afterwards. A malformed
/// pattern is reported every time it is matched against.
#[derive(Debug)]
pub(crate) struct Pattern {
    source: String,
    compiled: OnceLock<Result<Regex, regex::Error>>,
}

impl Pattern {
    pub(crate) fn new(source: String) -> Self {
        Self {
            source,
            compiled: OnceLock::new(),
        }
    }

    /// Matches `value` against the pattern, anchored at both ends. `name` is
    /// the header or parameter the pattern belongs to, for error reporting.
    pub(crate) fn is_full_match(&self, name: &str, value: &str) -> Result<bool, Error> {
        match self.compiled.get_or_init(|| compile_anchored(&self.source)) {
            Ok(regex) => Ok(regex.is_match(value)),
            Err(source) => Err(Error::InvalidPattern {
                name: name.to_owned(),
                pattern: self.source.clone(),
                source: source.clone(),
            }),
        }
    }
}

fn compile_anchored(pattern: &str) -> Result<Regex, regex::Error> {
    // The anchored wrapper can balance a stray group, e.g. "a)(b".
    Regex::new(pattern)?;
    Regex::new(&format!("^(?:{})$", pattern))
}
