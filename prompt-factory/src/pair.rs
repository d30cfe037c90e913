use std::fmt;

use serde::Serialize;

/// A rendered `(system, user)` prompt pair, ready to send to a chat model.
///
/// Both texts are trimmed and terminated by exactly one newline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PromptPair {
    system: String,
    user: String,
}

impl PromptPair {
    /// Creates a pair, normalizing surrounding whitespace.
    #[must_use]
    pub fn new(system: impl AsRef<str>, user: impl AsRef<str>) -> Self {
        Self {
            system: normalize(system.as_ref()),
            user: normalize(user.as_ref()),
        }
    }

    /// Returns the system prompt.
    #[must_use]
    pub fn system(&self) -> &str {
        &self.system
    }

    /// Returns the user prompt.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Splits the pair into `(system, user)`.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.system, self.user)
    }
}

impl fmt::Display for PromptPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- system ---")?;
        f.write_str(&self.system)?;
        writeln!(f, "--- user ---")?;
        f.write_str(&self.user)
    }
}

pub(crate) fn normalize(text: &str) -> String {
    let mut out = text.trim().to_owned();
    out.push('\n');
    out
}
