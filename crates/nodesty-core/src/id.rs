//! Validated identifier newtypes for Nodesty resources.
//!
//! Identifiers are interpolated straight into URL paths, so each wrapper
//! rejects values that would change the shape of the path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

fn is_path_safe(input: &str) -> bool {
    !input.is_empty()
        && input != "."
        && input != ".."
        && !input
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '\\'))
}

/// Check that a free-form value can be used as a single URL path segment.
///
/// # Errors
///
/// Returns [`Error::InvalidId`] naming `label` when the value is empty, a dot
/// segment, or contains whitespace, `/`, `\`, `?` or `#`.
pub fn check_path_segment(label: &str, value: &str) -> Result<()> {
    if is_path_safe(value) {
        Ok(())
    } else {
        Err(Error::InvalidId(format!(
            "{label} `{value}` is not a valid path segment"
        )))
    }
}

/// Macro to generate validated string identifier types.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier after checking it is safe to embed in a URL path.
            ///
            /// # Errors
            ///
            /// Returns [`Error::InvalidId`] for empty values, dot segments, or
            /// values containing whitespace, `/`, `\`, `?` or `#`.
            pub fn new(value: impl Into<String>) -> Result<Self> {
                let value = value.into();
                check_path_segment(stringify!($name), &value)?;
                Ok(Self(value))
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Converts into the owned string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(value: String) -> Result<Self> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = Error;

            fn try_from(value: &str) -> Result<Self> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::new(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

id_type!(ServiceId, "Hosting service identifier (VPS, dedicated server, ...)");
id_type!(TicketId, "Support ticket identifier");
