//! Secret handling for the export hashing salt.
//!
//! The salt ends up inside generated export queries, but it must never show
//! up in logs, debug output or serialized configuration.

use zeroize::Zeroizing;

/// Hashing salt that zeroes its memory on drop and redacts itself in `Debug`.
///
/// # Example
///
/// ```rust
/// use mysql2bq_core::security::Salt;
///
/// let salt = Salt::new("pepper".to_string());
/// assert_eq!(salt.expose(), "pepper");
/// assert!(!format!("{:?}", salt).contains("pepper"));
/// ```
#[derive(Clone)]
pub struct Salt(Zeroizing<String>);

impl Salt {
    /// Wraps a salt value.
    pub fn new(value: String) -> Self {
        Self(Zeroizing::new(value))
    }

    /// Returns the raw salt for embedding into a hash expression.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Checks whether the salt is empty without exposing it.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Salt {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Salt(****)")
    }
}
