//! The homeserver access token
//!
//! Tokens live inside `secrecy::Secret`, so they never show up in `Debug`
//! output or tracing fields and the backing buffer is wiped when the
//! configuration is dropped. Reading one requires `expose_secret()`, which
//! keeps every use of the raw token greppable.
//!
//! ```rust
//! use scribe::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("syt_abc".to_string());
//! assert_eq!(token.expose_secret().as_ref(), "syt_abc");
//! assert!(!format!("{token:?}").contains("syt_abc"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Raw token text, zeroed on drop
#[derive(Clone, Debug, Zeroize, Serialize, Deserialize)]
#[zeroize(drop)]
#[serde(transparent)]
pub struct Token(String);

impl CloneableSecret for Token {}
impl DebugSecret for Token {}
// HomeserverConfig derives Serialize
impl SerializableSecret for Token {}

impl Token {
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for Token {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A token that can only be read through `ExposeSecret`
pub type SecretString = Secret<Token>;

/// Wraps `value` as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(Token::from(value))
}
