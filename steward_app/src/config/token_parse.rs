//! Validates the Discord bot token on deserialization and keeps it out of
//! debug output.

use std::fmt;

use serde::de::{Deserializer, Error, Visitor};

/// A Discord bot token that passed basic validation.
#[derive(Clone)]
pub struct Token(Box<str>);

impl Token {
    /// Gets the raw token text.
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Token, D::Error>
where
    D: Deserializer<'de>,
{
    struct TokenVisitor;
    impl Visitor<'_> for TokenVisitor {
        type Value = Token;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("expected discord token")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            let v = v.trim();
            serenity::utils::validate_token(v).map_err(E::custom)?;
            Ok(Token(v.into()))
        }
    }

    deserializer.deserialize_str(TokenVisitor)
}
