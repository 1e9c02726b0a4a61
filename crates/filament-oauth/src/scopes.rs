//! OAuth2 scope values per RFC 6749 section 3.3: a set of opaque permission
//! tokens, serialized as the tokens joined by single spaces.

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smol_str::SmolStr;

/// An immutable set of scope tokens.
///
/// Tokens are opaque to this crate; a token containing a space is a caller
/// contract violation and is not validated here. Equality is token-set
/// equality, so two scopes compare equal regardless of token order, and the
/// empty scope equals any other representation of "no tokens". Serialization
/// preserves the order the tokens were given in.
#[derive(Debug, Clone, Default, Eq)]
pub struct Scope {
    tokens: Vec<SmolStr>,
}

impl Scope {
    /// The empty scope. Serializes to the empty string.
    pub fn empty() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Builds a scope from an explicit token list, dropping duplicates.
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SmolStr>,
    {
        let mut distinct = Vec::new();
        for token in tokens {
            let token = token.into();
            if !distinct.contains(&token) {
                distinct.push(token);
            }
        }
        Self { tokens: distinct }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn has_token(&self, name: &str) -> bool {
        self.tokens.iter().any(|t| t == name)
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(SmolStr::as_str)
    }

    /// The serialized form as a query value, `None` when empty. Token
    /// requests append `scope` only when there is something to request.
    pub(crate) fn as_query_value(&self) -> Option<SmolStr> {
        if self.is_empty() {
            None
        } else {
            Some(SmolStr::from(self.to_string()))
        }
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        let left: BTreeSet<&SmolStr> = self.tokens.iter().collect();
        let right: BTreeSet<&SmolStr> = other.tokens.iter().collect();
        left == right
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(token)?;
        }
        Ok(())
    }
}

impl From<&str> for Scope {
    /// Splits on ASCII space. The empty string becomes the empty scope.
    fn from(s: &str) -> Self {
        Scope::new(s.split(' ').filter(|t| !t.is_empty()))
    }
}

impl FromStr for Scope {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Scope::from(s))
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = SmolStr::deserialize(deserializer)?;
        Ok(Scope::from(s.as_str()))
    }
}
