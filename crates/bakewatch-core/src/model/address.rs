// ── Tezos address ──
//
// Implicit accounts (tz1/tz2/tz3) and originated contracts (KT1), base58
// with 33 characters after the prefix.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(tz[1-3]|KT1)[1-9A-HJ-NP-Za-km-z]{33}$").expect("address pattern is valid")
});

/// Whether `candidate` is a syntactically valid Tezos address.
pub fn is_valid_address(candidate: &str) -> bool {
    ADDRESS_RE.is_match(candidate)
}

/// A syntactically validated Tezos address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if is_valid_address(trimmed) {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(CoreError::InvalidAddress {
                address: raw.to_owned(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
