//! Project access levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Visibility of a project in listings and lookups.
///
/// Levels are ordered: `Private < Hidden < Public`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Private = 1,
    Hidden = 2,
    Public = 3,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private => write!(f, "private"),
            Self::Hidden => write!(f, "hidden"),
            Self::Public => write!(f, "public"),
        }
    }
}

impl FromStr for Access {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s {
            "private" => Ok(Self::Private),
            "hidden" => Ok(Self::Hidden),
            "public" => Ok(Self::Public),
            other => Err(format!("'{}' is not a valid access setting", other)),
        }
    }
}
