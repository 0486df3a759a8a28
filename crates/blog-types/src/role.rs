use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Account role controlling what a user may do with posts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May create posts and mutate any post.
    Admin,
    /// May create posts and mutate their own.
    Author,
    /// Read-only with respect to posts; may still comment and like.
    Reader,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Author, Role::Reader];

    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Author => "author",
            Self::Reader => "reader",
        }
    }

    /// Whether this role may publish new posts.
    pub fn can_publish(&self) -> bool {
        matches!(self, Self::Admin | Self::Author)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "author" => Ok(Self::Author),
            "reader" => Ok(Self::Reader),
            _ => Err(TypeError::UnknownRole(s.to_string())),
        }
    }
}
