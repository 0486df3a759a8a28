use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

macro_rules! surrogate_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// The raw integer value.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| TypeError::InvalidId(s.to_string()))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

surrogate_id!(
    /// System-assigned user identifier.
    UserId
);
surrogate_id!(
    /// System-assigned post identifier.
    PostId
);
surrogate_id!(
    /// System-assigned comment identifier.
    CommentId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let id: PostId = "42".parse().unwrap();
        assert_eq!(id, PostId(42));
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(
            "abc".parse::<UserId>(),
            Err(TypeError::InvalidId("abc".into()))
        );
    }

    #[test]
    fn serializes_as_plain_integer() {
        let json = serde_json::to_string(&CommentId(7)).unwrap();
        assert_eq!(json, "7");
        let parsed: CommentId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, CommentId(7));
    }

    #[test]
    fn ordering_follows_value() {
        assert!(PostId(1) < PostId(2));
    }
}
