use serde::{Deserialize, Serialize};

use crate::ids::UserId;
use crate::role::Role;
use crate::user::User;

/// The authenticated identity performing an operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub username: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: UserId, username: impl Into<String>, role: Role) -> Self {
        Self { id, username: username.into(), role }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}
