//! The authenticated caller of a mutating operation

use alumni_common::{AppError, Claims};
use alumni_core::Snowflake;

/// Account id and display name taken from a validated token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Snowflake,
    pub name: String,
}

impl Actor {
    pub fn new(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl TryFrom<&Claims> for Actor {
    type Error = AppError;

    fn try_from(claims: &Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: claims.account_id()?,
            name: claims.name.clone(),
        })
    }
}
