//! The caller of a core operation, as resolved by the external auth layer.

use super::role::Role;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub role: Role,
}

impl Actor {
    pub fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    pub fn require_director(&self) -> AppResult<()> {
        if self.role != Role::Director {
            return Err(AppError::Forbidden(format!(
                "user {} is not a director",
                self.id
            )));
        }
        Ok(())
    }

    pub fn require_monitor(&self) -> AppResult<()> {
        if self.role != Role::Monitor {
            return Err(AppError::Forbidden(format!(
                "user {} is not a monitor",
                self.id
            )));
        }
        Ok(())
    }
}
