use serde::{Deserialize, Serialize};

use crate::error::{Entity, Error, Result};

pub const MAX_THEME_NAME_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub id: String,
    pub name: String,
}

impl Theme {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTheme {
    pub name: String,
}

impl NewTheme {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<()> {
        let len = self.name.trim().chars().count();
        if len == 0 || len > MAX_THEME_NAME_LEN {
            return Err(Error::invalid(
                Entity::Theme,
                format!("name must be 1-{} characters", MAX_THEME_NAME_LEN),
            ));
        }
        Ok(())
    }
}
