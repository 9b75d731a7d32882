use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Entity, Error, Result};

pub const MAX_TAG_NAME_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub tag_type: TagType,
}

impl Tag {
    pub fn new(id: impl Into<String>, name: impl Into<String>, tag_type: TagType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tag_type,
        }
    }
}

/// Query bucket a tag is filtered under. Fixed once the tag exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    Accessibility,
    Custom,
}

impl std::fmt::Display for TagType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accessibility => write!(f, "accessibility"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for TagType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "accessibility" => Ok(Self::Accessibility),
            "custom" => Ok(Self::Custom),
            other => Err(Error::invalid(
                Entity::Tag,
                format!("unknown tag type '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTag {
    pub name: String,
    #[serde(rename = "type")]
    pub tag_type: TagType,
}

impl NewTag {
    pub fn new(name: impl Into<String>, tag_type: TagType) -> Self {
        Self {
            name: name.into(),
            tag_type,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let len = self.name.trim().chars().count();
        if len == 0 || len > MAX_TAG_NAME_LEN {
            return Err(Error::invalid(
                Entity::Tag,
                format!("name must be 1-{} characters", MAX_TAG_NAME_LEN),
            ));
        }
        Ok(())
    }
}
