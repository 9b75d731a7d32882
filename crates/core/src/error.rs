use thiserror::Error;

/// Catalog entity an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Game,
    Theme,
    Tag,
    Build,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Game => write!(f, "Game"),
            Self::Theme => write!(f, "Theme"),
            Self::Tag => write!(f, "Tag"),
            Self::Build => write!(f, "Build"),
        }
    }
}

/// Main error type for catalog operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("{0} not found: {1}")]
    NotFound(Entity, String),

    #[error("Invalid {0} input: {1}")]
    InvalidInput(Entity, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn not_found(entity: Entity, detail: impl Into<String>) -> Self {
        Error::NotFound(entity, detail.into())
    }

    pub fn invalid(entity: Entity, detail: impl Into<String>) -> Self {
        Error::InvalidInput(entity, detail.into())
    }

    /// Check if error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(..))
    }

    /// Check if error is a not-found error for the given entity
    pub fn is_not_found_for(&self, entity: Entity) -> bool {
        matches!(self, Error::NotFound(e, _) if *e == entity)
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(..))
    }

    /// Entity the error refers to, if it is a domain error
    pub fn entity(&self) -> Option<Entity> {
        match self {
            Error::NotFound(entity, _) | Error::InvalidInput(entity, _) => Some(*entity),
            _ => None,
        }
    }
}
