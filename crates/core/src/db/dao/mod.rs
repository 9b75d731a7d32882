pub mod games;
pub mod tags;
pub mod themes;

pub use games::GamesDao;
pub use tags::TagsDao;
pub use themes::ThemesDao;

use rusqlite::types::Type;

use crate::error::{Entity, Error};

/// Turns a UNIQUE violation into an input error for `entity`; anything else
/// stays a database error.
pub(crate) fn map_unique_violation(err: rusqlite::Error, entity: Entity, name: &str) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Error::invalid(entity, format!("'{}' already exists", name))
        }
        _ => Error::Database(err),
    }
}

pub(crate) fn conversion_failure<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}
