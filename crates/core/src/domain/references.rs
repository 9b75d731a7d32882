use std::sync::Arc;

use rusqlite::Connection;

use crate::db::{Database, TagsDao, ThemesDao};
use crate::error::{Entity, Error, Result};
use crate::models::TagType;

/// Collection an identifier is expected to resolve in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Theme,
    /// A tag, optionally restricted to one bucket
    Tag(Option<TagType>),
}

impl ReferenceKind {
    fn entity(self) -> Entity {
        match self {
            ReferenceKind::Theme => Entity::Theme,
            ReferenceKind::Tag(_) => Entity::Tag,
        }
    }
}

/// Resolves theme and tag identifiers (ids or names) to ids.
#[derive(Clone)]
pub struct ReferenceValidator {
    db: Arc<Database>,
}

impl ReferenceValidator {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn resolve(&self, kind: ReferenceKind, identifiers: &[String]) -> Result<Vec<String>> {
        self.db
            .with_connection(|conn| Self::resolve_in(conn, kind, identifiers))
    }

    pub fn resolve_one(&self, kind: ReferenceKind, identifier: &str) -> Result<String> {
        let mut ids = self.resolve(kind, &[identifier.to_string()])?;
        ids.pop()
            .ok_or_else(|| Error::not_found(kind.entity(), identifier))
    }

    /// Resolves on an existing connection, e.g. inside a write transaction.
    ///
    /// Every identifier is looked up before deciding; the error lists all of
    /// the ones that did not resolve. Duplicate ids are collapsed, first
    /// occurrence wins.
    pub(crate) fn resolve_in(
        conn: &Connection,
        kind: ReferenceKind,
        identifiers: &[String],
    ) -> Result<Vec<String>> {
        let mut resolved: Vec<String> = Vec::with_capacity(identifiers.len());
        let mut missing = Vec::new();

        for identifier in identifiers {
            match Self::lookup(conn, kind, identifier)? {
                Some(id) => {
                    if !resolved.contains(&id) {
                        resolved.push(id);
                    }
                }
                None => missing.push(identifier.as_str()),
            }
        }

        if !missing.is_empty() {
            return Err(Error::not_found(
                kind.entity(),
                format!("no match for {}", missing.join(", ")),
            ));
        }

        Ok(resolved)
    }

    fn lookup(conn: &Connection, kind: ReferenceKind, identifier: &str) -> Result<Option<String>> {
        let id = match kind {
            ReferenceKind::Theme => ThemesDao::find_in(conn, identifier)?.map(|theme| theme.id),
            ReferenceKind::Tag(bucket) => TagsDao::find_in(conn, identifier)?
                .filter(|tag| bucket.is_none_or(|wanted| tag.tag_type == wanted))
                .map(|tag| tag.id),
        };
        Ok(id)
    }
}
