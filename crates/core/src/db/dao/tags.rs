use std::sync::Arc;

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::db::Database;
use crate::db::dao::{conversion_failure, map_unique_violation};
use crate::error::{Entity, Result};
use crate::models::{Tag, TagType};

#[derive(Clone)]
pub struct TagsDao {
    db: Arc<Database>,
}

impl TagsDao {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn get_tag(&self, tag_id: &str) -> Result<Option<Tag>> {
        self.db
            .with_connection(|conn| Self::find_by_id_in(conn, tag_id))
    }

    pub fn get_all_tags(&self) -> Result<Vec<Tag>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT tag_id, name, type FROM tags ORDER BY rowid")?;

            let tags = stmt
                .query_map([], row_to_tag)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(tags)
        })
    }

    pub fn get_tags_by_type(&self, tag_type: TagType) -> Result<Vec<Tag>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn
                .prepare("SELECT tag_id, name, type FROM tags WHERE type = ?1 ORDER BY rowid")?;

            let tags = stmt
                .query_map(params![tag_type.to_string()], row_to_tag)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(tags)
        })
    }

    pub fn save_tag(&self, tag: &Tag) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO tags (tag_id, name, type) VALUES (?1, ?2, ?3)",
                params![&tag.id, &tag.name, tag.tag_type.to_string()],
            )
            .map_err(|e| map_unique_violation(e, Entity::Tag, &tag.name))?;
            Ok(())
        })
    }

    /// Removes the tag and, through the cascade, every game's reference to it
    pub fn delete_tag(&self, tag_id: &str) -> Result<Option<Tag>> {
        self.db.transaction(|tx| {
            let Some(tag) = Self::find_by_id_in(tx, tag_id)? else {
                return Ok(None);
            };
            tx.execute("DELETE FROM tags WHERE tag_id = ?1", params![tag_id])?;
            Ok(Some(tag))
        })
    }

    /// Ids of the games carrying this tag, in game insertion order
    pub fn get_game_ids(&self, tag_id: &str) -> Result<Vec<String>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT gt.game_id
                FROM game_tags gt
                JOIN games g ON g.game_id = gt.game_id
                WHERE gt.tag_id = ?1
                ORDER BY g.rowid
                "#,
            )?;

            let ids = stmt
                .query_map(params![tag_id], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;

            Ok(ids)
        })
    }

    pub(crate) fn find_by_id_in(conn: &Connection, tag_id: &str) -> Result<Option<Tag>> {
        let tag = conn
            .query_row(
                "SELECT tag_id, name, type FROM tags WHERE tag_id = ?1",
                params![tag_id],
                row_to_tag,
            )
            .optional()?;

        Ok(tag)
    }

    /// Looks the identifier up as an id first, then as a name
    pub(crate) fn find_in(conn: &Connection, identifier: &str) -> Result<Option<Tag>> {
        if let Some(tag) = Self::find_by_id_in(conn, identifier)? {
            return Ok(Some(tag));
        }

        let tag = conn
            .query_row(
                "SELECT tag_id, name, type FROM tags WHERE name = ?1",
                params![identifier],
                row_to_tag,
            )
            .optional()?;

        Ok(tag)
    }

    pub(crate) fn find_many_in(conn: &Connection, tag_ids: &[String]) -> Result<Vec<Tag>> {
        let mut tags = Vec::with_capacity(tag_ids.len());
        for id in tag_ids {
            if let Some(tag) = Self::find_by_id_in(conn, id)? {
                tags.push(tag);
            }
        }
        Ok(tags)
    }
}

fn row_to_tag(row: &Row) -> rusqlite::Result<Tag> {
    let tag_type = row
        .get::<_, String>(2)?
        .parse::<TagType>()
        .map_err(|e| conversion_failure(2, e))?;

    Ok(Tag {
        id: row.get(0)?,
        name: row.get(1)?,
        tag_type,
    })
}
