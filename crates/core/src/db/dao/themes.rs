use std::sync::Arc;

use rusqlite::{Connection, OptionalExtension, params};

use crate::db::Database;
use crate::error::Result;
use crate::models::Theme;

#[derive(Clone)]
pub struct ThemesDao {
    db: Arc<Database>,
}

impl ThemesDao {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn get_theme(&self, theme_id: &str) -> Result<Option<Theme>> {
        self.db
            .with_connection(|conn| Self::find_by_id_in(conn, theme_id))
    }

    pub fn get_all_themes(&self) -> Result<Vec<Theme>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT theme_id, name FROM themes ORDER BY rowid")?;

            let themes = stmt
                .query_map([], |row| {
                    Ok(Theme {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(themes)
        })
    }

    pub fn save_theme(&self, theme: &Theme) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO themes (theme_id, name) VALUES (?1, ?2)",
                params![&theme.id, &theme.name],
            )?;
            Ok(())
        })
    }

    /// Removes the theme and, through the cascade, every game's reference to it
    pub fn delete_theme(&self, theme_id: &str) -> Result<Option<Theme>> {
        self.db.transaction(|tx| {
            let Some(theme) = Self::find_by_id_in(tx, theme_id)? else {
                return Ok(None);
            };
            tx.execute("DELETE FROM themes WHERE theme_id = ?1", params![theme_id])?;
            Ok(Some(theme))
        })
    }

    /// Ids of the games listing this theme, in game insertion order
    pub fn get_game_ids(&self, theme_id: &str) -> Result<Vec<String>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT gt.game_id
                FROM game_themes gt
                JOIN games g ON g.game_id = gt.game_id
                WHERE gt.theme_id = ?1
                ORDER BY g.rowid
                "#,
            )?;

            let ids = stmt
                .query_map(params![theme_id], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;

            Ok(ids)
        })
    }

    pub(crate) fn find_by_id_in(conn: &Connection, theme_id: &str) -> Result<Option<Theme>> {
        let theme = conn
            .query_row(
                "SELECT theme_id, name FROM themes WHERE theme_id = ?1",
                params![theme_id],
                |row| {
                    Ok(Theme {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(theme)
    }

    /// Looks the identifier up as an id first, then as a name. Names are not
    /// unique; the earliest theme with that name wins.
    pub(crate) fn find_in(conn: &Connection, identifier: &str) -> Result<Option<Theme>> {
        if let Some(theme) = Self::find_by_id_in(conn, identifier)? {
            return Ok(Some(theme));
        }

        let theme = conn
            .query_row(
                "SELECT theme_id, name FROM themes WHERE name = ?1 ORDER BY rowid LIMIT 1",
                params![identifier],
                |row| {
                    Ok(Theme {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(theme)
    }

    pub(crate) fn find_many_in(conn: &Connection, theme_ids: &[String]) -> Result<Vec<Theme>> {
        let mut themes = Vec::with_capacity(theme_ids.len());
        for id in theme_ids {
            if let Some(theme) = Self::find_by_id_in(conn, id)? {
                themes.push(theme);
            }
        }
        Ok(themes)
    }
}
