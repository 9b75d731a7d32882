use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::db::Database;
use crate::db::dao::{conversion_failure, map_unique_violation};
use crate::error::{Entity, Result};
use crate::models::{Build, BuildPlatform, Game};

const GAME_COLUMNS: &str = "game_id, name, description, lesson, parenting_guide, answer_key, \
                            video_trailer, preview, webgl_build, created_at";

#[derive(Clone)]
pub struct GamesDao {
    db: Arc<Database>,
}

impl GamesDao {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn get_game(&self, game_id: &str) -> Result<Option<Game>> {
        self.db
            .with_connection(|conn| Self::find_by_id_in(conn, game_id))
    }

    /// Every game in insertion order, with builds and references attached
    pub fn get_all_games(&self) -> Result<Vec<Game>> {
        self.db.with_connection(|conn| Self::find_all_in(conn))
    }

    pub fn delete_game(&self, game_id: &str) -> Result<Option<Game>> {
        self.db.transaction(|tx| {
            let Some(game) = Self::find_by_id_in(tx, game_id)? else {
                return Ok(None);
            };
            tx.execute("DELETE FROM games WHERE game_id = ?1", params![game_id])?;
            Ok(Some(game))
        })
    }

    pub fn set_webgl_build(&self, game_id: &str, enabled: bool) -> Result<Option<Game>> {
        self.db.transaction(|tx| {
            let changed = tx.execute(
                "UPDATE games SET webgl_build = ?2 WHERE game_id = ?1",
                params![game_id, enabled],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            Self::find_by_id_in(tx, game_id)
        })
    }

    pub(crate) fn find_by_id_in(conn: &Connection, game_id: &str) -> Result<Option<Game>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM games WHERE game_id = ?1",
            GAME_COLUMNS
        ))?;

        let game = stmt.query_row(params![game_id], row_to_game).optional()?;

        match game {
            Some(game) => Ok(attach_relations(conn, vec![game], Some(game_id))?.pop()),
            None => Ok(None),
        }
    }

    pub(crate) fn find_all_in(conn: &Connection) -> Result<Vec<Game>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM games ORDER BY rowid",
            GAME_COLUMNS
        ))?;

        let games = stmt
            .query_map([], row_to_game)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        attach_relations(conn, games, None)
    }

    pub(crate) fn insert_in(conn: &Connection, game: &Game) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO games
                (game_id, name, description, lesson, parenting_guide, answer_key,
                 video_trailer, preview, webgl_build, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                &game.id,
                &game.name,
                &game.description,
                &game.lesson,
                &game.parenting_guide,
                &game.answer_key,
                &game.video_trailer,
                game.preview,
                game.webgl_build,
                format_timestamp(&game.created_at),
            ],
        )
        .map_err(|e| map_unique_violation(e, Entity::Game, &game.name))?;

        write_relations(conn, game)
    }

    /// Overwrites the stored row and all relations of `game.id`
    pub(crate) fn replace_in(conn: &Connection, game: &Game) -> Result<()> {
        conn.execute(
            r#"
            UPDATE games SET
                name = ?2, description = ?3, lesson = ?4, parenting_guide = ?5,
                answer_key = ?6, video_trailer = ?7, preview = ?8, webgl_build = ?9
            WHERE game_id = ?1
            "#,
            params![
                &game.id,
                &game.name,
                &game.description,
                &game.lesson,
                &game.parenting_guide,
                &game.answer_key,
                &game.video_trailer,
                game.preview,
                game.webgl_build,
            ],
        )
        .map_err(|e| map_unique_violation(e, Entity::Game, &game.name))?;

        for table in ["game_themes", "game_tags", "builds"] {
            conn.execute(
                &format!("DELETE FROM {} WHERE game_id = ?1", table),
                params![&game.id],
            )?;
        }

        write_relations(conn, game)
    }
}

fn write_relations(conn: &Connection, game: &Game) -> Result<()> {
    for theme_id in &game.themes {
        conn.execute(
            "INSERT INTO game_themes (game_id, theme_id) VALUES (?1, ?2)",
            params![&game.id, theme_id],
        )?;
    }

    for tag_id in &game.tags {
        conn.execute(
            "INSERT INTO game_tags (game_id, tag_id) VALUES (?1, ?2)",
            params![&game.id, tag_id],
        )?;
    }

    for (position, build) in game.builds.iter().enumerate() {
        conn.execute(
            r#"
            INSERT INTO builds (game_id, platform, link, instructions, position)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                &game.id,
                build.platform.to_string(),
                &build.link,
                &build.instructions,
                position as i64,
            ],
        )?;
    }

    Ok(())
}

/// Loads themes, tags and builds for `games` in three queries. With
/// `only_game` set, the relation queries are restricted to that game.
fn attach_relations(
    conn: &Connection,
    mut games: Vec<Game>,
    only_game: Option<&str>,
) -> Result<Vec<Game>> {
    let index: HashMap<String, usize> = games
        .iter()
        .enumerate()
        .map(|(i, game)| (game.id.clone(), i))
        .collect();

    let filter = if only_game.is_some() {
        "WHERE game_id = ?1"
    } else {
        ""
    };

    for (table, column) in [("game_themes", "theme_id"), ("game_tags", "tag_id")] {
        let mut stmt = conn.prepare(&format!(
            "SELECT game_id, {} FROM {} {} ORDER BY rowid",
            column, table, filter
        ))?;
        let rows = match only_game {
            Some(id) => stmt
                .query_map(params![id], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<std::result::Result<Vec<(String, String)>, _>>()?,
            None => stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<std::result::Result<Vec<(String, String)>, _>>()?,
        };

        for (game_id, reference) in rows {
            if let Some(&i) = index.get(&game_id) {
                match table {
                    "game_themes" => games[i].themes.push(reference),
                    _ => games[i].tags.push(reference),
                }
            }
        }
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT game_id, platform, link, instructions FROM builds {} ORDER BY game_id, position",
        filter
    ))?;
    let rows = match only_game {
        Some(id) => stmt
            .query_map(params![id], row_to_build)?
            .collect::<std::result::Result<Vec<_>, _>>()?,
        None => stmt
            .query_map([], row_to_build)?
            .collect::<std::result::Result<Vec<_>, _>>()?,
    };

    for (game_id, build) in rows {
        if let Some(&i) = index.get(&game_id) {
            games[i].builds.push(build);
        }
    }

    Ok(games)
}

fn row_to_game(row: &Row) -> rusqlite::Result<Game> {
    let created_at = row
        .get::<_, String>(9)?
        .parse::<DateTime<Utc>>()
        .map_err(|e| conversion_failure(9, e))?;

    Ok(Game {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        lesson: row.get(3)?,
        parenting_guide: row.get(4)?,
        answer_key: row.get(5)?,
        video_trailer: row.get(6)?,
        preview: row.get(7)?,
        webgl_build: row.get(8)?,
        builds: Vec::new(),
        themes: Vec::new(),
        tags: Vec::new(),
        created_at,
    })
}

fn row_to_build(row: &Row) -> rusqlite::Result<(String, Build)> {
    let platform = row
        .get::<_, String>(1)?
        .parse::<BuildPlatform>()
        .map_err(|e| conversion_failure(1, e))?;

    Ok((
        row.get(0)?,
        Build {
            platform,
            link: row.get(2)?,
            instructions: row.get(3)?,
        },
    ))
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn setup_test_db() -> Arc<Database> {
        let db = Arc::new(Database::open_in_memory().unwrap());
        db.migrate().unwrap();
        db
    }

    fn game(id: &str, name: &str) -> Game {
        Game {
            id: id.into(),
            name: name.into(),
            description: Some("Learn by playing".into()),
            lesson: None,
            parenting_guide: Some("https://example.org/guide.pdf".into()),
            answer_key: None,
            video_trailer: None,
            preview: false,
            webgl_build: false,
            builds: vec![
                Build::new(BuildPlatform::Windows, "https://example.org/win.zip"),
                Build::new(BuildPlatform::Amazon, "https://example.org/amazon")
                    .with_instructions("Sideload the APK"),
            ],
            themes: vec![],
            tags: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_save_and_get_game() {
        let db = setup_test_db();
        let dao = GamesDao::new(db.clone());

        let stored = game("123", "Test Game");
        db.with_connection(|conn| GamesDao::insert_in(conn, &stored))
            .unwrap();

        let retrieved = dao.get_game("123").unwrap().unwrap();
        assert_eq!(retrieved, stored);
        assert!(dao.get_game("missing").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_name_is_invalid_input() {
        let db = setup_test_db();

        db.with_connection(|conn| GamesDao::insert_in(conn, &game("1", "Same Name")))
            .unwrap();
        let err = db
            .with_connection(|conn| GamesDao::insert_in(conn, &game("2", "Same Name")))
            .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(Entity::Game, _)));
    }

    #[test]
    fn test_get_all_keeps_insertion_order() {
        let db = setup_test_db();
        let dao = GamesDao::new(db.clone());

        for (id, name) in [("b", "Zebra Math"), ("a", "Alpha Words"), ("c", "Mid Science")] {
            db.with_connection(|conn| GamesDao::insert_in(conn, &game(id, name)))
                .unwrap();
        }

        let ids: Vec<_> = dao
            .get_all_games()
            .unwrap()
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_delete_and_webgl_flag() {
        let db = setup_test_db();
        let dao = GamesDao::new(db.clone());

        db.with_connection(|conn| GamesDao::insert_in(conn, &game("1", "Flag Game")))
            .unwrap();

        let updated = dao.set_webgl_build("1", true).unwrap().unwrap();
        assert!(updated.webgl_build);
        assert!(dao.set_webgl_build("nope", true).unwrap().is_none());

        let deleted = dao.delete_game("1").unwrap().unwrap();
        assert_eq!(deleted.builds.len(), 2);
        assert!(dao.get_game("1").unwrap().is_none());
        assert!(dao.delete_game("1").unwrap().is_none());
    }
}
