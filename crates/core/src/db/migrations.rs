use rusqlite::Connection;
use tracing::info;

use crate::{Error, Result};

/// Schema steps in order; step `i` brings the database to version `i + 1`.
const MIGRATIONS: &[&str] = &[CATALOG_TABLES, LOOKUP_INDEXES];

const CATALOG_TABLES: &str = r#"
    CREATE TABLE games(
        game_id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        description TEXT,
        lesson TEXT,
        parenting_guide TEXT,
        answer_key TEXT,
        video_trailer TEXT,
        preview INTEGER NOT NULL DEFAULT 0,
        webgl_build INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    );

    CREATE TABLE themes(
        theme_id TEXT PRIMARY KEY,
        name TEXT NOT NULL
    );

    CREATE TABLE tags(
        tag_id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        type TEXT NOT NULL CHECK(type IN ('accessibility', 'custom'))
    );

    CREATE TABLE game_themes(
        game_id TEXT NOT NULL REFERENCES games(game_id) ON DELETE CASCADE,
        theme_id TEXT NOT NULL REFERENCES themes(theme_id) ON DELETE CASCADE,
        PRIMARY KEY (game_id, theme_id)
    );

    CREATE TABLE game_tags(
        game_id TEXT NOT NULL REFERENCES games(game_id) ON DELETE CASCADE,
        tag_id TEXT NOT NULL REFERENCES tags(tag_id) ON DELETE CASCADE,
        PRIMARY KEY (game_id, tag_id)
    );

    CREATE TABLE builds(
        game_id TEXT NOT NULL REFERENCES games(game_id) ON DELETE CASCADE,
        platform TEXT NOT NULL CHECK(platform IN (
            'amazon', 'android', 'appstore', 'linux', 'mac', 'windows'
        )),
        link TEXT NOT NULL,
        instructions TEXT,
        position INTEGER NOT NULL,
        PRIMARY KEY (game_id, platform)
    );
"#;

const LOOKUP_INDEXES: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_themes_name ON themes(name);
    CREATE INDEX IF NOT EXISTS idx_game_themes_theme_id ON game_themes(theme_id);
    CREATE INDEX IF NOT EXISTS idx_game_tags_tag_id ON game_tags(tag_id);
    CREATE INDEX IF NOT EXISTS idx_builds_game_id_position ON builds(game_id, position);
"#;

/// Version the schema ends up at once every step has run
pub fn latest_version() -> i32 {
    MIGRATIONS.len() as i32
}

/// Applies every step newer than the recorded version, each in its own
/// transaction. Refuses to touch a database written by a newer build.
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )?;

    let current = current_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(Error::Internal(format!(
            "Database schema version ({}) is newer than supported version ({})",
            current, latest
        )));
    }

    for (step, sql) in MIGRATIONS.iter().enumerate().skip(current as usize) {
        let version = step as i32 + 1;

        let tx = conn.transaction()?;
        tx.execute_batch(sql)
            .and_then(|_| {
                tx.execute(
                    "INSERT INTO schema_migrations (version) VALUES (?1)",
                    [version],
                )
            })
            .map_err(|e| {
                Error::Internal(format!("Failed to apply migration {}: {}", version, e))
            })?;
        tx.commit()?;

        info!(version, "applied schema migration");
    }

    Ok(())
}

fn current_version(conn: &Connection) -> Result<i32> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}
