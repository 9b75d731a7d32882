use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::{Database, GamesDao, TagsDao, ThemesDao};
use crate::domain::references::{ReferenceKind, ReferenceValidator};
use crate::error::{Entity, Error, Result};
use crate::models::{Game, GameDetails, GameUpdate, NewGame};
use crate::selection::{GameQuery, GameSelection, QueryPlanner, RESULTS_PER_PAGE, paginate};

#[derive(Clone)]
pub struct GamesService {
    db: Arc<Database>,
    dao: GamesDao,
    planner: QueryPlanner,
}

impl GamesService {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            dao: GamesDao::new(db.clone()),
            planner: QueryPlanner::new(ReferenceValidator::new(db.clone())),
            db,
        }
    }

    /// Create a game after checking every referenced theme and tag.
    ///
    /// Validation and insert share one transaction, so a reference deleted
    /// concurrently either fails the validation or blocks until the insert
    /// commits.
    pub fn create(&self, input: NewGame) -> Result<Game> {
        input.validate()?;

        let game = self.db.transaction(|tx| {
            let themes = ReferenceValidator::resolve_in(tx, ReferenceKind::Theme, &input.themes)?;
            let tags = ReferenceValidator::resolve_in(tx, ReferenceKind::Tag(None), &input.tags)?;

            let game = Game {
                id: Uuid::new_v4().to_string(),
                name: input.name,
                description: input.description,
                lesson: input.lesson,
                parenting_guide: input.parenting_guide,
                answer_key: input.answer_key,
                video_trailer: input.video_trailer,
                preview: input.preview,
                webgl_build: input.webgl_build,
                builds: input.builds,
                themes,
                tags,
                created_at: Utc::now(),
            };

            GamesDao::insert_in(tx, &game)?;
            Ok(game)
        })?;

        info!(game_id = %game.id, name = %game.name, "created game");
        Ok(game)
    }

    /// Apply a partial update. An empty string clears an optional field.
    pub fn edit(&self, game_id: &str, update: GameUpdate) -> Result<Game> {
        update.validate()?;

        let game = self.db.transaction(|tx| {
            let existing = GamesDao::find_by_id_in(tx, game_id)?
                .ok_or_else(|| Error::not_found(Entity::Game, game_id))?;

            let themes = match &update.themes {
                Some(themes) => ReferenceValidator::resolve_in(tx, ReferenceKind::Theme, themes)?,
                None => existing.themes,
            };
            let tags = match &update.tags {
                Some(tags) => ReferenceValidator::resolve_in(tx, ReferenceKind::Tag(None), tags)?,
                None => existing.tags,
            };

            let game = Game {
                id: existing.id,
                name: update.name.unwrap_or(existing.name),
                description: patch(update.description, existing.description),
                lesson: patch(update.lesson, existing.lesson),
                parenting_guide: patch(update.parenting_guide, existing.parenting_guide),
                answer_key: patch(update.answer_key, existing.answer_key),
                video_trailer: patch(update.video_trailer, existing.video_trailer),
                preview: update.preview.unwrap_or(existing.preview),
                webgl_build: update.webgl_build.unwrap_or(existing.webgl_build),
                builds: update.builds.unwrap_or(existing.builds),
                themes,
                tags,
                created_at: existing.created_at,
            };

            GamesDao::replace_in(tx, &game)?;
            Ok(game)
        })?;

        info!(game_id = %game.id, "updated game");
        Ok(game)
    }

    pub fn delete(&self, game_id: &str) -> Result<Game> {
        let game = self
            .dao
            .delete_game(game_id)?
            .ok_or_else(|| Error::not_found(Entity::Game, game_id))?;

        info!(game_id = %game.id, name = %game.name, "deleted game");
        Ok(game)
    }

    /// Get a game with its themes and tags expanded
    pub fn get_by_id(&self, game_id: &str) -> Result<GameDetails> {
        let game = self
            .dao
            .get_game(game_id)?
            .ok_or_else(|| Error::not_found(Entity::Game, game_id))?;

        Ok(self.populate(vec![game])?.remove(0))
    }

    /// Get all games
    pub fn get_all(&self) -> Result<Vec<Game>> {
        self.dao.get_all_games()
    }

    /// Mark the game as no longer having a WebGL build. Removing the uploaded
    /// asset itself is up to the storage collaborator.
    pub fn remove_webgl_build(&self, game_id: &str) -> Result<Game> {
        self.dao
            .set_webgl_build(game_id, false)?
            .ok_or_else(|| Error::not_found(Entity::Game, game_id))
    }

    /// Run a catalog query and return the requested page.
    ///
    /// `count` is the size of the filtered set before pagination. A query
    /// matching nothing is reported as a missing game, as is a page past the
    /// end.
    pub fn get_selected_games(&self, query: &GameQuery) -> Result<GameSelection> {
        let plan = self.planner.plan(query)?;

        let filtered = plan.apply(self.dao.get_all_games()?);
        let count = filtered.len();
        debug!(count, page = plan.page(), "selected games");

        if count == 0 {
            return Err(Error::not_found(Entity::Game, "no games match the query"));
        }

        let games = paginate(filtered, plan.page(), RESULTS_PER_PAGE)?;
        Ok(GameSelection { games, count })
    }

    /// Expand theme and tag ids into records. References that vanished in the
    /// meantime are skipped.
    pub fn populate(&self, games: Vec<Game>) -> Result<Vec<GameDetails>> {
        self.db.with_connection(|conn| {
            games
                .into_iter()
                .map(|game| {
                    let themes = ThemesDao::find_many_in(conn, &game.themes)?;
                    let tags = TagsDao::find_many_in(conn, &game.tags)?;
                    Ok(GameDetails::new(game, themes, tags))
                })
                .collect::<Result<Vec<_>>>()
        })
    }
}

fn patch(new: Option<String>, old: Option<String>) -> Option<String> {
    match new {
        Some(value) if value.is_empty() => None,
        Some(value) => Some(value),
        None => old,
    }
}
