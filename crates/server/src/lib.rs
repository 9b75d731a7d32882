//! JSON API over the catalog services.

pub mod error;
pub mod logging;
pub mod routes;
pub mod settings;

use std::sync::Arc;

use gamecatalog_core::db::Database;
use gamecatalog_core::domain::{GamesService, TagsService, ThemesService};

pub use error::{ApiError, ApiResult};
pub use settings::Settings;

#[derive(Clone)]
pub struct AppState {
    pub games: GamesService,
    pub themes: ThemesService,
    pub tags: TagsService,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            games: GamesService::new(db.clone()),
            themes: ThemesService::new(db.clone()),
            tags: TagsService::new(db),
        }
    }
}
