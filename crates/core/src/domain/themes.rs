use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::db::{Database, ThemesDao};
use crate::error::{Entity, Error, Result};
use crate::models::{NewTheme, Theme};

#[derive(Clone)]
pub struct ThemesService {
    dao: ThemesDao,
}

impl ThemesService {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            dao: ThemesDao::new(db),
        }
    }

    pub fn create(&self, input: NewTheme) -> Result<Theme> {
        input.validate()?;

        let theme = Theme::new(Uuid::new_v4().to_string(), input.name.trim());
        self.dao.save_theme(&theme)?;

        info!(theme_id = %theme.id, name = %theme.name, "created theme");
        Ok(theme)
    }

    /// Delete a theme; games listing it lose the reference
    pub fn delete(&self, theme_id: &str) -> Result<Theme> {
        let theme = self
            .dao
            .delete_theme(theme_id)?
            .ok_or_else(|| Error::not_found(Entity::Theme, theme_id))?;

        info!(theme_id = %theme.id, "deleted theme");
        Ok(theme)
    }

    pub fn get_all(&self) -> Result<Vec<Theme>> {
        self.dao.get_all_themes()
    }

    /// Ids of the games listing the theme
    pub fn get_games(&self, theme_id: &str) -> Result<Vec<String>> {
        if self.dao.get_theme(theme_id)?.is_none() {
            return Err(Error::not_found(Entity::Theme, theme_id));
        }
        self.dao.get_game_ids(theme_id)
    }
}
