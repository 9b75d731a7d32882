use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::db::{Database, TagsDao};
use crate::error::{Entity, Error, Result};
use crate::models::{NewTag, Tag, TagType};

#[derive(Clone)]
pub struct TagsService {
    dao: TagsDao,
}

impl TagsService {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            dao: TagsDao::new(db),
        }
    }

    pub fn create(&self, input: NewTag) -> Result<Tag> {
        input.validate()?;

        let tag = Tag::new(
            Uuid::new_v4().to_string(),
            input.name.trim(),
            input.tag_type,
        );
        self.dao.save_tag(&tag)?;

        info!(tag_id = %tag.id, name = %tag.name, tag_type = %tag.tag_type, "created tag");
        Ok(tag)
    }

    /// Delete a tag; games carrying it lose the reference
    pub fn delete(&self, tag_id: &str) -> Result<Tag> {
        let tag = self
            .dao
            .delete_tag(tag_id)?
            .ok_or_else(|| Error::not_found(Entity::Tag, tag_id))?;

        info!(tag_id = %tag.id, "deleted tag");
        Ok(tag)
    }

    pub fn get_all(&self) -> Result<Vec<Tag>> {
        self.dao.get_all_tags()
    }

    pub fn get_by_type(&self, tag_type: TagType) -> Result<Vec<Tag>> {
        self.dao.get_tags_by_type(tag_type)
    }

    /// Ids of the games carrying the tag
    pub fn get_games(&self, tag_id: &str) -> Result<Vec<String>> {
        if self.dao.get_tag(tag_id)?.is_none() {
            return Err(Error::not_found(Entity::Tag, tag_id));
        }
        self.dao.get_game_ids(tag_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GamesService;
    use crate::models::NewGame;

    #[test]
    fn test_delete_cascades_to_games() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        db.migrate().unwrap();
        let tags = TagsService::new(db.clone());
        let games = GamesService::new(db);

        let tag = tags.create(NewTag::new("Phonics", TagType::Custom)).unwrap();
        let mut input = NewGame::new("Sound It Out");
        input.tags = vec!["Phonics".into()];
        let game = games.create(input).unwrap();

        assert_eq!(tags.get_games(&tag.id).unwrap(), vec![game.id.clone()]);
        assert_eq!(tags.get_by_type(TagType::Custom).unwrap(), vec![tag.clone()]);
        assert!(tags.get_by_type(TagType::Accessibility).unwrap().is_empty());

        tags.delete(&tag.id).unwrap();
        assert!(games.get_by_id(&game.id).unwrap().custom.is_empty());
        assert!(tags.get_all().unwrap().is_empty());
    }
}
