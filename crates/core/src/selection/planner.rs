use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::references::{ReferenceKind, ReferenceValidator};
use crate::error::Result;
use crate::models::{Game, TagType};
use crate::selection::filter::Filter;
use crate::selection::query::{GameQuery, SortType};

/// A query with every name-based reference resolved to ids, ready to run
/// against the full game collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPlan {
    filters: Vec<Filter>,
    sort: Option<SortType>,
    page: u32,
}

impl SelectionPlan {
    pub fn new(filters: Vec<Filter>, sort: Option<SortType>, page: u32) -> Self {
        Self {
            filters,
            sort,
            page,
        }
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Runs every filter and then the sort. Pagination is left to the caller
    /// so the unpaginated count stays observable.
    pub fn apply(&self, games: Vec<Game>) -> Vec<Game> {
        let mut games = self.filters.iter().fold(games, |games, filter| {
            let kept = filter.apply(games);
            debug!(field = filter.field(), remaining = kept.len(), "applied filter");
            kept
        });

        if let Some(sort) = self.sort {
            sort_games(&mut games, sort);
        }

        games
    }
}

/// Stable sorts; ties keep insertion order.
pub fn sort_games(games: &mut [Game], sort: SortType) {
    match sort {
        SortType::Alphabetical => {
            games.sort_by_cached_key(|game| game.name.to_lowercase());
        }
        SortType::ReverseAlphabetical => {
            games.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase()));
        }
        SortType::Newest => games.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortType::Oldest => games.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }
}

/// Turns [`GameQuery`] values into a [`SelectionPlan`], resolving tag and
/// theme names through the injected validator.
#[derive(Clone)]
pub struct QueryPlanner {
    validator: ReferenceValidator,
}

impl QueryPlanner {
    pub fn new(validator: ReferenceValidator) -> Self {
        Self { validator }
    }

    /// Filters are emitted in a fixed order: name, tags, accessibility,
    /// theme, gameBuilds, gameContent. Absent fields produce no filter.
    pub fn plan(&self, query: &GameQuery) -> Result<SelectionPlan> {
        let mut filters = Vec::new();

        if let Some(name) = &query.name {
            filters.push(Filter::Name(name.clone()));
        }

        if let Some(tags) = &query.tags {
            let ids = self
                .validator
                .resolve(ReferenceKind::Tag(Some(TagType::Custom)), tags)?;
            filters.push(Filter::Tags(ids.into_iter().collect()));
        }

        if let Some(tags) = &query.accessibility {
            let ids = self
                .validator
                .resolve(ReferenceKind::Tag(Some(TagType::Accessibility)), tags)?;
            filters.push(Filter::Accessibility(ids.into_iter().collect()));
        }

        if let Some(theme) = &query.theme {
            let id = self.validator.resolve_one(ReferenceKind::Theme, theme)?;
            filters.push(Filter::Theme(id));
        }

        if let Some(builds) = &query.game_builds {
            filters.push(Filter::GameBuilds(builds.iter().copied().collect()));
        }

        if let Some(content) = &query.game_content {
            filters.push(Filter::GameContent(
                content.iter().copied().collect::<BTreeSet<_>>(),
            ));
        }

        Ok(SelectionPlan::new(
            filters,
            query.sort,
            query.requested_page(),
        ))
    }
}
