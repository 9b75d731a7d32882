use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Entity, Error, Result};
use crate::models::{AppType, GameContent};

pub const MAX_QUERY_NAME_LEN: usize = 50;

/// Ordering applied to the filtered games before pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortType {
    Alphabetical,
    ReverseAlphabetical,
    Newest,
    Oldest,
}

impl std::fmt::Display for SortType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alphabetical => write!(f, "alphabetical"),
            Self::ReverseAlphabetical => write!(f, "reverseAlphabetical"),
            Self::Newest => write!(f, "newest"),
            Self::Oldest => write!(f, "oldest"),
        }
    }
}

impl FromStr for SortType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "alphabetical" => Ok(Self::Alphabetical),
            "reverseAlphabetical" => Ok(Self::ReverseAlphabetical),
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            other => Err(Error::invalid(
                Entity::Game,
                format!("sort: unknown sort type '{}'", other),
            )),
        }
    }
}

/// A catalog request. `None` fields impose no restriction; `page` defaults
/// to the first page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameQuery {
    pub page: Option<u32>,
    pub name: Option<String>,
    pub theme: Option<String>,
    pub tags: Option<Vec<String>>,
    pub accessibility: Option<Vec<String>>,
    pub game_builds: Option<Vec<AppType>>,
    pub game_content: Option<Vec<GameContent>>,
    pub sort: Option<SortType>,
}

impl GameQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Default::default()
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_accessibility<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accessibility = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_game_builds(mut self, builds: impl IntoIterator<Item = AppType>) -> Self {
        self.game_builds = Some(builds.into_iter().collect());
        self
    }

    pub fn with_game_content(mut self, content: impl IntoIterator<Item = GameContent>) -> Self {
        self.game_content = Some(content.into_iter().collect());
        self
    }

    pub fn with_sort(mut self, sort: SortType) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn requested_page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    /// Builds a query from decoded query-string pairs.
    ///
    /// List fields (`tags`, `accessibility`, `gameBuilds`, `gameContent`)
    /// accept repeated keys as well as comma-separated values. Blank list
    /// items are dropped. Unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::default();

        for (key, value) in pairs {
            let key = key.as_ref();
            let value = value.as_ref();

            match key {
                "name" => {
                    let len = value.chars().count();
                    if len == 0 || len > MAX_QUERY_NAME_LEN {
                        return Err(field_error(
                            key,
                            format!("must be 1-{} characters", MAX_QUERY_NAME_LEN),
                        ));
                    }
                    set_once(&mut query.name, key, value.to_string())?;
                }
                "theme" => {
                    let theme = value.trim();
                    if theme.is_empty() {
                        return Err(field_error(key, "must not be empty"));
                    }
                    set_once(&mut query.theme, key, theme.to_string())?;
                }
                "tags" => extend_list(&mut query.tags, key, value, |s| Ok(s.to_string()))?,
                "accessibility" => {
                    extend_list(&mut query.accessibility, key, value, |s| Ok(s.to_string()))?
                }
                "gameBuilds" => extend_list(&mut query.game_builds, key, value, str::parse)?,
                "gameContent" => extend_list(&mut query.game_content, key, value, str::parse)?,
                "page" => {
                    let page = value
                        .trim()
                        .parse::<u32>()
                        .map_err(|_| field_error(key, "not a valid integer"))?;
                    if page < 1 {
                        return Err(field_error(key, "must be at least 1"));
                    }
                    set_once(&mut query.page, key, page)?;
                }
                "sort" => set_once(&mut query.sort, key, value.trim().parse()?)?,
                _ => {}
            }
        }

        Ok(query)
    }
}

fn field_error(field: &str, detail: impl std::fmt::Display) -> Error {
    Error::invalid(Entity::Game, format!("{}: {}", field, detail))
}

fn set_once<T>(slot: &mut Option<T>, field: &str, value: T) -> Result<()> {
    if slot.is_some() {
        return Err(field_error(field, "given more than once"));
    }
    *slot = Some(value);
    Ok(())
}

fn extend_list<T, F>(slot: &mut Option<Vec<T>>, field: &str, value: &str, parse: F) -> Result<()>
where
    F: Fn(&str) -> Result<T>,
    T: PartialEq,
{
    let list = slot.get_or_insert_with(Vec::new);

    for item in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let item = parse(item).map_err(|e| field_error(field, e))?;
        if !list.contains(&item) {
            list.push(item);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_accept_repeated_and_comma_separated_values() {
        let query = GameQuery::from_pairs([
            ("tags", "Fractions, Geometry"),
            ("tags", "Algebra"),
            ("gameBuilds", "amazon,webgl"),
            ("gameBuilds", "amazon"),
            ("gameContent", "parentingGuide"),
        ])
        .unwrap();

        assert_eq!(
            query.tags,
            Some(vec![
                "Fractions".to_string(),
                "Geometry".to_string(),
                "Algebra".to_string()
            ])
        );
        assert_eq!(query.game_builds, Some(vec![AppType::Amazon, AppType::WebGL]));
        assert_eq!(query.game_content, Some(vec![GameContent::ParentingGuide]));
        assert_eq!(query.accessibility, None);
        assert_eq!(query.requested_page(), 1);
    }

    #[test]
    fn test_page_must_be_a_positive_integer() {
        assert_eq!(
            GameQuery::from_pairs([("page", "3")]).unwrap().page,
            Some(3)
        );
        for bad in ["0", "-1", "two", ""] {
            let err = GameQuery::from_pairs([("page", bad)]).unwrap_err();
            assert!(err.is_invalid_input(), "page={:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_name_length_and_unknown_enum_values() {
        assert!(GameQuery::from_pairs([("name", "")]).is_err());
        assert!(GameQuery::from_pairs([("name", "x".repeat(51))]).is_err());
        assert!(GameQuery::from_pairs([("name", "frac")]).is_ok());

        let err = GameQuery::from_pairs([("gameBuilds", "amazon,ps5")]).unwrap_err();
        assert!(err.to_string().contains("gameBuilds"));
        assert!(GameQuery::from_pairs([("gameContent", "cheatSheet")]).is_err());
        assert!(GameQuery::from_pairs([("sort", "random")]).is_err());
    }

    #[test]
    fn test_single_valued_fields_reject_repeats() {
        assert!(GameQuery::from_pairs([("theme", "Space"), ("theme", "Ocean")]).is_err());
        assert!(GameQuery::from_pairs([("page", "1"), ("page", "2")]).is_err());
    }

    #[test]
    fn test_empty_list_value_is_present_but_empty() {
        let query = GameQuery::from_pairs([("tags", ""), ("utm_source", "mail")]).unwrap();
        assert_eq!(query.tags, Some(vec![]));
    }
}
