//! Per-field predicates of a catalog query.
//!
//! Tag, accessibility and content filters require *every* requested value
//! (a game must fall into all requested categories). The build filter is
//! satisfied by *any* requested platform. An empty requested set restricts
//! nothing.

use std::collections::BTreeSet;

use crate::models::{AppType, Game, GameContent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Case-insensitive substring of the game name
    Name(String),
    /// Custom tag ids, all required
    Tags(BTreeSet<String>),
    /// Accessibility tag ids, all required
    Accessibility(BTreeSet<String>),
    /// Theme id the game must carry
    Theme(String),
    /// Platforms, at least one required
    GameBuilds(BTreeSet<AppType>),
    /// Content documents, all required
    GameContent(BTreeSet<GameContent>),
}

impl Filter {
    pub fn matches(&self, game: &Game) -> bool {
        match self {
            Filter::Name(needle) => game.name.to_lowercase().contains(&needle.to_lowercase()),
            Filter::Tags(ids) | Filter::Accessibility(ids) => {
                ids.iter().all(|id| game.tags.contains(id))
            }
            Filter::Theme(id) => game.themes.contains(id),
            Filter::GameBuilds(apps) => {
                apps.is_empty() || apps.iter().any(|app| game.available_on(*app))
            }
            Filter::GameContent(contents) => {
                contents.iter().all(|content| game.has_content(*content))
            }
        }
    }

    /// Narrows `games` to the ones this filter keeps, preserving order
    pub fn apply(&self, games: Vec<Game>) -> Vec<Game> {
        games.into_iter().filter(|game| self.matches(game)).collect()
    }

    /// Query field this filter came from
    pub fn field(&self) -> &'static str {
        match self {
            Filter::Name(_) => "name",
            Filter::Tags(_) => "tags",
            Filter::Accessibility(_) => "accessibility",
            Filter::Theme(_) => "theme",
            Filter::GameBuilds(_) => "gameBuilds",
            Filter::GameContent(_) => "gameContent",
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{Build, BuildPlatform};

    fn game(id: &str, name: &str) -> Game {
        Game {
            id: id.into(),
            name: name.into(),
            description: None,
            lesson: None,
            parenting_guide: None,
            answer_key: None,
            video_trailer: None,
            preview: false,
            webgl_build: false,
            builds: vec![],
            themes: vec![],
            tags: vec![],
            created_at: Utc::now(),
        }
    }

    fn ids(games: &[Game]) -> Vec<&str> {
        games.iter().map(|g| g.id.as_str()).collect()
    }

    fn set<T: Ord + Clone>(items: &[T]) -> BTreeSet<T> {
        items.iter().cloned().collect()
    }

    #[test]
    fn test_name_is_case_insensitive_substring() {
        let games = vec![game("1", "Fraction Frenzy"), game("2", "Word Wizards")];

        let kept = Filter::Name("ACTION fr".into()).apply(games.clone());
        assert_eq!(ids(&kept), vec!["1"]);

        let kept = Filter::Name("w".into()).apply(games);
        assert_eq!(ids(&kept), vec!["2"]);
    }

    #[test]
    fn test_tags_require_all_ids() {
        let mut a = game("a", "Alpha");
        a.tags = vec!["t1".into(), "t2".into()];
        let mut b = game("b", "Beta");
        b.tags = vec!["t1".into()];

        let kept = Filter::Tags(set(&["t1".to_string(), "t2".to_string()]))
            .apply(vec![a.clone(), b.clone()]);
        assert_eq!(ids(&kept), vec!["a"]);

        let kept = Filter::Accessibility(set(&["t1".to_string()])).apply(vec![a, b]);
        assert_eq!(ids(&kept), vec!["a", "b"]);
    }

    #[test]
    fn test_builds_accept_any_platform() {
        let mut amazon = game("amazon", "Amazon Only");
        amazon.builds = vec![Build::new(BuildPlatform::Amazon, "https://x.org/a")];
        let mut mac = game("mac", "Mac Only");
        mac.builds = vec![Build::new(BuildPlatform::Mac, "https://x.org/m")];
        let mut web = game("web", "Browser Only");
        web.webgl_build = true;
        let none = game("none", "Nowhere");

        let all = vec![amazon, mac, web, none];

        let kept = Filter::GameBuilds(set(&[AppType::Amazon, AppType::Mac])).apply(all.clone());
        assert_eq!(ids(&kept), vec!["amazon", "mac"]);

        let kept = Filter::GameBuilds(set(&[AppType::WebGL])).apply(all.clone());
        assert_eq!(ids(&kept), vec!["web"]);

        let kept = Filter::GameBuilds(BTreeSet::new()).apply(all);
        assert_eq!(kept.len(), 4);
    }

    #[test]
    fn test_content_requires_every_document() {
        let mut both = game("both", "Both Docs");
        both.lesson = Some("https://x.org/lesson".into());
        both.answer_key = Some("https://x.org/key".into());
        let mut lesson = game("lesson", "Lesson Only");
        lesson.lesson = Some("https://x.org/lesson".into());

        let kept = Filter::GameContent(set(&[GameContent::Lesson, GameContent::AnswerKey]))
            .apply(vec![both, lesson]);
        assert_eq!(ids(&kept), vec!["both"]);
    }

    #[test]
    fn test_empty_sets_restrict_nothing() {
        let games = vec![game("1", "One Game"), game("2", "Two Game")];
        for filter in [
            Filter::Tags(BTreeSet::new()),
            Filter::Accessibility(BTreeSet::new()),
            Filter::GameContent(BTreeSet::new()),
        ] {
            assert_eq!(filter.apply(games.clone()).len(), 2, "{}", filter.field());
        }
    }
}
