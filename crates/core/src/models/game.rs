use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Entity, Error, Result};
use crate::models::{Tag, TagType, Theme};

pub const MAX_BUILDS: usize = 6;
pub const MIN_NAME_LEN: usize = 3;
pub const MAX_NAME_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub lesson: Option<String>,
    pub parenting_guide: Option<String>,
    pub answer_key: Option<String>,
    pub video_trailer: Option<String>,
    pub preview: bool,
    #[serde(rename = "webGLBuild")]
    pub webgl_build: bool,
    pub builds: Vec<Build>,
    pub themes: Vec<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Game {
    /// Whether the content document behind `content` is present and non-empty
    pub fn has_content(&self, content: GameContent) -> bool {
        let field = match content {
            GameContent::AnswerKey => &self.answer_key,
            GameContent::ParentingGuide => &self.parenting_guide,
            GameContent::Lesson => &self.lesson,
            GameContent::VideoTrailer => &self.video_trailer,
        };
        field.as_deref().is_some_and(|value| !value.trim().is_empty())
    }

    /// Whether the game can be played on `app`. WebGL comes from the flag,
    /// everything else from the build list.
    pub fn available_on(&self, app: AppType) -> bool {
        match app {
            AppType::WebGL => self.webgl_build,
            other => self
                .builds
                .iter()
                .any(|build| AppType::from(build.platform) == other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    #[serde(rename = "type")]
    pub platform: BuildPlatform,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl Build {
    pub fn new(platform: BuildPlatform, link: impl Into<String>) -> Self {
        Self {
            platform,
            link: link.into(),
            instructions: None,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());

        self
    }
}

/// Platforms a downloadable build can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildPlatform {
    Amazon,
    Android,
    Appstore,
    Linux,
    Mac,
    Windows,
}

impl BuildPlatform {
    pub const ALL: [BuildPlatform; 6] = [
        Self::Amazon,
        Self::Android,
        Self::Appstore,
        Self::Linux,
        Self::Mac,
        Self::Windows,
    ];
}

impl std::fmt::Display for BuildPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Amazon => write!(f, "amazon"),
            Self::Android => write!(f, "android"),
            Self::Appstore => write!(f, "appstore"),
            Self::Linux => write!(f, "linux"),
            Self::Mac => write!(f, "mac"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

impl FromStr for BuildPlatform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "amazon" => Ok(Self::Amazon),
            "android" => Ok(Self::Android),
            "appstore" => Ok(Self::Appstore),
            "linux" => Ok(Self::Linux),
            "mac" => Ok(Self::Mac),
            "windows" => Ok(Self::Windows),
            other => Err(Error::invalid(
                Entity::Game,
                format!("unknown build platform '{}'", other),
            )),
        }
    }
}

/// Every way a game can be played: a downloadable build platform or WebGL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppType {
    Amazon,
    Android,
    Appstore,
    Linux,
    Mac,
    Windows,
    #[serde(rename = "webgl")]
    WebGL,
}

impl From<BuildPlatform> for AppType {
    fn from(platform: BuildPlatform) -> Self {
        match platform {
            BuildPlatform::Amazon => Self::Amazon,
            BuildPlatform::Android => Self::Android,
            BuildPlatform::Appstore => Self::Appstore,
            BuildPlatform::Linux => Self::Linux,
            BuildPlatform::Mac => Self::Mac,
            BuildPlatform::Windows => Self::Windows,
        }
    }
}

impl std::fmt::Display for AppType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WebGL => write!(f, "webgl"),
            Self::Amazon => write!(f, "amazon"),
            Self::Android => write!(f, "android"),
            Self::Appstore => write!(f, "appstore"),
            Self::Linux => write!(f, "linux"),
            Self::Mac => write!(f, "mac"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

impl FromStr for AppType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "webgl" {
            return Ok(Self::WebGL);
        }
        s.parse::<BuildPlatform>()
            .map(Self::from)
            .map_err(|_| Error::invalid(Entity::Game, format!("unknown game build '{}'", s)))
    }
}

/// Supplementary documents a game may ship with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameContent {
    AnswerKey,
    ParentingGuide,
    Lesson,
    VideoTrailer,
}

impl std::fmt::Display for GameContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AnswerKey => write!(f, "answerKey"),
            Self::ParentingGuide => write!(f, "parentingGuide"),
            Self::Lesson => write!(f, "lesson"),
            Self::VideoTrailer => write!(f, "videoTrailer"),
        }
    }
}

impl FromStr for GameContent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "answerKey" => Ok(Self::AnswerKey),
            "parentingGuide" => Ok(Self::ParentingGuide),
            "lesson" => Ok(Self::Lesson),
            "videoTrailer" => Ok(Self::VideoTrailer),
            other => Err(Error::invalid(
                Entity::Game,
                format!("unknown game content '{}'", other),
            )),
        }
    }
}

/// Input for creating a game. `themes` and `tags` hold ids or names and are
/// resolved before anything is written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub lesson: Option<String>,
    #[serde(default)]
    pub parenting_guide: Option<String>,
    #[serde(default)]
    pub answer_key: Option<String>,
    #[serde(default)]
    pub video_trailer: Option<String>,
    #[serde(default)]
    pub preview: bool,
    #[serde(default, rename = "webGLBuild")]
    pub webgl_build: bool,
    #[serde(default)]
    pub builds: Vec<Build>,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewGame {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_builds(&self.builds)?;
        for url in [
            &self.lesson,
            &self.parenting_guide,
            &self.answer_key,
            &self.video_trailer,
        ]
        .into_iter()
        .flatten()
        {
            validate_url(url)?;
        }
        Ok(())
    }
}

/// Partial update of a game; `None` leaves the stored value untouched and an
/// empty string clears an optional text field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub lesson: Option<String>,
    pub parenting_guide: Option<String>,
    pub answer_key: Option<String>,
    pub video_trailer: Option<String>,
    pub preview: Option<bool>,
    #[serde(rename = "webGLBuild")]
    pub webgl_build: Option<bool>,
    pub builds: Option<Vec<Build>>,
    pub themes: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl GameUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(builds) = &self.builds {
            validate_builds(builds)?;
        }
        for url in [
            &self.lesson,
            &self.parenting_guide,
            &self.answer_key,
            &self.video_trailer,
        ]
        .into_iter()
        .flatten()
        .filter(|url| !url.is_empty())
        {
            validate_url(url)?;
        }
        Ok(())
    }
}

/// A game with its theme and tag references expanded, tags split by type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDetails {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub lesson: Option<String>,
    pub parenting_guide: Option<String>,
    pub answer_key: Option<String>,
    pub video_trailer: Option<String>,
    pub preview: bool,
    #[serde(rename = "webGLBuild")]
    pub webgl_build: bool,
    pub builds: Vec<Build>,
    pub themes: Vec<Theme>,
    pub accessibility: Vec<Tag>,
    pub custom: Vec<Tag>,
    pub created_at: DateTime<Utc>,
}

impl GameDetails {
    /// Themes and tags come back sorted by name so responses are stable.
    pub fn new(game: Game, mut themes: Vec<Theme>, tags: Vec<Tag>) -> Self {
        let (mut accessibility, mut custom): (Vec<Tag>, Vec<Tag>) = tags
            .into_iter()
            .partition(|tag| tag.tag_type == TagType::Accessibility);

        themes.sort_by_cached_key(|theme| theme.name.to_lowercase());
        accessibility.sort_by_cached_key(|tag| tag.name.to_lowercase());
        custom.sort_by_cached_key(|tag| tag.name.to_lowercase());

        Self {
            id: game.id,
            name: game.name,
            description: game.description,
            lesson: game.lesson,
            parenting_guide: game.parenting_guide,
            answer_key: game.answer_key,
            video_trailer: game.video_trailer,
            preview: game.preview,
            webgl_build: game.webgl_build,
            builds: game.builds,
            themes,
            accessibility,
            custom,
            created_at: game.created_at,
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return Err(Error::invalid(
            Entity::Game,
            format!(
                "name must be {}-{} characters, got {}",
                MIN_NAME_LEN, MAX_NAME_LEN, len
            ),
        ));
    }
    Ok(())
}

fn validate_builds(builds: &[Build]) -> Result<()> {
    if builds.len() > MAX_BUILDS {
        return Err(Error::invalid(
            Entity::Game,
            format!("a game can have at most {} builds", MAX_BUILDS),
        ));
    }

    let mut seen = HashSet::new();
    for build in builds {
        if !seen.insert(build.platform) {
            return Err(Error::invalid(
                Entity::Game,
                format!("duplicate {} build", build.platform),
            ));
        }
        validate_url(&build.link)?;
    }
    Ok(())
}

fn validate_url(raw: &str) -> Result<()> {
    let has_web_host = Url::parse(raw).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https")
            && url.host_str().is_some_and(|host| !host.is_empty())
    });

    if has_web_host {
        Ok(())
    } else {
        Err(Error::invalid(
            Entity::Game,
            format!("'{}' is not a valid http(s) URL", raw),
        ))
    }
}
