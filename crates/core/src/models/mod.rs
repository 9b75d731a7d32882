pub mod game;
pub mod tag;
pub mod theme;

pub use game::{
    AppType, Build, BuildPlatform, Game, GameContent, GameDetails, GameUpdate, NewGame,
};
pub use tag::{NewTag, Tag, TagType};
pub use theme::{NewTheme, Theme};
