pub mod games;
pub mod references;
pub mod tags;
pub mod themes;

pub use games::GamesService;
pub use references::{ReferenceKind, ReferenceValidator};
pub use tags::TagsService;
pub use themes::ThemesService;
