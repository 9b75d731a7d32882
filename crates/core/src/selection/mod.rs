//! The catalog selection pipeline: query parsing, per-field filters,
//! planning and pagination.

pub mod filter;
pub mod pagination;
pub mod planner;
pub mod query;

pub use filter::Filter;
pub use pagination::{RESULTS_PER_PAGE, num_pages, paginate};
pub use planner::{QueryPlanner, SelectionPlan, sort_games};
pub use query::{GameQuery, SortType};

use serde::Serialize;

use crate::models::Game;

/// One page of selected games plus the size of the whole filtered set
#[derive(Debug, Clone, Serialize)]
pub struct GameSelection {
    pub games: Vec<Game>,
    pub count: usize,
}

impl GameSelection {
    pub fn num_pages(&self) -> usize {
        num_pages(self.count, RESULTS_PER_PAGE)
    }
}
