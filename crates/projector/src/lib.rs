//! Reshapes UTS JSON bodies into tables for display.

pub mod hierarchy;
pub mod search;
pub mod table;

pub use hierarchy::{project_hierarchy, HierarchyView};
pub use search::{first_cui, project_search_results, SEARCH_COLUMNS};
pub use table::{cell_text, Table};
