//! Loading - roots, their children, and the strategies that decide how many
//! round trips that takes.

pub mod assembly;
pub mod planner;
pub mod relation_loader;
pub mod root_loader;
pub mod strategy;

pub use assembly::assemble_join_rows;
pub use planner::{LoadOutcome, LoadScope, QueryPlanner};
pub use relation_loader::RelationLoader;
pub use root_loader::RootLoader;
pub use strategy::FetchStrategy;
