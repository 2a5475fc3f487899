//! Query Builder Module - fluent builder producing parameterized statements

pub mod builder;
pub mod joins;
pub mod ordering;
pub mod sql_generation;
pub mod types;
pub mod where_clause;

pub use builder::QueryBuilder;
pub use types::{JoinType, OrderDirection, QueryOperator, QueryType};
