//! Model - the three entities of the loading layer and the relation tag
//! that marks a collection as loaded or not.

pub mod entities;
pub mod relation;

pub use entities::{Child, Resource, Root};
pub use relation::Relation;
