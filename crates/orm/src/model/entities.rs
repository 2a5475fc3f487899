//! Root, Child and Resource entities
//!
//! Rows come back from joins with prefixed column aliases (`root_id`,
//! `child_order_index`, ...); the decoders here take the prefix so the same
//! entity can be read from a plain select or from a flattened join.

use serde::{Deserialize, Serialize};

use super::relation::Relation;
use crate::backends::StoreRow;
use crate::error::ModelResult;

/// Owner of an ordered collection of children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Root {
    pub id: i64,
    pub name: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub children: Relation<Vec<Child>>,
}

/// Member of a root's collection, ordered by `order_index`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: i64,
    pub root_id: i64,
    pub resource_id: Option<i64>,
    pub order_index: i64,
    /// Present only when the join was asked to include resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,
}

/// Shared resource referenced by children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,
    pub url: String,
}

impl Root {
    pub const TABLE: &'static str = "roots";

    pub fn new(id: i64, name: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image_url,
            children: Relation::Unloaded,
        }
    }

    /// Decode a root from columns named `{prefix}id`, `{prefix}name`, `{prefix}image_url`.
    /// Children start out unloaded.
    pub fn from_row(row: &StoreRow, prefix: &str) -> ModelResult<Self> {
        Ok(Self {
            id: row.get(&format!("{}id", prefix))?,
            name: row.get(&format!("{}name", prefix))?,
            image_url: row.try_get(&format!("{}image_url", prefix))?,
            children: Relation::Unloaded,
        })
    }

    /// Loaded children, or `None` while the collection is unloaded
    pub fn children(&self) -> Option<&[Child]> {
        self.children.get().map(Vec::as_slice)
    }

    /// Attach a loaded collection, ordering it by `order_index`
    pub fn attach_children(&mut self, mut children: Vec<Child>) {
        children.sort_by_key(|child| child.order_index);
        self.children.set(children);
    }
}

impl Child {
    pub const TABLE: &'static str = "children";

    /// Decode a child from prefixed columns. Returns `None` when `{prefix}id`
    /// is null, which is how a LEFT JOIN reports a root without children.
    pub fn from_row(row: &StoreRow, prefix: &str, root_id: i64) -> ModelResult<Option<Self>> {
        let id: Option<i64> = row.try_get(&format!("{}id", prefix))?;
        let Some(id) = id else {
            return Ok(None);
        };

        Ok(Some(Self {
            id,
            root_id,
            resource_id: row.try_get(&format!("{}resource_id", prefix))?,
            order_index: row.get(&format!("{}order_index", prefix))?,
            resource: None,
        }))
    }
}

impl Resource {
    pub const TABLE: &'static str = "resources";

    /// Decode a resource from prefixed columns; `None` when `{prefix}id` is null
    pub fn from_row(row: &StoreRow, prefix: &str) -> ModelResult<Option<Self>> {
        let id: Option<i64> = row.try_get(&format!("{}id", prefix))?;
        match id {
            Some(id) => Ok(Some(Self {
                id,
                url: row.get(&format!("{}url", prefix))?,
            })),
            None => Ok(None),
        }
    }
}
