//! Join row assembly
//!
//! A fetch join returns one row per (root, child) pair. Assembly folds those
//! rows back into roots: each root appears once, in the order it was first
//! seen, with its children ordered by `order_index`.

use std::collections::HashMap;

use crate::backends::StoreRow;
use crate::error::{ModelError, ModelResult};
use crate::model::{Child, Resource, Root};

/// Fold flattened join rows into populated roots.
///
/// Expected columns: `root_id`, `root_name`, `root_image_url`, `child_id`,
/// `child_resource_id`, `child_order_index`, and with `include_resources`
/// also `resource_id`, `resource_url`.
pub fn assemble_join_rows(rows: &[StoreRow], include_resources: bool) -> ModelResult<Vec<Root>> {
    let mut roots: Vec<Root> = Vec::new();
    let mut collections: Vec<Vec<Child>> = Vec::new();
    let mut slots: HashMap<i64, usize> = HashMap::new();
    let mut owners: HashMap<i64, i64> = HashMap::new();

    for row in rows {
        let root_id: i64 = row.get("root_id")?;
        let slot = match slots.get(&root_id) {
            Some(&slot) => slot,
            None => {
                roots.push(Root::from_row(row, "root_")?);
                collections.push(Vec::new());
                slots.insert(root_id, roots.len() - 1);
                roots.len() - 1
            }
        };

        let Some(mut child) = Child::from_row(row, "child_", root_id)? else {
            continue;
        };

        match owners.get(&child.id) {
            Some(&owner) if owner == root_id => continue,
            Some(&owner) => {
                return Err(ModelError::Relationship(format!(
                    "child {} returned under roots {} and {}",
                    child.id, owner, root_id
                )));
            }
            None => {
                owners.insert(child.id, root_id);
            }
        }

        if include_resources {
            child.resource = Resource::from_row(row, "resource_")?;
            if child.resource_id != child.resource.as_ref().map(|resource| resource.id) {
                return Err(ModelError::Relationship(format!(
                    "child {} references resource {:?} but the join returned {:?}",
                    child.id,
                    child.resource_id,
                    child.resource.as_ref().map(|resource| resource.id)
                )));
            }
        }

        collections[slot].push(child);
    }

    for (root, children) in roots.iter_mut().zip(collections) {
        root.attach_children(children);
    }

    Ok(roots)
}
