//! Root loading
//!
//! Roots come back with `children` unloaded. Every such root is registered
//! with the session in the order it was handed out, which is what batched
//! lazy loading draws its batches from.

use crate::backends::Statement;
use crate::error::{ModelError, OrmResult};
use crate::model::Root;
use crate::query::QueryBuilder;
use crate::session::Session;

const ROOT_COLUMNS: &str = "id, name, image_url";

pub struct RootLoader;

impl RootLoader {
    /// Load one root; a session cache hit costs no statement
    pub async fn find_by_id(session: &mut Session, id: i64) -> OrmResult<Root> {
        if let Some(root) = session.cached_root(id) {
            tracing::debug!(id, loaded = root.children.is_loaded(), "root served from session cache");
            if !root.children.is_loaded() {
                session.register_unloaded(id);
            }
            return Ok(root);
        }

        let rows = session.execute(&Self::by_id_statement(id)).await?;
        let row = rows.first().ok_or_else(|| ModelError::not_found(Root::TABLE, id))?;

        let root = Root::from_row(row, "")?;
        session.register_unloaded(root.id);
        session.cache_root(&root);
        Ok(root)
    }

    /// Load every root in identifier order
    pub async fn find_all(session: &mut Session) -> OrmResult<Vec<Root>> {
        let rows = session.execute(&Self::all_statement()).await?;
        let mut roots = Vec::with_capacity(rows.len());

        for row in &rows {
            let fresh = Root::from_row(row, "")?;
            // A copy already in the session wins, the way an identity map would.
            let cached = session
                .cache()
                .and_then(|cache| cache.peek(Root::TABLE, fresh.id))
                .cloned();
            let root = match cached {
                Some(cached) => cached,
                None => {
                    session.cache_root(&fresh);
                    fresh
                }
            };
            if !root.children.is_loaded() {
                session.register_unloaded(root.id);
            }
            roots.push(root);
        }

        tracing::debug!(count = roots.len(), "roots loaded");
        Ok(roots)
    }

    pub fn by_id_statement(id: i64) -> Statement {
        QueryBuilder::new()
            .select(ROOT_COLUMNS)
            .from(Root::TABLE)
            .where_eq("id", id)
            .to_statement()
    }

    pub fn all_statement() -> Statement {
        QueryBuilder::new()
            .select(ROOT_COLUMNS)
            .from(Root::TABLE)
            .order_by("id")
            .to_statement()
    }
}
