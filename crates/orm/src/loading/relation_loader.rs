//! Relation loading - attaches children to roots under a `FetchStrategy`
//!
//! `resolve` is the single point where an unloaded collection turns into a
//! loaded one. Lazy strategies read children through
//! `roots LEFT JOIN children`, so the same statement that fetches children
//! also tells a root without children apart from a root that does not exist.

use std::collections::HashMap;

use super::assembly::assemble_join_rows;
use super::strategy::FetchStrategy;
use crate::backends::Statement;
use crate::error::{ModelError, OrmResult};
use crate::model::{Child, Root};
use crate::query::QueryBuilder;
use crate::session::Session;

const ROOT_SELECT: &str = "r.id AS root_id, r.name AS root_name, r.image_url AS root_image_url";
const CHILD_SELECT: &str =
    "c.id AS child_id, c.resource_id AS child_resource_id, c.order_index AS child_order_index";
const RESOURCE_SELECT: &str = "s.id AS resource_id, s.url AS resource_url";

pub struct RelationLoader;

impl RelationLoader {
    /// Make `root.children` loaded. Already loaded roots cost nothing, and so
    /// do roots whose children an earlier batch already fetched.
    pub async fn resolve(session: &mut Session, root: &mut Root, strategy: FetchStrategy) -> OrmResult<()> {
        strategy.validate()?;

        if root.children.is_loaded() {
            return Ok(());
        }

        if let Some(children) = session.take_parked(root.id) {
            tracing::debug!(root_id = root.id, children = children.len(), "children taken from batch");
            root.attach_children(children);
            session.mark_resolved(root);
            return Ok(());
        }

        match strategy {
            FetchStrategy::PerRootLazy => {
                let mut fetched = Self::fetch_children(session, &[root.id]).await?;
                let children = fetched
                    .remove(&root.id)
                    .ok_or_else(|| ModelError::not_found(Root::TABLE, root.id))?;
                root.attach_children(children);
            }
            FetchStrategy::BatchedLazy { batch_size } => {
                let batch = session.pending_batch(root.id, batch_size);
                tracing::debug!(root_id = root.id, batch = ?batch, "loading children batch");

                let mut fetched = Self::fetch_children(session, &batch).await?;
                for id in batch.iter().copied().filter(|id| *id != root.id) {
                    match fetched.remove(&id) {
                        Some(children) => session.park(id, children),
                        None => session.forget_pending(id),
                    }
                }

                let children = fetched
                    .remove(&root.id)
                    .ok_or_else(|| ModelError::not_found(Root::TABLE, root.id))?;
                root.attach_children(children);
            }
            FetchStrategy::JoinFetch { include_resources } => {
                let mut joined = Self::join_fetch(session, Some(root.id), include_resources).await?;
                let children = joined
                    .pop()
                    .and_then(|mut fetched| fetched.children.take())
                    .unwrap_or_default();
                root.attach_children(children);
            }
        }

        session.mark_resolved(root);
        Ok(())
    }

    /// Resolve roots in slice order, stopping at the first failure
    pub async fn resolve_all(session: &mut Session, roots: &mut [Root], strategy: FetchStrategy) -> OrmResult<()> {
        for root in roots.iter_mut() {
            Self::resolve(session, root, strategy).await?;
        }
        Ok(())
    }

    /// Children of the given roots in one statement, keyed by root. A root
    /// that exists but has no children maps to an empty vector; a root that
    /// does not exist has no entry.
    pub async fn fetch_children(session: &mut Session, root_ids: &[i64]) -> OrmResult<HashMap<i64, Vec<Child>>> {
        let rows = session.execute(&Self::children_statement(root_ids)).await?;

        let mut by_root: HashMap<i64, Vec<Child>> = HashMap::with_capacity(root_ids.len());
        for row in &rows {
            let owner: i64 = row.get("owner_id")?;
            let children = by_root.entry(owner).or_default();
            if let Some(child) = Child::from_row(row, "child_", owner)? {
                children.push(child);
            }
        }

        Ok(by_root)
    }

    /// Roots with their children in one statement; `id` narrows to one root
    /// and turns an empty result into `NotFound`.
    pub async fn join_fetch(session: &mut Session, id: Option<i64>, include_resources: bool) -> OrmResult<Vec<Root>> {
        let rows = session.execute(&Self::join_statement(id, include_resources)).await?;
        let roots = assemble_join_rows(&rows, include_resources)?;

        if let Some(id) = id {
            if roots.is_empty() {
                return Err(ModelError::not_found(Root::TABLE, id));
            }
        }

        for root in &roots {
            session.cache_root(root);
            session.mark_resolved(root);
        }

        tracing::debug!(rows = rows.len(), roots = roots.len(), "join rows assembled");
        Ok(roots)
    }

    pub fn children_statement(root_ids: &[i64]) -> Statement {
        QueryBuilder::new()
            .select("r.id AS owner_id")
            .select(CHILD_SELECT)
            .from("roots r")
            .left_join("children c", "c.root_id", "r.id")
            .where_in("r.id", root_ids.iter().copied())
            .order_by("r.id")
            .order_by("c.order_index")
            .to_statement()
    }

    pub fn join_statement(id: Option<i64>, include_resources: bool) -> Statement {
        let mut query = QueryBuilder::new()
            .select(ROOT_SELECT)
            .select(CHILD_SELECT)
            .from("roots r")
            .left_join("children c", "c.root_id", "r.id");

        if include_resources {
            query = query
                .select(RESOURCE_SELECT)
                .left_join("resources s", "s.id", "c.resource_id");
        }
        if let Some(id) = id {
            query = query.where_eq("r.id", id);
        }

        query.order_by("r.id").order_by("c.order_index").to_statement()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::backends::DatabaseValue;
    use crate::session::tests::EmptyStore;

    #[test]
    fn test_children_statement_shape() {
        let statement = RelationLoader::children_statement(&[3, 1]);
        assert_eq!(
            statement.sql,
            "SELECT r.id AS owner_id, c.id AS child_id, c.resource_id AS child_resource_id, \
             c.order_index AS child_order_index FROM roots r \
             LEFT JOIN children c ON c.root_id = r.id \
             WHERE r.id IN ($1, $2) ORDER BY r.id ASC, c.order_index ASC"
        );
        assert_eq!(
            statement.params,
            vec![DatabaseValue::Int64(3), DatabaseValue::Int64(1)]
        );
    }

    #[test]
    fn test_join_statement_with_resources() {
        let statement = RelationLoader::join_statement(Some(5), true);
        assert!(statement.sql.contains("LEFT JOIN resources s ON s.id = c.resource_id"));
        assert!(statement.sql.contains("s.url AS resource_url"));
        assert!(statement.sql.ends_with("WHERE r.id = $1 ORDER BY r.id ASC, c.order_index ASC"));

        let all = RelationLoader::join_statement(None, false);
        assert!(!all.sql.contains("WHERE"));
        assert!(!all.sql.contains("resources"));
    }

    #[tokio::test]
    async fn test_parked_children_attach_without_a_statement() {
        let mut session = Session::new(Arc::new(EmptyStore::default()));
        let mut root = Root::new(2, "parked", None);
        session.register_unloaded(2);
        session.park(
            2,
            vec![Child {
                id: 20,
                root_id: 2,
                resource_id: None,
                order_index: 0,
                resource: None,
            }],
        );

        RelationLoader::resolve(&mut session, &mut root, FetchStrategy::batched(10).unwrap())
            .await
            .unwrap();
        assert_eq!(root.children().map(<[Child]>::len), Some(1));
        assert_eq!(session.statements_issued(), 0);
    }

    #[tokio::test]
    async fn test_missing_root_is_not_found_under_each_strategy() {
        for strategy in [
            FetchStrategy::PerRootLazy,
            FetchStrategy::batched(4).unwrap(),
            FetchStrategy::join_fetch(),
        ] {
            let mut session = Session::new(Arc::new(EmptyStore::default()));
            let mut root = Root::new(404, "ghost", None);

            let err = RelationLoader::resolve(&mut session, &mut root, strategy).await.unwrap_err();
            assert!(err.is_not_found(), "{}", strategy);
            assert_eq!(session.statements_issued(), 1);
            assert!(!root.children.is_loaded());
        }
    }

    #[tokio::test]
    async fn test_zero_batch_size_fails_before_any_statement() {
        let mut session = Session::new(Arc::new(EmptyStore::default()));
        let mut root = Root::new(1, "r", None);

        let err = RelationLoader::resolve(&mut session, &mut root, FetchStrategy::BatchedLazy { batch_size: 0 })
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidBatchSize(0)));
        assert_eq!(session.statements_issued(), 0);
    }
}
