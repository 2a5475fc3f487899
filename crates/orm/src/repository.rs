//! Root repository
//!
//! Read paths delegate to the loaders; the `_fetch_join` reads also exist as
//! hand-written SQL so they can be compared with the builder-assembled join.
//! Writes go straight to the store and keep the session consistent.

use crate::backends::{Statement, StoreRow};
use crate::error::{ModelError, OrmResult};
use crate::loading::{assemble_join_rows, RelationLoader, RootLoader};
use crate::model::{Child, Resource, Root};
use crate::query::QueryBuilder;
use crate::session::Session;

const FIND_ALL_WITH_CHILDREN_FETCH_JOIN: &str = "SELECT r.id AS root_id, r.name AS root_name, \
     r.image_url AS root_image_url, c.id AS child_id, c.resource_id AS child_resource_id, \
     c.order_index AS child_order_index \
     FROM roots r LEFT JOIN children c ON c.root_id = r.id \
     ORDER BY r.id, c.order_index";

const FIND_BY_ID_WITH_CHILDREN_FETCH_JOIN: &str = "SELECT r.id AS root_id, r.name AS root_name, \
     r.image_url AS root_image_url, c.id AS child_id, c.resource_id AS child_resource_id, \
     c.order_index AS child_order_index \
     FROM roots r LEFT JOIN children c ON c.root_id = r.id \
     WHERE r.id = $1 \
     ORDER BY c.order_index";

pub struct RootRepository;

impl RootRepository {
    /// Root with unloaded children, or `None`
    pub async fn find_by_id(session: &mut Session, id: i64) -> OrmResult<Option<Root>> {
        Self::optional(RootLoader::find_by_id(session, id).await)
    }

    pub async fn find_all(session: &mut Session) -> OrmResult<Vec<Root>> {
        RootLoader::find_all(session).await
    }

    pub async fn find_all_with_children_fetch_join(session: &mut Session) -> OrmResult<Vec<Root>> {
        let statement = Statement::new(FIND_ALL_WITH_CHILDREN_FETCH_JOIN, Vec::new());
        Self::fetch_joined(session, &statement).await
    }

    pub async fn find_by_id_with_children_fetch_join(session: &mut Session, id: i64) -> OrmResult<Option<Root>> {
        let statement = Statement::new(FIND_BY_ID_WITH_CHILDREN_FETCH_JOIN, vec![id.into()]);
        Ok(Self::fetch_joined(session, &statement).await?.into_iter().next())
    }

    pub async fn find_all_with_children_fetch_join_builder(session: &mut Session) -> OrmResult<Vec<Root>> {
        RelationLoader::join_fetch(session, None, false).await
    }

    pub async fn find_by_id_with_children_fetch_join_builder(
        session: &mut Session,
        id: i64,
    ) -> OrmResult<Option<Root>> {
        let roots = Self::optional(RelationLoader::join_fetch(session, Some(id), false).await)?;
        Ok(roots.and_then(|roots| roots.into_iter().next()))
    }

    /// Insert a root; it starts with a loaded, empty collection
    pub async fn create_root(session: &mut Session, name: &str, image_url: Option<&str>) -> OrmResult<Root> {
        let statement = QueryBuilder::new()
            .insert_into(Root::TABLE)
            .set("name", name)
            .set("image_url", image_url)
            .returning("id")
            .to_statement();

        let id = Self::returned_id(session.execute(&statement).await?, Root::TABLE)?;
        let mut root = Root::new(id, name, image_url.map(str::to_string));
        root.attach_children(Vec::new());
        session.cache_root(&root);
        Ok(root)
    }

    pub async fn create_resource(session: &mut Session, url: &str) -> OrmResult<Resource> {
        let statement = QueryBuilder::new()
            .insert_into(Resource::TABLE)
            .set("url", url)
            .returning("id")
            .to_statement();

        let id = Self::returned_id(session.execute(&statement).await?, Resource::TABLE)?;
        Ok(Resource {
            id,
            url: url.to_string(),
        })
    }

    /// Insert a child. The root must exist, and so must the resource when one
    /// is given; otherwise the store reports a constraint violation.
    pub async fn create_child(
        session: &mut Session,
        root_id: i64,
        resource_id: Option<i64>,
        order_index: i64,
    ) -> OrmResult<Child> {
        let statement = QueryBuilder::new()
            .insert_into(Child::TABLE)
            .set("root_id", root_id)
            .set("resource_id", resource_id)
            .set("order_index", order_index)
            .returning("id")
            .to_statement();

        let id = Self::returned_id(session.execute(&statement).await?, Child::TABLE)?;
        let child = Child {
            id,
            root_id,
            resource_id,
            order_index,
            resource: None,
        };

        let added = child.clone();
        session.children_changed(root_id, move |children| children.push(added));
        Ok(child)
    }

    pub async fn delete_child(session: &mut Session, id: i64) -> OrmResult<()> {
        let statement = QueryBuilder::new()
            .delete_from(Child::TABLE)
            .where_eq("id", id)
            .returning("id, root_id")
            .to_statement();

        let rows = session.execute(&statement).await?;
        let row = rows.first().ok_or_else(|| ModelError::not_found(Child::TABLE, id))?;
        let root_id: i64 = row.get("root_id")?;

        session.children_changed(root_id, |children| children.retain(|child| child.id != id));
        Ok(())
    }

    /// Delete a root and its children atomically
    pub async fn delete_root(session: &mut Session, id: i64) -> OrmResult<()> {
        let statements = [
            QueryBuilder::new()
                .delete_from(Child::TABLE)
                .where_eq("root_id", id)
                .to_statement(),
            QueryBuilder::new()
                .delete_from(Root::TABLE)
                .where_eq("id", id)
                .returning("id")
                .to_statement(),
        ];

        let results = session.execute_in_transaction(&statements).await?;
        session.evict_root(id);

        if results.last().map_or(true, Vec::is_empty) {
            return Err(ModelError::not_found(Root::TABLE, id));
        }

        tracing::debug!(id, "root deleted with its children");
        Ok(())
    }

    async fn fetch_joined(session: &mut Session, statement: &Statement) -> OrmResult<Vec<Root>> {
        let rows = session.execute(statement).await?;
        let roots = assemble_join_rows(&rows, false)?;
        for root in &roots {
            session.cache_root(root);
            session.mark_resolved(root);
        }
        Ok(roots)
    }

    fn returned_id(rows: Vec<StoreRow>, entity: &'static str) -> OrmResult<i64> {
        let row = rows
            .first()
            .ok_or_else(|| ModelError::Serialization(format!("insert into {} returned no id", entity)))?;
        row.get("id")
    }

    fn optional<T>(result: OrmResult<T>) -> OrmResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::backends::DatabaseValue;
    use crate::session::tests::EmptyStore;

    #[test]
    fn test_hand_written_and_builder_joins_select_the_same_columns() {
        let builder = RelationLoader::join_statement(None, false).sql;
        for alias in [
            "root_id",
            "root_name",
            "root_image_url",
            "child_id",
            "child_resource_id",
            "child_order_index",
        ] {
            assert!(FIND_ALL_WITH_CHILDREN_FETCH_JOIN.contains(alias));
            assert!(FIND_BY_ID_WITH_CHILDREN_FETCH_JOIN.contains(alias));
            assert!(builder.contains(alias));
        }
    }

    #[tokio::test]
    async fn test_missing_root_reads_as_none() {
        let mut session = Session::new(Arc::new(EmptyStore::default()));

        assert_eq!(RootRepository::find_by_id(&mut session, 1).await.unwrap(), None);
        assert_eq!(
            RootRepository::find_by_id_with_children_fetch_join(&mut session, 1).await.unwrap(),
            None
        );
        assert_eq!(
            RootRepository::find_by_id_with_children_fetch_join_builder(&mut session, 1)
                .await
                .unwrap(),
            None
        );
        assert_eq!(session.statements_issued(), 3);
    }

    #[tokio::test]
    async fn test_delete_of_missing_root_is_not_found() {
        let mut session = Session::new(Arc::new(EmptyStore::default()));
        let err = RootRepository::delete_root(&mut session, 5).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(session.statements_issued(), 2);
    }

    #[test]
    fn test_null_resource_is_inlined() {
        let statement = QueryBuilder::new()
            .insert_into(Child::TABLE)
            .set("root_id", 1i64)
            .set("resource_id", None::<i64>)
            .to_statement();
        assert_eq!(statement.params, vec![DatabaseValue::Int64(1)]);
    }
}
