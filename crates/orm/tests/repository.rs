mod common;

use fetchlab_orm::{
    FetchStrategy, LoadScope, QueryPlanner, RelationLoader, RootLoader, RootRepository, Store, StoreError,
};

#[tokio::test]
async fn test_hand_written_and_builder_joins_agree() {
    let fixture = common::seeded(10, 3).await;
    let mut session = fixture.session();

    let hand_written = RootRepository::find_all_with_children_fetch_join(&mut session).await.unwrap();
    let builder = RootRepository::find_all_with_children_fetch_join_builder(&mut session)
        .await
        .unwrap();
    assert_eq!(hand_written, builder);
    assert_eq!(fixture.statements(), 2);

    let id = fixture.root_ids[3];
    let one = RootRepository::find_by_id_with_children_fetch_join(&mut session, id)
        .await
        .unwrap()
        .unwrap();
    let other = RootRepository::find_by_id_with_children_fetch_join_builder(&mut session, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(one, other);
    assert_eq!(one.children().unwrap().len(), 3);
}

#[tokio::test]
async fn test_find_by_id_leaves_children_unloaded() {
    let fixture = common::seeded(2, 3).await;
    let mut session = fixture.session();

    let root = RootRepository::find_by_id(&mut session, fixture.root_ids[0])
        .await
        .unwrap()
        .unwrap();
    assert!(!root.children.is_loaded());
    assert_eq!(root.image_url.as_deref(), Some("http://image.url/user/1.jpg"));

    assert!(RootRepository::find_by_id(&mut session, 12_345).await.unwrap().is_none());

    let all = RootRepository::find_all(&mut session).await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|root| !root.children.is_loaded()));
}

#[tokio::test]
async fn test_delete_root_removes_children_and_root() {
    let fixture = common::seeded(3, 3).await;
    let mut session = fixture.cached_session();
    let id = fixture.root_ids[0];

    QueryPlanner::load(&mut session, LoadScope::ById(id), FetchStrategy::PerRootLazy)
        .await
        .unwrap();
    RootRepository::delete_root(&mut session, id).await.unwrap();
    assert!(!session.cache().unwrap().contains("roots", id));

    let err = QueryPlanner::load(&mut session, LoadScope::ById(id), FetchStrategy::join_fetch())
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let remaining = RootRepository::find_all_with_children_fetch_join(&mut session).await.unwrap();
    assert_eq!(remaining.len(), 3);
    let children: usize = remaining.iter().map(|root| root.children().unwrap().len()).sum();
    assert_eq!(children, 6);

    let err = RootRepository::delete_root(&mut session, id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_child_for_missing_root_is_a_constraint_violation() {
    let fixture = common::seeded(1, 1).await;
    let mut session = fixture.session();

    let err = RootRepository::create_child(&mut session, 9_999, None, 0)
        .await
        .unwrap_err();
    assert!(!err.is_not_found());
    assert!(matches!(err.as_store_error(), Some(StoreError::Constraint(_))));
    assert_eq!(fixture.store.statistics().error_count(), 1);
}

#[tokio::test]
async fn test_duplicate_order_index_is_a_constraint_violation() {
    let fixture = common::seeded(1, 2).await;
    let mut session = fixture.session();

    let err = RootRepository::create_child(&mut session, fixture.root_ids[0], None, 1)
        .await
        .unwrap_err();
    assert!(err.as_store_error().map_or(false, StoreError::is_constraint_violation));
}

#[tokio::test]
async fn test_child_writes_keep_cached_roots_current() {
    let fixture = common::seeded(2, 2).await;
    let mut session = fixture.cached_session();
    let id = fixture.root_ids[0];

    let outcome = QueryPlanner::load(&mut session, LoadScope::ById(id), FetchStrategy::join_fetch())
        .await
        .unwrap();
    assert_eq!(outcome.root().unwrap().children().unwrap().len(), 2);

    let added = RootRepository::create_child(&mut session, id, None, 5).await.unwrap();
    let cached = RootLoader::find_by_id(&mut session, id).await.unwrap();
    let order: Vec<i64> = cached.children().unwrap().iter().map(|c| c.order_index).collect();
    assert_eq!(order, vec![0, 1, 5]);

    RootRepository::delete_child(&mut session, added.id).await.unwrap();
    let cached = RootLoader::find_by_id(&mut session, id).await.unwrap();
    assert_eq!(cached.children().unwrap().len(), 2);

    let err = RootRepository::delete_child(&mut session, added.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_child_added_to_parked_root_is_refetched() {
    let fixture = common::seeded(3, 1).await;
    let mut session = fixture.session();
    let strategy = FetchStrategy::batched(5).unwrap();

    let mut roots = RootLoader::find_all(&mut session).await.unwrap();
    RelationLoader::resolve(&mut session, &mut roots[0], strategy).await.unwrap();

    // roots[1] now has parked children that are about to go stale.
    RootRepository::create_child(&mut session, roots[1].id, None, 7).await.unwrap();
    RelationLoader::resolve(&mut session, &mut roots[1], strategy).await.unwrap();

    let order: Vec<i64> = roots[1].children().unwrap().iter().map(|c| c.order_index).collect();
    assert_eq!(order, vec![0, 7]);
}

#[tokio::test]
async fn test_closed_store_reports_a_connection_error() {
    let fixture = common::seeded(1, 1).await;
    let mut session = fixture.session();
    fixture.store.close().await;

    let err = RootLoader::find_all(&mut session).await.unwrap_err();
    assert!(matches!(err.as_store_error(), Some(StoreError::Connection(_))));
}
