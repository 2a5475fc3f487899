//! Demo data: roots, one resource each, and ordered children

use fetchlab_orm::{schema, FetchConfig, RootRepository, Session, SqlxStore, Store};
use std::sync::Arc;

/// Connect, rebuild the schema and seed it. Statistics start from zero.
pub async fn seeded_store(config: &FetchConfig, roots: usize, children: usize) -> anyhow::Result<Arc<SqlxStore>> {
    let store = SqlxStore::connect(config).await?;

    if !config.is_in_memory() {
        tracing::warn!(url = %config.database_url, "dropping and recreating fetchlab tables");
    }
    schema::drop_tables(&store).await?;
    schema::create_tables(&store).await?;

    let store = Arc::new(store);
    let mut session = Session::new(store.clone());

    for i in 1..=roots {
        let image_url = format!("http://image.url/user/{}.jpg", i);
        let root = RootRepository::create_root(&mut session, &format!("test_user_{}", i), Some(&image_url)).await?;
        let resource =
            RootRepository::create_resource(&mut session, &format!("http://image.url/original/{}.jpg", i)).await?;

        for order_index in 0..children as i64 {
            RootRepository::create_child(&mut session, root.id, Some(resource.id), order_index).await?;
        }
    }

    tracing::info!(
        roots,
        children_per_root = children,
        statements = session.statements_issued(),
        "seeded"
    );

    session.clear();
    store.statistics().clear();
    Ok(store)
}
