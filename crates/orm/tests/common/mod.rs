#![allow(dead_code)]

use std::sync::Arc;

use fetchlab_orm::{schema, FetchConfig, RootRepository, Session, SqlxStore, Store};

/// Seeded in-memory database
pub struct Fixture {
    pub store: Arc<SqlxStore>,
    /// Roots with children, in identifier order
    pub root_ids: Vec<i64>,
    /// A root that has no children at all
    pub childless_root: i64,
}

impl Fixture {
    pub fn session(&self) -> Session {
        Session::new(self.store.clone())
    }

    pub fn cached_session(&self) -> Session {
        Session::with_cache(self.store.clone())
    }

    pub fn statements(&self) -> u64 {
        self.store.statistics().count()
    }
}

pub async fn store() -> Arc<SqlxStore> {
    let store = SqlxStore::connect(&FetchConfig::in_memory())
        .await
        .expect("in-memory store");
    schema::create_tables(&store).await.expect("schema");
    Arc::new(store)
}

/// `roots` roots with `children` children each, plus one childless root.
/// Children are inserted in descending `order_index` so ordering is never
/// an accident of insertion order. Statistics start from zero.
pub async fn seeded(roots: usize, children: usize) -> Fixture {
    let store = store().await;
    let mut session = Session::new(store.clone());
    let mut root_ids = Vec::with_capacity(roots);

    for i in 1..=roots {
        let root = RootRepository::create_root(
            &mut session,
            &format!("test_user_{}", i),
            Some(format!("http://image.url/user/{}.jpg", i).as_str()),
        )
        .await
        .expect("root");
        let resource = RootRepository::create_resource(
            &mut session,
            &format!("http://image.url/original/{}.jpg", i),
        )
        .await
        .expect("resource");

        for order_index in (0..children as i64).rev() {
            RootRepository::create_child(&mut session, root.id, Some(resource.id), order_index)
                .await
                .expect("child");
        }
        root_ids.push(root.id);
    }

    let childless_root = RootRepository::create_root(&mut session, "no_children", None)
        .await
        .expect("childless root")
        .id;

    session.clear();
    store.statistics().clear();

    Fixture {
        store,
        root_ids,
        childless_root,
    }
}
