//! Query planner - runs one load under a chosen strategy and reports what it cost

use std::fmt;
use std::time::{Duration, Instant};

use super::relation_loader::RelationLoader;
use super::root_loader::RootLoader;
use super::strategy::FetchStrategy;
use crate::error::OrmResult;
use crate::model::Root;
use crate::session::Session;

/// Which roots a load covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadScope {
    ById(i64),
    All,
}

impl fmt::Display for LoadScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadScope::ById(id) => write!(f, "id={}", id),
            LoadScope::All => write!(f, "all"),
        }
    }
}

/// Populated roots plus the cost of producing them
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub roots: Vec<Root>,
    /// Statements issued by this load, across root and children phases
    pub statements_issued: u64,
    pub elapsed: Duration,
}

impl LoadOutcome {
    /// The single root of a `ById` load
    pub fn root(&self) -> Option<&Root> {
        self.roots.first()
    }
}

pub struct QueryPlanner;

impl QueryPlanner {
    /// Load roots under `scope` with every children collection loaded
    pub async fn load(session: &mut Session, scope: LoadScope, strategy: FetchStrategy) -> OrmResult<LoadOutcome> {
        strategy.validate()?;

        let started = Instant::now();
        let before = session.statements_issued();

        let roots = match strategy {
            FetchStrategy::JoinFetch { include_resources } => {
                let id = match scope {
                    LoadScope::ById(id) => Some(id),
                    LoadScope::All => None,
                };
                RelationLoader::join_fetch(session, id, include_resources).await?
            }
            FetchStrategy::PerRootLazy | FetchStrategy::BatchedLazy { .. } => {
                let mut roots = match scope {
                    LoadScope::ById(id) => vec![RootLoader::find_by_id(session, id).await?],
                    LoadScope::All => RootLoader::find_all(session).await?,
                };
                RelationLoader::resolve_all(session, &mut roots, strategy).await?;
                roots
            }
        };

        let outcome = LoadOutcome {
            roots,
            statements_issued: session.statements_issued() - before,
            elapsed: started.elapsed(),
        };

        tracing::info!(
            scope = %scope,
            strategy = %strategy,
            roots = outcome.roots.len(),
            statements = outcome.statements_issued,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "load complete"
        );

        Ok(outcome)
    }
}
