//! Fetch strategies for the children relation

use std::fmt;

use crate::error::{ModelError, OrmResult};

/// How children get attached to roots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// One statement per root, issued when that root is resolved
    PerRootLazy,
    /// One IN-list statement per group of at most `batch_size` pending roots
    BatchedLazy { batch_size: usize },
    /// One statement joining roots with children (and resources on request)
    JoinFetch { include_resources: bool },
}

impl FetchStrategy {
    /// Batched lazy loading; `size` must be greater than zero
    pub fn batched(size: i64) -> OrmResult<Self> {
        if size <= 0 {
            return Err(ModelError::InvalidBatchSize(size));
        }
        Ok(FetchStrategy::BatchedLazy {
            batch_size: size as usize,
        })
    }

    pub fn join_fetch() -> Self {
        FetchStrategy::JoinFetch {
            include_resources: false,
        }
    }

    pub fn join_fetch_with_resources() -> Self {
        FetchStrategy::JoinFetch {
            include_resources: true,
        }
    }

    /// Reject a zero batch size built without `batched`
    pub fn validate(&self) -> OrmResult<()> {
        match self {
            FetchStrategy::BatchedLazy { batch_size: 0 } => Err(ModelError::InvalidBatchSize(0)),
            _ => Ok(()),
        }
    }

    pub fn is_lazy(&self) -> bool {
        !matches!(self, FetchStrategy::JoinFetch { .. })
    }
}

impl fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStrategy::PerRootLazy => write!(f, "per-root-lazy"),
            FetchStrategy::BatchedLazy { batch_size } => write!(f, "batched-lazy({})", batch_size),
            FetchStrategy::JoinFetch {
                include_resources: false,
            } => write!(f, "join-fetch"),
            FetchStrategy::JoinFetch {
                include_resources: true,
            } => write!(f, "join-fetch+resources"),
        }
    }
}
