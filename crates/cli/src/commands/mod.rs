pub mod compare;
pub mod inspect;
pub mod seed;
pub mod settings;

use clap::ValueEnum;
use fetchlab_orm::{FetchConfig, FetchStrategy};

/// Strategy names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Join,
    Batched,
    Lazy,
}

impl StrategyArg {
    /// Turn the flag into a strategy; the batch size comes from configuration
    pub fn resolve(self, config: &FetchConfig, with_resources: bool) -> anyhow::Result<FetchStrategy> {
        Ok(match self {
            StrategyArg::Join if with_resources => FetchStrategy::join_fetch_with_resources(),
            StrategyArg::Join => FetchStrategy::join_fetch(),
            StrategyArg::Batched => FetchStrategy::batched(config.batch_size)?,
            StrategyArg::Lazy => FetchStrategy::PerRootLazy,
        })
    }
}
