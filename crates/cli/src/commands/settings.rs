//! Environment configuration with command-line overrides

use fetchlab_orm::FetchConfig;

/// Read `FetchConfig` from the environment, then apply flag overrides
pub fn build(database_url: Option<String>, batch_size: Option<i64>) -> anyhow::Result<FetchConfig> {
    let mut config = FetchConfig::from_env()?;

    if let Some(url) = database_url {
        config.database_url = url;
    }
    if let Some(size) = batch_size {
        config.batch_size = size;
    }

    let config = config.normalized();
    config.validate()?;
    Ok(config)
}
