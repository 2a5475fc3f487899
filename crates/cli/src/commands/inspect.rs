use fetchlab_orm::{FetchConfig, FetchStrategy, LoadScope, QueryPlanner, Session};

use super::seed::seeded_store;

/// Load one root under `strategy` and print it with its children
pub async fn run(
    config: &FetchConfig,
    id: i64,
    strategy: FetchStrategy,
    roots: usize,
    children: usize,
    json: bool,
) -> anyhow::Result<()> {
    let store = seeded_store(config, roots, children).await?;
    let mut session = Session::new(store);

    let outcome = match QueryPlanner::load(&mut session, LoadScope::ById(id), strategy).await {
        Ok(outcome) => outcome,
        Err(err) if err.is_not_found() => {
            println!("❌ {}", err);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let Some(root) = outcome.root() else {
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(root)?);
    } else {
        println!("🔍 root {} '{}'", root.id, root.name);
        if let Some(image_url) = &root.image_url {
            println!("   image: {}", image_url);
        }
        for child in root.children().unwrap_or_default() {
            match &child.resource {
                Some(resource) => println!("   [{}] child {} → {}", child.order_index, child.id, resource.url),
                None => println!("   [{}] child {}", child.order_index, child.id),
            }
        }
    }

    println!(
        "{} via {}: {} statements in {:.2}ms",
        LoadScope::ById(id),
        strategy,
        outcome.statements_issued,
        outcome.elapsed.as_secs_f64() * 1000.0
    );
    Ok(())
}
