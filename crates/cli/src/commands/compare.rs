use std::time::{Duration, Instant};

use fetchlab_orm::{
    FetchConfig, FetchStrategy, LoadScope, OrmResult, QueryPlanner, RootRepository, Session, Store,
};

use super::seed::seeded_store;

struct Measurement {
    label: String,
    roots: usize,
    statements: u64,
    elapsed: Duration,
}

/// Load the seeded graph under every strategy and print what each cost
pub async fn run(config: &FetchConfig, roots: usize, children: usize) -> anyhow::Result<()> {
    let store = seeded_store(config, roots, children).await?;
    let batched = FetchStrategy::batched(config.batch_size)?;
    let mut results = Vec::new();

    for strategy in [FetchStrategy::PerRootLazy, batched, FetchStrategy::join_fetch()] {
        let mut session = Session::new(store.clone());
        let outcome = QueryPlanner::load(&mut session, LoadScope::All, strategy).await?;
        results.push(Measurement {
            label: strategy.to_string(),
            roots: outcome.roots.len(),
            statements: outcome.statements_issued,
            elapsed: outcome.elapsed,
        });
    }

    let mut session = Session::new(store.clone());
    results.push(measure_hand_written_join(&mut session).await?);

    println!("📊 {} roots × {} children", roots, children);
    println!("{:<24} {:>8} {:>12} {:>12}", "strategy", "roots", "statements", "elapsed");
    for m in &results {
        println!(
            "{:<24} {:>8} {:>12} {:>10.2}ms",
            m.label,
            m.roots,
            m.statements,
            m.elapsed.as_secs_f64() * 1000.0
        );
    }

    let statistics = store.statistics().snapshot();
    if statistics.enabled {
        println!("store counted {} statements, {} errors", statistics.statements, statistics.errors);
    }

    Ok(())
}

async fn measure_hand_written_join(session: &mut Session) -> OrmResult<Measurement> {
    let started = Instant::now();
    let before = session.statements_issued();
    let roots = RootRepository::find_all_with_children_fetch_join(session).await?;

    Ok(Measurement {
        label: "join-fetch (sql)".to_string(),
        roots: roots.len(),
        statements: session.statements_issued() - before,
        elapsed: started.elapsed(),
    })
}
