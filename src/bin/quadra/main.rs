use clap::Parser;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use quadra::packing::{
    model::PackingModel,
    search::{BranchAndBound, StopReason},
};
use quadra::solver::stats::render_stats_table;

use crate::options::Options;

mod options;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Model(#[from] quadra::error::Error),
    #[error("could not serialize the best packing: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let options = Options::parse();
    let config = options.solve_config();
    let mut model = PackingModel::new(options.size, &config)?;

    let solver = BranchAndBound::new(&config);
    let solver = if options.json {
        solver
    } else {
        // Stream every improving packing as it is found; the trailing
        // newline separates consecutive records.
        solver.on_improvement(|solution| println!("{solution}"))
    };
    let outcome = solver.solve(&mut model);
    debug!(
        nodes = outcome.stats.nodes_visited,
        backtracks = outcome.stats.backtracks,
        "search returned"
    );

    match &outcome.best {
        Some(best) if options.json => println!("{}", serde_json::to_string_pretty(best)?),
        Some(_) => {}
        None if outcome.stopped == StopReason::Exhausted => println!("no packing found"),
        None => {}
    }
    if outcome.stopped == StopReason::BudgetExhausted {
        eprintln!("search stopped early: budget exhausted");
    }

    if options.stats {
        println!(
            "nodes: {}  backtracks: {}  propagations: {}  solutions: {}",
            outcome.stats.nodes_visited,
            outcome.stats.backtracks,
            outcome.stats.propagations(),
            outcome.stats.solutions_found
        );
        println!("{}", render_stats_table(&outcome.stats, model.engine()));
    }

    Ok(())
}
