use std::time::Duration;

use clap::{Parser, ValueEnum};
use quadra::config::{BranchHeuristic, Budget, NoOverlapEncoding, SolveConfig};

/// Packs squares of sizes n, n-1, ..., 1 into the smallest enclosing square.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub(crate) struct Options {
    /// Number of squares to pack; sizes run from SIZE down to 1.
    #[arg(default_value_t = 5)]
    pub size: usize,

    /// Replace the dedicated no-overlap propagator with its reified
    /// decomposition.
    #[arg(long)]
    pub decompose: bool,

    /// How to pick the next coordinate to branch on.
    #[arg(long, value_enum, default_value_t)]
    pub heuristic: HeuristicChoice,

    /// Seed for the random branching heuristic.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Stop after this many branching decisions.
    #[arg(long)]
    pub max_steps: Option<u64>,

    /// Stop after this many milliseconds of search.
    #[arg(long, value_name = "MILLIS")]
    pub time_limit: Option<u64>,

    /// Render a per-propagator statistics table once the search ends.
    #[arg(long)]
    pub stats: bool,

    /// Print the best packing as JSON instead of the plain text records.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum HeuristicChoice {
    /// The coordinate with the fewest values left.
    #[default]
    SmallestDomain,
    /// Coordinates in declaration order, largest square first.
    InputOrder,
    /// A uniformly chosen open coordinate.
    Random,
}

impl Options {
    pub fn solve_config(&self) -> SolveConfig {
        let encoding = if self.decompose {
            NoOverlapEncoding::Decomposition
        } else {
            NoOverlapEncoding::Propagator
        };
        let heuristic = match self.heuristic {
            HeuristicChoice::SmallestDomain => BranchHeuristic::SmallestDomain,
            HeuristicChoice::InputOrder => BranchHeuristic::InputOrder,
            HeuristicChoice::Random => BranchHeuristic::Random { seed: self.seed },
        };
        let budget = Budget {
            max_steps: self.max_steps,
            max_wall_time: self.time_limit.map(Duration::from_millis),
        };
        SolveConfig {
            encoding,
            heuristic,
            budget,
        }
    }
}
