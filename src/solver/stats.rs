use prettytable::{Cell, Row, Table};

use crate::solver::engine::{PerPropagatorStats, PropagationEngine, PropagatorId, SearchStats};

pub fn render_stats_table(stats: &SearchStats, engine: &PropagationEngine) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Propagator Type"),
        Cell::new("ID"),
        Cell::new("Description"),
        Cell::new("Runs"),
        Cell::new("Prunings"),
        Cell::new("Time / Run (µs)"),
        Cell::new("Total Time (ms)"),
    ]));

    let mut sorted_stats: Vec<(&PropagatorId, &PerPropagatorStats)> =
        stats.propagator_stats.iter().collect();

    sorted_stats.sort_by_key(|a| a.1.time_spent_micros);

    for (propagator_id, propagator_stats) in sorted_stats {
        let Some(descriptor) = engine.descriptor(*propagator_id) else {
            continue;
        };
        let avg_time = if propagator_stats.runs > 0 {
            propagator_stats.time_spent_micros as f64 / propagator_stats.runs as f64
        } else {
            0.0
        };

        table.add_row(Row::new(vec![
            Cell::new(&descriptor.name),
            Cell::new(&propagator_id.to_string()),
            Cell::new(&descriptor.description),
            Cell::new(&propagator_stats.runs.to_string()),
            Cell::new(&propagator_stats.prunings.to_string()),
            Cell::new(&format!("{:.2}", avg_time)),
            Cell::new(&format!(
                "{:.2}",
                propagator_stats.time_spent_micros as f64 / 1000.0
            )),
        ]));
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::solver::{domain::DomainStore, propagators::PlusLeq};

    // --- Tests ---

    #[test]
    fn test_the_table_lists_every_propagator_that_ran() {
        let mut store = DomainStore::new();
        let a = store.new_variable(0, 9);
        let b = store.new_variable(0, 9);
        let mut engine = PropagationEngine::new();
        engine.register(PlusLeq::new(a, 3, b));
        let mut stats = SearchStats::default();
        engine.propagate(&mut store, &mut stats).unwrap();

        let rendered = render_stats_table(&stats, &engine);

        assert!(rendered.contains("PlusLeq"));
        assert!(rendered.contains("Prunings"));
        assert_eq!(rendered.matches("PlusLeq").count(), 1);
    }

    #[test]
    fn test_an_empty_search_renders_only_the_header() {
        let engine = PropagationEngine::new();
        let rendered = render_stats_table(&SearchStats::default(), &engine);

        assert!(rendered.contains("Propagator Type"));
        assert!(!rendered.contains("NoOverlap"));
    }
}
