//! Wires the planning phases together for one request batch
//! (`spec.md` §2 "Data flow"), printing a one-line progress message with
//! elapsed time on entry/exit of each phase, in the teacher's
//! `println!`-based style (`SPEC_FULL.md` §14) rather than pulling in a
//! logging crate.

use std::time::Instant;

use linegraph::LineGraph;
use model::{Network, PlanningConfig, Request, RequestPool, Telemetry};

use crate::PlanningError;

/// Preprocesses every request, builds and solves the event-graph MILP,
/// decodes the winning flow into per-bus routes, and replays/validates
/// the result (`spec.md` §2's whole data flow for one batch).
pub fn plan_batch(
    requests: Vec<Request>,
    network: &Network,
    config: &PlanningConfig,
    telemetry: &mut Telemetry,
) -> Result<(RequestPool, decoder::Plan, executor::DistanceLedger), PlanningError> {
    let mut pool = RequestPool::new();
    for request in requests {
        pool.insert_request(request);
    }

    let start = Instant::now();
    let mut graph = LineGraph::new(network, config);
    preprocessing::preprocess_all(&mut graph, network, config, &mut pool);
    telemetry.time_preprocessing = Some(start.elapsed());
    telemetry.number_of_splits = pool.split_count();
    println!(
        "preprocessing done ({} requests, {} splits, elapsed {:.2}s)",
        pool.len(),
        pool.split_count(),
        telemetry.time_preprocessing.unwrap().as_secs_f64()
    );

    let start = Instant::now();
    let (model_build, index) = mip::build_milp(&pool, network, config);
    telemetry.event_graph_nodes = index.line_graphs.values().map(|g| g.node_count()).sum();
    telemetry.event_graph_edges = index.line_graphs.values().map(|g| g.out_edges.iter().map(|e| e.len()).sum::<usize>()).sum();
    telemetry.time_building_mip = Some(start.elapsed());
    println!(
        "event-graph + MILP built ({} nodes, {} edges, elapsed {:.2}s)",
        telemetry.event_graph_nodes,
        telemetry.event_graph_edges,
        start.elapsed().as_secs_f64()
    );

    let start = Instant::now();
    let solution = model_build.solve()?;
    telemetry.integrality_gap_first = Some(solution.get_gap());
    telemetry.time_solving_first = Some(start.elapsed());

    let start = Instant::now();
    let plan = decoder::decode_plan(&pool, network, config, &index, &solution);
    telemetry.time_decoding = Some(start.elapsed());
    println!("plan decoded, elapsed {:.2}s", telemetry.time_decoding.unwrap().as_secs_f64());

    let start = Instant::now();
    let ledger = executor::validate_and_finalize(&plan, &mut pool, network, config);
    telemetry.time_validating = Some(start.elapsed());
    println!("plan validated, elapsed {:.2}s", telemetry.time_validating.unwrap().as_secs_f64());

    Ok((pool, plan, ledger))
}
