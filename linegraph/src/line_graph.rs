use std::collections::HashMap;

use model::base_types::{LineId, StopId};
use model::{Network, PlanningConfig};

use crate::line_edge::LineEdge;

/// A directed multigraph over stops, built once from the static network and
/// then augmented/restored per request (`spec.md` §4.2).
///
/// Base edges connect every ordered pair of *transfer stops* on a line
/// (stops shared with at least one other line). `add_request` temporarily
/// extends the graph so Dijkstra and the route-option DFS can start/end at
/// a request's pickup/dropoff even when neither is a transfer stop;
/// `delete_request` is its exact inverse.
pub struct LineGraph<'a> {
    network: &'a Network,
    config: &'a PlanningConfig,
    out_edges: HashMap<StopId, Vec<LineEdge>>,
    in_edges: HashMap<StopId, Vec<LineEdge>>,
    transfer_stops: HashMap<LineId, Vec<StopId>>,
    temp_edges: Vec<LineEdge>,
}

impl<'a> LineGraph<'a> {
    pub fn new(network: &'a Network, config: &'a PlanningConfig) -> Self {
        let mut graph = LineGraph {
            network,
            config,
            out_edges: HashMap::new(),
            in_edges: HashMap::new(),
            transfer_stops: HashMap::new(),
            temp_edges: Vec::new(),
        };
        graph.build_base_graph();
        graph
    }

    fn build_base_graph(&mut self) {
        for line in self.network.lines() {
            let transfer_stops: Vec<StopId> = line
                .stops()
                .iter()
                .copied()
                .filter(|&stop| {
                    self.network
                        .lines()
                        .filter(|other| other.id() != line.id())
                        .any(|other| other.contains(stop))
                })
                .collect();

            for &a in &transfer_stops {
                for &b in &transfer_stops {
                    if a == b {
                        continue;
                    }
                    let duration = self.travel_seconds(a, b);
                    let edge = LineEdge::new(a, b, line.id(), duration);
                    self.out_edges.entry(a).or_default().push(edge);
                    self.in_edges.entry(b).or_default().push(edge);
                }
            }
            self.transfer_stops.insert(line.id(), transfer_stops);
        }
    }

    fn travel_seconds(&self, a: StopId, b: StopId) -> u32 {
        let km = self.network.distance_km(a, b, self.config.km_per_unit);
        self.config.dist_to_time(km)
    }

    pub fn network(&self) -> &'a Network {
        self.network
    }

    pub fn config(&self) -> &'a PlanningConfig {
        self.config
    }

    pub fn out_edges(&self, stop: StopId) -> &[LineEdge] {
        self.out_edges.get(&stop).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn in_edges(&self, stop: StopId) -> &[LineEdge] {
        self.in_edges.get(&stop).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn is_transfer_stop(&self, stop: StopId) -> bool {
        self.transfer_stops.values().any(|stops| stops.contains(&stop))
    }

    /// The unique line a non-transfer stop belongs to. Panics if the stop
    /// belongs to zero or more than one line: a request endpoint that is
    /// not a transfer stop must lie on exactly one line.
    fn owning_line(&self, stop: StopId) -> LineId {
        let mut owners = self.network.lines().filter(|line| line.contains(stop));
        let first = owners
            .next()
            .unwrap_or_else(|| panic!("stop {} is not on any line", stop));
        assert!(
            owners.next().is_none(),
            "stop {} is on multiple lines but is not a transfer stop",
            stop
        );
        first
    }

    /// Temporarily adds edges from/to every transfer stop on `stop`'s line
    /// (in the direction implied by stop order) for each of `pickup` and
    /// `dropoff` that is not already a node. Exactly undone by
    /// `delete_request`.
    pub fn add_request(&mut self, pickup: StopId, dropoff: StopId) {
        for &endpoint in &[pickup, dropoff] {
            if self.is_transfer_stop(endpoint) || self.out_edges.contains_key(&endpoint) {
                continue;
            }
            let line_id = self.owning_line(endpoint);
            let line = self
                .network
                .line(line_id)
                .expect("owning_line returns a valid line id");
            let endpoint_idx = line
                .index_of(endpoint)
                .expect("owning_line guarantees the stop is on this line");

            for &transfer in self.transfer_stops.get(&line_id).into_iter().flatten() {
                let transfer_idx = line
                    .index_of(transfer)
                    .expect("transfer stops come from this line's own stop list");
                let edge = if transfer_idx > endpoint_idx {
                    LineEdge::new(
                        endpoint,
                        transfer,
                        line_id,
                        self.travel_seconds(endpoint, transfer),
                    )
                } else {
                    LineEdge::new(
                        transfer,
                        endpoint,
                        line_id,
                        self.travel_seconds(transfer, endpoint),
                    )
                };
                self.out_edges.entry(edge.from).or_default().push(edge);
                self.in_edges.entry(edge.to).or_default().push(edge);
                self.temp_edges.push(edge);
            }
        }
    }

    /// The exact inverse of `add_request`: removes every edge it added and
    /// drops any node entry left with no remaining edges.
    pub fn delete_request(&mut self, pickup: StopId, dropoff: StopId) {
        for edge in self.temp_edges.drain(..) {
            if let Some(v) = self.out_edges.get_mut(&edge.from) {
                if let Some(pos) = v.iter().position(|&e| e == edge) {
                    v.swap_remove(pos);
                }
            }
            if let Some(v) = self.in_edges.get_mut(&edge.to) {
                if let Some(pos) = v.iter().position(|&e| e == edge) {
                    v.swap_remove(pos);
                }
            }
        }
        for &endpoint in &[pickup, dropoff] {
            if self.is_transfer_stop(endpoint) {
                continue;
            }
            let out_empty = self.out_edges.get(&endpoint).map_or(true, |v| v.is_empty());
            let in_empty = self.in_edges.get(&endpoint).map_or(true, |v| v.is_empty());
            if out_empty && in_empty {
                self.out_edges.remove(&endpoint);
                self.in_edges.remove(&endpoint);
            }
        }
    }
}
