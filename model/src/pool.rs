use std::collections::HashMap;

use crate::base_types::{RequestId, SplitId};
use crate::request::{Request, SplitRequest};

/// Owns every [`Request`] and every [`SplitRequest`] created while
/// processing one planning batch. Per `spec.md` §9 Design Note 3
/// ("cyclic/backpointer relations... store by stable index/id"), every
/// other component refers to requests and splits by id through this pool
/// rather than holding direct references.
#[derive(Debug, Default)]
pub struct RequestPool {
    requests: HashMap<RequestId, Request>,
    /// Insertion order of requests, kept alongside the `HashMap` so
    /// preprocessing can iterate "in insertion order" as `spec.md` §5
    /// requires rather than in the map's arbitrary order.
    order: Vec<RequestId>,
    splits: HashMap<SplitId, SplitRequest>,
    next_split_id: u32,
}

impl RequestPool {
    pub fn new() -> Self {
        RequestPool::default()
    }

    pub fn insert_request(&mut self, request: Request) {
        self.order.push(request.id());
        self.requests.insert(request.id(), request);
    }

    pub fn request(&self, id: RequestId) -> &Request {
        self.requests
            .get(&id)
            .unwrap_or_else(|| panic!("request {} not in pool", id))
    }

    pub fn request_mut(&mut self, id: RequestId) -> &mut Request {
        self.requests
            .get_mut(&id)
            .unwrap_or_else(|| panic!("request {} not in pool", id))
    }

    pub fn requests(&self) -> impl Iterator<Item = &Request> {
        self.requests.values()
    }

    pub fn requests_mut(&mut self) -> impl Iterator<Item = &mut Request> {
        self.requests.values_mut()
    }

    /// Request ids in the order they were inserted (`spec.md` §5).
    pub fn request_ids_in_order(&self) -> impl Iterator<Item = RequestId> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Allocates a fresh split id. Monotonic for the lifetime of the pool,
    /// mirroring the source's process-wide `SplitRequest.id_counter`.
    pub fn next_split_id(&mut self) -> SplitId {
        let id = SplitId(self.next_split_id);
        self.next_split_id += 1;
        id
    }

    pub fn insert_split(&mut self, split: SplitRequest) {
        self.splits.insert(split.split_id(), split);
    }

    pub fn split(&self, id: SplitId) -> &SplitRequest {
        self.splits
            .get(&id)
            .unwrap_or_else(|| panic!("split request {} not in pool", id))
    }

    pub fn split_mut(&mut self, id: SplitId) -> &mut SplitRequest {
        self.splits
            .get_mut(&id)
            .unwrap_or_else(|| panic!("split request {} not in pool", id))
    }

    pub fn splits(&self) -> impl Iterator<Item = &SplitRequest> {
        self.splits.values()
    }

    pub fn split_count(&self) -> usize {
        self.splits.len()
    }
}
