use indexmap::IndexMap;
use serde::Serialize;

/// Aggregated view of every link touching one leaderboard on one side of the graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Endpoint {
    pub leaderboard_id: String,
    /// Indices into [`LinkGraph::links`](crate::model::links::LinkGraph)
    pub links: Vec<usize>,
    /// Sum of linked target ranks, including neutral padding
    pub rank_sum: f64,
    /// Padded average of linked target ranks. Lower is more relevant.
    pub relevance: f64,
    /// Proportional share of origin-side link volume
    pub style: f64
}

impl Endpoint {
    pub fn new(leaderboard_id: &str) -> Endpoint {
        Endpoint {
            leaderboard_id: leaderboard_id.to_owned(),
            links: Vec::new(),
            rank_sum: 0.0,
            relevance: 0.0,
            style: 0.0
        }
    }
}

/// Endpoints keyed by leaderboard id, addressable by stable index.
///
/// Collections are created from a known id set up front; no endpoint is ever
/// created implicitly on lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EndpointCollection {
    endpoints: IndexMap<String, Endpoint>
}

impl EndpointCollection {
    pub fn from_ids<I, S>(ids: I) -> EndpointCollection
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>
    {
        let mut endpoints = IndexMap::new();

        for id in ids {
            let id = id.as_ref();
            endpoints
                .entry(id.to_owned())
                .or_insert_with(|| Endpoint::new(id));
        }

        EndpointCollection { endpoints }
    }

    pub fn index_of(&self, leaderboard_id: &str) -> Option<usize> {
        self.endpoints.get_index_of(leaderboard_id)
    }

    pub fn get(&self, index: usize) -> Option<&Endpoint> {
        self.endpoints.get_index(index).map(|(_, e)| e)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Endpoint> {
        self.endpoints.get_index_mut(index).map(|(_, e)| e)
    }

    pub fn by_id(&self, leaderboard_id: &str) -> Option<&Endpoint> {
        self.endpoints.get(leaderboard_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Endpoint> {
        self.endpoints.values_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Total links attached to the endpoint for `leaderboard_id`, 0 if unknown
    pub fn link_count(&self, leaderboard_id: &str) -> usize {
        self.by_id(leaderboard_id).map(|e| e.links.len()).unwrap_or(0)
    }
}
