//! Recommendation stages, in pipeline order: pool, origins, links,
//! endpoints, fusion. The similarity recommender runs on its own.
pub mod constants;
pub mod endpoints;
pub mod fusion;
pub mod links;
pub mod origin;
pub mod playlist;
pub mod pool;
pub mod shared_pool;
pub mod similarity;
pub mod structures;
pub mod suggest;
