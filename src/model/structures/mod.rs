pub mod endpoint;
pub mod history;
pub mod link;
pub mod playlist;
pub mod pool;
pub mod processing;
pub mod suggest_config;
