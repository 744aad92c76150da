// Pool construction
pub const CANDIDATE_WINDOW: usize = 30;
pub const CONSISTENCY_RATIO: f32 = 0.7;
pub const POOL_PLAYER_CAP: usize = 20;

// Origin selection
pub const ORIGIN_COUNT: usize = 50;
pub const EXTRA_COUNT: usize = 15;
/// Upper bound on origins, independent of the selection window
pub const ORIGIN_CAP: usize = 50;
pub const ORIGIN_RETENTION: f64 = 0.75;
pub const RECENCY_DECAY: f64 = 0.965;
pub const FILLER_MIN_LINKS: u32 = 20;
pub const FILLER_EASIEST_FRACTION: f64 = 0.30;

// Link graph
pub const LINK_SURVIVAL: f64 = 0.7;
pub const DISTANCE_EXPONENT: i32 = 3;

// Endpoint aggregation
pub const RELEVANCE_MIN_LINKS: usize = 10;
/// Midpoint of ranks 1..=20
pub const NEUTRAL_RANK: f64 = 10.5;

// Filter fusion
pub const STYLE_WEIGHT: f64 = 1.0;
pub const OVERWEIGHT_WEIGHT: f64 = 0.2;
pub const IMPROVEMENT_MARGIN: usize = 5;
pub const SUGGESTION_COUNT: usize = 50;

// Similarity recommender
pub const RATING_CEILING: f64 = 15.0;
pub const TOLERANCE_START: f64 = 0.15;
pub const TOLERANCE_STEP: f64 = 0.05;
pub const TOLERANCE_CEILING: f64 = 0.50;
pub const SIMILARITY_MATCH_TARGET: usize = 20;
pub const SIMILARITY_MIN_DIMENSIONS: usize = 2;

// Playlist
pub const PLAYLIST_AUTHOR: &str = "BeatLeader";
pub const LEVEL_ID_PREFIX: &str = "custom_level_";
