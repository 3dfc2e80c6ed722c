// Swipe/match bookkeeping exports
pub mod gesture;
pub mod registry;

pub use gesture::{GestureResolver, SwipeDecision, SwipeKey, DEFAULT_SWIPE_THRESHOLD_PX};
pub use registry::{MatchRegistry, RegistrySummary, SwipeOutcome};
