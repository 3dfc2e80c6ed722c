// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    normalize_email, Account, AccountProfile, CandidateError, CandidateKind, CandidateRecord,
    Membership, NewAccount, Role, SwipeCandidate, SwipeCandidateBuilder,
};
pub use requests::{LoginRequest, RegisterRequest};
pub use responses::{AuthResponse, ErrorResponse, HealthResponse};
