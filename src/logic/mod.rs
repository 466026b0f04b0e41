//! Tournament engine: gender partitioning, eligibility, match progression,
//! and standings maintenance.

pub mod eligibility;
pub mod gender;
pub mod progression;
pub mod standings;

pub use eligibility::EligibilitySnapshot;
pub use gender::GenderResolver;
pub use progression::{
    create_match, delete_match, update_match, CreateMatchRequest, UpdateMatchRequest,
};
pub use standings::RecomputeReport;
