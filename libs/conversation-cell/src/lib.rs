pub mod models;
pub mod services;

pub use models::*;
pub use services::identity::IdentityService;
pub use services::session::{ChatError, PatientSession};
pub use services::suggestions::{pickable_actions, SuggestedPick};
