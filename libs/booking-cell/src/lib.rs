pub mod models;
pub mod services;

pub use models::*;
pub use services::availability::AvailabilityResolver;
pub use services::booking::BookingCommitter;
pub use services::normalize::DateNormalizer;
pub use services::slots::{decode_token, encode_slot};
