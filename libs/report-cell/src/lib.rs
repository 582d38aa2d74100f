pub mod services;

pub use services::report::DoctorSession;
