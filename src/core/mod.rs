pub mod services;
pub mod validation;
