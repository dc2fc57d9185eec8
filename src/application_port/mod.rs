mod authorization_service;
mod verification_service;

pub use authorization_service::*;
pub use verification_service::*;
