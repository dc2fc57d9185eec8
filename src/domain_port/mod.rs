// store

mod session_store;
mod verification_token_store;

pub use session_store::*;
pub use verification_token_store::*;

// collaborators

mod mailer;
mod token_generator;

pub use mailer::*;
pub use token_generator::*;
