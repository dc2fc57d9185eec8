mod session_store_memory;
mod verification_token_store_memory;

pub use session_store_memory::*;
pub use verification_token_store_memory::*;
