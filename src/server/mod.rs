mod mail_dispatcher;
mod server;

pub use mail_dispatcher::*;
pub use server::*;
