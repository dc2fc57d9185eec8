mod authorization_service_fake;
mod authorization_service_impl;
mod mailer_log;
mod token_codec_impl;
mod token_generator_impl;
mod verification_service_impl;

pub use authorization_service_fake::*;
pub use authorization_service_impl::*;
pub use mailer_log::*;
pub use token_codec_impl::*;
pub use token_generator_impl::*;
pub use verification_service_impl::*;
