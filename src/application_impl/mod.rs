mod auth_service_fake;
mod auth_service_jwt;
mod friendship_service_impl;
mod user_service_impl;

pub use auth_service_fake::*;
pub use auth_service_jwt::*;
pub use friendship_service_impl::*;
pub use user_service_impl::*;
