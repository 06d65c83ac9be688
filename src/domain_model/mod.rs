mod friendship;
mod user;

pub use friendship::*;
pub use user::*;
