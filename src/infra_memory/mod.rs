mod friendship_repo_memory;
mod user_repo_memory;

pub use friendship_repo_memory::*;
pub use user_repo_memory::*;
