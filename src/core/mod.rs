pub mod services;
pub mod stash_manager;
pub mod time;
pub mod utils;
