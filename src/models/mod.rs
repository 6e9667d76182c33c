pub mod repo;
pub mod signal;

pub use repo::*;
pub use signal::*;
