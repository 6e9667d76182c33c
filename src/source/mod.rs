pub mod git;

pub use git::{GitCliFetcher, SourceFetcher};
