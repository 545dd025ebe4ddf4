pub mod mutation;
pub mod search;

pub use mutation::Mutation;
pub use search::{hill_climb, SearchConfig, SearchResult};
