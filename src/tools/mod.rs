pub mod resolve_link;
pub mod search;

pub use resolve_link::*;
pub use search::*;
