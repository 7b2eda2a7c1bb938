// Outside inputs for the collaborators: job pages and web search.

pub mod fetch;
pub mod search;

pub use fetch::PageFetcher;
pub use search::{TavilyClient, WebSearch};
