//! Query resolution: catalog lookup, live vendor search, validation and
//! fallback links, in that order.

pub mod engine;
pub mod error;
pub mod fallback;
pub mod response;
mod validate;

pub use engine::{EngineSettings, SearchEngine};
pub use error::SearchError;
pub use fallback::{encode_query, fallback_links};
pub use response::SearchResponse;
