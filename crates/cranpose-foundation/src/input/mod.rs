pub mod config;
pub mod pointer_source;
pub mod types;

pub use config::PointerSourceConfig;
pub use pointer_source::{PointerEventSource, PointerEventSourceBuilder, PointerSourceError};
pub use types::{InputModality, PointerCallback, PointerDownCallback};
