pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod pipeline;
pub mod stats;
pub mod transform;

pub use catalog::{GaiaTapClient, StarCatalog};
pub use error::{FetchError, FetchErrorKind};
pub use pipeline::{StarField, StarPipeline};
pub use transform::{DisplayPolicy, ExclusionNotice, ExclusionReason, Transformed};
