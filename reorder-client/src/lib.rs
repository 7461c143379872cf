//! Reorder Client - HTTP collaborator for field reordering
//!
//! Persists field positions and refreshes object metadata over the
//! metadata API, plugging into [`reorder::Reconciler`].

pub mod config;
pub mod error;
pub mod fields;
pub mod http;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use fields::{FieldApi, MetadataCache};
pub use http::{HttpClient, NetworkHttpClient};
