//! Static suburb and agent reference data.
//!
//! Both datasets ship embedded in the binary and are parsed once at startup
//! into immutable directories. Nothing in the crate mutates them afterwards.

pub mod agents;
pub mod matcher;
pub mod suburbs;

pub use agents::{Agent, AgentContacts, AgentDirectory, AgentStats, SuburbProfile};
pub use matcher::{agents_for_suburb, GeneralistPolicy, MAX_SUBURB_MATCHES};
pub use suburbs::{
    format_price, format_price_band, Centroid, DataPoints, ImagePlan, PriceBand, SourceNote,
    Suburb, SuburbDirectory,
};

/// Error raised when an embedded dataset fails to parse.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("embedded {name} dataset is invalid: {source}")]
    Parse {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
