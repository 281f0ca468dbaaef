pub mod config;
pub mod daemon;
pub mod domains;
pub mod error;
pub mod interfaces;
pub mod scheduler;
pub mod services;

pub use crate::config::Config;
pub use crate::domains::envelope::{Acknowledgement, Envelope, EnvelopeType, FetchBatch};
pub use crate::error::{RelayError, Result};
pub use crate::services::fetcher::{Completion, MessageFetcherJob};
