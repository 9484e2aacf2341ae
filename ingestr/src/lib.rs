//! Helpers shared by ingestr's source and destination adapters.
//!
//! Adapters receive a connection URI and a table string from the user, and
//! need to turn those into something a storage client or API can act on. The
//! most interesting pieces here are:
//!
//! - [`bucket::resolve`], which decides which bucket and object glob a
//!   blob-storage source should read,
//! - [`region::infer_region`], which finds an AWS region in a DynamoDB
//!   connection URI, and
//! - [`table_name::split`], which splits `"dataset.table"` identifiers.
//!
//! Everything here is synchronous and free of global state. Anything that
//! needs tuning is read from an explicit [`Configuration`].

#![warn(missing_docs, unused_extern_crates, clippy::all)]

use std::result;

pub mod bucket;
pub mod chunking;
pub mod config;
pub mod destination;
pub mod errors;
pub mod logging;
pub mod masking;
pub mod minute_ranges;
pub mod parsed_uri;
pub mod properties;
pub mod region;
pub mod table_name;

/// Standard error type for this library.
pub use anyhow::Error;

/// Standard result type for this library.
pub type Result<T, E = Error> = result::Result<T, E>;

pub use bucket::{resolve, BucketSpec, TableSource};
pub use config::Configuration;
pub use parsed_uri::ParsedUri;
pub use region::infer_region;
pub use table_name::{split, TableDefinition};

/// Definitions included by all the files in this crate.
#[allow(unused_imports)]
pub(crate) mod common {
    pub(crate) use anyhow::{format_err, Context as _};
    pub(crate) use tracing::{debug, trace, warn};

    pub(crate) use crate::{
        config::Configuration, errors::*, parsed_uri::ParsedUri, Error, Result,
    };
}
