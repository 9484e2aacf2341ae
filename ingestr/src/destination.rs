//! Blob-storage destinations (S3 and GCS).
//!
//! A destination is given as a URI plus a table, and either may carry the
//! bucket:
//!
//! ```text
//! --dest-uri "s3://?access_key_id=...&secret_access_key=..." --dest-table bucket/path/table
//! --dest-uri "s3://bucket/path?access_key_id=..."            --dest-table table
//! ```
//!
//! Everything but the last table segment becomes the bucket URL, and the last
//! segment names the table.

use std::{fmt, fs::File, io::BufReader, path::Path};

use base64::{prelude::BASE64_STANDARD, Engine as _};
use serde_json::Value;

use crate::common::*;

/// Check that a schemeless destination table names a bucket and a path, and
/// return it with surrounding slashes and spaces removed.
pub fn validate_table(table: &str) -> Result<&str, DestinationError> {
    let table = table.trim_matches(|c| c == '/' || c == ' ');
    if table.split('/').count() < 2 {
        return Err(DestinationError::InvalidTable);
    }
    Ok(table)
}

/// Where a blob-storage destination writes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlobDestination {
    /// `protocol://bucket/path`, without the table.
    bucket_url: String,
    /// The final segment of the destination table.
    table_name: String,
    /// The file layout requested with `?layout=...`, if any.
    layout: Option<String>,
}

impl BlobDestination {
    /// Work out where to write, given a protocol like `"s3"`, the destination
    /// URI and the destination table.
    pub fn new(
        protocol: &str,
        uri: &ParsedUri,
        dest_table: &str,
    ) -> Result<Self, DestinationError> {
        // Only validate the table if the URI doesn't supply the bucket.
        let dest_table = if uri.host().is_empty() {
            validate_table(dest_table)?
        } else {
            dest_table
        };

        let mut parts = vec![];
        if !uri.host().is_empty() {
            parts.push(uri.host().trim());
        }
        let path = uri.path().trim_matches(|c| c == '/' || c == ' ');
        if !path.is_empty() {
            parts.extend(path.split('/'));
        }
        parts.extend(dest_table.split('/'));

        let (table_name, base_parts) = match parts.split_last() {
            Some((last, rest)) => (last.trim(), rest),
            None => ("", &parts[..]),
        };
        let destination = BlobDestination {
            bucket_url: format!("{}://{}", protocol, base_parts.join("/")),
            table_name: table_name.to_owned(),
            layout: uri.query_param("layout"),
        };
        debug!("writing {} to {}", destination.table_name, destination.bucket_url);
        Ok(destination)
    }

    /// The URL of the directory we write into.
    pub fn bucket_url(&self) -> &str {
        &self.bucket_url
    }

    /// The table name, used for the file names we write.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// The requested file layout, if any.
    pub fn layout(&self) -> Option<&str> {
        self.layout.as_deref()
    }
}

/// S3 credentials taken from a destination URI's query string.
#[derive(Clone)]
pub struct S3Credentials {
    /// The AWS access key ID.
    pub access_key_id: String,
    /// The AWS secret access key.
    pub secret_access_key: String,
    /// A custom endpoint, for S3-compatible stores.
    pub endpoint_url: Option<String>,
}

impl S3Credentials {
    /// Read credentials from `access_key_id`, `secret_access_key` and the
    /// optional `endpoint_url` query parameters.
    pub fn from_uri(uri: &ParsedUri) -> Result<Self, DestinationError> {
        let access_key_id =
            uri.query_param("access_key_id")
                .ok_or(DestinationError::MissingValue {
                    value: "access_key_id",
                    destination: "S3",
                })?;
        let secret_access_key = uri.query_param("secret_access_key").ok_or(
            DestinationError::MissingValue {
                value: "secret_access_key",
                destination: "S3",
            },
        )?;
        let endpoint_url = uri.query_param("endpoint_url");
        if let Some(endpoint_url) = &endpoint_url {
            let endpoint = ParsedUri::parse(endpoint_url);
            if endpoint.scheme().is_empty() || endpoint.host().is_empty() {
                return Err(DestinationError::InvalidEndpoint);
            }
        }
        Ok(S3Credentials {
            access_key_id,
            secret_access_key,
            endpoint_url,
        })
    }
}

// Be careful not to print the secret if you change this!
impl fmt::Debug for S3Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"XXXXXX")
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

/// Load GCS service-account credentials named by a destination URI, either
/// from a `credentials_path` JSON file or a `credentials_base64` parameter.
pub fn gcs_credentials(uri: &ParsedUri) -> Result<Value> {
    if let Some(path) = uri.query_param("credentials_path") {
        let path = Path::new(&path);
        let f = File::open(path)
            .with_context(|| format!("cannot open {}", path.display()))?;
        return serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("cannot parse credentials in {}", path.display()));
    }
    if let Some(encoded) = uri.query_param("credentials_base64") {
        let decoded = BASE64_STANDARD
            .decode(encoded.trim())
            .context("cannot decode credentials_base64")?;
        return serde_json::from_slice(&decoded)
            .context("cannot parse credentials in credentials_base64");
    }
    Err(DestinationError::MissingValue {
        value: "credentials_path or credentials_base64",
        destination: "GCS",
    }
    .into())
}
