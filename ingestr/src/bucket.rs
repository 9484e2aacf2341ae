//! Working out which bucket and objects a blob-storage source should read.
//!
//! Users can tell us where their files live in several ways:
//!
//! ```text
//! ingestr ingest --source-uri s3://            --source-table bucket/file*.csv
//! ingestr ingest --source-uri s3://bucket      --source-table file*.csv
//! ingestr ingest --source-uri s3://            --source-table s3://bucket/file*.csv
//! ingestr ingest --source-uri s3://bucket/file*.csv                     (deprecated)
//! ```
//!
//! [`TableSource::classify`] decides which of these forms we're looking at,
//! and [`resolve`] turns that into a [`BucketSpec`].

use std::fmt;

use serde_derive::{Deserialize, Serialize};

use crate::common::*;

/// A bucket (or container) and a glob naming objects inside it.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct BucketSpec {
    /// The bucket name. May be empty if the user didn't give us one.
    bucket_name: String,
    /// An object path, possibly containing wildcards. We never interpret it.
    object_glob: String,
}

impl BucketSpec {
    /// Create a new `BucketSpec`.
    pub fn new(bucket_name: impl Into<String>, object_glob: impl Into<String>) -> Self {
        BucketSpec {
            bucket_name: bucket_name.into(),
            object_glob: object_glob.into(),
        }
    }

    /// The bucket or container name.
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// The object glob inside the bucket.
    pub fn object_glob(&self) -> &str {
        &self.object_glob
    }

    /// Split into `(bucket_name, object_glob)`.
    pub fn into_parts(self) -> (String, String) {
        (self.bucket_name, self.object_glob)
    }
}

impl fmt::Display for BucketSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket_name, self.object_glob)
    }
}

/// Which form of source URI and table the user gave us, along with the bucket
/// and glob it resolves to.
///
/// The variants are listed in the order we check for them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TableSource {
    /// The table is empty, or the URI has a path: everything comes from the
    /// URI. This is deprecated.
    LegacyForm(BucketSpec),
    /// The URI names a bucket, so it wins over anything in the table.
    UriBucket(BucketSpec),
    /// The URI has no bucket, but the table is itself a URI with one.
    TableUriBucket(BucketSpec),
    /// Neither has a host, so the table is `bucket/glob` (or just `glob`).
    SplitTable(BucketSpec),
}

impl TableSource {
    /// Decide which form `uri` and `table` are in.
    pub fn classify(uri: &ParsedUri, table: &str) -> Self {
        let table = table.trim();
        if table.is_empty() || !uri.path().trim().is_empty() {
            return TableSource::LegacyForm(BucketSpec::new(
                uri.host(),
                strip_leading_slashes(uri.path()),
            ));
        }

        let table_uri = ParsedUri::parse(table);
        if !uri.host().is_empty() {
            TableSource::UriBucket(BucketSpec::new(
                uri.host(),
                strip_leading_slashes(table_uri.path()),
            ))
        } else if !table_uri.host().is_empty() {
            TableSource::TableUriBucket(BucketSpec::new(
                table_uri.host(),
                strip_leading_slashes(table_uri.path()),
            ))
        } else {
            match table.split_once('/') {
                Some((bucket, glob)) => {
                    TableSource::SplitTable(BucketSpec::new(bucket, glob))
                }
                None => TableSource::SplitTable(BucketSpec::new("", table)),
            }
        }
    }

    /// Is this a form we'd like users to stop using?
    pub fn is_deprecated(&self) -> bool {
        matches!(self, TableSource::LegacyForm(_))
    }

    /// The bucket and glob this form resolves to.
    pub fn bucket_spec(&self) -> &BucketSpec {
        match self {
            TableSource::LegacyForm(spec)
            | TableSource::UriBucket(spec)
            | TableSource::TableUriBucket(spec)
            | TableSource::SplitTable(spec) => spec,
        }
    }

    /// Discard the form and keep the bucket and glob.
    pub fn into_bucket_spec(self) -> BucketSpec {
        match self {
            TableSource::LegacyForm(spec)
            | TableSource::UriBucket(spec)
            | TableSource::TableUriBucket(spec)
            | TableSource::SplitTable(spec) => spec,
        }
    }
}

fn strip_leading_slashes(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// Work out which bucket and object glob to read, given a source URI and a
/// table string.
///
/// This never fails. If neither argument names a bucket, the returned bucket
/// name is empty, and it's up to the caller to decide whether that's OK.
pub fn resolve(uri: &ParsedUri, table: &str) -> BucketSpec {
    let source = TableSource::classify(uri, table);
    trace!("resolved {:?} with table {:?} to {:?}", uri.to_string(), table, source);
    if source.is_deprecated() {
        warn!(
            "Deprecation warning: the `scheme://bucket/glob` form of source URI \
             is deprecated. Put the bucket in the source URI and the file glob \
             in the source table, for example `--source-uri {}://{} \
             --source-table {}`",
            uri.scheme(),
            source.bucket_spec().bucket_name(),
            source.bucket_spec().object_glob(),
        );
    }
    source.into_bucket_spec()
}

/// Like [`resolve`], but parse the URI first.
pub fn resolve_str(uri: &str, table: &str) -> BucketSpec {
    resolve(&ParsedUri::parse(uri), table)
}
