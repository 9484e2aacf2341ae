//! Finding an AWS region in a connection URI.

use lazy_static::lazy_static;
use regex::Regex;

use crate::common::*;

/// Try to work out which AWS region `uri` refers to.
///
/// We look first at the host, which may be a regional DynamoDB endpoint like
/// `dynamodb.us-east-1.amazonaws.com:443`, and then at a `region` query
/// parameter. A missing region is not an error.
pub fn infer_region(uri: &ParsedUri) -> Option<String> {
    lazy_static! {
        static ref ENDPOINT_RE: Regex =
            Regex::new(r"^dynamodb\.([^.:/]+)\.amazonaws\.com:443$")
                .expect("invalid regex in source");
    }

    if let Some(cap) = ENDPOINT_RE.captures(uri.host()) {
        return Some(cap[1].to_owned());
    }
    uri.query_param("region")
}

/// Like [`infer_region`], but fall back to the `aws_region` configured in
/// `config`.
pub fn infer_region_or_default(
    uri: &ParsedUri,
    config: &Configuration,
) -> Result<Option<String>> {
    match infer_region(uri) {
        Some(region) => Ok(Some(region)),
        None => {
            let region = config.aws_region()?;
            debug!("no region in {}, using configured {:?}", uri, region);
            Ok(region)
        }
    }
}

#[test]
fn region_from_endpoint() {
    let uri = ParsedUri::parse("https://dynamodb.us-east-1.amazonaws.com:443");
    assert_eq!(infer_region(&uri).as_deref(), Some("us-east-1"));
}

#[test]
fn endpoint_beats_query_string() {
    let uri =
        ParsedUri::parse("dynamodb://dynamodb.ap-south-1.amazonaws.com:443?region=eu-west-1");
    assert_eq!(infer_region(&uri).as_deref(), Some("ap-south-1"));
}

#[test]
fn region_from_query_string() {
    let uri = ParsedUri::parse("https://x?region=eu-west-1");
    assert_eq!(infer_region(&uri).as_deref(), Some("eu-west-1"));

    let uri = ParsedUri::parse("https://x?region=eu-west-1&region=us-west-2");
    assert_eq!(infer_region(&uri).as_deref(), Some("eu-west-1"));
}

#[test]
fn no_region() {
    assert_eq!(infer_region(&ParsedUri::parse("https://x")), None);
    assert_eq!(infer_region(&ParsedUri::parse("https://x?region=")), None);
    // Endpoints on other ports don't match the regional pattern.
    assert_eq!(
        infer_region(&ParsedUri::parse("https://dynamodb.us-east-1.amazonaws.com")),
        None,
    );
}

#[test]
fn region_is_a_single_host_label() {
    let uri = ParsedUri::parse("https://dynamodb.us-east-1:80.amazonaws.com:443");
    assert_eq!(infer_region(&uri), None);
    let uri = ParsedUri::parse("https://dynamodb.eu.west.amazonaws.com:443");
    assert_eq!(infer_region(&uri), None);
}

#[test]
fn falls_back_to_configured_region() {
    let temp = tempfile::Builder::new()
        .prefix("ingestr")
        .suffix(".toml")
        .tempfile()
        .unwrap();
    let mut config = Configuration::from_path(temp.path()).unwrap();

    let uri = ParsedUri::parse("dynamodb://localhost:8000");
    assert_eq!(infer_region_or_default(&uri, &config).unwrap(), None);

    config.set_aws_region("eu-central-1");
    assert_eq!(
        infer_region_or_default(&uri, &config).unwrap().as_deref(),
        Some("eu-central-1"),
    );

    let uri = ParsedUri::parse("dynamodb://localhost:8000?region=us-west-1");
    assert_eq!(
        infer_region_or_default(&uri, &config).unwrap().as_deref(),
        Some("us-west-1"),
    );
}
