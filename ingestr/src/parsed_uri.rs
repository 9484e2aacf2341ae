//! Connection strings, split into their generic URI components.
//!
//! We can't use [`url::Url`] directly here, because users hand us strings like
//! `"bucket/file"` or `"s3://"` which are not valid absolute URLs, and we still
//! need to pull them apart. So we split strings the way a generic URI parser
//! does, and never fail.

use std::{collections::BTreeMap, convert::Infallible, fmt, str::FromStr};

use url::{form_urlencoded, Url};

/// A connection string, split into `scheme://host/path?query#fragment`.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct ParsedUri {
    /// The scheme, lowercased. Empty if there was none.
    scheme: String,
    /// Did we see a `//` introducing a network location?
    has_authority: bool,
    /// The network location, exactly as written (including any `user@` and
    /// `:port`).
    host: String,
    /// Everything between the network location and the query.
    path: String,
    /// The raw query string, without the `?`.
    query: String,
    /// The raw fragment, without the `#`.
    fragment: String,
}

impl ParsedUri {
    /// Split `s` into its URI components.
    pub fn parse(s: &str) -> Self {
        let mut rest = s.trim_start_matches(|c: char| c <= ' ');

        let mut scheme = String::new();
        if let Some(colon) = rest.find(':') {
            if is_scheme(&rest[..colon]) {
                scheme = rest[..colon].to_ascii_lowercase();
                rest = &rest[colon + 1..];
            }
        }

        let mut has_authority = false;
        let mut host = "";
        if let Some(after_slashes) = rest.strip_prefix("//") {
            let end = after_slashes
                .find(['/', '?', '#'])
                .unwrap_or(after_slashes.len());
            has_authority = true;
            host = &after_slashes[..end];
            rest = &after_slashes[end..];
        }

        let (rest, fragment) = rest.split_once('#').unwrap_or((rest, ""));
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));

        ParsedUri {
            scheme,
            has_authority,
            host: host.to_owned(),
            path: path.to_owned(),
            query: query.to_owned(),
            fragment: fragment.to_owned(),
        }
    }

    /// The scheme, lowercased, or `""`.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The network location (bucket, container or `host:port`), or `""`.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The path, including any leading `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw query string.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The raw fragment.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Decode our query string into a map from names to every value given for
    /// that name. Parameters with empty values are skipped.
    pub fn query_params(&self) -> BTreeMap<String, Vec<String>> {
        let mut params = BTreeMap::<String, Vec<String>>::new();
        for (key, value) in form_urlencoded::parse(self.query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            params
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
        params
    }

    /// Return the first non-empty value of the query parameter `name`.
    pub fn query_param(&self, name: &str) -> Option<String> {
        form_urlencoded::parse(self.query.as_bytes())
            .find(|(key, value)| key == name && !value.is_empty())
            .map(|(_, value)| value.into_owned())
    }
}

/// Is `candidate` a URI scheme? It must start with an ASCII letter, and
/// contain only letters, digits, `+`, `-` and `.`.
fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.'),
        _ => false,
    }
}

impl fmt::Display for ParsedUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
        }
        if self.has_authority {
            write!(f, "//{}", self.host)?;
        }
        write!(f, "{}", self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }
        Ok(())
    }
}

impl FromStr for ParsedUri {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ParsedUri::parse(s))
    }
}

impl From<&Url> for ParsedUri {
    fn from(url: &Url) -> Self {
        ParsedUri::parse(url.as_str())
    }
}
