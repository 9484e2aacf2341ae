//! Splitting long property lists across several API requests.
//!
//! HubSpot takes the list of properties to return as a comma-separated query
//! parameter, and rejects URLs which get too long. Objects with many custom
//! properties need several requests, whose results are then merged by object
//! ID.

use std::collections::BTreeSet;

use crate::common::*;

/// Group `properties` into chunks whose comma-joined length is at most
/// `max_length`.
///
/// Duplicates are removed and names are sorted, so the result is stable. A
/// single name longer than `max_length` gets a chunk to itself. We always
/// return at least one chunk, even if it's empty.
pub fn chunk_properties<I, S>(properties: I, max_length: usize) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let unique = properties
        .into_iter()
        .map(Into::into)
        .collect::<BTreeSet<String>>();

    let mut chunks = vec![];
    let mut current = Vec::<String>::new();
    let mut current_len = 0;
    for property in unique {
        let joined_len = if current.is_empty() {
            property.len()
        } else {
            current_len + 1 + property.len()
        };
        if !current.is_empty() && joined_len > max_length {
            chunks.push(std::mem::take(&mut current));
            current_len = property.len();
        } else {
            current_len = joined_len;
        }
        current.push(property);
    }
    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }

    trace!("split properties into {} chunks", chunks.len());
    chunks
}

/// Like [`chunk_properties`], using the configured maximum length.
pub fn chunk_properties_with_config<I, S>(
    properties: I,
    config: &Configuration,
) -> Result<Vec<Vec<String>>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Ok(chunk_properties(
        properties,
        config.hubspot_property_chunk_length()?,
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn short_list_is_one_chunk() {
        assert_eq!(
            chunk_properties(["b", "a", "b"], 100),
            vec![vec!["a".to_owned(), "b".to_owned()]],
        );
    }

    #[test]
    fn splits_at_joined_length() {
        // "aaa,bbb" is 7 characters, "aaa,bbb,ccc" is 11.
        assert_eq!(
            chunk_properties(["ccc", "bbb", "aaa"], 7),
            vec![
                vec!["aaa".to_owned(), "bbb".to_owned()],
                vec!["ccc".to_owned()],
            ],
        );
    }

    #[test]
    fn long_property_gets_own_chunk() {
        assert_eq!(
            chunk_properties(["a", "very_long_property_name", "z"], 5),
            vec![
                vec!["a".to_owned()],
                vec!["very_long_property_name".to_owned()],
                vec!["z".to_owned()],
            ],
        );
    }

    #[test]
    fn empty_input_still_has_a_chunk() {
        assert_eq!(
            chunk_properties(Vec::<String>::new(), 10),
            vec![Vec::<String>::new()],
        );
    }

    #[test]
    fn every_chunk_fits() {
        let props = (0..500).map(|i| format!("custom_property_{}", i));
        let chunks = chunk_properties(props, 200);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.join(",").len() <= 200);
        }
        assert_eq!(chunks.iter().map(Vec::len).sum::<usize>(), 500);
    }
}
