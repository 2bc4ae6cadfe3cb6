//! Query string parameters
//!
//! Handlers extract the raw key/value pairs so a repeated key never turns
//! into an extractor rejection. The first occurrence of a key wins.

pub type QueryPairs = Vec<(String, String)>;

pub fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.clone())
}
