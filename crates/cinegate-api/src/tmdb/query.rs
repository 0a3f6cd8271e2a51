//! Query-string encoding shared by all request types.

use url::form_urlencoded;

/// A request that can be sent as URL query parameters.
pub trait QueryParameters {
    /// Returns the request's parameters as key/value pairs.
    fn query_parameters(&self) -> Vec<(&'static str, String)>;

    /// Encodes the parameters as a form-urlencoded query string with keys
    /// sorted, so equal requests always produce the same string.
    fn encode_query(&self) -> String {
        encode_sorted(self.query_parameters())
    }
}

/// Sorts `pairs` by key (stable for repeated keys) and form-urlencodes them.
pub(crate) fn encode_sorted(mut pairs: Vec<(&'static str, String)>) -> String {
    pairs.sort_by_key(|&(key, _)| key);
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
