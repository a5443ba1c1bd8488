//! URL construction for endpoints, details and actions.
//!
//! Every URL the client requests is produced by [`urljoin`], so the
//! trailing-slash policy is applied in exactly one place. Record keys go
//! through [`key_segment`] first, so a key is always one path segment.
//!
//! # Example
//!
//! ```rust
//! use generic_client::rest::urljoin;
//!
//! assert_eq!(urljoin("http://x.com", ["users", "2"], true), "http://x.com/users/2/");
//! assert_eq!(urljoin("http://x.com/", ["users", "2"], false), "http://x.com/users/2");
//!
//! let key = generic_client::rest::key_segment("john#1");
//! assert_eq!(urljoin("http://x.com", ["users", key.as_str()], false), "http://x.com/users/john%231");
//! ```

use std::fmt::Display;

/// Percent-encodes a record key for use as a single path segment.
///
/// Everything outside the unreserved set is escaped, so `/`, `?` and `#`
/// inside a key cannot split the segment or start a query or fragment.
#[must_use]
pub fn key_segment(key: impl Display) -> String {
    urlencoding::encode(&key.to_string()).into_owned()
}

/// Joins a base URL with path segments.
///
/// - `base` is reduced to end with exactly one `/` before joining.
/// - Each segment is rendered with `Display`; empty pieces and stray slashes
///   are dropped, so the result never contains `//` past the scheme. Values
///   that must stay one segment are passed through [`key_segment`] first.
/// - A trailing `/` is appended iff `trailing_slash` is set and at least one
///   segment contributed something.
///
/// Joining is associative: `urljoin(&urljoin(base, [a], t), [b], u)` equals
/// `urljoin(base, [a, b], u)`.
#[must_use]
pub fn urljoin<I>(base: &str, segments: I, trailing_slash: bool) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut url = base.trim_end_matches('/').to_string();
    let mut joined_any = false;

    for segment in segments {
        let segment = segment.to_string();
        for piece in segment.split('/').filter(|piece| !piece.is_empty()) {
            url.push('/');
            url.push_str(piece);
            joined_any = true;
        }
    }

    if !joined_any || trailing_slash {
        url.push('/');
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_with_and_without_base_slash() {
        assert_eq!(urljoin("http://x.com", ["users"], false), "http://x.com/users");
        assert_eq!(urljoin("http://x.com/", ["users"], false), "http://x.com/users");
        assert_eq!(urljoin("http://x.com//", ["users"], false), "http://x.com/users");
    }

    #[test]
    fn test_trailing_slash_iff_requested() {
        assert_eq!(
            urljoin("http://x.com", ["users", "2"], true),
            "http://x.com/users/2/"
        );
        assert_eq!(
            urljoin("http://x.com/", ["users", "2"], false),
            "http://x.com/users/2"
        );
    }

    #[test]
    fn test_mixed_display_segments() {
        let id = 2;
        let segments: [&dyn Display; 3] = [&"users", &id, &"notify"];
        assert_eq!(
            urljoin("http://x.com/api/", segments, false),
            "http://x.com/api/users/2/notify"
        );
    }

    #[test]
    fn test_no_double_slashes_from_segments() {
        assert_eq!(
            urljoin("http://x.com", ["/users/", "", "//2/"], true),
            "http://x.com/users/2/"
        );
        assert_eq!(urljoin("http://x.com", ["a//b"], false), "http://x.com/a/b");
    }

    #[test]
    fn test_no_segments_keeps_base_with_single_slash() {
        let empty: [&str; 0] = [];
        assert_eq!(urljoin("http://x.com", empty, false), "http://x.com/");
        assert_eq!(urljoin("http://x.com/", [""], true), "http://x.com/");
    }

    #[test]
    fn test_key_segment_escapes_reserved_characters() {
        assert_eq!(key_segment("john#1"), "john%231");
        assert_eq!(key_segment("a?b=c"), "a%3Fb%3Dc");
        assert_eq!(key_segment("a/b"), "a%2Fb");
        assert_eq!(key_segment("with space"), "with%20space");
    }

    #[test]
    fn test_key_segment_keeps_plain_keys() {
        assert_eq!(key_segment(42), "42");
        assert_eq!(
            key_segment("0b6d1b3c-5e4a-4f2a-9c1e-2f0c3a9d8e71"),
            "0b6d1b3c-5e4a-4f2a-9c1e-2f0c3a9d8e71"
        );
        assert_eq!(key_segment("user_1.v2~x"), "user_1.v2~x");
    }

    #[test]
    fn test_encoded_key_stays_one_segment() {
        let key = key_segment("a/b");
        assert_eq!(
            urljoin("http://x.com", ["users", key.as_str()], true),
            "http://x.com/users/a%2Fb/"
        );
    }

    #[test]
    fn test_join_is_associative() {
        for trailing in [false, true] {
            let inner = urljoin("http://x.com/api", ["users"], trailing);
            assert_eq!(
                urljoin(&inner, ["2"], true),
                urljoin("http://x.com/api", ["users", "2"], true)
            );
            assert_eq!(
                urljoin(&inner, ["2"], false),
                urljoin("http://x.com/api", ["users", "2"], false)
            );
        }
    }
}
