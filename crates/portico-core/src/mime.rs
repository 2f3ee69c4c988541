//! Content-Type constants and matching.
//!
//! Matching is a case-insensitive substring test, so parameters such as
//! `charset` or `boundary` never get in the way:
//!
//! ```rust
//! use portico_core::mime;
//!
//! assert!(mime::is_json("Application/JSON; charset=utf-8"));
//! assert!(mime::is_form("multipart/form-data; boundary=X"));
//! assert!(!mime::is_csv("application/json"));
//! ```

/// Name of the Content-Type header.
pub const CONTENT_TYPE: &str = "content-type";

/// `application/json`
pub const APPLICATION_JSON: &str = "application/json";

/// `text/csv`
pub const TEXT_CSV: &str = "text/csv";

/// `application/x-www-form-urlencoded`
pub const APPLICATION_FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// `multipart/form-data`
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

fn contains_ignore_case(content_type: &str, needle: &str) -> bool {
    content_type.to_ascii_lowercase().contains(needle)
}

/// Returns `true` if the Content-Type names a JSON body.
#[must_use]
pub fn is_json(content_type: &str) -> bool {
    contains_ignore_case(content_type, APPLICATION_JSON)
}

/// Returns `true` for URL-encoded form bodies.
#[must_use]
pub fn is_urlencoded(content_type: &str) -> bool {
    contains_ignore_case(content_type, APPLICATION_FORM_URLENCODED)
}

/// Returns `true` for multipart form bodies.
#[must_use]
pub fn is_multipart(content_type: &str) -> bool {
    contains_ignore_case(content_type, MULTIPART_FORM_DATA)
}

/// Returns `true` for either form encoding.
#[must_use]
pub fn is_form(content_type: &str) -> bool {
    is_urlencoded(content_type) || is_multipart(content_type)
}

/// Returns `true` if the Content-Type asks for a CSV document.
#[must_use]
pub fn is_csv(content_type: &str) -> bool {
    contains_ignore_case(content_type, TEXT_CSV)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_matching() {
        assert!(is_json("application/json"));
        assert!(is_json("APPLICATION/JSON"));
        assert!(is_json("application/json; charset=utf-8"));
        assert!(!is_json("text/plain"));
        assert!(!is_json(""));
    }

    #[test]
    fn test_form_matching() {
        assert!(is_form("application/x-www-form-urlencoded"));
        assert!(is_form("Multipart/Form-Data; boundary=abc"));
        assert!(is_urlencoded("application/x-www-form-urlencoded; charset=utf-8"));
        assert!(!is_urlencoded("multipart/form-data"));
        assert!(is_multipart("multipart/form-data"));
        assert!(!is_form("application/json"));
    }

    #[test]
    fn test_csv_matching() {
        assert!(is_csv("text/csv"));
        assert!(is_csv("text/csv; charset=utf-8"));
        assert!(is_csv("TEXT/CSV"));
        assert!(!is_csv("text/plain"));
    }
}
