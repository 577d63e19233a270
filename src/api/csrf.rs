//! CSRF token lookup
//!
//! State-changing requests must echo the `csrftoken` cookie back in the
//! `X-CSRFToken` header. The value is percent-decoded the same way a
//! browser's `decodeURIComponent` would.

/// Cookie the backend issues the token in
pub const CSRF_COOKIE: &str = "csrftoken";

/// Header the backend checks on POST
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Find the `csrftoken` value in a `Cookie` header string
/// (`"sessionid=abc; csrftoken=xyz"`).
pub fn token_from_cookie_header(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(CSRF_COOKIE)?.strip_prefix('='))
        .filter(|value| !value.is_empty())
        .map(|value| {
            urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string())
        })
}

/// Split a `Cookie` header into individual `name=value` pairs
pub fn cookie_pairs(header: &str) -> impl Iterator<Item = &str> {
    header
        .split(';')
        .map(str::trim)
        .filter(|pair| pair.contains('=') && !pair.starts_with('='))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_found_among_cookies() {
        let header = "sessionid=abc123; csrftoken=tok456; theme=dark";
        assert_eq!(token_from_cookie_header(header), Some("tok456".to_string()));
    }

    #[test]
    fn test_token_is_percent_decoded() {
        assert_eq!(
            token_from_cookie_header("csrftoken=a%2Bb%3D"),
            Some("a+b=".to_string())
        );
    }

    #[test]
    fn test_similar_names_do_not_match() {
        assert_eq!(token_from_cookie_header("xcsrftoken=1; csrftokenx=2"), None);
    }

    #[test]
    fn test_missing_or_empty_token() {
        assert_eq!(token_from_cookie_header("sessionid=abc"), None);
        assert_eq!(token_from_cookie_header("csrftoken="), None);
        assert_eq!(token_from_cookie_header(""), None);
    }

    #[test]
    fn test_cookie_pairs_skip_garbage() {
        let pairs: Vec<_> = cookie_pairs("a=1; ; =x; b=2").collect();
        assert_eq!(pairs, vec!["a=1", "b=2"]);
    }
}
