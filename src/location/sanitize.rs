//! Navigation argument clean-up.

use url::Url;

/// Normalize a route handed to `navigate`.
///
/// Whitespace is trimmed, empty input becomes `/`, absolute URLs are
/// reduced to path, query and fragment, and a leading `/` is ensured.
pub fn sanitize(route: &str) -> String {
    let trimmed = route.trim();
    if trimmed.is_empty() {
        return "/".to_string();
    }

    if let Ok(url) = Url::parse(trimmed) {
        if url.has_host() {
            let mut out = url.path().to_string();
            if let Some(query) = url.query() {
                out.push('?');
                out.push_str(query);
            }
            if let Some(fragment) = url.fragment() {
                out.push('#');
                out.push_str(fragment);
            }
            return out;
        }
    }

    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize(""), "/");
        assert_eq!(sanitize("   "), "/");
        assert_eq!(sanitize(" /home "), "/home");
        assert_eq!(sanitize("users/5"), "/users/5");
        assert_eq!(sanitize("#/inbox"), "/#/inbox");
        assert_eq!(
            sanitize("http://localhost:8080/app/#/users?x=1"),
            "/app/#/users?x=1"
        );
        assert_eq!(sanitize("https://example.com/a?b=c"), "/a?b=c");
    }
}
