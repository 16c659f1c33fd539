//! Ambient location access.

use url::Url;

/// Read-only view of the active document location.
///
/// Browser bindings read `window.location`; headless hosts use
/// [`StaticLocation`] or the in-memory history stack.
pub trait LocationReader: Send + Sync {
    /// Path component, e.g. `/app/users/7`.
    fn pathname(&self) -> String;

    /// Fragment including the leading `#`, or empty.
    fn hash(&self) -> String;

    /// Query string including the leading `?`, or empty.
    fn search(&self) -> String;
}

/// A fixed location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticLocation {
    pub pathname: String,
    pub hash: String,
    pub search: String,
}

impl StaticLocation {
    /// Split an absolute URL or a site-relative href into its components.
    ///
    /// Unparseable input yields the root location.
    pub fn from_href(href: &str) -> Self {
        let base = Url::parse("http://localhost/").ok();
        let parsed = Url::parse(href)
            .ok()
            .or_else(|| base.and_then(|b| b.join(href).ok()));

        match parsed {
            Some(url) => Self {
                pathname: url.path().to_string(),
                hash: url.fragment().map(|f| format!("#{}", f)).unwrap_or_default(),
                search: url.query().map(|q| format!("?{}", q)).unwrap_or_default(),
            },
            None => Self {
                pathname: "/".to_string(),
                ..Self::default()
            },
        }
    }
}

impl LocationReader for StaticLocation {
    fn pathname(&self) -> String {
        self.pathname.clone()
    }

    fn hash(&self) -> String {
        self.hash.clone()
    }

    fn search(&self) -> String {
        self.search.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_relative_href() {
        let loc = StaticLocation::from_href("/app/#/users/5?tab=posts");
        assert_eq!(loc.pathname, "/app/");
        assert_eq!(loc.hash, "#/users/5?tab=posts");
        assert_eq!(loc.search, "");
    }

    #[test]
    fn test_from_absolute_href() {
        let loc = StaticLocation::from_href("https://example.com/orders?page=2");
        assert_eq!(loc.pathname, "/orders");
        assert_eq!(loc.hash, "");
        assert_eq!(loc.search, "?page=2");
    }
}
