//! Utility functions shared across the application.

/// Normalize a request path before it reaches the gate.
///
/// Repeated slashes collapse, a trailing slash is dropped (except for the
/// root) and a leading slash is added when missing. Any query string or
/// fragment is cut off.
///
/// # Example
/// ```ignore
/// assert_eq!(normalize_path("//admin//reports/"), "/admin/reports");
/// ```
pub fn normalize_path(raw: &str) -> String {
    let path = raw.split(['?', '#']).next().unwrap_or_default();

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return "/".to_string();
    }

    let mut normalized = String::with_capacity(path.len() + 1);
    for segment in segments {
        normalized.push('/');
        normalized.push_str(segment);
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain() {
        assert_eq!(normalize_path("/courses"), "/courses");
    }

    #[test]
    fn test_normalize_trailing_slash() {
        assert_eq!(normalize_path("/courses/"), "/courses");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn test_normalize_repeated_slashes() {
        assert_eq!(normalize_path("//admin///reports"), "/admin/reports");
    }

    #[test]
    fn test_normalize_missing_leading_slash() {
        assert_eq!(normalize_path("documents/upload"), "/documents/upload");
    }

    #[test]
    fn test_normalize_strips_query() {
        assert_eq!(normalize_path("/courses?id=3"), "/courses");
        assert_eq!(normalize_path("/login#form"), "/login");
    }
}
