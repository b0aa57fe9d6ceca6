//! Path pattern matching.

use regex::Regex;

use crate::request::PathParams;

/// A compiled path pattern for matching URLs.
///
/// Pattern syntax:
/// - `/users` matches the literal path
/// - `/users/{id}` captures one segment as `id`
/// - `/files/{*path}` captures the rest of the path as `path`
#[derive(Debug, Clone)]
pub struct PathPattern {
    /// Compiled regex for matching.
    regex: Regex,
    /// Parameter names in capture order.
    param_names: Vec<String>,
}

impl PathPattern {
    /// Compiles a path pattern string.
    ///
    /// # Example
    ///
    /// ```
    /// use armature_router::PathPattern;
    ///
    /// let pattern = PathPattern::new("/users/{id}/posts/{post_id}");
    /// let params = pattern.match_path("/users/7/posts/42").unwrap();
    /// assert_eq!(params.get("id"), Some("7"));
    /// assert_eq!(params.get("post_id"), Some("42"));
    /// ```
    pub fn new(pattern: &str) -> Self {
        let mut param_names = Vec::new();
        let mut regex_str = String::from("^");

        for part in pattern.split('/').filter(|s| !s.is_empty()) {
            regex_str.push('/');

            if let Some(param) = part.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                if let Some(name) = param.strip_prefix('*') {
                    param_names.push(name.to_string());
                    regex_str.push_str("(.+)");
                } else {
                    param_names.push(param.to_string());
                    regex_str.push_str("([^/]+)");
                }
            } else {
                regex_str.push_str(&regex::escape(part));
            }
        }

        regex_str.push_str("/?$");

        // Built from an escaped template, always valid.
        let regex = Regex::new(&regex_str).expect("path pattern regex");

        Self { regex, param_names }
    }

    /// Attempts to match a path, returning extracted parameters on success.
    pub fn match_path(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(path)?;

        let mut params = PathParams::new();
        for (i, name) in self.param_names.iter().enumerate() {
            if let Some(value) = caps.get(i + 1) {
                params.insert(name.clone(), value.as_str().to_string());
            }
        }

        Some(params)
    }
}
