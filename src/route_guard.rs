//! Route guard policy
//!
//! Decides whether a navigation is allowed given only the path and whether a
//! credential is present. The guard ships disabled: every path is allowed
//! until `routes.enabled` is set in config.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutePolicy {
    pub enabled: bool,
    /// Exact paths that signed-in users are bounced away from
    pub public_routes: Vec<String>,
    /// Path prefixes that need a credential
    pub protected_routes: Vec<String>,
    /// Prefixes the guard never looks at (API, static assets)
    pub ignored_prefixes: Vec<String>,
    pub login_path: String,
    pub home_path: String,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            public_routes: ["/", "/login", "/register", "/forgot-password"]
                .map(String::from)
                .to_vec(),
            protected_routes: ["/dashboard", "/profile", "/settings"]
                .map(String::from)
                .to_vec(),
            ignored_prefixes: ["/api", "/_next/static", "/_next/image", "/favicon.ico"]
                .map(String::from)
                .to_vec(),
            login_path: "/login".to_string(),
            home_path: "/dashboard".to_string(),
        }
    }
}

impl RoutePolicy {
    pub fn decide(&self, path: &str, has_credential: bool) -> RouteDecision {
        if !self.enabled {
            return RouteDecision::Allow;
        }

        let path = normalise_path(path);
        if self.ignored_prefixes.iter().any(|p| has_prefix(path, p)) {
            return RouteDecision::Allow;
        }

        if !has_credential && self.protected_routes.iter().any(|p| has_prefix(path, p)) {
            tracing::debug!("route guard: {} needs a credential", path);
            return RouteDecision::Redirect(self.login_path.clone());
        }

        if has_credential && self.public_routes.iter().any(|p| p == path) {
            tracing::debug!("route guard: {} is for signed-out users", path);
            return RouteDecision::Redirect(self.home_path.clone());
        }

        RouteDecision::Allow
    }
}

/// Strip query, fragment and a trailing slash (except for the root)
fn normalise_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    }
}

/// Segment-aware prefix: `/dashboard` covers `/dashboard/calendar` but not `/dashboards`
fn has_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> RoutePolicy {
        RoutePolicy {
            enabled: true,
            ..RoutePolicy::default()
        }
    }

    #[test]
    fn test_disabled_policy_allows_everything() {
        let policy = RoutePolicy::default();
        assert_eq!(policy.decide("/dashboard", false), RouteDecision::Allow);
        assert_eq!(policy.decide("/login", true), RouteDecision::Allow);
    }

    #[test]
    fn test_protected_without_credential_goes_to_login() {
        let policy = enabled();
        assert_eq!(
            policy.decide("/dashboard/calendar", false),
            RouteDecision::Redirect("/login".into())
        );
        assert_eq!(
            policy.decide("/settings?tab=1", false),
            RouteDecision::Redirect("/login".into())
        );
        assert_eq!(policy.decide("/dashboard", true), RouteDecision::Allow);
    }

    #[test]
    fn test_public_with_credential_goes_home() {
        let policy = enabled();
        assert_eq!(
            policy.decide("/login/", true),
            RouteDecision::Redirect("/dashboard".into())
        );
        assert_eq!(
            policy.decide("/", true),
            RouteDecision::Redirect("/dashboard".into())
        );
        assert_eq!(policy.decide("/register", false), RouteDecision::Allow);
    }

    #[test]
    fn test_prefix_respects_segments() {
        let policy = enabled();
        assert_eq!(policy.decide("/dashboards", false), RouteDecision::Allow);
        assert_eq!(policy.decide("/api/auth/login", false), RouteDecision::Allow);
    }

    #[test]
    fn test_deserialize_partial_yaml() {
        let policy: RoutePolicy = serde_yaml::from_str("enabled: true\nhome_path: /home\n").unwrap();
        assert!(policy.enabled);
        assert_eq!(policy.home_path, "/home");
        assert_eq!(policy.login_path, "/login");
        assert_eq!(policy.protected_routes.len(), 3);
    }
}
