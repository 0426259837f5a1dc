// src/shared/security/access_policy.rs

/// Allow-list of routes reachable without a session.
///
/// Everything not listed here requires a valid session token. New public
/// endpoints must be added here explicitly.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    exact: Vec<&'static str>,
    prefixes: Vec<&'static str>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            exact: vec![
                "/health",
                "/ready",
                "/api/accounts/sign-up",
                "/api/accounts/login",
                "/api/accounts/check-email-token",
            ],
            prefixes: vec!["/swagger-ui", "/api-docs"],
        }
    }
}

impl AccessPolicy {
    pub fn is_public(&self, path: &str) -> bool {
        if self.exact.iter().any(|p| *p == path) {
            return true;
        }
        self.prefixes.iter().any(|p| path.starts_with(p))
    }
}
