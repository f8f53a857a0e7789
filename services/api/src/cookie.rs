//! Token cookie policy
//!
//! The same cookie name and attributes are used when setting the token and
//! when clearing it, otherwise browsers keep the old cookie around.

use axum_extra::extract::cookie::{Cookie, SameSite};

/// Name of the cookie carrying the access token
pub const TOKEN_COOKIE: &str = "token";

/// Security attributes of the token cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookiePolicy {
    /// Production needs cross-site delivery to the hosted front end, which
    /// browsers only allow for secure cookies
    pub fn for_environment(production: bool) -> Self {
        if production {
            Self {
                secure: true,
                same_site: SameSite::None,
            }
        } else {
            Self {
                secure: false,
                same_site: SameSite::Strict,
            }
        }
    }

    /// Cookie carrying a freshly issued token
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((TOKEN_COOKIE, token))
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .path("/")
            .build()
    }

    /// Expired, empty cookie that makes the browser drop the token
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build((TOKEN_COOKIE, ""))
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .path("/")
            .build();
        cookie.make_removal();
        cookie
    }
}

/// Parse a `SameSite` attribute name, case-insensitively
pub fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.trim().to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_policies() {
        let production = CookiePolicy::for_environment(true);
        assert!(production.secure);
        assert_eq!(production.same_site, SameSite::None);

        let development = CookiePolicy::for_environment(false);
        assert!(!development.secure);
        assert_eq!(development.same_site, SameSite::Strict);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = CookiePolicy::for_environment(true).session_cookie("abc".to_string());
        assert_eq!(cookie.name(), TOKEN_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let cookie = CookiePolicy::for_environment(false).removal_cookie();
        let rendered = cookie.to_string();
        assert!(rendered.starts_with("token=;"), "{}", rendered);
        assert!(rendered.contains("Max-Age=0"), "{}", rendered);
        assert!(rendered.contains("Path=/"), "{}", rendered);
    }

    #[test]
    fn test_parse_same_site() {
        assert_eq!(parse_same_site("None"), Some(SameSite::None));
        assert_eq!(parse_same_site(" lax "), Some(SameSite::Lax));
        assert_eq!(parse_same_site("STRICT"), Some(SameSite::Strict));
        assert_eq!(parse_same_site("sometimes"), None);
    }
}
