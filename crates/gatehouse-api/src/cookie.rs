//! `Set-Cookie` values for the session cookie.

use std::time::Duration;

/// Cookie carrying a freshly issued session token.
pub fn session_cookie(name: &str, token: &str, ttl: Duration, same_site_strict: bool) -> String {
    let same_site = if same_site_strict {
        "; SameSite=Strict"
    } else {
        ""
    };
    format!(
        "{name}={token}; Path=/; HttpOnly{same_site}; Max-Age={}",
        ttl.as_secs()
    )
}

/// Cookie that makes the client drop the session cookie.
pub fn clear_session_cookie(name: &str) -> String {
    format!("{name}=; Path=/; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("session_id", "abc", Duration::from_secs(86_400), true);
        assert_eq!(
            cookie,
            "session_id=abc; Path=/; HttpOnly; SameSite=Strict; Max-Age=86400"
        );
    }

    #[test]
    fn test_lax_cookie_omits_same_site() {
        let cookie = session_cookie("sid", "abc", Duration::from_secs(60), false);
        assert_eq!(cookie, "sid=abc; Path=/; HttpOnly; Max-Age=60");
    }

    #[test]
    fn test_clear_cookie() {
        assert_eq!(clear_session_cookie("session_id"), "session_id=; Path=/; Max-Age=0");
    }
}
