//! Per-browser voter identity.
//!
//! Each browser carries an opaque random token in the `voter_id` cookie so
//! downstream consumers can attribute ballots to a session. The token is not
//! authenticated and no server-side record of issued identities exists, so a
//! 64-bit collision silently conflates two voters.

use axum_extra::extract::cookie::CookieJar;

pub const VOTER_COOKIE: &str = "voter_id";

/// 64 random bits as lowercase hex, no prefix or padding.
pub fn new_voter_id() -> String {
    format!("{:x}", rand::random::<u64>())
}

/// Reuse the identity from the cookie when present, otherwise mint one.
/// An empty cookie value counts as absent.
pub fn resolve_voter_id(jar: &CookieJar) -> String {
    match jar.get(VOTER_COOKIE).map(|cookie| cookie.value()) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => new_voter_id(),
    }
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::cookie::Cookie;

    use super::*;

    #[test]
    fn new_ids_are_valid_hex() {
        let id = new_voter_id();
        assert!(!id.is_empty());
        assert!(u64::from_str_radix(&id, 16).is_ok());
        assert_eq!(id, id.to_lowercase());
    }

    #[test]
    fn new_ids_are_distinct() {
        assert_ne!(new_voter_id(), new_voter_id());
    }

    #[test]
    fn existing_cookie_is_reused() {
        let jar = CookieJar::new().add(Cookie::new(VOTER_COOKIE, "deadbeef"));
        assert_eq!(resolve_voter_id(&jar), "deadbeef");
    }

    #[test]
    fn missing_cookie_mints_an_id() {
        let jar = CookieJar::new();
        let id = resolve_voter_id(&jar);
        assert!(u64::from_str_radix(&id, 16).is_ok());
    }

    #[test]
    fn empty_cookie_counts_as_absent() {
        let jar = CookieJar::new().add(Cookie::new(VOTER_COOKIE, ""));
        assert!(!resolve_voter_id(&jar).is_empty());
    }
}
