//! Route access control
//!
//! One rule, two sources of "authenticated":
//! - request credentials (`auth_token` cookie or bearer `Authorization` header),
//!   for a server sitting in front of the pages
//! - the identity provider's session state, for a client following sign-in
//!   and sign-out as they happen ([`SessionGuard`])
//!
//! Unauthenticated visitors of a protected route go to `/login`; signed-in
//! visitors of `/login` or `/register` go to `/dashboard`.

use tokio::sync::watch;
use tracing::debug;

use crate::session::SessionState;

pub const LOGIN_ROUTE: &str = "/login";
pub const DASHBOARD_ROUTE: &str = "/dashboard";

pub const PROTECTED_ROUTES: [&str; 4] = ["/dashboard", "/profile", "/emergency-request", "/setup"];
pub const AUTH_ONLY_ROUTES: [&str; 2] = ["/login", "/register"];

/// Framework paths that never go through the guard
pub const UNGUARDED_PREFIXES: [&str; 4] = ["/api", "/_next/static", "/_next/image", "/favicon.ico"];

const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteClass {
    Protected,
    AuthOnly,
    Public,
    Unguarded,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    pub from: String,
    pub to: &'static str,
}

/// `path` is `route` or lives below it
fn under(path: &str, route: &str) -> bool {
    match path.strip_prefix(route) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
        None => false,
    }
}

pub fn classify(path: &str) -> RouteClass {
    if UNGUARDED_PREFIXES.iter().any(|p| path.starts_with(p)) {
        RouteClass::Unguarded
    } else if PROTECTED_ROUTES.iter().any(|r| under(path, r)) {
        RouteClass::Protected
    } else if AUTH_ONLY_ROUTES.iter().any(|r| under(path, r)) {
        RouteClass::AuthOnly
    } else {
        RouteClass::Public
    }
}

/// Where a visitor of `path` has to go, if anywhere
pub fn decide(path: &str, authenticated: bool) -> Option<Redirect> {
    let to = match (classify(path), authenticated) {
        (RouteClass::Protected, false) => LOGIN_ROUTE,
        (RouteClass::AuthOnly, true) => DASHBOARD_ROUTE,
        _ => return None,
    };
    Some(Redirect {
        from: path.to_string(),
        to,
    })
}

/// Credential carried by an incoming page request: the `auth_token` cookie,
/// else a bearer `Authorization` header.
pub fn request_token<I, K, V>(headers: I) -> Option<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut bearer = None;
    for (name, value) in headers {
        let (name, value) = (name.as_ref(), value.as_ref());
        if name.eq_ignore_ascii_case("cookie") {
            let cookie = value
                .split(';')
                .filter_map(|pair| pair.trim().split_once('='))
                .find(|(key, _)| *key == AUTH_COOKIE)
                .map(|(_, token)| token.trim())
                .filter(|token| !token.is_empty());
            if let Some(token) = cookie {
                return Some(token.to_string());
            }
        } else if name.eq_ignore_ascii_case("authorization") {
            bearer = bearer_credential(value).map(str::to_string);
        }
    }
    bearer
}

/// Token of a `Bearer` authorization value; the scheme name is
/// case-insensitive.
fn bearer_credential(value: &str) -> Option<&str> {
    let value = value.trim_start();
    let (scheme, token) = (value.get(..6)?, value.get(6..)?);
    if !scheme.eq_ignore_ascii_case("bearer") || !token.starts_with(' ') {
        return None;
    }
    Some(token.trim()).filter(|token| !token.is_empty())
}

/// Guard a page request by its headers
pub fn guard_request<I, K, V>(path: &str, headers: I) -> Option<Redirect>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    decide(path, request_token(headers).is_some())
}

/// Follows the identity session for the page currently shown
pub struct SessionGuard {
    receiver: watch::Receiver<SessionState>,
    route: String,
}

/// Start following session changes while `route` is displayed
pub fn watch_session(receiver: watch::Receiver<SessionState>, route: impl Into<String>) -> SessionGuard {
    SessionGuard {
        receiver,
        route: route.into(),
    }
}

impl SessionGuard {
    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn is_authenticated(&self) -> bool {
        self.receiver.borrow().is_authenticated()
    }

    /// Redirect implied by the current session for the current route
    pub fn check(&mut self) -> Option<Redirect> {
        let redirect = decide(&self.route, self.is_authenticated());
        self.follow(redirect)
    }

    /// Show `path` and return the redirect the current session implies for it
    pub fn navigate(&mut self, path: impl Into<String>) -> Option<Redirect> {
        self.route = path.into();
        self.check()
    }

    /// Wait for the next session change that moves the user off the current
    /// route. `None` once the identity provider is gone.
    pub async fn next_redirect(&mut self) -> Option<Redirect> {
        loop {
            self.receiver.changed().await.ok()?;
            let authenticated = self.receiver.borrow_and_update().is_authenticated();
            debug!(route = %self.route, authenticated, "session changed");
            if let Some(redirect) = self.follow(decide(&self.route, authenticated)) {
                return Some(redirect);
            }
        }
    }

    fn follow(&mut self, redirect: Option<Redirect>) -> Option<Redirect> {
        if let Some(redirect) = &redirect {
            debug!(from = %redirect.from, to = redirect.to, "redirecting");
            self.route = redirect.to.to_string();
        }
        redirect
    }
}
