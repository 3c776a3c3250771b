use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
}

pub trait SessionGuard {
    fn session(&self) -> Option<Session>;

    /// Sends the user to the login page. Must not block.
    fn redirect_to_login(&self);
}

/// Gate run by the host before the upload view exists. Without a session the
/// user is redirected and `None` is returned.
pub fn require_session(guard: &dyn SessionGuard) -> Option<Session> {
    let session = guard.session();
    if session.is_none() {
        tracing::warn!("no active session, redirecting to login");
        guard.redirect_to_login();
    }
    session
}

/// Session backed by a configured access token.
pub struct ConfiguredSession {
    access_token: Option<String>,
    login_url: Url,
}

impl ConfiguredSession {
    pub fn new(access_token: Option<String>, login_url: Url) -> Self {
        Self {
            access_token: access_token.filter(|token| !token.trim().is_empty()),
            login_url,
        }
    }
}

impl SessionGuard for ConfiguredSession {
    fn session(&self) -> Option<Session> {
        self.access_token.clone().map(|access_token| Session { access_token })
    }

    fn redirect_to_login(&self) {
        if let Err(err) = open::that_detached(self.login_url.as_str()) {
            tracing::error!(url = %self.login_url, error = %err, "failed to open login page");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeGuard {
        session: Option<Session>,
        redirects: Cell<usize>,
    }

    impl SessionGuard for FakeGuard {
        fn session(&self) -> Option<Session> {
            self.session.clone()
        }

        fn redirect_to_login(&self) {
            self.redirects.set(self.redirects.get() + 1);
        }
    }

    #[test]
    fn active_session_passes_without_redirect() {
        let guard = FakeGuard {
            session: Some(Session {
                access_token: "token".into(),
            }),
            redirects: Cell::new(0),
        };
        assert!(require_session(&guard).is_some());
        assert_eq!(guard.redirects.get(), 0);
    }

    #[test]
    fn missing_session_redirects_once() {
        let guard = FakeGuard {
            session: None,
            redirects: Cell::new(0),
        };
        assert!(require_session(&guard).is_none());
        assert_eq!(guard.redirects.get(), 1);
    }

    #[test]
    fn blank_token_is_no_session() {
        let login = Url::parse("http://localhost:3000/login").unwrap();
        assert!(ConfiguredSession::new(Some("  ".into()), login.clone())
            .session()
            .is_none());
        assert_eq!(
            ConfiguredSession::new(Some("abc".into()), login).session(),
            Some(Session {
                access_token: "abc".into()
            })
        );
    }
}
