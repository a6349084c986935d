//! Session Store - who is logged in
//!
//! The store is the single source of truth for authentication status. It
//! exposes a closed set of transitions; there are no field setters. Each
//! transition is one `watch` update, so a subscriber only ever sees whole
//! snapshots.
//!
//! ```text
//!              begin_auth()               complete_auth(user)
//!  Anonymous ──────────────► Authenticating ──────────────────► Authenticated
//!      ▲                          │                                  │
//!      │      fail_auth(msg)      │                                  │
//!      ├──────────────────────────┘                                  │
//!      │                     logout()                                │
//!      └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//!
//! `is_authenticated() == user().is_some()` after every transition.

use std::sync::Arc;

use nutriscan_types::User;
use tokio::sync::watch;

use crate::credential::CredentialStore;

/// Coarse lifecycle phase derived from a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Anonymous,
    Authenticating,
    Authenticated,
}

/// Immutable snapshot of the session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    is_authenticated: bool,
    user: Option<User>,
    loading: bool,
    error: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> AuthPhase {
        if self.loading {
            AuthPhase::Authenticating
        } else if self.is_authenticated {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Anonymous
        }
    }

    fn attach(&mut self, user: Option<User>) {
        self.is_authenticated = user.is_some();
        self.user = user;
    }
}

/// Receiver that yields on every session transition
pub type SessionWatcher = watch::Receiver<Session>;

/// Process-wide session state container
#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<Session>>,
    credentials: Arc<dyn CredentialStore>,
}

impl SessionStore {
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        let (tx, _rx) = watch::channel(Session::default());
        Self {
            tx: Arc::new(tx),
            credentials,
        }
    }

    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> SessionWatcher {
        self.tx.subscribe()
    }

    pub fn current_user(&self) -> Option<User> {
        self.tx.borrow().user.clone()
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Attach or detach a user directly (e.g. after token validation)
    pub fn set_user(&self, user: Option<User>) {
        self.tx.send_modify(|s| {
            s.attach(user);
            s.error = None;
        });
    }

    /// A login or register call is in flight. Re-entrant calls overwrite.
    pub fn begin_auth(&self) {
        tracing::debug!("session: begin_auth");
        self.tx.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    pub fn complete_auth(&self, user: User) {
        tracing::debug!("session: complete_auth for {}", user.id);
        self.tx.send_modify(|s| {
            s.attach(Some(user));
            s.loading = false;
            s.error = None;
        });
    }

    /// Back to anonymous with an error for the UI
    pub fn fail_auth(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("session: fail_auth ({})", message);
        self.tx.send_modify(|s| {
            s.attach(None);
            s.loading = false;
            s.error = Some(message);
        });
    }

    /// Reset to the initial state and drop the durable credential.
    pub fn logout(&self) {
        tracing::debug!("session: logout");
        self.tx.send_replace(Session::default());
        if let Err(e) = self.credentials.clear() {
            tracing::warn!("Failed to clear stored credential on logout: {}", e);
        }
    }

    pub fn set_error(&self, error: Option<String>) {
        self.tx.send_modify(|s| s.error = error);
    }

    pub fn clear_error(&self) {
        self.set_error(None);
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.tx.borrow())
            .finish()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::credential::MemoryCredentialStore;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        SetUser(Option<u8>),
        Begin,
        Complete(u8),
        Fail,
        Logout,
        SetError(Option<u8>),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            proptest::option::of(any::<u8>()).prop_map(Op::SetUser),
            Just(Op::Begin),
            any::<u8>().prop_map(Op::Complete),
            Just(Op::Fail),
            Just(Op::Logout),
            proptest::option::of(any::<u8>()).prop_map(Op::SetError),
        ]
    }

    fn user(n: u8) -> User {
        User {
            id: format!("u{}", n),
            email: format!("u{}@example.com", n),
            display_name: format!("User {}", n),
        }
    }

    proptest! {
        /// `is_authenticated` tracks `user` across any transition sequence.
        #[test]
        fn authenticated_iff_user(ops in prop::collection::vec(arb_op(), 0..64)) {
            let store = SessionStore::new(Arc::new(MemoryCredentialStore::new()));
            for op in ops {
                match op {
                    Op::SetUser(u) => store.set_user(u.map(user)),
                    Op::Begin => store.begin_auth(),
                    Op::Complete(n) => store.complete_auth(user(n)),
                    Op::Fail => store.fail_auth("failed"),
                    Op::Logout => store.logout(),
                    Op::SetError(e) => store.set_error(e.map(|n| format!("e{}", n))),
                }
                let s = store.snapshot();
                prop_assert_eq!(s.is_authenticated(), s.user().is_some());
            }
        }

        /// Logout always lands on the initial state.
        #[test]
        fn logout_always_resets(ops in prop::collection::vec(arb_op(), 0..32)) {
            let store = SessionStore::new(Arc::new(MemoryCredentialStore::new()));
            for op in ops {
                match op {
                    Op::SetUser(u) => store.set_user(u.map(user)),
                    Op::Begin => store.begin_auth(),
                    Op::Complete(n) => store.complete_auth(user(n)),
                    Op::Fail => store.fail_auth("failed"),
                    Op::Logout => store.logout(),
                    Op::SetError(e) => store.set_error(e.map(|n| format!("e{}", n))),
                }
            }
            store.logout();
            prop_assert_eq!(store.snapshot(), Session::default());
        }
    }
}
