//! Identity of the signed-in user, as seen by the core.
//!
//! Authentication itself lives outside the engine. The core only needs to
//! read the current identity and hear about sign-in and sign-out, which is
//! what [`SessionGate`] captures.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// Identifier of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct UserId(String);

impl UserId {
    /// Wrap a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Read access to the current identity plus change notification.
///
/// Receivers returned by [`SessionGate::subscribe`] observe the latest
/// identity; intermediate values may be skipped when several transitions
/// happen before a receiver wakes.
pub trait SessionGate: Send + Sync {
    /// The signed-in user, or `None` for an anonymous session.
    fn current(&self) -> Option<UserId>;

    /// Subscribe to identity transitions.
    fn subscribe(&self) -> watch::Receiver<Option<UserId>>;
}

impl<T> SessionGate for Arc<T>
where
    T: SessionGate + ?Sized,
{
    fn current(&self) -> Option<UserId> {
        (**self).current()
    }

    fn subscribe(&self) -> watch::Receiver<Option<UserId>> {
        (**self).subscribe()
    }
}

/// [`SessionGate`] backed by a `tokio` watch channel.
///
/// Hosts call [`WatchSessionGate::sign_in`] and
/// [`WatchSessionGate::sign_out`] when their auth layer reports a change.
///
/// # Examples
/// ```
/// use yatra_core::{SessionGate, UserId, WatchSessionGate};
///
/// let gate = WatchSessionGate::anonymous();
/// let changes = gate.subscribe();
/// assert!(gate.current().is_none());
///
/// gate.sign_in(UserId::new("u-1"));
/// assert_eq!(gate.current(), Some(UserId::new("u-1")));
/// assert!(changes.has_changed().unwrap_or(false));
/// ```
#[derive(Debug)]
pub struct WatchSessionGate {
    identity: watch::Sender<Option<UserId>>,
}

impl Default for WatchSessionGate {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl WatchSessionGate {
    /// A gate with nobody signed in.
    pub fn anonymous() -> Self {
        let (identity, _) = watch::channel(None);
        Self { identity }
    }

    /// A gate with `user` already signed in.
    pub fn signed_in(user: UserId) -> Self {
        let (identity, _) = watch::channel(Some(user));
        Self { identity }
    }

    /// Record a sign-in. Re-signing the same user does not notify.
    pub fn sign_in(&self, user: UserId) {
        self.transition(Some(user));
    }

    /// Record a sign-out. Signing out twice does not notify.
    pub fn sign_out(&self) {
        self.transition(None);
    }

    fn transition(&self, next: Option<UserId>) {
        self.identity.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                log::debug!(
                    "session identity changed to {}",
                    next.as_ref().map_or("anonymous", UserId::as_str)
                );
                *current = next;
                true
            }
        });
    }
}

impl SessionGate for WatchSessionGate {
    fn current(&self) -> Option<UserId> {
        self.identity.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<UserId>> {
        self.identity.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn repeated_sign_in_does_not_notify() {
        let gate = WatchSessionGate::signed_in(UserId::new("u-1"));
        let mut changes = gate.subscribe();
        changes.borrow_and_update();

        gate.sign_in(UserId::new("u-1"));
        assert!(!changes.has_changed().expect("gate alive"));

        gate.sign_out();
        assert!(changes.has_changed().expect("gate alive"));
        assert!(changes.borrow_and_update().is_none());
    }

    #[rstest]
    fn arc_gate_delegates() {
        let gate = Arc::new(WatchSessionGate::anonymous());
        gate.sign_in(UserId::new("u-2"));
        let shared: &dyn SessionGate = &gate;
        assert_eq!(shared.current(), Some(UserId::new("u-2")));
    }
}
