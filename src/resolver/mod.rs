//! Session/profile resolution state machine
//!
//! On startup and on every auth-state change, the resolver turns the
//! identity provider's raw session into the application [`Profile`] and
//! republishes the pair to every consumer over a watch channel. Route guards
//! and UI chrome subscribe and re-evaluate on each transition.
//!
//! States, in snapshot terms:
//! - authenticating: `loading` or `!profile_loaded`
//! - resolved: session + profile present, settled
//! - resolved without profile: session present, profile absent, settled
//!   (onboarding in progress; a valid terminal state, not an error)
//! - unauthenticated: no session, settled
//!
//! Profile fetches run as separate tasks that commit through an epoch check,
//! so a fetch started for a superseded session can never clobber the state
//! of a newer one, whatever order the completions land in.

use crate::domain::{Profile, Session};
use crate::error::Result;
use crate::provider::{IdentityProvider, ProfileStore};
use crate::realtime::{ChangeEvent, Subscription};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Resolver output published to every consumer.
///
/// Consumers treat snapshots as immutable: re-render on the next published
/// value, never mutate in place.
#[derive(Debug, Clone)]
pub struct AuthSnapshot {
    pub session: Option<Session>,
    pub profile: Option<Profile>,
    /// A session event arrived but resolution has not settled yet.
    pub loading: bool,
    /// The profile fetch for the current session has completed (found,
    /// missing, or failed-open).
    pub profile_loaded: bool,
}

impl AuthSnapshot {
    fn initial() -> Self {
        Self {
            session: None,
            profile: None,
            loading: true,
            profile_loaded: false,
        }
    }

    fn authenticating(session: Session) -> Self {
        Self {
            session: Some(session),
            profile: None,
            loading: true,
            profile_loaded: false,
        }
    }

    fn resolved(session: Session, profile: Option<Profile>) -> Self {
        Self {
            session: Some(session),
            profile,
            loading: false,
            profile_loaded: true,
        }
    }

    fn unauthenticated() -> Self {
        Self {
            session: None,
            profile: None,
            loading: false,
            profile_loaded: true,
        }
    }

    /// Settled with a session but no profile row (onboarding account).
    pub fn is_resolved_without_profile(&self) -> bool {
        !self.loading && self.profile_loaded && self.session.is_some() && self.profile.is_none()
    }
}

struct ResolverShared {
    tx: watch::Sender<AuthSnapshot>,
    /// Bumped on every auth event, sign-out, and drop. A profile fetch only
    /// commits if the epoch it was started under is still current.
    epoch: AtomicU64,
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    /// Signals the event loop that `sign_out` cleared local state, so the
    /// profile-row subscription is dropped without waiting for the next
    /// provider event.
    sign_outs: Notify,
}

impl ResolverShared {
    fn bump_epoch(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    fn commit(&self, epoch: u64, session: &Session, profile: Option<Profile>) {
        // The closure runs under the channel lock, making the epoch
        // comparison and the publish one step. A newer session bumps the
        // epoch before its own publish, so whichever side of that publish
        // this closure lands on, a stale fetch never lands last.
        self.tx.send_if_modified(|snapshot| {
            if self.current_epoch() != epoch {
                debug!(user_id = %session.user_id, "discarding stale profile fetch");
                return false;
            }
            *snapshot = AuthSnapshot::resolved(session.clone(), profile);
            true
        });
    }
}

/// Resolves the identity provider's session into the application profile.
///
/// Owns one background task for the event loop. Dropping the resolver tears
/// the task down and invalidates any in-flight fetch.
pub struct SessionResolver {
    shared: Arc<ResolverShared>,
    task: JoinHandle<()>,
}

impl SessionResolver {
    /// Spawn the resolver loop: one `current_session()` fetch on startup,
    /// then one re-resolution per auth-state change.
    pub fn spawn(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        let (tx, _rx) = watch::channel(AuthSnapshot::initial());
        let shared = Arc::new(ResolverShared {
            tx,
            epoch: AtomicU64::new(0),
            identity,
            profiles,
            sign_outs: Notify::new(),
        });
        let task = tokio::spawn(run(shared.clone()));
        Self { shared, task }
    }

    /// Watch the resolver's output; the receiver sees every transition.
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.shared.tx.subscribe()
    }

    /// Current snapshot, cloned.
    pub fn snapshot(&self) -> AuthSnapshot {
        self.shared.tx.borrow().clone()
    }

    /// Clear local state immediately, then tell the provider.
    ///
    /// The UI must observe the sign-out without waiting on the network, so
    /// the snapshot flips before the provider call; a provider failure is
    /// logged, never surfaced.
    pub async fn sign_out(&self) {
        self.shared.bump_epoch();
        self.shared.tx.send_replace(AuthSnapshot::unauthenticated());
        self.shared.sign_outs.notify_one();
        if let Err(err) = self.shared.identity.sign_out().await {
            warn!(error = %err, "identity provider sign-out failed after local clear");
        }
    }

    /// Passthrough to the identity provider.
    pub async fn update_password(&self, new_password: &str) -> Result<()> {
        self.shared.identity.update_password(new_password).await
    }
}

impl Drop for SessionResolver {
    fn drop(&mut self) {
        // Invalidate in-flight fetches before stopping the loop so a late
        // completion cannot publish into a dead resolver.
        self.shared.bump_epoch();
        self.task.abort();
    }
}

async fn run(shared: Arc<ResolverShared>) {
    let mut events = shared.identity.auth_events();

    let initial = match shared.identity.current_session().await {
        Ok(session) => session,
        Err(err) => {
            warn!(error = %err, "initial session fetch failed; starting unauthenticated");
            None
        }
    };
    let mut profile_changes = apply_session(&shared, initial).await;

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Some(event) => {
                        profile_changes =
                            apply_session(&shared, event.session().cloned()).await;
                    }
                    // Provider stream closed; nothing further will arrive.
                    None => break,
                }
            }
            change = next_change(&mut profile_changes) => {
                match change {
                    Some(change) => {
                        debug!(row_id = %change.row_id, "profile row changed; re-fetching");
                        refetch_current(&shared);
                    }
                    None => profile_changes = None,
                }
            }
            _ = shared.sign_outs.notified() => {
                // Local sign-out: stop watching the old profile row now,
                // not on the next provider event.
                profile_changes = None;
            }
        }
    }
}

/// Re-enter the authenticating state for a (possibly absent) session and
/// kick off its profile fetch. Returns the realtime subscription on the new
/// profile row; the previous subscription is dropped by assignment, which is
/// its teardown.
async fn apply_session(
    shared: &Arc<ResolverShared>,
    session: Option<Session>,
) -> Option<Subscription<ChangeEvent>> {
    let epoch = shared.bump_epoch();

    let Some(session) = session else {
        shared.tx.send_replace(AuthSnapshot::unauthenticated());
        return None;
    };

    shared
        .tx
        .send_replace(AuthSnapshot::authenticating(session.clone()));
    spawn_profile_fetch(shared.clone(), session.clone(), epoch);

    match shared.profiles.subscribe_profile(session.user_id).await {
        Ok(subscription) => Some(subscription),
        Err(err) => {
            warn!(
                error = %err,
                user_id = %session.user_id,
                "profile subscription failed; server-side edits will not refresh"
            );
            None
        }
    }
}

/// Fetch the profile for `session` and commit it under `epoch`.
///
/// A failed lookup resolves to "no profile" rather than leaving the state
/// machine authenticating forever; the route guards decide whether that is
/// acceptable for a given route.
fn spawn_profile_fetch(shared: Arc<ResolverShared>, session: Session, epoch: u64) {
    tokio::spawn(async move {
        let profile = match shared.profiles.fetch_profile(session.user_id).await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(
                    error = %err,
                    user_id = %session.user_id,
                    "profile fetch failed; resolving to no profile"
                );
                None
            }
        };
        shared.commit(epoch, &session, profile);
    });
}

/// Re-fetch the profile of the session currently published, keeping the
/// epoch: a realtime edit replaces the profile, it does not change sessions.
fn refetch_current(shared: &Arc<ResolverShared>) {
    let session = shared.tx.borrow().session.clone();
    let Some(session) = session else { return };
    spawn_profile_fetch(shared.clone(), session, shared.current_epoch());
}

async fn next_change(
    subscription: &mut Option<Subscription<ChangeEvent>>,
) -> Option<ChangeEvent> {
    match subscription {
        Some(subscription) => subscription.recv().await,
        None => std::future::pending().await,
    }
}
