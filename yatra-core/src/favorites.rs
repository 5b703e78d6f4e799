//! Per-user favorite membership with optimistic toggles.
//!
//! [`FavoriteSync`] is the only writer of the membership set. A toggle
//! applies its change locally before the remote write and reverts it when
//! the write fails, so the UI never waits on the network to show the new
//! state. Each record id moves through a small state machine:
//!
//! ```text
//! Unfavorited --toggle--> OptimisticallyFavorited --ack--> Favorited
//!      ^                          |
//!      +---------failure----------+
//!
//! Favorited --toggle--> OptimisticallyUnfavorited --ack--> Unfavorited
//!     ^                           |
//!     +---------failure-----------+
//! ```
//!
//! Toggles on the same record serialise; toggles on different records run
//! independently. Every `load_for` and `clear` bumps a generation counter,
//! which lets late responses from superseded requests be ignored.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};
use tokio::sync::Mutex as TurnLock;

use crate::{FavoriteSource, FetchError, RecordId, SessionGate, ToggleError, UserId};

/// Observable favorite state of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FavoriteState {
    /// Not favorited and nothing pending.
    Unfavorited,
    /// Added locally; the remote insert has not settled.
    OptimisticallyFavorited,
    /// Favorited and confirmed.
    Favorited,
    /// Removed locally; the remote delete has not settled.
    OptimisticallyUnfavorited,
}

impl FavoriteState {
    /// Whether the record currently shows as favorited.
    pub const fn is_favorited(self) -> bool {
        matches!(self, Self::Favorited | Self::OptimisticallyFavorited)
    }

    /// Whether a remote write is still in flight.
    pub const fn is_pending(self) -> bool {
        matches!(
            self,
            Self::OptimisticallyFavorited | Self::OptimisticallyUnfavorited
        )
    }
}

/// Change a successful toggle made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FavoriteChange {
    /// The record was added to favorites.
    Added,
    /// The record was removed from favorites.
    Removed,
}

impl FavoriteChange {
    fn apply(self, members: &mut BTreeSet<RecordId>, id: &RecordId) {
        match self {
            Self::Added => {
                members.insert(id.clone());
            }
            Self::Removed => {
                members.remove(id);
            }
        }
    }

    const fn inverse(self) -> Self {
        match self {
            Self::Added => Self::Removed,
            Self::Removed => Self::Added,
        }
    }
}

/// Result of a favorites load that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the membership set.
    Applied {
        /// Number of favorites now held.
        count: usize,
    },
    /// A newer load or a sign-out superseded this one; its response was
    /// discarded.
    Superseded,
}

#[derive(Debug, Default)]
struct Membership {
    owner: Option<UserId>,
    generation: u64,
    members: BTreeSet<RecordId>,
    pending: HashMap<RecordId, FavoriteChange>,
}

impl Membership {
    fn advance(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }
}

/// Tracks which records the current user has favorited.
///
/// # Examples
/// ```
/// use yatra_core::test_support::{MemoryFavoriteSource, block_on};
/// use yatra_core::{FavoriteChange, FavoriteSync, RecordId, UserId, WatchSessionGate};
///
/// let user = UserId::new("u-1");
/// let sync = FavoriteSync::new(
///     MemoryFavoriteSource::default(),
///     WatchSessionGate::signed_in(user.clone()),
/// );
/// let rumtek = RecordId::new("rumtek");
///
/// let change = block_on(sync.toggle(&rumtek)).expect("remote insert succeeds");
/// assert_eq!(change, FavoriteChange::Added);
/// assert!(sync.is_favorited(&rumtek));
/// ```
pub struct FavoriteSync<F, G> {
    source: F,
    gate: G,
    membership: Mutex<Membership>,
    turns: Mutex<HashMap<RecordId, Arc<TurnLock<()>>>>,
}

impl<F, G> fmt::Debug for FavoriteSync<F, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let membership = lock(&self.membership);
        f.debug_struct("FavoriteSync")
            .field("owner", &membership.owner)
            .field("favorites", &membership.members.len())
            .field("pending", &membership.pending.len())
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<F, G> FavoriteSync<F, G>
where
    F: FavoriteSource,
    G: SessionGate,
{
    /// Construct an empty membership set.
    pub fn new(source: F, gate: G) -> Self {
        Self {
            source,
            gate,
            membership: Mutex::new(Membership::default()),
            turns: Mutex::new(HashMap::new()),
        }
    }

    /// The session gate consulted before writes.
    pub const fn gate(&self) -> &G {
        &self.gate
    }

    /// Replace the membership set with `user`'s remote favorites.
    ///
    /// Favorites of a different previous owner are dropped immediately, so
    /// they never show while the new list is loading.
    ///
    /// # Errors
    /// Returns [`FetchError::Favorites`] when the remote read fails. The
    /// membership set is then empty.
    pub async fn load_for(&self, user: UserId) -> Result<LoadOutcome, FetchError> {
        let generation = {
            let mut membership = lock(&self.membership);
            if membership.owner.as_ref() != Some(&user) {
                membership.members.clear();
                membership.owner = Some(user.clone());
            }
            membership.advance()
        };
        debug!("loading favorites for {user}");

        let listed = self.source.list(&user).await;

        let mut membership = lock(&self.membership);
        if membership.generation != generation {
            debug!("discarding superseded favorites response for {user}");
            return Ok(LoadOutcome::Superseded);
        }
        match listed {
            Ok(ids) => {
                let mut members: BTreeSet<RecordId> = ids.into_iter().collect();
                // Writes still in flight keep their optimistic change.
                for (id, change) in &membership.pending {
                    change.apply(&mut members, id);
                }
                membership.members = members;
                let count = membership.members.len();
                debug!("loaded {count} favorites for {user}");
                Ok(LoadOutcome::Applied { count })
            }
            Err(source) => {
                membership.members.clear();
                warn!("favorites load for {user} failed, assuming none: {source}");
                Err(FetchError::Favorites { user, source })
            }
        }
    }

    /// Flip the favorite state of `record_id`.
    ///
    /// The change is visible through [`FavoriteSync::is_favorited`] before
    /// the remote write resolves. A second toggle of the same record waits
    /// for the first to settle.
    ///
    /// # Errors
    /// - [`ToggleError::AuthRequired`] when nobody is signed in; checked
    ///   before any remote call.
    /// - [`ToggleError::Sync`] when the remote write fails; the local change
    ///   has been reverted by the time the error is returned.
    pub async fn toggle(&self, record_id: &RecordId) -> Result<FavoriteChange, ToggleError> {
        if self.gate.current().is_none() {
            debug!("favorite toggle for {record_id} refused: not signed in");
            return Err(ToggleError::AuthRequired);
        }

        let turn = self.turn_for(record_id);
        let outcome = {
            let _held = turn.lock().await;
            self.toggle_in_turn(record_id).await
        };
        self.finish_turn(record_id, &turn);
        outcome
    }

    async fn toggle_in_turn(&self, record_id: &RecordId) -> Result<FavoriteChange, ToggleError> {
        // Identity may have changed while waiting for the previous toggle.
        let Some(user) = self.gate.current() else {
            return Err(ToggleError::AuthRequired);
        };

        let (change, generation) = {
            let mut membership = lock(&self.membership);
            let change = if membership.members.contains(record_id) {
                FavoriteChange::Removed
            } else {
                FavoriteChange::Added
            };
            change.apply(&mut membership.members, record_id);
            membership.pending.insert(record_id.clone(), change);
            (change, membership.generation)
        };
        debug!("optimistically applied {change:?} for favorite {record_id}");

        let written = match change {
            FavoriteChange::Added => self.source.insert(&user, record_id).await,
            FavoriteChange::Removed => self.source.delete(&user, record_id).await,
        };

        let mut membership = lock(&self.membership);
        membership.pending.remove(record_id);
        match written {
            Ok(()) => {
                debug!("confirmed {change:?} for favorite {record_id}");
                Ok(change)
            }
            Err(source) => {
                if membership.generation == generation {
                    change.inverse().apply(&mut membership.members, record_id);
                    warn!("rolled back {change:?} for favorite {record_id}: {source}");
                } else {
                    warn!(
                        "{change:?} for favorite {record_id} failed after the membership \
                         was replaced; nothing to roll back: {source}"
                    );
                }
                Err(ToggleError::Sync {
                    record_id: record_id.clone(),
                    source,
                })
            }
        }
    }

    fn turn_for(&self, record_id: &RecordId) -> Arc<TurnLock<()>> {
        let mut turns = lock(&self.turns);
        Arc::clone(turns.entry(record_id.clone()).or_default())
    }

    fn finish_turn(&self, record_id: &RecordId, turn: &Arc<TurnLock<()>>) {
        let mut turns = lock(&self.turns);
        // Only the map and this caller hold the lock: nobody is queued.
        if Arc::strong_count(turn) == 2 {
            turns.remove(record_id);
        }
    }

    /// Follow identity changes from the session gate until it closes.
    ///
    /// Sign-out clears the membership set; sign-in loads the new user's
    /// favorites. A change that arrives while a load is running cancels that
    /// load in favour of the newer identity. Load failures are logged and
    /// leave the set empty.
    pub async fn follow(&self) {
        let mut changes = self.gate.subscribe();
        loop {
            let identity = changes.borrow_and_update().clone();
            let changed = match identity {
                None => {
                    self.clear();
                    changes.changed().await
                }
                Some(user) => {
                    tokio::select! {
                        biased;
                        changed = changes.changed() => changed,
                        loaded = self.load_for(user) => {
                            report_load(&loaded);
                            changes.changed().await
                        }
                    }
                }
            };
            if changed.is_err() {
                debug!("session gate closed; no longer following identity changes");
                return;
            }
        }
    }
}

fn report_load(loaded: &Result<LoadOutcome, FetchError>) {
    match loaded {
        Ok(LoadOutcome::Applied { count }) => debug!("favorites ready ({count})"),
        Ok(LoadOutcome::Superseded) => debug!("favorites load superseded"),
        Err(err) => warn!("{err}"),
    }
}

impl<F, G> FavoriteSync<F, G> {
    /// Whether `record_id` currently shows as favorited.
    pub fn is_favorited(&self, record_id: &RecordId) -> bool {
        lock(&self.membership).members.contains(record_id)
    }

    /// Current state of `record_id`, including pending writes.
    pub fn state_of(&self, record_id: &RecordId) -> FavoriteState {
        let membership = lock(&self.membership);
        match (
            membership.pending.get(record_id),
            membership.members.contains(record_id),
        ) {
            (Some(FavoriteChange::Added), _) => FavoriteState::OptimisticallyFavorited,
            (Some(FavoriteChange::Removed), _) => FavoriteState::OptimisticallyUnfavorited,
            (None, true) => FavoriteState::Favorited,
            (None, false) => FavoriteState::Unfavorited,
        }
    }

    /// Sorted snapshot of the membership set.
    pub fn favorites(&self) -> Vec<RecordId> {
        lock(&self.membership).members.iter().cloned().collect()
    }

    /// User whose favorites are held, if any.
    pub fn owner(&self) -> Option<UserId> {
        lock(&self.membership).owner.clone()
    }

    /// Drop the membership set, e.g. on sign-out.
    ///
    /// In-flight loads and toggles started before the clear will not write
    /// their results back.
    pub fn clear(&self) {
        let mut membership = lock(&self.membership);
        membership.advance();
        membership.owner = None;
        membership.members.clear();
        membership.pending.clear();
        debug!("cleared favorites");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FavoriteCall, MemoryFavoriteSource};
    use crate::{SourceError, WatchSessionGate};
    use rstest::{fixture, rstest};
    use std::sync::Arc;

    struct Harness {
        source: MemoryFavoriteSource,
        gate: Arc<WatchSessionGate>,
        sync: FavoriteSync<MemoryFavoriteSource, Arc<WatchSessionGate>>,
    }

    fn user() -> UserId {
        UserId::new("u-1")
    }

    fn rumtek() -> RecordId {
        RecordId::new("rumtek")
    }

    fn harness_with(source: MemoryFavoriteSource, gate: WatchSessionGate) -> Harness {
        let gate = Arc::new(gate);
        let sync = FavoriteSync::new(source.clone(), Arc::clone(&gate));
        Harness { source, gate, sync }
    }

    #[fixture]
    fn signed_in() -> Harness {
        harness_with(
            MemoryFavoriteSource::default(),
            WatchSessionGate::signed_in(user()),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn toggle_without_identity_is_refused_locally() {
        let h = harness_with(MemoryFavoriteSource::default(), WatchSessionGate::anonymous());
        let before = h.sync.is_favorited(&rumtek());

        let err = h.sync.toggle(&rumtek()).await.expect_err("anonymous toggle");

        assert_eq!(err, ToggleError::AuthRequired);
        assert_eq!(h.sync.is_favorited(&rumtek()), before);
        assert!(h.source.calls().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn successful_toggle_flips_and_persists(signed_in: Harness) {
        let h = signed_in;
        assert_eq!(h.sync.toggle(&rumtek()).await, Ok(FavoriteChange::Added));
        assert_eq!(h.sync.state_of(&rumtek()), FavoriteState::Favorited);
        assert!(h.source.stored(&user()).contains(&rumtek()));

        assert_eq!(h.sync.toggle(&rumtek()).await, Ok(FavoriteChange::Removed));
        assert_eq!(h.sync.state_of(&rumtek()), FavoriteState::Unfavorited);
        assert!(h.source.stored(&user()).is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn failed_insert_rolls_back(signed_in: Harness) {
        let h = signed_in;
        h.source.fail_next_write(SourceError::rejected("boom"));

        let err = h.sync.toggle(&rumtek()).await.expect_err("insert fails");

        assert!(matches!(err, ToggleError::Sync { ref record_id, .. } if *record_id == rumtek()));
        assert!(!h.sync.is_favorited(&rumtek()));
        assert_eq!(h.sync.state_of(&rumtek()), FavoriteState::Unfavorited);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_delete_restores_favorite() {
        let h = harness_with(
            MemoryFavoriteSource::with_favorites(&user(), ["rumtek"]),
            WatchSessionGate::signed_in(user()),
        );
        h.sync.load_for(user()).await.expect("load favorites");
        h.source.fail_next_write(SourceError::rejected("boom"));

        assert!(h.sync.toggle(&rumtek()).await.is_err());
        assert_eq!(h.sync.state_of(&rumtek()), FavoriteState::Favorited);
    }

    #[rstest]
    #[tokio::test]
    async fn optimistic_state_is_visible_while_write_is_pending(signed_in: Harness) {
        let h = signed_in;
        let gate = h.source.hold_writes();
        let id = rumtek();

        let toggle = h.sync.toggle(&id);
        let observe = async {
            tokio::task::yield_now().await;
            let during = h.sync.state_of(&id);
            gate.release();
            during
        };
        let (outcome, during) = tokio::join!(toggle, observe);

        assert_eq!(during, FavoriteState::OptimisticallyFavorited);
        assert_eq!(outcome, Ok(FavoriteChange::Added));
        assert_eq!(h.sync.state_of(&id), FavoriteState::Favorited);
    }

    #[rstest]
    #[tokio::test]
    async fn toggles_on_one_record_serialise(signed_in: Harness) {
        let h = signed_in;
        let gate = h.source.hold_writes();
        let id = rumtek();

        let first = h.sync.toggle(&id);
        let second = h.sync.toggle(&id);
        let drive = async {
            tokio::task::yield_now().await;
            // Only the first write has been issued; the second waits its turn.
            let issued = h.source.write_count();
            gate.release();
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
            gate.release();
            issued
        };
        let (first, second, issued_while_first_pending) = tokio::join!(first, second, drive);

        assert_eq!(issued_while_first_pending, 1);
        assert_eq!(first, Ok(FavoriteChange::Added));
        assert_eq!(second, Ok(FavoriteChange::Removed));
        assert_eq!(
            h.source.calls(),
            vec![
                FavoriteCall::Insert(user(), id.clone()),
                FavoriteCall::Delete(user(), id.clone()),
            ]
        );
        assert!(!h.sync.is_favorited(&id));
    }

    #[rstest]
    #[tokio::test]
    async fn toggles_on_different_records_overlap(signed_in: Harness) {
        let h = signed_in;
        let gate = h.source.hold_writes();
        let (a, b) = (RecordId::new("a"), RecordId::new("b"));

        let drive = async {
            tokio::task::yield_now().await;
            let issued = h.source.write_count();
            gate.release();
            gate.release();
            issued
        };
        let (first, second, issued) = tokio::join!(h.sync.toggle(&a), h.sync.toggle(&b), drive);

        assert_eq!(issued, 2);
        assert!(first.is_ok() && second.is_ok());
        assert_eq!(h.sync.favorites(), vec![a, b]);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_load_leaves_membership_empty() {
        let h = harness_with(
            MemoryFavoriteSource::with_favorites(&user(), ["rumtek"]),
            WatchSessionGate::signed_in(user()),
        );
        h.source.fail_lists(SourceError::rejected("offline"));

        let err = h.sync.load_for(user()).await.expect_err("list fails");

        assert!(matches!(err, FetchError::Favorites { .. }));
        assert!(h.sync.favorites().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn newer_load_wins_over_slow_earlier_one() {
        let (alice, bob) = (UserId::new("alice"), UserId::new("bob"));
        let source = MemoryFavoriteSource::with_favorites(&alice, ["a"]);
        source.add_favorites(&bob, ["b"]);
        let h = harness_with(source, WatchSessionGate::signed_in(bob.clone()));
        let slow = h.source.hold_lists_for(&alice);

        let earlier = h.sync.load_for(alice.clone());
        let later = async {
            tokio::task::yield_now().await;
            let outcome = h.sync.load_for(bob.clone()).await;
            slow.release();
            outcome
        };
        let (earlier, later) = tokio::join!(earlier, later);

        assert_eq!(earlier, Ok(LoadOutcome::Superseded));
        assert_eq!(later, Ok(LoadOutcome::Applied { count: 1 }));
        assert_eq!(h.sync.owner(), Some(bob));
        assert_eq!(h.sync.favorites(), vec![RecordId::new("b")]);
    }

    #[rstest]
    #[tokio::test]
    async fn load_landing_during_pending_write_keeps_the_toggle(signed_in: Harness) {
        let h = signed_in;
        let list = h.source.hold_lists_for(&user());
        let write = h.source.hold_writes();
        let id = rumtek();

        let drive = async {
            tokio::task::yield_now().await;
            list.release();
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
            let during = (h.sync.state_of(&id), h.sync.is_favorited(&id));
            write.release();
            during
        };
        let (loaded, toggled, during) =
            tokio::join!(h.sync.load_for(user()), h.sync.toggle(&id), drive);

        assert_eq!(loaded, Ok(LoadOutcome::Applied { count: 1 }));
        assert_eq!(toggled, Ok(FavoriteChange::Added));
        assert_eq!(during, (FavoriteState::OptimisticallyFavorited, true));
        assert!(h.sync.is_favorited(&id));
        assert_eq!(h.sync.state_of(&id), FavoriteState::Favorited);
        assert!(h.source.stored(&user()).contains(&id));
    }

    #[rstest]
    #[tokio::test]
    async fn clear_during_pending_write_skips_rollback(signed_in: Harness) {
        let h = signed_in;
        let gate = h.source.hold_writes();
        h.source.fail_next_write(SourceError::rejected("boom"));
        let id = rumtek();

        let drive = async {
            tokio::task::yield_now().await;
            h.sync.clear();
            gate.release();
        };
        let (outcome, ()) = tokio::join!(h.sync.toggle(&id), drive);

        assert!(matches!(outcome, Err(ToggleError::Sync { .. })));
        assert!(h.sync.favorites().is_empty());
        assert_eq!(h.sync.state_of(&id), FavoriteState::Unfavorited);
    }

    #[rstest]
    #[tokio::test]
    async fn follow_tracks_sign_in_and_sign_out() {
        let alice = UserId::new("alice");
        let h = harness_with(
            MemoryFavoriteSource::with_favorites(&alice, ["a", "b"]),
            WatchSessionGate::anonymous(),
        );

        let script = async {
            h.gate.sign_in(alice.clone());
            for _ in 0..4 {
                tokio::task::yield_now().await;
            }
            let signed_in = h.sync.favorites();
            h.gate.sign_out();
            for _ in 0..4 {
                tokio::task::yield_now().await;
            }
            (signed_in, h.sync.favorites(), h.sync.owner())
        };

        let (signed_in, signed_out, owner) = tokio::select! {
            () = h.sync.follow() => panic!("gate outlives the script"),
            observed = script => observed,
        };

        assert_eq!(signed_in, vec![RecordId::new("a"), RecordId::new("b")]);
        assert!(signed_out.is_empty());
        assert!(owner.is_none());
    }
}
