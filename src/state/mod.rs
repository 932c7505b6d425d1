pub mod view_model;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::watch;

pub use self::view_model::{QuestionView, ScoresView, SessionViewModel, TimersView, normalize};

/// Shared handle to the display store.
pub type SharedStore = Arc<DisplayStore>;

/// Everything a render pass needs: the last good view model plus transient UI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    /// Last successfully fetched view model, or the defaults before the first success.
    pub view: Arc<SessionViewModel>,
    /// True until the first poll resolves, success or failure.
    pub loading: bool,
    /// Latest human-readable failure, cleared by the next success.
    pub error: Option<String>,
    /// True while the celebration window is open.
    pub celebrating: bool,
}

impl DisplayState {
    /// Controls are usable once the first load attempt settled.
    pub fn controls_enabled(&self) -> bool {
        !self.loading
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            view: Arc::new(SessionViewModel::default()),
            loading: true,
            error: None,
            celebrating: false,
        }
    }
}

/// Single-slot store publishing [`DisplayState`] to renderers.
///
/// Every write is applied in one `send_modify`, so subscribers never observe a
/// half-updated state. `loading` only ever moves from `true` to `false`.
pub struct DisplayStore {
    state: watch::Sender<DisplayState>,
}

impl DisplayStore {
    /// Construct a store holding the startup defaults, wrapped in an [`Arc`].
    pub fn new() -> SharedStore {
        let (state, _rx) = watch::channel(DisplayState::default());
        Arc::new(Self { state })
    }

    /// Subscribe to state updates.
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.state.subscribe()
    }

    /// Clone the current state.
    pub fn snapshot(&self) -> DisplayState {
        self.state.borrow().clone()
    }

    /// Whether the controls should accept input.
    pub fn controls_enabled(&self) -> bool {
        self.state.borrow().controls_enabled()
    }

    /// Replace the view model after a successful poll.
    pub fn publish_snapshot(&self, view: SessionViewModel) {
        let view = Arc::new(view);
        self.state.send_modify(|state| {
            state.view = view;
            state.error = None;
            state.loading = false;
        });
    }

    /// Record a failed poll; the current view model stays on display.
    pub fn record_poll_failure(&self, message: String) {
        self.state.send_modify(|state| {
            state.error = Some(message);
            state.loading = false;
        });
    }

    /// [`DisplayStore::publish_snapshot`] applied only while `live` is set.
    ///
    /// The flag is read under the store's write lock, so a writer that clears it
    /// and then calls [`DisplayStore::settle_writes`] never sees this write land later.
    pub fn publish_snapshot_if_live(&self, view: SessionViewModel, live: &AtomicBool) -> bool {
        let view = Arc::new(view);
        self.state.send_if_modified(|state| {
            if !live.load(Ordering::Acquire) {
                return false;
            }
            state.view = view;
            state.error = None;
            state.loading = false;
            true
        })
    }

    /// [`DisplayStore::record_poll_failure`] applied only while `live` is set.
    pub fn record_poll_failure_if_live(&self, message: String, live: &AtomicBool) -> bool {
        self.state.send_if_modified(|state| {
            if !live.load(Ordering::Acquire) {
                return false;
            }
            state.error = Some(message);
            state.loading = false;
            true
        })
    }

    /// Block until any write holding the store lock has finished.
    pub fn settle_writes(&self) {
        self.state.send_if_modified(|_| false);
    }

    /// Record a failed command; neither the view model nor `loading` change.
    pub fn record_error(&self, message: String) {
        self.state.send_modify(|state| state.error = Some(message));
    }

    /// Clear the error slot after a successful command.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| state.error.take().is_some());
    }

    /// Open or close the celebration window.
    pub fn set_celebrating(&self, celebrating: bool) {
        self.state.send_if_modified(|state| {
            let changed = state.celebrating != celebrating;
            state.celebrating = celebrating;
            changed
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_with_score(team_a: i64) -> SessionViewModel {
        SessionViewModel {
            scores: ScoresView { team_a, team_b: 0 },
            ..SessionViewModel::default()
        }
    }

    #[test]
    fn starts_loading_with_defaults() {
        let store = DisplayStore::new();
        let state = store.snapshot();
        assert!(state.loading);
        assert!(!store.controls_enabled());
        assert_eq!(*state.view, SessionViewModel::default());
        assert_eq!(state.error, None);
    }

    #[test]
    fn failed_poll_keeps_last_view_and_settles_loading() {
        let store = DisplayStore::new();
        store.publish_snapshot(view_with_score(3));
        store.record_poll_failure("HTTP 502 Bad Gateway: ".into());
        store.record_poll_failure("HTTP 503 Service Unavailable: ".into());

        let state = store.snapshot();
        assert_eq!(state.view.scores.team_a, 3);
        assert_eq!(state.error.as_deref(), Some("HTTP 503 Service Unavailable: "));
        assert!(!state.loading);
    }

    #[test]
    fn first_failure_also_enables_controls() {
        let store = DisplayStore::new();
        store.record_poll_failure("connection refused".into());
        assert!(store.controls_enabled());
        assert_eq!(*store.snapshot().view, SessionViewModel::default());
    }

    #[test]
    fn success_clears_error_and_loading_never_returns() {
        let store = DisplayStore::new();
        store.record_poll_failure("down".into());
        store.publish_snapshot(view_with_score(1));
        let state = store.snapshot();
        assert_eq!(state.error, None);
        assert!(!state.loading);

        store.record_error("Failed to undo last action: down".into());
        assert!(!store.snapshot().loading);
        store.clear_error();
        assert_eq!(store.snapshot().error, None);
    }

    #[test]
    fn publishing_replaces_the_view_instead_of_mutating_it() {
        let store = DisplayStore::new();
        store.publish_snapshot(view_with_score(1));
        let before = store.snapshot().view;
        store.publish_snapshot(view_with_score(2));
        assert_eq!(before.scores.team_a, 1);
        assert_eq!(store.snapshot().view.scores.team_a, 2);
    }

    #[test]
    fn guarded_writes_are_dropped_once_the_flag_clears() {
        let store = DisplayStore::new();
        let live = AtomicBool::new(true);
        assert!(store.publish_snapshot_if_live(view_with_score(1), &live));
        assert_eq!(store.snapshot().view.scores.team_a, 1);

        live.store(false, Ordering::Release);
        let mut rx = store.subscribe();
        rx.mark_unchanged();
        assert!(!store.publish_snapshot_if_live(view_with_score(2), &live));
        assert!(!store.record_poll_failure_if_live("late".into(), &live));
        store.settle_writes();

        assert!(!rx.has_changed().unwrap());
        let state = store.snapshot();
        assert_eq!(state.view.scores.team_a, 1);
        assert_eq!(state.error, None);
    }

    #[test]
    fn unchanged_writes_do_not_notify() {
        let store = DisplayStore::new();
        let mut rx = store.subscribe();
        rx.mark_unchanged();
        store.clear_error();
        store.set_celebrating(false);
        assert!(!rx.has_changed().unwrap());
        store.set_celebrating(true);
        assert!(rx.has_changed().unwrap());
    }
}
