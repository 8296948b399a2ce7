use tracing::{debug, warn};

use crate::app::{Action, AppState, Effect};
use crate::storage::{KeyValueStore, Preferences};

/// Owns the state and the preference store. Every action goes through
/// [`dispatch`](Self::dispatch), which writes the preferences back whenever a
/// transition changed them.
pub struct Controller<S: KeyValueStore> {
    state: AppState,
    store: S,
}

impl<S: KeyValueStore> Controller<S> {
    /// Restores preferences from `store` and mounts the view. The returned
    /// effects include the verse of the day request.
    pub fn mount(store: S) -> (Self, Vec<Effect>) {
        let preferences = Preferences::load(&store);
        debug!(?preferences, "restored preferences");

        let mut controller = Self {
            state: AppState::new(preferences),
            store,
        };
        let effects = controller.dispatch(Action::Mount);
        (controller, effects)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        let before = self.state.preferences();

        let (state, effects) = std::mem::take(&mut self.state).update(action);
        self.state = state;

        let after = self.state.preferences();
        if after != before {
            if let Err(e) = after.save(&mut self.store) {
                warn!(error = %e, "could not save preferences");
            }
        }

        effects
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
