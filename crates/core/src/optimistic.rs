//! Optimistic mutation with a held-back compensating patch.
//!
//! A store applies its local patch immediately, keeps the compensating
//! closure in an [`OptimisticTxn`], awaits the remote commit, and then either
//! commits (the patch stands) or reverts (the compensation runs). Every
//! optimistic mutation goes through this one shape so rollback semantics are
//! uniform across stores.

/// One in-flight optimistic mutation over state `S`.
#[must_use = "an optimistic transaction must be committed or reverted"]
pub struct OptimisticTxn<S> {
    undo: Option<Box<dyn FnOnce(&mut S) + Send>>,
}

impl<S> OptimisticTxn<S> {
    /// Apply `patch` to `state` immediately and retain `undo` as the
    /// compensating action.
    pub fn apply(
        state: &mut S,
        patch: impl FnOnce(&mut S),
        undo: impl FnOnce(&mut S) + Send + 'static,
    ) -> Self {
        patch(state);
        Self {
            undo: Some(Box::new(undo)),
        }
    }

    /// The remote commit succeeded; the local patch stands.
    pub fn commit(mut self) {
        self.undo = None;
    }

    /// The remote commit failed; restore the pre-patch state.
    pub fn revert(mut self, state: &mut S) {
        if let Some(undo) = self.undo.take() {
            undo(state);
        }
    }
}
