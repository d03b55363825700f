use smallvec::SmallVec;

/// Cancel-on-drop handle for a stream subscription (scroll offsets and the like).
#[must_use = "dropping a Subscription cancels it"]
pub struct Subscription {
    cancel: SmallVec<[Box<dyn FnOnce()>; 1]>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        let mut actions: SmallVec<[Box<dyn FnOnce()>; 1]> = SmallVec::new();
        actions.push(Box::new(cancel));
        Self { cancel: actions }
    }

    /// A subscription with nothing to cancel.
    pub fn empty() -> Self {
        Self {
            cancel: SmallVec::new(),
        }
    }

    /// Folds `other` into this subscription so both cancel together.
    pub fn join(mut self, mut other: Subscription) -> Self {
        self.cancel.extend(other.cancel.drain(..));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.cancel.is_empty()
    }

    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        for action in self.cancel.drain(..) {
            action();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("actions", &self.cancel.len())
            .finish()
    }
}
