use std::collections::VecDeque;

use crate::action::Action;

use super::{DecisionContext, DecisionProvider, ProviderError, ProviderKind};

/// Player provider backed by a closure, e.g. a console prompt.
pub struct FnProvider<F> {
    decide: F,
}

impl<F> FnProvider<F>
where
    F: FnMut(&mut DecisionContext<'_>) -> Result<Action, ProviderError>,
{
    pub fn new(decide: F) -> Self {
        Self { decide }
    }
}

impl<F> DecisionProvider for FnProvider<F>
where
    F: FnMut(&mut DecisionContext<'_>) -> Result<Action, ProviderError>,
{
    fn kind(&self) -> ProviderKind {
        ProviderKind::Player
    }

    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Result<Action, ProviderError> {
        (self.decide)(ctx)
    }
}

/// Replays a fixed queue of player actions, then reports [`ProviderError::Closed`].
#[derive(Clone, Debug, Default)]
pub struct ScriptedProvider {
    queue: VecDeque<Action>,
}

impl ScriptedProvider {
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            queue: actions.into_iter().collect(),
        }
    }

    pub fn push(&mut self, action: Action) {
        self.queue.push_back(action);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl DecisionProvider for ScriptedProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Player
    }

    fn decide(&mut self, _ctx: &mut DecisionContext<'_>) -> Result<Action, ProviderError> {
        self.queue.pop_front().ok_or(ProviderError::Closed)
    }
}
