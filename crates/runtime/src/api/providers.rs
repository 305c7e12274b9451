//! Asynchronous abstraction for sourcing decisions from outside the worker.
//!
//! Local policies (AI, scripted fixtures) run synchronously inside the battle
//! worker through [`battle_core::DecisionProvider`]. Anything that has to wait
//! on the outside world (a console prompt, a network peer) implements
//! [`ActionProvider`] instead and is awaited under the host's decision
//! timeout.
use async_trait::async_trait;
use battle_core::{
    Action, ActionError, AiPolicy, BattleSnapshot, CombatantId, DecisionProvider, ProviderError,
    ProviderKind,
};
use tokio::sync::{mpsc, oneshot};

use super::BattleId;

/// What a remote provider gets to decide on.
#[derive(Clone, Debug)]
pub struct DecisionRequest {
    pub battle: BattleId,
    pub actor: CombatantId,
    /// Owned copy of the battle as it stands before this decision.
    pub snapshot: BattleSnapshot,
    /// 1-based attempt number within the turn.
    pub attempt: u32,
    /// Why the previous choice this turn was rejected.
    pub rejection: Option<ActionError>,
}

/// Trait for providing actions from outside the battle worker.
///
/// Different implementations can handle:
/// - Player input (from a console or UI)
/// - Remote peers
/// - Testing fixtures
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Rejected player choices are asked again; NPC choices fall back at once.
    fn kind(&self) -> ProviderKind {
        ProviderKind::Player
    }

    /// Provide an action for `request.actor`.
    ///
    /// The worker bounds this call with the host's decision timeout and
    /// executes the default action when it expires.
    async fn provide_action(&self, request: DecisionRequest) -> Result<Action, ProviderError>;
}

/// Where a side's decisions come from.
pub enum ProviderSlot {
    /// Runs inside the worker with the battle's random source.
    Local(Box<dyn DecisionProvider + Send>),
    /// Awaited under the decision timeout.
    Remote(std::sync::Arc<dyn ActionProvider>),
}

impl ProviderSlot {
    pub fn local(provider: impl DecisionProvider + Send + 'static) -> Self {
        Self::Local(Box::new(provider))
    }

    pub fn remote(provider: impl ActionProvider + 'static) -> Self {
        Self::Remote(std::sync::Arc::new(provider))
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Local(provider) => provider.kind(),
            Self::Remote(provider) => provider.kind(),
        }
    }
}

impl Default for ProviderSlot {
    fn default() -> Self {
        Self::local(AiPolicy::standard())
    }
}

impl std::fmt::Debug for ProviderSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(provider) => write!(f, "Local({})", provider.kind()),
            Self::Remote(provider) => write!(f, "Remote({})", provider.kind()),
        }
    }
}

/// A pending decision handed to whoever owns the prompt receiver.
#[derive(Debug)]
pub struct DecisionPrompt {
    pub request: DecisionRequest,
    reply: oneshot::Sender<Action>,
}

impl DecisionPrompt {
    /// Answers the prompt. Returns the action back if the battle stopped waiting.
    pub fn respond(self, action: Action) -> Result<(), Action> {
        self.reply.send(action)
    }
}

/// Action provider that forwards every request over a channel.
///
/// The receiving end (for example a console loop) answers each
/// [`DecisionPrompt`]. Dropping the receiver or a prompt reports
/// [`ProviderError::Closed`], which the worker turns into the default action.
#[derive(Clone, Debug)]
pub struct ChannelActionProvider {
    prompts: mpsc::Sender<DecisionPrompt>,
}

impl ChannelActionProvider {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<DecisionPrompt>) {
        let (prompts, rx) = mpsc::channel(capacity.max(1));
        (Self { prompts }, rx)
    }
}

#[async_trait]
impl ActionProvider for ChannelActionProvider {
    async fn provide_action(&self, request: DecisionRequest) -> Result<Action, ProviderError> {
        let (reply, answer) = oneshot::channel();
        self.prompts
            .send(DecisionPrompt { request, reply })
            .await
            .map_err(|_| ProviderError::Closed)?;

        answer.await.map_err(|_| ProviderError::Closed)
    }
}
