//! Battle host: spawns battles and owns the host-wide event bus.
//!
//! Every battle gets its own worker task and command channel; battles share
//! nothing but the host bus, so any number of them can run side by side.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use battle_core::{Battle, CombatRules, PcgRng, Roster};
use tokio::sync::{broadcast, mpsc};
use tracing::info;

use crate::api::{BattleHandle, BattleId, ProviderSlot, Result};
use crate::events::{BattleEnvelope, EventBus};
use crate::workers::{BattleWorker, Command};

/// Host configuration shared by every battle it spawns.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// How long a remote provider may take for one decision.
    pub decision_timeout: Duration,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            decision_timeout: Duration::from_secs(30),
            event_buffer_size: EventBus::DEFAULT_CAPACITY,
            command_buffer_size: 16,
        }
    }
}

/// Everything needed to start one battle.
///
/// Both sides default to the standard AI policy.
#[derive(Debug)]
pub struct BattleSetup {
    heroes: Roster,
    monsters: Roster,
    rules: CombatRules,
    seed: u64,
    hero_provider: ProviderSlot,
    monster_provider: ProviderSlot,
}

impl BattleSetup {
    pub fn new(heroes: Roster, monsters: Roster) -> Self {
        Self {
            heroes,
            monsters,
            rules: CombatRules::default(),
            seed: 0,
            hero_provider: ProviderSlot::default(),
            monster_provider: ProviderSlot::default(),
        }
    }

    pub fn rules(mut self, rules: CombatRules) -> Self {
        self.rules = rules;
        self
    }

    /// Seed for the battle's random source; the same seed and the same
    /// decisions replay the same battle.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn hero_provider(mut self, provider: ProviderSlot) -> Self {
        self.hero_provider = provider;
        self
    }

    pub fn monster_provider(mut self, provider: ProviderSlot) -> Self {
        self.monster_provider = provider;
        self
    }

    /// Hero and monster rosters as they will enter the battle.
    pub fn rosters(&self) -> (&Roster, &Roster) {
        (&self.heroes, &self.monsters)
    }
}

/// Spawns and tracks battles.
#[derive(Debug)]
pub struct BattleHost {
    config: HostConfig,
    next_id: AtomicU64,
    events: EventBus,
}

impl BattleHost {
    pub fn new(config: HostConfig) -> Self {
        let events = EventBus::with_capacity(config.event_buffer_size);
        Self {
            config,
            next_id: AtomicU64::new(1),
            events,
        }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Subscribe to events from every battle this host spawns from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<BattleEnvelope> {
        self.events.subscribe()
    }

    /// Validates the setup and starts the battle on its own task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&self, setup: BattleSetup) -> Result<BattleHandle> {
        let battle = Battle::new(
            setup.heroes,
            setup.monsters,
            setup.rules,
            PcgRng::seeded(setup.seed),
        )?;

        let id = BattleId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let local = EventBus::with_capacity(self.config.event_buffer_size);

        let worker = BattleWorker::new(
            id,
            battle,
            (setup.hero_provider, setup.monster_provider),
            self.config.decision_timeout,
            command_rx,
            (local.clone(), self.events.clone()),
        );

        info!(battle = %id, seed = setup.seed, "spawning battle");
        let task = tokio::spawn(worker.run());

        Ok(BattleHandle::new(id, command_tx, local, task))
    }
}

impl Default for BattleHost {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}
