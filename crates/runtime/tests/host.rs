use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use battle_content::{EncounterBuilder, builtin_catalog};
use battle_core::{
    Action, ActionError, BattleEvent, ClassTag, Combatant, CombatantId, CombatantStats,
    CombatRules, HeroClass, MonsterKind, Outcome, PcgRng, ProviderError, ProviderKind, Roster,
    Side,
};
use battle_runtime::{
    ActionProvider, BattleHost, BattleSetup, ChannelActionProvider, DecisionRequest, HostConfig,
    ProviderSlot,
};

fn hero(name: &str, hp: u32, attack: u32, defense: u32) -> Combatant {
    Combatant::new(
        ClassTag::Hero(HeroClass::Warrior),
        CombatantStats::new(name, hp, 0, attack, defense, 20),
    )
}

fn monster(name: &str, hp: u32, attack: u32, defense: u32) -> Combatant {
    Combatant::new(
        ClassTag::Monster(MonsterKind::Golem),
        CombatantStats::new(name, hp, 0, attack, defense, 10),
    )
}

fn duel(hero: Combatant, monster: Combatant) -> BattleSetup {
    BattleSetup::new(
        Roster::from_combatants(Side::Heroes, [hero]).unwrap(),
        Roster::from_combatants(Side::Monsters, [monster]).unwrap(),
    )
    .rules(CombatRules::deterministic())
    .seed(3)
}

fn host(timeout: Duration) -> BattleHost {
    BattleHost::new(HostConfig {
        decision_timeout: timeout,
        ..HostConfig::default()
    })
}

fn fallbacks(log: &[BattleEvent]) -> Vec<&str> {
    log.iter()
        .filter_map(|e| match e {
            BattleEvent::FallbackAction { reason, .. } => Some(reason.as_str()),
            _ => None,
        })
        .collect()
}

/// Never answers.
struct Silent;

#[async_trait]
impl ActionProvider for Silent {
    async fn provide_action(&self, _request: DecisionRequest) -> Result<Action, ProviderError> {
        std::future::pending().await
    }
}

/// Replays queued actions and records every request it sees.
struct Scripted {
    kind: ProviderKind,
    actions: Mutex<VecDeque<Action>>,
    seen: Mutex<Vec<(u32, Option<ActionError>)>>,
}

impl Scripted {
    fn new(kind: ProviderKind, actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            kind,
            actions: Mutex::new(actions.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ActionProvider for &'static Scripted {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn provide_action(&self, request: DecisionRequest) -> Result<Action, ProviderError> {
        self.seen
            .lock()
            .unwrap()
            .push((request.attempt, request.rejection.clone()));
        self.actions
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(ProviderError::Closed)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_battles_each_reach_an_outcome() {
    let catalog = builtin_catalog();
    let host = BattleHost::default();

    let mut handles = Vec::new();
    for seed in 1..=6u64 {
        let mut rng = PcgRng::seeded(seed);
        let encounter = EncounterBuilder::new(&catalog);
        let heroes = encounter.party(3, &mut rng).unwrap();
        let monsters = encounter.monsters(3, &mut rng).unwrap();
        handles.push(host.spawn(BattleSetup::new(heroes, monsters).seed(seed)).unwrap());
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.id());
        let summary = handle.join().await.unwrap();

        assert!(summary.outcome.is_terminal(), "{} did not finish", summary.id);
        assert_eq!(summary.snapshot.outcome, summary.outcome);
        assert_eq!(summary.log.iter().filter(|e| e.is_terminal()).count(), 1);
        assert!(summary.log.last().unwrap().is_terminal());
    }

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 6);
}

#[tokio::test]
async fn same_seed_replays_across_hosts() {
    let catalog = builtin_catalog();
    let setup = || {
        let mut rng = PcgRng::seeded(21);
        let encounter = EncounterBuilder::new(&catalog);
        let heroes = encounter.party(2, &mut rng).unwrap();
        let monsters = encounter.monsters(2, &mut rng).unwrap();
        BattleSetup::new(heroes, monsters).seed(21)
    };

    let first = BattleHost::default().spawn(setup()).unwrap().join().await.unwrap();
    let second = BattleHost::default().spawn(setup()).unwrap().join().await.unwrap();

    assert_eq!(first.log, second.log);
    assert_eq!(first.snapshot, second.snapshot);
}

#[tokio::test]
async fn host_bus_tags_events_with_their_battle() {
    let host = BattleHost::default();
    let mut events = host.subscribe();

    let handle = host
        .spawn(duel(hero("Bran", 100, 30, 10), monster("Pebble", 20, 5, 10)))
        .unwrap();
    let id = handle.id();
    handle.join().await.unwrap();

    let first = events.recv().await.unwrap();
    assert_eq!(first.battle, id);
    assert!(matches!(first.event, BattleEvent::RoundStarted { round: 1, .. }));

    loop {
        let envelope = events.recv().await.unwrap();
        assert_eq!(envelope.battle, id);
        if envelope.is_terminal() {
            break;
        }
    }
}

#[tokio::test]
async fn silent_provider_times_out_to_default_attack() {
    let host = host(Duration::from_millis(20));
    let setup = duel(hero("Bran", 100, 30, 10), monster("Pebble", 20, 5, 10))
        .hero_provider(ProviderSlot::remote(Silent));

    let summary = host.spawn(setup).unwrap().join().await.unwrap();

    assert_eq!(summary.outcome, Outcome::HeroesWon);
    assert_eq!(summary.rounds, 1);
    assert_eq!(fallbacks(&summary.log), vec!["decision timed out"]);
    assert!(summary.log.iter().any(|e| matches!(
        e,
        BattleEvent::Attacked { damage: 20, .. }
    )));
}

#[tokio::test]
async fn rejected_player_choices_are_asked_again() {
    let provider: &'static Scripted = Box::leak(Box::new(Scripted::new(
        ProviderKind::Player,
        [
            Action::Attack(CombatantId::hero(0)),
            Action::Attack(CombatantId::monster(0)),
        ],
    )));
    let setup = duel(hero("Bran", 100, 30, 10), monster("Pebble", 20, 5, 10))
        .hero_provider(ProviderSlot::remote(provider));

    let summary = BattleHost::default().spawn(setup).unwrap().join().await.unwrap();

    assert_eq!(summary.outcome, Outcome::HeroesWon);
    assert!(fallbacks(&summary.log).is_empty());

    let seen = provider.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], (1, None));
    assert_eq!(seen[1].0, 2);
    assert!(seen[1].1.is_some());
}

#[tokio::test]
async fn npc_provider_is_not_asked_twice() {
    let provider: &'static Scripted = Box::leak(Box::new(Scripted::new(
        ProviderKind::Npc,
        [Action::ability("Meteor", CombatantId::hero(0))],
    )));
    let setup = duel(hero("Bran", 50, 5, 10), monster("Grok", 100, 30, 10))
        .monster_provider(ProviderSlot::remote(provider));

    let summary = BattleHost::default().spawn(setup).unwrap().join().await.unwrap();

    // One scripted request, then the queue is empty and every later turn
    // reports a closed provider.
    let seen = provider.seen.lock().unwrap();
    assert_eq!(seen[0], (1, None));
    assert!(seen.iter().all(|(attempt, _)| *attempt == 1));
    assert_eq!(summary.outcome, Outcome::MonstersWon);
    assert_eq!(fallbacks(&summary.log).len(), seen.len());
}

#[tokio::test]
async fn channel_provider_answers_prompts() {
    let (provider, mut prompts) = ChannelActionProvider::new(4);
    let setup = duel(hero("Bran", 100, 30, 10), monster("Pebble", 60, 5, 10))
        .hero_provider(ProviderSlot::remote(provider));
    let handle = BattleHost::default().spawn(setup).unwrap();

    let console = tokio::spawn(async move {
        let mut asked = 0;
        while let Some(prompt) = prompts.recv().await {
            asked += 1;
            assert_eq!(prompt.request.actor.side, Side::Heroes);
            let target = prompt
                .request
                .snapshot
                .view()
                .focus_target(Side::Heroes)
                .map(|c| c.id())
                .unwrap();
            prompt.respond(Action::Attack(target)).unwrap();
        }
        asked
    });

    let summary = handle.join().await.unwrap();
    assert_eq!(summary.outcome, Outcome::HeroesWon);
    assert_eq!(summary.rounds, 3);
    assert!(fallbacks(&summary.log).is_empty());

    assert_eq!(console.await.unwrap(), 3);
}

#[tokio::test]
async fn stopped_battle_reports_its_progress() {
    let (provider, mut prompts) = ChannelActionProvider::new(1);
    let setup = duel(hero("Bran", 10_000, 30, 1_000), monster("Wall", 10_000, 30, 1_000))
        .hero_provider(ProviderSlot::remote(provider));
    let handle = BattleHost::default().spawn(setup).unwrap();

    let prompt = prompts.recv().await.unwrap();
    prompt.respond(Action::Defend).unwrap();
    // Later prompts fail as closed and fall back to the default attack.
    drop(prompts);

    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.round >= 1);
    assert!(!snapshot.outcome.is_terminal());

    handle.stop().await.unwrap();
    let summary = handle.join().await.unwrap();

    assert_eq!(summary.outcome, Outcome::InProgress);
    assert!(summary.rounds >= snapshot.round);
    assert!(summary.log.iter().any(|e| matches!(e, BattleEvent::Defending { .. })));
    assert!(!summary.log.iter().any(BattleEvent::is_terminal));
}

#[tokio::test]
async fn invalid_rosters_are_rejected_before_spawning() {
    let heroes = Roster::from_combatants(Side::Heroes, [hero("Bran", 100, 30, 10)]).unwrap();
    let setup = BattleSetup::new(heroes.clone(), heroes);

    let err = BattleHost::default().spawn(setup).unwrap_err();
    assert!(matches!(err, battle_runtime::RuntimeError::Setup(_)));
}
