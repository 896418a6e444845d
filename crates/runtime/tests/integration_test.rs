//! End-to-end battle scenarios against a running runtime.
//!
//! Every test pins the damage roll with a fixed RNG (variance 1.05), so two
//! water creatures with attack 60 and defense 60 deal exactly 22 damage with
//! `quick_strike`.

use std::sync::Arc;
use std::time::Duration;

use arena_content::{ContentBundle, ContentFactory};
use arena_core::{
    AbandonReason, BattleError, BattleId, BattleRecord, BattleResult, BattleSnapshot, BattleStatus,
    Creature, CreatureId, Element, EvolutionError, EvolutionStage, LogEntry, MoveId, PlayerId,
    RngOracle, TraitScores,
};
use arena_runtime::{
    BattleEvent, BattleLogRepository, BattleSummary, CreatureRepository, Event, FixedMoveProvider,
    InMemoryBattleLogRepo, InMemoryCreatureRepo, MoveProvider, RepositoryError, Runtime,
    RuntimeConfig, RuntimeError, RuntimeHandle, Topic, TurnStep,
};
use arena_runtime::repository::Result as RepoResult;
use tokio::sync::broadcast;

/// Always rolls 7500, which maps to variance 1.05.
struct FixedRng;

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        7_500
    }
}

/// A battle log store that is always down.
struct UnavailableLog;

impl BattleLogRepository for UnavailableLog {
    fn append_entry(&self, _battle: BattleId, _entry: &LogEntry) -> RepoResult<()> {
        Err(RepositoryError::Unavailable("log store offline".into()))
    }

    fn save_summary(&self, _summary: &BattleSummary) -> RepoResult<()> {
        Err(RepositoryError::Unavailable("log store offline".into()))
    }

    fn entries(&self, _battle: BattleId) -> RepoResult<Vec<LogEntry>> {
        Err(RepositoryError::Unavailable("log store offline".into()))
    }

    fn summary(&self, _battle: BattleId) -> RepoResult<Option<BattleSummary>> {
        Err(RepositoryError::Unavailable("log store offline".into()))
    }
}

fn alice() -> PlayerId {
    PlayerId::from("alice")
}

fn bob() -> PlayerId {
    PlayerId::from("bob")
}

fn carol() -> PlayerId {
    PlayerId::from("carol")
}

fn content() -> ContentBundle {
    ContentFactory::embedded()
        .load_bundle()
        .expect("embedded content loads")
}

fn water_creature(content: &ContentBundle, id: u64, owner: &PlayerId) -> Creature {
    let template = content
        .templates
        .get(Element::Water)
        .expect("water template");
    Creature::from_template(CreatureId(id), format!("Tide-{id}"), owner.clone(), template)
}

fn roster(content: &ContentBundle) -> Arc<InMemoryCreatureRepo> {
    Arc::new(InMemoryCreatureRepo::with_creatures([
        water_creature(content, 1, &alice()),
        water_creature(content, 2, &bob()),
        water_creature(content, 3, &carol()),
    ]))
}

fn untimed() -> RuntimeConfig {
    RuntimeConfig {
        turn_timeout: None,
        ..RuntimeConfig::default()
    }
}

async fn start(config: RuntimeConfig) -> (Runtime, RuntimeHandle, Arc<InMemoryCreatureRepo>) {
    let content = content();
    let creatures = roster(&content);
    let runtime = Runtime::builder()
        .config(config)
        .content(content)
        .creatures(creatures.clone())
        .rng(Arc::new(FixedRng))
        .seed(42)
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();
    (runtime, handle, creatures)
}

async fn alice_vs_bob(handle: &RuntimeHandle) -> BattleId {
    handle
        .create_session((alice(), CreatureId(1)), (bob(), CreatureId(2)))
        .await
        .expect("session created")
}

/// Receives battle events until one matches, skipping the rest.
async fn next_matching<F>(rx: &mut broadcast::Receiver<Event>, mut pred: F) -> BattleEvent
where
    F: FnMut(&BattleEvent) -> bool,
{
    loop {
        match rx.recv().await.expect("event stream open") {
            Event::Battle(event) if pred(&event) => return event,
            _ => continue,
        }
    }
}

fn is_not_found(err: &RuntimeError) -> bool {
    matches!(err, RuntimeError::Battle(BattleError::BattleNotFound))
}

/// Polls until the player's battle leaves the index.
async fn wait_until_retired(handle: &RuntimeHandle, player: &PlayerId) -> bool {
    for _ in 0..50 {
        if handle.active_battle(player).await.is_none() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
async fn quick_strike_resolves_and_regenerates() {
    let (runtime, handle, _) = start(untimed()).await;
    let mut events = handle.subscribe(Topic::Battle);
    let battle = alice_vs_bob(&handle).await;

    let outcome = handle
        .submit_move(battle, &alice(), &MoveId::from("quick_strike"))
        .await
        .expect("alice acts first");

    // floor(50 * 0.6 * 1.05 * 0.7) = 22
    assert_eq!(outcome.entry.damage, 22);
    assert_eq!(outcome.entry.turn, 1);
    assert_eq!(outcome.next_player, Some(bob()));
    assert!(!outcome.is_terminal());
    assert_ne!(outcome.behavior_delta, TraitScores::default());

    let state = handle.public_state(battle).await.expect("live battle");
    assert_eq!(state.turn, 2);
    assert_eq!(state.current_player, bob());
    assert_eq!(state.status, BattleStatus::Active);
    let defender = state.combatant(&bob()).expect("bob seated");
    assert_eq!(defender.current_hp, 98);
    // 100 - 10, then +10 regen after the turn switch.
    let attacker = state.combatant(&alice()).expect("alice seated");
    assert_eq!(attacker.current_energy, 100);
    assert_eq!(state.recent_log.len(), 1);

    let started = next_matching(&mut events, |e| matches!(e, BattleEvent::Started { .. })).await;
    assert_eq!(started.battle_id(), battle);
    let resolved =
        next_matching(&mut events, |e| matches!(e, BattleEvent::MoveResolved { .. })).await;
    let BattleEvent::MoveResolved { entry, snapshot, .. } = resolved else {
        unreachable!("filtered above");
    };
    assert_eq!(entry.damage, 22);
    assert_eq!(snapshot.turn, 2);

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn rejected_moves_leave_state_untouched() {
    let (runtime, handle, _) = start(untimed()).await;
    let battle = alice_vs_bob(&handle).await;

    let err = handle
        .submit_move(battle, &bob(), &MoveId::from("quick_strike"))
        .await
        .expect_err("bob does not hold the turn");
    assert!(matches!(err, RuntimeError::Battle(BattleError::NotYourTurn)));

    let err = handle
        .submit_move(battle, &alice(), &MoveId::from("fireball"))
        .await
        .expect_err("not in the catalog");
    assert!(matches!(err, RuntimeError::Battle(BattleError::UnknownMove(_))));

    handle
        .submit_move(battle, &alice(), &MoveId::from("quick_strike"))
        .await
        .expect("alice acts");
    let err = handle
        .submit_move(battle, &alice(), &MoveId::from("quick_strike"))
        .await
        .expect_err("turns alternate");
    assert!(matches!(err, RuntimeError::Battle(BattleError::NotYourTurn)));

    let state = handle.public_state(battle).await.expect("live battle");
    assert_eq!(state.turn, 2);
    assert_eq!(state.recent_log.len(), 1);

    let err = handle
        .public_state(BattleId(999))
        .await
        .expect_err("no such battle");
    assert!(is_not_found(&err));

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn knockout_completes_and_settles() {
    let (runtime, handle, creatures) = start(untimed()).await;
    let battle = alice_vs_bob(&handle).await;
    let strike = MoveId::from("quick_strike");

    // 22 damage per hit: bob falls on alice's sixth strike, at turn 11.
    let finisher = loop {
        let outcome = handle
            .submit_move(battle, &alice(), &strike)
            .await
            .expect("alice strikes");
        if outcome.is_terminal() {
            break outcome;
        }
        handle
            .submit_move(battle, &bob(), &strike)
            .await
            .expect("bob strikes back");
    };

    assert_eq!(finisher.entry.turn, 11);
    assert_eq!(
        finisher.result,
        Some(BattleResult::Victory {
            winner: alice(),
            loser: bob(),
        })
    );
    assert_eq!(handle.active_battle(&alice()).await, None);
    assert!(is_not_found(
        &handle
            .submit_move(battle, &bob(), &strike)
            .await
            .expect_err("battle is over")
    ));

    let summary = handle.summary(battle).await.expect("archived");
    assert_eq!(summary.status, BattleStatus::Completed);
    assert_eq!(summary.turns, 11);

    let settlement = handle.settle(battle).await.expect("rewards owed");
    assert_eq!(settlement.winner.player, alice());
    assert_eq!(settlement.winner.rewards.experience, 100);
    assert_eq!(settlement.loser.rewards.experience, 50);
    assert!(is_not_found(
        &handle.settle(battle).await.expect_err("settles once")
    ));

    let (winner, loser) = handle
        .record_settlement(&settlement)
        .expect("creatures updated");
    assert_eq!(winner.level, 2);
    assert_eq!(winner.experience, 0);
    assert_eq!(winner.battle_stats.wins(), 1);
    assert_eq!(winner.battle_stats.win_rate(), 100);
    assert_eq!(loser.level, 1);
    assert_eq!(loser.experience, 50);
    assert_eq!(loser.battle_stats.losses(), 1);

    let stored = creatures
        .find(CreatureId(1))
        .expect("readable")
        .expect("alice's creature saved");
    assert_eq!(stored.level, 2);
    assert_eq!(stored.stats.attack, 65);

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn knockout_retires_even_when_the_caller_walks_away() {
    let content = content();
    let mut fragile = water_creature(&content, 2, &bob());
    fragile.stats.hp = 1;
    let creatures = Arc::new(InMemoryCreatureRepo::with_creatures([
        water_creature(&content, 1, &alice()),
        fragile,
        water_creature(&content, 3, &carol()),
    ]));
    let runtime = Runtime::builder()
        .config(untimed())
        .content(content)
        .creatures(creatures)
        .rng(Arc::new(FixedRng))
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();
    let battle = alice_vs_bob(&handle).await;

    // The move reaches the worker on the first poll; the caller then gives up
    // before the reply arrives.
    let alice_id = alice();
    let quick_strike = MoveId::from("quick_strike");
    let abandoned_call = tokio::select! {
        biased;
        _ = handle.submit_move(battle, &alice_id, &quick_strike) => false,
        () = async {} => true,
    };
    assert!(abandoned_call);

    assert!(
        wait_until_retired(&handle, &alice()).await,
        "finished battle left the index"
    );
    assert_eq!(handle.active_battle(&bob()).await, None);
    assert_eq!(handle.active_battles().await, 0);

    let summary = handle.summary(battle).await.expect("archived");
    assert_eq!(summary.status, BattleStatus::Completed);
    let settlement = handle.settle(battle).await.expect("rewards owed");
    assert_eq!(settlement.winner.player, alice());

    handle
        .create_session((alice(), CreatureId(1)), (carol(), CreatureId(3)))
        .await
        .expect("alice is free again");

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn move_racing_a_disconnect_applies_fully_or_not_at_all() {
    let (runtime, handle, _) = start(untimed()).await;

    for _ in 0..20 {
        let battle = alice_vs_bob(&handle).await;

        let mover = handle.clone();
        let move_task = tokio::spawn(async move {
            mover
                .submit_move(battle, &alice(), &MoveId::from("quick_strike"))
                .await
        });
        let leaver = handle.clone();
        let disconnect_task =
            tokio::spawn(async move { leaver.handle_disconnect(&bob()).await });

        let moved = move_task.await.expect("move task joins");
        disconnect_task
            .await
            .expect("disconnect task joins")
            .expect("disconnect handled");

        let summary = handle.summary(battle).await.expect("archived");
        assert_eq!(summary.status, BattleStatus::Abandoned);
        assert_eq!(summary.winner(), Some(&alice()));
        match moved {
            Ok(outcome) => {
                assert_eq!(outcome.entry.turn, 1);
                assert_eq!(summary.turns, 2);
                assert_ne!(summary.behavior[0], TraitScores::default());
            }
            Err(err) => {
                assert!(is_not_found(&err), "unexpected error: {err}");
                assert_eq!(summary.turns, 1);
                assert_eq!(summary.behavior[0], TraitScores::default());
            }
        }

        assert_eq!(handle.active_battle(&alice()).await, None);
        assert_eq!(handle.active_battle(&bob()).await, None);
        handle.settle(battle).await.expect("forfeit pays out");
    }

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn disconnect_abandons_and_notifies_opponent() {
    let (runtime, handle, _) = start(untimed()).await;
    let mut events = handle.subscribe(Topic::Battle);
    let battle = alice_vs_bob(&handle).await;

    handle
        .submit_move(battle, &alice(), &MoveId::from("quick_strike"))
        .await
        .expect("alice acts");
    handle
        .handle_disconnect(&alice())
        .await
        .expect("disconnect handled");

    let err = handle
        .submit_move(battle, &bob(), &MoveId::from("quick_strike"))
        .await
        .expect_err("abandoned battles reject moves");
    assert!(is_not_found(&err));
    assert_eq!(handle.active_battle(&bob()).await, None);
    assert_eq!(handle.active_battles().await, 0);

    let abandoned =
        next_matching(&mut events, |e| matches!(e, BattleEvent::Abandoned { .. })).await;
    let BattleEvent::Abandoned {
        remaining, reason, ..
    } = abandoned
    else {
        unreachable!("filtered above");
    };
    assert_eq!(remaining, bob());
    assert_eq!(reason, AbandonReason::Disconnect);

    // A second notice is a no-op.
    handle
        .handle_disconnect(&alice())
        .await
        .expect("idempotent");

    let summary = handle.summary(battle).await.expect("archived");
    assert_eq!(summary.status, BattleStatus::Abandoned);
    assert_eq!(summary.winner(), Some(&bob()));

    let settlement = handle.settle(battle).await.expect("forfeit pays out");
    assert_eq!(settlement.winner.player, bob());
    assert_eq!(settlement.loser.player, alice());

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn forfeit_concedes_once() {
    let (runtime, handle, _) = start(untimed()).await;
    alice_vs_bob(&handle).await;

    let summary = handle.forfeit(&bob()).await.expect("bob concedes");
    assert_eq!(
        summary.result,
        Some(BattleResult::Forfeit {
            winner: alice(),
            loser: bob(),
            reason: AbandonReason::Forfeit,
        })
    );

    let err = handle.forfeit(&bob()).await.expect_err("nothing to concede");
    assert!(is_not_found(&err));

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test(start_paused = true)]
async fn idle_player_forfeits_on_turn_timeout() {
    let config = RuntimeConfig {
        turn_timeout: Some(Duration::from_secs(30)),
        ..RuntimeConfig::default()
    };
    let (runtime, handle, _) = start(config).await;
    let mut events = handle.subscribe(Topic::Battle);
    let battle = alice_vs_bob(&handle).await;

    handle
        .submit_move(battle, &alice(), &MoveId::from("quick_strike"))
        .await
        .expect("alice acts");

    // Bob never answers.
    let abandoned =
        next_matching(&mut events, |e| matches!(e, BattleEvent::Abandoned { .. })).await;
    let BattleEvent::Abandoned {
        remaining, reason, ..
    } = abandoned
    else {
        unreachable!("filtered above");
    };
    assert_eq!(remaining, alice());
    assert_eq!(reason, AbandonReason::TurnTimeout);

    // The reaper retires the battle asynchronously.
    assert!(
        wait_until_retired(&handle, &alice()).await,
        "timed-out battle left the index"
    );

    let settlement = handle.settle(battle).await.expect("timeout settles");
    assert_eq!(settlement.winner.player, alice());

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test(start_paused = true)]
async fn moves_reset_the_turn_timer() {
    let config = RuntimeConfig {
        turn_timeout: Some(Duration::from_secs(30)),
        ..RuntimeConfig::default()
    };
    let (runtime, handle, _) = start(config).await;
    let battle = alice_vs_bob(&handle).await;
    let strike = MoveId::from("quick_strike");

    tokio::time::sleep(Duration::from_secs(20)).await;
    handle
        .submit_move(battle, &alice(), &strike)
        .await
        .expect("alice acts in time");
    tokio::time::sleep(Duration::from_secs(20)).await;
    handle
        .submit_move(battle, &bob(), &strike)
        .await
        .expect("bob acts in time");

    assert_eq!(handle.active_battle(&alice()).await, Some(battle));

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn invalid_pairings_are_rejected() {
    let (runtime, handle, _) = start(untimed()).await;

    let missing = handle
        .create_session((alice(), CreatureId(1)), (bob(), CreatureId(99)))
        .await
        .expect_err("unknown creature");
    assert!(matches!(missing, RuntimeError::InvalidCreatures { .. }));

    let stolen = handle
        .create_session((alice(), CreatureId(1)), (bob(), CreatureId(3)))
        .await
        .expect_err("bob does not own creature 3");
    assert!(matches!(stolen, RuntimeError::InvalidCreatures { .. }));

    let mirror = handle
        .create_session((alice(), CreatureId(1)), (alice(), CreatureId(1)))
        .await
        .expect_err("self battle");
    assert!(matches!(mirror, RuntimeError::InvalidCreatures { .. }));

    alice_vs_bob(&handle).await;
    let busy = handle
        .create_session((carol(), CreatureId(3)), (alice(), CreatureId(1)))
        .await
        .expect_err("alice is busy");
    assert!(matches!(busy, RuntimeError::PlayerAlreadyInBattle(player) if player == alice()));

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn matchmaking_pairs_in_arrival_order() {
    let (runtime, handle, _) = start(untimed()).await;
    let mut queue_events = handle.subscribe(Topic::Matchmaking);

    assert_eq!(handle.enqueue(alice(), CreatureId(1)).await.expect("queued"), None);
    assert_eq!(
        handle.enqueue(alice(), CreatureId(1)).await.expect("idempotent"),
        None
    );
    assert_eq!(handle.queue_len().await, 1);

    let battle = handle
        .enqueue(bob(), CreatureId(2))
        .await
        .expect("queued")
        .expect("paired with alice");
    assert_eq!(handle.queue_len().await, 0);
    assert_eq!(handle.active_battle(&alice()).await, Some(battle));
    assert_eq!(handle.active_battle(&bob()).await, Some(battle));

    let state = handle.public_state(battle).await.expect("live battle");
    assert_eq!(state.current_player, alice());

    let busy = handle
        .enqueue(alice(), CreatureId(1))
        .await
        .expect_err("already battling");
    assert!(matches!(busy, RuntimeError::PlayerAlreadyInBattle(_)));

    assert_eq!(handle.enqueue(carol(), CreatureId(3)).await.expect("queued"), None);
    assert!(handle.cancel_queue(&carol()).await);
    assert!(!handle.cancel_queue(&carol()).await);

    let mut matched = false;
    while let Ok(event) = queue_events.try_recv() {
        if let Event::Matchmaking(arena_runtime::MatchmakingEvent::Matched { players, .. }) = event
        {
            assert_eq!(players, [alice(), bob()]);
            matched = true;
        }
    }
    assert!(matched);

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn disconnect_leaves_matchmaking_queue() {
    let (runtime, handle, _) = start(untimed()).await;

    handle.enqueue(carol(), CreatureId(3)).await.expect("queued");
    handle
        .handle_disconnect(&carol())
        .await
        .expect("disconnect handled");
    assert_eq!(handle.queue_len().await, 0);

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn seasoned_creature_evolves_along_dominant_trait() {
    let content = content();
    let mut veteran = water_creature(&content, 7, &alice());
    veteran.battle_stats = BattleRecord::new(10, 6, 4);
    veteran.behavior = TraitScores::new(10, 0, 0, 0, 0);
    let rookie = {
        let mut rookie = water_creature(&content, 8, &bob());
        rookie.battle_stats = BattleRecord::new(9, 5, 4);
        rookie
    };
    let creatures = Arc::new(InMemoryCreatureRepo::with_creatures([veteran, rookie]));

    let runtime = Runtime::builder()
        .config(untimed())
        .content(content)
        .creatures(creatures.clone())
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();

    let rookie_check = handle
        .evaluate_evolution(CreatureId(8))
        .expect("creature exists");
    assert!(!rookie_check.is_eligible());

    let check = handle
        .evaluate_evolution(CreatureId(7))
        .expect("creature exists");
    assert_eq!(check.next_stage(), Some(EvolutionStage::Evolved));

    let (evolved, plan) = handle.evolve(CreatureId(7)).expect("eligible");
    assert_eq!(plan.tier.form, "Destroyer");
    assert_eq!(evolved.evolution_stage, EvolutionStage::Evolved);
    assert_eq!(evolved.form.as_deref(), Some("Destroyer"));
    assert_eq!(evolved.stats.attack, 85);
    assert_eq!(evolved.stats.defense, 55);
    assert_eq!(evolved.stats.hp, evolved.stats.max_hp);
    assert!(!evolved.is_evolvable);

    let stored = creatures
        .find(CreatureId(7))
        .expect("readable")
        .expect("saved");
    assert_eq!(stored.evolution_stage, EvolutionStage::Evolved);

    let err = handle.evolve(CreatureId(7)).expect_err("needs 20 battles");
    assert!(matches!(
        err,
        RuntimeError::Evolution(EvolutionError::NotEligibleForEvolution { ref reason })
            if reason == "not enough battles"
    ));

    let err = handle.evolve(CreatureId(99)).expect_err("unknown creature");
    assert!(matches!(err, RuntimeError::CreatureNotFound(CreatureId(99))));

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn persistence_worker_records_battles() {
    let content = content();
    let log = Arc::new(InMemoryBattleLogRepo::new());
    let runtime = Runtime::builder()
        .config(untimed())
        .creatures(roster(&content))
        .content(content)
        .battle_log(log.clone())
        .rng(Arc::new(FixedRng))
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();
    let battle = alice_vs_bob(&handle).await;

    for player in [alice(), bob()] {
        handle
            .submit_move(battle, &player, &MoveId::from("quick_strike"))
            .await
            .expect("move resolves");
    }
    handle.forfeit(&alice()).await.expect("alice concedes");

    // Shutdown drains buffered events into the store.
    runtime.shutdown().await.expect("clean shutdown");

    let entries = log.entries(battle).expect("readable");
    assert_eq!(entries.iter().map(|e| e.turn).collect::<Vec<_>>(), vec![1, 2]);
    let summary = log.summary(battle).expect("readable").expect("saved");
    assert_eq!(summary.status, BattleStatus::Abandoned);
}

#[tokio::test]
async fn storage_outage_does_not_block_play() {
    let content = content();
    let runtime = Runtime::builder()
        .config(untimed())
        .creatures(roster(&content))
        .content(content)
        .battle_log(Arc::new(UnavailableLog))
        .rng(Arc::new(FixedRng))
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();
    let battle = alice_vs_bob(&handle).await;

    for player in [alice(), bob(), alice()] {
        handle
            .submit_move(battle, &player, &MoveId::from("quick_strike"))
            .await
            .expect("play continues while storage is down");
    }
    let state = handle.public_state(battle).await.expect("live battle");
    assert_eq!(state.turn, 4);

    runtime.shutdown().await.expect("clean shutdown");
}

/// Concedes every turn.
struct Resigning;

#[async_trait::async_trait]
impl MoveProvider for Resigning {
    async fn choose_move(
        &self,
        _player: &PlayerId,
        _state: &BattleSnapshot,
    ) -> arena_runtime::Result<Option<MoveId>> {
        Ok(None)
    }
}

#[tokio::test]
async fn providers_drive_turns() {
    let (runtime, handle, _) = start(untimed()).await;
    let battle = alice_vs_bob(&handle).await;
    let striker = FixedMoveProvider(MoveId::from("quick_strike"));

    let step = handle.play_turn(battle, &striker).await.expect("alice moves");
    let TurnStep::Moved(outcome) = step else {
        panic!("fixed provider always moves");
    };
    assert_eq!(outcome.entry.player, alice());
    assert_eq!(outcome.next_player, Some(bob()));

    let step = handle
        .play_turn(battle, &Resigning)
        .await
        .expect("bob resigns");
    let TurnStep::Conceded(summary) = step else {
        panic!("resigning provider never moves");
    };
    assert_eq!(summary.winner(), Some(&alice()));
    assert_eq!(handle.active_battle(&bob()).await, None);

    runtime.shutdown().await.expect("clean shutdown");
}

/// Creature store that refuses to save one creature.
struct ReadOnlyFor {
    inner: InMemoryCreatureRepo,
    locked: CreatureId,
}

impl CreatureRepository for ReadOnlyFor {
    fn find(&self, id: CreatureId) -> RepoResult<Option<Creature>> {
        self.inner.find(id)
    }

    fn save(&self, creature: &Creature) -> RepoResult<()> {
        if creature.id == self.locked {
            return Err(RepositoryError::Unavailable("record locked".into()));
        }
        self.inner.save(creature)
    }
}

#[tokio::test]
async fn failed_loser_save_reports_partial_settlement() {
    let content = content();
    let store = Arc::new(ReadOnlyFor {
        inner: InMemoryCreatureRepo::with_creatures([
            water_creature(&content, 1, &alice()),
            water_creature(&content, 2, &bob()),
        ]),
        locked: CreatureId(2),
    });
    let runtime = Runtime::builder()
        .config(untimed())
        .content(content)
        .creatures(store.clone())
        .rng(Arc::new(FixedRng))
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();
    let battle = alice_vs_bob(&handle).await;
    handle.forfeit(&bob()).await.expect("bob concedes");
    let settlement = handle.settle(battle).await.expect("rewards owed");

    let err = handle
        .record_settlement(&settlement)
        .expect_err("loser cannot be saved");
    assert!(matches!(
        err,
        RuntimeError::PartialSettlement {
            saved: CreatureId(1),
            failed: CreatureId(2),
            ..
        }
    ));

    let winner = store
        .find(CreatureId(1))
        .expect("readable")
        .expect("present");
    assert_eq!(winner.battle_stats.wins(), 1);
    let loser = store
        .find(CreatureId(2))
        .expect("readable")
        .expect("present");
    assert_eq!(loser.battle_stats.total_battles(), 0);

    // A missing creature fails before anything is written.
    let mut orphaned = settlement.clone();
    orphaned.loser.creature = CreatureId(99);
    let err = handle
        .record_settlement(&orphaned)
        .expect_err("unknown loser");
    assert!(matches!(err, RuntimeError::CreatureNotFound(CreatureId(99))));
    let winner = store
        .find(CreatureId(1))
        .expect("readable")
        .expect("present");
    assert_eq!(winner.battle_stats.wins(), 1);

    runtime.shutdown().await.expect("clean shutdown");
}
