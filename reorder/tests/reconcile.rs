//! End-to-end reorder scenarios against in-memory collaborators

use async_trait::async_trait;
use parking_lot::Mutex;
use reorder::{
    DragEvent, FieldListStore, FieldPersistence, FieldRefresher, NoopRefresher, PersistError,
    PositionPolicy, Reconciler, ReorderConfig, ReorderOutcome, ReorderStart, SkipReason,
    VisibleFilter, assign_positions, visible_ids,
};
use shared::error::AppError;
use shared::models::{FieldId, FieldItem, ObjectId};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;

// =============================================================================
// Test doubles
// =============================================================================

/// Records every write; fails the ids listed in `failing`
#[derive(Default)]
struct RecordingPersistence {
    calls: Mutex<Vec<(FieldId, i32)>>,
    failing: HashSet<FieldId>,
}

impl RecordingPersistence {
    fn failing(ids: &[&str]) -> Self {
        Self {
            failing: ids.iter().map(|id| FieldId::from(*id)).collect(),
            ..Default::default()
        }
    }

    fn called_ids(&self) -> HashSet<FieldId> {
        self.calls.lock().iter().map(|(id, _)| id.clone()).collect()
    }

    fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl FieldPersistence for RecordingPersistence {
    async fn update_position(&self, field_id: &FieldId, position: i32) -> Result<(), PersistError> {
        self.calls.lock().push((field_id.clone(), position));
        if self.failing.contains(field_id) {
            return Err(AppError::internal("write rejected").into());
        }
        Ok(())
    }
}

/// Holds every write until the gate opens
struct GatedPersistence {
    gate: watch::Sender<bool>,
    fail: bool,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl GatedPersistence {
    fn new(fail: bool) -> Self {
        let (gate, _) = watch::channel(false);
        Self {
            gate,
            fail,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn open(&self) {
        self.gate.send_replace(true);
    }
}

#[async_trait]
impl FieldPersistence for GatedPersistence {
    async fn update_position(&self, _field_id: &FieldId, _position: i32) -> Result<(), PersistError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let mut rx = self.gate.subscribe();
        let _ = rx.wait_for(|open| *open).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.fail {
            return Err(PersistError::Unavailable("gateway timeout".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
struct CountingRefresher {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl FieldRefresher for CountingRefresher {
    async fn refresh(&self, _object_id: &ObjectId) -> Result<(), PersistError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PersistError::Unavailable("refresh failed".into()));
        }
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn company() -> ObjectId {
    ObjectId::from("company")
}

fn ids(names: &[&str]) -> Vec<FieldId> {
    names.iter().map(|n| FieldId::from(*n)).collect()
}

fn order_of(fields: &[FieldItem]) -> Vec<&str> {
    fields.iter().map(|f| f.id.as_str()).collect()
}

/// Non-system ids sorted by stored position
fn sorted_by_position(fields: &[FieldItem]) -> Vec<&str> {
    reorder::canonical_order(fields)
        .into_iter()
        .map(|f| f.id.as_str())
        .collect()
}

fn abcd() -> Vec<FieldItem> {
    vec![
        FieldItem::new("a", "Name").with_position(0),
        FieldItem::new("b", "Domain").with_position(1),
        FieldItem::new("c", "Employees").with_position(2),
        FieldItem::new("d", "Created at").with_position(3).system(),
    ]
}

fn reconciler<P: FieldPersistence>(
    fields: Vec<FieldItem>,
    persistence: P,
    config: ReorderConfig,
) -> Reconciler<P, NoopRefresher> {
    let store = FieldListStore::new();
    store.seed(company(), fields);
    Reconciler::new(store, persistence, NoopRefresher, config)
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_move_first_to_last() {
    init_tracing();
    let persistence = Arc::new(RecordingPersistence::default());
    let reconciler = reconciler(abcd(), persistence.clone(), ReorderConfig::default());

    let outcome = reconciler
        .reconcile_reorder(&company(), &ids(&["a", "b", "c"]), DragEvent::new(0, 2))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ReorderOutcome::Applied {
            moved: FieldId::from("a"),
            updated: 3,
            total: 3,
        }
    );

    let fields = reconciler.store().get(&company()).unwrap();
    assert_eq!(order_of(&fields), vec!["b", "c", "a", "d"]);
    let positions: Vec<_> = fields.iter().map(|f| f.position).collect();
    assert_eq!(positions, vec![Some(0), Some(1), Some(2), Some(3)]);

    assert_eq!(persistence.called_ids(), ids(&["a", "b", "c"]).into_iter().collect::<HashSet<_>>());
    assert!(!persistence.called_ids().contains(&FieldId::from("d")));
    assert!(!reconciler.store().is_pending(&company()));
}

#[tokio::test]
async fn test_inactive_filter_keeps_hidden_anchor() {
    let fields = vec![
        FieldItem::new("a", "A").with_position(0),
        FieldItem::new("b", "B").with_position(1).inactive(),
        FieldItem::new("c", "C").with_position(2),
    ];
    let filter = VisibleFilter::default().with_show_inactive(false);
    let visible = visible_ids(&fields, &filter);
    assert_eq!(visible, ids(&["a", "c"]));

    let persistence = Arc::new(RecordingPersistence::default());
    let reconciler = reconciler(fields, persistence.clone(), ReorderConfig::default());
    assert!(reconciler.drag_enabled(&company(), &filter));

    let outcome = reconciler
        .reconcile_reorder(&company(), &visible, DragEvent::new(0, 1))
        .await
        .unwrap();
    assert!(outcome.is_applied());

    let stored = reconciler.store().get(&company()).unwrap();
    assert_eq!(sorted_by_position(&stored), vec!["b", "c", "a"]);
}

#[tokio::test]
async fn test_hidden_fields_keep_relative_order() {
    let fields: Vec<FieldItem> = ["a", "b", "c", "d", "e", "f"]
        .iter()
        .enumerate()
        .map(|(i, id)| FieldItem::new(*id, id.to_uppercase()).with_position(i as i32))
        .collect();
    let hidden = ["b", "d", "f"];
    let visible = ids(&["a", "c", "e"]);

    let reconciler = reconciler(fields, RecordingPersistence::default(), ReorderConfig::default());
    reconciler
        .reconcile_reorder(&company(), &visible, DragEvent::new(2, 0))
        .await
        .unwrap();

    let stored = reconciler.store().get(&company()).unwrap();
    let order = sorted_by_position(&stored);
    let hidden_order: Vec<&str> = order
        .iter()
        .copied()
        .filter(|id| hidden.contains(id))
        .collect();
    assert_eq!(hidden_order, hidden);
    // e lands directly before a, the field it was dropped on
    assert_eq!(order, vec!["e", "a", "b", "c", "d", "f"]);
}

#[tokio::test]
async fn test_noop_drag_touches_nothing() {
    let persistence = Arc::new(RecordingPersistence::default());
    let reconciler = reconciler(abcd(), persistence.clone(), ReorderConfig::default());
    let revision = reconciler.store().revision(&company());

    let same = reconciler
        .reconcile_reorder(&company(), &ids(&["a", "b", "c"]), DragEvent::new(1, 1))
        .await
        .unwrap();
    let cancelled = reconciler
        .reconcile_reorder(&company(), &ids(&["a", "b", "c"]), DragEvent::cancelled(1))
        .await
        .unwrap();

    assert_eq!(same, ReorderOutcome::Skipped(SkipReason::NoOpMove));
    assert_eq!(cancelled, ReorderOutcome::Skipped(SkipReason::NoDestination));
    assert_eq!(persistence.call_count(), 0);
    assert_eq!(reconciler.store().revision(&company()), revision);
    assert_eq!(reconciler.store().get(&company()).unwrap(), abcd());
}

#[tokio::test]
async fn test_invalid_drag_leaves_store_untouched() {
    let reconciler = reconciler(abcd(), RecordingPersistence::default(), ReorderConfig::default());

    let stale = reconciler
        .reconcile_reorder(&company(), &ids(&["a", "gone"]), DragEvent::new(0, 1))
        .await
        .unwrap_err();
    assert_eq!(stale, reorder::ReorderError::IdentifierNotFound(FieldId::from("gone")));

    let system = reconciler
        .reconcile_reorder(&company(), &ids(&["a", "d"]), DragEvent::new(1, 0))
        .await
        .unwrap_err();
    assert_eq!(system, reorder::ReorderError::IdentifierNotFound(FieldId::from("d")));

    assert_eq!(reconciler.store().get(&company()).unwrap(), abcd());
}

#[tokio::test]
async fn test_failure_restores_snapshot() {
    init_tracing();
    let mut fields = abcd();
    fields[1].settings = Some(serde_json::json!({"displayedMaxRows": 2}));
    fields.push(FieldItem::new("e", "Notes"));

    let persistence = Arc::new(RecordingPersistence::failing(&["c"]));
    let reconciler = reconciler(fields.clone(), persistence.clone(), ReorderConfig::default());

    let outcome = reconciler
        .reconcile_reorder(&company(), &ids(&["a", "b", "c", "e"]), DragEvent::new(3, 0))
        .await
        .unwrap();

    match &outcome {
        ReorderOutcome::RolledBack { moved, failed, restored } => {
            assert_eq!(moved, &FieldId::from("e"));
            assert_eq!(failed, &ids(&["c"]));
            assert!(restored);
        }
        other => panic!("expected a rollback, got {:?}", other),
    }
    // every changed field was attempted before rolling back
    assert_eq!(persistence.call_count(), 4);
    assert_eq!(reconciler.store().get(&company()).unwrap(), fields);
    assert!(!reconciler.store().is_pending(&company()));
}

#[tokio::test]
async fn test_sparse_policy_only_writes_changed_positions() {
    let fields: Vec<FieldItem> = ["a", "b", "c", "d", "e"]
        .iter()
        .enumerate()
        .map(|(i, id)| FieldItem::new(*id, id.to_uppercase()).with_position(i as i32 * 1000))
        .collect();
    let config = ReorderConfig::default().with_policy(PositionPolicy::sparse(1000).unwrap());
    let persistence = Arc::new(RecordingPersistence::default());
    let reconciler = reconciler(fields, persistence.clone(), config);

    let outcome = reconciler
        .reconcile_reorder(&company(), &ids(&["a", "b", "c", "d", "e"]), DragEvent::new(1, 3))
        .await
        .unwrap();

    // b moves below d; only b, c and d change position
    assert_eq!(
        outcome,
        ReorderOutcome::Applied {
            moved: FieldId::from("b"),
            updated: 3,
            total: 5,
        }
    );
    assert_eq!(persistence.called_ids(), ids(&["b", "c", "d"]).into_iter().collect::<HashSet<_>>());
    let calls = persistence.calls.lock().clone();
    assert!(calls.contains(&(FieldId::from("b"), 3000)));
}

#[test]
fn test_position_assignment_is_idempotent() {
    let order = ids(&["c", "a", "b"]);
    for policy in [PositionPolicy::Dense, PositionPolicy::sparse(100).unwrap()] {
        assert_eq!(
            assign_positions(&order, policy).unwrap(),
            assign_positions(&order, policy).unwrap()
        );
    }
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn test_optimistic_state_visible_while_pending() {
    let persistence = Arc::new(GatedPersistence::new(false));
    let reconciler = reconciler(abcd(), persistence.clone(), ReorderConfig::default());

    let check = async {
        while !reconciler.store().is_pending(&company()) {
            tokio::task::yield_now().await;
        }
        let fields = reconciler.store().get(&company()).unwrap();
        assert_eq!(order_of(&fields), vec!["c", "a", "b", "d"]);
        assert!(reconciler.store().is_pending(&company()));
        assert!(!reconciler.drag_enabled(&company(), &VisibleFilter::default()));
        persistence.open();
    };

    let object_id = company();
    let visible = ids(&["a", "b", "c"]);
    let (outcome, ()) = tokio::join!(
        reconciler.reconcile_reorder(&object_id, &visible, DragEvent::new(2, 0)),
        check
    );

    assert!(outcome.unwrap().is_applied());
    assert!(!reconciler.store().is_pending(&company()));
    assert!(reconciler.drag_enabled(&company(), &VisibleFilter::default()));
}

#[tokio::test]
async fn test_fan_out_is_bounded() {
    let fields: Vec<FieldItem> = (0..6)
        .map(|i| FieldItem::new(format!("f{i}"), format!("F{i}")).with_position(i))
        .collect();
    let visible: Vec<FieldId> = fields.iter().map(|f| f.id.clone()).collect();
    let persistence = Arc::new(GatedPersistence::new(false));
    let config = ReorderConfig::default().with_max_concurrent_updates(2);
    let reconciler = reconciler(fields, persistence.clone(), config);

    let release = async {
        while persistence.max_in_flight.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        persistence.open();
    };
    let object_id = company();
    let (outcome, ()) = tokio::join!(
        reconciler.reconcile_reorder(&object_id, &visible, DragEvent::new(0, 5)),
        release
    );

    assert_eq!(
        outcome.unwrap(),
        ReorderOutcome::Applied {
            moved: FieldId::from("f0"),
            updated: 6,
            total: 6,
        }
    );
    assert_eq!(persistence.max_in_flight.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_stale_rollback_keeps_newer_reorder() {
    init_tracing();
    let persistence = Arc::new(RecordingPersistence::failing(&["a", "b", "c"]));
    let reconciler = reconciler(abcd(), persistence, ReorderConfig::default());

    let ReorderStart::Pending(first) = reconciler
        .begin_reorder(&company(), &ids(&["a", "b", "c"]), DragEvent::new(0, 2))
        .unwrap()
    else {
        panic!("expected a pending reorder");
    };
    // second drag over the optimistic order [b, c, a]
    let ReorderStart::Pending(second) = reconciler
        .begin_reorder(&company(), &ids(&["b", "c", "a"]), DragEvent::new(0, 1))
        .unwrap()
    else {
        panic!("expected a pending reorder");
    };
    let newer = second.plan().fields.clone();
    assert_eq!(order_of(&newer), vec!["c", "b", "a", "d"]);

    let outcome = first.persist().await;
    assert!(matches!(outcome, ReorderOutcome::RolledBack { restored: false, .. }));
    assert_eq!(reconciler.store().get(&company()).unwrap(), newer);
    assert!(reconciler.store().is_pending(&company()));

    let outcome = second.persist().await;
    assert!(matches!(outcome, ReorderOutcome::RolledBack { restored: true, .. }));
    assert!(!reconciler.store().is_pending(&company()));
}

#[tokio::test]
async fn test_late_success_keeps_newer_reorder() {
    let persistence = Arc::new(GatedPersistence::new(false));
    let reconciler = reconciler(abcd(), persistence.clone(), ReorderConfig::default());
    let object_id = company();

    let ReorderStart::Pending(first) = reconciler
        .begin_reorder(&object_id, &ids(&["a", "b", "c"]), DragEvent::new(0, 2))
        .unwrap()
    else {
        panic!("expected a pending reorder");
    };
    // start a second drag while the first one's writes are held
    let begin_second = async {
        while persistence.max_in_flight.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        let ReorderStart::Pending(second) = reconciler
            .begin_reorder(&object_id, &ids(&["b", "c", "a"]), DragEvent::new(0, 1))
            .unwrap()
        else {
            panic!("expected a pending reorder");
        };
        persistence.open();
        second
    };
    let (outcome, second) = tokio::join!(first.persist(), begin_second);

    assert_eq!(
        outcome,
        ReorderOutcome::Applied {
            moved: FieldId::from("a"),
            updated: 3,
            total: 3,
        }
    );
    let newer = second.plan().fields.clone();
    assert_eq!(order_of(&newer), vec!["c", "b", "a", "d"]);
    assert_eq!(reconciler.store().get(&object_id).unwrap(), newer);
    assert!(reconciler.store().is_pending(&object_id));

    assert!(second.persist().await.is_applied());
    assert_eq!(reconciler.store().get(&object_id).unwrap(), newer);
    assert!(!reconciler.store().is_pending(&object_id));
}

#[tokio::test]
async fn test_reseed_during_flight_wins_over_rollback() {
    let persistence = Arc::new(GatedPersistence::new(true));
    let reconciler = reconciler(abcd(), persistence.clone(), ReorderConfig::default());
    let fresh = vec![FieldItem::new("z", "Server copy").with_position(0)];

    let reseed = async {
        while !reconciler.store().is_pending(&company()) {
            tokio::task::yield_now().await;
        }
        reconciler.store().seed(company(), fresh.clone());
        persistence.open();
    };
    let object_id = company();
    let visible = ids(&["a", "b", "c"]);
    let (outcome, ()) = tokio::join!(
        reconciler.reconcile_reorder(&object_id, &visible, DragEvent::new(0, 1)),
        reseed
    );

    assert!(matches!(
        outcome.unwrap(),
        ReorderOutcome::RolledBack { restored: false, .. }
    ));
    assert_eq!(reconciler.store().get(&company()).unwrap(), fresh);
}

// =============================================================================
// Refresh
// =============================================================================

#[tokio::test]
async fn test_refresh_runs_after_success_only() {
    let store = FieldListStore::new();
    store.seed(company(), abcd());
    let refresher = Arc::new(CountingRefresher::default());
    let persistence = Arc::new(RecordingPersistence::failing(&["b"]));
    let reconciler = Reconciler::new(
        store.clone(),
        persistence,
        refresher.clone(),
        ReorderConfig::default(),
    );

    let outcome = reconciler
        .reconcile_reorder(&company(), &ids(&["a", "b", "c"]), DragEvent::new(0, 1))
        .await
        .unwrap();
    assert!(!outcome.is_applied());
    assert_eq!(refresher.calls.load(Ordering::SeqCst), 0);

    let reconciler = Reconciler::new(
        store,
        RecordingPersistence::default(),
        refresher.clone(),
        ReorderConfig::default(),
    );
    reconciler
        .reconcile_reorder(&company(), &ids(&["a", "b", "c"]), DragEvent::new(0, 1))
        .await
        .unwrap();
    assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_refresh_failure_keeps_applied_state() {
    let store = FieldListStore::new();
    store.seed(company(), abcd());
    let refresher = Arc::new(CountingRefresher {
        fail: true,
        ..Default::default()
    });
    let reconciler = Reconciler::new(
        store,
        RecordingPersistence::default(),
        refresher.clone(),
        ReorderConfig::default(),
    );

    let outcome = reconciler
        .reconcile_reorder(&company(), &ids(&["a", "b", "c"]), DragEvent::new(2, 0))
        .await
        .unwrap();
    assert!(outcome.is_applied());
    assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
    let fields = reconciler.store().get(&company()).unwrap();
    assert_eq!(order_of(&fields), vec!["c", "a", "b", "d"]);
}

#[tokio::test]
async fn test_refresh_can_be_disabled() {
    let store = FieldListStore::new();
    store.seed(company(), abcd());
    let refresher = Arc::new(CountingRefresher::default());
    let reconciler = Reconciler::new(
        store,
        RecordingPersistence::default(),
        refresher.clone(),
        ReorderConfig::default().with_refresh(false),
    );

    reconciler
        .reconcile_reorder(&company(), &ids(&["a", "b", "c"]), DragEvent::new(2, 0))
        .await
        .unwrap();
    assert_eq!(refresher.calls.load(Ordering::SeqCst), 0);
}
