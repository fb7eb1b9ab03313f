/*!
 * Registry Tests
 * Acquire/release/prewarm/teardown behavior against recording fixtures
 */

use super::fixtures::{bolt, harness, RecordingFactory, TestEntity};
use instance_pool::{
    ActivationOptions, InstanceFactory, Placement, PoolConfig, PoolInstance, PoolKey,
    PoolRegistry, PoolState, SpawnRequest,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[test]
fn test_acquire_constructs_when_pool_empty() {
    let h = harness(false);
    let instance = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .expect("construction succeeds");

    assert_eq!(instance.state(), PoolState::Active);
    assert_eq!(h.factory.created(), 1);

    let stats = h.registry.stats();
    assert_eq!(stats.total_created(), 1);
    assert_eq!(stats.acquisitions, 1);
    assert_eq!(stats.reuses, 0);
    assert_eq!(stats.total_free(), 0);
}

#[test]
fn test_release_then_acquire_reuses_instance() {
    let h = harness(false);
    let first = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();
    let id = first.id();

    h.registry.release(&first);
    assert!(first.is_in_pool());
    assert_eq!(h.registry.stats().total_free(), 1);

    let second = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();
    assert_eq!(second.id(), id);
    assert_eq!(second.state(), PoolState::Active);

    // Reuse, not construction
    assert_eq!(h.factory.created(), 1);
    let stats = h.registry.stats();
    assert_eq!(stats.total_created(), 1);
    assert_eq!(stats.reuses, 1);
    assert_eq!(stats.total_free(), 0);
}

#[test]
fn test_lifo_reuse_order() {
    let h = harness(false);
    let a = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();
    let b = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();

    h.registry.release(&a);
    h.registry.release(&b);

    // B went in last, so B comes out first
    let next = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();
    assert_eq!(next.id(), b.id());

    let after = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();
    assert_eq!(after.id(), a.id());
}

#[test]
fn test_stale_entry_skipped() {
    let h = harness(false);
    let a = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();
    let b = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();
    h.registry.release(&a);
    h.registry.release(&b);

    // Destroy B externally while it sits on top of the free list
    let b_id = b.id();
    assert!(h.factory.kill(b_id));
    drop(b);

    let next = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();
    assert_eq!(next.id(), a.id());
    assert_eq!(h.factory.created(), 2);
    assert_eq!(h.registry.stats().stale_dropped, 1);
}

#[test]
fn test_all_stale_falls_through_to_construction() {
    let h = harness(false);
    let a = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();
    h.registry.release(&a);
    let a_id = a.id();
    h.factory.kill(a_id);
    drop(a);

    let next = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();
    assert_ne!(next.id(), a_id);
    assert_eq!(h.factory.created(), 2);
}

#[test]
fn test_prewarm_parks_requested_count() {
    let h = harness(false);
    let parked = h.registry.prewarm(&bolt(), 3);
    assert_eq!(parked, 3);
    assert_eq!(h.factory.created(), 3);

    let stats = h.registry.stats();
    assert_eq!(stats.total_created(), 3);
    assert_eq!(stats.total_free(), 3);
}

#[test]
fn test_prewarm_reuses_parked_instances() {
    let h = harness(false);

    // One instance already through a full use cycle
    let first = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();
    h.registry.release(&first);
    let second = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();
    assert_eq!(second.id(), first.id());
    assert_eq!(h.factory.created(), 1);
    h.registry.release(&second);

    // Prewarm picks the parked instance up and tops the pool off
    let parked = h.registry.prewarm(&bolt(), 3);
    assert_eq!(parked, 3);
    assert_eq!(h.factory.created(), 3);

    let stats = h.registry.stats();
    assert_eq!(stats.total_created(), 3);
    assert_eq!(stats.total_free(), 3);
}

#[test]
fn test_prewarm_applies_dormant_options() {
    let h = harness(false);
    h.registry.prewarm(&bolt(), 1);

    let instance = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();
    let probe = h.factory.probe(instance.id());

    // The prewarm activation must have left the entity suppressed before
    // parking; the fresh acquire turned everything back on
    let calls = probe.calls();
    assert_eq!(
        calls.first().map(String::as_str),
        Some("visible:false"),
        "prewarm should activate dormant"
    );
    assert!(probe.visible.load(std::sync::atomic::Ordering::SeqCst));
}

#[test]
fn test_prewarm_clamped_by_config() {
    let factory = Arc::new(RecordingFactory::new(false));
    let factory_seam: Arc<dyn InstanceFactory> = factory.clone();
    let registry = PoolRegistry::builder(factory_seam)
        .with_config(PoolConfig::default().with_max_prewarm(2))
        .build();

    assert_eq!(registry.prewarm(&bolt(), 10), 2);
    assert_eq!(factory.created(), 2);
}

#[test]
fn test_prewarm_invalid_inputs() {
    let h = harness(false);
    assert_eq!(h.registry.prewarm(&PoolKey::new(""), 4), 0);
    assert_eq!(h.registry.prewarm(&bolt(), 0), 0);
    assert_eq!(h.factory.created(), 0);
}

#[test]
fn test_factory_failure_mid_prewarm_parks_what_succeeded() {
    let h = harness(false);
    h.registry.prewarm(&bolt(), 1);
    h.factory.set_fail(true);

    // One parked instance can be cycled; the other two constructions fail
    let parked = h.registry.prewarm(&bolt(), 3);
    assert_eq!(parked, 1);
    assert_eq!(h.factory.created(), 1);
}

#[test]
fn test_double_release_does_not_duplicate_entry() {
    let h = harness(false);
    let instance = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();

    h.registry.release(&instance);
    h.registry.release(&instance);

    assert_eq!(h.registry.stats().total_free(), 1);
    assert_eq!(h.registry.stats().releases, 1);

    // Only one acquisition can be served from the pool
    let first = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();
    assert_eq!(first.id(), instance.id());
    let second = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();
    assert_ne!(second.id(), instance.id());
    assert_eq!(h.factory.created(), 2);
}

#[test]
fn test_release_files_under_concrete_key() {
    let h = harness(false);
    let (entity, _probe) = TestEntity::new(PoolKey::new("bolt/fire"), false);
    let instance = PoolInstance::new(Box::new(entity));

    h.registry.release(&instance);

    let stats = h.registry.stats();
    assert_eq!(stats.pools.len(), 1);
    assert_eq!(stats.pools[0].key, PoolKey::new("bolt/fire"));
    assert_eq!(stats.pools[0].free, 1);
}

#[test]
fn test_teardown_destroys_dormant_and_resets() {
    let h = harness(false);
    h.registry.prewarm(&bolt(), 2);
    h.registry.prewarm(&PoolKey::new("mine"), 1);

    let summary = h.registry.teardown();
    assert_eq!(summary.destroyed, 3);
    assert_eq!(summary.pools_cleared, 2);
    assert_eq!(h.factory.destroyed(), 3);
    assert_eq!(h.factory.live(), 0);

    let stats = h.registry.stats();
    assert_eq!(stats.total_created(), 0);
    assert_eq!(stats.total_free(), 0);
    assert!(h.registry.is_empty());
}

#[test]
fn test_teardown_reports_stale_entries() {
    let h = harness(false);
    let a = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();
    h.registry.release(&a);
    h.factory.kill(a.id());
    drop(a);

    let summary = h.registry.teardown();
    assert_eq!(summary.destroyed, 0);
    assert_eq!(summary.stale_dropped, 1);
}

#[test]
fn test_teardown_leaves_active_instances_alone() {
    let h = harness(false);
    let held = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();
    h.registry.prewarm(&bolt(), 1);

    let summary = h.registry.teardown();
    assert_eq!(summary.destroyed, 1);

    // The active instance was never in a free list, so teardown never
    // saw it; the factory still owns it
    assert_eq!(held.state(), PoolState::Active);
    assert_eq!(h.factory.live(), 1);
}

#[test]
fn test_rich_activation_applies_full_sequence() {
    let h = harness(true);
    let request = SpawnRequest::at(Placement::at([1.0, 2.0, 3.0]));
    let instance = h
        .registry
        .acquire(&bolt(), &request, &ActivationOptions::all())
        .unwrap();
    let probe = h.factory.probe(instance.id());

    assert_eq!(
        probe.calls(),
        vec![
            "context:set",
            "placement:[1.0, 2.0, 3.0]",
            "visible:true",
            "tick:true",
            "collision:true",
            "component_tick:true",
            "reset_physics",
            "effects:true",
            "audio:true",
        ]
    );

    probe.clear_calls();
    h.registry.release(&instance);
    assert_eq!(
        probe.calls(),
        vec![
            "visible:false",
            "collision:false",
            "tick:false",
            "component_tick:false",
            "reset_physics",
            "effects:false",
            "audio:false",
            "context:clear",
        ]
    );
}

#[test]
fn test_fallback_activation_applies_minimal_sequence() {
    let h = harness(false);
    let request = SpawnRequest::at(Placement::at([4.0, 0.0, 0.0]));
    let instance = h
        .registry
        .acquire(&bolt(), &request, &ActivationOptions::all())
        .unwrap();
    let probe = h.factory.probe(instance.id());

    assert_eq!(
        probe.calls(),
        vec![
            "placement:[4.0, 0.0, 0.0]",
            "visible:true",
            "tick:true",
            "collision:true",
        ]
    );

    probe.clear_calls();
    h.registry.release(&instance);
    assert_eq!(
        probe.calls(),
        vec!["visible:false", "collision:false", "tick:false"]
    );
}

#[test]
fn test_placement_skipped_when_absent() {
    let h = harness(true);
    let instance = h
        .registry
        .acquire(&bolt(), &SpawnRequest::new(), &ActivationOptions::all())
        .unwrap();
    let probe = h.factory.probe(instance.id());
    assert!(!probe.calls().iter().any(|call| call.starts_with("placement")));
}

#[test]
fn test_contains_and_len_track_pools() {
    let h = harness(false);
    assert!(h.registry.is_empty());
    assert!(!h.registry.contains(&bolt()));

    h.registry.prewarm(&bolt(), 1);
    h.registry.prewarm(&PoolKey::new("mine"), 1);
    assert!(h.registry.contains(&bolt()));
    assert_eq!(h.registry.len(), 2);
}
