/*!
 * Invariant Tests
 * Property-based operation sequences against the registry
 */

use super::fixtures::{bolt, harness};
use instance_pool::{ActivationOptions, PoolInstance, PoolState, SpawnRequest};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Op {
    Acquire,
    Release(usize),
    Kill(usize),
    Advance(u16),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Acquire),
        2 => (0usize..8).prop_map(Op::Release),
        1 => (0usize..8).prop_map(Op::Kill),
        2 => (0u16..400).prop_map(Op::Advance),
    ]
}

proptest! {
    #[test]
    fn registry_invariants_hold(ops in proptest::collection::vec(op_strategy(), 1..64)) {
        let h = harness(false);
        h.factory.set_auto_return(Some(Duration::from_millis(150)));
        let key = bolt();
        let mut held: Vec<Arc<PoolInstance>> = Vec::new();

        for op in ops {
            match op {
                Op::Acquire => {
                    if let Some(instance) = h.registry.acquire(
                        &key,
                        &SpawnRequest::new(),
                        &ActivationOptions::all(),
                    ) {
                        // A handed-out instance is Active and never
                        // aliases another outstanding one
                        prop_assert_eq!(instance.state(), PoolState::Active);
                        prop_assert!(held.iter().all(|other| other.id() != instance.id()));
                        held.push(instance);
                    }
                }
                Op::Release(pick) => {
                    if !held.is_empty() {
                        let instance = held.remove(pick % held.len());
                        h.registry.release(&instance);
                        prop_assert!(instance.is_in_pool());
                    }
                }
                Op::Kill(pick) => {
                    if !held.is_empty() {
                        let instance = held.remove(pick % held.len());
                        h.factory.kill(instance.id());
                        drop(instance);
                    }
                }
                Op::Advance(ms) => {
                    h.timers.advance(Duration::from_millis(u64::from(ms)));
                    // Auto-return may have parked instances we still hold
                    held.retain(|instance| !instance.is_in_pool());
                }
            }

            // Construction accounting never drifts from the factory's
            let stats = h.registry.stats();
            prop_assert_eq!(stats.total_created() as usize, h.factory.created());
        }

        // Teardown always empties the registry completely
        h.registry.teardown();
        let stats = h.registry.stats();
        prop_assert_eq!(stats.total_created(), 0);
        prop_assert_eq!(stats.total_free(), 0);
        prop_assert_eq!(stats.acquisitions, 0);
    }
}
