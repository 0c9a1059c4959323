//! Integration tests for the concurrency and conditional combinators.
//!
//! Timing-sensitive tests run under tokio's paused clock (`start_paused`),
//! so "elapsed time" is virtual and deterministic: concurrent waits advance
//! the clock by their maximum, sequential waits by their sum.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use deferio::effect::{Action, Failure};
use rstest::rstest;

/// An action that sleeps, then records its tag and succeeds with it.
fn recording(order: &Arc<Mutex<Vec<i32>>>, tag: i32, sleep_ms: u64) -> Action<i32> {
    let order = Arc::clone(order);
    Action::new(move || {
        let order = Arc::clone(&order);
        async move {
            tokio::time::sleep(Duration::from_millis(sleep_ms)).await;
            order.lock().unwrap().push(tag);
            Ok(tag)
        }
    })
}

// =============================================================================
// all
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_all_overlaps_waits_and_orders_results() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let actions = vec![
        recording(&order, 1, 100),
        recording(&order, 2, 60),
        recording(&order, 3, 80),
    ];

    let start = tokio::time::Instant::now();
    let results = Action::all(actions).run().await.unwrap();
    let elapsed = start.elapsed();

    // Results follow input order even though completion order differs.
    assert_eq!(results, vec![1, 2, 3]);
    assert_eq!(*order.lock().unwrap(), vec![2, 3, 1]);

    // Elapsed is the maximum of the waits, not the sum.
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_millis(240));
}

#[tokio::test]
async fn test_all_empty_input() {
    let results = Action::<i32>::all(Vec::new()).run().await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_all_fails_fast_without_cancelling_siblings() {
    let sibling_done = Arc::new(AtomicBool::new(false));
    let sibling_clone = Arc::clone(&sibling_done);
    let sibling = Action::new(move || {
        let flag = Arc::clone(&sibling_clone);
        async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
            Ok(1)
        }
    });
    let failing = Action::delay(Duration::from_millis(10))
        .then(Action::<i32>::fail(Failure::message("first failure wins")));

    let start = tokio::time::Instant::now();
    let result = Action::all(vec![sibling, failing]).run().await;

    // The aggregate fails as soon as the failure is observed.
    assert_eq!(result.unwrap_err().to_string(), "first failure wins");
    assert!(start.elapsed() < Duration::from_millis(50));
    assert!(!sibling_done.load(Ordering::SeqCst));

    // The sibling was not cancelled: its effect still completes.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(sibling_done.load(Ordering::SeqCst));
}

// =============================================================================
// sequence
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_sequence_runs_strictly_in_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let actions = vec![
        recording(&order, 1, 80),
        recording(&order, 2, 80),
        recording(&order, 3, 80),
    ];

    let start = tokio::time::Instant::now();
    let results = Action::sequence(actions).run().await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(results, vec![1, 2, 3]);
    assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);

    // Elapsed is the sum of the waits.
    assert!(elapsed >= Duration::from_millis(240));
}

#[tokio::test]
async fn test_sequence_empty_input() {
    let results = Action::<i32>::sequence(Vec::new()).run().await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_sequence_short_circuits_on_failure() {
    let executed = Arc::new(AtomicUsize::new(0));
    let counting = |executed: &Arc<AtomicUsize>| {
        let executed = Arc::clone(executed);
        Action::new(move || {
            let executed = Arc::clone(&executed);
            async move {
                executed.fetch_add(1, Ordering::SeqCst);
                Ok(1)
            }
        })
    };

    let actions = vec![
        counting(&executed),
        Action::fail(Failure::message("stop here")),
        counting(&executed),
        counting(&executed),
    ];

    let result = Action::sequence(actions).run().await;

    assert!(result.is_err());
    // Only the action before the failure ever ran.
    assert_eq!(executed.load(Ordering::SeqCst), 1);
}

// =============================================================================
// forever
// =============================================================================

#[tokio::test]
async fn test_forever_terminates_with_the_failure() {
    let invocations = Arc::new(AtomicUsize::new(0));
    let invocations_clone = Arc::clone(&invocations);
    let action = Action::new(move || {
        let counter = Arc::clone(&invocations_clone);
        async move {
            let count = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if count == 3 {
                Err(Failure::message("third run fails"))
            } else {
                Ok(count)
            }
        }
    });

    let result = action.forever().run().await;

    assert_eq!(result.unwrap_err().to_string(), "third run fails");
    assert_eq!(invocations.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_forever_survives_many_iterations() {
    // A failure after a large number of repetitions exercises the
    // constant-stack loop; naive recursion would overflow long before.
    let invocations = Arc::new(AtomicUsize::new(0));
    let invocations_clone = Arc::clone(&invocations);
    let action = Action::new(move || {
        let counter = Arc::clone(&invocations_clone);
        async move {
            let count = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if count == 100_000 {
                Err(Failure::message("done"))
            } else {
                Ok(())
            }
        }
    });

    let result = action.forever().run().await;

    assert!(result.is_err());
    assert_eq!(invocations.load(Ordering::SeqCst), 100_000);
}

// =============================================================================
// replicate
// =============================================================================

#[tokio::test]
async fn test_replicate_collects_results_in_order() {
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = Arc::clone(&counter);
    let action = Action::new(move || {
        let counter = Arc::clone(&counter_clone);
        async move { Ok(counter.fetch_add(1, Ordering::SeqCst)) }
    });

    let results = action.replicate(3).run().await.unwrap();

    assert_eq!(results, vec![0, 1, 2]);
    assert_eq!(counter.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_replicate_zero_performs_no_effect() {
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = Arc::clone(&counter);
    let action = Action::new(move || {
        let counter = Arc::clone(&counter_clone);
        async move { Ok(counter.fetch_add(1, Ordering::SeqCst)) }
    });

    let results = action.replicate(0).run().await.unwrap();

    assert!(results.is_empty());
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

// =============================================================================
// delay
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_delay_suspends_for_at_least_the_duration() {
    let start = tokio::time::Instant::now();
    Action::delay(Duration::from_millis(200)).run().await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn test_delayed_defers_the_action() {
    let executed = Arc::new(AtomicBool::new(false));
    let executed_clone = Arc::clone(&executed);
    let action = Action::new(move || {
        let flag = Arc::clone(&executed_clone);
        async move {
            flag.store(true, Ordering::SeqCst);
            Ok(42)
        }
    })
    .delayed(Duration::from_millis(100));

    let start = tokio::time::Instant::now();
    let result = action.run().await.unwrap();

    assert_eq!(result, 42);
    assert!(executed.load(Ordering::SeqCst));
    assert!(start.elapsed() >= Duration::from_millis(100));
}

// =============================================================================
// map2 is sequential, unlike all
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_map2_runs_operands_in_sequence() {
    let order = Arc::new(Mutex::new(Vec::new()));
    // The first operand sleeps longer; under concurrent execution the
    // second would record first. Sequencing keeps program order.
    let first = recording(&order, 1, 100);
    let second = recording(&order, 2, 10);

    let start = tokio::time::Instant::now();
    let sum = first.map2(second, |a, b| a + b).run().await.unwrap();

    assert_eq!(sum, 3);
    assert_eq!(*order.lock().unwrap(), vec![1, 2]);
    assert!(start.elapsed() >= Duration::from_millis(110));
}

// =============================================================================
// guard / when / unless
// =============================================================================

#[tokio::test]
async fn test_guard_aborts_the_rest_of_a_chain() {
    let touched = Arc::new(AtomicBool::new(false));
    let touched_clone = Arc::clone(&touched);
    let downstream = Action::new(move || {
        let flag = Arc::clone(&touched_clone);
        async move {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        }
    });

    let chain = Action::pure(5)
        .flat_map(|value| Action::guard(value > 10))
        .then(downstream);

    let result = chain.run().await;

    assert!(result.is_err());
    assert!(!touched.load(Ordering::SeqCst));
}

#[rstest]
#[case(true, 1)]
#[case(false, 0)]
#[tokio::test]
async fn test_when_runs_action_only_when_condition_holds(
    #[case] condition: bool,
    #[case] expected_runs: usize,
) {
    let runs = Arc::new(AtomicUsize::new(0));
    let runs_clone = Arc::clone(&runs);
    let action = Action::new(move || {
        let runs = Arc::clone(&runs_clone);
        async move {
            runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });

    action.when(condition).run().await.unwrap();

    assert_eq!(runs.load(Ordering::SeqCst), expected_runs);
}

#[rstest]
#[case(true, 0)]
#[case(false, 1)]
#[tokio::test]
async fn test_unless_is_the_negation_of_when(
    #[case] condition: bool,
    #[case] expected_runs: usize,
) {
    let runs = Arc::new(AtomicUsize::new(0));
    let runs_clone = Arc::clone(&runs);
    let action = Action::new(move || {
        let runs = Arc::clone(&runs_clone);
        async move {
            runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });

    action.unless(condition).run().await.unwrap();

    assert_eq!(runs.load(Ordering::SeqCst), expected_runs);
}
