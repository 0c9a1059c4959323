//! Integration tests for the action core: deferral, re-execution, and the
//! monadic operator set.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use deferio::effect::Action;

/// An action that counts its own executions and succeeds with the count.
fn counting(counter: &Arc<AtomicUsize>) -> Action<usize> {
    let counter = Arc::clone(counter);
    Action::new(move || {
        let counter = Arc::clone(&counter);
        async move { Ok(counter.fetch_add(1, Ordering::SeqCst) + 1) }
    })
}

// =============================================================================
// Deferral
// =============================================================================

#[tokio::test]
async fn test_building_an_action_performs_no_effect() {
    let counter = Arc::new(AtomicUsize::new(0));
    let action = counting(&counter);

    assert_eq!(counter.load(Ordering::SeqCst), 0);

    assert_eq!(action.run().await.unwrap(), 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_combining_actions_performs_no_effect() {
    let counter = Arc::new(AtomicUsize::new(0));
    let combined = counting(&counter)
        .fmap(|count| count * 10)
        .flat_map(|count| Action::pure(count + 1))
        .then(Action::pure(0))
        .catch(|_| Action::pure(0));

    // A whole graph was built, nothing ran.
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    combined.run().await.unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Re-execution
// =============================================================================

#[tokio::test]
async fn test_running_twice_re_performs_the_effect() {
    let counter = Arc::new(AtomicUsize::new(0));
    let action = counting(&counter);

    assert_eq!(action.run().await.unwrap(), 1);
    assert_eq!(action.run().await.unwrap(), 2);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_clones_share_the_effect_not_its_results() {
    let counter = Arc::new(AtomicUsize::new(0));
    let action = counting(&counter);
    let cloned = action.clone();

    assert_eq!(action.run().await.unwrap(), 1);
    assert_eq!(cloned.run().await.unwrap(), 2);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_derived_actions_re_run_their_inputs() {
    let counter = Arc::new(AtomicUsize::new(0));
    let derived = counting(&counter).fmap(|count| count * 10);

    assert_eq!(derived.run().await.unwrap(), 10);
    assert_eq!(derived.run().await.unwrap(), 20);
}

// =============================================================================
// Sequencing order
// =============================================================================

#[tokio::test]
async fn test_flat_map_sequences_with_data_dependency() {
    let counter = Arc::new(AtomicUsize::new(0));
    let first = counting(&counter);
    let chain = first.flat_map(move |count| Action::pure(count).fmap(|count| count * 100));

    assert_eq!(chain.run().await.unwrap(), 100);
}

#[tokio::test]
async fn test_then_discards_but_still_executes_the_first() {
    let counter = Arc::new(AtomicUsize::new(0));
    let chain = counting(&counter).then(Action::pure("done"));

    assert_eq!(chain.run().await.unwrap(), "done");
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_apply_runs_the_function_action_first() {
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));

    let function_order = Arc::clone(&order);
    let function_action = Action::new(move || {
        let order = Arc::clone(&function_order);
        async move {
            order.lock().unwrap().push("function");
            Ok(|x: i32| x * 2)
        }
    });

    let value_order = Arc::clone(&order);
    let value_action = Action::new(move || {
        let order = Arc::clone(&value_order);
        async move {
            order.lock().unwrap().push("value");
            Ok(21)
        }
    });

    let result = value_action.apply(function_action).run().await.unwrap();

    assert_eq!(result, 42);
    assert_eq!(*order.lock().unwrap(), vec!["function", "value"]);
}

// =============================================================================
// spawn
// =============================================================================

#[tokio::test]
async fn test_spawn_returns_a_waitable_handle() {
    let counter = Arc::new(AtomicUsize::new(0));
    let handle = counting(&counter).spawn();

    let outcome = handle.await.unwrap();
    assert_eq!(outcome.unwrap(), 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}
