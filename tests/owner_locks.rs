use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use inventory_reservation_api::locks::OwnerLocks;

const SHORT: Duration = Duration::from_millis(50);

#[tokio::test]
async fn same_owner_waits_for_release() {
    let locks = OwnerLocks::new();
    let guard = locks.acquire("alice").await;

    assert!(
        tokio::time::timeout(SHORT, locks.acquire("alice")).await.is_err(),
        "second acquire for the same owner must wait"
    );

    drop(guard);
    assert!(tokio::time::timeout(SHORT, locks.acquire("alice")).await.is_ok());
}

#[tokio::test]
async fn different_owners_do_not_block_each_other() {
    let locks = OwnerLocks::new();
    let _alice = locks.acquire("alice").await;

    let bob = tokio::time::timeout(SHORT, locks.acquire("bob")).await;
    assert!(bob.is_ok(), "bob must not wait on alice's lock");
}

#[tokio::test]
async fn entries_are_created_once_and_kept() {
    let locks = OwnerLocks::new();
    assert!(locks.is_empty());

    drop(locks.acquire("alice").await);
    drop(locks.acquire("alice").await);
    assert_eq!(locks.len(), 1);

    drop(locks.acquire("bob").await);
    assert_eq!(locks.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn same_owner_critical_sections_never_overlap() {
    let locks = Arc::new(OwnerLocks::new());
    let in_flight = Arc::new(AtomicUsize::new(0));
    let completed = Arc::new(AtomicUsize::new(0));

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let locks = Arc::clone(&locks);
        let in_flight = Arc::clone(&in_flight);
        let completed = Arc::clone(&completed);
        tasks.push(tokio::spawn(async move {
            for _ in 0..10 {
                let _guard = locks.acquire("shared-owner").await;
                let concurrent = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                assert_eq!(concurrent, 1, "two holders inside the same owner's section");
                tokio::task::yield_now().await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                completed.fetch_add(1, Ordering::SeqCst);
            }
        }));
    }

    for task in tasks {
        task.await.expect("task panicked");
    }
    assert_eq!(completed.load(Ordering::SeqCst), 160);
    assert_eq!(locks.len(), 1);
}
