// SPDX-License-Identifier: MIT

use super::*;
use tempfile::tempdir;

fn shared_release(capacity: usize) -> (mpsc::Sender<()>, SharedReleaseRx) {
    let (tx, rx) = mpsc::channel(capacity);
    (tx, Arc::new(Mutex::new(rx)))
}

#[tokio::test]
async fn try_create_writes_nonce_and_generation_zero() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("x.lock");
    let nonce = Uuid::new_v4();

    try_create(&lock_path, nonce).await.unwrap();

    let contents = tokio::fs::read_to_string(&lock_path).await.unwrap();
    assert_eq!(contents, format!("{nonce} 0"));
}

#[tokio::test]
async fn try_create_fails_already_locked_when_file_exists() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("x.lock");
    tokio::fs::write(&lock_path, b"held").await.unwrap();

    let result = try_create(&lock_path, Uuid::new_v4()).await;
    assert!(matches!(result, Err(LockError::AlreadyLocked { .. })));
}

#[tokio::test]
async fn acquired_lock_is_removed_on_release() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("x");
    let lock_path = lock_path_for(&target);

    let (release_tx, shared_rx) = shared_release(1);
    let (result_tx, mut result_rx) = mpsc::channel(1);
    spawn(target, Uuid::new_v4(), result_tx, shared_rx);

    assert!(matches!(result_rx.recv().await, Some(LockOutcome::Acquired)));
    assert!(tokio::fs::metadata(&lock_path).await.is_ok());

    release_tx.send(()).await.unwrap();
    // Give the spawned task a chance to process the release.
    for _ in 0..100 {
        if tokio::fs::metadata(&lock_path).await.is_err() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(tokio::fs::metadata(&lock_path).await.is_err());
}

#[tokio::test]
async fn contended_lock_reports_contended_and_leaves_file_in_place() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("x");
    let lock_path = lock_path_for(&target);
    tokio::fs::write(&lock_path, b"12345 7").await.unwrap();

    let (release_tx, shared_rx) = shared_release(1);
    let (result_tx, mut result_rx) = mpsc::channel(1);
    spawn(target, Uuid::new_v4(), result_tx, shared_rx);

    assert!(matches!(
        result_rx.recv().await,
        Some(LockOutcome::Contended)
    ));
    assert!(tokio::fs::metadata(&lock_path).await.is_ok());
    release_tx.send(()).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn stale_lock_is_removed_after_the_quiescence_window() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("x");
    let lock_path = lock_path_for(&target);
    tokio::fs::write(&lock_path, b"frozen-holder 3")
        .await
        .unwrap();

    let (release_tx, shared_rx) = shared_release(1);
    let (result_tx, mut result_rx) = mpsc::channel(1);
    spawn(target, Uuid::new_v4(), result_tx, shared_rx);
    assert!(matches!(
        result_rx.recv().await,
        Some(LockOutcome::Contended)
    ));

    tokio::time::advance(STALE_AFTER + Duration::from_secs(1)).await;
    for _ in 0..100 {
        if tokio::fs::metadata(&lock_path).await.is_err() {
            break;
        }
        tokio::task::yield_now().await;
    }

    assert!(tokio::fs::metadata(&lock_path).await.is_err());
    release_tx.send(()).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn held_lock_refreshes_contents_on_the_refresh_interval() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("x");
    let lock_path = lock_path_for(&target);

    let (release_tx, shared_rx) = shared_release(1);
    let (result_tx, mut result_rx) = mpsc::channel(1);
    let nonce = Uuid::new_v4();
    spawn(target, nonce, result_tx, shared_rx);
    assert!(matches!(result_rx.recv().await, Some(LockOutcome::Acquired)));

    let initial = tokio::fs::read_to_string(&lock_path).await.unwrap();
    assert_eq!(initial, format!("{nonce} 0"));

    tokio::time::advance(REFRESH_INTERVAL + Duration::from_secs(1)).await;
    let mut refreshed = initial.clone();
    for _ in 0..100 {
        refreshed = tokio::fs::read_to_string(&lock_path).await.unwrap();
        if refreshed != initial {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(refreshed, format!("{nonce} 1"));

    release_tx.send(()).await.unwrap();
}