//! Log follower behaviour against a real file.

use std::io::Write;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use vodtop_tracker::{LogFollower, StartPosition, TailError};

const POLL: Duration = Duration::from_millis(10);
const WAIT: Duration = Duration::from_secs(5);

async fn recv(rx: &mut mpsc::Receiver<String>) -> String {
    timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for line")
        .expect("follower channel closed")
}

#[tokio::test]
async fn missing_log_is_fatal_at_open() {
    let dir = tempfile::tempdir().unwrap();
    let result = LogFollower::open(dir.path().join("absent.log"), StartPosition::End).await;
    assert!(matches!(result, Err(TailError::Open { .. })));
}

#[tokio::test]
async fn follows_appended_lines() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "before start").unwrap();

    let follower = LogFollower::open(file.path(), StartPosition::End)
        .await
        .unwrap()
        .with_poll_interval(POLL);
    let (tx, mut rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();
    let handle = follower.spawn(tx, cancel.clone());

    writeln!(file, "one").unwrap();
    writeln!(file, "two").unwrap();
    file.flush().unwrap();

    assert_eq!(recv(&mut rx).await, "one");
    assert_eq!(recv(&mut rx).await, "two");

    cancel.cancel();
    timeout(WAIT, handle).await.unwrap().unwrap();
}

#[tokio::test]
async fn rewinds_after_truncation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "a fairly long first line").unwrap();
    file.flush().unwrap();

    let follower = LogFollower::open(file.path(), StartPosition::Beginning)
        .await
        .unwrap()
        .with_poll_interval(POLL);
    let (tx, mut rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();
    let handle = follower.spawn(tx, cancel.clone());

    assert_eq!(recv(&mut rx).await, "a fairly long first line");

    file.as_file().set_len(0).unwrap();
    // Give the follower a poll to notice the shrink before new data lands.
    tokio::time::sleep(POLL * 5).await;
    std::fs::write(file.path(), "short\n").unwrap();

    assert_eq!(recv(&mut rx).await, "short");

    cancel.cancel();
    timeout(WAIT, handle).await.unwrap().unwrap();
}

#[tokio::test]
async fn invalid_utf8_line_does_not_hide_later_truncation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let follower = LogFollower::open(file.path(), StartPosition::Beginning)
        .await
        .unwrap()
        .with_poll_interval(POLL);
    let (tx, mut rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();
    let handle = follower.spawn(tx, cancel.clone());

    let mut garbled = vec![0xFF_u8; 200];
    garbled.push(b'\n');
    file.write_all(&garbled).unwrap();
    writeln!(file, "ok").unwrap();
    file.flush().unwrap();

    assert_eq!(recv(&mut rx).await, "\u{FFFD}".repeat(200));
    assert_eq!(recv(&mut rx).await, "ok");

    std::fs::write(file.path(), "after truncate line\n").unwrap();

    assert_eq!(recv(&mut rx).await, "after truncate line");

    cancel.cancel();
    timeout(WAIT, handle).await.unwrap().unwrap();
}

#[tokio::test]
async fn stops_when_receiver_dropped() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let follower = LogFollower::open(file.path(), StartPosition::Beginning)
        .await
        .unwrap()
        .with_poll_interval(POLL);
    let (tx, rx) = mpsc::channel(1);
    let handle = follower.spawn(tx, CancellationToken::new());

    drop(rx);
    writeln!(file, "nobody listening").unwrap();
    file.flush().unwrap();

    timeout(WAIT, handle).await.unwrap().unwrap();
}
