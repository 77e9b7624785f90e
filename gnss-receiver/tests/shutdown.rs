#![cfg(unix)]

use gnss_receiver::shutdown::cancel_on_signal;
use std::{process::Command, time::Duration};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn sigterm_cancels_the_token() {
    let token = CancellationToken::new();
    let handle = cancel_on_signal(token.clone()).unwrap();
    assert!(!token.is_cancelled());

    let status = Command::new("kill")
        .args(["-TERM", &std::process::id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    tokio::time::timeout(Duration::from_secs(5), token.cancelled())
        .await
        .expect("token was not cancelled after SIGTERM");
    handle.await.unwrap();
}
