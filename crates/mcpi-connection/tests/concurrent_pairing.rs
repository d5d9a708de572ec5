//! Concurrent exchanges against an echoing peer must each get their own reply

use mcpi_connection::{ConnectionConfig, LineConnection, args};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// Accept one connection and echo every line back, slowly enough that
/// unserialized callers would overlap
async fn spawn_echo_peer() -> (ConnectionConfig, tokio::task::JoinHandle<usize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();
        let mut echoed = 0;
        while let Ok(Some(line)) = lines.next_line().await {
            tokio::time::sleep(Duration::from_millis(2)).await;
            if write_half
                .write_all(format!("{}\n", line).as_bytes())
                .await
                .is_err()
            {
                break;
            }
            echoed += 1;
        }
        echoed
    });

    (ConnectionConfig::new("127.0.0.1", port), handle)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_send_and_receive_pairs_responses() {
    let (config, peer) = spawn_echo_peer().await;
    let conn = Arc::new(LineConnection::new(config));
    conn.open().await.unwrap();

    let mut tasks = Vec::new();
    for id in 0..32 {
        let conn = Arc::clone(&conn);
        tasks.push(tokio::spawn(async move {
            let response = conn
                .send_and_receive("echo.request", &args![id, vec![id * 10, id * 100]])
                .await
                .unwrap();
            (id, response)
        }));
    }

    for task in tasks {
        let (id, response) = task.await.unwrap();
        let expected = format!("echo.request({},{},{})", id, id * 10, id * 100);
        assert_eq!(response.as_deref(), Some(expected.as_str()));
    }

    conn.close().await;
    assert_eq!(peer.await.unwrap(), 32);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_standalone_send_and_receive_then_exchanges() {
    let (config, peer) = spawn_echo_peer().await;
    let conn = Arc::new(LineConnection::new(config));
    conn.open().await.unwrap();

    // A standalone send leaves its echo queued until someone receives it
    let drained = {
        let conn = Arc::clone(&conn);
        tokio::spawn(async move {
            conn.send("events.clear", &[]).await.unwrap();
            conn.receive().await.unwrap()
        })
    };
    let drained = drained.await.unwrap();
    assert_eq!(drained.as_deref(), Some("events.clear()"));

    let mut tasks = Vec::new();
    for id in 0..8 {
        let conn = Arc::clone(&conn);
        tasks.push(tokio::spawn(async move {
            (id, conn.send_and_receive("world.getBlock", &args![id, 0, 0]).await.unwrap())
        }));
    }
    for task in tasks {
        let (id, response) = task.await.unwrap();
        assert_eq!(response, Some(format!("world.getBlock({},0,0)", id)));
    }

    conn.close().await;
    assert_eq!(peer.await.unwrap(), 9);
}
