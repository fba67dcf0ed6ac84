//! Scripted in-process LWCP peer

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use vx_client::{Client, ClientConfig};

/// One accepted connection: records every frame, sends whatever it is told to
pub struct MockPeer {
    pub addr: SocketAddr,
    frames: mpsc::UnboundedReceiver<String>,
    outbound: mpsc::UnboundedSender<String>,
}

impl MockPeer {
    /// Listen on an ephemeral port; `greeting` is sent as soon as a client connects
    pub async fn start(greeting: &[&str]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (frames_tx, frames) = mpsc::unbounded_channel();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<String>();
        for line in greeting {
            outbound.send(line.to_string()).unwrap();
        }

        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = socket.into_split();
            let mut lines = BufReader::new(read_half).lines();
            loop {
                tokio::select! {
                    line = lines.next_line() => match line {
                        Ok(Some(line)) => {
                            if frames_tx.send(line).is_err() {
                                break;
                            }
                        }
                        _ => break,
                    },
                    out = outbound_rx.recv() => match out {
                        Some(line) => {
                            if write_half.write_all(format!("{}\n", line).as_bytes()).await.is_err() {
                                break;
                            }
                        }
                        // dropping the sender closes the connection
                        None => break,
                    },
                }
            }
        });

        Self { addr, frames, outbound }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::for_host(self.addr.ip().to_string())
            .with_port(self.addr.port())
            .with_request_timeout(Some(Duration::from_secs(2)))
    }

    pub fn send(&self, line: &str) {
        self.outbound.send(line.to_string()).unwrap();
    }

    /// Next frame written by the client
    pub async fn next_frame(&mut self) -> String {
        tokio::time::timeout(Duration::from_secs(2), self.frames.recv())
            .await
            .expect("no frame within 2s")
            .expect("peer closed")
    }

    /// Assert that the client writes nothing for a short while
    pub async fn assert_silent(&mut self) {
        let next = tokio::time::timeout(Duration::from_millis(150), self.frames.recv()).await;
        assert!(next.is_err(), "unexpected frame: {:?}", next);
    }

    /// Close the connection from the server side
    pub fn hang_up(self) -> mpsc::UnboundedReceiver<String> {
        drop(self.outbound);
        self.frames
    }
}

/// A client that is connected, logged in and has studio 1 selected
pub async fn ready_client() -> (Client, MockPeer) {
    let mut peer = MockPeer::start(&[]).await;
    let client = Client::new(peer.config()).unwrap();

    let bootstrap = {
        let client = client.clone();
        tokio::spawn(async move { client.connect_login_select().await })
    };
    assert_eq!(peer.next_frame().await, r#"login cc user="user", password="""#);
    peer.send("ack cc logged=TRUE");
    assert_eq!(peer.next_frame().await, "select studio id=1");
    peer.send(r#"ack studio id=1, name="Studio 1""#);
    bootstrap.await.unwrap().unwrap();

    (client, peer)
}
