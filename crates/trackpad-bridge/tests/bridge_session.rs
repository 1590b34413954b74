//! End-to-end tests: a real WebSocket client talks to the bridge, and a fake
//! injector reads the JSON lines the bridge forwards.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use trackpad_bridge::domain::{BridgeConfig, BridgeToBrowserMsg, BrowserToBridgeMsg};
use trackpad_bridge::infrastructure::serve;
use trackpad_core::{Action, MouseButton, Settings, TouchPoint};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const STEP: Duration = Duration::from_secs(5);

struct Harness {
    client: Client,
    upstream: Lines<BufReader<OwnedReadHalf>>,
    running: Arc<AtomicBool>,
}

impl Harness {
    async fn start() -> Self {
        let injector = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let upstream_addr = injector.local_addr().unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let ws_addr: SocketAddr = listener.local_addr().unwrap();
        let config = BridgeConfig {
            ws_bind_addr: ws_addr,
            upstream_addr: Some(upstream_addr),
            default_settings: Settings::default(),
        };
        let running = Arc::new(AtomicBool::new(true));
        tokio::spawn(serve(listener, config, Arc::clone(&running)));

        let (client, _) = timeout(STEP, connect_async(format!("ws://{ws_addr}")))
            .await
            .unwrap()
            .unwrap();
        let (stream, _) = timeout(STEP, injector.accept()).await.unwrap().unwrap();
        let (read_half, _write_half) = stream.into_split();

        Self {
            client,
            upstream: BufReader::new(read_half).lines(),
            running,
        }
    }

    async fn send(&mut self, msg: &BrowserToBridgeMsg) {
        let json = serde_json::to_string(msg).unwrap();
        self.client.send(Message::Text(json)).await.unwrap();
    }

    async fn recv(&mut self) -> BridgeToBrowserMsg {
        loop {
            let frame = timeout(STEP, self.client.next())
                .await
                .unwrap()
                .unwrap()
                .unwrap();
            if let Message::Text(json) = frame {
                return serde_json::from_str(&json).unwrap();
            }
        }
    }

    async fn next_action(&mut self) -> Action {
        let line = timeout(STEP, self.upstream.next_line())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        serde_json::from_str(&line).unwrap()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

fn finger(x: f64, y: f64) -> Vec<TouchPoint> {
    vec![TouchPoint::new(0, x, y)]
}

fn left(press: bool) -> Action {
    Action::Click {
        button: MouseButton::Left,
        press,
    }
}

#[tokio::test]
async fn test_tap_clicks_and_releases_after_window() {
    // Arrange
    let mut h = Harness::start().await;

    // Act: a quick tap
    h.send(&BrowserToBridgeMsg::TouchStart {
        touches: finger(100.0, 100.0),
        timestamp: 1_000.0,
    })
    .await;
    assert_eq!(h.recv().await, BridgeToBrowserMsg::Tracking { active: true });

    let lifted = Instant::now();
    h.send(&BrowserToBridgeMsg::TouchEnd {
        touches: finger(100.0, 100.0),
        timestamp: 1_060.0,
    })
    .await;
    assert_eq!(h.recv().await, BridgeToBrowserMsg::Tracking { active: false });

    // Assert: press now, release once the drag window has passed
    assert_eq!(h.next_action().await, left(true));
    assert_eq!(h.next_action().await, left(false));
    assert!(lifted.elapsed() >= Duration::from_millis(250));
}

#[tokio::test]
async fn test_movement_is_forwarded() {
    let mut h = Harness::start().await;

    h.send(&BrowserToBridgeMsg::TouchStart {
        touches: finger(0.0, 0.0),
        timestamp: 1_000.0,
    })
    .await;
    h.recv().await;
    h.send(&BrowserToBridgeMsg::TouchMove {
        touches: finger(30.0, 0.0),
        timestamp: 1_016.0,
    })
    .await;

    match h.next_action().await {
        Action::Move { dx, dy } => {
            assert!(dx > 30.0, "fast movement is accelerated, got {dx}");
            assert_eq!(dy, 0.0);
        }
        other => panic!("expected Move, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_settings_reply_with_error() {
    let mut h = Harness::start().await;

    h.send(&BrowserToBridgeMsg::Settings {
        sensitivity: -1.0,
        invert_scroll: false,
    })
    .await;

    assert!(matches!(h.recv().await, BridgeToBrowserMsg::Error { .. }));

    // The session survives and still acknowledges valid settings.
    h.send(&BrowserToBridgeMsg::Settings {
        sensitivity: 1.5,
        invert_scroll: true,
    })
    .await;
    assert_eq!(
        h.recv().await,
        BridgeToBrowserMsg::SettingsAck {
            sensitivity: 1.5,
            invert_scroll: true
        }
    );
}

#[tokio::test]
async fn test_disconnect_releases_held_button() {
    let mut h = Harness::start().await;
    h.send(&BrowserToBridgeMsg::TouchStart {
        touches: finger(5.0, 5.0),
        timestamp: 1_000.0,
    })
    .await;
    h.recv().await;
    h.send(&BrowserToBridgeMsg::TouchEnd {
        touches: finger(5.0, 5.0),
        timestamp: 1_040.0,
    })
    .await;
    h.recv().await;

    // Act: leave before the release window ends
    h.client.close(None).await.unwrap();

    // Assert
    assert_eq!(h.next_action().await, left(true));
    assert_eq!(h.next_action().await, left(false));
    let end = timeout(STEP, h.upstream.next_line()).await.unwrap().unwrap();
    assert!(end.is_none(), "forwarder closes the upstream after the session");
}

#[tokio::test]
async fn test_combo_reaches_upstream() {
    let mut h = Harness::start().await;

    h.send(&serde_json::from_str(r#"{"type":"Modifier","state":"active"}"#).unwrap())
        .await;
    h.send(&BrowserToBridgeMsg::Key {
        key: "Control".to_string(),
    })
    .await;
    h.send(&BrowserToBridgeMsg::Text {
        text: "c".to_string(),
    })
    .await;
    h.send(&BrowserToBridgeMsg::ComboConfirm).await;

    assert_eq!(
        h.next_action().await,
        Action::Combo {
            keys: vec!["Control".to_string(), "c".to_string()]
        }
    );
}
