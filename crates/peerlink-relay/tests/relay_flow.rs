//! Registry, presence, and router behavior, driven through outbound queues
//! without touching a socket.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use bytes::Bytes;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use peerlink_relay::relay::{presence, router, Registry};

/// Parse one unmasked server frame back into its JSON envelope.
fn decode_server_frame(frame: &[u8]) -> Value {
    assert_eq!(frame[0], 0x81, "fin+text header");
    let sel = frame[1];
    assert_eq!(sel & 0x80, 0, "server frames are unmasked");
    let (len, off) = match sel & 0x7f {
        126 => (u16::from_be_bytes([frame[2], frame[3]]) as usize, 4usize),
        127 => (
            u64::from_be_bytes(frame[2..10].try_into().unwrap()) as usize,
            10,
        ),
        n => (n as usize, 2),
    };
    assert_eq!(frame.len(), off + len, "payload length matches header");
    serde_json::from_slice(&frame[off..off + len]).unwrap()
}

fn drain(rx: &mut mpsc::Receiver<Bytes>) -> Vec<Value> {
    let mut out = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        out.push(decode_server_frame(&frame));
    }
    out
}

fn admit(registry: &Registry) -> (String, mpsc::Receiver<Bytes>) {
    let (tx, rx) = mpsc::channel(64);
    (registry.admit(tx), rx)
}

#[test]
fn admissions_yield_unique_ids_in_snapshot_order() {
    let registry = Registry::new();
    let mut ids = Vec::new();
    let mut rxs = Vec::new();
    for _ in 0..100 {
        let (id, rx) = admit(&registry);
        ids.push(id);
        rxs.push(rx); // keep senders alive
    }

    let mut distinct = ids.clone();
    distinct.sort();
    distinct.dedup();
    assert_eq!(distinct.len(), 100);

    let snapshot: Vec<String> = registry.snapshot().into_iter().map(|(id, _)| id).collect();
    assert_eq!(snapshot, ids, "snapshot preserves admission order");
}

#[test]
fn register_updates_presence_roster() {
    let registry = Registry::new();
    let (x, mut rx_x) = admit(&registry);
    let (y, mut rx_y) = admit(&registry);

    router::dispatch(&registry, &x, r#"{"type":"register","name":"A"}"#).unwrap();

    let expected = json!([[x, "A"], [y, ""]]);
    for rx in [&mut rx_x, &mut rx_y] {
        let frames = drain(rx);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["type"], "users");
        assert_eq!(frames[0]["list"], expected);
    }
}

#[test]
fn removed_connection_leaves_the_roster() {
    let registry = Registry::new();
    let (x, _rx_x) = admit(&registry);
    let (y, mut rx_y) = admit(&registry);

    assert!(registry.remove(&x));
    assert!(!registry.remove(&x), "second removal is a no-op");
    presence::broadcast_users(&registry).unwrap();

    let frames = drain(&mut rx_y);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["list"], json!([[y, ""]]));
}

#[test]
fn unknown_target_is_a_silent_noop() {
    let registry = Registry::new();
    let (x, mut rx_x) = admit(&registry);

    let text = r#"{"type":"call-user","to":"peer-none","offer":{"sdp":"v=0"}}"#;
    router::dispatch(&registry, &x, text).unwrap();

    assert!(drain(&mut rx_x).is_empty(), "no outbound sends");
    assert_eq!(registry.len(), 1);
}

#[test]
fn send_message_fans_out_to_everyone_including_sender() {
    let registry = Registry::new();
    let (x, mut rx_x) = admit(&registry);
    let (_y, mut rx_y) = admit(&registry);
    let (_z, mut rx_z) = admit(&registry);

    router::dispatch(&registry, &x, r#"{"type":"register","name":"alice"}"#).unwrap();
    for rx in [&mut rx_x, &mut rx_y, &mut rx_z] {
        drain(rx);
    }

    router::dispatch(&registry, &x, r#"{"type":"send-message","text":"hi"}"#).unwrap();

    for rx in [&mut rx_x, &mut rx_y, &mut rx_z] {
        let frames = drain(rx);
        assert_eq!(frames.len(), 1, "exactly one copy per connection");
        assert_eq!(
            frames[0],
            json!({"type": "message", "from": "alice", "text": "hi"})
        );
    }
}

#[test]
fn targeted_envelopes_reach_only_the_target() {
    let registry = Registry::new();
    let (x, mut rx_x) = admit(&registry);
    let (y, mut rx_y) = admit(&registry);

    let offer = json!({"sdp": "v=0...", "type": "offer"});
    let text = json!({"type": "call-user", "to": y.clone(), "offer": offer.clone()}).to_string();
    router::dispatch(&registry, &x, &text).unwrap();

    assert!(drain(&mut rx_x).is_empty());
    let frames = drain(&mut rx_y);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["type"], "call-made");
    assert_eq!(frames[0]["from"], Value::String(x.clone()));
    // the offer passes through unmodified
    assert_eq!(frames[0]["offer"], offer);

    let text = json!({"type": "end-call", "to": x.clone()}).to_string();
    router::dispatch(&registry, &y, &text).unwrap();
    let frames = drain(&mut rx_x);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0], json!({"type": "call-ended", "from": y}));
}

#[test]
fn malformed_input_mutates_nothing() {
    let registry = Registry::new();
    let (x, mut rx_x) = admit(&registry);

    for text in [
        "not json at all",
        r#"{"type":"mystery"}"#,
        r#"{"type":"register"}"#,
        r#"{"no":"type tag"}"#,
        "",
    ] {
        router::dispatch(&registry, &x, text).unwrap();
    }

    assert!(drain(&mut rx_x).is_empty());
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.snapshot(), vec![(x, String::new())]);
}
