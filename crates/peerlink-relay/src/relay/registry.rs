//! Connection registry.
//!
//! Tracks live connections keyed by a generated identifier, each paired with
//! a mutable display name and the sender side of its outbound frame queue.
//! Identifiers come from a process-lifetime counter, so they are unique for
//! the registry's lifetime and never reused while it is alive.

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use dashmap::DashMap;
use tokio::sync::mpsc;

/// Registry identifier carried in `welcome`/`users` and `from`/`to` fields.
pub type ConnId = String;

/// One connection's outbound queue sender plus its display name.
#[derive(Clone)]
pub struct Connection {
    pub tx: mpsc::Sender<Bytes>,
    pub name: String,
}

#[derive(Clone)]
struct Entry {
    conn: Connection,
    admitted_seq: u64,
}

/// Connection registry: `id -> {outbound queue, display name}`.
#[derive(Default)]
pub struct Registry {
    conns: DashMap<ConnId, Entry>,
    seq: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            conns: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    /// Admit a connection: generate a fresh identifier and store it with an
    /// empty display name.
    pub fn admit(&self, tx: mpsc::Sender<Bytes>) -> ConnId {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let id = format!("peer-{seq:x}");
        self.conns.insert(
            id.clone(),
            Entry {
                conn: Connection {
                    tx,
                    name: String::new(),
                },
                admitted_seq: seq,
            },
        );
        id
    }

    pub fn lookup(&self, id: &str) -> Option<Connection> {
        self.conns.get(id).map(|e| e.value().conn.clone())
    }

    /// Remove `id`; returns false when it was already gone.
    pub fn remove(&self, id: &str) -> bool {
        self.conns.remove(id).is_some()
    }

    /// Update the display name; returns false for an unknown id.
    pub fn set_name(&self, id: &str, name: &str) -> bool {
        match self.conns.get_mut(id) {
            Some(mut e) => {
                e.value_mut().conn.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// `(id, name)` pairs ordered by admission.
    pub fn snapshot(&self) -> Vec<(ConnId, String)> {
        let mut rows: Vec<(u64, ConnId, String)> = self
            .conns
            .iter()
            .map(|e| {
                (
                    e.value().admitted_seq,
                    e.key().clone(),
                    e.value().conn.name.clone(),
                )
            })
            .collect();
        rows.sort_unstable_by_key(|(seq, _, _)| *seq);
        rows.into_iter().map(|(_, id, name)| (id, name)).collect()
    }

    /// Queue a pre-encoded frame to every registered connection.
    /// Best-effort: a full or closed queue drops that connection's copy.
    pub fn broadcast(&self, frame: Bytes) {
        for e in self.conns.iter() {
            let _ = e.value().conn.tx.try_send(frame.clone());
        }
    }

    /// Queue a pre-encoded frame to one connection. Returns false (and sends
    /// nothing) when `id` is not registered.
    pub fn send_to(&self, id: &str, frame: Bytes) -> bool {
        match self.conns.get(id) {
            Some(e) => {
                let _ = e.value().conn.tx.try_send(frame);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.conns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conns.is_empty()
    }
}
