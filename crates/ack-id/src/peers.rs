use chrono::Utc;
use dashmap::DashMap;

use ack_vc::{Verifiable, W3CCredential};

use crate::error::HandshakeError;

/// A counterparty that completed a handshake.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedPeer {
    pub did: String,
    pub vc: Verifiable<W3CCredential>,
    /// Seconds since the epoch.
    pub authenticated_at: i64,
}

impl AuthenticatedPeer {
    pub fn new(did: impl Into<String>, vc: Verifiable<W3CCredential>) -> Self {
        Self {
            did: did.into(),
            vc,
            authenticated_at: Utc::now().timestamp(),
        }
    }
}

/// Counterparties authenticated in this process, keyed by DID.
#[derive(Debug, Default)]
pub struct AuthenticatedPeers {
    peers: DashMap<String, AuthenticatedPeer>,
}

impl AuthenticatedPeers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a peer, replacing an earlier entry for the same DID.
    pub fn insert(&self, peer: AuthenticatedPeer) {
        tracing::info!(did = %peer.did, "Peer authenticated");
        self.peers.insert(peer.did.clone(), peer);
    }

    pub fn contains(&self, did: &str) -> bool {
        self.peers.contains_key(did)
    }

    pub fn get(&self, did: &str) -> Option<AuthenticatedPeer> {
        self.peers.get(did).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, did: &str) -> Option<AuthenticatedPeer> {
        self.peers.remove(did).map(|(_, peer)| peer)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

/// Seen handshake `jti` values, kept until their token expires.
///
/// In memory only: a restart forgets everything, and separate processes do
/// not share state.
#[derive(Debug, Default)]
pub struct ReplayGuard {
    seen: DashMap<String, i64>,
}

impl ReplayGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `jti`, failing if it was already seen and has not expired.
    pub fn check(&self, jti: &str, exp: i64) -> Result<(), HandshakeError> {
        self.check_at(jti, exp, Utc::now().timestamp())
    }

    fn check_at(&self, jti: &str, exp: i64, now: i64) -> Result<(), HandshakeError> {
        use dashmap::mapref::entry::Entry;

        match self.seen.entry(jti.to_string()) {
            Entry::Occupied(mut entry) => {
                if *entry.get() > now {
                    tracing::warn!(jti = jti, "Rejected replayed handshake token");
                    return Err(HandshakeError::Replay(jti.to_string()));
                }
                entry.insert(exp);
            }
            Entry::Vacant(entry) => {
                entry.insert(exp);
            }
        }
        Ok(())
    }

    /// Forget expired entries. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now().timestamp();
        let before = self.seen.len();
        self.seen.retain(|_, exp| *exp > now);
        before - self.seen.len()
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
