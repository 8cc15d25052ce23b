//! Fixtures shared by the cross-crate scenario tests: identities backed by
//! fresh keypairs and a local HTTP host for did:web documents.

use std::net::SocketAddr;
use std::sync::Arc;

use ack_core::ResolverConfig;
use ack_did::{create_did_key_uri, KeyDidResolver, PkhDidResolver, UniversalDidResolver};
use ack_jwt::{create_jwt_signer, KeypairSigner};
use ack_keys::{KeyCurve, Keypair};
use axum::{routing::get, Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;

/// A DID together with the keys that control it.
pub struct TestIdentity {
    pub did: String,
    pub keypair: Keypair,
    pub signer: KeypairSigner,
}

impl TestIdentity {
    /// A did:key identity on `curve`.
    pub fn did_key(curve: KeyCurve) -> anyhow::Result<Self> {
        let keypair = Keypair::generate(curve);
        let did = create_did_key_uri(&keypair)?.to_string();
        Ok(Self::with_did(did, keypair))
    }

    /// An identity for an externally derived DID, e.g. a did:web.
    pub fn with_did(did: impl Into<String>, keypair: Keypair) -> Self {
        let signer = create_jwt_signer(&keypair);
        Self {
            did: did.into(),
            keypair,
            signer,
        }
    }
}

/// A resolver for the self-certifying methods only; it never touches the
/// network.
pub fn offline_resolver() -> UniversalDidResolver {
    UniversalDidResolver::new()
        .with_method("key", Arc::new(KeyDidResolver))
        .with_method("pkh", Arc::new(PkhDidResolver))
}

/// The full resolver stack with default settings. Loopback hosts are served
/// over plain HTTP.
pub fn network_resolver() -> anyhow::Result<UniversalDidResolver> {
    Ok(UniversalDidResolver::from_config(&ResolverConfig::default())?)
}

/// A local HTTP host for DID documents and JWKS on 127.0.0.1.
///
/// Binding and serving are separate steps: the did:web of a hosted document
/// embeds the port, so documents can only be built once the port is known.
pub struct DocumentHost {
    listener: TcpListener,
    addr: SocketAddr,
}

impl DocumentHost {
    /// Bind an ephemeral port.
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        Ok(Self { listener, addr })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `http://127.0.0.1:<port>`
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Serve each `(path, body)` as JSON. The server task runs until the test
    /// runtime shuts down.
    pub fn serve(self, documents: Vec<(String, Value)>) {
        let mut app = Router::new();
        for (path, body) in documents {
            app = app.route(
                &path,
                get(move || {
                    let body = body.clone();
                    async move { Json(body) }
                }),
            );
        }

        let addr = self.addr;
        let listener = self.listener;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "document host stopped");
            }
        });
        tracing::debug!(%addr, "document host started");
    }
}
