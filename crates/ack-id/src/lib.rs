//! ACK-ID: agent identity over A2A
//!
//! Mutual authentication between agents through a nonce handshake carrying
//! verifiable credentials, JWS-signed messages, and the credentials and DID
//! document entries that tie an agent to its controller.

pub mod controller;
pub mod error;
pub mod message;
pub mod peers;
pub mod random;
pub mod service;
pub mod session;
pub mod sign;
pub mod verify;

pub use controller::{create_controller_credential, CreateControllerCredentialParams};
pub use error::HandshakeError;
pub use message::{canonical_json, FileContent, Message, Part, Role};
pub use peers::{AuthenticatedPeer, AuthenticatedPeers, ReplayGuard};
pub use random::{generate_random_jti, generate_random_nonce};
pub use service::{create_agent_card_service_endpoint, SERVICE_TYPE_AGENT_CARD};
pub use session::{HandshakeSession, HandshakeState};
pub use sign::{
    create_a2a_handshake_message, create_a2a_handshake_message_from_jwt, create_a2a_handshake_payload,
    create_signed_a2a_message, A2AHandshakeMessage, HandshakePayload, SignMessageOptions,
    SignedA2AMessage, DEFAULT_EXPIRES_IN_SECS,
};
pub use verify::{
    verify_a2a_handshake_message, verify_a2a_signed_message, VerifiedHandshake, VerifyA2AOptions,
};
