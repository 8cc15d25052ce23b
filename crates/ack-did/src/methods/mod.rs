//! DID method implementations. Each method turns its identifier into a DID
//! document; network fetching for did:web lives in [`crate::resolver`].

pub mod jwks;
pub mod key;
pub mod pkh;
pub mod web;
