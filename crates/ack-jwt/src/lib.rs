//! ACK JWT Codec
//!
//! Compact JWTs signed with ES256K, ES256 or EdDSA and verified against the
//! issuer's resolved DID document.

pub mod algorithm;
pub mod create;
pub mod error;
pub mod payload;
pub mod signer;
pub mod verify;

pub use algorithm::{curve_to_jwt_algorithm, is_jwt_algorithm, JwtAlgorithm};
pub use create::{create_jwt, decode_jwt, is_jwt_string, DecodedJwt, JwtOptions};
pub use error::JwtError;
pub use payload::{Audience, JwtHeader, JwtPayload};
pub use signer::{create_jwt_signer, JwtSigner, KeypairSigner};
pub use verify::{verify_jwt, JwtVerified, JwtVerifyPolicies, VerifyJwtOptions, CLOCK_SKEW_SECS};
