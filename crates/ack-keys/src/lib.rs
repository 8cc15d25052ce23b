pub mod curve;
pub mod encoding;
pub mod error;
pub mod jwk;
pub mod keypair;
pub mod public_key;
pub mod signing;

pub use curve::KeyCurve;
pub use encoding::{bytes_to_multibase, multibase_to_bytes, MultibaseEncoding};
pub use error::KeyError;
pub use jwk::{jwk_to_keypair, keypair_to_jwk, PrivateKeyJwk, PublicKeyJwk};
pub use keypair::Keypair;
pub use public_key::{
    decode_public_key, encode_public_key, encode_public_key_from_keypair, is_valid_public_key,
    PublicKeyEncoding, PublicKeyValue, PublicKeyWithEncoding,
};
pub use signing::{sign, verify};
