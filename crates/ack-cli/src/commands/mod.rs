pub mod did_key;
pub mod init;
pub mod keygen;
pub mod resolve;
pub mod verify_credential;
pub mod verify_jwt;
