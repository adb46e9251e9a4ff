//! Matrix homeserver integration
//!
//! - [`media`] - Media repository client (downloads, thumbnails, encrypted attachments)
//! - [`decrypt`] - AES-CTR decryption of encrypted attachments

pub mod decrypt;
pub mod media;

pub use decrypt::AesCtrDecryptor;
pub use media::{parse_mxc, HttpMediaSource};
