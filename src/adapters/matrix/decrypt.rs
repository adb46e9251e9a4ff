//! Encrypted attachment decryption
//!
//! Matrix attachments are AES-256 in CTR mode with a 64-bit big-endian
//! counter in the low half of the IV. The key travels as a JWK (`k`,
//! unpadded url-safe base64), the IV as unpadded base64.

use crate::adapters::traits::AttachmentDecryptor;
use crate::domain::{EncryptedFile, MediaError};
use aes::Aes256;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use ctr::cipher::{KeyIvInit, StreamCipher};

type Aes256Ctr = ctr::Ctr64BE<Aes256>;

const ALGORITHM: &str = "A256CTR";

/// Decrypts `v1`/`v2` encrypted attachments
#[derive(Debug, Clone, Copy, Default)]
pub struct AesCtrDecryptor;

impl AttachmentDecryptor for AesCtrDecryptor {
    fn decrypt(&self, file: &EncryptedFile, ciphertext: &[u8]) -> Result<Vec<u8>, MediaError> {
        if file.key.alg != ALGORITHM {
            return Err(MediaError::DecryptionFailed(format!(
                "{}: unsupported algorithm {}",
                file.url, file.key.alg
            )));
        }

        let key = decode_base64(&file.key.k)
            .ok_or_else(|| MediaError::DecryptionFailed(format!("{}: malformed key", file.url)))?;
        let iv = decode_base64(&file.iv)
            .ok_or_else(|| MediaError::DecryptionFailed(format!("{}: malformed iv", file.url)))?;

        let mut cipher = Aes256Ctr::new_from_slices(&key, &iv).map_err(|_| {
            MediaError::DecryptionFailed(format!(
                "{}: expected 32-byte key and 16-byte iv, got {} and {}",
                file.url,
                key.len(),
                iv.len()
            ))
        })?;

        let mut plaintext = ciphertext.to_vec();
        cipher.apply_keystream(&mut plaintext);
        Ok(plaintext)
    }
}

/// Clients disagree on the alphabet, so accept both
fn decode_base64(input: &str) -> Option<Vec<u8>> {
    let trimmed = input.trim_end_matches('=');
    STANDARD_NO_PAD
        .decode(trimmed)
        .or_else(|_| URL_SAFE_NO_PAD.decode(trimmed))
        .ok()
}
