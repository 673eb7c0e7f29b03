//! Stream encryption mode
//!
//! Chunk-wise authenticated encryption for content too large to buffer.
//! The ciphertext starts with a 7-byte random stream nonce, followed by
//! fixed-size encrypted chunks; every chunk carries its own authentication
//! tag and a position bound into the nonce, so chunks cannot be reordered,
//! duplicated or truncated without decryption failing. Decoding is
//! sequential: there is no random access into the stream.

use chacha20poly1305::aead::generic_array::GenericArray;
use chacha20poly1305::aead::stream::{DecryptorBE32, EncryptorBE32};
use rand::RngCore;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::CipherError;
use crate::key::ContentKey;

/// Stream nonce size: the cipher nonce minus the 4-byte chunk counter and
/// 1-byte last-chunk flag
pub const STREAM_NONCE_SIZE: usize = 7;

/// Plaintext bytes per encrypted chunk
pub const PLAIN_CHUNK_SIZE: usize = 64 * 1024;

/// Authentication tag appended to every chunk
const TAG_SIZE: usize = 16;

/// Ciphertext bytes per full chunk
const SEALED_CHUNK_SIZE: usize = PLAIN_CHUNK_SIZE + TAG_SIZE;

/// Read until `size` bytes are filled or the stream ends
async fn read_full_chunk<R: AsyncRead + Unpin>(
    reader: &mut R,
    size: usize,
) -> Result<Vec<u8>, CipherError> {
    let mut buf = vec![0u8; size];
    let mut filled = 0;
    while filled < size {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    buf.truncate(filled);
    Ok(buf)
}

/// Encrypt a byte stream.
///
/// Writes the stream nonce header, then each chunk as it is read. Returns
/// the total ciphertext bytes written. The reader is consumed to its end;
/// an empty input still produces a valid (single empty chunk) stream.
pub async fn encrypt_stream<R, W>(
    mut reader: R,
    mut writer: W,
    key: &ContentKey,
) -> Result<u64, CipherError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut nonce = [0u8; STREAM_NONCE_SIZE];
    rand::rng().fill_bytes(&mut nonce);
    writer.write_all(&nonce).await?;
    let mut written = STREAM_NONCE_SIZE as u64;

    let mut encryptor = EncryptorBE32::from_aead(key.aead(), GenericArray::from_slice(&nonce));

    // one chunk of lookahead so the final chunk is sealed as the last one
    let mut current = read_full_chunk(&mut reader, PLAIN_CHUNK_SIZE).await?;
    loop {
        let next = read_full_chunk(&mut reader, PLAIN_CHUNK_SIZE).await?;
        if next.is_empty() {
            let sealed = encryptor
                .encrypt_last(current.as_slice())
                .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;
            writer.write_all(&sealed).await?;
            written += sealed.len() as u64;
            break;
        }

        let sealed = encryptor
            .encrypt_next(current.as_slice())
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;
        writer.write_all(&sealed).await?;
        written += sealed.len() as u64;
        current = next;
    }

    writer.flush().await?;
    Ok(written)
}

/// Decrypt a byte stream produced by [`encrypt_stream`].
///
/// Reads the nonce header, then consumes ciphertext chunk by chunk,
/// writing verified plaintext as it goes. Fails on a short header, a
/// truncated chunk, or any authentication failure; nothing unverified is
/// ever written. Returns the total plaintext bytes written.
pub async fn decrypt_stream<R, W>(
    mut reader: R,
    mut writer: W,
    key: &ContentKey,
) -> Result<u64, CipherError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let header = read_full_chunk(&mut reader, STREAM_NONCE_SIZE).await?;
    if header.len() < STREAM_NONCE_SIZE {
        return Err(CipherError::DataTooShort {
            expected: STREAM_NONCE_SIZE,
            actual: header.len(),
        });
    }

    let mut decryptor = DecryptorBE32::from_aead(key.aead(), GenericArray::from_slice(&header));
    let mut written = 0u64;

    let mut current = read_full_chunk(&mut reader, SEALED_CHUNK_SIZE).await?;
    loop {
        let next = read_full_chunk(&mut reader, SEALED_CHUNK_SIZE).await?;
        if next.is_empty() {
            // final chunk: must at least carry its tag
            if current.len() < TAG_SIZE {
                return Err(CipherError::DecryptionFailed(
                    "truncated stream: final chunk shorter than its tag".to_string(),
                ));
            }
            let plain = decryptor
                .decrypt_last(current.as_slice())
                .map_err(|_| {
                    CipherError::DecryptionFailed("authentication failed".to_string())
                })?;
            writer.write_all(&plain).await?;
            written += plain.len() as u64;
            break;
        }

        let plain = decryptor
            .decrypt_next(current.as_slice())
            .map_err(|_| CipherError::DecryptionFailed("authentication failed".to_string()))?;
        writer.write_all(&plain).await?;
        written += plain.len() as u64;
        current = next;
    }

    writer.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    async fn roundtrip(plaintext: &[u8], key: &ContentKey) -> Vec<u8> {
        let mut sealed = Vec::new();
        encrypt_stream(Cursor::new(plaintext.to_vec()), &mut sealed, key)
            .await
            .unwrap();

        let mut opened = Vec::new();
        decrypt_stream(Cursor::new(sealed), &mut opened, key)
            .await
            .unwrap();
        opened
    }

    #[tokio::test]
    async fn test_small_stream_roundtrip() {
        let key = ContentKey::generate();
        assert_eq!(roundtrip(b"streamed secret", &key).await, b"streamed secret");
    }

    #[tokio::test]
    async fn test_empty_stream_roundtrip() {
        let key = ContentKey::generate();
        assert_eq!(roundtrip(b"", &key).await, b"");
    }

    #[tokio::test]
    async fn test_multi_chunk_roundtrip() {
        let key = ContentKey::generate();
        // three full chunks plus a ragged tail
        let plaintext: Vec<u8> = (0..PLAIN_CHUNK_SIZE * 3 + 1234)
            .map(|i| (i % 251) as u8)
            .collect();
        assert_eq!(roundtrip(&plaintext, &key).await, plaintext);
    }

    #[tokio::test]
    async fn test_exact_chunk_boundary_roundtrip() {
        let key = ContentKey::generate();
        let plaintext = vec![0x5Au8; PLAIN_CHUNK_SIZE * 2];
        assert_eq!(roundtrip(&plaintext, &key).await, plaintext);
    }

    #[tokio::test]
    async fn test_wrong_key_fails() {
        let key = ContentKey::generate();
        let mut sealed = Vec::new();
        encrypt_stream(Cursor::new(b"secret".to_vec()), &mut sealed, &key)
            .await
            .unwrap();

        let mut out = Vec::new();
        let result = decrypt_stream(Cursor::new(sealed), &mut out, &ContentKey::generate()).await;
        assert!(matches!(result, Err(CipherError::DecryptionFailed(_))));
    }

    #[tokio::test]
    async fn test_tampered_chunk_fails() {
        let key = ContentKey::generate();
        let mut sealed = Vec::new();
        encrypt_stream(
            Cursor::new(vec![7u8; PLAIN_CHUNK_SIZE + 100]),
            &mut sealed,
            &key,
        )
        .await
        .unwrap();

        // flip one byte in the middle of the first chunk's ciphertext
        sealed[STREAM_NONCE_SIZE + 42] ^= 0xFF;

        let mut out = Vec::new();
        let result = decrypt_stream(Cursor::new(sealed), &mut out, &key).await;
        assert!(matches!(result, Err(CipherError::DecryptionFailed(_))));
    }

    #[tokio::test]
    async fn test_reordered_chunks_fail() {
        let key = ContentKey::generate();
        let mut sealed = Vec::new();
        encrypt_stream(
            Cursor::new(vec![9u8; PLAIN_CHUNK_SIZE * 3]),
            &mut sealed,
            &key,
        )
        .await
        .unwrap();

        // swap the first two full ciphertext chunks; the position binding
        // must reject them
        let body = &mut sealed[STREAM_NONCE_SIZE..];
        let (first, rest) = body.split_at_mut(SEALED_CHUNK_SIZE);
        first.swap_with_slice(&mut rest[..SEALED_CHUNK_SIZE]);

        let mut out = Vec::new();
        let result = decrypt_stream(Cursor::new(sealed), &mut out, &key).await;
        assert!(matches!(result, Err(CipherError::DecryptionFailed(_))));
    }

    #[tokio::test]
    async fn test_truncated_header_fails() {
        let key = ContentKey::generate();
        let mut out = Vec::new();
        let result = decrypt_stream(Cursor::new(vec![1u8, 2, 3]), &mut out, &key).await;
        assert!(matches!(
            result,
            Err(CipherError::DataTooShort {
                expected: 7,
                actual: 3
            })
        ));
    }

    #[tokio::test]
    async fn test_truncated_body_fails() {
        let key = ContentKey::generate();
        let mut sealed = Vec::new();
        encrypt_stream(Cursor::new(vec![3u8; 1000]), &mut sealed, &key)
            .await
            .unwrap();
        sealed.truncate(STREAM_NONCE_SIZE + 8);

        let mut out = Vec::new();
        let result = decrypt_stream(Cursor::new(sealed), &mut out, &key).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_buffer_mode_cannot_open_stream_ciphertext() {
        // the encoding tag must select the right decode path; the wrong one
        // fails authentication instead of corrupting
        let key = ContentKey::generate();
        let mut sealed = Vec::new();
        encrypt_stream(Cursor::new(b"mode mismatch".to_vec()), &mut sealed, &key)
            .await
            .unwrap();

        assert!(crate::cipher::decrypt_bytes(&sealed, &key).is_err());
    }
}
