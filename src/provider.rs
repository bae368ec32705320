//! Hashing providers.
//!
//! The harness only needs "hash these bytes with that algorithm"; it never looks
//! at the digest. [`BuiltinProvider`] backs every [`Algorithm`] with a RustCrypto
//! or checksum crate through a single dispatch table.

use crate::error::ProviderError;
use crate::Algorithm;
use sha2::Digest;
use std::hash::Hasher;

/// SipHash-2-4 key halves: bytes `00 01 .. 0f` read little-endian.
const SIPHASH_K0: u64 = 0x0706_0504_0302_0100;
const SIPHASH_K1: u64 = 0x0f0e_0d0c_0b0a_0908;

pub trait HashProvider {
    fn hash(&self, algorithm: Algorithm, input: &[u8]) -> Result<Vec<u8>, ProviderError>;
}

impl<P: HashProvider + ?Sized> HashProvider for &P {
    fn hash(&self, algorithm: Algorithm, input: &[u8]) -> Result<Vec<u8>, ProviderError> {
        (**self).hash(algorithm, input)
    }
}

/// Provider covering the full [`Algorithm`] set.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinProvider;

impl HashProvider for BuiltinProvider {
    fn hash(&self, algorithm: Algorithm, input: &[u8]) -> Result<Vec<u8>, ProviderError> {
        Ok(digest_fn(algorithm)(input))
    }
}

/// Digest function for `algorithm`.
pub fn digest_fn(algorithm: Algorithm) -> fn(&[u8]) -> Vec<u8> {
    match algorithm {
        Algorithm::Sha1 => sha1_digest,
        Algorithm::Sha256 => sha256_digest,
        Algorithm::Sha512 => sha512_digest,
        Algorithm::Md5 => md5_digest,
        Algorithm::Adler32 => adler32_digest,
        Algorithm::Crc32 => crc32_digest,
        Algorithm::Crc32c => crc32c_digest,
        Algorithm::FarmHashFingerprint64 => farmhash_fingerprint64_digest,
        Algorithm::SipHash24 => siphash24_digest,
    }
}

fn sha1_digest(input: &[u8]) -> Vec<u8> {
    sha1::Sha1::digest(input).to_vec()
}

fn sha256_digest(input: &[u8]) -> Vec<u8> {
    sha2::Sha256::digest(input).to_vec()
}

fn sha512_digest(input: &[u8]) -> Vec<u8> {
    sha2::Sha512::digest(input).to_vec()
}

fn md5_digest(input: &[u8]) -> Vec<u8> {
    md5::Md5::digest(input).to_vec()
}

fn adler32_digest(input: &[u8]) -> Vec<u8> {
    adler::adler32_slice(input).to_be_bytes().to_vec()
}

fn crc32_digest(input: &[u8]) -> Vec<u8> {
    crc32fast::hash(input).to_be_bytes().to_vec()
}

fn crc32c_digest(input: &[u8]) -> Vec<u8> {
    crc32c::crc32c(input).to_be_bytes().to_vec()
}

fn farmhash_fingerprint64_digest(input: &[u8]) -> Vec<u8> {
    farmhash::fingerprint64(input).to_be_bytes().to_vec()
}

fn siphash24_digest(input: &[u8]) -> Vec<u8> {
    let mut hasher = siphasher::sip::SipHasher24::new_with_keys(SIPHASH_K0, SIPHASH_K1);
    hasher.write(input);
    hasher.finish().to_be_bytes().to_vec()
}
