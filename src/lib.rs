use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;

pub mod cli;
pub mod csv;
pub mod error;
pub mod harness;
pub mod provider;
pub mod table;

pub use error::{BenchError, ProviderError};
pub use harness::{aggregate, benchmark, run, Aggregate, Invocation, TimingSeries, NO_AVERAGE};
pub use provider::{BuiltinProvider, HashProvider};
pub use table::{build_header, ResultRow, ResultTable};

/// Hash or checksum function to time.
///
/// Names are matched case-sensitively, both on the command line and in [`FromStr`].
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq, Hash)]
pub enum Algorithm {
    #[value(name = "SHA1")]
    Sha1,
    #[value(name = "SHA256")]
    Sha256,
    #[value(name = "SHA512")]
    Sha512,
    #[value(name = "MD5")]
    Md5,
    /// Adler-32 checksum.
    #[value(name = "ADLER32")]
    Adler32,
    /// CRC-32 (IEEE polynomial).
    #[value(name = "CRC32")]
    Crc32,
    /// CRC-32C (Castagnoli polynomial).
    #[value(name = "CRC32C")]
    Crc32c,
    /// FarmHash 64-bit fingerprint.
    #[value(name = "FARMHASHFINGERPRINT64")]
    FarmHashFingerprint64,
    /// SipHash-2-4 with a fixed 128-bit key.
    #[value(name = "SIPHASH24")]
    SipHash24,
}

impl Algorithm {
    pub const ALL: [Algorithm; 9] = [
        Algorithm::Sha1,
        Algorithm::Sha256,
        Algorithm::Sha512,
        Algorithm::Md5,
        Algorithm::Adler32,
        Algorithm::Crc32,
        Algorithm::Crc32c,
        Algorithm::FarmHashFingerprint64,
        Algorithm::SipHash24,
    ];

    /// Canonical name, used as the row label in the result table.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Sha1 => "SHA1",
            Algorithm::Sha256 => "SHA256",
            Algorithm::Sha512 => "SHA512",
            Algorithm::Md5 => "MD5",
            Algorithm::Adler32 => "ADLER32",
            Algorithm::Crc32 => "CRC32",
            Algorithm::Crc32c => "CRC32C",
            Algorithm::FarmHashFingerprint64 => "FARMHASHFINGERPRINT64",
            Algorithm::SipHash24 => "SIPHASH24",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown algorithm: {0}")]
pub struct ParseAlgorithmError(pub String);

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| ParseAlgorithmError(s.to_string()))
    }
}
