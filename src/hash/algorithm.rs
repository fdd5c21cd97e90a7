//! Digest algorithm registry

use sha2::{Digest, Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};

use crate::error::{Error, Result};

/// Name of the algorithm used when none is given.
pub const DEFAULT_ALGORITHM: &str = "sha256";

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    Sha224,
    #[default]
    Sha256,
    Sha384,
    Sha512,
    Sha512_224,
    Sha512_256,
    Blake3,
}

impl Algorithm {
    pub const ALL: [Algorithm; 7] = [
        Algorithm::Sha224,
        Algorithm::Sha256,
        Algorithm::Sha384,
        Algorithm::Sha512,
        Algorithm::Sha512_224,
        Algorithm::Sha512_256,
        Algorithm::Blake3,
    ];

    pub const NAMES: [&'static str; 7] = [
        "sha224",
        "sha256",
        "sha384",
        "sha512",
        "sha512_224",
        "sha512_256",
        "blake3",
    ];

    /// Look an algorithm up by name, ignoring case; `-` and `_` are
    /// interchangeable.
    pub fn from_name(name: &str) -> Result<Self> {
        let wanted = name.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|algo| algo.name() == wanted)
            .ok_or_else(|| Error::UnknownAlgorithm(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Sha224 => "sha224",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha384 => "sha384",
            Algorithm::Sha512 => "sha512",
            Algorithm::Sha512_224 => "sha512_224",
            Algorithm::Sha512_256 => "sha512_256",
            Algorithm::Blake3 => "blake3",
        }
    }

    /// Length of the hex digest this algorithm produces.
    pub fn hex_len(self) -> usize {
        match self {
            Algorithm::Sha224 | Algorithm::Sha512_224 => 56,
            Algorithm::Sha256 | Algorithm::Sha512_256 | Algorithm::Blake3 => 64,
            Algorithm::Sha384 => 96,
            Algorithm::Sha512 => 128,
        }
    }

    /// Start a fresh digest.
    pub fn digester(self) -> Digester {
        match self {
            Algorithm::Sha224 => Digester::Sha224(Sha224::new()),
            Algorithm::Sha256 => Digester::Sha256(Sha256::new()),
            Algorithm::Sha384 => Digester::Sha384(Sha384::new()),
            Algorithm::Sha512 => Digester::Sha512(Sha512::new()),
            Algorithm::Sha512_224 => Digester::Sha512_224(Sha512_224::new()),
            Algorithm::Sha512_256 => Digester::Sha512_256(Sha512_256::new()),
            Algorithm::Blake3 => Digester::Blake3(Box::new(blake3::Hasher::new())),
        }
    }
}

/// Running digest state for one [`Algorithm`].
pub enum Digester {
    Sha224(Sha224),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
    Sha512_224(Sha512_224),
    Sha512_256(Sha512_256),
    Blake3(Box<blake3::Hasher>),
}

impl Digester {
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Digester::Sha224(h) => h.update(data),
            Digester::Sha256(h) => h.update(data),
            Digester::Sha384(h) => h.update(data),
            Digester::Sha512(h) => h.update(data),
            Digester::Sha512_224(h) => h.update(data),
            Digester::Sha512_256(h) => h.update(data),
            Digester::Blake3(h) => {
                h.update(data);
            }
        }
    }

    /// Finish and return the lowercase hex digest.
    pub fn finalize_hex(self) -> String {
        match self {
            Digester::Sha224(h) => hex::encode(h.finalize()),
            Digester::Sha256(h) => hex::encode(h.finalize()),
            Digester::Sha384(h) => hex::encode(h.finalize()),
            Digester::Sha512(h) => hex::encode(h.finalize()),
            Digester::Sha512_224(h) => hex::encode(h.finalize()),
            Digester::Sha512_256(h) => hex::encode(h.finalize()),
            Digester::Blake3(h) => hex::encode(h.finalize().as_bytes()),
        }
    }
}
