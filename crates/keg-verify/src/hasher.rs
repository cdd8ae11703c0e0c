use sha2::Digest as _;

use crate::DigestAlgorithm;

/// Incremental digest computation.
pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self: Box<Self>) -> Vec<u8>;
}

pub struct Sha256Hasher(sha2::Sha256);

impl Hasher for Sha256Hasher {
    fn update(&mut self, data: &[u8]) { self.0.update(data); }
    fn finalize(self: Box<Self>) -> Vec<u8> { self.0.finalize().to_vec() }
}

impl Default for Sha256Hasher {
    fn default() -> Self { Self::new() }
}

impl Sha256Hasher {
    pub fn new() -> Self { Self(sha2::Sha256::new()) }

    pub fn digest(data: &[u8]) -> Vec<u8> { sha2::Sha256::digest(data).to_vec() }
}

pub struct Sha512Hasher(sha2::Sha512);

impl Hasher for Sha512Hasher {
    fn update(&mut self, data: &[u8]) { self.0.update(data); }
    fn finalize(self: Box<Self>) -> Vec<u8> { self.0.finalize().to_vec() }
}

impl Default for Sha512Hasher {
    fn default() -> Self { Self::new() }
}

impl Sha512Hasher {
    pub fn new() -> Self { Self(sha2::Sha512::new()) }

    pub fn digest(data: &[u8]) -> Vec<u8> { sha2::Sha512::digest(data).to_vec() }
}

pub struct Blake3Hasher(blake3::Hasher);

impl Hasher for Blake3Hasher {
    fn update(&mut self, data: &[u8]) { self.0.update(data); }
    fn finalize(self: Box<Self>) -> Vec<u8> { self.0.finalize().as_bytes().to_vec() }
}

impl Default for Blake3Hasher {
    fn default() -> Self { Self::new() }
}

impl Blake3Hasher {
    pub fn new() -> Self { Self(blake3::Hasher::new()) }

    pub fn digest(data: &[u8]) -> Vec<u8> { blake3::hash(data).as_bytes().to_vec() }
}

/// Fresh hasher for the given algorithm.
pub fn hasher_for(algorithm: DigestAlgorithm) -> Box<dyn Hasher> {
    match algorithm {
        DigestAlgorithm::Sha256 => Box::new(Sha256Hasher::new()),
        DigestAlgorithm::Sha512 => Box::new(Sha512Hasher::new()),
        DigestAlgorithm::Blake3 => Box::new(Blake3Hasher::new()),
    }
}

/// One-shot digest of `data`.
pub fn digest(algorithm: DigestAlgorithm, data: &[u8]) -> Vec<u8> {
    match algorithm {
        DigestAlgorithm::Sha256 => Sha256Hasher::digest(data),
        DigestAlgorithm::Sha512 => Sha512Hasher::digest(data),
        DigestAlgorithm::Blake3 => Blake3Hasher::digest(data),
    }
}
