//! One-shot hashing with the FIPS 202 algorithms.
use crate::algorithm::Algorithm;
use crate::ct::Digest;
use crate::error::{Error, Result};
use crate::sponge::Sponge;

fn fixed<const N: usize>(algorithm: Algorithm, data: &[u8]) -> [u8; N] {
    debug_assert_eq!(algorithm.digest_size(), Some(N));
    let mut sponge = Sponge::for_algorithm(algorithm);
    sponge.absorb(data);
    let mut out = [0u8; N];
    sponge.pad().squeeze(&mut out);
    out
}

fn extendable(algorithm: Algorithm, data: &[u8], out: &mut [u8]) {
    let mut sponge = Sponge::for_algorithm(algorithm);
    sponge.absorb(data);
    sponge.pad().squeeze(out);
}

pub fn sha3_224(data: &[u8]) -> [u8; 28] {
    fixed(Algorithm::Sha3_224, data)
}

pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    fixed(Algorithm::Sha3_256, data)
}

pub fn sha3_384(data: &[u8]) -> [u8; 48] {
    fixed(Algorithm::Sha3_384, data)
}

pub fn sha3_512(data: &[u8]) -> [u8; 64] {
    fixed(Algorithm::Sha3_512, data)
}

/// Fill `out` with SHAKE128 output for `data`.
pub fn shake128(data: &[u8], out: &mut [u8]) {
    extendable(Algorithm::Shake128, data, out)
}

/// Fill `out` with SHAKE256 output for `data`.
pub fn shake256(data: &[u8], out: &mut [u8]) {
    extendable(Algorithm::Shake256, data, out)
}

/// Hash `data` with any fixed-output algorithm.
pub fn digest(algorithm: Algorithm, data: &[u8]) -> Result<Digest> {
    if algorithm.is_xof() {
        return Err(Error::Unsupported {
            operation: "a fixed digest",
            algorithm,
        });
    }
    let mut sponge = Sponge::for_algorithm(algorithm);
    sponge.absorb(data);
    let mut squeezer = sponge.pad();
    let mut out = [0u8; crate::ct::MAX_DIGEST_SIZE];
    let size = algorithm.bits() / 8;
    squeezer.squeeze(&mut out[..size]);
    let digest = Digest::from_slice(&out[..size]);
    crate::ct::secure_zero(&mut out);
    Ok(digest)
}
