//! Incremental hashing, one algorithm per context.
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::algorithm::Algorithm;
use crate::ct::{Digest, MAX_DIGEST_SIZE};
use crate::error::{Error, Result};
use crate::sponge::{Sponge, Squeezer};

/// Where a context is in its lifetime.
///
/// Contexts move strictly forward: `Absorbing`, then `Squeezing` for
/// extendable-output algorithms, then `Done` for fixed-output ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Absorbing,
    Squeezing,
    Done,
}

#[derive(Clone)]
pub(crate) enum Inner {
    Absorbing(Sponge),
    Squeezing(Squeezer),
    Done,
}

/// An incremental hashing context.
///
/// Feed it data with [`Context::update`], then either take a fixed digest
/// with [`Context::finalize`], or, for SHAKE, switch to squeezing with
/// [`Context::finalize_xof`] and read as much output as needed.
///
/// The sponge state is wiped when the context finishes or is dropped.
#[derive(Clone)]
pub struct Context {
    algorithm: Algorithm,
    inner: Inner,
}

impl Context {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            inner: Inner::Absorbing(Sponge::for_algorithm(algorithm)),
        }
    }

    pub(crate) fn from_inner(algorithm: Algorithm, inner: Inner) -> Self {
        Self { algorithm, inner }
    }

    pub(crate) fn inner(&self) -> &Inner {
        &self.inner
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn phase(&self) -> Phase {
        match self.inner {
            Inner::Absorbing(_) => Phase::Absorbing,
            Inner::Squeezing(_) => Phase::Squeezing,
            Inner::Done => Phase::Done,
        }
    }

    /// Absorb more data.
    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        let phase = self.phase();
        match &mut self.inner {
            Inner::Absorbing(sponge) => {
                sponge.absorb(data);
                Ok(())
            }
            _ => Err(Error::InvalidState {
                operation: "update",
                phase,
            }),
        }
    }

    /// Pad the absorbed data, and hand back the squeezing half of the sponge.
    ///
    /// The sponge is padded where it lies, so no copy of the absorbed state
    /// stays behind in the context. The context is left `Done`; callers put
    /// it back into `Squeezing` if more output may follow.
    fn pad(&mut self, operation: &'static str) -> Result<Squeezer> {
        let phase = self.phase();
        let squeezer = match &mut self.inner {
            Inner::Absorbing(sponge) => sponge.finish(),
            _ => return Err(Error::InvalidState { operation, phase }),
        };
        self.inner = Inner::Done;
        Ok(squeezer)
    }

    /// Finish a fixed-output hash, and return its digest.
    ///
    /// The context is `Done` afterwards, with its state wiped.
    pub fn finalize(&mut self) -> Result<Digest> {
        let size = self.algorithm.digest_size().ok_or(Error::Unsupported {
            operation: "a fixed digest",
            algorithm: self.algorithm,
        })?;
        let mut squeezer = self.pad("finalize")?;
        let mut out = [0u8; MAX_DIGEST_SIZE];
        squeezer.squeeze(&mut out[..size]);
        let digest = Digest::from_slice(&out[..size]);
        out.zeroize();
        Ok(digest)
    }

    /// Finish hashing, writing output into `out`.
    ///
    /// Fixed-output algorithms write their digest into the start of `out`,
    /// whatever its length, as long as the digest fits. Extendable-output
    /// algorithms fill all of `out`, and stay in `Squeezing` for more.
    ///
    /// Returns the number of bytes written.
    pub fn finalize_into(&mut self, out: &mut [u8]) -> Result<usize> {
        match self.algorithm.digest_size() {
            Some(size) => {
                if self.phase() != Phase::Absorbing {
                    return Err(Error::InvalidState {
                        operation: "finalize",
                        phase: self.phase(),
                    });
                }
                if out.len() < size {
                    return Err(Error::OutputTooShort {
                        required: size,
                        actual: out.len(),
                    });
                }
                let digest = self.finalize()?;
                out[..size].copy_from_slice(&digest);
                Ok(size)
            }
            None => {
                self.finalize_xof()?;
                self.squeeze(out)?;
                Ok(out.len())
            }
        }
    }

    /// Finish absorbing for an extendable-output algorithm.
    pub fn finalize_xof(&mut self) -> Result<()> {
        if !self.algorithm.is_xof() {
            return Err(Error::Unsupported {
                operation: "extendable output",
                algorithm: self.algorithm,
            });
        }
        let squeezer = self.pad("finalize")?;
        self.inner = Inner::Squeezing(squeezer);
        Ok(())
    }

    /// Read the next `out.len()` bytes of output.
    ///
    /// Each call continues the same stream, so squeezing 10 bytes then 20
    /// gives the same 30 bytes as squeezing 30 at once.
    pub fn squeeze(&mut self, out: &mut [u8]) -> Result<()> {
        let phase = self.phase();
        match &mut self.inner {
            Inner::Squeezing(squeezer) => {
                squeezer.squeeze(out);
                Ok(())
            }
            _ => Err(Error::InvalidState {
                operation: "squeeze",
                phase,
            }),
        }
    }

    /// Squeeze `len` bytes into a fresh vector.
    ///
    /// If the vector can't be allocated, the stream doesn't advance.
    #[cfg(feature = "alloc")]
    pub fn squeeze_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        if self.phase() != Phase::Squeezing {
            return Err(Error::InvalidState {
                operation: "squeeze",
                phase: self.phase(),
            });
        }
        let mut out = Vec::new();
        out.try_reserve_exact(len)
            .map_err(|_| Error::Allocation { requested: len })?;
        out.resize(len, 0);
        self.squeeze(&mut out)?;
        Ok(out)
    }

    /// Wipe the context and start again with the same algorithm.
    pub fn reset(&mut self) {
        self.inner = Inner::Absorbing(Sponge::for_algorithm(self.algorithm));
    }

    /// The raw permutation state, or `None` once the context is done.
    #[cfg(test)]
    pub(crate) fn raw_state(&self) -> Option<&crate::permutation::KeccakState> {
        match &self.inner {
            Inner::Absorbing(sponge) => Some(sponge.state()),
            Inner::Squeezing(squeezer) => Some(squeezer.state()),
            Inner::Done => None,
        }
    }
}

impl Zeroize for Context {
    /// Wipe the state, leaving the context `Done`.
    fn zeroize(&mut self) {
        match &mut self.inner {
            Inner::Absorbing(sponge) => sponge.zeroize(),
            Inner::Squeezing(squeezer) => squeezer.zeroize(),
            Inner::Done => {}
        }
        self.inner = Inner::Done;
    }
}

// Both halves of the sponge wipe themselves on drop.
impl ZeroizeOnDrop for Context {}

impl core::fmt::Debug for Context {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut debug = f.debug_struct("Context");
        debug
            .field("algorithm", &self.algorithm)
            .field("phase", &self.phase());
        match &self.inner {
            Inner::Absorbing(sponge) => debug.field("position", &sponge.position()),
            Inner::Squeezing(squeezer) => debug.field("position", &squeezer.position()),
            Inner::Done => &mut debug,
        };
        debug.finish_non_exhaustive()
    }
}
