//! The sponge construction over Keccak-f[1600].
//!
//! A [`Sponge`] absorbs input, and turns into a [`Squeezer`] once padded.
//! Splitting the two phases into two types means that absorbing after
//! squeezing, or squeezing before padding, simply can't be expressed.
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::algorithm::Algorithm;
use crate::error::{Error, Result};
use crate::permutation::{KeccakState, STATE_SIZE_U8};

/// The final padding bit, in the last byte of a block.
pub(crate) const PAD_LAST: u8 = 0x80;

fn xor_into(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

fn check_params(rate: usize, suffix: u8) -> Result<()> {
    if rate == 0 || rate >= STATE_SIZE_U8 {
        return Err(Error::InvalidParameters {
            reason: "rate must leave a non-empty capacity",
        });
    }
    // The suffix byte carries the first padding bit, so it can't be empty,
    // and must leave the top bit free for the last padding bit.
    if suffix == 0 || suffix >= PAD_LAST {
        return Err(Error::InvalidParameters {
            reason: "suffix must lie in 0x01..=0x7F",
        });
    }
    Ok(())
}

/// A sponge in its absorbing phase.
///
/// Bytes which don't yet fill a block are XORed into the state straight
/// away; `pos` remembers how much of the current block has been filled.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Sponge {
    state: KeccakState,
    rate: u8,
    suffix: u8,
    pos: u8,
}

impl Sponge {
    /// Create a sponge with a given rate, in bytes, and domain separation suffix.
    pub fn new(rate: usize, suffix: u8) -> Result<Self> {
        check_params(rate, suffix)?;
        Ok(Self {
            state: KeccakState::new(),
            rate: rate as u8,
            suffix,
            pos: 0,
        })
    }

    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        Self {
            state: KeccakState::new(),
            rate: algorithm.rate() as u8,
            suffix: algorithm.suffix(),
            pos: 0,
        }
    }

    /// Rebuild a sponge from serialized parts, checking that they fit together.
    pub(crate) fn from_parts(state: KeccakState, rate: usize, suffix: u8, pos: usize) -> Result<Self> {
        check_params(rate, suffix)?;
        if pos >= rate {
            return Err(Error::MalformedContext {
                reason: "absorb position past the end of the block",
            });
        }
        Ok(Self {
            state,
            rate: rate as u8,
            suffix,
            pos: pos as u8,
        })
    }

    pub fn rate(&self) -> usize {
        self.rate as usize
    }

    pub fn capacity(&self) -> usize {
        STATE_SIZE_U8 - self.rate()
    }

    pub fn suffix(&self) -> u8 {
        self.suffix
    }

    /// How many bytes of the current block have been absorbed.
    pub fn position(&self) -> usize {
        self.pos as usize
    }

    pub(crate) fn state(&self) -> &KeccakState {
        &self.state
    }

    /// Absorb some data into this sponge.
    pub fn absorb(&mut self, data: &[u8]) {
        let rate = self.rate();
        let mut data = data;
        while !data.is_empty() {
            let pos = self.position();
            let take = (rate - pos).min(data.len());
            let (head, tail) = data.split_at(take);
            xor_into(&mut self.state[pos..pos + take], head);
            self.pos += take as u8;
            if self.position() == rate {
                self.state.permute();
                self.pos = 0;
            }
            data = tail;
        }
    }

    /// Absorb exactly one block, at a block boundary.
    ///
    /// Nothing is absorbed if the block has the wrong length, or if part of
    /// a block has already been absorbed.
    pub fn absorb_block(&mut self, block: &[u8]) -> Result<()> {
        if block.len() != self.rate() {
            return Err(Error::InvalidBlockLength {
                expected: self.rate(),
                actual: block.len(),
            });
        }
        if self.pos != 0 {
            return Err(Error::UnalignedBlock {
                position: self.position(),
            });
        }
        xor_into(&mut self.state[..block.len()], block);
        self.state.permute();
        Ok(())
    }

    /// Apply the domain separation suffix and padding, and start squeezing.
    ///
    /// If only one byte of the block is left, the suffix and the final
    /// padding bit share it, and a single block is still absorbed.
    pub fn pad(mut self) -> Squeezer {
        self.finish()
    }

    /// Pad in place, moving the state into the returned squeezer and leaving
    /// zeros behind.
    pub(crate) fn finish(&mut self) -> Squeezer {
        let pos = self.position();
        let last = self.rate() - 1;
        self.state[pos] ^= self.suffix;
        self.state[last] ^= PAD_LAST;
        self.state.permute();
        Squeezer {
            state: core::mem::take(&mut self.state),
            rate: self.rate,
            pos: 0,
        }
    }
}

impl core::fmt::Debug for Sponge {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Sponge")
            .field("rate", &self.rate)
            .field("suffix", &self.suffix)
            .field("pos", &self.pos)
            .finish_non_exhaustive()
    }
}

/// Build the final padded block for `buffered`, a trailing partial block.
///
/// `block` must be exactly one rate long, and `buffered` strictly shorter,
/// since at least one byte is needed for padding.
pub fn pad_block(buffered: &[u8], suffix: u8, block: &mut [u8]) -> Result<()> {
    check_params(block.len(), suffix)?;
    if buffered.len() >= block.len() {
        return Err(Error::InvalidBlockLength {
            expected: block.len(),
            actual: buffered.len() + 1,
        });
    }
    let last = block.len() - 1;
    block.fill(0);
    block[..buffered.len()].copy_from_slice(buffered);
    block[buffered.len()] ^= suffix;
    block[last] ^= PAD_LAST;
    Ok(())
}

/// A sponge in its squeezing phase.
///
/// The output is a single stream: successive calls to [`Squeezer::squeeze`]
/// continue where the last one stopped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Squeezer {
    state: KeccakState,
    rate: u8,
    pos: u8,
}

impl Squeezer {
    /// Rebuild a squeezer from serialized parts.
    ///
    /// A position equal to the rate is valid: the block is exhausted, and
    /// the next squeeze permutes first.
    pub(crate) fn from_parts(state: KeccakState, rate: usize, pos: usize) -> Result<Self> {
        if rate == 0 || rate >= STATE_SIZE_U8 {
            return Err(Error::InvalidParameters {
                reason: "rate must leave a non-empty capacity",
            });
        }
        if pos > rate {
            return Err(Error::MalformedContext {
                reason: "squeeze position past the end of the block",
            });
        }
        Ok(Self {
            state,
            rate: rate as u8,
            pos: pos as u8,
        })
    }

    pub fn rate(&self) -> usize {
        self.rate as usize
    }

    /// How many bytes of the current block have been emitted.
    pub fn position(&self) -> usize {
        self.pos as usize
    }

    pub(crate) fn state(&self) -> &KeccakState {
        &self.state
    }

    /// Fill `out` with the next bytes of output.
    pub fn squeeze(&mut self, out: &mut [u8]) {
        let rate = self.rate();
        let mut written = 0;
        while written < out.len() {
            if self.position() == rate {
                self.state.permute();
                self.pos = 0;
            }
            let pos = self.position();
            let take = (rate - pos).min(out.len() - written);
            out[written..written + take].copy_from_slice(&self.state[pos..pos + take]);
            self.pos += take as u8;
            written += take;
        }
    }
}

impl core::fmt::Debug for Squeezer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Squeezer")
            .field("rate", &self.rate)
            .field("pos", &self.pos)
            .finish_non_exhaustive()
    }
}
