//! Serialized contexts, for hashing across calls which can't keep a live
//! [`Context`] around.
//!
//! A serialized context is the 200 byte permutation state, followed by eight
//! parameter bytes:
//!
//! | offset | field                                               |
//! |--------|-----------------------------------------------------|
//! | 200    | position within the current block                   |
//! | 201    | phase: `A`bsorbing, squee`Z`ing or `D`one           |
//! | 202    | rate, in bytes                                      |
//! | 203    | algorithm tag                                       |
//! | 204    | domain separation suffix                            |
//! | 205    | final padding byte, always `0x80`                   |
//! | 206    | maximum output: the digest size, or `0xFF` for XOFs |
//! | 207    | output remaining: as above, `0` once done           |
//!
//! Partial blocks are already XORed into the state, so the position is all
//! that's needed to resume absorbing with arbitrarily sized chunks.
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::algorithm::Algorithm;
use crate::context::{Context, Inner, Phase};
use crate::ct::{ct_is_zero, Digest};
use crate::error::{Error, Result};
use crate::permutation::{KeccakState, STATE_SIZE_U8};
use crate::sponge::{Sponge, Squeezer, PAD_LAST};

/// The size of a serialized context.
pub const CONTEXT_SIZE: usize = STATE_SIZE_U8 + 8;

const POSITION: usize = STATE_SIZE_U8;
const PHASE: usize = STATE_SIZE_U8 + 1;
const RATE: usize = STATE_SIZE_U8 + 2;
const ALGORITHM: usize = STATE_SIZE_U8 + 3;
const SUFFIX: usize = STATE_SIZE_U8 + 4;
const RATE_PAD: usize = STATE_SIZE_U8 + 5;
const MAX_OUT: usize = STATE_SIZE_U8 + 6;
const REMAINING: usize = STATE_SIZE_U8 + 7;

const FLAG_ABSORBING: u8 = b'A';
const FLAG_SQUEEZING: u8 = b'Z';
const FLAG_DONE: u8 = b'D';

/// Marks unbounded output.
const UNBOUNDED: u8 = 0xFF;

fn max_out(algorithm: Algorithm) -> u8 {
    match algorithm.digest_size() {
        Some(n) => n as u8,
        None => UNBOUNDED,
    }
}

/// A context flattened into bytes.
///
/// This holds everything absorbed so far, and is wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SerializedContext([u8; CONTEXT_SIZE]);

impl SerializedContext {
    pub fn as_bytes(&self) -> &[u8; CONTEXT_SIZE] {
        &self.0
    }

    /// Decode back into a live context.
    pub fn to_context(&self) -> Result<Context> {
        Context::from_serialized(&self.0)
    }
}

impl AsRef<[u8]> for SerializedContext {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for SerializedContext {
    type Error = Error;

    /// Accept bytes from outside, checking that they decode to a valid context.
    fn try_from(data: &[u8]) -> Result<Self> {
        Ok(Context::from_serialized(data)?.to_serialized())
    }
}

impl core::fmt::Debug for SerializedContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SerializedContext")
            .field("phase", &(self.0[PHASE] as char))
            .field("algorithm", &self.0[ALGORITHM])
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Flatten this context into bytes.
    pub fn to_serialized(&self) -> SerializedContext {
        let algorithm = self.algorithm();
        let mut out = [0u8; CONTEXT_SIZE];
        let (state, pos, flag, remaining) = match self.inner() {
            Inner::Absorbing(sponge) => (
                Some(sponge.state()),
                sponge.position(),
                FLAG_ABSORBING,
                max_out(algorithm),
            ),
            Inner::Squeezing(squeezer) => (
                Some(squeezer.state()),
                squeezer.position(),
                FLAG_SQUEEZING,
                UNBOUNDED,
            ),
            Inner::Done => (None, 0, FLAG_DONE, 0),
        };
        if let Some(state) = state {
            out[..STATE_SIZE_U8].copy_from_slice(state.as_bytes());
        }
        out[POSITION] = pos as u8;
        out[PHASE] = flag;
        out[RATE] = algorithm.rate() as u8;
        out[ALGORITHM] = algorithm.tag();
        out[SUFFIX] = algorithm.suffix();
        out[RATE_PAD] = PAD_LAST;
        out[MAX_OUT] = max_out(algorithm);
        out[REMAINING] = remaining;
        SerializedContext(out)
    }

    /// Rebuild a context from bytes produced by [`Context::to_serialized`].
    ///
    /// Every field is checked before anything is rebuilt, so malformed input
    /// never reaches the permutation.
    pub fn from_serialized(data: &[u8]) -> Result<Self> {
        if data.len() != CONTEXT_SIZE {
            return Err(Error::InvalidLength {
                context: "serialized context",
                expected: CONTEXT_SIZE,
                actual: data.len(),
            });
        }
        let algorithm = Algorithm::from_tag(data[ALGORITHM]).ok_or(Error::MalformedContext {
            reason: "unknown algorithm",
        })?;
        if data[RATE] as usize != algorithm.rate()
            || data[SUFFIX] != algorithm.suffix()
            || data[RATE_PAD] != PAD_LAST
            || data[MAX_OUT] != max_out(algorithm)
        {
            return Err(Error::MalformedContext {
                reason: "parameters don't match the algorithm",
            });
        }
        let phase = match data[PHASE] {
            FLAG_ABSORBING => Phase::Absorbing,
            FLAG_SQUEEZING if algorithm.is_xof() => Phase::Squeezing,
            FLAG_DONE => Phase::Done,
            _ => {
                return Err(Error::MalformedContext {
                    reason: "unknown phase",
                })
            }
        };
        let expected_remaining = match phase {
            Phase::Absorbing => max_out(algorithm),
            Phase::Squeezing => UNBOUNDED,
            Phase::Done => 0,
        };
        if data[REMAINING] != expected_remaining {
            return Err(Error::MalformedContext {
                reason: "remaining output doesn't match the phase",
            });
        }

        let pos = data[POSITION] as usize;
        let state = KeccakState::try_from(&data[..STATE_SIZE_U8])?;
        let inner = match phase {
            Phase::Absorbing => Inner::Absorbing(Sponge::from_parts(
                state,
                algorithm.rate(),
                algorithm.suffix(),
                pos,
            )?),
            Phase::Squeezing => {
                Inner::Squeezing(Squeezer::from_parts(state, algorithm.rate(), pos)?)
            }
            Phase::Done => {
                if pos != 0 || !bool::from(ct_is_zero(state.as_bytes())) {
                    return Err(Error::MalformedContext {
                        reason: "finished context still holds state",
                    });
                }
                Inner::Done
            }
        };
        Ok(Context::from_inner(algorithm, inner))
    }
}

/// Start a serialized context for `algorithm`.
pub fn init(algorithm: Algorithm) -> SerializedContext {
    Context::new(algorithm).to_serialized()
}

/// Absorb `input` into a serialized context, returning the updated context.
///
/// The input context is left untouched, so a failure loses nothing.
pub fn update(context: &[u8], input: &[u8]) -> Result<SerializedContext> {
    let mut ctx = Context::from_serialized(context)?;
    ctx.update(input)?;
    Ok(ctx.to_serialized())
}

/// Finish a fixed-output serialized context, returning its digest.
pub fn finalize(context: &[u8]) -> Result<Digest> {
    Context::from_serialized(context)?.finalize()
}

/// Finish an extendable-output serialized context, filling `out` with the
/// start of its output.
///
/// The returned context continues the output stream with [`squeeze`].
pub fn finalize_xof(context: &[u8], out: &mut [u8]) -> Result<SerializedContext> {
    let mut ctx = Context::from_serialized(context)?;
    ctx.finalize_xof()?;
    ctx.squeeze(out)?;
    Ok(ctx.to_serialized())
}

/// Fill `out` with the next output of a squeezing serialized context.
pub fn squeeze(context: &[u8], out: &mut [u8]) -> Result<SerializedContext> {
    let mut ctx = Context::from_serialized(context)?;
    ctx.squeeze(out)?;
    Ok(ctx.to_serialized())
}
