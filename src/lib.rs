//! The Keccak-f[1600] permutation, and the SHA3 and SHAKE sponges built on it.
//!
//! For one-shot hashing, use the functions in [`fips202`]. For data which
//! arrives in pieces, use a [`Context`], which can also be flattened into a
//! [`SerializedContext`] and resumed later, see [`snapshot`].
//!
//! ```
//! use ck_keccakf1600::{fips202, Algorithm, Context};
//!
//! let mut ctx = Context::new(Algorithm::Sha3_256);
//! ctx.update(b"ab").unwrap();
//! ctx.update(b"c").unwrap();
//! assert_eq!(ctx.finalize().unwrap(), fips202::sha3_256(b"abc")[..]);
//! ```
#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod algorithm;
mod context;
pub mod ct;
mod error;
pub mod fips202;
mod permutation;
pub mod snapshot;
mod sponge;
// For much heavier tests.
#[cfg(test)]
mod test;

pub use crate::algorithm::{Algorithm, OutputLen, SHA3_SUFFIX, SHAKE_SUFFIX};
pub use crate::context::{Context, Phase};
pub use crate::ct::Digest;
pub use crate::error::{Error, Result};
pub use crate::permutation::{
    keccak_f1600, keccak_p1600, KeccakState, ROUNDS, STATE_SIZE_U64, STATE_SIZE_U8,
};
pub use crate::snapshot::{SerializedContext, CONTEXT_SIZE};
pub use crate::sponge::{pad_block, Sponge, Squeezer};
