use core::ops::{Deref, DerefMut};

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// The number of words in our permutation state.
pub const STATE_SIZE_U64: usize = 25;
/// The number of bytes in our permutation state.
pub const STATE_SIZE_U8: usize = STATE_SIZE_U64 * 8;
/// The number of rounds in Keccak-f[1600].
pub const ROUNDS: usize = 24;

/// The round constants, XORed into lane (0, 0) by ι.
const RC: [u64; ROUNDS] = [
    0x0000_0000_0000_0001,
    0x0000_0000_0000_8082,
    0x8000_0000_0000_808A,
    0x8000_0000_8000_8000,
    0x0000_0000_0000_808B,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8009,
    0x0000_0000_0000_008A,
    0x0000_0000_0000_0088,
    0x0000_0000_8000_8009,
    0x0000_0000_8000_000A,
    0x0000_0000_8000_808B,
    0x8000_0000_0000_008B,
    0x8000_0000_0000_8089,
    0x8000_0000_0000_8003,
    0x8000_0000_0000_8002,
    0x8000_0000_0000_0080,
    0x0000_0000_0000_800A,
    0x8000_0000_8000_000A,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8080,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8008,
];

/// The ρ rotation offsets, indexed by lane `x + 5 * y`.
const RHO: [u32; STATE_SIZE_U64] = [
    0, 1, 62, 28, 27, //
    36, 44, 6, 55, 20, //
    3, 10, 43, 25, 39, //
    41, 45, 15, 21, 8, //
    18, 2, 61, 56, 14,
];

/// Where π sends each lane: lane `(x, y)` moves to `(y, 2x + 3y)`.
const PI: [usize; STATE_SIZE_U64] = {
    let mut pi = [0usize; STATE_SIZE_U64];
    let mut x = 0;
    while x < 5 {
        let mut y = 0;
        while y < 5 {
            pi[x + 5 * y] = y + 5 * ((2 * x + 3 * y) % 5);
            y += 1;
        }
        x += 1;
    }
    pi
};

#[inline(always)]
fn round(a: &mut [u64; STATE_SIZE_U64], b: &mut [u64; STATE_SIZE_U64], c: &mut [u64; 5], rc: u64) {
    // θ
    for x in 0..5 {
        c[x] = a[x] ^ a[x + 5] ^ a[x + 10] ^ a[x + 15] ^ a[x + 20];
    }
    for x in 0..5 {
        let d = c[(x + 4) % 5] ^ c[(x + 1) % 5].rotate_left(1);
        for y in 0..5 {
            a[x + 5 * y] ^= d;
        }
    }
    // ρ and π
    for (i, lane) in a.iter().enumerate() {
        b[PI[i]] = lane.rotate_left(RHO[i]);
    }
    // χ
    for y in 0..5 {
        for x in 0..5 {
            a[x + 5 * y] = b[x + 5 * y] ^ (!b[(x + 1) % 5 + 5 * y] & b[(x + 2) % 5 + 5 * y]);
        }
    }
    // ι
    a[0] ^= rc;
}

fn run_rounds(state: &mut [u64; STATE_SIZE_U64], constants: &[u64]) {
    let mut b = [0u64; STATE_SIZE_U64];
    let mut c = [0u64; 5];
    for &rc in constants {
        round(state, &mut b, &mut c, rc);
    }
    // The scratch lanes are a copy of the state, one step behind.
    b.zeroize();
    c.zeroize();
}

/// The portable Keccak-f[1600] permutation.
pub fn keccak_f1600(state: &mut [u64; STATE_SIZE_U64]) {
    run_rounds(state, &RC);
}

/// Keccak-p[1600, n], which runs only the last `rounds` rounds of Keccak-f.
pub fn keccak_p1600(state: &mut [u64; STATE_SIZE_U64], rounds: usize) -> Result<()> {
    check_rounds(rounds)?;
    reduced_lanes(state, rounds);
    Ok(())
}

fn check_rounds(rounds: usize) -> Result<()> {
    if rounds > ROUNDS {
        return Err(Error::InvalidRounds { requested: rounds });
    }
    Ok(())
}

/// Keccak-p[1600, `rounds`], for a round count already known to be at most 24.
#[inline]
fn reduced_lanes(state: &mut [u64; STATE_SIZE_U64], rounds: usize) {
    debug_assert!(rounds <= ROUNDS);
    #[cfg(feature = "keccak-backend")]
    keccak::p1600(state, rounds);
    #[cfg(not(feature = "keccak-backend"))]
    run_rounds(state, &RC[ROUNDS - rounds..]);
}

/// Keccak-f[1600], through whichever backend this crate was built with.
#[inline]
fn permute_lanes(state: &mut [u64; STATE_SIZE_U64]) {
    #[cfg(feature = "keccak-backend")]
    keccak::f1600(state);
    #[cfg(not(feature = "keccak-backend"))]
    keccak_f1600(state);
}

/// A buffer of bytes which is aligned, so that we can apply our permutation to it.
///
/// The sponge wants to operate on individual bytes, whereas the permutation
/// wants to operate on 64 bit words. To reconcile the two, we keep a buffer
/// of bytes which is correctly aligned, so that it can be viewed as a buffer
/// of words. Byte `i` of the buffer is byte `i % 8` of lane `i / 8`, in little
/// endian order.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(test, derive(PartialEq))]
#[repr(align(8))]
pub struct KeccakState([u8; STATE_SIZE_U8]);

impl KeccakState {
    /// The all zero state.
    pub fn new() -> Self {
        Self([0u8; STATE_SIZE_U8])
    }

    /// Apply Keccak-f[1600] to this state.
    pub fn permute(&mut self) {
        self.with_lanes(permute_lanes);
    }

    /// Apply Keccak-p[1600, `rounds`] to this state.
    pub fn permute_rounds(&mut self, rounds: usize) -> Result<()> {
        check_rounds(rounds)?;
        self.with_lanes(|lanes| reduced_lanes(lanes, rounds));
        Ok(())
    }

    fn with_lanes(&mut self, f: impl FnOnce(&mut [u64; STATE_SIZE_U64])) {
        // SAFETY: because we've declared this struct to have an alignment of 8,
        // this transmutation will work
        let lanes = unsafe { &mut *(self as *mut Self as *mut [u64; STATE_SIZE_U64]) };
        // In placing bytes into the state, we've always assumed that the u64s
        // are in little endian order. To correct for this on big endian architectures,
        // we need to do the following:
        for lane in lanes.iter_mut() {
            *lane = u64::from_le(*lane);
        }
        f(lanes);
        // We also need to place the words back in little endian order.
        for lane in lanes.iter_mut() {
            *lane = u64::to_le(*lane);
        }
    }

    /// Read lane `i` of the state.
    pub fn lane(&self, i: usize) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.0[8 * i..8 * i + 8]);
        u64::from_le_bytes(bytes)
    }

    pub fn from_lanes(lanes: &[u64; STATE_SIZE_U64]) -> Self {
        let mut out = Self::new();
        for (chunk, lane) in out.0.chunks_exact_mut(8).zip(lanes) {
            chunk.copy_from_slice(&lane.to_le_bytes());
        }
        out
    }

    pub fn as_bytes(&self) -> &[u8; STATE_SIZE_U8] {
        &self.0
    }

    /// Copy the raw state out.
    ///
    /// The copy holds everything absorbed so far, so the caller is
    /// responsible for wiping it.
    pub fn to_bytes(&self) -> [u8; STATE_SIZE_U8] {
        self.0
    }
}

impl Default for KeccakState {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<&[u8]> for KeccakState {
    type Error = Error;

    fn try_from(data: &[u8]) -> Result<Self> {
        if data.len() != STATE_SIZE_U8 {
            return Err(Error::InvalidLength {
                context: "keccak state",
                expected: STATE_SIZE_U8,
                actual: data.len(),
            });
        }
        let mut out = Self::new();
        out.0.copy_from_slice(data);
        Ok(out)
    }
}

impl From<[u8; STATE_SIZE_U8]> for KeccakState {
    fn from(data: [u8; STATE_SIZE_U8]) -> Self {
        Self(data)
    }
}

impl core::fmt::Debug for KeccakState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("KeccakState(..)")
    }
}

impl Deref for KeccakState {
    type Target = [u8; STATE_SIZE_U8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for KeccakState {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
