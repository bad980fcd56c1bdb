use core::fmt;

use crate::permutation::STATE_SIZE_U8;

/// The domain separation byte for SHA3: the suffix `01`, then the first padding bit.
pub const SHA3_SUFFIX: u8 = 0x06;
/// The domain separation byte for SHAKE: the suffix `1111`, then the first padding bit.
pub const SHAKE_SUFFIX: u8 = 0x1F;

/// How much output an algorithm produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputLen {
    /// Always exactly this many bytes.
    Fixed(usize),
    /// As many bytes as the caller asks for.
    Extendable,
}

/// The FIPS 202 instances of the Keccak sponge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Shake128,
    Shake256,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Sha3_224,
        Algorithm::Sha3_256,
        Algorithm::Sha3_384,
        Algorithm::Sha3_512,
        Algorithm::Shake128,
        Algorithm::Shake256,
    ];

    /// The bit strength this instance is named after.
    ///
    /// The capacity is always twice this.
    pub const fn bits(self) -> usize {
        match self {
            Algorithm::Sha3_224 => 224,
            Algorithm::Sha3_256 => 256,
            Algorithm::Sha3_384 => 384,
            Algorithm::Sha3_512 => 512,
            Algorithm::Shake128 => 128,
            Algorithm::Shake256 => 256,
        }
    }

    /// The capacity of the sponge, in bytes.
    pub const fn capacity(self) -> usize {
        2 * self.bits() / 8
    }

    /// The rate of the sponge, in bytes.
    pub const fn rate(self) -> usize {
        STATE_SIZE_U8 - self.capacity()
    }

    /// The domain separation byte appended before padding.
    pub const fn suffix(self) -> u8 {
        if self.is_xof() {
            SHAKE_SUFFIX
        } else {
            SHA3_SUFFIX
        }
    }

    pub const fn is_xof(self) -> bool {
        matches!(self, Algorithm::Shake128 | Algorithm::Shake256)
    }

    pub const fn output_len(self) -> OutputLen {
        match self.digest_size() {
            Some(n) => OutputLen::Fixed(n),
            None => OutputLen::Extendable,
        }
    }

    /// The digest size in bytes, for fixed-output algorithms.
    pub const fn digest_size(self) -> Option<usize> {
        if self.is_xof() {
            None
        } else {
            Some(self.bits() / 8)
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::Sha3_224 => "SHA3-224",
            Algorithm::Sha3_256 => "SHA3-256",
            Algorithm::Sha3_384 => "SHA3-384",
            Algorithm::Sha3_512 => "SHA3-512",
            Algorithm::Shake128 => "SHAKE128",
            Algorithm::Shake256 => "SHAKE256",
        }
    }

    /// The byte identifying this algorithm in a serialized context.
    pub(crate) const fn tag(self) -> u8 {
        match self {
            Algorithm::Sha3_224 => 1,
            Algorithm::Sha3_256 => 2,
            Algorithm::Sha3_384 => 3,
            Algorithm::Sha3_512 => 4,
            Algorithm::Shake128 => 5,
            Algorithm::Shake256 => 6,
        }
    }

    pub(crate) fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.tag() == tag)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
