//! Constant-time helpers for buffers which hold secret material.
use core::ops::Deref;

use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The largest digest any fixed-output algorithm produces.
pub const MAX_DIGEST_SIZE: usize = 64;

/// Overwrite `buf` with zeros, in a way the compiler will not elide.
pub fn secure_zero(buf: &mut [u8]) {
    buf.zeroize();
}

/// Compare two buffers without branching on their contents.
///
/// The lengths are treated as public: buffers of different lengths are
/// reported as unequal straight away.
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Check whether every byte of `data` is zero, in constant time.
pub fn ct_is_zero(data: &[u8]) -> Choice {
    let mut ok = Choice::from(1);
    for b in data {
        ok &= b.ct_eq(&0u8);
    }
    ok
}

/// The digest produced by a fixed-output algorithm.
///
/// Digests live inline, so producing one never allocates. Equality is checked
/// in constant time, and the bytes are wiped when the digest is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Digest {
    bytes: [u8; MAX_DIGEST_SIZE],
    len: usize,
}

impl Digest {
    pub(crate) fn from_slice(data: &[u8]) -> Self {
        debug_assert!(data.len() <= MAX_DIGEST_SIZE);
        let mut bytes = [0u8; MAX_DIGEST_SIZE];
        bytes[..data.len()].copy_from_slice(data);
        Self {
            bytes,
            len: data.len(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Copy the digest into a fixed size array.
    ///
    /// Returns `None` if `N` doesn't match the digest length.
    pub fn to_array<const N: usize>(&self) -> Option<[u8; N]> {
        if N != self.len {
            return None;
        }
        let mut out = [0u8; N];
        out.copy_from_slice(self.as_bytes());
        Some(out)
    }
}

impl Deref for Digest {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl ConstantTimeEq for Digest {
    fn ct_eq(&self, other: &Self) -> Choice {
        if self.len != other.len {
            return Choice::from(0);
        }
        self.as_bytes().ct_eq(other.as_bytes())
    }
}

impl PartialEq for Digest {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Digest {}

impl PartialEq<[u8]> for Digest {
    fn eq(&self, other: &[u8]) -> bool {
        ct_eq(self.as_bytes(), other)
    }
}

impl core::fmt::Debug for Digest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let bytes = self.as_bytes();
        let mut buf = [0u8; 2 * MAX_DIGEST_SIZE];
        let buf = &mut buf[..2 * bytes.len()];
        hex::encode_to_slice(bytes, buf).map_err(|_| core::fmt::Error)?;
        let hex = core::str::from_utf8(buf).map_err(|_| core::fmt::Error)?;
        write!(f, "Digest({hex})")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ct_eq() {
        assert!(ct_eq(b"kitten", b"kitten"));
        assert!(!ct_eq(b"kitten", b"kittem"));
        assert!(!ct_eq(b"kitten", b"kitte"));
        assert!(ct_eq(b"", b""));
    }

    #[test]
    fn test_secure_zero() {
        let mut buf = [0xA5u8; 37];
        secure_zero(&mut buf);
        assert!(bool::from(ct_is_zero(&buf)));
    }

    #[test]
    fn test_ct_is_zero_spots_last_byte() {
        let mut buf = [0u8; 64];
        assert!(bool::from(ct_is_zero(&buf)));
        buf[63] = 1;
        assert!(!bool::from(ct_is_zero(&buf)));
    }

    #[test]
    fn test_digest_equality() {
        let d0 = Digest::from_slice(&[1, 2, 3]);
        let d1 = Digest::from_slice(&[1, 2, 3]);
        let d2 = Digest::from_slice(&[1, 2, 3, 0]);
        assert_eq!(d0, d1);
        // Trailing zero padding in the inline buffer must not make these equal.
        assert_ne!(d0, d2);
        assert_eq!(d0.to_array::<3>(), Some([1, 2, 3]));
        assert_eq!(d0.to_array::<4>(), None);
    }

    #[test]
    fn test_digest_zeroize() {
        let mut d = Digest::from_slice(&[0xFF; 32]);
        d.zeroize();
        assert!(bool::from(ct_is_zero(&d.bytes)));
    }

    #[test]
    fn test_digest_debug_is_hex() {
        let d = Digest::from_slice(&[0x00, 0xAB, 0x7F]);
        assert_eq!(format!("{d:?}"), "Digest(00ab7f)");
        let full = Digest::from_slice(&[0xCD; MAX_DIGEST_SIZE]);
        assert_eq!(format!("{full:?}"), format!("Digest({})", "cd".repeat(64)));
    }
}
