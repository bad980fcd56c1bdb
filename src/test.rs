use std::collections::HashSet;

use proptest::{collection::vec, prelude::*};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::Digest as _;

use crate::algorithm::Algorithm;
use crate::context::Context;
use crate::fips202;
use crate::permutation::{keccak_f1600, STATE_SIZE_U64};
use crate::snapshot;

fn reference_digest(algorithm: Algorithm, data: &[u8]) -> Vec<u8> {
    match algorithm {
        Algorithm::Sha3_224 => sha3::Sha3_224::digest(data).to_vec(),
        Algorithm::Sha3_256 => sha3::Sha3_256::digest(data).to_vec(),
        Algorithm::Sha3_384 => sha3::Sha3_384::digest(data).to_vec(),
        Algorithm::Sha3_512 => sha3::Sha3_512::digest(data).to_vec(),
        Algorithm::Shake128 | Algorithm::Shake256 => unreachable!("fixed output only"),
    }
}

fn reference_xof(algorithm: Algorithm, data: &[u8], len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    match algorithm {
        Algorithm::Shake128 => {
            let mut hasher = sha3::Shake128::default();
            hasher.update(data);
            hasher.finalize_xof().read(&mut out);
        }
        Algorithm::Shake256 => {
            let mut hasher = sha3::Shake256::default();
            hasher.update(data);
            hasher.finalize_xof().read(&mut out);
        }
        _ => unreachable!("extendable output only"),
    }
    out
}

fn hash(algorithm: Algorithm, data: &[u8], len: usize) -> Vec<u8> {
    let mut ctx = Context::new(algorithm);
    ctx.update(data).unwrap();
    let mut out = vec![0u8; len];
    let written = ctx.finalize_into(&mut out).unwrap();
    out.truncate(written);
    out
}

#[test]
fn test_block_boundaries_match_reference() {
    for algorithm in Algorithm::ALL {
        let rate = algorithm.rate();
        for len in [0, 1, rate - 1, rate, rate + 1, 2 * rate - 1, 2 * rate, 3 * rate + 7] {
            let msg: Vec<u8> = (0..len).map(|i| (i * 31 + 7) as u8).collect();
            let expected = match algorithm.digest_size() {
                Some(_) => reference_digest(algorithm, &msg),
                None => reference_xof(algorithm, &msg, 2 * rate + 3),
            };
            let got = hash(algorithm, &msg, expected.len());
            assert_eq!(got, expected, "{algorithm} with a {len} byte message");
        }
    }
}

#[test]
fn test_sha3_256_one_rate_message() {
    // 136 bytes: exactly one SHA3-256 block, so padding fills a block of its own.
    let msg = [0xA3u8; 136];
    assert_eq!(
        fips202::sha3_256(&msg).to_vec(),
        reference_digest(Algorithm::Sha3_256, &msg)
    );
    assert_ne!(fips202::sha3_256(&msg), fips202::sha3_256(&msg[..135]));
}

#[test]
fn test_permutation_has_no_collisions_on_a_sample() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x243F_6A88_85A3_08D3);
    let mut inputs = HashSet::new();
    let mut outputs = HashSet::new();
    for _ in 0..2000 {
        let state: [u64; STATE_SIZE_U64] = rng.gen();
        // Neighbouring states, differing in a single bit.
        let mut neighbour = state;
        neighbour[rng.gen_range(0..STATE_SIZE_U64)] ^= 1u64 << rng.gen_range(0..64u32);
        for mut s in [state, neighbour] {
            if inputs.insert(s) {
                keccak_f1600(&mut s);
                assert!(outputs.insert(s), "permutation collision");
            }
        }
    }
}

fn arb_data() -> impl Strategy<Value = Vec<u8>> {
    vec(any::<u8>(), 0..600)
}

fn arb_fixed_algorithm() -> impl Strategy<Value = Algorithm> {
    prop_oneof![
        Just(Algorithm::Sha3_224),
        Just(Algorithm::Sha3_256),
        Just(Algorithm::Sha3_384),
        Just(Algorithm::Sha3_512),
    ]
}

fn arb_xof_algorithm() -> impl Strategy<Value = Algorithm> {
    prop_oneof![Just(Algorithm::Shake128), Just(Algorithm::Shake256)]
}

fn arb_algorithm() -> impl Strategy<Value = Algorithm> {
    prop_oneof![arb_fixed_algorithm(), arb_xof_algorithm()]
}

/// Split `data` at the given cut points.
fn chunks<'a>(data: &'a [u8], cuts: &[usize]) -> Vec<&'a [u8]> {
    let mut points: Vec<usize> = cuts.iter().map(|c| c % (data.len() + 1)).collect();
    points.sort_unstable();
    let mut out = Vec::new();
    let mut start = 0;
    for p in points {
        out.push(&data[start..p]);
        start = p;
    }
    out.push(&data[start..]);
    out
}

proptest! {
    #[test]
    fn test_chunking_invariance(
        algorithm in arb_algorithm(),
        data in arb_data(),
        cuts in vec(any::<usize>(), 0..8),
    ) {
        let whole = hash(algorithm, &data, 64);

        let mut ctx = Context::new(algorithm);
        for chunk in chunks(&data, &cuts) {
            ctx.update(chunk).unwrap();
        }
        let mut out = vec![0u8; 64];
        let written = ctx.finalize_into(&mut out).unwrap();
        out.truncate(written);
        prop_assert_eq!(whole, out);
    }

    #[test]
    fn test_stream_consistency(
        algorithm in arb_xof_algorithm(),
        data in arb_data(),
        n in 0usize..400,
        m in 0usize..400,
    ) {
        let mut ctx = Context::new(algorithm);
        ctx.update(&data).unwrap();
        ctx.finalize_xof().unwrap();
        let mut first = vec![0u8; n];
        let mut second = vec![0u8; m];
        ctx.squeeze(&mut first).unwrap();
        ctx.squeeze(&mut second).unwrap();
        first.extend_from_slice(&second);

        prop_assert_eq!(first, reference_xof(algorithm, &data, n + m));
    }

    #[test]
    fn test_matches_reference(algorithm in arb_fixed_algorithm(), data in arb_data()) {
        let digest = fips202::digest(algorithm, &data).unwrap();
        prop_assert_eq!(digest.to_vec(), reference_digest(algorithm, &data));
    }

    #[test]
    fn test_serialized_resume(
        algorithm in arb_algorithm(),
        data in arb_data(),
        cuts in vec(any::<usize>(), 0..8),
    ) {
        let mut ctx = snapshot::init(algorithm);
        for chunk in chunks(&data, &cuts) {
            ctx = snapshot::update(ctx.as_ref(), chunk).unwrap();
        }
        let got = match algorithm.digest_size() {
            Some(_) => snapshot::finalize(ctx.as_ref()).unwrap().to_vec(),
            None => {
                let mut out = vec![0u8; 200];
                snapshot::finalize_xof(ctx.as_ref(), &mut out).unwrap();
                out
            }
        };
        prop_assert_eq!(got, hash(algorithm, &data, 200));
    }

    #[test]
    fn test_malformed_lengths_rejected(data in vec(any::<u8>(), 0..300)) {
        prop_assume!(data.len() != crate::CONTEXT_SIZE);
        prop_assert!(snapshot::update(&data, b"abc").is_err());
        if data.len() != crate::STATE_SIZE_U8 {
            prop_assert!(crate::KeccakState::try_from(&data[..]).is_err());
        }
    }
}
