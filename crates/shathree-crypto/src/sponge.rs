//! # SHA3 Sponge
//!
//! `Sha3Context` absorbs input into a [`KeccakState`] `rate` bytes at a
//! time and squeezes a [`Sha3Digest`] out on [`finalize`](Sha3Context::finalize).
//!
//! ## Lifecycle
//!
//! 1. [`Sha3Context::new`] zeroes the state and fixes the rate for the
//!    lifetime of the context.
//! 2. [`absorb`](Sha3Context::absorb) may be called any number of times with
//!    chunks of any size; the permutation fires each time a block fills.
//! 3. [`finalize`](Sha3Context::finalize) pads, permutes, and consumes the
//!    context. The padding writes are destructive, so a finalized context
//!    cannot be absorbed into again; ownership enforces this.
//!
//! Working memory is the 200-byte state plus three counters, independent of
//! input length.

use shathree_core::{DigestSize, RecordSink, Sha3Digest};

use crate::permutation::KeccakState;

/// SHA3 domain-separation suffix `01` followed by the first padding bit.
const PAD_FIRST: u8 = 0x06;

/// Final padding bit, written to the last byte of the block.
const PAD_LAST: u8 = 0x80;

/// Both padding bytes folded into one, for when a single byte of the block
/// remains.
const PAD_SINGLE: u8 = PAD_FIRST | PAD_LAST;

/// An in-progress SHA3 hash.
#[derive(Clone)]
pub struct Sha3Context {
    state: KeccakState,
    size: DigestSize,
    /// Bytes absorbed per permutation call.
    rate: usize,
    /// Bytes staged in the current block, always `< rate`.
    fill: usize,
}

impl Sha3Context {
    /// Start a new hash of the given size.
    pub fn new(size: DigestSize) -> Self {
        Self {
            state: KeccakState::new(),
            size,
            rate: size.rate(),
            fill: 0,
        }
    }

    /// Start a new hash from a raw bit count. Anything other than 224, 256,
    /// 384 or 512 (including 0) selects SHA3-256.
    pub fn with_bits(bits: u32) -> Self {
        Self::new(DigestSize::from_bits_or_default(bits))
    }

    /// The digest size this context will produce.
    pub fn size(&self) -> DigestSize {
        self.size
    }

    /// Block size in bytes.
    pub fn rate(&self) -> usize {
        self.rate
    }

    /// Bytes staged in the current, not yet permuted, block.
    pub fn fill(&self) -> usize {
        self.fill
    }

    /// Absorb a chunk of input.
    ///
    /// Chunking is invisible in the result: absorbing `ab` then `c` yields
    /// the same state as absorbing `abc`. Empty chunks are no-ops.
    pub fn absorb(&mut self, data: &[u8]) {
        let mut input = data;

        // Every rate is a multiple of 8, so a block boundary is always also
        // a lane boundary and whole words can be XORed in one step.
        if self.fill % 8 == 0 {
            let mut words = input.chunks_exact(8);
            for chunk in &mut words {
                let mut word = [0u8; 8];
                word.copy_from_slice(chunk);
                self.state.xor_lane(self.fill / 8, u64::from_le_bytes(word));
                self.fill += 8;
                self.block_complete();
            }
            input = words.remainder();
        }

        for &byte in input {
            self.state.xor_byte(self.fill, byte);
            self.fill += 1;
            self.block_complete();
        }
    }

    fn block_complete(&mut self) {
        if self.fill == self.rate {
            self.state.permute();
            self.fill = 0;
        }
    }

    /// Pad, run the final permutation, and return the digest.
    pub fn finalize(mut self) -> Sha3Digest {
        if self.fill == self.rate - 1 {
            self.absorb(&[PAD_SINGLE]);
        } else {
            self.absorb(&[PAD_FIRST]);
            // Skip the zero bytes: XOR with zero leaves the state unchanged.
            self.fill = self.rate - 1;
            self.absorb(&[PAD_LAST]);
        }
        debug_assert_eq!(self.fill, 0);
        Sha3Digest::from_state(self.size, self.state.as_bytes())
    }
}

impl Default for Sha3Context {
    fn default() -> Self {
        Self::new(DigestSize::default())
    }
}

impl RecordSink for Sha3Context {
    fn absorb(&mut self, bytes: &[u8]) {
        Sha3Context::absorb(self, bytes);
    }
}

impl std::fmt::Debug for Sha3Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sha3Context")
            .field("size", &self.size)
            .field("rate", &self.rate)
            .field("fill", &self.fill)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest(size: DigestSize, data: &[u8]) -> Sha3Digest {
        let mut cx = Sha3Context::new(size);
        cx.absorb(data);
        cx.finalize()
    }

    #[test]
    fn rate_fixed_by_size() {
        assert_eq!(Sha3Context::new(DigestSize::Sha3_224).rate(), 144);
        assert_eq!(Sha3Context::new(DigestSize::Sha3_512).rate(), 72);
    }

    #[test]
    fn invalid_bits_default_to_256() {
        for bits in [0, 1, 255, 257, 1024] {
            let cx = Sha3Context::with_bits(bits);
            assert_eq!(cx.size(), DigestSize::Sha3_256);
            assert_eq!(cx.rate(), 136);
        }
        assert_eq!(Sha3Context::with_bits(384).size(), DigestSize::Sha3_384);
    }

    #[test]
    fn fill_wraps_exactly_at_rate() {
        let mut cx = Sha3Context::new(DigestSize::Sha3_256);
        cx.absorb(&[0u8; 135]);
        assert_eq!(cx.fill(), 135);
        cx.absorb(&[0u8]);
        assert_eq!(cx.fill(), 0);
        cx.absorb(&[0u8; 137]);
        assert_eq!(cx.fill(), 1);
    }

    #[test]
    fn empty_chunks_are_noops() {
        let mut a = Sha3Context::default();
        a.absorb(b"abc");
        let mut b = Sha3Context::default();
        b.absorb(b"");
        b.absorb(b"a");
        b.absorb(b"");
        b.absorb(b"bc");
        b.absorb(b"");
        assert_eq!(a.finalize(), b.finalize());
    }

    #[test]
    fn empty_message_sha3_256() {
        assert_eq!(
            digest(DigestSize::Sha3_256, b"").to_hex(),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn abc_sha3_256() {
        assert_eq!(
            digest(DigestSize::Sha3_256, b"abc").to_hex(),
            "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"
        );
    }

    #[test]
    fn single_byte_padding_branch_agrees_with_reference() {
        use sha3::Digest as _;
        // rate - 1 bytes leave exactly one byte of room.
        let data = vec![0x5a; 135];
        let ours = digest(DigestSize::Sha3_256, &data);
        let theirs = sha3::Sha3_256::digest(&data);
        assert_eq!(ours.as_bytes(), theirs.as_slice());
    }

    #[test]
    fn block_aligned_message_gets_a_full_padding_block() {
        use sha3::Digest as _;
        let data = vec![0x33; 72 * 3];
        let ours = digest(DigestSize::Sha3_512, &data);
        let theirs = sha3::Sha3_512::digest(&data);
        assert_eq!(ours.as_bytes(), theirs.as_slice());
    }

    #[test]
    fn word_path_and_byte_path_agree() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        // Aligned: the first chunk goes through the word path.
        let aligned = digest(DigestSize::Sha3_384, &data);
        // Misaligned: one leading byte forces the byte path for the rest.
        let mut cx = Sha3Context::new(DigestSize::Sha3_384);
        cx.absorb(&data[..1]);
        cx.absorb(&data[1..]);
        assert_eq!(aligned, cx.finalize());
    }

    #[test]
    fn clone_snapshots_intermediate_state() {
        let mut cx = Sha3Context::default();
        cx.absorb(b"prefix");
        let snapshot = cx.clone();
        cx.absorb(b"-suffix");
        assert_eq!(snapshot.finalize(), digest(DigestSize::Sha3_256, b"prefix"));
        assert_eq!(cx.finalize(), digest(DigestSize::Sha3_256, b"prefix-suffix"));
    }

    #[test]
    fn record_sink_absorbs() {
        let mut cx = Sha3Context::default();
        RecordSink::absorb(&mut cx, b"abc");
        assert_eq!(cx.finalize(), digest(DigestSize::Sha3_256, b"abc"));
    }

    #[test]
    fn debug_omits_state() {
        let s = format!("{:?}", Sha3Context::default());
        assert!(s.contains("rate: 136"));
        assert!(!s.contains("lanes"));
    }
}
