//! # Keccak-f[1600] Permutation
//!
//! The fixed 1600-bit state transform underlying every SHA3 variant.
//!
//! The state is a 5×5 matrix of 64-bit lanes. Lane `(x, y)` lives at linear
//! index `x + 5y`. Each of the 24 rounds applies, in order:
//!
//! 1. θ: XOR each lane with the parity of two neighbouring columns.
//! 2. ρ: rotate each lane by a fixed per-lane offset.
//! 3. π: relabel lane `(x, y)` to `(y, 2x + 3y)`.
//! 4. χ: `a ^ (!b & c)` across each row.
//! 5. ι: XOR a round constant into lane `(0, 0)`.
//!
//! ## Byte View
//!
//! [`KeccakState`] stores the state as 200 bytes and decodes lanes
//! little-endian on demand. Byte `i` of the view is always byte `i % 8` of
//! lane `i / 8`, whatever the host byte order, so digests are bit-exact
//! across platforms without any aliasing of the lane array.

use shathree_core::size::STATE_BYTES;

/// Number of rounds in Keccak-f[1600].
pub const ROUNDS: usize = 24;

/// Number of 64-bit lanes in the state.
pub const LANES: usize = 25;

/// ι round constants, indexed by round number.
pub const ROUND_CONSTANTS: [u64; ROUNDS] = [
    0x0000_0000_0000_0001,
    0x0000_0000_0000_8082,
    0x8000_0000_0000_808a,
    0x8000_0000_8000_8000,
    0x0000_0000_0000_808b,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8009,
    0x0000_0000_0000_008a,
    0x0000_0000_0000_0088,
    0x0000_0000_8000_8009,
    0x0000_0000_8000_000a,
    0x0000_0000_8000_808b,
    0x8000_0000_0000_008b,
    0x8000_0000_0000_8089,
    0x8000_0000_0000_8003,
    0x8000_0000_0000_8002,
    0x8000_0000_0000_0080,
    0x0000_0000_0000_800a,
    0x8000_0000_8000_000a,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8080,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8008,
];

/// ρ rotation offsets, indexed by `x + 5y`.
pub const ROTATION_OFFSETS: [u32; LANES] = [
    0, 1, 62, 28, 27, //
    36, 44, 6, 55, 20, //
    3, 10, 43, 25, 39, //
    41, 45, 15, 21, 8, //
    18, 2, 61, 56, 14,
];

#[inline(always)]
const fn lane_index(x: usize, y: usize) -> usize {
    x + 5 * y
}

/// Apply the full 24-round Keccak-f[1600] permutation in place.
pub fn keccak_f1600(a: &mut [u64; LANES]) {
    for rc in ROUND_CONSTANTS {
        // θ
        let mut parity = [0u64; 5];
        for (x, p) in parity.iter_mut().enumerate() {
            *p = a[x] ^ a[x + 5] ^ a[x + 10] ^ a[x + 15] ^ a[x + 20];
        }
        for x in 0..5 {
            let d = parity[(x + 4) % 5] ^ parity[(x + 1) % 5].rotate_left(1);
            for y in 0..5 {
                a[lane_index(x, y)] ^= d;
            }
        }

        // ρ and π
        let mut b = [0u64; LANES];
        for x in 0..5 {
            for y in 0..5 {
                let i = lane_index(x, y);
                b[lane_index(y, (2 * x + 3 * y) % 5)] = a[i].rotate_left(ROTATION_OFFSETS[i]);
            }
        }

        // χ
        for y in 0..5 {
            for x in 0..5 {
                a[lane_index(x, y)] = b[lane_index(x, y)]
                    ^ (!b[lane_index((x + 1) % 5, y)] & b[lane_index((x + 2) % 5, y)]);
            }
        }

        // ι
        a[0] ^= rc;
    }
}

/// The 1600-bit sponge state as a byte buffer with lane accessors.
#[derive(Clone, PartialEq, Eq)]
pub struct KeccakState {
    bytes: [u8; STATE_BYTES],
}

impl KeccakState {
    /// The all-zero state.
    pub fn new() -> Self {
        Self {
            bytes: [0u8; STATE_BYTES],
        }
    }

    /// Read lane `i` (0..25).
    pub fn lane(&self, i: usize) -> u64 {
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.bytes[i * 8..i * 8 + 8]);
        u64::from_le_bytes(word)
    }

    /// Overwrite lane `i` (0..25).
    pub fn set_lane(&mut self, i: usize, value: u64) {
        self.bytes[i * 8..i * 8 + 8].copy_from_slice(&value.to_le_bytes());
    }

    /// XOR a full word into lane `i`.
    pub fn xor_lane(&mut self, i: usize, value: u64) {
        let current = self.lane(i);
        self.set_lane(i, current ^ value);
    }

    /// XOR a single byte into position `pos` of the byte view.
    pub fn xor_byte(&mut self, pos: usize, byte: u8) {
        self.bytes[pos] ^= byte;
    }

    /// Decode all lanes.
    pub fn to_lanes(&self) -> [u64; LANES] {
        let mut lanes = [0u64; LANES];
        for (i, lane) in lanes.iter_mut().enumerate() {
            *lane = self.lane(i);
        }
        lanes
    }

    /// Encode all lanes back into the byte view.
    pub fn load_lanes(&mut self, lanes: &[u64; LANES]) {
        for (i, lane) in lanes.iter().enumerate() {
            self.set_lane(i, *lane);
        }
    }

    /// Run Keccak-f[1600] over the state.
    pub fn permute(&mut self) {
        let mut lanes = self.to_lanes();
        keccak_f1600(&mut lanes);
        self.load_lanes(&lanes);
    }

    /// The byte view of the state.
    pub fn as_bytes(&self) -> &[u8; STATE_BYTES] {
        &self.bytes
    }
}

impl Default for KeccakState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeccakState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeccakState")
            .field("lanes", &self.to_lanes())
            .finish()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Agrees with the RustCrypto `keccak` crate on arbitrary states.
        #[test]
        fn matches_reference_permutation(lanes in prop::array::uniform25(any::<u64>())) {
            let mut ours = lanes;
            let mut theirs = lanes;
            keccak_f1600(&mut ours);
            keccak::f1600(&mut theirs);
            prop_assert_eq!(ours, theirs);
        }
    }
}
