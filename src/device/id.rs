//! Random device id generation.

use rand::rngs::OsRng;
use rand::RngCore;

/// Length of a generated device id.
pub const DEVICE_ID_LEN: usize = 16;

const HEX_ALPHABET: &[u8; 16] = b"0123456789abcdef";

/// Generates a device id from the operating system's CSPRNG.
pub fn generate_device_id() -> String {
    random_string(&mut OsRng, DEVICE_ID_LEN, HEX_ALPHABET)
}

/// Draws `len` characters from `alphabet` without modulo bias.
///
/// Bytes at or above the largest multiple of the alphabet size that fits in a
/// byte are rejected and redrawn.
pub fn random_string<R: RngCore + ?Sized>(rng: &mut R, len: usize, alphabet: &[u8]) -> String {
    debug_assert!(!alphabet.is_empty() && alphabet.len() <= 256);

    let size = alphabet.len();
    let out_of_range = 256 - 256 % size;
    let mut out = String::with_capacity(len);
    let mut byte = [0u8; 1];

    while out.len() < len {
        rng.fill_bytes(&mut byte);
        let b = byte[0] as usize;
        if b < out_of_range {
            out.push(alphabet[b % size] as char);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_id_shape() {
        for _ in 0..100 {
            let id = generate_device_id();
            assert_eq!(id.len(), DEVICE_ID_LEN);
            assert!(id.bytes().all(|b| HEX_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_digit_distribution_is_uniform() {
        let mut counts = [0usize; 16];
        let samples = 10_000;
        for _ in 0..samples {
            for b in generate_device_id().bytes() {
                let idx = HEX_ALPHABET.iter().position(|&h| h == b).unwrap();
                counts[idx] += 1;
            }
        }

        // Expect 10_000 per digit; sigma is about 97, so 5% is roughly 5 sigma.
        let expected = samples * DEVICE_ID_LEN / 16;
        for (digit, count) in counts.iter().enumerate() {
            let diff = count.abs_diff(expected);
            assert!(
                diff < expected / 20,
                "digit {:x} drawn {} times, expected about {}",
                digit,
                count,
                expected
            );
        }
    }

    #[test]
    fn test_rejection_sampling_skips_biased_bytes() {
        // 256 % 3 == 1, so byte 255 is the single rejected value.
        let mut rng = ByteSeq::new(&[255, 255, 4, 254]);
        assert_eq!(random_string(&mut rng, 2, b"abc"), "bc");

        // Nothing is rejected for a 16-letter alphabet.
        let mut rng = ByteSeq::new(&[255, 0x10, 0x2a]);
        assert_eq!(random_string(&mut rng, 3, HEX_ALPHABET), "f0a");
    }

    /// Replays a fixed byte sequence.
    struct ByteSeq {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl ByteSeq {
        fn new(bytes: &[u8]) -> Self {
            Self {
                bytes: bytes.to_vec(),
                pos: 0,
            }
        }
    }

    impl RngCore for ByteSeq {
        fn next_u32(&mut self) -> u32 {
            unimplemented!()
        }

        fn next_u64(&mut self) -> u64 {
            unimplemented!()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for d in dest {
                *d = self.bytes[self.pos % self.bytes.len()];
                self.pos += 1;
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }
}
