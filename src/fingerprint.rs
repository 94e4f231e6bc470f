//! Parameter fingerprints used as cache keys
//!
//! The fingerprint hashes a fixed-precision text form of a [`ParameterSet`]:
//! amplitude to two decimals, horizon to one. Slider jitter below what the UI
//! can display therefore maps to the same key, while every value the UI can
//! actually show maps to a different one.
//!
//! Collisions between sets that are meant to differ are not detected.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::constants::params::{AMPLITUDE_DECIMALS, HORIZON_DECIMALS};
use crate::params::ParameterSet;

/// Opaque 32-byte digest of a parameter set
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First eight hex digits, for badges and log lines
    pub fn short(&self) -> String {
        self.0[..4].iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short())
    }
}

/// Fingerprint a parameter set
pub fn fingerprint(params: &ParameterSet) -> Fingerprint {
    let canonical = canonical_form(params);
    let digest = Sha256::digest(canonical.as_bytes());

    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    Fingerprint(bytes)
}

/// Text hashed by [`fingerprint`]
pub fn canonical_form(params: &ParameterSet) -> String {
    format!(
        "{}_{}_{}_{}",
        params.count,
        fixed(params.driving_amplitude, AMPLITUDE_DECIMALS),
        fixed(params.time_horizon, HORIZON_DECIMALS),
        params.quality
    )
}

/// Fixed-point formatting without a sign on rounded zero
fn fixed(value: f64, places: usize) -> String {
    let text = format!("{:.*}", places, value);
    match text.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Quality;
    use std::collections::HashSet;

    #[test]
    fn test_canonical_form() {
        let p = ParameterSet::new(8, 0.5, 15.0, Quality::Balanced);
        assert_eq!(canonical_form(&p), "8_0.50_15.0_Balanced");
    }

    #[test]
    fn test_negative_zero_amplitude() {
        let a = ParameterSet::new(3, -0.001, 10.0, Quality::Fast);
        let b = ParameterSet::new(3, 0.0, 10.0, Quality::Fast);
        assert_eq!(canonical_form(&a), "3_0.00_10.0_Fast");
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_stable_across_calls() {
        let p = ParameterSet::new(100, 1.3, 22.5, Quality::High);
        assert_eq!(fingerprint(&p).as_bytes(), fingerprint(&p).as_bytes());
        assert_eq!(fingerprint(&p).to_string().len(), 64);
        assert_eq!(fingerprint(&p).short().len(), 8);
    }

    #[test]
    fn test_sub_resolution_jitter_shares_key() {
        let base = ParameterSet::new(8, 0.50, 15.0, Quality::Balanced);
        let jittered = ParameterSet::new(8, 0.5012, 15.04, Quality::Balanced);
        let slider_noise = ParameterSet::new(8, 0.1 + 0.4, 14.999_999, Quality::Balanced);

        assert_eq!(fingerprint(&base), fingerprint(&jittered));
        assert_eq!(fingerprint(&base), fingerprint(&slider_noise));
    }

    #[test]
    fn test_distinct_inputs_differ() {
        let mut corpus = Vec::new();
        for count in [1, 2, 8, 20, 21, 500] {
            for amp in [0.0, 0.01, 0.1, 0.5, 0.51, 1.0, 2.0] {
                for horizon in [5.0, 5.1, 7.5, 15.0, 50.0] {
                    for quality in Quality::ALL {
                        corpus.push(ParameterSet::new(count, amp, horizon, quality));
                    }
                }
            }
        }

        let keys: HashSet<Fingerprint> = corpus.iter().map(fingerprint).collect();
        assert_eq!(keys.len(), corpus.len());
    }
}
