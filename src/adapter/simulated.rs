use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::{
    domain::{BandPowers, BridgeError, Reading},
    port::ReadingSource
};

/// ASIC band powers are unsigned 24-bit values.
const MAX_BAND_POWER: u32 = (1 << 24) - 1;

/// Stand-in for the headset when no hardware is attached.
///
/// Attention and meditation drift in small steps over 0..=100 the way the
/// eSense meters do; the raw band powers are drawn fresh every reading.
pub struct SimulatedHeadset {
    name:        String,
    empty_ratio: f64,
    state:       Mutex<HeadsetState>
}

struct HeadsetState {
    rng:        StdRng,
    attention:  u32,
    meditation: u32
}

impl SimulatedHeadset {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self::with_rng(name, StdRng::from_os_rng())
    }

    pub fn seeded<N: Into<String>>(name: N, seed: u64) -> Self {
        Self::with_rng(name, StdRng::seed_from_u64(seed))
    }

    fn with_rng<N: Into<String>>(name: N, rng: StdRng) -> Self {
        Self { name: name.into(), empty_ratio: 0.0, state: Mutex::new(HeadsetState { rng, attention: 50, meditation: 50 }) }
    }

    /// Fraction of polls that report nothing new, like a decoder whose queue
    /// ran dry. Clamped to `0.0..=1.0`.
    pub fn with_empty_ratio(mut self, ratio: f64) -> Self {
        self.empty_ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        self
    }

    fn next_bands(&self) -> Option<BandPowers> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if state.rng.random_bool(self.empty_ratio) {
            return None;
        }

        let attention = drift(&mut state.rng, state.attention);
        let meditation = drift(&mut state.rng, state.meditation);
        state.attention = attention;
        state.meditation = meditation;

        let rng = &mut state.rng;
        Some(BandPowers {
            attention,
            meditation,
            delta: rng.random_range(0..=MAX_BAND_POWER),
            theta: rng.random_range(0..=MAX_BAND_POWER / 2),
            low_alpha: rng.random_range(0..=MAX_BAND_POWER / 4),
            high_alpha: rng.random_range(0..=MAX_BAND_POWER / 4),
            low_beta: rng.random_range(0..=MAX_BAND_POWER / 8),
            high_beta: rng.random_range(0..=MAX_BAND_POWER / 8),
            low_gamma: rng.random_range(0..=MAX_BAND_POWER / 16),
            mid_gamma: rng.random_range(0..=MAX_BAND_POWER / 16)
        })
    }
}

fn drift(rng: &mut StdRng, current: u32) -> u32 {
    let step: i64 = rng.random_range(-8..=8);
    (i64::from(current) + step).clamp(0, 100) as u32
}

impl ReadingSource for SimulatedHeadset {
    fn current_reading(&self) -> Result<Option<Reading>, BridgeError> {
        match self.next_bands() {
            Some(bands) => {
                debug!("{} attention={} meditation={}", self.name, bands.attention, bands.meditation);
                bands.to_reading().map(Some)
            }
            None => Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_string_typed_readings_in_range() {
        let headset = SimulatedHeadset::seeded("test", 7);
        for _ in 0..200 {
            let reading = headset.current_reading().unwrap().expect("empty ratio is zero");
            let bands = BandPowers::from_reading(&reading).unwrap();
            assert!(bands.attention <= 100);
            assert!(bands.meditation <= 100);
            assert!(bands.delta <= MAX_BAND_POWER);
            assert!(reading.as_str().contains("\"attention\":\""));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = SimulatedHeadset::seeded("a", 42);
        let b = SimulatedHeadset::seeded("b", 42);
        for _ in 0..20 {
            assert_eq!(a.current_reading().unwrap(), b.current_reading().unwrap());
        }
    }

    #[test]
    fn full_empty_ratio_never_reports() {
        let headset = SimulatedHeadset::seeded("quiet", 1).with_empty_ratio(1.0);
        for _ in 0..50 {
            assert!(headset.current_reading().unwrap().is_none());
        }
    }

    #[test]
    fn empty_ratio_is_clamped() {
        let headset = SimulatedHeadset::seeded("clamped", 1).with_empty_ratio(3.5);
        assert_eq!(headset.empty_ratio, 1.0);
        let headset = SimulatedHeadset::seeded("clamped", 1).with_empty_ratio(-1.0);
        assert_eq!(headset.empty_ratio, 0.0);
    }
}
