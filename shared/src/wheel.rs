use std::f64::consts::TAU;

use rand::Rng;
use serde::{Serialize, Deserialize};

/// Sentinel label: landing on it means the caller must prompt a re-spin
/// instead of announcing a winner.
pub const RESPIN_LABEL: &str = "RESPIN";

/// Full rotations every spin performs regardless of power.
pub const MIN_ROTATIONS: f64 = 3.0;
/// Additional full rotations contributed by the power slider at power = 1.
pub const ROTATION_SPREAD: f64 = 10.0;
/// Span (in full rotations) of the random component. Two full turns is
/// enough to decorrelate the landing segment from the integer rotation
/// count, which is what makes the outcome independent of power.
pub const EXTRA_ROTATION_SPAN: f64 = 2.0;

pub const MIN_SPIN_DURATION_MS: f64 = 4000.0;
pub const MAX_SPIN_DURATION_MS: f64 = 8000.0;

/// An ordered, non-empty set of equally sized wheel segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelSpec {
    segments: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelError {
    EmptyWheel,
}

impl std::fmt::Display for WheelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WheelError::EmptyWheel => write!(f, "a wheel needs at least one segment"),
        }
    }
}

impl std::error::Error for WheelError {}

impl WheelSpec {
    pub fn new(segments: Vec<String>) -> Result<Self, WheelError> {
        if segments.is_empty() {
            return Err(WheelError::EmptyWheel);
        }
        Ok(Self { segments })
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Angular size of one slice, in radians.
    pub fn segment_angle(&self) -> f64 {
        TAU / self.segments.len() as f64
    }

    pub fn labels(&self) -> &[String] {
        &self.segments
    }

    pub fn label(&self, index: usize) -> &str {
        &self.segments[index]
    }
}

/// The result of a single spin. Immutable once computed; the animation only
/// interpolates toward `final_rotation`, it never changes the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    /// Cumulative rotation in radians, unbounded positive. Feed this back in
    /// as `current_rotation` for the next spin of the session.
    pub final_rotation: f64,
    pub winning_index: usize,
    pub winning_label: String,
    pub is_respin: bool,
}

/// Resolves a random draw plus a power level into a rotation target and the
/// winning segment.
///
/// The power level only stretches the integer rotation count (and, via
/// [`spin_duration_ms`], the animation length); the fractional part of
/// `final_rotation` is driven entirely by the random draw, so every segment
/// wins with probability 1/N regardless of power or the wheel's resting
/// angle from a prior spin.
pub fn resolve_spin<R: Rng + ?Sized>(
    spec: &WheelSpec,
    power: f64,
    current_rotation: f64,
    rng: &mut R,
) -> SpinOutcome {
    let power = power.clamp(0.0, 1.0);
    let base_rotations = MIN_ROTATIONS + power * ROTATION_SPREAD;
    let extra_rotations = rng.gen::<f64>() * EXTRA_ROTATION_SPAN;
    let final_rotation = current_rotation + TAU * (base_rotations + extra_rotations);

    let winning_index = resolve_index(spec, final_rotation);
    let winning_label = spec.label(winning_index).to_string();
    let is_respin = winning_label == RESPIN_LABEL;

    SpinOutcome {
        final_rotation,
        winning_index,
        winning_label,
        is_respin,
    }
}

/// Maps a cumulative rotation to the segment under the fixed pointer. The
/// wheel turns one way while the pointer stays put, so the rotation is
/// inverted before slicing it into segments.
pub fn resolve_index(spec: &WheelSpec, final_rotation: f64) -> usize {
    let n = spec.segment_count();
    let normalized = (TAU - final_rotation.rem_euclid(TAU)).rem_euclid(TAU);
    ((normalized / spec.segment_angle()).floor() as usize) % n
}

/// Quartic ease-out used by the spin animation: fast start, long settle.
pub fn ease_out_quart(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(4)
}

/// Lower power spins for longer: 8s at power 0 down to 4s at power 1.
pub fn spin_duration_ms(power: f64) -> f64 {
    let power = power.clamp(0.0, 1.0);
    MIN_SPIN_DURATION_MS + (1.0 - power) * (MAX_SPIN_DURATION_MS - MIN_SPIN_DURATION_MS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    /// Rng whose `gen::<f64>()` always yields (approximately) `value`.
    struct FixedRng {
        value: f64,
    }

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }

        fn next_u64(&mut self) -> u64 {
            // gen::<f64>() takes the top 53 bits of next_u64.
            ((self.value * (1u64 << 53) as f64) as u64) << 11
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(8) {
                let bytes = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn wheel(n: usize) -> WheelSpec {
        WheelSpec::new((1..=n).map(|i| format!("Name{}", i)).collect()).unwrap()
    }

    fn chi_square(counts: &[u64], trials: u64) -> f64 {
        let expected = trials as f64 / counts.len() as f64;
        counts
            .iter()
            .map(|&c| {
                let d = c as f64 - expected;
                d * d / expected
            })
            .sum()
    }

    #[test]
    fn empty_wheel_is_rejected() {
        assert_eq!(WheelSpec::new(vec![]).unwrap_err(), WheelError::EmptyWheel);
    }

    #[test]
    fn single_segment_always_wins() {
        let spec = WheelSpec::new(vec!["Only".to_string()]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for power in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let outcome = resolve_spin(&spec, power, rng.gen::<f64>() * 100.0, &mut rng);
            assert_eq!(outcome.winning_index, 0);
            assert_eq!(outcome.winning_label, "Only");
        }
    }

    #[test]
    fn resolution_is_deterministic() {
        let spec = wheel(6);
        let a = resolve_spin(&spec, 0.4, 12.5, &mut StdRng::seed_from_u64(99));
        let b = resolve_spin(&spec, 0.4, 12.5, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
        assert_eq!(a.final_rotation.to_bits(), b.final_rotation.to_bits());
    }

    #[test]
    fn eight_segment_worked_scenario() {
        // N=8, power=0.5, current_rotation=0, random fixed at 0.37:
        // base = 3 + 0.5*10 = 8, extra = 0.74, final = 2π*8.74.
        let mut labels: Vec<String> = (1..=7).map(|i| format!("Name{}", i)).collect();
        labels.push(RESPIN_LABEL.to_string());
        let spec = WheelSpec::new(labels).unwrap();

        let outcome = resolve_spin(&spec, 0.5, 0.0, &mut FixedRng { value: 0.37 });
        assert!((outcome.final_rotation - TAU * 8.74).abs() < 1e-9);

        // final mod 2π = 0.74*2π ≈ 4.6496; inverted ≈ 1.6336; /(2π/8) → 2.
        assert_eq!(outcome.winning_index, 2);
        assert_eq!(outcome.winning_label, "Name3");
        assert!(!outcome.is_respin);
    }

    #[test]
    fn respin_sentinel_is_flagged() {
        let spec = WheelSpec::new(vec![RESPIN_LABEL.to_string(), "A".to_string()]).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut saw_respin = false;
        let mut rotation = 0.0;
        for _ in 0..64 {
            let outcome = resolve_spin(&spec, 0.5, rotation, &mut rng);
            rotation = outcome.final_rotation;
            assert_eq!(outcome.is_respin, outcome.winning_index == 0);
            saw_respin |= outcome.is_respin;
        }
        assert!(saw_respin);
    }

    #[test]
    fn selection_is_uniform_chi_square() {
        // Three seeds per wheel size, each checked against the 99.9%
        // critical value for N-1 degrees of freedom; at least two of the
        // three must pass so a single unlucky draw cannot flake the suite.
        const TRIALS: u64 = 20_000;
        for (n, critical) in [(2, 10.83), (5, 18.47), (8, 24.32), (12, 31.26)] {
            let spec = wheel(n);
            let mut passes = 0;
            for seed in [11, 22, 33] {
                let mut rng = StdRng::seed_from_u64(seed * n as u64);
                let mut counts = vec![0u64; n];
                for _ in 0..TRIALS {
                    let outcome = resolve_spin(&spec, rng.gen(), rng.gen::<f64>() * 50.0, &mut rng);
                    counts[outcome.winning_index] += 1;
                }
                if chi_square(&counts, TRIALS) < critical {
                    passes += 1;
                }
            }
            assert!(passes >= 2, "wheel of {} failed uniformity", n);
        }
    }

    #[test]
    fn selection_is_independent_of_power() {
        const TRIALS: u64 = 10_000;
        let spec = wheel(6);
        let ideal = 1.0 / 6.0;
        for (i, power) in [0.0, 0.25, 0.5, 0.75, 1.0].iter().enumerate() {
            let mut rng = StdRng::seed_from_u64(0xFA1A + i as u64);
            let mut counts = vec![0u64; 6];
            let mut rotation = 0.0;
            for _ in 0..TRIALS {
                let outcome = resolve_spin(&spec, *power, rotation, &mut rng);
                rotation = outcome.final_rotation;
                counts[outcome.winning_index] += 1;
            }
            for &c in &counts {
                let freq = c as f64 / TRIALS as f64;
                assert!(
                    (freq - ideal).abs() < 0.02,
                    "power {} skewed a segment to {:.4}",
                    power,
                    freq
                );
            }
        }
    }

    #[test]
    fn chained_spins_do_not_correlate() {
        // Each spin starts from the prior final rotation; repeats of the
        // same winner should happen about 1/N of the time.
        const TRIALS: u64 = 20_000;
        let spec = wheel(8);
        let mut rng = StdRng::seed_from_u64(0xBEEF);
        let mut rotation = 0.0;
        let mut previous = None;
        let mut repeats = 0u64;
        for _ in 0..TRIALS {
            let outcome = resolve_spin(&spec, rng.gen(), rotation, &mut rng);
            rotation = outcome.final_rotation;
            if previous == Some(outcome.winning_index) {
                repeats += 1;
            }
            previous = Some(outcome.winning_index);
        }
        let freq = repeats as f64 / (TRIALS - 1) as f64;
        assert!((freq - 0.125).abs() < 0.02, "repeat frequency {:.4}", freq);
    }

    #[test]
    fn transition_matrix_is_unbiased() {
        const TRIALS: u64 = 20_000;
        let spec = wheel(4);
        let mut rng = StdRng::seed_from_u64(0x7EA);
        let mut rotation = 0.0;
        let mut previous = None;
        let mut transitions = [[0u64; 4]; 4];
        for _ in 0..TRIALS {
            let outcome = resolve_spin(&spec, 0.5, rotation, &mut rng);
            rotation = outcome.final_rotation;
            if let Some(prev) = previous {
                transitions[prev as usize][outcome.winning_index] += 1;
            }
            previous = Some(outcome.winning_index);
        }
        for row in &transitions {
            let total: u64 = row.iter().sum();
            for &cell in row {
                let p = cell as f64 / total as f64;
                assert!((p - 0.25).abs() < 0.05, "transition bias {:.4}", p);
            }
        }
    }

    #[test]
    fn easing_converges_exactly() {
        assert_eq!(ease_out_quart(0.0), 0.0);
        assert_eq!(ease_out_quart(1.0), 1.0);
        let mut last = 0.0;
        for step in 1..=100 {
            let eased = ease_out_quart(step as f64 / 100.0);
            assert!(eased >= last);
            last = eased;
        }
    }

    #[test]
    fn duration_scales_inversely_with_power() {
        assert_eq!(spin_duration_ms(0.0), 8000.0);
        assert_eq!(spin_duration_ms(0.5), 6000.0);
        assert_eq!(spin_duration_ms(1.0), 4000.0);
        assert_eq!(spin_duration_ms(7.0), 4000.0);
    }
}
