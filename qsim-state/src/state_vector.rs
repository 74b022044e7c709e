//! Dense state vector of an n-qubit register

use crate::bloch::BlochVector;
use crate::expansion;
use crate::measurement::QubitMeasurement;
use crate::{DEFAULT_PARALLEL_THRESHOLD, MAX_QUBITS};
use num_complex::Complex64;
use qsim_core::{QuantumError, QubitId, Result};
use std::fmt;

/// The 2^n complex amplitudes of an n-qubit register
///
/// Amplitude `i` belongs to the basis state whose binary digits, read from
/// the most-significant end, are the values of qubits 0, 1, ..., n-1: in a
/// 2-qubit register index 2 is `|10⟩`, qubit 0 set. The vector stays normalized: it is created normalized, gates
/// are unitary and collapse rescales the surviving amplitudes.
///
/// # Example
/// ```
/// use qsim_gates::lookup;
/// use qsim_state::StateVector;
///
/// let mut state = StateVector::new(2).unwrap();
/// state.apply(lookup("H").unwrap().matrix, &[0usize]).unwrap();
/// state.apply(lookup("CNOT").unwrap().matrix, &[0usize, 1]).unwrap();
///
/// let p = state.probabilities();
/// assert!((p[0] - 0.5).abs() < 1e-12);
/// assert!((p[3] - 0.5).abs() < 1e-12);
/// ```
#[derive(Clone, PartialEq)]
pub struct StateVector {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
    /// Registers of at least this many qubits use the parallel sweep
    parallel_threshold: usize,
}

impl StateVector {
    /// |0...0⟩ on `num_qubits` qubits
    ///
    /// # Errors
    /// `InvalidQubitCount` unless `1 <= num_qubits <= MAX_QUBITS`.
    pub fn new(num_qubits: usize) -> Result<Self> {
        check_qubit_count(num_qubits)?;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            num_qubits,
            amplitudes,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// A caller-supplied state
    ///
    /// The amplitudes are taken as given: a state whose squared norm differs
    /// from 1 by more than `tolerance` is rejected rather than rescaled.
    ///
    /// # Errors
    /// `StateLengthMismatch` if the length is not `2^num_qubits`,
    /// `NotNormalized` if the norm is off.
    pub fn from_amplitudes(
        num_qubits: usize,
        amplitudes: Vec<Complex64>,
        tolerance: f64,
    ) -> Result<Self> {
        check_qubit_count(num_qubits)?;
        let expected = 1 << num_qubits;
        if amplitudes.len() != expected {
            return Err(QuantumError::StateLengthMismatch {
                expected,
                actual: amplitudes.len(),
            });
        }

        let norm_squared: f64 = amplitudes.iter().map(|a| a.norm_sqr()).sum();
        let within = (norm_squared - 1.0).abs() <= tolerance;
        if !within {
            return Err(QuantumError::NotNormalized { norm_squared });
        }

        Ok(Self {
            num_qubits,
            amplitudes,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Computational basis state `|index⟩`
    pub fn basis_state(num_qubits: usize, index: usize) -> Result<Self> {
        let mut state = Self::new(num_qubits)?;
        if index >= state.dimension() {
            return Err(QuantumError::StateLengthMismatch {
                expected: state.dimension(),
                actual: index + 1,
            });
        }
        state.amplitudes[0] = Complex64::new(0.0, 0.0);
        state.amplitudes[index] = Complex64::new(1.0, 0.0);
        Ok(state)
    }

    /// Set the register size from which gates run on the rayon pool
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of amplitudes, `2^n`
    #[inline]
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Read-only view of the amplitudes
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Take the amplitudes out of the state
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// `|aᵢ|²` for every basis state
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Probability of one basis state
    pub fn probability(&self, index: usize) -> Option<f64> {
        self.amplitudes.get(index).map(|a| a.norm_sqr())
    }

    /// `Σ|aᵢ|²`
    pub fn norm_squared(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    pub fn is_normalized(&self, tolerance: f64) -> bool {
        (self.norm_squared() - 1.0).abs() <= tolerance
    }

    /// Ket label of a basis index, qubit 0 first, e.g. `|10⟩`
    pub fn basis_label(&self, index: usize) -> String {
        format!("|{:0width$b}⟩", index, width = self.num_qubits)
    }

    /// Apply a gate matrix to `targets` (first target = most-significant
    /// local bit)
    ///
    /// On error the amplitudes are unchanged.
    pub fn apply<Q: Copy + Into<usize>>(&mut self, matrix: &[Complex64], targets: &[Q]) -> Result<()> {
        let parallel = self.num_qubits >= self.parallel_threshold;
        expansion::apply_gate(&mut self.amplitudes, self.num_qubits, matrix, targets, parallel)
    }

    fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.num_qubits {
            return Err(QuantumError::qubit_out_of_range(qubit, self.num_qubits));
        }
        Ok(())
    }

    /// Probability of reading `outcome` on `qubit`
    pub fn probability_of(&self, qubit: usize, outcome: u8) -> Result<f64> {
        self.check_qubit(qubit)?;
        let qubit = QubitId::new(qubit);
        let want = usize::from(outcome & 1);
        Ok(self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| qubit.bit_of(*i, self.num_qubits) == want)
            .map(|(_, a)| a.norm_sqr())
            .sum())
    }

    /// Probability of reading 0 on `qubit`
    pub fn probability_of_zero(&self, qubit: usize) -> Result<f64> {
        self.probability_of(qubit, 0)
    }

    /// Measure `qubit` using a uniform sample `random_value` in [0, 1)
    ///
    /// The outcome is 0 iff `random_value < P(0)`. Probabilities below
    /// `epsilon` count as exactly zero, so a near-certain qubit always yields
    /// its certain value. The state then collapses onto the outcome.
    ///
    /// # Example
    /// ```
    /// use qsim_state::StateVector;
    ///
    /// let mut state = StateVector::new(1).unwrap();
    /// let m = state.measure_qubit(0, 0.999, 1e-10).unwrap();
    /// assert_eq!(m.outcome, 0);
    /// assert_eq!(m.probability, 1.0);
    /// ```
    pub fn measure_qubit(
        &mut self,
        qubit: usize,
        random_value: f64,
        epsilon: f64,
    ) -> Result<QubitMeasurement> {
        let p0 = self.probability_of(qubit, 0)?;
        let p1 = self.probability_of(qubit, 1)?;

        let outcome = if p0 < epsilon {
            1
        } else if p1 < epsilon {
            0
        } else if random_value < p0 {
            0
        } else {
            1
        };

        let probability = self.collapse(qubit, outcome, epsilon)?;
        Ok(QubitMeasurement {
            qubit,
            outcome,
            probability,
        })
    }

    /// Project `qubit` onto `outcome` and renormalize
    ///
    /// Returns the probability the outcome had.
    ///
    /// # Errors
    /// `DegenerateMeasurement` if that probability is below `epsilon` or is
    /// zero; the amplitudes are left untouched.
    pub fn collapse(&mut self, qubit: usize, outcome: u8, epsilon: f64) -> Result<f64> {
        let probability = self.probability_of(qubit, outcome)?;
        if !(probability >= epsilon && probability > 0.0) {
            return Err(QuantumError::DegenerateMeasurement {
                qubit,
                outcome,
                probability,
            });
        }

        let keep = usize::from(outcome & 1);
        let scale = 1.0 / probability.sqrt();
        let (target, n) = (QubitId::new(qubit), self.num_qubits);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if target.bit_of(i, n) == keep {
                *amp *= scale;
            } else {
                *amp = Complex64::new(0.0, 0.0);
            }
        }
        Ok(probability)
    }

    /// `⟨self|other⟩`
    pub fn inner_product(&self, other: &StateVector) -> Result<Complex64> {
        if self.dimension() != other.dimension() {
            return Err(QuantumError::StateLengthMismatch {
                expected: self.dimension(),
                actual: other.dimension(),
            });
        }
        Ok(self
            .amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// `|⟨self|other⟩|²`
    pub fn fidelity(&self, other: &StateVector) -> Result<f64> {
        Ok(self.inner_product(other)?.norm_sqr())
    }

    /// Whether two states agree amplitude-wise within `tolerance`
    ///
    /// Global phase is significant here; use [`fidelity`](Self::fidelity)
    /// to compare up to phase.
    pub fn approx_eq(&self, other: &StateVector, tolerance: f64) -> bool {
        self.dimension() == other.dimension()
            && self
                .amplitudes
                .iter()
                .zip(&other.amplitudes)
                .all(|(a, b)| qsim_core::complex::approx_eq(*a, *b, tolerance))
    }

    /// 2×2 reduced density matrix of `qubit`, row-major
    ///
    /// `ρ[a][b] = Σₖ ψ(a,k) ψ*(b,k)` where `k` runs over the other qubits.
    pub fn reduced_density_matrix(&self, qubit: QubitId) -> Result<[Complex64; 4]> {
        let q = qubit.index();
        self.check_qubit(q)?;

        let mut rho = [Complex64::new(0.0, 0.0); 4];
        let mask = qubit.mask(self.num_qubits);
        for i in (0..self.dimension()).filter(|i| i & mask == 0) {
            let a0 = self.amplitudes[i];
            let a1 = self.amplitudes[i | mask];
            rho[0] += a0 * a0.conj();
            rho[1] += a0 * a1.conj();
            rho[2] += a1 * a0.conj();
            rho[3] += a1 * a1.conj();
        }
        Ok(rho)
    }

    /// Bloch vector of one qubit's reduced state
    pub fn bloch_vector(&self, qubit: QubitId) -> Result<BlochVector> {
        Ok(BlochVector::from_density_matrix(&self.reduced_density_matrix(qubit)?))
    }

    /// Bloch vectors of every qubit, qubit 0 first
    pub fn bloch_vectors(&self) -> Vec<BlochVector> {
        (0..self.num_qubits)
            .filter_map(|q| self.bloch_vector(QubitId::new(q)).ok())
            .collect()
    }

    /// Reset to |0...0⟩
    pub fn reset(&mut self) {
        self.amplitudes.fill(Complex64::new(0.0, 0.0));
        self.amplitudes[0] = Complex64::new(1.0, 0.0);
    }
}

fn check_qubit_count(num_qubits: usize) -> Result<()> {
    if num_qubits == 0 || num_qubits > MAX_QUBITS {
        return Err(QuantumError::InvalidQubitCount {
            num_qubits,
            max: MAX_QUBITS,
        });
    }
    Ok(())
}

impl Default for StateVector {
    fn default() -> Self {
        Self {
            num_qubits: 1,
            amplitudes: vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl fmt::Debug for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateVector")
            .field("num_qubits", &self.num_qubits)
            .field("dimension", &self.dimension())
            .field("norm_squared", &self.norm_squared())
            .finish()
    }
}

/// Non-negligible terms, e.g. `0.707|00⟩ + 0.707|11⟩`
impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            if amp.norm_sqr() <= 1e-10 {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            let value = qsim_core::complex::format_amplitude(*amp);
            if amp.re.abs() > 1e-10 && amp.im.abs() > 1e-10 {
                write!(f, "({}){}", value, self.basis_label(i))?;
            } else {
                write!(f, "{}{}", value, self.basis_label(i))?;
            }
            first = false;
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}
