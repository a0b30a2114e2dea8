use super::EphemerisParameters;
use crate::TimeAxis;

/// Phase-folded view of a time axis
///
/// Derived from a [`TimeAxis`] without touching it; rebuild it whenever the
/// ephemeris changes.
#[derive(Debug, Clone)]
pub struct PhaseAxis {
    ephemeris: EphemerisParameters,
    phases: Vec<f64>,
}

impl PhaseAxis {
    /// Fold the relative values of `axis` with `ephemeris`
    pub fn fold(axis: &TimeAxis, ephemeris: EphemerisParameters) -> Self {
        let phases = axis
            .relative_values()
            .iter()
            .map(|&t| ephemeris.phase_of(t))
            .collect();
        Self { ephemeris, phases }
    }

    pub fn ephemeris(&self) -> EphemerisParameters {
        self.ephemeris
    }

    /// Phase of each row, aligned with the source axis
    pub fn phases(&self) -> &[f64] {
        &self.phases
    }

    /// Row order sorted by phase, for drawing a folded curve left to right
    pub fn sorted_rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = (0..self.phases.len()).collect();
        rows.sort_by(|&a, &b| self.phases[a].total_cmp(&self.phases[b]));
        rows
    }
}
