//! Period Module
//! A (year, quarter) pair identifying one quarter of data.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub quarter: u32,
}

impl Period {
    pub fn new(year: i32, quarter: u32) -> Self {
        Self { year, quarter }
    }

    /// Build a period from raw numeric cells, rejecting non-integral or
    /// out-of-range values.
    pub fn from_cells(year: f64, quarter: f64) -> Option<Self> {
        if !year.is_finite() || !quarter.is_finite() {
            return None;
        }
        if year.fract() != 0.0 || quarter.fract() != 0.0 || !(1.0..=4.0).contains(&quarter) {
            return None;
        }
        Some(Self::new(year as i32, quarter as u32))
    }

    pub fn label(&self) -> String {
        period_label(self.year, self.quarter)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-T{}", self.year, self.quarter)
    }
}

/// Composite period identifier, e.g. `2024-T2`.
pub fn period_label(year: i32, quarter: u32) -> String {
    format!("{}-T{}", year, quarter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_format() {
        assert_eq!(period_label(2024, 2), "2024-T2");
        assert_eq!(Period::new(2014, 1).to_string(), "2014-T1");
    }

    #[test]
    fn orders_by_year_then_quarter() {
        let mut periods = vec![
            Period::new(2024, 1),
            Period::new(2023, 4),
            Period::new(2024, 2),
        ];
        periods.sort();
        assert_eq!(
            periods,
            vec![Period::new(2023, 4), Period::new(2024, 1), Period::new(2024, 2)]
        );
    }

    #[test]
    fn rejects_invalid_cells() {
        assert_eq!(Period::from_cells(2024.0, 2.0), Some(Period::new(2024, 2)));
        assert_eq!(Period::from_cells(2024.0, 5.0), None);
        assert_eq!(Period::from_cells(2024.5, 1.0), None);
        assert_eq!(Period::from_cells(f64::NAN, 1.0), None);
    }
}
