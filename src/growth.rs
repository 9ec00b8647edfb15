// WORKLOAD GROWTH
// PULL-BASED, UNBOUNDED SEQUENCE OF CONTAINER COUNTS. ONE VALUE PER TEST
// ROUND. NEVER REWOUND: BUILD A NEW SEQUENCE TO START OVER.

use std::fmt;
use std::str::FromStr;

use crate::error::DriverError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GrowthMode {
    Exponential,
    Linear,
}

impl GrowthMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Exponential => "exponential",
            Self::Linear => "linear",
        }
    }

    // VALIDATES START AND FACTOR FOR THIS MODE BEFORE ANYTHING LAUNCHES
    pub fn sequence(self, start: u64, factor: f64) -> Result<WorkloadSequence, DriverError> {
        if start == 0 {
            return Err(DriverError::InvalidStart(start));
        }
        let invalid = |reason| DriverError::InvalidFactor {
            mode: self.label(),
            factor,
            reason,
        };
        if !factor.is_finite() {
            return Err(invalid("must be finite"));
        }
        let step = match self {
            Self::Exponential => {
                if factor < 1.0 {
                    return Err(invalid("must be >= 1"));
                }
                Step::Multiply(factor)
            }
            Self::Linear => {
                if factor < 1.0 || factor.fract() != 0.0 {
                    return Err(invalid("must be a whole number >= 1"));
                }
                Step::Add(factor as u64)
            }
        };
        Ok(WorkloadSequence { next: start, step })
    }
}

impl FromStr for GrowthMode {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exponential" | "exp" => Ok(Self::Exponential),
            "linear" | "lin" => Ok(Self::Linear),
            _ => Err(DriverError::UnknownGrowthMode(s.to_string())),
        }
    }
}

impl fmt::Display for GrowthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug)]
enum Step {
    Multiply(f64),
    Add(u64),
}

#[derive(Clone, Debug)]
pub struct WorkloadSequence {
    next: u64,
    step: Step,
}

impl WorkloadSequence {
    fn advance(&self, cur: u64) -> u64 {
        match self.step {
            Step::Multiply(factor) => {
                let grown = (cur as f64 * factor).floor() as u64;
                // SMALL COUNTS CAN FLOOR BACK TO THEMSELVES (1 * 1.5 = 1)
                if factor > 1.0 && grown <= cur {
                    cur.saturating_add(1)
                } else {
                    grown
                }
            }
            Step::Add(n) => cur.saturating_add(n),
        }
    }
}

impl Iterator for WorkloadSequence {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let cur = self.next;
        self.next = self.advance(cur);
        Some(cur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_defaults() {
        let seq: Vec<u64> = GrowthMode::Exponential.sequence(100, 1.5).unwrap().take(6).collect();
        assert_eq!(seq, vec![100, 150, 225, 337, 505, 757]);
    }

    #[test]
    fn exponential_is_floor_of_previous() {
        for &(start, factor) in &[(100u64, 1.5f64), (7, 2.0), (1000, 1.1), (3, 3.7)] {
            let seq: Vec<u64> = GrowthMode::Exponential
                .sequence(start, factor)
                .unwrap()
                .take(20)
                .collect();
            for w in seq.windows(2) {
                assert!(w[1] > w[0], "{:?} NOT STRICTLY INCREASING", seq);
                assert_eq!(w[1], (w[0] as f64 * factor).floor() as u64);
            }
        }
    }

    #[test]
    fn exponential_small_start_still_grows() {
        let seq: Vec<u64> = GrowthMode::Exponential.sequence(1, 1.5).unwrap().take(5).collect();
        assert_eq!(seq, vec![1, 2, 3, 4, 6]);
    }

    #[test]
    fn exponential_factor_one_is_constant() {
        let seq: Vec<u64> = GrowthMode::Exponential.sequence(40, 1.0).unwrap().take(3).collect();
        assert_eq!(seq, vec![40, 40, 40]);
    }

    #[test]
    fn linear_adds_modifier() {
        let seq: Vec<u64> = GrowthMode::Linear.sequence(100, 50.0).unwrap().take(5).collect();
        assert_eq!(seq, vec![100, 150, 200, 250, 300]);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(
            GrowthMode::Exponential.sequence(0, 1.5),
            Err(DriverError::InvalidStart(0))
        ));
        assert!(GrowthMode::Exponential.sequence(10, 0.5).is_err());
        assert!(GrowthMode::Exponential.sequence(10, f64::NAN).is_err());
        assert!(GrowthMode::Linear.sequence(10, 1.5).is_err());
        assert!(GrowthMode::Linear.sequence(10, 0.0).is_err());
    }

    #[test]
    fn parse_growth_mode() {
        assert_eq!("exponential".parse::<GrowthMode>().unwrap(), GrowthMode::Exponential);
        assert_eq!("Linear".parse::<GrowthMode>().unwrap(), GrowthMode::Linear);
        assert!(matches!(
            "quadratic".parse::<GrowthMode>(),
            Err(DriverError::UnknownGrowthMode(_))
        ));
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        let mut seq = GrowthMode::Linear.sequence(u64::MAX - 1, 5.0).unwrap();
        assert_eq!(seq.next(), Some(u64::MAX - 1));
        assert_eq!(seq.next(), Some(u64::MAX));
        assert_eq!(seq.next(), Some(u64::MAX));
    }
}
