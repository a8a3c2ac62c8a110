// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-function benchmark observations.
//!
//! A benchmark binary reports one line per function:
//!
//! ```text
//! s000 1.234 12345678
//! ```
//!
//! i.e. `<name> <duration> <checksum>`, whitespace separated. Anything else
//! on a data line is a fatal parse error.

use crate::error::{Result, VecbenchError};

/// One observation for one function from one binary.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRecord {
    /// Benchmark function identifier, as printed by the suite.
    pub function_name: String,
    /// Measured execution time in seconds.
    pub duration: f64,
    /// Opaque result token; only equality is meaningful.
    pub checksum: String,
}

impl BenchmarkRecord {
    /// Parses one data line of a benchmark binary's output.
    ///
    /// # Errors
    ///
    /// Returns [`VecbenchError::MalformedLine`] if the line does not split
    /// into exactly three fields, or if the duration field is not a
    /// non-negative float.
    pub fn from_output_line(line: &str) -> Result<Self> {
        let mut fields = line.split_whitespace();
        let (Some(name), Some(duration), Some(checksum), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(VecbenchError::MalformedLine {
                line: line.to_owned(),
                reason: "expected exactly three whitespace-separated fields".to_owned(),
            });
        };

        let duration: f64 = duration.parse().map_err(|_| VecbenchError::MalformedLine {
            line: line.to_owned(),
            reason: format!("duration field {duration:?} is not a float"),
        })?;
        if !duration.is_finite() || duration < 0.0 {
            return Err(VecbenchError::MalformedLine {
                line: line.to_owned(),
                reason: format!("duration {duration} is not a non-negative finite float"),
            });
        }

        Ok(Self {
            function_name: name.to_owned(),
            duration,
            checksum: checksum.to_owned(),
        })
    }
}

/// An aligned pair of observations for the same function, one from each
/// build.
///
/// Pairs can only be constructed through [`RecordPair::try_new`], so holding
/// one is proof that the two streams agreed on the function under test.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPair {
    /// Observation from the scalar build.
    pub scalar: BenchmarkRecord,
    /// Observation from the vectorized build.
    pub vector: BenchmarkRecord,
}

impl RecordPair {
    /// Pairs two observations.
    ///
    /// # Errors
    ///
    /// Returns [`VecbenchError::Misaligned`] when the two records name
    /// different functions. The two binaries must enumerate the suite in
    /// the same order, so a mismatch means they have drifted out of sync.
    pub fn try_new(scalar: BenchmarkRecord, vector: BenchmarkRecord) -> Result<Self> {
        if scalar.function_name != vector.function_name {
            return Err(VecbenchError::Misaligned {
                scalar: scalar.function_name,
                vector: vector.function_name,
            });
        }
        Ok(Self { scalar, vector })
    }

    /// The function both records describe.
    #[must_use]
    pub fn function_name(&self) -> &str {
        &self.scalar.function_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_line() {
        let record = BenchmarkRecord::from_output_line("s000 1.25 8b9c").unwrap();
        assert_eq!(record.function_name, "s000");
        assert!((record.duration - 1.25).abs() < f64::EPSILON);
        assert_eq!(record.checksum, "8b9c");
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        let record = BenchmarkRecord::from_output_line("  s1115 \t 0.5   42 ").unwrap();
        assert_eq!(record.function_name, "s1115");
        assert_eq!(record.checksum, "42");
    }

    #[test]
    fn test_parse_rejects_wrong_field_counts() {
        assert!(BenchmarkRecord::from_output_line("s000 1.25").is_err());
        assert!(BenchmarkRecord::from_output_line("s000 1.25 8b9c extra").is_err());
        assert!(BenchmarkRecord::from_output_line("").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_duration() {
        assert!(BenchmarkRecord::from_output_line("s000 fast 8b9c").is_err());
        assert!(BenchmarkRecord::from_output_line("s000 -1.0 8b9c").is_err());
        assert!(BenchmarkRecord::from_output_line("s000 inf 8b9c").is_err());
    }

    #[test]
    fn test_pair_accepts_matching_names() {
        let scalar = BenchmarkRecord::from_output_line("bar 2.5 ABC123").unwrap();
        let vector = BenchmarkRecord::from_output_line("bar 0.5 ABC123").unwrap();
        let pair = RecordPair::try_new(scalar, vector).unwrap();
        assert_eq!(pair.function_name(), "bar");
    }

    #[test]
    fn test_pair_rejects_diverged_names() {
        let scalar = BenchmarkRecord::from_output_line("qux 1.0 X").unwrap();
        let vector = BenchmarkRecord::from_output_line("quux 1.0 X").unwrap();
        let err = RecordPair::try_new(scalar, vector).unwrap_err();
        assert!(matches!(err, VecbenchError::Misaligned { .. }));
    }
}
