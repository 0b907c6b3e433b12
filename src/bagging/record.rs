//! Text records exchanged between the sampler and the trainer.
//!
//! A training record is `<label> <index:value> ...`. After sampling, each
//! line is prefixed by the target model index and a tab.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::ml::sgd_logreg::LearnerError;
use crate::ml::sparse::SparseVector;

/// Errors produced while decoding record lines.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Record has no label")]
    MissingLabel,
    #[error("Invalid label {text:?}")]
    InvalidLabel { text: String },
    #[error("Line has no model index (expected <model>\\t<record>)")]
    MissingModelIndex,
    #[error("Invalid model index {text:?}")]
    InvalidModelIndex { text: String },
    #[error(transparent)]
    Features(#[from] LearnerError),
}

/// One labelled example.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRecord {
    pub label: f64,
    pub features: SparseVector,
}

impl FromStr for LabeledRecord {
    type Err = RecordError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        let (label_text, rest) = match text.split_once(char::is_whitespace) {
            Some((label, rest)) => (label, rest),
            None => (text, ""),
        };
        if label_text.is_empty() {
            return Err(RecordError::MissingLabel);
        }
        let label = label_text
            .parse::<f64>()
            .map_err(|_| RecordError::InvalidLabel {
                text: label_text.to_string(),
            })?;
        let features = rest.parse::<SparseVector>()?;
        Ok(Self { label, features })
    }
}

impl fmt::Display for LabeledRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.features.is_empty() {
            write!(f, "{}", self.label)
        } else {
            write!(f, "{} {}", self.label, self.features)
        }
    }
}

/// A raw record routed to one ensemble member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub model: usize,
    pub record: String,
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.model, self.record)
    }
}

/// Split a `<model>\t<record>` line into its model index and raw record.
pub fn parse_assignment(line: &str) -> Result<Assignment, RecordError> {
    let (model, record) = line.split_once('\t').ok_or(RecordError::MissingModelIndex)?;
    let model = model
        .trim()
        .parse::<usize>()
        .map_err(|_| RecordError::InvalidModelIndex {
            text: model.to_string(),
        })?;
    Ok(Assignment {
        model,
        record: record.trim().to_string(),
    })
}

/// Decode a sampled line into its model index and labelled example.
pub fn parse_assignment_line(line: &str) -> Result<(usize, LabeledRecord), RecordError> {
    let assignment = parse_assignment(line)?;
    let record = assignment.record.parse::<LabeledRecord>()?;
    Ok((assignment.model, record))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_label_and_features() {
        let record: LabeledRecord = "1 0:1.5 4:-2".parse().unwrap();
        assert_eq!(record.label, 1.0);
        assert_eq!(record.features.as_slice(), &[(0, 1.5), (4, -2.0)]);
    }

    #[test]
    fn label_only_record_has_no_features() {
        let record: LabeledRecord = "0\n".parse().unwrap();
        assert_eq!(record.label, 0.0);
        assert!(record.features.is_empty());
        assert_eq!(record.to_string(), "0");
    }

    #[test]
    fn rejects_bad_labels_and_tokens() {
        assert!(matches!(
            "".parse::<LabeledRecord>(),
            Err(RecordError::MissingLabel)
        ));
        assert!(matches!(
            "yes 1:1".parse::<LabeledRecord>(),
            Err(RecordError::InvalidLabel { .. })
        ));
        assert!(matches!(
            "1 1:1 1:2".parse::<LabeledRecord>(),
            Err(RecordError::Features(LearnerError::DuplicateFeature { index: 1 }))
        ));
    }

    #[test]
    fn assignment_line_round_trips() {
        let assignment = Assignment {
            model: 3,
            record: "1 2:0.5".to_string(),
        };
        let line = assignment.to_string();
        assert_eq!(line, "3\t1 2:0.5");
        assert_eq!(parse_assignment(&line).unwrap(), assignment);
        let (model, record) = parse_assignment_line(&line).unwrap();
        assert_eq!(model, 3);
        assert_eq!(record.features.as_slice(), &[(2, 0.5)]);
    }

    #[test]
    fn assignment_requires_numeric_model() {
        assert!(matches!(
            parse_assignment("1 2:0.5"),
            Err(RecordError::MissingModelIndex)
        ));
        assert!(matches!(
            parse_assignment("m1\t1 2:0.5"),
            Err(RecordError::InvalidModelIndex { .. })
        ));
    }
}
