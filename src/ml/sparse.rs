//! Sparse feature vectors stored as ordered `(index, value)` pairs.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::ml::sgd_logreg::LearnerError;

/// Feature vector holding only the present entries, in caller order.
///
/// Indices are unique. Iteration order is the insertion order so dot
/// products are reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Build a vector from `(index, value)` pairs, rejecting repeated indices.
    pub fn new<I>(pairs: I) -> Result<Self, LearnerError>
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let entries: Vec<(usize, f64)> = pairs.into_iter().collect();
        let mut seen = HashSet::with_capacity(entries.len());
        for &(index, _) in &entries {
            if !seen.insert(index) {
                return Err(LearnerError::DuplicateFeature { index });
            }
        }
        Ok(Self { entries })
    }

    /// Wrap pairs whose indices are already known to be unique.
    pub(crate) fn from_unique(entries: Vec<(usize, f64)>) -> Self {
        debug_assert!(Self::new(entries.iter().copied()).is_ok());
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn as_slice(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Largest feature index present, if any.
    pub fn max_index(&self) -> Option<usize> {
        self.entries.iter().map(|&(index, _)| index).max()
    }
}

/// Parses the sparse text format: whitespace-separated `index:value` tokens.
impl FromStr for SparseVector {
    type Err = LearnerError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut pairs = Vec::new();
        for token in text.split_whitespace() {
            pairs.push(parse_token(token)?);
        }
        Self::new(pairs)
    }
}

fn parse_token(token: &str) -> Result<(usize, f64), LearnerError> {
    let invalid = || LearnerError::ParseFeature {
        token: token.to_string(),
    };
    let (index, value) = token.split_once(':').ok_or_else(invalid)?;
    let index = index.parse::<usize>().map_err(|_| invalid())?;
    let value = value.parse::<f64>().map_err(|_| invalid())?;
    Ok((index, value))
}

impl fmt::Display for SparseVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, (index, value)) in self.iter().enumerate() {
            if pos > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{index}:{value}")?;
        }
        Ok(())
    }
}
