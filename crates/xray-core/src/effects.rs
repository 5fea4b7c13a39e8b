//! Colour-matrix effects applied to the overlay layers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of values in a 4x5 colour matrix.
pub const MATRIX_LEN: usize = 20;

/// Errors produced while parsing an effect matrix.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EffectError {
    #[error("Expected {MATRIX_LEN} matrix values, found {0}")]
    WrongLength(usize),
    #[error("Invalid matrix value: {0}")]
    InvalidValue(String),
}

/// A matrix in an effect chain failed to parse.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Effect matrix {index}: {source}")]
pub struct ChainError {
    pub index: usize,
    #[source]
    pub source: EffectError,
}

/// A 4x5 colour transform, as consumed by `feColorMatrix type="matrix"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorMatrix([f64; MATRIX_LEN]);

impl ColorMatrix {
    pub const IDENTITY: ColorMatrix = ColorMatrix([
        1.0, 0.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]);

    pub fn new(values: [f64; MATRIX_LEN]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64; MATRIX_LEN] {
        &self.0
    }
}

impl FromStr for ColorMatrix {
    type Err = EffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() != MATRIX_LEN {
            return Err(EffectError::WrongLength(parts.len()));
        }

        let mut values = [0.0; MATRIX_LEN];
        for (slot, part) in values.iter_mut().zip(parts) {
            *slot = part
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| EffectError::InvalidValue(part.to_string()))?;
        }
        Ok(Self(values))
    }
}

impl fmt::Display for ColorMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for ColorMatrix {
    type Error = EffectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColorMatrix> for String {
    fn from(matrix: ColorMatrix) -> Self {
        matrix.to_string()
    }
}

/// Ordered list of matrices applied in sequence to one layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectChain(Vec<ColorMatrix>);

impl EffectChain {
    pub fn new(matrices: Vec<ColorMatrix>) -> Self {
        Self(matrices)
    }

    /// Parse each string as a matrix, keeping their order.
    ///
    /// The error names the position of the first matrix that fails.
    pub fn parse<S: AsRef<str>>(sources: &[S]) -> Result<Self, ChainError> {
        sources
            .iter()
            .enumerate()
            .map(|(index, s)| {
                s.as_ref()
                    .parse()
                    .map_err(|source| ChainError { index, source })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// An empty chain means the layer gets no filter group.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorMatrix> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEPIA_DIM: &str = ".3 0 0 0 0 0 .3 0 0 0 0 0 .3 0 0 0 0 0 1 0";

    #[test]
    fn test_parse_matrix() {
        let m: ColorMatrix = SEPIA_DIM.parse().unwrap();
        assert!((m.values()[0] - 0.3).abs() < f64::EPSILON);
        assert!((m.values()[18] - 1.0).abs() < f64::EPSILON);
        assert!(m.values()[1].abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_comma_separated() {
        let m: ColorMatrix = "1,0,0,0,0, 0,1,0,0,0, 0,0,1,0,0, 0,0,0,1,0".parse().unwrap();
        assert_eq!(m, ColorMatrix::IDENTITY);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("1 0 0".parse::<ColorMatrix>(), Err(EffectError::WrongLength(3)));
        let bad = SEPIA_DIM.replacen(".3", "x", 1);
        assert!(matches!(bad.parse::<ColorMatrix>(), Err(EffectError::InvalidValue(_))));
    }

    #[test]
    fn test_display_is_space_separated() {
        let text = ColorMatrix::IDENTITY.to_string();
        assert!(text.starts_with("1 0 0 0 0 0 1"));
        assert_eq!(text.split(' ').count(), MATRIX_LEN);
    }

    #[test]
    fn test_chain_keeps_order() {
        let identity = ColorMatrix::IDENTITY.to_string();
        let chain = EffectChain::parse(&[SEPIA_DIM, identity.as_str()]).unwrap();
        assert_eq!(chain.len(), 2);
        let first = chain.iter().next().unwrap();
        assert_eq!(*first, SEPIA_DIM.parse::<ColorMatrix>().unwrap());
        assert!(EffectChain::default().is_empty());
    }

    #[test]
    fn test_chain_error_names_failing_matrix() {
        let identity = ColorMatrix::IDENTITY.to_string();
        let err = EffectChain::parse(&[identity.as_str(), SEPIA_DIM, "1 2"]).unwrap_err();
        assert_eq!(err.index, 2);
        assert_eq!(err.source, EffectError::WrongLength(2));
    }
}
