//! Delimited text parsing.
//!
//! Splits raw sheet exports into a matrix of string cells. Fields are split
//! on a single delimiter character with no quoting or escaping, so a
//! delimiter inside a field is not supported.

use crate::error::{CatalogError, Result};
use crate::models::RawMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Field delimiter for the input text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Tab,
    Comma,
}

impl Delimiter {
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Tab => '\t',
            Delimiter::Comma => ',',
        }
    }

    /// Detect the delimiter from a source URL or path.
    ///
    /// Published sheets requested with `output=tsv`, and `.tsv` files, are
    /// tab separated; everything else is treated as comma separated.
    pub fn detect(source: &str) -> Self {
        let lower = source.to_lowercase();
        if lower.contains("output=tsv") || lower.ends_with(".tsv") {
            Delimiter::Tab
        } else {
            Delimiter::Comma
        }
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tab" | "tsv" | "\\t" => Ok(Delimiter::Tab),
            "comma" | "csv" | "," => Ok(Delimiter::Comma),
            other => Err(format!(
                "unknown delimiter '{}' (expected 'tab' or 'comma')",
                other
            )),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Tab => f.write_str("tab"),
            Delimiter::Comma => f.write_str("comma"),
        }
    }
}

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Split text into rows and cells, dropping blank lines
pub fn parse_delimited(text: &str, delimiter: Delimiter) -> RawMatrix {
    let sep = delimiter.as_char();
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);

    let matrix: RawMatrix = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split(sep).map(str::to_string).collect())
        .collect();

    debug!(
        "Parsed {} rows using {} delimiter",
        matrix.len(),
        delimiter
    );

    matrix
}

/// Reject matrices with no rows or a header without any non-empty cell
pub fn validate_matrix(matrix: &RawMatrix) -> Result<()> {
    let header = matrix.first().ok_or_else(|| CatalogError::EmptyDataset {
        reason: "no rows in input".to_string(),
    })?;

    if header.iter().all(|cell| cell.trim().is_empty()) {
        return Err(CatalogError::EmptyDataset {
            reason: "header row has no cells".to_string(),
        });
    }

    Ok(())
}
