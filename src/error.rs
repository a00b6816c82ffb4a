use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while loading, classifying or charting a
/// morphology catalogue.
#[derive(Debug, Error)]
pub enum GalMorphError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("file is empty: {}", .0.display())]
    EmptyFile(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    /// The file exists but could not be read or parsed.
    #[error("could not read {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    /// A required cell is null (or a raw row lacks the key entirely).
    #[error("missing field '{field}'{}", row_suffix(.row))]
    MissingField { field: String, row: Option<usize> },

    /// A required cell holds something that is not a number.
    #[error("column '{field}' in row {row} is not numeric: {value}")]
    InvalidCell {
        field: String,
        row: usize,
        value: String,
    },

    #[error("snapshot {requested} not found; available snapshots: {}", join(.available))]
    SnapshotNotFound { requested: i64, available: Vec<i64> },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("chart rendering failed: {0}")]
    Render(String),

    #[error("could not save {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, GalMorphError>;

fn row_suffix(row: &Option<usize>) -> String {
    match row {
        Some(r) => format!(" in row {r}"),
        None => String::new(),
    }
}

fn join(values: &[i64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_not_found_lists_available_values() {
        let err = GalMorphError::SnapshotNotFound {
            requested: 7,
            available: vec![25, 33, 40],
        };
        assert_eq!(
            err.to_string(),
            "snapshot 7 not found; available snapshots: [25, 33, 40]"
        );
    }

    #[test]
    fn missing_field_mentions_row_when_known() {
        let err = GalMorphError::MissingField {
            field: "P_Disk".into(),
            row: Some(3),
        };
        assert_eq!(err.to_string(), "missing field 'P_Disk' in row 3");

        let err = GalMorphError::MissingField {
            field: "P_Disk".into(),
            row: None,
        };
        assert_eq!(err.to_string(), "missing field 'P_Disk'");
    }
}
