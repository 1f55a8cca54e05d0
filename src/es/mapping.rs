use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};

use crate::error::ImportError;

/// `ignore_above` written onto the `command_line` keyword sub-fields. The
/// archived mappings ship with 256, which truncates most command lines.
pub const COMMAND_LINE_IGNORE_ABOVE: u64 = 1024;

/// Paths below `<index>` to the keyword sub-field objects that get patched.
const KEYWORD_FIELD_PATHS: [&[&str]; 2] = [
    &[
        "mappings",
        "properties",
        "process",
        "properties",
        "parent",
        "properties",
        "command_line",
        "fields",
        "keyword",
    ],
    &[
        "mappings",
        "properties",
        "process",
        "properties",
        "command_line",
        "fields",
        "keyword",
    ],
];

pub fn mapping_file_path(directory: &Path, index: &str) -> PathBuf {
    directory.join(format!("{index}.mapping.json"))
}

fn object_at<'a>(
    document: &'a mut Value,
    index: &str,
    path: &[&str],
) -> Result<&'a mut Map<String, Value>, ImportError> {
    let mut walked = index.to_string();
    let mut current = document
        .get_mut(index)
        .ok_or_else(|| ImportError::SchemaShapeMismatch {
            path: walked.clone(),
        })?;

    for segment in path {
        walked.push('.');
        walked.push_str(segment);
        current = current
            .as_object_mut()
            .and_then(|obj| obj.get_mut(*segment))
            .ok_or_else(|| ImportError::SchemaShapeMismatch {
                path: walked.clone(),
            })?;
    }

    current
        .as_object_mut()
        .ok_or(ImportError::SchemaShapeMismatch { path: walked })
}

/// Set `ignore_above` on both `command_line` keyword fields of `index`.
///
/// Both paths are checked before either is written, so a mismatch leaves the
/// document untouched.
pub fn patch_ignore_above(document: &mut Value, index: &str) -> Result<(), ImportError> {
    for path in KEYWORD_FIELD_PATHS {
        object_at(document, index, path)?;
    }
    for path in KEYWORD_FIELD_PATHS {
        object_at(document, index, path)?
            .insert("ignore_above".into(), json!(COMMAND_LINE_IGNORE_ABOVE));
    }
    Ok(())
}

/// Load `<directory>/<index>.mapping.json`, patch it and overwrite it in place.
pub async fn patch_mapping_file(directory: &Path, index: &str) -> Result<PathBuf, ImportError> {
    let path = mapping_file_path(directory, index);
    tracing::info!("Editing mapping file {}", path.display());

    let content = tokio::fs::read(&path)
        .await
        .map_err(|source| ImportError::SchemaLoad {
            path: path.clone(),
            source,
        })?;
    let mut document: Value =
        serde_json::from_slice(&content).map_err(|source| ImportError::SchemaParse {
            path: path.clone(),
            source,
        })?;

    patch_ignore_above(&mut document, index)?;

    let updated = serde_json::to_vec(&document)?;
    tokio::fs::write(&path, updated)
        .await
        .map_err(|source| ImportError::SchemaWrite {
            path: path.clone(),
            source,
        })?;

    Ok(path)
}
