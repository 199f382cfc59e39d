//! `meta.json`, the bookkeeping file the pipeline stages share.
//!
//! Each stage merges its own keys into the existing object, so fetch and
//! normalise results accumulate rather than replace each other.

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// Load the bookkeeping object; a missing file is an empty object.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Map<String, Value>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Map::new());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    match serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?
    {
        Value::Object(map) => Ok(map),
        other => bail!(
            "Expected a JSON object in {}, found {}",
            path.display(),
            kind(&other)
        ),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Merge keys into the bookkeeping file, creating it if needed.
pub fn update<P, F>(path: P, edit: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut Map<String, Value>),
{
    let path = path.as_ref();
    let mut meta = load(path)?;
    edit(&mut meta);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let contents = serde_json::to_string_pretty(&Value::Object(meta))
        .with_context(|| "Failed to serialise meta.json")?;
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

/// The last component of `path`, for recording in the bookkeeping file.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn updates_merge_into_existing_keys() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("data").join("meta.json");

        update(&path, |meta| {
            meta.insert("page".into(), "List of chemical elements".into());
            meta.insert("api".into(), "rest".into());
        })
        .expect("can write meta");
        update(&path, |meta| {
            meta.insert("api".into(), "action".into());
            meta.insert("element_summary_count".into(), 118.into());
        })
        .expect("can update meta");

        let meta = load(&path).expect("can load meta");
        assert_eq!(meta["page"], "List of chemical elements");
        assert_eq!(meta["api"], "action");
        assert_eq!(meta["element_summary_count"], 118);
    }

    #[test]
    fn non_object_files_are_rejected() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("meta.json");
        std::fs::write(&path, "[1, 2]").expect("can write");
        let err = load(&path).expect_err("arrays are rejected");
        assert!(format!("{err:#}").contains("an array"));
    }

    #[test]
    fn file_names_drop_directories() {
        assert_eq!(file_name(Path::new("data/raw/a.json")), "a.json");
    }
}
