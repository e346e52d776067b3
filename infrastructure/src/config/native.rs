//! Native configuration: merged TOML files plus environment overrides

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use glob::{Pattern, glob};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use toybox_application::ports::configuration_source::split_list;
use toybox_application::{ConfigurationSource, SourceError};
use tracing::debug;

/// Prefix of environment variables merged over the TOML files
pub const ENV_PREFIX: &str = "TOYBOX_";

/// Any value figment can hand back
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NativeValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<NativeValue>),
    Table(BTreeMap<String, NativeValue>),
}

/// A flattened value: nested tables become dotted keys
#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Scalar(String),
    List(Vec<String>),
}

/// Configuration merged from every `*.toml` file of a directory, in
/// lexicographic order with later files winning, then overlaid with
/// `TOYBOX_`-prefixed environment variables (`__` separates key segments).
///
/// Native arrays answer `get_strings` directly, without splitting.
#[derive(Debug, Clone)]
pub struct NativeSource {
    origin: String,
    entries: BTreeMap<String, Entry>,
}

impl NativeSource {
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, SourceError> {
        let dir = dir.as_ref();
        let files = toml_files(dir)?;

        let mut figment = Figment::new();
        for file in &files {
            figment = figment.merge(Toml::file(file));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        debug!(dir = %dir.display(), files = files.len(), "Merging native configuration");
        Self::from_figment(&figment, format!("native:{}", dir.display()))
    }

    pub fn from_figment(figment: &Figment, origin: impl Into<String>) -> Result<Self, SourceError> {
        let tree: BTreeMap<String, NativeValue> = figment
            .extract()
            .map_err(|e| SourceError::Native(e.to_string()))?;

        let mut entries = BTreeMap::new();
        for (key, value) in tree {
            flatten(&key, value, &mut entries)?;
        }
        Ok(Self {
            origin: origin.into(),
            entries,
        })
    }
}

/// Every `*.toml` file directly inside `dir`, sorted
pub fn toml_files(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let pattern = format!("{}/*.toml", Pattern::escape(&dir.to_string_lossy()));
    let paths = glob(&pattern).map_err(|e| SourceError::Native(e.to_string()))?;

    let mut files: Vec<PathBuf> = paths
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

fn flatten(
    key: &str,
    value: NativeValue,
    entries: &mut BTreeMap<String, Entry>,
) -> Result<(), SourceError> {
    match value {
        NativeValue::Table(table) => {
            for (child, value) in table {
                flatten(&format!("{key}.{child}"), value, entries)?;
            }
        }
        NativeValue::List(items) => {
            let items = items
                .into_iter()
                .map(|item| scalar(key, item))
                .collect::<Result<Vec<_>, _>>()?;
            entries.insert(key.to_string(), Entry::List(items));
        }
        other => {
            entries.insert(key.to_string(), Entry::Scalar(scalar(key, other)?));
        }
    }
    Ok(())
}

fn scalar(key: &str, value: NativeValue) -> Result<String, SourceError> {
    match value {
        NativeValue::Bool(b) => Ok(b.to_string()),
        NativeValue::Integer(i) => Ok(i.to_string()),
        NativeValue::Float(f) => Ok(f.to_string()),
        NativeValue::Text(s) => Ok(s),
        NativeValue::List(_) | NativeValue::Table(_) => Err(SourceError::Native(format!(
            "'{key}' nests a list or table inside a list"
        ))),
    }
}

impl ConfigurationSource for NativeSource {
    fn describe(&self) -> String {
        self.origin.clone()
    }

    fn keys(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, entry)| match entry {
                Entry::Scalar(s) => !s.is_empty(),
                Entry::List(items) => !items.is_empty(),
            })
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Lists are joined with `,`
    fn get_string(&self, key: &str) -> Result<Option<String>, SourceError> {
        Ok(match self.entries.get(key) {
            Some(Entry::Scalar(s)) if !s.is_empty() => Some(s.clone()),
            Some(Entry::List(items)) if !items.is_empty() => Some(items.join(",")),
            _ => None,
        })
    }

    fn get_strings(&self, key: &str, delimiter: &str) -> Result<Option<Vec<String>>, SourceError> {
        match self.entries.get(key) {
            Some(Entry::List(items)) if !items.is_empty() => Ok(Some(items.clone())),
            Some(Entry::Scalar(s)) if !s.is_empty() => split_list(key, s, delimiter).map(Some),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_tables_flatten_to_dotted_keys() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("toy.toml"),
            r#"
[rf]
base_dir = "/data"
old_names = ["a", "b"]
overwrite = true

[lw]
workers = 4
ratio = 0.5
"#,
        )
        .unwrap();

        let source = NativeSource::load(dir.path()).unwrap();
        assert_eq!(source.get_string("rf.base_dir").unwrap().as_deref(), Some("/data"));
        assert_eq!(
            source.get_strings("rf.old_names", ";").unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(source.get_bool("rf.overwrite").unwrap(), Some(true));
        assert_eq!(source.get_int("lw.workers").unwrap(), Some(4));
        assert_eq!(source.get_double("lw.ratio").unwrap(), Some(0.5));
        assert!(source.keys().contains(&"rf.old_names".to_string()));
    }

    #[test]
    fn test_later_files_win() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.toml"), "[lts]\nseparator = \",\"\nlines = \"x\"\n").unwrap();
        fs::write(dir.path().join("b.toml"), "[lts]\nseparator = \";\"\n").unwrap();

        let source = NativeSource::load(dir.path()).unwrap();
        assert_eq!(source.get_string("lts.separator").unwrap().as_deref(), Some(";"));
        assert_eq!(source.get_string("lts.lines").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_environment_overrides_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("toy.toml", "[ev]\nworkers = 2\nplateau = \"1,1\"\nname = \"kept\"\n")?;
            jail.set_env("TOYBOX_EV__WORKERS", "7");
            jail.set_env("TOYBOX_EV__PLATEAU", "5,5");

            let source = NativeSource::load(jail.directory()).map_err(|e| e.to_string())?;
            assert_eq!(source.get_int("ev.workers").map_err(|e| e.to_string())?, Some(7));
            assert_eq!(
                source.get_strings("ev.plateau", ",").map_err(|e| e.to_string())?,
                Some(vec!["5".to_string(), "5".to_string()])
            );
            assert_eq!(
                source.get_string("ev.name").map_err(|e| e.to_string())?.as_deref(),
                Some("kept")
            );
            Ok(())
        });
    }

    #[test]
    fn test_scalar_lists_are_split() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("t.toml"), "[rf]\nnew_names = \"c;d\"\nempty = \"\"\n").unwrap();

        let source = NativeSource::load(dir.path()).unwrap();
        assert_eq!(
            source.get_strings("rf.new_names", ";").unwrap(),
            Some(vec!["c".to_string(), "d".to_string()])
        );
        assert_eq!(source.get_string("rf.empty").unwrap(), None);
    }

    #[test]
    fn test_toml_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.toml"), "").unwrap();
        fs::write(dir.path().join("a.toml"), "").unwrap();
        fs::write(dir.path().join("c.txt"), "").unwrap();

        let files = toml_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.toml", "b.toml"]);
    }
}
