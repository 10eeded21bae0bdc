//! Module identifier → [`SchemaFile`] resolution.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::descriptor_set::parse_descriptor_set_json;
use crate::error::LoadError;
use crate::model::SchemaFile;

/// Source of loaded schema modules, keyed by a module identifier.
pub trait SchemaProvider {
    fn load(&self, module: &str) -> Result<SchemaFile, LoadError>;
}

/// In-memory registry; useful for compiled-in schemas and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    modules: HashMap<String, SchemaFile>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: impl Into<String>, file: SchemaFile) -> &mut Self {
        self.modules.insert(module.into(), file);
        self
    }
}

impl SchemaProvider for StaticProvider {
    fn load(&self, module: &str) -> Result<SchemaFile, LoadError> {
        self.modules
            .get(module)
            .cloned()
            .ok_or_else(|| LoadError::ModuleNotFound {
                module: module.to_string(),
                location: "static registry".to_string(),
            })
    }
}

/// Registry of descriptor-set JSON files under a root directory.
///
/// `acme.payments_pb2` resolves to `<root>/acme/payments_pb2.json`, and the
/// file `acme/payments.proto` is selected from the set it contains. An
/// identifier ending in `.json` is taken as a path (relative to the root
/// unless absolute).
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where `module` lives on disk and which proto file to pick from it.
    pub fn locate(&self, module: &str) -> Result<(PathBuf, String), LoadError> {
        if module.ends_with(".json") {
            let path = self.root.join(module);
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or(LoadError::InvalidModuleId {
                    module: module.to_string(),
                    reason: "descriptor path has no file name",
                })?;
            return Ok((path.clone(), proto_file_name(stem)));
        }

        let segments: Vec<&str> = module.split('.').collect();
        for segment in &segments {
            if segment.is_empty() {
                return Err(LoadError::InvalidModuleId {
                    module: module.to_string(),
                    reason: "empty path segment",
                });
            }
            if segment.contains(['/', '\\']) {
                return Err(LoadError::InvalidModuleId {
                    module: module.to_string(),
                    reason: "path separators are not allowed in dotted identifiers",
                });
            }
        }

        let Some((last, parents)) = segments.split_last() else {
            return Err(LoadError::InvalidModuleId {
                module: module.to_string(),
                reason: "empty identifier",
            });
        };
        let mut path = self.root.clone();
        let mut proto = String::new();
        for parent in parents {
            path.push(parent);
            proto.push_str(parent);
            proto.push('/');
        }
        path.push(format!("{last}.json"));
        proto.push_str(&proto_file_name(last));
        Ok((path, proto))
    }
}

impl SchemaProvider for DirectoryProvider {
    fn load(&self, module: &str) -> Result<SchemaFile, LoadError> {
        let (path, proto) = self.locate(module)?;
        debug!(module, path = %path.display(), proto = %proto, "resolving schema module");

        if !path.is_file() {
            return Err(LoadError::ModuleNotFound {
                module: module.to_string(),
                location: path.display().to_string(),
            });
        }
        let text = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        parse_descriptor_set_json(&text)?.select(&proto)
    }
}

/// `payments_pb2` → `payments.proto`.
fn proto_file_name(stem: &str) -> String {
    let base = stem.strip_suffix("_pb2").unwrap_or(stem);
    format!("{base}.proto")
}
