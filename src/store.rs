//! Template Store
//!
//! Read-only access to template text. A logical template may live at several
//! candidate locations; the first one that exists wins.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{GeneratorError, Result};

pub trait TemplateStore: Send + Sync {
    /// Read one location. `Ok(None)` means the location does not exist.
    fn read(&self, rel_path: &str) -> Result<Option<String>>;

    /// How a location is reported in errors.
    fn describe(&self, rel_path: &str) -> String {
        rel_path.to_string()
    }

    /// Load the first existing candidate, or fail naming every location tried.
    fn load(&self, template: &str, candidates: &[String]) -> Result<String> {
        for candidate in candidates {
            if let Some(text) = self.read(candidate)? {
                debug!(template, location = %candidate, "resolved template");
                return Ok(text);
            }
        }
        Err(GeneratorError::TemplateNotFound {
            template: template.to_string(),
            attempted: candidates.iter().map(|c| self.describe(c)).collect(),
        })
    }
}

/// Templates on disk, resolved relative to a root directory.
#[derive(Debug, Clone)]
pub struct FsTemplateStore {
    root: PathBuf,
}

impl FsTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateStore for FsTemplateStore {
    fn read(&self, rel_path: &str) -> Result<Option<String>> {
        let path = self.root.join(rel_path);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(GeneratorError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    fn describe(&self, rel_path: &str) -> String {
        self.root.join(rel_path).display().to_string()
    }
}

/// Templates held in memory, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateStore {
    templates: HashMap<String, String>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rel_path: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.templates.insert(rel_path.into(), text.into());
        self
    }

    pub fn remove(&mut self, rel_path: &str) -> Option<String> {
        self.templates.remove(rel_path)
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn read(&self, rel_path: &str) -> Result<Option<String>> {
        Ok(self.templates.get(rel_path).cloned())
    }
}
