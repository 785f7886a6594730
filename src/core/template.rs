//! Template catalog.
//!
//! Templates are plain loadout documents under `<base>/templates/`. The
//! catalog is loaded once per invocation and never written to.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::core::cipher::detect;
use crate::core::constants::{LOADOUT_EXT, TEMPLATE_DIR};
use crate::core::domain::Loadout;
use crate::core::store::codec;
use crate::error::{LoadoutError, Result};

/// Read-only set of named templates.
#[derive(Debug, Default)]
pub struct TemplateCatalog {
    templates: BTreeMap<String, Loadout>,
}

impl TemplateCatalog {
    /// Load every template under `<base>/templates/`.
    ///
    /// A missing directory is an empty catalog. Files that do not parse, or
    /// that are encrypted, are skipped with a warning.
    pub fn load(base: &Path) -> Result<Self> {
        let dir = base.join(TEMPLATE_DIR);
        let mut templates = BTreeMap::new();

        if !dir.is_dir() {
            debug!(dir = %dir.display(), "no template directory");
            return Ok(Self { templates });
        }

        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().map_or(true, |e| e != LOADOUT_EXT) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };

            let bytes = std::fs::read(&path)?;
            if detect::is_encrypted_bytes(&bytes) {
                warn!(template = %name, "encrypted templates are not supported, skipping");
                continue;
            }
            match codec::decode(&bytes) {
                Ok(template) => {
                    templates.insert(name, template);
                }
                Err(reason) => warn!(template = %name, %reason, "skipping unparseable template"),
            }
        }

        debug!(count = templates.len(), "templates loaded");
        Ok(Self { templates })
    }

    /// Look up a template.
    ///
    /// # Errors
    ///
    /// Returns `LoadoutError::TemplateNotFound` for unknown names.
    pub fn get(&self, name: &str) -> Result<&Loadout> {
        self.templates
            .get(name)
            .ok_or_else(|| LoadoutError::TemplateNotFound(name.to_string()).into())
    }

    /// Template names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
