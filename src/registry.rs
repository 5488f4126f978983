//! Persona Registry - Index of Available Personas

use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::persona::Persona;
use crate::DESCRIPTOR_FILE;

/// What happened to one persona during [`PersonaRegistry::reload_all`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ReloadOutcome {
    Unchanged { id: String },
    Changed { id: String, fingerprint: String },
    Failed { id: String, error: String },
}

/// Persona registry - loads and indexes personas by id
pub struct PersonaRegistry {
    personas: HashMap<String, Arc<Persona>>,
}

impl PersonaRegistry {
    pub fn new() -> Self {
        Self { personas: HashMap::new() }
    }

    /// Load every `<dir>/<name>/persona.json` below `dir`.
    ///
    /// Images of persona `<name>` are addressed as `<path_prefix>/<name>/...`.
    /// Personas that fail to load are skipped.
    pub fn load_from_dir(dir: &Path, path_prefix: &str) -> Result<Self, io::Error> {
        let mut registry = Self::new();
        if !dir.exists() {
            log::warn!("Persona directory {} does not exist", dir.display());
            return Ok(registry);
        }

        let mut entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
        // Later directories win id collisions, so the order must be stable
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let descriptor = path.join(DESCRIPTOR_FILE);
            if !path.is_dir() || !descriptor.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let image_base_path = format!("{}/{}", path_prefix, name);
            match Persona::load(&descriptor, &path, image_base_path) {
                Ok(persona) => registry.register(Arc::new(persona)),
                Err(e) => log::warn!("Skipping persona in {}: {}", path.display(), e),
            }
        }

        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<Arc<Persona>> {
        self.personas.get(id).cloned()
    }

    /// All personas, sorted by id.
    pub fn list(&self) -> Vec<Arc<Persona>> {
        let mut personas: Vec<_> = self.personas.values().cloned().collect();
        personas.sort_by(|a, b| a.id().cmp(b.id()));
        personas
    }

    /// Add a persona, replacing any with the same id.
    pub fn register(&mut self, persona: Arc<Persona>) {
        if let Some(previous) = self.personas.insert(persona.id().to_string(), persona) {
            log::warn!(
                "Persona '{}' from {} replaced an earlier registration",
                previous.id(),
                previous.document().display()
            );
        }
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    /// Reload every persona. A failure leaves that persona's state as it was.
    pub fn reload_all(&self) -> Vec<ReloadOutcome> {
        self.list()
            .into_iter()
            .map(|persona| {
                let id = persona.id().to_string();
                let before = persona.snapshot().fingerprint.clone();
                match persona.reload() {
                    Ok(snapshot) if snapshot.fingerprint == before => ReloadOutcome::Unchanged { id },
                    Ok(snapshot) => ReloadOutcome::Changed {
                        id,
                        fingerprint: snapshot.fingerprint.clone(),
                    },
                    Err(e) => {
                        log::warn!("Reload of persona '{}' failed: {}", id, e);
                        ReloadOutcome::Failed { id, error: e.to_string() }
                    }
                }
            })
            .collect()
    }
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
