//! Persona - Loaded Descriptor with Atomic Reload
//!
//! A persona owns an immutable [`PersonaSnapshot`]. Loading and reloading
//! build a complete snapshot first and only then publish it, so readers see
//! either the old state or the new one. A failed reload publishes nothing.

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

use crate::assets::{resolve_asset, AssetOrigin, DirOrigin};
use crate::category::{BuildResult, OutcomeCategory};
use crate::descriptor::{CategorizedImages, CategorizedQuotes, PersonaDocument};
use crate::hashing::{compute_fingerprint, FingerprintInput};
use crate::selection::{choose_from, pick_image, pick_quote, Chooser, SecureChooser};

/// Logical name of the icon every persona must ship.
const ICON_NAME: &str = "icon";

#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("Failed to parse persona descriptor {document}: {message}")]
    Parse { document: String, message: String },

    #[error("Failed to read persona descriptor {document}: {source}")]
    Io {
        document: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No image found that matches {pattern}.*")]
    AssetNotFound { pattern: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse error classification for callers that only care about the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Io,
}

impl PersonaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PersonaError::Parse { .. } | PersonaError::Serialization(_) => ErrorKind::Parse,
            PersonaError::Io { .. } | PersonaError::AssetNotFound { .. } => ErrorKind::Io,
        }
    }
}

/// Everything one load produced. Never mutated after publication.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaSnapshot {
    pub display_name: Option<String>,
    pub icon: String,
    pub images: CategorizedImages,
    pub quotes: CategorizedQuotes,
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
}

/// Icon plus the image drawn for one outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decoration {
    pub icon: String,
    /// `None` when the persona has no image for the outcome
    pub image: Option<String>,
}

pub struct Persona {
    id: String,
    document: PathBuf,
    origin: Arc<dyn AssetOrigin>,
    image_base_path: String,
    chooser: Arc<dyn Chooser>,
    snapshot: ArcSwap<PersonaSnapshot>,
    reload_guard: Mutex<()>,
}

impl std::fmt::Debug for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persona")
            .field("id", &self.id)
            .field("document", &self.document)
            .field("origin", &self.origin.describe())
            .field("image_base_path", &self.image_base_path)
            .finish_non_exhaustive()
    }
}

impl Persona {
    /// Load a persona whose images live in a local directory.
    ///
    /// * `document` - descriptor file
    /// * `image_base` - directory holding `icon.*` and the persona images
    /// * `image_base_path` - prefix for every produced image path
    pub fn load(
        document: impl Into<PathBuf>,
        image_base: impl Into<PathBuf>,
        image_base_path: impl Into<String>,
    ) -> Result<Self, PersonaError> {
        Self::load_with(
            document,
            Arc::new(DirOrigin::new(image_base)),
            image_base_path,
            Arc::new(SecureChooser),
        )
    }

    /// Load with an explicit asset origin and random source.
    pub fn load_with(
        document: impl Into<PathBuf>,
        origin: Arc<dyn AssetOrigin>,
        image_base_path: impl Into<String>,
        chooser: Arc<dyn Chooser>,
    ) -> Result<Self, PersonaError> {
        let document = document.into();
        let image_base_path = image_base_path.into();

        let (id, snapshot) = build_snapshot(&document, origin.as_ref(), &image_base_path)?;
        log::info!(
            "Loaded persona '{}' ({} images, {} quotes)",
            id,
            snapshot.images.len(),
            snapshot.quotes.len()
        );

        Ok(Self {
            id,
            document,
            origin,
            image_base_path,
            chooser,
            snapshot: ArcSwap::from_pointee(snapshot),
            reload_guard: Mutex::new(()),
        })
    }

    /// Re-read the descriptor and re-resolve the icon.
    ///
    /// On error the current snapshot stays published. Returns the newly
    /// published snapshot otherwise.
    pub fn reload(&self) -> Result<Arc<PersonaSnapshot>, PersonaError> {
        let _guard = self.reload_guard.lock().unwrap_or_else(PoisonError::into_inner);

        let (id, snapshot) =
            build_snapshot(&self.document, self.origin.as_ref(), &self.image_base_path)?;
        if id != self.id {
            log::warn!(
                "Persona '{}' descriptor now declares id '{}'; keeping the original id",
                self.id,
                id
            );
        }

        let snapshot = Arc::new(snapshot);
        self.snapshot.store(Arc::clone(&snapshot));
        log::info!("Reloaded persona '{}' ({})", self.id, &snapshot.fingerprint[..12]);
        Ok(snapshot)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn document(&self) -> &Path {
        &self.document
    }

    pub fn image_base_path(&self) -> &str {
        &self.image_base_path
    }

    /// Current snapshot. Holding it pins that version across reloads.
    pub fn snapshot(&self) -> Arc<PersonaSnapshot> {
        self.snapshot.load_full()
    }

    pub fn display_name(&self) -> Option<String> {
        self.snapshot.load().display_name.clone()
    }

    pub fn icon(&self) -> String {
        self.snapshot.load().icon.clone()
    }

    /// Icon and a random image for `category`.
    pub fn image(&self, category: OutcomeCategory) -> Decoration {
        let snapshot = self.snapshot.load();
        Decoration {
            icon: snapshot.icon.clone(),
            image: pick_image(&snapshot, category, self.chooser.as_ref()).map(str::to_string),
        }
    }

    /// Used when no build outcome is known. Draws from the success images.
    pub fn default_image(&self) -> Decoration {
        self.image(OutcomeCategory::Success)
    }

    /// Random quote for `category`, or an uncategorized one if it has none.
    pub fn quote(&self, category: OutcomeCategory) -> Option<String> {
        let snapshot = self.snapshot.load();
        pick_quote(&snapshot, category, self.chooser.as_ref()).map(str::to_string)
    }

    /// Random uncategorized quote.
    pub fn default_quote(&self) -> Option<String> {
        let snapshot = self.snapshot.load();
        choose_from(&snapshot.quotes.default, self.chooser.as_ref()).map(str::to_string)
    }

    /// Image and quote for a build, both drawn from the same snapshot.
    pub fn decorate(&self, result: Option<BuildResult>) -> (Decoration, Option<String>) {
        let snapshot = self.snapshot.load();
        let chooser = self.chooser.as_ref();

        let (image, quote) = match result.map(BuildResult::category) {
            Some(category) => (
                pick_image(&snapshot, category, chooser),
                pick_quote(&snapshot, category, chooser),
            ),
            None => (
                pick_image(&snapshot, OutcomeCategory::Success, chooser),
                choose_from(&snapshot.quotes.default, chooser),
            ),
        };

        let decoration = Decoration {
            icon: snapshot.icon.clone(),
            image: image.map(str::to_string),
        };
        (decoration, quote.map(str::to_string))
    }
}

fn build_snapshot(
    document: &Path,
    origin: &dyn AssetOrigin,
    image_base_path: &str,
) -> Result<(String, PersonaSnapshot), PersonaError> {
    let label = document.display().to_string();
    let parsed = PersonaDocument::read(document)?;
    let id = parsed.required_id(&label)?;

    let images = CategorizedImages::classify(&parsed.images, image_base_path);
    let quotes = CategorizedQuotes::classify(&parsed.quotes);
    let icon = resolve_asset(origin, image_base_path, ICON_NAME)?;
    let fingerprint = compute_fingerprint(&FingerprintInput {
        display_name: parsed.display_name.as_deref(),
        icon: &icon,
        images: &images,
        quotes: &quotes,
    })?;

    let snapshot = PersonaSnapshot {
        display_name: parsed.display_name,
        icon,
        images,
        quotes,
        fingerprint,
        loaded_at: Utc::now(),
    };
    Ok((id, snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::tests::SequenceChooser;
    use std::fs;
    use tempfile::TempDir;

    fn fixture(descriptor: &str, icon: Option<&str>) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("persona.json"), descriptor).unwrap();
        if let Some(icon) = icon {
            fs::write(dir.path().join(icon), b"img").unwrap();
        }
        dir
    }

    fn load(dir: &TempDir) -> Result<Persona, PersonaError> {
        Persona::load_with(
            dir.path().join("persona.json"),
            Arc::new(DirOrigin::new(dir.path())),
            "/p",
            Arc::new(SequenceChooser::default()),
        )
    }

    #[test]
    fn test_load_missing_document_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_load_missing_id_is_parse() {
        let dir = fixture(r#"{"displayName": "Anon"}"#, Some("icon.png"));
        let err = load(&dir).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().contains("id"));
    }

    #[test]
    fn test_load_without_icon_fails() {
        let dir = fixture(r#"{"id": "x"}"#, None);
        let err = load(&dir).unwrap_err();
        assert!(matches!(err, PersonaError::AssetNotFound { .. }));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_broken_document_reported_before_missing_icon() {
        let dir = fixture("{ not json", None);
        let err = load(&dir).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_display_name_optional() {
        let dir = fixture(r#"{"id": "x"}"#, Some("icon.gif"));
        let persona = load(&dir).unwrap();
        assert_eq!(persona.id(), "x");
        assert_eq!(persona.display_name(), None);
        assert_eq!(persona.icon(), "/p/icon.gif");
    }

    #[test]
    fn test_quote_falls_back_to_default() {
        let dir = fixture(
            r#"{"id": "x", "quotes": [{"text": "generic"}, {"type": "failure", "text": "ouch"}]}"#,
            Some("icon.png"),
        );
        let persona = load(&dir).unwrap();

        assert_eq!(persona.quote(OutcomeCategory::Failure).as_deref(), Some("ouch"));
        assert_eq!(persona.quote(OutcomeCategory::Success).as_deref(), Some("generic"));
        assert_eq!(persona.quote(OutcomeCategory::Other).as_deref(), Some("generic"));
        assert_eq!(persona.default_quote().as_deref(), Some("generic"));
    }

    #[test]
    fn test_no_quotes_at_all() {
        let dir = fixture(r#"{"id": "x"}"#, Some("icon.png"));
        let persona = load(&dir).unwrap();
        assert_eq!(persona.quote(OutcomeCategory::Success), None);
        assert_eq!(persona.default_quote(), None);
    }

    #[test]
    fn test_decorate_uses_build_result() {
        let dir = fixture(
            r#"{"id": "x",
                "images": [{"type": "success", "path": "s.png"}, {"type": "other", "path": "o.png"}],
                "quotes": [{"type": "other", "text": "meh"}, {"text": "default"}]}"#,
            Some("icon.png"),
        );
        let persona = load(&dir).unwrap();

        let (decoration, quote) = persona.decorate(Some(BuildResult::Unstable));
        assert_eq!(decoration.image.as_deref(), Some("/p/o.png"));
        assert_eq!(quote.as_deref(), Some("meh"));

        let (decoration, quote) = persona.decorate(None);
        assert_eq!(decoration.icon, "/p/icon.png");
        assert_eq!(decoration.image.as_deref(), Some("/p/s.png"));
        assert_eq!(quote.as_deref(), Some("default"));
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let dir = fixture(r#"{"id": "x", "displayName": "Old"}"#, Some("icon.png"));
        let persona = load(&dir).unwrap();
        let before = persona.snapshot();

        fs::write(
            dir.path().join("persona.json"),
            r#"{"id": "x", "displayName": "New", "images": [{"type": "failure", "path": "f.png"}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("icon.jpg"), b"img").unwrap();

        let after = persona.reload().unwrap();
        assert_eq!(persona.display_name().as_deref(), Some("New"));
        assert_eq!(persona.icon(), "/p/icon.jpg");
        assert_ne!(before.fingerprint, after.fingerprint);
        // Pinned snapshot is unaffected
        assert_eq!(before.display_name.as_deref(), Some("Old"));
        assert_eq!(before.icon, "/p/icon.png");
    }

    #[test]
    fn test_reload_keeps_original_id() {
        let dir = fixture(r#"{"id": "x"}"#, Some("icon.png"));
        let persona = load(&dir).unwrap();

        fs::write(dir.path().join("persona.json"), r#"{"id": "renamed"}"#).unwrap();
        persona.reload().unwrap();
        assert_eq!(persona.id(), "x");
    }

    #[test]
    fn test_concurrent_reads_during_reload() {
        let dir = fixture(
            r#"{"id": "x", "images": [{"type": "success", "path": "a.png"}]}"#,
            Some("icon.png"),
        );
        let persona = Arc::new(load(&dir).unwrap());

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let persona = Arc::clone(&persona);
                scope.spawn(move || {
                    for _ in 0..200 {
                        let decoration = persona.image(OutcomeCategory::Success);
                        assert_eq!(decoration.image.as_deref(), Some("/p/a.png"));
                        assert_eq!(decoration.icon, "/p/icon.png");
                    }
                });
            }
            for _ in 0..20 {
                persona.reload().unwrap();
            }
        });
    }
}
