//! Persona Core - Themed Decorations for Build Outcomes
//!
//! A persona is a small theme: an icon, a set of images and a set of quotes,
//! each filed under the build outcome it belongs to.
//!
//! # Flow
//! 1. Descriptors are parsed into immutable snapshots
//! 2. The icon is located by probing known image extensions
//! 3. Selection draws from the snapshot and never touches the filesystem
//! 4. Reload builds a new snapshot and swaps it in atomically

pub mod category;
pub mod descriptor;
pub mod assets;
pub mod selection;
pub mod hashing;
pub mod persona;
pub mod registry;

pub use category::{BuildResult, OutcomeCategory, ParsedCategory, parse_category};
pub use descriptor::{PersonaDocument, CategorizedImages, CategorizedQuotes};
pub use assets::{AssetOrigin, DirOrigin, resolve_asset, EXTENSIONS};
pub use selection::{Chooser, SecureChooser, choose_from, pick_image, pick_quote};
pub use hashing::{compute_fingerprint, FingerprintInput};
pub use persona::{Decoration, ErrorKind, Persona, PersonaError, PersonaSnapshot};
pub use registry::{PersonaRegistry, ReloadOutcome};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name a persona directory must contain to be picked up by the registry.
pub const DESCRIPTOR_FILE: &str = "persona.json";
