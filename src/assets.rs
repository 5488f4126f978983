//! Asset Resolution - Locate Images by Logical Name
//!
//! `${origin}/${name}.*` is probed against a fixed extension list.
//! First hit wins.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::persona::PersonaError;

/// Probe order. Lower-case variants come first.
pub const EXTENSIONS: [&str; 8] = [
    ".jpg", ".jpeg", ".png", ".gif",
    ".JPG", ".JPEG", ".PNG", ".GIF",
];

/// Anything assets can be probed against.
pub trait AssetOrigin: Send + Sync {
    /// Open `name` and release it straight away. `Ok` means it exists.
    fn probe(&self, name: &str) -> io::Result<()>;

    /// Human readable location, used in error messages.
    fn describe(&self) -> String;
}

/// Assets in a local directory.
#[derive(Debug, Clone)]
pub struct DirOrigin {
    root: PathBuf,
}

impl DirOrigin {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetOrigin for DirOrigin {
    fn probe(&self, name: &str) -> io::Result<()> {
        let file = File::open(self.root.join(name))?;
        // Directories open fine on unix
        let is_file = file.metadata()?.is_file();
        drop(file);

        if is_file {
            Ok(())
        } else {
            Err(io::Error::new(io::ErrorKind::NotFound, format!("{} is not a file", name)))
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Find `logical_name` with any known extension and return the path
/// addressed under `base_path_prefix`.
pub fn resolve_asset(
    origin: &dyn AssetOrigin,
    base_path_prefix: &str,
    logical_name: &str,
) -> Result<String, PersonaError> {
    for ext in EXTENSIONS {
        let candidate = format!("{}{}", logical_name, ext);
        match origin.probe(&candidate) {
            Ok(()) => {
                log::debug!("Resolved asset {} in {}", candidate, origin.describe());
                return Ok(format!("{}/{}", base_path_prefix, candidate));
            }
            Err(_) => continue,
        }
    }

    Err(PersonaError::AssetNotFound {
        pattern: format!("{}/{}", origin.describe(), logical_name),
    })
}
