//! Fingerprints - SHA-256 over Published Persona Content
//!
//! The fingerprint covers what a reader can observe: display name, the
//! resolved icon and the classified images and quotes. Formatting of the
//! source file and dropped elements do not affect it.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::descriptor::{CategorizedImages, CategorizedQuotes};

/// Borrowed view of the content a fingerprint is computed over.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintInput<'a> {
    pub display_name: Option<&'a str>,
    pub icon: &'a str,
    pub images: &'a CategorizedImages,
    pub quotes: &'a CategorizedQuotes,
}

/// Hex SHA-256 of the content's JSON form. Field order is fixed by the struct.
pub fn compute_fingerprint(input: &FingerprintInput<'_>) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(input)?;
    let digest = Sha256::digest(&bytes);
    Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(success: &[&str]) -> CategorizedImages {
        CategorizedImages {
            success: success.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_fingerprint_is_hex_sha256() {
        let images = images(&["/p/a.png"]);
        let quotes = CategorizedQuotes::default();
        let input = FingerprintInput { display_name: None, icon: "/p/icon.png", images: &images, quotes: &quotes };

        let fingerprint = compute_fingerprint(&input).unwrap();
        assert_eq!(fingerprint.len(), 64);
        assert!(fingerprint.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fingerprint, compute_fingerprint(&input).unwrap());
    }

    #[test]
    fn test_fingerprint_tracks_icon() {
        let images = images(&[]);
        let quotes = CategorizedQuotes::default();
        let png = FingerprintInput { display_name: Some("X"), icon: "/p/icon.png", images: &images, quotes: &quotes };
        let gif = FingerprintInput { icon: "/p/icon.gif", ..png };
        assert_ne!(compute_fingerprint(&png).unwrap(), compute_fingerprint(&gif).unwrap());
    }

    #[test]
    fn test_fingerprint_tracks_category() {
        let quotes = CategorizedQuotes::default();
        let success = images(&["/p/a.png"]);
        let failure = CategorizedImages { failure: vec!["/p/a.png".to_string()], ..Default::default() };

        let a = FingerprintInput { display_name: None, icon: "/p/icon.png", images: &success, quotes: &quotes };
        let b = FingerprintInput { images: &failure, ..a };
        assert_ne!(compute_fingerprint(&a).unwrap(), compute_fingerprint(&b).unwrap());
    }
}
