//! Selection - Uniform Random Draws over Snapshots
//!
//! Selection is pure: it reads an already loaded snapshot and a [`Chooser`].
//! An empty collection always yields `None`.

use rand::rngs::OsRng;
use rand::Rng;

use crate::category::OutcomeCategory;
use crate::persona::PersonaSnapshot;

/// Uniform index source. Swap in a deterministic one for tests.
pub trait Chooser: Send + Sync {
    /// Return an index in `0..len`. Only called with `len > 0`.
    fn choose_index(&self, len: usize) -> usize;
}

/// Draws from the operating system's cryptographically strong RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureChooser;

impl Chooser for SecureChooser {
    fn choose_index(&self, len: usize) -> usize {
        OsRng.gen_range(0..len)
    }
}

/// Pick one entry, or `None` when there is nothing to pick from.
pub fn choose_from<'a>(items: &'a [String], chooser: &dyn Chooser) -> Option<&'a str> {
    if items.is_empty() {
        return None;
    }
    // Out-of-range indices from a misbehaving chooser are wrapped, not trusted
    let index = chooser.choose_index(items.len()) % items.len();
    items.get(index).map(String::as_str)
}

/// Image for a category. Never looks at another category's images.
pub fn pick_image<'a>(
    snapshot: &'a PersonaSnapshot,
    category: OutcomeCategory,
    chooser: &dyn Chooser,
) -> Option<&'a str> {
    choose_from(snapshot.images.get(category), chooser)
}

/// Quote for a category, falling back to the uncategorized quotes.
pub fn pick_quote<'a>(
    snapshot: &'a PersonaSnapshot,
    category: OutcomeCategory,
    chooser: &dyn Chooser,
) -> Option<&'a str> {
    let quotes = snapshot.quotes.get(category);
    if quotes.is_empty() {
        choose_from(&snapshot.quotes.default, chooser)
    } else {
        choose_from(quotes, chooser)
    }
}
