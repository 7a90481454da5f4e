use ballstick_common::{Bond, Molecule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Highest bond order drawn with its own stroke width.
pub const MAX_BOND_ORDER: u8 = 3;

/// Errors from library operations.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown molecule: {0}")]
    UnknownMolecule(String),
    #[error("molecule {id}: atom at position {position} has original index {original_index}")]
    MisplacedAtom {
        id: String,
        position: usize,
        original_index: usize,
    },
    #[error("molecule {id}: bond {from}-{to} references a missing atom")]
    DanglingBond { id: String, from: usize, to: usize },
    #[error("molecule {id}: bond {from}-{to} has order {order}, expected 1 to 3")]
    BadBondOrder {
        id: String,
        from: usize,
        to: usize,
        order: u8,
    },
}

/// On-disk layout of a library file.
#[derive(Serialize, Deserialize)]
struct LibraryFile {
    molecules: Vec<Molecule>,
}

/// Molecules keyed by id. Stands in for a remote molecule service.
///
/// Every molecule is validated on insert, so anything handed out by
/// [`MoleculeLibrary::get`] has only bonds between existing atoms.
#[derive(Debug, Clone, Default)]
pub struct MoleculeLibrary {
    molecules: BTreeMap<String, Molecule>,
}

impl MoleculeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a molecule without inserting it.
    pub fn validate(molecule: &Molecule) -> Result<(), LibraryError> {
        if let Some(position) = molecule.misplaced_atom() {
            return Err(LibraryError::MisplacedAtom {
                id: molecule.id.clone(),
                position,
                original_index: molecule.atoms[position].original_index,
            });
        }
        if let Some(Bond { from, to, .. }) = molecule.dangling_bonds().first().copied() {
            return Err(LibraryError::DanglingBond {
                id: molecule.id.clone(),
                from,
                to,
            });
        }
        if let Some(bond) = molecule
            .bonds
            .iter()
            .find(|b| b.order == 0 || b.order > MAX_BOND_ORDER)
        {
            return Err(LibraryError::BadBondOrder {
                id: molecule.id.clone(),
                from: bond.from,
                to: bond.to,
                order: bond.order,
            });
        }
        Ok(())
    }

    /// Validate and insert, replacing any molecule with the same id.
    /// Returns the replaced molecule.
    pub fn insert(&mut self, molecule: Molecule) -> Result<Option<Molecule>, LibraryError> {
        Self::validate(&molecule)?;
        tracing::debug!(
            id = %molecule.id,
            atoms = molecule.atoms.len(),
            bonds = molecule.bonds.len(),
            "molecule added to library"
        );
        Ok(self.molecules.insert(molecule.id.clone(), molecule))
    }

    pub fn remove(&mut self, id: &str) -> Option<Molecule> {
        self.molecules.remove(id)
    }

    /// Look up a molecule. Unknown ids give `None`, which a scene treats as
    /// "no molecule".
    pub fn get(&self, id: &str) -> Option<&Molecule> {
        self.molecules.get(id)
    }

    /// Like [`get`](Self::get), for callers that must report the miss.
    pub fn require(&self, id: &str) -> Result<&Molecule, LibraryError> {
        self.get(id)
            .ok_or_else(|| LibraryError::UnknownMolecule(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.molecules.contains_key(id)
    }

    /// Molecule ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.molecules.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Molecule> {
        self.molecules.values()
    }

    pub fn len(&self) -> usize {
        self.molecules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }

    /// Parse a library from JSON text.
    pub fn from_json(text: &str) -> Result<Self, LibraryError> {
        let file: LibraryFile = serde_json::from_str(text)?;
        let mut library = Self::new();
        for molecule in file.molecules {
            library.insert(molecule)?;
        }
        Ok(library)
    }

    pub fn to_json(&self) -> Result<String, LibraryError> {
        Ok(serde_json::to_string_pretty(&self.as_file())?)
    }

    /// Save the library to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LibraryError> {
        let file = std::fs::File::create(path.as_ref())?;
        serde_json::to_writer_pretty(file, &self.as_file())?;
        tracing::debug!(path = %path.as_ref().display(), molecules = self.len(), "library saved");
        Ok(())
    }

    /// Load a library from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let library = Self::from_json(&text)?;
        tracing::debug!(path = %path.as_ref().display(), molecules = library.len(), "library loaded");
        Ok(library)
    }

    fn as_file(&self) -> LibraryFile {
        LibraryFile {
            molecules: self.molecules.values().cloned().collect(),
        }
    }
}

impl Extend<Molecule> for MoleculeLibrary {
    /// Inserts every valid molecule; invalid ones are logged and skipped.
    fn extend<I: IntoIterator<Item = Molecule>>(&mut self, iter: I) {
        for molecule in iter {
            let id = molecule.id.clone();
            if let Err(err) = self.insert(molecule) {
                tracing::warn!(%id, %err, "skipping invalid molecule");
            }
        }
    }
}
