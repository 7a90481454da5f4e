use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single atom in molecule-local coordinates (roughly one unit per angstrom).
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Stable join key used by bonds. Survives visibility filtering.
    pub original_index: usize,
}

impl Atom {
    pub fn position(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

/// A bond between two atoms, referenced by their `original_index`.
///
/// `order` only scales the stroke width when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    pub from: usize,
    pub to: usize,
    #[serde(default = "single_bond")]
    pub order: u8,
}

fn single_bond() -> u8 {
    1
}

impl Bond {
    pub fn new(from: usize, to: usize, order: u8) -> Self {
        Self { from, to, order }
    }
}

/// A molecule record as supplied by the data source.
///
/// Serialized atoms carry no index; `original_index` is their position in the
/// record's atom list, assigned once on deserialization. Hand-built molecules
/// must keep `atoms[i].original_index == i` to survive a JSON round trip; see
/// [`Molecule::misplaced_atom`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "MoleculeRecord", into = "MoleculeRecord")]
pub struct Molecule {
    pub id: String,
    pub name: String,
    pub formula: String,
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
}

impl Molecule {
    pub fn new(id: impl Into<String>, name: impl Into<String>, formula: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            formula: formula.into(),
            atoms: Vec::new(),
            bonds: Vec::new(),
        }
    }

    /// Append an atom. Its `original_index` is the current atom count.
    pub fn with_atom(mut self, element: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        let original_index = self.atoms.len();
        self.atoms.push(Atom {
            element: element.into(),
            x,
            y,
            z,
            original_index,
        });
        self
    }

    pub fn with_bond(mut self, from: usize, to: usize, order: u8) -> Self {
        self.bonds.push(Bond::new(from, to, order));
        self
    }

    /// Look up an atom by its `original_index`.
    pub fn atom(&self, original_index: usize) -> Option<&Atom> {
        self.atoms
            .iter()
            .find(|a| a.original_index == original_index)
    }

    /// Distinct element symbols in first-seen order.
    pub fn elements(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for atom in &self.atoms {
            if !seen.contains(&atom.element.as_str()) {
                seen.push(&atom.element);
            }
        }
        seen
    }

    /// Position of the first atom whose `original_index` differs from its
    /// position in `atoms`.
    pub fn misplaced_atom(&self) -> Option<usize> {
        self.atoms
            .iter()
            .enumerate()
            .position(|(i, a)| a.original_index != i)
    }

    /// Bonds whose endpoints do not name an atom of this molecule.
    pub fn dangling_bonds(&self) -> Vec<Bond> {
        self.bonds
            .iter()
            .filter(|b| self.atom(b.from).is_none() || self.atom(b.to).is_none())
            .copied()
            .collect()
    }
}

#[derive(Serialize, Deserialize)]
struct AtomRecord {
    element: String,
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Serialize, Deserialize)]
struct MoleculeRecord {
    id: String,
    name: String,
    #[serde(default)]
    formula: String,
    atoms: Vec<AtomRecord>,
    #[serde(default)]
    bonds: Vec<Bond>,
}

impl From<MoleculeRecord> for Molecule {
    fn from(record: MoleculeRecord) -> Self {
        let atoms = record
            .atoms
            .into_iter()
            .enumerate()
            .map(|(original_index, a)| Atom {
                element: a.element,
                x: a.x,
                y: a.y,
                z: a.z,
                original_index,
            })
            .collect();
        Self {
            id: record.id,
            name: record.name,
            formula: record.formula,
            atoms,
            bonds: record.bonds,
        }
    }
}

impl From<Molecule> for MoleculeRecord {
    fn from(molecule: Molecule) -> Self {
        let mut atoms = molecule.atoms;
        atoms.sort_by_key(|a| a.original_index);
        Self {
            id: molecule.id,
            name: molecule.name,
            formula: molecule.formula,
            atoms: atoms
                .into_iter()
                .map(|a| AtomRecord {
                    element: a.element,
                    x: a.x,
                    y: a.y,
                    z: a.z,
                })
                .collect(),
            bonds: molecule.bonds,
        }
    }
}

/// Per-element visibility toggles. Only an explicit `false` hides an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibilityMask(BTreeMap<String, bool>);

impl VisibilityMask {
    /// A mask with no entries: everything visible.
    pub fn all_visible() -> Self {
        Self::default()
    }

    pub fn is_visible(&self, element: &str) -> bool {
        self.0.get(element).copied().unwrap_or(true)
    }

    pub fn set(&mut self, element: impl Into<String>, visible: bool) {
        self.0.insert(element.into(), visible);
    }

    pub fn hide(&mut self, element: impl Into<String>) {
        self.set(element, false);
    }

    pub fn show(&mut self, element: impl Into<String>) {
        self.set(element, true);
    }

    /// Elements explicitly hidden.
    pub fn hidden(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, visible)| !**visible)
            .map(|(element, _)| element.as_str())
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for VisibilityMask {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(e, v)| (e.into(), v)).collect())
    }
}
