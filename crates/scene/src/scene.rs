use ballstick_common::{Atom, Bond, Molecule, VisibilityMask};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// The visible atoms and bonds derived from a molecule and a visibility mask.
///
/// Atoms keep their `original_index` and their order from the molecule.
/// Bonds keep their order too. Every load or clear bumps `revision`, so any
/// projection computed against an older revision is stale.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    revision: u64,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene directly from a molecule.
    pub fn from_molecule(molecule: &Molecule, mask: &VisibilityMask) -> Self {
        let mut scene = Self::new();
        scene.load_molecule(Some(molecule), mask);
        scene
    }

    /// Replace the whole scene.
    ///
    /// Atoms are kept when their element is visible under `mask`; bonds are
    /// kept when both endpoints survived. `None` leaves the scene empty.
    pub fn load_molecule(&mut self, molecule: Option<&Molecule>, mask: &VisibilityMask) {
        self.atoms.clear();
        self.bonds.clear();
        self.revision += 1;

        let Some(molecule) = molecule else {
            tracing::debug!("no molecule supplied, scene is empty");
            return;
        };

        self.atoms = molecule
            .atoms
            .iter()
            .filter(|a| mask.is_visible(&a.element))
            .cloned()
            .collect();

        let present: HashSet<usize> = self.atoms.iter().map(|a| a.original_index).collect();
        self.bonds = molecule
            .bonds
            .iter()
            .filter(|b| present.contains(&b.from) && present.contains(&b.to))
            .copied()
            .collect();

        tracing::debug!(
            molecule = %molecule.id,
            atoms = self.atoms.len(),
            hidden_atoms = molecule.atoms.len() - self.atoms.len(),
            bonds = self.bonds.len(),
            hidden_bonds = molecule.bonds.len() - self.bonds.len(),
            "scene loaded"
        );
    }

    /// Empty the scene. Calling it again changes nothing but the revision.
    pub fn clear(&mut self) {
        self.atoms.clear();
        self.bonds.clear();
        self.revision += 1;
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// True when no atom survived filtering. Callers show an empty-state
    /// message off this rather than treating it as an error.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Incremented on every load and clear.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn summary(&self) -> SceneSummary {
        let mut elements = BTreeMap::new();
        for atom in &self.atoms {
            *elements.entry(atom.element.clone()).or_insert(0) += 1;
        }
        SceneSummary {
            atom_count: self.atoms.len(),
            bond_count: self.bonds.len(),
            elements,
        }
    }
}

/// Counts describing a scene, for inspection and empty-state checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSummary {
    pub atom_count: usize,
    pub bond_count: usize,
    /// Visible atom count per element symbol.
    pub elements: BTreeMap<String, usize>,
}

impl fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scene: atoms={} bonds={}", self.atom_count, self.bond_count)?;
        if !self.elements.is_empty() {
            let parts: Vec<String> = self
                .elements
                .iter()
                .map(|(element, count)| format!("{element}:{count}"))
                .collect();
            write!(f, " [{}]", parts.join(" "))?;
        }
        Ok(())
    }
}
