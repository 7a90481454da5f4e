//! Small molecules bundled with the library, in angstrom-like units.

use crate::library::MoleculeLibrary;
use ballstick_common::Molecule;
use std::f64::consts::TAU;

pub fn water() -> Molecule {
    Molecule::new("water", "Water", "H2O")
        .with_atom("O", 0.0, 0.0, 0.0)
        .with_atom("H", 0.96, 0.0, 0.0)
        .with_atom("H", -0.24, 0.93, 0.0)
        .with_bond(0, 1, 1)
        .with_bond(0, 2, 1)
}

pub fn methane() -> Molecule {
    let d = 0.63;
    Molecule::new("methane", "Methane", "CH4")
        .with_atom("C", 0.0, 0.0, 0.0)
        .with_atom("H", d, d, d)
        .with_atom("H", -d, -d, d)
        .with_atom("H", -d, d, -d)
        .with_atom("H", d, -d, -d)
        .with_bond(0, 1, 1)
        .with_bond(0, 2, 1)
        .with_bond(0, 3, 1)
        .with_bond(0, 4, 1)
}

pub fn ammonia() -> Molecule {
    Molecule::new("ammonia", "Ammonia", "NH3")
        .with_atom("N", 0.0, 0.0, 0.1)
        .with_atom("H", 0.94, 0.0, -0.27)
        .with_atom("H", -0.47, 0.81, -0.27)
        .with_atom("H", -0.47, -0.81, -0.27)
        .with_bond(0, 1, 1)
        .with_bond(0, 2, 1)
        .with_bond(0, 3, 1)
}

pub fn carbon_dioxide() -> Molecule {
    Molecule::new("carbon-dioxide", "Carbon dioxide", "CO2")
        .with_atom("C", 0.0, 0.0, 0.0)
        .with_atom("O", 1.16, 0.0, 0.0)
        .with_atom("O", -1.16, 0.0, 0.0)
        .with_bond(0, 1, 2)
        .with_bond(0, 2, 2)
}

pub fn ethanol() -> Molecule {
    Molecule::new("ethanol", "Ethanol", "C2H6O")
        .with_atom("C", -1.17, -0.40, 0.0)
        .with_atom("C", 0.17, 0.33, 0.0)
        .with_atom("O", 1.20, -0.60, 0.0)
        .with_atom("H", -1.98, 0.33, 0.0)
        .with_atom("H", -1.25, -1.03, 0.89)
        .with_atom("H", -1.25, -1.03, -0.89)
        .with_atom("H", 0.25, 0.97, 0.89)
        .with_atom("H", 0.25, 0.97, -0.89)
        .with_atom("H", 2.05, -0.13, 0.0)
        .with_bond(0, 1, 1)
        .with_bond(1, 2, 1)
        .with_bond(0, 3, 1)
        .with_bond(0, 4, 1)
        .with_bond(0, 5, 1)
        .with_bond(1, 6, 1)
        .with_bond(1, 7, 1)
        .with_bond(2, 8, 1)
}

/// Planar hexagon, carbons 0..6 then hydrogens 6..12, alternating
/// single and double ring bonds.
pub fn benzene() -> Molecule {
    const RING: f64 = 1.39;
    const HYDROGEN: f64 = 2.48;
    let mut molecule = Molecule::new("benzene", "Benzene", "C6H6");
    for (element, r) in [("C", RING), ("H", HYDROGEN)] {
        for i in 0..6 {
            let angle = TAU * i as f64 / 6.0;
            molecule = molecule.with_atom(element, r * angle.cos(), r * angle.sin(), 0.0);
        }
    }
    for i in 0..6 {
        molecule = molecule
            .with_bond(i, (i + 1) % 6, if i % 2 == 0 { 2 } else { 1 })
            .with_bond(i, i + 6, 1);
    }
    molecule
}

/// Every bundled molecule.
pub fn all() -> Vec<Molecule> {
    vec![
        water(),
        methane(),
        ammonia(),
        carbon_dioxide(),
        ethanol(),
        benzene(),
    ]
}

impl MoleculeLibrary {
    /// A library holding the bundled molecules.
    pub fn with_samples() -> Self {
        let mut library = Self::new();
        library.extend(all());
        library
    }
}
