//! Physical model selection of the `.mdl` file
//!
//! Each model family is a `Key=id` line. Ids are passed to the engine as they
//! are, the option lists only give names to the ones known here.

// internal modules
use crate::keyed::{keyed_field, Field, KeyedRecord};
use crate::version::{Version, BEFORE_VERSION, VERSION_1_2_5, VERSION_1_4_2, VERSION_1_5_0};

// external crates
use anyhow::{anyhow, Result};
use log::warn;
use serde::{Deserialize, Serialize};

/// Model families known to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelKind {
    AtomEnergyLoss,
    AtomMeanIonizationPotential,
    AtomScreening,
    AtomCrossSection,
    AtomCrossSectionScreening,
    AtomCollision,
    AtomCollisionScreening,
    AtomElectronRange,
    XrayCharacteristicCrossSection,
    XrayBremsstrahlungCrossSection,
    RegionEnergyLoss,
    MassAbsorptionCoefficient,
}

impl ModelKind {
    pub const ALL: [ModelKind; 12] = [
        ModelKind::AtomEnergyLoss,
        ModelKind::AtomMeanIonizationPotential,
        ModelKind::AtomScreening,
        ModelKind::AtomCrossSection,
        ModelKind::AtomCrossSectionScreening,
        ModelKind::AtomCollision,
        ModelKind::AtomCollisionScreening,
        ModelKind::AtomElectronRange,
        ModelKind::XrayCharacteristicCrossSection,
        ModelKind::XrayBremsstrahlungCrossSection,
        ModelKind::RegionEnergyLoss,
        ModelKind::MassAbsorptionCoefficient,
    ];

    /// Key written in the file
    pub const fn key(self) -> &'static str {
        match self {
            ModelKind::AtomEnergyLoss => "AtomEnergyLossModel",
            ModelKind::AtomMeanIonizationPotential => "AtomMeanIonizationPotentialModel",
            ModelKind::AtomScreening => "AtomScreeningModel",
            ModelKind::AtomCrossSection => "AtomCrossSectionModel",
            ModelKind::AtomCrossSectionScreening => "AtomCrossSectionScreeningModel",
            ModelKind::AtomCollision => "AtomCollisionModel",
            ModelKind::AtomCollisionScreening => "AtomCollisionScreeningModel",
            ModelKind::AtomElectronRange => "AtomElectronRangeModel",
            ModelKind::XrayCharacteristicCrossSection => "XRayCSCharacteristicModel",
            ModelKind::XrayBremsstrahlungCrossSection => "XRayCSBremsstrahlungModel",
            ModelKind::RegionEnergyLoss => "RegionEnergyLossModel",
            ModelKind::MassAbsorptionCoefficient => "MassAbsorptionCoefficientModel",
        }
    }

    /// Names of the models, indexed by id
    pub const fn options(self) -> &'static [&'static str] {
        match self {
            ModelKind::AtomEnergyLoss => &["Bethe", "Bethe Joy-Luo"],
            ModelKind::AtomMeanIonizationPotential => &["Joy-Luo", "Berger-Seltzer", "Hovington"],
            ModelKind::AtomScreening => &["Henoc-Maurice", "Bishop", "Tomlin", "Nigam"],
            ModelKind::AtomCrossSection => &["Mott tabulated (Czyzewski)", "Rutherford", "Browning"],
            ModelKind::AtomCrossSectionScreening => &["Henoc-Maurice", "Bishop", "Nigam"],
            ModelKind::AtomCollision => &["Rutherford", "Mott tabulated (Czyzewski)", "Browning"],
            ModelKind::AtomCollisionScreening => &["Henoc-Maurice", "Bishop", "Nigam"],
            ModelKind::AtomElectronRange => &["Kanaya-Okayama", "Casino"],
            ModelKind::XrayCharacteristicCrossSection => &["Castani", "Bote-Salvat", "Casnati"],
            ModelKind::XrayBremsstrahlungCrossSection => &["Kirkpatrick-Wiedmann", "Seltzer-Berger"],
            ModelKind::RegionEnergyLoss => &["Mean atom energy loss", "Bethe Joy-Luo"],
            ModelKind::MassAbsorptionCoefficient => &["Chantler 2005", "Henke", "Heinrich"],
        }
    }

    /// First version with the family in the file
    pub const fn since(self) -> Version {
        match self {
            ModelKind::AtomElectronRange => VERSION_1_5_0,
            ModelKind::XrayBremsstrahlungCrossSection => VERSION_1_4_2,
            ModelKind::MassAbsorptionCoefficient => VERSION_1_2_5,
            _ => BEFORE_VERSION,
        }
    }

    /// Id read from a file
    ///
    /// Any id that fits is accepted, ids without a known name are logged.
    pub fn check(self, id: i64) -> Result<u32> {
        let id = u32::try_from(id).map_err(|_| anyhow!("Invalid {} id {id}", self.key()))?;
        if self.name(id).is_none() {
            warn!("{} id {id} has no known name", self.key());
        }
        Ok(id)
    }

    /// Name of a model id, if it is one
    pub fn name(self, id: u32) -> Option<&'static str> {
        self.options().get(id as usize).copied()
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Selected model of every family, by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Models {
    #[serde(skip)]
    pub version: Version,
    pub atom_energy_loss: u32,
    pub atom_mean_ionization_potential: u32,
    pub atom_screening: u32,
    pub atom_cross_section: u32,
    pub atom_cross_section_screening: u32,
    pub atom_collision: u32,
    pub atom_collision_screening: u32,
    pub atom_electron_range: u32,
    pub xray_characteristic_cross_section: u32,
    pub xray_bremsstrahlung_cross_section: u32,
    pub region_energy_loss: u32,
    pub mass_absorption_coefficient: u32,
}

impl Models {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            ..Default::default()
        }
    }

    /// Id selected for a family
    pub fn get(&self, kind: ModelKind) -> u32 {
        match kind {
            ModelKind::AtomEnergyLoss => self.atom_energy_loss,
            ModelKind::AtomMeanIonizationPotential => self.atom_mean_ionization_potential,
            ModelKind::AtomScreening => self.atom_screening,
            ModelKind::AtomCrossSection => self.atom_cross_section,
            ModelKind::AtomCrossSectionScreening => self.atom_cross_section_screening,
            ModelKind::AtomCollision => self.atom_collision,
            ModelKind::AtomCollisionScreening => self.atom_collision_screening,
            ModelKind::AtomElectronRange => self.atom_electron_range,
            ModelKind::XrayCharacteristicCrossSection => self.xray_characteristic_cross_section,
            ModelKind::XrayBremsstrahlungCrossSection => self.xray_bremsstrahlung_cross_section,
            ModelKind::RegionEnergyLoss => self.region_energy_loss,
            ModelKind::MassAbsorptionCoefficient => self.mass_absorption_coefficient,
        }
    }

    /// Families whose selected id has no known name
    pub fn unnamed(&self) -> Vec<(ModelKind, u32)> {
        ModelKind::ALL
            .into_iter()
            .map(|kind| (kind, self.get(kind)))
            .filter(|(kind, id)| kind.name(*id).is_none())
            .collect()
    }
}

impl Default for Models {
    fn default() -> Self {
        Self {
            version: Version::default(),
            atom_energy_loss: 1,
            atom_mean_ionization_potential: 0,
            atom_screening: 0,
            atom_cross_section: 0,
            atom_cross_section_screening: 0,
            atom_collision: 0,
            atom_collision_screening: 0,
            atom_electron_range: 0,
            xray_characteristic_cross_section: 0,
            xray_bremsstrahlung_cross_section: 0,
            region_energy_loss: 0,
            mass_absorption_coefficient: 0,
        }
    }
}

#[rustfmt::skip]
static MODELS_FIELDS: &[Field<Models>] = &[
    keyed_field!("AtomEnergyLossModel", "Energy loss per atom", Integer, ModelKind::AtomEnergyLoss.since(), None, atom_energy_loss as model ModelKind::AtomEnergyLoss),
    keyed_field!("AtomMeanIonizationPotentialModel", "Mean ionization potential", Integer, ModelKind::AtomMeanIonizationPotential.since(), None, atom_mean_ionization_potential as model ModelKind::AtomMeanIonizationPotential),
    keyed_field!("AtomScreeningModel", "Atomic screening", Integer, ModelKind::AtomScreening.since(), None, atom_screening as model ModelKind::AtomScreening),
    keyed_field!("AtomCrossSectionModel", "Elastic cross section", Integer, ModelKind::AtomCrossSection.since(), None, atom_cross_section as model ModelKind::AtomCrossSection),
    keyed_field!("AtomCrossSectionScreeningModel", "Screening of the elastic cross section", Integer, ModelKind::AtomCrossSectionScreening.since(), None, atom_cross_section_screening as model ModelKind::AtomCrossSectionScreening),
    keyed_field!("AtomCollisionModel", "Elastic collision angle", Integer, ModelKind::AtomCollision.since(), None, atom_collision as model ModelKind::AtomCollision),
    keyed_field!("AtomCollisionScreeningModel", "Screening of the collision angle", Integer, ModelKind::AtomCollisionScreening.since(), None, atom_collision_screening as model ModelKind::AtomCollisionScreening),
    keyed_field!("AtomElectronRangeModel", "Electron range", Integer, ModelKind::AtomElectronRange.since(), None, atom_electron_range as model ModelKind::AtomElectronRange),
    keyed_field!("XRayCSCharacteristicModel", "Characteristic X-ray cross section", Integer, ModelKind::XrayCharacteristicCrossSection.since(), None, xray_characteristic_cross_section as model ModelKind::XrayCharacteristicCrossSection),
    keyed_field!("XRayCSBremsstrahlungModel", "Bremsstrahlung cross section", Integer, ModelKind::XrayBremsstrahlungCrossSection.since(), None, xray_bremsstrahlung_cross_section as model ModelKind::XrayBremsstrahlungCrossSection),
    keyed_field!("RegionEnergyLossModel", "Energy loss per region", Integer, ModelKind::RegionEnergyLoss.since(), None, region_energy_loss as model ModelKind::RegionEnergyLoss),
    keyed_field!("MassAbsorptionCoefficientModel", "Mass absorption coefficients", Integer, ModelKind::MassAbsorptionCoefficient.since(), None, mass_absorption_coefficient as model ModelKind::MassAbsorptionCoefficient),
];

impl KeyedRecord for Models {
    const TITLE: &'static str = "MODELS";

    fn schedule() -> &'static [Field<Self>] {
        MODELS_FIELDS
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}
