//! Beam and detector settings of the `.mic` file

// internal modules
use crate::keyed::{keyed_field, Field, KeyedRecord};
use crate::version::{Version, BEFORE_VERSION, VERSION_1_3_0, VERSION_1_4_1};

// external crates
use serde::{Deserialize, Serialize};

/// Electron beam and EDS detector
///
/// Lengths are in angstrom unless the name says otherwise, angles in degrees
/// except for the transmission detector collection angles which are in
/// radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MicroscopeParameters {
    #[serde(skip)]
    pub version: Version,
    pub beam_energy_kev: f64,
    pub beam_current_a: f64,
    pub beam_diameter_a: f64,
    pub beam_tilt_deg: f64,
    pub beam_position_x_a: f64,
    pub beam_position_y_a: f64,
    pub beam_standard_deviation_a: f64,
    pub detector_crystal_atomic_number: u32,
    pub detector_crystal_thickness_cm: f64,
    pub detector_crystal_radius_cm: f64,
    pub detector_crystal_distance_cm: f64,
    pub detector_dead_layer_a: f64,
    pub detector_diffusion_length_a: f64,
    pub detector_surface_quality: f64,
    pub detector_noise_ev: f64,
    pub detector_take_off_angle_deg: f64,
    pub detector_pitch_deg: f64,
    pub detector_bf_low_rad: f64,
    pub detector_bf_high_rad: f64,
    pub detector_df_low_rad: f64,
    pub detector_df_high_rad: f64,
    pub detector_haadf_low_rad: f64,
    pub detector_haadf_high_rad: f64,
    pub time_s: f64,
}

impl MicroscopeParameters {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            ..Default::default()
        }
    }
}

impl Default for MicroscopeParameters {
    fn default() -> Self {
        Self {
            version: Version::default(),
            beam_energy_kev: 10.0,
            beam_current_a: 1e-10,
            beam_diameter_a: 0.0,
            beam_tilt_deg: 0.0,
            beam_position_x_a: 0.0,
            beam_position_y_a: 0.0,
            beam_standard_deviation_a: 0.0,
            detector_crystal_atomic_number: 14,
            detector_crystal_thickness_cm: 0.3,
            detector_crystal_radius_cm: 0.3,
            detector_crystal_distance_cm: 4.0,
            detector_dead_layer_a: 200.0,
            detector_diffusion_length_a: 0.5,
            detector_surface_quality: 1.0,
            detector_noise_ev: 50.0,
            detector_take_off_angle_deg: 40.0,
            detector_pitch_deg: 90.0,
            detector_bf_low_rad: 0.0,
            detector_bf_high_rad: 0.01,
            detector_df_low_rad: 0.02,
            detector_df_high_rad: 0.1,
            detector_haadf_low_rad: 0.15,
            detector_haadf_high_rad: 0.3,
            time_s: 1.0,
        }
    }
}

#[rustfmt::skip]
static MICROSCOPE_FIELDS: &[Field<MicroscopeParameters>] = &[
    keyed_field!("BeamEnergy", "Incident energy in keV", Fixed, BEFORE_VERSION, None, beam_energy_kev as real),
    keyed_field!("BeamCurrent", "Beam current in A", General, BEFORE_VERSION, None, beam_current_a as real),
    keyed_field!("BeamDiameter", "Beam diameter in A", General, BEFORE_VERSION, None, beam_diameter_a as real),
    keyed_field!("BeamTilt", "Beam tilt in degrees", Fixed, BEFORE_VERSION, None, beam_tilt_deg as real),
    keyed_field!("BeamPosX", "Beam position along x in A", Fixed, BEFORE_VERSION, None, beam_position_x_a as real),
    keyed_field!("BeamPosY", "Beam position along y in A", Fixed, BEFORE_VERSION, None, beam_position_y_a as real),
    keyed_field!("BeamStandardDeviation", "Gaussian beam standard deviation in A", General, BEFORE_VERSION, None, beam_standard_deviation_a as real),
    keyed_field!("DetectorCrystalAtomicNumber", "Atomic number of the detector crystal", Integer, BEFORE_VERSION, None, detector_crystal_atomic_number as integer),
    keyed_field!("DetectorCrystalThickness", "Crystal thickness in cm", General, BEFORE_VERSION, None, detector_crystal_thickness_cm as real),
    keyed_field!("DetectorCrystalRadius", "Crystal radius in cm", General, BEFORE_VERSION, None, detector_crystal_radius_cm as real),
    keyed_field!("DetectorCrystalDistance", "Distance from the specimen in cm", General, BEFORE_VERSION, None, detector_crystal_distance_cm as real),
    keyed_field!("DetectorDeadLayer", "Dead layer thickness in A", General, BEFORE_VERSION, None, detector_dead_layer_a as real),
    keyed_field!("DetectorDiffusionLenght", "Diffusion length in A", General, BEFORE_VERSION, Some(VERSION_1_4_1), detector_diffusion_length_a as real),
    keyed_field!("DetectorDiffusionLength", "Diffusion length in A", General, VERSION_1_4_1, None, detector_diffusion_length_a as real),
    keyed_field!("DetectorSurfaceQuality", "Surface quality factor", Fixed, BEFORE_VERSION, None, detector_surface_quality as real),
    keyed_field!("DetectorNoise", "Electronic noise in eV", Fixed, BEFORE_VERSION, None, detector_noise_ev as real),
    keyed_field!("DetectorTOA", "Take-off angle in degrees", Fixed, BEFORE_VERSION, None, detector_take_off_angle_deg as real),
    keyed_field!("DetectorPitch", "Detector pitch in degrees", Fixed, BEFORE_VERSION, None, detector_pitch_deg as real),
    keyed_field!("DetectorBFLow", "Bright field lower angle in rad", Fixed, VERSION_1_3_0, None, detector_bf_low_rad as real),
    keyed_field!("DetectorBFHigh", "Bright field upper angle in rad", Fixed, VERSION_1_3_0, None, detector_bf_high_rad as real),
    keyed_field!("DetectorDFLow", "Dark field lower angle in rad", Fixed, VERSION_1_3_0, None, detector_df_low_rad as real),
    keyed_field!("DetectorDFHigh", "Dark field upper angle in rad", Fixed, VERSION_1_3_0, None, detector_df_high_rad as real),
    keyed_field!("DetectorHAADFLow", "HAADF lower angle in rad", Fixed, VERSION_1_3_0, None, detector_haadf_low_rad as real),
    keyed_field!("DetectorHAADFHigh", "HAADF upper angle in rad", Fixed, VERSION_1_3_0, None, detector_haadf_high_rad as real),
    keyed_field!("Time", "Acquisition time in s", General, BEFORE_VERSION, None, time_s as real),
];

impl KeyedRecord for MicroscopeParameters {
    const TITLE: &'static str = "MICROSCOPE PARAMETERS";

    fn schedule() -> &'static [Field<Self>] {
        MICROSCOPE_FIELDS
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}
