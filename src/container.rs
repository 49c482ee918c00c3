//! HDF5 container holding a whole simulation
//!
//! Only available with the `hdf5` feature. The layout mirrors the text
//! files, with one group per file and one attribute per key:
//!
//! ```text
//! /Simulation                      name
//!     /version                     major, minor, revision
//!     /Specimen                    name, NumberRegions
//!         /Region_0                NumberElements, UserDefinedMassDensity, RegionType, minX, ...
//!             /Element_0           AtomicNumber, WeightFraction
//!     /Models                      AtomEnergyLossModel, ...
//!     /Microscope                  BeamEnergy, ...
//!     /SimulationParameters        BaseFileName, ...
//!     /ResultsParameters           ComputeXrayCharacteristic, ... (from 1.4.0)
//!     /ElectronResults             Keys and Values text datasets, in file order (optional)
//!     /XrayIntensities             one dataset per column (optional)
//! ```
//!
//! Keys are the ones valid at the stored version, so reading is version aware
//! in the same way as the text files.

// internal modules
use crate::keyed::{Format, KeyedRecord, Value};
use crate::results::{ElectronResults, SimulationResults, XrayIntensities, XrayIntensity};
use crate::simulation::Simulation;
use crate::specimen::{
    Element, Region, RegionDimensions, RegionType, Specimen, KEY_ATOMIC_NUMBER,
    KEY_MASS_DENSITY, KEY_MASS_FRACTION, KEY_NUMBER_ELEMENTS, KEY_NUMBER_REGIONS,
    KEY_REGION_TYPE,
};
use crate::utils::f;
use crate::version::{Version, VERSION_1_4_0};

// standard library
use std::path::Path;
use std::str::FromStr;

// external crates
use anyhow::{anyhow, ensure, Context, Result};
use hdf5::types::{H5Type, VarLenUnicode};
use hdf5::{File, Group};
use log::{debug, trace};

const GROUP_SIMULATION: &str = "Simulation";
const GROUP_VERSION: &str = "version";
const GROUP_SPECIMEN: &str = "Specimen";
const GROUP_MODELS: &str = "Models";
const GROUP_MICROSCOPE: &str = "Microscope";
const GROUP_PARAMETERS: &str = "SimulationParameters";
const GROUP_RESULTS_PARAMETERS: &str = "ResultsParameters";
const GROUP_ELECTRON: &str = "ElectronResults";
const GROUP_INTENSITIES: &str = "XrayIntensities";
const DATASET_KEYS: &str = "Keys";
const DATASET_VALUES: &str = "Values";

/// Write a simulation, and optionally its results, to a new HDF5 file
pub fn write_simulation(
    path: &Path,
    simulation: &Simulation,
    results: Option<&SimulationResults>,
) -> Result<()> {
    debug!("Writing {}", path.display());
    let file =
        File::create(path).with_context(|| f!("Could not create {}", path.display()))?;

    let root = file.create_group(GROUP_SIMULATION)?;
    set_attr_str(&root, "name", &simulation.name)?;
    write_version(&root, simulation.version)?;

    write_specimen(&root, &simulation.specimen)?;
    write_record(&root, GROUP_MODELS, &simulation.models)?;
    write_record(&root, GROUP_MICROSCOPE, &simulation.microscope)?;
    write_record(&root, GROUP_PARAMETERS, &simulation.parameters)?;
    if simulation.version >= VERSION_1_4_0 {
        write_record(&root, GROUP_RESULTS_PARAMETERS, &simulation.results)?;
    }

    if let Some(results) = results {
        if let Some(electron) = &results.electron {
            write_electron_results(&root, electron)?;
        }
        if let Some(intensities) = &results.intensities {
            write_intensities(&root, intensities)?;
        }
    }
    Ok(())
}

/// Read a simulation and whatever results were stored with it
pub fn read_simulation(path: &Path) -> Result<(Simulation, SimulationResults)> {
    debug!("Reading {}", path.display());
    let file = File::open(path).with_context(|| f!("Could not open {}", path.display()))?;
    let root = file
        .group(GROUP_SIMULATION)
        .with_context(|| f!("No {GROUP_SIMULATION} group in {}", path.display()))?;

    let name = read_attr_string(&root, "name")?;
    let version = read_version(&root)?;
    trace!("HDF5 simulation \"{name}\" at {version}");

    let specimen = read_specimen(&root, version)?;
    let mut simulation = Simulation::new(&name, specimen).with_version(version);
    read_record(&root, GROUP_MODELS, &mut simulation.models)?;
    read_record(&root, GROUP_MICROSCOPE, &mut simulation.microscope)?;
    read_record(&root, GROUP_PARAMETERS, &mut simulation.parameters)?;
    if version >= VERSION_1_4_0 {
        read_record(&root, GROUP_RESULTS_PARAMETERS, &mut simulation.results)?;
    }

    let results = SimulationResults {
        base_filename: simulation.parameters.base_filename.clone(),
        electron: read_electron_results(&root)?,
        intensities: read_intensities(&root)?,
        ..Default::default()
    };
    Ok((simulation, results))
}

fn write_version(parent: &Group, version: Version) -> Result<()> {
    let group = parent.create_group(GROUP_VERSION)?;
    set_attr(&group, "major", &version.major)?;
    set_attr(&group, "minor", &version.minor)?;
    set_attr(&group, "revision", &version.revision)?;
    Ok(())
}

fn read_version(parent: &Group) -> Result<Version> {
    let group = parent.group(GROUP_VERSION)?;
    Ok(Version::new(
        read_attr(&group, "major")?,
        read_attr(&group, "minor")?,
        read_attr(&group, "revision")?,
    ))
}

fn write_specimen(parent: &Group, specimen: &Specimen) -> Result<()> {
    let group = parent.create_group(GROUP_SPECIMEN)?;
    set_attr_str(&group, "name", &specimen.name)?;
    set_attr(&group, KEY_NUMBER_REGIONS, &(specimen.regions.len() as u64))?;

    for (i, region) in specimen.regions.iter().enumerate() {
        let region_group = group.create_group(&f!("Region_{i}"))?;
        set_attr(
            &region_group,
            KEY_NUMBER_ELEMENTS,
            &(region.elements.len() as u64),
        )?;
        for (j, element) in region.elements.iter().enumerate() {
            let element_group = region_group.create_group(&f!("Element_{j}"))?;
            set_attr(&element_group, KEY_ATOMIC_NUMBER, &element.atomic_number)?;
            set_attr(&element_group, KEY_MASS_FRACTION, &element.mass_fraction)?;
        }
        set_attr(
            &region_group,
            KEY_MASS_DENSITY,
            &region.mass_density_g_cm3.unwrap_or(0.0),
        )?;
        set_attr_str(&region_group, KEY_REGION_TYPE, region.region_type().as_str())?;
        for (key, value) in region.dimensions.parameters() {
            set_attr(&region_group, key, &value)?;
        }
    }
    Ok(())
}

fn read_specimen(parent: &Group, version: Version) -> Result<Specimen> {
    let group = parent.group(GROUP_SPECIMEN)?;
    let name = read_attr_string(&group, "name")?;
    let number_regions: u64 = read_attr(&group, KEY_NUMBER_REGIONS)?;

    let mut regions = Vec::new();
    for i in 0..number_regions {
        let region_group = group.group(&f!("Region_{i}"))?;
        let number_elements: u64 = read_attr(&region_group, KEY_NUMBER_ELEMENTS)?;

        let mut elements = Vec::new();
        for j in 0..number_elements {
            let element_group = region_group.group(&f!("Element_{j}"))?;
            elements.push(Element::new(
                read_attr(&element_group, KEY_ATOMIC_NUMBER)?,
                read_attr(&element_group, KEY_MASS_FRACTION)?,
            ));
        }

        let density: f64 = read_attr(&region_group, KEY_MASS_DENSITY)?;
        let region_type = RegionType::from_str(&read_attr_string(&region_group, KEY_REGION_TYPE)?)?;
        let values = region_type
            .keys()
            .iter()
            .map(|key| read_attr::<f64>(&region_group, key))
            .collect::<Result<Vec<f64>>>()?;

        let mut region = Region::new(elements, RegionDimensions::new(region_type, &values)?);
        region.mass_density_g_cm3 = (density != 0.0).then_some(density);
        regions.push(region);
    }

    Ok(Specimen::new(name, regions).with_version(version))
}

/// One attribute per active key of the record
fn write_record<R: KeyedRecord>(parent: &Group, name: &str, record: &R) -> Result<()> {
    let group = parent.create_group(name)?;
    for (key, value) in record.values() {
        match value {
            Value::Integer(v) => set_attr(&group, key, &v)?,
            Value::Real(v) => set_attr(&group, key, &v)?,
            Value::Flag(v) => set_attr(&group, key, &u8::from(v))?,
            Value::Text(v) => set_attr_str(&group, key, &v)?,
        }
    }
    Ok(())
}

/// Fill a record from its group, missing attributes keep their defaults
fn read_record<R: KeyedRecord>(parent: &Group, name: &str, record: &mut R) -> Result<()> {
    let group = parent
        .group(name)
        .with_context(|| f!("No {name} group"))?;

    for field in R::active_fields(record.version()) {
        let value = match field.format {
            Format::Integer => read_attr_opt::<i64>(&group, field.key)?.map(Value::Integer),
            Format::Fixed | Format::General => {
                read_attr_opt::<f64>(&group, field.key)?.map(Value::Real)
            }
            Format::Flag => read_attr_opt::<u8>(&group, field.key)?.map(|v| Value::Flag(v != 0)),
            Format::Text => read_attr_opt_string(&group, field.key)?.map(Value::Text),
        };
        match value {
            Some(value) => (field.set)(record, value)
                .with_context(|| f!("Invalid {} in {name}", field.key))?,
            None => trace!("[{name}/{}] not found, keeping default", field.key),
        }
    }
    Ok(())
}

fn write_electron_results(parent: &Group, electron: &ElectronResults) -> Result<()> {
    let group = parent.create_group(GROUP_ELECTRON)?;
    let entries = electron.entries();
    let keys = entries
        .iter()
        .map(|(key, _)| to_var_len_unicode(key))
        .collect::<Result<Vec<VarLenUnicode>>>()?;
    let values = entries
        .iter()
        .map(|(_, value)| to_var_len_unicode(value))
        .collect::<Result<Vec<VarLenUnicode>>>()?;

    write_dataset(&group, DATASET_KEYS, &keys)?;
    write_dataset(&group, DATASET_VALUES, &values)
}

/// Entries come back in the order they were written
fn read_electron_results(parent: &Group) -> Result<Option<ElectronResults>> {
    let Ok(group) = parent.group(GROUP_ELECTRON) else {
        return Ok(None);
    };
    let keys = read_dataset::<VarLenUnicode>(&group, DATASET_KEYS)?;
    let values = read_dataset::<VarLenUnicode>(&group, DATASET_VALUES)?;
    ensure!(
        keys.len() == values.len(),
        "{GROUP_ELECTRON} holds {} key(s) but {} value(s)",
        keys.len(),
        values.len()
    );

    let entries = keys
        .iter()
        .zip(values.iter())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    Ok(Some(ElectronResults::from_entries(entries)))
}

fn write_intensities(parent: &Group, intensities: &XrayIntensities) -> Result<()> {
    let group = parent.create_group(GROUP_INTENSITIES)?;
    let rows = &intensities.rows;

    let column = |f: fn(&XrayIntensity) -> f64| rows.iter().map(f).collect::<Vec<f64>>();
    let lines = rows
        .iter()
        .map(|row| to_var_len_unicode(&row.line))
        .collect::<Result<Vec<VarLenUnicode>>>()?;

    write_dataset(&group, "RegionID", &rows.iter().map(|r| r.region).collect::<Vec<_>>())?;
    write_dataset(
        &group,
        "AtomicNumber",
        &rows.iter().map(|r| r.atomic_number).collect::<Vec<_>>(),
    )?;
    write_dataset(&group, "Line", &lines)?;
    write_dataset(&group, "IntensityGenerated", &column(|r| r.generated))?;
    write_dataset(&group, "IntensityGeneratedDetected", &column(|r| r.generated_detected))?;
    write_dataset(&group, "IntensityEmitted", &column(|r| r.emitted))?;
    write_dataset(&group, "IntensityEmittedDetected", &column(|r| r.emitted_detected))?;
    Ok(())
}

fn read_intensities(parent: &Group) -> Result<Option<XrayIntensities>> {
    let Ok(group) = parent.group(GROUP_INTENSITIES) else {
        return Ok(None);
    };

    let regions = read_dataset::<u32>(&group, "RegionID")?;
    let atomic_numbers = read_dataset::<u32>(&group, "AtomicNumber")?;
    let lines = read_dataset::<VarLenUnicode>(&group, "Line")?;
    let generated = read_dataset::<f64>(&group, "IntensityGenerated")?;
    let generated_detected = read_dataset::<f64>(&group, "IntensityGeneratedDetected")?;
    let emitted = read_dataset::<f64>(&group, "IntensityEmitted")?;
    let emitted_detected = read_dataset::<f64>(&group, "IntensityEmittedDetected")?;

    let rows = (0..regions.len())
        .map(|i| -> Result<XrayIntensity> {
            let missing = || anyhow!("Intensity columns have different lengths");
            Ok(XrayIntensity {
                region: regions[i],
                atomic_number: *atomic_numbers.get(i).ok_or_else(missing)?,
                line: lines.get(i).ok_or_else(missing)?.to_string(),
                generated: *generated.get(i).ok_or_else(missing)?,
                generated_detected: *generated_detected.get(i).ok_or_else(missing)?,
                emitted: *emitted.get(i).ok_or_else(missing)?,
                emitted_detected: *emitted_detected.get(i).ok_or_else(missing)?,
            })
        })
        .collect::<Result<Vec<XrayIntensity>>>()?;
    Ok(Some(XrayIntensities { rows }))
}

fn set_attr<T: H5Type>(group: &Group, name: &str, value: &T) -> Result<()> {
    group.new_attr::<T>().create(name)?.write_scalar(value)?;
    Ok(())
}

fn set_attr_str(group: &Group, name: &str, value: &str) -> Result<()> {
    let value = to_var_len_unicode(value)?;
    group
        .new_attr::<VarLenUnicode>()
        .create(name)?
        .write_scalar(&value)?;
    Ok(())
}

fn read_attr<T: H5Type>(group: &Group, name: &str) -> Result<T> {
    group
        .attr(name)
        .with_context(|| f!("Missing attribute {name} in {}", group.name()))?
        .read_scalar::<T>()
        .with_context(|| f!("Unreadable attribute {name} in {}", group.name()))
}

fn read_attr_opt<T: H5Type>(group: &Group, name: &str) -> Result<Option<T>> {
    match group.attr(name) {
        Ok(attr) => Ok(Some(attr.read_scalar::<T>()?)),
        Err(_) => Ok(None),
    }
}

fn read_attr_string(group: &Group, name: &str) -> Result<String> {
    let value: VarLenUnicode = read_attr(group, name)?;
    Ok(value.to_string())
}

fn read_attr_opt_string(group: &Group, name: &str) -> Result<Option<String>> {
    Ok(read_attr_opt::<VarLenUnicode>(group, name)?.map(|value| value.to_string()))
}

fn write_dataset<T: H5Type>(group: &Group, name: &str, data: &[T]) -> Result<()> {
    group.new_dataset_builder().with_data(data).create(name)?;
    Ok(())
}

fn read_dataset<T: H5Type>(group: &Group, name: &str) -> Result<Vec<T>> {
    let dataset = group
        .dataset(name)
        .with_context(|| f!("Missing dataset {name} in {}", group.name()))?;
    Ok(dataset.read_raw::<T>()?)
}

fn to_var_len_unicode(value: &str) -> Result<VarLenUnicode> {
    VarLenUnicode::from_str(value).map_err(|e| anyhow!("Invalid text attribute \"{value}\": {e}"))
}
