//! Engine output files parsed from text written at test time

use mcxray::readers::write_lines;
use mcxray::results::{electron, intensities, phirhoz, program, result_path, spectra};
use mcxray::version::VERSION_2_2_0;

use std::path::Path;

const BASE: &str = "Au_d50nm_E20keV";

fn write_result(directory: &Path, suffix: &str, lines: &[&str]) {
    write_lines(&result_path(directory, BASE, suffix), lines).unwrap();
}

fn write_full_run(directory: &Path) {
    write_result(directory, program::SUFFIX, &["Version=2.2.0"]);
    write_result(
        directory,
        electron::SUFFIX,
        &[
            "Electron results",
            "Number of electrons = 10000",
            "Backscattered coefficient = 0.4812",
            "Backscattered energy coefficient = 0.3920",
            "Transmitted coefficient = 0.0",
            "Transmitted energy coefficient = 0.0",
            "Secondary coefficient = 0.1150",
            "Skirted coefficient = 0.0",
        ],
    );
    write_result(
        directory,
        intensities::SUFFIX,
        &[
            "Region ID, Atomic Number, Line, Intensity Generated, Intensity Generated Detected, Intensity Emitted, Intensity Emitted Detected",
            "0, 6, Ka, 1200.0, 1.2e-2, 600.0, 6.0e-3",
            "1, 79, La, 3000.0, 3.0e-2, 2500.0, 2.5e-2",
            "1, 79, Ma, 5000.0, 5.0e-2, 1000.0, 1.0e-2",
        ],
    );
    write_result(
        directory,
        spectra::SUFFIX,
        &[
            "Energy (keV), Spectra Total, Spectra Characteristic, Spectra Bremsstrahlung",
            "0.005, 1.0, 0.0, 1.0",
            "0.010, 4.0, 3.0, 1.0",
            "0.015, 2.0, 1.0, 1.0",
        ],
    );
    write_result(
        directory,
        phirhoz::SUFFIX_EMITTED,
        &[
            "Depth (A), 6-Ka, 79-La",
            "0.0, 1.0, 1.5",
            "100.0, 0.5, 1.0",
        ],
    );
}

#[test]
fn full_run_is_collected() {
    let directory = tempfile::tempdir().unwrap();
    write_full_run(directory.path());

    let results = mcxray::read_results(directory.path(), BASE).unwrap();
    assert!(!results.is_empty());
    assert_eq!(results.program_version, Some(VERSION_2_2_0));

    let electron = results.electron.as_ref().unwrap();
    assert_eq!(electron.number_electrons().unwrap(), 10000);
    assert_eq!(electron.backscattered_coefficient().unwrap(), 0.4812);
    assert_eq!(electron.secondary_coefficient().unwrap(), 0.1150);

    let intensities = results.intensities.as_ref().unwrap();
    assert_eq!(intensities.atomic_numbers(), vec![6, 79]);
    assert_eq!(intensities.element_generated(79), 8000.0);
    assert_eq!(intensities.get(0, 6, "Ka").unwrap().emitted, 600.0);

    let spectrum = results.spectrum.as_ref().unwrap();
    assert_eq!(spectrum.energies_kev(), vec![0.005, 0.010, 0.015]);
    assert_eq!(spectrum.integrated_total(), 7.0);
    assert!(results.spectrum_emitted_detected.is_none());

    let phirhoz = results.phirhoz_emitted.as_ref().unwrap();
    assert_eq!(phirhoz.integral(6, "Ka"), Some(75.0));
    assert_eq!(phirhoz.integral(79, "La"), Some(125.0));
    assert!(results.phirhoz_generated.is_none());
}

#[test]
fn results_serialise_to_json() {
    let directory = tempfile::tempdir().unwrap();
    write_full_run(directory.path());

    let results = mcxray::read_results(directory.path(), BASE).unwrap();
    let json = serde_json::to_value(&results).unwrap();

    assert_eq!(json["base_filename"], BASE);
    assert_eq!(json["program_version"], "2.2.0");
    assert_eq!(json["electron"]["Number of electrons"], "10000");
    assert_eq!(json["intensities"]["rows"][1]["Line"], "La");
}

#[test]
fn missing_typed_electron_value_names_the_key() {
    let directory = tempfile::tempdir().unwrap();
    write_result(directory.path(), electron::SUFFIX, &["Number of electrons = 10"]);

    let results = mcxray::read_results(directory.path(), BASE).unwrap();
    let error = results
        .electron
        .unwrap()
        .skirted_coefficient()
        .unwrap_err();
    assert!(error.to_string().contains("Skirted coefficient"));
}

#[test]
fn program_version_line_is_required() {
    let directory = tempfile::tempdir().unwrap();
    write_result(directory.path(), program::SUFFIX, &["McXRay"]);
    assert!(mcxray::read_results(directory.path(), BASE).is_err());
}
