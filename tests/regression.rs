//! Common code for running regression tests.
use float_cmp::approx_eq;
use itertools::Itertools;
use quantestate::cli::RunOpts;
use quantestate::cli::example::handle_example_run_command;
use quantestate::settings::Settings;
use std::fs::{self, read_dir};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const FLOAT_CMP_TOLERANCE: f64 = 1e-10;

// This gives a spurious warning about being unused because of the multiple `mod regression`
// declarations in different test files, so we suppress the warning manually

/// Run an example and compare its CSV output files with those in `tests/data/{example_name}`
#[allow(dead_code)]
pub fn run_regression_test(example_name: &str) {
    unsafe { std::env::set_var("QUANTESTATE_LOG_LEVEL", "off") };

    let tempdir = tempdir().unwrap();
    let opts = RunOpts {
        output_dir: Some(tempdir.path().to_path_buf()),
        overwrite: false,
    };
    handle_example_run_command(example_name, &opts, Some(Settings::default())).unwrap();

    let test_data_dir = PathBuf::from(format!("tests/data/{example_name}"));
    compare_output_dirs(tempdir.path(), &test_data_dir);
}

fn compare_output_dirs(output_dir: &Path, expected_dir: &Path) {
    let file_names = get_csv_file_names(output_dir);

    // Check that output files haven't been added/removed
    assert_eq!(file_names, get_csv_file_names(expected_dir));

    let errors = file_names
        .iter()
        .flat_map(|file_name| compare_file(output_dir, expected_dir, file_name))
        .collect_vec();
    assert!(
        errors.is_empty(),
        "The following errors occurred:\n  * {}",
        errors.join("\n  * ")
    );
}

fn compare_file(output_dir: &Path, expected_dir: &Path, file_name: &str) -> Vec<String> {
    let lines1 = read_lines(&output_dir.join(file_name));
    let lines2 = read_lines(&expected_dir.join(file_name));

    let mut errors = Vec::new();
    if lines1.len() != lines2.len() {
        errors.push(format!(
            "{file_name}: Different number of lines: {} vs {}",
            lines1.len(),
            lines2.len()
        ));
    }

    for (num, (line1, line2)) in lines1.iter().zip(&lines2).enumerate() {
        if !lines_match(line1, line2) {
            errors.push(format!(
                "{file_name}: line {num}:\n    + \"{line1}\"\n    - \"{line2}\""
            ));
        }
    }

    errors
}

fn lines_match(line1: &str, line2: &str) -> bool {
    let fields1 = line1.split(',').collect_vec();
    let fields2 = line2.split(',').collect_vec();

    // First try to compare fields as floating-point values, falling back on string comparison
    fields1.len() == fields2.len()
        && fields1
            .into_iter()
            .zip(fields2)
            .all(|(f1, f2)| try_compare_floats(f1, f2).unwrap_or_else(|| f1 == f2))
}

/// Parse a string into an `f64`, returning `None` if parsing fails or value is infinite/NaN
fn parse_finite(s: &str) -> Option<f64> {
    s.parse().ok().filter(|f: &f64| f.is_finite())
}

fn try_compare_floats(s1: &str, s2: &str) -> Option<bool> {
    let float1 = parse_finite(s1)?;
    let float2 = parse_finite(s2)?;

    Some(approx_eq!(
        f64,
        float1,
        float2,
        epsilon = FLOAT_CMP_TOLERANCE
    ))
}

/// Get the names of CSV files in the given folder, sorted
fn get_csv_file_names(dir_path: &Path) -> Vec<String> {
    read_dir(dir_path)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|file_name| file_name.ends_with(".csv"))
        .sorted()
        .collect()
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}
