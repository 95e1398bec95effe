//! The module responsible for writing output data to disk.
use crate::project::ProjectID;
use crate::scenario::{Evaluation, Scenario};
use crate::solver::{Allocation, AllocationMethod};
use crate::units::{Dimensionless, Money, MoneyPerYear};
use crate::valuation::ValuedProject;
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;
use metadata::write_metadata;

/// The root folder in which scenario-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "quantestate_results";

/// The output file name for project valuations
const VALUATIONS_FILE_NAME: &str = "valuations.csv";

/// The output file name for the number of units bought of each project
const ALLOCATIONS_FILE_NAME: &str = "allocations.csv";

/// The output file name for the portfolio summary
const SUMMARY_FILE_NAME: &str = "summary.toml";

/// Get the default output directory for the specified scenario directory
pub fn get_output_dir(scenario_dir: &Path) -> Result<PathBuf> {
    let scenario_dir = scenario_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to scenario")?;

    let scenario_name = scenario_dir
        .file_name()
        .context("Scenario cannot be in root folder")?
        .to_str()
        .context("Invalid chars in scenario dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, scenario_name].iter().collect())
}

/// Create a new output directory, if it doesn't already exist.
///
/// An existing, non-empty directory is an error unless `allow_overwrite` is set, in which case
/// its contents are deleted.
///
/// # Returns
///
/// Whether an existing directory was overwritten
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    if output_dir.is_dir() {
        let is_empty = fs::read_dir(output_dir)?.next().is_none();
        if is_empty {
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Rerun with --overwrite to replace it."
        );
        fs::remove_dir_all(output_dir)?;
        fs::create_dir_all(output_dir)?;
        return Ok(true);
    }

    fs::create_dir_all(output_dir)?;

    Ok(false)
}

/// Represents a row in the valuations CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ValuationRow {
    project_id: ProjectID,
    name: String,
    cost: Money,
    rent: MoneyPerYear,
    growth_rate: Dimensionless,
    max_units: u32,
    sale_price: Money,
    rental_npv: Money,
    total_npv: Money,
    efficiency: Dimensionless,
}

impl ValuationRow {
    fn new(valued: &ValuedProject) -> Self {
        let project = &valued.project;
        Self {
            project_id: project.id.clone(),
            name: project.name.clone(),
            cost: project.cost,
            rent: project.rent,
            growth_rate: project.growth_rate,
            max_units: project.max_units,
            sale_price: valued.sale_price,
            rental_npv: valued.rental_npv,
            total_npv: valued.total_npv,
            efficiency: valued.efficiency(),
        }
    }
}

/// Represents a row in the allocations CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct AllocationRow {
    project_id: ProjectID,
    units: u32,
    investment: Money,
    npv: Money,
}

impl AllocationRow {
    fn new(valued: &ValuedProject, allocation: &Allocation) -> Self {
        // Unbought projects are written as zero, never as -0.0 for negative NPVs
        let (investment, npv) = if allocation.units == 0 {
            (Money(0.0), Money(0.0))
        } else {
            let units = Dimensionless(f64::from(allocation.units));
            (valued.project.cost * units, valued.total_npv * units)
        };

        Self {
            project_id: allocation.project_id.clone(),
            units: allocation.units,
            investment,
            npv,
        }
    }
}

/// The contents of the summary file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Summary {
    method: AllocationMethod,
    status: String,
    is_optimal: bool,
    budget: Money,
    total_cost: Money,
    total_npv: Money,
    budget_utilisation: Dimensionless,
}

impl Summary {
    fn new(scenario: &Scenario, evaluation: &Evaluation) -> Self {
        let budget = scenario.parameters.budget;
        let solution = &evaluation.solution;
        Self {
            method: solution.method,
            status: solution.status.clone(),
            is_optimal: solution.is_optimal,
            budget,
            total_cost: solution.total_cost,
            total_npv: solution.total_npv,
            budget_utilisation: evaluation.budget_utilisation(budget),
        }
    }
}

/// An object for writing valuations and allocations to CSV files
pub struct DataWriter {
    valuations_writer: csv::Writer<File>,
    allocations_writer: csv::Writer<File>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    pub fn create(output_path: &Path) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        Ok(Self {
            valuations_writer: new_writer(VALUATIONS_FILE_NAME)?,
            allocations_writer: new_writer(ALLOCATIONS_FILE_NAME)?,
        })
    }

    /// Write the valuation of every project to a CSV file
    pub fn write_valuations<'a, I>(&mut self, valuations: I) -> Result<()>
    where
        I: Iterator<Item = &'a ValuedProject>,
    {
        for valued in valuations {
            self.valuations_writer.serialize(ValuationRow::new(valued))?;
        }

        Ok(())
    }

    /// Write the number of units bought of every project to a CSV file.
    ///
    /// Projects with no units bought are included, so there is one row per project.
    pub fn write_allocations(&mut self, evaluation: &Evaluation) -> Result<()> {
        for (valued, allocation) in evaluation
            .valuations
            .iter()
            .zip(&evaluation.solution.allocations)
        {
            self.allocations_writer
                .serialize(AllocationRow::new(valued, allocation))?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.valuations_writer.flush()?;
        self.allocations_writer.flush()?;

        Ok(())
    }
}

/// Write a summary of the chosen portfolio in TOML format
fn write_summary(output_path: &Path, scenario: &Scenario, evaluation: &Evaluation) -> Result<()> {
    let summary = Summary::new(scenario, evaluation);
    let file_path = output_path.join(SUMMARY_FILE_NAME);
    fs::write(&file_path, toml::to_string(&summary)?)?;

    Ok(())
}

/// Write all output files for an evaluated scenario
///
/// # Arguments
///
/// * `output_path` - Folder where files will be saved
/// * `scenario_path` - Folder the scenario was read from
/// * `scenario` - The scenario which was evaluated
/// * `evaluation` - The results of the evaluation
pub fn write_results(
    output_path: &Path,
    scenario_path: &Path,
    scenario: &Scenario,
    evaluation: &Evaluation,
) -> Result<()> {
    write_metadata(output_path, scenario_path).context("Failed to save metadata")?;

    let mut writer = DataWriter::create(output_path)?;
    writer.write_valuations(evaluation.valuations.iter())?;
    writer.write_allocations(evaluation)?;
    writer.flush()?;

    write_summary(output_path, scenario, evaluation).context("Failed to save summary")
}
