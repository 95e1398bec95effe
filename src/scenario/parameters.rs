//! Defines the `ScenarioParameters` struct, which represents the contents of `scenario.toml`.
use crate::input::{InvalidParameter, input_err_msg, read_toml};
use crate::solver::AllocationMethod;
use crate::units::{Dimensionless, Money};
use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::path::Path;

const SCENARIO_PARAMETERS_FILE_NAME: &str = "scenario.toml";

/// Global assumptions shared by every project in a scenario
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScenarioParameters {
    /// Total capital available for buying units
    pub budget: Money,
    /// Annual rate used to convert future cash flows into present values
    pub discount_rate: Dimensionless,
    /// The valuation horizon in years
    pub years: u32,
    /// How units are allocated to projects once they have been valued
    #[serde(default)]
    pub allocation_method: AllocationMethod,
}

/// Check that the `budget` parameter is valid
fn check_budget(value: Money) -> Result<()> {
    if !(value.is_finite() && value >= Money(0.0)) {
        return Err(InvalidParameter::new(
            "budget",
            "budget must be a finite, non-negative number",
        )
        .into());
    }

    Ok(())
}

/// Check that the `discount_rate` parameter is valid.
///
/// A rate of -1 or less would make the discount factor zero or negative.
fn check_discount_rate(value: Dimensionless) -> Result<()> {
    if !(value.is_finite() && value > Dimensionless(-1.0)) {
        return Err(InvalidParameter::new(
            "discount_rate",
            "discount_rate must be a finite number greater than -1",
        )
        .into());
    }

    Ok(())
}

impl ScenarioParameters {
    /// Read a scenario parameters file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `scenario_dir` - Folder containing scenario files
    ///
    /// # Returns
    ///
    /// The file contents as a [`ScenarioParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(scenario_dir: P) -> Result<ScenarioParameters> {
        let file_path = scenario_dir.as_ref().join(SCENARIO_PARAMETERS_FILE_NAME);
        let parameters: ScenarioParameters = read_toml(&file_path)?;

        parameters
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(parameters)
    }

    /// Validate parameters before they are used for valuation
    pub fn validate(&self) -> Result<()> {
        check_budget(self.budget)?;
        check_discount_rate(self.discount_rate)?;

        if self.years == 0 {
            warn!(
                "The valuation horizon is zero years, so projects will be valued at their \
                purchase cost and no rent will be counted"
            );
        }

        Ok(())
    }
}
