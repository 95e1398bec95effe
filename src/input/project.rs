//! Code for reading [`Project`]s from a CSV file.
use super::{input_err_msg, read_csv};
use crate::id::check_ids_unique;
use crate::project::{Project, ProjectID, check_project_valid, default_colour};
use crate::units::{Dimensionless, Money, MoneyPerYear};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const PROJECTS_FILE_NAME: &str = "projects.csv";

#[derive(Debug, Deserialize, PartialEq)]
struct ProjectRaw {
    id: String,
    name: String,
    cost: Money,
    rent: MoneyPerYear,
    growth_rate: Dimensionless,
    max_units: u32,
    #[serde(default)]
    colour: Option<String>,
}

/// Read projects CSV file from scenario directory.
///
/// # Arguments
///
/// * `scenario_dir` - Folder containing scenario files
///
/// # Returns
///
/// The projects in the order in which they appear in the file, or an error.
pub fn read_projects(scenario_dir: &Path) -> Result<Vec<Project>> {
    let file_path = scenario_dir.join(PROJECTS_FILE_NAME);
    let projects_csv = read_csv(&file_path)?;
    read_projects_from_iter(projects_csv.into_iter()).with_context(|| input_err_msg(&file_path))
}

fn read_projects_from_iter<I>(iter: I) -> Result<Vec<Project>>
where
    I: Iterator<Item = ProjectRaw>,
{
    let projects = iter
        .enumerate()
        .map(|(index, raw)| {
            let colour = raw
                .colour
                .filter(|colour| !colour.is_empty())
                .unwrap_or_else(|| default_colour(index).to_string());

            Project {
                id: ProjectID::from(raw.id),
                name: raw.name,
                cost: raw.cost,
                rent: raw.rent,
                growth_rate: raw.growth_rate,
                max_units: raw.max_units,
                colour,
            }
        })
        .collect::<Vec<_>>();

    check_ids_unique::<_, ProjectID>(&projects)?;
    for project in &projects {
        check_project_valid(project)?;
    }

    Ok(projects)
}
