//! Projects are the types of real-estate asset which can be bought in units.
use crate::id::{HasID, define_id_getter, define_id_type};
use crate::input::InvalidParameter;
use crate::units::{Dimensionless, Money, MoneyPerYear};
use anyhow::{Context, Result};

define_id_type! {ProjectID}

/// Colours assigned to projects which don't specify their own, cycling by position
pub const PROJECT_COLOURS: [&str; 8] = [
    "#3b82f6", "#8b5cf6", "#10b981", "#f59e0b", "#ef4444", "#ec4899", "#6366f1", "#14b8a6",
];

/// An investable real-estate project, e.g. a particular apartment type
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    /// A unique identifier for the project
    pub id: ProjectID,
    /// A human-readable label
    pub name: String,
    /// Purchase cost of one unit
    pub cost: Money,
    /// Net rental income of one unit
    pub rent: MoneyPerYear,
    /// Fractional annual appreciation of the unit's value (e.g. 0.05 for 5%)
    pub growth_rate: Dimensionless,
    /// The maximum number of units which can be bought
    pub max_units: u32,
    /// Display colour. Not used in any calculation.
    pub colour: String,
}
define_id_getter! {Project, ProjectID}

impl Project {
    /// Create the placeholder project which is appended by [`add_project`]
    fn placeholder(id: ProjectID, index: usize) -> Self {
        Self {
            name: format!("Project {id}"),
            id,
            cost: Money(5.0),
            rent: MoneyPerYear(0.25),
            growth_rate: Dimensionless(0.05),
            max_units: 2,
            colour: default_colour(index).to_string(),
        }
    }
}

/// Get the palette colour for the project at the given position in a list
pub fn default_colour(index: usize) -> &'static str {
    PROJECT_COLOURS[index % PROJECT_COLOURS.len()]
}

/// A change to one field of a [`Project`]
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectUpdate {
    /// Rename the project
    Name(String),
    /// Change the cost per unit
    Cost(Money),
    /// Change the annual rent per unit
    Rent(MoneyPerYear),
    /// Change the appreciation rate
    GrowthRate(Dimensionless),
    /// Change the unit cap
    MaxUnits(u32),
    /// Change the display colour
    Colour(String),
}

impl ProjectUpdate {
    /// Apply this update to a copy of the given project
    fn apply(self, project: &Project) -> Project {
        let mut project = project.clone();
        match self {
            Self::Name(name) => project.name = name,
            Self::Cost(cost) => project.cost = cost,
            Self::Rent(rent) => project.rent = rent,
            Self::GrowthRate(growth_rate) => project.growth_rate = growth_rate,
            Self::MaxUnits(max_units) => project.max_units = max_units,
            Self::Colour(colour) => project.colour = colour,
        }
        project
    }
}

/// Return a new list with a placeholder project appended.
///
/// The new project's ID is the smallest number, starting from the length of the new list, which
/// isn't already taken by another project.
pub fn add_project(projects: &[Project]) -> Vec<Project> {
    let is_taken = |id: &ProjectID| projects.iter().any(|project| project.get_id() == id);
    let mut n = projects.len() + 1;
    let mut id = ProjectID::from(n.to_string());
    while is_taken(&id) {
        n += 1;
        id = ProjectID::from(n.to_string());
    }

    let mut out = projects.to_vec();
    out.push(Project::placeholder(id, projects.len()));
    out
}

/// Return a new list in which the project with the given ID has been updated
pub fn update_project(
    projects: &[Project],
    id: &ProjectID,
    update: ProjectUpdate,
) -> Result<Vec<Project>> {
    let index = position_of(projects, id)?;
    let mut out = projects.to_vec();
    out[index] = update.apply(&projects[index]);
    Ok(out)
}

/// Return a new list with the project with the given ID left out
pub fn remove_project(projects: &[Project], id: &ProjectID) -> Result<Vec<Project>> {
    position_of(projects, id)?;
    Ok(projects
        .iter()
        .filter(|project| project.get_id() != id)
        .cloned()
        .collect())
}

fn position_of(projects: &[Project], id: &ProjectID) -> Result<usize> {
    projects
        .iter()
        .position(|project| project.get_id() == id)
        .with_context(|| format!("Unknown project ID {id} found"))
}

/// Check that a project's numeric fields make sense before it is valued
pub fn check_project_valid(project: &Project) -> Result<()> {
    if !(project.cost.is_finite() && project.cost > Money(0.0)) {
        return Err(InvalidParameter::new(
            "cost",
            format!("Cost of project {} must be a finite number greater than zero", project.id),
        )
        .into());
    }
    if !(project.rent.is_finite() && project.rent >= MoneyPerYear(0.0)) {
        return Err(InvalidParameter::new(
            "rent",
            format!("Rent of project {} must be a finite, non-negative number", project.id),
        )
        .into());
    }
    if !project.growth_rate.is_finite() {
        return Err(InvalidParameter::new(
            "growth_rate",
            format!("Growth rate of project {} must be a finite number", project.id),
        )
        .into());
    }

    Ok(())
}
