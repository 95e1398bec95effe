//! Code for investment scenarios: a set of projects plus the assumptions used to value them.
use crate::id::check_ids_unique;
use crate::input::project::read_projects;
use crate::project::{Project, ProjectID, check_project_valid};
use crate::solver::{SolverResult, allocate_with};
use crate::units::{Dimensionless, Money};
use crate::valuation::{ValuedProject, valuate_all};
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

pub mod parameters;
pub use parameters::ScenarioParameters;

/// A scenario to evaluate
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Global scenario assumptions
    pub parameters: ScenarioParameters,
    /// Candidate projects, in display order
    pub projects: Vec<Project>,
}

impl Scenario {
    /// Create a new [`Scenario`], checking that the parameters and projects are valid
    pub fn new(parameters: ScenarioParameters, projects: Vec<Project>) -> Result<Self> {
        parameters.validate()?;
        check_ids_unique::<_, ProjectID>(&projects)?;
        for project in &projects {
            check_project_valid(project)?;
        }

        Ok(Self {
            parameters,
            projects,
        })
    }

    /// Read a scenario from the specified directory.
    ///
    /// Both files are validated as they are read.
    ///
    /// # Arguments
    ///
    /// * `scenario_dir` - Folder containing scenario files
    pub fn from_path<P: AsRef<Path>>(scenario_dir: P) -> Result<Self> {
        let scenario_dir = scenario_dir.as_ref();
        let parameters = ScenarioParameters::from_path(scenario_dir)?;
        let projects = read_projects(scenario_dir)?;

        Ok(Self {
            parameters,
            projects,
        })
    }

    /// Value every project and allocate the budget between them.
    ///
    /// Everything is recalculated from scratch on every call.
    pub fn evaluate(&self) -> Result<Evaluation> {
        let valuations = valuate_all(&self.projects, &self.parameters);
        let solution = allocate_with(
            self.parameters.allocation_method,
            &valuations,
            self.parameters.budget,
        )
        .context("Failed to allocate budget.")?;
        info!(
            "Allocated {} of {} using {}",
            solution.total_cost,
            self.parameters.budget,
            solution.method.description()
        );

        Ok(Evaluation {
            valuations,
            solution,
        })
    }
}

/// The result of evaluating a [`Scenario`]
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// A valuation for every project, in project order
    pub valuations: Vec<ValuedProject>,
    /// The allocation of budget to projects
    pub solution: SolverResult,
}

/// One row of the recommendations: a project with a non-zero number of units
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase<'a> {
    /// The valued project
    pub valued: &'a ValuedProject,
    /// The number of units to buy
    pub units: u32,
    /// The amount spent on these units
    pub investment: Money,
    /// The NPV of these units
    pub profit: Money,
}

impl Evaluation {
    /// Whether any units are bought. If not, there is no viable investment.
    pub fn has_investment(&self) -> bool {
        self.solution.has_investment()
    }

    /// The proportion of the budget which is spent.
    ///
    /// Zero if the budget is zero.
    pub fn budget_utilisation(&self, budget: Money) -> Dimensionless {
        if budget == Money(0.0) {
            return Dimensionless(0.0);
        }

        self.solution.total_cost / budget
    }

    /// Iterate over the projects which have units bought, in project order
    pub fn iter_purchases(&self) -> impl Iterator<Item = Purchase<'_>> {
        self.solution
            .iter_purchases(&self.valuations)
            .map(|(valued, units)| {
                let count = Dimensionless(f64::from(units));
                Purchase {
                    valued,
                    units,
                    investment: valued.project.cost * count,
                    profit: valued.total_npv * count,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, parameters, projects};
    use crate::input::InvalidParameter;
    use crate::project::{ProjectUpdate, update_project};
    use crate::solver::AllocationMethod;
    use crate::units::MoneyPerYear;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_scenario_new(parameters: ScenarioParameters, projects: Vec<Project>) {
        assert!(Scenario::new(parameters, projects).is_ok());
    }

    #[rstest]
    fn test_scenario_new_duplicate_ids(parameters: ScenarioParameters, projects: Vec<Project>) {
        let projects = vec![projects[0].clone(), projects[0].clone()];
        assert_error!(Scenario::new(parameters, projects), "Duplicate ID found: 1");
    }

    #[rstest]
    fn test_scenario_new_invalid_parameters(
        parameters: ScenarioParameters,
        projects: Vec<Project>,
    ) {
        let parameters = ScenarioParameters {
            discount_rate: Dimensionless(-1.0),
            ..parameters
        };
        let err = Scenario::new(parameters, projects).unwrap_err();
        assert_eq!(
            err.downcast_ref::<InvalidParameter>().unwrap().parameter,
            "discount_rate"
        );
    }

    #[rstest]
    fn test_scenario_evaluate(parameters: ScenarioParameters, projects: Vec<Project>) {
        let scenario = Scenario::new(parameters, projects).unwrap();
        let evaluation = scenario.evaluate().unwrap();

        assert_eq!(evaluation.valuations.len(), 2);
        assert_eq!(evaluation.solution.allocations.len(), 2);
        let spent = evaluation.solution.total_cost;
        assert!(spent <= scenario.parameters.budget);
        assert_approx_eq!(
            Dimensionless,
            evaluation.budget_utilisation(scenario.parameters.budget),
            spent / scenario.parameters.budget
        );

        let invested: Money = evaluation.iter_purchases().map(|p| p.investment).sum();
        let profit: Money = evaluation.iter_purchases().map(|p| p.profit).sum();
        assert_approx_eq!(Money, invested, spent, epsilon = 1e-12);
        assert_approx_eq!(
            Money,
            profit,
            evaluation.solution.total_npv,
            epsilon = 1e-12
        );
    }

    #[rstest]
    fn test_scenario_evaluate_after_edit(parameters: ScenarioParameters, projects: Vec<Project>) {
        // Removing all rent and appreciation makes nothing worth buying
        let mut edited = projects.clone();
        for id in ["1", "2"] {
            edited = update_project(&edited, &id.into(), ProjectUpdate::Rent(MoneyPerYear(0.0)))
                .unwrap();
            edited = update_project(
                &edited,
                &id.into(),
                ProjectUpdate::GrowthRate(Dimensionless(0.0)),
            )
            .unwrap();
        }

        let before = Scenario::new(parameters.clone(), projects)
            .unwrap()
            .evaluate()
            .unwrap();
        let after = Scenario::new(parameters, edited)
            .unwrap()
            .evaluate()
            .unwrap();
        assert!(before.has_investment());
        assert!(!after.has_investment());
        assert_eq!(after.iter_purchases().count(), 0);
    }

    #[rstest]
    fn test_scenario_evaluate_exact(parameters: ScenarioParameters, projects: Vec<Project>) {
        let parameters = ScenarioParameters {
            allocation_method: AllocationMethod::Exact,
            ..parameters
        };
        let evaluation = Scenario::new(parameters, projects)
            .unwrap()
            .evaluate()
            .unwrap();
        assert_eq!(evaluation.solution.method, AllocationMethod::Exact);
    }

    #[rstest]
    fn test_budget_utilisation_zero_budget(
        parameters: ScenarioParameters,
        projects: Vec<Project>,
    ) {
        let parameters = ScenarioParameters {
            budget: Money(0.0),
            ..parameters
        };
        let evaluation = Scenario::new(parameters, projects)
            .unwrap()
            .evaluate()
            .unwrap();
        assert_eq!(
            evaluation.budget_utilisation(Money(0.0)),
            Dimensionless(0.0)
        );
        assert!(!evaluation.has_investment());
    }
}
