//! Fixtures for tests

use crate::project::Project;
use crate::scenario::ScenarioParameters;
use crate::solver::AllocationMethod;
use crate::units::{Dimensionless, Money, MoneyPerYear};
use crate::valuation::ValuedProject;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn parameters() -> ScenarioParameters {
    ScenarioParameters {
        budget: Money(50.0),
        discount_rate: Dimensionless(0.08),
        years: 5,
        allocation_method: AllocationMethod::Greedy,
    }
}

#[fixture]
pub fn project() -> Project {
    Project {
        id: "1".into(),
        name: "Apt Type A".into(),
        cost: Money(4.0),
        rent: MoneyPerYear(0.2),
        growth_rate: Dimensionless(0.05),
        max_units: 3,
        colour: "#3b82f6".into(),
    }
}

#[fixture]
pub fn projects(project: Project) -> Vec<Project> {
    let smaller = Project {
        id: "2".into(),
        name: "Studio".into(),
        cost: Money(2.0),
        rent: MoneyPerYear(0.1),
        growth_rate: Dimensionless(0.06),
        max_units: 5,
        colour: "#8b5cf6".into(),
    };
    vec![project, smaller]
}

/// A project which has already been valued, for testing allocation.
///
/// Only the cost, NPV and unit cap matter to the solvers, so the other fields are placeholders.
pub fn valued(id: &str, cost: f64, total_npv: f64, max_units: u32) -> ValuedProject {
    ValuedProject {
        project: Project {
            id: id.into(),
            name: id.into(),
            cost: Money(cost),
            rent: MoneyPerYear(0.0),
            growth_rate: Dimensionless(0.0),
            max_units,
            colour: String::new(),
        },
        sale_price: Money(cost),
        rental_npv: Money(0.0),
        total_npv: Money(total_npv),
    }
}
