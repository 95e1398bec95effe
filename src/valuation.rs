//! Discounted-cash-flow valuation of projects.
//!
//! The net present value of one unit of a project is made up of three cash flows: the purchase
//! cost paid now, the rent received at the end of each year of the horizon and the sale of the
//! unit at the end of the horizon at its appreciated price.
use crate::finance::{annuity_present_value, future_value, present_value};
use crate::id::HasID;
use crate::project::{Project, ProjectID};
use crate::scenario::ScenarioParameters;
use crate::units::{Dimensionless, Money};
use log::debug;

/// A [`Project`] along with the valuation of one of its units
#[derive(Debug, Clone, PartialEq)]
pub struct ValuedProject {
    /// The project which was valued
    pub project: Project,
    /// Projected value of one unit at the end of the horizon
    pub sale_price: Money,
    /// Present value of the rent received over the horizon
    pub rental_npv: Money,
    /// Net present value of buying one unit, holding it for the horizon and selling it
    pub total_npv: Money,
}

impl HasID<ProjectID> for ValuedProject {
    fn get_id(&self) -> &ProjectID {
        self.project.get_id()
    }
}

impl ValuedProject {
    /// Net present value per unit of money spent
    pub fn efficiency(&self) -> Dimensionless {
        self.total_npv / self.project.cost
    }

    /// Present value of selling the unit at the end of the horizon
    pub fn sale_present_value(&self) -> Money {
        self.total_npv + self.project.cost - self.rental_npv
    }
}

/// Value one unit of the given project.
///
/// This never fails: out-of-range inputs such as a discount rate of -1 give infinite or NaN
/// results, so parameters should be validated beforehand.
pub fn valuate(project: &Project, parameters: &ScenarioParameters) -> ValuedProject {
    let ScenarioParameters {
        discount_rate,
        years,
        ..
    } = *parameters;

    let rental_npv = annuity_present_value(project.rent, discount_rate, years);
    let sale_price = future_value(project.cost, project.growth_rate, years);
    let sale_pv = present_value(sale_price, discount_rate, years);
    let total_npv = -project.cost + rental_npv + sale_pv;

    ValuedProject {
        project: project.clone(),
        sale_price,
        rental_npv,
        total_npv,
    }
}

/// Value every project, preserving their order
pub fn valuate_all(projects: &[Project], parameters: &ScenarioParameters) -> Vec<ValuedProject> {
    projects
        .iter()
        .map(|project| {
            let valued = valuate(project, parameters);
            debug!(
                "Project {}: sale price {}, rental NPV {}, NPV {}",
                project.id, valued.sale_price, valued.rental_npv, valued.total_npv
            );
            valued
        })
        .collect()
}
