//! Allocation of a budget across valued projects.
//!
//! Choosing how many units of each project to buy is a bounded knapsack problem: maximise
//! `Σ units_i * npv_i` subject to `Σ units_i * cost_i <= budget` and `0 <= units_i <= max_i`.
//! Two methods are provided: a single greedy pass by efficiency (the default) and an exact
//! integer program solved with `HiGHS`.
use crate::id::{HasID, find_by_id};
use crate::project::ProjectID;
use crate::units::Money;
use crate::valuation::ValuedProject;
use anyhow::Result;
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};

mod exact;
mod greedy;
pub use exact::allocate_exact;
pub use greedy::allocate;

/// The status label attached to a successful allocation
pub const OPTIMAL_STATUS: &str = "Optimal Solution Found";

/// The method used to allocate units to projects
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    SerializeLabeledStringEnum,
    DeserializeLabeledStringEnum,
)]
pub enum AllocationMethod {
    /// A single pass over projects in descending order of efficiency
    #[default]
    #[string = "greedy"]
    Greedy,
    /// An integer program, solved to optimality
    #[string = "exact"]
    Exact,
}

impl AllocationMethod {
    /// Whether results of this method can be worse than the best possible allocation
    pub fn is_heuristic(self) -> bool {
        self == Self::Greedy
    }

    /// A longer, human-readable name for the method
    pub fn description(self) -> &'static str {
        match self {
            Self::Greedy => "greedy heuristic (efficiency descending)",
            Self::Exact => "exact integer programming",
        }
    }
}

/// The number of units of one project to buy
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// The project to buy units of
    pub project_id: ProjectID,
    /// How many units to buy
    pub units: u32,
}

/// The outcome of allocating a budget across projects
#[derive(Debug, Clone, PartialEq)]
pub struct SolverResult {
    /// One entry per input project, in input order
    pub allocations: Vec<Allocation>,
    /// The total amount spent
    pub total_cost: Money,
    /// The total net present value of the units bought
    pub total_npv: Money,
    /// Whether the allocation is reported as optimal.
    ///
    /// NB: The greedy method always sets this, even though it is a heuristic. Use
    /// [`SolverResult::is_heuristic`] to find out whether the claim has been checked.
    pub is_optimal: bool,
    /// A human-readable status label
    pub status: String,
    /// The method which produced this result
    pub method: AllocationMethod,
}

impl SolverResult {
    /// Create a new [`SolverResult`] from the units bought of each project, in project order
    fn new(
        projects: &[ValuedProject],
        units: Vec<u32>,
        total_cost: Money,
        total_npv: Money,
        method: AllocationMethod,
    ) -> Self {
        debug_assert_eq!(projects.len(), units.len());

        let allocations = projects
            .iter()
            .zip(units)
            .map(|(valued, units)| Allocation {
                project_id: valued.get_id().clone(),
                units,
            })
            .collect();

        Self {
            allocations,
            total_cost,
            total_npv,
            is_optimal: true,
            status: OPTIMAL_STATUS.to_string(),
            method,
        }
    }

    /// The number of units allocated to the given project, if it was part of the input
    pub fn units_for(&self, project_id: &ProjectID) -> Option<u32> {
        self.allocations
            .iter()
            .find(|allocation| &allocation.project_id == project_id)
            .map(|allocation| allocation.units)
    }

    /// Whether any units were bought at all.
    ///
    /// An allocation with no units is a valid outcome (no project adds value, or the budget is
    /// too small), not an error.
    pub fn has_investment(&self) -> bool {
        self.allocations.iter().any(|allocation| allocation.units > 0)
    }

    /// Whether the result came from a heuristic method
    pub fn is_heuristic(&self) -> bool {
        self.method.is_heuristic()
    }

    /// Iterate over allocations with a non-zero number of units, along with their projects
    pub fn iter_purchases<'a>(
        &'a self,
        projects: &'a [ValuedProject],
    ) -> impl Iterator<Item = (&'a ValuedProject, u32)> {
        self.allocations
            .iter()
            .filter(|allocation| allocation.units > 0)
            .filter_map(|allocation| {
                find_by_id(projects, &allocation.project_id).map(|valued| (valued, allocation.units))
            })
    }
}

/// Allocate units to projects using the given method
pub fn allocate_with(
    method: AllocationMethod,
    projects: &[ValuedProject],
    budget: Money,
) -> Result<SolverResult> {
    match method {
        AllocationMethod::Greedy => Ok(allocate(projects, budget)),
        AllocationMethod::Exact => allocate_exact(projects, budget),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::valued;
    use rstest::rstest;

    #[rstest]
    #[case(AllocationMethod::Greedy)]
    #[case(AllocationMethod::Exact)]
    fn test_allocate_with(#[case] method: AllocationMethod) {
        let projects = [valued("a", 4.0, 1.0, 3), valued("b", 2.0, 0.9, 5)];
        let result = allocate_with(method, &projects, Money(10.0)).unwrap();
        assert_eq!(result.method, method);
        assert_eq!(result.units_for(&"a".into()), Some(0));
        assert_eq!(result.units_for(&"b".into()), Some(5));
        assert_eq!(result.units_for(&"c".into()), None);
    }

    #[test]
    fn test_iter_purchases() {
        let projects = [valued("a", 4.0, 1.0, 3), valued("b", 2.0, 0.9, 5)];
        let result = allocate(&projects, Money(10.0));
        let purchases: Vec<_> = result
            .iter_purchases(&projects)
            .map(|(valued, units)| (valued.project.id.clone(), units))
            .collect();
        assert_eq!(purchases, [(ProjectID::from("b"), 5)]);
        assert!(result.has_investment());
    }

    #[rstest]
    #[case(AllocationMethod::Greedy, "greedy")]
    #[case(AllocationMethod::Exact, "exact")]
    fn test_allocation_method_labels(#[case] method: AllocationMethod, #[case] label: &str) {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            method: AllocationMethod,
        }

        assert_eq!(method.to_string(), label);
        assert_ne!(method.description(), label);
        let wrapper: Wrapper = toml::from_str(&format!("method = \"{label}\"")).unwrap();
        assert_eq!(wrapper.method, method);
    }

    #[test]
    fn test_is_heuristic() {
        assert!(AllocationMethod::Greedy.is_heuristic());
        assert!(!AllocationMethod::Exact.is_heuristic());
        assert_eq!(AllocationMethod::default(), AllocationMethod::Greedy);
    }
}
