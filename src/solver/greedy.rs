//! Greedy allocation by efficiency.
use super::{AllocationMethod, SolverResult};
use crate::units::{Dimensionless, Money};
use crate::valuation::ValuedProject;
use itertools::Itertools;
use log::debug;

/// Allocate units to projects with a single greedy pass.
///
/// Projects which don't add value are skipped. The rest are visited in descending order of
/// efficiency (NPV per unit cost) and each buys as many units as the remaining budget and its unit
/// cap allow. Projects of equal efficiency are visited in input order.
///
/// This is a heuristic: budget left over after an efficient project may have fitted units of a
/// less efficient one which was already passed over. The result is nonetheless reported as
/// optimal (see [`SolverResult::is_optimal`]).
pub fn allocate(projects: &[ValuedProject], budget: Money) -> SolverResult {
    let mut viable = projects
        .iter()
        .enumerate()
        .filter(|(_, valued)| valued.total_npv > Money(0.0))
        .collect_vec();

    // NB: stable sort, so ties keep their input order
    viable.sort_by(|(_, a), (_, b)| b.efficiency().value().total_cmp(&a.efficiency().value()));

    let mut units = vec![0; projects.len()];
    let mut total_cost = Money(0.0);
    let mut total_npv = Money(0.0);
    for (index, valued) in viable {
        let project = &valued.project;
        let count = units_affordable(budget - total_cost, project.cost, project.max_units);
        if count > 0 {
            debug!("Allocating {count} unit(s) of project {}", project.id);
            units[index] = count;
            let count = Dimensionless(f64::from(count));
            total_cost += project.cost * count;
            total_npv += valued.total_npv * count;
        }
    }

    SolverResult::new(
        projects,
        units,
        total_cost,
        total_npv,
        AllocationMethod::Greedy,
    )
}

/// The number of units of cost `cost` which can be bought with `remaining`, capped at `max_units`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn units_affordable(remaining: Money, cost: Money, max_units: u32) -> u32 {
    let max_affordable = (remaining / cost).value().floor();
    if max_affordable.is_nan() || max_affordable < 1.0 {
        return 0;
    }

    // A whole number in 0..=max_units here
    max_affordable.min(f64::from(max_units)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::valued;
    use crate::solver::OPTIMAL_STATUS;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[test]
    fn test_allocate_unit_cap_before_budget() {
        // Efficiencies are 0.25 and 0.45, so "2" goes first and uses up the whole budget
        let projects = [valued("1", 4.0, 1.0, 3), valued("2", 2.0, 0.9, 5)];
        let result = allocate(&projects, Money(10.0));

        assert_eq!(result.units_for(&"1".into()), Some(0));
        assert_eq!(result.units_for(&"2".into()), Some(5));
        assert_approx_eq!(Money, result.total_cost, Money(10.0));
        assert_approx_eq!(Money, result.total_npv, Money(4.5));
        assert!(result.is_optimal);
        assert_eq!(result.status, OPTIMAL_STATUS);
        assert!(result.is_heuristic());
    }

    #[test]
    fn test_allocate_keeps_input_order() {
        let projects = [
            valued("low", 4.0, 1.0, 3),
            valued("high", 2.0, 0.9, 1),
            valued("none", 2.0, -0.5, 4),
        ];
        let result = allocate(&projects, Money(10.0));
        let ids: Vec<_> = result
            .allocations
            .iter()
            .map(|allocation| allocation.project_id.to_string())
            .collect();
        assert_eq!(ids, ["low", "high", "none"]);

        // "high" takes 2 of the budget, leaving 8 for two units of "low"
        let units: Vec<_> = result.allocations.iter().map(|a| a.units).collect();
        assert_eq!(units, [2, 1, 0]);
    }

    #[test]
    fn test_allocate_tie_break_by_input_order() {
        let first = valued("a", 2.0, 1.0, 2);
        let second = valued("b", 4.0, 2.0, 1);

        let result = allocate(&[first.clone(), second.clone()], Money(4.0));
        assert_eq!(result.units_for(&"a".into()), Some(2));
        assert_eq!(result.units_for(&"b".into()), Some(0));

        let result = allocate(&[second, first], Money(4.0));
        assert_eq!(result.units_for(&"a".into()), Some(0));
        assert_eq!(result.units_for(&"b".into()), Some(1));
    }

    #[test]
    fn test_allocate_misses_better_fill() {
        // Greedy buys the more efficient "a" and can't afford "b" with what's left, even though
        // two units of "b" would be worth more
        let projects = [valued("a", 6.0, 3.0, 1), valued("b", 5.0, 2.4, 2)];
        let result = allocate(&projects, Money(10.0));
        assert_eq!(result.units_for(&"a".into()), Some(1));
        assert_eq!(result.units_for(&"b".into()), Some(0));
        assert_approx_eq!(Money, result.total_npv, Money(3.0));
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(7.5)]
    #[case(13.0)]
    #[case(20.0)]
    #[case(1000.0)]
    fn test_allocate_respects_constraints(#[case] budget: f64) {
        let projects = [
            valued("1", 4.0, 0.27, 3),
            valued("2", 4.2, 0.4, 3),
            valued("3", 3.6, -0.1, 3),
            valued("4", 1.3, 0.05, 4),
            valued("5", 0.7, 0.0, 9),
        ];
        let result = allocate(&projects, Money(budget));

        let mut spent = 0.0;
        for (valued, allocation) in projects.iter().zip(&result.allocations) {
            assert!(allocation.units <= valued.project.max_units);
            if valued.total_npv <= Money(0.0) {
                assert_eq!(allocation.units, 0);
            }
            spent += f64::from(allocation.units) * valued.project.cost.value();
        }
        assert!(spent <= budget + 1e-9);
        assert_approx_eq!(f64, spent, result.total_cost.value(), epsilon = 1e-9);
    }

    #[test]
    fn test_allocate_zero_budget() {
        let projects = [valued("1", 4.0, 1.0, 3), valued("2", 2.0, 0.9, 5)];
        let result = allocate(&projects, Money(0.0));
        assert!(result.allocations.iter().all(|a| a.units == 0));
        assert_eq!(result.total_cost, Money(0.0));
        assert_eq!(result.total_npv, Money(0.0));
        assert!(!result.has_investment());
    }

    #[test]
    fn test_allocate_no_viable_projects() {
        let projects = [valued("1", 4.0, -1.0, 3), valued("2", 2.0, 0.0, 5)];
        let result = allocate(&projects, Money(100.0));
        assert!(!result.has_investment());
        assert_eq!(result.allocations.len(), 2);
    }

    #[test]
    fn test_allocate_empty() {
        let result = allocate(&[], Money(100.0));
        assert!(result.allocations.is_empty());
        assert_eq!(result.total_npv, Money(0.0));
    }

    #[rstest]
    #[case(10.0, 4.0, 3, 2)]
    #[case(12.0, 4.0, 3, 3)]
    #[case(100.0, 4.0, 3, 3)]
    #[case(3.9, 4.0, 3, 0)]
    #[case(-1.0, 4.0, 3, 0)]
    #[case(f64::NAN, 4.0, 3, 0)]
    #[case(f64::INFINITY, 4.0, 3, 3)]
    #[case(10.0, 4.0, 0, 0)]
    fn test_units_affordable(
        #[case] remaining: f64,
        #[case] cost: f64,
        #[case] max_units: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(
            units_affordable(Money(remaining), Money(cost), max_units),
            expected
        );
    }
}
