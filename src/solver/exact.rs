//! Exact allocation by integer programming.
use super::{AllocationMethod, SolverResult};
use crate::units::{Dimensionless, Money};
use crate::valuation::ValuedProject;
use anyhow::{Result, anyhow, bail, ensure};
use highs::{HighsModelStatus, RowProblem as Problem, Sense};
use itertools::Itertools;

/// A decision variable in the optimisation
///
/// Note that this type does **not** include the value of the variable; it just refers to a
/// particular column of the problem.
type Variable = highs::Col;

/// Tolerance on constraint violation and integrality passed to `HiGHS`.
///
/// Tighter than the defaults so that rounding the solution can't push spending over budget.
const FEASIBILITY_TOLERANCE: f64 = 1e-9;

/// Allocate units to projects so as to maximise total NPV.
///
/// Only projects with a positive NPV are given a variable; the others are never bought, as in
/// the greedy method.
pub fn allocate_exact(projects: &[ValuedProject], budget: Money) -> Result<SolverResult> {
    ensure!(
        budget.is_finite(),
        "Budget must be finite for exact allocation"
    );

    let viable = projects
        .iter()
        .enumerate()
        .filter(|(_, valued)| valued.total_npv > Money(0.0))
        .collect_vec();
    for (_, valued) in &viable {
        ensure!(
            valued.total_npv.is_finite() && valued.project.cost.is_finite(),
            "Project {} has a non-finite cost or NPV",
            valued.project.id
        );
    }

    let mut units = vec![0; projects.len()];
    if !viable.is_empty() {
        let solution = solve(&viable, budget)?;
        for ((index, _), value) in viable.iter().zip(solution) {
            units[*index] = round_units(value);
        }
    }

    let (total_cost, total_npv) = projects.iter().zip(&units).fold(
        (Money(0.0), Money(0.0)),
        |(cost, npv), (valued, &units)| {
            let units = Dimensionless(f64::from(units));
            (
                cost + valued.project.cost * units,
                npv + valued.total_npv * units,
            )
        },
    );

    Ok(SolverResult::new(
        projects,
        units,
        total_cost,
        total_npv,
        AllocationMethod::Exact,
    ))
}

/// Solve the knapsack problem for the given projects, returning the number of units of each
fn solve(viable: &[(usize, &ValuedProject)], budget: Money) -> Result<Vec<f64>> {
    let mut problem = Problem::default();

    let variables: Vec<Variable> = viable
        .iter()
        .map(|(_, valued)| {
            problem.add_integer_column(
                valued.total_npv.value(),
                0.0..=f64::from(valued.project.max_units),
            )
        })
        .collect();

    // Spending can't exceed the budget
    problem.add_row(
        ..=budget.value(),
        variables
            .iter()
            .zip(viable)
            .map(|(var, (_, valued))| (*var, valued.project.cost.value())),
    );

    let mut model = problem.optimise(Sense::Maximise);
    model.set_option("output_flag", false);
    model.set_option("primal_feasibility_tolerance", FEASIBILITY_TOLERANCE);
    model.set_option("mip_feasibility_tolerance", FEASIBILITY_TOLERANCE);

    let solved = model
        .try_solve()
        .map_err(|status| anyhow!("Could not solve: {status:?}"))?;
    match solved.status() {
        HighsModelStatus::Optimal => Ok(solved.get_solution().columns().to_vec()),
        status => bail!("Could not solve: {status:?}"),
    }
}

/// Convert a solution value for an integer variable into a number of units
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_units(value: f64) -> u32 {
    value.round().max(0.0) as u32
}
