//! A regression test for the "quantestate" example
mod regression;
use regression::run_regression_test;

#[test]
fn test_regression_quantestate() {
    run_regression_test("quantestate");
}
