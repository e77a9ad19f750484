//! End-to-end solve tests for the modeling layer.
//!
//! Each case builds a small problem with a known optimum and the runner
//! checks the optimal value.

use cvxalloc::prelude::*;
use nalgebra::DVector;

/// Tolerance for comparing floating point results
const TOL: f64 = 1e-4;

struct TestCase {
    name: &'static str,
    /// Builds the problem and returns (problem, expected_value)
    build: fn() -> (Problem, f64),
}

fn linear(a: Affine) -> Expr {
    Expr::affine(a).unwrap()
}

fn test_cases() -> Vec<TestCase> {
    vec![
        // ========== Linear Programs ==========
        TestCase {
            name: "sum_equality_constraint",
            build: || {
                // x == 2 in R^3
                let x = variable(3);
                let x = Affine::var(&x);
                let prob = Problem::minimize(linear(x.sum()))
                    .subject_to([x.equals(2.0).unwrap()])
                    .build();
                (prob, 6.0)
            },
        },
        TestCase {
            name: "negated_sum_upper_bound",
            build: || {
                // minimize -sum(x) s.t. x <= 3 in R^4
                let x = variable(4);
                let x = Affine::var(&x);
                let prob = Problem::minimize(linear(x.sum().neg()))
                    .subject_to([x.leq(3.0).unwrap()])
                    .build();
                (prob, -12.0)
            },
        },
        TestCase {
            name: "weighted_sum_on_simplex",
            build: || {
                // cheapest coordinate takes the whole budget
                let x = variable(3);
                let x = Affine::var(&x);
                let c = DVector::from_vec(vec![3.0, 1.0, 2.0]);
                let prob = Problem::minimize(linear(x.mul_elementwise(&c).unwrap().sum()))
                    .subject_to([x.sum().equals(1.0).unwrap(), x.geq(0.0).unwrap()])
                    .build();
                (prob, 1.0)
            },
        },
        // ========== Second-Order Cone ==========
        TestCase {
            name: "norm2_with_lower_bound",
            build: || {
                // x >= 1 in R^4: ||x|| = 2
                let x = variable(4);
                let x = Affine::var(&x);
                let prob = Problem::minimize(norm2(&x))
                    .subject_to([x.geq(1.0).unwrap()])
                    .build();
                (prob, 2.0)
            },
        },
        TestCase {
            name: "norm2_of_shifted_variable",
            build: || {
                let x = variable(2);
                let shifted = Affine::var(&x)
                    .sub(&Affine::constant(DVector::from_vec(vec![1.0, -2.0])))
                    .unwrap();
                (Problem::minimize(norm2(&shifted)).build(), 0.0)
            },
        },
        TestCase {
            name: "scaled_norm2",
            build: || {
                // 3 * ||x|| with sum(x) = 2 in R^2: x = [1, 1]
                let x = variable(2);
                let x = Affine::var(&x);
                let prob = Problem::minimize(3.0 * norm2(&x))
                    .subject_to([x.sum().equals(2.0).unwrap()])
                    .build();
                (prob, 3.0 * 2.0_f64.sqrt())
            },
        },
        TestCase {
            name: "sum_over_norm_ball",
            build: || {
                // minimize sum(x) s.t. ||x|| <= 1 in R^2
                let x = variable(2);
                let x = Affine::var(&x);
                let prob = Problem::minimize(linear(x.sum()))
                    .subject_to([norm2(&x).leq(1.0).unwrap()])
                    .build();
                (prob, -(2.0_f64.sqrt()))
            },
        },
        TestCase {
            name: "sum_over_squared_norm_ball",
            build: || {
                // ||x||^2 <= 4 in R^4: x = -1
                let x = variable(4);
                let x = Affine::var(&x);
                let prob = Problem::minimize(linear(x.sum()))
                    .subject_to([sum_squares(&x).leq(4.0).unwrap()])
                    .build();
                (prob, -4.0)
            },
        },
        // ========== Quadratic ==========
        TestCase {
            name: "sum_squares_on_hyperplane",
            build: || {
                // sum(x) = 2 in R^4: x = 0.5
                let x = variable(4);
                let x = Affine::var(&x);
                let prob = Problem::minimize(sum_squares(&x))
                    .subject_to([x.sum().equals(2.0).unwrap()])
                    .build();
                (prob, 1.0)
            },
        },
        TestCase {
            name: "norm2_plus_sum_squares",
            build: || {
                // sum(x) = 3 in R^3: x = 1, 3 + sqrt(3)
                let x = variable(3);
                let x = Affine::var(&x);
                let prob = Problem::minimize(norm2(&x) + sum_squares(&x))
                    .subject_to([x.sum().equals(3.0).unwrap()])
                    .build();
                (prob, 3.0 + 3.0_f64.sqrt())
            },
        },
        TestCase {
            name: "objective_constant_offset",
            build: || {
                // ||x - 1||^2 + 5 where the optimum x = 1 meets sum(x) = 3
                let x = variable(3);
                let diff = Affine::var(&x).offset(-1.0);
                let prob = Problem::minimize(sum_squares(&diff) + Expr::constant(5.0))
                    .subject_to([Affine::var(&x).sum().equals(3.0).unwrap()])
                    .build();
                (prob, 5.0)
            },
        },
    ]
}

#[test]
fn test_all_cases() {
    let mut failures = Vec::new();

    for case in test_cases() {
        let (problem, expected) = (case.build)();
        match problem.solve() {
            Ok(solution) => {
                if !solution.status.has_solution() {
                    failures.push(format!("{}: status {}", case.name, solution.status));
                    continue;
                }
                match solution.value {
                    Some(value) if (value - expected).abs() <= TOL * (1.0 + expected.abs()) => {}
                    Some(value) => failures.push(format!(
                        "{}: expected {}, got {}",
                        case.name, expected, value
                    )),
                    None => failures.push(format!("{}: no objective value", case.name)),
                }
            }
            Err(err) => failures.push(format!("{}: {}", case.name, err)),
        }
    }

    assert!(failures.is_empty(), "failed cases:\n{}", failures.join("\n"));
}

#[test]
fn test_unbounded_linear_program() {
    let x = variable(2);
    let solution = Problem::minimize(linear(Affine::var(&x).sum()))
        .subject_to([Affine::var(&x).leq(0.0).unwrap()])
        .solve()
        .expect("solve failed");
    assert!(matches!(
        solution.status,
        SolveStatus::Unbounded | SolveStatus::UnboundedInaccurate
    ));
    assert!(solution.primal.is_none());
}

#[test]
fn test_norm_lower_bound_rejected() {
    let x = variable(2);
    let err = norm2(&Affine::var(&x)).geq(1.0).unwrap_err();
    assert!(matches!(err, CvxError::NotDcp(_)));
}

#[test]
fn test_solution_lookup_by_variable() {
    let x = variable(2);
    let y = variable(1);
    let solution = Problem::minimize(sum_squares(&Affine::var(&x).offset(-3.0)))
        .subject_to([Affine::var(&y).equals(7.0).unwrap()])
        .solve()
        .expect("solve failed");

    let xs = solution.get(&x).expect("missing x");
    assert!(xs.iter().all(|v| (v - 3.0).abs() < TOL));
    let ys = solution.get(&y).expect("missing y");
    assert!((ys[0] - 7.0).abs() < TOL);
}
