//! Solver gateway interface and the embedded CaDiCaL backend

use super::encoder::CnfFormula;
use super::stats::SolverStatistics;
use cadical::{Solver, Timeout};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// Variables a solver assigned true, in the order it reported them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    true_variables: Vec<i32>,
}

impl Assignment {
    pub fn new(true_variables: Vec<i32>) -> Self {
        Self { true_variables }
    }

    /// Keep the positive literals of a model; negatives and `0` are dropped
    pub fn from_literals<I: IntoIterator<Item = i32>>(literals: I) -> Self {
        Self {
            true_variables: literals.into_iter().filter(|&lit| lit > 0).collect(),
        }
    }

    pub fn true_variables(&self) -> &[i32] {
        &self.true_variables
    }

    pub fn is_empty(&self) -> bool {
        self.true_variables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.true_variables.len()
    }
}

/// What a solver concluded about a formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Satisfiable(Assignment),
    Unsatisfiable,
}

impl Verdict {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, Verdict::Satisfiable(_))
    }
}

/// One completed solver invocation
#[derive(Debug, Clone)]
pub struct SolverRun {
    pub verdict: Verdict,
    pub solve_time: Duration,
    /// Combined solver output, empty for embedded backends
    pub raw_output: String,
    pub statistics: SolverStatistics,
}

/// Ways a gateway call can fail; all are terminal for the run
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("solver executable not found: {0}")]
    NotFound(PathBuf),

    #[error("solver timed out after {0:?}")]
    Timeout(Duration),

    #[error("solver produced no verdict (exit status: {status})")]
    NoVerdict { status: String },

    #[error("solver stopped without an answer")]
    Interrupted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The one capability the tiling pipeline needs from a SAT solver
pub trait SolverGateway {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// Decide satisfiability of `formula`
    fn solve(&mut self, formula: &CnfFormula) -> Result<SolverRun, GatewayError>;
}

/// In-process CaDiCaL backend
pub struct CadicalSolver {
    timeout: Duration,
}

impl CadicalSolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl SolverGateway for CadicalSolver {
    fn name(&self) -> &str {
        "cadical"
    }

    fn solve(&mut self, formula: &CnfFormula) -> Result<SolverRun, GatewayError> {
        let start_time = Instant::now();

        if formula.has_empty_clause() {
            debug!("Formula contains an empty clause, skipping CaDiCaL");
            return Ok(SolverRun {
                verdict: Verdict::Unsatisfiable,
                solve_time: start_time.elapsed(),
                raw_output: String::new(),
                statistics: SolverStatistics::default(),
            });
        }

        let mut solver: Solver = Solver::new();
        solver.set_callbacks(Some(Timeout::new(self.timeout.as_secs_f32())));
        for clause in &formula.clauses {
            solver.add_clause(clause.literals.iter().copied());
        }

        let verdict = match solver.solve() {
            Some(true) => {
                let last = i32::try_from(formula.num_variables).unwrap_or(i32::MAX);
                let true_variables = (1..=last)
                    .filter(|&var| solver.value(var) == Some(true))
                    .collect();
                Verdict::Satisfiable(Assignment::new(true_variables))
            }
            Some(false) => Verdict::Unsatisfiable,
            None if start_time.elapsed() >= self.timeout => {
                return Err(GatewayError::Timeout(self.timeout));
            }
            None => return Err(GatewayError::Interrupted),
        };

        Ok(SolverRun {
            verdict,
            solve_time: start_time.elapsed(),
            raw_output: String::new(),
            statistics: SolverStatistics::default(),
        })
    }
}

impl std::fmt::Display for SolverRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Solver Run:")?;
        match &self.verdict {
            Verdict::Satisfiable(assignment) => {
                writeln!(f, "  Result: SATISFIABLE")?;
                writeln!(f, "  True variables: {}", assignment.len())?;
            }
            Verdict::Unsatisfiable => writeln!(f, "  Result: UNSATISFIABLE")?,
        }
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        Ok(())
    }
}
