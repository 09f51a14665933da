//! Factory for creating solver gateways based on configuration

use super::encoder::CnfFormula;
use super::external::{ExternalSolver, ExternalSolverConfig};
use super::solver::{CadicalSolver, GatewayError, SolverGateway, SolverRun};
use crate::config::{SolverBackend, SolverConfig};

/// Solver gateway that can use different backends
pub enum UnifiedSolver {
    External(ExternalSolver),
    Cadical(CadicalSolver),
}

impl UnifiedSolver {
    /// Create a gateway for the configured backend
    pub fn new(config: &SolverConfig) -> Self {
        match config.backend {
            SolverBackend::External => UnifiedSolver::External(ExternalSolver::new(
                ExternalSolverConfig::default()
                    .with_executable(&config.executable)
                    .with_args(config.args.clone())
                    .with_timeout(config.timeout()),
            )),
            SolverBackend::Cadical => UnifiedSolver::Cadical(CadicalSolver::new(config.timeout())),
        }
    }

    /// Get the backend type being used
    pub fn backend(&self) -> SolverBackend {
        match self {
            UnifiedSolver::External(_) => SolverBackend::External,
            UnifiedSolver::Cadical(_) => SolverBackend::Cadical,
        }
    }
}

impl SolverGateway for UnifiedSolver {
    fn name(&self) -> &str {
        match self {
            UnifiedSolver::External(solver) => solver.name(),
            UnifiedSolver::Cadical(solver) => solver.name(),
        }
    }

    fn solve(&mut self, formula: &CnfFormula) -> Result<SolverRun, GatewayError> {
        match self {
            UnifiedSolver::External(solver) => solver.solve(formula),
            UnifiedSolver::Cadical(solver) => solver.solve(formula),
        }
    }
}
