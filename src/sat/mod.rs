//! SAT encoding, solving and decoding for edge-matching tilings

pub mod variables;
pub mod constraints;
pub mod encoder;
pub mod decoder;
pub mod solver;
pub mod external;
pub mod stats;
pub mod solver_factory;

pub use variables::{Placement, VariableBijection};
pub use constraints::{Clause, ConstraintGenerator, Direction};
pub use encoder::{encode, CnfFormula, EncodedTiling, EncodingError, EncodingStatistics};
pub use decoder::decode;
pub use solver::{Assignment, CadicalSolver, GatewayError, SolverGateway, SolverRun, Verdict};
pub use external::{ExternalSolver, ExternalSolverConfig};
pub use stats::SolverStatistics;
pub use solver_factory::UnifiedSolver;
