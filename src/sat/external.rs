//! External DIMACS solver process (glucose-syrup, minisat, kissat, ...)

use super::encoder::CnfFormula;
use super::solver::{Assignment, GatewayError, SolverGateway, SolverRun, Verdict};
use super::stats::SolverStatistics;
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use wait_timeout::ChildExt;

/// Configuration for an external solver process
#[derive(Debug, Clone)]
pub struct ExternalSolverConfig {
    /// Executable name or path
    pub executable: PathBuf,
    /// Arguments placed before the CNF file path
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl Default for ExternalSolverConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("glucose-syrup"),
            args: vec!["-model".to_string()],
            timeout: Duration::from_secs(300),
        }
    }
}

impl ExternalSolverConfig {
    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Runs a solver binary on a temporary DIMACS file
pub struct ExternalSolver {
    config: ExternalSolverConfig,
}

impl ExternalSolver {
    pub fn new(config: ExternalSolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExternalSolverConfig {
        &self.config
    }

    fn resolve_executable(&self) -> Result<PathBuf, GatewayError> {
        which::which(&self.config.executable)
            .map_err(|_| GatewayError::NotFound(self.config.executable.clone()))
    }

    /// Run the solver on `cnf_path`, returning its merged stdout/stderr
    fn run(&self, executable: &Path, cnf_path: &Path) -> Result<(ExitStatus, String), GatewayError> {
        // stdout and stderr share one capture file so their lines stay interleaved
        let mut capture = tempfile::tempfile()?;

        let mut child = Command::new(executable)
            .args(&self.config.args)
            .arg(cnf_path)
            .stdin(Stdio::null())
            .stdout(Stdio::from(capture.try_clone()?))
            .stderr(Stdio::from(capture.try_clone()?))
            .spawn()?;

        let status = match child.wait_timeout(self.config.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(GatewayError::Timeout(self.config.timeout));
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e.into());
            }
        };

        let mut raw = Vec::new();
        capture.seek(SeekFrom::Start(0))?;
        capture.read_to_end(&mut raw)?;

        Ok((status, String::from_utf8_lossy(&raw).into_owned()))
    }
}

impl SolverGateway for ExternalSolver {
    fn name(&self) -> &str {
        "external"
    }

    fn solve(&mut self, formula: &CnfFormula) -> Result<SolverRun, GatewayError> {
        let executable = self.resolve_executable()?;

        // Removed when dropped, on every exit path
        let cnf_file = tempfile::Builder::new()
            .prefix("tiling-")
            .suffix(".cnf")
            .tempfile()?;
        {
            let mut writer = BufWriter::new(cnf_file.as_file());
            formula.write_dimacs(&mut writer)?;
            writer.flush()?;
        }
        debug!("Wrote DIMACS to {}", cnf_file.path().display());

        info!("Running {} on {} clauses", executable.display(), formula.clause_count());
        let start_time = Instant::now();
        let (status, raw_output) = self.run(&executable, cnf_file.path())?;
        let solve_time = start_time.elapsed();

        let verdict = match parse_solver_output(&raw_output) {
            Some(verdict) => verdict,
            None => {
                return Err(GatewayError::NoVerdict { status: status.to_string() });
            }
        };

        Ok(SolverRun {
            verdict,
            solve_time,
            statistics: SolverStatistics::parse(&raw_output),
            raw_output,
        })
    }
}

/// Read the verdict and model from DIMACS solver output.
///
/// The first `s SATISFIABLE` / `s UNSATISFIABLE` line decides; any other or
/// missing status line yields `None`. All `v ` lines are joined into one
/// model. A model with an unparseable token is discarded as a whole.
pub fn parse_solver_output(output: &str) -> Option<Verdict> {
    let status = output
        .lines()
        .find(|line| line.starts_with("s "))?;

    if status.starts_with("s UNSATISFIABLE") {
        return Some(Verdict::Unsatisfiable);
    }
    if !status.starts_with("s SATISFIABLE") {
        return None;
    }

    let model_text = output
        .lines()
        .filter_map(|line| line.strip_prefix("v "))
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ");

    let literals: Result<Vec<i32>, _> = model_text.split_whitespace().map(str::parse).collect();
    let assignment = match literals {
        Ok(literals) => Assignment::from_literals(literals),
        Err(e) => {
            warn!("Discarding malformed solver model: {}", e);
            Assignment::default()
        }
    };

    if assignment.is_empty() {
        warn!("Solver reported SATISFIABLE without a model");
    }

    Some(Verdict::Satisfiable(assignment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_satisfiable_with_split_model() {
        let output = "c glucose\ns SATISFIABLE\nv 1 -2 3\nv -4 5 0\n";
        let verdict = parse_solver_output(output).unwrap();
        assert_eq!(verdict, Verdict::Satisfiable(Assignment::new(vec![1, 3, 5])));
    }

    #[test]
    fn test_parse_unsatisfiable() {
        assert_eq!(parse_solver_output("c hi\ns UNSATISFIABLE\n"), Some(Verdict::Unsatisfiable));
    }

    #[test]
    fn test_parse_without_verdict() {
        assert_eq!(parse_solver_output("c crashed\n"), None);
        assert_eq!(parse_solver_output("s UNKNOWN\n"), None);
    }

    #[test]
    fn test_parse_satisfiable_without_model() {
        let verdict = parse_solver_output("s SATISFIABLE\n").unwrap();
        assert_eq!(verdict, Verdict::Satisfiable(Assignment::default()));
    }

    #[test]
    fn test_parse_malformed_model_is_discarded() {
        let verdict = parse_solver_output("s SATISFIABLE\nv 1 x 3 0\n").unwrap();
        assert_eq!(verdict, Verdict::Satisfiable(Assignment::default()));
    }

    #[test]
    fn test_missing_executable() {
        let mut solver = ExternalSolver::new(
            ExternalSolverConfig::default().with_executable("definitely-not-a-sat-solver-binary"),
        );
        let result = solver.solve(&CnfFormula::new(0));
        assert!(matches!(result, Err(GatewayError::NotFound(_))));
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use tempfile::TempDir;

        /// A `sh` solver configuration running `body`; the CNF path arrives as `$1`
        fn fake_solver(dir: &TempDir, body: &str) -> ExternalSolverConfig {
            let path = dir.path().join("fake-solver.sh");
            std::fs::write(&path, body).unwrap();
            ExternalSolverConfig::default()
                .with_executable("sh")
                .with_args(vec![path.display().to_string()])
                .with_timeout(Duration::from_secs(10))
        }

        #[test]
        fn test_fake_solver_round_trip() {
            let dir = TempDir::new().unwrap();
            let config = fake_solver(
                &dir,
                "echo \"c file $1\"\n\
                 head -n 1 \"$1\" | sed 's/^/c /'\n\
                 echo 'c conflicts : 12' >&2\n\
                 echo 's SATISFIABLE'\n\
                 echo 'v 1 -2 0'\n",
            );

            let mut solver = ExternalSolver::new(config);
            let run = solver.solve(&CnfFormula::new(2)).unwrap();

            assert_eq!(run.verdict, Verdict::Satisfiable(Assignment::new(vec![1])));
            assert!(run.raw_output.contains("c p cnf 2 0"));
            assert_eq!(run.statistics.conflicts, Some(12));

            let cnf_path = run
                .raw_output
                .lines()
                .find_map(|line| line.strip_prefix("c file "))
                .unwrap();
            assert!(cnf_path.ends_with(".cnf"));
            assert!(!Path::new(cnf_path).exists());
        }

        /// Path the fake solver recorded for its CNF argument
        fn recorded_cnf_path(dir: &TempDir) -> PathBuf {
            let recorded = std::fs::read_to_string(dir.path().join("cnf-path")).unwrap();
            PathBuf::from(recorded.trim())
        }

        #[test]
        fn test_fake_solver_without_verdict() {
            let dir = TempDir::new().unwrap();
            let script = format!(
                "echo \"$1\" > '{}'\necho 'c segfault'\nexit 139\n",
                dir.path().join("cnf-path").display()
            );
            let mut solver = ExternalSolver::new(fake_solver(&dir, &script));

            let result = solver.solve(&CnfFormula::new(0));
            assert!(matches!(result, Err(GatewayError::NoVerdict { .. })));

            let cnf_path = recorded_cnf_path(&dir);
            assert!(cnf_path.to_string_lossy().ends_with(".cnf"));
            assert!(!cnf_path.exists());
        }

        #[test]
        fn test_timeout_kills_solver() {
            let dir = TempDir::new().unwrap();
            let script = format!(
                "echo \"$1\" > '{}'\nexec sleep 30\n",
                dir.path().join("cnf-path").display()
            );
            let config = fake_solver(&dir, &script).with_timeout(Duration::from_millis(500));

            let mut solver = ExternalSolver::new(config);
            let start = Instant::now();
            let result = solver.solve(&CnfFormula::new(0));

            assert!(matches!(result, Err(GatewayError::Timeout(_))));
            assert!(start.elapsed() < Duration::from_secs(10));
            assert!(!recorded_cnf_path(&dir).exists());
        }
    }
}
