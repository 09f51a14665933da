//! Tiling problem definition: parse, encode, solve, decode

use super::{TilingOutcome, TilingSolution, TilingValidator};
use crate::config::Settings;
use crate::sat::{
    decode, encode, CnfFormula, EncodedTiling, EncodingStatistics, SolverGateway, Verdict,
    VariableBijection,
};
use crate::tiling::{load_instance_from_file, Instance};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// An edge-matching instance together with its CNF encoding for one grid size
pub struct TilingProblem {
    settings: Settings,
    instance: Instance,
    encoded: EncodedTiling,
}

impl TilingProblem {
    /// Encode `instance` on a `grid_size`×`grid_size` grid
    pub fn new(settings: Settings, instance: Instance, grid_size: usize) -> Result<Self> {
        let encoded = encode(&instance, grid_size).context("Failed to encode tiling instance")?;

        info!(
            "Encoded {}x{} grid: {} tiles, {} variables, {} clauses",
            grid_size,
            grid_size,
            instance.num_tiles(),
            encoded.formula.num_variables,
            encoded.formula.clause_count()
        );

        Ok(Self { settings, instance, encoded })
    }

    /// Load the instance file named by `path` and encode it
    pub fn from_file<P: AsRef<Path>>(settings: Settings, path: P, grid_size: usize) -> Result<Self> {
        let instance = load_instance_from_file(&path, settings.parsing.mode)?;
        Self::new(settings, instance, grid_size)
    }

    /// Hand the formula to `gateway` and decode its answer
    pub fn solve<G: SolverGateway + ?Sized>(&self, gateway: &mut G) -> Result<TilingOutcome> {
        info!("Solving with {} backend", gateway.name());

        let run = gateway
            .solve(&self.encoded.formula)
            .with_context(|| format!("{} solver failed", gateway.name()))?;

        let assignment = match run.verdict {
            Verdict::Unsatisfiable => {
                info!("Formula is unsatisfiable ({:.3}s)", run.solve_time.as_secs_f64());
                return Ok(TilingOutcome::Unsatisfiable {
                    solve_time: run.solve_time,
                    statistics: run.statistics,
                });
            }
            Verdict::Satisfiable(assignment) => assignment,
        };

        let grid = decode(&self.encoded.bijection, &assignment);
        let validation = TilingValidator::new(&self.instance).validate(&grid);
        if !validation.is_valid {
            warn!("Decoded tiling failed validation:\n{}", validation);
        }

        Ok(TilingOutcome::Solved(TilingSolution {
            grid,
            validation,
            backend: gateway.name().to_string(),
            solve_time: run.solve_time,
            statistics: run.statistics,
        }))
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn grid_size(&self) -> usize {
        self.encoded.bijection.grid_size()
    }

    pub fn formula(&self) -> &CnfFormula {
        &self.encoded.formula
    }

    pub fn bijection(&self) -> &VariableBijection {
        &self.encoded.bijection
    }

    pub fn encoding_statistics(&self) -> &EncodingStatistics {
        &self.encoded.statistics
    }
}
