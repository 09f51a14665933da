//! Run-time statistics scraped from Glucose/MiniSat style solver output

use regex::Regex;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverStatistics {
    pub restarts: Option<u64>,
    pub conflicts: Option<u64>,
    pub decisions: Option<u64>,
    pub propagations: Option<u64>,
    pub conflict_literals: Option<u64>,
    pub memory_mb: Option<f64>,
    pub cpu_seconds: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Restarts,
    Conflicts,
    Decisions,
    Propagations,
    ConflictLiterals,
    MemoryMb,
    CpuSeconds,
}

fn patterns() -> Vec<(Regex, Field)> {
    [
        (r"(?i)restarts?\s*[:=]\s*([\d,]+)", Field::Restarts),
        (r"(?i)conflicts?\s*[:=]\s*([\d,]+)", Field::Conflicts),
        (r"(?i)decisions?\s*[:=]\s*([\d,]+)", Field::Decisions),
        (r"(?i)propagations?\s*[:=]\s*([\d,]+)", Field::Propagations),
        (r"(?i)conflict literals?\s*[:=]\s*([\d,]+)", Field::ConflictLiterals),
        (r"(?i)memory(?: used)?\s*[:=]\s*([\d.]+)\s*MB", Field::MemoryMb),
        (r"(?i)(?:cpu |solving )?time\s*[:=]\s*([\d.]+)\s*s", Field::CpuSeconds),
    ]
    .into_iter()
    .filter_map(|(pattern, field)| Regex::new(pattern).ok().map(|re| (re, field)))
    .collect()
}

impl SolverStatistics {
    /// Scrape every recognised statistic; a later line overrides an earlier one
    pub fn parse(output: &str) -> Self {
        let patterns = patterns();
        let mut stats = Self::default();

        for line in output.lines() {
            let line = line.trim();
            for (re, field) in &patterns {
                if let Some(value) = re.captures(line).and_then(|caps| caps.get(1)) {
                    stats.record(*field, value.as_str());
                }
            }
        }

        stats
    }

    fn record(&mut self, field: Field, raw: &str) {
        let count = || raw.replace(',', "").parse::<u64>().ok();
        let real = || raw.parse::<f64>().ok();

        match field {
            Field::Restarts => self.restarts = count().or(self.restarts),
            Field::Conflicts => self.conflicts = count().or(self.conflicts),
            Field::Decisions => self.decisions = count().or(self.decisions),
            Field::Propagations => self.propagations = count().or(self.propagations),
            Field::ConflictLiterals => self.conflict_literals = count().or(self.conflict_literals),
            Field::MemoryMb => self.memory_mb = real().or(self.memory_mb),
            Field::CpuSeconds => self.cpu_seconds = real().or(self.cpu_seconds),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "Solver statistics: (none found)");
        }

        writeln!(f, "Solver statistics:")?;
        let counts = [
            ("Restarts", self.restarts),
            ("Conflicts", self.conflicts),
            ("Decisions", self.decisions),
            ("Propagations", self.propagations),
            ("Conflict literals", self.conflict_literals),
        ];
        for (label, value) in counts {
            if let Some(value) = value {
                writeln!(f, "- {}: {}", label, value)?;
            }
        }
        if let Some(memory) = self.memory_mb {
            writeln!(f, "- Memory (MB): {}", memory)?;
        }
        if let Some(cpu) = self.cpu_seconds {
            writeln!(f, "- CPU time (s): {}", cpu)?;
        }
        Ok(())
    }
}
