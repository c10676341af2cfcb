//! Simulation report generation.

use crate::enhancement::effective_threshold;
use crate::rates::{destroy_rate, downgrade_rate, enhance_cost, success_rate, tier};
use serde::Serialize;

/// Slack added to the statistical band so tiny samples don't flap.
const TOLERANCE_EPSILON: f64 = 0.005;

/// Standard deviations allowed between observed and expected rates.
const TOLERANCE_SIGMAS: f64 = 4.0;

/// Observed outcomes for independent attempts made at one level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelReport {
    pub level: u8,
    pub force_passion: bool,
    pub trials: u64,
    pub successes: u64,
    pub downgrades: u64,
    pub destroys: u64,
}

impl LevelReport {
    pub fn new(level: u8, force_passion: bool) -> Self {
        Self {
            level,
            force_passion,
            trials: 0,
            successes: 0,
            downgrades: 0,
            destroys: 0,
        }
    }

    /// Success threshold in percent the engine applies at this level.
    pub fn expected_success(&self) -> f64 {
        effective_threshold(success_rate(self.level), self.force_passion)
    }

    /// Probability of destruction per attempt, as a fraction.
    pub fn expected_destroy(&self) -> f64 {
        let fail = 1.0 - self.expected_success() / 100.0;
        fail * destroy_rate(self.level) / 100.0
    }

    /// Probability of a downgrade per attempt, as a fraction.
    pub fn expected_downgrade(&self) -> f64 {
        if self.level == 0 {
            return 0.0;
        }
        let fail = 1.0 - self.expected_success() / 100.0;
        let survive = 1.0 - destroy_rate(self.level) / 100.0;
        fail * survive * downgrade_rate(self.level) / 100.0
    }

    fn ratio(&self, count: u64) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            count as f64 / self.trials as f64
        }
    }

    pub fn observed_success(&self) -> f64 {
        self.ratio(self.successes)
    }

    pub fn observed_destroy(&self) -> f64 {
        self.ratio(self.destroys)
    }

    pub fn observed_downgrade(&self) -> f64 {
        self.ratio(self.downgrades)
    }

    /// Whether every observed rate sits within a few standard errors of the
    /// table value.
    pub fn within_tolerance(&self) -> bool {
        if self.trials == 0 {
            return true;
        }
        let n = self.trials as f64;
        let close = |observed: f64, expected: f64| {
            let sigma = (expected * (1.0 - expected) / n).sqrt();
            (observed - expected).abs() <= TOLERANCE_SIGMAS * sigma + TOLERANCE_EPSILON
        };
        close(self.observed_success(), self.expected_success() / 100.0)
            && close(self.observed_destroy(), self.expected_destroy())
            && close(self.observed_downgrade(), self.expected_downgrade())
    }
}

/// Aggregate of climbs from +0 toward a target level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LadderReport {
    pub target: u8,
    pub runs: u32,
    pub reached: u32,
    pub total_attempts: u64,
    pub total_spent: u64,
    pub total_destroys: u64,
}

impl LadderReport {
    pub fn new(target: u8) -> Self {
        Self {
            target,
            runs: 0,
            reached: 0,
            total_attempts: 0,
            total_spent: 0,
            total_destroys: 0,
        }
    }

    pub fn record_run(&mut self, reached: bool, attempts: u64, spent: u64, destroys: u64) {
        self.runs += 1;
        if reached {
            self.reached += 1;
        }
        self.total_attempts = self.total_attempts.saturating_add(attempts);
        self.total_spent = self.total_spent.saturating_add(spent);
        self.total_destroys = self.total_destroys.saturating_add(destroys);
    }

    pub fn avg_attempts(&self) -> f64 {
        self.total_attempts as f64 / self.runs.max(1) as f64
    }

    pub fn avg_spent(&self) -> f64 {
        self.total_spent as f64 / self.runs.max(1) as f64
    }

    pub fn avg_destroys(&self) -> f64 {
        self.total_destroys as f64 / self.runs.max(1) as f64
    }

    pub fn reach_rate(&self) -> f64 {
        self.reached as f64 / self.runs.max(1) as f64
    }
}

/// Everything one simulator invocation measured.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub attempts_per_level: u32,
    pub force_passion: bool,
    pub seed: Option<u64>,
    pub levels: Vec<LevelReport>,
    pub ladder: Option<LadderReport>,
}

impl SimReport {
    /// Levels whose observed rates drifted outside tolerance.
    pub fn drifted_levels(&self) -> Vec<u8> {
        self.levels
            .iter()
            .filter(|l| !l.within_tolerance())
            .map(|l| l.level)
            .collect()
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    FORGE SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        if !self.levels.is_empty() {
            report.push_str(&format!(
                "Attempts per level: {}{}\n\n",
                self.attempts_per_level,
                if self.force_passion {
                    " (passion forced)"
                } else {
                    ""
                }
            ));
            report.push_str("── OBSERVED RATES ───────────────────────────────────────────────\n");
            report.push_str("  Level  Tier     Cost     Success (exp)      Destroy (exp)     Down (exp)\n");
            report.push_str("  ─────  ──────  ───────  ─────────────────  ────────────────  ────────────────\n");
            for l in &self.levels {
                let flag = if l.within_tolerance() { "" } else { "  ⚠️" };
                report.push_str(&format!(
                    "  {:>5}  {:<6}  {:>7}  {:>6.2}% ({:>6.2}%)  {:>5.2}% ({:>5.2}%)  {:>5.2}% ({:>5.2}%){}\n",
                    format!("+{}", l.level),
                    tier(l.level).name(),
                    enhance_cost(l.level),
                    l.observed_success() * 100.0,
                    l.expected_success(),
                    l.observed_destroy() * 100.0,
                    l.expected_destroy() * 100.0,
                    l.observed_downgrade() * 100.0,
                    l.expected_downgrade() * 100.0,
                    flag
                ));
            }
            report.push('\n');
        }

        if let Some(ladder) = &self.ladder {
            report.push_str("── LADDER ───────────────────────────────────────────────────────\n");
            report.push_str(&format!("  Target:           +{}\n", ladder.target));
            report.push_str(&format!(
                "  Runs:             {} ({} reached, {:.1}%)\n",
                ladder.runs,
                ladder.reached,
                ladder.reach_rate() * 100.0
            ));
            report.push_str(&format!("  Avg Attempts:     {:.1}\n", ladder.avg_attempts()));
            report.push_str(&format!("  Avg Gold Spent:   {:.0}\n", ladder.avg_spent()));
            report.push_str(&format!("  Avg Destroys:     {:.2}\n\n", ladder.avg_destroys()));
        }

        let drifted = self.drifted_levels();
        if !drifted.is_empty() {
            report.push_str(&format!(
                "  ⚠️  Rates outside tolerance at levels {:?}\n",
                drifted
            ));
        }

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
