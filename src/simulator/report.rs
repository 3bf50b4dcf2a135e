//! Simulation report generation.

use super::stats::RunStats;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub target_tier: u32,
    pub runs_completed: u32,
    pub runs_timed_out: u32,
    pub runs_won: u32,

    // Aggregated stats
    pub avg_final_tier: f64,
    pub avg_highest_tier: f64,
    pub avg_squares_filled: f64,
    pub avg_rows_completed: f64,
    pub avg_collects: f64,
    pub avg_blue_collected: f64,
    pub avg_pink_earned: f64,
    pub avg_upgrades_bought: f64,
    pub avg_skills_bought: f64,
    pub avg_spells_cast: f64,
    pub avg_combo_points: f64,

    /// Mean tick at which each tier was first entered, over runs that got there.
    pub avg_ticks_to_tier: Vec<f64>,

    /// Highest tier reached → number of runs.
    pub tier_distribution: BTreeMap<u32, u32>,

    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

fn mean(runs: &[RunStats], f: impl Fn(&RunStats) -> f64) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(f).sum::<f64>() / runs.len() as f64
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>, target_tier: u32, max_ticks: u64) -> Self {
        let num_runs = runs.len() as u32;
        let runs_completed = runs.iter().filter(|r| r.reached_target).count() as u32;
        let runs_timed_out = runs.iter().filter(|r| r.total_ticks >= max_ticks).count() as u32;
        let runs_won = runs.iter().filter(|r| r.has_won).count() as u32;

        let mut tier_distribution = BTreeMap::new();
        for run in &runs {
            *tier_distribution.entry(run.highest_tier).or_insert(0) += 1;
        }

        let deepest = runs.iter().map(|r| r.tier_reached_at.len()).max().unwrap_or(0);
        let avg_ticks_to_tier = (0..deepest)
            .map(|tier| {
                let reached: Vec<u64> = runs
                    .iter()
                    .filter_map(|r| r.tier_reached_at.get(tier).copied())
                    .collect();
                reached.iter().sum::<u64>() as f64 / reached.len().max(1) as f64
            })
            .collect();

        Self {
            num_runs,
            target_tier,
            runs_completed,
            runs_timed_out,
            runs_won,
            avg_final_tier: mean(&runs, |r| r.final_tier as f64),
            avg_highest_tier: mean(&runs, |r| r.highest_tier as f64),
            avg_squares_filled: mean(&runs, |r| r.squares_filled as f64),
            avg_rows_completed: mean(&runs, |r| r.rows_completed as f64),
            avg_collects: mean(&runs, |r| r.collects as f64),
            avg_blue_collected: mean(&runs, |r| r.blue_collected),
            avg_pink_earned: mean(&runs, |r| r.pink_earned),
            avg_upgrades_bought: mean(&runs, |r| r.upgrades_bought as f64),
            avg_skills_bought: mean(&runs, |r| r.skills_bought as f64),
            avg_spells_cast: mean(&runs, |r| r.spells_cast as f64),
            avg_combo_points: mean(&runs, |r| r.combo_points_earned),
            avg_ticks_to_tier,
            tier_distribution,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} reached tier {}, {} timed out, {} won\n\n",
            self.num_runs, self.runs_completed, self.target_tier, self.runs_timed_out, self.runs_won
        ));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Final Tier:      {:.2}\n", self.avg_final_tier));
        report.push_str(&format!("  Avg Highest Tier:    {:.2}\n", self.avg_highest_tier));
        report.push_str(&format!("  Avg Squares Filled:  {:.0}\n", self.avg_squares_filled));
        report.push_str(&format!("  Avg Rows Completed:  {:.0}\n", self.avg_rows_completed));
        for (tier, ticks) in self.avg_ticks_to_tier.iter().enumerate().skip(1) {
            report.push_str(&format!(
                "  Tier {} reached at:   {:.0} ticks ({:.1} h)\n",
                tier,
                ticks,
                ticks / 36_000.0
            ));
        }
        report.push('\n');

        report.push_str("── ECONOMY ──────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Collects:        {:.1}\n", self.avg_collects));
        report.push_str(&format!("  Avg Blue Collected:  {:.0}\n", self.avg_blue_collected));
        report.push_str(&format!("  Avg Pink Earned:     {:.1}\n", self.avg_pink_earned));
        report.push_str(&format!("  Avg Combo Points:    {:.0}\n", self.avg_combo_points));
        report.push_str(&format!("  Avg Upgrades Bought: {:.1}\n", self.avg_upgrades_bought));
        report.push_str(&format!("  Avg Skills Bought:   {:.1}\n", self.avg_skills_bought));
        report.push_str(&format!("  Avg Spells Cast:     {:.1}\n\n", self.avg_spells_cast));

        report.push_str("── HIGHEST TIER ─────────────────────────────────────────────────\n");
        for (tier, count) in &self.tier_distribution {
            let pct = (*count as f64 / self.num_runs.max(1) as f64) * 100.0;
            let bar: String = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  Tier {:2}: {:>5.1}% {}\n", tier, pct, bar));
        }
        report.push('\n');

        report.push_str("── BALANCE ASSESSMENT ───────────────────────────────────────────\n");
        let completion_rate = (self.runs_completed as f64 / self.num_runs.max(1) as f64) * 100.0;
        report.push_str(&format!("  Completion Rate: {:.1}%\n", completion_rate));
        if self.avg_collects < 1.0 {
            report.push_str("  ⚠️  Runs rarely collect - first squares too slow?\n");
        }
        if self.avg_upgrades_bought < 1.0 && self.avg_collects >= 1.0 {
            report.push_str("  ⚠️  Collecting but never buying - upgrade costs too high?\n");
        }
        if self.runs_timed_out == self.num_runs && self.num_runs > 0 {
            report.push_str("  ⚠️  Every run timed out before the target tier\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
