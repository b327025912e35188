//! Human-readable merge summary.

use std::fmt;
use std::path::PathBuf;

use crate::config::MergeConfig;
use crate::merge::MergeStats;

/// Summary of a merge run: the counters plus the files that were written.
#[derive(Debug, Clone)]
pub struct MergeSummary {
    pub stats: MergeStats,
    pub updated_catalog: PathBuf,
    /// Set only when the matched-only catalog was written.
    pub common_events_catalog: Option<PathBuf>,
}

impl MergeSummary {
    /// Build the summary for a run made with `config`.
    pub fn new(stats: MergeStats, config: &MergeConfig) -> Self {
        Self {
            stats,
            updated_catalog: config.updated_catalog_file_name.clone(),
            common_events_catalog: config
                .output_common_events_catalog
                .then(|| config.common_events_catalog_file_name.clone()),
        }
    }
}

impl fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.stats;
        writeln!(f, "+++ Number of common events: {}", s.common_events)?;
        writeln!(f, "+++ Number of new P phases: {}", s.new_p_phases)?;
        writeln!(f, "+++ Number of new S phases: {}", s.new_s_phases)?;
        writeln!(f, "+++ Number of new amplitudes: {}", s.new_amplitudes)?;
        writeln!(f, "+++ Number of regarded phases: {}", s.regarded_phases)?;
        if s.pruned_picks > 0 {
            writeln!(f, "+++ Number of phases replaced by higher weight: {}", s.pruned_picks)?;
        }
        writeln!(f, "+++ Updated catalog: {}", self.updated_catalog.display())?;
        if let Some(path) = &self.common_events_catalog {
            writeln!(f, "+++ Common events catalog: {}", path.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lines() {
        let stats = MergeStats {
            common_events: 2,
            new_p_phases: 3,
            new_s_phases: 1,
            regarded_phases: 4,
            ..Default::default()
        };
        let config = MergeConfig::new("a", "b", 1.0, 1.0);
        let text = MergeSummary::new(stats, &config).to_string();

        assert!(text.contains("+++ Number of common events: 2\n"));
        assert!(text.contains("+++ Number of new P phases: 3\n"));
        assert!(text.contains("+++ Number of regarded phases: 4\n"));
        assert!(text.contains("updatedCatalog.jsonl"));
        assert!(!text.contains("Common events catalog"));
        assert!(!text.contains("higher weight"));
    }

    #[test]
    fn test_summary_names_common_catalog_when_written() {
        let config = MergeConfig::new("a", "b", 1.0, 1.0).with_common_events_catalog();
        let text = MergeSummary::new(MergeStats::default(), &config).to_string();
        assert!(text.contains("+++ Common events catalog: commonEventsCatalog.jsonl"));
    }
}
