//! Asset loading bookkeeping
//!
//! Each asset loads independently. A failure is logged and recorded, and the
//! caller gets `None` so the game can fall back (solid fills, silence).

use std::fmt;

/// Outcome of a batch of loads
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    /// (asset name, error message)
    pub failed: Vec<(String, String)>,
}

impl LoadReport {
    /// Record one load result, turning an error into `None`.
    pub fn record<T>(&mut self, name: &str, result: anyhow::Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.loaded.push(name.to_string());
                Some(value)
            }
            Err(err) => {
                log::warn!("Failed to load {name}: {err:#}");
                self.failed.push((name.to_string(), format!("{err:#}")));
                None
            }
        }
    }

    /// Record a batch that settled together, pairing names with results in
    /// order. A name with no result counts as a failure.
    pub fn record_settled<'a, T>(
        &mut self,
        names: impl IntoIterator<Item = &'a str>,
        results: impl IntoIterator<Item = anyhow::Result<T>>,
    ) -> Vec<Option<T>> {
        let mut results = results.into_iter();
        names
            .into_iter()
            .map(|name| {
                let result = results
                    .next()
                    .unwrap_or_else(|| Err(anyhow::anyhow!("load never settled")));
                self.record(name, result)
            })
            .collect()
    }

    pub fn merge(&mut self, other: LoadReport) {
        self.loaded.extend(other.loaded);
        self.failed.extend(other.failed);
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// True when nothing at all loaded but something was attempted
    pub fn is_total_failure(&self) -> bool {
        self.loaded.is_empty() && !self.failed.is_empty()
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} loaded, {} failed", self.loaded.len(), self.failed.len())?;
        for (name, _) in &self.failed {
            write!(f, " [{name}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_failures_degrade_to_none() {
        let mut report = LoadReport::default();
        assert_eq!(report.record("a", Ok(1)), Some(1));
        assert_eq!(report.record::<i32>("b", Err(anyhow!("404"))), None);
        assert_eq!(report.record("c", Ok(3)), Some(3));

        assert_eq!(report.loaded, vec!["a", "c"]);
        assert_eq!(report.failed.len(), 1);
        assert!(!report.is_complete());
        assert!(!report.is_total_failure());
        assert_eq!(report.to_string(), "2 loaded, 1 failed [b]");
    }

    #[test]
    fn test_settled_batch_keeps_order() {
        let mut report = LoadReport::default();
        let got = report.record_settled(
            ["flap", "hit", "score"],
            vec![Ok(1), Err(anyhow!("decode failed"))],
        );
        assert_eq!(got, vec![Some(1), None, None]);
        assert_eq!(report.loaded, vec!["flap"]);
        assert_eq!(
            report.failed,
            vec![
                ("hit".to_string(), "decode failed".to_string()),
                ("score".to_string(), "load never settled".to_string()),
            ]
        );
    }

    #[test]
    fn test_total_failure() {
        let mut report = LoadReport::default();
        assert!(!report.is_total_failure());
        report.record::<()>("x", Err(anyhow!("offline")));
        let mut other = LoadReport::default();
        other.record::<()>("y", Err(anyhow!("offline")));
        report.merge(other);
        assert!(report.is_total_failure());
        assert_eq!(report.failed.len(), 2);
    }
}
