//! Last-chart session: the single rendered artifact reference kept between runs.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use tickerplot_core::domain::IntervalSelector;

use crate::render::ChartKind;
use crate::request::ChartOutcome;

/// Reference to the most recently rendered chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastChart {
    pub artifact: PathBuf,
    pub symbol: String,
    pub interval: IntervalSelector,
    pub chart_kind: ChartKind,
    pub bar_count: usize,
    pub rendered_at: NaiveDateTime,
}

impl LastChart {
    pub fn from_outcome(outcome: &ChartOutcome, rendered_at: NaiveDateTime) -> Self {
        Self {
            artifact: outcome.artifact.clone(),
            symbol: outcome.symbol.clone(),
            interval: outcome.interval,
            chart_kind: outcome.chart_kind,
            bar_count: outcome.bar_count,
            rendered_at,
        }
    }
}

/// Load the session. Returns `None` if the file is missing or corrupt.
pub fn load(path: &Path) -> Option<LastChart> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(last) => Some(last),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt session file");
            None
        }
    }
}

/// Save the session. Creates parent directories if needed.
///
/// The JSON is written to a `.tmp` sibling and renamed into place.
pub fn save(path: &Path, last: &LastChart) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create session dir {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(last)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    std::fs::rename(&tmp, path).with_context(|| format!("rename into {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> LastChart {
        LastChart {
            artifact: PathBuf::from("static/IBM_2_line.svg"),
            symbol: "IBM".into(),
            interval: IntervalSelector::Daily,
            chart_kind: ChartKind::Line,
            bar_count: 3,
            rendered_at: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/session.json");
        save(&path, &sample()).unwrap();
        assert_eq!(load(&path), Some(sample()));
    }

    #[test]
    fn save_replaces_previous_session_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        save(&path, &sample()).unwrap();

        let mut newer = sample();
        newer.symbol = "KO".into();
        newer.chart_kind = ChartKind::Bar;
        save(&path, &newer).unwrap();

        assert_eq!(load(&path), Some(newer));
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, ["session.json"]);
    }

    #[test]
    fn missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load(&dir.path().join("session.json")), None);
    }

    #[test]
    fn corrupt_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(load(&path), None);
    }
}
