//! Results report
//!
//! Builds one `ReportLine` per competitor from the final registry, ordered by end
//! time. The text rendering is
//! `[status] id [{lap time, lap speed}, ...] {penalty time, penalty speed} hits/shots`.

use crate::competitor::Competitor;
use crate::config::RaceConfig;
use crate::registry::Registry;
use crate::types::{format_duration, CompetitorId};
use chrono::Duration;
use serde::{Serialize, Serializer};
use std::fmt;

/// Explanatory header written above the text report
pub const REPORT_HEADER: &str = "[Total time/status] ID [{lap #1 time, lap avg. speed},...] \
                                 {total penalty time, penalty avg. speed} hit/shot";

/// Final classification of a competitor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "total_time")]
pub enum ResultStatus {
    /// All laps completed; total time from actual start to finish
    Finished(#[serde(serialize_with = "serialize_duration")] Duration),
    /// Disqualified, i.e. did not start within the window
    NotStarted,
    NotFinished,
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultStatus::Finished(total) => write!(f, "[{}]", format_duration(*total)),
            ResultStatus::NotStarted => write!(f, "[NotStarted]"),
            ResultStatus::NotFinished => write!(f, "[NotFinished]"),
        }
    }
}

/// Time and average speed (m/s) over a stretch of track
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pace {
    #[serde(serialize_with = "serialize_duration")]
    pub time: Duration,
    pub speed: f64,
}

impl Pace {
    /// Pace for `meters` covered in `time`; speed is zero when no time elapsed
    pub fn new(meters: u64, time: Duration) -> Self {
        let ms = time.num_milliseconds();
        let speed = if ms > 0 {
            meters as f64 * 1000.0 / ms as f64
        } else {
            0.0
        };
        Self { time, speed }
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {:.3}}}", format_duration(self.time), self.speed)
    }
}

/// One competitor's line in the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLine {
    pub status: ResultStatus,
    pub competitor_id: CompetitorId,
    /// One entry per configured lap; `None` for laps not completed
    pub laps: Vec<Option<Pace>>,
    pub penalty: Pace,
    pub hits: u32,
    pub shots: u32,
}

impl ReportLine {
    pub fn for_competitor(comp: &Competitor, config: &RaceConfig) -> Self {
        let status = if comp.disqualified {
            ResultStatus::NotStarted
        } else {
            match comp.total_time() {
                Some(total) if comp.laps_completed >= config.laps => ResultStatus::Finished(total),
                _ => ResultStatus::NotFinished,
            }
        };

        let laps = (0..config.laps as usize)
            .map(|lap| {
                comp.lap_times
                    .get(lap)
                    .map(|time| Pace::new(u64::from(config.lap_len), *time))
            })
            .collect();

        let penalty_meters = u64::from(config.penalty_len) * u64::from(comp.penalty_laps);

        Self {
            status,
            competitor_id: comp.id,
            laps,
            penalty: Pace::new(penalty_meters, comp.penalty_time),
            hits: comp.hits,
            shots: comp.shots(),
        }
    }

    /// Share of shots that hit, `None` if the competitor never fired
    pub fn hit_ratio(&self) -> Option<f64> {
        (self.shots > 0).then(|| f64::from(self.hits) / f64::from(self.shots))
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [", self.status, self.competitor_id)?;
        for (index, lap) in self.laps.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            match lap {
                Some(pace) => write!(f, "{}", pace)?,
                None => write!(f, "{{,}}")?,
            }
        }
        write!(f, "] {} {}/{}", self.penalty, self.hits, self.shots)
    }
}

/// The complete results report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub lines: Vec<ReportLine>,
}

impl Report {
    /// Build the report from the final registry state
    pub fn generate(registry: &Registry, config: &RaceConfig) -> Self {
        let lines = registry
            .by_end_time()
            .into_iter()
            .map(|comp| ReportLine::for_competitor(comp, config))
            .collect();
        Self { lines }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

fn serialize_duration<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_duration(*duration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competitor::{FiringSession, Status};
    use chrono::NaiveTime;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn config() -> RaceConfig {
        RaceConfig::new().with_laps(2).with_lap_len(3500).with_penalty_len(150)
    }

    #[test]
    fn test_finished_line() {
        let mut registry = Registry::new();
        let comp = registry.get_or_create(1);
        comp.actual_start = Some(at(10, 0, 5));
        comp.end_time = Some(at(10, 4, 5));
        comp.laps_completed = 2;
        comp.status = Status::Finished;
        comp.lap_times = vec![Duration::minutes(2), Duration::minutes(2)];

        let report = Report::generate(&registry, &config());
        assert_eq!(
            report.to_string(),
            "[00:04:00.000] 1 [{00:02:00.000, 29.167}, {00:02:00.000, 29.167}] {00:00:00.000, 0.000} 0/0\n"
        );
    }

    #[test]
    fn test_unfinished_and_disqualified_lines() {
        let mut registry = Registry::new();

        let dnf = registry.get_or_create(2);
        dnf.actual_start = Some(at(10, 0, 0));
        dnf.end_time = Some(at(10, 10, 0));
        dnf.laps_completed = 1;
        dnf.lap_times = vec![Duration::seconds(350)];
        dnf.penalty_laps = 3;
        dnf.penalty_time = Duration::seconds(90);
        dnf.hits = 2;
        dnf.firing_sessions.push(FiringSession::new(1, 1, at(10, 3, 0)));

        let dsq = registry.get_or_create(3);
        dsq.disqualified = true;
        dsq.end_time = Some(at(10, 1, 10));

        let report = Report::generate(&registry, &config());
        let rendered: Vec<String> = report.lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "[NotStarted] 3 [{,}, {,}] {00:00:00.000, 0.000} 0/0".to_string(),
                "[NotFinished] 2 [{00:05:50.000, 10.000}, {,}] {00:01:30.000, 5.000} 2/5".to_string(),
            ]
        );
        assert_eq!(report.lines[1].hit_ratio(), Some(0.4));
        assert_eq!(report.lines[0].hit_ratio(), None);
    }

    #[test]
    fn test_json_shape() {
        let line = ReportLine {
            status: ResultStatus::Finished(Duration::seconds(61)),
            competitor_id: 4,
            laps: vec![None],
            penalty: Pace::new(0, Duration::zero()),
            hits: 0,
            shots: 0,
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["status"]["status"], "Finished");
        assert_eq!(json["status"]["total_time"], "00:01:01.000");
        assert_eq!(json["penalty"]["time"], "00:00:00.000");
        assert!(json["laps"][0].is_null());
    }
}
