// End-to-end runs over the sample race in /sample
use race_log_core::{
    EventKind, EventLogParser, RaceConfig, RaceError, RaceProcessor, RaceSettings, Report, Status,
};
use std::io::Write;
use std::path::PathBuf;

fn sample_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("sample")
}

fn sample_config() -> RaceConfig {
    let content = std::fs::read_to_string(sample_dir().join("config.json")).unwrap();
    let settings: RaceSettings = serde_json::from_str(&content).unwrap();
    RaceConfig::try_from(settings).unwrap()
}

fn run(path: &std::path::Path) -> (RaceProcessor, Vec<String>) {
    let events = EventLogParser::parse(path).unwrap();
    let mut audit: Vec<String> = Vec::new();
    let mut processor = RaceProcessor::new(sample_config());
    processor.process_all(&events, &mut audit).unwrap();
    (processor, audit)
}

#[test]
fn sample_race_report() {
    let (processor, audit) = run(&sample_dir().join("events"));

    let report = Report::generate(processor.registry(), processor.config());
    assert_eq!(
        report.to_string(),
        "[NotStarted] 3 [{,}, {,}] {00:00:00.000, 0.000} 0/0\n\
         [NotFinished] 2 [{,}, {,}] {00:05:00.000, 0.833} 0/5\n\
         [00:58:02.867] 1 [{00:29:02.867, 2.095}, {00:29:00.000, 2.098}] {00:01:52.476, 0.445} 9/10\n"
    );

    // The unknown kind is silent; every other parsed event yields one line
    assert_eq!(audit.len(), 34);
    assert_eq!(audit[0], "[09:05:59.867] The competitor(1) registered");
    assert!(audit.contains(&"[09:32:45.000] The competitor(3) is disqualified".to_string()));
    assert!(audit.contains(&"[10:00:00.000] The competitor(2) can`t continue: Lost in the forest".to_string()));
    assert_eq!(audit.last().unwrap(), "[10:28:03.872] The competitor(1) has finished");
}

#[test]
fn sample_race_state() {
    let (processor, _) = run(&sample_dir().join("events"));
    let registry = processor.registry();
    assert_eq!(registry.len(), 3);

    let winner = registry.get(1).unwrap();
    assert_eq!(winner.status, Status::Finished);
    assert_eq!(winner.laps_completed, 2);
    assert_eq!(winner.penalty_laps, 1);
    assert_eq!(winner.firing_sessions.len(), 2);
    assert_eq!(winner.firing_sessions[1].lap, 2);
    assert!(winner.firing_sessions.iter().all(|s| s.hits() <= 5));

    let retired = registry.get(2).unwrap();
    assert_eq!(retired.penalty_laps, 5);
    assert_eq!(retired.status.to_string(), "DNF: Lost in the forest");

    let outgoing: Vec<_> = processor
        .outgoing_events()
        .iter()
        .map(|e| (e.kind, e.competitor_id))
        .collect();
    assert_eq!(
        outgoing,
        vec![(EventKind::Disqualified, 3), (EventKind::Finished, 1)]
    );
}

#[test]
fn rerun_is_byte_identical() {
    let first = {
        let (processor, _) = run(&sample_dir().join("events"));
        Report::generate(processor.registry(), processor.config()).to_string()
    };
    let second = {
        let (processor, _) = run(&sample_dir().join("events"));
        Report::generate(processor.registry(), processor.config()).to_string()
    };
    assert_eq!(first, second);
}

#[test]
fn short_race_from_temp_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[10:00:00.000] 1 1").unwrap();
    writeln!(file, "[10:00:00.500] 2 1 10:00:05.000").unwrap();
    writeln!(file, "[10:00:05.000] 4 1").unwrap();
    writeln!(file, "[10:02:05.000] 10 1").unwrap();
    writeln!(file, "[10:04:05.000] 10 1").unwrap();
    file.flush().unwrap();

    let config = RaceConfig::try_from(RaceSettings {
        laps: 2,
        lap_len: 3500,
        penalty_len: 150,
        firing_lines: 1,
        start: "10:00:00.000".to_string(),
        start_delta: "00:01:00".to_string(),
    })
    .unwrap();

    let events = EventLogParser::parse(file.path()).unwrap();
    let mut processor = RaceProcessor::new(config);
    processor.process_all(&events, &mut Vec::<String>::new()).unwrap();

    let report = Report::generate(processor.registry(), processor.config());
    assert_eq!(report.lines.len(), 1);
    assert_eq!(report.lines[0].status.to_string(), "[00:04:00.000]");
}

#[test]
fn duplicate_hit_aborts_the_run() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[09:30:00.000] 2 1 09:30:00.000").unwrap();
    writeln!(file, "[09:30:01.000] 4 1").unwrap();
    writeln!(file, "[09:40:00.000] 5 1 1").unwrap();
    writeln!(file, "[09:40:01.000] 6 1 2").unwrap();
    writeln!(file, "[09:40:02.000] 6 1 2").unwrap();
    file.flush().unwrap();

    let events = EventLogParser::parse(file.path()).unwrap();
    let mut processor = RaceProcessor::new(sample_config());
    let err = processor.process_all(&events, &mut Vec::<String>::new()).unwrap_err();
    assert!(matches!(err, RaceError::DuplicateHit { competitor: 1, target: 2 }));
    assert!(err.to_string().contains("competitor(1)"));
}

#[test]
fn non_numeric_fields_still_create_competitors() {
    let events = EventLogParser::parse_str("[09:00:00.000] abc 7\n[09:00:01.000] 1 x\n");
    let mut audit: Vec<String> = Vec::new();
    let mut processor = RaceProcessor::new(sample_config());
    processor.process_all(&events, &mut audit).unwrap();

    let seven = processor.registry().get(7).unwrap();
    assert_eq!(seven.status, Status::Undefined);
    assert!(seven.last_event.is_some());
    assert_eq!(processor.registry().get(0).unwrap().status, Status::Registered);

    let report = Report::generate(processor.registry(), processor.config());
    assert_eq!(report.lines.len(), 2);
    assert_eq!(audit, vec!["[09:00:01.000] The competitor(0) registered".to_string()]);
}
