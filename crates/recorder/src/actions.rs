//! The recording pipeline: accumulator + run recorder behind `UserActions`.

use simulation::{RunArtifacts, UserActions};
use types::{ChannelKey, EventRecord, EventSummary, HitRecord, RunPartition};

use crate::accumulator::EventAccumulator;
use crate::error::RecorderError;
use crate::recorder::{RecorderConfig, RunRecorder};

/// User actions that accumulate per-event deposits and serialize the run
/// to a per-worker Parquet file pair.
///
/// One instance per worker; the run recorder is created at `on_run_start`
/// once the worker's partition is known.
pub struct RecordingActions {
    config: RecorderConfig,
    accumulator: EventAccumulator,
    recorder: Option<RunRecorder>,
}

impl RecordingActions {
    /// Create recording actions writing under the config's output prefix.
    pub fn new(config: RecorderConfig) -> Self {
        Self {
            config,
            accumulator: EventAccumulator::new(),
            recorder: None,
        }
    }
}

impl UserActions for RecordingActions {
    type Error = RecorderError;

    fn on_run_start(&mut self, partition: &RunPartition) -> Result<(), Self::Error> {
        self.recorder = Some(RunRecorder::begin(self.config.clone(), partition));
        Ok(())
    }

    fn on_event_start(&mut self) {
        self.accumulator.begin_event();
    }

    fn on_deposit(&mut self, key: &ChannelKey, e_dep: f64) {
        self.accumulator.add(key, e_dep);
    }

    fn on_event_end(&mut self, summary: EventSummary) {
        let Some(recorder) = self.recorder.as_mut() else {
            return;
        };
        let worker_id = recorder.worker_id();
        let event_id = recorder.current_event_id();

        recorder.append_event(&EventRecord::from_summary(worker_id, event_id, &summary));
        for (key, e_dep) in self.accumulator.drain() {
            recorder.append_hit(&HitRecord {
                worker_id,
                event_id,
                det_name: key.det,
                copy_id: key.copy,
                e_dep,
            });
        }
        recorder.next_event();
    }

    fn on_run_end(&mut self) -> Result<RunArtifacts, Self::Error> {
        let Some(mut recorder) = self.recorder.take() else {
            return Ok(RunArtifacts::default());
        };
        let events = recorder.events_recorded();

        match recorder.finish()? {
            Some(tables) => {
                eprintln!(
                    "[Recorder] {}: {} hit rows, {} event rows",
                    recorder.worker_id(),
                    tables.hit_rows,
                    tables.event_rows
                );
                Ok(RunArtifacts {
                    events,
                    hit_rows: tables.hit_rows,
                    event_rows: tables.event_rows,
                    files: vec![
                        tables.hit_path.display().to_string(),
                        tables.event_path.display().to_string(),
                    ],
                })
            }
            None => Ok(RunArtifacts {
                events,
                ..RunArtifacts::default()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = PathBuf::from(format!("target/test-actions-{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn started(dir: &PathBuf) -> RecordingActions {
        let mut actions = RecordingActions::new(RecorderConfig::new(dir));
        let partition = RunPartition::new(1000, 4, 0).unwrap();
        actions.on_run_start(&partition).unwrap();
        actions
    }

    #[test]
    fn test_deposits_merge_into_one_hit_row() {
        let dir = scratch_dir("merge");
        let mut actions = started(&dir);

        actions.on_event_start();
        actions.on_deposit(&ChannelKey::new("Si", 3), 1.5);
        actions.on_deposit(&ChannelKey::new("Si", 3), 2.5);
        actions.on_event_end(EventSummary::new(30.0, 0.1, 0.2));

        let artifacts = actions.on_run_end().unwrap();
        assert_eq!(artifacts.events, 1);
        assert_eq!(artifacts.hit_rows, 1);
        assert_eq!(artifacts.event_rows, 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_zero_deposit_channel_yields_no_hit_row() {
        let dir = scratch_dir("zero-dep");
        let mut actions = started(&dir);

        actions.on_event_start();
        actions.on_deposit(&ChannelKey::new("CsI", 1), 0.0);
        actions.on_event_end(EventSummary::default());

        let artifacts = actions.on_run_end().unwrap();
        assert_eq!(artifacts.hit_rows, 0);
        // The event record is emitted regardless
        assert_eq!(artifacts.event_rows, 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_empty_event_yields_event_row_only() {
        let dir = scratch_dir("empty-event");
        let mut actions = started(&dir);

        actions.on_event_start();
        actions.on_event_end(EventSummary::default());

        let artifacts = actions.on_run_end().unwrap();
        assert_eq!(artifacts.hit_rows, 0);
        assert_eq!(artifacts.event_rows, 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_zero_event_run_produces_no_files() {
        let dir = scratch_dir("no-events");
        let mut actions = started(&dir);

        let artifacts = actions.on_run_end().unwrap();
        assert_eq!(artifacts.events, 0);
        assert!(artifacts.files.is_empty());
        assert!(!dir.exists());
    }

    #[test]
    fn test_events_do_not_leak_into_each_other() {
        let dir = scratch_dir("no-leak");
        let mut actions = started(&dir);

        actions.on_event_start();
        actions.on_deposit(&ChannelKey::new("Si", 0), 5.0);
        actions.on_event_end(EventSummary::default());

        // Second event touches a different channel only
        actions.on_event_start();
        actions.on_deposit(&ChannelKey::new("Si", 1), 1.0);
        actions.on_event_end(EventSummary::default());

        let artifacts = actions.on_run_end().unwrap();
        // One row per event, not three
        assert_eq!(artifacts.hit_rows, 2);
        assert_eq!(artifacts.event_rows, 2);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
