//! Per-worker run buffers and end-of-run Parquet serialization.
//!
//! A `RunRecorder` owns one worker's append-only column buffers for the
//! whole run and turns them into two Parquet files exactly once, at
//! `finish()`. There is no incremental flush: a failure at the end loses
//! the worker's whole run, which is the accepted tradeoff for a one-shot
//! batch job.

use arrow::array::{ArrayRef, Float64Builder, Int32Builder, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use types::{EventId, EventRecord, HitRecord, RunPartition, WorkerId};

use crate::error::RecorderError;

/// Recorder configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderConfig {
    /// Root directory the `eDep/` and `evtInfo/` trees are written under.
    pub output_prefix: PathBuf,
}

impl RecorderConfig {
    /// Create a config with the given output root.
    pub fn new(output_prefix: impl Into<PathBuf>) -> Self {
        Self {
            output_prefix: output_prefix.into(),
        }
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self::new("data")
    }
}

/// Schema of the per-hit table. Column order and naming are part of the
/// durable contract with downstream analysis.
pub fn hit_schema() -> Schema {
    Schema::new(vec![
        Field::new("workerId", DataType::Int32, false),
        Field::new("eventId", DataType::Int32, false),
        Field::new("detName", DataType::Utf8, false),
        Field::new("copyId", DataType::Int32, false),
        Field::new("eDep", DataType::Float64, false),
    ])
}

/// Schema of the per-event table.
pub fn event_schema() -> Schema {
    Schema::new(vec![
        Field::new("workerId", DataType::Int32, false),
        Field::new("eventId", DataType::Int32, false),
        Field::new("eProton", DataType::Float64, false),
        Field::new("theta", DataType::Float64, false),
        Field::new("phi", DataType::Float64, false),
    ])
}

/// Column builders for the hit table.
struct HitColumns {
    worker: Int32Builder,
    event: Int32Builder,
    det: StringBuilder,
    copy: Int32Builder,
    e_dep: Float64Builder,
}

impl HitColumns {
    fn new() -> Self {
        Self {
            worker: Int32Builder::new(),
            event: Int32Builder::new(),
            det: StringBuilder::new(),
            copy: Int32Builder::new(),
            e_dep: Float64Builder::new(),
        }
    }

    fn append(&mut self, record: &HitRecord) {
        self.worker.append_value(record.worker_id.0);
        self.event.append_value(record.event_id.0);
        self.det.append_value(&record.det_name);
        self.copy.append_value(record.copy_id);
        self.e_dep.append_value(record.e_dep);
    }

    fn finish(&mut self) -> Vec<ArrayRef> {
        vec![
            Arc::new(self.worker.finish()),
            Arc::new(self.event.finish()),
            Arc::new(self.det.finish()),
            Arc::new(self.copy.finish()),
            Arc::new(self.e_dep.finish()),
        ]
    }
}

/// Column builders for the event table.
struct EventColumns {
    worker: Int32Builder,
    event: Int32Builder,
    e_proton: Float64Builder,
    theta: Float64Builder,
    phi: Float64Builder,
}

impl EventColumns {
    fn new() -> Self {
        Self {
            worker: Int32Builder::new(),
            event: Int32Builder::new(),
            e_proton: Float64Builder::new(),
            theta: Float64Builder::new(),
            phi: Float64Builder::new(),
        }
    }

    fn append(&mut self, record: &EventRecord) {
        self.worker.append_value(record.worker_id.0);
        self.event.append_value(record.event_id.0);
        self.e_proton.append_value(record.e_proton);
        self.theta.append_value(record.theta);
        self.phi.append_value(record.phi);
    }

    fn finish(&mut self) -> Vec<ArrayRef> {
        vec![
            Arc::new(self.worker.finish()),
            Arc::new(self.event.finish()),
            Arc::new(self.e_proton.finish()),
            Arc::new(self.theta.finish()),
            Arc::new(self.phi.finish()),
        ]
    }
}

/// What `finish()` wrote for one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSet {
    /// Rows in the hit table.
    pub hit_rows: u64,
    /// Rows in the event table.
    pub event_rows: u64,
    /// Path of the hit table file.
    pub hit_path: PathBuf,
    /// Path of the event table file.
    pub event_path: PathBuf,
}

/// One worker's run-long output buffer.
pub struct RunRecorder {
    config: RecorderConfig,
    worker_id: WorkerId,
    next_event_id: EventId,
    events_recorded: u64,
    hit_rows: u64,
    event_rows: u64,
    columns: Option<(HitColumns, EventColumns)>,
}

impl RunRecorder {
    /// Allocate empty buffers for a run, with event ids starting at the
    /// partition's offset.
    pub fn begin(config: RecorderConfig, partition: &RunPartition) -> Self {
        Self {
            config,
            worker_id: partition.worker_id(),
            next_event_id: partition.start_event_id(),
            events_recorded: 0,
            hit_rows: 0,
            event_rows: 0,
            columns: Some((HitColumns::new(), EventColumns::new())),
        }
    }

    /// This worker's identity.
    pub fn worker_id(&self) -> WorkerId {
        self.worker_id
    }

    /// Id of the event currently being recorded.
    pub fn current_event_id(&self) -> EventId {
        self.next_event_id
    }

    /// Events completed so far.
    pub fn events_recorded(&self) -> u64 {
        self.events_recorded
    }

    /// Append one row to the hit table. All columns advance together.
    pub fn append_hit(&mut self, record: &HitRecord) {
        if let Some((hits, _)) = self.columns.as_mut() {
            hits.append(record);
            self.hit_rows += 1;
        }
    }

    /// Append one row to the event table.
    pub fn append_event(&mut self, record: &EventRecord) {
        if let Some((_, events)) = self.columns.as_mut() {
            events.append(record);
            self.event_rows += 1;
        }
    }

    /// Advance to the next event id after an event is fully recorded.
    pub fn next_event(&mut self) {
        self.next_event_id = self.next_event_id.next();
        self.events_recorded += 1;
    }

    /// Finalize both tables and write this worker's file pair.
    ///
    /// A zero-event run is a no-op: no directories, no files, `Ok(None)`.
    /// The buffers are consumed either way; the recorder is not reusable
    /// without a fresh `begin`.
    pub fn finish(&mut self) -> Result<Option<TableSet>, RecorderError> {
        let Some((mut hits, mut events)) = self.columns.take() else {
            return Ok(None);
        };
        if self.events_recorded == 0 {
            return Ok(None);
        }

        let hit_batch = RecordBatch::try_new(Arc::new(hit_schema()), hits.finish())
            .map_err(|e| RecorderError::Arrow(e.to_string()))?;
        let event_batch = RecordBatch::try_new(Arc::new(event_schema()), events.finish())
            .map_err(|e| RecorderError::Arrow(e.to_string()))?;

        let hit_path = self
            .config
            .output_prefix
            .join("eDep")
            .join(format!("worker{}.parquet", self.worker_id.0));
        let event_path = self
            .config
            .output_prefix
            .join("evtInfo")
            .join(format!("worker_{}.parquet", self.worker_id.0));

        write_table(&hit_path, &hit_batch)?;
        write_table(&event_path, &event_batch)?;

        Ok(Some(TableSet {
            hit_rows: self.hit_rows,
            event_rows: self.event_rows,
            hit_path,
            event_path,
        }))
    }
}

/// Write one finalized table to `path`, creating parent directories.
fn write_table(path: &Path, batch: &RecordBatch) -> Result<(), RecorderError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| RecorderError::Io(e.to_string()))?;
    }
    let file = File::create(path).map_err(|e| RecorderError::Io(e.to_string()))?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .map_err(|e| RecorderError::Parquet(e.to_string()))?;
    writer
        .write(batch)
        .map_err(|e| RecorderError::Parquet(e.to_string()))?;
    writer
        .close()
        .map_err(|e| RecorderError::Parquet(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, Int32Array, StringArray};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use types::EventSummary;

    fn read_rows(path: &Path) -> Vec<RecordBatch> {
        let file = File::open(path).unwrap();
        ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap()
            .map(|b| b.unwrap())
            .collect()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = PathBuf::from(format!("target/test-recorder-{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_event_id_sequence_starts_at_partition_offset() {
        let partition = RunPartition::new(1000, 4, 2).unwrap();
        let mut recorder = RunRecorder::begin(RecorderConfig::default(), &partition);

        assert_eq!(recorder.current_event_id(), EventId(500));
        recorder.next_event();
        recorder.next_event();
        assert_eq!(recorder.current_event_id(), EventId(502));
        assert_eq!(recorder.events_recorded(), 2);
    }

    #[test]
    fn test_zero_event_run_writes_no_files() {
        let dir = scratch_dir("zero-events");
        let partition = RunPartition::new(100, 2, 0).unwrap();
        let mut recorder = RunRecorder::begin(RecorderConfig::new(&dir), &partition);

        assert!(recorder.finish().unwrap().is_none());
        assert!(!dir.exists());
    }

    #[test]
    fn test_finish_is_single_shot() {
        let dir = scratch_dir("single-shot");
        let partition = RunPartition::new(100, 2, 0).unwrap();
        let mut recorder = RunRecorder::begin(RecorderConfig::new(&dir), &partition);

        recorder.append_event(&EventRecord::from_summary(
            recorder.worker_id(),
            recorder.current_event_id(),
            &EventSummary::new(30.0, 0.0, 0.0),
        ));
        recorder.next_event();

        assert!(recorder.finish().unwrap().is_some());
        // Buffers were consumed; a second finish records nothing.
        assert!(recorder.finish().unwrap().is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_round_trip_preserves_rows_order_and_values() {
        let dir = scratch_dir("round-trip");
        let partition = RunPartition::new(1000, 4, 0).unwrap();
        let mut recorder = RunRecorder::begin(RecorderConfig::new(&dir), &partition);
        let worker = recorder.worker_id();

        // Event 0: two hits
        for (copy, e_dep) in [(3, 1.5), (7, 2.5)] {
            recorder.append_hit(&HitRecord {
                worker_id: worker,
                event_id: recorder.current_event_id(),
                det_name: "Si".to_string(),
                copy_id: copy,
                e_dep,
            });
        }
        recorder.append_event(&EventRecord::from_summary(
            worker,
            recorder.current_event_id(),
            &EventSummary::new(29.5, 0.05, 1.0),
        ));
        recorder.next_event();

        // Event 1: one hit
        recorder.append_hit(&HitRecord {
            worker_id: worker,
            event_id: recorder.current_event_id(),
            det_name: "CsI".to_string(),
            copy_id: 1,
            e_dep: 24.25,
        });
        recorder.append_event(&EventRecord::from_summary(
            worker,
            recorder.current_event_id(),
            &EventSummary::new(30.5, 0.12, 4.0),
        ));
        recorder.next_event();

        let tables = recorder.finish().unwrap().unwrap();
        assert_eq!(tables.hit_rows, 3);
        assert_eq!(tables.event_rows, 2);
        assert_eq!(tables.hit_path, dir.join("eDep").join("worker0.parquet"));
        assert_eq!(
            tables.event_path,
            dir.join("evtInfo").join("worker_0.parquet")
        );

        // Hit table: column order, names, append order, exact values
        let batches = read_rows(&tables.hit_path);
        assert_eq!(batches.len(), 1);
        let batch = &batches[0];
        assert_eq!(
            batch.schema().fields().iter().map(|f| f.name().as_str()).collect::<Vec<_>>(),
            vec!["workerId", "eventId", "detName", "copyId", "eDep"]
        );
        assert_eq!(batch.num_rows(), 3);

        let event_ids = batch
            .column(1)
            .as_any()
            .downcast_ref::<Int32Array>()
            .unwrap();
        let ids: Vec<i32> = (0..3).map(|i| event_ids.value(i)).collect();
        assert_eq!(ids, vec![0, 0, 1]);

        let det_names = batch
            .column(2)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(det_names.value(0), "Si");
        assert_eq!(det_names.value(2), "CsI");

        let e_deps = batch
            .column(4)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        // No precision loss for the energy column
        let deps: Vec<f64> = (0..3).map(|i| e_deps.value(i)).collect();
        assert_eq!(deps, vec![1.5, 2.5, 24.25]);

        // Event table: one row per event, exact kinematics
        let batches = read_rows(&tables.event_path);
        assert_eq!(batches.len(), 1);
        let batch = &batches[0];
        assert_eq!(
            batch.schema().fields().iter().map(|f| f.name().as_str()).collect::<Vec<_>>(),
            vec!["workerId", "eventId", "eProton", "theta", "phi"]
        );
        assert_eq!(batch.num_rows(), 2);

        let e_protons = batch
            .column(2)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        let protons: Vec<f64> = (0..2).map(|i| e_protons.value(i)).collect();
        assert_eq!(protons, vec![29.5, 30.5]);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
