//! CSV loaders for the fulfillment and interruption event tables.
//!
//! Loading is all-or-nothing: the first missing column or unparseable
//! timestamp fails the whole table, so no partial dataset ever reaches the
//! correlator. Cell values are kept exactly as written; an empty id is an
//! ordinary join key.

pub mod timestamp;

pub use timestamp::TimestampParser;

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use sa_common::{category_from_cell, EventTable, FulfillmentEvent, InstanceId, InterruptionEvent};
use sa_config::{FulfillmentColumns, InterruptionColumns};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::logging::event_names;

/// Errors raised while reading an event table.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: EventTable, column: String },

    #[error("{table} row {row}: cannot parse timestamp {value:?}")]
    InvalidTimestamp {
        table: EventTable,
        row: usize,
        value: String,
    },

    #[error("malformed {table} table: {source}")]
    Csv {
        table: EventTable,
        #[source]
        source: csv::Error,
    },

    #[error("cannot open {table} table {path}: {source}")]
    Io {
        table: EventTable,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<LoadError> for sa_common::Error {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::MissingColumn { table, column } => {
                sa_common::Error::MissingColumn { table, column }
            }
            LoadError::InvalidTimestamp { table, row, value } => {
                sa_common::Error::InvalidTimestamp { table, row, value }
            }
            LoadError::Csv { table, source } => sa_common::Error::MalformedTable {
                table,
                message: source.to_string(),
            },
            LoadError::Io { source, .. } => sa_common::Error::Io(source),
        }
    }
}

/// Resolved header positions for one table.
struct HeaderIndex {
    table: EventTable,
    headers: StringRecord,
    required: Vec<usize>,
}

impl HeaderIndex {
    /// Locate every required header. The first occurrence of a duplicated
    /// header wins.
    fn resolve(
        table: EventTable,
        headers: StringRecord,
        required: &[(&'static str, &str)],
    ) -> Result<Self, LoadError> {
        let mut positions = Vec::with_capacity(required.len());
        for (_, header) in required {
            let pos = headers
                .iter()
                .position(|h| h == *header)
                .ok_or_else(|| LoadError::MissingColumn {
                    table,
                    column: header.to_string(),
                })?;
            positions.push(pos);
        }
        Ok(HeaderIndex {
            table,
            headers,
            required: positions,
        })
    }

    fn cell<'r>(&self, record: &'r StringRecord, slot: usize) -> &'r str {
        record.get(self.required[slot]).unwrap_or("")
    }

    /// Every column that is not a required one, keyed by header.
    fn passthrough(&self, record: &StringRecord) -> BTreeMap<String, String> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| !self.required.contains(idx))
            .map(|(idx, name)| (name.to_string(), record.get(idx).unwrap_or("").to_string()))
            .collect()
    }

    fn instance_id(&self, record: &StringRecord) -> InstanceId {
        InstanceId::new(self.cell(record, 0))
    }

    fn time(
        &self,
        record: &StringRecord,
        row: usize,
        parser: &TimestampParser,
    ) -> Result<DateTime<Utc>, LoadError> {
        let raw = self.cell(record, 1);
        parser.parse(raw).ok_or_else(|| LoadError::InvalidTimestamp {
            table: self.table,
            row,
            value: raw.to_string(),
        })
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Headers)
        .from_reader(reader)
}

/// Read the fulfillment table from CSV.
pub fn load_fulfillments<R: Read>(
    reader: R,
    columns: &FulfillmentColumns,
    parser: &TimestampParser,
) -> Result<Vec<FulfillmentEvent>, LoadError> {
    let table = EventTable::Fulfillment;
    let mut rdr = csv_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|source| LoadError::Csv { table, source })?
        .clone();
    let index = HeaderIndex::resolve(table, headers, &columns.pairs())?;

    let mut events = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let row = idx + 1;
        let record = record.map_err(|source| LoadError::Csv { table, source })?;
        events.push(FulfillmentEvent {
            instance_id: index.instance_id(&record),
            time: index.time(&record, row, parser)?,
            instance_type: category_from_cell(index.cell(&record, 2)),
            availability_zone: category_from_cell(index.cell(&record, 3)),
            extra: index.passthrough(&record),
        });
    }

    debug!(
        target: event_names::LOAD_TABLE,
        table = %table,
        rows = events.len(),
        "Loaded fulfillment events"
    );
    Ok(events)
}

/// Read the interruption table from CSV.
pub fn load_interruptions<R: Read>(
    reader: R,
    columns: &InterruptionColumns,
    parser: &TimestampParser,
) -> Result<Vec<InterruptionEvent>, LoadError> {
    let table = EventTable::Interruption;
    let mut rdr = csv_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|source| LoadError::Csv { table, source })?
        .clone();
    let index = HeaderIndex::resolve(table, headers, &columns.pairs())?;

    let mut events = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let row = idx + 1;
        let record = record.map_err(|source| LoadError::Csv { table, source })?;
        events.push(InterruptionEvent {
            instance_id: index.instance_id(&record),
            time: index.time(&record, row, parser)?,
            extra: index.passthrough(&record),
        });
    }

    debug!(
        target: event_names::LOAD_TABLE,
        table = %table,
        rows = events.len(),
        "Loaded interruption events"
    );
    Ok(events)
}

fn open(table: EventTable, path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        table,
        path: path.display().to_string(),
        source,
    })
}

/// Read the fulfillment table from a file.
pub fn load_fulfillments_from_path(
    path: &Path,
    columns: &FulfillmentColumns,
    parser: &TimestampParser,
) -> Result<Vec<FulfillmentEvent>, LoadError> {
    load_fulfillments(open(EventTable::Fulfillment, path)?, columns, parser)
}

/// Read the interruption table from a file.
pub fn load_interruptions_from_path(
    path: &Path,
    columns: &InterruptionColumns,
    parser: &TimestampParser,
) -> Result<Vec<InterruptionEvent>, LoadError> {
    load_interruptions(open(EventTable::Interruption, path)?, columns, parser)
}
