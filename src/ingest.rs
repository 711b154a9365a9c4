use chrono::{DateTime, Utc};
use csv::StringRecord;
use std::collections::HashMap;

use crate::model::SensorReading;

/// Columns every upload must carry. A header missing any of these rejects the
/// whole file before a single data row is read.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "timestamp",
    "object_id",
    "port_num",
    "voltage",
    "current",
    "supply_current",
    "supply_volt",
    "voltage_drop",
    "voc",
];

/// Rejection of a CSV payload. Line numbers are 1-based and count the header
/// as line 1, so the first data row reports line 2.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("The CSV payload has no readable header row")]
    MalformedHeader,
    #[error("The following required fields are missing: {}", names.join(", "))]
    MissingColumns { names: Vec<String> },
    #[error("Error at line {line}: {field} should be {expected}")]
    InvalidField {
        line: usize,
        field: &'static str,
        expected: &'static str,
    },
    #[error("Error at line {line}: {detail}")]
    RowReadError { line: usize, detail: String },
    #[error("The CSV file contains a header but no valid data rows")]
    EmptyPayload,
}

impl IngestError {
    /// Short error code carried in the JSON error envelope.
    pub fn code(&self) -> String {
        match self {
            IngestError::MalformedHeader => "Failed to read CSV header".to_string(),
            IngestError::MissingColumns { .. } => "Missing required fields in CSV".to_string(),
            IngestError::InvalidField {
                field: "timestamp", ..
            } => "Invalid timestamp format".to_string(),
            IngestError::InvalidField { field, .. } => format!("Invalid {field}"),
            IngestError::RowReadError { .. } => "Failed to read CSV row".to_string(),
            IngestError::EmptyPayload => "No valid data found".to_string(),
        }
    }
}

/// How an optional column lands on the reading. Adding a column is a table
/// entry, not new branching.
enum Setter {
    Number(fn(&mut SensorReading, f64)),
    Text(fn(&mut SensorReading, String)),
    Flag(fn(&mut SensorReading, bool)),
}

const OPTIONAL_COLUMNS: &[(&str, Setter)] = &[
    ("state", Setter::Number(|r, v| r.state = v)),
    ("controller_error", Setter::Number(|r, v| r.controller_error = v)),
    ("ai1", Setter::Number(|r, v| r.ai1 = v)),
    ("ai2", Setter::Number(|r, v| r.ai2 = v)),
    ("ai3", Setter::Number(|r, v| r.ai3 = v)),
    ("ai4", Setter::Number(|r, v| r.ai4 = v)),
    ("ai5", Setter::Number(|r, v| r.ai5 = v)),
    ("fw_version", Setter::Text(|r, v| r.fw_version = v)),
    ("vendor_id", Setter::Text(|r, v| r.vendor_id = v)),
    ("lite_id", Setter::Text(|r, v| r.lite_id = v)),
    ("q_charge", Setter::Number(|r, v| r.q_charge = v)),
    ("voltage_set_point", Setter::Number(|r, v| r.voltage_set_point = v)),
    ("command", Setter::Number(|r, v| r.command = v)),
    ("target_q", Setter::Number(|r, v| r.target_q = v)),
    ("step_number", Setter::Number(|r, v| r.step_number = v)),
    ("voc_mode", Setter::Number(|r, v| r.voc_mode = v)),
    ("target_voc", Setter::Number(|r, v| r.target_voc = v)),
    ("voc_state", Setter::Number(|r, v| r.voc_state = v)),
    ("voc_exit", Setter::Number(|r, v| r.voc_exit = v)),
    ("read_error", Setter::Flag(|r, v| r.read_error = v)),
];

/// Parses a CSV payload into readings, rejecting the whole batch on the first
/// structurally invalid row. `created_at` is stamped per row as it is parsed.
pub fn parse_readings(data: &[u8]) -> Result<Vec<SensorReading>, IngestError> {
    let mut reader = csv::Reader::from_reader(data);
    let headers = reader
        .headers()
        .map_err(|_| IngestError::MalformedHeader)?
        .clone();
    if headers.is_empty() || headers.iter().all(|name| name.trim().is_empty()) {
        return Err(IngestError::MalformedHeader);
    }

    let columns: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(index, name)| (name.to_string(), index))
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !columns.contains_key(**name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns { names: missing });
    }

    let mut readings = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let line = index + 2;
        let record = row.map_err(|err| IngestError::RowReadError {
            line,
            detail: err.to_string(),
        })?;
        readings.push(parse_row(&record, &columns, line)?);
    }

    if readings.is_empty() {
        return Err(IngestError::EmptyPayload);
    }
    tracing::debug!(rows = readings.len(), "parsed CSV payload");
    Ok(readings)
}

fn field<'a>(record: &'a StringRecord, columns: &HashMap<String, usize>, name: &str) -> &'a str {
    columns
        .get(name)
        .and_then(|&index| record.get(index))
        .unwrap_or("")
}

fn required_number(
    record: &StringRecord,
    columns: &HashMap<String, usize>,
    name: &'static str,
    line: usize,
) -> Result<f64, IngestError> {
    // Required fields reject emptiness; only optional numerics fall back to
    // zero.
    field(record, columns, name)
        .parse::<f64>()
        .map_err(|_| IngestError::InvalidField {
            line,
            field: name,
            expected: "a number",
        })
}

fn parse_row(
    record: &StringRecord,
    columns: &HashMap<String, usize>,
    line: usize,
) -> Result<SensorReading, IngestError> {
    let timestamp = DateTime::parse_from_rfc3339(field(record, columns, "timestamp"))
        .map_err(|_| IngestError::InvalidField {
            line,
            field: "timestamp",
            expected: "in RFC3339 format",
        })?
        .with_timezone(&Utc);

    let mut reading = SensorReading {
        timestamp,
        object_id: required_number(record, columns, "object_id", line)?,
        port_num: required_number(record, columns, "port_num", line)?,
        voltage: required_number(record, columns, "voltage", line)?,
        current: required_number(record, columns, "current", line)?,
        supply_current: required_number(record, columns, "supply_current", line)?,
        supply_volt: required_number(record, columns, "supply_volt", line)?,
        voltage_drop: required_number(record, columns, "voltage_drop", line)?,
        voc: required_number(record, columns, "voc", line)?,
        created_at: Utc::now(),
        ..SensorReading::default()
    };

    for (name, setter) in OPTIONAL_COLUMNS {
        let Some(&index) = columns.get(*name) else {
            continue;
        };
        let Some(value) = record.get(index) else {
            continue;
        };
        match setter {
            // Optional numerics never abort the row; empty or unparsable
            // values keep the zero default.
            Setter::Number(set) => {
                if let Ok(parsed) = value.parse::<f64>() {
                    set(&mut reading, parsed);
                }
            }
            Setter::Text(set) => set(&mut reading, value.to_string()),
            Setter::Flag(set) => set(&mut reading, value == "true"),
        }
    }

    Ok(reading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const FULL_HEADER: &str =
        "timestamp,object_id,port_num,voltage,current,supply_current,supply_volt,voltage_drop,voc";

    fn csv_with_rows(rows: &[&str]) -> Vec<u8> {
        let mut payload = FULL_HEADER.to_string();
        for row in rows {
            payload.push('\n');
            payload.push_str(row);
        }
        payload.into_bytes()
    }

    #[test]
    fn parses_well_formed_rows() {
        let payload = csv_with_rows(&[
            "2024-01-01T00:00:00Z,5,1,3.3,0.1,0.05,5.0,0.2,3.1",
            "2024-01-01T00:01:00Z,5,2,3.4,0.2,0.06,5.1,0.3,3.2",
        ]);
        let readings = parse_readings(&payload).expect("valid payload");
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].object_id, 5.0);
        assert_eq!(readings[0].port_num, 1.0);
        assert_eq!(readings[0].voltage, 3.3);
        assert_eq!(readings[1].port_num, 2.0);
        let age = Utc::now() - readings[0].created_at;
        assert!(age.num_seconds() < 5);
    }

    #[test]
    fn lists_every_missing_required_column() {
        let payload = b"timestamp,object_id,port_num,current,supply_current,supply_volt\n\
            2024-01-01T00:00:00Z,5,1,0.1,0.05,5.0";
        let err = parse_readings(payload).expect_err("missing columns");
        match err {
            IngestError::MissingColumns { names } => {
                assert_eq!(names, vec!["voltage", "voltage_drop", "voc"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_required_numeric_rejects_the_row() {
        let payload = csv_with_rows(&["2024-01-01T00:00:00Z,5,1,,0.1,0.05,5.0,0.2,3.1"]);
        let err = parse_readings(&payload).expect_err("empty voltage");
        match err {
            IngestError::InvalidField { line, field, .. } => {
                assert_eq!(line, 2);
                assert_eq!(field, "voltage");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_numeric_object_id_rejects_the_row() {
        let payload = csv_with_rows(&["2024-01-01T00:00:00Z,abc,1,3.3,0.1,0.05,5.0,0.2,3.1"]);
        let err = parse_readings(&payload).expect_err("bad object_id");
        assert!(matches!(
            err,
            IngestError::InvalidField {
                line: 2,
                field: "object_id",
                ..
            }
        ));
    }

    #[test]
    fn bad_timestamp_reports_its_line() {
        let payload = csv_with_rows(&[
            "2024-01-01T00:00:00Z,5,1,3.3,0.1,0.05,5.0,0.2,3.1",
            "not-a-timestamp,5,1,3.3,0.1,0.05,5.0,0.2,3.1",
        ]);
        let err = parse_readings(&payload).expect_err("bad timestamp");
        match err {
            IngestError::InvalidField { line, field, .. } => {
                assert_eq!(line, 3);
                assert_eq!(field, "timestamp");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            parse_readings(&payload).unwrap_err().code(),
            "Invalid timestamp format"
        );
    }

    #[test]
    fn optional_numeric_empty_or_garbage_stays_zero() {
        let header = format!("{FULL_HEADER},state,q_charge");
        let payload = format!(
            "{header}\n2024-01-01T00:00:00Z,5,1,3.3,0.1,0.05,5.0,0.2,3.1,,abc"
        );
        let readings = parse_readings(payload.as_bytes()).expect("optional fields tolerated");
        assert_eq!(readings[0].state, 0.0);
        assert_eq!(readings[0].q_charge, 0.0);
    }

    #[test]
    fn optional_numeric_present_is_applied() {
        let header = format!("{FULL_HEADER},state,voc_mode,target_voc");
        let payload = format!(
            "{header}\n2024-01-01T00:00:00Z,5,1,3.3,0.1,0.05,5.0,0.2,3.1,2,1.5,3.6"
        );
        let readings = parse_readings(payload.as_bytes()).expect("optional numerics");
        assert_eq!(readings[0].state, 2.0);
        assert_eq!(readings[0].voc_mode, 1.5);
        assert_eq!(readings[0].target_voc, 3.6);
    }

    #[test]
    fn string_fields_are_copied_verbatim() {
        let header = format!("{FULL_HEADER},fw_version,vendor_id,lite_id");
        let payload = format!(
            "{header}\n2024-01-01T00:00:00Z,5,1,3.3,0.1,0.05,5.0,0.2,3.1,v1.2.3,acme,"
        );
        let readings = parse_readings(payload.as_bytes()).expect("string fields");
        assert_eq!(readings[0].fw_version, "v1.2.3");
        assert_eq!(readings[0].vendor_id, "acme");
        assert_eq!(readings[0].lite_id, "");
    }

    #[test]
    fn read_error_is_true_only_for_the_exact_literal() {
        let header = format!("{FULL_HEADER},read_error");
        for (value, expected) in [("true", true), ("TRUE", false), ("1", false), ("", false)] {
            let payload = format!(
                "{header}\n2024-01-01T00:00:00Z,5,1,3.3,0.1,0.05,5.0,0.2,3.1,{value}"
            );
            let readings = parse_readings(payload.as_bytes()).expect("boolean field");
            assert_eq!(readings[0].read_error, expected, "value {value:?}");
        }
        // Absent column stays false.
        let payload = csv_with_rows(&["2024-01-01T00:00:00Z,5,1,3.3,0.1,0.05,5.0,0.2,3.1"]);
        assert!(!parse_readings(&payload).expect("no read_error column")[0].read_error);
    }

    #[test]
    fn wrong_column_count_is_a_row_read_error() {
        let payload = csv_with_rows(&[
            "2024-01-01T00:00:00Z,5,1,3.3,0.1,0.05,5.0,0.2,3.1",
            "2024-01-01T00:01:00Z,5,1,3.3",
        ]);
        let err = parse_readings(&payload).expect_err("short row");
        assert!(matches!(err, IngestError::RowReadError { line: 3, .. }));
    }

    #[test]
    fn header_only_payload_is_empty() {
        let err = parse_readings(FULL_HEADER.as_bytes()).expect_err("no rows");
        assert!(matches!(err, IngestError::EmptyPayload));
    }

    #[test]
    fn empty_stream_is_a_malformed_header() {
        let err = parse_readings(b"").expect_err("empty stream");
        assert!(matches!(err, IngestError::MalformedHeader));
    }
}
