use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use time::Date;

use crate::api::errors::ApiError;
use crate::core::time::format_date;

/// First worksheet of an uploaded workbook: the header row plus stringified
/// data rows (rows without a single non-empty cell are dropped).
pub(crate) struct Sheet {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

pub(crate) fn parse_workbook(bytes: &[u8]) -> Result<Sheet, ApiError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|err| ApiError::Validation(format!("Unable to read Excel file: {err}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ApiError::Validation("Excel file contains no worksheets".to_string()))?
        .map_err(|err| ApiError::Validation(format!("Unable to read worksheet: {err}")))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(cell_to_string).collect())
        .unwrap_or_default();

    if headers.iter().all(|header| header.is_empty()) {
        return Err(ApiError::Validation("Excel file has no header row".to_string()));
    }

    let data_rows: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
        .filter(|cells: &Vec<String>| cells.iter().any(|cell| !cell.is_empty()))
        .collect();

    Ok(Sheet { headers, rows: data_rows })
}

/// Maps a known spreadsheet column header to its entity field tag.
pub(crate) fn header_field(header: &str) -> Option<&'static str> {
    Some(match header.trim() {
        "Student Name" | "Name" => "name",
        "Admission Number" | "Admission No" => "admissionNo",
        "Father's Name" | "Father Name" => "fatherName",
        "Mother's Name" | "Mother Name" => "motherName",
        "Date of Birth" | "DOB" => "dob",
        "Mobile Number" | "Mobile" | "Phone Number" | "Phone" => "mobile",
        "Email" => "email",
        "Address" => "address",
        "Photo URL" | "Photo" => "photoUrl",
        "Aadhaar Number" | "Aadhaar" => "aadhaar",
        "Username" => "username",
        "Password" => "password",
        "School ID" | "School" => "schoolId",
        "Class ID" => "classId",
        _ => return None,
    })
}

/// Collapses one data row into field-tag → value, skipping unknown columns
/// and empty cells.
pub(crate) fn map_row<'a>(
    headers: &'a [String],
    cells: &'a [String],
) -> HashMap<&'static str, &'a str> {
    let mut fields = HashMap::new();
    for (header, cell) in headers.iter().zip(cells.iter()) {
        if cell.is_empty() {
            continue;
        }
        if let Some(field) = header_field(header) {
            fields.insert(field, cell.as_str());
        }
    }
    fields
}

/// Raw header → cell view of a row, reported back verbatim in import errors.
pub(crate) fn row_json(headers: &[String], cells: &[String]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (header, cell) in headers.iter().zip(cells.iter()) {
        if !header.is_empty() && !cell.is_empty() {
            map.insert(header.clone(), serde_json::Value::String(cell.clone()));
        }
    }
    serde_json::Value::Object(map)
}

/// Header line for a template download: one human-readable column per data
/// tag, CSV so any spreadsheet tool opens it directly.
pub(crate) fn column_schema_csv(data_tags: &[String]) -> String {
    let labels: Vec<String> = data_tags.iter().map(|tag| tag_label(tag)).collect();
    let mut line = labels.join(",");
    line.push('\n');
    line
}

pub(crate) fn tag_label(tag: &str) -> String {
    match tag {
        "admissionNo" => "Admission Number".to_string(),
        "fatherName" => "Father's Name".to_string(),
        "motherName" => "Mother's Name".to_string(),
        "dob" => "Date of Birth".to_string(),
        "mobile" => "Mobile Number".to_string(),
        "photoUrl" => "Photo URL".to_string(),
        "aadhaar" => "Aadhaar Number".to_string(),
        "classId" => "Class ID".to_string(),
        "schoolId" => "School ID".to_string(),
        _ => title_case(tag),
    }
}

fn title_case(tag: &str) -> String {
    let mut result = String::with_capacity(tag.len() + 4);
    for (index, ch) in tag.chars().enumerate() {
        if index == 0 {
            result.extend(ch.to_uppercase());
        } else if ch.is_ascii_uppercase() {
            result.push(' ');
            result.push(ch);
        } else {
            result.push(ch);
        }
    }
    result
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(value) => value.trim().to_string(),
        Data::Float(value) => format_float(*value),
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => excel_serial_to_date(value.as_f64())
            .map(format_date)
            .unwrap_or_default(),
        Data::DateTimeIso(value) => value.trim().to_string(),
        Data::DurationIso(value) => value.trim().to_string(),
    }
}

// Identifiers like admission numbers arrive as floats from Excel; keep them
// free of a trailing ".0".
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

// 1900 date system. Serials at or below the phantom 1900-02-29 (serial 60)
// are not expected in real rosters and are rejected.
fn excel_serial_to_date(serial: f64) -> Option<Date> {
    let days = serial.trunc() as i32;
    if days <= 60 {
        return None;
    }
    Date::from_julian_day(days + 2_415_019).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn header_field_maps_known_variants() {
        assert_eq!(header_field("Admission Number"), Some("admissionNo"));
        assert_eq!(header_field("Admission No"), Some("admissionNo"));
        assert_eq!(header_field("Father's Name"), Some("fatherName"));
        assert_eq!(header_field(" DOB "), Some("dob"));
        assert_eq!(header_field("Roll Number"), None);
    }

    #[test]
    fn map_row_skips_empty_and_unknown_cells() {
        let headers = vec![
            "Name".to_string(),
            "Admission Number".to_string(),
            "Roll Number".to_string(),
        ];
        let cells = vec!["Asha Verma".to_string(), String::new(), "17".to_string()];

        let fields = map_row(&headers, &cells);
        assert_eq!(fields.get("name"), Some(&"Asha Verma"));
        assert!(!fields.contains_key("admissionNo"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn excel_serial_conversion() {
        let date = excel_serial_to_date(45292.0).expect("date");
        assert_eq!(date, Date::from_calendar_date(2024, Month::January, 1).unwrap());

        let date = excel_serial_to_date(36526.0).expect("date");
        assert_eq!(date, Date::from_calendar_date(2000, Month::January, 1).unwrap());

        assert!(excel_serial_to_date(60.0).is_none());
    }

    #[test]
    fn float_identifiers_keep_integer_form() {
        assert_eq!(format_float(1001.0), "1001");
        assert_eq!(format_float(98.5), "98.5");
    }

    #[test]
    fn column_schema_uses_human_labels() {
        let tags =
            vec!["name".to_string(), "admissionNo".to_string(), "photoUrl".to_string()];
        assert_eq!(column_schema_csv(&tags), "Name,Admission Number,Photo URL\n");
    }

    #[test]
    fn title_case_splits_camel_case() {
        assert_eq!(tag_label("bloodGroup"), "Blood Group");
        assert_eq!(tag_label("name"), "Name");
    }
}
