//! JSON output handling for CLI
//!
//! - One JSON object per command on stdout
//! - `{"status": "ok", "data": ...}` on success
//! - `{"status": "error", "code": ..., "message": ..., "violations": [...]}` on failure

use std::io::{self, Write};

use serde_json::{json, Value};

use crate::dataset::Violation;

use super::errors::CliResult;

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_response_to(&mut io::stdout(), data)
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str, violations: &[Violation]) -> CliResult<()> {
    write_error_to(&mut io::stdout(), code, message, violations)
}

pub fn write_response_to<W: Write>(writer: &mut W, data: Value) -> CliResult<()> {
    let response = json!({
        "status": "ok",
        "data": data
    });
    write_line(writer, &response)
}

pub fn write_error_to<W: Write>(
    writer: &mut W,
    code: &str,
    message: &str,
    violations: &[Violation],
) -> CliResult<()> {
    let response = json!({
        "status": "error",
        "code": code,
        "message": message,
        "violations": violations
    });
    write_line(writer, &response)
}

fn write_line<W: Write>(writer: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shape() {
        let mut buffer = Vec::new();
        write_response_to(&mut buffer, json!({"cases": 3})).unwrap();

        let parsed: Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["data"]["cases"], 3);
        assert!(buffer.ends_with(b"\n"));
    }

    #[test]
    fn test_error_lists_violations() {
        let violation = Violation::unknown_strategy("ground_truth[0].data[0][0].strategy[0]", "Z9")
            .in_case(Some(0), Some("case1"));
        let mut buffer = Vec::new();
        write_error_to(&mut buffer, "DTB_CONSISTENCY_ERROR", "rejected", &[violation]).unwrap();

        let parsed: Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed["status"], "error");
        assert_eq!(parsed["code"], "DTB_CONSISTENCY_ERROR");
        assert_eq!(parsed["violations"][0]["kind"], "unknown_strategy");
        assert_eq!(parsed["violations"][0]["case_name"], "case1");
        assert_eq!(parsed["violations"][0]["case_index"], 0);
    }
}
