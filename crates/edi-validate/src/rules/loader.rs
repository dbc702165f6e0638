//! Rule loaders for CSV and JSON files.
//!
//! CSV files carry one rule per row with the columns below; only `name`,
//! `rule_type`, `segment_id`, `error_code` and `error_message` are mandatory.
//! `valid_codes` is `|`-separated. JSON files hold an array of rules.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use edi_model::{RuleType, ValidationRule};

use super::registry::RuleSet;
use crate::error::{Result, RuleLoadError};

const CODE_SEPARATOR: char = '|';

/// Load rules, choosing the format from the file extension.
pub fn load_rules(path: &Path) -> Result<RuleSet> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => load_rules_csv(path),
        Some("json") => load_rules_json(path),
        _ => Err(RuleLoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Load rules from a CSV file.
pub fn load_rules_csv(path: &Path) -> Result<RuleSet> {
    let file = File::open(path).map_err(|e| RuleLoadError::io(path, e))?;
    let rules = read_rules_csv(file)?;
    tracing::debug!(path = %path.display(), rules = rules.len(), "loaded CSV rules");
    Ok(rules)
}

/// Load rules from a JSON array.
pub fn load_rules_json(path: &Path) -> Result<RuleSet> {
    let file = File::open(path).map_err(|e| RuleLoadError::io(path, e))?;
    let rules: Vec<ValidationRule> = serde_json::from_reader(file)?;
    let rules = RuleSet::from_rules(rules)?;
    tracing::debug!(path = %path.display(), rules = rules.len(), "loaded JSON rules");
    Ok(rules)
}

/// Read CSV rules from any reader.
pub fn read_rules_csv<R: Read>(reader: R) -> Result<RuleSet> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();

    let name_idx = find_column(&headers, "name")?;
    let type_idx = find_column(&headers, "rule_type")?;
    let segment_idx = find_column(&headers, "segment_id")?;
    let code_idx = find_column(&headers, "error_code")?;
    let message_idx = find_column(&headers, "error_message")?;
    let position_idx = optional_column(&headers, "element_position");
    let required_idx = optional_column(&headers, "required");
    let min_idx = optional_column(&headers, "min_length");
    let max_idx = optional_column(&headers, "max_length");
    let codes_idx = optional_column(&headers, "valid_codes");
    let regex_idx = optional_column(&headers, "regex_pattern");
    let active_idx = optional_column(&headers, "is_active");

    let mut rules = RuleSet::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, csv::Position::line);
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("").trim();

        let name = cell(Some(name_idx));
        if name.is_empty() {
            continue;
        }

        let rule_type = cell(Some(type_idx))
            .parse::<RuleType>()
            .map_err(|e| invalid(line, "rule_type", e.to_string()))?;

        let valid_codes = match cell(codes_idx) {
            "" => None,
            codes => Some(
                codes
                    .split(CODE_SEPARATOR)
                    .map(str::trim)
                    .filter(|code| !code.is_empty())
                    .map(str::to_string)
                    .collect::<BTreeSet<_>>(),
            ),
        };

        let rule = ValidationRule {
            name: name.to_string(),
            rule_type,
            segment_id: cell(Some(segment_idx)).to_uppercase(),
            element_position: parse_count(cell(position_idx), line, "element_position")?,
            required: parse_flag(cell(required_idx), false, line, "required")?,
            min_length: parse_count(cell(min_idx), line, "min_length")?,
            max_length: parse_count(cell(max_idx), line, "max_length")?,
            valid_codes,
            regex_pattern: Some(cell(regex_idx))
                .filter(|pattern| !pattern.is_empty())
                .map(str::to_string),
            error_code: cell(Some(code_idx)).to_string(),
            error_message: cell(Some(message_idx)).to_string(),
            is_active: parse_flag(cell(active_idx), true, line, "is_active")?,
        };

        rules.insert(rule)?;
    }

    Ok(rules)
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    optional_column(headers, name).ok_or_else(|| RuleLoadError::MissingColumn(name.to_string()))
}

fn optional_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn parse_count(value: &str, line: u64, column: &str) -> Result<Option<usize>> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<usize>()
        .map(Some)
        .map_err(|e| invalid(line, column, format!("'{value}': {e}")))
}

fn parse_flag(value: &str, default: bool, line: u64, column: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "true" | "t" | "yes" | "y" | "1" => Ok(true),
        "false" | "f" | "no" | "n" | "0" => Ok(false),
        _ => Err(invalid(line, column, format!("'{value}' is not a boolean"))),
    }
}

fn invalid(line: u64, column: &str, message: String) -> RuleLoadError {
    RuleLoadError::InvalidValue {
        line,
        column: column.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "name,rule_type,segment_id,element_position,required,min_length,max_length,valid_codes,regex_pattern,error_code,error_message,is_active\n";

    #[test]
    fn test_read_full_row() {
        let csv = format!(
            "{HEADER}nm1-type,code_validation,nm1,2,yes,,,1| 2,,E1,\"Entity type, 1 or 2\",\n"
        );
        let rules = read_rules_csv(csv.as_bytes()).unwrap();
        let rule = rules.get("nm1-type").unwrap();
        assert_eq!(rule.rule_type, RuleType::CodeValidation);
        assert_eq!(rule.segment_id, "NM1");
        assert_eq!(rule.element_position, Some(2));
        assert!(rule.required);
        assert!(rule.is_active);
        assert_eq!(rule.error_message, "Entity type, 1 or 2");
        let codes = rule.valid_codes.as_ref().unwrap();
        assert!(codes.contains("1") && codes.contains("2"));
    }

    #[test]
    fn test_minimal_columns() {
        let csv = "name,rule_type,segment_id,error_code,error_message\n\
                   bht,REQUIRED_SEGMENT,BHT,B1,BHT missing\n";
        let rules = read_rules_csv(csv.as_bytes()).unwrap();
        let rule = rules.get("bht").unwrap();
        assert_eq!(rule.element_position, None);
        assert!(!rule.required);
        assert!(rule.is_active);
    }

    #[test]
    fn test_missing_column() {
        let err = read_rules_csv("name,rule_type\n".as_bytes()).unwrap_err();
        assert!(matches!(err, RuleLoadError::MissingColumn(column) if column == "segment_id"));
    }

    #[test]
    fn test_invalid_values() {
        let csv = format!("{HEADER}a,REQUIRED_ELEMENT,NM1,three,,,,,,E,m,\n");
        let err = read_rules_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            RuleLoadError::InvalidValue { ref column, .. } if column == "element_position"
        ));

        let csv = format!("{HEADER}a,LOOKUP,NM1,1,,,,,,E,m,\n");
        assert!(read_rules_csv(csv.as_bytes()).is_err());

        let csv = format!("{HEADER}a,REQUIRED_ELEMENT,NM1,1,maybe,,,,,E,m,\n");
        assert!(read_rules_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_rules(Path::new("rules.yaml")).unwrap_err();
        assert!(matches!(err, RuleLoadError::UnsupportedFormat { .. }));
    }
}
