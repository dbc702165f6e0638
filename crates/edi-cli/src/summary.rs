use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use edi_ingest::ParseOutcome;
use edi_model::{EdiTransaction, TransactionSet, ValidationError, ValidationRule};
use edi_submit::{SubmissionOutcome, SubmissionStatus};

const WARNING_PREFIX: &str = "warning:";

pub fn print_parse_summary(path: &Path, outcome: &ParseOutcome) {
    let interchange = &outcome.document.interchange;
    println!("File: {}", path.display());
    println!("Segments: {}", outcome.segment_count());

    let mut header = Table::new();
    header.set_header(vec![header_cell("Interchange"), header_cell("Value")]);
    apply_table_style(&mut header);
    for (label, value) in [
        ("Sender", format!("{}/{}", interchange.sender_qualifier, interchange.sender_id)),
        (
            "Receiver",
            format!("{}/{}", interchange.receiver_qualifier, interchange.receiver_id),
        ),
        ("Date/Time", format!("{} {}", interchange.date, interchange.time)),
        ("Control number", interchange.control_number.clone()),
        ("Version", interchange.version.clone()),
        ("Usage", interchange.usage_indicator.clone()),
    ] {
        header.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    println!("{header}");

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("Type"),
        header_cell("ST control"),
        header_cell("Segments"),
        header_cell("SE01"),
        header_cell("Closed"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);
    for group in &outcome.document.functional_groups {
        for transaction in &group.transactions {
            table.add_row(transaction_row(
                Cell::new(format!("{} #{}", group.functional_id_code, group.control_number)),
                transaction,
            ));
        }
    }
    for transaction in &outcome.document.transactions {
        table.add_row(transaction_row(dim_cell("(none)"), transaction));
    }
    println!("{table}");

    for error in &outcome.segment_errors {
        println!("{} {error}", WARNING_PREFIX);
    }
    for warning in &outcome.warnings {
        println!("{} {}", WARNING_PREFIX, warning.message());
    }
}

pub fn print_findings(findings: &[ValidationError]) {
    if findings.is_empty() {
        println!("No validation errors.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Element"),
        header_cell("Value"),
        header_cell("Message"),
        header_cell("Segment"),
    ]);
    apply_summary_table_style(&mut table);
    for finding in findings {
        table.add_row(vec![
            Cell::new(&finding.code).fg(Color::Red),
            optional_cell(finding.element.as_deref()),
            optional_cell(finding.value.as_deref()),
            Cell::new(&finding.message),
            optional_cell(finding.segment_raw.as_deref().or(finding.segment.as_deref())),
        ]);
    }
    println!("{table}");
    println!("{} validation error(s)", findings.len());
}

pub fn print_submission(outcome: &SubmissionOutcome) {
    let result = &outcome.result;
    let status = match result.status {
        Some(SubmissionStatus::Accepted) => Cell::new("ACCEPTED").fg(Color::Green),
        Some(SubmissionStatus::AcceptedWithErrors) => {
            Cell::new("ACCEPTED_WITH_ERRORS").fg(Color::Yellow)
        }
        None => Cell::new("FAILED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    };

    let mut table = Table::new();
    table.set_header(vec![header_cell("Submission"), header_cell("Value")]);
    apply_table_style(&mut table);
    table.add_row(vec![Cell::new("Status"), status]);
    table.add_row(vec![
        Cell::new("Transaction"),
        optional_cell(result.transaction_id.as_deref()),
    ]);
    table.add_row(vec![Cell::new("Segments"), Cell::new(result.segment_count)]);
    table.add_row(vec![Cell::new("Message"), Cell::new(&outcome.message)]);
    println!("{table}");

    for warning in &result.warnings {
        println!("{} {warning}", WARNING_PREFIX);
    }
    if !result.validation_errors.is_empty() {
        print_findings(&result.validation_errors);
    }
}

pub fn print_transaction_status(transaction: &EdiTransaction) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Transaction"), header_cell("Value")]);
    apply_table_style(&mut table);
    table.add_row(vec![Cell::new("Id"), Cell::new(&transaction.transaction_id)]);
    table.add_row(vec![
        Cell::new("Type"),
        Cell::new(format!(
            "{} ({})",
            transaction.transaction_type.as_str(),
            transaction.transaction_type.description()
        )),
    ]);
    table.add_row(vec![
        Cell::new("Status"),
        Cell::new(transaction.status.as_str()).add_attribute(Attribute::Bold),
    ]);
    if transaction.has_validation_errors() {
        table.add_row(vec![
            Cell::new("Validation errors"),
            Cell::new(transaction.validation_errors.len()).fg(Color::Red),
        ]);
    }
    table.add_row(vec![
        Cell::new("Response"),
        optional_cell(transaction.response_transaction_id.as_deref()),
    ]);
    table.add_row(vec![
        Cell::new("Response received"),
        optional_cell(
            transaction
                .response_received_at
                .map(|at| at.to_rfc3339())
                .as_deref(),
        ),
    ]);
    println!("{table}");
}

pub fn print_rules(rules: &[ValidationRule]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Type"),
        header_cell("Segment"),
        header_cell("Pos"),
        header_cell("Req"),
        header_cell("Code"),
        header_cell("Active"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    align_column(&mut table, 6, CellAlignment::Center);
    for rule in rules {
        let name = if rule.is_active {
            Cell::new(&rule.name)
        } else {
            dim_cell(&rule.name)
        };
        table.add_row(vec![
            name,
            Cell::new(rule.rule_type.as_str()),
            Cell::new(&rule.segment_id),
            optional_cell(rule.element_position.map(|p| p.to_string()).as_deref()),
            flag_cell(rule.required),
            Cell::new(&rule.error_code),
            flag_cell(rule.is_active),
        ]);
    }
    println!("{table}");
    println!("{} rule(s)", rules.len());
}

fn transaction_row(group: Cell, transaction: &TransactionSet) -> Vec<Cell> {
    let declared = transaction
        .trailer
        .as_ref()
        .map(|trailer| trailer.segment_count.as_str());
    vec![
        group,
        Cell::new(&transaction.transaction_set_id),
        Cell::new(&transaction.control_number),
        Cell::new(transaction.segments.len()),
        optional_cell(declared),
        flag_cell(transaction.is_closed()),
    ]
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell(value: &str) -> Cell {
    Cell::new(value).add_attribute(Attribute::Dim)
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) if !value.is_empty() => Cell::new(value),
        _ => dim_cell("-"),
    }
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("yes").fg(Color::Green)
    } else {
        dim_cell("no")
    }
}
