use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use edi_ingest::ParseOutcome;
use edi_model::{EdiTransaction, ValidationError, ValidationRule};
use edi_submit::{
    JsonFileStore, StatusUpdate, SubmissionOutcome, SubmissionRequest, Submitter,
    TransactionManager, TransactionStore,
};
use edi_validate::{RuleSet, default_rules, load_rules};
use tracing::{debug, info, info_span, trace};

use crate::cli::{ParseArgs, RulesArgs, ShowArgs, StatusArgs, SubmitArgs, ValidateArgs};
use crate::config::EdiConfig;
use crate::logging::redact_value;

pub fn run_parse(args: &ParseArgs, config: &EdiConfig) -> Result<ParseOutcome> {
    parse_file(&args.file, config)
}

pub fn run_validate(args: &ValidateArgs, config: &EdiConfig) -> Result<Vec<ValidationError>> {
    let span = info_span!("validate", file = %args.file.display());
    let _guard = span.enter();

    let outcome = parse_file(&args.file, config)?;
    let rules = load_rule_set(config.rules_path(args.rules.as_deref()))?.into_rules();
    let findings = edi_validate::validate(&outcome.document, &rules);
    info!(
        segments = outcome.segment_count(),
        findings = findings.len(),
        "validation complete"
    );
    Ok(findings)
}

pub fn run_submit(args: &SubmitArgs, config: &EdiConfig) -> Result<SubmissionOutcome> {
    let span = info_span!("submit", file = %args.file.display());
    let _guard = span.enter();

    let bytes = fs::read(&args.file).with_context(|| format!("read {}", args.file.display()))?;
    {
        let text = String::from_utf8_lossy(&bytes);
        trace!(content = redact_value(&text), "submitting content");
    }

    let rules = load_rule_set(config.rules_path(args.rules.as_deref()))?;
    let store = open_store(config, args.store.store_dir.as_deref())?;
    let mut submitter = Submitter::new(Arc::new(rules), store);
    if let Some(options) = config.tokenizer.options() {
        submitter = submitter.with_tokenizer_options(options);
    }

    let request = SubmissionRequest::from_bytes(bytes, args.transaction_type).with_refs(
        args.provider.clone(),
        args.claim.clone(),
        args.patient.clone(),
    );
    Ok(submitter.submit(request))
}

pub fn run_status(args: &StatusArgs, config: &EdiConfig) -> Result<EdiTransaction> {
    let response_content = args
        .response_file
        .as_ref()
        .map(|path| {
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
        })
        .transpose()?;

    let update = StatusUpdate {
        status: args.status.clone(),
        error_code: args.error_code.clone(),
        error_message: args.error_message.clone(),
        validation_errors: None,
        response_transaction_id: args.response_id.clone(),
        response_content,
    };

    let manager = TransactionManager::new(open_store(config, args.store.store_dir.as_deref())?);
    manager
        .update_status(&args.transaction_id, &update)
        .with_context(|| format!("update transaction {}", args.transaction_id))
}

pub fn run_show(args: &ShowArgs, config: &EdiConfig) -> Result<EdiTransaction> {
    let store = open_store(config, args.store.store_dir.as_deref())?;
    store
        .get(&args.transaction_id)
        .with_context(|| format!("load transaction {}", args.transaction_id))
}

pub fn run_rules(args: &RulesArgs, config: &EdiConfig) -> Result<Vec<ValidationRule>> {
    let rules = load_rule_set(config.rules_path(args.rules.as_deref()))?;
    Ok(if args.all {
        rules.into_rules()
    } else {
        rules.active().cloned().collect()
    })
}

/// Read and structure a file. Bytes that are not UTF-8 fail only the
/// segments they appear in.
fn parse_file(path: &Path, config: &EdiConfig) -> Result<ParseOutcome> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let options = config
        .tokenizer
        .options()
        .unwrap_or_else(|| edi_ingest::detect_bytes(&bytes));
    debug!(
        element_separator = %options.element_separator,
        component_separator = %options.component_separator,
        segment_terminator = ?options.segment_terminator,
        "tokenizer options"
    );
    edi_ingest::parse_bytes_with(&bytes, &options)
        .with_context(|| format!("tokenize {}", path.display()))
}

fn load_rule_set(path: Option<PathBuf>) -> Result<RuleSet> {
    match path {
        Some(path) => {
            let rules =
                load_rules(&path).with_context(|| format!("load rules {}", path.display()))?;
            debug!(path = %path.display(), rules = rules.len(), "loaded rules");
            Ok(rules)
        }
        None => default_rules().context("load built-in rules"),
    }
}

fn open_store(config: &EdiConfig, flag: Option<&Path>) -> Result<Arc<dyn TransactionStore>> {
    let dir = config.store_dir(flag);
    let store = JsonFileStore::open(&dir)
        .with_context(|| format!("open transaction store {}", dir.display()))?;
    Ok(Arc::new(store))
}
