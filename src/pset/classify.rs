//! Output and source classification of an expanded parameter-set.

use crate::domain::ArtifactInfo;
use crate::utils::output_file_name;
use anyhow::{bail, Result};
use serde_json::Value;

pub const LHE_SOURCE_TYPE: &str = "LHESource";
pub const TFILE_SERVICE: &str = "TFileService";

/// Split declared outputs into dataset-format and generic groups, and detect an
/// LHE source with its declared event count.
pub fn classify(document: &Value) -> Result<ArtifactInfo> {
    let dataset = dataset_outputs(document)?;
    let generic = generic_outputs(document)?;
    let lheinfo = lhe_info(document)?;

    Ok(ArtifactInfo { outfiles: [dataset, generic], lheinfo })
}

fn dataset_outputs(document: &Value) -> Result<Vec<String>> {
    let modules = match document.get("output_modules") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(modules)) => modules,
        Some(other) => bail!("'output_modules' must be a mapping of module labels, found {other}"),
    };

    let mut files = Vec::with_capacity(modules.len());
    for (label, module) in modules {
        let Some(module) = module.as_object() else {
            bail!("output module '{label}' must be a mapping, found {module}");
        };
        let Some(file_name) = module.get("file_name").and_then(Value::as_str) else {
            bail!("output module '{label}' does not declare a string 'file_name'");
        };
        files.push(output_file_name(file_name));
    }
    Ok(files)
}

fn generic_outputs(document: &Value) -> Result<Vec<String>> {
    let Some(service) = document.get("services").and_then(|s| s.get(TFILE_SERVICE)) else {
        return Ok(Vec::new());
    };
    match service.get("file_name") {
        Some(Value::String(file_name)) => Ok(vec![output_file_name(file_name)]),
        _ => bail!("service '{TFILE_SERVICE}' does not declare a string 'file_name'"),
    }
}

fn lhe_info(document: &Value) -> Result<(bool, i64)> {
    let source_type = document.pointer("/source/type").and_then(Value::as_str);
    if source_type != Some(LHE_SOURCE_TYPE) {
        return Ok((false, 0));
    }
    match document.pointer("/max_events/input") {
        None | Some(Value::Null) => Ok((true, 0)),
        Some(value) => match value.as_i64() {
            Some(count) => Ok((true, count)),
            None => bail!("'max_events.input' must be an integer, found {value}"),
        },
    }
}
