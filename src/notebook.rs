//! Notebook cell model and the Splunk metadata namespace.
//!
//! Cell metadata is owned by the host editor; this crate only ever reads the
//! current value and produces a full replacement map to submit as a single
//! edit. The recurring pattern is a pure read-modify-write: copy the current
//! metadata, mutate one field under the `splunk` namespace, return the next
//! state.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The single key under which all Splunk fields live in cell metadata.
pub const METADATA_NAMESPACE: &str = "splunk";

/// Metadata field holding the preferred visualization for a cell's results.
pub const FIELD_VISUALIZATION_PREFERENCE: &str = "visualizationPreference";
/// Metadata field holding the SPL2 module name.
pub const FIELD_MODULE_NAME: &str = "moduleName";
/// Metadata field holding the SPL2 namespace.
pub const FIELD_NAMESPACE: &str = "namespace";
/// Metadata field holding the search earliest time.
pub const FIELD_EARLIEST_TIME: &str = "earliestTime";
/// Metadata field holding the search latest time.
pub const FIELD_LATEST_TIME: &str = "latestTime";

/// Default module name when the cell has none recorded.
pub const DEFAULT_MODULE_NAME: &str = "_default";
/// Default SPL2 namespace when the cell has none recorded.
pub const DEFAULT_NAMESPACE: &str = "apps.search";
/// Default earliest time when the cell has none recorded.
pub const DEFAULT_EARLIEST_TIME: &str = "-24h";
/// Default latest time when the cell has none recorded.
pub const DEFAULT_LATEST_TIME: &str = "now";

/// Cell metadata as the host editor hands it to us: a JSON object map.
pub type MetadataMap = serde_json::Map<String, Value>;

/// A single notebook cell as supplied by the invoking environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Position of the cell in its notebook, used to address metadata edits.
    pub index: usize,
    /// The cell's query text.
    pub text: String,
    /// Cell metadata (full map, including namespaces other than ours).
    #[serde(default)]
    pub metadata: MetadataMap,
    /// Outputs from previous executions, if any.
    #[serde(default)]
    pub outputs: Vec<CellOutput>,
}

/// One output attached to a cell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CellOutput {
    /// Output metadata; populated once the cell has been executed.
    #[serde(default)]
    pub metadata: Option<OutputMetadata>,
}

/// Metadata attached to a cell output by the search controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputMetadata {
    /// The search job that produced this output.
    pub job: JobInfo,
}

/// Identifying information for a dispatched search job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInfo {
    /// The job's session id.
    pub sid: String,
}

/// A stored detection, referenced when copying its query to the clipboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// The detection's SPL query text.
    pub search: String,
}

impl Cell {
    /// The sid recorded on the first output, if the cell has been executed.
    pub fn job_sid(&self) -> Option<&str> {
        self.outputs
            .first()
            .and_then(|output| output.metadata.as_ref())
            .map(|metadata| metadata.job.sid.as_str())
    }

    /// Read a string field from the `splunk` metadata namespace.
    pub fn splunk_field(&self, field: &str) -> Option<&str> {
        self.metadata
            .get(METADATA_NAMESPACE)
            .and_then(Value::as_object)
            .and_then(|splunk| splunk.get(field))
            .and_then(Value::as_str)
    }

    /// The cell's module name, or `_default` when none is recorded.
    pub fn module_name(&self) -> &str {
        self.splunk_field(FIELD_MODULE_NAME)
            .unwrap_or(DEFAULT_MODULE_NAME)
    }

    /// The cell's namespace, or `apps.search` when none is recorded.
    pub fn namespace(&self) -> &str {
        self.splunk_field(FIELD_NAMESPACE)
            .unwrap_or(DEFAULT_NAMESPACE)
    }

    /// The cell's earliest time, or `-24h` when none is recorded.
    pub fn earliest_time(&self) -> &str {
        self.splunk_field(FIELD_EARLIEST_TIME)
            .unwrap_or(DEFAULT_EARLIEST_TIME)
    }

    /// The cell's latest time, or `now` when none is recorded.
    pub fn latest_time(&self) -> &str {
        self.splunk_field(FIELD_LATEST_TIME)
            .unwrap_or(DEFAULT_LATEST_TIME)
    }
}

/// Produce the next metadata state with one `splunk` field set or cleared.
///
/// Copies the current map, ensures the `splunk` namespace object exists, then
/// sets `field` to `value` (or removes it when `value` is `None`). All other
/// fields and foreign namespaces are left untouched; the caller submits the
/// returned map as a single full metadata edit.
pub fn with_splunk_field(current: &MetadataMap, field: &str, value: Option<&str>) -> MetadataMap {
    let mut next = current.clone();

    let splunk = next
        .entry(METADATA_NAMESPACE.to_string())
        .or_insert_with(|| Value::Object(MetadataMap::new()));
    if !splunk.is_object() {
        // A foreign writer left a non-object here; replace it wholesale.
        *splunk = Value::Object(MetadataMap::new());
    }

    if let Some(splunk) = splunk.as_object_mut() {
        match value {
            Some(value) => {
                splunk.insert(field.to_string(), Value::String(value.to_string()));
            }
            None => {
                splunk.remove(field);
            }
        }
    }

    next
}
