//! Command handlers for notebook cells backed by Splunk search jobs.
//!
//! Every handler is a single request/response sequence: at most one prompt,
//! one metadata read, one metadata write, and optionally one remote call or
//! one external-resource hand-off. Failures are surfaced as a single
//! notification through the host; nothing is retried and nothing is fatal.

use crate::config::Config;
use crate::host::{EditorEnv, InputBoxOptions, NotebookHost, OutputChannel};
use crate::notebook::{
    with_splunk_field, Cell, Detection, FIELD_EARLIEST_TIME, FIELD_LATEST_TIME, FIELD_MODULE_NAME,
    FIELD_NAMESPACE, FIELD_VISUALIZATION_PREFERENCE,
};
use crate::services::splunk::SearchService;
use crate::visualizations::{preference_pick_items, REMOVE_PREFERENCE_VALUE};

/// Shown when a job-dependent command runs on a cell without job metadata.
pub const NO_JOB_MESSAGE: &str = "No job detected in cell. Please execute the cell and try again.";

/// Job search logs arrive with escaped line endings; lines are split on the
/// four-character sequence backslash-r-backslash-n, not on real CRLF.
const LOG_LINE_SEPARATOR: &str = "\\r\\n";

/// The cell's job sid, or `None` after reporting the missing-job error.
fn require_job_sid<'a>(env: &mut dyn EditorEnv, cell: &'a Cell) -> Option<&'a str> {
    match cell.job_sid() {
        Some(sid) => Some(sid),
        None => {
            env.show_error(NO_JOB_MESSAGE);
            None
        }
    }
}

/// Prompt for a value and record it as a `splunk` metadata field.
///
/// A dismissed prompt means no change; otherwise exactly the targeted field
/// is written and all other metadata is carried over unchanged.
fn record_input(
    env: &mut dyn EditorEnv,
    host: &mut dyn NotebookHost,
    cell: &Cell,
    field: &str,
    options: InputBoxOptions,
) {
    let Some(value) = env.input_box(options) else {
        return; // cancelled
    };

    let next = with_splunk_field(&cell.metadata, field, Some(&value));
    if let Err(e) = host.update_cell_metadata(cell.index, next) {
        env.show_error(&format!("Issue updating cell metadata: {e}"));
    }
}

/// Pick a visualization preference for the cell and re-run it.
///
/// "Remove Preference" clears the stored field; dismissing the picker leaves
/// the metadata untouched and skips the re-run.
pub fn add_visualization_preference(
    env: &mut dyn EditorEnv,
    host: &mut dyn NotebookHost,
    cell: &Cell,
) {
    let items = preference_pick_items();
    let Some(index) = env.quick_pick(&items) else {
        return;
    };
    let Some(item) = items.get(index) else {
        return;
    };

    let value = if item.value == REMOVE_PREFERENCE_VALUE {
        None
    } else {
        Some(item.value.as_str())
    };
    let next = with_splunk_field(&cell.metadata, FIELD_VISUALIZATION_PREFERENCE, value);

    if let Err(e) = host.update_cell_metadata(cell.index, next) {
        env.show_error(&format!("Issue updating cell metadata: {e}"));
        return;
    }
    if let Err(e) = host.run_cell(cell.index) {
        env.show_error(&format!("Issue re-running cell: {e}"));
    }
}

/// Push the cell's text to the remote SPL2 module endpoint.
pub fn update_module(env: &mut dyn EditorEnv, service: &dyn SearchService, cell: &Cell) {
    tracing::debug!(
        "Updating module {} in namespace {}",
        cell.module_name(),
        cell.namespace()
    );
    if let Err(e) = service.update_spl2_module(cell.module_name(), cell.namespace(), &cell.text) {
        env.show_error(&format!("Issue updating module: {}", e.user_message()));
    }
}

/// Prompt for and record the cell's module name.
pub fn enter_module_name(env: &mut dyn EditorEnv, host: &mut dyn NotebookHost, cell: &Cell) {
    record_input(
        env,
        host,
        cell,
        FIELD_MODULE_NAME,
        InputBoxOptions {
            title: "Module name".to_string(),
            value: cell.module_name().to_string(),
            prompt: "Module name (except for `_default` module) must start with a lowercase \
                     letter followed by digits, lowercase letters and underscore"
                .to_string(),
        },
    );
}

/// Prompt for and record the cell's namespace.
pub fn enter_namespace(env: &mut dyn EditorEnv, host: &mut dyn NotebookHost, cell: &Cell) {
    record_input(
        env,
        host,
        cell,
        FIELD_NAMESPACE,
        InputBoxOptions {
            title: "Namespace".to_string(),
            value: cell.namespace().to_string(),
            prompt: "e.g. apps.search, apps.my_app, [blank], etc".to_string(),
        },
    );
}

/// Prompt for and record the cell's earliest time.
pub fn enter_earliest_time(env: &mut dyn EditorEnv, host: &mut dyn NotebookHost, cell: &Cell) {
    record_input(
        env,
        host,
        cell,
        FIELD_EARLIEST_TIME,
        InputBoxOptions {
            title: "Earliest time".to_string(),
            value: cell.earliest_time().to_string(),
            prompt: "e.g. -24h, @d, -2d@d+2h, 1687909025".to_string(),
        },
    );
}

/// Prompt for and record the cell's latest time.
pub fn enter_latest_time(env: &mut dyn EditorEnv, host: &mut dyn NotebookHost, cell: &Cell) {
    record_input(
        env,
        host,
        cell,
        FIELD_LATEST_TIME,
        InputBoxOptions {
            title: "Latest time".to_string(),
            value: cell.latest_time().to_string(),
            prompt: "e.g. now, -24h, @d, -2d@d+2h, 1687909025".to_string(),
        },
    );
}

/// Open the job inspector page for the cell's job in a browser.
pub fn open_job_inspector(env: &mut dyn EditorEnv, config: &Config, cell: &Cell) {
    let Some(sid) = require_job_sid(env, cell) else {
        return;
    };
    let url = format!(
        "{}/en-GB/manager/search/job_inspector?sid={}",
        config.search_head_url, sid
    );
    env.open_external(&url);
}

/// Open the cell's query in the search app in a browser.
/// The query text is passed through verbatim.
pub fn open_query_in_search(env: &mut dyn EditorEnv, config: &Config, cell: &Cell) {
    let url = format!(
        "{}/en-GB/app/search/search?q={}",
        config.search_head_url, cell.text
    );
    env.open_external(&url);
}

/// Fetch the job's search log and emit it line by line to the output channel.
pub fn open_search_log(
    env: &mut dyn EditorEnv,
    output: &mut dyn OutputChannel,
    service: &dyn SearchService,
    cell: &Cell,
) {
    let Some(sid) = require_job_sid(env, cell) else {
        return;
    };

    let job = match service.job_by_sid(sid) {
        Ok(job) => job,
        Err(e) => {
            env.show_error(&format!("Issue fetching search job: {}", e.user_message()));
            return;
        }
    };
    let search_log = match service.job_search_log(&job.sid) {
        Ok(log) => log,
        Err(e) => {
            env.show_error(&format!("Issue fetching search log: {}", e.user_message()));
            return;
        }
    };

    output.clear();
    for line in search_log.split(LOG_LINE_SEPARATOR) {
        output.append_line(line);
    }
    output.show();
}

/// Copy the cell's job sid to the clipboard.
pub fn copy_job_id(env: &mut dyn EditorEnv, cell: &Cell) {
    let Some(sid) = require_job_sid(env, cell) else {
        return;
    };
    env.write_clipboard(sid);
    env.show_info("Copied Job ID to clipboard");
}

/// Copy a detection's stored query text to the clipboard, verbatim.
pub fn copy_detection(env: &mut dyn EditorEnv, detection: &Detection) {
    env.write_clipboard(&detection.search);
    env.show_info("Copied detection SPL to clipboard");
}
