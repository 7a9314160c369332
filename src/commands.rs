//! Command surface for notebook cells: descriptors and dispatch.
//!
//! The embedding editor registers these ids and invokes `execute_command`
//! with the contextual argument (a cell or a detection) when the user
//! triggers one.

use crate::config::Config;
use crate::handlers;
use crate::host::{EditorEnv, NotebookHost, OutputChannel};
use crate::notebook::{Cell, Detection};
use crate::services::splunk::SearchService;

/// A command that the host editor can register and invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    /// Stable id the editor invokes (e.g. "notebooks.copyJobIdToClipboard")
    pub id: &'static str,
    /// Human-readable title for menus and palettes
    pub title: &'static str,
    /// One-line description
    pub description: &'static str,
}

pub const ADD_VISUALIZATION_PREFERENCE: &str = "notebooks.addVisualizationPreference";
pub const UPDATE_MODULE: &str = "notebooks.updateModule";
pub const ENTER_MODULE_NAME: &str = "notebooks.enterModuleName";
pub const ENTER_NAMESPACE: &str = "notebooks.enterNamespace";
pub const ENTER_EARLIEST_TIME: &str = "notebooks.enterEarliestTime";
pub const ENTER_LATEST_TIME: &str = "notebooks.enterLatestTime";
pub const OPEN_JOB_INSPECTOR: &str = "notebooks.openJobInspector";
pub const OPEN_QUERY_IN_SEARCH: &str = "notebooks.openQueryInSearch";
pub const OPEN_SEARCH_LOG: &str = "notebooks.openSearchLog";
pub const COPY_JOB_ID: &str = "notebooks.copyJobIdToClipboard";
pub const COPY_DETECTION: &str = "notebooks.copyDetection";

/// All commands this crate provides, in registration order
pub fn all_commands() -> Vec<Command> {
    vec![
        Command {
            id: ADD_VISUALIZATION_PREFERENCE,
            title: "Add Visualization Preference",
            description: "Pick the visualization used when rendering this cell's results",
        },
        Command {
            id: UPDATE_MODULE,
            title: "Update Module",
            description: "Push the cell's SPL2 text to the configured module",
        },
        Command {
            id: ENTER_MODULE_NAME,
            title: "Enter Module Name",
            description: "Record the SPL2 module name on the cell",
        },
        Command {
            id: ENTER_NAMESPACE,
            title: "Enter Namespace",
            description: "Record the SPL2 namespace on the cell",
        },
        Command {
            id: ENTER_EARLIEST_TIME,
            title: "Enter Earliest Time",
            description: "Record the search earliest time on the cell",
        },
        Command {
            id: ENTER_LATEST_TIME,
            title: "Enter Latest Time",
            description: "Record the search latest time on the cell",
        },
        Command {
            id: OPEN_JOB_INSPECTOR,
            title: "Open Job Inspector",
            description: "Open the job inspector for the cell's job in a browser",
        },
        Command {
            id: OPEN_QUERY_IN_SEARCH,
            title: "Open Query in Search",
            description: "Open the cell's query in the search app in a browser",
        },
        Command {
            id: OPEN_SEARCH_LOG,
            title: "Open Search Log",
            description: "Fetch the job's search log into the output channel",
        },
        Command {
            id: COPY_JOB_ID,
            title: "Copy Job ID",
            description: "Copy the cell's job sid to the clipboard",
        },
        Command {
            id: COPY_DETECTION,
            title: "Copy Detection",
            description: "Copy a detection's SPL to the clipboard",
        },
    ]
}

/// The contextual argument the invoking environment supplies with a command.
#[derive(Debug, Clone, Copy)]
pub enum CommandTarget<'a> {
    Cell(&'a Cell),
    Detection(&'a Detection),
}

/// Everything a command needs from its surroundings.
pub struct CommandContext<'a> {
    pub env: &'a mut dyn EditorEnv,
    pub host: &'a mut dyn NotebookHost,
    pub output: &'a mut dyn OutputChannel,
    pub service: &'a dyn SearchService,
    pub config: &'a Config,
}

/// Route a command id to its handler.
///
/// Returns `Err` only for invocation mistakes (unknown id, wrong target
/// kind); handler-level failures are surfaced through the editor environment
/// and are not errors here.
pub fn execute_command(
    id: &str,
    target: CommandTarget<'_>,
    ctx: &mut CommandContext<'_>,
) -> Result<(), String> {
    tracing::debug!("Executing notebook command {}", id);

    if id == COPY_DETECTION {
        let CommandTarget::Detection(detection) = target else {
            return Err(format!("Command {id} expects a detection"));
        };
        handlers::copy_detection(ctx.env, detection);
        return Ok(());
    }

    let CommandTarget::Cell(cell) = target else {
        return Err(format!("Command {id} expects a cell"));
    };

    match id {
        ADD_VISUALIZATION_PREFERENCE => {
            handlers::add_visualization_preference(ctx.env, ctx.host, cell)
        }
        UPDATE_MODULE => handlers::update_module(ctx.env, ctx.service, cell),
        ENTER_MODULE_NAME => handlers::enter_module_name(ctx.env, ctx.host, cell),
        ENTER_NAMESPACE => handlers::enter_namespace(ctx.env, ctx.host, cell),
        ENTER_EARLIEST_TIME => handlers::enter_earliest_time(ctx.env, ctx.host, cell),
        ENTER_LATEST_TIME => handlers::enter_latest_time(ctx.env, ctx.host, cell),
        OPEN_JOB_INSPECTOR => handlers::open_job_inspector(ctx.env, ctx.config, cell),
        OPEN_QUERY_IN_SEARCH => handlers::open_query_in_search(ctx.env, ctx.config, cell),
        OPEN_SEARCH_LOG => handlers::open_search_log(ctx.env, ctx.output, ctx.service, cell),
        COPY_JOB_ID => handlers::copy_job_id(ctx.env, cell),
        unknown => return Err(format!("Unknown notebook command: {unknown}")),
    }

    Ok(())
}
