//! Visualization types offered when recording a cell's preference.

use crate::host::PickItem;

/// Value recorded in cell metadata for each visualization type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VizType {
    /// The text to display in the picker.
    pub label: &'static str,
    /// The value stored in cell metadata.
    pub value: &'static str,
}

/// Visualization types understood by the result renderer, in picker order.
pub const VIZ_TYPES: &[VizType] = &[
    VizType { label: "Events Viewer", value: "events" },
    VizType { label: "Statistics Table", value: "table" },
    VizType { label: "Line Chart", value: "line" },
    VizType { label: "Area Chart", value: "area" },
    VizType { label: "Column Chart", value: "column" },
    VizType { label: "Bar Chart", value: "bar" },
    VizType { label: "Pie Chart", value: "pie" },
    VizType { label: "Scatter Chart", value: "scatter" },
    VizType { label: "Bubble Chart", value: "bubble" },
    VizType { label: "Single Value", value: "single" },
    VizType { label: "Punchcard", value: "punchcard" },
];

/// Sentinel pick value that clears the stored preference instead of setting one.
pub const REMOVE_PREFERENCE_VALUE: &str = "remove";

/// The picker entries: every visualization type plus a trailing
/// "Remove Preference" entry.
pub fn preference_pick_items() -> Vec<PickItem> {
    let mut items: Vec<PickItem> = VIZ_TYPES
        .iter()
        .map(|viz| PickItem::new(viz.label, viz.value))
        .collect();
    items.push(PickItem::new("Remove Preference", REMOVE_PREFERENCE_VALUE));
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_entry_is_last() {
        let items = preference_pick_items();
        assert_eq!(items.len(), VIZ_TYPES.len() + 1);
        assert_eq!(items.last().unwrap().value, REMOVE_PREFERENCE_VALUE);
    }

    #[test]
    fn test_no_viz_value_collides_with_remove() {
        assert!(VIZ_TYPES.iter().all(|v| v.value != REMOVE_PREFERENCE_VALUE));
    }
}
