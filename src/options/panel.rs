//! Parameter-panel bridge.
//!
//! The panel renders controls from a JSON schema and reports edits as
//! `(section, field, value)` triples. The schema is re-derived whenever the
//! loaded dataset or the dataset selection changes so the slice slider and
//! the dependent choice lists stay in range.

use serde_json::Value;

use super::Options;
use crate::error::DccmError;

/// Schema for the panel given the currently loaded slice count.
///
/// `selected_slice` is bounded to `-1..=num_slices-1` (just `-1` while no
/// dataset is loaded) and the dataset selectors list only the choices
/// valid under the current selection.
#[must_use]
pub fn panel_schema(options: &Options, num_slices: Option<usize>) -> Value {
    let mut schema =
        serde_json::to_value(Options::json_schema()).unwrap_or(Value::Null);

    let max_slice = num_slices.map_or(-1, |n| n as i64 - 1);
    if let Some(slider) =
        schema.pointer_mut("/properties/filter/properties/selected_slice")
    {
        slider["minimum"] = Value::from(-1);
        slider["maximum"] = Value::from(max_slice);
    }

    let catalog = &options.data.catalog;
    let key = &options.data.dataset;
    let choices = [
        ("simulation", catalog.simulations()),
        ("replica", catalog.replicas(&key.simulation)),
        (
            "file_variant",
            catalog.variants(&key.simulation, &key.replica),
        ),
    ];
    for (field, list) in choices {
        let pointer =
            format!("/properties/data/properties/dataset/properties/{field}");
        if let Some(select) = schema.pointer_mut(&pointer) {
            select["enum"] = Value::from(list);
        }
    }

    schema
}

/// Apply one panel edit and return the resulting options.
///
/// Dataset selector edits are normalized against the catalog so a changed
/// simulation never leaves an unavailable replica or variant behind.
///
/// # Errors
///
/// [`DccmError::OptionsParse`] for an unknown field or a value of the
/// wrong type.
pub fn apply_edit(
    options: &Options,
    section: &str,
    field: &str,
    value: Value,
) -> Result<Options, DccmError> {
    let mut tree = serde_json::to_value(options)
        .map_err(|e| DccmError::OptionsParse(e.to_string()))?;

    let pointer = if section == "dataset" {
        format!("/data/dataset/{field}")
    } else {
        format!("/{section}/{field}")
    };
    let Some(slot) = tree.pointer_mut(&pointer) else {
        return Err(DccmError::OptionsParse(format!(
            "unknown option {section}.{field}"
        )));
    };
    *slot = value;

    let mut next: Options = serde_json::from_value(tree)
        .map_err(|e| DccmError::OptionsParse(e.to_string()))?;
    if let Some(key) = next.data.catalog.normalize(&next.data.dataset) {
        next.data.dataset = key;
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::options::DatasetKey;

    #[test]
    fn slice_slider_tracks_dataset() {
        let opts = Options::default();
        let schema = panel_schema(&opts, Some(12));
        let slider = &schema["properties"]["filter"]["properties"]["selected_slice"];
        assert_eq!(slider["minimum"], -1);
        assert_eq!(slider["maximum"], 11);

        let schema = panel_schema(&opts, None);
        let slider = &schema["properties"]["filter"]["properties"]["selected_slice"];
        assert_eq!(slider["maximum"], -1);
    }

    #[test]
    fn dataset_selectors_list_choices() {
        let opts = Options::default();
        let schema = panel_schema(&opts, None);
        let key = &schema["properties"]["data"]["properties"]["dataset"]["properties"];
        assert_eq!(key["simulation"]["enum"].as_array().unwrap().len(), 6);
        assert_eq!(key["replica"]["enum"], json!(["1", "2", "3", "4", "5"]));
        assert_eq!(key["file_variant"]["enum"][6], "1600");
    }

    #[test]
    fn threshold_edit() {
        let opts = Options::default();
        let next =
            apply_edit(&opts, "filter", "positive_threshold", json!(0.75)).unwrap();
        assert_eq!(next.filter.positive_threshold, 0.75);
        assert!(opts.change_to(&next).visuals);
        assert!(!opts.change_to(&next).dataset);
    }

    #[test]
    fn dataset_edit_is_normalized() {
        let mut opts = Options::default();
        opts.data.catalog.simulations[1].replicas.truncate(2);
        opts.data.dataset = DatasetKey::new("wt", "4", "50");

        let next =
            apply_edit(&opts, "dataset", "simulation", json!("wt_lig")).unwrap();
        assert_eq!(next.data.dataset, DatasetKey::new("wt_lig", "1", "50"));
        assert!(opts.change_to(&next).dataset);
    }

    #[test]
    fn unknown_fields_and_bad_values_are_errors() {
        let opts = Options::default();
        assert!(apply_edit(&opts, "filter", "nope", json!(1)).is_err());
        assert!(
            apply_edit(&opts, "filter", "selected_slice", json!("two")).is_err()
        );
    }
}
