//! Localization override merge
//!
//! Scans the localization metadata attached to the process root, to
//! user-task and sub-process elements (recursing into nested
//! sub-processes) and to data-object declarations, and layers the values
//! into the definition's override blob. Only differing properties are
//! written; the caller saves the blob once, only when something changed.
//! Entries without a locale or a name are malformed and skipped.

use serde_json::{Map, Value};
use weft_types::{DataObject, ElementKind, FlowElement, LocalizationEntry, ProcessModel};

const LOCALIZATION_KEY: &str = "localization";
const NAME_PROPERTY: &str = "name";
const DESCRIPTION_PROPERTY: &str = "description";

/// Merge a model's localization metadata into the override blob.
/// Returns whether the blob changed.
pub fn merge_localizations(model: &ProcessModel, blob: &mut Value) -> bool {
    let mut changed = apply_entries(&model.localizations, &model.process_id, blob);
    changed |= localize_elements(&model.elements, blob);
    changed |= localize_data_objects(&model.data_objects, blob);
    changed
}

fn localize_elements(elements: &[FlowElement], blob: &mut Value) -> bool {
    let mut changed = false;
    for element in elements {
        match &element.kind {
            ElementKind::Task => {
                changed |= apply_entries(&element.localizations, &element.id, blob);
            }
            ElementKind::SubProcess {
                elements: nested,
                data_objects,
            } => {
                changed |= apply_entries(&element.localizations, &element.id, blob);
                changed |= localize_elements(nested, blob);
                changed |= localize_data_objects(data_objects, blob);
            }
            ElementKind::Other => {}
        }
    }
    changed
}

fn localize_data_objects(data_objects: &[DataObject], blob: &mut Value) -> bool {
    let mut changed = false;
    for data_object in data_objects {
        changed |= apply_entries(&data_object.localizations, &data_object.id, blob);
    }
    changed
}

fn apply_entries(entries: &[LocalizationEntry], element_id: &str, blob: &mut Value) -> bool {
    let mut changed = false;
    for entry in entries {
        let (Some(locale), Some(name)) = (entry.locale.as_deref(), entry.name.as_deref()) else {
            // Malformed entry: skipped, never fatal.
            continue;
        };
        changed |= set_if_differs(blob, locale, element_id, NAME_PROPERTY, name);

        let description = entry
            .documentation
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty());
        if let Some(description) = description {
            changed |= set_if_differs(blob, locale, element_id, DESCRIPTION_PROPERTY, description);
        }
    }
    changed
}

/// Write one (locale, element, property) value if it differs from what is
/// stored, creating intermediate objects as needed.
fn set_if_differs(blob: &mut Value, locale: &str, element_id: &str, property: &str, value: &str) -> bool {
    let current = blob
        .get(LOCALIZATION_KEY)
        .and_then(|node| node.get(locale))
        .and_then(|node| node.get(element_id))
        .and_then(|node| node.get(property))
        .and_then(Value::as_str);
    if current == Some(value) {
        return false;
    }

    let mut node = ensure_object(blob);
    for key in [LOCALIZATION_KEY, locale, element_id] {
        let slot = node.entry(key.to_string()).or_insert(Value::Null);
        node = ensure_object(slot);
    }
    node.insert(property.to_string(), Value::String(value.to_string()));
    true
}

fn ensure_object(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just made an object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn localized_model() -> ProcessModel {
        let mut model = ProcessModel::new("order");
        model.localizations.push(
            LocalizationEntry::new("de", "Bestellung").with_documentation("  Auftragsabwicklung  "),
        );
        model.elements.push(
            FlowElement::task("approve").with_localization(LocalizationEntry::new("de", "Freigeben")),
        );
        model
    }

    #[test]
    fn merge_writes_names_and_trimmed_descriptions() {
        let mut blob = json!({});
        let changed = merge_localizations(&localized_model(), &mut blob);

        assert!(changed);
        assert_eq!(
            blob["localization"]["de"]["order"]["name"],
            json!("Bestellung")
        );
        assert_eq!(
            blob["localization"]["de"]["order"]["description"],
            json!("Auftragsabwicklung")
        );
        assert_eq!(
            blob["localization"]["de"]["approve"]["name"],
            json!("Freigeben")
        );
    }

    #[test]
    fn merge_is_idempotent_on_unchanged_metadata() {
        let model = localized_model();
        let mut blob = json!({});
        assert!(merge_localizations(&model, &mut blob));
        // Second merge finds every value already stored.
        assert!(!merge_localizations(&model, &mut blob));
    }

    #[test]
    fn differing_stored_value_is_overwritten() {
        let model = localized_model();
        let mut blob = json!({
            "localization": { "de": { "order": { "name": "Alt" } } }
        });
        assert!(merge_localizations(&model, &mut blob));
        assert_eq!(
            blob["localization"]["de"]["order"]["name"],
            json!("Bestellung")
        );
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let mut model = ProcessModel::new("order");
        // No locale.
        model.localizations.push(LocalizationEntry {
            locale: None,
            name: Some("Bestellung".into()),
            documentation: None,
        });
        // No name.
        model.localizations.push(LocalizationEntry {
            locale: Some("de".into()),
            name: None,
            documentation: Some("text".into()),
        });

        let mut blob = json!({});
        assert!(!merge_localizations(&model, &mut blob));
        assert_eq!(blob, json!({}));
    }

    #[test]
    fn nested_sub_processes_are_visited() {
        let mut model = ProcessModel::new("order");
        let inner_task =
            FlowElement::task("sign").with_localization(LocalizationEntry::new("de", "Signieren"));
        let mut data_object = DataObject::new("doc");
        data_object
            .localizations
            .push(LocalizationEntry::new("de", "Dokument"));
        let inner = FlowElement::sub_process("inner", vec![inner_task], vec![data_object]);
        model
            .elements
            .push(FlowElement::sub_process("outer", vec![inner], vec![]));

        let mut blob = json!({});
        assert!(merge_localizations(&model, &mut blob));
        assert_eq!(
            blob["localization"]["de"]["sign"]["name"],
            json!("Signieren")
        );
        assert_eq!(
            blob["localization"]["de"]["doc"]["name"],
            json!("Dokument")
        );
    }

    #[test]
    fn gateway_elements_carry_no_localization() {
        let mut model = ProcessModel::new("order");
        model.elements.push(
            FlowElement::other("gateway")
                .with_localization(LocalizationEntry::new("de", "Weiche")),
        );
        let mut blob = json!({});
        assert!(!merge_localizations(&model, &mut blob));
    }
}
