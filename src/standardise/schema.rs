//! The invoice document schema.
//!
//! [`standardise_document`] rebuilds a raw extraction into the fixed invoice
//! schema, standardising every field by its kind. The flat helpers support
//! per-field evaluation where nested records are addressed by names such as
//! `Line Items 2 Total`.

use super::{FieldKind, standardise_value};
use crate::value::{Record, Value};
use regex::Regex;
use std::sync::LazyLock;

/// Key of the line item sequence in a document.
pub const LINE_ITEMS: &str = "Line Items";

/// A document-level slot in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaField {
    Value(FieldKind),
    LineItems,
}

/// Document fields in output order.
pub const DOCUMENT_SCHEMA: [(&str, SchemaField); 21] = [
    ("Document Type", SchemaField::Value(FieldKind::Backend)),
    ("VAT", SchemaField::Value(FieldKind::Currency)),
    ("Total", SchemaField::Value(FieldKind::Currency)),
    ("VAT %", SchemaField::Value(FieldKind::Raw)),
    ("Category", SchemaField::Value(FieldKind::Backend)),
    ("Currency", SchemaField::Value(FieldKind::Raw)),
    ("Discount Total", SchemaField::Value(FieldKind::Currency)),
    ("Payment Status", SchemaField::Value(FieldKind::Backend)),
    ("Service Charge", SchemaField::Value(FieldKind::Currency)),
    ("Delivery Charge", SchemaField::Value(FieldKind::Currency)),
    ("VAT Exclusive", SchemaField::Value(FieldKind::Raw)),
    ("Supplier", SchemaField::Value(FieldKind::Raw)),
    ("Invoice ID", SchemaField::Value(FieldKind::Raw)),
    (LINE_ITEMS, SchemaField::LineItems),
    ("VAT Number", SchemaField::Value(FieldKind::Raw)),
    ("Date of Invoice", SchemaField::Value(FieldKind::Date)),
    ("Date Payment Due", SchemaField::Value(FieldKind::Date)),
    ("Supplier Address", SchemaField::Value(FieldKind::Address)),
    ("Billing Address", SchemaField::Value(FieldKind::Address)),
    ("Delivery Address", SchemaField::Value(FieldKind::Address)),
    ("Bank Details", SchemaField::Value(FieldKind::BankDetails)),
];

/// Line item fields in output order.
pub const LINE_ITEM_SCHEMA: [(&str, FieldKind); 8] = [
    ("VAT", FieldKind::Currency),
    ("VAT %", FieldKind::Raw),
    ("Total", FieldKind::Currency),
    ("Category", FieldKind::Raw),
    ("Quantity", FieldKind::Float),
    ("Discount", FieldKind::Currency),
    ("Unit price", FieldKind::Currency),
    ("Description", FieldKind::Raw),
];

/// Kinds of document-level names in flattened records.
const FLAT_DOCUMENT_KINDS: [(&str, FieldKind); 21] = [
    ("Img_path", FieldKind::String),
    ("Document Type", FieldKind::Backend),
    ("VAT", FieldKind::Currency),
    ("Total", FieldKind::Currency),
    ("VAT %", FieldKind::String),
    ("Category", FieldKind::Backend),
    ("Currency", FieldKind::String),
    ("Discount Total", FieldKind::Currency),
    ("Payment Status", FieldKind::Backend),
    ("Service Charge", FieldKind::Currency),
    ("Delivery Charge", FieldKind::Currency),
    ("Supplier", FieldKind::String),
    ("Supplier Description", FieldKind::String),
    ("Invoice ID", FieldKind::String),
    ("VAT Number", FieldKind::String),
    ("Date of Invoice", FieldKind::Date),
    ("Date Payment Due", FieldKind::Date),
    ("Supplier Address", FieldKind::Address),
    ("Billing Address", FieldKind::Address),
    ("Delivery Address", FieldKind::Address),
    ("Bank Details", FieldKind::BankDetails),
];

/// Kinds of per-item names in flattened records.
const FLAT_LINE_ITEM_KINDS: [(&str, FieldKind); 8] = [
    ("VAT", FieldKind::Currency),
    ("VAT%", FieldKind::String),
    ("VAT %", FieldKind::String),
    ("Total", FieldKind::Currency),
    ("Quantity", FieldKind::Float),
    ("Discount", FieldKind::Currency),
    ("Unit price", FieldKind::Currency),
    ("Description", FieldKind::String),
];

static FLAT_LINE_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Line Items \d+ (.+)$").expect("valid line item name regex"));

/// Rebuild a raw extraction into the invoice schema.
///
/// Missing fields are Null. A missing or malformed `Line Items` value gives an
/// empty sequence, and a line item that is not a record is read as an empty
/// one. Fields outside the schema are dropped.
pub fn standardise_document(raw: &Record) -> Record {
    DOCUMENT_SCHEMA
        .iter()
        .map(|&(key, field)| {
            let value = match field {
                SchemaField::Value(kind) => {
                    standardise_value(kind, raw.get(key).unwrap_or(&Value::Null))
                }
                SchemaField::LineItems => Value::Sequence(
                    raw.get(key)
                        .and_then(Value::as_sequence)
                        .unwrap_or_default()
                        .iter()
                        .map(|item| Value::Record(standardise_line_item(item)))
                        .collect(),
                ),
            };
            (key.to_string(), value)
        })
        .collect()
}

fn standardise_line_item(item: &Value) -> Record {
    let empty = Record::new();
    let item = item.as_record().unwrap_or(&empty);
    LINE_ITEM_SCHEMA
        .iter()
        .map(|&(key, kind)| {
            (
                key.to_string(),
                standardise_value(kind, item.get(key).unwrap_or(&Value::Null)),
            )
        })
        .collect()
}

/// Flatten a record into `"<prefix><key>"` names.
///
/// Sequence entries get a 1-based `"<key> <n> "` prefix; nested records that
/// are not inside a sequence (addresses) stay whole. Null entries are dropped.
pub fn flatten_record(record: &Record) -> Record {
    let mut flat = Record::new();
    flatten_into(record, "", &mut flat);
    flat
}

fn flatten_into(record: &Record, prefix: &str, flat: &mut Record) {
    for (key, value) in record.iter() {
        match value {
            Value::Null => {}
            Value::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    let item_prefix = format!("{}{} {}", prefix, key, i + 1);
                    match item {
                        Value::Record(inner) => flatten_into(inner, &format!("{} ", item_prefix), flat),
                        Value::Null => {}
                        scalar => {
                            flat.insert(item_prefix, scalar.clone());
                        }
                    }
                }
            }
            _ => {
                flat.insert(format!("{}{}", prefix, key), value.clone());
            }
        }
    }
}

/// Standardisation kind for a flattened field name, for any line item index.
pub fn field_kind_for(name: &str) -> Option<FieldKind> {
    match FLAT_LINE_ITEM.captures(name).and_then(|c| c.get(1)) {
        Some(field) => lookup(&FLAT_LINE_ITEM_KINDS, field.as_str()),
        None => lookup(&FLAT_DOCUMENT_KINDS, name),
    }
}

fn lookup(table: &[(&str, FieldKind)], name: &str) -> Option<FieldKind> {
    table
        .iter()
        .find(|(key, _)| *key == name)
        .map(|&(_, kind)| kind)
}

/// Standardise every entry of a flattened record by its inferred kind.
///
/// Names without a known kind pass through unchanged, except blank text which
/// becomes Null.
pub fn standardise_flat(record: &Record) -> Record {
    record
        .iter()
        .map(|(name, value)| {
            let standardised = match field_kind_for(name) {
                Some(kind) => standardise_value(kind, value),
                None if value.is_blank() => Value::Null,
                None => value.clone(),
            };
            (name.clone(), standardised)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        match Value::from(value) {
            Value::Record(record) => record,
            other => panic!("expected a record, got {}", other.kind()),
        }
    }

    #[test]
    fn test_document_schema_order_and_defaults() {
        let standardised = standardise_document(&record(json!({
            "Total": "£1,200",
            "Document Type": "Purchase Invoice",
            "Img_path": "a.png",
        })));

        let keys: Vec<_> = standardised.keys().collect();
        let expected: Vec<_> = DOCUMENT_SCHEMA.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, expected);

        assert_eq!(standardised.get("Total"), Some(&Value::from("1200.00")));
        assert_eq!(
            standardised.get("Document Type"),
            Some(&Value::from("PURCHASE_INVOICE"))
        );
        assert_eq!(standardised.get("VAT"), Some(&Value::Null));
        assert_eq!(standardised.get(LINE_ITEMS), Some(&Value::Sequence(vec![])));
        assert_eq!(standardised.get("Bank Details"), Some(&Value::Sequence(vec![])));
        assert!(!standardised.contains_key("Img_path"));
    }

    #[test]
    fn test_line_items() {
        let standardised = standardise_document(&record(json!({
            "Category": "Travel",
            "Line Items": [
                {"Total": "10", "Quantity": "2", "Category": "Fuel", "Description": "Diesel"},
                "not an item",
            ],
        })));

        let items = standardised.get(LINE_ITEMS).and_then(Value::as_sequence).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].get("Total"), Some(&Value::from("10.00")));
        assert_eq!(items[0].get("Quantity"), Some(&Value::from("2.0")));
        assert_eq!(items[0].get("Category"), Some(&Value::from("Fuel")));
        assert_eq!(items[0].get("Description"), Some(&Value::from("Diesel")));

        let second = items[1].as_record().unwrap();
        assert_eq!(second.len(), LINE_ITEM_SCHEMA.len());
        assert!(second.iter().all(|(_, v)| v.is_null()));
    }

    #[test]
    fn test_blank_fields_become_null() {
        let standardised = standardise_document(&record(json!({
            "Supplier": "",
            "Date of Invoice": "",
            "VAT Exclusive": false,
        })));
        assert_eq!(standardised.get("Supplier"), Some(&Value::Null));
        assert_eq!(standardised.get("Date of Invoice"), Some(&Value::Null));
        assert_eq!(standardised.get("VAT Exclusive"), Some(&Value::from(false)));
    }

    #[test]
    fn test_flatten_record() {
        let flat = flatten_record(&record(json!({
            "Total": "20",
            "VAT": null,
            "Line Items": [{"Total": "5"}, {"Total": "15", "VAT": null}],
            "Supplier Address": {"City": "Leeds"},
            "Tags": ["a", null],
        })));

        let names: Vec<_> = flat.keys().collect();
        assert_eq!(
            names,
            vec![
                "Total",
                "Line Items 1 Total",
                "Line Items 2 Total",
                "Supplier Address",
                "Tags 1",
            ]
        );
        assert_eq!(
            flat.get("Supplier Address").and_then(|v| v.get("City")),
            Some(&Value::from("Leeds"))
        );
    }

    #[test]
    fn test_field_kind_for_any_line_item() {
        assert_eq!(field_kind_for("Total"), Some(FieldKind::Currency));
        assert_eq!(field_kind_for("Line Items 1 Quantity"), Some(FieldKind::Float));
        assert_eq!(field_kind_for("Line Items 12 Unit price"), Some(FieldKind::Currency));
        assert_eq!(field_kind_for("Line Items 3 VAT%"), Some(FieldKind::String));
        assert_eq!(field_kind_for("Billing Address"), Some(FieldKind::Address));
        assert_eq!(field_kind_for("Line Items 1 Colour"), None);
        assert_eq!(field_kind_for("Notes"), None);
    }

    #[test]
    fn test_standardise_flat() {
        let flat = standardise_flat(&record(json!({
            "Total": "£20",
            "Supplier": "ACME Ltd",
            "Line Items 2 Quantity": "1,000",
            "Notes": "Keep",
            "Reference": "",
        })));
        assert_eq!(flat.get("Total"), Some(&Value::from("20.00")));
        assert_eq!(flat.get("Supplier"), Some(&Value::from("acme ltd")));
        assert_eq!(flat.get("Line Items 2 Quantity"), Some(&Value::from("1000.0")));
        assert_eq!(flat.get("Notes"), Some(&Value::from("Keep")));
        assert_eq!(flat.get("Reference"), Some(&Value::Null));
    }
}
