//! Declarative page maps: building [`SectionDef`] registries from untyped
//! JSON or YAML documents.
//!
//! A document is a section mapping:
//!
//! ```yaml
//! name: LoginPage
//! locator: { strategy: css, value: "form#login" }
//! fields:
//!   username:
//!     leaf: input
//!     locator: { strategy: css, value: "input[name=username]" }
//!   badge:
//!     section:
//!       name: Badge
//!       locator: { strategy: css, value: ".badge" }
//!     search_with_driver: true
//! ```
//!
//! Documents are untyped, so this is where runtime type validation lives:
//! a `locator` value that is not a locator mapping fails with
//! [`PageError::InvalidLocator`] naming the value's runtime type, and a
//! non-boolean `search_with_driver` fails with [`PageError::FlagType`].
//! Everything structural feeds through the same [`SectionDef::builder`]
//! validation as hand-written declarations.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::fields::{FieldDecl, LeafKind, SectionDef};
use crate::locator::Locator;
use crate::result::{PageError, PageResult};

/// Runtime type name of an untyped document value, as it appears in error
/// messages. `null` reads as `NoneType` to match the "nothing supplied"
/// wording of declaration errors.
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(number) => {
            if number.is_f64() {
                "float"
            } else {
                "int"
            }
        }
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

impl SectionDef {
    /// Build a section definition from a YAML document
    pub fn from_yaml(document: &str) -> PageResult<Arc<SectionDef>> {
        let value: Value =
            serde_yaml_ng::from_str(document).map_err(|err| PageError::Document {
                message: err.to_string(),
            })?;
        Self::from_json(&value)
    }

    /// Build a section definition from an untyped JSON value
    pub fn from_json(value: &Value) -> PageResult<Arc<SectionDef>> {
        parse_section(value)
    }
}

fn parse_section(value: &Value) -> PageResult<Arc<SectionDef>> {
    let entries = value.as_object().ok_or_else(|| PageError::Document {
        message: format!(
            "section definition must be a mapping, got `{}`",
            value_type_name(value)
        ),
    })?;

    let name = match entries.get("name") {
        None => "Section",
        Some(Value::String(name)) => name.as_str(),
        Some(other) => {
            return Err(PageError::Document {
                message: format!("`name` must be a string, got `{}`", value_type_name(other)),
            })
        }
    };

    let mut builder = SectionDef::builder(name);
    if let Some(locator) = entries.get("locator") {
        builder = builder.locator(parse_locator(locator)?);
    }
    if let Some(stop) = parse_flag(entries, "stop_propagation")? {
        builder = builder.stop_propagation(stop);
    }
    if let Some(escape) = parse_flag(entries, "search_with_driver")? {
        builder = builder.search_with_driver(escape);
    }

    if let Some(fields) = entries.get("fields") {
        let fields = fields.as_object().ok_or_else(|| PageError::Document {
            message: format!("`fields` must be a mapping, got `{}`", value_type_name(fields)),
        })?;
        for (field_name, spec) in fields {
            builder = builder.field(field_name, parse_field(field_name, spec)?);
        }
    }

    builder.build()
}

fn parse_field(name: &str, value: &Value) -> PageResult<FieldDecl> {
    let entries = value.as_object().ok_or_else(|| PageError::Document {
        message: format!(
            "field `{name}` must be a mapping, got `{}`",
            value_type_name(value)
        ),
    })?;

    let mut decl = match (
        entries.get("leaf"),
        entries.get("section"),
        entries.get("collection"),
    ) {
        (Some(kind), None, None) => {
            let kind_name = kind.as_str().ok_or_else(|| PageError::Document {
                message: format!(
                    "field `{name}`: `leaf` must be a string, got `{}`",
                    value_type_name(kind)
                ),
            })?;
            let kind = LeafKind::parse(kind_name).ok_or_else(|| PageError::Document {
                message: format!("field `{name}`: unknown leaf kind `{kind_name}`"),
            })?;
            FieldDecl::leaf(kind)
        }
        (None, Some(section), None) => FieldDecl::section(&parse_section(section)?),
        (None, None, Some(collection)) => FieldDecl::collection(&parse_section(collection)?),
        _ => {
            return Err(PageError::Document {
                message: format!(
                    "field `{name}` must declare exactly one of `leaf`, `section`, `collection`"
                ),
            })
        }
    };

    if let Some(locator) = entries.get("locator") {
        decl = decl.with_locator(parse_locator(locator)?);
    }
    if let Some(escape) = parse_flag(entries, "search_with_driver")? {
        decl = decl.search_with_driver(escape);
    }
    Ok(decl)
}

fn parse_locator(value: &Value) -> PageResult<Locator> {
    serde_json::from_value(value.clone()).map_err(|_| PageError::InvalidLocator {
        got: value_type_name(value).to_string(),
    })
}

fn parse_flag(entries: &Map<String, Value>, flag: &str) -> PageResult<Option<bool>> {
    match entries.get(flag) {
        None => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(other) => Err(PageError::FlagType {
            flag: flag.to_string(),
            got: value_type_name(other).to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FieldKind, ScopePolicy};
    use serde_json::json;

    const LOGIN_PAGE: &str = r#"
name: LoginPage
locator: { strategy: css, value: "form#login" }
fields:
  username:
    leaf: input
    locator: { strategy: css, value: "input[name=username]" }
  remember_me:
    leaf: checkbox
    locator: { strategy: css, value: "input[name=remember]" }
  badge:
    section:
      name: Badge
      locator: { strategy: css, value: ".badge" }
    search_with_driver: true
  errors:
    collection:
      name: ErrorLine
      locator: { strategy: css, value: ".error" }
"#;

    mod document_tests {
        use super::*;

        #[test]
        fn full_page_document_loads() {
            let page = SectionDef::from_yaml(LOGIN_PAGE).unwrap();
            assert_eq!(page.name(), "LoginPage");
            assert_eq!(page.default_locator(), Some(&Locator::css("form#login")));

            let username = page.field("username").unwrap();
            assert!(matches!(username.kind, FieldKind::Leaf(LeafKind::Input)));
            assert_eq!(username.locator, Locator::css("input[name=username]"));

            let badge = page.field("badge").unwrap();
            assert_eq!(badge.scope, ScopePolicy::ForceSession);
            assert_eq!(badge.locator, Locator::css(".badge"));
            assert!(matches!(&badge.kind, FieldKind::Section(def) if def.name() == "Badge"));

            let errors = page.field("errors").unwrap();
            assert!(matches!(errors.kind, FieldKind::Collection(_)));
        }

        #[test]
        fn json_documents_load_too() {
            let page = SectionDef::from_json(&json!({
                "name": "Page",
                "fields": {
                    "note": {"leaf": "text", "locator": {"strategy": "xpath", "value": "//p"}},
                },
            }))
            .unwrap();
            assert_eq!(page.field("note").unwrap().locator, Locator::xpath("//p"));
        }

        #[test]
        fn stop_propagation_flag_is_honored() {
            let page = SectionDef::from_json(&json!({
                "name": "Capped",
                "stop_propagation": true,
            }))
            .unwrap();
            assert!(page.stop_propagation());
        }

        #[test]
        fn malformed_yaml_is_a_document_error() {
            assert!(matches!(
                SectionDef::from_yaml(": not yaml"),
                Err(PageError::Document { .. })
            ));
        }

        #[test]
        fn field_must_declare_exactly_one_kind() {
            let err = SectionDef::from_json(&json!({
                "fields": {"x": {"locator": {"strategy": "css", "value": "x"}}},
            }))
            .unwrap_err();
            assert!(matches!(err, PageError::Document { .. }));
        }

        #[test]
        fn unknown_leaf_kind_is_rejected() {
            let err = SectionDef::from_json(&json!({
                "fields": {"x": {"leaf": "dropdown"}},
            }))
            .unwrap_err();
            assert!(matches!(err, PageError::Document { .. }));
        }
    }

    mod locator_validation_tests {
        use super::*;

        fn page_with_locator(locator: Value) -> PageError {
            SectionDef::from_json(&json!({
                "fields": {"x": {"leaf": "input", "locator": locator}},
            }))
            .unwrap_err()
        }

        #[test]
        fn string_locator_names_str() {
            let err = page_with_locator(json!("form#login"));
            assert_eq!(
                err.to_string(),
                "`locator` must be instance of class `Locator`, got `str`"
            );
        }

        #[test]
        fn integer_locator_names_int() {
            let err = page_with_locator(json!(3));
            assert!(matches!(err, PageError::InvalidLocator { got } if got == "int"));
        }

        #[test]
        fn float_locator_names_float() {
            let err = page_with_locator(json!(3.5));
            assert!(matches!(err, PageError::InvalidLocator { got } if got == "float"));
        }

        #[test]
        fn list_locator_names_list() {
            let err = page_with_locator(json!(["css", "x"]));
            assert!(matches!(err, PageError::InvalidLocator { got } if got == "list"));
        }

        #[test]
        fn null_locator_names_none_type() {
            let err = page_with_locator(Value::Null);
            assert!(matches!(err, PageError::InvalidLocator { got } if got == "NoneType"));
        }

        #[test]
        fn malformed_locator_mapping_names_dict() {
            let err = page_with_locator(json!({"strategy": "magic", "value": "x"}));
            assert!(matches!(err, PageError::InvalidLocator { got } if got == "dict"));
        }

        #[test]
        fn missing_locator_everywhere_names_none_type() {
            let err = SectionDef::from_json(&json!({
                "fields": {"x": {"leaf": "input"}},
            }))
            .unwrap_err();
            assert_eq!(
                err.to_string(),
                "`locator` must be instance of class `Locator`, got `NoneType`"
            );
        }
    }

    mod flag_validation_tests {
        use super::*;

        #[test]
        fn null_search_with_driver_names_none_type() {
            let err = SectionDef::from_json(&json!({
                "search_with_driver": null,
            }))
            .unwrap_err();
            assert_eq!(
                err.to_string(),
                "`search_with_driver` must be of `bool` type, got `NoneType`"
            );
        }

        #[test]
        fn string_search_with_driver_names_str() {
            let err = SectionDef::from_json(&json!({
                "fields": {"x": {
                    "leaf": "input",
                    "locator": {"strategy": "css", "value": "x"},
                    "search_with_driver": "yes",
                }},
            }))
            .unwrap_err();
            assert!(matches!(err, PageError::FlagType { got, .. } if got == "str"));
        }

        #[test]
        fn non_bool_stop_propagation_is_rejected() {
            let err = SectionDef::from_json(&json!({
                "stop_propagation": 1,
            }))
            .unwrap_err();
            assert!(matches!(err, PageError::FlagType { got, .. } if got == "int"));
        }
    }

    #[test]
    fn reserved_names_are_rejected_from_documents_too() {
        let err = SectionDef::from_json(&json!({
            "fields": {"handle": {"leaf": "input", "locator": {"strategy": "css", "value": "x"}}},
        }))
        .unwrap_err();
        assert!(matches!(err, PageError::AttributeNotPermitted { .. }));
    }

    #[test]
    fn type_name_covers_every_value_shape() {
        assert_eq!(value_type_name(&Value::Null), "NoneType");
        assert_eq!(value_type_name(&json!(true)), "bool");
        assert_eq!(value_type_name(&json!(1)), "int");
        assert_eq!(value_type_name(&json!(1.5)), "float");
        assert_eq!(value_type_name(&json!("s")), "str");
        assert_eq!(value_type_name(&json!([])), "list");
        assert_eq!(value_type_name(&json!({})), "dict");
    }
}
