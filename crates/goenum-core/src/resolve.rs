use heck::ToSnakeCase;
use indexmap::IndexMap;
use serde::Serialize;

use crate::locate::ValueSpec;

/// Value name → external representation, in declaration order.
pub type Representations = IndexMap<String, String>;

/// Which rule produced a representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Override,
    Tag,
    Derived,
}

/// A value spec together with its resolved representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub name: String,
    pub representation: String,
    pub source: Source,
}

/// Compute a representation for every spec.
///
/// Per spec, the first rule that applies wins: the override at the same
/// position, then a `json:"..."` tag in the trailing comment, then the name
/// with the type prefix removed, in snake_case.
pub fn resolve(
    specs: &[ValueSpec],
    type_name: &str,
    overrides: Option<&[String]>,
) -> Vec<Resolved> {
    specs
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let (representation, source) =
                if let Some(value) = overrides.and_then(|values| values.get(i)) {
                    (value.clone(), Source::Override)
                } else if let Some(tag) = spec.comment.as_deref().and_then(json_tag) {
                    (tag.to_string(), Source::Tag)
                } else {
                    (derive_representation(&spec.name, type_name), Source::Derived)
                };
            log::debug!("{} => {representation:?} ({source:?})", spec.name);
            Resolved {
                name: spec.name.clone(),
                representation,
                source,
            }
        })
        .collect()
}

/// Collapse resolved values into the name → representation mapping.
/// A repeated name keeps its first position and takes the later value.
pub fn to_representations(resolved: &[Resolved]) -> Representations {
    let mut map = Representations::with_capacity(resolved.len());
    for r in resolved {
        if let Some(previous) = map.insert(r.name.clone(), r.representation.clone()) {
            log::warn!(
                "`{}` declared twice; {previous:?} replaced by {:?}",
                r.name,
                r.representation
            );
        }
    }
    map
}

/// First pair of names sharing one representation, as
/// `(representation, first, second)`.
pub fn find_duplicate(map: &Representations) -> Option<(String, String, String)> {
    let mut seen: IndexMap<&str, &str> = IndexMap::new();
    for (name, representation) in map {
        if let Some(first) = seen.insert(representation.as_str(), name.as_str()) {
            return Some((representation.clone(), first.to_string(), name.clone()));
        }
    }
    None
}

/// Extract the value of a whitespace-delimited `json:"value"` token, verbatim.
///
/// An empty value counts as no tag. Tag values cannot contain whitespace.
pub fn json_tag(comment: &str) -> Option<&str> {
    comment.split_whitespace().find_map(|token| {
        let value = token.strip_prefix("json:\"")?.strip_suffix('"')?;
        (!value.is_empty()).then_some(value)
    })
}

/// `StatusActive` with type `Status` becomes `active`; acronym runs stay one
/// word (`ColorHTTPRed` → `http_red`).
pub fn derive_representation(name: &str, type_name: &str) -> String {
    let trimmed = match name.strip_prefix(type_name) {
        Some(rest) if !rest.is_empty() => rest,
        _ => name,
    };
    trimmed.to_snake_case()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, comment: Option<&str>) -> ValueSpec {
        ValueSpec {
            name: name.to_string(),
            comment: comment.map(String::from),
            line: 1,
        }
    }

    #[test]
    fn test_derive_strips_type_prefix() {
        assert_eq!(derive_representation("StatusActive", "Status"), "active");
    }

    #[test]
    fn test_derive_multi_word() {
        assert_eq!(
            derive_representation("StatusPendingReview", "Status"),
            "pending_review"
        );
    }

    #[test]
    fn test_derive_acronym_run() {
        assert_eq!(derive_representation("ProtoHTTPServer", "Proto"), "http_server");
        assert_eq!(derive_representation("CodeOK", "Code"), "ok");
    }

    #[test]
    fn test_derive_without_prefix() {
        assert_eq!(derive_representation("BigRed", "Color"), "big_red");
    }

    #[test]
    fn test_derive_name_equals_type() {
        assert_eq!(derive_representation("Color", "Color"), "color");
    }

    #[test]
    fn test_json_tag() {
        assert_eq!(json_tag("json:\"custom_name\""), Some("custom_name"));
        assert_eq!(json_tag("legacy json:\"old\" value"), Some("old"));
        assert_eq!(json_tag("json:\"name,omitempty\""), Some("name,omitempty"));
    }

    #[test]
    fn test_json_tag_rejects_malformed() {
        assert_eq!(json_tag("json:custom"), None);
        assert_eq!(json_tag("json:\"\""), None);
        assert_eq!(json_tag("json:\"split value\""), None);
        assert_eq!(json_tag("xjson:\"a\""), None);
        assert_eq!(json_tag(""), None);
    }

    #[test]
    fn test_tag_beats_derivation() {
        let resolved = resolve(&[spec("StatusActive", Some("json:\"on\""))], "Status", None);
        assert_eq!(resolved[0].representation, "on");
        assert_eq!(resolved[0].source, Source::Tag);
    }

    #[test]
    fn test_override_beats_tag() {
        let overrides = vec!["forced".to_string()];
        let resolved = resolve(
            &[spec("StatusActive", Some("json:\"on\""))],
            "Status",
            Some(overrides.as_slice()),
        );
        assert_eq!(resolved[0].representation, "forced");
        assert_eq!(resolved[0].source, Source::Override);
    }

    #[test]
    fn test_short_override_list_falls_back() {
        let overrides = vec!["one".to_string(), "two".to_string()];
        let specs = [
            spec("NumA", None),
            spec("NumB", None),
            spec("NumC", Some("json:\"three\"")),
        ];
        let resolved = resolve(&specs, "Num", Some(overrides.as_slice()));
        let values: Vec<&str> = resolved.iter().map(|r| r.representation.as_str()).collect();
        assert_eq!(values, ["one", "two", "three"]);
        assert_eq!(resolved[2].source, Source::Tag);
    }

    #[test]
    fn test_override_used_verbatim() {
        let overrides = vec!["Mixed Case!".to_string()];
        let resolved = resolve(&[spec("KindA", None)], "Kind", Some(overrides.as_slice()));
        assert_eq!(resolved[0].representation, "Mixed Case!");
    }

    #[test]
    fn test_every_spec_resolved() {
        let specs = [spec("A", None), spec("B", None), spec("C", None)];
        assert_eq!(resolve(&specs, "X", None).len(), 3);
    }

    #[test]
    fn test_representations_keep_order() {
        let specs = [spec("ColorRed", None), spec("ColorGreen", None)];
        let map = to_representations(&resolve(&specs, "Color", None));
        let entries: Vec<(&str, &str)> =
            map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(entries, [("ColorRed", "red"), ("ColorGreen", "green")]);
    }

    #[test]
    fn test_repeated_name_last_write_wins() {
        let resolved = vec![
            Resolved {
                name: "A".to_string(),
                representation: "first".to_string(),
                source: Source::Derived,
            },
            Resolved {
                name: "A".to_string(),
                representation: "second".to_string(),
                source: Source::Override,
            },
        ];
        let map = to_representations(&resolved);
        assert_eq!(map.len(), 1);
        assert_eq!(map["A"], "second");
    }

    #[test]
    fn test_find_duplicate() {
        let specs = [
            spec("ColorRed", None),
            spec("ColorCrimson", Some("json:\"red\"")),
        ];
        let map = to_representations(&resolve(&specs, "Color", None));
        assert_eq!(
            find_duplicate(&map),
            Some((
                "red".to_string(),
                "ColorRed".to_string(),
                "ColorCrimson".to_string()
            ))
        );
    }

    #[test]
    fn test_no_duplicate() {
        let specs = [spec("ColorRed", None), spec("ColorBlue", None)];
        let map = to_representations(&resolve(&specs, "Color", None));
        assert_eq!(find_duplicate(&map), None);
    }
}
