//! Doc comments and field attribute tags

use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ExprLit, Lit, Meta, Token};

use crate::descriptor::{path_text, token_text};
use crate::model::{TagEntry, TagInfo};

/// Joins `///` lines, dropping the single space rustdoc leaves after the slashes
pub(crate) fn doc_text(attrs: &[Attribute]) -> String {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(name_value) => string_literal(&name_value.value),
            _ => None,
        })
        .map(|line| line.strip_prefix(' ').map(str::to_string).unwrap_or(line))
        .collect();
    lines.join("\n")
}

/// Every non-doc attribute as a tag
pub(crate) fn read_tags(attrs: &[Attribute]) -> Vec<TagInfo> {
    attrs
        .iter()
        .filter(|attr| !attr.path().is_ident("doc"))
        .map(read_tag)
        .collect()
}

fn read_tag(attr: &Attribute) -> TagInfo {
    let key = path_text(attr.path());
    match &attr.meta {
        Meta::Path(_) => TagInfo {
            key,
            raw: String::new(),
            entries: Vec::new(),
        },
        Meta::NameValue(name_value) => TagInfo {
            key,
            raw: token_text(&name_value.value),
            entries: vec![TagEntry {
                name: String::new(),
                value: Some(value_text(&name_value.value)),
            }],
        },
        Meta::List(list) => {
            let raw = list.tokens.to_string();
            let entries = list
                .parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
                .map(|metas| metas.iter().map(entry_of).collect())
                .unwrap_or_default();
            TagInfo { key, raw, entries }
        }
    }
}

fn entry_of(meta: &Meta) -> TagEntry {
    match meta {
        Meta::Path(path) => TagEntry {
            name: path_text(path),
            value: None,
        },
        Meta::NameValue(name_value) => TagEntry {
            name: path_text(&name_value.path),
            value: Some(value_text(&name_value.value)),
        },
        Meta::List(list) => TagEntry {
            name: path_text(&list.path),
            value: Some(list.tokens.to_string()),
        },
    }
}

fn value_text(expr: &Expr) -> String {
    string_literal(expr).unwrap_or_else(|| token_text(expr))
}

fn string_literal(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(text),
            ..
        }) => Some(text.value()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_attrs(source: &str) -> Vec<Attribute> {
        let item: syn::ItemStruct = syn::parse_str(source).unwrap();
        match item.fields {
            syn::Fields::Named(named) => named.named.into_iter().next().unwrap().attrs,
            _ => panic!("expected named fields"),
        }
    }

    #[test]
    fn test_list_attribute_entries() {
        let attrs = field_attrs(
            r#"struct S {
                /// The identifier
                #[serde(rename = "id", default)]
                id: u64,
            }"#,
        );
        assert_eq!(doc_text(&attrs), "The identifier");

        let tags = read_tags(&attrs);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].key, "serde");
        assert_eq!(tags[0].entries.len(), 2);
        assert_eq!(tags[0].entries[0].name, "rename");
        assert_eq!(tags[0].entries[0].value.as_deref(), Some("id"));
        assert_eq!(tags[0].entries[1].name, "default");
        assert_eq!(tags[0].entries[1].value, None);
        assert_eq!(tags[0].get("rename"), Some("id"));
        assert!(tags[0].has("default"));
    }

    #[test]
    fn test_name_value_and_path_attributes() {
        let attrs = field_attrs(
            r#"struct S {
                #[column = "user_name"]
                #[skip]
                name: String,
            }"#,
        );
        let tags = read_tags(&attrs);
        assert_eq!(tags[0].key, "column");
        assert_eq!(tags[0].entries[0].name, "");
        assert_eq!(tags[0].entries[0].value.as_deref(), Some("user_name"));
        assert_eq!(tags[1].key, "skip");
        assert!(tags[1].entries.is_empty());
    }

    #[test]
    fn test_unparseable_arguments_keep_raw_text() {
        let attrs = field_attrs(
            r#"struct S {
                #[validate(length > 3)]
                name: String,
            }"#,
        );
        let tags = read_tags(&attrs);
        assert_eq!(tags[0].key, "validate");
        assert!(tags[0].entries.is_empty());
        assert!(tags[0].raw.contains("length"));
    }
}
