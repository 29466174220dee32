//! Property-based tests for the package model
//!
//! Field order, method attachment and reference resolution must not depend on
//! the order declarations appear in.

use proptest::prelude::*;
use stroo_model::{
    ModelError, PackageBuilder, PackageModel, ReaderOptions, SourcePackage, TypeDescriptor,
    TypeKind, Wrapper,
};

fn field_names_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z][a-z0-9]{0,6}", 1..10)
        .prop_map(|names| names.into_iter().map(|n| format!("f_{}", n)).collect::<Vec<_>>())
        .prop_flat_map(|names| Just(names).prop_shuffle())
}

fn method_names_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{1,6}", 1..6)
        .prop_map(|names| names.into_iter().map(|n| format!("do_{}", n)).collect::<Vec<_>>())
        .prop_flat_map(|names| Just(names).prop_shuffle())
}

fn build(source: &str) -> Result<PackageModel, ModelError> {
    SourcePackage::from_source("sample", source)?.build_model(&ReaderOptions::default())
}

proptest! {
    /// Every declared field appears exactly once, in declaration order
    #[test]
    fn prop_struct_fields_preserve_declaration_order(names in field_names_strategy()) {
        let body: Vec<String> = names.iter().map(|n| format!("pub {}: u32,", n)).collect();
        let source = format!("pub struct Record {{ {} }}", body.join(" "));

        let model = build(&source).unwrap();
        let record = model.type_by_name("Record").unwrap();
        let read: Vec<_> = record.fields.iter().map(|f| f.name.clone()).collect();
        prop_assert_eq!(read, names);
    }

    /// Methods attach in declaration order whether the impl comes before or after the type
    #[test]
    fn prop_method_attachment_is_order_independent(names in method_names_strategy()) {
        let methods: Vec<String> = names.iter().map(|n| format!("pub fn {}(&self) {{}}", n)).collect();
        let impl_block = format!("impl Service {{ {} }}", methods.join(" "));
        let declaration = "pub struct Service { pub id: u64 }";

        let before = build(&format!("{} {}", impl_block, declaration)).unwrap();
        let after = build(&format!("{} {}", declaration, impl_block)).unwrap();

        let method_names = |model: &PackageModel| -> Vec<String> {
            let service = model.type_by_name("Service").unwrap();
            model.methods_of(service).map(|f| f.name.clone()).collect()
        };
        prop_assert_eq!(method_names(&before), names.clone());
        prop_assert_eq!(method_names(&after), names);
        prop_assert!(!before.type_by_name("Service").unwrap().placeholder);
    }

    /// Struct declaration order does not change which references resolve
    #[test]
    fn prop_forward_references_resolve(swap in any::<bool>()) {
        let parent = "pub struct Parent { pub child: Child, pub children: Vec<Child> }";
        let child = "pub struct Child { pub value: i64 }";
        let source = if swap {
            format!("{} {}", child, parent)
        } else {
            format!("{} {}", parent, child)
        };
        let model = build(&source).unwrap();
        let child_id = model.type_by_name("Child").unwrap().id;
        let parent = model.type_by_name("Parent").unwrap();
        match &parent.fields[0].ty {
            TypeDescriptor::Named { target, .. } => prop_assert_eq!(*target, Some(child_id)),
            other => prop_assert!(false, "unexpected descriptor {:?}", other),
        }
    }
}

#[test]
fn test_dangling_reference_fails_resolution() {
    let err = build("pub struct Order { pub customer: Customer }").unwrap_err();
    match err {
        ModelError::Resolution(issues) => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].owner, "Order");
            assert_eq!(issues[0].reference, "Customer");
            assert_eq!(issues[0].location, "field `customer`");
        }
        other => panic!("expected a resolution error, got {other}"),
    }
}

#[test]
fn test_self_referential_type_resolves() {
    let model = build(
        r#"
        pub struct Node {
            pub value: i32,
            pub next: Option<Box<Node>>,
            pub children: Vec<Self>,
        }
        "#,
    )
    .unwrap();
    let node = model.type_by_name("Node").unwrap();
    match &node.fields[1].ty {
        TypeDescriptor::Wrapped {
            wrapper: Wrapper::Option,
            inner,
        } => match inner.as_ref() {
            TypeDescriptor::Wrapped {
                wrapper: Wrapper::Box,
                inner,
            } => assert!(matches!(
                inner.as_ref(),
                TypeDescriptor::Named { target: Some(id), .. } if *id == node.id
            )),
            other => panic!("unexpected descriptor {other:?}"),
        },
        other => panic!("unexpected descriptor {other:?}"),
    }
    assert_eq!(node.fields[2].ty.to_string(), "Vec<Node>");
}

#[test]
fn test_mutually_referential_types_resolve() {
    let model = build(
        r#"
        pub struct Author { pub books: Vec<Book> }
        pub struct Book { pub author: std::sync::Weak<Author> }
        "#,
    )
    .unwrap();
    assert_eq!(model.types().len(), 2);
    let book = model.type_by_name("Book").unwrap();
    assert_eq!(book.fields[0].ty.core_name(), Some("Author"));
}

#[test]
fn test_builder_read_order_matches_model_order() {
    let file = syn::parse_file(
        r#"
        pub type Ids = Vec<u64>;
        pub trait Repository { fn find(&self, id: u64) -> Option<Item>; }
        pub struct Item { pub id: u64 }
        pub const VERSION: &str = "1";
        pub fn helper() {}
        "#,
    )
    .unwrap();
    let mut builder = PackageBuilder::new("store");
    builder.read_file(&file).unwrap();
    let model = builder.resolve().unwrap();

    let kinds: Vec<_> = model.types().iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TypeKind::ArrayAlias, TypeKind::Interface, TypeKind::Struct]
    );
    assert_eq!(model.name(), "store");
    assert_eq!(model.first_declared_type().unwrap().name, "Ids");
    assert_eq!(model.constants().count(), 1);
    assert_eq!(model.package_functions().count(), 1);
}
