//! Declaration reader
//!
//! Classifies `syn` items and records them in a [`PackageBuilder`]. Reading never
//! looks up other declarations, so items can arrive in any order; binding names
//! to ids happens later in [`PackageBuilder::resolve`].

use std::collections::HashMap;

use syn::punctuated::Punctuated;
use syn::{
    Attribute, Fields, FnArg, ImplItem, Item, ItemConst, ItemEnum, ItemImpl, ItemStatic,
    ItemStruct, ItemTrait, ItemType, Pat, ReturnType, TraitItem, Type, UseTree, Visibility,
};
use tracing::{debug, warn};

use crate::descriptor::{path_text, token_text, TypeDescriptor, TypeScope};
use crate::error::{ModelError, ModelResult};
use crate::identity::{FunctionId, TypeId};
use crate::model::{
    ArrayElement, Capability, FieldInfo, FunctionInfo, ParamInfo, ReceiverMode, Signature,
    TypeInfo, TypeKind, VariableInfo, VariableKind,
};
use crate::tags::{doc_text, read_tags};

const REPR_INTEGERS: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
];

/// Reader behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Let a later declaration replace an earlier one with the same name
    pub allow_redefinition: bool,
}

/// The type a method is declared on
#[derive(Debug, Clone, Copy)]
pub struct MethodReceiver<'a> {
    pub type_name: &'a str,
    pub trait_name: Option<&'a str>,
    pub generics: &'a [String],
}

/// Mutable accumulation of declarations for one package
///
/// Consumed by [`resolve`](PackageBuilder::resolve), which is the only way to get
/// a [`PackageModel`](crate::PackageModel).
#[derive(Debug, Clone)]
pub struct PackageBuilder {
    pub(crate) name: String,
    pub(crate) options: ReaderOptions,
    pub(crate) types: Vec<TypeInfo>,
    pub(crate) type_index: HashMap<String, TypeId>,
    pub(crate) functions: Vec<FunctionInfo>,
    pub(crate) variables: Vec<VariableInfo>,
    pub(crate) imports: Vec<String>,
    /// Declared here but not modelled: data enums, unions, unsupported aliases
    pub(crate) opaque: Vec<String>,
}

impl PackageBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, ReaderOptions::default())
    }

    pub fn with_options(name: impl Into<String>, options: ReaderOptions) -> Self {
        Self {
            name: name.into(),
            options,
            types: Vec::new(),
            type_index: HashMap::new(),
            functions: Vec::new(),
            variables: Vec::new(),
            imports: Vec::new(),
            opaque: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.type_index.contains_key(name)
    }

    /// Whether `name` is declared in the package without being modelled
    pub fn is_opaque(&self, name: &str) -> bool {
        self.opaque.iter().any(|opaque| opaque == name)
    }

    /// Read every item of a parsed file in order
    pub fn read_file(&mut self, file: &syn::File) -> ModelResult<()> {
        for item in &file.items {
            self.read_item(item)?;
        }
        Ok(())
    }

    /// Dispatch one item by its shape
    pub fn read_item(&mut self, item: &Item) -> ModelResult<()> {
        match item {
            Item::Struct(item) => self.read_struct(item).map(|_| ()),
            Item::Trait(item) => self.read_interface(item).map(|_| ()),
            Item::Type(item) => self.read_type_alias(item),
            Item::Enum(item) => self.read_enum(item),
            Item::Fn(item) => {
                self.read_function(&item.sig, &item.attrs, is_exported(&item.vis), None);
                Ok(())
            }
            Item::Impl(item) => {
                self.read_impl(item);
                Ok(())
            }
            Item::Const(item) => {
                self.read_const(item);
                Ok(())
            }
            Item::Static(item) => {
                self.read_static(item);
                Ok(())
            }
            Item::Union(item) => self.record_opaque(&item.ident.to_string()),
            Item::Use(item) => {
                self.read_use(&item.tree, "");
                Ok(())
            }
            other => {
                debug!("Skipping item: {}", item_label(other));
                Ok(())
            }
        }
    }

    /// Struct with named, tuple or no fields
    pub fn read_struct(&mut self, item: &ItemStruct) -> ModelResult<TypeId> {
        let name = item.ident.to_string();
        let id = self.slot_for(&name)?;
        let generics = generic_names(&item.generics);
        let scope = TypeScope::new(&generics, Some(&name));

        let mut info = TypeInfo::new(id, &name, TypeKind::Struct);
        info.tuple = matches!(item.fields, Fields::Unnamed(_));
        for (index, field) in item.fields.iter().enumerate() {
            let field_name = field
                .ident
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| index.to_string());
            if info.field(&field_name).is_some() {
                return Err(ModelError::DuplicateField {
                    owner: name,
                    field: field_name,
                });
            }
            let ty = TypeDescriptor::describe(&field.ty, &scope).map_err(|shape| {
                ModelError::UnsupportedType {
                    owner: name.clone(),
                    field: field_name.clone(),
                    shape,
                }
            })?;
            info.fields.push(FieldInfo {
                name: field_name,
                ty,
                tags: read_tags(&field.attrs),
                doc: doc_text(&field.attrs),
                exported: is_exported(&field.vis),
            });
        }
        info.generics = generics;
        info.doc = doc_text(&item.attrs);
        info.exported = is_exported(&item.vis);

        debug!("Read struct {} with {} fields", name, info.fields.len());
        Ok(self.insert_type(info))
    }

    /// Trait: one capability per method declaration
    pub fn read_interface(&mut self, item: &ItemTrait) -> ModelResult<TypeId> {
        let name = item.ident.to_string();
        let id = self.slot_for(&name)?;
        let generics = generic_names(&item.generics);
        let scope = TypeScope::new(&generics, None);

        let mut info = TypeInfo::new(id, &name, TypeKind::Interface);
        for trait_item in &item.items {
            if let TraitItem::Fn(method) = trait_item {
                info.capabilities.push(Capability {
                    name: method.sig.ident.to_string(),
                    signature: signature_of(&method.sig, &scope, false),
                    doc: doc_text(&method.attrs),
                    has_default: method.default.is_some(),
                });
            }
        }
        info.generics = generics;
        info.doc = doc_text(&item.attrs);
        info.exported = is_exported(&item.vis);

        debug!(
            "Read trait {} with {} capabilities",
            name,
            info.capabilities.len()
        );
        Ok(self.insert_type(info))
    }

    fn read_type_alias(&mut self, item: &ItemType) -> ModelResult<()> {
        let name = item.ident.to_string();
        let generics = generic_names(&item.generics);
        let scope = TypeScope::new(&generics, None);
        match TypeDescriptor::describe(&item.ty, &scope) {
            Ok(TypeDescriptor::Array {
                collection,
                elem,
                len,
            }) => self
                .read_array_alias(
                    item,
                    ArrayElement {
                        collection,
                        elem: *elem,
                        len,
                    },
                )
                .map(|_| ()),
            Ok(ty @ (TypeDescriptor::Primitive { .. }
            | TypeDescriptor::Named { .. }
            | TypeDescriptor::External { .. })) => {
                self.read_scalar_alias(item, ty).map(|_| ())
            }
            Ok(other) => {
                warn!("Skipping type alias {} = {}", name, other);
                self.record_opaque(&name)
            }
            Err(shape) => {
                warn!("Skipping type alias {}: {}", name, shape);
                self.record_opaque(&name)
            }
        }
    }

    /// `type A = Vec<T>` and the other sequence shapes
    pub fn read_array_alias(&mut self, item: &ItemType, element: ArrayElement) -> ModelResult<TypeId> {
        let name = item.ident.to_string();
        let id = self.slot_for(&name)?;
        let mut info = TypeInfo::new(id, &name, TypeKind::ArrayAlias);
        info.element = Some(element);
        info.generics = generic_names(&item.generics);
        info.doc = doc_text(&item.attrs);
        info.exported = is_exported(&item.vis);
        debug!("Read array alias {}", name);
        Ok(self.insert_type(info))
    }

    /// `type A = u32` or an alias to another named type
    pub fn read_scalar_alias(&mut self, item: &ItemType, underlying: TypeDescriptor) -> ModelResult<TypeId> {
        let name = item.ident.to_string();
        let id = self.slot_for(&name)?;
        let mut info = TypeInfo::new(id, &name, TypeKind::ScalarAlias);
        info.underlying = Some(underlying);
        info.generics = generic_names(&item.generics);
        info.doc = doc_text(&item.attrs);
        info.exported = is_exported(&item.vis);
        debug!("Read scalar alias {}", name);
        Ok(self.insert_type(info))
    }

    /// Fieldless enums become a scalar alias of their repr plus one variable per variant
    pub fn read_enum(&mut self, item: &ItemEnum) -> ModelResult<()> {
        let name = item.ident.to_string();
        if item
            .variants
            .iter()
            .any(|variant| !matches!(variant.fields, Fields::Unit))
        {
            warn!("Skipping enum {}: variants carry data", name);
            return self.record_opaque(&name);
        }

        let id = self.slot_for(&name)?;
        let repr = repr_integer(&item.attrs).unwrap_or_else(|| "isize".to_string());
        let mut info = TypeInfo::new(id, &name, TypeKind::ScalarAlias);
        info.underlying = Some(TypeDescriptor::Primitive { name: repr });
        info.doc = doc_text(&item.attrs);
        info.exported = is_exported(&item.vis);

        self.variables
            .retain(|variable| variable.group.as_deref() != Some(name.as_str()));

        let mut base: Option<String> = None;
        let mut offset: i128 = 0;
        for variant in &item.variants {
            let value = match &variant.discriminant {
                Some((_, expr)) => {
                    let text = token_text(expr);
                    match text.parse::<i128>() {
                        Ok(number) => {
                            base = None;
                            offset = number;
                        }
                        Err(_) => {
                            base = Some(text.clone());
                            offset = 0;
                        }
                    }
                    text
                }
                None => match &base {
                    Some(expr) => format!("{} + {}", expr, offset),
                    None => offset.to_string(),
                },
            };
            offset += 1;

            self.variables.push(VariableInfo {
                name: format!("{}::{}", name, variant.ident),
                ty: TypeDescriptor::Named {
                    name: name.clone(),
                    args: Vec::new(),
                    target: None,
                },
                value: Some(value),
                kind: VariableKind::Variant,
                group: Some(name.clone()),
                doc: doc_text(&variant.attrs),
                exported: info.exported,
            });
        }

        debug!("Read enum {} with {} variants", name, item.variants.len());
        self.insert_type(info);
        Ok(())
    }

    /// Record a function; `receiver` is `None` for package-level functions
    ///
    /// The receiver type does not need to exist yet.
    pub fn read_function(
        &mut self,
        sig: &syn::Signature,
        attrs: &[Attribute],
        exported: bool,
        receiver: Option<MethodReceiver<'_>>,
    ) -> FunctionId {
        let id = FunctionId::new(self.functions.len());
        let mut generics: Vec<String> = receiver
            .map(|receiver| receiver.generics.to_vec())
            .unwrap_or_default();
        generics.extend(generic_names(&sig.generics));
        let scope = TypeScope::new(&generics, receiver.map(|receiver| receiver.type_name));

        self.functions.push(FunctionInfo {
            id,
            name: sig.ident.to_string(),
            receiver: receiver.map(|receiver| receiver.type_name.to_string()),
            trait_name: receiver.and_then(|receiver| receiver.trait_name.map(str::to_string)),
            signature: signature_of(sig, &scope, receiver.is_some()),
            doc: doc_text(attrs),
            exported,
        });
        id
    }

    /// Every method of an `impl` block, with the block's self type as receiver
    pub fn read_impl(&mut self, item: &ItemImpl) {
        let type_name = match item.self_ty.as_ref() {
            Type::Path(type_path) if type_path.qself.is_none() => type_path
                .path
                .segments
                .last()
                .map(|segment| segment.ident.to_string()),
            _ => None,
        };
        let Some(type_name) = type_name else {
            debug!("Skipping impl for {}", token_text(&item.self_ty));
            return;
        };

        let trait_name = item.trait_.as_ref().map(|(_, path, _)| path_text(path));
        let generics = generic_names(&item.generics);
        let receiver = MethodReceiver {
            type_name: &type_name,
            trait_name: trait_name.as_deref(),
            generics: &generics,
        };
        for impl_item in &item.items {
            if let ImplItem::Fn(method) = impl_item {
                let exported = trait_name.is_some() || is_exported(&method.vis);
                self.read_function(&method.sig, &method.attrs, exported, Some(receiver));
            }
        }
    }

    pub fn read_const(&mut self, item: &ItemConst) {
        self.read_variable(
            item.ident.to_string(),
            &item.ty,
            Some(token_text(&item.expr)),
            VariableKind::Const,
            &item.attrs,
            &item.vis,
        );
    }

    pub fn read_static(&mut self, item: &ItemStatic) {
        self.read_variable(
            item.ident.to_string(),
            &item.ty,
            None,
            VariableKind::Static,
            &item.attrs,
            &item.vis,
        );
    }

    fn read_variable(
        &mut self,
        name: String,
        ty: &Type,
        value: Option<String>,
        kind: VariableKind,
        attrs: &[Attribute],
        vis: &Visibility,
    ) {
        self.variables.push(VariableInfo {
            name,
            ty: TypeDescriptor::describe_lenient(ty, &TypeScope::default()),
            value,
            kind,
            group: None,
            doc: doc_text(attrs),
            exported: is_exported(vis),
        });
    }

    fn read_use(&mut self, tree: &UseTree, prefix: &str) {
        match tree {
            UseTree::Path(path) => {
                let prefix = join_path(prefix, &path.ident.to_string());
                self.read_use(&path.tree, &prefix);
            }
            UseTree::Name(name) if name.ident == "self" => {
                if let Some(last) = prefix.rsplit("::").next().filter(|last| !last.is_empty()) {
                    self.imports.push(last.to_string());
                }
            }
            UseTree::Name(name) => self.imports.push(name.ident.to_string()),
            UseTree::Rename(rename) => self.imports.push(rename.rename.to_string()),
            UseTree::Glob(_) => self.imports.push(join_path(prefix, "*")),
            UseTree::Group(group) => {
                for tree in &group.items {
                    self.read_use(tree, prefix);
                }
            }
        }
    }

    /// Keep the name of a skipped declaration so references to it still bind
    fn record_opaque(&mut self, name: &str) -> ModelResult<()> {
        if self.has_type(name) || self.is_opaque(name) {
            if !self.options.allow_redefinition {
                return Err(ModelError::DuplicateType {
                    name: name.to_string(),
                });
            }
            if self.is_opaque(name) {
                return Ok(());
            }
        }
        debug!("Recording {} as an opaque type", name);
        self.opaque.push(name.to_string());
        Ok(())
    }

    fn slot_for(&self, name: &str) -> ModelResult<TypeId> {
        if self.is_opaque(name) && !self.options.allow_redefinition {
            return Err(ModelError::DuplicateType {
                name: name.to_string(),
            });
        }
        match self.type_index.get(name) {
            Some(id) if self.options.allow_redefinition => Ok(*id),
            Some(_) => Err(ModelError::DuplicateType {
                name: name.to_string(),
            }),
            None => Ok(TypeId::new(self.types.len())),
        }
    }

    fn insert_type(&mut self, info: TypeInfo) -> TypeId {
        let id = info.id;
        if id.index() < self.types.len() {
            warn!("Type {} redefined; keeping the last declaration", info.name);
            self.types[id.index()] = info;
        } else {
            self.type_index.insert(info.name.clone(), id);
            self.types.push(info);
        }
        id
    }
}

fn signature_of(sig: &syn::Signature, scope: &TypeScope<'_>, in_impl: bool) -> Signature {
    let receiver = match sig.receiver() {
        Some(receiver) if receiver.reference.is_some() => Some(if receiver.mutability.is_some() {
            ReceiverMode::RefMut
        } else {
            ReceiverMode::Ref
        }),
        Some(_) => Some(ReceiverMode::Value),
        None if in_impl => Some(ReceiverMode::Associated),
        None => None,
    };

    let params = sig
        .inputs
        .iter()
        .filter_map(|input| match input {
            FnArg::Typed(pat_type) => Some(ParamInfo {
                name: match pat_type.pat.as_ref() {
                    Pat::Ident(ident) => ident.ident.to_string(),
                    other => token_text(other),
                },
                ty: TypeDescriptor::describe_lenient(&pat_type.ty, scope),
            }),
            FnArg::Receiver(_) => None,
        })
        .collect();

    let results = match &sig.output {
        ReturnType::Default => Vec::new(),
        ReturnType::Type(_, ty) => match ty.as_ref() {
            Type::Tuple(tuple) => tuple
                .elems
                .iter()
                .map(|elem| TypeDescriptor::describe_lenient(elem, scope))
                .collect(),
            other => vec![TypeDescriptor::describe_lenient(other, scope)],
        },
    };

    Signature {
        receiver,
        params,
        results,
        is_async: sig.asyncness.is_some(),
    }
}

fn generic_names(generics: &syn::Generics) -> Vec<String> {
    generics
        .type_params()
        .map(|param| param.ident.to_string())
        .collect()
}

fn repr_integer(attrs: &[Attribute]) -> Option<String> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("repr"))
        .filter_map(|attr| {
            attr.parse_args_with(Punctuated::<syn::Ident, syn::Token![,]>::parse_terminated)
                .ok()
        })
        .flat_map(|idents| idents.into_iter())
        .map(|ident| ident.to_string())
        .find(|ident| REPR_INTEGERS.contains(&ident.as_str()))
}

fn is_exported(vis: &Visibility) -> bool {
    matches!(vis, Visibility::Public(_))
}

fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}::{}", prefix, segment)
    }
}

fn item_label(item: &Item) -> &'static str {
    match item {
        Item::Mod(_) => "module",
        Item::Macro(_) => "macro invocation",
        Item::ExternCrate(_) => "extern crate",
        Item::ForeignMod(_) => "extern block",
        Item::TraitAlias(_) => "trait alias",
        _ => "unsupported item",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder_for(source: &str) -> ModelResult<PackageBuilder> {
        let file = syn::parse_file(source).unwrap();
        let mut builder = PackageBuilder::new("sample");
        builder.read_file(&file)?;
        Ok(builder)
    }

    #[test]
    fn test_struct_fields_keep_declaration_order() {
        let builder = builder_for(
            r#"
            /// A customer order
            pub struct Order {
                pub id: u64,
                customer: String,
                #[serde(default)]
                lines: Vec<Line>,
            }
            "#,
        )
        .unwrap();
        let order = &builder.types[0];
        assert_eq!(order.kind, TypeKind::Struct);
        assert_eq!(order.doc, "A customer order");
        assert!(order.exported);
        let names: Vec<_> = order.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "customer", "lines"]);
        assert!(order.fields[0].exported);
        assert!(!order.fields[1].exported);
        assert_eq!(order.fields[2].tags[0].key, "serde");
    }

    #[test]
    fn test_tuple_struct_fields_are_numbered() {
        let builder = builder_for("struct Pair(u8, pub String);").unwrap();
        let pair = &builder.types[0];
        assert!(pair.tuple);
        assert_eq!(pair.fields[0].name, "0");
        assert_eq!(pair.fields[1].name, "1");
    }

    #[test]
    fn test_unsupported_field_type_names_the_field() {
        let err = builder_for("struct Callback { run: fn(u8) -> u8 }").unwrap_err();
        match err {
            ModelError::UnsupportedType { owner, field, .. } => {
                assert_eq!(owner, "Callback");
                assert_eq!(field, "run");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_type_is_rejected_by_default() {
        let err = builder_for("struct A; struct A { x: u8 }").unwrap_err();
        assert!(matches!(err, ModelError::DuplicateType { name } if name == "A"));
    }

    #[test]
    fn test_redefinition_keeps_slot() {
        let file = syn::parse_file("struct A; struct B; struct A { x: u8 }").unwrap();
        let mut builder = PackageBuilder::with_options(
            "sample",
            ReaderOptions {
                allow_redefinition: true,
            },
        );
        builder.read_file(&file).unwrap();
        assert_eq!(builder.type_count(), 2);
        assert_eq!(builder.types[0].name, "A");
        assert_eq!(builder.types[0].fields.len(), 1);
    }

    #[test]
    fn test_aliases() {
        let builder = builder_for(
            r#"
            pub type Ids = Vec<Id>;
            pub type Id = u64;
            type Digest = [u8; 32];
            type Lookup = std::collections::HashMap<String, Id>;
            "#,
        )
        .unwrap();
        assert_eq!(builder.type_count(), 3);
        assert_eq!(builder.types[0].kind, TypeKind::ArrayAlias);
        assert_eq!(builder.types[1].kind, TypeKind::ScalarAlias);
        let digest = builder.types[2].element.as_ref().unwrap();
        assert_eq!(digest.collection, "array");
        assert_eq!(digest.len.as_deref(), Some("32"));
        assert!(!builder.has_type("Lookup"));
        assert!(builder.is_opaque("Lookup"));
    }

    #[test]
    fn test_fieldless_enum_variants() {
        let builder = builder_for(
            r#"
            #[repr(u8)]
            pub enum Color { Red, Green = 5, Blue }
            enum Shape { Circle(f64), Square }
            "#,
        )
        .unwrap();
        let color = &builder.types[0];
        assert_eq!(color.kind, TypeKind::ScalarAlias);
        assert_eq!(color.underlying.as_ref().unwrap().to_string(), "u8");
        let values: Vec<_> = builder
            .variables
            .iter()
            .map(|v| (v.name.as_str(), v.value.as_deref().unwrap()))
            .collect();
        assert_eq!(
            values,
            vec![("Color::Red", "0"), ("Color::Green", "5"), ("Color::Blue", "6")]
        );
        assert!(!builder.has_type("Shape"));
        assert!(builder.is_opaque("Shape"));
    }

    #[test]
    fn test_skipped_declarations_still_clash_with_types() {
        let err = builder_for("pub enum Shape { Circle(f64) } pub struct Shape;").unwrap_err();
        assert!(matches!(err, ModelError::DuplicateType { name } if name == "Shape"));

        let err = builder_for("pub struct Shape; pub type Shape = (u8, u8);").unwrap_err();
        assert!(matches!(err, ModelError::DuplicateType { name } if name == "Shape"));
    }

    #[test]
    fn test_impl_methods_record_receiver_modes() {
        let builder = builder_for(
            r#"
            impl Counter {
                pub fn new() -> Self { Counter(0) }
                pub fn get(&self) -> u32 { self.0 }
                fn bump(&mut self, by: u32) {}
            }
            impl Default for Counter {
                fn default() -> Self { Counter::new() }
            }
            pub async fn run(input: &str) -> (u8, String) { todo!() }
            "#,
        )
        .unwrap();
        let modes: Vec<_> = builder
            .functions
            .iter()
            .map(|f| f.signature.receiver)
            .collect();
        assert_eq!(
            modes,
            vec![
                Some(ReceiverMode::Associated),
                Some(ReceiverMode::Ref),
                Some(ReceiverMode::RefMut),
                Some(ReceiverMode::Associated),
                None,
            ]
        );
        assert_eq!(builder.functions[0].signature.results[0].to_string(), "Counter");
        assert_eq!(builder.functions[3].trait_name.as_deref(), Some("Default"));
        assert!(builder.functions[3].exported);
        let run = &builder.functions[4];
        assert!(run.signature.is_async);
        assert_eq!(run.signature.results.len(), 2);
        assert_eq!(run.signature.params[0].name, "input");
    }

    #[test]
    fn test_trait_capabilities() {
        let builder = builder_for(
            r#"
            pub trait Store {
                fn get(&self, key: &str) -> Option<String>;
                fn len(&self) -> usize { 0 }
            }
            "#,
        )
        .unwrap();
        let store = &builder.types[0];
        assert_eq!(store.kind, TypeKind::Interface);
        assert_eq!(store.capabilities.len(), 2);
        assert!(!store.capabilities[0].has_default);
        assert!(store.capabilities[1].has_default);
    }

    #[test]
    fn test_use_declarations_record_imports() {
        let builder = builder_for(
            r#"
            use std::collections::{HashMap, BTreeMap as Ordered};
            use crate::shared::*;
            use std::fmt::{self};
            "#,
        )
        .unwrap();
        assert_eq!(
            builder.imports,
            vec!["HashMap", "Ordered", "crate::shared::*", "fmt"]
        );
    }

    #[test]
    fn test_constants_and_statics() {
        let builder = builder_for(
            r#"
            pub const LIMIT: usize = 64;
            static NAME: &str = "stroo";
            "#,
        )
        .unwrap();
        assert_eq!(builder.variables[0].value.as_deref(), Some("64"));
        assert_eq!(builder.variables[0].kind, VariableKind::Const);
        assert_eq!(builder.variables[1].kind, VariableKind::Static);
        assert_eq!(builder.variables[1].value, None);
    }
}
