//! JSON views of model entries as templates see them
//!
//! Nodes never embed other types: a field that refers to a struct carries the
//! struct's name in `core_type`, and templates look it up with `type_info`.

use serde_json::{json, Map, Value as Json};
use stroo_model::{
    FieldInfo, FunctionInfo, PackageModel, ReceiverMode, Signature, TypeDescriptor, TypeInfo,
    TypeKind, VariableInfo, VariableKind, Wrapper,
};

pub fn type_node(model: &PackageModel, info: &TypeInfo) -> Json {
    let kind = kind_label(info.kind);
    let element = info.element.as_ref().map(|element| {
        descriptor_node(
            &element.elem,
            json!({
                "collection": element.collection,
                "len": element.len,
            }),
        )
    });
    let underlying = info.underlying.as_ref().map(ToString::to_string);
    let variants: Vec<Json> = model.variants_of(&info.name).map(variable_node).collect();

    json!({
        "id": info.id.index(),
        "name": info.name,
        "kind": kind,
        "is_struct": info.kind == TypeKind::Struct,
        "is_interface": info.kind == TypeKind::Interface,
        "is_array": info.kind == TypeKind::ArrayAlias,
        "is_scalar": info.kind == TypeKind::ScalarAlias,
        "is_enum": !variants.is_empty(),
        "placeholder": info.placeholder,
        "tuple": info.tuple,
        "exported": info.exported,
        "doc": info.doc,
        "generics": info.generics,
        "fields": info.fields.iter().map(field_node).collect::<Vec<_>>(),
        "element": element,
        "underlying": underlying,
        "capabilities": info.capabilities.iter().map(|capability| json!({
            "name": capability.name,
            "doc": capability.doc,
            "has_default": capability.has_default,
            "signature": signature_node(&capability.signature),
        })).collect::<Vec<_>>(),
        "methods": model.methods_of(info).map(function_node).collect::<Vec<_>>(),
        "variants": variants,
    })
}

pub fn field_node(field: &FieldInfo) -> Json {
    let mut tag_map = Map::new();
    for tag in &field.tags {
        let entries: Map<String, Json> = tag
            .entries
            .iter()
            .map(|entry| (entry.name.clone(), json!(entry.value)))
            .collect();
        tag_map.entry(tag.key.clone()).or_insert(Json::Object(entries));
    }

    descriptor_node(
        &field.ty,
        json!({
            "name": field.name,
            "doc": field.doc,
            "exported": field.exported,
            "tags": field.tags,
            "tag": tag_map,
        }),
    )
}

/// Adds the type spelling, the raw descriptor and the shape flags to `base`
fn descriptor_node(ty: &TypeDescriptor, base: Json) -> Json {
    let mut node = match base {
        Json::Object(map) => map,
        _ => Map::new(),
    };
    node.insert("type_name".to_string(), json!(ty.to_string()));
    node.insert("ty".to_string(), json!(ty));
    node.insert("core_type".to_string(), json!(ty.core_name()));
    node.insert("is_primitive".to_string(), json!(ty.is_primitive()));
    node.insert("is_named".to_string(), json!(ty.is_named()));
    node.insert("is_array".to_string(), json!(ty.is_array()));
    node.insert("is_map".to_string(), json!(ty.is_map()));
    node.insert("is_optional".to_string(), json!(ty.is_optional()));
    node.insert("is_wrapped".to_string(), json!(ty.is_wrapped()));
    node.insert(
        "is_pointer".to_string(),
        json!(matches!(
            ty,
            TypeDescriptor::Wrapped {
                wrapper: Wrapper::Box | Wrapper::Rc | Wrapper::Arc | Wrapper::Ptr | Wrapper::PtrMut,
                ..
            }
        )),
    );
    node.insert(
        "is_reference".to_string(),
        json!(matches!(
            ty,
            TypeDescriptor::Wrapped {
                wrapper: Wrapper::Ref | Wrapper::RefMut,
                ..
            }
        )),
    );
    node.insert(
        "is_external".to_string(),
        json!(matches!(ty, TypeDescriptor::External { .. })),
    );
    node.insert(
        "is_generic".to_string(),
        json!(matches!(ty, TypeDescriptor::Generic { .. })),
    );
    node.insert(
        "is_tuple".to_string(),
        json!(matches!(ty, TypeDescriptor::Tuple { .. })),
    );
    Json::Object(node)
}

pub fn function_node(function: &FunctionInfo) -> Json {
    json!({
        "name": function.name,
        "receiver": function.receiver,
        "trait_name": function.trait_name,
        "doc": function.doc,
        "exported": function.exported,
        "signature": signature_node(&function.signature),
    })
}

fn signature_node(signature: &Signature) -> Json {
    let receiver = signature.receiver.map(|mode| match mode {
        ReceiverMode::Value => "self",
        ReceiverMode::Ref => "&self",
        ReceiverMode::RefMut => "&mut self",
        ReceiverMode::Associated => "",
    });
    json!({
        "receiver": receiver,
        "is_method": matches!(
            signature.receiver,
            Some(ReceiverMode::Value | ReceiverMode::Ref | ReceiverMode::RefMut)
        ),
        "is_async": signature.is_async,
        "params": signature.params.iter().map(|param| json!({
            "name": param.name,
            "type_name": param.ty.to_string(),
            "ty": param.ty,
        })).collect::<Vec<_>>(),
        "results": signature.results.iter().map(ToString::to_string).collect::<Vec<_>>(),
    })
}

pub fn variable_node(variable: &VariableInfo) -> Json {
    let kind = match variable.kind {
        VariableKind::Const => "const",
        VariableKind::Static => "static",
        VariableKind::Variant => "variant",
    };
    json!({
        "name": variable.name,
        "short_name": variable.name.rsplit("::").next().unwrap_or(&variable.name),
        "type_name": variable.ty.to_string(),
        "value": variable.value,
        "kind": kind,
        "group": variable.group,
        "doc": variable.doc,
        "exported": variable.exported,
    })
}

pub fn package_node(model: &PackageModel) -> Json {
    json!({
        "name": model.name(),
        "types": model.types().iter().map(|info| type_node(model, info)).collect::<Vec<_>>(),
        "functions": model.package_functions().map(function_node).collect::<Vec<_>>(),
        "constants": model.constants().map(variable_node).collect::<Vec<_>>(),
        "imports": model.imports(),
    })
}

/// Synthetic struct holding a single field, named after the field
pub fn wrap_field(field: &Json) -> Json {
    synthetic_node(field, "struct")
}

/// Synthetic array alias whose element is the field
pub fn wrap_element(field: &Json) -> Json {
    synthetic_node(field, "array_alias")
}

fn synthetic_node(field: &Json, kind: &str) -> Json {
    let name = field.get("name").cloned().unwrap_or(Json::Null);
    let is_array = kind == "array_alias";
    let element = if is_array { field.clone() } else { Json::Null };
    json!({
        "id": Json::Null,
        "name": name,
        "kind": kind,
        "is_struct": !is_array,
        "is_interface": false,
        "is_array": is_array,
        "is_scalar": false,
        "is_enum": false,
        "placeholder": false,
        "tuple": false,
        "exported": field.get("exported").cloned().unwrap_or(Json::Bool(false)),
        "doc": field.get("doc").cloned().unwrap_or_else(|| json!("")),
        "generics": [],
        "fields": [field.clone()],
        "element": element,
        "underlying": Json::Null,
        "capabilities": [],
        "methods": [],
        "variants": [],
    })
}

fn kind_label(kind: TypeKind) -> &'static str {
    match kind {
        TypeKind::Struct => "struct",
        TypeKind::Interface => "interface",
        TypeKind::ArrayAlias => "array_alias",
        TypeKind::ScalarAlias => "scalar_alias",
    }
}
