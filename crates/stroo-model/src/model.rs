//! Package model types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::descriptor::TypeDescriptor;
use crate::identity::{FunctionId, TypeId};

/// Declaration kind; fixed when the type is first read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Struct,
    Interface,
    ArrayAlias,
    ScalarAlias,
}

/// One parsed entry of an attribute, `name = value` or a bare `name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    pub name: String,
    pub value: Option<String>,
}

/// A non-doc attribute on a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    /// Attribute path, e.g. `serde`
    pub key: String,
    /// Argument tokens as written
    pub raw: String,
    pub entries: Vec<TagEntry>,
}

impl TagInfo {
    /// Value of the first entry with the given name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .and_then(|entry| entry.value.as_deref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    pub ty: TypeDescriptor,
    pub tags: Vec<TagInfo>,
    pub doc: String,
    pub exported: bool,
}

impl FieldInfo {
    /// First tag with the given attribute path
    pub fn tag(&self, key: &str) -> Option<&TagInfo> {
        self.tags.iter().find(|tag| tag.key == key)
    }
}

/// Element of an array alias
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayElement {
    pub collection: String,
    pub elem: TypeDescriptor,
    pub len: Option<String>,
}

/// How a method takes `self`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiverMode {
    Value,
    Ref,
    RefMut,
    /// Declared in an `impl` block without a `self` parameter
    Associated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamInfo {
    pub name: String,
    pub ty: TypeDescriptor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub receiver: Option<ReceiverMode>,
    pub params: Vec<ParamInfo>,
    pub results: Vec<TypeDescriptor>,
    pub is_async: bool,
}

/// A method signature declared by a trait
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    pub name: String,
    pub signature: Signature,
    pub doc: String,
    /// The trait provides a default body
    pub has_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub id: TypeId,
    pub name: String,
    pub kind: TypeKind,
    pub fields: Vec<FieldInfo>,
    pub element: Option<ArrayElement>,
    pub underlying: Option<TypeDescriptor>,
    pub capabilities: Vec<Capability>,
    pub methods: Vec<FunctionId>,
    pub generics: Vec<String>,
    pub doc: String,
    pub exported: bool,
    /// Created for a method receiver that was never declared
    pub placeholder: bool,
    pub tuple: bool,
}

impl TypeInfo {
    pub(crate) fn new(id: TypeId, name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            fields: Vec::new(),
            element: None,
            underlying: None,
            capabilities: Vec::new(),
            methods: Vec::new(),
            generics: Vec::new(),
            doc: String::new(),
            exported: false,
            placeholder: false,
            tuple: false,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub id: FunctionId,
    pub name: String,
    /// Receiver type name for methods
    pub receiver: Option<String>,
    /// Trait being implemented, for `impl Trait for Type` methods
    pub trait_name: Option<String>,
    pub signature: Signature,
    pub doc: String,
    pub exported: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    Const,
    Static,
    /// Discriminant of a fieldless enum
    Variant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableInfo {
    pub name: String,
    pub ty: TypeDescriptor,
    pub value: Option<String>,
    pub kind: VariableKind,
    /// Enum name for variants
    pub group: Option<String>,
    pub doc: String,
    pub exported: bool,
}

/// Frozen summary of one package
///
/// Built only through [`PackageBuilder::resolve`](crate::PackageBuilder::resolve);
/// every `Named` reference in a field, element or underlying type has a target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageModel {
    pub(crate) name: String,
    pub(crate) types: Vec<TypeInfo>,
    pub(crate) type_index: HashMap<String, TypeId>,
    pub(crate) functions: Vec<FunctionInfo>,
    pub(crate) variables: Vec<VariableInfo>,
    pub(crate) imports: Vec<String>,
    #[serde(default)]
    pub(crate) opaque: Vec<String>,
}

impl PackageModel {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Types in declaration order; placeholders come last
    pub fn types(&self) -> &[TypeInfo] {
        &self.types
    }

    pub fn functions(&self) -> &[FunctionInfo] {
        &self.functions
    }

    pub fn variables(&self) -> &[VariableInfo] {
        &self.variables
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// Names declared in the package that are not modelled, such as enums with data
    pub fn opaque_types(&self) -> &[String] {
        &self.opaque
    }

    pub fn type_by_name(&self, name: &str) -> Option<&TypeInfo> {
        self.type_index
            .get(name)
            .and_then(|id| self.types.get(id.index()))
    }

    pub fn type_info(&self, id: TypeId) -> Option<&TypeInfo> {
        self.types.get(id.index())
    }

    pub fn function(&self, id: FunctionId) -> Option<&FunctionInfo> {
        self.functions.get(id.index())
    }

    /// Methods attached to a type, in declaration order
    pub fn methods_of<'a>(&'a self, info: &'a TypeInfo) -> impl Iterator<Item = &'a FunctionInfo> + 'a {
        info.methods.iter().filter_map(move |id| self.function(*id))
    }

    /// Functions without a receiver
    pub fn package_functions(&self) -> impl Iterator<Item = &FunctionInfo> {
        self.functions.iter().filter(|function| function.receiver.is_none())
    }

    /// Constants and statics, without enum variants
    pub fn constants(&self) -> impl Iterator<Item = &VariableInfo> {
        self.variables
            .iter()
            .filter(|variable| variable.kind != VariableKind::Variant)
    }

    /// Variants of a fieldless enum, in declaration order
    pub fn variants_of<'a>(&'a self, enum_name: &'a str) -> impl Iterator<Item = &'a VariableInfo> + 'a {
        self.variables
            .iter()
            .filter(move |variable| variable.group.as_deref() == Some(enum_name))
    }

    /// First type read from the sources, ignoring placeholders
    pub fn first_declared_type(&self) -> Option<&TypeInfo> {
        self.types.iter().find(|info| !info.placeholder)
    }
}
