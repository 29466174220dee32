//! Type descriptors: the shape of a field, element or signature type
//!
//! Descriptors are built from `syn::Type` without looking at other declarations.
//! Named references carry an unresolved `target` until the resolver binds them.

use std::fmt;

use quote::ToTokens;
use serde::{Deserialize, Serialize};
use syn::{GenericArgument, PathArguments, Type, TypeParamBound};

use crate::identity::TypeId;

const PRIMITIVES: &[&str] = &[
    "bool", "char", "str", "String", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16",
    "u32", "u64", "u128", "usize", "f32", "f64",
];

/// Single-segment names that are in scope without a `use`
const PRELUDE: &[&str] = &["Result"];

const ARRAY_COLLECTIONS: &[&str] = &["Vec", "VecDeque", "HashSet", "BTreeSet"];
const MAP_COLLECTIONS: &[&str] = &["HashMap", "BTreeMap", "IndexMap"];

/// Pointer-like and optional wrappers around another type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wrapper {
    Box,
    Rc,
    Arc,
    Weak,
    Option,
    Ref,
    RefMut,
    Ptr,
    PtrMut,
}

impl Wrapper {
    fn from_ident(ident: &str) -> Option<Self> {
        match ident {
            "Box" => Some(Wrapper::Box),
            "Rc" => Some(Wrapper::Rc),
            "Arc" => Some(Wrapper::Arc),
            "Weak" => Some(Wrapper::Weak),
            "Option" => Some(Wrapper::Option),
            _ => None,
        }
    }
}

/// Structural description of a Rust type expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDescriptor {
    /// Built-in scalar or `String`; `()` for unit
    Primitive { name: String },
    /// A type declared (or expected to be declared) in the package
    Named {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<TypeDescriptor>,
        #[serde(default)]
        target: Option<TypeId>,
    },
    /// A generic parameter of the enclosing declaration
    Generic { name: String },
    /// Sequences: `Vec`, `VecDeque`, sets, `[T; N]` and `[T]`
    Array {
        collection: String,
        elem: Box<TypeDescriptor>,
        #[serde(default)]
        len: Option<String>,
    },
    /// Keyed collections
    Map {
        collection: String,
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    /// Ownership, optional and reference wrappers
    Wrapped {
        wrapper: Wrapper,
        inner: Box<TypeDescriptor>,
    },
    Tuple { elems: Vec<TypeDescriptor> },
    /// Types living outside the package (qualified paths, imports, prelude)
    External {
        path: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<TypeDescriptor>,
    },
    /// `dyn Trait`
    Dynamic { bound: String },
    /// Signature-only fallback for shapes the model does not describe
    Opaque { text: String },
}

/// Names visible while describing one declaration
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TypeScope<'a> {
    pub generics: &'a [String],
    pub self_name: Option<&'a str>,
}

impl<'a> TypeScope<'a> {
    pub fn new(generics: &'a [String], self_name: Option<&'a str>) -> Self {
        Self {
            generics,
            self_name,
        }
    }
}

impl TypeDescriptor {
    /// Describe a type strictly; unsupported shapes come back as the error text
    pub(crate) fn describe(ty: &Type, scope: &TypeScope<'_>) -> Result<Self, String> {
        match ty {
            Type::Path(type_path) if type_path.qself.is_none() => {
                Self::describe_path(&type_path.path, scope)
            }
            Type::Path(_) => Err(format!("qualified path `{}`", token_text(ty))),
            Type::Array(array) => Ok(TypeDescriptor::Array {
                collection: "array".to_string(),
                elem: Box::new(Self::describe(&array.elem, scope)?),
                len: Some(token_text(&array.len)),
            }),
            Type::Slice(slice) => Ok(TypeDescriptor::Array {
                collection: "slice".to_string(),
                elem: Box::new(Self::describe(&slice.elem, scope)?),
                len: None,
            }),
            Type::Reference(reference) => Ok(TypeDescriptor::Wrapped {
                wrapper: if reference.mutability.is_some() {
                    Wrapper::RefMut
                } else {
                    Wrapper::Ref
                },
                inner: Box::new(Self::describe(&reference.elem, scope)?),
            }),
            Type::Ptr(pointer) => Ok(TypeDescriptor::Wrapped {
                wrapper: if pointer.mutability.is_some() {
                    Wrapper::PtrMut
                } else {
                    Wrapper::Ptr
                },
                inner: Box::new(Self::describe(&pointer.elem, scope)?),
            }),
            Type::Tuple(tuple) if tuple.elems.is_empty() => Ok(TypeDescriptor::Primitive {
                name: "()".to_string(),
            }),
            Type::Tuple(tuple) => Ok(TypeDescriptor::Tuple {
                elems: tuple
                    .elems
                    .iter()
                    .map(|elem| Self::describe(elem, scope))
                    .collect::<Result<_, _>>()?,
            }),
            Type::Paren(paren) => Self::describe(&paren.elem, scope),
            Type::Group(group) => Self::describe(&group.elem, scope),
            Type::TraitObject(object) => object
                .bounds
                .iter()
                .find_map(|bound| match bound {
                    TypeParamBound::Trait(trait_bound) => Some(path_text(&trait_bound.path)),
                    _ => None,
                })
                .map(|bound| TypeDescriptor::Dynamic { bound })
                .ok_or_else(|| "trait object without a trait bound".to_string()),
            Type::ImplTrait(_) => Err("`impl Trait` type".to_string()),
            Type::BareFn(_) => Err("function pointer".to_string()),
            Type::Never(_) => Err("never type".to_string()),
            Type::Infer(_) => Err("inferred type".to_string()),
            Type::Macro(_) => Err("type macro".to_string()),
            other => Err(format!("unsupported type syntax `{}`", token_text(other))),
        }
    }

    /// Describe a type for a signature; shapes the model cannot express become `Opaque`
    pub(crate) fn describe_lenient(ty: &Type, scope: &TypeScope<'_>) -> Self {
        Self::describe(ty, scope).unwrap_or_else(|_| TypeDescriptor::Opaque {
            text: token_text(ty),
        })
    }

    fn describe_path(path: &syn::Path, scope: &TypeScope<'_>) -> Result<Self, String> {
        let last = path
            .segments
            .last()
            .ok_or_else(|| "empty type path".to_string())?;
        let ident = last.ident.to_string();
        let args = Self::type_arguments(&last.arguments, scope)?;
        let single = path.segments.len() == 1 && path.leading_colon.is_none();

        if args.is_empty() && (ident == "String" || (single && PRIMITIVES.contains(&ident.as_str())))
        {
            return Ok(TypeDescriptor::Primitive { name: ident });
        }
        if single && args.is_empty() && scope.generics.iter().any(|g| *g == ident) {
            return Ok(TypeDescriptor::Generic { name: ident });
        }
        if single && ident == "Self" {
            let name = scope
                .self_name
                .ok_or_else(|| "`Self` outside of a type declaration".to_string())?;
            return Ok(TypeDescriptor::Named {
                name: name.to_string(),
                args: Vec::new(),
                target: None,
            });
        }

        if ARRAY_COLLECTIONS.contains(&ident.as_str()) && args.len() == 1 {
            let mut args = args;
            return Ok(TypeDescriptor::Array {
                collection: ident,
                elem: Box::new(args.remove(0)),
                len: None,
            });
        }
        if MAP_COLLECTIONS.contains(&ident.as_str()) && args.len() >= 2 {
            let mut args = args.into_iter();
            let (key, value) = match (args.next(), args.next()) {
                (Some(key), Some(value)) => (key, value),
                _ => return Err(format!("malformed map type `{}`", path_text(path))),
            };
            return Ok(TypeDescriptor::Map {
                collection: ident,
                key: Box::new(key),
                value: Box::new(value),
            });
        }
        if let Some(wrapper) = Wrapper::from_ident(&ident) {
            if args.len() == 1 {
                let mut args = args;
                return Ok(TypeDescriptor::Wrapped {
                    wrapper,
                    inner: Box::new(args.remove(0)),
                });
            }
        }

        if single && !PRELUDE.contains(&ident.as_str()) {
            Ok(TypeDescriptor::Named {
                name: ident,
                args,
                target: None,
            })
        } else {
            Ok(TypeDescriptor::External {
                path: path_text(path),
                args,
            })
        }
    }

    fn type_arguments(arguments: &PathArguments, scope: &TypeScope<'_>) -> Result<Vec<Self>, String> {
        match arguments {
            PathArguments::AngleBracketed(bracketed) => bracketed
                .args
                .iter()
                .filter_map(|arg| match arg {
                    GenericArgument::Type(ty) => Some(Self::describe(ty, scope)),
                    _ => None,
                })
                .collect(),
            _ => Ok(Vec::new()),
        }
    }

    /// Visit every `Named` node, innermost arguments first
    pub fn visit_named_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut TypeDescriptor),
    {
        match self {
            TypeDescriptor::Named { args, .. } | TypeDescriptor::External { args, .. } => {
                for arg in args.iter_mut() {
                    arg.visit_named_mut(f);
                }
            }
            TypeDescriptor::Array { elem, .. } => elem.visit_named_mut(f),
            TypeDescriptor::Map { key, value, .. } => {
                key.visit_named_mut(f);
                value.visit_named_mut(f);
            }
            TypeDescriptor::Wrapped { inner, .. } => inner.visit_named_mut(f),
            TypeDescriptor::Tuple { elems } => {
                for elem in elems.iter_mut() {
                    elem.visit_named_mut(f);
                }
            }
            TypeDescriptor::Primitive { .. }
            | TypeDescriptor::Generic { .. }
            | TypeDescriptor::Dynamic { .. }
            | TypeDescriptor::Opaque { .. } => {}
        }
        if matches!(self, TypeDescriptor::Named { .. }) {
            f(self);
        }
    }

    /// Names of every `Named` node in this descriptor
    pub fn named_refs(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_named(&mut names);
        names
    }

    fn collect_named<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            TypeDescriptor::Named { name, args, .. } => {
                names.push(name);
                for arg in args {
                    arg.collect_named(names);
                }
            }
            TypeDescriptor::External { args, .. } => {
                for arg in args {
                    arg.collect_named(names);
                }
            }
            TypeDescriptor::Array { elem, .. } => elem.collect_named(names),
            TypeDescriptor::Map { key, value, .. } => {
                key.collect_named(names);
                value.collect_named(names);
            }
            TypeDescriptor::Wrapped { inner, .. } => inner.collect_named(names),
            TypeDescriptor::Tuple { elems } => {
                for elem in elems {
                    elem.collect_named(names);
                }
            }
            _ => {}
        }
    }

    /// The named type at the core of this descriptor, looking through wrappers and sequences
    pub fn core_name(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Named { name, .. } => Some(name),
            TypeDescriptor::Wrapped { inner, .. } => inner.core_name(),
            TypeDescriptor::Array { elem, .. } => elem.core_name(),
            _ => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeDescriptor::Primitive { .. })
    }

    pub fn is_named(&self) -> bool {
        matches!(self, TypeDescriptor::Named { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeDescriptor::Array { .. })
    }

    pub fn is_map(&self) -> bool {
        matches!(self, TypeDescriptor::Map { .. })
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, TypeDescriptor::Wrapped { .. })
    }

    pub fn is_optional(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Wrapped {
                wrapper: Wrapper::Option,
                ..
            }
        )
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive { name } | TypeDescriptor::Generic { name } => {
                write!(f, "{}", name)
            }
            TypeDescriptor::Named { name, args, .. } => {
                write!(f, "{}", name)?;
                write_args(f, args)
            }
            TypeDescriptor::External { path, args } => {
                write!(f, "{}", path)?;
                write_args(f, args)
            }
            TypeDescriptor::Array {
                collection,
                elem,
                len,
            } => match (collection.as_str(), len) {
                ("array", Some(len)) => write!(f, "[{}; {}]", elem, len),
                ("slice", _) | ("array", None) => write!(f, "[{}]", elem),
                _ => write!(f, "{}<{}>", collection, elem),
            },
            TypeDescriptor::Map {
                collection,
                key,
                value,
            } => write!(f, "{}<{}, {}>", collection, key, value),
            TypeDescriptor::Wrapped { wrapper, inner } => match wrapper {
                Wrapper::Box => write!(f, "Box<{}>", inner),
                Wrapper::Rc => write!(f, "Rc<{}>", inner),
                Wrapper::Arc => write!(f, "Arc<{}>", inner),
                Wrapper::Weak => write!(f, "Weak<{}>", inner),
                Wrapper::Option => write!(f, "Option<{}>", inner),
                Wrapper::Ref => write!(f, "&{}", inner),
                Wrapper::RefMut => write!(f, "&mut {}", inner),
                Wrapper::Ptr => write!(f, "*const {}", inner),
                Wrapper::PtrMut => write!(f, "*mut {}", inner),
            },
            TypeDescriptor::Tuple { elems } if elems.len() == 1 => write!(f, "({},)", elems[0]),
            TypeDescriptor::Tuple { elems } => {
                write!(f, "(")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", elem)?;
                }
                write!(f, ")")
            }
            TypeDescriptor::Dynamic { bound } => write!(f, "dyn {}", bound),
            TypeDescriptor::Opaque { text } => write!(f, "{}", text),
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[TypeDescriptor]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    write!(f, "<")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", arg)?;
    }
    write!(f, ">")
}

pub(crate) fn token_text<T: ToTokens>(node: &T) -> String {
    node.to_token_stream().to_string()
}

pub(crate) fn path_text(path: &syn::Path) -> String {
    let mut text = String::new();
    if path.leading_colon.is_some() {
        text.push_str("::");
    }
    let segments: Vec<String> = path
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect();
    text.push_str(&segments.join("::"));
    text
}
