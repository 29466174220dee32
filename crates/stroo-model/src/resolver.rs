//! Finalize pass: attach methods, bind named references, freeze the model

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::descriptor::TypeDescriptor;
use crate::error::{ModelError, ModelResult, ResolutionIssue};
use crate::identity::TypeId;
use crate::model::{PackageModel, TypeInfo, TypeKind};
use crate::reader::PackageBuilder;

/// What a named reference turned out to be
enum Lookup {
    Found(TypeId),
    External,
    Missing,
}

struct NameTable<'a> {
    index: &'a HashMap<String, TypeId>,
    /// Imported names plus local declarations that are not modelled
    external: HashSet<&'a str>,
}

impl<'a> NameTable<'a> {
    fn new(
        index: &'a HashMap<String, TypeId>,
        imports: &'a [String],
        opaque: &'a [String],
    ) -> Self {
        Self {
            index,
            external: imports
                .iter()
                .map(String::as_str)
                .filter(|name| !name.ends_with('*'))
                .chain(opaque.iter().map(String::as_str))
                .collect(),
        }
    }

    fn lookup(&self, name: &str) -> Lookup {
        match self.index.get(name) {
            Some(id) => Lookup::Found(*id),
            None if self.external.contains(name) => Lookup::External,
            None => Lookup::Missing,
        }
    }

    /// Bind every `Named` node; returns the names that could not be bound
    fn bind(&self, descriptor: &mut TypeDescriptor) -> Vec<String> {
        let mut missing = Vec::new();
        descriptor.visit_named_mut(&mut |node| {
            let replacement = match node {
                TypeDescriptor::Named { name, args, target } => match self.lookup(name) {
                    Lookup::Found(id) => {
                        *target = Some(id);
                        None
                    }
                    Lookup::External => Some(TypeDescriptor::External {
                        path: name.clone(),
                        args: std::mem::take(args),
                    }),
                    Lookup::Missing => {
                        missing.push(name.clone());
                        None
                    }
                },
                _ => None,
            };
            if let Some(replacement) = replacement {
                *node = replacement;
            }
        });
        missing
    }
}

impl PackageBuilder {
    /// Consume the builder and produce the frozen model
    ///
    /// Every dangling reference in a field, array element or alias underlying
    /// type is collected; if there are any, they are all returned together.
    pub fn resolve(mut self) -> ModelResult<PackageModel> {
        debug!(
            "Resolving package {} ({} types, {} functions)",
            self.name,
            self.types.len(),
            self.functions.len()
        );

        self.attach_methods();

        let mut issues = Vec::new();
        {
            let names = NameTable::new(&self.type_index, &self.imports, &self.opaque);
            for info in self.types.iter_mut() {
                issues.extend(bind_type(&names, info));
            }
            for function in self.functions.iter_mut() {
                let signature = &mut function.signature;
                for param in signature.params.iter_mut() {
                    names.bind(&mut param.ty);
                }
                for result in signature.results.iter_mut() {
                    names.bind(result);
                }
            }
            for variable in self.variables.iter_mut() {
                names.bind(&mut variable.ty);
            }
        }

        if !issues.is_empty() {
            return Err(ModelError::Resolution(issues));
        }

        info!(
            "Resolved package {}: {} types, {} functions, {} variables",
            self.name,
            self.types.len(),
            self.functions.len(),
            self.variables.len()
        );

        Ok(PackageModel {
            name: self.name,
            types: self.types,
            type_index: self.type_index,
            functions: self.functions,
            variables: self.variables,
            imports: self.imports,
            opaque: self.opaque,
        })
    }

    fn attach_methods(&mut self) {
        for index in 0..self.functions.len() {
            let Some(receiver) = self.functions[index].receiver.clone() else {
                continue;
            };
            let type_id = match self.type_index.get(&receiver) {
                Some(id) => *id,
                None => {
                    let id = TypeId::new(self.types.len());
                    debug!("Creating placeholder type {} for method receiver", receiver);
                    let mut placeholder = TypeInfo::new(id, &receiver, TypeKind::Struct);
                    placeholder.placeholder = true;
                    self.type_index.insert(receiver, id);
                    self.types.push(placeholder);
                    id
                }
            };
            let function_id = self.functions[index].id;
            self.types[type_id.index()].methods.push(function_id);
        }
    }
}

fn bind_type(names: &NameTable<'_>, info: &mut TypeInfo) -> Vec<ResolutionIssue> {
    let owner = info.name.clone();
    let mut issues = Vec::new();
    let mut record = |location: String, missing: Vec<String>| {
        for reference in missing {
            issues.push(ResolutionIssue {
                owner: owner.clone(),
                location: location.clone(),
                reference,
            });
        }
    };

    for field in info.fields.iter_mut() {
        let missing = names.bind(&mut field.ty);
        record(format!("field `{}`", field.name), missing);
    }
    if let Some(element) = info.element.as_mut() {
        let missing = names.bind(&mut element.elem);
        record("element".to_string(), missing);
    }
    if let Some(underlying) = info.underlying.as_mut() {
        let missing = names.bind(underlying);
        record("underlying type".to_string(), missing);
    }
    for capability in info.capabilities.iter_mut() {
        for param in capability.signature.params.iter_mut() {
            names.bind(&mut param.ty);
        }
        for result in capability.signature.results.iter_mut() {
            names.bind(result);
        }
    }
    issues
}
