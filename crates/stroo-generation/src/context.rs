//! Per-cycle template rendering context
//!
//! A [`RenderingContext`] is built for one render of one template against one
//! model, bound into the helpers, and dropped afterwards. Nothing in it outlives
//! the cycle or is shared between cycles.

use std::collections::HashMap;

use chrono::Local;
use handlebars::Handlebars;
use parking_lot::Mutex;
use serde_json::{json, Value as Json};
use stroo_model::{FieldInfo, PackageModel, TypeId, TypeInfo};
use tracing::{debug, warn};

use crate::error::{GenerationError, GenerationResult};
use crate::models::InvocationParams;
use crate::nodes;

/// A value read back from the store
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Text(String),
    Json(Json),
    /// Nothing was stored under the key
    Absent,
}

impl StoredValue {
    /// Strings become `Text`, everything else is kept as JSON
    pub fn from_json(value: Json) -> Self {
        match value {
            Json::String(text) => StoredValue::Text(text),
            other => StoredValue::Json(other),
        }
    }

    pub fn to_json(&self) -> Json {
        match self {
            StoredValue::Text(text) => Json::String(text.clone()),
            StoredValue::Json(value) => value.clone(),
            StoredValue::Absent => Json::Null,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StoredValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, StoredValue::Absent)
    }
}

/// Key/value scratch space for templates
#[derive(Debug, Clone, Default)]
pub struct ValueStore {
    values: HashMap<String, StoredValue>,
}

impl ValueStore {
    /// Insert or replace; returns true when the key already existed
    pub fn insert(&mut self, key: impl Into<String>, value: StoredValue) -> bool {
        self.values.insert(key.into(), value).is_some()
    }

    pub fn get(&self, key: &str) -> StoredValue {
        self.values.get(key).cloned().unwrap_or(StoredValue::Absent)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Default)]
struct RenderState {
    selection: Option<TypeId>,
    store: ValueStore,
    imports: Vec<String>,
    generated_methods: Vec<String>,
    depth: usize,
    failure: Option<GenerationError>,
}

/// State of one rendering cycle
pub struct RenderingContext<'m> {
    model: &'m PackageModel,
    params: InvocationParams,
    max_include_depth: usize,
    main_data: Json,
    state: Mutex<RenderState>,
}

impl<'m> RenderingContext<'m> {
    /// Context for rendering `params.root_type`; the root type must exist
    pub fn new(
        model: &'m PackageModel,
        params: InvocationParams,
        max_include_depth: usize,
    ) -> GenerationResult<Self> {
        let root = model
            .type_by_name(&params.root_type)
            .ok_or_else(|| GenerationError::UnknownType(params.root_type.clone()))?;

        let main_data = json!({
            "package": nodes::package_node(model),
            "main": nodes::type_node(model, root),
            "selected_type": params.root_type,
            "output_file": params.output_file,
            "template_file": params.template_file,
            "peer_name": params.peer_name,
            "test_mode": params.test_mode,
        });

        Ok(Self {
            model,
            params,
            max_include_depth,
            main_data,
            state: Mutex::new(RenderState::default()),
        })
    }

    pub fn model(&self) -> &'m PackageModel {
        self.model
    }

    pub fn params(&self) -> &InvocationParams {
        &self.params
    }

    /// Data the main template is rendered with
    pub fn main_data(&self) -> &Json {
        &self.main_data
    }

    /// Select a type by name; an unknown name leaves the selection as it was
    pub fn select(&self, name: &str) -> bool {
        match self.model.type_by_name(name) {
            Some(info) => {
                debug!("Selected type {}", name);
                self.state.lock().selection = Some(info.id);
                true
            }
            None => {
                warn!("{:?} not found while setting selected type", name);
                false
            }
        }
    }

    pub fn selected(&self) -> Option<&'m TypeInfo> {
        let selection = self.state.lock().selection;
        selection.and_then(|id| self.model.type_info(id))
    }

    pub fn selected_node(&self) -> Option<Json> {
        self.selected().map(|info| nodes::type_node(self.model, info))
    }

    pub fn type_node(&self, name: &str) -> Option<Json> {
        self.model
            .type_by_name(name)
            .map(|info| nodes::type_node(self.model, info))
    }

    /// Store a value; returns true when the key already held one
    pub fn store(&self, key: &str, value: StoredValue) -> bool {
        debug!("Storing {:?}", key);
        self.state.lock().store.insert(key, value)
    }

    pub fn retrieve(&self, key: &str) -> StoredValue {
        self.state.lock().store.get(key)
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.state.lock().store.contains(key)
    }

    pub fn add_import(&self, path: &str) {
        self.state.lock().imports.push(path.to_string());
    }

    pub fn has_import(&self, path: &str) -> bool {
        self.state.lock().imports.iter().any(|import| import == path)
    }

    pub fn imports(&self) -> Vec<String> {
        self.state.lock().imports.clone()
    }

    pub fn add_generated_method(&self, name: &str) {
        self.state.lock().generated_methods.push(name.to_string());
    }

    pub fn has_generated_method(&self, name: &str) -> bool {
        self.state
            .lock()
            .generated_methods
            .iter()
            .any(|method| method == name)
    }

    pub fn generated_methods(&self) -> Vec<String> {
        self.state.lock().generated_methods.clone()
    }

    /// Fields ordered by name, case-sensitive
    pub fn sort_fields(&self, fields: &[FieldInfo]) -> Vec<FieldInfo> {
        let mut sorted = fields.to_vec();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted
    }

    /// Field nodes ordered by their `name`
    pub fn sort_field_nodes(&self, fields: &[Json]) -> Vec<Json> {
        let mut sorted = fields.to_vec();
        sorted.sort_by(|a, b| {
            let left = a.get("name").and_then(Json::as_str).unwrap_or_default();
            let right = b.get("name").and_then(Json::as_str).unwrap_or_default();
            left.cmp(right)
        });
        sorted
    }

    /// Render a named template for `node`
    ///
    /// The included template sees `{ type: node, root: <main data> }`.
    pub fn include(&self, registry: &Handlebars<'_>, name: &str, node: &Json) -> GenerationResult<String> {
        if registry.get_template(name).is_none() {
            return Err(GenerationError::TemplateNotFound(name.to_string()));
        }

        let depth = {
            let mut state = self.state.lock();
            state.depth += 1;
            state.depth
        };
        if depth > self.max_include_depth {
            self.state.lock().depth -= 1;
            return Err(GenerationError::IncludeDepthExceeded {
                depth,
                limit: self.max_include_depth,
                template: name.to_string(),
            });
        }

        debug!("Including {} at depth {}", name, depth);
        let data = json!({ "type": node, "root": self.main_data });
        let result = registry
            .render(name, &data)
            .map_err(|e| GenerationError::TemplateExec(e.to_string()));
        self.state.lock().depth -= 1;
        result
    }

    /// Render a named template and store the text under `key`
    pub fn include_and_store(
        &self,
        registry: &Handlebars<'_>,
        name: &str,
        node: &Json,
        key: &str,
    ) -> GenerationResult<bool> {
        let text = self.include(registry, name, node)?;
        self.store(key, StoredValue::Text(text));
        Ok(true)
    }

    /// Banner placed above the rendered text
    pub fn header(&self) -> String {
        let arguments: Vec<String> = self
            .params
            .header_arguments()
            .into_iter()
            .map(|(key, value)| format!("-{}={}", key, value))
            .collect();
        format!(
            "//! Generated on {} by stroo [https://github.com/badu/stroo]\n\
             //! Do not alter it by hand; rerun the tool instead.\n\
             //! Arguments at the time of generation:\n\
             //! {}\n",
            Local::now().format("%a %b %-d %H:%M:%S"),
            arguments.join(" ")
        )
    }

    /// Keep the first typed failure raised inside a helper
    pub(crate) fn record_failure(&self, error: GenerationError) {
        let mut state = self.state.lock();
        if state.failure.is_none() {
            state.failure = Some(error);
        }
    }

    pub(crate) fn take_failure(&self) -> Option<GenerationError> {
        self.state.lock().failure.take()
    }

    /// Current include nesting
    pub fn depth(&self) -> usize {
        self.state.lock().depth
    }
}
