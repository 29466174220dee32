//! Handlebars helpers
//!
//! Context helpers borrow the cycle's [`RenderingContext`] and are registered on
//! a registry that lives no longer than that context. Helpers that only change
//! state (`select`, `store`, `add_import`, `add_generated_method`,
//! `include_and_store`) render nothing as a mustache and return their result
//! when used as a subexpression, e.g. `{{#if (store "k" v)}}`.

use handlebars::{
    handlebars_helper, Context, Handlebars, Helper, HelperDef, HelperResult, Output,
    RenderContext, RenderError, RenderErrorReason, ScopedJson,
};
use serde_json::Value as Json;

use crate::context::{RenderingContext, StoredValue};
use crate::error::GenerationError;
use crate::nodes;
use crate::templates::resolver::{self, CaseTransform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContextOp {
    Select,
    SelectionOk,
    Selected,
    TypeInfo,
    Store,
    Retrieve,
    HasKey,
    AddImport,
    HasImport,
    Imports,
    AddGeneratedMethod,
    HasGeneratedMethod,
    GeneratedMethods,
    Include,
    IncludeAndStore,
    SortFields,
    Header,
}

impl ContextOp {
    const ALL: [ContextOp; 17] = [
        ContextOp::Select,
        ContextOp::SelectionOk,
        ContextOp::Selected,
        ContextOp::TypeInfo,
        ContextOp::Store,
        ContextOp::Retrieve,
        ContextOp::HasKey,
        ContextOp::AddImport,
        ContextOp::HasImport,
        ContextOp::Imports,
        ContextOp::AddGeneratedMethod,
        ContextOp::HasGeneratedMethod,
        ContextOp::GeneratedMethods,
        ContextOp::Include,
        ContextOp::IncludeAndStore,
        ContextOp::SortFields,
        ContextOp::Header,
    ];

    fn name(self) -> &'static str {
        match self {
            ContextOp::Select => "select",
            ContextOp::SelectionOk => "selection_ok",
            ContextOp::Selected => "selected",
            ContextOp::TypeInfo => "type_info",
            ContextOp::Store => "store",
            ContextOp::Retrieve => "retrieve",
            ContextOp::HasKey => "has_key",
            ContextOp::AddImport => "add_import",
            ContextOp::HasImport => "has_import",
            ContextOp::Imports => "imports",
            ContextOp::AddGeneratedMethod => "add_generated_method",
            ContextOp::HasGeneratedMethod => "has_generated_method",
            ContextOp::GeneratedMethods => "generated_methods",
            ContextOp::Include => "include",
            ContextOp::IncludeAndStore => "include_and_store",
            ContextOp::SortFields => "sort_fields",
            ContextOp::Header => "header",
        }
    }

    fn is_silent(self) -> bool {
        matches!(
            self,
            ContextOp::Select
                | ContextOp::Store
                | ContextOp::AddImport
                | ContextOp::AddGeneratedMethod
                | ContextOp::IncludeAndStore
        )
    }
}

struct ContextHelper<'a, 'm> {
    ctx: &'a RenderingContext<'m>,
    op: ContextOp,
}

impl ContextHelper<'_, '_> {
    fn evaluate(&self, h: &Helper<'_>, r: &Handlebars<'_>) -> Result<Json, RenderError> {
        let ctx = self.ctx;
        let name = self.op.name();
        let value = match self.op {
            ContextOp::Select => Json::Bool(ctx.select(str_param(h, 0, name)?)),
            ContextOp::SelectionOk => {
                let ok = ctx.selected().is_some();
                if !ok {
                    tracing::warn!("Selected type is not set");
                }
                Json::Bool(ok)
            }
            ContextOp::Selected => ctx.selected_node().unwrap_or(Json::Null),
            ContextOp::TypeInfo => ctx.type_node(str_param(h, 0, name)?).unwrap_or(Json::Null),
            ContextOp::Store => {
                let key = str_param(h, 0, name)?;
                let value = json_param(h, 1, name)?;
                Json::Bool(ctx.store(key, StoredValue::from_json(value)))
            }
            ContextOp::Retrieve => ctx.retrieve(str_param(h, 0, name)?).to_json(),
            ContextOp::HasKey => Json::Bool(ctx.has_key(str_param(h, 0, name)?)),
            ContextOp::AddImport => {
                ctx.add_import(str_param(h, 0, name)?);
                Json::Bool(true)
            }
            ContextOp::HasImport => Json::Bool(ctx.has_import(str_param(h, 0, name)?)),
            ContextOp::Imports => Json::from(ctx.imports()),
            ContextOp::AddGeneratedMethod => {
                ctx.add_generated_method(str_param(h, 0, name)?);
                Json::Bool(true)
            }
            ContextOp::HasGeneratedMethod => {
                Json::Bool(ctx.has_generated_method(str_param(h, 0, name)?))
            }
            ContextOp::GeneratedMethods => Json::from(ctx.generated_methods()),
            ContextOp::Include => {
                let template = str_param(h, 0, name)?;
                let node = json_param(h, 1, name)?;
                let text = ctx
                    .include(r, template, &node)
                    .map_err(|e| self.fail(e))?;
                Json::String(text)
            }
            ContextOp::IncludeAndStore => {
                let template = str_param(h, 0, name)?;
                let node = json_param(h, 1, name)?;
                let key = str_param(h, 2, name)?;
                let stored = ctx
                    .include_and_store(r, template, &node, key)
                    .map_err(|e| self.fail(e))?;
                Json::Bool(stored)
            }
            ContextOp::SortFields => match json_param(h, 0, name)? {
                Json::Array(fields) => Json::Array(ctx.sort_field_nodes(&fields)),
                Json::Null => Json::Array(Vec::new()),
                _ => return Err(RenderErrorReason::InvalidParamType("array").into()),
            },
            ContextOp::Header => Json::String(ctx.header()),
        };
        Ok(value)
    }

    /// Keep the typed error on the context and surface a render error
    fn fail(&self, error: GenerationError) -> RenderError {
        let message = error.to_string();
        self.ctx.record_failure(error);
        RenderErrorReason::Other(message).into()
    }
}

impl HelperDef for ContextHelper<'_, '_> {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        self.evaluate(h, r).map(ScopedJson::Derived)
    }

    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let value = self.evaluate(h, r)?;
        if self.op.is_silent() {
            return Ok(());
        }
        write_value(out, &value)
    }
}

/// Helpers taking any number of arguments
#[derive(Debug, Clone, Copy)]
enum Variadic {
    /// `in x a b ...`: x equals one of the rest
    In,
    Concat,
    Dump,
}

impl HelperDef for Variadic {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let values: Vec<&Json> = h.params().iter().map(|param| param.value()).collect();
        let result = match self {
            Variadic::In => {
                let (needle, haystack) = values
                    .split_first()
                    .ok_or_else(|| RenderError::from(RenderErrorReason::ParamNotFoundForIndex("in", 0)))?;
                Json::Bool(haystack.iter().any(|candidate| candidate == needle))
            }
            Variadic::Concat => Json::String(values.iter().map(|value| plain_text(value)).collect()),
            Variadic::Dump => {
                let dumped = match values.as_slice() {
                    [single] => serde_json::to_string_pretty(single),
                    many => serde_json::to_string_pretty(many),
                };
                Json::String(dumped.map_err(|e| RenderError::from(RenderErrorReason::Other(e.to_string())))?)
            }
        };
        Ok(ScopedJson::Derived(result))
    }
}

handlebars_helper!(EmptyHelper: |value: Json| is_empty_value(value));
handlebars_helper!(NilHelper: |value: Json| value.is_null());
handlebars_helper!(TrimHelper: |text: str| text.trim().to_string());
handlebars_helper!(HasPrefixHelper: |text: str, prefix: str| text.starts_with(prefix));
handlebars_helper!(LowerInitialHelper: |text: str| resolver::lower_initial(text));
handlebars_helper!(CapitalizeHelper: |text: str| resolver::capitalize(text));
handlebars_helper!(ToJsonNameHelper: |text: str| resolver::to_json_name(text));
handlebars_helper!(SnakeCaseHelper: |text: str| CaseTransform::SnakeCase.apply(text));
handlebars_helper!(PascalCaseHelper: |text: str| CaseTransform::PascalCase.apply(text));
handlebars_helper!(CamelCaseHelper: |text: str| CaseTransform::CamelCase.apply(text));
handlebars_helper!(KebabCaseHelper: |text: str| CaseTransform::KebabCase.apply(text));
handlebars_helper!(UpperCaseHelper: |text: str| CaseTransform::UpperCase.apply(text));
handlebars_helper!(RawStrHelper: |text: str| resolver::raw_string_literal(text));
handlebars_helper!(WrapFieldHelper: |field: Json| nodes::wrap_field(field));
handlebars_helper!(WrapElementHelper: |field: Json| nodes::wrap_element(field));

/// Register the helpers that do not depend on a rendering context
pub fn register_pure_helpers(registry: &mut Handlebars<'_>) {
    registry.register_helper("in", Box::new(Variadic::In));
    registry.register_helper("concat", Box::new(Variadic::Concat));
    registry.register_helper("dump", Box::new(Variadic::Dump));
    registry.register_helper("empty", Box::new(EmptyHelper));
    registry.register_helper("nil", Box::new(NilHelper));
    registry.register_helper("trim", Box::new(TrimHelper));
    registry.register_helper("has_prefix", Box::new(HasPrefixHelper));
    registry.register_helper("lower_initial", Box::new(LowerInitialHelper));
    registry.register_helper("capitalize", Box::new(CapitalizeHelper));
    registry.register_helper("to_json_name", Box::new(ToJsonNameHelper));
    registry.register_helper("snake_case", Box::new(SnakeCaseHelper));
    registry.register_helper("pascal_case", Box::new(PascalCaseHelper));
    registry.register_helper("camel_case", Box::new(CamelCaseHelper));
    registry.register_helper("kebab_case", Box::new(KebabCaseHelper));
    registry.register_helper("upper_case", Box::new(UpperCaseHelper));
    registry.register_helper("raw_str", Box::new(RawStrHelper));
    registry.register_helper("wrap_field", Box::new(WrapFieldHelper));
    registry.register_helper("wrap_element", Box::new(WrapElementHelper));
}

/// Register every helper, binding the stateful ones to `ctx`
pub fn register_helpers<'a, 'm: 'a>(registry: &mut Handlebars<'a>, ctx: &'a RenderingContext<'m>) {
    register_pure_helpers(registry);
    for op in ContextOp::ALL {
        registry.register_helper(op.name(), Box::new(ContextHelper { ctx, op }));
    }
}

fn str_param<'a>(h: &'a Helper<'_>, index: usize, helper: &'static str) -> Result<&'a str, RenderError> {
    h.param(index)
        .and_then(|param| param.value().as_str())
        .ok_or_else(|| RenderErrorReason::ParamNotFoundForIndex(helper, index).into())
}

/// An argument past the end reads as null, like an undefined path does
fn json_param(h: &Helper<'_>, index: usize, helper: &'static str) -> Result<Json, RenderError> {
    if h.params().is_empty() {
        return Err(RenderErrorReason::ParamNotFoundForIndex(helper, index).into());
    }
    Ok(h.param(index)
        .map(|param| param.value().clone())
        .unwrap_or(Json::Null))
}

fn is_empty_value(value: &Json) -> bool {
    match value {
        Json::Null => true,
        Json::String(text) => text.is_empty(),
        Json::Array(items) => items.is_empty(),
        Json::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn plain_text(value: &Json) -> String {
    match value {
        Json::Null => String::new(),
        Json::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn write_value(out: &mut dyn Output, value: &Json) -> HelperResult {
    let text = plain_text(value);
    if !text.is_empty() {
        out.write(&text)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvocationParams;
    use serde_json::json;
    use stroo_model::{PackageModel, ReaderOptions, SourcePackage};

    fn model() -> PackageModel {
        SourcePackage::from_source(
            "shop",
            r#"
            pub struct Order { pub id: u64, pub customer: Customer, pub lines: Vec<String> }
            pub struct Customer { pub name: String }
            "#,
        )
        .unwrap()
        .build_model(&ReaderOptions::default())
        .unwrap()
    }

    fn render(model: &PackageModel, template: &str) -> Result<String, RenderError> {
        let ctx = RenderingContext::new(model, InvocationParams::new("Order", "t.hbs"), 8).unwrap();
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.register_template_string("main", template).unwrap();
        register_helpers(&mut registry, &ctx);
        registry.render("main", ctx.main_data())
    }

    #[test]
    fn test_pure_helpers() {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        register_pure_helpers(&mut registry);
        let cases = [
            ("{{in \"b\" \"a\" \"b\"}}", "true"),
            ("{{in \"z\" \"a\" \"b\"}}", "false"),
            ("{{concat \"a\" \"b\" 1}}", "ab1"),
            ("{{empty \"\"}}", "true"),
            ("{{nil null}}", "true"),
            ("{{trim \"  x  \"}}", "x"),
            ("{{has_prefix \"Option<u8>\" \"Option\"}}", "true"),
            ("{{lower_initial \"Order\"}}", "order"),
            ("{{capitalize \"order\"}}", "Order"),
            ("{{snake_case \"OrderLine\"}}", "order_line"),
            ("{{upper_case \"OrderLine\"}}", "ORDER_LINE"),
            ("{{raw_str \"a'b\"}}", "r\"a'b\""),
        ];
        for (template, expected) in cases {
            let rendered = registry.render_template(template, &json!({})).unwrap();
            assert_eq!(rendered, expected, "template {template}");
        }
    }

    #[test]
    fn test_side_effecting_helpers_render_nothing() {
        let model = model();
        let out = render(
            &model,
            "[{{select \"Customer\"}}{{selected.name}}|{{add_import \"std::fmt\"}}{{#each (imports)}}{{this}}{{/each}}|{{store \"k\" \"v\"}}{{retrieve \"k\"}}]",
        )
        .unwrap();
        assert_eq!(out, "[Customer|std::fmt|v]");
    }

    #[test]
    fn test_subexpression_returns_indicator() {
        let model = model();
        let out = render(
            &model,
            "{{#if (store \"k\" 1)}}again{{else}}first{{/if}} {{#if (store \"k\" 2)}}again{{else}}first{{/if}} {{retrieve \"k\"}}",
        )
        .unwrap();
        assert_eq!(out, "first again 2");
    }

    #[test]
    fn test_selection_without_select() {
        let model = model();
        let out = render(
            &model,
            "{{#if (selection_ok)}}set{{else}}unset{{/if}} {{#if (nil (selected))}}null{{/if}}",
        )
        .unwrap();
        assert_eq!(out, "unset null");
    }

    #[test]
    fn test_include_and_sorting() {
        let model = model();
        let ctx = RenderingContext::new(&model, InvocationParams::new("Order", "t.hbs"), 8).unwrap();
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(
                "main",
                "{{#each (sort_fields main.fields)}}{{include \"field\" (wrap_field this)}};{{/each}}",
            )
            .unwrap();
        registry
            .register_template_string("field", "{{type.name}}:{{type.fields.[0].type_name}}")
            .unwrap();
        register_helpers(&mut registry, &ctx);
        let out = registry.render("main", ctx.main_data()).unwrap();
        assert_eq!(out, "customer:Customer;id:u64;lines:Vec<String>;");
    }

    #[test]
    fn test_recursive_include_fails_closed() {
        let model = model();
        let ctx = RenderingContext::new(&model, InvocationParams::new("Order", "t.hbs"), 3).unwrap();
        let mut registry = Handlebars::new();
        registry
            .register_template_string("main", "{{include \"loop\" main}}")
            .unwrap();
        registry
            .register_template_string("loop", "{{include \"loop\" type}}")
            .unwrap();
        register_helpers(&mut registry, &ctx);
        assert!(registry.render("main", ctx.main_data()).is_err());
        assert!(matches!(
            ctx.take_failure(),
            Some(GenerationError::IncludeDepthExceeded { limit: 3, .. })
        ));
        assert_eq!(ctx.depth(), 0);
    }
}
