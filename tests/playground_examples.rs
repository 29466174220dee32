//! The example snippet and template shipped with the playground must render

use std::fs;
use std::path::PathBuf;

use stroo_api::AnalysisCache;
use stroo_api::models::GenerateRequest;
use stroo_generation::{GenerationConfig, Generator, InvocationParams, TemplateLoader};
use stroo_model::SourceLoader;

fn assets() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("server")
}

#[test]
fn test_examples_render_through_the_cache() {
    let source = fs::read_to_string(assets().join("example-source.rs")).unwrap();
    let template = fs::read_to_string(assets().join("example-template.hbs")).unwrap();
    let cache = AnalysisCache::new(GenerationConfig::default());

    let result = cache
        .generate(&GenerateRequest {
            template,
            source,
            source_changed: true,
        })
        .unwrap();

    assert!(result.contains("pub const ORDER_DESCRIPTION: &str"));
    assert!(result.contains("attributes HashMap<String, String>;"));
    assert!(result.contains("\"attributes\", \"customer\", \"id\", \"lines\", \"notes\""));
    assert_eq!(result.matches("pub fn customer_type_name()").count(), 1);
}

#[test]
fn test_examples_render_from_files() {
    let package = SourceLoader::new()
        .load(&assets().join("example-source.rs"))
        .unwrap();
    assert_eq!(package.name, "example-source");

    let template_path = assets().join("example-template.hbs");
    let templates = TemplateLoader::new().load_file(&template_path).unwrap();
    let params = InvocationParams::new("Order", template_path.display().to_string());
    let output = Generator::new().run(&package, &templates, &params).unwrap();

    let status_values: Vec<_> = output
        .model
        .variants_of("Status")
        .map(|variant| (variant.name.clone(), variant.value.clone()))
        .collect();
    assert_eq!(
        status_values,
        vec![
            ("Status::Open".to_string(), Some("0".to_string())),
            ("Status::Paid".to_string(), Some("1".to_string())),
            ("Status::Shipped".to_string(), Some("10".to_string())),
        ]
    );
    assert!(output.text.contains("impl Order {"));
}
