//! Text transforms available to templates

use serde::{Deserialize, Serialize};

/// Case transformation applied to identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseTransform {
    /// PascalCase (e.g., MyProject)
    PascalCase,
    /// camelCase (e.g., myProject)
    CamelCase,
    /// snake_case (e.g., my_project)
    SnakeCase,
    /// kebab-case (e.g., my-project)
    KebabCase,
    /// SHOUTY_SNAKE_CASE (e.g., MY_PROJECT)
    UpperCase,
    /// lowercase (e.g., myproject)
    LowerCase,
}

impl CaseTransform {
    /// Apply case transformation to a string
    pub fn apply(&self, input: &str) -> String {
        use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

        match self {
            CaseTransform::PascalCase => input.to_pascal_case(),
            CaseTransform::CamelCase => input.to_lower_camel_case(),
            CaseTransform::SnakeCase => input.to_snake_case(),
            CaseTransform::KebabCase => input.to_kebab_case(),
            CaseTransform::UpperCase => input.to_shouty_snake_case(),
            CaseTransform::LowerCase => input.to_lowercase(),
        }
    }
}

/// Lowercase the first character only
pub fn lower_initial(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Uppercase the first character only
pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// JSON-style field name: `user_id` and `UserId` both become `userId`
pub fn to_json_name(input: &str) -> String {
    CaseTransform::CamelCase.apply(input)
}

/// Rust raw string literal for `input`, without its trailing newline
///
/// Uses one more `#` than the longest `"#...` run inside the text.
pub fn raw_string_literal(input: &str) -> String {
    let text = input.strip_suffix('\n').unwrap_or(input);
    let mut longest = 0;
    let mut run: Option<usize> = None;
    for ch in text.chars() {
        run = match (ch, run) {
            ('"', _) => Some(0),
            ('#', Some(count)) => Some(count + 1),
            _ => None,
        };
        if let Some(count) = run {
            longest = longest.max(count);
        }
    }
    let needs_hashes = text.contains('"') || text.contains('\\');
    let hashes = if needs_hashes {
        "#".repeat(longest + 1)
    } else {
        String::new()
    };
    format!("r{hashes}\"{text}\"{hashes}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_transforms() {
        assert_eq!(CaseTransform::PascalCase.apply("order_line"), "OrderLine");
        assert_eq!(CaseTransform::CamelCase.apply("OrderLine"), "orderLine");
        assert_eq!(CaseTransform::SnakeCase.apply("OrderLine"), "order_line");
        assert_eq!(CaseTransform::KebabCase.apply("OrderLine"), "order-line");
        assert_eq!(CaseTransform::UpperCase.apply("OrderLine"), "ORDER_LINE");
        assert_eq!(CaseTransform::LowerCase.apply("OrderLine"), "orderline");
    }

    #[test]
    fn test_initial_transforms() {
        assert_eq!(lower_initial("Order"), "order");
        assert_eq!(lower_initial(""), "");
        assert_eq!(capitalize("élan"), "Élan");
        assert_eq!(to_json_name("user_id"), "userId");
    }

    #[test]
    fn test_raw_string_literal() {
        assert_eq!(raw_string_literal("plain\n"), "r\"plain\"");
        assert_eq!(raw_string_literal("say \"hi\""), "r#\"say \"hi\"\"#");
        assert_eq!(raw_string_literal("a \"# b"), "r##\"a \"# b\"##");

        let literal = raw_string_literal("x \"## y\n");
        let parsed: syn::LitStr = syn::parse_str(&literal).unwrap();
        assert_eq!(parsed.value(), "x \"## y");
    }
}
