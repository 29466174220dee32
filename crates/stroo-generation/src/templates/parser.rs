//! Template bundle parser
//!
//! One template text may define named sub-templates:
//!
//! ```text
//! {{#define "row"}}{{type.name}}{{/define}}
//! ```
//!
//! The parser splits the text into the main body and its definitions. The
//! bodies themselves are compiled by Handlebars later.

use crate::error::GenerationError;

const OPEN: &str = "{{#define";
const CLOSE: &str = "{{/define}}";

/// Main template body plus named definitions, in order of appearance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBundle {
    pub main: String,
    pub defines: Vec<(String, String)>,
}

/// Splits bundles into their templates
pub struct TemplateParser;

impl TemplateParser {
    /// Parse a bundle; `name` labels errors
    pub fn parse(name: &str, content: &str) -> Result<TemplateBundle, GenerationError> {
        Parser::new(name, content).parse()
    }

    /// Detect if the text defines sub-templates
    pub fn has_defines(content: &str) -> bool {
        content.contains(OPEN) && content.contains(CLOSE)
    }
}

/// Internal parser state
struct Parser<'a> {
    name: &'a str,
    content: &'a str,
    position: usize,
    line: usize,
}

impl<'a> Parser<'a> {
    fn new(name: &'a str, content: &'a str) -> Self {
        Self {
            name,
            content,
            position: 0,
            line: 1,
        }
    }

    fn parse(&mut self) -> Result<TemplateBundle, GenerationError> {
        let mut main = String::new();
        let mut defines: Vec<(String, String)> = Vec::new();

        while self.position < self.content.len() {
            if self.rest().starts_with(OPEN) {
                let open_line = self.line;
                self.advance(OPEN.len());
                let define_name = self.parse_define_name()?;
                let body = self.parse_until_close(&define_name, open_line)?;
                if defines.iter().any(|(existing, _)| *existing == define_name) {
                    return Err(self.error(
                        open_line,
                        format!("template `{}` is defined more than once", define_name),
                    ));
                }
                defines.push((define_name, body));
            } else if self.rest().starts_with(CLOSE) {
                return Err(self.error(self.line, "`{{/define}}` without an open define".to_string()));
            } else {
                main.push_str(self.parse_text());
            }
        }

        Ok(TemplateBundle { main, defines })
    }

    /// `"name"}}` after the opening keyword
    fn parse_define_name(&mut self) -> Result<String, GenerationError> {
        self.skip_whitespace();
        if !self.rest().starts_with('"') {
            return Err(self.error(self.line, "expected a quoted template name".to_string()));
        }
        self.advance(1);
        let end = self
            .rest()
            .find('"')
            .ok_or_else(|| self.error(self.line, "unterminated template name".to_string()))?;
        let define_name = self.rest()[..end].to_string();
        self.advance(end + 1);
        self.skip_whitespace();
        if !self.rest().starts_with("}}") {
            return Err(self.error(self.line, "expected `}}` after template name".to_string()));
        }
        self.advance(2);
        if define_name.is_empty() {
            return Err(self.error(self.line, "template name is empty".to_string()));
        }
        Ok(define_name)
    }

    fn parse_until_close(&mut self, define_name: &str, open_line: usize) -> Result<String, GenerationError> {
        let mut body = String::new();
        while self.position < self.content.len() {
            if self.rest().starts_with(CLOSE) {
                self.advance(CLOSE.len());
                return Ok(body);
            }
            if self.rest().starts_with(OPEN) {
                return Err(self.error(
                    self.line,
                    format!("nested define inside `{}`", define_name),
                ));
            }
            body.push_str(self.parse_text());
        }
        Err(self.error(open_line, format!("unclosed define `{}`", define_name)))
    }

    /// Text up to the next define marker; always consumes at least one character
    fn parse_text(&mut self) -> &'a str {
        let rest = self.rest();
        let skip = rest.chars().next().map(char::len_utf8).unwrap_or(0);
        let end = [OPEN, CLOSE]
            .iter()
            .filter_map(|marker| rest[skip..].find(marker).map(|offset| offset + skip))
            .min()
            .unwrap_or(rest.len());
        let text = &rest[..end];
        self.advance(end);
        text
    }

    fn rest(&self) -> &'a str {
        &self.content[self.position..]
    }

    fn advance(&mut self, len: usize) {
        let consumed = &self.content[self.position..self.position + len];
        self.line += consumed.matches('\n').count();
        self.position += len;
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().len() - self.rest().trim_start().len();
        self.advance(trimmed);
    }

    fn error(&self, line: usize, message: String) -> GenerationError {
        GenerationError::TemplateParse {
            name: self.name.to_string(),
            message: format!("line {}: {}", line, message),
        }
    }
}
