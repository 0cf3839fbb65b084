use crate::error::PromptError;
use tera::{Context, Tera};

/// Tera-backed template engine for canned replies.
pub struct TeraEngine {
    tera: Tera,
}

impl TeraEngine {
    /// Create with inline templates (no filesystem).
    pub fn new() -> Self {
        Self {
            tera: Tera::default(),
        }
    }

    /// Register a template from a string. Replaces an existing one.
    pub fn add_template(&mut self, name: &str, content: &str) -> Result<(), PromptError> {
        self.tera
            .add_raw_template(name, content)
            .map_err(|e| PromptError::Render(format!("{name}: {e}")))
    }

    /// Render a named template with the given context.
    pub fn render(&self, name: &str, context: &Context) -> Result<String, PromptError> {
        if !self.tera.get_template_names().any(|n| n == name) {
            return Err(PromptError::NotFound(name.to_string()));
        }
        self.tera
            .render(name, context)
            .map_err(|e| PromptError::Render(format!("{name}: {e}")))
    }
}

impl Default for TeraEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_template_is_not_found() {
        let engine = TeraEngine::new();
        let err = engine.render("nonexistent", &Context::new()).unwrap_err();
        assert!(matches!(err, PromptError::NotFound(_)));
    }

    #[test]
    fn add_template_and_render() {
        let mut engine = TeraEngine::new();
        engine.add_template("greeting", "Hello, {{ name }}!").unwrap();

        let mut ctx = Context::new();
        ctx.insert("name", "World");
        assert_eq!(engine.render("greeting", &ctx).unwrap(), "Hello, World!");
    }

    #[test]
    fn render_missing_variable_fails() {
        let mut engine = TeraEngine::new();
        engine.add_template("greeting", "Hello, {{ name }}!").unwrap();

        let err = engine.render("greeting", &Context::new()).unwrap_err();
        assert!(matches!(err, PromptError::Render(_)));
    }

    #[test]
    fn add_template_replaces_existing() {
        let mut engine = TeraEngine::new();
        engine.add_template("t", "version 1").unwrap();
        engine.add_template("t", "version 2").unwrap();
        assert_eq!(engine.render("t", &Context::new()).unwrap(), "version 2");
    }

    #[test]
    fn values_are_not_html_escaped() {
        let mut engine = TeraEngine::new();
        engine.add_template("raw", "{{ v }}").unwrap();
        let mut ctx = Context::new();
        ctx.insert("v", "Q&A <draft>");
        assert_eq!(engine.render("raw", &ctx).unwrap(), "Q&A <draft>");
    }
}
