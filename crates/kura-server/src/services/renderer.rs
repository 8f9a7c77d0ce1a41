//! Renderer - Fill template arguments into messages
//!
//! Message content uses Handlebars syntax (`{{topic}}`). Output is not
//! HTML-escaped since it is fed to language models, not browsers.

use handlebars::Handlebars;
use std::collections::{HashMap, HashSet};

use kura::{DomainError, Template, TemplateMessage};

/// Renders a template's messages against argument values
pub struct TemplateRenderer {
    hbs: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    pub fn new() -> Self {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        Self { hbs }
    }

    /// Render every message in order.
    ///
    /// Required arguments must be supplied and non-blank. Declared optional
    /// arguments that are not supplied render as empty strings; values for
    /// undeclared names are still available to the template.
    pub fn render(
        &self,
        template: &Template,
        values: &HashMap<String, String>,
    ) -> Result<Vec<TemplateMessage>, DomainError> {
        let mut seen = HashSet::new();
        let missing: Vec<&str> = template
            .arguments()
            .iter()
            .filter(|arg| arg.required)
            .filter(|arg| values.get(&arg.name).map_or(true, |v| v.trim().is_empty()))
            .map(|arg| arg.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect();

        if !missing.is_empty() {
            return Err(DomainError::Render(format!(
                "Missing required arguments: {}",
                missing.join(", ")
            )));
        }

        let mut context = values.clone();
        for arg in template.arguments() {
            context.entry(arg.name.clone()).or_default();
        }

        tracing::debug!(
            template_id = %template.id(),
            messages = template.messages().len(),
            "Rendering template"
        );

        template
            .messages()
            .iter()
            .enumerate()
            .map(|(index, message)| {
                self.hbs
                    .render_template(&message.content, &context)
                    .map(|content| TemplateMessage::new(message.role, content))
                    .map_err(|e| DomainError::Render(format!("Message {index}: {e}")))
            })
            .collect()
    }
}
