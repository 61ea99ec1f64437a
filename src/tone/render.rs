// src/tone/render.rs
//! Renders tone templates into concrete prompts with Handlebars.

use super::{resolve, templates, ToneTemplate};
use crate::error::{AppError, GenerationCause, GenerationError};
use crate::model::GenerationRequest;
use crate::types::Tone;
use handlebars::Handlebars;
use serde_json::json;

/// A Handlebars registry holding every tone template.
#[derive(Debug, Clone)]
pub struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl PromptRenderer {
    /// Registers the shared partial and one template per tone.
    pub fn new() -> Result<Self, AppError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars
            .register_partial("requirements", templates::REQUIREMENTS_PARTIAL)
            .map_err(|e| AppError::TemplateError {
                name: "requirements".to_string(),
                message: e.to_string(),
            })?;

        for tone in Tone::ALL {
            let template = resolve(tone);
            handlebars
                .register_template_string(template.name, template.prompt_template)
                .map_err(|e| AppError::TemplateError {
                    name: template.name.to_string(),
                    message: e.to_string(),
                })?;
        }

        Ok(Self { handlebars })
    }

    /// Renders the prompt for `request` using `template`.
    pub fn render(
        &self,
        template: &ToneTemplate,
        request: &GenerationRequest,
    ) -> Result<String, GenerationError> {
        let data = json!({
            "topic": request.topic.as_str(),
            "voice": template.style.voice,
            "length": request.length.word_range(),
            "hashtags": request.options.hashtags,
            "call_to_action": request.options.call_to_action,
            "emojis": request.options.emojis,
            "audience": request.options.audience,
            "constraints": request
                .constraints
                .iter()
                .map(|(name, value)| json!({ "name": name, "value": value }))
                .collect::<Vec<_>>(),
        });

        let prompt = self
            .handlebars
            .render(template.name, &data)
            .map_err(|e| GenerationError::new(GenerationCause::Template(e.to_string())))?;

        log::debug!(
            "Rendered {} prompt for '{}' ({} chars)",
            template.name,
            request.topic,
            prompt.len()
        );
        Ok(prompt)
    }
}
