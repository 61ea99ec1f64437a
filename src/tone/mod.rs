//! Which prompt and sampling parameters each tone uses.
//!
//! Resolution is pure and deterministic; rendering the prompt for a concrete
//! request happens in [`render::PromptRenderer`].

pub mod render;
mod templates;

pub use render::PromptRenderer;
pub use templates::{ADVISORY_SYSTEM, WRITER_SYSTEM};

use crate::error::InvalidToneError;
use crate::types::Tone;

/// Sampling parameters that shape the voice of a post.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleParams {
    pub temperature: f32,
    /// Short description of the voice, rendered into the prompt
    pub voice: &'static str,
}

/// A prompt template and the parameters to generate with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneTemplate {
    pub tone: Tone,
    /// Registration name inside the renderer
    pub name: &'static str,
    pub prompt_template: &'static str,
    pub style: StyleParams,
}

/// Maps a tone to its template and style parameters.
pub fn resolve(tone: Tone) -> ToneTemplate {
    let (prompt_template, style) = match tone {
        Tone::Professional => (
            templates::PROFESSIONAL,
            StyleParams {
                temperature: 0.5,
                voice: "polished, credible and concise",
            },
        ),
        Tone::Casual => (
            templates::CASUAL,
            StyleParams {
                temperature: 0.9,
                voice: "conversational, warm, first person",
            },
        ),
        Tone::Inspirational => (
            templates::INSPIRATIONAL,
            StyleParams {
                temperature: 0.8,
                voice: "uplifting and story-driven",
            },
        ),
        Tone::Educational => (
            templates::EDUCATIONAL,
            StyleParams {
                temperature: 0.4,
                voice: "clear and structured, with concrete takeaways",
            },
        ),
    };

    ToneTemplate {
        tone,
        name: tone.selector(),
        prompt_template,
        style,
    }
}

/// Resolves a raw tone selector such as `"Educational"`.
pub fn resolve_selector(selector: &str) -> Result<ToneTemplate, InvalidToneError> {
    Ok(resolve(selector.parse()?))
}
