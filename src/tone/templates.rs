// src/tone/templates.rs
//! Handlebars sources for the post prompts.

/// Shared tail of every post prompt.
pub const REQUIREMENTS_PARTIAL: &str = "\
Length: {{length}}
Requirements:
- An attention-grabbing first line
- Authentic value the reader can use
- Line breaks for readability
{{#if hashtags}}- 3-5 relevant hashtags at the end
{{/if}}{{#if call_to_action}}- A clear call to action
{{/if}}{{#if emojis}}- A few purposeful emojis
{{/if}}{{#if audience}}- Target audience: {{audience}}
{{/if}}{{#each constraints}}- {{name}}: {{value}}
{{/each}}Return only the post text, without a title or surrounding quotes.";

pub const PROFESSIONAL: &str = "\
Write a professional social media post about: {{topic}}
Voice: {{voice}}
Anchor the post in one credible insight from real practice.
{{> requirements}}";

pub const CASUAL: &str = "\
Write a casual social media post about: {{topic}}
Voice: {{voice}}
Write the way you would talk to a colleague over coffee.
{{> requirements}}";

pub const INSPIRATIONAL: &str = "\
Write an inspirational social media post about: {{topic}}
Voice: {{voice}}
Build toward a moment of encouragement the reader can act on today.
{{> requirements}}";

pub const EDUCATIONAL: &str = "\
Write an educational social media post about: {{topic}}
Voice: {{voice}}
Teach one idea well: define it, give a concrete example, end with a takeaway.
{{> requirements}}";

/// System prompt for drafting posts.
pub const WRITER_SYSTEM: &str = "\
You are an expert social media content strategist. Create engaging posts that:
- Hook readers in the first line
- Deliver clear value and insights
- Are authentic and professional
- Break up text with line breaks";

/// System prompt for the chat assistant.
pub const ADVISORY_SYSTEM: &str = "\
You are an experienced social media strategist. Answer questions about content \
ideas, posting strategy, audience growth and profile optimisation with practical, \
specific advice. Prefer short paragraphs and concrete examples. If a question is \
unrelated to social media, answer briefly and steer back to content strategy.";
