//! Prompt templates for the generate/assess/refine pipeline
//!
//! System prompts are embedded from .pmt files; user messages are rendered
//! from small inline templates by simple `{{placeholder}}` substitution.

pub mod embedded;

use tracing::debug;

pub use embedded::{ASSESS, CONTENT, GENERATE, REFINE, get_embedded};

/// User message template for the generation stage
const GENERATE_USER: &str = "Topic: {{topic}}\n\
Content: {{content}}\n\
Target Difficulty: {{difficulty}}\n\
Previous Feedback: {{feedback}}\n\n\
Generate high-quality flashcards following the rules above.";

/// User message template for the assessment stage
const ASSESS_USER: &str = "Flashcards: {{flashcards}}\n\
Topic: {{topic}}\n\n\
Assess the quality of these flashcards according to the criteria above.";

/// User message template for the refinement stage
const REFINE_USER: &str = "Original Flashcards: {{flashcards}}\n\
Quality Assessment: {{assessment}}\n\
Topic: {{topic}}\n\n\
Improve the flashcards based on the assessment feedback.";

/// User message template for content auto-generation
const CONTENT_USER: &str = "Topic: {{topic}}\n\
Target Difficulty Level: {{difficulty}}\n\n\
Generate comprehensive educational content about this topic that would be perfect for creating high-quality flashcards. \
Include key concepts, features, implementation details, and practical information that learners should know.";

/// Render a template by substituting `{{key}}` placeholders
///
/// Unknown placeholders are left in place so malformed templates surface
/// visibly in logs rather than silently dropping text.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    debug!(var_count = vars.len(), "render: called");
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{{{key}}}}}"), value);
    }
    out
}

/// Build the user message for the generation stage
pub fn generate_user(topic: &str, content: &str, difficulty: &str, feedback: &str) -> String {
    render(
        GENERATE_USER,
        &[
            ("topic", topic),
            ("content", content),
            ("difficulty", difficulty),
            ("feedback", feedback),
        ],
    )
}

/// Build the user message for the assessment stage
pub fn assess_user(flashcards: &str, topic: &str) -> String {
    render(ASSESS_USER, &[("flashcards", flashcards), ("topic", topic)])
}

/// Build the user message for the refinement stage
pub fn refine_user(flashcards: &str, assessment: &str, topic: &str) -> String {
    render(
        REFINE_USER,
        &[
            ("flashcards", flashcards),
            ("assessment", assessment),
            ("topic", topic),
        ],
    )
}

/// Build the user message for content auto-generation
pub fn content_user(topic: &str, difficulty: &str) -> String {
    render(CONTENT_USER, &[("topic", topic), ("difficulty", difficulty)])
}
