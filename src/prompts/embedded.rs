//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Flashcard generation system prompt
pub const GENERATE: &str = include_str!("../../prompts/generate.pmt");

/// Quality assessment system prompt
pub const ASSESS: &str = include_str!("../../prompts/assess.pmt");

/// Refinement system prompt
pub const REFINE: &str = include_str!("../../prompts/refine.pmt");

/// Content auto-generation system prompt
pub const CONTENT: &str = include_str!("../../prompts/content.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "generate" => {
            debug!("get_embedded: matched generate");
            Some(GENERATE)
        }
        "assess" => {
            debug!("get_embedded: matched assess");
            Some(ASSESS)
        }
        "refine" => {
            debug!("get_embedded: matched refine");
            Some(REFINE)
        }
        "content" => {
            debug!("get_embedded: matched content");
            Some(CONTENT)
        }
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
