//! Prompt templates for the generative backend. Each template embeds the
//! current document value so the model rewrites rather than invents.

use crate::portfolio::{ItemKind, ScalarField};

/// Instruction prompt for rewriting one scalar field.
pub fn scalar_prompt(field: ScalarField, current: &str, request: &str) -> String {
    match field {
        ScalarField::Bio => format!(
            "You are updating the bio on a personal portfolio site.\n\
             Current bio: {current}\n\
             User request: {request}\n\n\
             Write the new bio as 2-3 professional sentences in first person.\n\
             Respond with only the bio text, no explanations."
        ),
        ScalarField::Headline => format!(
            "You are updating the headline on a personal portfolio site.\n\
             Current headline: {current}\n\
             User request: {request}\n\n\
             Write one short, punchy headline (under ten words).\n\
             Respond with only the headline, no explanations."
        ),
        ScalarField::Title => format!(
            "You are updating the professional title on a personal portfolio site.\n\
             Current title: {current}\n\
             User request: {request}\n\n\
             Write the new professional title as a few words, not a sentence.\n\
             Respond with only the title, no explanations."
        ),
    }
}

/// Instruction prompt for drafting a new portfolio item.
pub fn item_prompt(kind: ItemKind, request: &str) -> String {
    format!(
        "The user wants to add a {} to their portfolio site.\n\
         User request: {request}\n\n\
         Extract or invent a fitting name and one-sentence description.\n\
         Respond with exactly one JSON object and no other text:\n\
         {{\"title\": \"...\", \"description\": \"...\"}}",
        kind.singular()
    )
}

/// Conversational prompt for requests that edit nothing. The summary
/// gives the model enough context to answer questions about the site.
pub fn general_prompt(summary: &str, request: &str) -> String {
    format!(
        "You are the assistant managing a personal portfolio site.\n\
         {summary}\n\n\
         User message: {request}\n\n\
         Reply conversationally in at most three sentences."
    )
}
