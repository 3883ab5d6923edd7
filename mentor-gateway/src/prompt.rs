//! Tutor prompt construction — pure string formatting.

/// Build the tutoring prompt sent to the generative backend.
///
/// `context == "playground"` switches the framing from a numbered lesson to
/// free experimentation; absent code or message get explicit placeholders
/// so the model never sees an empty slot.
#[must_use]
pub fn build_prompt(
    message: &str,
    code: Option<&str>,
    lesson_id: Option<&str>,
    context: Option<&str>,
) -> String {
    let setting = if context == Some("playground") {
        "You are helping in the playground where students can experiment freely.".to_owned()
    } else {
        format!(
            "You are helping with lesson {}.",
            lesson_id.unwrap_or("unknown")
        )
    };
    let code = match code {
        Some(c) if !c.trim().is_empty() => c,
        _ => "No code provided",
    };

    format!(
        "You are a friendly and encouraging Python tutor for students learning to program.\n\
         {setting}\n\
         Keep explanations simple, short, and supportive; prefer small hints over full solutions.\n\
         Spot mistakes or inefficiencies in the student's code and ask where they need help.\n\
         Code snippets in your reply are optional and must contain code only.\n\n\
         Current code context:\n{code}\n\n\
         Student message: {message}\n"
    )
}
