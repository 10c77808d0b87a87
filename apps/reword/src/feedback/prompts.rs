// Prompt template for resume feedback. The level and resume text are user
// controlled and are embedded verbatim.

/// Renders the feedback prompt for a resume targeting a `level` position.
///
/// Single pass: braces or placeholder-looking text inside either argument
/// are copied through untouched.
pub fn build_feedback_prompt(level: &str, resume_text: &str) -> String {
    format!(
        "Provide a detailed review of the following resume for a {level} software engineering position.
Focus on clarity, structure, impact, readability, and areas of improvement.
Suggest how to enhance descriptions, highlight key achievements, and improve formatting.
Then, rewrite key sections to be more compelling and professional.

Resume Content:
{resume_text}

Resume Feedback and Suggested Improvements:
"
    )
}
