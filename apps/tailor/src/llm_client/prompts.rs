// Cross-cutting prompt fragments. Each collaborator keeps its own prompts in
// generation/prompts.rs and appends one of these to its system prompt.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "Always respond with a single valid JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt fragment that enforces raw LaTeX output.
pub const LATEX_ONLY_SYSTEM: &str = "Return ONLY complete, compilable LaTeX source. \
    Do NOT use markdown code fences. \
    Do NOT include explanations before or after the document.";

/// Joins a role description with an output-format fragment.
pub fn system_prompt(role: &str, format: &str) -> String {
    format!("{role}\n\n{format}")
}
