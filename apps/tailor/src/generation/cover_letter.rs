//! Cover Letter Writer: a LaTeX letter tuned to the company's tone.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::errors::CollaboratorError;
use crate::generation::prompts::{COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_ROLE};
use crate::generation::to_pretty_json;
use crate::llm_client::prompts::{system_prompt, LATEX_ONLY_SYSTEM};
use crate::llm_client::{strip_fences, LanguageModel};
use crate::models::{truncate_chars, CompanyBrief, JobProfile};

const MAX_REQUIRED_SKILLS: usize = 8;
const BRIEF_JSON_CHARS: usize = 2000;
const RESUME_SUMMARY_CHARS: usize = 3000;
const DEFAULT_TONE: &str = "professional";

static RE_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[a-zA-Z]+\*?(\[.*?\])?\{").unwrap());
static RE_LATEX_PUNCT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[{}\\]").unwrap());
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

pub async fn write(
    llm: &dyn LanguageModel,
    job: &JobProfile,
    brief: &CompanyBrief,
    resume_latex: &str,
) -> Result<String, CollaboratorError> {
    let tone = letter_tone(job, brief);
    debug!("Writing cover letter with {tone} tone");

    let required_skills = job.required_skills.join(MAX_REQUIRED_SKILLS);
    let brief_json = to_pretty_json(brief);

    let prompt = COVER_LETTER_PROMPT_TEMPLATE
        .replace("{job_title}", job.title_or("the position"))
        .replace("{company_name}", job.company_or("your company"))
        .replace("{required_skills}", &required_skills)
        .replace("{tone}", tone)
        .replace("{company_brief_json}", truncate_chars(&brief_json, BRIEF_JSON_CHARS))
        .replace("{resume_summary}", &resume_summary(resume_latex));
    let system = system_prompt(COVER_LETTER_ROLE, LATEX_ONLY_SYSTEM);

    let raw = llm.complete(&prompt, &system).await?;
    Ok(strip_fences(&raw, &["latex", "tex"]).to_string())
}

/// The brief's tone wins over the posting's; both missing means "professional".
fn letter_tone<'a>(job: &'a JobProfile, brief: &'a CompanyBrief) -> &'a str {
    brief
        .tone()
        .or_else(|| job.tone.as_deref().map(str::trim).filter(|t| !t.is_empty()))
        .unwrap_or(DEFAULT_TONE)
}

/// Rough plain-text rendering of the résumé: commands and braces removed,
/// whitespace collapsed, capped at [`RESUME_SUMMARY_CHARS`].
fn resume_summary(resume_latex: &str) -> String {
    let text = RE_COMMAND.replace_all(resume_latex, " ");
    let text = RE_LATEX_PUNCT.replace_all(&text, " ");
    let text = RE_WHITESPACE.replace_all(&text, " ");
    truncate_chars(text.trim(), RESUME_SUMMARY_CHARS).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::test_llm::ScriptedLlm;
    use crate::pipeline::test_support::{sample_profile, VALID_RESUME};

    const LETTER: &str = "\\documentclass{letter}\n\\begin{document}\nHi\n\\end{document}";

    #[test]
    fn test_resume_summary_strips_latex() {
        let summary = resume_summary(VALID_RESUME);
        assert_eq!(
            summary,
            "article document Experience itemize item Worked on caching itemize document"
        );
    }

    #[test]
    fn test_resume_summary_is_capped() {
        let long = format!("\\begin{{document}}{}\\end{{document}}", "word ".repeat(2000));
        assert_eq!(resume_summary(&long).chars().count(), RESUME_SUMMARY_CHARS);
    }

    #[test]
    fn test_tone_precedence() {
        let mut job = sample_profile();
        let mut brief = CompanyBrief::default();
        assert_eq!(letter_tone(&job, &brief), "professional");

        job.tone = Some("corporate".to_string());
        assert_eq!(letter_tone(&job, &brief), "corporate");

        brief.tone = Some("mission-driven".to_string());
        assert_eq!(letter_tone(&job, &brief), "mission-driven");
    }

    #[tokio::test]
    async fn test_missing_fields_use_placeholders() {
        let llm = ScriptedLlm::new(vec![LETTER]);
        let letter = write(&llm, &JobProfile::default(), &CompanyBrief::skipped(), VALID_RESUME)
            .await
            .unwrap();
        assert_eq!(letter, LETTER);

        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("- Title: the position"));
        assert!(prompt.contains("- Company: your company"));
        assert!(prompt.contains("COVER LETTER TONE: professional"));
        assert!(prompt.contains("Hiring Manager \\\\ your company"));
    }

    #[tokio::test]
    async fn test_fenced_letter_is_unwrapped_and_brief_truncated() {
        let llm = ScriptedLlm::new(vec!["```latex\n\\documentclass{letter}\n```"]);
        let brief = CompanyBrief {
            mission: Some("m".repeat(5000)),
            ..Default::default()
        };
        let letter = write(&llm, &sample_profile(), &brief, VALID_RESUME)
            .await
            .unwrap();
        assert_eq!(letter, "\\documentclass{letter}");

        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("- Company: Acme Robotics"));
        assert!(prompt.contains("- Key Requirements: Rust, Kubernetes"));
        assert!(!prompt.contains(&"m".repeat(BRIEF_JSON_CHARS)));
    }
}
