//! Company Researcher: web search plus LLM synthesis into a [`CompanyBrief`].

use tracing::{debug, info};

use crate::errors::CollaboratorError;
use crate::generation::prompts::{
    COMPANY_RESEARCH_PROMPT_TEMPLATE, COMPANY_RESEARCH_ROLE, NO_SEARCH_RESULTS,
};
use crate::llm_client::prompts::{system_prompt, JSON_ONLY_SYSTEM};
use crate::llm_client::{call_json, LanguageModel};
use crate::models::{truncate_chars, CompanyBrief};
use crate::sources::search::{dedup_by_url, SearchHit, WebSearch};

/// Unique sources passed to the model.
const MAX_SOURCES: usize = 10;
const SNIPPET_CHARS: usize = 600;

/// Researches `company_name`. A blank name yields [`CompanyBrief::skipped`]
/// without touching the network or the model.
pub async fn research(
    llm: &dyn LanguageModel,
    search: Option<&dyn WebSearch>,
    company_name: Option<&str>,
    website: Option<&str>,
) -> Result<CompanyBrief, CollaboratorError> {
    let Some(name) = company_name.map(str::trim).filter(|n| !n.is_empty()) else {
        info!("No company name in job profile, skipping research");
        return Ok(CompanyBrief::skipped());
    };

    let search_text = match search {
        Some(search) => {
            let mut hits = Vec::new();
            for query in research_queries(name, website) {
                debug!("Searching: {query}");
                hits.extend(search.search(&query).await?);
            }
            let unique = dedup_by_url(hits, MAX_SOURCES);
            debug!("Found {} unique sources", unique.len());
            format_hits(&unique)
        }
        None => {
            info!("No search backend configured, researching {name} from model knowledge only");
            NO_SEARCH_RESULTS.to_string()
        }
    };

    let prompt = COMPANY_RESEARCH_PROMPT_TEMPLATE
        .replace("{company_name}", name)
        .replace("{search_results}", &search_text);
    let system = system_prompt(COMPANY_RESEARCH_ROLE, JSON_ONLY_SYSTEM);
    Ok(call_json(llm, &prompt, &system).await?)
}

fn research_queries(name: &str, website: Option<&str>) -> Vec<String> {
    let mut queries = vec![
        format!("{name} company overview mission products"),
        format!("{name} engineering culture tech stack"),
        format!("{name} recent news"),
    ];
    if let Some(site) = website.map(str::trim).filter(|w| !w.is_empty()) {
        queries.push(format!("site:{site} about"));
    }
    queries
}

fn format_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            format!(
                "[{}] {}\n{}",
                i + 1,
                hit.url,
                truncate_chars(&hit.content, SNIPPET_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
