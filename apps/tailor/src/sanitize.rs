//! Helpers for turning LLM-extracted text into safe filename components.

/// Reduces `raw` to `[A-Za-z0-9_.-]`, mapping whitespace runs to `_`.
///
/// - `"Acme Robotics, Inc."` → `"Acme_Robotics_Inc"`
/// - `"Sr. Engineer / Platform"` → `"Sr._Engineer_Platform"`
/// - `"   "` → `fallback`
pub fn filename_component(raw: &str, fallback: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;

    for c in raw.trim().chars() {
        if c.is_whitespace() || c == '/' || c == '\\' {
            pending_sep = true;
        } else if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
            if pending_sep && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            pending_sep = false;
            out.push(c);
        }
    }

    let out = out.trim_matches(|c| c == '.' || c == '_').to_string();
    if out.is_empty() {
        fallback.to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces_become_underscores() {
        assert_eq!(filename_component("Senior Rust Engineer", "role"), "Senior_Rust_Engineer");
    }

    #[test]
    fn test_punctuation_is_dropped() {
        assert_eq!(
            filename_component("Acme Robotics, Inc.", "company"),
            "Acme_Robotics_Inc"
        );
    }

    #[test]
    fn test_path_separators_never_survive() {
        let out = filename_component("../../etc/passwd", "company");
        assert!(!out.contains('/'));
        assert!(!out.starts_with('.'));
        assert_eq!(filename_component("Sr. Engineer / Platform", "role"), "Sr._Engineer_Platform");
    }

    #[test]
    fn test_empty_falls_back() {
        assert_eq!(filename_component("   ", "company"), "company");
        assert_eq!(filename_component("日本語", "role"), "role");
    }
}
