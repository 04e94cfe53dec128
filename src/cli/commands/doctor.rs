//! Doctor command - verify credentials and configuration.

use crate::cli::Output;
use crate::config::{
    IndexProvider, Prompts, Settings, ARTHUR_API_KEY, OPENAI_API_KEY, PINECONE_API_KEY,
};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("podrag doctor");
    println!();

    let lookup = |name: &str| std::env::var(name).ok();
    let checks = collect_checks(settings, lookup);

    for check in &checks {
        check.print();
    }
    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    if errors > 0 {
        Output::error(&format!("{} check(s) failed", errors));
        anyhow::bail!("doctor found {} problem(s)", errors);
    }

    Output::success("All checks passed");
    Ok(())
}

/// Evaluate every check against a variable lookup.
pub fn collect_checks<F>(settings: &Settings, lookup: F) -> Vec<CheckResult>
where
    F: Fn(&str) -> Option<String>,
{
    let mut checks = Vec::new();

    checks.push(check_secret(&lookup, OPENAI_API_KEY));

    match settings.index.provider {
        IndexProvider::Pinecone => {
            checks.push(check_secret(&lookup, PINECONE_API_KEY));
            checks.push(CheckResult::ok(
                "index",
                &format!("pinecone index '{}'", settings.index.name),
            ));
        }
        IndexProvider::Memory => {
            let path = settings.memory_index_path();
            if path.exists() {
                checks.push(CheckResult::ok("index", &format!("memory index {}", path.display())));
            } else {
                checks.push(CheckResult::error(
                    "index",
                    &format!("{} does not exist", path.display()),
                    "Export your index records to this path or switch to provider = \"pinecone\"",
                ));
            }
        }
    }

    if settings.validation.enabled {
        checks.push(check_secret(&lookup, ARTHUR_API_KEY));
        checks.push(CheckResult::ok(
            "validation",
            &format!("{} (task {})", settings.validation.base_url, settings.validation.task_id),
        ));
    } else {
        checks.push(CheckResult::warning(
            "validation",
            "disabled",
            "Set validation.enabled = true to send traces for hallucination checks",
        ));
    }

    match Prompts::load(settings.prompts.custom_dir.as_deref()) {
        Ok(_) => checks.push(CheckResult::ok("prompts", "loaded")),
        Err(e) => checks.push(CheckResult::error(
            "prompts",
            &e.to_string(),
            "Fix or remove rag.toml in the custom prompts directory",
        )),
    }

    checks
}

fn check_secret<F>(lookup: &F, name: &str) -> CheckResult
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => CheckResult::ok(name, "set"),
        _ => CheckResult::error(name, "not set", &format!("export {}='...'", name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_are_errors() {
        let checks = collect_checks(&Settings::default(), |_| None);
        let failed: Vec<_> = checks
            .iter()
            .filter(|c| c.status == CheckStatus::Error)
            .map(|c| c.name.as_str())
            .collect();
        assert!(failed.contains(&OPENAI_API_KEY));
        assert!(failed.contains(&PINECONE_API_KEY));
        assert!(failed.contains(&ARTHUR_API_KEY));
    }

    #[test]
    fn test_all_keys_present() {
        let checks = collect_checks(&Settings::default(), |_| Some("value".to_string()));
        assert!(checks.iter().all(|c| c.status == CheckStatus::Ok));
    }

    #[test]
    fn test_disabled_validation_is_a_warning() {
        let mut settings = Settings::default();
        settings.validation.enabled = false;
        let checks = collect_checks(&settings, |_| Some("value".to_string()));
        let validation = checks.iter().find(|c| c.name == "validation").unwrap();
        assert_eq!(validation.status, CheckStatus::Warning);
        assert!(!checks.iter().any(|c| c.name == ARTHUR_API_KEY));
    }
}
