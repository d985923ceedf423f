//! Health checks for the two endpoints the pipeline depends on.
//!
//! Provides the `doctor` command functionality:
//! - Ollama reachability and whether the configured model is installed
//! - SearXNG reachability and whether JSON output is enabled

use crate::config::AgentConfig;
use crate::ollama::OllamaClientBuilder;
use crate::search::SearxngClientBuilder;

// ANSI color codes for terminal output
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Health status for a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Component is healthy
    Ok,
    /// Component has a warning but is functional
    Warning(String),
    /// Component is not functional
    Error(String),
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, HealthStatus::Ok)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, HealthStatus::Error(_))
    }
}

/// Ollama connectivity information.
#[derive(Debug)]
pub struct OllamaHealth {
    pub status: HealthStatus,
    pub base_url: String,
    pub model: String,
    pub models: Vec<String>,
}

/// SearXNG connectivity information.
#[derive(Debug)]
pub struct SearxngHealth {
    pub status: HealthStatus,
    pub base_url: String,
    pub engines: Vec<String>,
}

/// Combined result of all checks.
#[derive(Debug)]
pub struct HealthReport {
    pub ollama: OllamaHealth,
    pub searxng: SearxngHealth,
}

impl HealthReport {
    /// True if no check ended in an error. Warnings are tolerated.
    pub fn is_healthy(&self) -> bool {
        !self.ollama.status.is_error() && !self.searxng.status.is_error()
    }
}

/// Runs every check against the endpoints in `config`.
pub fn run_health_checks(config: &AgentConfig) -> HealthReport {
    HealthReport {
        ollama: check_ollama_health(config),
        searxng: check_searxng_health(config),
    }
}

/// Checks that Ollama answers and has the configured model.
pub fn check_ollama_health(config: &AgentConfig) -> OllamaHealth {
    let base_url = config.ollama_url().to_string();
    let model = config.model().to_string();

    let client = match OllamaClientBuilder::from_config(config).build() {
        Ok(c) => c,
        Err(e) => {
            return OllamaHealth {
                status: HealthStatus::Error(format!("Failed to build client: {}", e)),
                base_url,
                model,
                models: Vec::new(),
            };
        }
    };

    match client.list_models() {
        Ok(models) => OllamaHealth {
            status: model_status(&model, &models),
            base_url,
            model,
            models,
        },
        Err(e) => OllamaHealth {
            status: HealthStatus::Error(format!("Connection failed: {}", e)),
            base_url,
            model,
            models: Vec::new(),
        },
    }
}

/// Checks that SearXNG answers a JSON-format search.
pub fn check_searxng_health(config: &AgentConfig) -> SearxngHealth {
    let base_url = config.searxng_url().to_string();
    let engines = config.engines().to_vec();

    let client = match SearxngClientBuilder::from_config(config).build() {
        Ok(c) => c,
        Err(e) => {
            return SearxngHealth {
                status: HealthStatus::Error(format!("Failed to build client: {}", e)),
                base_url,
                engines,
            };
        }
    };

    let status = match client.probe() {
        Ok(0) => HealthStatus::Warning("Probe search returned no results".to_string()),
        Ok(_) => HealthStatus::Ok,
        Err(e) if e.is_json_format_disabled() => HealthStatus::Error(
            "JSON output is disabled; add `json` to search.formats in settings.yml".to_string(),
        ),
        Err(e) => HealthStatus::Error(format!("Connection failed: {}", e)),
    };

    SearxngHealth {
        status,
        base_url,
        engines,
    }
}

/// Ollama reports tags like `llama3.2:latest`; a bare model name matches its `:latest` tag.
fn model_status(model: &str, installed: &[String]) -> HealthStatus {
    if installed.is_empty() {
        return HealthStatus::Warning("No models installed".to_string());
    }

    let found = installed
        .iter()
        .any(|name| name == model || name.strip_suffix(":latest") == Some(model));

    if found {
        HealthStatus::Ok
    } else {
        HealthStatus::Warning(format!(
            "Model '{}' is not installed (run `ollama pull {}`)",
            model, model
        ))
    }
}

/// Renders the report with terminal colours.
pub fn format_health_report(report: &HealthReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("{BOLD}askweb doctor{RESET}\n\n"));

    out.push_str(&format!(
        "{} Ollama   {DIM}{}{RESET}\n",
        status_icon(&report.ollama.status),
        report.ollama.base_url
    ));
    out.push_str(&format!("    model: {}\n", report.ollama.model));
    if !report.ollama.models.is_empty() {
        out.push_str(&format!(
            "    {DIM}installed: {}{RESET}\n",
            report.ollama.models.join(", ")
        ));
    }
    push_status_detail(&mut out, &report.ollama.status);

    out.push_str(&format!(
        "\n{} SearXNG  {DIM}{}{RESET}\n",
        status_icon(&report.searxng.status),
        report.searxng.base_url
    ));
    out.push_str(&format!(
        "    engines: {}\n",
        report.searxng.engines.join(" → ")
    ));
    push_status_detail(&mut out, &report.searxng.status);

    out
}

fn status_icon(status: &HealthStatus) -> String {
    match status {
        HealthStatus::Ok => format!("{GREEN}✓{RESET}"),
        HealthStatus::Warning(_) => format!("{YELLOW}!{RESET}"),
        HealthStatus::Error(_) => format!("{RED}✗{RESET}"),
    }
}

fn push_status_detail(out: &mut String, status: &HealthStatus) {
    match status {
        HealthStatus::Ok => {}
        HealthStatus::Warning(msg) => out.push_str(&format!("    {YELLOW}{msg}{RESET}\n")),
        HealthStatus::Error(msg) => out.push_str(&format!("    {RED}{msg}{RESET}\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn bare_model_name_matches_latest_tag() {
        let status = model_status("llama3.2", &names(&["qwen2.5:7b", "llama3.2:latest"]));
        assert!(status.is_ok());
    }

    #[test]
    fn exact_tag_matches() {
        let status = model_status("qwen2.5:7b", &names(&["qwen2.5:7b"]));
        assert!(status.is_ok());
    }

    #[test]
    fn missing_model_is_a_warning() {
        let status = model_status("llama3.2", &names(&["llama3.1:latest"]));
        assert!(matches!(status, HealthStatus::Warning(ref msg) if msg.contains("ollama pull llama3.2")));
    }

    #[test]
    fn no_models_is_a_warning() {
        let status = model_status("llama3.2", &[]);
        assert_eq!(status, HealthStatus::Warning("No models installed".to_string()));
    }

    #[test]
    fn report_is_healthy_with_only_warnings() {
        let report = HealthReport {
            ollama: OllamaHealth {
                status: HealthStatus::Warning("No models installed".to_string()),
                base_url: "http://localhost:11434".to_string(),
                model: "llama3.2".to_string(),
                models: Vec::new(),
            },
            searxng: SearxngHealth {
                status: HealthStatus::Ok,
                base_url: "http://127.0.0.1:8888".to_string(),
                engines: names(&["brave"]),
            },
        };

        assert!(report.is_healthy());
        let text = format_health_report(&report);
        assert!(text.contains("No models installed"));
        assert!(text.contains("engines: brave"));
    }

    #[test]
    fn report_with_error_is_unhealthy() {
        let report = HealthReport {
            ollama: OllamaHealth {
                status: HealthStatus::Ok,
                base_url: "http://localhost:11434".to_string(),
                model: "llama3.2".to_string(),
                models: names(&["llama3.2:latest"]),
            },
            searxng: SearxngHealth {
                status: HealthStatus::Error("Connection failed".to_string()),
                base_url: "http://127.0.0.1:8888".to_string(),
                engines: names(&["duckduckgo", "brave"]),
            },
        };

        assert!(!report.is_healthy());
        assert!(format_health_report(&report).contains("duckduckgo → brave"));
    }
}
