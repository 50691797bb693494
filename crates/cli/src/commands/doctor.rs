use std::path::PathBuf;

use clerk_core::config::AppConfig;
use serde::Serialize;

use super::{build_store, load_config};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(config_path: Option<PathBuf>, json_output: bool) -> String {
    let report = build_report(config_path);

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report(config_path: Option<PathBuf>) -> DoctorReport {
    let mut checks = Vec::new();

    match load_config(config_path) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_catalog(&config));
            checks.push(check_model_credentials(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "catalog_readiness",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "model_credentials",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_catalog(config: &AppConfig) -> DoctorCheck {
    match build_store(&config.catalog) {
        Ok(store) => {
            let source = config
                .catalog
                .path
                .as_ref()
                .map(|path| format!("`{}`", path.display()))
                .unwrap_or_else(|| "builtin catalog".to_string());
            DoctorCheck {
                name: "catalog_readiness",
                status: CheckStatus::Pass,
                details: format!("loaded {} products from {source}", store.len()),
            }
        }
        Err(error) => DoctorCheck {
            name: "catalog_readiness",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_model_credentials(config: &AppConfig) -> DoctorCheck {
    match config.require_api_key() {
        Ok(_) => DoctorCheck {
            name: "model_credentials",
            status: CheckStatus::Pass,
            details: format!(
                "api key present for model `{}` at `{}`",
                config.llm.model, config.llm.base_url
            ),
        },
        Err(error) => DoctorCheck {
            name: "model_credentials",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
