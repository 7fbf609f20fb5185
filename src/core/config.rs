use std::env;

/// How a finished extraction is rendered back to the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Write the HTML report to disk and attach it to the reply.
    Html,
    /// Log per-reaction counts and reply with a short summary, no file.
    Counts,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub discord_token: String,
    pub command_prefix: String,
    pub application_id: Option<u64>,
    pub output_dir: String,
    pub report_mode: ReportMode,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            discord_token: env::var("DISCORD_TOKEN").map_err(|e| format!("DISCORD_TOKEN: {}", e))?,
            command_prefix: env::var("COMMAND_PREFIX")
                .map_err(|e| format!("COMMAND_PREFIX: {}", e))?,
            application_id: match env::var("APPLICATION_ID") {
                Ok(raw) => Some(
                    raw.parse::<u64>()
                        .map_err(|e| format!("APPLICATION_ID: {}", e))?,
                ),
                Err(_) => None,
            },
            output_dir: env::var("OUTPUT_DIR").unwrap_or_else(|_| "exported_data".to_string()),
            report_mode: match env::var("REPORT_MODE") {
                Ok(raw) => match raw.as_str() {
                    "html" => ReportMode::Html,
                    "counts" => ReportMode::Counts,
                    other => return Err(format!("REPORT_MODE: unknown mode '{}'", other)),
                },
                Err(_) => ReportMode::Html,
            },
        })
    }
}
