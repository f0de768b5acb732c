use clap::ValueEnum;
use owo_colors::OwoColorize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

/// User-facing messages on stdout, separate from the tracing log on stderr
pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => println!("{} {}", "✓".green(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "success", "message": msg.as_ref() }))
            }
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors are shown even in quiet mode
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "error", "message": msg.as_ref() }))
            }
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => println!("{} {}", "⚠".yellow(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "warning", "message": msg.as_ref() }))
            }
        }
    }

    /// Print a human-mode block such as a table; ignored in JSON modes
    pub fn block(&self, text: impl std::fmt::Display) {
        if self.quiet || !self.is_human() {
            return;
        }
        println!("{}", text);
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && !self.is_human() {
            return;
        }

        self.print_json(data);
    }

    fn render_json(&self, data: &serde_json::Value) -> String {
        match self.format {
            OutputFormat::JsonPretty => serde_json::to_string_pretty(data).unwrap_or_default(),
            OutputFormat::Json | OutputFormat::Human => serde_json::to_string(data).unwrap_or_default(),
        }
    }

    fn print_json(&self, data: &serde_json::Value) {
        println!("{}", self.render_json(data));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_json_compact_and_pretty() {
        let data = json!({ "type": "success", "reviews": 3 });

        let compact = Output::new(OutputFormat::Json, false).render_json(&data);
        assert!(!compact.contains('\n'));
        assert!(compact.contains("\"reviews\":3"));

        let pretty = Output::new(OutputFormat::JsonPretty, false).render_json(&data);
        assert!(pretty.contains('\n'));
    }

    #[test]
    fn test_is_human() {
        assert!(Output::new(OutputFormat::Human, false).is_human());
        assert!(!Output::new(OutputFormat::JsonPretty, true).is_human());
    }
}
