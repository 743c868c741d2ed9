//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::ports::TextResolver;
use crate::domain::workflow::AnalysisRecord;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg} {elapsed:.dim}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) if !spinner.is_hidden() => {
                spinner.finish_with_message(format!("{} {}", "✓".green(), message));
            }
            // Hidden when stderr is not a terminal
            Some(spinner) => {
                spinner.finish_and_clear();
                self.success(message);
            }
            None => self.success(message),
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) if !spinner.is_hidden() => {
                spinner.finish_with_message(format!("{} {}", "✗".red(), message));
            }
            Some(spinner) => {
                spinner.finish_and_clear();
                self.error(message);
            }
            None => self.error(message),
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list and analysis metrics)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Render the service's analysis summary on stdout
    pub fn analysis(&self, analysis: &AnalysisRecord, text: &dyn TextResolver) {
        for line in Self::format_analysis(analysis, text) {
            println!("{}", line);
        }
    }

    /// Lines describing an analysis record, uncolored
    pub fn format_analysis(analysis: &AnalysisRecord, text: &dyn TextResolver) -> Vec<String> {
        if let Some(plain) = analysis.as_text() {
            return vec![plain.to_string()];
        }

        let mut lines = Vec::new();

        if let Some(score) = analysis.quality_score() {
            let score = score.to_string();
            let label = analysis.quality_label().unwrap_or("-");
            lines.push(text.resolve("report.quality", &[("score", score.as_str()), ("label", label)]));
        }

        for (key, value) in analysis.metrics() {
            lines.push(format!("{}: {}", key, value));
        }

        let recommendations = analysis.recommendations();
        if !recommendations.is_empty() {
            lines.push(text.resolve("report.recommendations", &[]));
            lines.extend(recommendations.iter().map(|r| format!("  • {}", r)));
        }

        lines
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
