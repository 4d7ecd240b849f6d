//! Progress reporting for supervised answering

use colored::Colorize;
use gnsearch_application::AgentProgressNotifier;
use gnsearch_domain::{AnswerStatus, Finding, FindingKind, Plan, SupervisorState};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Reports progress on stderr with a spinner
pub struct ProgressReporter {
    spinner: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.set_prefix("gnsearch");
        spinner.enable_steady_tick(Duration::from_millis(120));
        Self { spinner }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn state_display_name(state: SupervisorState) -> &'static str {
        match state {
            SupervisorState::Planning => "Planning",
            SupervisorState::Researching => "Researching",
            SupervisorState::ConsultingExpert => "Consulting expert",
            SupervisorState::Reflecting => "Reflecting",
            SupervisorState::Finalizing => "Writing answer",
            SupervisorState::Done => "Done",
        }
    }

    fn finding_mark(finding: &Finding) -> String {
        match finding.kind {
            FindingKind::Evidence => "v".green().to_string(),
            FindingKind::NoEvidence => "-".yellow().to_string(),
            FindingKind::Degraded => "x".red().to_string(),
        }
    }

    /// Stop the spinner and clear its line
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl AgentProgressNotifier for ProgressReporter {
    fn on_state_change(&self, _from: SupervisorState, to: SupervisorState) {
        self.spinner
            .set_message(format!("{}...", Self::state_display_name(to)));
    }

    fn on_plan(&self, plan: &Plan) {
        self.spinner
            .println(format!("{} {}", "->".cyan(), "Plan".bold()));
        for line in plan.render().lines() {
            self.spinner.println(format!("   {}", line));
        }
    }

    fn on_step_start(&self, description: &str) {
        self.spinner.set_message(description.to_string());
    }

    fn on_finding(&self, finding: &Finding) {
        self.spinner
            .println(format!("  {} {}", Self::finding_mark(finding), finding.step));
    }

    fn on_tool_call(&self, tool_name: &str, _args: &str) {
        self.spinner
            .set_message(format!("calling {}", tool_name.bold()));
    }

    fn on_retry(&self, purpose: &str, attempt: usize, error: &str) {
        self.spinner.println(format!(
            "  {} {} retry {} ({})",
            "!".yellow(),
            purpose,
            attempt,
            error.dimmed()
        ));
    }

    fn on_complete(&self, _status: AnswerStatus) {
        self.finish();
    }
}

/// Simple line-based progress for non-interactive stderr
pub struct SimpleProgress;

impl AgentProgressNotifier for SimpleProgress {
    fn on_state_change(&self, _from: SupervisorState, to: SupervisorState) {
        eprintln!(
            "{} {}",
            "->".cyan(),
            ProgressReporter::state_display_name(to).bold()
        );
    }

    fn on_plan(&self, plan: &Plan) {
        for line in plan.render().lines() {
            eprintln!("   {}", line);
        }
    }

    fn on_finding(&self, finding: &Finding) {
        eprintln!(
            "  {} {}",
            ProgressReporter::finding_mark(finding),
            finding.step
        );
    }

    fn on_tool_result(&self, tool_name: &str, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), tool_name);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), tool_name);
        }
    }

    fn on_retry(&self, purpose: &str, attempt: usize, error: &str) {
        eprintln!("  {} {} retry {}: {}", "!".yellow(), purpose, attempt, error);
    }
}
