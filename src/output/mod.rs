use crate::actions::ActionLog;
use crate::error::{Error, Result};
use crate::profile;
use crate::reconcile::{DriverState, Reconciliation};
use crate::status::StatusReport;
use crate::transition::{Transition, TransitionOutcome, TransitionPlan};
use colored::Colorize;
use serde::Serialize;

const LABEL_W: usize = 14;

pub fn print_status(report: &StatusReport) {
    let rows: Vec<(&str, String)> = vec![
        ("Profile", profile::display_name(report.profile).to_string()),
        ("OpenGL vendor", report.gl_vendor.to_string()),
        ("Power state", report.power_state.clone()),
        (
            "GPU device",
            report
                .primary_function
                .as_deref()
                .unwrap_or("not found")
                .to_string(),
        ),
    ];

    // Box width from content
    let inner_w = rows
        .iter()
        .map(|(l, v)| l.len().max(LABEL_W) + 2 + v.len())
        .max()
        .unwrap_or(40);

    let title = "GPU";
    let fill = inner_w.saturating_sub(1 + title.len());
    println!("╭─ {} {}╮", title.bold(), "─".repeat(fill));

    for (label, value) in &rows {
        let padded = format!("{:<w$}", label, w = LABEL_W);
        let pad = inner_w.saturating_sub(LABEL_W + 2 + value.len());
        println!("│ {}  {}{} │", padded.dimmed(), value, " ".repeat(pad));
    }

    println!("╰{}╯", "─".repeat(inner_w + 2));
}

/// Print any serializable report as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| Error::Other(format!("JSON serialization failed: {}", e)))?;
    println!("{}", json);
    Ok(())
}

pub fn print_plan(plan: &TransitionPlan) {
    println!(
        "{} {} -> {}",
        "Switch Plan".bold().underline(),
        profile::display_name(plan.from),
        plan.to.to_string().green()
    );
    println!();

    println!("  {} Configuration changes:", ">>".cyan());
    for step in &plan.steps {
        println!("     {}", step.description().dimmed());
    }
    println!();

    if plan.reboot_required {
        println!(
            "  {} OpenGL vendor changes: a reboot will be required",
            ">>".cyan()
        );
    } else {
        println!(
            "  {} Same OpenGL vendor: driver state will be reconciled live",
            ">>".cyan()
        );
    }
    println!();
}

pub fn print_transition(transition: &Transition) {
    match transition.outcome {
        TransitionOutcome::AlreadySet => {
            println!("Info: the {} profile is already set", transition.to);
        }
        TransitionOutcome::RebootRequired => {
            print_actions(&transition.actions);
            println!(
                "{} {}",
                format!("Switched to the {} profile.", transition.to).green().bold(),
                "Reboot to apply the change.".yellow()
            );
        }
        TransitionOutcome::Reconfigured => {
            print_actions(&transition.actions);
            println!(
                "{}",
                format!("Switched to the {} profile.", transition.to)
                    .green()
                    .bold()
            );
        }
    }
}

pub fn print_reconciliation(result: &Reconciliation) {
    print_actions(&result.actions);
    let state = match result.driver {
        DriverState::Disabled => "NVIDIA driver disabled.",
        DriverState::Enabled => "NVIDIA driver enabled.",
    };
    println!("{}", state.green().bold());
}

fn print_actions(actions: &ActionLog) {
    if actions.is_empty() {
        return;
    }
    for record in actions.records() {
        if record.succeeded {
            println!("  {} {}", "ok".green(), record.name);
        } else {
            println!("  {} {}", "!!".yellow(), record.name.dimmed());
        }
    }
    println!();
}
