//! Pure formatting functions for UI output.
//!
//! This module contains all display logic separated from user interaction.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::manifest::Manifest;

/// Print the tool banner.
pub fn display_banner() {
    println!();
    println!("{}", style("Next Version").bold().color256(208));
    println!("{}", style(env!("CARGO_PKG_VERSION")).dim());
    println!();
}

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Echo a command the tool ran on the user's behalf.
pub fn display_command(command: &str) {
    println!("{} {}", style(">").cyan(), style(command).dim());
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow().bold(), warning);
}

/// Display the resolved workflow settings as padded key/value lines.
pub fn display_settings(settings: &[(&str, String)]) {
    let max_len = settings.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, value) in settings {
        println!(
            "  {:<width$}   {}",
            key,
            style(value).cyan(),
            width = max_len
        );
    }
    println!();
}

/// Display the version change being applied.
pub fn display_version_change(current: &str, next: &str) {
    println!("\n{}", style("Version Change:").bold());
    println!("  Current: {}", style(current).red());
    println!("  Next:    {}", style(next).green());
}

/// Display the manifests detected at the repository root with their versions.
pub fn display_manifests(manifests: &[(Manifest, String)]) {
    println!("{}", style("Detected manifests:").bold());
    for (manifest, version) in manifests {
        println!(
            "  - {} ({})",
            manifest.kind,
            style(version).cyan()
        );
    }
}

/// Display manual push instruction for a branch.
pub fn display_manual_push_instruction(branch: &str, remote: &str) {
    println!(
        "\n{} To push this branch later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push -u {} {}", remote, branch)).cyan()
    );
}
