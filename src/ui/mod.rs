//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, Write};

use anyhow::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_banner, display_boundary_warning, display_command, display_error,
    display_manifests, display_manual_push_instruction, display_settings, display_status,
    display_success, display_version_change,
};

/// Prompts user to select one item from a list.
///
/// If only one item is available, returns it directly without prompting.
/// Otherwise displays a numbered list and accepts a 1-based index selection.
/// Pressing Enter selects the first item.
pub fn select_from_list(title: &str, items: &[String]) -> Result<String> {
    if items.len() == 1 {
        return Ok(items[0].clone());
    }

    println!("\n{}", console::style(title).bold());
    for (i, item) in items.iter().enumerate() {
        println!("  {}. {}", i + 1, item);
    }

    print!("\nSelect (1-{}) [default: 1]: ", items.len());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let selection = input.trim();

    let index = if selection.is_empty() {
        1
    } else {
        selection.parse::<usize>().unwrap_or(0)
    };

    if index > 0 && index <= items.len() {
        Ok(items[index - 1].clone())
    } else {
        Err(anyhow::anyhow!("Invalid selection"))
    }
}

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Accepts "y" or "yes" (case-insensitive) as confirmation. Default is "no"
/// if user presses Enter.
pub fn confirm_action(prompt: &str) -> Result<bool> {
    print!("\n{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
