//! Styled terminal output for Rota.
//!
//! All messages go to stderr so stdout stays clean for route output.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// Returns a `ColorfulTheme` with Rota's prompt styling.
pub fn rota_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("?".to_string()).for_stderr().cyan(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().bright().black(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        ..ColorfulTheme::default()
    }
}

pub fn success(message: &str) {
    let green = Style::new().for_stderr().green();
    eprintln!("{} {}", green.apply_to("✓"), message);
}

pub fn hint(message: &str) {
    let dim = Style::new().for_stderr().dim();
    eprintln!("  {}", dim.apply_to(message));
}
