use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use stravi_lib::settings::{Settings, load_settings, save_settings, settings_path, settings_string};

use crate::CliError;

/// Show the effective settings and where they come from.
pub(crate) fn run_config_show() {
    let path = settings_path();

    log::info!(
        "{}",
        "Settings".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");
    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    for line in settings_string(&load_settings()).lines() {
        log::info!("  {}", line);
    }
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    println!("{}", settings_path().display());
}

/// Write a settings file holding the defaults.
pub(crate) fn run_config_init(force: bool) -> Result<(), CliError> {
    let path = settings_path();
    if path.exists() && !force {
        return Err(CliError::config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    save_settings(&Settings::default())?;
    log::info!(
        "{} Wrote {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
