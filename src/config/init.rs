use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, SubjectSpec};
use crate::config::{get_config_path, Config, ThemeMode};
use crate::scoring::{parse_prior_score, EstimatorConfig};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Keep asking until the answer is a finite number accepted by `check`.
fn prompt_number(message: &str, default: f64, check: fn(f64) -> Result<(), &'static str>) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match parse_prior_score(&input) {
            Some(v) => match check(v) {
                Ok(()) => return Ok(v),
                Err(reason) => println!("  Invalid: {}. Try again.", reason),
            },
            None => println!("  Invalid: must be a number. Try again."),
        }
    }
}

fn non_negative(v: f64) -> Result<(), &'static str> {
    if v >= 0.0 {
        Ok(())
    } else {
        Err("must be non-negative")
    }
}

fn any_number(_: f64) -> Result<(), &'static str> {
    Ok(())
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s.to_lowercase().as_str() {
        "auto" => Some(ThemeMode::Auto),
        "dark" => Some(ThemeMode::Dark),
        "light" => Some(ThemeMode::Light),
        _ => None,
    }
}

/// Ask for every subject's question count, keeping ids and names.
fn prompt_question_counts(catalog: &Catalog) -> Result<Vec<SubjectSpec>> {
    let mut subjects = Vec::with_capacity(catalog.len());
    for subject in catalog.subjects() {
        let total_questions = loop {
            let input = prompt_with_default(
                &format!("  {} ({}) questions", subject.id, subject.name),
                &subject.total_questions.to_string(),
            )?;
            match input.parse::<u32>() {
                Ok(v) if v > 0 => break v,
                _ => println!("  Invalid: must be a positive whole number. Try again."),
            }
        };
        subjects.push(SubjectSpec {
            total_questions,
            ..subject.clone()
        });
    }
    Ok(subjects)
}

/// Serialize `config` as YAML at `path`, creating parent directories.
fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Could not serialize config: {}", e))?;

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Could not create {}", dir.display()))?;
    }
    std::fs::write(path, yaml).with_context(|| format!("Could not write {}", path.display()))
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the suggested config file path.
/// Otherwise, suggests ~/.config/konkur-calc/config.yaml.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Konkur Calculator Configuration");
    println!("===============================");
    println!();

    // 1. Theme
    let theme = loop {
        let input = prompt_with_default("Color theme (auto, dark, light)", "auto")?;
        match parse_theme(&input) {
            Some(mode) => break mode,
            None => println!("  Invalid: choose auto, dark or light. Try again."),
        }
    };

    // 2. Rank estimator
    println!();
    println!("The rank estimate is (100 - average) x A + (ceiling - prior score) x B.");
    println!("It is a rough heuristic; the defaults suit most users.");
    let estimator = if prompt_yes_no("Tune the rank estimator? (n accepts defaults)", false)? {
        let defaults = EstimatorConfig::explicit_defaults();
        EstimatorConfig {
            percentage_weight: Some(prompt_number(
                "Weight per percentage point (A)",
                defaults.percentage_weight(),
                non_negative,
            )?),
            prior_weight: Some(prompt_number(
                "Weight per prior-score point (B)",
                defaults.prior_weight(),
                non_negative,
            )?),
            prior_ceiling: Some(prompt_number(
                "Best possible prior score (ceiling)",
                defaults.prior_ceiling(),
                any_number,
            )?),
            default_prior: Some(prompt_number(
                "Prior score to assume when none is entered",
                defaults.default_prior(),
                any_number,
            )?),
        }
    } else {
        EstimatorConfig::explicit_defaults()
    };

    // 3. Subject catalog
    println!();
    let catalog = Catalog::default();
    println!(
        "Default subjects: {} ({} questions in total).",
        catalog.ids().join(", "),
        catalog.total_questions()
    );
    let subjects = if prompt_yes_no("Change question counts?", false)? {
        Some(prompt_question_counts(&catalog)?)
    } else {
        None
    };

    let default_config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };
    println!();
    let config_path = PathBuf::from(prompt_with_default(
        "Save config to",
        &default_config_path.display().to_string(),
    )?);

    if config_path.exists()
        && !prompt_yes_no(
            &format!("{} already exists. Replace it?", config_path.display()),
            false,
        )?
    {
        println!("Nothing written.");
        return Ok(());
    }

    let config = Config {
        theme: Some(theme),
        estimator: Some(estimator),
        subjects,
    };
    write_config(&config_path, &config)?;

    println!();
    println!("Saved {}", config_path.display());
    println!("Run `konkur-calc` to open the calculator.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_theme() {
        assert_eq!(parse_theme("auto"), Some(ThemeMode::Auto));
        assert_eq!(parse_theme("DARK"), Some(ThemeMode::Dark));
        assert_eq!(parse_theme("Light"), Some(ThemeMode::Light));
        assert_eq!(parse_theme("neon"), None);
    }

    #[test]
    fn test_number_checks() {
        assert!(non_negative(0.0).is_ok());
        assert!(non_negative(-0.5).is_err());
        assert!(any_number(-100.0).is_ok());
    }

    #[test]
    fn test_written_config_loads_back() {
        let path = std::env::temp_dir()
            .join("konkur_calc_init_test")
            .join("config.yaml");
        let config = Config {
            theme: Some(ThemeMode::Light),
            estimator: Some(EstimatorConfig::explicit_defaults()),
            subjects: None,
        };

        write_config(&path, &config).unwrap();
        let loaded = crate::config::load_config(Some(path.clone())).unwrap();
        assert_eq!(loaded, config);
        assert!(crate::config::validate_config(&loaded).is_ok());

        let _ = std::fs::remove_file(&path);
    }
}
