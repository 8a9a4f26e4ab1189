use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use konkur_calc::buffered_eprintln;
use konkur_calc::catalog::Catalog;
use konkur_calc::config::Config;
use konkur_calc::scoring::SubjectEntry;
use konkur_calc::session::ExamSession;

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_USAGE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive calculator (default if no subcommand)
    Tui,
    /// Score subjects given on the command line and estimate a rank
    Calc {
        /// Subject counts as ID=CORRECT,WRONG[,UNANSWERED] (repeatable)
        #[arg(short, long = "subject", value_name = "ENTRY")]
        subjects: Vec<String>,

        /// Diploma GPA; missing, zero, or unparseable uses the configured default
        #[arg(short, long, value_name = "GPA")]
        prior: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Disable colors even on a terminal
        #[arg(long)]
        no_color: bool,
    },
    /// List the subjects and their question counts
    Subjects,
    /// Interactive setup wizard to create a config file
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "konkur-calc")]
#[command(about = "Konkur percentage calculator and rank estimator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/konkur-calc/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);
    let config_path = cli.config.map(PathBuf::from);

    // Init runs before loading: it is how a missing config gets created
    if let Commands::Init = command {
        if let Err(e) = konkur_calc::config::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match konkur_calc::config::load_config(config_path.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = konkur_calc::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    // Validated above, so the catalog is present
    let catalog = match config.catalog() {
        Ok(c) => c,
        Err(_) => std::process::exit(EXIT_CONFIG),
    };

    if cli.verbose {
        match &config_path {
            Some(p) => eprintln!("Loaded config from {}", p.display()),
            None if config == Config::default() => eprintln!("Using built-in defaults"),
            None => eprintln!("Loaded config from default location"),
        }
        eprintln!(
            "Catalog: {} subjects, {} questions",
            catalog.len(),
            catalog.total_questions()
        );
    }

    let code = match command {
        Commands::Subjects => {
            print_subjects(&catalog);
            EXIT_SUCCESS
        }
        Commands::Calc {
            subjects,
            prior,
            format,
            no_color,
        } => run_calc(&config, &catalog, &subjects, prior.as_deref(), format, no_color, cli.verbose),
        Commands::Tui => {
            let theme = konkur_calc::tui::resolve_theme(config.theme_mode());
            if cli.verbose {
                eprintln!("Theme: {:?}", theme);
            }
            let app = konkur_calc::tui::App::new(
                ExamSession::new(&catalog),
                config.estimator(),
                konkur_calc::tui::ThemeColors::for_theme(theme),
                cli.verbose,
            );
            match konkur_calc::tui::run_tui(app).await {
                Ok(()) => EXIT_SUCCESS,
                Err(e) => {
                    eprintln!("Terminal error: {:#}", e);
                    EXIT_FAILURE
                }
            }
        }
        Commands::Init => EXIT_SUCCESS,
    };

    std::process::exit(code);
}

fn print_subjects(catalog: &Catalog) {
    for subject in catalog.subjects() {
        println!("{}\t{}\t{}", subject.id, subject.total_questions, subject.name);
    }
}

fn run_calc(
    config: &Config,
    catalog: &Catalog,
    entries: &[String],
    prior: Option<&str>,
    format: OutputFormat,
    no_color: bool,
    verbose: bool,
) -> i32 {
    let mut session = ExamSession::new(catalog);

    for raw in entries {
        let entry = match SubjectEntry::parse(raw) {
            Ok(e) => e,
            Err(e) => {
                eprintln!("{}", e);
                return EXIT_USAGE;
            }
        };
        if let Err(e) = session.set_counts(&entry.id, entry.correct, entry.wrong, entry.unanswered) {
            eprintln!("{}", e);
            return EXIT_USAGE;
        }
    }

    if let Some(raw) = prior {
        session.set_prior_text(raw);
        if verbose && session.prior_academic_score.is_none() {
            buffered_eprintln!("Prior score '{}' is missing or zero; using the default", raw);
        }
    }

    let estimator = config.estimator();
    let summary = session.compute_all(&estimator);

    if verbose {
        for warning in session.count_warnings() {
            buffered_eprintln!("warning: {}", warning);
        }
        if let Some(average) = summary.average {
            let breakdown =
                konkur_calc::scoring::explain_rank(average, session.prior_academic_score, &estimator);
            eprintln!("Rank breakdown:");
            eprintln!("{}", konkur_calc::output::format_breakdown(&breakdown));
        }
    }

    let output = match format {
        OutputFormat::Table => {
            let use_colors = !no_color && konkur_calc::output::should_use_colors();
            konkur_calc::output::format_session_table(&session, &summary, use_colors)
        }
        OutputFormat::Tsv => konkur_calc::output::format_tsv(&session, &summary),
        OutputFormat::Json => match konkur_calc::output::format_json(&session, &summary) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Failed to serialize report: {:#}", e);
                return EXIT_FAILURE;
            }
        },
    };
    println!("{}", output);

    EXIT_SUCCESS
}
