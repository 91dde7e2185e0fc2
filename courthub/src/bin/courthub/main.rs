mod commands;
mod examples;
mod output;
mod theme;

use std::fmt::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{
    Command, CommandFactory, FromArgMatches, Parser, Subcommand,
    builder::{Styles, styling::AnsiColor},
};
use colored::Colorize;
use courthub::HubConfig;

use commands::{
    promote::{PromoteArgs, handle_promote},
    reconcile::{ReconcileArgs, handle_reconcile},
    serve::{ServeArgs, handle_serve},
};
use examples::{ExampleGroup, command_examples};
use output::{GlobalOptions, OutputFormat, OutputManager};
use theme::{ICONS, THEME};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("PORT", "Port the API listens on (default 3000)"),
    ("REDIS_URL", "Redis connection URL for the document store"),
    ("JWT_SECRET", "Secret used to sign and verify session tokens"),
    ("RUST_LOG", "Log filter, e.g. info or courthub=debug"),
];

#[derive(Parser)]
#[command(name = "courthub")]
#[command(version)]
#[command(
    about = "Badminton equipment marketplace and community forum API",
    long_about = r#"CourtHub serves the equipment catalogue, reviews, forum posts and comments
over a JSON REST API backed by RedisJSON.

Commands:
  serve      Run the HTTP API
  promote    Grant the admin role to an account
  reconcile  Rebuild ratings and comment counts from their source rows
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Configuration file (defaults to ./courthub.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn parse_styled() -> Self {
        let matches = build_cli_command().get_matches();
        Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
    }
}

/// The derived command plus themed help, the environment appendix and
/// per-subcommand examples.
fn build_cli_command() -> Command {
    let mut command = Cli::command()
        .styles(help_styles())
        .after_long_help(environment_appendix());
    for example in command_examples() {
        if let Some(subcommand) = command.find_subcommand_mut(example.name) {
            *subcommand = subcommand.clone().after_long_help(render_examples(example.groups));
        }
    }
    command
}

fn render_examples(groups: &[ExampleGroup]) -> String {
    let mut buffer = format!("{}\n", "Examples:".color(THEME.highlight).bold());
    for group in groups {
        let _ = writeln!(buffer, "  {}", group.title.color(THEME.primary).bold());
        for command in group.commands {
            let _ = writeln!(
                buffer,
                "    {} {}",
                ICONS.arrow.color(THEME.secondary),
                command.color(THEME.secondary)
            );
        }
    }
    buffer
}

fn environment_appendix() -> String {
    let mut buffer = format!("{}\n", "Environment Variables:".color(THEME.highlight).bold());
    for (key, description) in ENVIRONMENT_VARIABLES {
        let _ = writeln!(
            buffer,
            "  {} {}",
            format!("{key:<12}").color(THEME.key).bold(),
            description.color(THEME.value)
        );
    }
    buffer
}

fn help_styles() -> Styles {
    Styles::styled()
        .usage(AnsiColor::BrightBlue.on_default().bold())
        .header(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Magenta.on_default())
        .placeholder(AnsiColor::BrightBlack.on_default())
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().bold())
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),

    /// Grant the admin role to a registered account
    Promote(PromoteArgs),

    /// Rebuild equipment ratings and post comment counts
    Reconcile(ReconcileArgs),
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse_styled();

    if let Err(err) = execute(cli).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let output = OutputManager::new(GlobalOptions {
        output_format: cli.output,
        quiet: cli.quiet,
        no_color: cli.no_color,
    });

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = HubConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve(args) => handle_serve(args, config, &output).await,
        Commands::Promote(args) => handle_promote(args, config, &output).await,
        Commands::Reconcile(args) => handle_reconcile(args, config, &output).await,
    }
}
