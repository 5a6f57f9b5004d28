//! piiguard - Redact personal data from log lines and hash user passwords.

mod demo;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use piiguard_credentials::PasswordHasher;
use piiguard_redaction::formatter;
use piiguard_redaction::{RedactingFormatter, RedactionConfig, Redactor, USER_DATA_TARGET};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "piiguard")]
#[command(
    author,
    version,
    about = "Redact personal data from log lines and hash user passwords"
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Redact sensitive fields from a log line
    Redact {
        /// Log line made of key=value fields
        line: String,

        #[command(flatten)]
        options: RedactionArgs,

        /// Print the redacted line and statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Hash a password with a fresh salt
    Hash {
        /// Password to hash
        password: String,

        /// bcrypt cost factor (4-31)
        #[arg(long, default_value_t = piiguard_credentials::DEFAULT_COST)]
        cost: u32,
    },

    /// Check a password against a stored hash
    Verify {
        /// Hash record produced by `hash`
        hash: String,

        /// Password to check
        password: String,
    },

    /// Redact sample user records and hash a sample password (default)
    Demo {
        #[command(flatten)]
        options: RedactionArgs,
    },
}

#[derive(Args, Default)]
struct RedactionArgs {
    /// Comma-separated field names to redact [default: name,email,phone,ssn,password]
    #[arg(long, value_delimiter = ',')]
    fields: Option<Vec<String>>,

    /// Replacement for redacted values [default: ***]
    #[arg(long)]
    marker: Option<String>,

    /// Separator between fields [default: ;]
    #[arg(long)]
    separator: Option<String>,

    /// Separator between a key and its value [default: =]
    #[arg(long)]
    kv_separator: Option<String>,

    /// JSON redaction config file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
}

impl RedactionArgs {
    fn resolve(&self) -> anyhow::Result<RedactionConfig> {
        let mut config = match &self.config {
            Some(path) => RedactionConfig::from_file(path)
                .with_context(|| format!("Failed to load redaction config {:?}", path))?,
            None => RedactionConfig::default(),
        };

        if let Some(fields) = &self.fields {
            config.fields = fields
                .iter()
                .map(|f| f.trim())
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(marker) = &self.marker {
            config.marker = marker.clone();
        }
        if let Some(separator) = &self.separator {
            config.separator = separator.clone();
        }
        if let Some(kv_separator) = &self.kv_separator {
            config.kv_separator = kv_separator.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Demo {
        options: RedactionArgs::default(),
    });

    let config = match &command {
        Commands::Redact { options, .. } | Commands::Demo { options } => options.resolve()?,
        _ => RedactionConfig::default(),
    };

    let level = if cli.verbose { "debug" } else { "info" };
    let diagnostics = EnvFilter::new(format!("{},{}=off", level, USER_DATA_TARGET));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(diagnostics),
        )
        .with(formatter::layer(RedactingFormatter::new(config.clone())))
        .init();

    match command {
        Commands::Redact { line, json, .. } => {
            debug!(fields = config.fields.len(), "Redacting line");
            let result = Redactor::with_config(config).redact(&line);

            if json {
                let output = serde_json::json!({
                    "content": result.content,
                    "stats": result.stats,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", result.content);
            }
        }

        Commands::Hash { password, cost } => {
            let hasher = PasswordHasher::with_cost(cost)?;
            let record = hasher.hash(&password)?;
            println!("{}", record);
        }

        Commands::Verify { hash, password } => {
            if piiguard_credentials::is_valid(&hash, &password)? {
                println!("valid");
            } else {
                println!("invalid");
                std::process::exit(1);
            }
        }

        Commands::Demo { .. } => {
            info!("Running demonstration");
            demo::run(&config)?;
        }
    }

    Ok(())
}
