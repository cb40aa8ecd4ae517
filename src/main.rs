//! apk-lane CLI
//!
//! Entry point for the `apk-lane` command-line tool.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use apk_lane::resolve::{resolve, ResolvedConfig};
use apk_lane::signing::{SigningConfig, SigningError};
use apk_lane::variant::{BuildVariant, VariantSettings};

#[derive(Parser)]
#[command(name = "apk-lane")]
#[command(about = "Android build-variant and signing configuration resolver", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the per-variant configuration and emit it as JSON
    Resolve {
        /// Project root (default: current directory)
        #[arg(long, short = 'r')]
        root: Option<PathBuf>,

        /// Write the artifact to a file instead of stdout
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Check that the release variant has complete signing material
    Verify {
        /// Project root (default: current directory)
        #[arg(long, short = 'r')]
        root: Option<PathBuf>,
    },

    /// Describe one variant's resolved settings
    Explain {
        /// Variant to describe (debug, release)
        #[arg(long, short = 'v')]
        variant: BuildVariant,

        /// Project root (default: current directory)
        #[arg(long, short = 'r')]
        root: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve { root, out } => {
            run_resolve(root, out);
        }
        Commands::Verify { root } => {
            run_verify(root);
        }
        Commands::Explain { variant, root, json } => {
            run_explain(variant, root, json);
        }
    }
}

fn project_root(root: Option<PathBuf>) -> PathBuf {
    root.unwrap_or_else(|| PathBuf::from("."))
}

fn resolve_or_exit(root: Option<PathBuf>) -> ResolvedConfig {
    match resolve(&project_root(root)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error resolving configuration: {}", e);
            process::exit(1);
        }
    }
}

fn run_resolve(root: Option<PathBuf>, out: Option<PathBuf>) {
    let config = resolve_or_exit(root);

    match out {
        Some(path) => {
            if let Err(e) = config.write_to_file(&path) {
                eprintln!("Error writing {}: {}", path.display(), e);
                process::exit(1);
            }
            println!("Wrote {}", path.display());
        }
        None => match config.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing configuration: {}", e);
                process::exit(1);
            }
        },
    }
}

fn run_verify(root: Option<PathBuf>) {
    let config = resolve_or_exit(root);

    let Some(signing) = config
        .variant(BuildVariant::Release)
        .and_then(|settings| settings.signing.as_ref())
    else {
        eprintln!("Error: release variant has no signing configuration");
        process::exit(1);
    };

    if signing.is_inert() {
        println!(
            "release is unsigned: no signing credentials (expected for local workflows)"
        );
        return;
    }

    match signing.material() {
        Ok(material) => {
            println!(
                "release signing material complete: alias {:?}, keystore {}",
                material.key_alias,
                material.store_file.display()
            );
        }
        Err(e @ SigningError::MissingMaterial { .. }) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_explain(variant: BuildVariant, root: Option<PathBuf>, json: bool) {
    let config = resolve_or_exit(root).redacted();

    let Some(settings) = config.variant(variant) else {
        eprintln!("Error: no settings for variant {}", variant);
        process::exit(1);
    };

    if json {
        match serde_json::to_string_pretty(settings) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error serializing settings: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("{}", explain_human(variant, &config, settings));
    }
}

fn explain_human(
    variant: BuildVariant,
    config: &ResolvedConfig,
    settings: &VariantSettings,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("variant: {}\n", variant));
    out.push_str(&format!("application id: {}\n", settings.application_id));
    out.push_str(&format!(
        "version: {} ({})\n",
        config.version_name, config.version_code
    ));
    out.push_str(&format!(
        "sdk: min {}, target {}, compile {}\n",
        config.sdk.min, config.sdk.target, config.sdk.compile
    ));
    out.push_str(&format!(
        "minify: {}\n",
        if settings.minify_enabled { "on" } else { "off" }
    ));
    out.push_str(&format!(
        "shrink resources: {}\n",
        if settings.shrink_resources { "on" } else { "off" }
    ));
    out.push_str(&format!("signing: {}", signing_status(settings.signing.as_ref())));
    out
}

fn signing_status(signing: Option<&SigningConfig>) -> String {
    match signing {
        None => "none".to_string(),
        Some(config) if config.is_inert() => {
            format!("{} (no credentials, unsigned)", config.name)
        }
        Some(config) => match config.material() {
            Ok(_) => format!("{} (complete)", config.name),
            Err(SigningError::MissingMaterial { field, .. }) => {
                format!("{} (incomplete: missing {})", config.name, field)
            }
        },
    }
}
