use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use spotforge::models::StylePreset;
use spotforge::{Context, Result};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spotforge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Turn a single sentence and a product photo into a six-panel storyboard video",
    long_about = None
)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log detail (once for info, twice for debug)
    #[arg(long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    project_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check configuration and create the working directories
    Init,

    /// Generate the initial six-panel storyboard
    Generate {
        /// One-sentence brief, e.g. "Cozy mug launch; target: students; cta: 'Sip slow'"
        #[arg(short, long)]
        brief: String,

        /// Product photo (PNG, JPEG or WebP)
        #[arg(short, long)]
        image: PathBuf,

        /// Visual style preset
        #[arg(short, long, default_value_t = StylePreset::default().name().to_string())]
        style: String,

        /// Brand color hex code (e.g. #FF5733)
        #[arg(short, long)]
        color: Option<String>,

        /// Overwrite an existing storyboard without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Edit a specific panel using natural language
    Edit {
        /// Panel id (1-6)
        panel_id: u32,

        /// What to change
        instruction: String,
    },

    /// Export the storyboard as MP4 plus a shot list
    Export {
        /// Add ElevenLabs narration
        #[arg(short, long)]
        narration: bool,

        /// ElevenLabs voice id
        #[arg(short, long, default_value = "default")]
        voice_id: String,
    },

    /// Show panel status
    Status {
        /// Print the raw project record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("SPOTFORGE_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    if let Some(dir) = &cli.project_dir {
        let _ = dotenvy::from_path(dir.join(".env"));
    }
    let _ = dotenvy::dotenv();
    init_tracing(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}", format!("Error: failed to create tokio runtime: {}", e).red());
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run_async(cli)) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

async fn run_async(cli: Cli) -> Result<()> {
    let project_root = match cli.project_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Commands::Init => {
            spotforge::cli::init::run(&project_root).await?;
        }

        Commands::Generate {
            brief,
            image,
            style,
            color,
            yes,
        } => {
            println!("{}", "🎬 Generating storyboard...".cyan());
            spotforge::cli::generate::run(
                &project_root,
                &brief,
                &image,
                &style,
                color.as_deref(),
                yes,
            )
            .await?;
        }

        Commands::Edit {
            panel_id,
            instruction,
        } => {
            println!(
                "{}",
                format!("✏️  Editing panel {}: '{}'", panel_id, instruction).cyan()
            );
            spotforge::cli::edit::run(&project_root, panel_id, &instruction).await?;
        }

        Commands::Export {
            narration,
            voice_id,
        } => {
            println!("{}", "📦 Exporting storyboard...".cyan());
            spotforge::cli::export::run(&project_root, narration, &voice_id).await?;
        }

        Commands::Status { json } => {
            spotforge::cli::status::run(&project_root, json).await?;
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "spotforge", &mut io::stdout());
        }
    }

    Ok(())
}
