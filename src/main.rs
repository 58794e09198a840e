use anyhow::Context;
use clap::{Parser, Subcommand};
use postergen::{
    Alignment, Attachment, ClientConfig, FormSession, GenerationClient, GenerationForm,
    HttpTransport, Layout, MoodboardForm, Orientation, QuotePosterForm,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "postergen", version, about = "Generate quote posters and moodboards")]
struct Cli {
    /// Base URL of the generation service (overrides POSTERGEN_ORIGIN)
    #[arg(long, global = true)]
    origin: Option<String>,

    /// Log requests at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render text onto a poster
    Poster {
        #[arg(long)]
        text: String,
        #[arg(long, default_value_t = 50)]
        font_size: u32,
        #[arg(long, default_value = "#FFFFFF")]
        color: String,
        #[arg(long, default_value = "center")]
        alignment: Alignment,
        #[arg(long, default_value = "horizontal")]
        orientation: Orientation,
        /// Background image to upload with the request
        #[arg(long)]
        background: Option<PathBuf>,
        /// Name of a background already stored on the service
        #[arg(long, conflicts_with = "background")]
        existing_background: Option<String>,
        /// Directory to save the poster into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Arrange images in a grid
    Moodboard {
        /// 4x4, 8-grid, 16-grid, portrait-8 or portrait-16
        #[arg(long, default_value = "4x4")]
        layout: Layout,
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// Images to place on the board, in order
        files: Vec<PathBuf>,
    },
    /// Store a background on the service for reuse with --existing-background
    UploadBackground { file: PathBuf },
    /// List backgrounds stored on the service
    Backgrounds,
    /// Check that the service is reachable
    Health,
}

fn run_session<F: GenerationForm>(
    client: &GenerationClient<HttpTransport>,
    form: F,
    out: PathBuf,
) -> anyhow::Result<ExitCode> {
    let mut session = FormSession::new(form);
    let result = session.submit(client).clone();
    match result.artifact_url() {
        Some(url) => println!("Generated: {}", url),
        None => {
            let message = result
                .error_message()
                .unwrap_or_else(|| session.form().endpoint().fallback_message());
            eprintln!("❌ {}", message);
            return Ok(ExitCode::FAILURE);
        }
    }
    let path = session
        .download(client, &out)
        .with_context(|| format!("Failed to save image into {}", out.display()))?;
    println!("Saved: {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = ClientConfig::from_env()?;
    if let Some(origin) = cli.origin.as_deref() {
        config.origin = ClientConfig::new(origin)?.origin;
    }
    log::debug!("Using service at {}", config.origin);
    let client = GenerationClient::new(config)?;

    match cli.command {
        Command::Poster {
            text,
            font_size,
            color,
            alignment,
            orientation,
            background,
            existing_background,
            out,
        } => {
            let background = background
                .map(Attachment::from_path)
                .transpose()
                .context("Failed to read background image")?;
            let form = QuotePosterForm {
                text,
                font_size,
                color,
                alignment,
                orientation,
                background,
                existing_background,
            };
            run_session(&client, form, out)
        }
        Command::Moodboard { layout, out, files } => {
            let mut form = MoodboardForm::new(layout);
            for path in files {
                let file = Attachment::from_path(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                form.add_file(file);
            }
            run_session(&client, form, out)
        }
        Command::UploadBackground { file } => {
            let file = Attachment::from_path(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            match client.upload_background(file) {
                Ok(name) => {
                    println!("{}", name);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("❌ {}", e.user_message("Failed to upload background"));
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Backgrounds => {
            for name in client.list_backgrounds()? {
                println!("{}", name);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Health => {
            let info = client.health()?;
            println!("{} ({})", info.message, info.status);
            for endpoint in info.endpoints {
                println!("  {}", endpoint);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("postergen: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
