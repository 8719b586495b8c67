use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vision_assist::guidance::Severity;
use vision_assist::models::{AudioEncoding, Config};
use vision_assist::{ActionOutput, Command, EmptyResult, VisionClient};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Action {
    /// Describe the scene with detected labels
    Scene,
    /// Detect objects and obstacles
    Objects,
    /// Read text in the image aloud
    Speech,
    /// Give guidance based on text in the image
    Guidance,
}

impl From<Action> for Command {
    fn from(action: Action) -> Self {
        match action {
            Action::Scene => Command::DescribeScene,
            Action::Objects => Command::DetectObjects,
            Action::Speech => Command::ReadAloud,
            Action::Guidance => Command::Guidance,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "vision-assist")]
#[command(about = "Describe, read, and explain images for visually impaired users")]
struct CliArgs {
    #[arg(value_enum)]
    action: Action,

    /// Image to analyse (JPEG, PNG, GIF, WebP, BMP).
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// Where to write synthesized audio.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Override the configured result limit for labels and objects.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_results: Option<u32>,
}

fn default_audio_path(encoding: AudioEncoding) -> PathBuf {
    PathBuf::from(format!("speech.{}", encoding.file_extension()))
}

fn render(output: &ActionOutput, audio_path: &Path) -> Result<()> {
    match output {
        ActionOutput::SceneDescription(labels) => {
            println!("Scene Description");
            println!("{}", labels.join(", "));
        }
        ActionOutput::Objects(objects) => {
            println!("Detected Objects and Obstacles");
            for object in objects {
                println!("- {} (Confidence: {:.2})", object.name, object.score);
            }
        }
        ActionOutput::Speech {
            text,
            audio,
            encoding,
        } => {
            println!("Extracted Text");
            println!("{}", text);
            std::fs::write(audio_path, audio)?;
            println!(
                "Audio ({}, {} bytes) saved to {}",
                encoding.mime_type(),
                audio.len(),
                audio_path.display()
            );
        }
        ActionOutput::Guidance { text, guidance } => {
            println!("Recognized Text");
            println!("{}", text);
            println!("Personalized Guidance");
            let tag = match guidance.severity {
                Severity::Warning => "WARNING",
                Severity::Info => "INFO",
            };
            println!("[{}] {}", tag, guidance.message);
        }
        ActionOutput::Empty(empty) => {
            if let EmptyResult::NoAudio { text } = empty {
                println!("Extracted Text");
                println!("{}", text);
            }
            println!("{}", empty.message());
        }
    }
    Ok(())
}

async fn run(args: CliArgs) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(max_results) = args.max_results {
        config.max_results = max_results;
    }

    let client = VisionClient::from_config(&config)?;
    let image = std::fs::read(&args.image)?;
    info!("Loaded {} ({} bytes)", args.image.display(), image.len());

    let output = client.run(args.action.into(), &image).await?;

    let audio_path = args
        .output
        .unwrap_or_else(|| default_audio_path(config.voice.audio_encoding));
    render(&output, &audio_path)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vision_assist=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Action failed: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
