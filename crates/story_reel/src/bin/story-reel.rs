use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use ffmpeg_bindings::Ffmpeg;

use story_reel::{
    console,
    layout::{self, ProjectLayout},
    ollama::OllamaCli,
    synthesis::Automatic1111Client,
    tracing::init_tracing_subscriber,
    video::FfmpegEncoder,
    Config, Progress, ReelPipelineBuilder, RunOutcome, Storyboard,
};

#[derive(Parser)]
#[command(
    name = "story-reel",
    about = "Turn a script and a narration into an illustrated video"
)]
struct Cli {
    /// Project directory holding story/, audio/, models/, loras/ and config/
    #[arg(long, env = "STORY_REEL_ROOT", default_value = ".")]
    root: PathBuf,

    /// Config file, defaults to <root>/config/config.yaml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Script to illustrate; chosen from <root>/story when omitted
    #[arg(long)]
    script: Option<PathBuf>,

    /// Narration track; chosen from <root>/audio when omitted
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Image style appended to every prompt
    #[arg(long)]
    style: Option<String>,

    /// Stable Diffusion checkpoint name
    #[arg(long)]
    model: Option<String>,

    /// LoRA name
    #[arg(long)]
    lora: Option<String>,

    /// Skip the approval question before rendering images
    #[arg(short, long)]
    yes: bool,
}

fn select_file(
    input: &mut impl BufRead,
    dir: &Path,
    kind: &str,
    extensions: &[&str],
) -> anyhow::Result<PathBuf> {
    let files = layout::list_files(dir, extensions)
        .with_context(|| format!("Failed to list {kind} files in {}", dir.display()))?;
    if files.is_empty() {
        anyhow::bail!(
            "No {kind} files found in {}. Please add some and try again.",
            dir.display()
        );
    }

    let names = files
        .iter()
        .map(|f| f.file_name().unwrap_or_default().to_string_lossy())
        .collect::<Vec<_>>();
    let idx = console::choose(input, &mut io::stdout(), &format!("Available {kind} files"), &names)?
        .with_context(|| format!("No {kind} file selected"))?;

    println!("Selected {kind} file: {}", files[idx].display());
    Ok(files[idx].clone())
}

fn select_checkpoint(
    input: &mut impl BufRead,
    given: Option<String>,
    available: &[String],
    label: &str,
) -> anyhow::Result<Option<String>> {
    if given.is_some() {
        return Ok(given);
    }
    let choice = console::choose(input, &mut io::stdout(), label, available)?;
    Ok(choice.map(|idx| available[idx].clone()))
}

fn print_progress(progress: Progress<'_>) {
    match progress {
        Progress::Rendering { index, total } => println!("Generating image {index}/{total}..."),
        Progress::Rendered(image) => println!("Saved {}", image.path.display()),
        Progress::Skipped { index, error, .. } => {
            println!("Failed to generate image for prompt {index} ({error}). Skipping.")
        }
        Progress::Assembling { images } => println!("\nAssembling video from {images} images..."),
    }
}

fn print_storyboard(storyboard: &Storyboard) {
    println!("\nKey Points:");
    for (idx, point) in storyboard.key_points.iter().enumerate() {
        println!("{}. {point}", idx + 1);
    }

    println!("\nCharacters:");
    for (idx, character) in storyboard.characters.iter().enumerate() {
        println!("{}. {character}", idx + 1);
    }

    println!("\nGenerated Prompts:");
    for (idx, prompt) in storyboard.prompts.iter().enumerate() {
        println!("{}. {prompt}", idx + 1);
    }
    println!(
        "\nNumber of images to be generated: {}",
        storyboard.prompts.len()
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    let project = ProjectLayout::new(&cli.root);
    init_tracing_subscriber(&project.log_file())?;

    let config_path = cli.config.clone().unwrap_or_else(|| project.config_file());
    let config = Config::load(&config_path)
        .context("Failed to load configuration. Check logs for details")?;

    project
        .ensure_input_dirs()
        .context("Failed to create input directories")?;

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let script_path = match cli.script {
        Some(path) => path,
        None => select_file(&mut input, &project.story_dir(), "script", layout::SCRIPT_EXTENSIONS)?,
    };
    let audio_path = match cli.audio {
        Some(path) => path,
        None => select_file(&mut input, &project.audio_dir(), "audio", layout::AUDIO_EXTENSIONS)?,
    };

    let style = match cli.style {
        Some(style) => style,
        None => console::ask(
            &mut input,
            &mut io::stdout(),
            "Enter the style you want for the images (e.g., comics, illustration)",
            &config.default_style,
        )?,
    };

    let models = layout::list_checkpoints(&project.models_dir(&config));
    let model = select_checkpoint(
        &mut input,
        cli.model.or_else(|| config.sd_model.clone()),
        &models,
        "Select the Stable Diffusion model you want to use",
    )?
    .context("No models available")?;

    let loras = layout::list_checkpoints(&project.loras_dir(&config));
    let lora = select_checkpoint(
        &mut input,
        cli.lora.or_else(|| config.lora_model.clone()),
        &loras,
        "Select the LoRA you want to use",
    )?;
    if lora.is_none() {
        println!("No LoRAs available. Proceeding without LoRA.");
    }

    let ffmpeg = Ffmpeg::new().context("ffmpeg is required for video assembly")?;

    let pipeline = ReelPipelineBuilder::new(&cli.root)
        .llm(OllamaCli::from_config(&config.llm))
        .image_provider(Automatic1111Client::new(&config.automatic1111_api))
        .encoder(FfmpegEncoder::new(ffmpeg, config.video.clone()))
        .model(Some(model))
        .lora(lora)
        .style(style)
        .build();

    println!("\nAnalyzing script and generating prompts...");
    let skip_approval = cli.yes;
    let outcome = pipeline
        .run_with_progress(
            &script_path,
            &audio_path,
            |storyboard| {
                print_storyboard(storyboard);
                if skip_approval {
                    return true;
                }
                console::confirm(
                    &mut input,
                    &mut io::stdout(),
                    "Do you approve the prompts and settings?",
                )
                .unwrap_or(false)
            },
            print_progress,
        )
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Run failed"))?;

    match outcome {
        RunOutcome::Completed { video, images } => {
            println!(
                "Video created successfully at {} ({} images)",
                video.display(),
                images.len()
            );
        }
        RunOutcome::Cancelled => println!("Operation cancelled by the user."),
    }
    io::stdout().flush()?;

    Ok(())
}
