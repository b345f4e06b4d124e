use std::{
    process,
    sync::{Arc, Mutex},
    time::Duration,
};

use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing_subscriber::{filter::LevelFilter, fmt};

use brushwork_app::cli::{
    CharacterJsonArgs, Cli, Commands, GenerateArgs, GhibliArgs, UglySonicArgs,
};
use brushwork_app::config::AppConfig;
use brushwork_app::error::AppError;
use brushwork_app::scenarios;
use brushwork_app::scenarios::prompts::{GHIBLI, PROBE_PROMPT};
use brushwork_app::services::{
    Fidelity, GenContext, GenerationProfile, ImageClient, ImageModel, ImagePayload, ImageSize,
    JobOutcome, NamedPrompt, OpenAiImageClient, ProgressObserver, Quality, ReferenceImage,
    SavedArtifact, build_gen_context, run_prompt_list,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(determine_log_level(&cli));

    if let Err(err) = run(cli).await {
        eprintln!("{err}");
        process::exit(1);
    }
}

fn init_tracing(level: LevelFilter) {
    let subscriber = fmt().with_max_level(level).with_target(false).finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!("Tracing subscriber already set; skipping re-initialization.");
    }
}

fn determine_log_level(cli: &Cli) -> LevelFilter {
    match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Commands::IpBonanza(args) => {
            run_named_batches(&args, GenerationProfile::default(), vec![scenarios::ip_bonanza()])
                .await
        }
        Commands::CodeGeneration(args) => {
            run_named_batches(
                &args,
                GenerationProfile::default(),
                vec![scenarios::code_generation()],
            )
            .await
        }
        Commands::CharacterJson(args) => run_character_json(args).await,
        Commands::SystemPrompt(args) => {
            run_named_batches(
                &args,
                GenerationProfile::default(),
                scenarios::system_prompt_list(),
            )
            .await
        }
        Commands::Ghibli(args) => run_ghibli(args).await,
        Commands::UglySonic(args) => run_ugly_sonic(args).await,
        Commands::Probe => run_probe().await,
    }
}

fn load_config(args: &GenerateArgs) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(dir) = &args.out_dir {
        config.output_dir = dir.clone();
    }
    Ok(config)
}

async fn run_named_batches(
    args: &GenerateArgs,
    profile: GenerationProfile,
    prompts: Vec<NamedPrompt>,
) -> Result<(), AppError> {
    let config = load_config(args)?;
    let ctx = build_context(&config);
    let cfg = args.batch_config();

    let results = run_prompt_list(&ctx, &profile, &prompts, &cfg).await?;
    print_summary(&results, cfg.count);
    Ok(())
}

async fn run_character_json(args: CharacterJsonArgs) -> Result<(), AppError> {
    let raw = tokio::fs::read_to_string(&args.character_file)
        .await
        .map_err(|err| {
            AppError::message(format!(
                "could not read character file {}: {err}",
                args.character_file.display()
            ))
        })?;
    let character: serde_json::Value = serde_json::from_str(&raw).map_err(|err| {
        AppError::message(format!(
            "{} is not valid JSON: {err}",
            args.character_file.display()
        ))
    })?;

    run_named_batches(
        &args.generate,
        GenerationProfile::default(),
        scenarios::character_json(&character),
    )
    .await
}

async fn run_ghibli(args: GhibliArgs) -> Result<(), AppError> {
    let candidates = scenarios::ghibli_candidates();
    let input = match args.input_image {
        Some(path) => path,
        None => scenarios::first_existing(&candidates).ok_or_else(|| {
            AppError::message(
                "no input image found; pass one explicitly or place it at one of the probed paths",
            )
        })?,
    };
    println!("Using input image: {}", input.display());

    let reference = scenarios::load_reference_image(&input)?;
    let profile = style_transfer_profile(vec![reference]);

    run_named_batches(
        &args.generate,
        profile,
        vec![NamedPrompt::new("ghibli_style_transfer", GHIBLI)],
    )
    .await
}

async fn run_ugly_sonic(args: UglySonicArgs) -> Result<(), AppError> {
    let dirs = if args.image_dirs.is_empty() {
        scenarios::ugly_sonic_default_dirs()
    } else {
        args.image_dirs.clone()
    };

    let image_paths = scenarios::find_prefixed_images(&dirs, "ugly_sonic")?;
    if image_paths.is_empty() {
        println!("No `ugly_sonic*` images found in any of:");
        for dir in &dirs {
            println!("  {}", dir.display());
        }
        println!("Drop reference images there (or pass --image-dir) and rerun.");
        return Ok(());
    }

    let mut references = Vec::with_capacity(image_paths.len());
    for path in &image_paths {
        println!("Using reference image: {}", path.display());
        references.push(scenarios::load_reference_image(path)?);
    }

    run_named_batches(
        &args.generate,
        style_transfer_profile(references),
        scenarios::ugly_sonic_prompts(),
    )
    .await
}

/// gpt-5 through the Responses API with high quality and input fidelity, the
/// combination that tracks reference images most closely.
fn style_transfer_profile(references: Vec<ReferenceImage>) -> GenerationProfile {
    GenerationProfile::builder()
        .model(ImageModel::Gpt5)
        .quality(Quality::High)
        .input_fidelity(Fidelity::High)
        .size(ImageSize::Auto)
        .reference_images(references)
        .build()
}

/// Fire one generation call per model variant and report what came back.
/// Useful for checking credentials and per-model payload shapes without
/// committing to a full batch.
async fn run_probe() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let client = OpenAiImageClient::new(&config);

    let probes = [
        ("dall-e-3", GenerationProfile::builder().model(ImageModel::DallE3).build()),
        ("gpt-image-1", GenerationProfile::builder().model(ImageModel::GptImage1).build()),
        (
            "gpt-image-1 (high quality)",
            GenerationProfile::builder()
                .model(ImageModel::GptImage1)
                .quality(Quality::High)
                .build(),
        ),
    ];

    for (label, profile) in probes {
        println!("probing {label}...");
        match client.generate(&profile.request_for(PROBE_PROMPT)).await {
            Ok(ImagePayload::Inline(bytes)) => {
                println!("  ok: inline payload ({} bytes)", bytes.len());
            }
            Ok(ImagePayload::Remote(url)) => {
                println!("  ok: remote payload at {url}");
            }
            Err(err) => {
                println!("  failed: {err}");
            }
        }
    }
    Ok(())
}

fn build_context(config: &AppConfig) -> GenContext {
    build_gen_context(config, Arc::new(ConsoleProgress::default()))
}

fn print_summary(results: &IndexMap<String, Vec<SavedArtifact>>, count: u32) {
    println!();
    for (name, artifacts) in results {
        println!("{name}: {}/{count} images", artifacts.len());
        for artifact in artifacts {
            println!("  {}", artifact.path.display());
        }
    }
}

/// Console progress reporting; one bar per batch, batches never overlap
/// because the runner is sequential.
#[derive(Default)]
struct ConsoleProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgress {
    fn make_bar(total: u32, base_name: &str) -> ProgressBar {
        let pb = ProgressBar::new(u64::from(total));
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} [{elapsed_precise}] {pos}/{len} images {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_draw_target(ProgressDrawTarget::stderr_with_hz(12));
        pb.enable_steady_tick(Duration::from_millis(120));
        pb.set_message(base_name.to_string());
        pb
    }
}

impl ProgressObserver for ConsoleProgress {
    fn batch_started(&self, base_name: &str, total: u32) {
        let pb = Self::make_bar(total, base_name);
        *self.bar.lock().expect("progress bar lock poisoned") = Some(pb);
    }

    fn job_finished(&self, index: u32, _total: u32, outcome: JobOutcome) {
        let guard = self.bar.lock().expect("progress bar lock poisoned");
        if let Some(pb) = guard.as_ref() {
            pb.inc(1);
            match outcome {
                JobOutcome::Succeeded => pb.println(format!("  image {index} done")),
                JobOutcome::Failed => pb.println(format!("  image {index} failed")),
            }
        }
    }

    fn batch_finished(&self, base_name: &str, succeeded: u32, total: u32) {
        if let Some(pb) = self
            .bar
            .lock()
            .expect("progress bar lock poisoned")
            .take()
        {
            pb.finish_with_message(format!("{base_name}: {succeeded}/{total} succeeded"));
        }
    }
}
