use brandkit::{
    generate_designs,
    logger::{self, LogLevel, LoggerConfig},
    BatchOrchestrator, DesignExporter, GeminiImageClient, GeneratorHandle, Provider, StudioConfig,
    StudioError,
};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

const USAGE: &str = "usage: brandkit [--offline] [--json] [--out DIR] [--models] <brand description>";

struct Args {
    prompt: String,
    offline: bool,
    json: bool,
    out_dir: Option<PathBuf>,
    list_models: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        prompt: String::new(),
        offline: false,
        json: false,
        out_dir: None,
        list_models: false,
    };
    let mut words = Vec::new();

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--offline" => args.offline = true,
            "--json" => args.json = true,
            "--models" => args.list_models = true,
            "--out" => {
                let dir = iter.next().ok_or("--out needs a directory")?;
                args.out_dir = Some(PathBuf::from(dir));
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => return Err(format!("unknown flag {}\n{}", flag, USAGE)),
            _ => words.push(arg),
        }
    }

    args.prompt = words.join(" ");
    Ok(args)
}

fn list_models() {
    log::info!("🖼️  Available image generation models:");
    for model in GeminiImageClient::supported_models() {
        log::info!("  {} - {} ({})", model.id, model.name, model.provider);
    }
    #[cfg(feature = "bedrock")]
    for model in brandkit::BedrockImageClient::supported_models() {
        log::info!("  {} - {} ({})", model.id, model.name, model.provider);
    }
}

async fn run(args: Args) -> brandkit::Result<()> {
    let base_prompt = args.prompt.trim();
    if base_prompt.is_empty() {
        return Err(StudioError::InvalidPrompt(
            "describe your brand, product or idea".into(),
        ));
    }

    let designs = if args.offline {
        let config = StudioConfig::from_env().with_provider(Provider::Placeholder);
        logger::log_config_info(&config);
        BatchOrchestrator::new(Arc::new(GeneratorHandle::lazy(config)))
            .generate_batch(base_prompt)
            .await?
    } else {
        logger::log_config_info(&StudioConfig::from_env());
        generate_designs(base_prompt).await?
    };

    if args.json {
        let json = serde_json::to_string_pretty(&designs)
            .map_err(|e| StudioError::SerializationError(e.to_string()))?;
        println!("{}", json);
    } else {
        for design in &designs {
            let preview: String = design.image_locator.chars().take(72).collect();
            println!("{:<7} {:<5} {:<16} {}", design.category, design.aspect_ratio, design.id, preview);
        }
    }

    if let Some(dir) = args.out_dir {
        let exporter = DesignExporter::new();
        for result in exporter.save_all(&designs, &dir).await {
            if let Err(e) = result {
                log::error!("❌ Failed to save design: {}", e);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let level = env::var("BRANDKIT_LOG")
        .ok()
        .and_then(|value| LogLevel::parse(&value))
        .unwrap_or(LogLevel::Info);
    if let Err(e) = logger::init_with_config(LoggerConfig::new().with_level(level)) {
        eprintln!("{}", e);
    }

    if dotenv_loaded {
        log::debug!("✅ .env file loaded");
    } else {
        log::debug!("No .env file found, using system environment variables");
    }
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        }
    };

    if args.list_models {
        list_models();
        return ExitCode::SUCCESS;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("❌ {}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
