use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::channel::{ExerciseChannel, OfflineChannel};
use services::speech::{PlatformSpeech, SpeechNotifier};
use services::{BackendHealth, Clock, ExerciseService, SocketChannel};
use ui::{App, UiApp, build_app_context};

const DEFAULT_BACKEND_URL: &str = "ws://localhost:5000/socket";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidBackendUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidBackendUrl { raw } => {
                write!(f, "invalid --backend value: {raw} (expected ws:// or wss://)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    exercise_service: ExerciseService,
    channel: Arc<dyn ExerciseChannel>,
    speech: Arc<dyn SpeechNotifier>,
}

impl UiApp for DesktopApp {
    fn exercise_service(&self) -> ExerciseService {
        self.exercise_service.clone()
    }

    fn channel(&self) -> Arc<dyn ExerciseChannel> {
        Arc::clone(&self.channel)
    }

    fn speech(&self) -> Arc<dyn SpeechNotifier> {
        Arc::clone(&self.speech)
    }
}

struct Args {
    backend_url: String,
    voice: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--backend <ws_url>] [--voice <name>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --backend {DEFAULT_BACKEND_URL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MOTIONAID_BACKEND_URL, MOTIONAID_VOICE");
}

fn validate_backend_url(raw: String) -> Result<String, ArgsError> {
    if raw.starts_with("ws://") || raw.starts_with("wss://") {
        Ok(raw)
    } else {
        Err(ArgsError::InvalidBackendUrl { raw })
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut backend_url = std::env::var("MOTIONAID_BACKEND_URL")
            .ok()
            .map_or_else(|| Ok(DEFAULT_BACKEND_URL.into()), validate_backend_url)?;
        let mut voice = std::env::var("MOTIONAID_VOICE")
            .ok()
            .filter(|value| !value.trim().is_empty());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--backend" => {
                    let value = require_value(args, "--backend")?;
                    backend_url = validate_backend_url(value)?;
                }
                "--voice" => {
                    let value = require_value(args, "--voice")?;
                    voice = Some(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { backend_url, voice })
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut iter = std::env::args().skip(1);
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Preflight: a failed probe is a warning, not a refusal to launch. The
    // UI shows its own offline banner either way.
    if let Err(err) = BackendHealth::new().probe(&parsed.backend_url).await {
        log::warn!("backend preflight failed: {err}");
    }

    let channel: Arc<dyn ExerciseChannel> = match SocketChannel::connect(&parsed.backend_url).await
    {
        Ok(channel) => {
            log::info!("connected to tracking backend at {}", parsed.backend_url);
            Arc::new(channel)
        }
        Err(err) => {
            log::warn!(
                "could not connect to {}: {err}; launching offline",
                parsed.backend_url
            );
            Arc::new(OfflineChannel::new())
        }
    };

    let speech: Arc<dyn SpeechNotifier> = Arc::new(PlatformSpeech::new());
    let exercise_service = ExerciseService::new(
        Clock::default_clock(),
        Arc::clone(&channel),
        Arc::clone(&speech),
    )
    .with_voice_hint(parsed.voice);

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        exercise_service,
        channel,
        speech,
    });
    let context = build_app_context(&app);

    // Explicitly disable always-on-top so the app doesn't behave like a
    // modal window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("MotionAid")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
