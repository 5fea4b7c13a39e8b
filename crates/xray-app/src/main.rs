//! Main application entry point (native).
//!
//! Runs a demo headlessly and prints the markup of the final frame.

#[cfg(feature = "native")]
mod cli {
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;
    use xray_app::{AppConfig, AppResult, Session, XRayConfig, default_script, demos, parse_script};

    #[derive(Parser)]
    #[command(name = "xray")]
    #[command(version = env!("CARGO_PKG_VERSION"))]
    #[command(about = "Render XRay reveal widget demos as SVG markup", long_about = None)]
    struct Cli {
        /// Demo preset to run
        #[arg(default_value = "default")]
        demo: String,

        /// Widget configuration (JSON) replacing the preset's configuration
        config: Option<PathBuf>,

        /// Event script (JSON array of steps); a built-in script is used otherwise
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Widget width in pixels
        #[arg(long, default_value_t = 500.0)]
        width: f64,

        /// Widget height in pixels
        #[arg(long, default_value_t = 333.0)]
        height: f64,

        /// Frame interval in milliseconds
        #[arg(long, default_value_t = 16)]
        frame_ms: u64,

        /// Emit inline layout styles
        #[arg(long)]
        inline_styles: bool,

        /// List the available demos and exit
        #[arg(short, long)]
        list: bool,
    }

    pub fn run() -> AppResult<()> {
        let cli = Cli::parse();

        if cli.list {
            for name in demos::DEMO_NAMES {
                println!("{name}");
            }
            return Ok(());
        }

        let mut demo = demos::demo(&cli.demo)?;
        if let Some(path) = &cli.config {
            let config = XRayConfig::from_json(&fs::read_to_string(path)?)?;
            log::info!("Using configuration from {}", path.display());
            demo.widgets = vec![config];
        }

        let script = match &cli.script {
            Some(path) => parse_script(&fs::read_to_string(path)?)?,
            None => default_script(),
        };

        let config = AppConfig {
            width: cli.width,
            height: cli.height,
            frame_interval: Duration::from_millis(cli.frame_ms),
            inline_styles: cli.inline_styles,
            ..AppConfig::default()
        };

        let mut session = Session::new(&demo, &config);
        session.run(&script)?;
        log::info!(
            "Replayed {} event(s) over {:?}, {} frame(s) rendered",
            script.len(),
            session.elapsed(),
            session.frames()
        );

        for markup in session.render()? {
            println!("{markup}");
        }
        Ok(())
    }
}

#[cfg(feature = "native")]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Starting XRay");

    match cli::run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
