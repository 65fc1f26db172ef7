use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use livepdf_core::service::DEFAULT_SERVICE_URL;
use livepdf_core::Config;

#[derive(Parser, Debug)]
#[command(name = "livepdf")]
#[command(about = "Live Markdown to PDF preview backed by a rendering service")]
struct Args {
    /// Base URL of the rendering service
    #[arg(long, global = true, env = "LIVEPDF_SERVICE_URL", default_value = DEFAULT_SERVICE_URL)]
    service_url: String,

    /// Quiet period after the last edit before converting
    #[arg(long, global = true, default_value_t = 1000)]
    debounce_ms: u64,

    /// Request timeout in seconds (0 disables it)
    #[arg(long, global = true, default_value_t = 60)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a Markdown file once and save document.pdf
    Convert {
        file: PathBuf,
        /// Style override, e.g. --set font_size=14 (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
        /// Directory to save document.pdf into
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Watch a Markdown file and re-render on every edit
    Live {
        file: PathBuf,
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
        #[arg(long)]
        out: Option<PathBuf>,
        /// How often to check the file for changes
        #[arg(long, default_value_t = 250)]
        poll_ms: u64,
    },
    /// Check that the rendering service is up
    Health,
}

fn main() -> ExitCode {
    let args = Args::parse();
    livepdf_lib::init_logging(&["livepdf=info", "livepdf_lib=info", "livepdf_core=info"]);

    let timeout = (args.timeout_secs > 0).then(|| Duration::from_secs(args.timeout_secs));
    let config = Config::load_or_default()
        .with_service_url(args.service_url)
        .with_debounce(Duration::from_millis(args.debounce_ms))
        .with_request_timeout(timeout);

    let result = match args.command {
        Command::Convert { file, set, out } => {
            let config = with_out_dir(config, out);
            livepdf_lib::block_on(livepdf_lib::cli::convert(config, file, set)).map(|path| {
                println!("{}", path.display());
            })
        }
        Command::Live {
            file,
            set,
            out,
            poll_ms,
        } => {
            let config = with_out_dir(config, out);
            livepdf_lib::block_on(livepdf_lib::live::run(
                config,
                file,
                set,
                Duration::from_millis(poll_ms),
            ))
        }
        Command::Health => livepdf_lib::block_on(livepdf_lib::cli::health(config)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn with_out_dir(config: Config, out: Option<PathBuf>) -> Config {
    match out {
        Some(dir) => config.with_export_dir(dir),
        None => config,
    }
}
