use clap::Parser;

use inertial_camera::cli::{Cli, Command};
use inertial_camera::config::CameraConfig;
use inertial_camera::simulate::{self, Script};
use inertial_camera::viewer;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CameraConfig::load(path)?,
        None => CameraConfig::default(),
    };

    match cli.command.unwrap_or(Command::View {
        width: 1024,
        height: 768,
    }) {
        Command::View { width, height } => viewer::run(config, width, height),
        Command::Simulate { script } => {
            let script = match script {
                Some(path) => Script::load(&path)?,
                None => Script::hold_then_glide(&config),
            };
            simulate::stream(&script, &config, std::io::stdout().lock())?;
            Ok(())
        }
    }
}
