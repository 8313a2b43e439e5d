use std::{error::Error, fs::File};

use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use maestro_animator::{Controller, ControllerConfig};
use serde_json::Value;
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode, WriteLogger};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "maestro.toml")]
    config: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List configured lights and available animations
    List,
    /// Turn a light solid white
    On { light: String },
    /// Turn a light off
    Off { light: String },
    /// Run an animation until it finishes or Ctrl-C is pressed
    Start {
        light: String,
        animation: String,
        /// Animation parameters as a JSON object
        #[arg(short, long, default_value = "{}")]
        params: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(
            LevelFilter::Debug,
            Config::default(),
            File::create("maestro.log")?,
        ),
    ])?;

    let cli = Cli::parse();

    let config = ControllerConfig::from_file(&cli.config)?;
    info!("Loaded {} lights from {}", config.lights.len(), cli.config);
    let mut controller = Controller::from_config(&config)?;

    match cli.command {
        Command::List => {
            println!("Lights:");
            for light in controller.lights() {
                println!("  {light}");
            }
            println!("Animations:");
            for animation in controller.animations() {
                println!("  {animation}");
            }
        }
        Command::On { light } => controller.turn_on(&light).await?,
        Command::Off { light } => controller.turn_off(&light).await?,
        Command::Start {
            light,
            animation,
            params,
        } => {
            let params: Value = serde_json::from_str(&params)?;
            let Some(mut finished) = controller.finished_events() else {
                return Err("completion events already taken".into());
            };

            controller.start_animation(&light, &animation, &params).await?;
            tokio::select! {
                event = finished.recv() => {
                    if let Some(event) = event {
                        info!("Animation {} finished on light {}", event.animation, event.light);
                    }
                }
                result = tokio::signal::ctrl_c() => {
                    result?;
                    info!("Interrupted");
                }
            }
            controller.shutdown().await;
        }
    }

    Ok(())
}
