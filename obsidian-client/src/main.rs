use obsidian_core::{RenderError, RenderMode};

use crate::{
    config::{DemoKind, SandboxConfig},
    demo::{BlocksDemo, LightsDemo},
    engine::Obsidian,
};

mod abs;
mod config;
mod demo;
mod engine;
mod logging;
mod render;
mod timing;

fn run(config: &SandboxConfig) -> Result<(), RenderError> {
    log::info!("Starting the {:?} demo", config.demo);
    match config.demo {
        DemoKind::Lights => Obsidian::run(config, RenderMode::TwoD, LightsDemo::new(config)),
        DemoKind::Blocks => Obsidian::run(config, RenderMode::ThreeD, BlocksDemo::new(config)),
    }
}

fn main() {
    let (config, config_error) = match SandboxConfig::load() {
        Ok(config) => (config, None),
        Err(err) => (SandboxConfig::default(), Some(err)),
    };

    logging::init(&config.log_level);
    if let Some(err) = config_error {
        log::warn!("Using default config: {}", err);
    }

    if let Err(err) = run(&config) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
