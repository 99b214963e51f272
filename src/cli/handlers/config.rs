use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::core::config::LoadedConfig;

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Also show the settings resolved for this timer name.
    #[arg(long, short)]
    pub timer: Option<String>,

    /// Print the loaded configuration as TOML.
    #[arg(long)]
    pub toml: bool,
}

pub fn handle(args: ConfigArgs, loaded: &LoadedConfig) -> Result<()> {
    let config = &loaded.config;

    if args.toml {
        let rendered = toml::to_string_pretty(config).context("Failed to serialize config")?;
        print!("{}", rendered);
        return Ok(());
    }

    match &loaded.source {
        Some(path) => println!(
            "{}",
            format!(t!("config.source.file"), path = path.display()).dimmed()
        ),
        None => println!("{}", t!("config.source.default").dimmed()),
    }

    println!(
        "{}",
        format!(
            t!("config.defaults"),
            filter = config.defaults.filter_strength,
            log = config.defaults.log_on_stop
        )
        .bold()
    );
    println!(
        "{}",
        format!(t!("config.text"), text = config.defaults.text)
    );

    let mut names: Vec<&str> = config.timers.keys().map(String::as_str).collect();
    if let Some(extra) = args.timer.as_deref() {
        if !names.contains(&extra) {
            names.push(extra);
        }
    }

    for name in names {
        let options = config.options_for(name);
        println!(
            "{}",
            format!(
                t!("config.timer"),
                name = name.cyan(),
                filter = options.filter_strength,
                log = options.log_on_stop
            )
        );
        if options.text != config.defaults.text {
            println!("    {}", options.text);
        }
    }
    Ok(())
}
