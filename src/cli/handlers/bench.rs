use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::env;

use crate::{
    core::{config::LoadedConfig, registry::Registry, timer::Timer},
    system::executor,
};

#[derive(Args, Debug, Default)]
pub struct BenchArgs {
    /// Timer name used in the report and for `[timers.<name>]` settings.
    #[arg(long, short, default_value = "bench", value_parser = clap::builder::NonEmptyStringValueParser::new())]
    pub name: String,

    /// How many times to run the command.
    #[arg(long, short, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub repeat: u32,

    /// Moving-average window. Defaults to the configured filter strength.
    #[arg(long, short)]
    pub filter: Option<usize>,

    /// Discard the command's output.
    #[arg(long, short)]
    pub quiet: bool,

    /// Keep timing after a run exits with an error.
    #[arg(long)]
    pub keep_going: bool,

    /// The command to time, usually after `--`. A single quoted argument is
    /// split like a shell command line.
    #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

pub fn handle(args: BenchArgs, loaded: &LoadedConfig) -> Result<()> {
    let mut options = loaded.config.options_for(&args.name);
    if let Some(filter) = args.filter {
        options.filter_strength = filter;
    }

    // A private registry: the report covers this invocation only.
    let registry = Registry::new();
    let mut timer = Timer::new(&registry, options)
        .with_context(|| format!("Invalid settings for timer '{}'", args.name))?;
    let window = registry.capacity(&args.name)?;
    let cwd = env::current_dir().context("Failed to read the current directory")?;
    let command = executor::resolve_command(&args.command)?;

    let command_display = shlex::try_join(command.iter().map(String::as_str))
        .unwrap_or_else(|_| command.join(" "));
    println!(
        "{}",
        format!(
            t!("bench.header"),
            command = command_display,
            repeat = args.repeat,
            name = args.name,
            filter = window
        )
        .bold()
    );

    for index in 1..=args.repeat {
        let run = timer.scope()?;
        let outcome = executor::execute(&command, &cwd, args.quiet);
        let average = run.finish()?;

        match outcome {
            Ok(()) => println!(
                "{}",
                format!(
                    t!("bench.run"),
                    index = index,
                    total = args.repeat,
                    elapsed = average
                )
            ),
            Err(e) if args.keep_going => eprintln!(
                "{}",
                format!(
                    t!("bench.failed"),
                    index = index,
                    total = args.repeat,
                    error = e
                )
                .yellow()
            ),
            Err(e) => {
                return Err(e).with_context(|| format!("Run {} of {} failed", index, args.repeat));
            }
        }
    }

    println!("\n{}", t!("bench.summary").bold());
    timer.print(Some(&[args.name.as_str()]))?;
    Ok(())
}
