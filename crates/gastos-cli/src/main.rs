// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use gastos_client::Client;
use gastos_tui::{ExpenseSource, SessionOptions};
use runtime::{HttpSource, MemorySource};
use simplelog::{LevelFilter, WriteLogger};
use std::env;
use std::fs::File;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `gastos --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let level = config.log_level()?;
    if level != LevelFilter::Off {
        let log_file = File::create(config.log_file())
            .with_context(|| format!("create log file {}", config.log_file()))?;
        WriteLogger::init(level, simplelog::Config::default(), log_file)
            .context("initialize logger")?;
    }

    let session = SessionOptions {
        group_id: options
            .group_id
            .clone()
            .unwrap_or_else(|| config.group_id().to_owned()),
        discard_stale: config.discard_stale_results(),
    };

    if options.demo {
        if options.check_only {
            return Ok(());
        }
        log::info!("starting demo session");
        let mut source = MemorySource::demo();
        let categories = load_categories(&mut source);
        return gastos_tui::run_app(session, categories, &mut source);
    }

    let client = Client::new(config.api_base_url(), config.api_timeout()?).with_context(|| {
        format!(
            "invalid [api] config in {}; fix base_url/timeout values",
            options.config_path.display()
        )
    })?;

    if options.check_only {
        client.ping().context("expenses API check failed")?;
        return Ok(());
    }

    log::info!(
        "starting session against {} (group {:?})",
        client.base_url(),
        session.group_id,
    );
    let mut source = HttpSource::new(client);
    let categories = load_categories(&mut source);
    gastos_tui::run_app(session, categories, &mut source)
}

// A missing category list only costs the filter options; the session starts
// anyway.
fn load_categories<S: ExpenseSource>(source: &mut S) -> Vec<String> {
    match source.categories() {
        Ok(categories) => categories,
        Err(error) => {
            log::warn!("category list unavailable: {error:#}");
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    group_id: Option<String>,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        group_id: None,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--group" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--group requires a group id"))?;
                options.group_id = Some(value.as_ref().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("gastos");
    println!("  --config <path>          Use a specific config path");
    println!("  --group <id>             Scope the table to one expense group");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Launch against an in-memory demo ledger");
    println!("  --check                  Validate config and API reachability");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args};
    use anyhow::Result;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/gastos-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                group_id: None,
                print_config_path: false,
                demo: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_config_value() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));
    }

    #[test]
    fn parse_cli_args_sets_group_override() -> Result<()> {
        let options = parse_cli_args(vec!["--group", "trip-2026"], default_options_path())?;
        assert_eq!(options.group_id.as_deref(), Some("trip-2026"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_group_value() {
        let error = parse_cli_args(vec!["--group"], default_options_path())
            .expect_err("missing group value should fail");
        assert!(error.to_string().contains("--group requires a group id"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(!options.demo);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_demo_flag() -> Result<()> {
        let options = parse_cli_args(vec!["--demo"], default_options_path())?;
        assert!(options.demo);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }
}
