#[cfg(feature = "completions")]
use clap::CommandFactory;

use crate::cli::{Cli, Commands, EngineArgs, RangeArgs};
use crate::commands::{
    run_convert, run_export, run_report, run_stats, ConvertOptions, ExportOptions, RangeOptions,
    ReportOptions, StatsOptions,
};
use crate::config::{load_config, render_config, ResolvedConfig};
use crate::error::Result;
use crate::session::EngineSettings;

pub fn run(cli: Cli) -> Result<()> {
    let config = load_config()?;
    let resolved = ResolvedConfig::from_config(&config);
    let quiet = cli.quiet;

    match cli.command {
        Commands::Report {
            file,
            range,
            format,
            engine,
        } => {
            let options = ReportOptions {
                engine: engine_settings(&resolved, &engine),
                format: format.unwrap_or(resolved.report.format),
                range: range_options(range),
                quiet,
            };
            run_report(&file, &options)
        }

        Commands::Export {
            file,
            output,
            range,
            engine,
        } => {
            let options = ExportOptions {
                engine: engine_settings(&resolved, &engine),
                output: output.unwrap_or_else(|| resolved.export.output.clone()),
                range: range_options(range),
                quiet,
            };
            run_export(&file, &options).map(|_| ())
        }

        Commands::Stats {
            file,
            json,
            offset_hours,
        } => {
            let options = StatsOptions {
                engine: EngineSettings {
                    offset_hours: offset_hours.unwrap_or(resolved.engine.offset_hours),
                    ..resolved.engine
                },
                json: json || resolved.stats.json,
            };
            run_stats(&file, &options)
        }

        Commands::Convert {
            timestamp,
            reverse,
            offset_hours,
        } => {
            let options = ConvertOptions {
                offset_hours: offset_hours.unwrap_or(resolved.engine.offset_hours),
                reverse,
            };
            run_convert(&timestamp, &options)
        }

        Commands::Config => {
            let rendered = render_config(&resolved)?;
            println!("{rendered}");
            Ok(())
        }

        #[cfg(feature = "completions")]
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "scanreport", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn engine_settings(resolved: &ResolvedConfig, args: &EngineArgs) -> EngineSettings {
    let defaults = &resolved.engine;
    EngineSettings {
        offset_hours: args.offset_hours.unwrap_or(defaults.offset_hours),
        weekly_threshold_days: args
            .weekly_threshold
            .unwrap_or(defaults.weekly_threshold_days),
        top_cities: args.top.unwrap_or(defaults.top_cities),
        top_countries: args.top.unwrap_or(defaults.top_countries),
    }
}

fn range_options(args: RangeArgs) -> RangeOptions {
    RangeOptions {
        from: args.from,
        to: args.to,
    }
}
