//! resgen command line
//!
//! Builds the `resgen` command and dispatches its subcommands to
//! [`commands`]. Logging is set up by the binary.

#![warn(missing_docs)]

pub mod commands;
pub mod config;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgGroup, ArgMatches, Command};
use commands::{LibraryArgs, PackageSource};
use config::ResgenConfig;
use std::path::PathBuf;

fn path_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help(help)
}

fn platform_arg() -> Arg {
    Arg::new("platform")
        .long("platform")
        .value_parser(value_parser!(PathBuf))
        .help("Platform R.txt (defaults to the configured platform)")
}

fn dependency_arg() -> Arg {
    Arg::new("dependency")
        .long("dependency")
        .action(ArgAction::Append)
        .value_parser(value_parser!(PathBuf))
        .help("Dependency symbol file with a package first line (repeatable)")
}

/// The `resgen` command definition
#[must_use]
pub fn cli() -> Command {
    Command::new("resgen")
        .version(resgen_symbols::VERSION)
        .about("Android resource symbol tables")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file (default: ./resgen.toml if present)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Raise log level (-v info, -vv debug, -vvv trace)"),
        )
        .subcommand(
            Command::new("scan")
                .about("Scan a resource directory into R.txt")
                .arg(path_arg("res-dir", "Resource directory"))
                .arg(path_arg("output", "Symbol file to write"))
                .arg(
                    Arg::new("package")
                        .long("package")
                        .help("Write the package as the first line"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the summary as JSON"),
                ),
        )
        .subcommand(
            Command::new("merge")
                .about("Merge a module table with its dependencies and renumber")
                .arg(path_arg("table", "Module R.txt"))
                .arg(platform_arg())
                .arg(dependency_arg())
                .arg(Arg::new("package").long("package").help("Package of the merged table"))
                .arg(
                    Arg::new("manifest")
                        .long("manifest")
                        .value_parser(value_parser!(PathBuf))
                        .help("Manifest to read the package from"),
                )
                .group(
                    ArgGroup::new("package-source")
                        .args(["package", "manifest"])
                        .required(true),
                )
                .arg(path_arg("output", "Merged symbol file to write")),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate R.java from a symbol file")
                .arg(path_arg("table", "Symbol file"))
                .arg(
                    Arg::new("package")
                        .long("package")
                        .required(true)
                        .help("Package of the generated class"),
                )
                .arg(path_arg("out-dir", "Source root"))
                .arg(
                    Arg::new("final-ids")
                        .long("final-ids")
                        .action(ArgAction::SetTrue)
                        .help("Emit final fields"),
                ),
        )
        .subcommand(
            Command::new("library")
                .about("Scan, merge and generate sources for a library module")
                .arg(path_arg("res-dir", "Resource directory"))
                .arg(path_arg("manifest", "Module manifest"))
                .arg(platform_arg())
                .arg(dependency_arg())
                .arg(path_arg("output", "Merged symbol file to write"))
                .arg(path_arg("source-dir", "Source root")),
        )
        .subcommand(
            Command::new("keep-rules")
                .about("Generate shrinker keep rules")
                .arg(path_arg("manifest", "Module manifest"))
                .arg(
                    Arg::new("layout-dir")
                        .long("layout-dir")
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(PathBuf))
                        .help("Layout directory to scan for custom views (repeatable)"),
                )
                .arg(
                    Arg::new("main-dex")
                        .long("main-dex")
                        .action(ArgAction::SetTrue)
                        .help("Skip components running in a private process"),
                )
                .arg(path_arg("output", "Rules file to write")),
        )
}

fn path(args: &ArgMatches, id: &str) -> Result<PathBuf> {
    args.get_one::<PathBuf>(id)
        .cloned()
        .with_context(|| format!("missing --{id}"))
}

fn paths(args: &ArgMatches, id: &str) -> Vec<PathBuf> {
    args.get_many::<PathBuf>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn platform(args: &ArgMatches, config: &ResgenConfig) -> Result<PathBuf> {
    args.get_one::<PathBuf>("platform")
        .or(config.platform.as_ref())
        .cloned()
        .context("no platform symbols: pass --platform or set `platform` in resgen.toml")
}

/// Run the subcommand selected in `matches`, printing its report
///
/// # Errors
/// Returns error if the subcommand fails
pub fn run(matches: &ArgMatches, config: &ResgenConfig) -> Result<()> {
    match matches.subcommand() {
        Some(("scan", args)) => {
            let package = args.get_one::<String>("package").map(String::as_str);
            let summary = commands::scan(&path(args, "res-dir")?, package, &path(args, "output")?)?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary.generate_text());
            }
        }
        Some(("merge", args)) => {
            let package = match args.get_one::<String>("package") {
                Some(name) => PackageSource::Name(name.clone()),
                None => PackageSource::Manifest(path(args, "manifest")?),
            };
            let output = path(args, "output")?;
            let merged = commands::merge(
                &path(args, "table")?,
                &platform(args, config)?,
                &paths(args, "dependency"),
                &package,
                &output,
            )?;
            println!("Merged {} symbols for {} into {}", merged.len(), merged.package(), output.display());
        }
        Some(("generate", args)) => {
            let package = args.get_one::<String>("package").context("missing --package")?;
            let options = config.java_options(args.get_flag("final-ids"));
            let source = commands::generate(&path(args, "table")?, package, &path(args, "out-dir")?, &options)?;
            println!("Generated {}", source.display());
        }
        Some(("library", args)) => {
            let library = LibraryArgs {
                res_dir: path(args, "res-dir")?,
                manifest: path(args, "manifest")?,
                platform: platform(args, config)?,
                dependencies: paths(args, "dependency"),
                output: path(args, "output")?,
                source_dir: path(args, "source-dir")?,
            };
            for source in commands::library(&library, &config.class_name)? {
                println!("Generated {}", source.display());
            }
        }
        Some(("keep-rules", args)) => {
            let output = path(args, "output")?;
            let count = commands::keep_rules(
                &path(args, "manifest")?,
                &paths(args, "layout-dir"),
                args.get_flag("main-dex"),
                &output,
            )?;
            println!("Wrote {} keep rules to {}", count, output.display());
        }
        Some((name, _)) => anyhow::bail!("unknown subcommand {name}"),
        None => anyhow::bail!("no subcommand given"),
    }
    Ok(())
}

/// Default log filter for `verbose` occurrences of `-v`
#[must_use]
pub fn log_filter(config: &ResgenConfig, verbose: u8) -> String {
    match verbose {
        0 => config.log_level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}
