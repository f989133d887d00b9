mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, DefsArgs};
use learner_lattice::TypeRegistry;
use learner_lattice::definitions::Definitions;
use learner_lattice::header::parse_headers;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check(args) => {
            let mut registry = load_registry(&args.defs)?;
            let ty = registry.resolve_expr(&args.ty)?;
            let input = parse_headers(&args.input).context("invalid --input")?;
            let output = parse_headers(&args.output).context("invalid --output")?;

            match registry.check_headers(ty, &input, &output) {
                None => {
                    println!("compatible");
                    Ok(ExitCode::SUCCESS)
                }
                Some(failure) => {
                    println!("incompatible with {}:", registry.name(ty));
                    for line in failure.lines() {
                        println!("  {}", line);
                    }
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Subtype(args) => {
            let mut registry = load_registry(&args.defs)?;
            let sub = registry.resolve_expr(&args.sub)?;
            let sup = registry.resolve_expr(&args.sup)?;
            let result = if args.potential {
                registry.is_potential_sub_type_of(sub, sup)
            } else {
                registry.is_sub_type_of(sub, sup)
            };
            println!("{}", result);
            Ok(ExitCode::SUCCESS)
        }
        Commands::List(args) => {
            let registry = load_registry(&args.defs)?;
            for id in registry.ids() {
                let ty = registry.get(id);
                let detail = match ty.base() {
                    Some(base) => registry.name(base).to_string(),
                    None => ty
                        .members()
                        .iter()
                        .map(|&member| registry.name(member))
                        .collect::<Vec<_>>()
                        .join(", "),
                };
                println!("{}\t{}\t{}", registry.name(id), ty.form(), detail);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_registry(args: &DefsArgs) -> Result<TypeRegistry> {
    let definitions = match &args.defs {
        Some(path) => Definitions::from_file(path)?,
        None => Definitions::default(),
    };
    let (registry, _) = definitions.build_registry()?;
    Ok(registry)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
