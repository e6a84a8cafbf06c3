use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use sienar_catalog::{Catalog, CatalogError, CatalogProvider, Planner, Request};
use sienar_simplex::{TableauSnapshot, DEFAULT_MAX_ITERATIONS};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sienar")]
#[command(about = "Find the cheapest mix of bundles that covers a shopping list", long_about = None)]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a request and print the bundles to buy
    Solve {
        /// Catalog JSON file (built-in starter catalog if omitted)
        #[arg(short, long)]
        catalog: Option<PathBuf>,
        /// Request JSON file (built-in squadron request if omitted)
        #[arg(short, long)]
        request: Option<PathBuf>,
        /// Give up after this many pivots
        #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
        max_iterations: usize,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
        /// Also print the final tableau
        #[arg(long)]
        tableau: bool,
    },
    /// List the bundles in a catalog
    Catalog {
        /// Catalog JSON file (built-in starter catalog if omitted)
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },
    /// Check that a catalog and request load and fit together
    Check {
        #[arg(short, long)]
        catalog: Option<PathBuf>,
        #[arg(short, long)]
        request: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Solve {
            catalog,
            request,
            max_iterations,
            format,
            tableau,
        } => {
            let mut provider = provider(catalog);
            let catalog = or_exit(provider.catalog());
            let request = or_exit(load_request(request));

            let plan = or_exit(
                Planner::new()
                    .with_max_iterations(max_iterations)
                    .plan(catalog, &request),
            );

            if format == Format::Json {
                match serde_json::to_string_pretty(&plan) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing plan: {}", e);
                        std::process::exit(1);
                    }
                }
                return;
            }

            println!("Status: SOLVED ({} iterations)", plan.iterations);
            println!("Total cost: {:.2}", plan.total_cost);
            println!();
            println!("Bundles:");
            for purchase in &plan.purchases {
                println!(
                    "  {:20} {:>8} x {:>8.2}",
                    purchase.bundle,
                    purchase.quantity.normalize(),
                    purchase.price
                );
            }
            println!();
            println!("Coverage:");
            for c in &plan.coverage {
                let mark = if c.is_met() { "✓" } else { "✗" };
                println!(
                    "  {} {:20} need {:>4}, get {}",
                    mark,
                    c.item,
                    c.required,
                    c.provided.normalize()
                );
            }

            if tableau {
                println!();
                print_tableau(&plan.tableau);
            }
        }
        Commands::Catalog { catalog } => {
            let mut provider = provider(catalog);
            let catalog = or_exit(provider.catalog());
            for bundle in catalog.bundles() {
                println!("{} ({:.2})", bundle.name, bundle.price);
                for content in &bundle.contents {
                    println!("  {:3} x {} ({:?})", content.count, content.name, content.kind);
                }
            }
        }
        Commands::Check { catalog, request } => {
            let mut provider = provider(catalog);
            let catalog = or_exit(provider.catalog());
            let request = or_exit(load_request(request));

            match sienar_catalog::build_constraints(catalog, &request) {
                Ok(constraints) => {
                    println!("✓ request fits the catalog");
                    println!("  {} bundles", catalog.len());
                    println!("  {} requirements", request.requirements.len());
                    println!(
                        "  {} columns per constraint",
                        constraints.first().map_or(0, |c| c.len())
                    );
                }
                Err(e) => {
                    eprintln!("✗ request does not fit the catalog:");
                    eprintln!("  {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn provider(path: Option<PathBuf>) -> CatalogProvider {
    match path {
        Some(path) => CatalogProvider::from_path(path),
        None => CatalogProvider::fixed(Catalog::builtin()),
    }
}

fn load_request(path: Option<PathBuf>) -> Result<Request, CatalogError> {
    match path {
        Some(path) => Request::from_path(path),
        None => Ok(Request::builtin()),
    }
}

fn or_exit<T>(result: Result<T, CatalogError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_tableau(snapshot: &TableauSnapshot) {
    print!("{:>4}", "");
    for column in &snapshot.columns {
        print!(" {:>10}", column);
    }
    println!(" {:>10}", "rhs");

    let rows = snapshot
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| (i.to_string(), row))
        .chain(std::iter::once(("z".to_string(), &snapshot.target)));
    for (label, row) in rows {
        print!("{:>4}", label);
        for entry in &row.entries {
            print!(" {:>10}", entry.value().round_dp(4).normalize());
        }
        println!(" {:>10}", row.rhs.round_dp(4).normalize());
    }
}
