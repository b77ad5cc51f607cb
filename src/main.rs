// (c) Copyright 2026 viaroute contributors
// SPDX-License-Identifier: MIT

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct GraphLoadError(PathBuf, #[source] viaroute::NetworkError);

#[derive(Parser)]
struct Cli {
    /// The path to the network file (.csv, .csv.gz or .csv.bz2)
    network_file: PathBuf,

    /// Latitude of the start point
    start_lat: f64,

    /// Longitude of the start point
    start_lon: f64,

    /// Latitude of the end point
    end_lat: f64,

    /// Longitude of the end point
    end_lon: f64,

    /// Name of the region covered by the network file
    #[arg(long, default_value = "unnamed region")]
    region: String,

    /// Search budget, in node expansions per query
    #[arg(long, default_value_t = viaroute::DEFAULT_STEP_LIMIT)]
    step_limit: usize,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let graph = viaroute::load_from_file(&cli.network_file)
        .map_err(|e| GraphLoadError(cli.network_file.clone(), e))?;
    let service =
        viaroute::RouteService::new(graph, &cli.region)?.with_step_limit(cli.step_limit);

    let route = match service.route(cli.start_lat, cli.start_lon, cli.end_lat, cli.end_lon)? {
        viaroute::RouteOutcome::Found(route) => route,
        viaroute::RouteOutcome::Unreachable => {
            log::error!("no route found between the given points");
            std::process::exit(1);
        }
    };

    println!("{{");
    println!("  \"type\": \"FeatureCollection\",");
    println!("  \"features\": [");
    println!("    {{");
    println!("      \"type\": \"Feature\",");
    println!("      \"properties\": {{ \"length_m\": {} }},", route.length_m);

    println!("      \"geometry\": {{");
    println!("        \"type\": \"LineString\",");
    println!("        \"coordinates\": [");

    let mut coords = route.coords.iter().peekable();
    while let Some(&(lat, lon)) = coords.next() {
        let suffix = if coords.peek().is_some() { "," } else { "" };
        println!("          [{}, {}]{}", lon, lat, suffix);
    }

    println!("        ]");
    println!("      }}");
    println!("    }}");
    println!("  ]");
    println!("}}");

    Ok(())
}
