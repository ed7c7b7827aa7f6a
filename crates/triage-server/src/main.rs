use clap::{value_parser, Arg, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use triage_memory::MemoryStore;
use triage_pipeline::{Pipeline, TriageConfig, DEFAULT_MAX_ITERATIONS};

mod batch;
mod http;

fn max_iterations_arg() -> Arg {
    Arg::new("max-iterations")
        .long("max-iterations")
        .default_value("3")
        .value_parser(value_parser!(u32))
        .help("Report refinement iterations to request")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Command::new("triage")
        .version("0.1.0")
        .about("AI-assisted SOC log triage pipeline")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("serve")
                .about("Serve the investigation API over HTTP")
                .arg(
                    Arg::new("port")
                        .long("port")
                        .default_value("8080")
                        .value_parser(value_parser!(u16))
                        .help("Port to listen on"),
                )
                .arg(max_iterations_arg()),
        )
        .subcommand(
            Command::new("batch")
                .about("Run the pipeline over every *.json file in a directory")
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .default_value("sample_data")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory of sample log files"),
                )
                .arg(max_iterations_arg()),
        );

    let config = TriageConfig::from_env();
    let store = Arc::new(MemoryStore::new());
    let pipeline = Arc::new(Pipeline::from_config(store, &config)?);

    let matches = cli.get_matches();
    match matches.subcommand() {
        Some(("serve", args)) => {
            let port = *args.get_one::<u16>("port").unwrap();
            let max_iterations = *args
                .get_one::<u32>("max-iterations")
                .unwrap_or(&DEFAULT_MAX_ITERATIONS);
            http::serve(pipeline, max_iterations, port).await;
        }
        Some(("batch", args)) => {
            let dir = args.get_one::<PathBuf>("dir").unwrap().clone();
            let max_iterations = *args
                .get_one::<u32>("max-iterations")
                .unwrap_or(&DEFAULT_MAX_ITERATIONS);
            batch::run(pipeline, &dir, max_iterations).await?;
        }
        _ => {}
    }

    Ok(())
}
