//! mlight — update published neuron metadata in the imagery archive
//!
//! Builds the identity and area indices from the NeuronBrowser service,
//! reconciles both tracing locations against the object store, and writes
//! one metadata document per date. Dry-run by default; pass `--write` to
//! persist.

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use mlight_core::prelude::*;
use mlight_remote::{ClientConfig, NeuronBrowserClient};

mod fs_store;

use fs_store::FsObjectStore;

#[tokio::main]
async fn main() {
    let matches = Command::new("mlight")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Update published neuron metadata in the imagery archive")
        .arg(
            Arg::new("manifold")
                .long("manifold")
                .value_parser(["dev", "prod"])
                .default_value("prod")
                .help("Deployment manifold; prod requires NEURONBROWSER_JWT"),
        )
        .arg(
            Arg::new("write")
                .long("write")
                .action(ArgAction::SetTrue)
                .help("Actually write metadata documents (default: dry run)"),
        )
        .arg(
            Arg::new("store-root")
                .long("store-root")
                .required(true)
                .help("Root directory of the bucket mirror"),
        )
        .arg(
            Arg::new("service-url")
                .long("service-url")
                .help("NeuronBrowser endpoint (default: NEURONBROWSER_URL)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Chatty"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Very chatty"),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"), matches.get_flag("debug"));

    match run(&matches).await {
        Ok(report) => {
            println!("{report}");
        }
        Err(err) => {
            tracing::error!("{err:#}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool, debug: bool) {
    let default_level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(args: &ArgMatches) -> anyhow::Result<RunReport> {
    let service_url = args
        .get_one::<String>("service-url")
        .cloned()
        .or_else(|| std::env::var("NEURONBROWSER_URL").ok())
        .context("no service URL; pass --service-url or set NEURONBROWSER_URL")?;

    let mut config = ClientConfig::new(service_url);
    if args.get_one::<String>("manifold").map(String::as_str) == Some("prod") {
        let token = std::env::var("NEURONBROWSER_JWT")
            .context("NEURONBROWSER_JWT is required on the prod manifold")?;
        config = config.with_bearer_token(token);
    }
    let client = NeuronBrowserClient::new(config)?;

    let areas = AreaIndex::build(client.fetch_brain_areas().await?)?;
    let mapping = NeuronMapIndex::build(client.fetch_injections().await?);
    tracing::info!(
        areas = areas.len(),
        dates = mapping.len(),
        "indices built"
    );

    let store_root = args
        .get_one::<String>("store-root")
        .expect("store-root is required");
    let store = FsObjectStore::new(store_root);
    let reconciler = Reconciler::new(&store, &mapping, &areas);
    let emitter = Emitter::new(&store, args.get_flag("write"));

    let mut report = RunReport::new();
    for location in TracingLocation::ALL {
        let documents = reconciler.reconcile_location(location, &mut report).await?;
        for document in &documents {
            emitter.emit(document, &mut report).await?;
        }
    }
    Ok(report)
}
