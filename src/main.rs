use clap::Parser;
use file_rotate::{compression::Compression, suffix::AppendCount, ContentLimit, FileRotate};
use log::info;
use std::env;
use std::rc::Rc;

use packsim::config::{PassConfig, SimulationConfig};
use packsim::core::scheduler::placement::FitStrategy;
use packsim::core::scheduler::queue::QueueOrder;
use packsim::error::SimulationError;
use packsim::metrics::utilization::CsvUtilizationSink;
use packsim::simulator::{workload_from_config, BinPackingSimulation};

const LOG_FILE_SIZE_LIMIT: usize = 64 * 1024 * 1024;
const LOG_FILES_KEPT: usize = 5;

#[derive(Parser)]
struct Args {
    /// Yaml config, the reference run (128 servers, 5000 generated tasks, three passes) is used
    /// if not set.
    #[clap(short, long)]
    config_file: Option<std::path::PathBuf>,
    /// Overrides seed of the config.
    #[clap(short, long)]
    seed: Option<u64>,
    /// Runs a single pass with this queue order instead of configured passes.
    #[clap(long, value_enum, requires = "fit")]
    order: Option<QueueOrder>,
    /// Runs a single pass with this placement strategy instead of configured passes.
    #[clap(long, value_enum, requires = "order")]
    fit: Option<FitStrategy>,
    /// Overrides path of the utilization csv.
    #[clap(short, long)]
    output: Option<std::path::PathBuf>,
}

fn init_logger(logs_filepath: Option<&str>) {
    // log level INFO by default
    let mut env_logger_builder = env_logger::builder();
    if env::var("RUST_LOG").is_err() {
        env_logger_builder.filter_level(log::LevelFilter::Info);
    }
    if let Some(path) = logs_filepath {
        let log_file = FileRotate::new(
            path,
            AppendCount::new(LOG_FILES_KEPT),
            ContentLimit::Bytes(LOG_FILE_SIZE_LIMIT),
            Compression::None,
            #[cfg(unix)]
            None,
        );
        env_logger_builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }
    env_logger_builder.init();
}

fn load_config(args: &Args) -> Result<SimulationConfig, SimulationError> {
    let mut config = match &args.config_file {
        Some(config_file) => SimulationConfig::from_yaml(&std::fs::read_to_string(config_file)?)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let (Some(order), Some(fit)) = (args.order, args.fit) {
        config.passes = vec![PassConfig { order, fit }];
    }
    if let Some(output) = &args.output {
        config.utilization_output = output.clone();
    }
    config.validate()?;
    Ok(config)
}

fn run(args: Args) -> Result<(), SimulationError> {
    let config = load_config(&args)?;
    init_logger(config.logs_filepath.as_deref());

    if let Some(config_file) = &args.config_file {
        info!("Path to config file: {:?}", config_file.canonicalize()?);
    }
    info!("Path to utilization output: {:?}", config.utilization_output);

    let config = Rc::new(config);
    let mut trace = workload_from_config(&config)?;

    let mut simulation = BinPackingSimulation::new(config.clone());
    simulation.initialize(trace.as_mut());

    let mut sink = CsvUtilizationSink::from_path(&config.utilization_output)?;
    simulation.run(&mut sink)?;
    sink.finish()
}

fn main() {
    if let Err(err) = run(Args::parse()) {
        eprintln!("packsim: {}", err);
        std::process::exit(1);
    }
}
