use std::{path::PathBuf, process};

use clap::Parser;
use log::{error, info, warn};

use oncomotif::{
    enumerate::{enumerate_exact, enumerate_mismatch, ColorRule},
    error::MotifError,
    flow::{self, FlowProblem, NoBackend},
    loader,
    solution::SolutionWriter,
};

#[derive(Parser, Debug)]
#[command(name = "motif", version, about = "Discover recurrently altered colored subnetworks", long_about = None)]
struct Cli {
    /// Network file: whitespace-separated pairs of interacting gene names
    #[arg(short = 'n', long)]
    network: PathBuf,

    /// Alteration profiles: whitespace-separated `sample gene type` triples
    #[arg(short = 'l', long)]
    alterations: PathBuf,

    /// Minimum number of supporting patients per subnetwork
    #[arg(short = 's', long)]
    support: usize,

    /// 0 = flow MIP, 1 = exact, 2 = colorful, 3 = background-exclusive,
    /// 4 = mismatch-tolerant
    #[arg(short = 'm', long, value_parser = clap::value_parser!(u8).range(0..=4))]
    mode: u8,

    /// Worker threads for seeding (and for an external solver backend)
    #[arg(short = 't', long, default_value_t = 32)]
    threads: usize,

    /// Background alteration type excluded by mode 3
    #[arg(short = 'b', long, default_value = "EXPROUT")]
    background: String,

    /// Mismatch bound for mode 4 (1 or 2)
    #[arg(short = 'd', long, default_value_t = 1)]
    delta: u32,

    /// Solution TSV path (defaults to output.tsv, or output_colorful.tsv
    /// for the colorful modes)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            if matches!(self.mode, 2 | 3) {
                PathBuf::from("output_colorful.tsv")
            } else {
                PathBuf::from("output.tsv")
            }
        })
    }
}

fn run(cli: &Cli) -> Result<(), MotifError> {
    let network = loader::load_network(&cli.network)?;
    let components = network.connected_components();
    info!(
        "input network contains {} connected components",
        components.count()
    );
    let catalog = loader::load_alterations(&cli.alterations, &network)?;
    let writer = SolutionWriter::new(&network, &catalog);
    let output = cli.output_path();

    match cli.mode {
        0 => {
            let problem = FlowProblem::new(&network, &catalog, cli.support);
            flow::solve(&NoBackend, &problem, cli.threads)?;
            Ok(())
        }
        1 | 2 | 3 => {
            let rule = match cli.mode {
                1 => ColorRule::Any,
                2 => ColorRule::Colorful,
                _ => {
                    let alt = catalog
                        .alterations
                        .get(&cli.background)
                        .ok_or_else(|| MotifError::UnknownBackground(cli.background.clone()))?;
                    ColorRule::BackgroundExclusive {
                        background: alt as u32 + 1,
                    }
                }
            };
            let levels = enumerate_exact(&catalog, &network, cli.support, &rule);
            let terminal = levels.last().expect("at least the seed level exists");
            writer.write_level(terminal, |mask| mask.clone(), &output)
        }
        _ => {
            let levels = enumerate_mismatch(&catalog, &network, cli.support, cli.delta)?;
            let terminal = levels.last().expect("at least the seed level exists");
            writer.write_level(terminal, |profile| profile.union(), &output)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(cli.threads)
        .build_global()
    {
        warn!("could not size the thread pool: {e}");
    }

    if let Err(e) = run(&cli) {
        error!("{e}");
        process::exit(e.exit_code());
    }
}
