use anyhow::Result;
use clap::Parser;
use nrgen::{
    cli::Cli, config::GeneratorConfig, corpus::Corpus, error::NrError, generator::Generator,
};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Merge defaults, the optional config file and CLI flags
fn build_config(args: &Cli) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_file(path)?,
        None => GeneratorConfig::default(),
    };

    config.corpus = Corpus::new(&args.linux_path);
    if let Some(out_dir) = &args.out_dir {
        config.out_dir = out_dir.clone();
    }
    if let Some(cc) = &args.cc {
        config.preprocessor.program = cc.clone();
    }
    config.select_targets(args.arch.as_slice())?;
    config.validate()?;

    Ok(config)
}

/// Print the target table (--list-targets)
fn print_targets(config: &GeneratorConfig) {
    for target in &config.targets {
        println!("{}", target.label);
        for source in &target.sources {
            println!("    {}", source);
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = build_config(&args)?;

    if args.list_targets {
        print_targets(&config);
        return Ok(());
    }

    let generator = Generator::new(config);
    match generator.run() {
        Ok(outcomes) => {
            for outcome in outcomes {
                match outcome.path {
                    Some(path) => println!(
                        "{}: {} syscalls -> {}",
                        outcome.label,
                        outcome.count,
                        path.display()
                    ),
                    None => println!("{}: no syscalls resolved, skipped", outcome.label),
                }
            }
            Ok(())
        }
        Err(err) => {
            // Dump the raw search output so a broken pattern or tree can be diagnosed
            if let NrError::CorpusIntegrity { raw, .. } = &err {
                print!("{}", raw);
            }
            Err(err.into())
        }
    }
}
