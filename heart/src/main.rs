use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, File, FileFormat};
use getopts::{Matches, Options};
use log::{debug, error, info, LevelFilter};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Root};

use heart_predict::{Outcome, PredictionManager};

mod display;
mod repl;

const DEFAULT_CONFIG: &str = "config/heart_config.json";
const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";

fn build_options() -> Options {
    let mut opts = Options::new();
    opts.optopt("c", "config", "settings file (json)", "FILE");
    opts.optopt("l", "log-config", "log4rs configuration (yaml)", "FILE");
    opts.optopt("u", "url", "override the prediction service base url", "URL");
    opts.optmulti("s", "set", "set a field before starting, may be repeated", "FIELD=VALUE");
    opts.optflag("r", "randomize", "randomize every field before applying --set");
    opts.optflag("p", "predict", "submit once, print the result and exit");
    opts.optflag("h", "help", "print this help menu");
    opts
}

fn init_logging(log_config: &str) -> Result<()> {
    if Path::new(log_config).exists() {
        log4rs::init_file(log_config, Default::default())
            .with_context(|| format!("unable to load log configuration {}", log_config))?;
        return Ok(());
    }
    // no yaml around: warnings and errors still reach the terminal
    let stderr = ConsoleAppender::builder().target(Target::Stderr).build();
    let config = log4rs::config::Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn build_config(matches: &Matches) -> Result<Config> {
    // an explicitly requested settings file has to exist, the default one doesn't
    let (path, required) = match matches.opt_str("c") {
        Some(path) => (path, true),
        None => (String::from(DEFAULT_CONFIG), false),
    };
    debug!("Reading settings from {} (required: {})", path, required);

    let mut builder =
        Config::builder().add_source(File::new(&path, FileFormat::Json).required(required));
    if let Some(url) = matches.opt_str("u") {
        builder = builder.set_override("service.base_url", url)?;
    }
    builder
        .build()
        .with_context(|| format!("unable to read settings from {}", path))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| String::from("heart"));

    let opts = build_options();
    let matches = opts.parse(args.iter().skip(1)).context("invalid arguments")?;
    if matches.opt_present("h") {
        let brief = format!("Usage: {} [options]", program);
        print!("{}", opts.usage(&brief));
        println!("\n{}", repl::HELP);
        return Ok(());
    }

    let log_config = matches
        .opt_str("l")
        .unwrap_or_else(|| String::from(DEFAULT_LOG_CONFIG));
    init_logging(&log_config)?;

    let mut manager = PredictionManager::new(build_config(&matches)?)?;

    if matches.opt_present("r") {
        manager.randomize();
    }
    for assignment in matches.opt_strs("s") {
        manager
            .edit_assignment(&assignment)
            .with_context(|| format!("unable to apply --set {}", assignment))?;
    }

    if !matches.opt_present("p") {
        return repl::run(&mut manager).await;
    }

    info!("Running single prediction");
    let failed = matches!(manager.predict().await, Outcome::Failure { .. });
    display::show(&manager.view(), &manager.config().display, false)?;
    if failed {
        error!("Prediction failed, last response: {}", manager.get_last_resp_text());
        std::process::exit(1);
    }
    Ok(())
}
