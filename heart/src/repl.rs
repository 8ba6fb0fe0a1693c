use std::io::{stdin, stdout, BufRead, Write};

use anyhow::{anyhow, bail, Result};
use heart_predict::{Field, PredictionManager};
use log::{info, warn};

use crate::display;

pub const HELP: &str = "\
Commands:
  show                  redraw the form and last result
  fields                list every field with the values it accepts
  set FIELD VALUE       change one field, e.g. `set age_category Age 45 to 49`
  randomize             redraw every field at random
  reset                 go back to the default inputs
  predict               send the current inputs to the prediction service
  help                  show this text
  quit                  leave";

#[derive(Debug, PartialEq)]
pub enum Command {
    Show,
    Fields,
    Set(Field, String),
    Randomize,
    Reset,
    Predict,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word.to_ascii_lowercase().as_str() {
        "show" | "" => Command::Show,
        "fields" => Command::Fields,
        "randomize" | "random" => Command::Randomize,
        "reset" => Command::Reset,
        "predict" => Command::Predict,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "set" => {
            let (name, value) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("usage: set FIELD VALUE"))?;
            Command::Set(name.parse()?, String::from(value.trim()))
        }
        other => bail!("unknown command '{}', try `help`", other),
    };
    Ok(command)
}

fn print_screen(manager: &PredictionManager, show_bounds: bool) -> Result<()> {
    display::show(&manager.view(), &manager.config().display, show_bounds)?;
    Ok(())
}

/// Reads commands from stdin until `quit` or end of input, redrawing the
/// screen after every one of them.
pub async fn run(manager: &mut PredictionManager) -> Result<()> {
    print_screen(manager, false)?;
    println!("\n{}", HELP);

    let mut lines = stdin().lock().lines();
    loop {
        print!("\n> ");
        stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                println!("{}", HELP);
                continue;
            }
            Command::Show => {}
            Command::Fields => {
                print_screen(manager, true)?;
                continue;
            }
            Command::Set(field, value) => {
                if let Err(e) = manager.edit(field, &value) {
                    warn!("Rejected edit of {}: {}", field, e);
                    println!("{}", e);
                    continue;
                }
            }
            Command::Randomize => {
                manager.randomize();
            }
            Command::Reset => manager.reset(),
            Command::Predict => {
                info!("Submitting profile for prediction");
                manager.predict().await;
            }
        }
        print_screen(manager, false)?;
    }
    Ok(())
}
