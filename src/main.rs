/* scicalc-rs (c) 2026 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

use clap::Parser;
use std::{
    error::Error,
    fs::File,
    path::PathBuf,
    sync::Mutex,
    time::{Duration, UNIX_EPOCH},
};
use tracing_subscriber::EnvFilter;

mod entitlement;
mod error;
mod evaluator;
mod format;
mod keys;
mod linalg;
mod reducer;
mod session;
mod stats;
mod tokens;
mod tools;
mod ui;

use entitlement::{AdEntitlement, Entitlement};
use evaluator::{Evaluator, MevalEvaluator};
use keys::Key;
use reducer::{Calculator, ClearPolicy, EqualsPolicy, Settings};
use session::{AngleUnit, Session, Theme};
use ui::{CalcDisplay, Flavor, Message};

const BANNER: &str = "scicalc free edition | run with --premium to remove this line";

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(short, long, value_enum, default_value_t)]
    flavor: Flavor,

    /// Initial angle unit
    #[arg(short, long, value_enum, default_value_t)]
    angle: AngleUnit,

    #[arg(short, long, value_enum, default_value_t)]
    theme: Theme,

    /// What the expression becomes after `=`
    #[arg(long, value_enum, default_value_t)]
    equals: EqualsPolicy,

    /// What AC does to history
    #[arg(long, value_enum, default_value_t)]
    clear: ClearPolicy,

    /// Significant digits in results
    #[arg(short, long, default_value_t = format::DEFAULT_PRECISION as u8,
          value_parser = clap::value_parser!(u8).range(1..=17))]
    precision: u8,

    /// Ad-free edition
    #[arg(long)]
    premium: bool,

    /// Unix time (seconds) an ad-free trial started
    #[arg(long)]
    trial_since: Option<u64>,

    /// Write logs here (the TUI logs nowhere otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(args: &Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match (&args.log_file, args.flavor) {
        (Some(path), _) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(path)?))
            .try_init()?,
        (None, Flavor::Cli) => builder.with_writer(std::io::stderr).try_init()?,
        (None, Flavor::Tui) => {}
    }
    Ok(())
}

/// Feed a line of key labels through the calculator
fn press_keys<E: Evaluator>(
    calc: &Calculator<E>,
    session: &Session,
    keys: &[Key],
) -> Session {
    keys.iter().fold(session.clone(), |s, key| {
        let event = key.event(&s.modes);
        calc.transition(&s, &event)
    })
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let args = Args::parse();
    init_logging(&args)?;

    let settings = Settings {
        equals: args.equals,
        clear: args.clear,
        precision: args.precision.into(),
    };
    log::info!("starting {} ui with {settings:?}", args.flavor);

    let calc = Calculator::new(MevalEvaluator::new(), settings);
    let mut session = Session::new(args.angle, args.theme);
    let mut entitlement = AdEntitlement::new(args.premium);
    if let Some(secs) = args.trial_since {
        entitlement.start_trial(UNIX_EPOCH + Duration::from_secs(secs));
    }
    log::info!("ad free: {}", entitlement.is_ad_free());

    let mut ui = ui::get_ui(args.flavor)?;
    ui.set_session(&session);
    ui.set_banner((!entitlement.is_ad_free()).then(|| BANNER.to_string()));

    while let Some(msg) = ui.next() {
        ui.set_error(None);
        match msg {
            Message::Quit => break,
            Message::Help => ui.help(),
            Message::Key(key) => session = press_keys(&calc, &session, &[key]),
            Message::Input(line) => match line.trim() {
                "" => {}
                "q" | "quit" | "exit" => break,
                "help" | "?" => ui.help(),
                cmd if tools::is_command(cmd) => {
                    match tools::run(cmd, session.angle_unit, calc.settings().precision) {
                        Ok(out) => ui.dialog(out),
                        Err(e) => {
                            ui.set_error(Some(e.to_string()));
                            ui.push_input(line.clone());
                        }
                    }
                }
                text => match keys::parse_keys(text) {
                    Ok(keys) => session = press_keys(&calc, &session, &keys),
                    Err(e) => {
                        ui.set_error(Some(e));
                        ui.push_input(line.clone());
                    }
                },
            },
        }
        ui.set_session(&session);
    }

    ui.quit();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(session: &Session, line: &str) -> Session {
        let calc = Calculator::new(MevalEvaluator::new(), Settings::default());
        press_keys(&calc, session, &keys::parse_keys(line).unwrap())
    }

    #[test]
    fn test_press_keys() {
        let s = run(&Session::default(), "2+3=");
        assert_eq!(s.result, "5");
        assert_eq!(s.history.len(), 1);

        let s = run(&s, "*2=");
        assert_eq!(s.result, "10");
    }

    #[test]
    fn test_shift_applies_to_next_key() {
        let s = run(&Session::default(), "shift sin 1)=");
        assert_eq!(s.result, "90");
        assert!(!s.modes.shift_active());
    }

    #[test]
    fn test_store_and_recall() {
        let s = run(&Session::default(), "7 sto A");
        assert_eq!(s.variables.get(session::Variable::A), 7.0);
        let s = run(&s, "rcl A *2=");
        assert_eq!(s.result, "14");
    }

    #[test]
    fn test_args() {
        let args = Args::parse_from([
            "scicalc", "--flavor", "cli", "--angle", "rad", "--equals", "clear", "--clear",
            "wipe-history", "-p", "10",
        ]);
        assert_eq!(args.flavor, Flavor::Cli);
        assert_eq!(args.angle, AngleUnit::Rad);
        assert_eq!(args.equals, EqualsPolicy::Clear);
        assert_eq!(args.clear, ClearPolicy::WipeHistory);
        assert_eq!(args.precision, 10);
        assert!(Args::try_parse_from(["scicalc", "-p", "0"]).is_err());
    }
}
