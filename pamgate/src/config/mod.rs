use std::env;

use getopts::Options;
use log::LevelFilter;
use nix::unistd::{getuid, User};

use pamgate::error::Error;

const DEFAULT_PROMPT: &str = "Password: ";

#[derive(Debug, Eq, PartialEq)]
pub struct Config {
    pub user: Option<String>,
    pub prompt: String,
    pub debug: usize,
    pub help: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            user: None,
            prompt: DEFAULT_PROMPT.to_string(),
            debug: 0,
            help: false,
        }
    }
}

impl Config {
    pub fn log_level(&self) -> LevelFilter {
        match self.debug {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::max(),
        }
    }

    /// The user named on the command line, or the invoking user.
    pub fn username(&self) -> Result<String, Error> {
        match &self.user {
            Some(u) => Ok(u.clone()),
            None => User::from_uid(getuid())?
                .map(|u| u.name)
                .ok_or_else(|| Error::ConfigError("unable to look up the current user".to_string())),
        }
    }
}

fn options() -> Options {
    let mut opts = Options::new();
    opts.optflag("h", "help", "print this help menu");
    opts.optopt("u", "user", "user to authenticate (default: current user)", "USER");
    opts.optopt("p", "prompt", "password prompt to display", "PROMPT");
    opts.optflagmulti("d", "debug", "increase log verbosity, may be repeated");
    opts
}

pub fn print_usage(program: &str) {
    let brief = format!("Usage: {} [options]", program);
    print!("{}", options().usage(&brief));
    println!("Exits 0 if the password is accepted, 1 if it is not.");
}

pub fn parse_args(args: &[String]) -> Result<Config, Error> {
    let matches = options().parse(args)?;
    if !matches.free.is_empty() {
        return Err(Error::ConfigError(format!(
            "unexpected argument: {}",
            matches.free[0]
        )));
    }

    let user = matches.opt_str("user");
    if let Some(u) = &user {
        if u.is_empty() {
            return Err(Error::ConfigError("user must not be empty".to_string()));
        }
    }

    Ok(Config {
        user,
        prompt: matches
            .opt_str("prompt")
            .unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
        debug: matches.opt_count("debug"),
        help: matches.opt_present("help"),
    })
}

pub fn read_config() -> Result<Config, Error> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| "pamgate".to_string());
    let config = parse_args(args.get(1..).unwrap_or(&[]))?;
    if config.help {
        print_usage(&program);
        std::process::exit(0);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults() {
        let config = parse_args(&[]).expect("config didn't parse");
        assert_eq!(config, Config::default());
        assert_eq!(config.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn user_and_prompt() {
        let config = parse_args(&args(&["-u", "alice", "--prompt", "Secret: "]))
            .expect("config didn't parse");
        assert_eq!(
            config,
            Config {
                user: Some("alice".to_string()),
                prompt: "Secret: ".to_string(),
                debug: 0,
                help: false,
            }
        );
        assert_eq!(config.username().unwrap(), "alice");
    }

    #[test]
    fn debug_is_counted() {
        let config = parse_args(&args(&["-d", "--debug", "-d"])).expect("config didn't parse");
        assert_eq!(config.debug, 3);
        assert_eq!(config.log_level(), LevelFilter::Trace);
    }

    #[test]
    fn help() {
        assert!(parse_args(&args(&["--help"])).unwrap().help);
    }

    #[test]
    fn invalid() {
        assert!(parse_args(&args(&["--user"])).is_err());
        assert!(parse_args(&args(&["-u", ""])).is_err());
        assert!(parse_args(&args(&["--retries", "3"])).is_err());
        assert!(parse_args(&args(&["alice"])).is_err());
    }
}
