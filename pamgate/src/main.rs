use pamgate::scrambler::Scrambler;
use rpassword::read_password_from_tty;

mod config;
mod logger;

static LOGGER: logger::StderrLogger = logger::StderrLogger;

fn main() {
    let config = match config::read_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Run with --help for more information.");
            std::process::exit(2);
        }
    };

    if let Err(err) = log::set_logger(&LOGGER).map(|()| log::set_max_level(config.log_level())) {
        eprintln!("{}", err);
    }

    let username = match config.username() {
        Ok(u) => u,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let mut password = match read_password_from_tty(Some(config.prompt.as_str())) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("unable to read password: {}", e);
            std::process::exit(2);
        }
    };

    let authenticated = pamgate::check_authentication(&username, &password);
    password.scramble();
    if authenticated {
        std::process::exit(0);
    }
    eprintln!("Authentication failed.");
    std::process::exit(1);
}
