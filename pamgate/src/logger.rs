use log::{Level, Metadata, Record};

pub struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Trace
    }

    fn log(&self, msg: &Record) {
        if self.enabled(msg.metadata()) {
            eprintln!("pamgate: {}: {}", msg.level().as_str().to_lowercase(), msg.args());
        }
    }

    fn flush(&self) {}
}
