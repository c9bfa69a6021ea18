//! tracing 初始化：日志走 stderr，stdout 只留给报告
//! 给定输出目录时，另追加一份到 <output>/guardian.log；打不开就只写 stderr

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::{Mutex, Once};
use tracing::Subscriber;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_FILE: &str = "guardian.log";

static INIT_ONCE: Once = Once::new();

pub fn init(debug: bool, output_dir: Option<&Path>) {
    INIT_ONCE.call_once(|| {
        subscriber(debug, output_dir).init();
    });
}

fn subscriber(debug: bool, output_dir: Option<&Path>) -> impl Subscriber + Send + Sync {
    let default = if debug { "guardian=debug" } else { "guardian=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let file_layer = output_dir.and_then(open_log).map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
}

fn open_log(dir: &Path) -> Option<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
        .ok()
}
