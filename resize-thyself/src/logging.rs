use env_logger::Target;
use std::fs;
use std::io;
use std::path::Path;

/// Install the global logger. `RUST_LOG` overrides the level picked from `verbose`.
pub fn init(verbose: bool, log_file: Option<&Path>) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Cron runs usually want a file; if it can't be opened, fall back to stderr.
    let target = match log_file {
        Some(path) => open_log_file(path).unwrap_or_else(|e| {
            eprintln!(
                "resize-thyself: cannot open log file {}: {}; logging to stderr",
                path.display(),
                e
            );
            Target::Stderr
        }),
        None => Target::Stderr,
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(target)
        .format_timestamp_secs()
        .try_init();
}

fn open_log_file(path: &Path) -> io::Result<Target> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Target::Pipe(Box::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_is_created_with_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/resize.log");
        assert!(open_log_file(&path).is_ok());
        assert!(path.exists());
    }

    #[test]
    fn init_twice_does_not_panic() {
        init(true, None);
        init(false, None);
    }
}
