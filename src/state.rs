use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

const STATE_FILE: &str = "state.yaml";

/// Debug-level logging capability injected into the state store, so tests
/// can capture messages instead of touching a real log sink.
pub trait Logger {
    fn debug(&self, message: &str);
}

/// Production logger, forwards to the tracing subscriber set up in main.
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!("{}", message);
    }
}

/// Transient UI/session state that survives restarts.
///
/// Mutations are in-memory only; nothing is written until [`persist`] is
/// called explicitly. Unknown fields in the file are ignored and missing
/// ones default, so older and newer builds can share a state file.
///
/// [`persist`]: ApplicationState::persist
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ApplicationState {
    #[serde(default)]
    pub selected_host: usize,
    #[serde(default)]
    pub search_filter: String,
    #[serde(default)]
    pub last_error: String,
    #[serde(skip)]
    file_path: PathBuf,
}

/// Returns the process-wide application state, loading it from
/// `<base_dir>/state.yaml` on the first call.
///
/// The load runs exactly once per process no matter how many call sites ask,
/// including concurrent first calls; later calls get the same instance and
/// their arguments are ignored.
pub fn get(base_dir: &Path, logger: &dyn Logger) -> &'static Mutex<ApplicationState> {
    static STATE: OnceLock<Mutex<ApplicationState>> = OnceLock::new();
    STATE.get_or_init(|| Mutex::new(ApplicationState::read(base_dir, logger)))
}

impl ApplicationState {
    /// Loads state from `<base_dir>/state.yaml`. A missing or malformed file
    /// is not an error: the message is logged at debug level and defaults
    /// are used, so startup never fails because of a bad state file.
    pub fn read(base_dir: &Path, logger: &dyn Logger) -> Self {
        let file_path = base_dir.join(STATE_FILE);
        logger.debug(&format!(
            "Read application state from {}",
            file_path.display()
        ));

        let mut state = match fs::read_to_string(&file_path) {
            Ok(text) => serde_yaml::from_str(&text).unwrap_or_else(|e| {
                logger.debug(&format!("Can't parse state file, using defaults: {}", e));
                Self::default()
            }),
            Err(e) => {
                logger.debug(&format!("Can't read state file, using defaults: {}", e));
                Self::default()
            }
        };

        state.file_path = file_path;
        state
    }

    /// Writes the current state to disk. Goes through a sibling temp file
    /// and a rename so an interrupted write can't leave a corrupt file.
    pub fn persist(&self) -> Result<()> {
        let yaml =
            serde_yaml::to_string(self).context("Failed to serialize application state")?;

        let tmp_path = self.file_path.with_extension("yaml.tmp");
        fs::write(&tmp_path, yaml)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.file_path)
            .with_context(|| format!("Failed to replace {}", self.file_path.display()))?;

        Ok(())
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[derive(Default)]
    struct MockLogger {
        logs: Mutex<Vec<String>>,
    }

    impl Logger for MockLogger {
        fn debug(&self, message: &str) {
            self.logs.lock().unwrap().push(message.to_string());
        }
    }

    impl MockLogger {
        fn read_count(&self) -> usize {
            self.logs
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.contains("Read application state from"))
                .count()
        }
    }

    #[test]
    fn read_from_empty_dir_uses_defaults_and_logs_once() {
        let tmp = tempfile::tempdir().unwrap();
        let logger = MockLogger::default();

        let state = ApplicationState::read(tmp.path(), &logger);

        assert_eq!(state.selected_host, 0);
        assert_eq!(state.search_filter, "");
        assert_eq!(state.file_path(), tmp.path().join("state.yaml"));
        assert_eq!(logger.read_count(), 1);
    }

    #[test]
    fn persist_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let logger = MockLogger::default();

        let mut state = ApplicationState::read(tmp.path(), &logger);
        state.selected_host = 42;
        state.persist().unwrap();

        // Deserialize the file independently of the store.
        let text = fs::read_to_string(tmp.path().join("state.yaml")).unwrap();
        let persisted: ApplicationState = serde_yaml::from_str(&text).unwrap();
        assert_eq!(persisted.selected_host, 42);
    }

    #[test]
    fn persist_then_read_restores_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let logger = MockLogger::default();

        let mut state = ApplicationState::read(tmp.path(), &logger);
        state.selected_host = 7;
        state.search_filter = "prod".to_string();
        state.persist().unwrap();

        let restored = ApplicationState::read(tmp.path(), &logger);
        assert_eq!(restored.selected_host, 7);
        assert_eq!(restored.search_filter, "prod");
    }

    #[test]
    fn persist_into_missing_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let logger = MockLogger::default();

        // Reading still succeeds with defaults, but the write must fail.
        let state = ApplicationState::read(&tmp.path().join("gone"), &logger);
        assert_eq!(state.selected_host, 0);
        assert!(state.persist().is_err());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join("state.yaml"),
            "selected_host: 3\nsome_future_field: true\n",
        )
        .unwrap();

        let logger = MockLogger::default();
        let state = ApplicationState::read(tmp.path(), &logger);
        assert_eq!(state.selected_host, 3);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("state.yaml"), ": not yaml {{{{").unwrap();

        let logger = MockLogger::default();
        let state = ApplicationState::read(tmp.path(), &logger);
        assert_eq!(state.selected_host, 0);
        assert_eq!(logger.read_count(), 1);
    }

    #[test]
    fn get_is_a_process_wide_singleton() {
        let tmp_a = tempfile::tempdir().unwrap();
        let tmp_b = tempfile::tempdir().unwrap();
        let logger = Arc::new(MockLogger::default());

        // Concurrent first-time callers must all observe the same instance.
        let mut handles = Vec::new();
        for _ in 0..8 {
            let dir = tmp_a.path().to_path_buf();
            let logger = Arc::clone(&logger);
            handles.push(thread::spawn(move || {
                get(&dir, logger.as_ref()) as *const Mutex<ApplicationState> as usize
            }));
        }
        let pointers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(pointers.windows(2).all(|w| w[0] == w[1]));

        // A later call with different arguments still gets the first instance
        // and triggers no second load.
        let again = get(tmp_b.path(), logger.as_ref()) as *const Mutex<ApplicationState> as usize;
        assert_eq!(again, pointers[0]);
        assert_eq!(logger.read_count(), 1);
    }
}
