use crate::app::{App, FilteredHost, InputMode};
use crate::app_event::{ConfigEvent, SshEvent};
use crate::config::ConfigManager;
use crate::models::SshHost;
use crate::ssh_config;
use crate::state::ApplicationState;
use crate::ui;
use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use ratatui::{backend::Backend, widgets::ListState, Terminal};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

impl App {
    pub fn new(
        config_manager: ConfigManager,
        app_state: &'static Mutex<ApplicationState>,
    ) -> Result<Self> {
        let mut app = Self::with_manager(config_manager, app_state)?;
        app.load_all_hosts().context("Failed to load hosts")?;
        app.restore_selection();
        Ok(app)
    }

    pub fn with_manager(
        config_manager: ConfigManager,
        app_state: &'static Mutex<ApplicationState>,
    ) -> Result<Self> {
        let app_config = config_manager
            .load_config()
            .context("Failed to load config")?;
        let ssh_config_path = PathBuf::from(app_config.ssh_file_config);

        tracing::info!("SSH config path: {:?}", ssh_config_path);
        Ok(Self {
            should_quit: false,
            hosts: Vec::new(),
            selected_host: 0,
            input_mode: InputMode::Normal,
            ssh_config_path,
            config_manager,
            app_state,
            status_message: None,
            show_help: false,
            is_connecting: false,
            ssh_ready_for_terminal: false,
            ssh_receiver: None,
            config_receiver: None,
            resolved_config: None,
            search_query: String::new(),
            filtered_hosts: Vec::new(),
            search_selected: 0,
            host_list_state: ListState::default(),
        })
    }

    /// Put the cursor back where the previous session left it.
    pub fn restore_selection(&mut self) {
        let remembered = match self.app_state.lock() {
            Ok(state) => state.selected_host,
            Err(_) => 0,
        };

        self.selected_host = if self.hosts.is_empty() {
            0
        } else {
            remembered.min(self.hosts.len() - 1)
        };
        self.host_list_state.select(if self.hosts.is_empty() {
            None
        } else {
            Some(self.selected_host)
        });
    }

    fn remember_selection(&self) {
        if let Ok(mut state) = self.app_state.lock() {
            state.selected_host = self.selected_host;
        }
    }

    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    // --- Host loading ---

    pub fn load_all_hosts(&mut self) -> Result<()> {
        self.hosts.clear();
        self.load_custom_hosts();
        self.load_ssh_config().context("Failed to load SSH config")?;
        self.handle_duplicate_hosts();

        if self.selected_host >= self.hosts.len() {
            self.selected_host = self.hosts.len().saturating_sub(1);
        }
        self.host_list_state.select(if self.hosts.is_empty() {
            None
        } else {
            Some(self.selected_host)
        });
        self.filter_hosts();
        Ok(())
    }

    /// Scan the system ssh_config for Host aliases and append them after
    /// any custom hosts.
    pub fn load_ssh_config(&mut self) -> Result<()> {
        if !self.ssh_config_path.exists() {
            tracing::warn!(
                "System SSH config file not found at {:?}",
                self.ssh_config_path
            );
            return Ok(());
        }

        let config_content =
            fs::read_to_string(&self.ssh_config_path).context("Failed to read SSH config file")?;

        // A Host line can carry several aliases sharing one option block,
        // so the current block is a list of entries, not a single one.
        let mut current_hosts: Vec<SshHost> = Vec::new();

        for line in config_content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.to_lowercase().starts_with("host ") {
                self.hosts.append(&mut current_hosts);

                // One entry per alias; wildcard patterns aren't connectable
                current_hosts = line[5..]
                    .split_whitespace()
                    .filter(|alias| !alias.contains('*') && !alias.contains('?'))
                    .map(|alias| SshHost::new(alias.to_string(), String::new(), String::new()))
                    .collect();
            } else if !current_hosts.is_empty() {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() < 2 {
                    continue;
                }

                match parts[0].to_lowercase().as_str() {
                    "hostname" => {
                        for host in &mut current_hosts {
                            host.host = parts[1].to_string();
                        }
                    }
                    "user" => {
                        for host in &mut current_hosts {
                            host.user = parts[1].to_string();
                        }
                    }
                    "port" => {
                        if let Ok(port) = parts[1].parse::<u16>() {
                            for host in &mut current_hosts {
                                host.port = Some(port);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        // Don't forget the last block
        self.hosts.append(&mut current_hosts);

        tracing::info!("Loaded {} hosts after scanning SSH config", self.hosts.len());
        Ok(())
    }

    // Load custom hosts from hosts.toml; they go first in the list.
    pub fn load_custom_hosts(&mut self) {
        match self.config_manager.load_hosts() {
            Ok(custom_hosts) => {
                self.hosts.splice(0..0, custom_hosts);
            }
            Err(e) => {
                // Don't propagate, the app can still run on scanned hosts only.
                tracing::error!("Failed to load custom hosts: {}", e);
            }
        }
    }

    pub fn handle_duplicate_hosts(&mut self) {
        let mut seen_aliases = HashSet::new();
        let mut unique_hosts = Vec::new();
        for host in self.hosts.drain(..) {
            if seen_aliases.contains(&host.alias) {
                tracing::warn!("Duplicate alias found: {}", host.alias);
            } else {
                seen_aliases.insert(host.alias.clone());
                unique_hosts.push(host);
            }
        }
        self.hosts = unique_hosts;
    }

    // --- Navigation ---

    pub fn select_next(&mut self) {
        if self.hosts.is_empty() {
            return;
        }
        self.selected_host = (self.selected_host + 1) % self.hosts.len();
        self.host_list_state.select(Some(self.selected_host));
        self.remember_selection();
    }

    pub fn select_previous(&mut self) {
        if self.hosts.is_empty() {
            return;
        }
        let total = self.hosts.len();
        self.selected_host = (self.selected_host + total - 1) % total;
        self.host_list_state.select(Some(self.selected_host));
        self.remember_selection();
    }

    pub fn get_current_selected_host(&self) -> Option<&SshHost> {
        match self.input_mode {
            InputMode::Normal => self.hosts.get(self.selected_host),
            InputMode::Search => self
                .filtered_hosts
                .get(self.search_selected)
                .and_then(|fh| self.hosts.get(fh.original_index)),
        }
    }

    // --- Search ---

    pub fn filter_hosts(&mut self) {
        if self.search_query.is_empty() {
            self.filtered_hosts = (0..self.hosts.len())
                .map(|i| FilteredHost {
                    original_index: i,
                    score: 0,
                    matched_indices: Vec::new(),
                })
                .collect();
        } else {
            let matcher = SkimMatcherV2::default();
            let mut matches: Vec<FilteredHost> = self
                .hosts
                .iter()
                .enumerate()
                .filter_map(|(i, host)| {
                    let alias_match = matcher.fuzzy_indices(&host.alias, &self.search_query);
                    let fallback = matcher
                        .fuzzy_match(&host.host, &self.search_query)
                        .or_else(|| matcher.fuzzy_match(&host.user, &self.search_query));

                    match (alias_match, fallback) {
                        (Some((score, indices)), _) => Some(FilteredHost {
                            original_index: i,
                            score,
                            matched_indices: indices,
                        }),
                        (None, Some(score)) => Some(FilteredHost {
                            original_index: i,
                            score,
                            matched_indices: Vec::new(),
                        }),
                        (None, None) => None,
                    }
                })
                .collect();
            matches.sort_by(|a, b| b.score.cmp(&a.score));
            self.filtered_hosts = matches;
        }

        if self.search_selected >= self.filtered_hosts.len() {
            self.search_selected = 0;
        }

        if let Ok(mut state) = self.app_state.lock() {
            state.search_filter = self.search_query.clone();
        }

        match self.input_mode {
            InputMode::Normal => self.host_list_state.select(Some(self.selected_host)),
            InputMode::Search => self.host_list_state.select(Some(self.search_selected)),
        }
    }

    pub fn search_select_next(&mut self) {
        if self.filtered_hosts.is_empty() {
            return;
        }
        self.search_selected = (self.search_selected + 1) % self.filtered_hosts.len();
        self.host_list_state.select(Some(self.search_selected));
    }

    pub fn search_select_previous(&mut self) {
        if self.filtered_hosts.is_empty() {
            return;
        }
        let total = self.filtered_hosts.len();
        self.search_selected = (self.search_selected + total - 1) % total;
        self.host_list_state.select(Some(self.search_selected));
    }

    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Search;
        self.search_query.clear();
        self.search_selected = 0;
        self.filter_hosts();
    }

    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.input_mode = InputMode::Normal;
        self.search_selected = 0;
        self.filter_hosts();
        self.host_list_state.select(Some(self.selected_host));
    }

    // --- Effective SSH config resolution ---

    /// Resolve the effective ssh config of the selected host on a worker
    /// thread; the result comes back as a ConfigEvent. Until then the
    /// details panel keeps showing the stub.
    pub fn request_config_resolution(&mut self) {
        let Some(host) = self.get_current_selected_host() else {
            return;
        };
        let alias = host.alias.clone();

        let (sender, receiver) = mpsc::channel::<ConfigEvent>();
        self.config_receiver = Some(receiver);
        self.set_status(format!("Resolving SSH config for {}...", alias));

        thread::spawn(move || {
            tracing::debug!("Resolving effective SSH config for {}", alias);
            let event = match ssh_config::resolve(&alias) {
                Ok(config) => ConfigEvent::Loaded(alias, config),
                Err(e) => ConfigEvent::Failed(alias, e.to_string()),
            };
            let _ = sender.send(event);
        });
    }

    /// Drain the config-resolution channel. On failure the stub config is
    /// substituted so the details panel always has something to show.
    pub fn process_config_events(&mut self) {
        let Some(receiver) = &self.config_receiver else {
            return;
        };

        if let Ok(event) = receiver.try_recv() {
            match event {
                ConfigEvent::Loaded(alias, config) => {
                    self.set_status(format!("Resolved SSH config for {}", alias));
                    self.resolved_config = Some((alias, config));
                }
                ConfigEvent::Failed(alias, err) => {
                    tracing::debug!("SSH config resolution failed for {}: {}", alias, err);
                    if let Ok(mut state) = self.app_state.lock() {
                        state.last_error = err.clone();
                    }
                    self.set_status(format!("Can't resolve config for {}, using defaults", alias));
                    self.resolved_config = Some((alias, ssh_config::stub_config()));
                }
            }
            self.config_receiver = None;
        }
    }

    // --- SSH session ---

    /// Arguments for the ssh invocation. Hosts scanned from ssh_config are
    /// connected by alias so the ssh client applies its own resolution;
    /// fully specified custom hosts get an explicit destination and port.
    pub fn ssh_destination(host: &SshHost) -> Vec<String> {
        if host.host.is_empty() || host.user.is_empty() {
            return vec![host.alias.clone()];
        }
        vec![
            format!("{}@{}", host.user, host.host),
            "-p".to_string(),
            host.port.unwrap_or(22).to_string(),
        ]
    }

    pub fn connect_to_selected<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        if let Some(selected_host) = self.get_current_selected_host().cloned() {
            tracing::info!("Enter pressed, selected host: {:?}", selected_host.alias);

            let (sender, receiver) = mpsc::channel::<SshEvent>();
            self.ssh_receiver = Some(receiver);

            self.is_connecting = true;
            self.ssh_ready_for_terminal = false;
            self.set_status(format!("Connecting to {}...", selected_host.alias));

            thread::spawn(move || {
                Self::ssh_thread_worker(sender, selected_host);
            });

            // Redraw UI to show loading
            terminal.draw(|f| ui::draw(f, self))?;
        }
        Ok(())
    }

    // Worker function run in the SSH thread
    fn ssh_thread_worker(sender: Sender<SshEvent>, host: SshHost) {
        tracing::info!("SSH thread started for host: {}", host.alias);

        if sender.send(SshEvent::Connecting).is_err() {
            tracing::error!("Failed to send Connecting event");
            return;
        }

        match Self::test_ssh_connection(&host) {
            Ok(_) => {
                tracing::info!("SSH connection test successful for {}", host.alias);

                if sender.send(SshEvent::Connected).is_ok() {
                    // Give the main thread a moment to tear down the TUI
                    thread::sleep(Duration::from_millis(200));

                    tracing::info!("Starting SSH session for {}", host.alias);
                    match Self::execute_ssh_blocking(&host) {
                        Ok(_) => {
                            tracing::info!("SSH session ended normally for {}", host.alias);
                            let _ = sender.send(SshEvent::Disconnected);
                        }
                        Err(e) => {
                            tracing::error!("SSH session error for {}: {}", host.alias, e);
                            let _ = sender.send(SshEvent::Error(e.to_string()));
                        }
                    }
                } else {
                    tracing::error!("Failed to send Connected event");
                }
            }
            Err(e) => {
                tracing::error!("SSH connection test failed for {}: {}", host.alias, e);
                let _ = sender.send(SshEvent::Error(format!("Connection test failed: {}", e)));
            }
        }

        tracing::info!("SSH thread ending for host: {}", host.alias);
    }

    // Short probe so an unreachable host can't hang the UI behind a
    // full-screen ssh session.
    fn test_ssh_connection(host: &SshHost) -> Result<()> {
        use std::process::Command;

        tracing::info!("Testing SSH connection to {}", host.alias);

        let output = Command::new("ssh")
            .args(Self::ssh_destination(host))
            .arg("-o")
            .arg("ConnectTimeout=5")
            .arg("-o")
            .arg("BatchMode=yes")
            .arg("-o")
            .arg("LogLevel=ERROR")
            .arg("exit")
            .output()
            .context("Failed to test SSH connection")?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(anyhow::anyhow!(
                "SSH connection test failed: {}",
                stderr.trim()
            ))
        }
    }

    // Execute SSH with full control of the terminal (blocking).
    fn execute_ssh_blocking(host: &SshHost) -> Result<()> {
        use std::process::Command;

        tracing::info!("Executing SSH session for {}", host.alias);

        let status = Command::new("ssh")
            .args(Self::ssh_destination(host))
            .arg("-o")
            .arg("ServerAliveInterval=60")
            .arg("-o")
            .arg("ServerAliveCountMax=3")
            .stdin(std::process::Stdio::inherit())
            .stdout(std::process::Stdio::inherit())
            .stderr(std::process::Stdio::inherit())
            .status()
            .context("Failed to execute SSH command")?;

        if status.success() {
            tracing::info!("SSH command completed successfully");
            Ok(())
        } else {
            let error_msg = format!("SSH command failed with status: {}", status);
            tracing::error!("{}", error_msg);
            Err(anyhow::anyhow!(error_msg))
        }
    }

    fn transition_to_ssh_mode<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode for SSH")?;
        let mut stdout = std::io::stdout();
        execute!(&mut stdout, LeaveAlternateScreen, DisableMouseCapture)
            .context("Failed to leave alternate screen for SSH")?;
        terminal
            .show_cursor()
            .context("Failed to show cursor for SSH")?;

        tracing::info!("TUI disabled for SSH mode - main thread will suspend polling");
        Ok(())
    }

    fn restore_tui_mode<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        enable_raw_mode().context("Failed to re-enable raw mode post-SSH")?;
        let mut stdout = std::io::stdout();
        execute!(&mut stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to re-enter alternate screen post-SSH")?;

        terminal
            .clear()
            .context("Failed to clear terminal post-SSH")?;
        tracing::info!("TUI restored after SSH session - resuming main thread polling");
        Ok(())
    }

    // Process SSH events from the worker channel
    pub fn process_ssh_events<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<bool> {
        if let Some(receiver) = &self.ssh_receiver {
            // Non-blocking receive
            if let Ok(event) = receiver.try_recv() {
                match event {
                    SshEvent::Connecting => {
                        self.set_status("Testing connection...");
                        return Ok(false);
                    }
                    SshEvent::Connected => {
                        self.set_status("Connection successful! Launching SSH...");
                        self.transition_to_ssh_mode(terminal)?;
                        self.ssh_ready_for_terminal = true;
                        return Ok(false);
                    }
                    SshEvent::Error(err) => {
                        tracing::error!("SSH error: {}", err);
                        if self.ssh_ready_for_terminal {
                            self.restore_tui_mode(terminal)?;
                        }
                        self.is_connecting = false;
                        self.ssh_ready_for_terminal = false;
                        self.ssh_receiver = None;
                        if let Ok(mut state) = self.app_state.lock() {
                            state.last_error = err.clone();
                        }
                        self.set_status(format!("SSH Error: {}", err));
                        return Ok(false);
                    }
                    SshEvent::Disconnected => {
                        tracing::info!("SSH session disconnected, restoring TUI");

                        self.restore_tui_mode(terminal)?;
                        self.is_connecting = false;
                        self.ssh_ready_for_terminal = false;
                        self.ssh_receiver = None;
                        self.set_status("SSH session ended");
                        self.persist_session_state();
                        return Ok(true); // Indicate we need to redraw
                    }
                }
            }
        }
        Ok(false)
    }

    /// Mid-session persistence point, after an SSH session ends. Failures
    /// here only surface in the status bar; the fatal path is shutdown.
    fn persist_session_state(&mut self) {
        let result = match self.app_state.lock() {
            Ok(state) => state.persist(),
            Err(_) => Err(anyhow::anyhow!("application state lock poisoned")),
        };
        if let Err(e) = result {
            tracing::error!("Failed to persist application state: {}", e);
            self.set_status(format!("Can't save state: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Logger;
    use tempfile::TempDir;

    struct NullLogger;
    impl Logger for NullLogger {
        fn debug(&self, _message: &str) {}
    }

    fn test_app(tmp: &TempDir) -> App {
        let manager = ConfigManager::with_config_dir(tmp.path().join("sshgo")).unwrap();
        let state = Box::leak(Box::new(Mutex::new(ApplicationState::read(
            tmp.path(),
            &NullLogger,
        ))));
        let mut app = App::with_manager(manager, state).unwrap();
        app.hosts = vec![
            SshHost::new("alpha".into(), "alpha.example".into(), "root".into()),
            SshHost::new("bravo".into(), "bravo.example".into(), "deploy".into()),
            SshHost::new("charlie".into(), String::new(), String::new()),
        ];
        app.filter_hosts();
        app
    }

    #[test]
    fn navigation_wraps_and_remembers() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = test_app(&tmp);

        app.select_next();
        app.select_next();
        assert_eq!(app.selected_host, 2);
        app.select_next();
        assert_eq!(app.selected_host, 0);
        app.select_previous();
        assert_eq!(app.selected_host, 2);

        assert_eq!(app.app_state.lock().unwrap().selected_host, 2);
    }

    #[test]
    fn restore_selection_clamps_to_host_count() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = test_app(&tmp);

        app.app_state.lock().unwrap().selected_host = 99;
        app.restore_selection();
        assert_eq!(app.selected_host, 2);
    }

    #[test]
    fn fuzzy_search_matches_alias_and_host() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = test_app(&tmp);

        app.enter_search_mode();
        app.search_query = "brv".to_string();
        app.filter_hosts();

        assert_eq!(app.filtered_hosts.len(), 1);
        assert_eq!(app.filtered_hosts[0].original_index, 1);
        assert!(!app.filtered_hosts[0].matched_indices.is_empty());

        // Search text is written through to the session state.
        assert_eq!(app.app_state.lock().unwrap().search_filter, "brv");

        // Hostname matches are kept too, without alias highlighting.
        app.search_query = "example".to_string();
        app.filter_hosts();
        assert_eq!(app.filtered_hosts.len(), 2);
        assert!(app
            .filtered_hosts
            .iter()
            .all(|fh| fh.matched_indices.is_empty()));
    }

    #[test]
    fn empty_query_lists_everything() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = test_app(&tmp);

        app.enter_search_mode();
        assert_eq!(app.filtered_hosts.len(), 3);
        app.clear_search();
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn failed_resolution_falls_back_to_stub() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = test_app(&tmp);

        let (sender, receiver) = mpsc::channel();
        app.config_receiver = Some(receiver);
        sender
            .send(ConfigEvent::Failed(
                "alpha".to_string(),
                "ssh exploded".to_string(),
            ))
            .unwrap();

        app.process_config_events();

        let (alias, config) = app.resolved_config.as_ref().unwrap();
        assert_eq!(alias, "alpha");
        assert_eq!(config.port, "22");
        assert_eq!(config.identity_file, "$HOME/.ssh/id_rsa");
        assert_eq!(app.app_state.lock().unwrap().last_error, "ssh exploded");
    }

    #[test]
    fn loaded_resolution_is_kept_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = test_app(&tmp);

        let (sender, receiver) = mpsc::channel();
        app.config_receiver = Some(receiver);
        sender
            .send(ConfigEvent::Loaded(
                "bravo".to_string(),
                ssh_config::ConnectionConfig {
                    identity_file: "~/.ssh/work".to_string(),
                    user: "deploy".to_string(),
                    port: "2222".to_string(),
                },
            ))
            .unwrap();

        app.process_config_events();

        let (_, config) = app.resolved_config.as_ref().unwrap();
        assert_eq!(config.user, "deploy");
        assert_eq!(config.port, "2222");
        assert!(app.config_receiver.is_none());
    }

    #[test]
    fn ssh_config_multi_alias_hosts_become_separate_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = test_app(&tmp);
        app.hosts.clear();

        let config_path = tmp.path().join("ssh_config");
        fs::write(
            &config_path,
            "Host web-a web-b *.wild\n\
             \tHostName shared.example\n\
             \tUser deploy\n\
             \tPort 2222\n\
             \n\
             Host db\n\
             \tHostName db.example\n",
        )
        .unwrap();
        app.ssh_config_path = config_path;

        app.load_ssh_config().unwrap();

        let aliases: Vec<&str> = app.hosts.iter().map(|h| h.alias.as_str()).collect();
        assert_eq!(aliases, vec!["web-a", "web-b", "db"]);

        // Both aliases of the block share its options.
        assert_eq!(app.hosts[0].host, "shared.example");
        assert_eq!(app.hosts[1].host, "shared.example");
        assert_eq!(app.hosts[1].user, "deploy");
        assert_eq!(app.hosts[1].port, Some(2222));
        assert_eq!(app.hosts[2].host, "db.example");
    }

    #[test]
    fn failed_mid_session_persist_only_sets_status() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_config_dir(tmp.path().join("sshgo")).unwrap();
        // State file in a directory that doesn't exist, so persist() fails.
        let state = Box::leak(Box::new(Mutex::new(ApplicationState::read(
            &tmp.path().join("gone"),
            &NullLogger,
        ))));
        let mut app = App::with_manager(manager, state).unwrap();

        app.persist_session_state();

        let (message, _) = app.status_message.as_ref().unwrap();
        assert!(message.starts_with("Can't save state"));
    }

    #[test]
    fn ssh_destination_prefers_alias_for_scanned_hosts() {
        let scanned = SshHost::new("charlie".into(), String::new(), String::new());
        assert_eq!(App::ssh_destination(&scanned), vec!["charlie".to_string()]);

        let mut custom = SshHost::new("alpha".into(), "alpha.example".into(), "root".into());
        custom.port = Some(2200);
        assert_eq!(
            App::ssh_destination(&custom),
            vec![
                "root@alpha.example".to_string(),
                "-p".to_string(),
                "2200".to_string()
            ]
        );
    }

    #[test]
    fn duplicate_aliases_are_dropped() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = test_app(&tmp);

        app.hosts.push(SshHost::new(
            "alpha".into(),
            "other.example".into(),
            "root".into(),
        ));
        app.handle_duplicate_hosts();

        assert_eq!(app.hosts.len(), 3);
        assert_eq!(app.hosts[0].host, "alpha.example");
    }
}
