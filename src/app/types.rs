use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Mutex;
use std::time::Instant;

use ratatui::widgets::ListState;

use crate::app_event::{ConfigEvent, SshEvent};
use crate::config::ConfigManager;
use crate::models::SshHost;
use crate::ssh_config::ConnectionConfig;
use crate::state::ApplicationState;

#[derive(Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// One entry of the fuzzy-filtered host list, pointing back into
/// `App::hosts` and carrying the matched character positions for
/// highlighting.
#[derive(Debug, Clone)]
pub struct FilteredHost {
    pub original_index: usize,
    pub score: i64,
    pub matched_indices: Vec<usize>,
}

#[derive(Debug)]
pub struct App {
    pub should_quit: bool,
    pub hosts: Vec<SshHost>,
    pub selected_host: usize,
    pub input_mode: InputMode,
    pub ssh_config_path: PathBuf,
    pub config_manager: ConfigManager,
    pub app_state: &'static Mutex<ApplicationState>,

    pub status_message: Option<(String, Instant)>,
    pub show_help: bool,

    // SSH session
    pub is_connecting: bool,
    pub ssh_ready_for_terminal: bool,
    pub ssh_receiver: Option<Receiver<SshEvent>>,

    // Background config resolution, shown in the details panel
    pub config_receiver: Option<Receiver<ConfigEvent>>,
    pub resolved_config: Option<(String, ConnectionConfig)>,

    // Search mode
    pub search_query: String,
    pub filtered_hosts: Vec<FilteredHost>,
    pub search_selected: usize,

    pub host_list_state: ListState,
}
