use crate::app::{App, InputMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::backend::Backend;
use ratatui::Terminal;

impl App {
    pub fn handle_key<B: Backend>(
        &mut self,
        key: KeyEvent,
        terminal: &mut Terminal<B>,
    ) -> Result<()> {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key, terminal),
            InputMode::Search => self.handle_search_key(key, terminal),
        }
    }

    fn handle_normal_key<B: Backend>(
        &mut self,
        key: KeyEvent,
        terminal: &mut Terminal<B>,
    ) -> Result<()> {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_previous(),
            KeyCode::Char('/') => self.enter_search_mode(),
            KeyCode::Char('i') => self.request_config_resolution(),
            KeyCode::Char('r') => {
                self.load_all_hosts()?;
                self.restore_selection();
            }
            KeyCode::Char('e') => self.edit_hosts_file()?,
            KeyCode::Char('?') => self.show_help = !self.show_help,
            KeyCode::Enter => self.connect_to_selected(terminal)?,
            KeyCode::Esc => self.show_help = false,
            _ => {}
        }
        Ok(())
    }

    fn handle_search_key<B: Backend>(
        &mut self,
        key: KeyEvent,
        terminal: &mut Terminal<B>,
    ) -> Result<()> {
        match key.code {
            KeyCode::Esc => self.clear_search(),
            KeyCode::Enter => self.connect_to_selected(terminal)?,
            KeyCode::Down => self.search_select_next(),
            KeyCode::Up => self.search_select_previous(),
            KeyCode::Backspace => {
                self.search_query.pop();
                self.filter_hosts();
            }
            KeyCode::Char(c) => {
                self.search_query.push(c);
                self.filter_hosts();
            }
            _ => {}
        }
        Ok(())
    }

    fn edit_hosts_file(&mut self) -> Result<()> {
        // Seed an empty-but-valid hosts file so the editor doesn't open on
        // nothing parseable
        if !self.config_manager.get_hosts_path().exists() {
            self.config_manager.save_hosts(&[])?;
        }

        let hosts_path = self.config_manager.get_hosts_path();
        if let Err(e) = open::that(hosts_path) {
            tracing::error!("Failed to open editor: {}", e);
            return Err(anyhow::anyhow!("Failed to open editor: {}", e));
        }

        // Reload after the editor saved the file
        self.load_all_hosts()?;

        Ok(())
    }
}
