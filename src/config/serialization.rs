//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the config as a commented TOML file.
    ///
    /// Optional values that are unset are written as comments so the file
    /// still documents them.
    pub fn to_toml(&self) -> String {
        let mut out = String::new();

        out.push_str("# journal-admin configuration\n");
        out.push_str("# Precedence: environment variables > this file > built-in defaults\n\n");

        out.push_str("# Admin site root (JOURNAL_ADMIN_URL)\n");
        out.push_str(&format!("base_url = {:?}\n\n", self.base_url));

        out.push_str("# Cookie header from a logged-in browser session (JOURNAL_ADMIN_SESSION)\n");
        out.push_str("# The csrftoken value is sent back as X-CSRFToken on every change.\n");
        match &self.session_cookie {
            Some(cookie) => out.push_str(&format!("session_cookie = {:?}\n\n", cookie)),
            None => out.push_str("# session_cookie = \"sessionid=...; csrftoken=...\"\n\n"),
        }

        out.push_str("# Journal used for issues, articles, editors and policies (JOURNAL_ADMIN_JOURNAL)\n");
        match self.journal_id {
            Some(id) => out.push_str(&format!("journal_id = {}\n\n", id)),
            None => out.push_str("# journal_id = 1\n\n"),
        }

        out.push_str(&format!("page_size = {}\n", self.page_size));
        out.push_str(&format!("toast_secs = {}\n", self.toast_secs));
        out.push_str(&format!("search_debounce_ms = {}\n", self.search_debounce_ms));
        out.push_str("# 0 disables the per-request timeout\n");
        out.push_str(&format!("request_timeout_secs = {}\n", self.request_timeout_secs));
        out.push_str(&format!(
            "export_dir = {:?}\n",
            self.export_dir.display().to_string()
        ));

        out.push_str("\n[logging]\n");
        out.push_str("# RUST_LOG overrides this level\n");
        out.push_str(&format!("level = {:?}\n", self.logging.level));
        out.push_str(&format!("file_enabled = {}\n", self.logging.file_enabled));
        out.push_str(&format!(
            "file_dir = {:?}\n",
            self.logging.file_dir.display().to_string()
        ));
        out.push_str("# hourly | daily | never\n");
        out.push_str(&format!(
            "file_rotation = {:?}\n",
            self.logging.file_rotation.as_str()
        ));
        out.push_str(&format!("file_prefix = {:?}\n", self.logging.file_prefix));

        out
    }
}
