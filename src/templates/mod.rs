//! HTML templates for the Notely web interface.
//!
//! ## Module Structure
//!
//! - `styles` - CSS constants
//! - `components` - Page shell, owner bar, and the client API helper
//! - `dashboard` - Document list with search, create, delete, and PDF import
//! - `editor` - Rich-text editor with AI actions, autosave, and chat

mod components;
mod dashboard;
mod editor;
mod styles;

pub use components::{api_script, base_html, owner_bar};
pub use dashboard::render_dashboard;
pub use editor::{render_editor, AUTOSAVE_DELAY_MS};
pub use styles::STYLE;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_page_wires_owner_and_import() {
        let html = render_dashboard();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("const OWNER_HEADER = 'x-owner';"));
        assert!(html.contains("/api/docs/import"));
        assert!(html.contains("id=\"search\""));
    }

    #[test]
    fn test_base_html_escapes_title() {
        let html = base_html("<b>x</b>", "", "");
        assert!(html.contains("<title>&lt;b&gt;x&lt;/b&gt;</title>"));
    }
}
