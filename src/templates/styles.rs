//! CSS for the dashboard and editor pages.

// ============================================================================
// CSS Styles
// ============================================================================

pub const STYLE: &str = r#"
:root {
    --bg: #f8f9fb;
    --panel: #ffffff;
    --fg: #1f2933;
    --muted: #7b8794;
    --border: #e4e7eb;
    --accent: #3b5bdb;
    --accent-soft: #edf2ff;
    --danger: #e03131;
    --quote: #f1f3f5;
}

* { box-sizing: border-box; }

body {
    margin: 0;
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    background: var(--bg);
    color: var(--fg);
}

a { color: var(--accent); text-decoration: none; }

.btn {
    border: 1px solid var(--accent);
    background: var(--accent);
    color: #fff;
    border-radius: 6px;
    padding: 6px 12px;
    font-size: 14px;
    cursor: pointer;
}
.btn.ghost { background: transparent; color: var(--accent); }
.btn.danger { border-color: var(--danger); background: transparent; color: var(--danger); }
.btn:disabled { opacity: 0.5; cursor: default; }

/* Owner bar */
.owner-bar {
    display: flex;
    gap: 8px;
    align-items: center;
    padding: 8px 24px;
    border-bottom: 1px solid var(--border);
    background: var(--panel);
    font-size: 13px;
    color: var(--muted);
}
.owner-bar input { padding: 4px 8px; border: 1px solid var(--border); border-radius: 4px; }
.owner-bar .brand { font-weight: 600; color: var(--fg); margin-right: auto; }

/* Dashboard */
.dash-main { max-width: 1100px; margin: 0 auto; padding: 24px; }
.dash-topbar { display: flex; align-items: center; justify-content: space-between; }
.dash-topbar .actions { display: flex; gap: 8px; }
.dash-search input {
    width: 100%;
    margin: 16px 0;
    padding: 10px 14px;
    border: 1px solid var(--border);
    border-radius: 8px;
    font-size: 15px;
}
.cards-grid {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(220px, 1fr));
    gap: 16px;
}
.card {
    position: relative;
    background: var(--panel);
    border: 1px solid var(--border);
    border-radius: 10px;
    padding: 16px;
    cursor: pointer;
}
.card:hover { border-color: var(--accent); }
.card-title { font-weight: 600; margin: 8px 0 4px; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.card-meta { font-size: 12px; color: var(--muted); }
.card .delete { position: absolute; top: 8px; right: 8px; padding: 2px 8px; }
.empty { color: var(--muted); padding: 32px 0; }
.status { font-size: 13px; color: var(--muted); min-height: 1.2em; }

/* Editor */
.app { display: flex; flex-direction: column; height: 100vh; }
.app-header {
    display: flex;
    align-items: center;
    gap: 12px;
    padding: 8px 16px;
    background: var(--panel);
    border-bottom: 1px solid var(--border);
}
.app-header .crumbs { margin-right: auto; }
.save-state { font-size: 12px; color: var(--muted); }
.toolbar {
    display: flex;
    flex-wrap: wrap;
    gap: 4px;
    padding: 6px 16px;
    background: var(--panel);
    border-bottom: 1px solid var(--border);
}
.toolbar button, .toolbar select {
    border: 1px solid var(--border);
    background: var(--panel);
    border-radius: 4px;
    padding: 4px 8px;
    cursor: pointer;
}
.toolbar .sep { width: 1px; background: var(--border); margin: 0 4px; }
.workspace { display: flex; flex: 1; min-height: 0; }
.page-wrap { flex: 1; overflow-y: auto; padding: 32px; }
.prosemirror-content {
    max-width: 800px;
    min-height: 70vh;
    margin: 0 auto;
    padding: 48px 56px;
    background: var(--panel);
    border: 1px solid var(--border);
    border-radius: 6px;
    outline: none;
    line-height: 1.6;
}
.prosemirror-content blockquote {
    margin: 12px 0;
    padding: 8px 16px;
    border-left: 4px solid var(--accent);
    background: var(--quote);
}
.prosemirror-content mark { background: #fff3bf; }

/* Chat panel */
.chat-panel {
    width: 340px;
    display: flex;
    flex-direction: column;
    border-left: 1px solid var(--border);
    background: var(--panel);
}
.chat-panel h3 { margin: 0; padding: 12px 16px; border-bottom: 1px solid var(--border); font-size: 15px; }
.chat-scroll { flex: 1; overflow-y: auto; padding: 12px 16px; }
.msg { margin-bottom: 10px; padding: 8px 10px; border-radius: 8px; white-space: pre-wrap; font-size: 14px; }
.msg.user { background: var(--accent-soft); margin-left: 32px; }
.msg.assistant { background: var(--quote); margin-right: 32px; }
.chat-form { display: flex; gap: 6px; padding: 12px 16px; border-top: 1px solid var(--border); }
.chat-form input { flex: 1; padding: 6px 10px; border: 1px solid var(--border); border-radius: 6px; }
"#;
