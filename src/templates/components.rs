//! Shared HTML pieces: the page shell, the owner bar, and the client-side
//! API helper every page uses.

use crate::auth::OWNER_HEADER;
use crate::content::html_escape;

use super::styles::STYLE;

// ============================================================================
// Client API Helper
// ============================================================================

/// JavaScript shared by every page. `api()` attaches the owner header from
/// local storage to each request and throws on non-2xx responses.
pub fn api_script() -> String {
    format!(
        r#"
    const OWNER_HEADER = '{OWNER_HEADER}';

    function getUid() {{
        return localStorage.getItem('uid') || 'anon';
    }}

    function setUid(uid) {{
        const trimmed = (uid || '').trim();
        if (trimmed) {{
            localStorage.setItem('uid', trimmed);
        }} else {{
            localStorage.removeItem('uid');
        }}
    }}

    async function api(path, {{ method = 'GET', body, headers }} = {{}}) {{
        const res = await fetch(path, {{
            method,
            headers: {{
                'Content-Type': 'application/json',
                [OWNER_HEADER]: getUid(),
                ...(headers || {{}}),
            }},
            body: body ? JSON.stringify(body) : undefined,
        }});
        const text = await res.text();
        let data;
        try {{ data = text ? JSON.parse(text) : {{}}; }} catch {{ data = {{ raw: text }}; }}
        if (!res.ok) throw new Error((data && data.error) || ('HTTP ' + res.status));
        return data;
    }}

    function escapeHtml(s) {{
        return String(s)
            .replace(/&/g, '&amp;')
            .replace(/</g, '&lt;')
            .replace(/>/g, '&gt;')
            .replace(/"/g, '&quot;')
            .replace(/'/g, '&#39;');
    }}

    function initOwnerBar() {{
        const input = document.getElementById('owner-input');
        if (!input) return;
        input.value = localStorage.getItem('uid') || '';
        document.getElementById('owner-save').addEventListener('click', () => {{
            setUid(input.value);
            location.reload();
        }});
    }}
"#
    )
}

// ============================================================================
// Owner Bar
// ============================================================================

/// Stand-in for the sign-in widget: shows and sets the stored user id.
pub fn owner_bar() -> &'static str {
    r#"<div class="owner-bar">
            <a class="brand" href="/">📝 Notely</a>
            <label for="owner-input">Signed in as</label>
            <input id="owner-input" placeholder="anon">
            <button class="btn ghost" id="owner-save">Switch</button>
        </div>"#
}

// ============================================================================
// Base Template
// ============================================================================

pub fn base_html(title: &str, body: &str, page_script: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    {body}
    <script>
    {api}
    initOwnerBar();
    {page_script}
    </script>
</body>
</html>"#,
        title = html_escape(title),
        api = api_script(),
    )
}
