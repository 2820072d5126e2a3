//! Editor page: rich-text surface, AI actions, debounced autosave, and the
//! chat side panel.
//!
//! Autosave keeps a single timer. Every edit recomputes the title from the
//! first heading or paragraph, clears the pending timer and schedules a new
//! save after `AUTOSAVE_DELAY_MS`. The chat transcript is written back in
//! full after every exchange.

use crate::models::DocId;

use super::components::base_html;

/// Quiet period before an edit is saved.
pub const AUTOSAVE_DELAY_MS: u32 = 400;

const GREETING: &str = "Hi! Select text and click Ask AI, or send a chat.";

// ============================================================================
// Editor Script
// ============================================================================

const EDITOR_SCRIPT: &str = r#"
    const DEFAULT_CONTENT = '<h1>Untitled doc</h1><p></p>';
    const editor = document.getElementById('editor');
    const saveState = document.getElementById('save-state');
    let messages = [];
    let saveTimer = null;
    let sending = false;

    // ---- Autosave ----

    function currentTitle() {
        const first = editor.querySelector('h1,h2,h3,p');
        const text = first ? first.textContent.trim() : '';
        return text || 'Untitled doc';
    }

    function scheduleSave() {
        const html = editor.innerHTML;
        const title = currentTitle();
        document.getElementById('doc-title').textContent = title;
        saveState.textContent = 'Editing…';

        clearTimeout(saveTimer);
        saveTimer = setTimeout(() => {
            api('/api/docs/' + DOC_ID, { method: 'PUT', body: { title, contentHtml: html } })
                .then(() => { saveState.textContent = 'Saved'; })
                .catch(() => { saveState.textContent = ''; });
        }, AUTOSAVE_DELAY_MS);
    }

    editor.addEventListener('input', scheduleSave);
    window.addEventListener('beforeunload', () => clearTimeout(saveTimer));

    // ---- Toolbar ----

    document.querySelectorAll('[data-cmd]').forEach(btn => {
        btn.addEventListener('click', () => {
            const [cmd, arg] = btn.dataset.cmd.split(':');
            editor.focus();
            document.execCommand(cmd, false, arg || null);
            scheduleSave();
        });
    });

    document.getElementById('highlight').addEventListener('click', () => {
        editor.focus();
        document.execCommand('hiliteColor', false, '#fff3bf');
        scheduleSave();
    });

    // ---- Chat ----

    function renderMessages() {
        const scroll = document.getElementById('chat-scroll');
        scroll.innerHTML = messages
            .map(m => `<div class="msg ${m.role === 'user' ? 'user' : 'assistant'}">${escapeHtml(m.content)}</div>`)
            .join('');
        scroll.scrollTop = scroll.scrollHeight;
    }

    function addMessages(newMessages) {
        messages = [...messages, ...newMessages];
        renderMessages();
        api('/api/docs/' + DOC_ID + '/chat', { method: 'PUT', body: { messages } })
            .catch(err => console.error('Chat save failed:', err));
    }

    async function sendChat(e) {
        e.preventDefault();
        const input = document.getElementById('chat-input');
        const prompt = input.value.trim();
        if (!prompt || sending) return;

        const history = messages.slice();
        addMessages([{ role: 'user', content: prompt }]);
        input.value = '';
        sending = true;

        try {
            const data = await api('/api/ai/chat', {
                method: 'POST',
                body: { prompt, contextHtml: editor.innerHTML, messages: history },
            });
            addMessages([{ role: 'assistant', content: (data && data.answer) || '(no answer)' }]);
        } catch (err) {
            console.error('sendChat error:', err);
            addMessages([{ role: 'assistant', content: '(Mock) The assistant is unavailable right now.' }]);
        } finally {
            sending = false;
        }
    }

    document.getElementById('chat-form').addEventListener('submit', sendChat);

    // ---- AI actions ----

    function selectionRange() {
        const sel = window.getSelection();
        if (!sel.rangeCount) return null;
        const range = sel.getRangeAt(0);
        if (!editor.contains(range.commonAncestorContainer)) return null;
        return range;
    }

    function insertAfter(range, html) {
        const block = document.createElement('div');
        block.innerHTML = html;
        const after = range.cloneRange();
        after.collapse(false);
        let anchor = after.endContainer;
        while (anchor.parentNode && anchor.parentNode !== editor) anchor = anchor.parentNode;
        const node = block.firstChild;
        if (anchor === editor || !anchor.parentNode) {
            editor.appendChild(node);
        } else {
            anchor.parentNode.insertBefore(node, anchor.nextSibling);
        }
    }

    async function askAI() {
        const range = selectionRange();
        const selected = range ? range.toString().trim() : '';
        if (!selected) {
            addMessages([{ role: 'assistant', content: 'Select some text first.' }]);
            return;
        }
        const mode = document.getElementById('ai-mode').value;

        let answer;
        try {
            const data = await api('/api/ai/inline', {
                method: 'POST',
                body: { prompt: selected, mode, contextHtml: editor.innerHTML },
            });
            answer = data.answer;
        } catch {
            answer = `Mock answer for "${selected}". (The AI service is unavailable.)`;
        }

        insertAfter(range, `<blockquote>${escapeHtml(answer)}</blockquote>`);
        scheduleSave();
        addMessages([
            { role: 'user', content: selected },
            { role: 'assistant', content: answer },
        ]);
    }

    async function enhance() {
        const range = selectionRange();
        const selected = range ? range.toString().trim() : '';
        if (!selected) {
            addMessages([{ role: 'assistant', content: 'Select some text first.' }]);
            return;
        }

        try {
            const data = await api('/api/ai/enhance', {
                method: 'POST',
                body: { prompt: selected, mode: 'enhance', contextHtml: editor.innerHTML },
            });
            range.deleteContents();
            range.insertNode(document.createTextNode(data.answer));
            scheduleSave();
        } catch {
            addMessages([{ role: 'assistant', content: '(Mock) Enhance is unavailable right now.' }]);
        }
    }

    document.getElementById('ask-ai').addEventListener('click', () => askAI());
    document.getElementById('enhance').addEventListener('click', () => enhance());

    // ---- Load ----

    (async () => {
        try {
            const doc = await api('/api/docs/' + DOC_ID);
            editor.innerHTML = doc.contentHtml || DEFAULT_CONTENT;
            document.getElementById('doc-title').textContent = doc.title || 'Untitled doc';

            const chat = await api('/api/docs/' + DOC_ID + '/chat');
            messages = (chat.messages && chat.messages.length)
                ? chat.messages
                : [{ role: 'assistant', content: GREETING }];
            renderMessages();
            editor.contentEditable = 'true';
        } catch {
            location.href = '/';
        }
    })();
"#;

// ============================================================================
// Editor Template
// ============================================================================

pub fn render_editor(id: &DocId) -> String {
    let body = r#"<div class="app">
            <header class="app-header">
                <div class="crumbs"><a href="/">Docs</a> / <span id="doc-title">Loading…</span></div>
                <span class="save-state" id="save-state"></span>
            </header>
            <div class="toolbar">
                <button data-cmd="bold" title="Bold"><b>B</b></button>
                <button data-cmd="italic" title="Italic"><i>I</i></button>
                <button data-cmd="underline" title="Underline"><u>U</u></button>
                <button id="highlight" title="Highlight">🖍</button>
                <span class="sep"></span>
                <button data-cmd="formatBlock:h1">H1</button>
                <button data-cmd="formatBlock:h2">H2</button>
                <button data-cmd="formatBlock:h3">H3</button>
                <button data-cmd="formatBlock:p">¶</button>
                <button data-cmd="insertUnorderedList" title="Bullet list">• List</button>
                <button data-cmd="formatBlock:blockquote" title="Quote">❝</button>
                <span class="sep"></span>
                <select id="ai-mode" title="AI mode">
                    <option value="explain">Explain</option>
                    <option value="expand">Expand</option>
                    <option value="summarize">Summarize</option>
                    <option value="question">Question</option>
                    <option value="connect">Connect</option>
                </select>
                <button id="ask-ai">✨ Ask AI</button>
                <button id="enhance">🪄 Enhance</button>
            </div>
            <div class="workspace">
                <div class="page-wrap">
                    <div id="editor" class="prosemirror-content" contenteditable="false"><h1>Loading…</h1></div>
                </div>
                <aside class="chat-panel">
                    <h3>Assistant</h3>
                    <div class="chat-scroll" id="chat-scroll"></div>
                    <form class="chat-form" id="chat-form">
                        <input id="chat-input" placeholder="Ask about your notes…" autocomplete="off">
                        <button class="btn" type="submit">Send</button>
                    </form>
                </aside>
            </div>
        </div>"#;

    // serde_json gives us correctly escaped JS string literals
    let id_json = serde_json::to_string(&id.to_string()).unwrap_or_else(|_| "\"\"".to_string());
    let greeting_json = serde_json::to_string(GREETING).unwrap_or_else(|_| "\"\"".to_string());
    let script = format!(
        "const DOC_ID = {id_json};\n    const AUTOSAVE_DELAY_MS = {AUTOSAVE_DELAY_MS};\n    const GREETING = {greeting_json};\n{EDITOR_SCRIPT}"
    );

    base_html("Notely editor", body, &script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_embeds_document_id_and_delay() {
        let id: DocId = "65a1b2c3d4e5f60718293a4b".parse().unwrap();
        let html = render_editor(&id);

        assert!(html.contains("const DOC_ID = \"65a1b2c3d4e5f60718293a4b\";"));
        assert!(html.contains("const AUTOSAVE_DELAY_MS = 400;"));
        assert!(html.contains("clearTimeout(saveTimer)"));
        assert!(html.contains("/api/ai/inline"));
    }
}
