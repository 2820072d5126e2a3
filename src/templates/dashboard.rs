//! Dashboard page: the owner's documents, search, create, delete, and PDF import.

use super::components::{base_html, owner_bar};

// ============================================================================
// Dashboard Script
// ============================================================================

const DASHBOARD_SCRIPT: &str = r#"
    let notes = [];

    function setStatus(text) {
        document.getElementById('status').textContent = text || '';
    }

    function renderNotes() {
        const q = document.getElementById('search').value.toLowerCase();
        const grid = document.getElementById('cards');
        const filtered = notes.filter(n => (n.title || '').toLowerCase().includes(q));

        if (filtered.length === 0) {
            grid.innerHTML = '<div class="empty">No docs yet. Click <b>New doc</b>.</div>';
            return;
        }

        grid.innerHTML = filtered.map(n => `
            <article class="card" data-id="${n.id}">
                <div class="card-icon">📄</div>
                <div class="card-title">${escapeHtml(n.title || 'Untitled doc')}</div>
                <div class="card-meta">Edited ${escapeHtml(new Date(n.updatedAt).toLocaleString())}</div>
                <button class="btn danger delete" data-id="${n.id}" title="Delete">✕</button>
            </article>`).join('');
    }

    async function loadNotes() {
        try {
            notes = await api('/api/docs');
            renderNotes();
        } catch (err) {
            setStatus('Could not load docs: ' + err.message);
        }
    }

    async function newDoc() {
        const doc = await api('/api/docs', { method: 'POST', body: {} });
        location.href = '/doc/' + doc.id;
    }

    async function deleteDoc(id) {
        const note = notes.find(n => n.id === id);
        if (!confirm(`Delete "${(note && note.title) || 'Untitled doc'}"?`)) return;
        await api('/api/docs/' + id, { method: 'DELETE' });
        notes = notes.filter(n => n.id !== id);
        renderNotes();
    }

    async function importPdf(file) {
        const form = new FormData();
        form.append('file', file);
        setStatus('Importing ' + file.name + '…');
        const res = await fetch('/api/docs/import', {
            method: 'POST',
            headers: { [OWNER_HEADER]: getUid() },
            body: form,
        });
        const data = await res.json().catch(() => ({}));
        if (!res.ok) {
            setStatus('Import failed: ' + (data.error || ('HTTP ' + res.status)));
            return;
        }
        location.href = '/doc/' + data.id;
    }

    document.getElementById('search').addEventListener('input', renderNotes);
    document.getElementById('new-doc').addEventListener('click', () => {
        newDoc().catch(err => setStatus('Could not create doc: ' + err.message));
    });
    document.getElementById('upload').addEventListener('click', () => {
        document.getElementById('upload-input').click();
    });
    document.getElementById('upload-input').addEventListener('change', (e) => {
        const file = e.target.files[0];
        e.target.value = '';
        if (file) importPdf(file).catch(err => setStatus('Import failed: ' + err.message));
    });
    document.getElementById('cards').addEventListener('click', (e) => {
        const del = e.target.closest('.delete');
        if (del) {
            e.stopPropagation();
            deleteDoc(del.dataset.id).catch(err => setStatus('Delete failed: ' + err.message));
            return;
        }
        const card = e.target.closest('.card');
        if (card) location.href = '/doc/' + card.dataset.id;
    });

    loadNotes();
"#;

// ============================================================================
// Dashboard Template
// ============================================================================

pub fn render_dashboard() -> String {
    let body = format!(
        r#"{owner_bar}
        <main class="dash-main">
            <div class="dash-topbar">
                <h1>Docs</h1>
                <div class="actions">
                    <button class="btn" id="new-doc">➕ New doc</button>
                    <button class="btn ghost" id="upload">⬆️ Upload PDF</button>
                    <input type="file" id="upload-input" accept="application/pdf,.pdf" hidden>
                </div>
            </div>
            <div class="dash-search">
                <input id="search" placeholder="Search docs">
            </div>
            <div class="status" id="status"></div>
            <section class="cards-grid" id="cards"></section>
        </main>"#,
        owner_bar = owner_bar(),
    );

    base_html("Notely", &body, DASHBOARD_SCRIPT)
}
