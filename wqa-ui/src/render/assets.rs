//! Inline page assets (vanilla CSS and ES6, no frameworks)

pub const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body {
    font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
    background-color: #0f172a;
    color: #e2e8f0;
    line-height: 1.6;
    min-height: 100vh;
    display: flex;
    flex-direction: column;
}
header {
    background-color: rgba(15, 23, 42, 0.85);
    border-bottom: 1px solid rgba(56, 189, 248, 0.15);
    padding: 16px 20px;
}
.header-content { display: flex; justify-content: space-between; align-items: center; }
.header-right {
    text-align: right;
    font-size: 13px;
    color: #64748b;
    font-family: 'Courier New', monospace;
    line-height: 1.2;
}
h1 { font-size: 26px; color: #67e8f9; display: flex; align-items: center; gap: 10px; }
.subtitle { color: #94a3b8; font-size: 13px; font-weight: 600; letter-spacing: 0.05em; }
.connection-status {
    display: inline-block;
    padding: 2px 8px;
    border-radius: 10px;
    font-size: 11px;
    font-weight: 600;
    margin-left: 10px;
    color: #fff;
}
.status-connected { background: #10b981; }
.status-connecting { background: #f59e0b; }
.status-disconnected { background: #ef4444; }
main { flex: 1; display: flex; align-items: center; justify-content: center; padding: 24px; }
#view { width: 100%; max-width: 960px; }
footer { text-align: center; padding: 16px; font-size: 12px; color: #64748b; }
body.splash-active header, body.splash-active footer { display: none; }
.muted { color: #94a3b8; }
.small { font-size: 13px; }
.lead { font-size: 18px; color: #cbd5e1; margin-top: 24px; }
.button {
    display: inline-block;
    padding: 10px 28px;
    background: linear-gradient(90deg, #0284c7, #06b6d4);
    color: white;
    border: none;
    border-radius: 6px;
    font-weight: 700;
    font-size: 15px;
    cursor: pointer;
}
.button:hover { filter: brightness(1.1); }
.button-danger { background: linear-gradient(90deg, #dc2626, #b91c1c); }
.splash { text-align: center; padding: 48px 0; }
.drop-mark { font-size: 72px; }
.breathe { animation: breathe 2.4s ease-in-out infinite; }
@keyframes breathe { 0%, 100% { transform: scale(1); } 50% { transform: scale(1.08); } }
.title-gradient { font-size: 32px; color: #7dd3fc; margin-top: 16px; }
.drop-zone {
    border: 4px dashed #334155;
    border-radius: 16px;
    padding: 48px 24px;
    text-align: center;
    cursor: pointer;
    background: rgba(30, 41, 59, 0.5);
    transition: border-color 0.3s, background 0.3s, box-shadow 0.3s;
}
.drop-zone:hover { border-color: #0ea5e9; background: #1e293b; }
.drop-zone.dragging {
    border-color: #22d3ee;
    background: rgba(51, 65, 85, 0.7);
    box-shadow: 0 0 25px rgba(45, 212, 191, 0.5);
}
.upload-mark { font-size: 64px; color: #0ea5e9; }
.tip { font-size: 12px; color: #64748b; margin: 20px auto 0; max-width: 320px; }
.view-analyzing { text-align: center; }
.preview { max-height: 240px; border-radius: 8px; margin-bottom: 32px; box-shadow: 0 8px 24px rgba(0, 0, 0, 0.3); }
.spinner {
    width: 64px;
    height: 64px;
    margin: 0 auto;
    border: 4px solid rgba(51, 65, 85, 0.5);
    border-top-color: #22d3ee;
    border-radius: 50%;
    animation: spin 1s linear infinite;
}
@keyframes spin { to { transform: rotate(360deg); } }
.view-result {
    background: rgba(30, 41, 59, 0.5);
    border: 1px solid rgba(51, 65, 85, 0.5);
    border-radius: 16px;
    padding: 28px;
}
.result-grid { display: grid; grid-template-columns: 2fr 3fr; gap: 28px; }
@media (max-width: 800px) { .result-grid { grid-template-columns: 1fr; } }
.result-grid h3 { font-size: 20px; margin-bottom: 16px; color: #f1f5f9; }
.sample { width: 100%; aspect-ratio: 1; object-fit: cover; border-radius: 8px; border: 2px solid #334155; }
.summary {
    background: rgba(12, 74, 110, 0.45);
    border: 1px solid rgba(3, 105, 161, 0.5);
    border-radius: 8px;
    padding: 16px;
    margin-bottom: 24px;
}
.summary h4 { color: #7dd3fc; margin-bottom: 4px; }
.summary p { color: #bae6fd; font-style: italic; }
.cards { display: grid; grid-template-columns: repeat(2, 1fr); gap: 16px; }
.card {
    background: rgba(30, 41, 59, 0.7);
    border: 1px solid #334155;
    border-top-width: 4px;
    border-radius: 8px;
    padding: 16px;
}
.card h4 { display: flex; align-items: center; gap: 10px; margin-bottom: 10px; color: #f1f5f9; }
.axis-icon { font-size: 22px; color: #38bdf8; }
.card-favorable { border-top-color: #22c55e; }
.card-cautionary { border-top-color: #eab308; }
.card-severe { border-top-color: #ef4444; }
.level { font-weight: 600; margin-bottom: 6px; }
.level-icon { margin-right: 8px; }
.level-favorable { color: #4ade80; }
.level-cautionary { color: #facc15; }
.level-severe { color: #f87171; }
.description { font-size: 14px; color: #94a3b8; }
.actions { text-align: center; margin-top: 36px; }
.error-panel {
    text-align: center;
    padding: 32px;
    background: rgba(239, 68, 68, 0.1);
    border: 1px solid rgba(239, 68, 68, 0.3);
    border-radius: 16px;
}
.error-mark { font-size: 48px; font-weight: 700; color: #f87171; }
.error-panel h3 { font-size: 24px; color: #fca5a5; margin-bottom: 8px; }
.error-message { color: #cbd5e1; margin: 0 auto 24px; max-width: 480px; }
"#;

/// Browser shell: forwards the picked/dropped file, swaps in the server-rendered
/// view whenever the server announces a state change.
pub const SCRIPT: &str = r#"
(function () {
    const view = document.getElementById('view');
    const fileInput = document.getElementById('file-input');
    const statusBadge = document.getElementById('connection-status');

    function setStatus(text, cls) {
        statusBadge.textContent = text;
        statusBadge.className = 'connection-status ' + cls;
    }

    async function refreshView() {
        try {
            const response = await fetch('/view');
            if (response.ok) {
                view.innerHTML = await response.text();
                document.body.classList.toggle('splash-active', !!view.querySelector('.view-initializing'));
            }
        } catch (err) {
            console.error('Failed to refresh view', err);
        }
    }

    function submitFile(file) {
        // Non-image input is dropped silently
        if (!file || !file.type.startsWith('image/')) {
            return;
        }
        fetch('/analyze', {
            method: 'POST',
            headers: { 'Content-Type': file.type },
            body: file,
        }).then(refreshView);
    }

    document.addEventListener('click', (event) => {
        if (event.target.closest('[data-action="reset"]')) {
            fetch('/reset', { method: 'POST' }).then(refreshView);
            return;
        }
        if (event.target.closest('#drop-zone')) {
            fileInput.click();
        }
    });

    fileInput.addEventListener('change', () => {
        const file = fileInput.files && fileInput.files[0];
        fileInput.value = '';
        submitFile(file);
    });

    function dropZoneOf(event) {
        return event.target.closest ? event.target.closest('#drop-zone') : null;
    }

    ['dragenter', 'dragover'].forEach((name) => {
        document.addEventListener(name, (event) => {
            const zone = dropZoneOf(event);
            if (!zone) return;
            event.preventDefault();
            if (event.dataTransfer && event.dataTransfer.items && event.dataTransfer.items.length > 0) {
                zone.classList.add('dragging');
            }
        });
    });

    document.addEventListener('dragleave', (event) => {
        const zone = dropZoneOf(event);
        if (zone) zone.classList.remove('dragging');
    });

    document.addEventListener('drop', (event) => {
        const zone = dropZoneOf(event);
        if (!zone) return;
        event.preventDefault();
        zone.classList.remove('dragging');
        const files = event.dataTransfer && event.dataTransfer.files;
        submitFile(files && files[0]);
    });

    const events = new EventSource('/events');
    events.addEventListener('ConnectionStatus', () => {
        setStatus('Conectado', 'status-connected');
        refreshView();
    });
    events.addEventListener('ViewStateChanged', refreshView);
    events.addEventListener('Resync', refreshView);
    events.onerror = () => setStatus('Desconectado', 'status-disconnected');
})();
"#;
