//! JavaScript evaluated in the host page to build and drive the sidebar
//!
//! Each constant is an arrow-function source; callers wrap it in a call
//! expression with JSON-encoded arguments, so no string escaping happens in
//! page context. All panel state lives in the DOM; the host process owns
//! the session and replaces the whole panel rather than diffing it.

/// Build (or rebuild) the sidebar panel for a video.
///
/// Removes any previous panel first, installs the toast helper, and wires
/// the copy and close buttons. Content starts in a loading placeholder until
/// the first render call.
pub const PANEL_SETUP_FN: &str = r#"
    (videoId) => {
        const existing = document.getElementById('tubescribe-sidebar');
        if (existing) existing.remove();

        window.__tsToast = (message) => {
            let toast = document.getElementById('tubescribe-toast');
            if (!toast) {
                toast = document.createElement('div');
                toast.id = 'tubescribe-toast';
                Object.assign(toast.style, {
                    position: 'fixed',
                    bottom: '10px',
                    right: '10px',
                    backgroundColor: '#333',
                    color: '#fff',
                    padding: '8px 12px',
                    borderRadius: '4px',
                    zIndex: '10000',
                    fontSize: '14px',
                    display: 'none'
                });
                document.body.appendChild(toast);
            }
            toast.textContent = message;
            toast.style.display = 'block';
            setTimeout(() => { toast.style.display = 'none'; }, 2000);
        };

        const panel = document.createElement('div');
        panel.id = 'tubescribe-sidebar';
        panel.style.cssText = [
            'position: fixed',
            'top: 60px',
            'right: 0',
            'width: 360px',
            'height: calc(100vh - 60px)',
            'background: #f9f9f9',
            'border-left: 1px solid #ccc',
            'box-shadow: -2px 0 5px rgba(0,0,0,0.1)',
            'overflow-y: auto',
            'z-index: 9999999',
            'font-family: Arial, sans-serif',
            'font-size: 14px',
            'color: #333'
        ].join(';');

        const header = document.createElement('div');
        header.className = 'ts-header';
        header.style.cssText =
            'padding: 10px; border-bottom: 1px solid #ddd; display: flex; align-items: center;';

        const selector = document.createElement('select');
        selector.className = 'ts-lang-selector';
        selector.style.cssText = 'flex-grow: 1; margin-right: 8px;';
        selector.appendChild(new Option('Loading...', ''));

        const title = document.createElement('span');
        title.className = 'ts-title';
        title.style.cssText = 'font-size: 15px; flex-shrink: 0;';
        title.textContent = 'Loading - ' + videoId;

        const copyBtn = document.createElement('button');
        copyBtn.className = 'ts-copy-btn';
        copyBtn.title = 'Copy transcript';
        copyBtn.textContent = 'Copy';
        copyBtn.style.cssText = 'margin-left: 8px; cursor: pointer;';
        copyBtn.addEventListener('click', () => {
            const texts = Array.from(panel.querySelectorAll('.ts-entry-text'))
                .map(el => el.textContent.trim());
            if (texts.length === 0) {
                window.__tsToast('No transcript available to copy.');
                return;
            }
            navigator.clipboard.writeText(texts.join('\n'))
                .then(() => window.__tsToast('Transcript copied.'))
                .catch(() => window.__tsToast('Failed to copy transcript.'));
        });

        const closeBtn = document.createElement('button');
        closeBtn.className = 'ts-close-btn';
        closeBtn.title = 'Close sidebar';
        closeBtn.textContent = '×';
        closeBtn.style.cssText = 'margin-left: 8px; font-size: 18px; cursor: pointer;';
        closeBtn.addEventListener('click', () => panel.remove());

        header.appendChild(selector);
        header.appendChild(title);
        header.appendChild(copyBtn);
        header.appendChild(closeBtn);

        const content = document.createElement('div');
        content.className = 'ts-content';
        content.style.cssText = 'padding: 10px;';
        content.textContent = 'Fetching transcript...';

        panel.appendChild(header);
        panel.appendChild(content);
        document.body.appendChild(panel);
        return true;
    }
"#;

/// Replace the panel body with rendered entries.
///
/// Entries arrive pre-formatted ({time, text, dir}); an empty list renders
/// the no-transcript message.
pub const RENDER_ENTRIES_FN: &str = r#"
    (entries) => {
        const panel = document.getElementById('tubescribe-sidebar');
        if (!panel) return false;
        const content = panel.querySelector('.ts-content');
        if (!content) return false;

        content.textContent = '';
        if (!entries || entries.length === 0) {
            const empty = document.createElement('div');
            empty.className = 'ts-empty';
            empty.textContent = 'No transcript available for this video.';
            content.appendChild(empty);
            return true;
        }

        for (const entry of entries) {
            const row = document.createElement('div');
            row.className = 'ts-entry';
            row.style.cssText = 'margin-bottom: 8px;';

            const time = document.createElement('div');
            time.className = 'ts-entry-time';
            time.style.cssText = 'color: #888; font-size: 12px;';
            time.textContent = entry.time;

            const text = document.createElement('div');
            text.className = 'ts-entry-text';
            text.dir = entry.dir;
            text.textContent = entry.text;

            row.appendChild(time);
            row.appendChild(text);
            content.appendChild(row);
        }
        return true;
    }
"#;

/// Update the header title text
pub const SET_TITLE_FN: &str = r#"
    (title) => {
        const el = document.querySelector('#tubescribe-sidebar .ts-title');
        if (!el) return false;
        el.textContent = title;
        return true;
    }
"#;

/// Populate the language selector and wire its change handler.
///
/// A change pushes a set_language message onto the relay queue for the host
/// process to pick up on its next tick.
pub const SET_TRACKS_FN: &str = r#"
    (tracks, current) => {
        const panel = document.getElementById('tubescribe-sidebar');
        if (!panel) return false;
        const selector = panel.querySelector('.ts-lang-selector');
        if (!selector) return false;

        selector.textContent = '';
        if (tracks.length === 0) {
            selector.appendChild(new Option('No captions', ''));
            return true;
        }
        for (const track of tracks) {
            const option = new Option(track.display_name, track.language_code);
            option.selected = track.language_code === current;
            selector.appendChild(option);
        }
        selector.onchange = (e) => {
            (window.__tubescribeQueue = window.__tubescribeQueue || []).push({
                type: 'set_language',
                language: e.target.value
            });
        };
        return true;
    }
"#;

/// Insert the Summarize button into the player controls.
///
/// Clicking serializes the visible entry texts newline-joined and pushes a
/// summarize message onto the relay queue. No acknowledgment is awaited.
pub const SUMMARIZE_BUTTON_FN: &str = r#"
    () => {
        if (document.getElementById('tubescribe-summarize-btn')) return true;
        const controls = document.querySelector('.ytp-right-controls');
        if (!controls) return false;

        const btn = document.createElement('button');
        btn.id = 'tubescribe-summarize-btn';
        btn.textContent = 'Summarize';
        btn.title = 'Summarize this video transcript';
        btn.style.cssText = 'margin-left: 8px; padding: 4px 8px; cursor: pointer;';
        btn.addEventListener('click', () => {
            const panel = document.getElementById('tubescribe-sidebar');
            const texts = panel
                ? Array.from(panel.querySelectorAll('.ts-entry-text')).map(el => el.textContent.trim())
                : [];
            if (texts.length === 0) {
                if (window.__tsToast) window.__tsToast('No transcript available to summarize.');
                return;
            }
            (window.__tubescribeQueue = window.__tubescribeQueue || []).push({
                type: 'summarize',
                transcript: texts.join('\n')
            });
        });
        controls.appendChild(btn);
        return true;
    }
"#;

/// Tear the panel and player button down
pub const DESTROY_FN: &str = r#"
    () => {
        const panel = document.getElementById('tubescribe-sidebar');
        if (panel) panel.remove();
        const btn = document.getElementById('tubescribe-summarize-btn');
        if (btn) btn.remove();
        return true;
    }
"#;
