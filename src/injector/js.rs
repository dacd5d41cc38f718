//! JavaScript evaluated in the target page
//!
//! Three arrow-function sources cover one locate pass, the layered text
//! write, and the redundant submit burst. The target page's markup is
//! externally controlled and changes without notice, so every step is
//! best-effort: cascading selectors, visibility checks, and multiple
//! independent trigger strategies instead of one "correct" path.

/// One locate pass.
///
/// Walks the input and submit cascades in order, accepting only elements
/// that are rendered (non-zero size, not hidden via styling) and not
/// disabled or read-only. When the cascades miss, optional structural
/// fallbacks kick in: form/large-textarea traversal for the input, SVG icon
/// hints and near-input buttons for the submit control. Found controls are
/// tagged with a data attribute so the later steps re-find the same nodes.
///
/// Arguments: (inputSelectors, submitSelectors, opts) where opts carries
/// {structuralFallback, iconHints}. Returns a JSON string
/// {"input": bool, "submit": bool}.
pub const LOCATE_FN: &str = r#"
    (inputSelectors, submitSelectors, opts) => {
        const visible = (el) => {
            if (!el) return false;
            const rect = el.getBoundingClientRect();
            if (rect.height <= 10 || rect.width <= 10) return false;
            const style = window.getComputedStyle(el);
            return style.display !== 'none' && style.visibility !== 'hidden';
        };
        const usable = (el) => visible(el) && !el.disabled && !el.readOnly;

        document.querySelectorAll('[data-ts-role]').forEach(el =>
            el.removeAttribute('data-ts-role'));

        let input = null;
        for (const selector of inputSelectors) {
            try {
                for (const el of document.querySelectorAll(selector)) {
                    if (usable(el)) { input = el; break; }
                }
            } catch (e) {}
            if (input) break;
        }

        if (!input && opts.structuralFallback) {
            for (const form of document.querySelectorAll('form')) {
                for (const ta of form.querySelectorAll('textarea')) {
                    const rect = ta.getBoundingClientRect();
                    if (rect.height > 30 && rect.width > 200 && !ta.disabled) {
                        input = ta; break;
                    }
                }
                if (input) break;
            }
        }
        if (!input && opts.structuralFallback) {
            for (const ta of document.querySelectorAll('textarea')) {
                const rect = ta.getBoundingClientRect();
                if (rect.height > 50 && rect.width > 300 && !ta.disabled) {
                    input = ta; break;
                }
            }
        }

        let submit = null;
        for (const selector of submitSelectors) {
            try {
                const el = document.querySelector(selector);
                if (el && visible(el) && !el.disabled) { submit = el; break; }
            } catch (e) {}
        }

        if (!submit && opts.iconHints.length > 0) {
            for (const button of document.querySelectorAll('button')) {
                const svg = button.querySelector('svg');
                if (!svg || button.disabled || button.offsetHeight === 0) continue;
                const markup = svg.outerHTML.toLowerCase();
                if (opts.iconHints.some(hint => markup.includes(hint))) {
                    submit = button; break;
                }
            }
        }

        if (!submit && input) {
            const container = input.closest('form') || input.parentElement?.parentElement;
            if (container) {
                for (const button of container.querySelectorAll('button')) {
                    if (!button.disabled && button.offsetHeight > 0) {
                        submit = button; break;
                    }
                }
            }
        }

        if (input) input.setAttribute('data-ts-role', 'input');
        if (submit) submit.setAttribute('data-ts-role', 'submit');
        return JSON.stringify({ input: !!input, submit: !!submit });
    }
"#;

/// Layered text write into the located input control.
///
/// The target UI framework may not treat a plain property assignment as a
/// user edit, and which layer it actually watches varies by framework and
/// control type. So: focus, set content, dispatch synthetic input/change/key
/// events, then verify the control echoes at least the first 50 characters;
/// on a failed read-back, call the prototype's native value setter and
/// re-dispatch input before verifying once more. Returns a boolean.
pub const INJECT_FN: &str = r#"
    async (text) => {
        const sleep = (ms) => new Promise(r => setTimeout(r, ms));
        const input = document.querySelector('[data-ts-role="input"]');
        if (!input) return false;

        const probe = text.substring(0, 50);
        const readBack = () => (input.value || input.textContent || '');

        input.focus();
        input.click();
        await sleep(100);

        const isTextarea = input.tagName.toLowerCase() === 'textarea';
        if (isTextarea) {
            input.value = '';
            input.value = text;
        } else {
            input.innerHTML = '';
            input.textContent = text;
        }

        const events = [
            new Event('focus', { bubbles: true }),
            new Event('input', { bubbles: true, cancelable: true }),
            new Event('change', { bubbles: true }),
            new KeyboardEvent('keydown', { key: 'a', ctrlKey: true, bubbles: true }),
            new KeyboardEvent('keyup', { key: 'a', ctrlKey: true, bubbles: true }),
            new Event('input', { bubbles: true })
        ];
        for (const event of events) {
            try { input.dispatchEvent(event); } catch (e) {}
        }

        await sleep(300);
        if (readBack().includes(probe)) return true;

        // The framework ignored the property write: go through the native
        // setter on the prototype so its internal value tracker sees it
        try {
            const proto = isTextarea
                ? window.HTMLTextAreaElement.prototype
                : Object.getPrototypeOf(input);
            const descriptor = Object.getOwnPropertyDescriptor(proto, 'value')
                || Object.getOwnPropertyDescriptor(input, 'value');
            if (descriptor && descriptor.set) {
                descriptor.set.call(input, text);
            } else if (!isTextarea) {
                input.textContent = text;
            }
            input.dispatchEvent(new Event('input', { bubbles: true }));
        } catch (e) {}

        await sleep(200);
        return readBack().includes(probe);
    }
"#;

/// Redundant submit burst.
///
/// There is no reliable signal for which trigger the target framework
/// honors, so every strategy fires in sequence with staggered delays
/// regardless of whether an earlier one appeared to work: direct
/// activation, synthetic pointer events, a form submit event when a form
/// exists, an Enter key sequence on the input, and Ctrl+Enter as the last
/// resort.
pub const SUBMIT_FN: &str = r#"
    async () => {
        const sleep = (ms) => new Promise(r => setTimeout(r, ms));
        const submit = document.querySelector('[data-ts-role="submit"]');
        const input = document.querySelector('[data-ts-role="input"]');

        if (submit) {
            try {
                submit.focus();
                submit.click();
            } catch (e) {}

            await sleep(200);
            for (const type of ['mousedown', 'mouseup', 'click']) {
                try {
                    submit.dispatchEvent(new MouseEvent(type, { bubbles: true, cancelable: true }));
                } catch (e) {}
            }

            await sleep(200);
            const form = submit.closest('form');
            if (form) {
                try {
                    form.dispatchEvent(new Event('submit', { bubbles: true, cancelable: true }));
                } catch (e) {}
            }
        }

        if (input) {
            await sleep(200);
            input.focus();
            const key = { key: 'Enter', code: 'Enter', keyCode: 13, which: 13,
                          bubbles: true, cancelable: true };
            for (const type of ['keydown', 'keypress', 'keyup']) {
                try { input.dispatchEvent(new KeyboardEvent(type, key)); } catch (e) {}
            }

            await sleep(200);
            try {
                input.dispatchEvent(new KeyboardEvent('keydown',
                    Object.assign({}, key, { ctrlKey: true })));
            } catch (e) {}
        }

        return true;
    }
"#;
