//! Layout component wrapping all pages: sidebar, header and the shared
//! client-side shell script.

use dioxus::prelude::*;

use super::header::Header;
use super::sidebar::Sidebar;

/// Shared JavaScript utilities (XSS-safe escaping, JSON POST helper)
const SHARED_JS: &str = r#"
function esc(s) { return String(s || '').replace(/[&<>"']/g, c => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;',"'":'&#39;'})[c]); }
async function postJson(url, body) {
    const res = await fetch(url, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body || {})
    });
    return res.json().catch(() => ({}));
}
"#;

/// Shell behavior: clock, responsive sidebar, bus subscription.
///
/// Pages register interest in bus events with `onBusEvent(types, fn)`.
const SHELL_SCRIPT: &str = r#"
(function() {
    const clock = document.getElementById('clock');
    const tick = () => { if (clock) clock.textContent = new Date().toLocaleTimeString(); };
    tick();
    const clockTimer = setInterval(tick, 1000);

    const shell = document.querySelector('.shell');
    const applyWidth = () => shell.classList.toggle('collapsed', window.innerWidth < 1024);
    applyWidth();
    window.addEventListener('resize', applyWidth);
    const toggle = document.getElementById('sidebar-toggle');
    if (toggle) toggle.addEventListener('click', () => shell.classList.toggle('collapsed'));

    const handlers = [];
    window.onBusEvent = (types, fn) => handlers.push({ types, fn });

    const refreshBadge = () => fetch('/api/emergencies').then(r => r.json()).then(body => {
        const badge = document.getElementById('active-badge');
        if (!badge) return;
        badge.textContent = body.summary.active;
        badge.hidden = body.summary.active === 0;
    }).catch(() => {});

    const es = new EventSource('/events');
    es.onmessage = (e) => {
        try {
            const event = JSON.parse(e.data);
            if (event.type.startsWith('Emergenc')) refreshBadge();
            handlers.filter(h => h.types.includes(event.type)).forEach(h => h.fn(event));
        } catch (err) { console.error('SSE parse error:', err); }
    };
    es.onerror = () => console.warn('SSE disconnected');

    window.addEventListener('pagehide', () => {
        clearInterval(clockTimer);
        window.removeEventListener('resize', applyWidth);
        es.close();
    });
})();
"#;

/// CSS styles for the application (extends Pico CSS).
const CUSTOM_STYLES: &str = r#"
:root { --pico-font-size: 15px; --sidebar-width: 220px; }
body { margin: 0; }
.shell { display: grid; grid-template-columns: var(--sidebar-width) 1fr; min-height: 100vh; }
.shell.collapsed { grid-template-columns: 64px 1fr; }
.shell.collapsed .sidebar .label, .shell.collapsed .sidebar .brand-name { display: none; }
.sidebar { background: var(--pico-card-background-color); border-right: 1px solid var(--pico-muted-border-color); padding: 1rem 0.5rem; }
.sidebar ul { list-style: none; padding: 0; }
.sidebar li { list-style: none; margin: 0.25rem 0; }
.sidebar a { display: flex; align-items: center; gap: 0.5rem; padding: 0.5rem; border-radius: 6px; text-decoration: none; }
.sidebar a[aria-current="page"] { background: var(--pico-primary-background); color: var(--pico-primary-inverse); }
.badge { display: inline-block; min-width: 1.5em; padding: 0.05em 0.45em; border-radius: 999px; font-size: 0.75em; text-align: center; color: #fff; }
.badge.count { background: #dc2626; margin-left: auto; }
.topbar { display: flex; justify-content: space-between; align-items: center; padding: 0.75rem 1.5rem; border-bottom: 1px solid var(--pico-muted-border-color); }
.content { padding: 1.5rem; }
.cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: 1rem; margin-bottom: 1.5rem; }
.cards article { margin: 0; }
.cards .value { font-size: 1.8rem; font-weight: 700; }
.tabs { display: flex; gap: 0.25rem; border-bottom: 1px solid var(--pico-muted-border-color); margin-bottom: 1rem; flex-wrap: wrap; }
.tabs a { padding: 0.5rem 1rem; text-decoration: none; border-bottom: 2px solid transparent; }
.tabs a[aria-current="page"] { border-bottom-color: var(--pico-primary); font-weight: 600; }
.toolbar { display: flex; gap: 0.5rem; align-items: center; flex-wrap: wrap; margin-bottom: 1rem; }
.toolbar select, .toolbar button, .toolbar label { margin: 0; width: auto; }
.bar { height: 8px; border-radius: 4px; background: var(--pico-primary); }
.error-banner { border-left: 4px solid #dc2626; display: flex; justify-content: space-between; align-items: center; }
small { color: var(--pico-muted-color); }
@media print { .sidebar, .topbar, .toolbar, .tabs { display: none; } .shell { display: block; } }
"#;

#[derive(Props, Clone, PartialEq)]
pub struct LayoutProps {
    /// Page title (shown in browser tab and header)
    pub title: String,
    /// Active navigation item ID
    pub nav_active: String,
    /// Open incidents shown on the sidebar badge
    pub active_count: usize,
    /// Page content
    pub children: Element,
    /// Optional additional scripts to include
    #[props(default)]
    pub scripts: Option<String>,
}

/// Main layout component wrapping all pages.
#[component]
pub fn Layout(props: LayoutProps) -> Element {
    let version = env!("AEGIS_VERSION");

    rsx! {
        head {
            meta { charset: "utf-8" }
            meta { name: "viewport", content: "width=device-width, initial-scale=1" }
            title { "{props.title} - Aegis Admin" }
            link {
                rel: "stylesheet",
                href: "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css"
            }
            style { {CUSTOM_STYLES} }
            script { dangerous_inner_html: SHARED_JS }
        }
        body {
            div { class: "shell",
                Sidebar { active: props.nav_active.clone(), active_count: props.active_count }
                div {
                    Header { title: props.title.clone() }
                    main { class: "content",
                        {props.children}
                    }
                    footer { class: "content",
                        small { "Aegis Admin v{version}" }
                    }
                }
            }
            script { dangerous_inner_html: SHELL_SCRIPT }
            if let Some(scripts) = props.scripts {
                script { dangerous_inner_html: "{scripts}" }
            }
        }
    }
}
