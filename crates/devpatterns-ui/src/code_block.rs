//! Code block component.
//!
//! Renders a dedented, highlighted sample with line numbers and a copy
//! button. The button flips to a check mark after a successful copy and
//! flips back once the reset delay has passed. Copying again restarts the
//! delay, a rejected clipboard write changes nothing, and unmounting the
//! block cancels any pending reset.

use std::time::Duration;

use devpatterns_core::{COPY_RESET_DELAY, ClipboardError, CopyState, CopyStatus};
use devpatterns_parser::{
    CodeBlockRenderer, dedent,
    codeblock::{CHECK_ICON, COPY_ICON, DEFAULT_LANGUAGE},
};
use leptos::{
    leptos_dom::helpers::{TimeoutHandle, set_timeout_with_handle},
    prelude::*,
    task::spawn_local,
};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::MouseEvent;

thread_local! {
    static RENDERER: CodeBlockRenderer = CodeBlockRenderer::default();
}

/// A highlighted code sample with a copy-to-clipboard button.
#[component]
pub fn CodeBlock(
    /// Raw code. Leading/trailing blank lines and common indentation are removed.
    #[prop(into)]
    code: String,
    /// Language tag for highlighting. Defaults to `bash`.
    #[prop(optional, into)]
    language: Option<String>,
    /// How long the "copied" indicator stays up.
    #[prop(default = COPY_RESET_DELAY)]
    reset_delay: Duration,
) -> impl IntoView {
    let language = resolve_language(language);
    let code = dedent(&code);
    let (lines, pre_style) = render_lines(&code, &language);

    let status = RwSignal::new(CopyStatus::new());
    let timer = StoredValue::new(None::<TimeoutHandle>);
    let payload = StoredValue::new(code);

    let on_copy = move |_: MouseEvent| {
        let text = payload.get_value();
        spawn_local(async move {
            let outcome = write_clipboard(&text).await;
            let Some(ticket) = status.try_update(|s| s.record(outcome)).flatten() else {
                return;
            };

            if let Some(previous) = timer.try_update_value(Option::take).flatten() {
                previous.clear();
            }

            let revert = move || {
                status.try_update(|s| s.revert(ticket));
            };
            match set_timeout_with_handle(revert, reset_delay) {
                Ok(handle) => {
                    timer.try_set_value(Some(handle));
                }
                Err(e) => tracing::debug!(error = ?e, "failed to schedule copy reset"),
            }
        });
    };

    on_cleanup(move || {
        if let Some(handle) = timer.try_update_value(Option::take).flatten() {
            handle.clear();
        }
        status.try_update(CopyStatus::unmount);
    });

    let state = move || status.with(CopyStatus::state);
    let lang_attr = language.clone();

    view! {
      <div class="code-block" data-lang=lang_attr>
        <button
          type="button"
          class="copy-button"
          data-state=move || state_attr(state())
          aria-label=move || state().label()
          title=move || state().title()
          on:click=on_copy
        >
          <span class="copy-icons" inner_html=copy_icons() />
        </button>
        <pre class="code" style=pre_style>
          <code class=format!("language-{language}") inner_html=lines />
        </pre>
      </div>
    }
}

/// Language tag to highlight with, falling back to the default.
fn resolve_language(language: Option<String>) -> String {
    language
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

/// Highlighted line markup and `<pre>` style for normalized code.
fn render_lines(code: &str, language: &str) -> (String, String) {
    RENDERER.with(|r| (r.lines_html(code, language), r.pre_style()))
}

/// `data-state` value, matching the statically generated pages.
fn state_attr(state: CopyState) -> &'static str {
    match state {
        CopyState::Idle => "idle",
        CopyState::Copied => "copied",
    }
}

fn copy_icons() -> String {
    format!("{COPY_ICON}{CHECK_ICON}")
}

async fn write_clipboard(text: &str) -> Result<(), ClipboardError> {
    let window = web_sys::window().ok_or_else(|| ClipboardError::new("no window"))?;
    let promise = window.navigator().clipboard().write_text(text);
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e: JsValue| ClipboardError::new(e.as_string().unwrap_or_else(|| format!("{e:?}"))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_language() {
        assert_eq!(resolve_language(None), "bash");
        assert_eq!(resolve_language(Some("  ".into())), "bash");
        assert_eq!(resolve_language(Some("ts".into())), "ts");
        assert_eq!(resolve_language(Some(" rust ".into())), "rust");
    }

    #[test]
    fn test_render_lines_numbers_each_line() {
        let code = dedent("\n    if (x) {\n      y();\n    }\n  ");
        let (lines, style) = render_lines(&code, "js");

        assert_eq!(lines.matches(r#"<span class="line">"#).count(), 3);
        assert!(lines.contains(r#"<span class="line-number" aria-hidden="true">3</span>"#));
        assert!(style.contains("background-color:"));
    }

    #[test]
    fn test_render_lines_empty_code() {
        let (lines, _) = render_lines(&dedent(""), "bash");
        assert!(lines.matches(r#"<span class="line">"#).count() <= 1);
    }

    #[test]
    fn test_state_attr() {
        assert_eq!(state_attr(CopyState::Idle), "idle");
        assert_eq!(state_attr(CopyState::Copied), "copied");
    }

    #[test]
    fn test_copy_icons() {
        let icons = copy_icons();
        assert!(icons.contains("icon-copy"));
        assert!(icons.contains("icon-check"));
    }
}
