// HTML fragments for the overlay and the `data-action` encoding that carries
// clicks back as `UiAction`s. No DOM types here so the host tests can include
// this file directly.

use otter_core::ui::{ActionButton, NavButton, Popup, ProgressBar, UiAction};

pub fn action_key(action: UiAction) -> String {
    match action {
        UiAction::ShowFact(i) => format!("fact:{}", i),
        UiAction::ClosePopup => "close".to_string(),
        UiAction::Retry => "retry".to_string(),
        UiAction::AddTree => "tree".to_string(),
        UiAction::AddBuilding => "building".to_string(),
    }
}

pub fn parse_action(key: &str) -> Option<UiAction> {
    match key {
        "close" => Some(UiAction::ClosePopup),
        "retry" => Some(UiAction::Retry),
        "tree" => Some(UiAction::AddTree),
        "building" => Some(UiAction::AddBuilding),
        _ => key
            .strip_prefix("fact:")
            .and_then(|i| i.parse().ok())
            .map(UiAction::ShowFact),
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn buttons_html(buttons: &[ActionButton]) -> String {
    buttons
        .iter()
        .map(|b| {
            format!(
                r#"<button type="button" data-action="{}">{}</button>"#,
                action_key(b.action),
                escape_html(b.label)
            )
        })
        .collect()
}

/// Back / next navigation. Both are full page loads.
pub fn nav_html(back: Option<NavButton>, next: Option<NavButton>) -> String {
    [back.map(|b| (b, "nav-back")), next.map(|b| (b, "nav-next"))]
        .into_iter()
        .flatten()
        .map(|(b, class)| {
            format!(
                r#"<button type="button" class="{}" data-href="{}">{}</button>"#,
                class,
                escape_html(b.href),
                escape_html(b.label)
            )
        })
        .collect()
}

pub fn popup_html(popup: &Popup) -> String {
    let mut html = format!("<h3>{}</h3>", escape_html(&popup.title));
    for p in &popup.paragraphs {
        html.push_str(&format!("<p>{}</p>", escape_html(p)));
    }
    for src in &popup.images {
        html.push_str(&format!(r#"<img src="{}" alt="">"#, escape_html(src)));
    }
    if let Some(link) = popup.link {
        html.push_str(&format!(
            r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
            escape_html(link.href),
            escape_html(link.label)
        ));
    }
    html
}

#[inline]
pub fn percent(fraction: f32) -> String {
    format!("{:.0}%", fraction.clamp(0.0, 1.0) * 100.0)
}

pub fn progress_html(bar: ProgressBar) -> String {
    format!(
        r#"<span class="progress-label">{} / {}</span><div class="progress-track"><div class="progress-fill" style="width:{}"></div></div>"#,
        bar.current,
        bar.total,
        percent(bar.fraction())
    )
}

pub fn balance_html(fill: f32) -> String {
    format!(
        r#"<div class="balance-track"><div class="balance-fill" style="width:{}"></div></div>"#,
        percent(fill)
    )
}

/// `?debug` (or `?debug=1`, alongside other params) raises the log level.
pub fn debug_requested(search: &str) -> bool {
    search
        .trim_start_matches('?')
        .split('&')
        .any(|p| p == "debug" || p.starts_with("debug="))
}
