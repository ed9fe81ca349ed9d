// Host-side tests for overlay markup and click encoding.

#![allow(dead_code)]
mod markup {
    include!("../src/markup.rs");
}

use markup::*;
use otter_core::ui::{ActionButton, Link, NavButton, Popup, ProgressBar, UiAction};

#[test]
fn action_keys_round_trip() {
    for action in [
        UiAction::ShowFact(0),
        UiAction::ShowFact(12),
        UiAction::ClosePopup,
        UiAction::Retry,
        UiAction::AddTree,
        UiAction::AddBuilding,
    ] {
        assert_eq!(parse_action(&action_key(action)), Some(action));
    }
    assert_eq!(parse_action(""), None);
    assert_eq!(parse_action("fact:"), None);
    assert_eq!(parse_action("fact:two"), None);
    assert_eq!(parse_action("jump"), None);
}

#[test]
fn html_is_escaped() {
    assert_eq!(escape_html(r#"<b>"Tom" & 'Jerry'</b>"#), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
    assert_eq!(escape_html("What’s a Holt?"), "What’s a Holt?");
}

#[test]
fn buttons_carry_their_action() {
    let html = buttons_html(&[
        ActionButton {
            label: "Plant a tree",
            action: UiAction::AddTree,
        },
        ActionButton {
            label: "Fact <1>",
            action: UiAction::ShowFact(1),
        },
    ]);
    assert!(html.contains(r#"data-action="tree">Plant a tree</button>"#));
    assert!(html.contains(r#"data-action="fact:1">Fact &lt;1&gt;</button>"#));
    assert!(buttons_html(&[]).is_empty());
}

#[test]
fn nav_puts_back_before_next() {
    let back = NavButton {
        label: "Back to Map",
        href: "/index.html",
    };
    let next = NavButton {
        label: "Enter Node 2",
        href: "/node2.html",
    };
    let html = nav_html(Some(back), Some(next));
    let b = html.find("data-href=\"/index.html\"").unwrap();
    let n = html.find("data-href=\"/node2.html\"").unwrap();
    assert!(b < n);
    assert_eq!(nav_html(None, None), "");
    assert!(!nav_html(Some(back), None).contains("nav-next"));
}

#[test]
fn popup_markup() {
    let popup = Popup {
        title: "Otters & Rivers".to_string(),
        paragraphs: vec!["One".to_string(), "Two".to_string()],
        images: vec!["/assets/images/holt.png".to_string()],
        link: Some(Link {
            label: "Learn more",
            href: "https://example.org/otters",
        }),
        anchor: None,
    };
    let html = popup_html(&popup);
    assert!(html.starts_with("<h3>Otters &amp; Rivers</h3><p>One</p><p>Two</p>"));
    assert!(html.contains(r#"<img src="/assets/images/holt.png" alt="">"#));
    assert!(html.ends_with(r#"rel="noopener">Learn more</a>"#));
}

#[test]
fn bars_use_clamped_percentages() {
    assert_eq!(percent(0.4), "40%");
    assert_eq!(percent(1.7), "100%");
    assert_eq!(percent(-0.2), "0%");

    let html = progress_html(ProgressBar { current: 2, total: 5 });
    assert!(html.contains("2 / 5"));
    assert!(html.contains("width:40%"));
    assert!(balance_html(1.0).contains("width:100%"));
}

#[test]
fn debug_flag_in_query() {
    assert!(debug_requested("?debug"));
    assert!(debug_requested("?debug=1"));
    assert!(debug_requested("?node=3&debug"));
    assert!(!debug_requested(""));
    assert!(!debug_requested("?debugger=1"));
    assert!(!debug_requested("?nodebug"));
}
