//! Page audio: the narration voice-over, one-shot clips, `<audio>` elements
//! by id and looping hazard sounds.
//!
//! Autoplay rejections are logged and otherwise ignored. A narration that
//! cannot play counts as finished so the text is not held back.

use std::cell::RefCell;
use std::rc::Rc;

use fnv::FnvHashMap;
use otter_core::session::{AudioCue, NodeSession};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

use crate::constants::NARRATION_AUDIO_ID;
use crate::dom::{add_listener, describe};

pub struct AudioBus {
    document: web::Document,
    session: Rc<RefCell<NodeSession>>,
    narration: Option<web::HtmlMediaElement>,
    loops: RefCell<FnvHashMap<&'static str, web::HtmlAudioElement>>,
}

impl AudioBus {
    pub fn new(document: web::Document, session: Rc<RefCell<NodeSession>>) -> Self {
        let narration = media_by_id(&document, NARRATION_AUDIO_ID);
        match &narration {
            Some(el) => bind_narration(el, &session),
            None => log::warn!("[audio] no #{} element; narration text runs alone", NARRATION_AUDIO_ID),
        }
        Self {
            document,
            session,
            narration,
            loops: RefCell::new(FnvHashMap::default()),
        }
    }

    pub fn play(&self, cue: AudioCue) {
        match cue {
            AudioCue::Narration => match &self.narration {
                Some(el) => {
                    let session = self.session.clone();
                    play_media(el, "narration", move || session.borrow_mut().narration_audio_failed());
                }
                None => self.session.borrow_mut().narration_audio_failed(),
            },
            AudioCue::Clip(url) => match web::HtmlAudioElement::new_with_src(url) {
                Ok(el) => play_media(&el, url, || {}),
                Err(e) => log::warn!("[audio] clip {} unavailable: {:?}", url, e),
            },
            AudioCue::Element(id) => match media_by_id(&self.document, id) {
                Some(el) => {
                    el.set_current_time(0.0);
                    play_media(&el, id, || {});
                }
                None => log::warn!("[audio] no #{} element", id),
            },
            AudioCue::LoopStart(url) => {
                let mut loops = self.loops.borrow_mut();
                if !loops.contains_key(url) {
                    match web::HtmlAudioElement::new_with_src(url) {
                        Ok(el) => {
                            el.set_loop(true);
                            loops.insert(url, el);
                        }
                        Err(e) => {
                            log::warn!("[audio] loop {} unavailable: {:?}", url, e);
                            return;
                        }
                    }
                }
                if let Some(el) = loops.get(url) {
                    play_media(el, url, || {});
                }
            }
            AudioCue::LoopStop(url) => {
                if let Some(el) = self.loops.borrow().get(url) {
                    let _ = el.pause();
                    el.set_current_time(0.0);
                }
            }
        }
    }
}

fn media_by_id(document: &web::Document, id: &str) -> Option<web::HtmlMediaElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<web::HtmlMediaElement>().ok())
}

fn bind_narration(el: &web::HtmlMediaElement, session: &Rc<RefCell<NodeSession>>) {
    let s = session.clone();
    add_listener(el, "playing", move |_: web::Event| s.borrow_mut().narration_audio_started());
    let s = session.clone();
    add_listener(el, "ended", move |_: web::Event| s.borrow_mut().narration_audio_ended());
    let s = session.clone();
    add_listener(el, "error", move |_: web::Event| {
        log::warn!("[audio] narration failed to load");
        s.borrow_mut().narration_audio_failed();
    });
}

fn play_media(el: &web::HtmlMediaElement, what: &str, on_refused: impl FnOnce() + 'static) {
    match el.play() {
        Ok(promise) => {
            let what = what.to_string();
            spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::debug!("[audio] {} refused: {}", what, describe(&e));
                    on_refused();
                }
            });
        }
        Err(e) => {
            log::debug!("[audio] {} refused: {}", what, describe(&e));
            on_refused();
        }
    }
}
