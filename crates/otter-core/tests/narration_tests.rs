// Host-side tests for the typewriter narration.

use std::time::Duration;

use otter_core::narration::{AudioState, NarrationSequencer};

const DELAY: Duration = Duration::from_millis(60);

#[test]
fn first_character_is_immediate() {
    let mut n = NarrationSequencer::new(DELAY);
    n.play("otter", false);
    assert_eq!(n.revealed_text(), "o");
    assert_eq!(n.reveal_steps(), 1);
}

#[test]
fn one_reveal_per_delay_and_one_step_per_character() {
    let text = "The water carries me home.";
    let mut n = NarrationSequencer::new(DELAY);
    n.play(text, false);

    // Half a delay reveals nothing
    let step = n.tick(Duration::from_millis(30));
    assert!(!step.revealed);
    assert_eq!(n.revealed_count(), 1);

    let step = n.tick(Duration::from_millis(30));
    assert!(step.revealed);
    assert_eq!(n.revealed_count(), 2);

    let mut completions = 0;
    for _ in 0..200 {
        if n.tick(DELAY).completed {
            completions += 1;
        }
    }
    assert_eq!(n.revealed_text(), text);
    assert_eq!(n.reveal_steps(), text.chars().count());
    assert_eq!(completions, 1);
}

#[test]
fn multibyte_text_reveals_whole_characters() {
    let mut n = NarrationSequencer::new(DELAY);
    n.play("holt’s", false);
    for _ in 0..4 {
        n.tick(DELAY);
    }
    assert_eq!(n.revealed_text(), "holt’");
}

#[test]
fn completion_waits_for_audio() {
    let mut n = NarrationSequencer::new(DELAY);
    n.play("ab", true);
    assert_eq!(n.audio_state(), AudioState::Requested);

    assert!(!n.tick(DELAY).completed);
    assert!(n.text_done());
    n.audio_started();
    assert!(!n.tick(DELAY).completed);

    n.audio_ended();
    assert!(n.tick(DELAY).completed);
    assert!(n.is_complete());
    assert!(!n.tick(DELAY).completed);
}

#[test]
fn completion_waits_for_text() {
    let mut n = NarrationSequencer::new(DELAY);
    n.play("abcd", true);
    n.audio_started();
    n.audio_ended();

    assert!(!n.tick(DELAY).completed);
    assert!(!n.tick(DELAY).completed);
    assert!(n.tick(DELAY).completed);
}

#[test]
fn refused_audio_counts_as_finished() {
    let mut n = NarrationSequencer::new(DELAY);
    n.play("a", true);
    n.audio_failed();
    assert_eq!(n.audio_state(), AudioState::Failed);
    assert!(n.tick(DELAY).completed);
}

#[test]
fn late_audio_callbacks_do_not_regress_state() {
    let mut n = NarrationSequencer::new(DELAY);
    n.play("a", true);
    n.audio_ended();
    n.audio_started();
    assert_eq!(n.audio_state(), AudioState::Ended);
}

#[test]
fn stop_forgets_everything() {
    let mut n = NarrationSequencer::new(DELAY);
    n.play("abc", false);
    n.stop();
    assert!(!n.is_started());
    assert_eq!(n.revealed_text(), "");
    assert!(!n.tick(DELAY).completed);
    assert_eq!(n.delay(), DELAY);
}

#[test]
fn idle_sequencer_never_completes() {
    let mut n = NarrationSequencer::default();
    for _ in 0..10 {
        assert!(!n.tick(DELAY).completed);
    }
}
