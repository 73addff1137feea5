//! Property-based invariant tests for the console buffers.
//!
//! 1. No output line is ever longer than the column count.
//! 2. Wrap law: `columns * k` printable characters make exactly `k` full lines.
//! 3. Scroll law: one more line drops index 0 and shifts the rest down.
//! 4. Caret bound: `caret_pos + scroll_offset <= input_columns - 1`, always.
//! 5. History bound: `capacity + m` distinct submissions keep the newest `capacity`.
//! 6. Duplicate submissions never change the entry count.
//! 7. Resize never panics and growing preserves content.
//! 8. The slide animation converges in a bounded number of ticks.

use ftui_devconsole::{
    ConsoleBuffers, HistoryRing, InputLine, LineBuffer, LineColor, ResizeCoordinator,
    SlideAnimator, SlidePhase,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Edit {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    ToggleReplace,
    Paste(String),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        4 => proptest::char::range('a', 'z').prop_map(Edit::Insert),
        1 => Just(Edit::Backspace),
        1 => Just(Edit::Delete),
        1 => Just(Edit::Left),
        1 => Just(Edit::Right),
        1 => Just(Edit::Home),
        1 => Just(Edit::End),
        1 => Just(Edit::ToggleReplace),
        1 => "[a-z\n]{0,12}".prop_map(Edit::Paste),
    ]
}

fn apply(input: &mut InputLine, edit: &Edit) {
    match edit {
        Edit::Insert(ch) => {
            input.insert(*ch);
        }
        Edit::Backspace => {
            input.backspace();
        }
        Edit::Delete => {
            input.delete();
        }
        Edit::Left => {
            input.move_left();
        }
        Edit::Right => {
            input.move_right();
        }
        Edit::Home => {
            input.move_home();
        }
        Edit::End => {
            input.move_end();
        }
        Edit::ToggleReplace => input.toggle_replace_mode(),
        Edit::Paste(text) => {
            input.paste_insert(text);
        }
    }
}

fn texts(buf: &LineBuffer) -> Vec<String> {
    buf.iter().map(|l| l.text().to_string()).collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Line length bound
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn lines_never_exceed_columns(
        columns in 1usize..=40,
        n_lines in 1usize..=20,
        prints in proptest::collection::vec(("[ -~\t\n]{0,100}", any::<bool>()), 1..20),
    ) {
        let mut buf = LineBuffer::try_new(columns, n_lines).unwrap();
        for (text, cont) in &prints {
            buf.append_text(text, LineColor::Message, *cont);
            prop_assert_eq!(buf.len(), n_lines);
            for line in buf.iter() {
                prop_assert!(line.text().len() <= columns);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Wrap law
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn wrap_law(columns in 1usize..=30, k in 1usize..=10, ch in proptest::char::range('!', '~')) {
        let n_lines = k + 3;
        let mut buf = LineBuffer::try_new(columns, n_lines).unwrap();
        let text: String = std::iter::repeat_n(ch, columns * k).collect();
        buf.append_text(&text, LineColor::Message, false);

        let full: Vec<_> = buf.iter().filter(|l| !l.text().is_empty()).collect();
        prop_assert_eq!(full.len(), k);
        for line in full {
            prop_assert_eq!(line.text().len(), columns);
        }
        prop_assert!(!buf.has_open_line());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Scroll law
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scroll_law(n_lines in 1usize..=12, words in proptest::collection::vec("[a-z]{1,6}", 13..24)) {
        let mut buf = LineBuffer::try_new(8, n_lines).unwrap();
        for word in &words[..n_lines] {
            buf.append_text(word, LineColor::Message, false);
        }
        let before = texts(&buf);
        buf.append_text(&words[n_lines], LineColor::Message, false);
        let after = texts(&buf);

        prop_assert_eq!(after.len(), n_lines);
        prop_assert_eq!(&after[..n_lines - 1], &before[1..]);
        prop_assert_eq!(&after[n_lines - 1], &words[n_lines]);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Caret bound
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn caret_stays_in_bounds(
        columns in 1usize..=30,
        edits in proptest::collection::vec(edit_strategy(), 0..200),
    ) {
        let mut input = InputLine::try_new(columns).unwrap();
        for edit in &edits {
            apply(&mut input, edit);
            let logical = input.caret_pos() + input.scroll_offset();
            prop_assert!(logical <= input.input_columns() - 1);
            prop_assert!(logical <= input.text().len());
            prop_assert!(input.caret_pos() <= input.caret_limit());
            prop_assert!(input.text().len() <= input.input_columns() - 1);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5–6. History bound and duplicates
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn history_keeps_newest_distinct(capacity in 1usize..=10, extra in 1usize..=10) {
        let mut ring = HistoryRing::try_new(capacity, 32).unwrap();
        let commands: Vec<String> = (0..capacity + extra).map(|i| format!("cmd{i}")).collect();
        for cmd in &commands {
            ring.submit(cmd);
        }
        prop_assert_eq!(ring.len(), capacity);
        let kept: Vec<String> = ring.entries().iter().map(ToString::to_string).collect();
        prop_assert_eq!(kept, commands[extra..].to_vec());
    }

    #[test]
    fn duplicate_submit_keeps_count(
        commands in proptest::collection::vec("[a-c]{1,2}", 1..30),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut ring = HistoryRing::try_new(8, 16).unwrap();
        for cmd in &commands {
            ring.submit(cmd);
        }
        let len = ring.len();
        let existing = ring.entries()[pick.index(len)].to_string();
        prop_assert!(!ring.submit(&existing));
        prop_assert_eq!(ring.len(), len);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Resize
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resize_never_panics(
        columns in 1usize..=40,
        lines in 1usize..=20,
        new_columns in 0usize..=60,
        new_lines in 0usize..=30,
        text in "[ -~\n]{0,200}",
        typed in "[a-z]{0,60}",
    ) {
        let mut buffers = ConsoleBuffers::try_new(columns, lines, 4).unwrap();
        buffers.lines.append_text(&text, LineColor::Message, false);
        for ch in typed.chars() {
            buffers.input.insert(ch);
        }
        buffers.history.submit(&typed);
        buffers.history.submit(&format!("{typed}!"));

        match ResizeCoordinator::resize(&buffers, new_columns, new_lines) {
            Ok(resized) => {
                prop_assert!(new_columns > 0 && new_lines > 0);
                prop_assert_eq!(resized.lines.len(), new_lines);
                for line in resized.lines.iter() {
                    prop_assert!(line.text().len() <= new_columns);
                }
                let input = &resized.input;
                prop_assert!(input.logical_position() <= input.input_columns() - 1);
                prop_assert!(input.logical_position() <= input.text().len());
                prop_assert!(input.caret_pos() <= input.caret_limit());

                // Entry count is kept unless two entries become equal once cut
                // to the new width; those merge so history stays duplicate-free.
                let cap = input.text().capacity();
                let mut expected: Vec<String> = buffers
                    .history
                    .entries()
                    .iter()
                    .map(|e| e.as_slice().iter().take(cap).collect())
                    .collect();
                expected.dedup();
                prop_assert_eq!(resized.history.len(), expected.len());
                prop_assert_eq!(resized.history.capacity(), buffers.history.capacity());
            }
            Err(_) => prop_assert!(new_columns == 0 || new_lines == 0),
        }
    }

    #[test]
    fn growing_preserves_content(
        columns in 1usize..=20,
        lines in 1usize..=10,
        grow_columns in 0usize..=20,
        grow_lines in 0usize..=10,
        text in "[a-z\n]{0,120}",
        typed in "[a-z]{0,30}",
    ) {
        let mut buffers = ConsoleBuffers::try_new(columns, lines, 4).unwrap();
        buffers.lines.append_text(&text, LineColor::Message, false);
        for ch in typed.chars() {
            buffers.input.insert(ch);
        }
        let resized =
            ResizeCoordinator::resize(&buffers, columns + grow_columns, lines + grow_lines).unwrap();

        let old = texts(&buffers.lines);
        let new = texts(&resized.lines);
        prop_assert_eq!(&new[grow_lines..], &old[..]);
        prop_assert_eq!(resized.input.text().to_string(), buffers.input.text().to_string());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Animation convergence
// ═════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
enum SlideEvent {
    Toggle(bool),
    Activate,
    Deactivate,
    Tick,
    Resize(usize),
}

fn slide_event_strategy() -> impl Strategy<Value = SlideEvent> {
    prop_oneof![
        1 => any::<bool>().prop_map(SlideEvent::Toggle),
        1 => Just(SlideEvent::Activate),
        1 => Just(SlideEvent::Deactivate),
        4 => Just(SlideEvent::Tick),
        1 => (1usize..=80).prop_map(SlideEvent::Resize),
    ]
}

proptest! {
    #[test]
    fn animation_converges(
        step in 1i32..=6,
        lines in 1usize..=80,
        events in proptest::collection::vec(slide_event_strategy(), 0..60),
    ) {
        let (full, partial) = SlideAnimator::extents_for_lines(lines);
        let mut anim = SlideAnimator::new(step, full, partial);
        let mut max_extent = full;
        for event in &events {
            match *event {
                SlideEvent::Toggle(open_full) => anim.toggle(open_full),
                SlideEvent::Activate => anim.activate_request(),
                SlideEvent::Deactivate => anim.deactivate_request(),
                SlideEvent::Tick => {
                    anim.tick();
                }
                SlideEvent::Resize(rows) => {
                    let (f, p) = SlideAnimator::extents_for_lines(rows);
                    max_extent = max_extent.max(f);
                    anim.set_extents(f, p);
                }
            }
            prop_assert!(anim.current_offset() >= 0);
        }

        // One tick to resolve latched requests, then at most max_extent / step.
        let bound = 2 + max_extent / step + 1;
        let mut ticks = 0;
        while anim.tick() {
            ticks += 1;
            prop_assert!(ticks <= bound, "did not converge in {} ticks", bound);
        }
        prop_assert_eq!(anim.current_offset(), anim.target_offset());
        prop_assert!(!anim.needs_tick());
        prop_assert!(!anim.phase().is_moving());
        if anim.phase() == SlidePhase::Closed {
            prop_assert_eq!(anim.current_offset(), 0);
        }
    }
}
