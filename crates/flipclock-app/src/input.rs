//! Keyboard and pointer input to clock commands.

use flipclock_core::Command;
use flipclock_engine::coords::Vec2;
use flipclock_engine::input::{InputEvent, Key, KeyState, MouseButton, MouseButtonState};

use crate::painters::ControlsLayout;

/// What one input event asks for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Action {
    Clock(Command),
    Quit,
}

/// Maps a key press to its shortcut.
///
/// Shortcuts are plain letters; anything held with Ctrl, Alt or the
/// platform key is left to the system and only counts as activity.
pub fn shortcut(key: Key) -> Option<Action> {
    let action = match key {
        Key::Character('h') => Action::Clock(Command::ToggleFormat),
        Key::Character('t') => Action::Clock(Command::CycleTheme),
        Key::Character('v') => Action::Clock(Command::ToggleView),
        Key::Character('f') | Key::F11 => Action::Clock(Command::ToggleFullscreen),
        Key::Escape => Action::Clock(Command::ExitFullscreen),
        Key::Character('q') => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Translates `event`. Button hits only count while the overlay is shown;
/// a click on a hidden overlay just brings it back.
pub fn action_for(
    event: &InputEvent,
    controls: &ControlsLayout,
    controls_visible: bool,
) -> Option<Action> {
    let activity = Some(Action::Clock(Command::Activity));
    match event {
        InputEvent::Key {
            key,
            state: KeyState::Pressed,
            modifiers,
            repeat,
        } => {
            if *repeat || modifiers.ctrl || modifiers.alt || modifiers.meta {
                return activity;
            }
            shortcut(*key).or(activity)
        }
        InputEvent::PointerButton(b)
            if b.button == MouseButton::Left && b.state == MouseButtonState::Pressed =>
        {
            let hit = controls_visible
                .then(|| controls.hit(Vec2::new(b.x, b.y)))
                .flatten();
            match hit {
                Some(button) => Some(Action::Clock(button.command())),
                None => activity,
            }
        }
        other if other.is_activity() => activity,
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painters::ControlButton;
    use flipclock_engine::coords::Viewport;
    use flipclock_engine::input::{Modifiers, PointerButtonEvent, PointerMoveEvent};

    fn press(key: Key) -> InputEvent {
        InputEvent::Key {
            key,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        }
    }

    fn click_at(p: Vec2) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x: p.x,
            y: p.y,
            modifiers: Modifiers::default(),
        })
    }

    fn layout() -> ControlsLayout {
        ControlsLayout::new(Viewport::new(800.0, 600.0))
    }

    fn center_of(button: ControlButton) -> Vec2 {
        layout()
            .iter()
            .find_map(|(b, r)| (b == button).then_some(r.center()))
            .unwrap()
    }

    #[test]
    fn letter_shortcuts() {
        let l = layout();
        let cases = [
            ('h', Action::Clock(Command::ToggleFormat)),
            ('t', Action::Clock(Command::CycleTheme)),
            ('v', Action::Clock(Command::ToggleView)),
            ('f', Action::Clock(Command::ToggleFullscreen)),
            ('q', Action::Quit),
        ];
        for (c, expected) in cases {
            assert_eq!(action_for(&press(Key::Character(c)), &l, true), Some(expected));
        }
        assert_eq!(
            action_for(&press(Key::Escape), &l, true),
            Some(Action::Clock(Command::ExitFullscreen))
        );
        assert_eq!(
            action_for(&press(Key::F11), &l, true),
            Some(Action::Clock(Command::ToggleFullscreen))
        );
    }

    #[test]
    fn other_keys_repeats_and_chords_are_activity() {
        let l = layout();
        let activity = Some(Action::Clock(Command::Activity));
        assert_eq!(action_for(&press(Key::Character('x')), &l, true), activity);

        let repeat = InputEvent::Key {
            key: Key::Character('t'),
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: true,
        };
        assert_eq!(action_for(&repeat, &l, true), activity);

        let chord = InputEvent::Key {
            key: Key::Character('q'),
            state: KeyState::Pressed,
            modifiers: Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
            repeat: false,
        };
        assert_eq!(action_for(&chord, &l, true), activity);
    }

    #[test]
    fn releases_and_focus_are_ignored() {
        let l = layout();
        let release = InputEvent::Key {
            key: Key::Character('h'),
            state: KeyState::Released,
            modifiers: Modifiers::default(),
            repeat: false,
        };
        assert_eq!(action_for(&release, &l, true), None);
        assert_eq!(action_for(&InputEvent::Focused(true), &l, true), None);
        assert_eq!(action_for(&InputEvent::PointerLeft, &l, true), None);
    }

    #[test]
    fn clicks_on_visible_buttons_issue_commands() {
        let l = layout();
        for button in ControlButton::ALL {
            let action = action_for(&click_at(center_of(button)), &l, true);
            assert_eq!(action, Some(Action::Clock(button.command())));
        }
    }

    #[test]
    fn clicks_on_hidden_buttons_only_wake_the_overlay() {
        let l = layout();
        let action = action_for(&click_at(center_of(ControlButton::Theme)), &l, false);
        assert_eq!(action, Some(Action::Clock(Command::Activity)));
    }

    #[test]
    fn pointer_motion_and_scroll_are_activity() {
        let l = layout();
        let moved = InputEvent::PointerMoved(PointerMoveEvent { x: 1.0, y: 2.0 });
        assert_eq!(action_for(&moved, &l, false), Some(Action::Clock(Command::Activity)));
        assert_eq!(
            action_for(&InputEvent::Scrolled, &l, false),
            Some(Action::Clock(Command::Activity))
        );
    }
}
