// SPDX-License-Identifier: MPL-2.0
//! Keyboard routing.
//!
//! Precedence, highest first: an open help popup owns Escape, then an
//! active fullscreen, then the overlay itself. Arrows navigate, `+`/`-`/`=`
//! zoom the active zoomable content, single-letter mnemonics route to the
//! matching visible control, and Tab cycles the focus trap when
//! accessibility mode is enabled.

use crate::toolbar::{ToolbarAction, ToolbarContext, ToolbarEntry};

/// Mnemonic characters owned by built-in controls. An item-level custom
/// mnemonic is honored only if it is not in this set.
pub const RESERVED_MNEMONICS: &[char] = &[' ', 'm', 'd', 'p', 'f', 't', 'c', 's', '?'];

/// A normalized key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Tab { shift: bool },
    Space,
    Char(char),
}

/// Overlay facts the router consults for precedence.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyContext {
    pub help_open: bool,
    pub fullscreen: bool,
    pub accessibility: bool,
}

/// What the controller should do with a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    None,
    CloseHelp,
    ExitFullscreen,
    CloseOverlay,
    Prev,
    Next,
    ZoomIn,
    ZoomOut,
    FocusNext,
    FocusPrev,
    /// Route to the visible control matching this mnemonic character.
    Mnemonic(char),
}

/// Routes a key event by precedence.
#[must_use]
pub fn route(key: Key, ctx: &KeyContext) -> KeyCommand {
    match key {
        Key::Escape => {
            if ctx.help_open {
                KeyCommand::CloseHelp
            } else if ctx.fullscreen {
                KeyCommand::ExitFullscreen
            } else {
                KeyCommand::CloseOverlay
            }
        }
        Key::ArrowLeft => KeyCommand::Prev,
        Key::ArrowRight => KeyCommand::Next,
        Key::Tab { shift } => {
            if !ctx.accessibility {
                KeyCommand::None
            } else if shift {
                KeyCommand::FocusPrev
            } else {
                KeyCommand::FocusNext
            }
        }
        Key::Space => KeyCommand::Mnemonic(' '),
        Key::Char('+' | '=') => KeyCommand::ZoomIn,
        Key::Char('-') => KeyCommand::ZoomOut,
        Key::Char(c) => KeyCommand::Mnemonic(c.to_ascii_lowercase()),
    }
}

/// The built-in action a reserved mnemonic stands for.
#[must_use]
pub fn reserved_action(mnemonic: char) -> Option<ToolbarAction> {
    match mnemonic {
        ' ' => Some(ToolbarAction::MediaPlayPause),
        'm' => Some(ToolbarAction::Mute),
        'd' => Some(ToolbarAction::Download),
        'p' => Some(ToolbarAction::Print),
        'f' => Some(ToolbarAction::Fullscreen),
        't' => Some(ToolbarAction::Theme),
        'c' => Some(ToolbarAction::Carousel),
        's' => Some(ToolbarAction::SlideshowToggle),
        '?' => Some(ToolbarAction::Help),
        _ => None,
    }
}

/// Finds the item-level custom mnemonic, if the toolbar registered one.
///
/// Only the first visible button with an unreserved shortcut counts.
#[must_use]
pub fn custom_mnemonic(
    entries: &[ToolbarEntry],
    ctx: &ToolbarContext,
) -> Option<(char, ToolbarAction)> {
    entries.iter().find_map(|entry| {
        let button = entry.as_button()?;
        let shortcut = button.shortcut?.to_ascii_lowercase();
        if RESERVED_MNEMONICS.contains(&shortcut) || !button.is_visible(ctx) {
            return None;
        }
        button.action.clone().map(|action| (shortcut, action))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolbar::Button;

    #[test]
    fn escape_precedence_help_then_fullscreen_then_overlay() {
        let mut ctx = KeyContext {
            help_open: true,
            fullscreen: true,
            accessibility: false,
        };
        assert_eq!(route(Key::Escape, &ctx), KeyCommand::CloseHelp);

        ctx.help_open = false;
        assert_eq!(route(Key::Escape, &ctx), KeyCommand::ExitFullscreen);

        ctx.fullscreen = false;
        assert_eq!(route(Key::Escape, &ctx), KeyCommand::CloseOverlay);
    }

    #[test]
    fn arrows_navigate() {
        let ctx = KeyContext::default();
        assert_eq!(route(Key::ArrowLeft, &ctx), KeyCommand::Prev);
        assert_eq!(route(Key::ArrowRight, &ctx), KeyCommand::Next);
    }

    #[test]
    fn zoom_keys() {
        let ctx = KeyContext::default();
        assert_eq!(route(Key::Char('+'), &ctx), KeyCommand::ZoomIn);
        assert_eq!(route(Key::Char('='), &ctx), KeyCommand::ZoomIn);
        assert_eq!(route(Key::Char('-'), &ctx), KeyCommand::ZoomOut);
    }

    #[test]
    fn tab_cycles_focus_only_in_accessibility_mode() {
        let mut ctx = KeyContext::default();
        assert_eq!(route(Key::Tab { shift: false }, &ctx), KeyCommand::None);

        ctx.accessibility = true;
        assert_eq!(route(Key::Tab { shift: false }, &ctx), KeyCommand::FocusNext);
        assert_eq!(route(Key::Tab { shift: true }, &ctx), KeyCommand::FocusPrev);
    }

    #[test]
    fn letters_become_lowercased_mnemonics() {
        let ctx = KeyContext::default();
        assert_eq!(route(Key::Char('M'), &ctx), KeyCommand::Mnemonic('m'));
        assert_eq!(route(Key::Space, &ctx), KeyCommand::Mnemonic(' '));
    }

    #[test]
    fn reserved_actions_cover_all_mnemonics() {
        for &c in RESERVED_MNEMONICS {
            assert!(reserved_action(c).is_some(), "no action for {c:?}");
        }
        assert!(reserved_action('x').is_none());
    }

    #[test]
    fn custom_mnemonic_skips_reserved_shortcuts() {
        let ctx = ToolbarContext::default();
        let entries = vec![
            ToolbarEntry::Button(
                Button::new(ToolbarAction::Custom("rotate".into())).with_shortcut('d'),
            ),
            ToolbarEntry::Button(
                Button::new(ToolbarAction::Custom("annotate".into())).with_shortcut('a'),
            ),
        ];

        let found = custom_mnemonic(&entries, &ctx).expect("mnemonic");
        assert_eq!(found.0, 'a');
        assert_eq!(found.1, ToolbarAction::Custom("annotate".into()));
    }

    #[test]
    fn hidden_buttons_do_not_register_mnemonics() {
        let ctx = ToolbarContext::default();
        let entries = vec![ToolbarEntry::Button(
            Button::new(ToolbarAction::Custom("annotate".into()))
                .with_shortcut('a')
                .hidden(),
        )];
        assert!(custom_mnemonic(&entries, &ctx).is_none());
    }
}
