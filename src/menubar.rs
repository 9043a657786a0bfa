use std::io::Write;

use crossterm::{queue, style};

use crate::config::KeyBindings;

/// Menu entries for the player, using the configured keys.
pub fn menu_items(keys: &KeyBindings) -> Vec<String> {
    vec![
        format!("[{}][{}] slide", key_label(&keys.prev_slide), key_label(&keys.next_slide)),
        "[1-9] jump".to_string(),
        format!("[{}] fps limit", key_label(&keys.toggle_limit)),
        format!("[{}][{}] fps", key_label(&keys.fps_down), key_label(&keys.fps_up)),
        format!("[{}] restart", key_label(&keys.restart)),
        format!("[{}] reset slide", key_label(&keys.reset_slide)),
        format!("[{}][{}] quit", key_label(&keys.quit), key_label(&keys.cancel)),
    ]
}

fn key_label(binding: &str) -> &str {
    match binding {
        "Right" => "\u{2192}",
        "Left" => "\u{2190}",
        "Up" => "\u{2191}",
        "Down" => "\u{2193}",
        other => other,
    }
}

/// Print a menu item string, bolding any text inside `[...]` brackets.
/// Text outside brackets is printed dim.
pub fn print_menu_item(out: &mut impl Write, item: &str) -> anyhow::Result<()> {
    let mut rest = item;
    while let Some(open) = rest.find('[') {
        print_dim(out, &rest[..open])?;
        rest = &rest[open..];
        let Some(close) = rest.find(']') else {
            break;
        };
        queue!(
            out,
            style::SetAttribute(style::Attribute::Bold),
            style::Print(&rest[..=close]),
            style::SetAttribute(style::Attribute::Reset),
        )?;
        rest = &rest[close + 1..];
    }
    print_dim(out, rest)
}

fn print_dim(out: &mut impl Write, text: &str) -> anyhow::Result<()> {
    if !text.is_empty() {
        queue!(
            out,
            style::SetAttribute(style::Attribute::Dim),
            style::Print(text),
            style::SetAttribute(style::Attribute::Reset),
        )?;
    }
    Ok(())
}
