//! Platform-reserved shortcuts, spelled the way the grammar formats them

use crate::platform::Platform;

const MACOS: &[(&str, &str)] = &[
    ("cmd+q", "quitting applications"),
    ("cmd+w", "closing windows"),
    ("cmd+m", "minimizing windows"),
    ("cmd+h", "hiding applications"),
    ("cmd+tab", "application switching"),
    ("cmd+space", "Spotlight search"),
    ("cmd+shift+3", "taking a screenshot"),
    ("cmd+shift+4", "taking a screenshot of a selection"),
    ("cmd+c", "copy"),
    ("cmd+v", "paste"),
    ("cmd+x", "cut"),
    ("cmd+z", "undo"),
    ("cmd+shift+z", "redo"),
    ("cmd+s", "save"),
    ("cmd+a", "select all"),
];

const WINDOWS: &[(&str, &str)] = &[
    ("alt+f4", "closing applications"),
    ("alt+tab", "application switching"),
    ("ctrl+shift+escape", "opening the task manager"),
    ("win+l", "locking the screen"),
    ("win+d", "showing the desktop"),
    ("ctrl+c", "copy"),
    ("ctrl+v", "paste"),
    ("ctrl+x", "cut"),
    ("ctrl+z", "undo"),
    ("ctrl+y", "redo"),
    ("ctrl+s", "save"),
    ("ctrl+a", "select all"),
];

const LINUX: &[(&str, &str)] = &[
    ("alt+f4", "closing applications"),
    ("alt+tab", "application switching"),
    ("meta+l", "locking the screen"),
    ("ctrl+alt+t", "opening a terminal"),
    ("ctrl+alt+delete", "the session menu"),
    ("ctrl+c", "copy"),
    ("ctrl+v", "paste"),
    ("ctrl+x", "cut"),
    ("ctrl+z", "undo"),
    ("ctrl+y", "redo"),
    ("ctrl+s", "save"),
    ("ctrl+a", "select all"),
];

/// Reserved chords for a platform with what each one does
pub fn reserved_shortcuts(platform: Platform) -> &'static [(&'static str, &'static str)] {
    match platform {
        Platform::MacOS => MACOS,
        Platform::Windows => WINDOWS,
        Platform::Linux => LINUX,
    }
}

/// What a formatted chord is reserved for on `platform`, if anything
pub fn shadowed_shortcut(platform: Platform, chord: &str) -> Option<&'static str> {
    let chord = chord.to_lowercase();
    reserved_shortcuts(platform)
        .iter()
        .find(|(keys, _)| *keys == chord)
        .map(|(_, description)| *description)
}
