//! Named colors offered by color inputs.

/// Preset names and their hex codes, in suggestion order.
pub const PRESET_COLORS: &[(&str, &str)] = &[
    ("dark red", "#992d22"),
    ("red", "#ff0000"),
    ("light red", "#f06c6c"),
    ("dark orange", "#ed510e"),
    ("orange", "#ed6f0e"),
    ("light orange", "#f0b06c"),
    ("openticket", "#f8ba00"),
    ("dark yellow", "#deb100"),
    ("yellow", "#ffff00"),
    ("light yellow", "#ffff8c"),
    ("banana", "#ffe896"),
    ("lime", "#a8e312"),
    ("dark green", "#009600"),
    ("green", "#00ff00"),
    ("light green", "#76f266"),
    ("dark cyan", "#00abab"),
    ("cyan", "#00ffff"),
    ("light cyan", "#63ffff"),
    ("aquamarine", "#7fffd4"),
    ("dark skyblue", "#006bc9"),
    ("skyblue", "#0095ff"),
    ("light skyblue", "#40bfff"),
    ("dark blue", "#00006e"),
    ("blue", "#0000ff"),
    ("light blue", "#5353fc"),
    ("blurple", "#5865F2"),
    ("dark purple", "#3f009e"),
    ("purple", "#8000ff"),
    ("light purple", "#9257eb"),
    ("dark pink", "#b82ab0"),
    ("pink", "#ff6bf8"),
    ("light pink", "#ff9cfa"),
    ("magenta", "#ff00ff"),
    ("black", "#000000"),
    ("brown", "#806050"),
    ("dark gray", "#4f4f4f"),
    ("gray", "#808080"),
    ("light gray", "#b3b3b3"),
    ("white", "#ffffff"),
    ("invisible", "#393A41"),
];

/// Hex code of a preset, matched case-insensitively.
pub fn preset_color(name: &str) -> Option<&'static str> {
    let name = name.trim();
    PRESET_COLORS
        .iter()
        .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
        .map(|(_, hex)| *hex)
}

/// Preset names, for autocompletion.
pub fn preset_names() -> Vec<String> {
    PRESET_COLORS.iter().map(|(name, _)| name.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_color() {
        assert_eq!(preset_color("openticket"), Some("#f8ba00"));
        assert_eq!(preset_color(" Light Blue "), Some("#5353fc"));
        assert_eq!(preset_color("#ff0000"), None);
        assert_eq!(preset_names().len(), PRESET_COLORS.len());
    }
}
