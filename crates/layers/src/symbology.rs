/// Minecraft's sixteen named text colors.
pub const NAMED_COLORS: [(&str, &str); 16] = [
    ("black", "#000000"),
    ("dark_blue", "#0000AA"),
    ("dark_green", "#00AA00"),
    ("dark_aqua", "#00AAAA"),
    ("dark_red", "#AA0000"),
    ("dark_purple", "#AA00AA"),
    ("gold", "#FFAA00"),
    ("gray", "#AAAAAA"),
    ("dark_gray", "#555555"),
    ("blue", "#5555FF"),
    ("green", "#55FF55"),
    ("aqua", "#55FFFF"),
    ("red", "#FF5555"),
    ("light_purple", "#FF55FF"),
    ("yellow", "#FFFF55"),
    ("white", "#FFFFFF"),
];

pub const DEFAULT_TEXT_COLOR: &str = "#000000";

/// Resolves a color name to its CSS hex value; unknown or absent is black.
pub fn resolve_color(name: Option<&str>) -> &'static str {
    name.and_then(|name| {
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, hex)| *hex)
    })
    .unwrap_or(DEFAULT_TEXT_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve() {
        assert_eq!(resolve_color(Some("gold")), "#FFAA00");
        assert_eq!(resolve_color(Some("white")), "#FFFFFF");
    }

    #[test]
    fn unknown_and_absent_default_to_black() {
        assert_eq!(resolve_color(None), DEFAULT_TEXT_COLOR);
        assert_eq!(resolve_color(Some("#123456")), DEFAULT_TEXT_COLOR);
        assert_eq!(resolve_color(Some("Gold")), DEFAULT_TEXT_COLOR);
    }
}
