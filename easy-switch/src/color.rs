//! Colors given to labels and calendars created by the import.

use rand::Rng;

/// Palette labels and calendars pick their color from.
pub const LABEL_COLORS: [&str; 20] = [
    "#8080FF", "#DB60D6", "#415DF0", "#179FD9", "#1DA583", "#3CBB3A", "#B4A40E", "#936D58",
    "#F78400", "#EC3E7C", "#BA1E55", "#C44800", "#A839A4", "#5252CC", "#5C6DFF", "#0F735A",
    "#12869F", "#807304", "#54473F", "#F5A640",
];

/// Picks a color from [`LABEL_COLORS`] pseudo-randomly.
pub fn random_color() -> &'static str {
    LABEL_COLORS[rand::thread_rng().gen_range(0..LABEL_COLORS.len())]
}

#[cfg(test)]
mod tests {
    use super::{random_color, LABEL_COLORS};

    #[test]
    fn pick_color_from_palette() {
        for _ in 0..100 {
            assert!(LABEL_COLORS.contains(&random_color()));
        }
    }
}
