use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        write!(
            f,
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

/// Status colors resolved once when the main view is wired up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub clash_started: Color,
    pub clash_stopped: Color,
}

impl Palette {
    pub fn new() -> Self {
        Self {
            clash_started: Color::from_rgb(0.35, 0.55, 0.75),
            clash_stopped: Color::from_rgb(0.6, 0.6, 0.6),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::from_rgb(1.0, 0.0, 0.5).to_string(), "#ff0080");
    }
}
