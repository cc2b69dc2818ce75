use ratatui::prelude::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Dark,
    Light,
}

/// Colour slots used by the viewer, filled from one of two Catppuccin flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: ThemeName,
    pub base: Color,
    pub surface0: Color,
    pub surface1: Color,
    pub surface2: Color,
    pub text: Color,
    pub subtext: Color,
    pub overlay: Color,
    pub red: Color,
    pub green: Color,
    pub yellow: Color,
    pub blue: Color,
    pub mauve: Color,
    pub peach: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    // Mocha
    pub const fn dark() -> Self {
        Self {
            name: ThemeName::Dark,
            base: Color::Rgb(30, 30, 46),
            surface0: Color::Rgb(49, 50, 68),
            surface1: Color::Rgb(69, 71, 90),
            surface2: Color::Rgb(88, 91, 112),
            text: Color::Rgb(205, 214, 244),
            subtext: Color::Rgb(166, 173, 200),
            overlay: Color::Rgb(108, 112, 134),
            red: Color::Rgb(243, 139, 168),
            green: Color::Rgb(166, 227, 161),
            yellow: Color::Rgb(249, 226, 175),
            blue: Color::Rgb(137, 180, 250),
            mauve: Color::Rgb(203, 166, 247),
            peach: Color::Rgb(250, 179, 135),
        }
    }

    // Latte
    pub const fn light() -> Self {
        Self {
            name: ThemeName::Light,
            base: Color::Rgb(239, 241, 245),
            surface0: Color::Rgb(204, 208, 218),
            surface1: Color::Rgb(188, 192, 204),
            surface2: Color::Rgb(172, 176, 190),
            text: Color::Rgb(76, 79, 105),
            subtext: Color::Rgb(108, 111, 133),
            overlay: Color::Rgb(156, 160, 176),
            red: Color::Rgb(210, 15, 57),
            green: Color::Rgb(64, 160, 43),
            yellow: Color::Rgb(223, 142, 29),
            blue: Color::Rgb(30, 102, 245),
            mauve: Color::Rgb(136, 57, 239),
            peach: Color::Rgb(254, 100, 11),
        }
    }

    pub fn toggled(&self) -> Self {
        match self.name {
            ThemeName::Dark => Self::light(),
            ThemeName::Light => Self::dark(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self.name {
            ThemeName::Dark => "dark",
            ThemeName::Light => "light",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_returns_to_the_start() {
        let theme = Theme::default();
        assert_eq!(theme.toggled().name, ThemeName::Light);
        assert_eq!(theme.toggled().toggled(), theme);
    }
}
