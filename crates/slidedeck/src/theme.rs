use eframe::egui::Color32;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub accent: Color32,
    /// Fill for the band under the slides.
    pub chrome: Color32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x1E, 0x1E, 0x1E),
            foreground: Color32::from_rgb(0xC8, 0xC8, 0xC8),
            accent: Color32::from_rgb(0x52, 0x94, 0xE2),
            chrome: Color32::from_rgb(0x14, 0x14, 0x14),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::WHITE,
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            accent: Color32::from_rgb(0x0F, 0x34, 0x60),
            chrome: Color32::from_rgb(0xEE, 0xEE, 0xEE),
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn toggled(&self) -> Self {
        if self.name == "dark" {
            Self::light()
        } else {
            Self::dark()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_name_falls_back_to_dark() {
        assert_eq!(Theme::from_name("solarized").name, "dark");
        assert_eq!(Theme::from_name("light").name, "light");
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Theme::dark().toggled().name, "light");
        assert_eq!(Theme::light().toggled().name, "dark");
    }
}
