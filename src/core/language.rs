use serde::Serialize;

/// Captions printed next to the pick/draw badges of black cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardTexts {
    pub draw: String,
    pub pick: String,
}

impl CardTexts {
    /// Look up the captions for a language code; unknown codes get English.
    pub fn for_language(code: &str) -> Self {
        const TABLE: &[(&[&str], (&str, &str))] = &[
            (&["es", "ES", "es-ES"], ("COGE", "ELIGE")),
            (&["en", "EN", "en-UK", "en-US"], ("DRAW", "PICK")),
        ];
        let (draw, pick) = TABLE
            .iter()
            .find(|(codes, _)| codes.contains(&code))
            .map(|(_, texts)| *texts)
            .unwrap_or(("DRAW", "PICK"));
        Self {
            draw: draw.to_string(),
            pick: pick.to_string(),
        }
    }
}

impl Default for CardTexts {
    fn default() -> Self {
        Self::for_language("en")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spanish_captions() {
        let texts = CardTexts::for_language("es-ES");
        assert_eq!(texts.draw, "COGE");
        assert_eq!(texts.pick, "ELIGE");
    }

    #[test]
    fn unknown_language_is_english() {
        assert_eq!(CardTexts::for_language("fr"), CardTexts::default());
        assert_eq!(CardTexts::default().pick, "PICK");
    }
}
