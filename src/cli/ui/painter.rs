use owo_colors::{OwoColorize, Style as OwoStyle};

use crate::strip::Colour;

/// Applies colour and style to terminal text.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Painter {
    use_colour: bool,
}

impl Painter {
    /// Creates a painter with explicit colour control.
    pub(crate) fn new(use_colour: bool) -> Self {
        Self { use_colour }
    }

    pub(crate) fn use_colour(self) -> bool {
        self.use_colour
    }

    pub(crate) fn heading<T: AsRef<str>>(&self, text: T) -> String {
        self.paint(text.as_ref(), OwoStyle::new().bold().cyan())
    }

    pub(crate) fn success<T: AsRef<str>>(&self, text: T) -> String {
        self.paint(text.as_ref(), OwoStyle::new().bold().green())
    }

    pub(crate) fn warning<T: AsRef<str>>(&self, text: T) -> String {
        self.paint(text.as_ref(), OwoStyle::new().bold().yellow())
    }

    pub(crate) fn muted<T: AsRef<str>>(&self, text: T) -> String {
        self.paint(text.as_ref(), OwoStyle::new().dimmed())
    }

    pub(crate) fn value<T: AsRef<str>>(&self, text: T) -> String {
        self.paint(text.as_ref(), OwoStyle::new().bold())
    }

    /// Colour as `#RRGGBB` (plus `+WW` when white is lit), preceded by a
    /// block of that colour when styling is on.
    pub(crate) fn swatch(&self, colour: Colour) -> String {
        let mut label = format!("#{}", hex::encode_upper([colour.r, colour.g, colour.b]));
        if colour.w > 0 {
            label.push_str(&format!("+{:02X}", colour.w));
        }
        if self.use_colour {
            format!("{} {label}", "██".truecolor(colour.r, colour.g, colour.b))
        } else {
            label
        }
    }

    fn paint(&self, text: &str, style: OwoStyle) -> String {
        if self.use_colour {
            format!("{}", text.style(style))
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn apply(painter: &Painter, style: &str, text: &str) -> String {
        match style {
            "heading" => painter.heading(text),
            "success" => painter.success(text),
            "warning" => painter.warning(text),
            "muted" => painter.muted(text),
            "value" => painter.value(text),
            other => panic!("unknown style: {other}"),
        }
    }

    #[rstest]
    fn plain_returns_unstyled_text(
        #[values("heading", "success", "warning", "muted", "value")] style: &str,
    ) {
        let painter = Painter::new(false);
        assert_eq!("universe 1", apply(&painter, style, "universe 1"));
    }

    #[rstest]
    fn coloured_wraps_text_in_escapes(
        #[values("heading", "success", "warning", "muted", "value")] style: &str,
    ) {
        let painter = Painter::new(true);
        let styled = apply(&painter, style, "universe 1");
        assert_ne!("universe 1", styled);
        assert!(styled.contains("universe 1"));
    }

    #[rstest]
    #[case::rgb(Colour::rgb(255, 128, 0), "#FF8000")]
    #[case::with_white(Colour::rgbw(0, 0, 0, 17), "#000000+11")]
    fn plain_swatch_is_hex(#[case] colour: Colour, #[case] expected: &str) {
        assert_eq!(expected, Painter::new(false).swatch(colour));
    }
}
