// Colour palette for the board, matched to the terminal's colour depth

use ratatui::style::Color;
use term_color_support::ColorSupport;

/// Classic digit colours for 1..=8 as ((R, G, B), ANSI 256 index, 16-colour fallback)
const DIGITS: [((u8, u8, u8), u8, Color); 8] = [
    ((0, 0, 255), 21, Color::LightBlue),
    ((0, 128, 0), 28, Color::Green),
    ((255, 0, 0), 196, Color::LightRed),
    ((0, 0, 128), 18, Color::Blue),
    ((128, 0, 0), 88, Color::Red),
    ((0, 128, 128), 30, Color::Cyan),
    ((0, 0, 0), 16, Color::Black),
    ((128, 128, 128), 244, Color::DarkGray),
];

/// Resolved colours for one terminal session
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub digits: [Color; 8],
    pub board: Color,
    pub hidden: Color,
    pub opened: Color,
    pub mine: Color,
    pub flag: Color,
    pub cursor: Color,
    pub key: Color,
}

impl Palette {
    /// Detect stdout colour support once and resolve every colour against it
    pub fn detect() -> Self {
        let support = ColorSupport::stdout();
        Palette::for_depth(support.has_16m, support.has_256)
    }

    pub fn for_depth(truecolor: bool, indexed: bool) -> Self {
        let pick = |(rgb, index256, basic): ((u8, u8, u8), u8, Color)| {
            if truecolor {
                Color::Rgb(rgb.0, rgb.1, rgb.2)
            } else if indexed {
                Color::Indexed(index256)
            } else {
                basic
            }
        };
        Palette {
            digits: DIGITS.map(&pick),
            board: pick(((118, 118, 118), 243, Color::DarkGray)),
            hidden: pick(((204, 204, 204), 250, Color::Gray)),
            opened: pick(((238, 238, 238), 255, Color::White)),
            mine: pick(((12, 12, 12), 232, Color::Black)),
            flag: pick(((197, 15, 31), 160, Color::Red)),
            cursor: pick(((59, 120, 255), 63, Color::LightBlue)),
            key: pick(((193, 156, 0), 178, Color::Yellow)),
        }
    }

    /// Colour for an adjacency digit; 0 has no digit and maps to the background
    pub fn digit(&self, n: u8) -> Color {
        match n {
            1..=8 => self.digits[n as usize - 1],
            _ => self.opened,
        }
    }
}
