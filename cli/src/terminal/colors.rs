use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 120, g: 200, b: 255 };
pub const ACCENT: Color = Color::BrightGreen;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 192, g: 192, b: 192 };

pub const GUID: Color = Color::TrueColor { r: 255, g: 200, b: 120 };
pub const LINK_UP: Color = Color::Green;
pub const LINK_DOWN: Color = Color::Red;
pub const RANGE: Color = Color::Cyan;
