//! System font lookup.

use std::path::Path;

/// Well-known locations of a sans-serif face with tabular digits.
const CANDIDATES: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Bytes of the first readable candidate, or empty if none exists.
pub fn load_system_font() -> Vec<u8> {
    first_readable(CANDIDATES.iter().map(Path::new))
}

fn first_readable<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Vec<u8> {
    paths
        .into_iter()
        .find_map(|p| match std::fs::read(p) {
            Ok(bytes) => {
                log::debug!("font: {}", p.display());
                Some(bytes)
            }
            Err(_) => None,
        })
        .unwrap_or_default()
}
