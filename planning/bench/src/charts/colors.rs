use plotters::style::RGBColor;

// A* variants are drawn in red tones, GBFS variants in blue-green tones.
pub const ASTAR_RED: RGBColor = RGBColor(0xE6, 0x39, 0x46);
pub const ASTAR_LIGHT_RED: RGBColor = RGBColor(0xF9, 0xAD, 0xA0);
pub const ASTAR_DARK_RED: RGBColor = RGBColor(0xC1, 0x12, 0x1F);
pub const GBFS_TEAL: RGBColor = RGBColor(0x1D, 0x7A, 0x8C);
pub const GBFS_LIGHT_BLUE: RGBColor = RGBColor(0x40, 0xA9, 0xBF);

/// Colors for searches other than A* and GBFS.
const OTHERS: &[RGBColor] = &[
    RGBColor(0x6A, 0x4C, 0x93),
    RGBColor(0xF4, 0xA2, 0x61),
    RGBColor(0x2A, 0x9D, 0x8F),
    RGBColor(0x8D, 0x99, 0xAE),
    RGBColor(0xE9, 0xC4, 0x6A),
    RGBColor(0x26, 0x46, 0x53),
];

fn other(index: usize) -> RGBColor {
    OTHERS[index % OTHERS.len()]
}

/// Color of a search algorithm, `index` being its position among the drawn series.
pub fn search_color(search: &str, index: usize) -> RGBColor {
    match search {
        "astar" => ASTAR_RED,
        "gbf" => GBFS_TEAL,
        _ => other(index),
    }
}

/// Color of the configurations highlighted in the per-domain success chart.
pub fn key_config_color(label: &str, index: usize) -> RGBColor {
    match label {
        "astar_hmax" => ASTAR_RED,
        "astar_blind" => ASTAR_LIGHT_RED,
        "astar_landmark" => ASTAR_DARK_RED,
        "gbf_hmax" => GBFS_TEAL,
        "gbf_landmark" => GBFS_LIGHT_BLUE,
        _ => other(index),
    }
}

/// Color of any search/heuristic pair: the search gives the tone, the heuristic the shade.
pub fn config_color(search: &str, heuristic: &str, index: usize) -> RGBColor {
    match (search, heuristic) {
        ("astar", "hmax") => ASTAR_RED,
        ("astar", "hadd") => RGBColor(0xF4, 0xA5, 0x82),
        ("astar", "hff") => RGBColor(0xD6, 0x60, 0x4D),
        ("astar", _) => RGBColor(0xB2, 0x18, 0x2B),
        ("gbf", "hmax") => GBFS_TEAL,
        ("gbf", "hadd") => RGBColor(0x43, 0x93, 0xC3),
        ("gbf", "hff") => RGBColor(0x21, 0x66, 0xAC),
        ("gbf", _) => RGBColor(0x05, 0x30, 0x61),
        _ => other(index),
    }
}
