// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named three-class ColorBrewer palettes.

extern crate alloc;

use alloc::vec::Vec;

use peniko::Color;

/// The palette used when none is configured or a name is unknown.
pub const DEFAULT_PALETTE: &str = "PuBu";

const PALETTES: &[(&str, [[u8; 3]; 3])] = &[
    ("PuBu", [[0xec, 0xe7, 0xf2], [0xa6, 0xbd, 0xdb], [0x2b, 0x8c, 0xbe]]),
    ("Blues", [[0xde, 0xeb, 0xf7], [0x9e, 0xca, 0xe1], [0x31, 0x82, 0xbd]]),
    ("BuGn", [[0xe5, 0xf5, 0xf9], [0x99, 0xd8, 0xc9], [0x2c, 0xa2, 0x5f]]),
    ("Greens", [[0xe5, 0xf5, 0xe0], [0xa1, 0xd9, 0x9b], [0x31, 0xa3, 0x54]]),
    ("Greys", [[0xf0, 0xf0, 0xf0], [0xbd, 0xbd, 0xbd], [0x63, 0x63, 0x63]]),
    ("Oranges", [[0xfe, 0xe6, 0xce], [0xfd, 0xae, 0x6b], [0xe6, 0x55, 0x0d]]),
    ("OrRd", [[0xfe, 0xe8, 0xc8], [0xfd, 0xbb, 0x84], [0xe3, 0x4a, 0x33]]),
    ("Purples", [[0xef, 0xed, 0xf5], [0xbc, 0xbd, 0xdc], [0x75, 0x6b, 0xb1]]),
    ("Reds", [[0xfe, 0xe0, 0xd2], [0xfc, 0x92, 0x72], [0xde, 0x2d, 0x26]]),
    ("YlGn", [[0xf7, 0xfc, 0xb9], [0xad, 0xdd, 0x8e], [0x31, 0xa3, 0x54]]),
    ("YlOrRd", [[0xff, 0xed, 0xa0], [0xfe, 0xb2, 0x4c], [0xf0, 0x3b, 0x20]]),
    ("RdBu", [[0xef, 0x8a, 0x62], [0xf7, 0xf7, 0xf7], [0x67, 0xa9, 0xcf]]),
    ("RdYlGn", [[0xfc, 0x8d, 0x59], [0xff, 0xff, 0xbf], [0x91, 0xcf, 0x60]]),
    ("Spectral", [[0xfc, 0x8d, 0x59], [0xff, 0xff, 0xbf], [0x99, 0xd5, 0x94]]),
];

/// Looks up a named palette.
pub fn named_palette(name: &str) -> Option<Vec<Color>> {
    PALETTES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, stops)| {
            stops
                .iter()
                .map(|[r, g, b]| Color::from_rgb8(*r, *g, *b))
                .collect()
        })
}

/// Returns the default palette.
pub fn default_palette() -> Vec<Color> {
    named_palette(DEFAULT_PALETTE).unwrap_or_default()
}
