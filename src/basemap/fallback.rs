use crate::map::{Lod, MapRenderer};

/// Coarse continent outlines (lon, lat), closed rings
const OUTLINES: &[&[(f64, f64)]] = &[
    // North America
    &[
        (-166.0, 68.0), (-164.0, 60.0), (-152.0, 58.0), (-138.0, 59.0), (-130.0, 54.0),
        (-124.0, 47.0), (-124.0, 40.0), (-118.0, 33.0), (-110.0, 23.0), (-105.0, 20.0),
        (-97.0, 16.0), (-88.0, 14.0), (-83.0, 9.0), (-79.0, 9.0), (-84.0, 15.0),
        (-88.0, 21.0), (-97.0, 22.0), (-97.0, 27.0), (-90.0, 29.0), (-83.0, 29.0),
        (-81.0, 25.0), (-80.0, 31.0), (-76.0, 35.0), (-70.0, 42.0), (-66.0, 44.0),
        (-60.0, 46.0), (-53.0, 47.0), (-56.0, 52.0), (-61.0, 56.0), (-65.0, 60.0),
        (-78.0, 62.0), (-94.0, 60.0), (-94.0, 68.0), (-115.0, 69.0), (-140.0, 70.0),
        (-156.0, 71.0), (-166.0, 68.0),
    ],
    // Greenland
    &[
        (-55.0, 60.0), (-43.0, 60.0), (-38.0, 66.0), (-22.0, 70.0), (-20.0, 80.0),
        (-40.0, 83.0), (-62.0, 82.0), (-70.0, 77.0), (-58.0, 72.0), (-55.0, 60.0),
    ],
    // South America
    &[
        (-78.0, 8.0), (-72.0, 12.0), (-62.0, 10.0), (-52.0, 5.0), (-50.0, 0.0),
        (-44.0, -2.0), (-35.0, -6.0), (-39.0, -14.0), (-41.0, -22.0), (-48.0, -26.0),
        (-53.0, -34.0), (-58.0, -38.0), (-65.0, -42.0), (-66.0, -48.0), (-69.0, -52.0),
        (-74.0, -52.0), (-74.0, -44.0), (-73.0, -36.0), (-71.0, -28.0), (-70.0, -18.0),
        (-76.0, -14.0), (-81.0, -5.0), (-80.0, 1.0), (-78.0, 8.0),
    ],
    // Europe
    &[
        (-9.0, 37.0), (-6.0, 36.0), (-1.0, 37.0), (3.0, 42.0), (8.0, 44.0),
        (12.0, 44.0), (16.0, 40.0), (19.0, 40.0), (23.0, 37.0), (26.0, 40.0),
        (29.0, 41.0), (40.0, 42.0), (41.0, 47.0), (48.0, 46.0), (54.0, 52.0),
        (60.0, 60.0), (68.0, 69.0), (45.0, 68.0), (33.0, 70.0), (24.0, 71.0),
        (15.0, 68.0), (5.0, 62.0), (6.0, 58.0), (10.0, 54.0), (4.0, 52.0),
        (-2.0, 48.0), (-5.0, 44.0), (-9.0, 43.0), (-9.0, 37.0),
    ],
    // Great Britain
    &[
        (-5.0, 50.0), (1.0, 51.0), (2.0, 53.0), (-1.0, 55.0), (-2.0, 58.0),
        (-5.0, 58.0), (-6.0, 56.0), (-3.0, 54.0), (-5.0, 52.0), (-5.0, 50.0),
    ],
    // Africa
    &[
        (-17.0, 21.0), (-10.0, 30.0), (-6.0, 35.0), (10.0, 37.0), (11.0, 33.0),
        (20.0, 31.0), (32.0, 31.0), (34.0, 28.0), (39.0, 18.0), (43.0, 12.0),
        (51.0, 12.0), (48.0, 5.0), (40.0, -3.0), (39.0, -10.0), (40.0, -16.0),
        (35.0, -23.0), (32.0, -29.0), (26.0, -34.0), (18.0, -35.0), (15.0, -27.0),
        (12.0, -17.0), (13.0, -6.0), (9.0, 2.0), (5.0, 5.0), (-4.0, 5.0),
        (-8.0, 4.0), (-13.0, 8.0), (-17.0, 14.0), (-17.0, 21.0),
    ],
    // Asia
    &[
        (40.0, 42.0), (36.0, 36.0), (35.0, 32.0), (38.0, 22.0), (43.0, 13.0),
        (52.0, 16.0), (57.0, 22.0), (56.0, 26.0), (57.0, 25.0),
        (62.0, 25.0), (67.0, 24.0), (73.0, 18.0), (77.0, 8.0), (80.0, 13.0),
        (87.0, 21.0), (92.0, 22.0), (98.0, 16.0), (100.0, 7.0), (104.0, 1.0),
        (103.0, 9.0), (109.0, 12.0), (108.0, 21.0), (117.0, 23.0), (122.0, 30.0),
        (121.0, 37.0), (126.0, 37.0), (129.0, 35.0), (130.0, 43.0), (141.0, 53.0),
        (136.0, 55.0), (143.0, 59.0), (156.0, 61.0), (163.0, 60.0), (178.0, 65.0),
        (180.0, 69.0), (160.0, 70.0), (140.0, 72.0), (113.0, 74.0), (104.0, 77.0),
        (88.0, 75.0), (72.0, 72.0), (68.0, 69.0), (60.0, 60.0), (54.0, 52.0),
        (48.0, 46.0), (41.0, 47.0), (40.0, 42.0),
    ],
    // Japan
    &[
        (130.0, 31.0), (135.0, 34.0), (140.0, 35.0), (142.0, 40.0), (145.0, 44.0),
        (141.0, 45.0), (139.0, 40.0), (136.0, 37.0), (131.0, 34.0), (130.0, 31.0),
    ],
    // Australia
    &[
        (114.0, -22.0), (122.0, -18.0), (130.0, -12.0), (137.0, -12.0), (136.0, -15.0),
        (141.0, -17.0), (142.0, -11.0), (146.0, -19.0), (153.0, -26.0), (150.0, -37.0),
        (141.0, -38.0), (135.0, -35.0), (131.0, -31.0), (123.0, -34.0), (115.0, -34.0),
        (114.0, -22.0),
    ],
];

/// Add the built-in outlines as the low-detail coastline layer
pub fn load_fallback(renderer: &mut MapRenderer) {
    for outline in OUTLINES {
        renderer.add_coastline(outline.to_vec(), Lod::Low);
    }
}
