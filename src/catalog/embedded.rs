/// Built-in catalog: (name, line 1, line 2), epoch 2026-01-08.
pub const EMBEDDED_TLES: &[(&str, &str, &str)] = &[
    (
        "PAKSAT-1R",
        "1 37779U 11042A   26008.12345678  .00000000  00000-0  00000-0 0  9993",
        "2 37779   0.0321  85.1234 0001234 180.0000 180.0000  1.00270000 12342",
    ),
    (
        "PAKSAT-MM1",
        "1 59915U 24095A   26008.12345678  .00000000  00000-0  00000-0 0  9991",
        "2 59915   0.0123  90.0000 0000567 200.0000 160.0000  1.00270000  1239",
    ),
    (
        "PRSS-1",
        "1 43530U 18059A   26008.12345678  .00001234  00000-0  12345-4 0  9999",
        "2 43530  97.1234 123.4567 0012345 180.0000 180.0000 15.12345678 12346",
    ),
    (
        "CARTOSAT-2F",
        "1 43111U 17078A   26008.12345678  .00001234  00000-0  12345-4 0  9994",
        "2 43111  97.8901 123.4567 0012345 180.0000 180.0000 15.12345678 12349",
    ),
    (
        "RISAT-2BR1",
        "1 44857U 19089A   26008.12345678  .00001234  00000-0  12345-4 0  9996",
        "2 44857  97.8901 123.4567 0012345 180.0000 180.0000 15.12345678 12347",
    ),
    (
        "THURAYA-3",
        "1 32404U 08022A   26008.12345678  .00000000  00000-0  00000-0 0  9997",
        "2 32404   0.0456  80.1234 0001234 180.0000 180.0000  1.00270000 12346",
    ),
];
