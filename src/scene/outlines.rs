use std::sync::Arc;

/// Side of the square the built-in outlines are drawn in.
pub const OUTLINE_BOX: f64 = 100.0;

/// Built-in organic blob outlines, centered in a `100 x 100` box.
pub const BUILTIN_OUTLINES: [&str; 4] = [
    "M50,2 C74,2 98,20 96,48 C94,76 76,98 48,96 C20,94 2,74 4,46 C6,20 26,2 50,2 Z",
    "M54,4 C80,8 96,30 92,56 C88,82 62,98 38,92 C14,86 2,62 8,38 C14,14 30,0 54,4 Z",
    "M46,6 C70,0 94,18 95,44 C96,70 84,90 58,95 C32,100 8,84 5,58 C2,32 22,12 46,6 Z",
    "M50,8 C68,4 90,14 93,36 C96,58 88,86 62,93 C36,100 10,86 6,62 C2,38 32,12 50,8 Z",
];

/// Shared outline set; custom outlines replace the built-in ones when non-empty.
pub(crate) fn outline_set(custom: &[String]) -> Vec<Arc<str>> {
    if custom.is_empty() {
        BUILTIN_OUTLINES.iter().map(|d| Arc::from(*d)).collect()
    } else {
        custom.iter().map(|d| Arc::from(d.trim())).collect()
    }
}
