/// Inclusive code point range: `(min, max)`.
pub type CodepointRange = (u32, u32);

pub const CJK_IDEOGRAPH_RANGES: [CodepointRange; 12] = [
    (0x4e00, 0x9fff),   // CJK Unified Ideographs
    (0x3400, 0x4dbf),   // Extension A
    (0x20000, 0x2a6df), // Extension B
    (0x2a700, 0x2b73f), // Extension C
    (0x2b740, 0x2b81f), // Extension D
    (0x2b820, 0x2ceaf), // Extension E
    (0x2ceb0, 0x2ebef), // Extension F
    (0x30000, 0x3134f), // Extension G
    (0x31350, 0x323af), // Extension H
    (0x2ebf0, 0x2ee5f), // Extension I
    (0xf900, 0xfaff),   // Compatibility Ideographs
    (0x2f800, 0x2fa1f), // Compatibility Ideographs Supplement
];

pub fn is_code_point_in_range(code_point: u32, range: CodepointRange) -> bool {
    code_point >= range.0 && code_point <= range.1
}

pub fn is_code_point_in_ranges(code_point: u32, ranges: &[CodepointRange]) -> bool {
    ranges
        .iter()
        .any(|&range| is_code_point_in_range(code_point, range))
}
