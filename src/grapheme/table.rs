//! Known multi-codepoint emoji sequences.
//!
//! The table is kept compact: explicit sequences are listed verbatim, while
//! the large regular families (skin tones, keycaps, regional indicator pairs,
//! ZWJ families) are expanded from their building blocks by [`sequences`].

const ZWJ: u32 = 0x200D;
const VS16: u32 = 0xFE0F;
const KEYCAP: u32 = 0x20E3;

const MAN: u32 = 0x1F468;
const WOMAN: u32 = 0x1F469;
const PERSON: u32 = 0x1F9D1;
const BOY: u32 = 0x1F466;
const GIRL: u32 = 0x1F467;
const CHILD: u32 = 0x1F9D2;
const HEART: u32 = 0x2764;
const KISS: u32 = 0x1F48B;
const MALE: u32 = 0x2642;
const FEMALE: u32 = 0x2640;

const SKIN_TONES: [u32; 5] = [0x1F3FB, 0x1F3FC, 0x1F3FD, 0x1F3FE, 0x1F3FF];

const REGIONAL_INDICATORS: std::ops::RangeInclusive<u32> = 0x1F1E6..=0x1F1FF;

const KEYCAP_BASES: &[u32] = &[
    0x0023, 0x002A, 0x0030, 0x0031, 0x0032, 0x0033, 0x0034, 0x0035, 0x0036, 0x0037, 0x0038,
    0x0039,
];

/// Emoji_Modifier_Base ranges: these accept a skin tone modifier.
const MODIFIER_BASES: &[(u32, u32)] = &[
    (0x261D, 0x261D),
    (0x26F9, 0x26F9),
    (0x270A, 0x270D),
    (0x1F385, 0x1F385),
    (0x1F3C2, 0x1F3C4),
    (0x1F3C7, 0x1F3C7),
    (0x1F3CA, 0x1F3CC),
    (0x1F442, 0x1F443),
    (0x1F446, 0x1F450),
    (0x1F466, 0x1F478),
    (0x1F47C, 0x1F47C),
    (0x1F481, 0x1F483),
    (0x1F485, 0x1F487),
    (0x1F4AA, 0x1F4AA),
    (0x1F574, 0x1F575),
    (0x1F57A, 0x1F57A),
    (0x1F590, 0x1F590),
    (0x1F595, 0x1F596),
    (0x1F645, 0x1F647),
    (0x1F64B, 0x1F64F),
    (0x1F6A3, 0x1F6A3),
    (0x1F6B4, 0x1F6B6),
    (0x1F6C0, 0x1F6C0),
    (0x1F6CC, 0x1F6CC),
    (0x1F90C, 0x1F90C),
    (0x1F90F, 0x1F90F),
    (0x1F918, 0x1F91F),
    (0x1F926, 0x1F926),
    (0x1F930, 0x1F939),
    (0x1F93C, 0x1F93E),
    (0x1F977, 0x1F977),
    (0x1F9B5, 0x1F9B6),
    (0x1F9B8, 0x1F9B9),
    (0x1F9BB, 0x1F9BB),
    (0x1F9CD, 0x1F9CF),
    (0x1F9D1, 0x1F9DD),
    (0x1FAC3, 0x1FAC5),
    (0x1FAF0, 0x1FAF8),
];

/// Text-default characters that have an emoji presentation sequence (`c FE0F`).
const PRESENTATION_BASES: &[(u32, u32)] = &[
    (0x00A9, 0x00A9),
    (0x00AE, 0x00AE),
    (0x203C, 0x203C),
    (0x2049, 0x2049),
    (0x2122, 0x2122),
    (0x2139, 0x2139),
    (0x2194, 0x2199),
    (0x21A9, 0x21AA),
    (0x2328, 0x2328),
    (0x23CF, 0x23CF),
    (0x23ED, 0x23EF),
    (0x23F1, 0x23F2),
    (0x23F8, 0x23FA),
    (0x24C2, 0x24C2),
    (0x25AA, 0x25AB),
    (0x25B6, 0x25B6),
    (0x25C0, 0x25C0),
    (0x25FB, 0x25FC),
    (0x2600, 0x2604),
    (0x260E, 0x260E),
    (0x2611, 0x2611),
    (0x2618, 0x2618),
    (0x261D, 0x261D),
    (0x2620, 0x2620),
    (0x2622, 0x2623),
    (0x2626, 0x2626),
    (0x262A, 0x262A),
    (0x262E, 0x262F),
    (0x2638, 0x263A),
    (0x2640, 0x2640),
    (0x2642, 0x2642),
    (0x265F, 0x2660),
    (0x2663, 0x2663),
    (0x2665, 0x2666),
    (0x2668, 0x2668),
    (0x267B, 0x267B),
    (0x267E, 0x267E),
    (0x2692, 0x2692),
    (0x2694, 0x2697),
    (0x2699, 0x2699),
    (0x269B, 0x269C),
    (0x26A0, 0x26A0),
    (0x26A7, 0x26A7),
    (0x26B0, 0x26B1),
    (0x26C8, 0x26C8),
    (0x26CF, 0x26CF),
    (0x26D1, 0x26D1),
    (0x26D3, 0x26D3),
    (0x26E9, 0x26E9),
    (0x26F0, 0x26F1),
    (0x26F4, 0x26F4),
    (0x26F7, 0x26F9),
    (0x2702, 0x2702),
    (0x2708, 0x2709),
    (0x270C, 0x270D),
    (0x270F, 0x270F),
    (0x2712, 0x2712),
    (0x2714, 0x2714),
    (0x2716, 0x2716),
    (0x271D, 0x271D),
    (0x2721, 0x2721),
    (0x2733, 0x2734),
    (0x2744, 0x2744),
    (0x2747, 0x2747),
    (0x2763, 0x2764),
    (0x27A1, 0x27A1),
    (0x2934, 0x2935),
    (0x2B05, 0x2B07),
    (0x3030, 0x3030),
    (0x303D, 0x303D),
    (0x3297, 0x3297),
    (0x3299, 0x3299),
    (0x1F170, 0x1F171),
    (0x1F17E, 0x1F17F),
    (0x1F202, 0x1F202),
    (0x1F237, 0x1F237),
    (0x1F321, 0x1F321),
    (0x1F324, 0x1F32C),
    (0x1F336, 0x1F336),
    (0x1F37D, 0x1F37D),
    (0x1F396, 0x1F397),
    (0x1F399, 0x1F39B),
    (0x1F39E, 0x1F39F),
    (0x1F3CB, 0x1F3CE),
    (0x1F3D4, 0x1F3DF),
    (0x1F3F3, 0x1F3F3),
    (0x1F3F5, 0x1F3F5),
    (0x1F3F7, 0x1F3F7),
    (0x1F43F, 0x1F43F),
    (0x1F441, 0x1F441),
    (0x1F4FD, 0x1F4FD),
    (0x1F549, 0x1F54A),
    (0x1F56F, 0x1F570),
    (0x1F573, 0x1F579),
    (0x1F587, 0x1F587),
    (0x1F58A, 0x1F58D),
    (0x1F590, 0x1F590),
    (0x1F5A5, 0x1F5A5),
    (0x1F5A8, 0x1F5A8),
    (0x1F5B1, 0x1F5B2),
    (0x1F5BC, 0x1F5BC),
    (0x1F5C2, 0x1F5C4),
    (0x1F5D1, 0x1F5D3),
    (0x1F5DC, 0x1F5DE),
    (0x1F5E1, 0x1F5E1),
    (0x1F5E3, 0x1F5E3),
    (0x1F5E8, 0x1F5E8),
    (0x1F5EF, 0x1F5EF),
    (0x1F5F3, 0x1F5F3),
    (0x1F5FA, 0x1F5FA),
    (0x1F6CB, 0x1F6CB),
    (0x1F6CD, 0x1F6CF),
    (0x1F6E0, 0x1F6E5),
    (0x1F6E9, 0x1F6E9),
    (0x1F6F0, 0x1F6F0),
    (0x1F6F3, 0x1F6F3),
];

/// Objects joined to a person, man or woman to form a role or attribute.
/// Objects that are text-default carry their VS16 and also appear unqualified.
const ROLE_OBJECTS: &[&[u32]] = &[
    &[0x2695, VS16],
    &[0x2696, VS16],
    &[0x2708, VS16],
    &[0x1F33E],
    &[0x1F373],
    &[0x1F37C],
    &[0x1F393],
    &[0x1F3A4],
    &[0x1F3A8],
    &[0x1F3EB],
    &[0x1F3ED],
    &[0x1F4BB],
    &[0x1F4BC],
    &[0x1F527],
    &[0x1F52C],
    &[0x1F680],
    &[0x1F692],
    &[0x1F9AF],
    &[0x1F9B0],
    &[0x1F9B1],
    &[0x1F9B2],
    &[0x1F9B3],
    &[0x1F9BC],
    &[0x1F9BD],
];

/// Bases taking a gender sign (`base ZWJ ♂/♀ FE0F`), with skin tones allowed.
const GENDERED_BASES: &[u32] = &[
    0x1F3C3, 0x1F3C4, 0x1F3CA, 0x1F46E, 0x1F471, 0x1F473, 0x1F477, 0x1F481, 0x1F482, 0x1F486,
    0x1F487, 0x1F645, 0x1F646, 0x1F647, 0x1F64B, 0x1F64D, 0x1F64E, 0x1F6A3, 0x1F6B4, 0x1F6B5,
    0x1F6B6, 0x1F926, 0x1F937, 0x1F938, 0x1F939, 0x1F93D, 0x1F93E, 0x1F9B8, 0x1F9B9, 0x1F9CD,
    0x1F9CE, 0x1F9CF, 0x1F9D4, 0x1F9D6, 0x1F9D7, 0x1F9D8, 0x1F9D9, 0x1F9DA, 0x1F9DB, 0x1F9DC,
    0x1F9DD,
];

/// Gendered bases that do not take skin tones.
const GENDERED_BASES_NO_TONE: &[u32] = &[0x1F46F, 0x1F93C, 0x1F9DE, 0x1F9DF];

const EXPLICIT: &[&[u32]] = &[
    // flags
    &[0x1F3F3, VS16, ZWJ, 0x1F308],
    &[0x1F3F3, VS16, ZWJ, 0x26A7, VS16],
    &[0x1F3F4, ZWJ, 0x2620, VS16],
    // animals
    &[0x1F415, ZWJ, 0x1F9BA],
    &[0x1F408, ZWJ, 0x2B1B],
    &[0x1F43B, ZWJ, 0x2744, VS16],
    &[0x1F426, ZWJ, 0x2B1B],
    &[0x1F426, ZWJ, 0x1F525],
    // hearts and faces
    &[HEART, VS16, ZWJ, 0x1F525],
    &[HEART, VS16, ZWJ, 0x1FA79],
    &[0x1F62E, ZWJ, 0x1F4A8],
    &[0x1F635, ZWJ, 0x1F4AB],
    &[0x1F636, ZWJ, 0x1F32B, VS16],
    &[0x1F642, ZWJ, 0x2194, VS16],
    &[0x1F642, ZWJ, 0x2195, VS16],
    &[0x1F441, VS16, ZWJ, 0x1F5E8, VS16],
    // food and objects
    &[0x1F34B, ZWJ, 0x1F7E9],
    &[0x1F344, ZWJ, 0x1F7EB],
    &[0x26D3, VS16, ZWJ, 0x1F4A5],
    // detective takes VS16 on its base
    &[0x1F575, VS16, ZWJ, MALE, VS16],
    &[0x1F575, VS16, ZWJ, FEMALE, VS16],
    &[0x26F9, VS16, ZWJ, MALE, VS16],
    &[0x26F9, VS16, ZWJ, FEMALE, VS16],
    &[0x1F3CB, VS16, ZWJ, MALE, VS16],
    &[0x1F3CB, VS16, ZWJ, FEMALE, VS16],
    &[0x1F3CC, VS16, ZWJ, MALE, VS16],
    &[0x1F3CC, VS16, ZWJ, FEMALE, VS16],
    // mx claus
    &[PERSON, ZWJ, 0x1F384],
    // people holding hands, untoned
    &[PERSON, ZWJ, 0x1F91D, ZWJ, PERSON],
    // adult families
    &[PERSON, ZWJ, PERSON, ZWJ, CHILD],
    &[PERSON, ZWJ, PERSON, ZWJ, CHILD, ZWJ, CHILD],
    &[PERSON, ZWJ, CHILD],
    &[PERSON, ZWJ, CHILD, ZWJ, CHILD],
];

fn expand_ranges(ranges: &[(u32, u32)]) -> impl Iterator<Item = u32> + '_ {
    ranges.iter().flat_map(|&(lo, hi)| lo..=hi)
}

fn join_zwj(parts: &[&[u32]]) -> Vec<u32> {
    let mut seq = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            seq.push(ZWJ);
        }
        seq.extend_from_slice(part);
    }
    seq
}

/// Every known sequence of two or more codepoints.
///
/// Only called once while the trie is built, so it favours clarity over
/// avoiding allocation.
pub(super) fn sequences() -> Vec<Vec<u32>> {
    let mut out: Vec<Vec<u32>> = EXPLICIT.iter().map(|s| s.to_vec()).collect();

    // Any regional indicator pairs up with any other, not only assigned
    // country codes.
    for a in REGIONAL_INDICATORS {
        for b in REGIONAL_INDICATORS {
            out.push(vec![a, b]);
        }
    }

    for &base in KEYCAP_BASES {
        out.push(vec![base, VS16, KEYCAP]);
        out.push(vec![base, KEYCAP]);
    }

    for base in expand_ranges(PRESENTATION_BASES) {
        out.push(vec![base, VS16]);
    }

    for base in expand_ranges(MODIFIER_BASES) {
        for &tone in &SKIN_TONES {
            out.push(vec![base, tone]);
        }
    }

    // Roles: person/man/woman, optionally toned, joined to an object.
    for &who in &[PERSON, MAN, WOMAN] {
        for &object in ROLE_OBJECTS {
            let unqualified: Vec<u32> = object.iter().copied().filter(|&c| c != VS16).collect();
            out.push(join_zwj(&[&[who], object]));
            out.push(join_zwj(&[&[who], &unqualified]));
            for &tone in &SKIN_TONES {
                out.push(join_zwj(&[&[who, tone], object]));
                out.push(join_zwj(&[&[who, tone], &unqualified]));
            }
        }
    }

    for &base in GENDERED_BASES {
        for &sign in &[MALE, FEMALE] {
            out.push(join_zwj(&[&[base], &[sign, VS16]]));
            out.push(join_zwj(&[&[base], &[sign]]));
            for &tone in &SKIN_TONES {
                out.push(join_zwj(&[&[base, tone], &[sign, VS16]]));
            }
        }
    }
    for &base in GENDERED_BASES_NO_TONE {
        for &sign in &[MALE, FEMALE] {
            out.push(join_zwj(&[&[base], &[sign, VS16]]));
        }
    }
    for &base in &[0x1F575, 0x26F9, 0x1F3CB, 0x1F3CC] {
        for &tone in &SKIN_TONES {
            for &sign in &[MALE, FEMALE] {
                out.push(join_zwj(&[&[base, tone], &[sign, VS16]]));
            }
        }
    }

    // Families: every parent set with every child set.
    let parent_sets: &[&[u32]] = &[&[MAN, WOMAN], &[MAN, MAN], &[WOMAN, WOMAN], &[MAN], &[WOMAN]];
    let child_sets: &[&[u32]] = &[&[BOY], &[GIRL], &[GIRL, BOY], &[BOY, BOY], &[GIRL, GIRL]];
    for parents in parent_sets {
        for children in child_sets {
            let members: Vec<&[u32]> = parents
                .iter()
                .chain(children.iter())
                .map(std::slice::from_ref)
                .collect();
            out.push(join_zwj(&members));
        }
    }

    // Couples with heart and kiss, untoned and with a tone on each partner.
    let pairs: &[(u32, u32)] = &[(WOMAN, MAN), (MAN, MAN), (WOMAN, WOMAN), (PERSON, PERSON)];
    for &(a, b) in pairs {
        for heart in [&[HEART, VS16][..], &[HEART][..]] {
            out.push(join_zwj(&[&[a], heart, &[b]]));
            out.push(join_zwj(&[&[a], heart, &[KISS], &[b]]));
            for &ta in &SKIN_TONES {
                for &tb in &SKIN_TONES {
                    out.push(join_zwj(&[&[a, ta], heart, &[b, tb]]));
                    out.push(join_zwj(&[&[a, ta], heart, &[KISS], &[b, tb]]));
                }
            }
        }
    }

    // Holding hands and handshakes with a tone on each side.
    for &ta in &SKIN_TONES {
        for &tb in &SKIN_TONES {
            out.push(join_zwj(&[&[PERSON, ta], &[0x1F91D], &[PERSON, tb]]));
            if ta != tb {
                out.push(join_zwj(&[&[0x1FAF1, ta], &[0x1FAF2, tb]]));
            }
        }
    }

    out
}
