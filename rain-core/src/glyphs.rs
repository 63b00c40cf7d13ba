//! Glyph alphabet: half of the katakana syllabary, digits, latin capitals, ASCII symbols.

use rand::Rng;

pub const GLYPHS: &[char] = &[
    'ア', 'イ', 'ウ', 'エ', 'オ', 'カ', 'キ', 'ク', 'ケ', 'コ',
    'サ', 'シ', 'ス', 'セ', 'ソ', 'タ', 'チ', 'ツ', 'テ', 'ト',
    'ナ', 'ニ', 'ヌ', 'ネ', 'ノ', 'ハ', 'ヒ', 'フ', 'ヘ', 'ホ',
    'マ', 'ミ', 'ム', 'メ', 'モ', 'ヤ', 'ユ', 'ヨ', 'ラ', 'リ',
    'ル', 'レ', 'ロ', 'ワ', 'ヲ', 'ン',
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J',
    'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T',
    'U', 'V', 'W', 'X', 'Y', 'Z',
    '!', '@', '#', '$', '%', '^', '&', '*', '(', ')',
    '-', '_', '+', '=', '[', ']', '{', '}', '|', '\\',
    ':', ';', '"', '\'', '<', '>', ',', '.', '?', '/',
    '~', '`',
];

/// Pick a uniformly random glyph.
#[inline]
pub fn random_glyph<R: Rng + ?Sized>(rng: &mut R) -> char {
    GLYPHS[rng.gen_range(0..GLYPHS.len())]
}

/// A fresh trail of `len` random glyphs.
pub fn random_trail<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<char> {
    (0..len).map(|_| random_glyph(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn glyphs_come_from_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        for c in random_trail(&mut rng, 200) {
            assert!(GLYPHS.contains(&c));
        }
    }

    #[test]
    fn trail_has_requested_length() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_trail(&mut rng, 0).len(), 0);
        assert_eq!(random_trail(&mut rng, 17).len(), 17);
    }
}
