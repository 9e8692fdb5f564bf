//! Word to phoneme extraction.
//!
//! A small pronunciation dictionary covers frequent words; everything else goes
//! through letter-to-sound rules (trigraphs, digraphs, doubled consonants,
//! silent final `e` with a long preceding vowel). Punctuation attached to a word
//! yields one trailing pause token.

use hashbrown::HashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PauseKind {
    /// Comma, semicolon, colon.
    Short,
    /// Period, question mark, exclamation mark.
    Long,
}

/// ARPAbet phoneme or an explicit pause.
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phoneme {
    // vowels
    AA,
    AE,
    AH,
    AO,
    AW,
    AY,
    EH,
    ER,
    EY,
    IH,
    IY,
    OW,
    OY,
    UH,
    UW,
    // consonants
    B,
    CH,
    D,
    DH,
    F,
    G,
    HH,
    JH,
    K,
    L,
    M,
    N,
    NG,
    P,
    R,
    S,
    SH,
    T,
    TH,
    V,
    W,
    Y,
    Z,
    ZH,
    Pause(PauseKind),
}

impl Phoneme {
    pub fn is_vowel(self) -> bool {
        use Phoneme::*;
        matches!(
            self,
            AA | AE | AH | AO | AW | AY | EH | ER | EY | IH | IY | OW | OY | UH | UW
        )
    }

    #[inline]
    pub fn is_pause(self) -> bool {
        matches!(self, Phoneme::Pause(_))
    }
}

static DICTIONARY: Lazy<HashMap<&'static str, &'static [Phoneme]>> = Lazy::new(|| {
    use Phoneme::*;
    let entries: &[(&str, &[Phoneme])] = &[
        ("a", &[AH]),
        ("about", &[AH, B, AW, T]),
        ("and", &[AE, N, D]),
        ("are", &[AA, R]),
        ("bye", &[B, AY]),
        ("can", &[K, AE, N]),
        ("do", &[D, UW]),
        ("good", &[G, UH, D]),
        ("have", &[HH, AE, V]),
        ("hello", &[HH, EH, L, OW]),
        ("hi", &[HH, AY]),
        ("how", &[HH, AW]),
        ("i", &[AY]),
        ("is", &[IH, Z]),
        ("it", &[IH, T]),
        ("know", &[N, OW]),
        ("me", &[M, IY]),
        ("my", &[M, AY]),
        ("no", &[N, OW]),
        ("of", &[AH, V]),
        ("okay", &[OW, K, EY]),
        ("one", &[W, AH, N]),
        ("please", &[P, L, IY, Z]),
        ("said", &[S, EH, D]),
        ("thank", &[TH, AE, NG, K]),
        ("thanks", &[TH, AE, NG, K, S]),
        ("the", &[DH, AH]),
        ("there", &[DH, EH, R]),
        ("they", &[DH, EY]),
        ("to", &[T, UW]),
        ("two", &[T, UW]),
        ("want", &[W, AA, N, T]),
        ("was", &[W, AA, Z]),
        ("we", &[W, IY]),
        ("what", &[W, AH, T]),
        ("where", &[W, EH, R]),
        ("who", &[HH, UW]),
        ("world", &[W, ER, L, D]),
        ("yes", &[Y, EH, S]),
        ("you", &[Y, UW]),
        ("your", &[Y, AO, R]),
    ];
    entries.iter().copied().collect()
});

/// Phonemes for one word token (may carry punctuation).
pub fn extract_phonemes(word: &str) -> Vec<Phoneme> {
    let core: String = word
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let mut out = if core.is_empty() {
        Vec::new()
    } else if let Some(p) = DICTIONARY.get(core.as_str()) {
        p.to_vec()
    } else {
        letters_to_phonemes(&core)
    };
    if let Some(kind) = pause_for(word) {
        out.push(Phoneme::Pause(kind));
    }
    out
}

/// Strongest pause implied by the token's punctuation.
fn pause_for(word: &str) -> Option<PauseKind> {
    let mut kind = None;
    for c in word.chars() {
        match c {
            '.' | '!' | '?' => return Some(PauseKind::Long),
            ',' | ';' | ':' => kind = Some(PauseKind::Short),
            _ => {}
        }
    }
    kind
}

#[inline]
fn is_vowel_letter(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn trigraph(a: char, b: char, c: char) -> Option<&'static [Phoneme]> {
    use Phoneme::*;
    match (a, b, c) {
        ('t', 'c', 'h') => Some(&[CH]),
        ('i', 'g', 'h') => Some(&[AY]),
        ('s', 'c', 'h') => Some(&[S, K]),
        _ => None,
    }
}

fn digraph(a: char, b: char) -> Option<&'static [Phoneme]> {
    use Phoneme::*;
    let p: &'static [Phoneme] = match (a, b) {
        ('t', 'h') => &[TH],
        ('s', 'h') => &[SH],
        ('c', 'h') => &[CH],
        ('p', 'h') => &[F],
        ('w', 'h') => &[W],
        ('n', 'g') => &[NG],
        ('c', 'k') => &[K],
        ('q', 'u') => &[K, W],
        ('e', 'e') | ('e', 'a') => &[IY],
        ('o', 'o') => &[UW],
        ('o', 'u') => &[AW],
        ('o', 'w') => &[OW],
        ('a', 'i') | ('a', 'y') => &[EY],
        ('o', 'i') | ('o', 'y') => &[OY],
        ('a', 'u') | ('a', 'w') => &[AO],
        ('e', 'r') | ('i', 'r') | ('u', 'r') => &[ER],
        ('a', 'r') => &[AA, R],
        ('o', 'r') => &[AO, R],
        _ => return None,
    };
    Some(p)
}

fn long_vowel(c: char) -> Option<Phoneme> {
    match c {
        'a' => Some(Phoneme::EY),
        'e' => Some(Phoneme::IY),
        'i' => Some(Phoneme::AY),
        'o' => Some(Phoneme::OW),
        'u' => Some(Phoneme::UW),
        _ => None,
    }
}

fn single(c: char, at_start: bool, next: Option<char>) -> &'static [Phoneme] {
    use Phoneme::*;
    match c {
        'a' => &[AE],
        'e' => &[EH],
        'i' => &[IH],
        'o' => &[AA],
        'u' => &[AH],
        'y' if at_start => &[Y],
        'y' if next.is_none() => &[IY],
        'y' => &[IH],
        'b' => &[B],
        'c' if matches!(next, Some('e' | 'i' | 'y')) => &[S],
        'c' | 'k' | 'q' => &[K],
        'd' => &[D],
        'f' => &[F],
        'g' => &[G],
        'h' => &[HH],
        'j' => &[JH],
        'l' => &[L],
        'm' => &[M],
        'n' => &[N],
        'p' => &[P],
        'r' => &[R],
        's' => &[S],
        't' => &[T],
        'v' => &[V],
        'w' => &[W],
        'x' => &[K, S],
        'z' => &[Z],
        _ => &[],
    }
}

/// Letter-to-sound rules over a lowercase alphabetic word.
fn letters_to_phonemes(word: &str) -> Vec<Phoneme> {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    let silent_e = n > 2 && chars[n - 1] == 'e' && !is_vowel_letter(chars[n - 2]);
    let end = if silent_e { n - 1 } else { n };
    let at = |i: usize| if i < end { Some(chars[i]) } else { None };

    let mut out = Vec::with_capacity(end);
    let mut i = 0;
    while i < end {
        let c = chars[i];
        let next = at(i + 1);

        if let (Some(b), Some(d)) = (next, at(i + 2)) {
            if let Some(p) = trigraph(c, b, d) {
                out.extend_from_slice(p);
                i += 3;
                continue;
            }
        }
        if let Some(b) = next {
            if let Some(p) = digraph(c, b) {
                out.extend_from_slice(p);
                i += 2;
                continue;
            }
            if b == c && !is_vowel_letter(c) {
                i += 1;
                continue;
            }
        }
        // vowel + single consonant + silent e
        if silent_e && i + 2 == end && next.is_some_and(|b| !is_vowel_letter(b)) {
            if let Some(long) = long_vowel(c) {
                out.push(long);
                i += 1;
                continue;
            }
        }
        out.extend_from_slice(single(c, i == 0, next));
        i += 1;
    }
    out
}
