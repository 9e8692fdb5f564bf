//! Phoneme to viseme mapping with base durations and jaw coefficients.

use serde::{Deserialize, Serialize};

use crate::phonemes::{PauseKind, Phoneme};

pub const VISEME_COUNT: usize = 15;

/// Mouth shapes in channel-index order (`viseme:0` is `Ae`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Viseme {
    Ae,
    Ah,
    Bmp,
    ChJ,
    Ee,
    Er,
    Fv,
    Ih,
    Kghng,
    Oh,
    R,
    Sz,
    Tldn,
    Th,
    WOo,
}

impl Viseme {
    pub const ALL: [Viseme; VISEME_COUNT] = [
        Viseme::Ae,
        Viseme::Ah,
        Viseme::Bmp,
        Viseme::ChJ,
        Viseme::Ee,
        Viseme::Er,
        Viseme::Fv,
        Viseme::Ih,
        Viseme::Kghng,
        Viseme::Oh,
        Viseme::R,
        Viseme::Sz,
        Viseme::Tldn,
        Viseme::Th,
        Viseme::WOo,
    ];

    #[inline]
    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Conventional label, as used in CC-style viseme morph names.
    pub fn name(self) -> &'static str {
        match self {
            Viseme::Ae => "AE",
            Viseme::Ah => "Ah",
            Viseme::Bmp => "B_M_P",
            Viseme::ChJ => "Ch_J",
            Viseme::Ee => "EE",
            Viseme::Er => "Er",
            Viseme::Fv => "F_V",
            Viseme::Ih => "Ih",
            Viseme::Kghng => "K_G_H_NG",
            Viseme::Oh => "Oh",
            Viseme::R => "R",
            Viseme::Sz => "S_Z",
            Viseme::Tldn => "T_L_D_N",
            Viseme::Th => "Th",
            Viseme::WOo => "W_OO",
        }
    }
}

/// How one phoneme is rendered. Pauses have no viseme.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VisemeMapping {
    pub viseme: Option<Viseme>,
    /// Duration at speech rate 1.0.
    pub base_ms: f32,
    /// Jaw opening, 0 (closed lips) to 1 (wide open vowel).
    pub jaw: f32,
}

const fn m(viseme: Viseme, base_ms: f32, jaw: f32) -> VisemeMapping {
    VisemeMapping {
        viseme: Some(viseme),
        base_ms,
        jaw,
    }
}

pub fn map_phoneme_to_viseme(p: Phoneme) -> VisemeMapping {
    use Phoneme::*;
    use Viseme as Vi;
    match p {
        AA => m(Vi::Ah, 160.0, 1.0),
        AE => m(Vi::Ae, 150.0, 0.8),
        AH => m(Vi::Ah, 110.0, 0.7),
        AO => m(Vi::Oh, 160.0, 0.8),
        AW => m(Vi::Ah, 180.0, 0.9),
        AY => m(Vi::Ah, 180.0, 0.9),
        EH => m(Vi::Ae, 120.0, 0.6),
        ER => m(Vi::Er, 150.0, 0.4),
        EY => m(Vi::Ee, 160.0, 0.5),
        IH => m(Vi::Ih, 100.0, 0.4),
        IY => m(Vi::Ee, 140.0, 0.3),
        OW => m(Vi::Oh, 170.0, 0.6),
        OY => m(Vi::Oh, 180.0, 0.6),
        UH => m(Vi::WOo, 110.0, 0.4),
        UW => m(Vi::WOo, 150.0, 0.3),

        B => m(Vi::Bmp, 70.0, 0.0),
        M => m(Vi::Bmp, 80.0, 0.0),
        P => m(Vi::Bmp, 70.0, 0.0),
        CH => m(Vi::ChJ, 90.0, 0.2),
        JH => m(Vi::ChJ, 90.0, 0.2),
        SH => m(Vi::ChJ, 90.0, 0.2),
        ZH => m(Vi::ChJ, 90.0, 0.2),
        F => m(Vi::Fv, 80.0, 0.05),
        V => m(Vi::Fv, 70.0, 0.05),
        G => m(Vi::Kghng, 70.0, 0.3),
        K => m(Vi::Kghng, 70.0, 0.3),
        NG => m(Vi::Kghng, 80.0, 0.3),
        HH => m(Vi::Kghng, 60.0, 0.4),
        R => m(Vi::R, 70.0, 0.2),
        S => m(Vi::Sz, 90.0, 0.1),
        Z => m(Vi::Sz, 80.0, 0.1),
        T => m(Vi::Tldn, 60.0, 0.2),
        D => m(Vi::Tldn, 60.0, 0.2),
        N => m(Vi::Tldn, 70.0, 0.2),
        L => m(Vi::Tldn, 70.0, 0.2),
        TH => m(Vi::Th, 80.0, 0.15),
        DH => m(Vi::Th, 60.0, 0.15),
        W => m(Vi::WOo, 70.0, 0.1),
        Y => m(Vi::Ee, 60.0, 0.2),

        Pause(kind) => VisemeMapping {
            viseme: None,
            base_ms: match kind {
                PauseKind::Short => 150.0,
                PauseKind::Long => 300.0,
            },
            jaw: 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_declaration_order() {
        for (i, v) in Viseme::ALL.iter().enumerate() {
            assert_eq!(v.index() as usize, i);
            assert_eq!(Viseme::from_index(i as u32), Some(*v));
        }
        assert_eq!(Viseme::from_index(15), None);
        assert_eq!(Viseme::ChJ.index(), 3);
        assert_eq!(Viseme::WOo.name(), "W_OO");
    }

    #[test]
    fn bilabials_close_the_jaw() {
        for p in [Phoneme::B, Phoneme::M, Phoneme::P] {
            let mapping = map_phoneme_to_viseme(p);
            assert_eq!(mapping.viseme, Some(Viseme::Bmp));
            assert_eq!(mapping.jaw, 0.0);
        }
        assert_eq!(map_phoneme_to_viseme(Phoneme::AA).jaw, 1.0);
    }

    #[test]
    fn pauses_have_duration_but_no_shape() {
        let short = map_phoneme_to_viseme(Phoneme::Pause(PauseKind::Short));
        let long = map_phoneme_to_viseme(Phoneme::Pause(PauseKind::Long));
        assert!(short.viseme.is_none() && long.viseme.is_none());
        assert!(short.base_ms > 0.0 && long.base_ms > short.base_ms);
    }
}
