// src/noyau/reglages.rs
//
// Réglages d’affichage et d’évaluation d’une session.
// Valeurs par défaut : degrés, format général, décimales automatiques, base 10.

use super::jetons::Base;
use super::trig::ModeAngle;

/// Plafond des décimales imposées.
pub const DECIMALES_MAX: usize = 70;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Notation {
    #[default]
    General,
    Fixe,
    Scientifique,
    Ingenieur,
}

impl Notation {
    /// Code court : 'g', 'f', 'e', 'n'.
    pub fn depuis_code(c: char) -> Option<Notation> {
        Some(match c.to_ascii_lowercase() {
            'g' => Notation::General,
            'f' => Notation::Fixe,
            'e' => Notation::Scientifique,
            'n' => Notation::Ingenieur,
            _ => return None,
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reglages {
    pub mode_angle: ModeAngle,
    pub notation: Notation,
    pub base: Base,
    decimales: Option<usize>,
}

impl Reglages {
    /// None : automatique.
    pub fn decimales(&self) -> Option<usize> {
        self.decimales
    }

    pub fn fixer_decimales(&mut self, d: Option<usize>) {
        self.decimales = d.map(|d| d.min(DECIMALES_MAX));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valeurs_par_defaut() {
        let r = Reglages::default();
        assert_eq!(r.mode_angle, ModeAngle::Degre);
        assert_eq!(r.notation, Notation::General);
        assert_eq!(r.base, Base::Decimale);
        assert_eq!(r.decimales(), None);
    }

    #[test]
    fn decimales_plafonnees() {
        let mut r = Reglages::default();
        r.fixer_decimales(Some(500));
        assert_eq!(r.decimales(), Some(DECIMALES_MAX));
        r.fixer_decimales(None);
        assert_eq!(r.decimales(), None);
        assert_eq!(Notation::depuis_code('E'), Some(Notation::Scientifique));
        assert_eq!(Notation::depuis_code('x'), None);
    }
}
