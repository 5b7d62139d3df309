// src/noyau/budget.rs
//
// Budget de calcul : compteur d’opérations élémentaires (déterministe,
// indépendant de la machine). Seul mécanisme d’annulation du noyau.

use super::erreur::GenreErreur;

/// Plafond par évaluation (opérations élémentaires).
pub const BUDGET_DEFAUT: u64 = 1_000_000;

#[derive(Debug, Clone)]
pub struct Budget {
    limite: u64,
    consomme: u64,
}

impl Default for Budget {
    fn default() -> Self {
        Budget::new(BUDGET_DEFAUT)
    }
}

impl Budget {
    pub fn new(limite: u64) -> Self {
        Self {
            limite,
            consomme: 0,
        }
    }

    /// Consomme `n` opérations ; refuse dès que le plafond est franchi.
    pub fn consommer(&mut self, n: u64) -> Result<(), GenreErreur> {
        self.consomme = self.consomme.saturating_add(n);
        if self.consomme > self.limite {
            tracing::trace!(
                consomme = self.consomme,
                limite = self.limite,
                "budget épuisé"
            );
            return Err(GenreErreur::ComputationTooExpensive);
        }
        Ok(())
    }

    /// Refus anticipé : une boucle de `n` itérations ne tiendra pas.
    pub fn reserver(&self, n: u64) -> Result<(), GenreErreur> {
        if n > self.restant() {
            return Err(GenreErreur::ComputationTooExpensive);
        }
        Ok(())
    }

    pub fn restant(&self) -> u64 {
        self.limite.saturating_sub(self.consomme)
    }

    pub fn consomme(&self) -> u64 {
        self.consomme
    }
}
