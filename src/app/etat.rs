//! src/app/etat.rs
//!
//! État de session (sans rendu).
//!
//! Rôle : contenir l’état de la calculatrice (variables, réglages, dernier
//! résultat, dernière erreur, historique) et offrir les actions simples
//! (CLR / AC) sans logique d’affichage.
//!
//! Contrats :
//! - L’évaluation elle-même vit dans vue.rs (comme le rendu).
//! - Historique borné aux HISTORIQUE_MAX dernières entrées.
//! - `ans` reprend le dernier résultat réussi.

use std::collections::VecDeque;

use crate::noyau::{Erreur, Nombre, Reglages, Variables};

/// Entrées conservées dans l’historique.
pub const HISTORIQUE_MAX: usize = 100;

/// Variable de reprise automatique du dernier résultat.
pub const NOM_ANS: &str = "ans";

#[derive(Clone, Debug, PartialEq)]
pub struct Ligne {
    pub expression: String,
    pub resultat: Result<Nombre, Erreur>,
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    // --- environnement ---
    pub variables: Variables,
    pub reglages: Reglages,

    // --- sorties ---
    resultat: Option<Nombre>,
    erreur: Option<Erreur>,
    historique: VecDeque<Ligne>,
}

impl Session {
    pub fn new(reglages: Reglages) -> Self {
        Self {
            reglages,
            ..Self::default()
        }
    }

    pub fn resultat(&self) -> Option<&Nombre> {
        self.resultat.as_ref()
    }

    pub fn erreur(&self) -> Option<&Erreur> {
        self.erreur.as_ref()
    }

    /// Du plus ancien au plus récent.
    pub fn historique(&self) -> impl Iterator<Item = &Ligne> {
        self.historique.iter()
    }

    /* ------------------------ Actions (état seulement) ------------------------ */

    /// Effacer les variables (y compris `ans`).
    pub fn clear_variables(&mut self) {
        self.variables.effacer();
    }

    /// CLR : résultat + erreur + historique, variables conservées.
    pub fn clear_resultats(&mut self) {
        self.resultat = None;
        self.erreur = None;
        self.historique.clear();
    }

    /// AC : remise à zéro totale (réglages conservés).
    pub fn reset_total(&mut self) {
        self.clear_variables();
        self.clear_resultats();
    }

    /// Dépose le résultat d’une évaluation.
    ///
    /// Choix UX : on CONSERVE le dernier résultat sur une erreur
    /// (l’écran ne s’efface pas sur une faute de frappe).
    pub fn set_resultat(&mut self, expression: &str, resultat: Result<Nombre, Erreur>) {
        match &resultat {
            Ok(v) => {
                self.resultat = Some(v.clone());
                self.erreur = None;
                self.variables.valider(vec![(NOM_ANS.to_string(), v.clone())]);
            }
            Err(e) => self.erreur = Some(*e),
        }

        if self.historique.len() == HISTORIQUE_MAX {
            self.historique.pop_front();
        }
        self.historique.push_back(Ligne {
            expression: expression.to_string(),
            resultat,
        });
    }
}
