// src/noyau/variables.rs
//
// Environnement de variables d’une session.
// - noms sensibles à la casse, uniques (dernière affectation gagnante)
// - noms réservés (fonctions, constantes) refusés, comparés sans casse
// - les affectations d’une évaluation ne sont validées qu’en cas de succès

use std::collections::HashMap;

use super::erreur::GenreErreur;
use super::fonctions::est_nom_reserve;
use super::nombre::Nombre;

#[derive(Clone, Debug, Default)]
pub struct Variables {
    table: HashMap<String, Nombre>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn obtenir(&self, nom: &str) -> Option<&Nombre> {
        self.table.get(nom)
    }

    pub fn definir(&mut self, nom: &str, valeur: Nombre) -> Result<(), GenreErreur> {
        verifier_nom(nom)?;
        self.table.insert(nom.to_string(), valeur);
        Ok(())
    }

    pub fn supprimer(&mut self, nom: &str) -> Option<Nombre> {
        self.table.remove(nom)
    }

    /// Action externe “effacer les variables”.
    pub fn effacer(&mut self) {
        self.table.clear();
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Variables triées par nom (affichage).
    pub fn lister(&self) -> Vec<(&str, &Nombre)> {
        let mut v: Vec<(&str, &Nombre)> = self.table.iter().map(|(k, v)| (k.as_str(), v)).collect();
        v.sort_by(|a, b| a.0.cmp(b.0));
        v
    }

    /// Applique d’un bloc les affectations d’une évaluation réussie.
    pub(crate) fn valider(&mut self, affectations: Vec<(String, Nombre)>) {
        for (nom, valeur) in affectations {
            tracing::debug!(nom = nom.as_str(), valeur = %&valeur, "affectation");
            self.table.insert(nom, valeur);
        }
    }
}

/// Nom affectable : identifiant non réservé.
pub fn verifier_nom(nom: &str) -> Result<(), GenreErreur> {
    if est_nom_reserve(nom) {
        return Err(GenreErreur::ReservedName);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensible_a_la_casse() {
        let mut v = Variables::new();
        v.definir("x", Nombre::depuis_i64(1)).unwrap();
        v.definir("X", Nombre::depuis_i64(2)).unwrap();
        assert_eq!(v.obtenir("x"), Some(&Nombre::depuis_i64(1)));
        assert_eq!(v.obtenir("X"), Some(&Nombre::depuis_i64(2)));
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn noms_reserves() {
        let mut v = Variables::new();
        assert_eq!(v.definir("pi", Nombre::un()), Err(GenreErreur::ReservedName));
        assert_eq!(v.definir("SIN", Nombre::un()), Err(GenreErreur::ReservedName));
        assert!(v.is_empty());
        assert!(v.definir("sinus", Nombre::un()).is_ok());
    }

    #[test]
    fn derniere_affectation_gagne_et_effacement() {
        let mut v = Variables::new();
        v.valider(vec![
            ("a".into(), Nombre::depuis_i64(1)),
            ("a".into(), Nombre::depuis_i64(3)),
        ]);
        assert_eq!(v.obtenir("a"), Some(&Nombre::depuis_i64(3)));
        assert_eq!(v.lister().len(), 1);
        v.effacer();
        assert!(v.is_empty());
    }
}
