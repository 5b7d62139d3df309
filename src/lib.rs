// src/lib.rs
//
// Calculatrice scientifique: bibliothèque
// - noyau : texte -> jetons -> arbre -> Nombre (ou erreur typée)
// - app   : session (entrée, variables, réglages, historique) + rendu texte

pub mod app;
pub mod noyau;
