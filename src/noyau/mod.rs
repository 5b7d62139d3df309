//! Noyau de calcul scientifique
//!
//! Organisation interne :
//! - nombre.rs        : décimal 50 chiffres + NaN, arrondi au pair, plage bornée
//! - transcendantes.rs: séries en virgule fixe (exp, ln, trig, gamma, erf…)
//! - budget.rs        : compteur d’opérations (seule annulation possible)
//! - jetons.rs        : tokenisation (bases 2/8/10/16)
//! - rpn.rs           : shunting-yard + construction Expr
//! - expr.rs          : arbre d’expression
//! - trig.rs          : trigonométrie selon le mode d’angle
//! - logique.rs       : entiers, bits, modulo exact
//! - stats.rs         : statistiques, combinatoire, lois discrètes
//! - fonctions.rs     : registre immuable des fonctions
//! - constantes.rs    : constantes réservées + catalogue physique
//! - variables.rs     : environnement de session
//! - eval.rs          : pipeline complet
//! - format.rs        : affichage d’un résultat
//! - reglages.rs      : réglages d’affichage et d’angle
//! - erreur.rs        : taxonomie fermée des erreurs

pub mod budget;
pub mod constantes;
pub mod erreur;
pub mod eval;
pub mod expr;
pub mod fonctions;
pub mod format;
pub mod jetons;
pub mod logique;
pub mod nombre;
pub mod reglages;
pub mod rpn;
pub mod stats;
pub mod transcendantes;
pub mod trig;
pub mod variables;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

/// Logs dans les tests (niveau `debug` sauf `RUST_LOG`).
#[cfg(test)]
pub mod test_utils {
    pub fn init_test_logging() {
        use tracing_subscriber::{fmt, EnvFilter};

        // déjà initialisé par un autre test : on ignore
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}

// API publique
pub use constantes::{list_constants, InfoConstante};
pub use erreur::{Erreur, GenreErreur};
pub use eval::{demarche, evaluate, evaluate_avec_budget, Demarche};
pub use fonctions::{list_functions, lookup, Fonction};
pub use format::formater;
pub use nombre::Nombre;
pub use reglages::{Notation, Reglages};
pub use trig::ModeAngle;
pub use variables::Variables;
