// src/app/vue.rs
//
// Vue (texte): terminal
// ----------------------
// Objectifs :
// - Évaluer une saisie dans la Session (seul point d’appel du noyau côté app)
// - Rendre un résultat selon les Réglages
// - Rendre une erreur : message localisé + caret sous la position fautive
// - Listes : variables, fonctions, constantes
//
// Note :
// - Le noyau rend un genre d’erreur neutre ; la traduction se fait ici.

use crate::noyau::erreur::{ErreurLex, ErreurSyntaxe};
use crate::noyau::{
    evaluate, formater, list_constants, list_functions, Demarche, Erreur, GenreErreur, Nombre,
    Reglages, Variables,
};

use super::etat::Session;

impl Session {
    /// Évalue une saisie et dépose le résultat dans la session.
    pub fn evaluer(&mut self, texte: &str) -> Result<Nombre, Erreur> {
        let texte = texte.trim();
        let r = evaluate(texte, self.reglages.mode_angle, &mut self.variables);
        self.set_resultat(texte, r.clone());
        r
    }

    /// Résultat ou erreur de la dernière évaluation, prêt à afficher.
    pub fn rendu(&self) -> String {
        match (self.erreur(), self.historique().last()) {
            (Some(e), Some(l)) => rendu_erreur(&l.expression, e),
            _ => self
                .resultat()
                .map(|v| formater(v, &self.reglages))
                .unwrap_or_default(),
        }
    }
}

/* ------------------------ Erreurs ------------------------ */

/// Traduction française d’un genre d’erreur.
pub fn message(genre: GenreErreur) -> &'static str {
    match genre {
        GenreErreur::Lex(ErreurLex::UnterminatedLiteral) => "littéral inachevé",
        GenreErreur::Lex(ErreurLex::InvalidCharacter) => "caractère invalide",
        GenreErreur::Lex(ErreurLex::InvalidRadixDigit) => "chiffre invalide pour cette base",
        GenreErreur::Syntaxe(ErreurSyntaxe::UnexpectedToken) => "élément inattendu",
        GenreErreur::Syntaxe(ErreurSyntaxe::UnbalancedParentheses) => {
            "parenthèses déséquilibrées"
        }
        GenreErreur::Syntaxe(ErreurSyntaxe::MissingOperand) => "opérande manquant",
        GenreErreur::Syntaxe(ErreurSyntaxe::TrailingInput) => "saisie en trop",
        GenreErreur::DivisionByZero => "division par zéro",
        GenreErreur::InvalidExpression => "expression invalide",
        GenreErreur::UnknownFunctionOrVariable => "fonction ou variable inconnue",
        GenreErreur::CannotOperateOnNaN => "opération impossible sur NaN",
        GenreErreur::Underflow => "dépassement inférieur : résultat trop petit",
        GenreErreur::Overflow => "dépassement : résultat trop grand",
        GenreErreur::LogicOverflow => "dépassement : résultat logique au-delà de 256 bits",
        GenreErreur::IntegerOverflow => "dépassement : entier trop grand",
        GenreErreur::ComputationTooExpensive => "calcul trop long, refusé",
        GenreErreur::WrongNumberOfArguments => "nombre d’arguments incorrect",
        GenreErreur::DoesNotAcceptNaN => "NaN refusé en argument",
        GenreErreur::ResultOutOfRange => "résultat hors plage",
        GenreErreur::UndefinedForArgumentDomain => "indéfini pour cet argument",
        GenreErreur::InternalError => "erreur interne, merci de la signaler",
        GenreErreur::ReservedName => "nom réservé, choisissez-en un autre",
    }
}

/// Message, puis l’expression et un caret sous la position fautive.
pub fn rendu_erreur(texte: &str, e: &Erreur) -> String {
    let mut s = format!("erreur : {}", message(e.genre));
    if let Some(pos) = e.pos {
        // colonne en caractères (la position est un octet)
        let colonne = texte.get(..pos).map_or(texte.chars().count(), |t| t.chars().count());
        s.push('\n');
        s.push_str(texte);
        s.push('\n');
        s.push_str(&" ".repeat(colonne));
        s.push('^');
    }
    s
}

/* ------------------------ Listes ------------------------ */

pub fn rendu_variables(variables: &Variables, reglages: &Reglages) -> String {
    if variables.is_empty() {
        return "(aucune variable)".to_string();
    }
    variables
        .lister()
        .iter()
        .map(|(nom, v)| format!("{nom} = {}", formater(v, reglages)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn rendu_fonctions() -> String {
    list_functions()
        .iter()
        .map(|f| format!("{:<10} {:<5} {}", f.nom, f.arite(), f.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn rendu_constantes() -> String {
    let mut lignes = Vec::new();
    let mut categorie = "";
    for c in list_constants() {
        if c.categorie != categorie {
            categorie = c.categorie;
            lignes.push(format!("[{categorie}]"));
        }
        lignes.push(format!("  {:<40} {} {}", c.nom, c.valeur, c.unite));
    }
    lignes.join("\n")
}

pub fn rendu_demarche(d: &Demarche) -> String {
    format!("jetons : {}\narbre  : {} ({} nœuds)", d.jetons, d.arbre, d.noeuds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::jetons::Base;
    use pretty_assertions::assert_eq;

    #[test]
    fn caret_sous_la_position() {
        let e = Erreur::new(GenreErreur::DivisionByZero, 1);
        assert_eq!(rendu_erreur("1/0", &e), "erreur : division par zéro\n1/0\n ^");

        // π occupe deux octets
        let e = Erreur::new(GenreErreur::UnknownFunctionOrVariable, 5);
        assert_eq!(
            rendu_erreur("π + y", &e),
            "erreur : fonction ou variable inconnue\nπ + y\n    ^"
        );

        let e = Erreur::sans_position(GenreErreur::Overflow);
        assert_eq!(rendu_erreur("x", &e), "erreur : dépassement : résultat trop grand");
    }

    #[test]
    fn session_ans_et_rendu() {
        let mut s = Session::default();
        assert_eq!(s.evaluer("6*7"), Ok(Nombre::depuis_i64(42)));
        assert_eq!(s.rendu(), "42");
        assert_eq!(s.evaluer("ans + 1"), Ok(Nombre::depuis_i64(43)));

        s.reglages.base = Base::Hexa;
        assert_eq!(s.rendu(), "0x2B");

        assert!(s.evaluer("1 +").is_err());
        assert_eq!(s.rendu(), "erreur : opérande manquant\n1 +\n   ^");
        assert_eq!(s.resultat(), Some(&Nombre::depuis_i64(43)));
    }

    #[test]
    fn listes() {
        let mut s = Session::default();
        assert_eq!(rendu_variables(&s.variables, &s.reglages), "(aucune variable)");
        s.evaluer("b = 2").unwrap();
        s.evaluer("a = 0.5").unwrap();
        assert_eq!(rendu_variables(&s.variables, &s.reglages), "a = 0.5\nans = 0.5\nb = 2");

        assert!(rendu_fonctions().lines().any(|l| l.starts_with("sin ")));
        assert!(rendu_constantes().starts_with("[Universal]"));
    }
}
