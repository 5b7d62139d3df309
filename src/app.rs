// src/app.rs
//
// Calculatrice: module App (racine)
// ----------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Ré-exporter Session (pour main.rs: use calculatrice_sci::app::Session;)
// - Fournir la boucle interactive (lignes sur une entrée, rendu sur une sortie)
//
// Commandes (préfixe ':') :
//   :vars  :fonctions  :constantes  :historique  :effacer  :oublier NOM  :quitter
//   :angle deg|rad  :format g|f|e|n  :decimales N|auto  :base 2|8|10|16
//   :demarche EXPR

pub mod etat;
pub mod vue;

pub use etat::Session;

use std::io::{self, BufRead, Write};

use crate::noyau::jetons::Base;
use crate::noyau::{demarche, formater, ModeAngle, Notation};

use vue::{rendu_constantes, rendu_demarche, rendu_erreur, rendu_fonctions, rendu_variables};

/// Traite une ligne. None : fin de session demandée.
pub fn executer(session: &mut Session, ligne: &str) -> Option<String> {
    let ligne = ligne.trim();
    if ligne.is_empty() {
        return Some(String::new());
    }
    let Some(commande) = ligne.strip_prefix(':') else {
        let _ = session.evaluer(ligne);
        return Some(session.rendu());
    };

    let (nom, arg) = commande.split_once(' ').unwrap_or((commande, ""));
    let arg = arg.trim();
    Some(match nom {
        "quitter" | "q" => return None,
        "vars" => rendu_variables(&session.variables, &session.reglages),
        "fonctions" => rendu_fonctions(),
        "constantes" => rendu_constantes(),
        "historique" => session
            .historique()
            .map(|l| match &l.resultat {
                Ok(v) => format!("{} = {}", l.expression, formater(v, &session.reglages)),
                Err(e) => format!("{} : {}", l.expression, vue::message(e.genre)),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        "effacer" => {
            session.clear_variables();
            "variables effacées".to_string()
        }
        "oublier" => match session.variables.supprimer(arg) {
            Some(_) => format!("{arg} oubliée"),
            None => format!("variable inconnue : {arg:?}"),
        },
        "angle" => match arg {
            "deg" => {
                session.reglages.mode_angle = ModeAngle::Degre;
                "angles en degrés".to_string()
            }
            "rad" => {
                session.reglages.mode_angle = ModeAngle::Radian;
                "angles en radians".to_string()
            }
            _ => format!("angle inconnu : {arg:?} (deg | rad)"),
        },
        "format" => match arg.chars().next().and_then(Notation::depuis_code) {
            Some(n) if arg.len() == 1 => {
                session.reglages.notation = n;
                format!("format {n:?}")
            }
            _ => format!("format inconnu : {arg:?} (g | f | e | n)"),
        },
        "decimales" => match arg {
            "auto" => {
                session.reglages.fixer_decimales(None);
                "décimales automatiques".to_string()
            }
            _ => match arg.parse::<usize>() {
                Ok(d) => {
                    session.reglages.fixer_decimales(Some(d));
                    format!("{} décimales", session.reglages.decimales().unwrap_or(d))
                }
                Err(_) => format!("décimales invalides : {arg:?} (N | auto)"),
            },
        },
        "base" => match base_depuis(arg) {
            Some(b) => {
                session.reglages.base = b;
                format!("base {}", b.radix())
            }
            None => format!("base inconnue : {arg:?} (2 | 8 | 10 | 16)"),
        },
        "demarche" => match demarche(arg) {
            Ok(d) => rendu_demarche(&d),
            Err(e) => rendu_erreur(arg, &e),
        },
        _ => format!("commande inconnue : {nom:?}"),
    })
}

pub fn base_depuis(texte: &str) -> Option<Base> {
    Some(match texte {
        "2" => Base::Binaire,
        "8" => Base::Octale,
        "10" => Base::Decimale,
        "16" => Base::Hexa,
        _ => return None,
    })
}

/// Boucle interactive : invite, lecture, rendu, jusqu’à `:quitter` ou fin d’entrée.
pub fn boucle<R: BufRead, W: Write>(
    session: &mut Session,
    entree: R,
    sortie: &mut W,
) -> io::Result<()> {
    write!(sortie, "> ")?;
    sortie.flush()?;
    for ligne in entree.lines() {
        let ligne = ligne?;
        match executer(session, &ligne) {
            None => break,
            Some(s) if s.is_empty() => {}
            Some(s) => writeln!(sortie, "{s}")?,
        }
        write!(sortie, "> ")?;
        sortie.flush()?;
    }
    writeln!(sortie)?;
    Ok(())
}
