//! Noyau: évaluation (pipeline réel)
//!
//! tokenize -> RPN -> Expr -> parcours post-ordre -> Nombre
//! (les chaînes d’opérateurs binaires sont parcourues en boucle)
//!
//! Remarques :
//! - chaque nœud visité consomme une unité du budget ; les fonctions coûteuses
//!   (factorielle, combinatoire, statistiques, séries) consomment le leur
//! - les affectations sont mises en attente et validées d’un bloc si, et
//!   seulement si, toute l’évaluation réussit
//! - l’erreur porte la position du nœud fautif

use std::cmp::Ordering;

use super::budget::Budget;
use super::constantes::valeur_constante;
use super::erreur::{Erreur, GenreErreur};
use super::expr::{Expr, OpBinaire, OpUnaire};
use super::fonctions::{lookup, Contexte};
use super::jetons::{format_tokens, tokenize, Base};
use super::logique::{self, OpBits};
use super::nombre::Nombre;
use super::rpn::parse;
use super::transcendantes as tr;
use super::trig::ModeAngle;
use super::variables::{verifier_nom, Variables};

/// Étapes lisibles d’une analyse (option `--demarche` du binaire).
#[derive(Default, Clone, Debug)]
pub struct Demarche {
    pub jetons: String,
    pub arbre: String,
    pub noeuds: usize,
}

/// API publique : évalue `texte` dans l’environnement `env`, budget par défaut.
pub fn evaluate(texte: &str, mode: ModeAngle, env: &mut Variables) -> Result<Nombre, Erreur> {
    evaluate_avec_budget(texte, mode, env, &mut Budget::default())
}

/// Variante à budget explicite (tests, appelants qui veulent un plafond propre).
pub fn evaluate_avec_budget(
    texte: &str,
    mode: ModeAngle,
    env: &mut Variables,
    budget: &mut Budget,
) -> Result<Nombre, Erreur> {
    tracing::debug!(texte, ?mode, "évaluation");

    let jetons = tokenize(texte)?;
    tracing::debug!(jetons = %format_tokens(&jetons), "jetons");

    let arbre = parse(&jetons)?;
    tracing::debug!(arbre = %arbre, noeuds = arbre.taille(), "arbre");

    let mut ev = Evaluateur {
        mode,
        env: &*env,
        budget: &mut *budget,
        affectations: Vec::new(),
    };
    let valeur = ev.evaluer(&arbre)?;
    let affectations = ev.affectations;

    env.valider(affectations);
    tracing::debug!(resultat = %valeur, consomme = budget.consomme(), "résultat");
    Ok(valeur)
}

/// Jetons et arbre d’une saisie, sans évaluer.
pub fn demarche(texte: &str) -> Result<Demarche, Erreur> {
    let jetons = tokenize(texte)?;
    let arbre = parse(&jetons)?;
    Ok(Demarche {
        jetons: format_tokens(&jetons),
        arbre: arbre.to_string(),
        noeuds: arbre.taille(),
    })
}

/* ------------------------ Parcours ------------------------ */

struct Evaluateur<'a> {
    mode: ModeAngle,
    env: &'a Variables,
    budget: &'a mut Budget,
    affectations: Vec<(String, Nombre)>,
}

/// Attache une position à une erreur de primitive.
fn situer(pos: usize) -> impl Fn(GenreErreur) -> Erreur {
    move |g| {
        if g.est_interne() {
            return Erreur::interne("primitive numérique", Some(pos));
        }
        Erreur::new(g, pos)
    }
}

fn booleen(v: bool) -> Nombre {
    if v {
        Nombre::un()
    } else {
        Nombre::zero()
    }
}

impl Evaluateur<'_> {
    fn evaluer(&mut self, e: &Expr) -> Result<Nombre, Erreur> {
        self.budget.consommer(1).map_err(situer(e.pos()))?;

        match e {
            Expr::Litteral { texte, base, pos } => {
                let v = match base {
                    Base::Decimale => Nombre::depuis_decimal(texte),
                    _ => Nombre::depuis_base(texte, base.radix()),
                };
                v.map_err(situer(*pos))
            }

            Expr::Var { nom, pos } => self.variable(nom, *pos),

            Expr::Affect { nom, valeur, pos } => {
                verifier_nom(nom).map_err(situer(*pos))?;
                let v = self.evaluer(valeur)?;
                self.affectations.push((nom.clone(), v.clone()));
                Ok(v)
            }

            Expr::Unaire { op, x, pos } => {
                let x = self.evaluer(x)?;
                self.unaire(*op, &x).map_err(situer(*pos))
            }

            Expr::Chaine { tete, suite } => {
                // le premier maillon est déjà payé par le nœud
                let mut acc = self.evaluer(tete)?;
                for (i, m) in suite.iter().enumerate() {
                    if i > 0 {
                        self.budget.consommer(1).map_err(situer(m.pos))?;
                    }
                    let y = self.evaluer(&m.x)?;
                    acc = self.binaire(m.op, &acc, &y).map_err(situer(m.pos))?;
                }
                Ok(acc)
            }

            Expr::Appel { nom, args, pos } => {
                let f = lookup(nom)
                    .ok_or(Erreur::new(GenreErreur::UnknownFunctionOrVariable, *pos))?;
                let mut valeurs = Vec::with_capacity(args.len());
                for arg in args {
                    valeurs.push(self.evaluer(arg)?);
                }
                let mut ctx = Contexte {
                    mode: self.mode,
                    budget: &mut *self.budget,
                };
                f.appliquer(&valeurs, &mut ctx).map_err(situer(*pos))
            }
        }
    }

    /// Constantes réservées d’abord (sans casse), puis variables (avec casse).
    fn variable(&self, nom: &str, pos: usize) -> Result<Nombre, Erreur> {
        if let Some(c) = valeur_constante(nom) {
            return c.map_err(situer(pos));
        }
        self.env
            .obtenir(nom)
            .cloned()
            .ok_or(Erreur::new(GenreErreur::UnknownFunctionOrVariable, pos))
    }

    fn unaire(&mut self, op: OpUnaire, x: &Nombre) -> Result<Nombre, GenreErreur> {
        match op {
            OpUnaire::Plus => Ok(x.clone()),
            OpUnaire::Moins => Ok(x.neg()),
            // opérations logiques/entières : pas de NaN silencieux
            _ if x.est_nan() => Err(GenreErreur::CannotOperateOnNaN),
            OpUnaire::NonLogique => Ok(booleen(x.est_zero())),
            OpUnaire::NonBinaire => logique::non(x),
            OpUnaire::Factorielle => tr::factorielle(x, self.budget),
        }
    }

    fn binaire(&mut self, op: OpBinaire, x: &Nombre, y: &Nombre) -> Result<Nombre, GenreErreur> {
        if x.est_nan() || y.est_nan() {
            return Ok(Nombre::Nan);
        }
        match op {
            OpBinaire::Add => x.add(y),
            OpBinaire::Sub => x.sub(y),
            OpBinaire::Mul => x.mul(y),
            OpBinaire::Div => x.div(y),
            OpBinaire::Pow => tr::puissance(x, y, self.budget),
            OpBinaire::Mod => logique::modulo(x, y),

            OpBinaire::EtBinaire => logique::bits(x, y, OpBits::Et),
            OpBinaire::OuBinaire => logique::bits(x, y, OpBits::Ou),
            OpBinaire::XorBinaire => logique::bits(x, y, OpBits::Xor),
            OpBinaire::Shl => logique::decalage(x, y, true),
            OpBinaire::Shr => logique::decalage(x, y, false),

            OpBinaire::EtLogique => Ok(booleen(!x.est_zero() && !y.est_zero())),
            OpBinaire::OuLogique => Ok(booleen(!x.est_zero() || !y.est_zero())),

            OpBinaire::Egal
            | OpBinaire::Different
            | OpBinaire::Inf
            | OpBinaire::InfEgal
            | OpBinaire::Sup
            | OpBinaire::SupEgal => {
                let Some(ord) = x.comparer(y) else {
                    return Err(GenreErreur::InternalError);
                };
                Ok(booleen(match op {
                    OpBinaire::Egal => ord == Ordering::Equal,
                    OpBinaire::Different => ord != Ordering::Equal,
                    OpBinaire::Inf => ord == Ordering::Less,
                    OpBinaire::InfEgal => ord != Ordering::Greater,
                    OpBinaire::Sup => ord == Ordering::Greater,
                    _ => ord != Ordering::Less,
                }))
            }
        }
    }
}
