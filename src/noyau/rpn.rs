// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de jetons en RPN (postfix)
// - Puis reconstruire Expr
//
// Règles:
// - Ident suivi de '(' => appel de fonction (nombre d’arguments compté ici,
//   arité vérifiée à l’évaluation)
// - '-', '+', '!', '~' en attente de valeur => opérateurs préfixes
// - '!' après une valeur => factorielle (sortie directe : précédence maximale)
// - Multiplication implicite : valeur suivie d’un identifiant ou de '(' ;
//   ')' ou '!' suivi d’un littéral. Elle lie moins que '^' et plus que '*'.
// - Affectation : uniquement en tête, `a = b = expr`
//
// Précédences (bas -> haut) :
//   || < && < | < ^^ < & < comparaisons < décalages < + - < * / %
//   < implicite < préfixes < ^ (droite) < ! postfixe

use super::erreur::{Erreur, ErreurSyntaxe, GenreErreur};
use super::expr::{Expr, OpBinaire, OpUnaire};
use super::jetons::{Base, Jeton, Tok};

const PREC_IMPLICITE: u8 = 10;
const PREC_PREFIXE: u8 = 11;

fn precedence(op: OpBinaire) -> u8 {
    match op {
        OpBinaire::OuLogique => 1,
        OpBinaire::EtLogique => 2,
        OpBinaire::OuBinaire => 3,
        OpBinaire::XorBinaire => 4,
        OpBinaire::EtBinaire => 5,
        OpBinaire::Egal
        | OpBinaire::Different
        | OpBinaire::Inf
        | OpBinaire::InfEgal
        | OpBinaire::Sup
        | OpBinaire::SupEgal => 6,
        OpBinaire::Shl | OpBinaire::Shr => 7,
        OpBinaire::Add | OpBinaire::Sub => 8,
        OpBinaire::Mul | OpBinaire::Div | OpBinaire::Mod => 9,
        OpBinaire::Pow => 12,
    }
}

fn is_right_associative(op: OpBinaire) -> bool {
    matches!(op, OpBinaire::Pow)
}

/// Opérateur binaire d’un jeton placé après une valeur.
fn op_binaire(t: &Tok) -> Option<OpBinaire> {
    Some(match t {
        Tok::Plus => OpBinaire::Add,
        Tok::Minus => OpBinaire::Sub,
        Tok::Star => OpBinaire::Mul,
        Tok::Slash => OpBinaire::Div,
        Tok::Caret => OpBinaire::Pow,
        Tok::Percent => OpBinaire::Mod,
        Tok::Amp => OpBinaire::EtBinaire,
        Tok::Pipe => OpBinaire::OuBinaire,
        Tok::CaretCaret => OpBinaire::XorBinaire,
        Tok::Shl => OpBinaire::Shl,
        Tok::Shr => OpBinaire::Shr,
        Tok::EqEq => OpBinaire::Egal,
        Tok::NotEq => OpBinaire::Different,
        Tok::Lt => OpBinaire::Inf,
        Tok::Le => OpBinaire::InfEgal,
        Tok::Gt => OpBinaire::Sup,
        Tok::Ge => OpBinaire::SupEgal,
        Tok::AndAnd => OpBinaire::EtLogique,
        Tok::OrOr => OpBinaire::OuLogique,
        _ => return None,
    })
}

/// Opérateur préfixe d’un jeton placé en attente de valeur.
fn op_prefixe(t: &Tok) -> Option<OpUnaire> {
    Some(match t {
        Tok::Minus => OpUnaire::Moins,
        Tok::Plus => OpUnaire::Plus,
        Tok::Bang => OpUnaire::NonLogique,
        Tok::Tilde => OpUnaire::NonBinaire,
        _ => return None,
    })
}

/// Élément de la RPN.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElemRpn {
    Num { texte: String, base: Base, pos: usize },
    Var { nom: String, pos: usize },
    Unaire { op: OpUnaire, pos: usize },
    Binaire { op: OpBinaire, pos: usize },
    Appel { nom: String, nb_args: usize, pos: usize },
}

#[derive(Debug)]
struct Appel {
    nom: String,
    pos: usize,
    nb_args: usize,
}

#[derive(Debug)]
enum Pile {
    Op { op: OpBinaire, prec: u8, pos: usize },
    Prefixe { op: OpUnaire, pos: usize },
    Par { pos: usize, appel: Option<Appel> },
}

/// Ce qui termine la dernière valeur lue (décide de la multiplication implicite).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FinValeur {
    Litteral,
    Ident,
    Fermant, // ')' ou '!' postfixe
}

fn syntaxe(e: ErreurSyntaxe, pos: usize) -> Erreur {
    Erreur::new(e, pos)
}

fn vers_rpn(p: Pile) -> Option<ElemRpn> {
    match p {
        Pile::Op { op, pos, .. } => Some(ElemRpn::Binaire { op, pos }),
        Pile::Prefixe { op, pos } => Some(ElemRpn::Unaire { op, pos }),
        Pile::Par { .. } => None,
    }
}

/// Dépile les opérateurs qui doivent sortir avant un binaire de précédence `p`.
fn depiler_pour(ops: &mut Vec<Pile>, out: &mut Vec<ElemRpn>, p: u8, droite: bool) {
    while let Some(top) = ops.last() {
        let p_top = match top {
            Pile::Op { prec, .. } => *prec,
            Pile::Prefixe { .. } => PREC_PREFIXE,
            Pile::Par { .. } => break,
        };
        let doit_pop = if droite { p_top > p } else { p_top >= p };
        if !doit_pop {
            break;
        }
        if let Some(e) = ops.pop().and_then(vers_rpn) {
            out.push(e);
        }
    }
}

/// Dépile jusqu’à la parenthèse ouvrante (exclue, laissée sur la pile).
fn depiler_jusqua_par(ops: &mut Vec<Pile>, out: &mut Vec<ElemRpn>) -> bool {
    while let Some(top) = ops.last() {
        if matches!(top, Pile::Par { .. }) {
            return true;
        }
        if let Some(e) = ops.pop().and_then(vers_rpn) {
            out.push(e);
        }
    }
    false
}

fn pousser_binaire(
    ops: &mut Vec<Pile>,
    out: &mut Vec<ElemRpn>,
    op: OpBinaire,
    prec: u8,
    pos: usize,
) {
    depiler_pour(ops, out, prec, is_right_associative(op));
    ops.push(Pile::Op { op, prec, pos });
}

/// Convertit une suite de jetons (terminée par `Fin`) en RPN.
///
/// Exemple:
///   jetons: 2 x ^ 2
///   rpn:    2 x 2 ^ *
pub fn to_rpn(tokens: &[Jeton]) -> Result<Vec<ElemRpn>, Erreur> {
    let mut out: Vec<ElemRpn> = Vec::new();
    let mut ops: Vec<Pile> = Vec::new();

    // None = on attend une valeur (début, après opérateur, '(' ou séparateur)
    let mut precedent: Option<FinValeur> = None;
    let mut appel_en_attente: Option<(String, usize)> = None;
    let mut dernier_tok: Option<&Tok> = None;

    for (i, j) in tokens.iter().enumerate() {
        let pos = j.pos;
        match &j.tok {
            Tok::Num { texte, base } => {
                match precedent {
                    None => {}
                    Some(FinValeur::Fermant) => {
                        pousser_binaire(&mut ops, &mut out, OpBinaire::Mul, PREC_IMPLICITE, pos)
                    }
                    Some(_) => return Err(syntaxe(ErreurSyntaxe::TrailingInput, pos)),
                }
                out.push(ElemRpn::Num {
                    texte: texte.clone(),
                    base: *base,
                    pos,
                });
                precedent = Some(FinValeur::Litteral);
            }

            Tok::Ident(nom) => {
                if precedent.is_some() {
                    pousser_binaire(&mut ops, &mut out, OpBinaire::Mul, PREC_IMPLICITE, pos);
                }
                let est_appel = tokens.get(i + 1).is_some_and(|s| s.tok == Tok::LPar);
                if est_appel {
                    appel_en_attente = Some((nom.clone(), pos));
                    precedent = None;
                } else {
                    out.push(ElemRpn::Var {
                        nom: nom.clone(),
                        pos,
                    });
                    precedent = Some(FinValeur::Ident);
                }
            }

            Tok::LPar => {
                let appel = appel_en_attente.take();
                if appel.is_none() && precedent.is_some() {
                    pousser_binaire(&mut ops, &mut out, OpBinaire::Mul, PREC_IMPLICITE, pos);
                }
                ops.push(Pile::Par {
                    pos,
                    appel: appel.map(|(nom, pos)| Appel {
                        nom,
                        pos,
                        nb_args: 0,
                    }),
                });
                precedent = None;
            }

            Tok::Sep => {
                if !depiler_jusqua_par(&mut ops, &mut out) {
                    return Err(syntaxe(ErreurSyntaxe::UnexpectedToken, pos));
                }
                let Some(Pile::Par {
                    appel: Some(appel), ..
                }) = ops.last_mut()
                else {
                    return Err(syntaxe(ErreurSyntaxe::UnexpectedToken, pos));
                };
                if precedent.is_none() {
                    return Err(syntaxe(ErreurSyntaxe::MissingOperand, pos));
                }
                appel.nb_args += 1;
                precedent = None;
            }

            Tok::RPar => {
                if !depiler_jusqua_par(&mut ops, &mut out) {
                    return Err(syntaxe(ErreurSyntaxe::UnbalancedParentheses, pos));
                }
                let Some(Pile::Par { appel, .. }) = ops.pop() else {
                    return Err(Erreur::interne("pile RPN sans parenthèse", Some(pos)));
                };
                match appel {
                    Some(Appel { nom, pos, nb_args }) => {
                        let nb_args = match precedent {
                            Some(_) => nb_args + 1,
                            None if nb_args == 0 && dernier_tok == Some(&Tok::LPar) => 0,
                            None => return Err(syntaxe(ErreurSyntaxe::MissingOperand, j.pos)),
                        };
                        out.push(ElemRpn::Appel { nom, nb_args, pos });
                    }
                    None => {
                        if precedent.is_none() {
                            return Err(syntaxe(ErreurSyntaxe::MissingOperand, pos));
                        }
                    }
                }
                precedent = Some(FinValeur::Fermant);
            }

            Tok::Bang if precedent.is_some() => {
                // factorielle : s’applique à la valeur qui précède
                out.push(ElemRpn::Unaire {
                    op: OpUnaire::Factorielle,
                    pos,
                });
                precedent = Some(FinValeur::Fermant);
            }

            Tok::Assign => return Err(syntaxe(ErreurSyntaxe::UnexpectedToken, pos)),

            Tok::Fin => {
                if precedent.is_none() {
                    if out.is_empty() && ops.is_empty() {
                        return Err(Erreur::new(GenreErreur::InvalidExpression, pos));
                    }
                    return Err(syntaxe(ErreurSyntaxe::MissingOperand, pos));
                }
                break;
            }

            t => {
                if precedent.is_none() {
                    let Some(op) = op_prefixe(t) else {
                        return Err(syntaxe(ErreurSyntaxe::MissingOperand, pos));
                    };
                    ops.push(Pile::Prefixe { op, pos });
                } else {
                    let Some(op) = op_binaire(t) else {
                        return Err(syntaxe(ErreurSyntaxe::UnexpectedToken, pos));
                    };
                    pousser_binaire(&mut ops, &mut out, op, precedence(op), pos);
                    precedent = None;
                }
            }
        }
        dernier_tok = Some(&j.tok);
    }

    // vide la pile ops
    while let Some(p) = ops.pop() {
        if let Pile::Par { pos, .. } = p {
            return Err(syntaxe(ErreurSyntaxe::UnbalancedParentheses, pos));
        }
        if let Some(e) = vers_rpn(p) {
            out.push(e);
        }
    }

    Ok(out)
}

/// Profondeur maximale d’imbrication (parenthèses à droite, préfixes, `^`,
/// appels) ; les chaînes d’opérateurs binaires restent à plat.
pub const PROFONDEUR_MAX: usize = 256;

/// Construit une Expr à partir d’une RPN.
pub fn from_rpn(rpn: &[ElemRpn]) -> Result<Expr, Erreur> {
    // (nœud, profondeur)
    let mut st: Vec<(Expr, usize)> = Vec::new();

    let trop_profond = |p: usize, pos: usize| -> Result<usize, Erreur> {
        if p > PROFONDEUR_MAX {
            return Err(Erreur::new(GenreErreur::ComputationTooExpensive, pos));
        }
        Ok(p)
    };

    for e in rpn.iter().cloned() {
        match e {
            ElemRpn::Num { texte, base, pos } => st.push((Expr::Litteral { texte, base, pos }, 1)),
            ElemRpn::Var { nom, pos } => st.push((Expr::Var { nom, pos }, 1)),

            ElemRpn::Unaire { op, pos } => {
                let (x, p) = st
                    .pop()
                    .ok_or_else(|| syntaxe(ErreurSyntaxe::MissingOperand, pos))?;
                let p = trop_profond(p + 1, pos)?;
                st.push((
                    Expr::Unaire {
                        op,
                        x: Box::new(x),
                        pos,
                    },
                    p,
                ));
            }

            ElemRpn::Binaire { op, pos } => {
                let (b, pb) = st
                    .pop()
                    .ok_or_else(|| syntaxe(ErreurSyntaxe::MissingOperand, pos))?;
                let (a, pa) = st
                    .pop()
                    .ok_or_else(|| syntaxe(ErreurSyntaxe::MissingOperand, pos))?;
                // prolonger une chaîne n’approfondit que du côté droit
                let p = match a {
                    Expr::Chaine { .. } => pa.max(pb + 1),
                    _ => pa.max(pb) + 1,
                };
                let p = trop_profond(p, pos)?;
                st.push((Expr::binaire(a, op, b, pos), p));
            }

            ElemRpn::Appel { nom, nb_args, pos } => {
                if st.len() < nb_args {
                    return Err(syntaxe(ErreurSyntaxe::MissingOperand, pos));
                }
                let args = st.split_off(st.len() - nb_args);
                let p = trop_profond(args.iter().map(|(_, p)| *p).max().unwrap_or(0) + 1, pos)?;
                let args = args.into_iter().map(|(a, _)| a).collect();
                st.push((Expr::Appel { nom, args, pos }, p));
            }
        }
    }

    match (st.pop(), st.is_empty()) {
        (Some((e, _)), true) => Ok(e),
        _ => Err(Erreur::sans_position(GenreErreur::InvalidExpression)),
    }
}

/// Analyse complète : préfixe d’affectations `a = b = ...` puis expression.
pub fn parse(tokens: &[Jeton]) -> Result<Expr, Erreur> {
    let mut cibles: Vec<(String, usize)> = Vec::new();
    let mut reste = tokens;
    while let [
        Jeton {
            tok: Tok::Ident(nom),
            pos,
        },
        Jeton {
            tok: Tok::Assign, ..
        },
        suite @ ..,
    ] = reste
    {
        cibles.push((nom.clone(), *pos));
        reste = suite;
    }

    if !cibles.is_empty() && matches!(reste.first().map(|j| &j.tok), Some(Tok::Fin)) {
        let pos = reste.first().map_or(0, |j| j.pos);
        return Err(syntaxe(ErreurSyntaxe::MissingOperand, pos));
    }

    let rpn = to_rpn(reste)?;
    tracing::debug!(rpn = %format_rpn(&rpn), "rpn");

    let mut e = from_rpn(&rpn)?;
    for (nom, pos) in cibles.into_iter().rev() {
        e = Expr::Affect {
            nom,
            valeur: Box::new(e),
            pos,
        };
    }
    Ok(e)
}

/// Format utilitaire (debug) : RPN en texte.
pub fn format_rpn(rpn: &[ElemRpn]) -> String {
    rpn.iter()
        .map(|e| match e {
            ElemRpn::Num { texte, base, .. } => format!("{}{texte}", base.prefixe()),
            ElemRpn::Var { nom, .. } => nom.clone(),
            ElemRpn::Unaire { op, .. } => match op {
                OpUnaire::Moins => "neg".to_string(),
                OpUnaire::Plus => "pos".to_string(),
                OpUnaire::NonLogique => "!".to_string(),
                OpUnaire::NonBinaire => "~".to_string(),
                OpUnaire::Factorielle => "fact".to_string(),
            },
            ElemRpn::Binaire { op, .. } => op.symbole().to_string(),
            ElemRpn::Appel { nom, nb_args, .. } => format!("{nom}/{nb_args}"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::jetons::tokenize;
    use pretty_assertions::assert_eq;

    fn arbre(s: &str) -> String {
        parse(&tokenize(s).unwrap()).unwrap().to_string()
    }

    fn erreur(s: &str) -> Erreur {
        parse(&tokenize(s).unwrap()).unwrap_err()
    }

    #[test]
    fn precedences_de_base() {
        assert_eq!(arbre("1+2*3"), "(1+(2*3))");
        assert_eq!(arbre("2^3^2"), "(2^(3^2))");
        assert_eq!(arbre("10-4-3"), "((10-4)-3)");
        assert_eq!(arbre("1<<2+3"), "(1<<(2+3))");
        assert_eq!(arbre("1|2&3"), "(1|(2&3))");
        assert_eq!(arbre("1||2&&3"), "(1||(2&&3))");
        assert_eq!(arbre("a==b+1"), "(a==(b+1))");
        assert_eq!(arbre("7%3*2"), "((7%3)*2)");
    }

    #[test]
    fn unaires_et_factorielle() {
        assert_eq!(arbre("-2^2"), "(-(2^2))");
        assert_eq!(arbre("2^-1"), "(2^(-1))");
        assert_eq!(arbre("-3!"), "(-(3!))");
        assert_eq!(arbre("2^3!"), "(2^(3!))");
        assert_eq!(arbre("!a && ~b"), "((!a)&&(~b))");
        assert_eq!(arbre("--1"), "(-(-1))");
    }

    #[test]
    fn multiplication_implicite_epinglee() {
        assert_eq!(arbre("2x^2"), "(2*(x^2))");
        assert_eq!(arbre("2^2x"), "((2^2)*x)");
        assert_eq!(arbre("1/2x"), "(1/(2*x))");
        assert_eq!(arbre("2x/3"), "((2*x)/3)");
        assert_eq!(arbre("3(4+5)"), "(3*(4+5))");
        assert_eq!(arbre("(1)(2)"), "(1*2)");
        assert_eq!(arbre("(1)2"), "(1*2)");
        assert_eq!(arbre("2sin(x)"), "(2*sin(x))");
        assert_eq!(arbre("x y"), "(x*y)");
    }

    #[test]
    fn appels() {
        assert_eq!(arbre("max(1;2,3)"), "max(1;2;3)");
        assert_eq!(arbre("f()"), "f()");
        assert_eq!(arbre("sin(cos(0)+1)"), "sin((cos(0)+1))");
        assert_eq!(arbre("log(2; 8)^2"), "(log(2;8)^2)");
    }

    #[test]
    fn affectations() {
        assert_eq!(arbre("x = 5"), "x = 5");
        assert_eq!(arbre("a = b = 2+1"), "a = b = (2+1)");
    }

    #[test]
    fn erreurs_de_syntaxe() {
        assert_eq!(erreur("2+"), Erreur::new(ErreurSyntaxe::MissingOperand, 2));
        assert_eq!(erreur("()"), Erreur::new(ErreurSyntaxe::MissingOperand, 1));
        assert_eq!(erreur("(1+2"), Erreur::new(ErreurSyntaxe::UnbalancedParentheses, 0));
        assert_eq!(erreur("1+2)"), Erreur::new(ErreurSyntaxe::UnbalancedParentheses, 3));
        assert_eq!(erreur("2 3"), Erreur::new(ErreurSyntaxe::TrailingInput, 2));
        assert_eq!(erreur("1,2"), Erreur::new(ErreurSyntaxe::UnexpectedToken, 1));
        assert_eq!(erreur("1 = 2"), Erreur::new(ErreurSyntaxe::UnexpectedToken, 2));
        assert_eq!(erreur("f(1;)"), Erreur::new(ErreurSyntaxe::MissingOperand, 4));
        assert_eq!(erreur("*2"), Erreur::new(ErreurSyntaxe::MissingOperand, 0));
        assert_eq!(erreur("x ="), Erreur::new(ErreurSyntaxe::MissingOperand, 3));
        assert_eq!(
            erreur("   "),
            Erreur::new(GenreErreur::InvalidExpression, 3)
        );
    }

    #[test]
    fn profondeur_plafonnee() {
        let ok = format!("{}1", "-".repeat(PROFONDEUR_MAX - 1));
        assert!(parse(&tokenize(&ok).unwrap()).is_ok());
        let trop = format!("{}1", "-".repeat(PROFONDEUR_MAX + 10));
        assert_eq!(
            erreur(&trop).genre,
            GenreErreur::ComputationTooExpensive
        );
        // les parenthèses seules n’ajoutent pas de nœud
        let parens = format!("{}1{}", "(".repeat(400), ")".repeat(400));
        assert_eq!(arbre(&parens), "1");

        // longue chaîne à plat : acceptée
        let somme = vec!["1"; 3 * PROFONDEUR_MAX].join("+");
        assert!(parse(&tokenize(&somme).unwrap()).is_ok());
        let produit = vec!["2"; PROFONDEUR_MAX + 1].join("*");
        assert!(parse(&tokenize(&produit).unwrap()).is_ok());

        // imbrication à droite : refusée
        let k = PROFONDEUR_MAX + 1;
        let droite = format!("{}1{}", "1+(".repeat(k), ")".repeat(k));
        assert_eq!(erreur(&droite).genre, GenreErreur::ComputationTooExpensive);
        let tour = vec!["2"; PROFONDEUR_MAX + 2].join("^");
        assert_eq!(erreur(&tour).genre, GenreErreur::ComputationTooExpensive);
    }

    #[test]
    fn chaines_gauches_aplaties() {
        assert_eq!(arbre("(1+2)*3"), "((1+2)*3)");
        assert_eq!(arbre("1-2+3-4"), "(((1-2)+3)-4)");
        assert_eq!(arbre("((2^3)^2)^1"), "(((2^3)^2)^1)");
        let e = parse(&tokenize("1+2*3-4").unwrap()).unwrap();
        let Expr::Chaine { suite, .. } = &e else {
            panic!("chaîne attendue : {e:?}");
        };
        assert_eq!(suite.len(), 2);
        assert_eq!(e.taille(), 7);
    }

    #[test]
    fn rpn_lisible() {
        let rpn = to_rpn(&tokenize("2x^2").unwrap()).unwrap();
        assert_eq!(format_rpn(&rpn), "2 x 2 ^ *");
    }
}
