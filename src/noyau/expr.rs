// src/noyau/expr.rs
//
// Arbre d’expression construit par rpn.rs, consommé une seule fois par eval.rs.
// - Litteral : texte brut + base (la conversion en Nombre se fait à l’évaluation)
// - Var : référence (variable ou constante, décidé à l’évaluation)
// - Affect : `nom = expr`
// - Unaire : opérateur étiqueté
// - Chaine : épine gauche aplatie, `((a op1 b) op2 c) ...` ; une suite
//   d’opérateurs binaires n’ajoute donc pas de profondeur
// - Appel : fonction + arguments ordonnés
//
// Chaque nœud garde la position (octet) de son jeton pour l’UI.

use std::fmt;

use super::jetons::Base;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpUnaire {
    Moins,
    Plus,
    NonLogique,  // !x
    NonBinaire,  // ~x
    Factorielle, // x!
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpBinaire {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,

    EtBinaire,
    OuBinaire,
    XorBinaire,
    Shl,
    Shr,

    Egal,
    Different,
    Inf,
    InfEgal,
    Sup,
    SupEgal,

    EtLogique,
    OuLogique,
}

impl OpBinaire {
    pub fn symbole(self) -> &'static str {
        match self {
            OpBinaire::Add => "+",
            OpBinaire::Sub => "-",
            OpBinaire::Mul => "*",
            OpBinaire::Div => "/",
            OpBinaire::Pow => "^",
            OpBinaire::Mod => "%",
            OpBinaire::EtBinaire => "&",
            OpBinaire::OuBinaire => "|",
            OpBinaire::XorBinaire => "^^",
            OpBinaire::Shl => "<<",
            OpBinaire::Shr => ">>",
            OpBinaire::Egal => "==",
            OpBinaire::Different => "!=",
            OpBinaire::Inf => "<",
            OpBinaire::InfEgal => "<=",
            OpBinaire::Sup => ">",
            OpBinaire::SupEgal => ">=",
            OpBinaire::EtLogique => "&&",
            OpBinaire::OuLogique => "||",
        }
    }
}

/// `op x` appliqué au résultat courant d’une chaîne.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maillon {
    pub op: OpBinaire,
    pub x: Expr,
    pub pos: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Litteral {
        texte: String,
        base: Base,
        pos: usize,
    },
    Var {
        nom: String,
        pos: usize,
    },
    Affect {
        nom: String,
        valeur: Box<Expr>,
        pos: usize,
    },
    Unaire {
        op: OpUnaire,
        x: Box<Expr>,
        pos: usize,
    },
    Chaine {
        tete: Box<Expr>,
        suite: Vec<Maillon>,
    },
    Appel {
        nom: String,
        args: Vec<Expr>,
        pos: usize,
    },
}

impl Expr {
    /// `a op b` : prolonge la chaîne de `a` si c’en est une.
    pub fn binaire(a: Expr, op: OpBinaire, b: Expr, pos: usize) -> Expr {
        let maillon = Maillon { op, x: b, pos };
        match a {
            Expr::Chaine { tete, mut suite } => {
                suite.push(maillon);
                Expr::Chaine { tete, suite }
            }
            a => Expr::Chaine {
                tete: Box::new(a),
                suite: vec![maillon],
            },
        }
    }

    /// Position du jeton ; pour une chaîne, celle du dernier opérateur.
    pub fn pos(&self) -> usize {
        match self {
            Expr::Litteral { pos, .. }
            | Expr::Var { pos, .. }
            | Expr::Affect { pos, .. }
            | Expr::Unaire { pos, .. }
            | Expr::Appel { pos, .. } => *pos,
            Expr::Chaine { tete, suite } => suite.last().map_or_else(|| tete.pos(), |m| m.pos),
        }
    }

    /// Nombre de nœuds (trace de debug).
    pub fn taille(&self) -> usize {
        match self {
            Expr::Litteral { .. } | Expr::Var { .. } => 1,
            Expr::Affect { valeur, .. } => 1 + valeur.taille(),
            Expr::Unaire { x, .. } => 1 + x.taille(),
            Expr::Chaine { tete, suite } => {
                tete.taille() + suite.iter().map(|m| 1 + m.x.taille()).sum::<usize>()
            }
            Expr::Appel { args, .. } => 1 + args.iter().map(Expr::taille).sum::<usize>(),
        }
    }
}

/* ------------------------ Affichage debug (entièrement parenthésé) ------------------------ */

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Litteral { texte, base, .. } => write!(f, "{}{texte}", base.prefixe()),
            Expr::Var { nom, .. } => write!(f, "{nom}"),
            Expr::Affect { nom, valeur, .. } => write!(f, "{nom} = {valeur}"),
            Expr::Unaire { op, x, .. } => match op {
                OpUnaire::Moins => write!(f, "(-{x})"),
                OpUnaire::Plus => write!(f, "(+{x})"),
                OpUnaire::NonLogique => write!(f, "(!{x})"),
                OpUnaire::NonBinaire => write!(f, "(~{x})"),
                OpUnaire::Factorielle => write!(f, "({x}!)"),
            },
            Expr::Chaine { tete, suite } => {
                write!(f, "{}{tete}", "(".repeat(suite.len()))?;
                for m in suite {
                    write!(f, "{}{})", m.op.symbole(), m.x)?;
                }
                Ok(())
            }
            Expr::Appel { nom, args, .. } => {
                write!(f, "{nom}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ";")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(t: &str) -> Box<Expr> {
        Box::new(Expr::Litteral {
            texte: t.into(),
            base: Base::Decimale,
            pos: 0,
        })
    }

    #[test]
    fn affichage_parenthese() {
        let fact = Expr::Unaire {
            op: OpUnaire::Factorielle,
            x: lit("3"),
            pos: 2,
        };
        let e = Expr::binaire(*lit("2"), OpBinaire::Mul, fact, 1);
        assert_eq!(e.to_string(), "(2*(3!))");
        assert_eq!(e.taille(), 4);
        assert_eq!(e.pos(), 1);
    }

    #[test]
    fn chaine_aplatie() {
        let e = Expr::binaire(*lit("10"), OpBinaire::Sub, *lit("4"), 2);
        let e = Expr::binaire(e, OpBinaire::Sub, *lit("3"), 4);
        let Expr::Chaine { suite, .. } = &e else {
            panic!("chaîne attendue : {e:?}");
        };
        assert_eq!(suite.len(), 2);
        assert_eq!(e.to_string(), "((10-4)-3)");
        assert_eq!(e.taille(), 5);
        assert_eq!(e.pos(), 4);
    }

    #[test]
    fn affichage_appel_et_base() {
        let e = Expr::Appel {
            nom: "max".into(),
            args: vec![
                Expr::Litteral {
                    texte: "FF".into(),
                    base: Base::Hexa,
                    pos: 4,
                },
                *lit("1"),
            ],
            pos: 0,
        };
        assert_eq!(e.to_string(), "max(0xFF;1)");
    }
}
