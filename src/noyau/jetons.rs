// src/noyau/jetons.rs

use std::fmt;

use super::erreur::{Erreur, ErreurLex};

/// Base d’écriture d’un littéral.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Base {
    #[default]
    Decimale,
    Binaire,
    Octale,
    Hexa,
}

impl Base {
    pub fn radix(self) -> u32 {
        match self {
            Base::Decimale => 10,
            Base::Binaire => 2,
            Base::Octale => 8,
            Base::Hexa => 16,
        }
    }

    pub fn prefixe(self) -> &'static str {
        match self {
            Base::Decimale => "",
            Base::Binaire => "0b",
            Base::Octale => "0o",
            Base::Hexa => "0x",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tok {
    /// Littéral : texte sans préfixe (`1.5e3`, `FF`…) + base.
    Num { texte: String, base: Base },

    // Fonctions, constantes et variables : le choix se fait à l’évaluation.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^ ou **
    Percent,

    Amp,      // &
    Pipe,     // |
    CaretCaret, // ^^ (ou exclusif bit à bit)
    Tilde,    // ~
    Bang,     // ! (non logique préfixe ou factorielle postfixe)
    Shl,      // <<
    Shr,      // >>

    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,

    AndAnd,
    OrOr,

    Assign, // =

    LPar,
    RPar,
    Sep, // , ou ;

    Fin,
}

/// Jeton + position (octet) du premier caractère dans le texte source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Jeton {
    pub tok: Tok,
    pub pos: usize,
}

/// Opérateurs ASCII, les plus longs d’abord.
const OPERATEURS: &[(&str, Tok)] = &[
    ("**", Tok::Caret),
    ("^^", Tok::CaretCaret),
    ("<<", Tok::Shl),
    (">>", Tok::Shr),
    ("<=", Tok::Le),
    (">=", Tok::Ge),
    ("==", Tok::EqEq),
    ("!=", Tok::NotEq),
    ("&&", Tok::AndAnd),
    ("||", Tok::OrOr),
    ("+", Tok::Plus),
    ("-", Tok::Minus),
    ("*", Tok::Star),
    ("/", Tok::Slash),
    ("^", Tok::Caret),
    ("%", Tok::Percent),
    ("&", Tok::Amp),
    ("|", Tok::Pipe),
    ("~", Tok::Tilde),
    ("!", Tok::Bang),
    ("<", Tok::Lt),
    (">", Tok::Gt),
    ("=", Tok::Assign),
    ("(", Tok::LPar),
    (")", Tok::RPar),
    (",", Tok::Sep),
    (";", Tok::Sep),
];

/// Tokenize une chaîne en jetons positionnés (dernier jeton : `Fin`).
/// Supporte:
/// - décimaux `12`, `1.5`, `.5`, `2e-3`
/// - entiers préfixés `0b101`, `0o17`, `0xFF`
/// - identifiants [a-zA-Z_]+[0-9]* (casse conservée)
/// - opérateurs (plus long d’abord), parenthèses, séparateurs `,` `;`
/// - π, ×, ÷, − (signe moins unicode)
pub fn tokenize(s: &str) -> Result<Vec<Jeton>, Erreur> {
    let mut out = Vec::new();
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut i: usize = 0;

    let pos_de = |i: usize| chars.get(i).map_or(s.len(), |&(p, _)| p);

    while i < chars.len() {
        let (pos, c) = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Unicode usuels
        let unicode = match c {
            'π' => Some(Tok::Ident("pi".to_string())),
            '×' | '·' => Some(Tok::Star),
            '÷' => Some(Tok::Slash),
            '−' => Some(Tok::Minus),
            _ => None,
        };
        if let Some(tok) = unicode {
            out.push(Jeton { tok, pos });
            i += 1;
            continue;
        }

        // Nombres
        let point_decimal =
            c == '.' && chars.get(i + 1).is_some_and(|&(_, d)| d.is_ascii_digit());
        if c.is_ascii_digit() || point_decimal {
            let (tok, suite) = lire_nombre(&chars, i).map_err(|(e, j)| Erreur::new(e, pos_de(j)))?;
            out.push(Jeton { tok, pos });
            i = suite;
            continue;
        }

        // Identifiants : lettres/underscore puis chiffres
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].1.is_ascii_alphabetic() || chars[i].1 == '_') {
                i += 1;
            }
            while i < chars.len() && chars[i].1.is_ascii_digit() {
                i += 1;
            }
            let word: String = chars[start..i].iter().map(|&(_, c)| c).collect();
            out.push(Jeton {
                tok: Tok::Ident(word),
                pos,
            });
            continue;
        }

        // Opérateurs / ponctuation
        let reste = &s[pos..];
        if let Some((texte, tok)) = OPERATEURS.iter().find(|(t, _)| reste.starts_with(t)) {
            out.push(Jeton {
                tok: tok.clone(),
                pos,
            });
            i += texte.len();
            continue;
        }

        // `1.` isolé, `°`, guillemets, etc.
        return Err(Erreur::new(ErreurLex::InvalidCharacter, pos));
    }

    out.push(Jeton {
        tok: Tok::Fin,
        pos: s.len(),
    });
    Ok(out)
}

type Lecture = Result<(Tok, usize), (ErreurLex, usize)>;

fn lire_nombre(chars: &[(usize, char)], debut: usize) -> Lecture {
    let car = |i: usize| chars.get(i).map(|&(_, c)| c);

    // préfixe de base
    if car(debut) == Some('0') {
        let base = match car(debut + 1) {
            Some('b' | 'B') => Some(Base::Binaire),
            Some('o' | 'O') => Some(Base::Octale),
            Some('x' | 'X') => Some(Base::Hexa),
            _ => None,
        };
        if let Some(base) = base {
            return lire_prefixe(chars, debut + 2, base);
        }
    }

    let mut i = debut;
    let mut texte = String::new();

    while let Some(c) = car(i).filter(char::is_ascii_digit) {
        texte.push(c);
        i += 1;
    }

    if car(i) == Some('.') {
        texte.push('.');
        i += 1;
        let debut_frac = i;
        while let Some(c) = car(i).filter(char::is_ascii_digit) {
            texte.push(c);
            i += 1;
        }
        if i == debut_frac {
            return Err((ErreurLex::UnterminatedLiteral, i));
        }
        if car(i) == Some('.') {
            return Err((ErreurLex::InvalidCharacter, i));
        }
    }

    // exposant : seulement si un chiffre suit (éventuellement signé)
    if matches!(car(i), Some('e' | 'E')) {
        let signe = matches!(car(i + 1), Some('+' | '-'));
        let premier = if signe { i + 2 } else { i + 1 };
        if car(premier).is_some_and(|c| c.is_ascii_digit()) {
            texte.push('e');
            if signe {
                texte.extend(car(i + 1));
            }
            i = premier;
            while let Some(c) = car(i).filter(char::is_ascii_digit) {
                texte.push(c);
                i += 1;
            }
        }
    }

    Ok((
        Tok::Num {
            texte,
            base: Base::Decimale,
        },
        i,
    ))
}

fn lire_prefixe(chars: &[(usize, char)], debut: usize, base: Base) -> Lecture {
    let mut i = debut;
    let mut texte = String::new();
    while let Some(&(_, c)) = chars.get(i) {
        if c == '.' {
            return Err((ErreurLex::InvalidRadixDigit, i));
        }
        if !c.is_ascii_alphanumeric() {
            break;
        }
        if !c.is_digit(base.radix()) {
            return Err((ErreurLex::InvalidRadixDigit, i));
        }
        texte.push(c);
        i += 1;
    }
    if texte.is_empty() {
        return Err((ErreurLex::UnterminatedLiteral, i));
    }
    Ok((Tok::Num { texte, base }, i))
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tok::Num { texte, base } => return write!(f, "{}{texte}", base.prefixe()),
            Tok::Ident(name) => return write!(f, "{name}"),

            Tok::Plus => "+",
            Tok::Minus => "-",
            Tok::Star => "*",
            Tok::Slash => "/",
            Tok::Caret => "^",
            Tok::Percent => "%",
            Tok::Amp => "&",
            Tok::Pipe => "|",
            Tok::CaretCaret => "^^",
            Tok::Tilde => "~",
            Tok::Bang => "!",
            Tok::Shl => "<<",
            Tok::Shr => ">>",
            Tok::EqEq => "==",
            Tok::NotEq => "!=",
            Tok::Lt => "<",
            Tok::Le => "<=",
            Tok::Gt => ">",
            Tok::Ge => ">=",
            Tok::AndAnd => "&&",
            Tok::OrOr => "||",
            Tok::Assign => "=",

            Tok::LPar => "(",
            Tok::RPar => ")",
            Tok::Sep => ";",
            Tok::Fin => "⟂",
        };
        f.write_str(s)
    }
}

/// Format utilitaire (debug/“démarche”) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Jeton]) -> String {
    tokens
        .iter()
        .filter(|j| j.tok != Tok::Fin)
        .map(|j| j.tok.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
