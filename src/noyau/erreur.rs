// src/noyau/erreur.rs
//
// Taxonomie fermée des erreurs du noyau.
// - Un seul type d’erreur traverse jetons -> rpn -> eval.
// - Le texte (Display) sert au diagnostic ; l’UI localise en matchant sur le genre.

use thiserror::Error;

/// Erreurs du lexer (jetons.rs).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ErreurLex {
    #[error("unterminated literal")]
    UnterminatedLiteral,
    #[error("invalid character")]
    InvalidCharacter,
    #[error("invalid digit for this radix")]
    InvalidRadixDigit,
}

/// Erreurs de syntaxe (rpn.rs).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ErreurSyntaxe {
    #[error("unexpected token")]
    UnexpectedToken,
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,
    #[error("missing operand")]
    MissingOperand,
    #[error("trailing input")]
    TrailingInput,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GenreErreur {
    #[error("{0}")]
    Lex(ErreurLex),
    #[error("{0}")]
    Syntaxe(ErreurSyntaxe),
    #[error("division by zero")]
    DivisionByZero,
    #[error("invalid expression")]
    InvalidExpression,
    #[error("unknown function or variable")]
    UnknownFunctionOrVariable,
    #[error("cannot operate on a NaN")]
    CannotOperateOnNaN,
    #[error("underflow - tiny result is out of number range")]
    Underflow,
    #[error("overflow - huge result is out of number range")]
    Overflow,
    #[error("overflow - logic result exceeds maximum of 256 bits")]
    LogicOverflow,
    #[error("overflow - integer result exceeds maximum limit for integers")]
    IntegerOverflow,
    #[error("too time consuming computation was rejected")]
    ComputationTooExpensive,
    #[error("wrong number of arguments")]
    WrongNumberOfArguments,
    #[error("does not take NaN as an argument")]
    DoesNotAcceptNaN,
    #[error("result out of range")]
    ResultOutOfRange,
    #[error("undefined for argument domain")]
    UndefinedForArgumentDomain,
    #[error("internal error, please report a bug")]
    InternalError,
    #[error("reserved name, please choose another")]
    ReservedName,
}

impl GenreErreur {
    /// Vrai seulement pour un bug du moteur (jamais pour une faute de saisie).
    pub fn est_interne(self) -> bool {
        matches!(self, GenreErreur::InternalError)
    }
}

impl From<ErreurLex> for GenreErreur {
    fn from(e: ErreurLex) -> Self {
        GenreErreur::Lex(e)
    }
}

impl From<ErreurSyntaxe> for GenreErreur {
    fn from(e: ErreurSyntaxe) -> Self {
        GenreErreur::Syntaxe(e)
    }
}

/// Erreur complète : genre + position (octet) éventuelle dans le texte source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("{genre}")]
pub struct Erreur {
    pub genre: GenreErreur,
    pub pos: Option<usize>,
}

impl Erreur {
    pub fn new(genre: impl Into<GenreErreur>, pos: usize) -> Self {
        Self {
            genre: genre.into(),
            pos: Some(pos),
        }
    }

    pub fn sans_position(genre: impl Into<GenreErreur>) -> Self {
        Self {
            genre: genre.into(),
            pos: None,
        }
    }

    /// Seul chemin de construction d’une InternalError : trace + position.
    pub fn interne(contexte: &str, pos: Option<usize>) -> Self {
        tracing::warn!(contexte, ?pos, "erreur interne du moteur");
        Self {
            genre: GenreErreur::InternalError,
            pos,
        }
    }
}

impl From<GenreErreur> for Erreur {
    fn from(genre: GenreErreur) -> Self {
        Erreur::sans_position(genre)
    }
}

pub type Resultat<T> = Result<T, Erreur>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_stables() {
        assert_eq!(GenreErreur::DivisionByZero.to_string(), "division by zero");
        assert_eq!(
            GenreErreur::Lex(ErreurLex::InvalidRadixDigit).to_string(),
            "invalid digit for this radix"
        );
        let e = Erreur::new(ErreurSyntaxe::MissingOperand, 3);
        assert_eq!(e.to_string(), "missing operand");
        assert_eq!(e.pos, Some(3));
    }

    #[test]
    fn interne_distinguable() {
        let e = Erreur::interne("test", None);
        assert!(e.genre.est_interne());
        assert!(!GenreErreur::Overflow.est_interne());
    }
}
