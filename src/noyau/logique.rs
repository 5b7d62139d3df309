// src/noyau/logique.rs
//
// Opérations entières et bit à bit.
// - opérandes tronqués vers zéro avant calcul
// - bit à bit : complément à deux (BigInt), plafond 256 bits (LogicOverflow)
// - entiers génériques (idiv, gcd) : plafond 1024 bits (IntegerOverflow)
// - idiv / mod : exacts par alignement des exposants (pas de division arrondie)
// - résultats entiers conservés exacts par Nombre jusqu’à 1024 bits

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use std::cmp::Ordering;

use super::budget::Budget;
use super::erreur::GenreErreur;
use super::nombre::{pow10, Nombre, BITS_EXACTS};

pub const BITS_LOGIQUE: u64 = 256;
pub const BITS_ENTIER: u64 = BITS_EXACTS;

fn entier_logique(x: &Nombre) -> Result<BigInt, GenreErreur> {
    x.vers_entier(BITS_LOGIQUE, GenreErreur::LogicOverflow)
}

fn resultat_logique(v: BigInt) -> Result<Nombre, GenreErreur> {
    if v.bits() > BITS_LOGIQUE {
        return Err(GenreErreur::LogicOverflow);
    }
    Nombre::entier(v)
}

fn resultat_entier(v: BigInt) -> Result<Nombre, GenreErreur> {
    if v.bits() > BITS_ENTIER {
        return Err(GenreErreur::IntegerOverflow);
    }
    Nombre::entier(v)
}

/* ------------------------ Bit à bit ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpBits {
    Et,
    Ou,
    Xor,
}

pub fn bits(a: &Nombre, b: &Nombre, op: OpBits) -> Result<Nombre, GenreErreur> {
    let a = entier_logique(a)?;
    let b = entier_logique(b)?;
    resultat_logique(match op {
        OpBits::Et => a & b,
        OpBits::Ou => a | b,
        OpBits::Xor => a ^ b,
    })
}

/// Repli de `and(x1; x2; …)` & co.
pub fn bits_liste(args: &[Nombre], op: OpBits) -> Result<Nombre, GenreErreur> {
    let (premier, reste) = args
        .split_first()
        .ok_or(GenreErreur::WrongNumberOfArguments)?;
    let mut acc = Nombre::entier(entier_logique(premier)?)?;
    for x in reste {
        acc = bits(&acc, x, op)?;
    }
    Ok(acc)
}

/// ~x = -x - 1
pub fn non(x: &Nombre) -> Result<Nombre, GenreErreur> {
    resultat_logique(!entier_logique(x)?)
}

/// Décalage arithmétique ; n négatif inverse le sens.
pub fn decalage(x: &Nombre, n: &Nombre, gauche: bool) -> Result<Nombre, GenreErreur> {
    let v = entier_logique(x)?;
    let n = n
        .tronquer()
        .vers_i64()
        .ok_or(GenreErreur::LogicOverflow)?;
    let n = if gauche { n } else { -n };

    if v.is_zero() {
        return Ok(Nombre::zero());
    }
    if n > BITS_LOGIQUE as i64 {
        return Err(GenreErreur::LogicOverflow);
    }
    let r = if n >= 0 {
        v << (n as u64)
    } else {
        // au-delà de 256 bits tout est décalé : 0 ou -1
        v >> n.unsigned_abs().min(BITS_LOGIQUE + 1)
    };
    resultat_logique(r)
}

fn nb_bits(n: &Nombre) -> Result<u64, GenreErreur> {
    let n = n.tronquer();
    if n.est_negatif() {
        return Err(GenreErreur::UndefinedForArgumentDomain);
    }
    match n.vers_i64() {
        Some(k) if k as u64 <= BITS_LOGIQUE => Ok(k as u64),
        _ => Err(GenreErreur::LogicOverflow),
    }
}

/// Garde les n bits de poids faible.
pub fn masque(x: &Nombre, n: &Nombre) -> Result<Nombre, GenreErreur> {
    let v = entier_logique(x)?;
    let n = nb_bits(n)?;
    let m = (BigInt::one() << n) - 1u32;
    resultat_logique(v & m)
}

/// Interprète les n bits de poids faible en complément à deux.
pub fn demasque(x: &Nombre, n: &Nombre) -> Result<Nombre, GenreErreur> {
    let v = entier_logique(x)?;
    let n = nb_bits(n)?;
    if n == 0 {
        return Ok(Nombre::zero());
    }
    let m = (BigInt::one() << n) - 1u32;
    let bas = v & m;
    let signe = BigInt::one() << (n - 1);
    let r = if bas >= signe {
        bas - (BigInt::one() << n)
    } else {
        bas
    };
    resultat_logique(r)
}

/* ------------------------ Division entière ------------------------ */

/// (A, B) entiers tels que a/b = A/B (alignement des exposants).
fn alignes(a: &Nombre, b: &Nombre) -> Option<(BigInt, BigInt)> {
    let (Nombre::Fini { m: ma, e: ea }, Nombre::Fini { m: mb, e: eb }) = (a, b) else {
        return None;
    };
    let emin = (*ea).min(*eb);
    Some((
        ma * pow10((ea - emin) as usize),
        mb * pow10((eb - emin) as usize),
    ))
}

/// Quotient entier tronqué vers zéro.
pub fn idiv(a: &Nombre, b: &Nombre) -> Result<Nombre, GenreErreur> {
    if a.est_nan() || b.est_nan() {
        return Err(GenreErreur::DoesNotAcceptNaN);
    }
    if b.est_zero() {
        return Err(GenreErreur::DivisionByZero);
    }
    let (Some(sa), Some(sb)) = (a.exposant_sci(), b.exposant_sci()) else {
        return Ok(Nombre::zero());
    };
    if sa - sb < -1 {
        return Ok(Nombre::zero());
    }
    // 2^1024 ≈ 1.8e308
    if sa - sb > 310 {
        return Err(GenreErreur::IntegerOverflow);
    }
    let (x, y) = alignes(a, b).ok_or(GenreErreur::InternalError)?;
    resultat_entier(x / y)
}

/// Reste de la division tronquée (signe du dividende), exact.
pub fn modulo(a: &Nombre, b: &Nombre) -> Result<Nombre, GenreErreur> {
    let (Nombre::Fini { m: ma, e: ea }, Nombre::Fini { m: mb, e: eb }) = (a, b) else {
        return Ok(Nombre::Nan);
    };
    if mb.is_zero() {
        return Err(GenreErreur::DivisionByZero);
    }
    if ma.is_zero() || a.abs().comparer(&b.abs()) == Some(Ordering::Less) {
        return Ok(a.clone());
    }

    // |a| >= |b| => ea >= eb - chiffres(ma) : l’alignement reste petit
    if ea < eb {
        let (x, y) = alignes(a, b).ok_or(GenreErreur::InternalError)?;
        return Nombre::depuis_parties(x % y, *ea);
    }
    // ma·10^(ea-eb) mod mb, sans matérialiser la puissance
    let mbabs = mb.abs();
    let p = BigInt::from(10).modpow(&BigInt::from(ea - eb), &mbabs);
    let r = (ma.abs() % &mbabs) * p % &mbabs;
    Nombre::depuis_parties(if ma.is_negative() { -r } else { r }, *eb)
}

/* ------------------------ PGCD ------------------------ */

fn entier_strict(x: &Nombre) -> Result<BigInt, GenreErreur> {
    if x.est_nan() {
        return Err(GenreErreur::DoesNotAcceptNaN);
    }
    if !x.est_entier() {
        return Err(GenreErreur::UndefinedForArgumentDomain);
    }
    x.vers_entier(BITS_ENTIER, GenreErreur::IntegerOverflow)
}

fn gcd(mut a: BigInt, mut b: BigInt, budget: &mut Budget) -> Result<BigInt, GenreErreur> {
    while !b.is_zero() {
        budget.consommer(1)?;
        let t = &a % &b;
        a = b;
        b = t;
    }
    Ok(a.abs())
}

pub fn pgcd(args: &[Nombre], budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    let mut acc = BigInt::zero();
    for x in args {
        acc = gcd(acc, entier_strict(x)?, budget)?;
    }
    resultat_entier(acc)
}

/// Entier i64 non négatif (compteurs : ncr, npr, lois discrètes).
pub(crate) fn compteur(x: &Nombre) -> Result<i64, GenreErreur> {
    if x.est_nan() {
        return Err(GenreErreur::DoesNotAcceptNaN);
    }
    if !x.est_entier() || x.est_negatif() {
        return Err(GenreErreur::UndefinedForArgumentDomain);
    }
    x.vers_i64().ok_or(GenreErreur::ComputationTooExpensive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn n(s: &str) -> Nombre {
        Nombre::depuis_decimal(s).unwrap()
    }

    #[test]
    fn operations_bit_a_bit() {
        assert_eq!(bits(&n("12"), &n("10"), OpBits::Et), Ok(n("8")));
        assert_eq!(bits(&n("12"), &n("10"), OpBits::Ou), Ok(n("14")));
        assert_eq!(bits(&n("12"), &n("10"), OpBits::Xor), Ok(n("6")));
        assert_eq!(bits(&n("12.9"), &n("10"), OpBits::Et), Ok(n("8")));
        assert_eq!(non(&n("0")), Ok(n("-1")));
        assert_eq!(
            bits_liste(&[n("7"), n("6"), n("4")], OpBits::Et),
            Ok(n("4"))
        );
    }

    #[test]
    fn decalages_et_masques() {
        assert_eq!(decalage(&n("1"), &n("4"), true), Ok(n("16")));
        assert_eq!(decalage(&n("-16"), &n("2"), false), Ok(n("-4")));
        assert_eq!(decalage(&n("1"), &n("-1"), true), Ok(n("0")));
        assert_eq!(
            decalage(&n("1"), &n("256"), true),
            Err(GenreErreur::LogicOverflow)
        );
        assert_eq!(masque(&n("-1"), &n("8")), Ok(n("255")));
        assert_eq!(demasque(&n("255"), &n("8")), Ok(n("-1")));
        assert_eq!(demasque(&n("127"), &n("8")), Ok(n("127")));
    }

    #[test]
    fn exacts_jusqu_au_plafond() {
        let haut = decalage(&n("1"), &n("255"), true).unwrap();
        assert_eq!(decalage(&haut, &n("255"), false), Ok(n("1")));
        let impair = bits(&haut, &n("1"), OpBits::Ou).unwrap();
        assert_eq!(bits(&impair, &n("1"), OpBits::Et), Ok(n("1")));

        let tout = masque(&n("-1"), &n("256")).unwrap();
        let presque = tout.sub(&n("1")).unwrap();
        assert_eq!(bits(&tout, &presque, OpBits::Xor), Ok(n("1")));

        let p1000 = Nombre::entier(BigInt::one() << 1000u32).unwrap();
        let p1000_plus_un = p1000.add(&n("1")).unwrap();
        assert_eq!(modulo(&p1000_plus_un, &n("2")), Ok(n("1")));
        assert_eq!(idiv(&p1000_plus_un, &n("1")), Ok(p1000_plus_un.clone()));
        let mut b = Budget::default();
        let p999 = Nombre::entier(BigInt::one() << 999u32).unwrap();
        let trois_p999 = p999.mul(&n("3")).unwrap();
        assert_eq!(pgcd(&[p1000, trois_p999], &mut b), Ok(p999));
    }

    #[test]
    fn plafond_256_bits() {
        assert_eq!(
            bits(&n("1e80"), &n("1"), OpBits::Et),
            Err(GenreErreur::LogicOverflow)
        );
        assert_eq!(
            bits(&Nombre::Nan, &n("1"), OpBits::Et),
            Err(GenreErreur::DoesNotAcceptNaN)
        );
    }

    #[test]
    fn division_entiere_exacte() {
        assert_eq!(idiv(&n("7"), &n("2")), Ok(n("3")));
        assert_eq!(idiv(&n("-7"), &n("2")), Ok(n("-3")));
        assert_eq!(idiv(&n("7.5"), &n("0.5")), Ok(n("15")));
        assert_eq!(idiv(&n("1"), &n("0")), Err(GenreErreur::DivisionByZero));
        assert_eq!(idiv(&n("1e400"), &n("1")), Err(GenreErreur::IntegerOverflow));
        assert_eq!(modulo(&n("7"), &n("3")), Ok(n("1")));
        assert_eq!(modulo(&n("-7"), &n("3")), Ok(n("-1")));
        assert_eq!(modulo(&n("5.5"), &n("2")), Ok(n("1.5")));
        assert_eq!(modulo(&n("1e1000"), &n("7")), Ok(n("4")));
        assert_eq!(modulo(&n("2"), &n("7")), Ok(n("2")));
        assert_eq!(modulo(&n("1"), &n("0")), Err(GenreErreur::DivisionByZero));
    }

    #[test]
    fn pgcd_entiers() {
        let mut b = Budget::default();
        assert_eq!(pgcd(&[n("12"), n("18"), n("-30")], &mut b), Ok(n("6")));
        assert_eq!(
            pgcd(&[n("1.5"), n("3")], &mut b),
            Err(GenreErreur::UndefinedForArgumentDomain)
        );
    }
}
