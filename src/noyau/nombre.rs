// src/noyau/nombre.rs
//
// Nombre décimal à précision fixe (sans flottants).
// - valeur = m · 10^e, m sans zéro de queue (forme unique)
// - zéro = (0, 0)
// - arrondi au pair le plus proche à chaque opération (|m| < 10^PRECISION),
//   sauf pour un entier d’au plus BITS_EXACTS bits, conservé tel quel
// - plage bornée : exposant scientifique dans [-EXPOSANT_MAX, EXPOSANT_MAX]
//   => au-delà : Overflow / Underflow (jamais de saturation silencieuse)
// - Nan contamine toute opération arithmétique

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

use std::cmp::Ordering;
use std::fmt;

use super::erreur::GenreErreur;

/// Chiffres significatifs conservés par le moteur.
pub const PRECISION: usize = 50;

/// Plus grand entier (en bits) conservé sans arrondi : couvre les plafonds
/// des opérations logiques (256) et entières (1024).
pub const BITS_EXACTS: u64 = 1024;

/// Chiffres décimaux de 2^BITS_EXACTS.
pub(crate) const CHIFFRES_EXACTS: i64 = 309;

/// Borne de l’exposant scientifique (|x| < 10^(EXPOSANT_MAX+1)).
pub const EXPOSANT_MAX: i64 = 99_999;

/// Au-delà, un exposant de littéral est traité comme dépassement direct.
const EXPOSANT_ABSURDE: i64 = 1_000_000_000_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Nombre {
    Nan,
    Fini { m: BigInt, e: i64 },
}

/* ------------------------ Outils entiers ------------------------ */

pub(crate) fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// Nombre de chiffres décimaux de |m| (1 pour zéro).
pub(crate) fn nb_chiffres(m: &BigInt) -> usize {
    if m.is_zero() {
        return 1;
    }
    let a = m.abs();
    let bits = a.bits();
    // borne basse : floor((bits-1)·log10(2)) + 1
    let mut d = ((bits - 1) as f64 * std::f64::consts::LOG10_2) as usize + 1;
    while a >= pow10(d) {
        d += 1;
    }
    while d > 1 && a < pow10(d - 1) {
        d -= 1;
    }
    d
}

/// Racine carrée entière (plancher), Newton.
pub(crate) fn int_sqrt_floor(x: &BigInt) -> BigInt {
    if x.is_zero() || x.is_negative() {
        return BigInt::zero();
    }

    let mut y = approx_sqrt_start(x);
    loop {
        let y_next = (&y + (x / &y)) >> 1;
        if y_next >= y {
            let mut z = y_next;
            while (&z + 1u32) * (&z + 1u32) <= *x {
                z += 1u32;
            }
            while &z * &z > *x {
                z -= 1u32;
            }
            return z;
        }
        y = y_next;
    }
}

fn approx_sqrt_start(x: &BigInt) -> BigInt {
    let bits = x.bits();
    let half = bits.div_ceil(2);
    BigInt::one() << half
}

/// Arrondi au pair à `prec` chiffres significatifs.
/// Retourne (m, e) avec |m| < 10^prec (ou m = 10^prec après retenue, retiré par normaliser).
pub(crate) fn arrondir(m: BigInt, e: i64, prec: usize) -> (BigInt, i64) {
    let d = nb_chiffres(&m);
    if d <= prec {
        return (m, e);
    }
    let k = d - prec;
    let div = pow10(k);
    let neg = m.is_negative();
    let a = m.abs();
    let mut q = &a / &div;
    let r = &a % &div;
    let deux_r: BigInt = r << 1;
    match deux_r.cmp(&div) {
        Ordering::Greater => q += 1u32,
        Ordering::Equal => {
            if (&q % 2u32) == BigInt::one() {
                q += 1u32;
            }
        }
        Ordering::Less => {}
    }
    let q = if neg { -q } else { q };
    (q, e + k as i64)
}

/// Ajoute un chiffre “collant” pour un quotient/racine inexact :
/// garantit un arrondi correct (jamais d’égalité parasite au milieu).
pub(crate) fn avec_collant(q: BigInt, e: i64, inexact: bool) -> (BigInt, i64) {
    if !inexact {
        return (q, e);
    }
    let un = if q.is_negative() {
        BigInt::from(-1)
    } else {
        BigInt::one()
    };
    (q * 10u32 + un, e - 1)
}

fn sans_zeros_de_queue(mut m: BigInt, mut e: i64) -> (BigInt, i64) {
    if m.is_zero() {
        return (m, 0);
    }
    let dix = BigInt::from(10);
    while (&m % &dix).is_zero() {
        m /= &dix;
        e += 1;
    }
    (m, e)
}

/* ------------------------ Valeur intermédiaire (hors plage) ------------------------ */

/// Valeur de travail à précision choisie, utilisée par les boucles
/// (puissance entière) avant le contrôle de plage final.
#[derive(Clone, Debug)]
pub(crate) struct Brut {
    pub m: BigInt,
    pub e: i64,
}

impl Brut {
    pub fn un() -> Self {
        Brut {
            m: BigInt::one(),
            e: 0,
        }
    }

    pub fn mul(&self, o: &Brut, prec: usize) -> Brut {
        let (m, e) = arrondir(&self.m * &o.m, self.e + o.e, prec);
        Brut { m, e }
    }

    /// 1/self à `prec` chiffres. self != 0 (vérifié par l’appelant).
    pub fn inverse(&self, prec: usize) -> Brut {
        let d = nb_chiffres(&self.m);
        let k = prec + 2 + d;
        let num = pow10(k);
        let q = &num / &self.m;
        let r = &num % &self.m;
        let (q, e) = avec_collant(q, -(k as i64) - self.e, !r.is_zero());
        let (m, e) = arrondir(q, e, prec);
        Brut { m, e }
    }
}

/* ------------------------ Construction ------------------------ */

impl Nombre {
    pub fn zero() -> Self {
        Nombre::Fini {
            m: BigInt::zero(),
            e: 0,
        }
    }

    pub fn un() -> Self {
        Nombre::Fini {
            m: BigInt::one(),
            e: 0,
        }
    }

    pub fn depuis_i64(n: i64) -> Self {
        let (m, e) = sans_zeros_de_queue(BigInt::from(n), 0);
        Nombre::Fini { m, e }
    }

    /// Construit m·10^e : entier exact, ou arrondi à PRECISION ; puis contrôle de plage.
    pub fn depuis_parties(m: BigInt, e: i64) -> Result<Self, GenreErreur> {
        if m.is_zero() {
            return Ok(Nombre::zero());
        }
        if let Some(x) = Nombre::entier_exact(&m, e) {
            return Ok(x);
        }
        let (m, e) = arrondir(m, e, PRECISION);
        let (m, e) = sans_zeros_de_queue(m, e);
        let sci = e.saturating_add(nb_chiffres(&m) as i64 - 1);
        if sci > EXPOSANT_MAX {
            return Err(GenreErreur::Overflow);
        }
        if sci < -EXPOSANT_MAX {
            return Err(GenreErreur::Underflow);
        }
        Ok(Nombre::Fini { m, e })
    }

    /// Valeur entière d’au plus BITS_EXACTS bits, sans arrondi. None sinon.
    fn entier_exact(m: &BigInt, e: i64) -> Option<Nombre> {
        let sci = e.saturating_add(nb_chiffres(m) as i64 - 1);
        if !(0..=CHIFFRES_EXACTS).contains(&sci) {
            return None;
        }
        let (m, e) = sans_zeros_de_queue(m.clone(), e);
        if e < 0 || (&m * pow10(e as usize)).bits() > BITS_EXACTS {
            return None;
        }
        Some(Nombre::Fini { m, e })
    }

    pub fn entier(n: BigInt) -> Result<Self, GenreErreur> {
        Nombre::depuis_parties(n, 0)
    }

    pub(crate) fn depuis_brut(b: Brut) -> Result<Self, GenreErreur> {
        Nombre::depuis_parties(b.m, b.e)
    }

    /// Valeur en virgule fixe : v / 10^w.
    pub(crate) fn depuis_fixe(v: BigInt, w: u32) -> Result<Self, GenreErreur> {
        Nombre::depuis_parties(v, -(w as i64))
    }

    /// Littéral décimal déjà validé par le lexer : `123`, `1.5`, `.5`, `2e-3`.
    pub fn depuis_decimal(texte: &str) -> Result<Self, GenreErreur> {
        let (corps, exposant) = match texte.find(['e', 'E']) {
            Some(i) => (&texte[..i], Some(&texte[i + 1..])),
            None => (texte, None),
        };
        let (ent, frac) = corps.split_once('.').unwrap_or((corps, ""));

        let chiffres = format!("{ent}{frac}");
        let m = BigInt::parse_bytes(chiffres.as_bytes(), 10).ok_or(GenreErreur::InternalError)?;
        if m.is_zero() {
            return Ok(Nombre::zero());
        }

        let mut e = -(frac.len() as i64);
        if let Some(x) = exposant {
            let negatif = x.starts_with('-');
            let v = x.trim_start_matches(['+', '-']);
            match v.parse::<i64>() {
                Ok(v) if v < EXPOSANT_ABSURDE => {
                    e += if negatif { -v } else { v };
                }
                _ => {
                    return Err(if negatif {
                        GenreErreur::Underflow
                    } else {
                        GenreErreur::Overflow
                    });
                }
            }
        }
        Nombre::depuis_parties(m, e)
    }

    /// Entier écrit dans une base 2/8/16 (chiffres validés par le lexer).
    pub fn depuis_base(chiffres: &str, radix: u32) -> Result<Self, GenreErreur> {
        let n = BigInt::parse_bytes(chiffres.as_bytes(), radix).ok_or(GenreErreur::InternalError)?;
        Nombre::entier(n)
    }
}

/* ------------------------ Accès ------------------------ */

impl Nombre {
    pub fn est_nan(&self) -> bool {
        matches!(self, Nombre::Nan)
    }

    pub fn est_zero(&self) -> bool {
        matches!(self, Nombre::Fini { m, .. } if m.is_zero())
    }

    pub fn est_negatif(&self) -> bool {
        matches!(self, Nombre::Fini { m, .. } if m.is_negative())
    }

    pub fn est_positif(&self) -> bool {
        matches!(self, Nombre::Fini { m, .. } if m.is_positive())
    }

    /// Forme normalisée => entier ssi e >= 0.
    pub fn est_entier(&self) -> bool {
        matches!(self, Nombre::Fini { e, .. } if *e >= 0)
    }

    pub fn est_un(&self) -> bool {
        matches!(self, Nombre::Fini { m, e } if m.is_one() && *e == 0)
    }

    /// Exposant scientifique (position du premier chiffre). None pour zéro / Nan.
    pub fn exposant_sci(&self) -> Option<i64> {
        match self {
            Nombre::Fini { m, e } if !m.is_zero() => Some(e + nb_chiffres(m) as i64 - 1),
            _ => None,
        }
    }

    /// log10(|x|) approché (estimations de plage seulement).
    pub fn log10_approx(&self) -> f64 {
        match self {
            Nombre::Fini { m, e } if !m.is_zero() => {
                let d = nb_chiffres(m);
                // on garde 17 chiffres de tête
                let (tete, decal) = if d > 17 {
                    (m.abs() / pow10(d - 17), (d - 17) as i64)
                } else {
                    (m.abs(), 0)
                };
                let t = tete.to_f64().unwrap_or(1.0);
                t.log10() + (e + decal) as f64
            }
            Nombre::Fini { .. } => f64::NEG_INFINITY,
            Nombre::Nan => f64::NAN,
        }
    }

    /// Approximation f64 (estimations seulement).
    pub fn vers_f64(&self) -> f64 {
        match self {
            Nombre::Nan => f64::NAN,
            Nombre::Fini { m, .. } if m.is_zero() => 0.0,
            Nombre::Fini { m, .. } => {
                let l = self.log10_approx();
                let s = if m.is_negative() { -1.0 } else { 1.0 };
                s * 10f64.powf(l)
            }
        }
    }

    /// Entier exact si la valeur est entière et tient dans i64.
    pub fn vers_i64(&self) -> Option<i64> {
        match self {
            Nombre::Fini { m, e } if *e >= 0 && *e < 19 => (m * pow10(*e as usize)).to_i64(),
            _ => None,
        }
    }

    /// round(x · 10^w) en entier (virgule fixe).
    pub(crate) fn vers_fixe(&self, w: u32) -> BigInt {
        match self {
            Nombre::Nan => BigInt::zero(),
            Nombre::Fini { m, e } => {
                let k = e + w as i64;
                if k >= 0 {
                    return m * pow10(k as usize);
                }
                let k = (-k) as usize;
                if k > nb_chiffres(m) + 1 {
                    return BigInt::zero();
                }
                let div = pow10(k);
                let neg = m.is_negative();
                let a = m.abs();
                let mut q = &a / &div;
                if ((&a % &div) << 1) >= div {
                    q += 1u32;
                }
                if neg {
                    -q
                } else {
                    q
                }
            }
        }
    }

    /// Troncature vers zéro puis conversion, avec plafond en bits.
    pub fn vers_entier(&self, bits_max: u64, err: GenreErreur) -> Result<BigInt, GenreErreur> {
        let t = self.tronquer();
        match &t {
            Nombre::Nan => Err(GenreErreur::DoesNotAcceptNaN),
            Nombre::Fini { m, e } => {
                if m.is_zero() {
                    return Ok(BigInt::zero());
                }
                // estimation avant matérialisation
                let sci = e + nb_chiffres(m) as i64 - 1;
                if sci as f64 > bits_max as f64 * std::f64::consts::LOG10_2 + 1.0 {
                    return Err(err);
                }
                let n = m * pow10(*e as usize);
                if n.bits() > bits_max {
                    return Err(err);
                }
                Ok(n)
            }
        }
    }
}

/* ------------------------ Arithmétique ------------------------ */

impl Nombre {
    pub fn neg(&self) -> Nombre {
        match self {
            Nombre::Nan => Nombre::Nan,
            Nombre::Fini { m, e } => Nombre::Fini { m: -m, e: *e },
        }
    }

    pub fn abs(&self) -> Nombre {
        match self {
            Nombre::Nan => Nombre::Nan,
            Nombre::Fini { m, e } => Nombre::Fini { m: m.abs(), e: *e },
        }
    }

    /// -1, 0 ou 1 (Nan reste Nan).
    pub fn signe(&self) -> Nombre {
        match self {
            Nombre::Nan => Nombre::Nan,
            Nombre::Fini { m, .. } => Nombre::depuis_i64(if m.is_zero() {
                0
            } else if m.is_negative() {
                -1
            } else {
                1
            }),
        }
    }

    pub fn add(&self, b: &Nombre) -> Result<Nombre, GenreErreur> {
        let (Nombre::Fini { m: ma, e: ea }, Nombre::Fini { m: mb, e: eb }) = (self, b) else {
            return Ok(Nombre::Nan);
        };
        if ma.is_zero() {
            return Ok(b.clone());
        }
        if mb.is_zero() {
            return Ok(self.clone());
        }

        // opérande négligeable : moins d’un millième d’unité du dernier chiffre
        // (hors somme de deux entiers qui peut rester exacte)
        let sa = ea + nb_chiffres(ma) as i64 - 1;
        let sb = eb + nb_chiffres(mb) as i64 - 1;
        let entiers = *ea >= 0 && *eb >= 0 && sa.max(sb) <= CHIFFRES_EXACTS;
        let marge = PRECISION as i64 + 3;
        if !entiers && sa - sb > marge {
            return Ok(self.clone());
        }
        if !entiers && sb - sa > marge {
            return Ok(b.clone());
        }

        let emin = (*ea).min(*eb);
        let m = ma * pow10((ea - emin) as usize) + mb * pow10((eb - emin) as usize);
        Nombre::depuis_parties(m, emin)
    }

    pub fn sub(&self, b: &Nombre) -> Result<Nombre, GenreErreur> {
        self.add(&b.neg())
    }

    pub fn mul(&self, b: &Nombre) -> Result<Nombre, GenreErreur> {
        let (Nombre::Fini { m: ma, e: ea }, Nombre::Fini { m: mb, e: eb }) = (self, b) else {
            return Ok(Nombre::Nan);
        };
        if ma.is_zero() || mb.is_zero() {
            return Ok(Nombre::zero());
        }
        Nombre::depuis_parties(ma * mb, ea + eb)
    }

    pub fn div(&self, b: &Nombre) -> Result<Nombre, GenreErreur> {
        let (Nombre::Fini { m: ma, e: ea }, Nombre::Fini { m: mb, e: eb }) = (self, b) else {
            return Ok(Nombre::Nan);
        };
        if mb.is_zero() {
            return Err(GenreErreur::DivisionByZero);
        }
        if ma.is_zero() {
            return Ok(Nombre::zero());
        }

        // au moins PRECISION+2 chiffres au quotient
        let da = nb_chiffres(ma) as i64;
        let db = nb_chiffres(mb) as i64;
        let k = (PRECISION as i64 + 2 + db - da).max(0);
        let num = ma * pow10(k as usize);
        let q = &num / mb;
        let r = &num % mb;
        let (q, e) = avec_collant(q, ea - eb - k, !r.is_zero());
        Nombre::depuis_parties(q, e)
    }

    /// Comparaison numérique. None si l’un des deux est Nan.
    pub fn comparer(&self, b: &Nombre) -> Option<Ordering> {
        let (Nombre::Fini { m: ma, e: ea }, Nombre::Fini { m: mb, e: eb }) = (self, b) else {
            return None;
        };
        let sa = ma.sign();
        let sb = mb.sign();
        if sa != sb {
            return Some(sa.cmp(&sb));
        }
        if ma.is_zero() {
            return Some(Ordering::Equal);
        }

        let xa = ea + nb_chiffres(ma) as i64;
        let xb = eb + nb_chiffres(mb) as i64;
        let ord_abs = if xa != xb {
            xa.cmp(&xb)
        } else {
            let emin = (*ea).min(*eb);
            let a = ma.abs() * pow10((ea - emin) as usize);
            let b = mb.abs() * pow10((eb - emin) as usize);
            a.cmp(&b)
        };
        Some(if ma.is_negative() {
            ord_abs.reverse()
        } else {
            ord_abs
        })
    }

    /* ------------------------ Parties entières (exactes) ------------------------ */

    /// Partie entière vers zéro.
    pub fn tronquer(&self) -> Nombre {
        match self {
            Nombre::Nan => Nombre::Nan,
            Nombre::Fini { m, e } => {
                if *e >= 0 {
                    return self.clone();
                }
                let k = (-e) as usize;
                if k >= nb_chiffres(m) {
                    return Nombre::zero();
                }
                let q = m / pow10(k);
                let (m, e) = sans_zeros_de_queue(q, 0);
                Nombre::Fini { m, e }
            }
        }
    }

    pub fn plancher(&self) -> Result<Nombre, GenreErreur> {
        let t = self.tronquer();
        if self.est_negatif() && t != *self {
            return t.sub(&Nombre::un());
        }
        Ok(t)
    }

    pub fn plafond(&self) -> Result<Nombre, GenreErreur> {
        let t = self.tronquer();
        if self.est_positif() && t != *self {
            return t.add(&Nombre::un());
        }
        Ok(t)
    }

    pub fn partie_frac(&self) -> Result<Nombre, GenreErreur> {
        self.sub(&self.tronquer())
    }

    /// Arrondi à `decimales` chiffres après la virgule, moitié loin de zéro.
    pub fn arrondi(&self, decimales: i64) -> Result<Nombre, GenreErreur> {
        match self {
            Nombre::Nan => Ok(Nombre::Nan),
            Nombre::Fini { m, e } => {
                let cible = -decimales;
                if *e >= cible {
                    return Ok(self.clone());
                }
                let sci = e + nb_chiffres(m) as i64 - 1;
                if sci < cible - 1 {
                    return Ok(Nombre::zero());
                }
                let k = (cible - e) as usize;
                let div = pow10(k);
                let a = m.abs();
                let mut q = &a / &div;
                if ((&a % &div) << 1) >= div {
                    q += 1u32;
                }
                let q = if m.is_negative() { -q } else { q };
                Nombre::depuis_parties(q, cible)
            }
        }
    }

    /// Troncature à `decimales` chiffres après la virgule.
    pub fn tronquer_a(&self, decimales: i64) -> Result<Nombre, GenreErreur> {
        match self {
            Nombre::Nan => Ok(Nombre::Nan),
            Nombre::Fini { m, e } => {
                let cible = -decimales;
                if *e >= cible {
                    return Ok(self.clone());
                }
                let k = (cible - e) as usize;
                if k > nb_chiffres(m) {
                    return Ok(Nombre::zero());
                }
                Nombre::depuis_parties(m / pow10(k), cible)
            }
        }
    }

    pub fn racine_carree(&self) -> Result<Nombre, GenreErreur> {
        match self {
            Nombre::Nan => Ok(Nombre::Nan),
            Nombre::Fini { m, .. } if m.is_zero() => Ok(Nombre::zero()),
            Nombre::Fini { m, .. } if m.is_negative() => {
                Err(GenreErreur::UndefinedForArgumentDomain)
            }
            Nombre::Fini { m, e } => {
                let d = nb_chiffres(m) as i64;
                let mut k = (2 * (PRECISION as i64 + 2) - d).max(0);
                if (e - k).rem_euclid(2) != 0 {
                    k += 1;
                }
                let n = m * pow10(k as usize);
                let s = int_sqrt_floor(&n);
                let exact = &s * &s == n;
                let (s, ex) = avec_collant(s, (e - k) / 2, !exact);
                Nombre::depuis_parties(s, ex)
            }
        }
    }
}

impl fmt::Display for Nombre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", super::format::general(self, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn n(s: &str) -> Nombre {
        Nombre::depuis_decimal(s).unwrap()
    }

    #[test]
    fn forme_normalisee_unique() {
        assert_eq!(n("1.50"), n("1.5"));
        assert_eq!(n("100"), Nombre::depuis_i64(100));
        assert_eq!(n("0.000"), Nombre::zero());
        assert!(n("100").est_entier());
        assert!(!n("0.5").est_entier());
    }

    #[test]
    fn addition_exacte_decimale() {
        // pas d’erreur binaire : 0.1 + 0.2 = 0.3
        assert_eq!(n("0.1").add(&n("0.2")).unwrap(), n("0.3"));
        assert_eq!(n("2").add(&n("2")).unwrap(), n("4"));
    }

    #[test]
    fn division_arrondie_a_precision() {
        let q = n("1").div(&n("3")).unwrap();
        assert_eq!(q.to_string(), format!("0.{}", "3".repeat(PRECISION)));
        let q = n("2").div(&n("3")).unwrap();
        assert_eq!(q.to_string(), format!("0.{}7", "6".repeat(PRECISION - 1)));
    }

    #[test]
    fn division_par_zero() {
        assert_eq!(n("1").div(&Nombre::zero()), Err(GenreErreur::DivisionByZero));
    }

    #[test]
    fn arrondi_au_pair() {
        let (m, e) = arrondir(BigInt::from(125), 0, 2);
        assert_eq!((m, e), (BigInt::from(12), 1));
        let (m, e) = arrondir(BigInt::from(135), 0, 2);
        assert_eq!((m, e), (BigInt::from(14), 1));
    }

    #[test]
    fn entiers_exacts_jusqu_a_1024_bits() {
        let p255 = Nombre::entier(BigInt::one() << 255u32).unwrap();
        let plus_un = p255.add(&Nombre::un()).unwrap();
        assert_eq!(plus_un.sub(&p255).unwrap(), Nombre::un());

        let p1000 = Nombre::entier(BigInt::one() << 1000u32).unwrap();
        let impair = p1000.add(&Nombre::un()).unwrap();
        assert_eq!(
            impair.vers_entier(BITS_EXACTS, GenreErreur::IntegerOverflow),
            Ok((BigInt::one() << 1000u32) + 1u32)
        );

        // au-delà : arrondi à PRECISION chiffres
        let p1100 = Nombre::entier(BigInt::one() << 1100u32).unwrap();
        assert_eq!(p1100.add(&Nombre::un()).unwrap(), p1100);
        let Nombre::Fini { m, .. } = &p1100 else {
            panic!("fini attendu");
        };
        assert!(nb_chiffres(m) <= PRECISION);
    }

    #[test]
    fn nan_contagion() {
        let nan = Nombre::Nan;
        assert!(nan.add(&n("1")).unwrap().est_nan());
        assert!(n("1").mul(&nan).unwrap().est_nan());
        assert!(nan.div(&Nombre::zero()).unwrap().est_nan());
        assert_eq!(nan.comparer(&n("1")), None);
    }

    #[test]
    fn bornes_de_plage() {
        assert!(Nombre::depuis_decimal(&format!("9.9e{EXPOSANT_MAX}")).is_ok());
        assert_eq!(
            Nombre::depuis_decimal(&format!("1e{}", EXPOSANT_MAX + 1)),
            Err(GenreErreur::Overflow)
        );
        assert!(Nombre::depuis_decimal(&format!("1e-{EXPOSANT_MAX}")).is_ok());
        assert_eq!(
            Nombre::depuis_decimal(&format!("1e-{}", EXPOSANT_MAX + 1)),
            Err(GenreErreur::Underflow)
        );
        let gros = n(&format!("1e{EXPOSANT_MAX}"));
        assert_eq!(gros.mul(&n("10")), Err(GenreErreur::Overflow));
        let petit = n(&format!("1e-{EXPOSANT_MAX}"));
        assert_eq!(petit.div(&n("10")), Err(GenreErreur::Underflow));
    }

    #[test]
    fn comparaison() {
        assert_eq!(n("2").comparer(&n("10")), Some(Ordering::Less));
        assert_eq!(n("-2").comparer(&n("-10")), Some(Ordering::Greater));
        assert_eq!(n("1.5").comparer(&n("1.50")), Some(Ordering::Equal));
        assert_eq!(n("-1").comparer(&Nombre::zero()), Some(Ordering::Less));
    }

    #[test]
    fn parties_entieres() {
        assert_eq!(n("-2.5").tronquer(), n("-2"));
        assert_eq!(n("-2.5").plancher().unwrap(), n("-3"));
        assert_eq!(n("2.1").plafond().unwrap(), n("3"));
        assert_eq!(n("2.5").arrondi(0).unwrap(), n("3"));
        assert_eq!(n("-2.5").arrondi(0).unwrap(), n("-3"));
        assert_eq!(n("3.14159").arrondi(2).unwrap(), n("3.14"));
        assert_eq!(n("0.0001").arrondi(0).unwrap(), Nombre::zero());
    }

    #[test]
    fn racine_exacte_et_inexacte() {
        assert_eq!(n("144").racine_carree().unwrap(), n("12"));
        assert_eq!(n("0.25").racine_carree().unwrap(), n("0.5"));
        let r2 = n("2").racine_carree().unwrap();
        assert!(r2.to_string().starts_with("1.41421356237309504880168872420969807856967187537"));
        assert_eq!(
            n("-4").racine_carree(),
            Err(GenreErreur::UndefinedForArgumentDomain)
        );
    }

    #[test]
    fn bases() {
        assert_eq!(Nombre::depuis_base("FF", 16).unwrap(), n("255"));
        assert_eq!(Nombre::depuis_base("101", 2).unwrap(), n("5"));
        assert_eq!(Nombre::depuis_base("17", 8).unwrap(), n("15"));
    }

    #[test]
    fn conversion_entiere_plafonnee() {
        assert_eq!(
            n("255.9").vers_entier(8, GenreErreur::LogicOverflow),
            Ok(BigInt::from(255))
        );
        assert_eq!(
            n("256").vers_entier(8, GenreErreur::LogicOverflow),
            Err(GenreErreur::LogicOverflow)
        );
        assert_eq!(
            n("1e500").vers_entier(256, GenreErreur::LogicOverflow),
            Err(GenreErreur::LogicOverflow)
        );
    }

    #[test]
    fn virgule_fixe() {
        assert_eq!(n("1.25").vers_fixe(3), BigInt::from(1250));
        assert_eq!(n("1.2346").vers_fixe(3), BigInt::from(1235));
        assert_eq!(
            Nombre::depuis_fixe(BigInt::from(1250), 3).unwrap(),
            n("1.25")
        );
    }
}
