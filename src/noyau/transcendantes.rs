// src/noyau/transcendantes.rs
//
// Fonctions transcendantes en virgule fixe (entiers “scalés” ×10^w).
// - π (Machin), ln2, ln10 : séries 1/q + cache par nombre de chiffres
// - exp / ln : réduction d’argument puis séries
// - sin / cos / atan : réduction modulo π/2, séries de Taylor
// - hyperboliques, gamma (Stirling + Bernoulli), erf / erfc
//
// Chaque boucle de série consomme le budget (une unité par terme).
// Les valeurs passent en Nombre seulement à la fin (un seul arrondi).

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use super::budget::Budget;
use super::erreur::GenreErreur;
use super::nombre::{
    int_sqrt_floor, nb_chiffres, pow10, Brut, Nombre, BITS_EXACTS, CHIFFRES_EXACTS, EXPOSANT_MAX,
    PRECISION,
};

/// Chiffres de garde des séries.
pub(crate) const GARDE: u32 = 15;

/// Échelle de travail par défaut.
pub(crate) const W: u32 = PRECISION as u32 + GARDE;

/// Au-delà de cet exposant, sin/cos n’ont plus aucun chiffre significatif fiable.
const EXPOSANT_TRIG_MAX: i64 = 2 * PRECISION as i64;

/// Sous cet exposant, f(x) = x à la précision près (sin, tan, atan, sinh…).
const EXPOSANT_LINEAIRE: i64 = -(PRECISION as i64 + 5);

/// erfc asymptotique à partir de ce seuil (e^-144 ≈ 1e-63).
const SEUIL_ERFC_ASYMPTOTIQUE: i64 = 12;

/// n! exact (produit entier) jusqu’à ce seuil, Γ au-delà.
pub(crate) const FACTORIELLE_EXACTE_MAX: i64 = 5000;

/// Γ(x) déborde au-delà (Γ(25300) ≈ 1e99998).
const GAMMA_ARG_MAX: i64 = 30_000;

/* ------------------------ Virgule fixe ------------------------ */

pub(crate) fn fmul(a: &BigInt, b: &BigInt, w: u32) -> BigInt {
    (a * b) / pow10(w as usize)
}

pub(crate) fn fdiv(a: &BigInt, b: &BigInt, w: u32) -> BigInt {
    (a * pow10(w as usize)) / b
}

pub(crate) fn fsqrt(a: &BigInt, w: u32) -> BigInt {
    int_sqrt_floor(&(a * pow10(w as usize)))
}

/// Passe de l’échelle `de` à l’échelle `vers` (troncature si on réduit).
pub(crate) fn reechelle(v: &BigInt, de: u32, vers: u32) -> BigInt {
    if vers >= de {
        v * pow10((vers - de) as usize)
    } else {
        v / pow10((de - vers) as usize)
    }
}

/// round(a / b) entier.
fn div_arrondie(a: &BigInt, b: &BigInt) -> BigInt {
    let q = a / b;
    let r = a % b;
    if (r.abs() << 1) >= b.abs() {
        if a.is_negative() == b.is_negative() {
            q + 1
        } else {
            q - 1
        }
    } else {
        q
    }
}

/* ------------------------ Constantes (cache) ------------------------ */

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
enum Constante {
    Pi,
    Ln2,
    Ln10,
}

static CACHE: OnceLock<Mutex<HashMap<(Constante, u32), BigInt>>> = OnceLock::new();

fn constante_fixe(c: Constante, w: u32) -> BigInt {
    let m = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = m.lock().unwrap_or_else(|p| p.into_inner());

    if let Some(v) = guard.get(&(c, w)) {
        return v.clone();
    }

    let v = match c {
        Constante::Pi => pi_calcul(w),
        Constante::Ln2 => ln2_calcul(w),
        Constante::Ln10 => ln10_calcul(w),
    };
    guard.insert((c, w), v.clone());
    v
}

pub(crate) fn pi_fixe(w: u32) -> BigInt {
    constante_fixe(Constante::Pi, w)
}

pub(crate) fn ln10_fixe(w: u32) -> BigInt {
    constante_fixe(Constante::Ln10, w)
}

/// Σ 1/((2k+1)·q^(2k+1)) en entier scalé (troncature).
/// alterne = true : arctan(1/q) ; false : atanh(1/q).
fn serie_inv_q(q: i64, scale: &BigInt, alterne: bool) -> BigInt {
    let q = BigInt::from(q);

    let mut k: usize = 0;
    let mut sign_pos = true;

    // q^(2k+1)
    let mut q_pow = q.clone();
    let mut sum = BigInt::zero();

    loop {
        let denom = BigInt::from((2 * k + 1) as i64);
        let d = &q_pow * &denom;

        let term = scale / &d;
        if term.is_zero() {
            break;
        }

        if sign_pos {
            sum += &term;
        } else {
            sum -= &term;
        }

        q_pow *= &q;
        q_pow *= &q;

        if alterne {
            sign_pos = !sign_pos;
        }
        k += 1;
    }

    sum
}

/// Chiffres supplémentaires pour amortir les troncatures des séries.
const EXTRA_CONSTANTES: usize = 10;

fn pi_calcul(w: u32) -> BigInt {
    let scale = pow10(w as usize + EXTRA_CONSTANTES);

    // Machin : π = 16*atan(1/5) - 4*atan(1/239)
    let a = serie_inv_q(5, &scale, true);
    let b = serie_inv_q(239, &scale, true);

    let pi = BigInt::from(16) * a - BigInt::from(4) * b;
    pi / pow10(EXTRA_CONSTANTES)
}

fn ln2_calcul(w: u32) -> BigInt {
    // ln 2 = 2·atanh(1/3)
    let scale = pow10(w as usize + EXTRA_CONSTANTES);
    let ln2 = serie_inv_q(3, &scale, false) << 1;
    ln2 / pow10(EXTRA_CONSTANTES)
}

fn ln10_calcul(w: u32) -> BigInt {
    // ln 10 = 3·ln 2 + ln(5/4) = 6·atanh(1/3) + 2·atanh(1/9)
    let scale = pow10(w as usize + EXTRA_CONSTANTES);
    let a = serie_inv_q(3, &scale, false);
    let b = serie_inv_q(9, &scale, false);
    let ln10 = BigInt::from(6) * a + BigInt::from(2) * b;
    ln10 / pow10(EXTRA_CONSTANTES)
}

/// π arrondi à la précision du moteur.
pub fn pi() -> Nombre {
    Nombre::depuis_fixe(pi_fixe(W), W).unwrap_or(Nombre::Nan)
}

/* ------------------------ exp ------------------------ */

/// exp(r) pour |r| ≲ 1.2 (virgule fixe) : r/2^8, Taylor, puis 8 carrés.
fn exp_reduit(r: &BigInt, w: u32, budget: &mut Budget) -> Result<BigInt, GenreErreur> {
    let s = pow10(w as usize);
    let r = r >> 8u32;

    let mut terme = s.clone();
    let mut somme = s.clone();
    let mut k: u64 = 1;
    loop {
        terme = fmul(&terme, &r, w) / k;
        if terme.is_zero() {
            break;
        }
        somme += &terme;
        k += 1;
        budget.consommer(1)?;
    }

    for _ in 0..8 {
        somme = fmul(&somme, &somme, w);
    }
    Ok(somme)
}

/// exp(x) (virgule fixe, échelle w) -> Nombre, avec contrôle de plage.
pub(crate) fn exp_fixe(x: &BigInt, w: u32, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    // 4 chiffres de plus : les 8 carrés amplifient l’erreur par 256
    let w2 = w + 4;
    let x = reechelle(x, w, w2);
    let ln10 = ln10_fixe(w2);

    let borne = &ln10 * BigInt::from(EXPOSANT_MAX + 2);
    if x > borne {
        return Err(GenreErreur::Overflow);
    }
    if x < -borne {
        return Err(GenreErreur::Underflow);
    }

    // x = n·ln10 + r
    let n = div_arrondie(&x, &ln10);
    let r = &x - &n * &ln10;
    let n = n.to_i64().ok_or(GenreErreur::InternalError)?;

    let v = exp_reduit(&r, w2, budget)?;
    Nombre::depuis_parties(v, n - w2 as i64)
}

/// exp(x) en virgule fixe (résultat à l’échelle w), pour |x| modéré.
fn exp_valeur_fixe(x: &BigInt, w: u32, budget: &mut Budget) -> Result<BigInt, GenreErreur> {
    let w2 = w + 4;
    let x = reechelle(x, w, w2);
    let ln2 = constante_fixe(Constante::Ln2, w2);

    // x = n·ln2 + r => exp(x) = 2^n · exp(r)
    let n = div_arrondie(&x, &ln2);
    let r = &x - &n * &ln2;
    let n = n.to_i64().ok_or(GenreErreur::InternalError)?;

    let v = exp_reduit(&r, w2, budget)?;
    let v = if n >= 0 {
        v << (n as u64)
    } else {
        v >> (n.unsigned_abs())
    };
    Ok(reechelle(&v, w2, w))
}

pub fn exp(x: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    match x {
        Nombre::Nan => Ok(Nombre::Nan),
        _ if x.est_zero() => Ok(Nombre::un()),
        _ => {
            // estimation grossière avant de matérialiser x en virgule fixe
            let approx = x.vers_f64();
            let borne = std::f64::consts::LN_10 * (EXPOSANT_MAX as f64 + 3.0);
            if approx > borne {
                return Err(GenreErreur::Overflow);
            }
            if approx < -borne {
                return Err(GenreErreur::Underflow);
            }
            let w = W + 6;
            exp_fixe(&x.vers_fixe(w), w, budget)
        }
    }
}

/* ------------------------ ln ------------------------ */

/// ln(m·10^k10) en virgule fixe (échelle w). m > 0.
pub(crate) fn ln_fixe(
    m: &BigInt,
    k10: i64,
    w: u32,
    budget: &mut Budget,
) -> Result<BigInt, GenreErreur> {
    if !m.is_positive() {
        return Err(GenreErreur::UndefinedForArgumentDomain);
    }
    let w2 = w + 8;
    let s = pow10(w2 as usize);
    let d = nb_chiffres(m) as i64;
    let sci = k10 + d - 1;

    // y = m / 10^(d-1) ∈ [1, 10)
    let y = if d - 1 <= w2 as i64 {
        m * pow10((w2 as i64 - (d - 1)) as usize)
    } else {
        m / pow10((d - 1 - w2 as i64) as usize)
    };

    // y = 2^j · z, z ∈ [1, 2)
    let mut j: u32 = 0;
    while y >= (&s << (j + 1)) {
        j += 1;
    }
    let z = &y >> j;

    // ln z = 2·atanh(t), t = (z-1)/(z+1) ∈ [0, 1/3)
    let t = fdiv(&(&z - &s), &(&z + &s), w2);
    let t2 = fmul(&t, &t, w2);
    let mut somme = t.clone();
    let mut puiss = t;
    let mut k: u64 = 1;
    loop {
        puiss = fmul(&puiss, &t2, w2);
        let terme = &puiss / (2 * k + 1);
        if terme.is_zero() {
            break;
        }
        somme += terme;
        k += 1;
        budget.consommer(1)?;
    }

    let ln2 = constante_fixe(Constante::Ln2, w2);
    let ln10 = ln10_fixe(w2);
    let total = (somme << 1) + ln2 * BigInt::from(j) + ln10 * BigInt::from(sci);
    Ok(reechelle(&total, w2, w))
}

/// Chiffres supplémentaires quand x est proche de 1 (ln(x) petit).
fn chiffres_pres_de_un(x: &Nombre) -> u32 {
    match x.sub(&Nombre::un()).ok().and_then(|d| d.exposant_sci()) {
        Some(s) if s < 0 => (s.unsigned_abs() as u32).min(PRECISION as u32 + 10),
        _ => 0,
    }
}

pub fn ln(x: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    match x {
        Nombre::Nan => Ok(Nombre::Nan),
        Nombre::Fini { m, e } => {
            if !m.is_positive() {
                return Err(GenreErreur::UndefinedForArgumentDomain);
            }
            let w = W + chiffres_pres_de_un(x);
            let v = ln_fixe(m, *e, w, budget)?;
            Nombre::depuis_fixe(v, w)
        }
    }
}

/// log_b(x) = ln x / ln b. Puissance exacte de 10 => résultat exact.
pub fn log_base(x: &Nombre, base: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    let (Nombre::Fini { m, e }, Nombre::Fini { m: mb, e: eb }) = (x, base) else {
        return Ok(Nombre::Nan);
    };
    if !m.is_positive() || !mb.is_positive() || base.est_un() {
        return Err(GenreErreur::UndefinedForArgumentDomain);
    }
    let w = W + 6 + chiffres_pres_de_un(x);
    let lx = ln_fixe(m, *e, w, budget)?;
    let lb = ln_fixe(mb, *eb, w, budget)?;
    if lb.is_zero() {
        return Err(GenreErreur::UndefinedForArgumentDomain);
    }
    Nombre::depuis_fixe(fdiv(&lx, &lb, w), w)
}

pub fn log10(x: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    if let Nombre::Fini { m, e } = x {
        if m.is_one() {
            return Ok(Nombre::depuis_i64(*e));
        }
    }
    log_base(x, &Nombre::depuis_i64(10), budget)
}

pub fn log2(x: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    log_base(x, &Nombre::depuis_i64(2), budget)
}

/* ------------------------ Puissance ------------------------ */

/// x^n par carrés successifs (précision étendue, plage contrôlée à la fin).
/// Entier à exposant positif, exact tant que le résultat tient dans BITS_EXACTS bits.
fn puissance_exacte(
    m: &BigInt,
    e: i64,
    n: i64,
    budget: &mut Budget,
) -> Result<Option<Nombre>, GenreErreur> {
    if e < 0 || n <= 0 || n > BITS_EXACTS as i64 {
        return Ok(None);
    }
    // |x| < 2^BITS_EXACTS, sinon inutile de matérialiser
    if e + nb_chiffres(m) as i64 > CHIFFRES_EXACTS {
        return Ok(None);
    }
    let base = m * pow10(e as usize);
    if (base.bits() - 1).saturating_mul(n as u64) >= BITS_EXACTS {
        return Ok(None);
    }
    budget.consommer(u64::from(64 - n.leading_zeros()))?;
    let v = base.pow(n as u32);
    if v.bits() > BITS_EXACTS {
        return Ok(None);
    }
    Nombre::entier(v).map(Some)
}

fn puissance_entiere(x: &Nombre, n: i64, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    let Nombre::Fini { m, e } = x else {
        return Ok(Nombre::Nan);
    };
    if let Some(v) = puissance_exacte(m, *e, n, budget)? {
        return Ok(v);
    }
    let prec = PRECISION + 10;
    let mut base = Brut {
        m: m.clone(),
        e: *e,
    };
    let mut acc = Brut::un();
    let mut k = n.unsigned_abs();
    while k > 0 {
        budget.consommer(1)?;
        if k & 1 == 1 {
            acc = acc.mul(&base, prec);
        }
        k >>= 1;
        if k > 0 {
            base = base.mul(&base, prec);
        }
    }
    if n < 0 {
        acc = acc.inverse(prec);
    }
    Nombre::depuis_brut(acc)
}

/// Parité d’un entier (forme normalisée : e > 0 => multiple de 10).
fn est_impair(n: &Nombre) -> bool {
    match n {
        Nombre::Fini { m, e } if *e == 0 => (m % 2u32) != BigInt::zero(),
        _ => false,
    }
}

pub fn puissance(x: &Nombre, y: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    if x.est_nan() || y.est_nan() {
        return Ok(Nombre::Nan);
    }
    if y.est_zero() || x.est_un() {
        return Ok(Nombre::un());
    }
    if x.est_zero() {
        return if y.est_negatif() {
            Err(GenreErreur::DivisionByZero)
        } else {
            Ok(Nombre::zero())
        };
    }
    if x.est_negatif() && !y.est_entier() {
        return Err(GenreErreur::UndefinedForArgumentDomain);
    }

    // estimation de plage : |y · log10|x||
    let l = y.vers_f64() * x.log10_approx();
    let borne = EXPOSANT_MAX as f64 + 2.0;
    if l > borne {
        return Err(GenreErreur::Overflow);
    }
    if l < -borne {
        return Err(GenreErreur::Underflow);
    }

    if let Some(n) = y.vers_i64() {
        return puissance_entiere(x, n, budget);
    }

    // exp(y · ln|x|)
    let Nombre::Fini { m, e } = x.abs() else {
        return Ok(Nombre::Nan);
    };
    let w = W + 8;
    let lnx = ln_fixe(&m, e, w, budget)?;

    // contrôle exact quand y est immense et |x| proche de 1
    let produit = Nombre::depuis_fixe(lnx.clone(), w)?.mul(y);
    match produit {
        Err(GenreErreur::Overflow) => {
            let positif = lnx.is_positive() == y.est_positif();
            return Err(if positif {
                GenreErreur::Overflow
            } else {
                GenreErreur::Underflow
            });
        }
        Err(GenreErreur::Underflow) => return Ok(Nombre::un()),
        Err(autre) => return Err(autre),
        Ok(p) => {
            if p.log10_approx() > 6.0 {
                return Err(if p.est_positif() {
                    GenreErreur::Overflow
                } else {
                    GenreErreur::Underflow
                });
            }
        }
    }

    let p = fmul(&lnx, &y.vers_fixe(w), w);
    let r = exp_fixe(&p, w, budget)?;
    if x.est_negatif() && est_impair(y) {
        return Ok(r.neg());
    }
    Ok(r)
}

/// Racine cubique réelle (signe conservé).
pub fn cbrt(x: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    let Nombre::Fini { m, e } = x else {
        return Ok(Nombre::Nan);
    };
    if m.is_zero() {
        return Ok(Nombre::zero());
    }
    let w = W + 8;
    let l = ln_fixe(&m.abs(), *e, w, budget)? / 3;
    let r = exp_fixe(&l, w, budget)?;
    Ok(if m.is_negative() { r.neg() } else { r })
}

/* ------------------------ Trigonométrie (radians) ------------------------ */

/// (sin x, cos x), réduction modulo π/2 incluse.
pub(crate) fn sin_cos_fixe(
    x: &BigInt,
    w: u32,
    budget: &mut Budget,
) -> Result<(BigInt, BigInt), GenreErreur> {
    let s = pow10(w as usize);
    let demi_pi = pi_fixe(w) >> 1u32;

    let q = div_arrondie(x, &demi_pi);
    let r = x - &q * &demi_pi;
    let quadrant = (((&q % 4u32) + 4u32) % 4u32).to_u8().unwrap_or(0);

    let r2 = fmul(&r, &r, w);

    let mut terme = r.clone();
    let mut sin = r.clone();
    let mut k: u64 = 1;
    loop {
        terme = -fmul(&terme, &r2, w) / ((2 * k) * (2 * k + 1));
        if terme.is_zero() {
            break;
        }
        sin += &terme;
        k += 1;
        budget.consommer(1)?;
    }

    let mut terme = s.clone();
    let mut cos = s;
    let mut k: u64 = 1;
    loop {
        terme = -fmul(&terme, &r2, w) / ((2 * k - 1) * (2 * k));
        if terme.is_zero() {
            break;
        }
        cos += &terme;
        k += 1;
        budget.consommer(1)?;
    }

    Ok(match quadrant {
        0 => (sin, cos),
        1 => (cos, -sin),
        2 => (-sin, -cos),
        _ => (-cos, sin),
    })
}

/// Échelle de travail pour un argument d’exposant `sci`.
fn echelle_pour(sci: i64) -> u32 {
    W + sci.unsigned_abs().min(3 * PRECISION as u64) as u32
}

enum Trig {
    Sin,
    Cos,
}

fn trig_rad(x: &Nombre, f: Trig, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    if x.est_nan() {
        return Ok(Nombre::Nan);
    }
    let Some(sci) = x.exposant_sci() else {
        // x = 0
        return Ok(match f {
            Trig::Cos => Nombre::un(),
            _ => Nombre::zero(),
        });
    };
    if sci < EXPOSANT_LINEAIRE {
        return Ok(match f {
            Trig::Cos => Nombre::un(),
            _ => x.clone(),
        });
    }
    if sci > EXPOSANT_TRIG_MAX {
        return Err(GenreErreur::ResultOutOfRange);
    }

    let w = echelle_pour(sci);
    let (s, c) = sin_cos_fixe(&x.vers_fixe(w), w, budget)?;
    match f {
        Trig::Sin => Nombre::depuis_fixe(s, w),
        Trig::Cos => Nombre::depuis_fixe(c, w),
    }
}

pub fn sin(x: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    trig_rad(x, Trig::Sin, budget)
}

pub fn cos(x: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    trig_rad(x, Trig::Cos, budget)
}

/// atan(t) en virgule fixe, t quelconque.
pub(crate) fn atan_fixe(t: &BigInt, w: u32, budget: &mut Budget) -> Result<BigInt, GenreErreur> {
    if t.is_zero() {
        return Ok(BigInt::zero());
    }
    let s = pow10(w as usize);
    let neg = t.is_negative();
    let mut a = t.abs();

    // atan(x) = π/2 - atan(1/x)
    let complement = a > s;
    if complement {
        a = fdiv(&s, &a, w);
    }

    // deux réductions : atan(a) = 2·atan(a / (1 + √(1+a²)))
    for _ in 0..2 {
        let rac = fsqrt(&(&s + fmul(&a, &a, w)), w);
        a = fdiv(&a, &(&s + rac), w);
    }

    let a2 = fmul(&a, &a, w);
    let mut somme = a.clone();
    let mut puiss = a;
    let mut k: u64 = 1;
    loop {
        puiss = -fmul(&puiss, &a2, w);
        let terme = &puiss / (2 * k + 1);
        if terme.is_zero() {
            break;
        }
        somme += terme;
        k += 1;
        budget.consommer(1)?;
    }
    let mut r = somme << 2u32;

    if complement {
        r = (pi_fixe(w) >> 1u32) - r;
    }
    Ok(if neg { -r } else { r })
}

/// asin(x) en virgule fixe, |x| <= 1 (vérifié par l’appelant).
pub(crate) fn asin_fixe(x: &BigInt, w: u32, budget: &mut Budget) -> Result<BigInt, GenreErreur> {
    let s = pow10(w as usize);
    if x.abs() == s {
        let demi_pi = pi_fixe(w) >> 1u32;
        return Ok(if x.is_negative() { -demi_pi } else { demi_pi });
    }
    let c = fsqrt(&(&s - fmul(x, x, w)), w);
    if c.is_zero() {
        return Err(GenreErreur::InternalError);
    }
    atan_fixe(&fdiv(x, &c, w), w, budget)
}

/// Échelle pour un argument borné (|x| <= 1) : chiffres en plus si x est petit.
fn echelle_petit(x: &Nombre) -> u32 {
    match x.exposant_sci() {
        Some(s) if s < 0 => echelle_pour(s),
        _ => W,
    }
}

fn hors_intervalle_unite(x: &Nombre) -> bool {
    matches!(
        x.abs().comparer(&Nombre::un()),
        Some(std::cmp::Ordering::Greater)
    )
}

pub fn asin(x: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    if x.est_nan() {
        return Ok(Nombre::Nan);
    }
    if hors_intervalle_unite(x) {
        return Err(GenreErreur::UndefinedForArgumentDomain);
    }
    if x.exposant_sci().map_or(true, |s| s < EXPOSANT_LINEAIRE) {
        return Ok(x.clone());
    }
    let w = echelle_petit(x);
    let v = asin_fixe(&x.vers_fixe(w), w, budget)?;
    Nombre::depuis_fixe(v, w)
}

pub fn acos(x: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    if x.est_nan() {
        return Ok(Nombre::Nan);
    }
    if hors_intervalle_unite(x) {
        return Err(GenreErreur::UndefinedForArgumentDomain);
    }
    let w = W;
    let v = (pi_fixe(w) >> 1u32) - asin_fixe(&x.vers_fixe(w), w, budget)?;
    Nombre::depuis_fixe(v, w)
}

pub fn atan(x: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    if x.est_nan() {
        return Ok(Nombre::Nan);
    }
    let Some(sci) = x.exposant_sci() else {
        return Ok(Nombre::zero());
    };
    if sci < EXPOSANT_LINEAIRE {
        return Ok(x.clone());
    }
    if sci > PRECISION as i64 + 5 {
        // atan(x) = ±π/2 - 1/x, terme négligeable
        let demi_pi = Nombre::depuis_fixe(pi_fixe(W) >> 1u32, W)?;
        return Ok(if x.est_negatif() { demi_pi.neg() } else { demi_pi });
    }
    let w = if sci < 0 { echelle_pour(sci) } else { W };
    let v = atan_fixe(&x.vers_fixe(w), w, budget)?;
    Nombre::depuis_fixe(v, w)
}

/* ------------------------ Hyperboliques ------------------------ */

/// Au-delà, e^-|x| est négligeable devant e^|x| à 50 chiffres.
const SEUIL_EXP_NEGLIGEABLE: i64 = 120;

/// (sinh x, cosh x) par séries, |x| < 1.
fn sinh_cosh_serie(
    x: &BigInt,
    w: u32,
    budget: &mut Budget,
) -> Result<(BigInt, BigInt), GenreErreur> {
    let s = pow10(w as usize);
    let x2 = fmul(x, x, w);

    let mut terme = x.clone();
    let mut sh = x.clone();
    let mut k: u64 = 1;
    loop {
        terme = fmul(&terme, &x2, w) / ((2 * k) * (2 * k + 1));
        if terme.is_zero() {
            break;
        }
        sh += &terme;
        k += 1;
        budget.consommer(1)?;
    }

    let mut terme = s.clone();
    let mut ch = s;
    let mut k: u64 = 1;
    loop {
        terme = fmul(&terme, &x2, w) / ((2 * k - 1) * (2 * k));
        if terme.is_zero() {
            break;
        }
        ch += &terme;
        k += 1;
        budget.consommer(1)?;
    }
    Ok((sh, ch))
}

fn depasse(x: &Nombre, seuil: i64) -> bool {
    matches!(
        x.abs().comparer(&Nombre::depuis_i64(seuil)),
        Some(std::cmp::Ordering::Greater)
    )
}

pub fn sinh(x: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    if x.est_nan() {
        return Ok(Nombre::Nan);
    }
    let Some(sci) = x.exposant_sci() else {
        return Ok(Nombre::zero());
    };
    if sci < EXPOSANT_LINEAIRE {
        return Ok(x.clone());
    }
    if sci < 0 {
        let w = echelle_pour(sci);
        let (sh, _) = sinh_cosh_serie(&x.vers_fixe(w), w, budget)?;
        return Nombre::depuis_fixe(sh, w);
    }
    let deux = Nombre::depuis_i64(2);
    let ex = exp(&x.abs(), budget)?;
    let r = if depasse(x, SEUIL_EXP_NEGLIGEABLE) {
        ex.div(&deux)?
    } else {
        ex.sub(&Nombre::un().div(&ex)?)?.div(&deux)?
    };
    Ok(if x.est_negatif() { r.neg() } else { r })
}

pub fn cosh(x: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    if x.est_nan() {
        return Ok(Nombre::Nan);
    }
    let Some(sci) = x.exposant_sci() else {
        return Ok(Nombre::un());
    };
    if sci < 0 {
        let (_, ch) = sinh_cosh_serie(&x.vers_fixe(W), W, budget)?;
        return Nombre::depuis_fixe(ch, W);
    }
    let deux = Nombre::depuis_i64(2);
    let ex = exp(&x.abs(), budget)?;
    if depasse(x, SEUIL_EXP_NEGLIGEABLE) {
        return ex.div(&deux);
    }
    ex.add(&Nombre::un().div(&ex)?)?.div(&deux)
}

pub fn tanh(x: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    if x.est_nan() {
        return Ok(Nombre::Nan);
    }
    let Some(sci) = x.exposant_sci() else {
        return Ok(Nombre::zero());
    };
    if sci < EXPOSANT_LINEAIRE {
        return Ok(x.clone());
    }
    if depasse(x, 60) {
        return Ok(x.signe());
    }
    if sci < 0 {
        let w = echelle_pour(sci);
        let (sh, ch) = sinh_cosh_serie(&x.vers_fixe(w), w, budget)?;
        return Nombre::depuis_fixe(fdiv(&sh, &ch, w), w);
    }
    let un = Nombre::un();
    let e2 = exp(&x.abs().mul(&Nombre::depuis_i64(2))?, budget)?;
    let r = e2.sub(&un)?.div(&e2.add(&un)?)?;
    Ok(if x.est_negatif() { r.neg() } else { r })
}

/// ln(v) pour v en virgule fixe (échelle w).
fn ln_de_fixe(v: &BigInt, w: u32, budget: &mut Budget) -> Result<BigInt, GenreErreur> {
    ln_fixe(v, -(w as i64), w, budget)
}

pub fn asinh(x: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    if x.est_nan() {
        return Ok(Nombre::Nan);
    }
    let Some(sci) = x.exposant_sci() else {
        return Ok(Nombre::zero());
    };
    if sci < EXPOSANT_LINEAIRE {
        return Ok(x.clone());
    }
    if sci > 25 {
        // asinh x = ln(2|x|) + O(1/x²)
        let r = ln(&x.abs().mul(&Nombre::depuis_i64(2))?, budget)?;
        return Ok(if x.est_negatif() { r.neg() } else { r });
    }
    let w = if sci < 0 { echelle_pour(sci) } else { W + 2 };
    let s = pow10(w as usize);
    let a = x.abs().vers_fixe(w);
    let rac = fsqrt(&(&s + fmul(&a, &a, w)), w);
    let r = Nombre::depuis_fixe(ln_de_fixe(&(a + rac), w, budget)?, w)?;
    Ok(if x.est_negatif() { r.neg() } else { r })
}

pub fn acosh(x: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    if x.est_nan() {
        return Ok(Nombre::Nan);
    }
    match x.comparer(&Nombre::un()) {
        Some(std::cmp::Ordering::Less) => return Err(GenreErreur::UndefinedForArgumentDomain),
        Some(std::cmp::Ordering::Equal) => return Ok(Nombre::zero()),
        _ => {}
    }
    if x.exposant_sci().is_some_and(|s| s > 25) {
        return ln(&x.mul(&Nombre::depuis_i64(2))?, budget);
    }
    let w = W + 2 + chiffres_pres_de_un(x) / 2;
    let s = pow10(w as usize);
    let a = x.vers_fixe(w);
    let rac = fsqrt(&(fmul(&a, &a, w) - &s), w);
    Nombre::depuis_fixe(ln_de_fixe(&(a + rac), w, budget)?, w)
}

pub fn atanh(x: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    if x.est_nan() {
        return Ok(Nombre::Nan);
    }
    if !matches!(
        x.abs().comparer(&Nombre::un()),
        Some(std::cmp::Ordering::Less)
    ) {
        return Err(GenreErreur::UndefinedForArgumentDomain);
    }
    let Some(sci) = x.exposant_sci() else {
        return Ok(Nombre::zero());
    };
    if sci < EXPOSANT_LINEAIRE {
        return Ok(x.clone());
    }
    let w = echelle_petit(x) + chiffres_pres_de_un(&x.abs());
    let s = pow10(w as usize);
    let a = x.abs().vers_fixe(w);
    let q = fdiv(&(&s + &a), &(&s - &a), w);
    let r = Nombre::depuis_fixe(ln_de_fixe(&q, w, budget)? >> 1u32, w)?;
    Ok(if x.est_negatif() { r.neg() } else { r })
}

/* ------------------------ Gamma ------------------------ */

/// Nombre de B_{2k} précalculés.
const NB_BERNOULLI: usize = 50;

static BERNOULLI: OnceLock<Vec<BigRational>> = OnceLock::new();

/// B_2, B_4, …, B_{2·NB_BERNOULLI} (algorithme d’Akiyama–Tanigawa, exact).
fn bernoulli_pairs() -> &'static [BigRational] {
    BERNOULLI.get_or_init(|| {
        let n_max = 2 * NB_BERNOULLI;
        let mut a: Vec<BigRational> = Vec::with_capacity(n_max + 1);
        let mut out = Vec::with_capacity(NB_BERNOULLI);
        for m in 0..=n_max {
            a.push(BigRational::new(BigInt::one(), BigInt::from(m as i64 + 1)));
            for j in (1..=m).rev() {
                let diff = &a[j - 1] - &a[j];
                a[j - 1] = diff * BigRational::from_integer(BigInt::from(j as i64));
            }
            if m >= 2 && m % 2 == 0 {
                out.push(a[0].clone());
            }
        }
        out
    })
}

/// Seuil de la série de Stirling (décalage en dessous).
const STIRLING_Z0: i64 = 60;

/// ln Γ(z) pour z >= STIRLING_Z0 (virgule fixe).
fn ln_gamma_stirling(z: &BigInt, w: u32, budget: &mut Budget) -> Result<BigInt, GenreErreur> {
    let s = pow10(w as usize);
    let ln_z = ln_de_fixe(z, w, budget)?;
    let demi = &s >> 1u32;

    let mut r = fmul(&(z - &demi), &ln_z, w) - z;

    let deux_pi = pi_fixe(w) << 1u32;
    r += ln_de_fixe(&deux_pi, w, budget)? >> 1u32;

    let inv_z = fdiv(&s, z, w);
    let inv_z2 = fmul(&inv_z, &inv_z, w);
    let mut p = inv_z;
    for (i, b) in bernoulli_pairs().iter().enumerate() {
        let k = (i + 1) as i64;
        let deno = b.denom() * BigInt::from(2 * k * (2 * k - 1));
        let terme = (&p * b.numer()) / deno;
        if terme.is_zero() {
            break;
        }
        r += terme;
        p = fmul(&p, &inv_z2, w);
        budget.consommer(1)?;
    }
    Ok(r)
}

/// ln Γ(z) pour 0 < z <= 1e20 (virgule fixe).
pub(crate) fn ln_gamma_fixe(
    z: &Nombre,
    w: u32,
    budget: &mut Budget,
) -> Result<BigInt, GenreErreur> {
    let s = pow10(w as usize);
    let z0 = BigInt::from(STIRLING_Z0) * &s;
    let mut zz = z.vers_fixe(w);
    if zz >= z0 {
        return ln_gamma_stirling(&zz, w, budget);
    }

    // Γ(z) = Γ(z+n) / (z(z+1)…(z+n-1))
    let mut prod = s.clone();
    while zz < z0 {
        prod = fmul(&prod, &zz, w);
        zz += &s;
        budget.consommer(1)?;
    }
    let lp = ln_de_fixe(&prod, w, budget)?;
    Ok(ln_gamma_stirling(&zz, w, budget)? - lp)
}

fn echelle_gamma(z: &Nombre) -> u32 {
    let extra = match z.exposant_sci() {
        Some(s) if s < 0 => s.unsigned_abs().min(2 * PRECISION as u64) as u32,
        _ => 0,
    };
    W + 25 + extra
}

/// n! exact par produit entier.
fn factorielle_entiere(n: i64, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    budget.reserver(n.max(0) as u64)?;
    let mut p = BigInt::one();
    for i in 2..=n {
        p *= i;
        budget.consommer(1)?;
    }
    Nombre::entier(p)
}

/// sin(π·z) via la partie fractionnaire exacte (pour la réflexion).
fn sin_pi(z: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    let t = z.tronquer();
    let f = z.sub(&t)?;
    let w = W + 5;
    let (s, _) = sin_cos_fixe(&fmul(&pi_fixe(w), &f.vers_fixe(w), w), w, budget)?;
    let s = Nombre::depuis_fixe(s, w)?;
    Ok(if est_impair(&t) { s.neg() } else { s })
}

pub fn gamma(z: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    if z.est_nan() {
        return Ok(Nombre::Nan);
    }
    if z.est_entier() && !z.est_positif() {
        return Err(GenreErreur::UndefinedForArgumentDomain);
    }
    if z.est_entier() {
        if let Some(n) = z.vers_i64() {
            if n - 1 <= FACTORIELLE_EXACTE_MAX {
                return factorielle_entiere(n - 1, budget);
            }
        }
    }

    if z.est_negatif() {
        // réflexion : Γ(z) = π / (sin(πz)·Γ(1-z))
        let g = match gamma(&Nombre::un().sub(z)?, budget) {
            Err(GenreErreur::Overflow) => return Err(GenreErreur::Underflow),
            autre => autre?,
        };
        let s = sin_pi(z, budget)?;
        return pi().div(&s.mul(&g)?);
    }

    if depasse(z, GAMMA_ARG_MAX) {
        return Err(GenreErreur::Overflow);
    }
    let w = echelle_gamma(z);
    let l = ln_gamma_fixe(z, w, budget)?;
    exp_fixe(&l, w, budget)
}

pub fn ln_gamma(z: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    if z.est_nan() {
        return Ok(Nombre::Nan);
    }
    if !z.est_positif() {
        return Err(GenreErreur::UndefinedForArgumentDomain);
    }
    if z.exposant_sci().is_some_and(|s| s > 20) {
        // Stirling tronqué : (z - 1/2)·ln z - z + ln(2π)/2
        let demi = Nombre::depuis_decimal("0.5")?;
        let ln_z = ln(z, budget)?;
        let w = W;
        let demi_ln_2pi =
            Nombre::depuis_fixe(ln_de_fixe(&(pi_fixe(w) << 1u32), w, budget)? >> 1u32, w)?;
        return z.sub(&demi)?.mul(&ln_z)?.sub(z)?.add(&demi_ln_2pi);
    }
    let w = echelle_gamma(z);
    let l = ln_gamma_fixe(z, w, budget)?;
    Nombre::depuis_fixe(l, w)
}

/// x! = Γ(x+1), exact pour les petits entiers.
pub fn factorielle(x: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    if x.est_nan() {
        return Ok(Nombre::Nan);
    }
    if x.est_entier() {
        if x.est_negatif() {
            return Err(GenreErreur::UndefinedForArgumentDomain);
        }
        if let Some(n) = x.vers_i64() {
            if n <= FACTORIELLE_EXACTE_MAX {
                return factorielle_entiere(n, budget);
            }
        }
    }
    gamma(&x.add(&Nombre::un())?, budget)
}

/* ------------------------ erf / erfc ------------------------ */

/// erf(x) pour x > 0 (virgule fixe) :
/// erf x = 2/√π · e^{-x²} · Σ 2^n x^{2n+1} / (1·3·…·(2n+1)), série à termes positifs.
fn erf_fixe(x: &BigInt, w: u32, budget: &mut Budget) -> Result<BigInt, GenreErreur> {
    let x2 = fmul(x, x, w);
    let deux_x2 = &x2 << 1u32;

    let mut terme = x.clone();
    let mut somme = x.clone();
    let mut n: u64 = 0;
    loop {
        n += 1;
        terme = fmul(&terme, &deux_x2, w) / (2 * n + 1);
        if terme.is_zero() {
            break;
        }
        somme += &terme;
        budget.consommer(1)?;
    }

    let e = exp_valeur_fixe(&-x2, w, budget)?;
    let rac_pi = fsqrt(&pi_fixe(w), w);
    let r = fdiv(&(fmul(&somme, &e, w) << 1u32), &rac_pi, w);
    Ok(r)
}

/// Chiffres à ajouter pour que 1 - erf(x) garde sa précision relative.
fn chiffres_erfc(x: &Nombre) -> u32 {
    let xf = x.vers_f64().abs();
    (xf * xf * std::f64::consts::LOG10_E).ceil() as u32 + 4
}

pub fn erf(x: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    if x.est_nan() {
        return Ok(Nombre::Nan);
    }
    let Some(sci) = x.exposant_sci() else {
        return Ok(Nombre::zero());
    };
    if depasse(x, SEUIL_ERFC_ASYMPTOTIQUE) {
        return Ok(x.signe());
    }
    let w = if sci < 0 { echelle_pour(sci) } else { W };
    let r = Nombre::depuis_fixe(erf_fixe(&x.abs().vers_fixe(w), w, budget)?, w)?;
    Ok(if x.est_negatif() { r.neg() } else { r })
}

pub fn erfc(x: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    if x.est_nan() {
        return Ok(Nombre::Nan);
    }
    if x.est_negatif() {
        // erfc(-x) = 1 + erf(x)
        return Nombre::un().add(&erf(&x.abs(), budget)?);
    }
    if x.est_zero() {
        return Ok(Nombre::un());
    }
    if !depasse(x, SEUIL_ERFC_ASYMPTOTIQUE) {
        let w = W + chiffres_erfc(x);
        let s = pow10(w as usize);
        let v = erf_fixe(&x.vers_fixe(w), w, budget)?;
        return Nombre::depuis_fixe(s - v, w);
    }

    // asymptotique : e^{-x²}/(x√π) · Σ (-1)^n (2n-1)!! / (2x²)^n
    let x2 = match x.mul(x) {
        Err(GenreErreur::Overflow) => return Err(GenreErreur::Underflow),
        autre => autre?,
    };
    let e = exp(&x2.neg(), budget)?;

    let w = W;
    let s = pow10(w as usize);
    let inv_2x2 = fdiv(&s, &(x2.vers_fixe(w) << 1u32), w);
    let mut terme = s.clone();
    let mut somme = s;
    let mut n: u64 = 1;
    loop {
        let suivant = -fmul(&terme, &inv_2x2, w) * (2 * n - 1);
        if suivant.is_zero() || suivant.abs() >= terme.abs() {
            break;
        }
        somme += &suivant;
        terme = suivant;
        n += 1;
        budget.consommer(1)?;
    }
    let facteur = Nombre::depuis_fixe(somme, w)?;
    let rac_pi = Nombre::depuis_fixe(fsqrt(&pi_fixe(w), w), w)?;
    e.mul(&facteur)?.div(&x.mul(&rac_pi)?)
}
