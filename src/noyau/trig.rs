// src/noyau/trig.rs
//
// Trigonométrie selon le mode d’angle
// -----------------------------------
// - Degrés : réduction exacte modulo 360 (entiers décimaux), puis
//   table des angles remarquables kπ/n, n ∈ {1,2,3,4,6} (valeurs rationnelles)
// - Radians : noyaux de transcendantes.rs ; un résultat au niveau du bruit
//   d’arrondi de l’argument (sin(π), cos(π/2)) vaut 0
// - Fonctions réciproques (asin, acos, atan) : résultat exprimé dans le mode courant

use num_bigint::BigInt;
use num_traits::Signed;

use super::budget::Budget;
use super::erreur::GenreErreur;
use super::nombre::{pow10, Nombre, PRECISION};
use super::transcendantes::{self as tr, asin_fixe, atan_fixe, fdiv, fmul, pi_fixe, sin_cos_fixe, W};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModeAngle {
    Radian,
    #[default]
    Degre,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrigFn {
    Sin,
    Cos,
    Tan,
    Cot,
    Sec,
    Csc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrigInv {
    Asin,
    Acos,
    Atan,
}

pub fn trig(
    x: &Nombre,
    f: TrigFn,
    mode: ModeAngle,
    budget: &mut Budget,
) -> Result<Nombre, GenreErreur> {
    if x.est_nan() {
        return Ok(Nombre::Nan);
    }
    match mode {
        ModeAngle::Degre => trig_degres(x, f, budget),
        ModeAngle::Radian => trig_radians(x, f, budget),
    }
}

/* ------------------------ Degrés ------------------------ */

/// |x| mod periode, exact (x = m·10^e).
fn reste_exact(x: &Nombre, periode: u32) -> Result<Nombre, GenreErreur> {
    let Nombre::Fini { m, e } = x else {
        return Ok(Nombre::Nan);
    };
    let p = BigInt::from(periode);
    let m = m.abs();
    if *e >= 0 {
        // m·10^e mod p sans matérialiser 10^e
        let dix_e = BigInt::from(10).modpow(&BigInt::from(*e), &p);
        return Nombre::entier((m * dix_e) % p);
    }
    let echelle = pow10(e.unsigned_abs() as usize);
    Nombre::depuis_parties(m % (p * echelle), *e)
}

/// Angle remarquable en degrés entiers : r/180 = k/n, n ∈ {1,2,3,4,6}.
fn angle_remarquable(r: &Nombre) -> Option<(i64, i64)> {
    let r = r.vers_i64()?;
    let g = gcd_i64(r, 180);
    let (k, n) = (r / g, 180 / g);
    if [1, 2, 3, 4, 6].contains(&n) {
        Some((k, n))
    } else {
        None
    }
}

/// Valeur exacte de sin/cos/tan(kπ/n) quand elle est rationnelle.
/// Err(UndefinedForArgumentDomain) pour tan(π/2), tan(3π/2).
fn valeur_exacte(f: TrigFn, a: (i64, i64)) -> Option<Result<Nombre, GenreErreur>> {
    let demi = || Nombre::depuis_fixe(BigInt::from(5), 1);
    let v = |n: i64| Ok(Nombre::depuis_i64(n));

    let out = match f {
        TrigFn::Sin => match a {
            (0, _) | (1, 1) => v(0),
            (1, 6) | (5, 6) => demi(),
            (7, 6) | (11, 6) => demi().map(|d| d.neg()),
            (1, 2) => v(1),
            (3, 2) => v(-1),
            _ => return None,
        },
        TrigFn::Cos => match a {
            (0, _) => v(1),
            (1, 1) => v(-1),
            (1, 3) | (5, 3) => demi(),
            (2, 3) | (4, 3) => demi().map(|d| d.neg()),
            (1, 2) | (3, 2) => v(0),
            _ => return None,
        },
        TrigFn::Tan => match a {
            (0, _) | (1, 1) => v(0),
            (1, 4) | (5, 4) => v(1),
            (3, 4) | (7, 4) => v(-1),
            (1, 2) | (3, 2) => Err(GenreErreur::UndefinedForArgumentDomain),
            _ => return None,
        },
        TrigFn::Cot => inverse_exacte(valeur_exacte(TrigFn::Tan, a)?),
        TrigFn::Sec => inverse_exacte(valeur_exacte(TrigFn::Cos, a)?),
        TrigFn::Csc => inverse_exacte(valeur_exacte(TrigFn::Sin, a)?),
    };
    tracing::trace!(?f, angle = %format_angle_kn_pi(a.0, a.1), "angle remarquable");
    Some(out)
}

/// 1/v pour une valeur de table (1/indéfini = 0 : cot(π/2) = 0).
fn inverse_exacte(v: Result<Nombre, GenreErreur>) -> Result<Nombre, GenreErreur> {
    match v {
        Err(GenreErreur::UndefinedForArgumentDomain) => Ok(Nombre::zero()),
        Err(e) => Err(e),
        Ok(v) if v.est_zero() => Err(GenreErreur::UndefinedForArgumentDomain),
        Ok(v) => Nombre::un().div(&v),
    }
}

fn est_impaire(f: TrigFn) -> bool {
    matches!(f, TrigFn::Sin | TrigFn::Tan | TrigFn::Cot | TrigFn::Csc)
}

fn trig_degres(x: &Nombre, f: TrigFn, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    // parité : on travaille sur |x|
    let r = reste_exact(x, 360)?;
    let signe = |v: Nombre| {
        if x.est_negatif() && est_impaire(f) {
            v.neg()
        } else {
            v
        }
    };

    if let Some(a) = angle_remarquable(&r) {
        if let Some(v) = valeur_exacte(f, a) {
            return v.map(signe);
        }
    }

    // r ∈ (0, 360) non remarquable : conversion en radians en virgule fixe
    let w = match r.exposant_sci() {
        Some(s) if s < 0 => W + 5 + s.unsigned_abs().min(3 * PRECISION as u64) as u32,
        _ => W + 5,
    };
    let rad = fmul(&r.vers_fixe(w), &pi_fixe(w), w) / 180u32;
    let (s, c) = sin_cos_fixe(&rad, w, budget)?;
    let un = pow10(w as usize);

    let v = match f {
        TrigFn::Sin => s,
        TrigFn::Cos => c,
        TrigFn::Tan => fdiv(&s, &c, w),
        TrigFn::Cot => fdiv(&c, &s, w),
        TrigFn::Sec => fdiv(&un, &c, w),
        TrigFn::Csc => fdiv(&un, &s, w),
    };
    Nombre::depuis_fixe(v, w).map(signe)
}

/* ------------------------ Radians ------------------------ */

/// Valeur au niveau du bruit d’arrondi de l’argument => 0.
fn sans_bruit(v: Nombre, x: &Nombre) -> Nombre {
    match (v.exposant_sci(), x.exposant_sci()) {
        (Some(sv), Some(sx)) if sx >= 0 && sv <= sx - PRECISION as i64 + 1 => Nombre::zero(),
        _ => v,
    }
}

fn trig_radians(x: &Nombre, f: TrigFn, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    let sin = |b: &mut Budget| tr::sin(x, b).map(|v| sans_bruit(v, x));
    let cos = |b: &mut Budget| tr::cos(x, b).map(|v| sans_bruit(v, x));

    match f {
        TrigFn::Sin => sin(budget),
        TrigFn::Cos => cos(budget),
        TrigFn::Tan | TrigFn::Cot => {
            let s = sin(budget)?;
            let c = cos(budget)?;
            let (num, den) = if f == TrigFn::Tan { (s, c) } else { (c, s) };
            if den.est_zero() {
                return Err(GenreErreur::UndefinedForArgumentDomain);
            }
            num.div(&den)
        }
        TrigFn::Sec | TrigFn::Csc => {
            let d = if f == TrigFn::Sec { cos(budget)? } else { sin(budget)? };
            if d.est_zero() {
                return Err(GenreErreur::UndefinedForArgumentDomain);
            }
            Nombre::un().div(&d)
        }
    }
}

/* ------------------------ Réciproques ------------------------ */

/// Résultats exacts en degrés : asin/acos(0, ±1/2, ±1), atan(0, ±1).
fn inverse_remarquable(x: &Nombre, f: TrigInv) -> Option<Nombre> {
    let deux_x = x.mul(&Nombre::depuis_i64(2)).ok()?.vers_i64()?;
    let deg = match (f, deux_x) {
        (TrigInv::Asin, d) if d.abs() <= 2 => [-90, -30, 0, 30, 90][(d + 2) as usize],
        (TrigInv::Acos, d) if d.abs() <= 2 => [180, 120, 90, 60, 0][(d + 2) as usize],
        (TrigInv::Atan, d) if matches!(d, -2 | 0 | 2) => 45 * d / 2,
        _ => return None,
    };
    Some(Nombre::depuis_i64(deg))
}

pub fn trig_inverse(
    x: &Nombre,
    f: TrigInv,
    mode: ModeAngle,
    budget: &mut Budget,
) -> Result<Nombre, GenreErreur> {
    if x.est_nan() {
        return Ok(Nombre::Nan);
    }
    if mode == ModeAngle::Radian {
        return match f {
            TrigInv::Asin => tr::asin(x, budget),
            TrigInv::Acos => tr::acos(x, budget),
            TrigInv::Atan => tr::atan(x, budget),
        };
    }

    if f != TrigInv::Atan
        && matches!(
            x.abs().comparer(&Nombre::un()),
            Some(std::cmp::Ordering::Greater)
        )
    {
        return Err(GenreErreur::UndefinedForArgumentDomain);
    }
    if let Some(v) = inverse_remarquable(x, f) {
        return Ok(v);
    }

    let sci = x.exposant_sci().unwrap_or(0);
    if f == TrigInv::Atan && sci > PRECISION as i64 + 5 {
        let v = Nombre::depuis_i64(90);
        return Ok(if x.est_negatif() { v.neg() } else { v });
    }
    if f != TrigInv::Acos && sci < -(PRECISION as i64 + 5) {
        return degres(x);
    }

    let w = if sci < 0 {
        W + 5 + sci.unsigned_abs().min(3 * PRECISION as u64) as u32
    } else {
        W + 5
    };
    let xf = x.vers_fixe(w);
    let rad = match f {
        TrigInv::Asin => asin_fixe(&xf, w, budget)?,
        TrigInv::Acos => (pi_fixe(w) >> 1u32) - asin_fixe(&xf, w, budget)?,
        TrigInv::Atan => atan_fixe(&xf, w, budget)?,
    };
    let deg = fdiv(&(rad * 180u32), &pi_fixe(w), w);
    Nombre::depuis_fixe(deg, w)
}

/* ------------------------ Conversions ------------------------ */

/// radians -> degrés
pub fn degres(x: &Nombre) -> Result<Nombre, GenreErreur> {
    x.mul(&Nombre::depuis_i64(180))?.div(&tr::pi())
}

/// degrés -> radians
pub fn radians(x: &Nombre) -> Result<Nombre, GenreErreur> {
    x.mul(&tr::pi())?.div(&Nombre::depuis_i64(180))
}

/* ------------------------ Outils ------------------------ */

fn format_angle_kn_pi(k: i64, n: i64) -> String {
    if k == 0 {
        return "0".to_string();
    }
    if n == 1 {
        return match k {
            1 => "π".to_string(),
            _ => format!("{k}π"),
        };
    }
    if k == 1 {
        return format!("π/{n}");
    }
    format!("{k}π/{n}")
}

fn gcd_i64(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn n(s: &str) -> Nombre {
        Nombre::depuis_decimal(s).unwrap()
    }

    fn deg(x: &str, f: TrigFn) -> Result<Nombre, GenreErreur> {
        trig(&n(x), f, ModeAngle::Degre, &mut Budget::default())
    }

    fn rad(x: &Nombre, f: TrigFn) -> Result<Nombre, GenreErreur> {
        trig(x, f, ModeAngle::Radian, &mut Budget::default())
    }

    #[test]
    fn degres_remarquables_exacts() {
        assert_eq!(deg("90", TrigFn::Sin), Ok(n("1")));
        assert_eq!(deg("30", TrigFn::Sin), Ok(n("0.5")));
        assert_eq!(deg("-30", TrigFn::Sin), Ok(n("-0.5")));
        assert_eq!(deg("60", TrigFn::Cos), Ok(n("0.5")));
        assert_eq!(deg("180", TrigFn::Sin), Ok(n("0")));
        assert_eq!(deg("450", TrigFn::Sin), Ok(n("1")));
        assert_eq!(deg("-45", TrigFn::Tan), Ok(n("-1")));
        assert_eq!(deg("720", TrigFn::Cos), Ok(n("1")));
        assert_eq!(deg("90", TrigFn::Cot), Ok(n("0")));
        assert_eq!(deg("60", TrigFn::Sec), Ok(n("2")));
    }

    #[test]
    fn degres_indefinis() {
        assert_eq!(
            deg("90", TrigFn::Tan),
            Err(GenreErreur::UndefinedForArgumentDomain)
        );
        assert_eq!(
            deg("-270", TrigFn::Tan),
            Err(GenreErreur::UndefinedForArgumentDomain)
        );
        assert_eq!(
            deg("180", TrigFn::Csc),
            Err(GenreErreur::UndefinedForArgumentDomain)
        );
        assert_eq!(
            deg("0", TrigFn::Cot),
            Err(GenreErreur::UndefinedForArgumentDomain)
        );
    }

    #[test]
    fn degres_non_remarquables() {
        let s = deg("45", TrigFn::Sin).unwrap();
        assert!(s.to_string().starts_with("0.70710678118654752440084436210484903928483593768"));
        let c = deg("1", TrigFn::Cos).unwrap();
        assert!(c.to_string().starts_with("0.99984769515639123915701155881391485169274031058"));
        // réduction exacte des grands angles
        assert_eq!(deg("1e30", TrigFn::Sin), deg("280", TrigFn::Sin));
    }

    #[test]
    fn radians_bruit_ramene_a_zero() {
        let pi = tr::pi();
        assert_eq!(rad(&pi, TrigFn::Sin), Ok(Nombre::zero()));
        assert_eq!(rad(&pi, TrigFn::Cos), Ok(n("-1")));
        let demi_pi = pi.div(&n("2")).unwrap();
        assert_eq!(rad(&demi_pi, TrigFn::Cos), Ok(Nombre::zero()));
        assert_eq!(
            rad(&demi_pi, TrigFn::Tan),
            Err(GenreErreur::UndefinedForArgumentDomain)
        );
        // petit argument : aucune mise à zéro
        assert_eq!(rad(&n("1e-60"), TrigFn::Sin), Ok(n("1e-60")));
    }

    #[test]
    fn reciproques() {
        let mut b = Budget::default();
        let d = ModeAngle::Degre;
        assert_eq!(trig_inverse(&n("1"), TrigInv::Asin, d, &mut b), Ok(n("90")));
        assert_eq!(trig_inverse(&n("-0.5"), TrigInv::Acos, d, &mut b), Ok(n("120")));
        assert_eq!(trig_inverse(&n("-1"), TrigInv::Atan, d, &mut b), Ok(n("-45")));
        assert_eq!(
            trig_inverse(&n("2"), TrigInv::Asin, d, &mut b),
            Err(GenreErreur::UndefinedForArgumentDomain)
        );
        let a = trig_inverse(&n("0.1"), TrigInv::Asin, d, &mut b).unwrap();
        assert!(a.to_string().starts_with("5.73917047726678631251490890393039252571177730152"));
        let r = trig_inverse(&n("1"), TrigInv::Atan, ModeAngle::Radian, &mut b).unwrap();
        assert_eq!(degres(&r), Ok(n("45")));
    }

    #[test]
    fn conversions() {
        assert_eq!(radians(&n("180")), Ok(tr::pi()));
        assert_eq!(degres(&tr::pi()), Ok(n("180")));
    }
}
