// src/noyau/stats.rs
//
// Statistiques (variadiques), combinatoire et lois discrètes.
// - ncr / npr : produits entiers exacts, plafond 1024 bits, coût réservé d’avance
// - pmf / cdf : termes calculés en log (virgule fixe), puis exp ; une loi
//   dont les termes isolés sortent de la plage reste calculable
// - variance : variance de population (division par n)

use num_bigint::BigInt;
use num_traits::{One, Zero};

use std::cmp::Ordering;

use super::budget::Budget;
use super::erreur::GenreErreur;
use super::logique::{compteur, BITS_ENTIER};
use super::nombre::{nb_chiffres, Nombre};
use super::transcendantes::{exp_fixe, ln_fixe, ln_gamma_fixe, W};

/* ------------------------ Statistiques ------------------------ */

fn non_vide(args: &[Nombre]) -> Result<(), GenreErreur> {
    if args.is_empty() {
        return Err(GenreErreur::WrongNumberOfArguments);
    }
    Ok(())
}

pub fn somme(args: &[Nombre], budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    non_vide(args)?;
    let mut acc = Nombre::zero();
    for x in args {
        budget.consommer(1)?;
        acc = acc.add(x)?;
    }
    Ok(acc)
}

pub fn produit(args: &[Nombre], budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    non_vide(args)?;
    let mut acc = Nombre::un();
    for x in args {
        budget.consommer(1)?;
        acc = acc.mul(x)?;
    }
    Ok(acc)
}

pub fn moyenne(args: &[Nombre], budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    somme(args, budget)?.div(&Nombre::depuis_i64(args.len() as i64))
}

/// exp(Σ ln xᵢ / n) : pas de produit intermédiaire hors plage.
pub fn moyenne_geometrique(args: &[Nombre], budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    non_vide(args)?;
    let w = W + 10;
    let mut acc = BigInt::zero();
    for x in args {
        let Nombre::Fini { m, e } = x else {
            return Ok(Nombre::Nan);
        };
        acc += ln_fixe(m, *e, w, budget)?;
    }
    exp_fixe(&(acc / args.len()), w, budget)
}

pub fn mediane(args: &[Nombre], budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    non_vide(args)?;
    budget.consommer(args.len() as u64)?;
    let mut v = args.to_vec();
    v.sort_by(|a, b| a.comparer(b).unwrap_or(Ordering::Equal));
    let n = v.len();
    if n % 2 == 1 {
        return Ok(v[n / 2].clone());
    }
    v[n / 2 - 1].add(&v[n / 2])?.div(&Nombre::depuis_i64(2))
}

pub fn extremum(args: &[Nombre], maximum: bool) -> Result<Nombre, GenreErreur> {
    non_vide(args)?;
    let garder = if maximum {
        Ordering::Greater
    } else {
        Ordering::Less
    };
    let mut meilleur = &args[0];
    for x in &args[1..] {
        if x.comparer(meilleur) == Some(garder) {
            meilleur = x;
        }
    }
    Ok(meilleur.clone())
}

pub fn variance(args: &[Nombre], budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    let moy = moyenne(args, budget)?;
    let mut acc = Nombre::zero();
    for x in args {
        budget.consommer(1)?;
        let d = x.sub(&moy)?;
        acc = acc.add(&d.mul(&d)?)?;
    }
    acc.div(&Nombre::depuis_i64(args.len() as i64))
}

pub fn ecart_type(args: &[Nombre], budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    variance(args, budget)?.racine_carree()
}

/// Écart absolu moyen autour de la moyenne.
pub fn ecart_absolu(args: &[Nombre], budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    let moy = moyenne(args, budget)?;
    let mut acc = Nombre::zero();
    for x in args {
        budget.consommer(1)?;
        acc = acc.add(&x.sub(&moy)?.abs())?;
    }
    acc.div(&Nombre::depuis_i64(args.len() as i64))
}

/* ------------------------ Combinatoire ------------------------ */

/// C(n, k) exact ; `bits_max` arrête le calcul dès qu’il est dépassé.
fn binomial(n: i64, k: i64, bits_max: u64, budget: &mut Budget) -> Result<BigInt, GenreErreur> {
    let k = k.min(n - k);
    budget.reserver(k.max(0) as u64)?;
    let mut c = BigInt::one();
    for i in 0..k {
        c = c * (n - i) / (i + 1);
        budget.consommer(1)?;
        if c.bits() > bits_max {
            return Err(GenreErreur::IntegerOverflow);
        }
    }
    Ok(c)
}

pub fn ncr(n: &Nombre, k: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    let n = compteur(n)?;
    let k = compteur(k)?;
    if k > n {
        return Ok(Nombre::zero());
    }
    Nombre::entier(binomial(n, k, BITS_ENTIER, budget)?)
}

pub fn npr(n: &Nombre, k: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    let n = compteur(n)?;
    let k = compteur(k)?;
    if k > n {
        return Ok(Nombre::zero());
    }
    budget.reserver(k as u64)?;
    let mut p = BigInt::one();
    for i in 0..k {
        p *= n - i;
        budget.consommer(1)?;
        if p.bits() > BITS_ENTIER {
            return Err(GenreErreur::IntegerOverflow);
        }
    }
    Nombre::entier(p)
}

/* ------------------------ Logarithmes (virgule fixe) ------------------------ */

/// Sous ce seuil, C(n, k) et k! sont calculés exactement avant le ln.
const LN_EXACT_MAX: i64 = 200;

fn ln_entier(n: i64, w: u32, budget: &mut Budget) -> Result<BigInt, GenreErreur> {
    ln_fixe(&BigInt::from(n), 0, w, budget)
}

fn ln_nombre(x: &Nombre, w: u32, budget: &mut Budget) -> Result<BigInt, GenreErreur> {
    match x {
        Nombre::Fini { m, e } => ln_fixe(m, *e, w, budget),
        Nombre::Nan => Err(GenreErreur::DoesNotAcceptNaN),
    }
}

fn ln_gamma_entier(n: i64, w: u32, budget: &mut Budget) -> Result<BigInt, GenreErreur> {
    ln_gamma_fixe(&Nombre::depuis_i64(n), w, budget)
}

/// ln C(n, k), 0 <= k <= n.
fn ln_binomial(n: i64, k: i64, w: u32, budget: &mut Budget) -> Result<BigInt, GenreErreur> {
    if k.min(n - k) <= LN_EXACT_MAX {
        let c = binomial(n, k, u64::MAX, budget)?;
        return ln_fixe(&c, 0, w, budget);
    }
    Ok(ln_gamma_entier(n + 1, w, budget)?
        - ln_gamma_entier(k + 1, w, budget)?
        - ln_gamma_entier(n - k + 1, w, budget)?)
}

/// ln k!
fn ln_factorielle(k: i64, w: u32, budget: &mut Budget) -> Result<BigInt, GenreErreur> {
    if k <= LN_EXACT_MAX {
        budget.consommer(k as u64)?;
        let f = (2..=k).fold(BigInt::one(), |acc, i| acc * i);
        return ln_fixe(&f, 0, w, budget);
    }
    ln_gamma_entier(k + 1, w, budget)
}

/// Échelle des sommes en log : les chiffres entiers de l’argument s’ajoutent.
fn echelle_log(ordre: i64) -> u32 {
    W + 10 + nb_chiffres(&BigInt::from(ordre.max(1))) as u32
}

/// Σ exp(l_k), l_{k+1} = l_k + pas(k). Les termes trop petits sont ignorés.
fn somme_log(
    mut l: BigInt,
    debut: i64,
    fin: i64,
    w: u32,
    budget: &mut Budget,
    mut pas: impl FnMut(i64, &mut Budget) -> Result<BigInt, GenreErreur>,
) -> Result<Nombre, GenreErreur> {
    budget.reserver((fin - debut + 1).max(0) as u64)?;
    let mut acc = Nombre::zero();
    let mut perdu = false;
    for k in debut..=fin {
        match exp_fixe(&l, w, budget) {
            Ok(t) => acc = acc.add(&t)?,
            Err(GenreErreur::Underflow) => perdu = true,
            Err(e) => return Err(e),
        }
        if k < fin {
            l += pas(k, budget)?;
        }
    }
    if acc.est_zero() && perdu {
        return Err(GenreErreur::Underflow);
    }
    // une probabilité cumulée ne dépasse pas 1 (arrondis)
    if acc.comparer(&Nombre::un()) == Some(Ordering::Greater) {
        return Ok(Nombre::un());
    }
    Ok(acc)
}

/* ------------------------ Arguments des lois ------------------------ */

/// Entier signé (une valeur hors i64 est saturée).
fn entier_signe(x: &Nombre) -> Result<i64, GenreErreur> {
    if x.est_nan() {
        return Err(GenreErreur::DoesNotAcceptNaN);
    }
    if !x.est_entier() {
        return Err(GenreErreur::UndefinedForArgumentDomain);
    }
    Ok(x.vers_i64()
        .unwrap_or(if x.est_negatif() { i64::MIN } else { i64::MAX }))
}

fn probabilite(p: &Nombre) -> Result<(), GenreErreur> {
    if p.est_nan() {
        return Err(GenreErreur::DoesNotAcceptNaN);
    }
    if p.est_negatif() || p.comparer(&Nombre::un()) == Some(Ordering::Greater) {
        return Err(GenreErreur::UndefinedForArgumentDomain);
    }
    Ok(())
}

fn indicatrice(b: bool) -> Nombre {
    if b {
        Nombre::un()
    } else {
        Nombre::zero()
    }
}

/* ------------------------ Loi binomiale ------------------------ */

/// binompmf(hits; trials; probability)
pub fn binom_pmf(
    k: &Nombre,
    n: &Nombre,
    p: &Nombre,
    budget: &mut Budget,
) -> Result<Nombre, GenreErreur> {
    let n = compteur(n)?;
    let k = entier_signe(k)?;
    probabilite(p)?;
    if k < 0 || k > n {
        return Ok(Nombre::zero());
    }
    if p.est_zero() {
        return Ok(indicatrice(k == 0));
    }
    if p.est_un() {
        return Ok(indicatrice(k == n));
    }
    let w = echelle_log(n);
    let q = Nombre::un().sub(p)?;
    let l = ln_binomial(n, k, w, budget)?
        + ln_nombre(p, w, budget)? * k
        + ln_nombre(&q, w, budget)? * (n - k);
    exp_fixe(&l, w, budget)
}

/// binomcdf(max; trials; probability)
pub fn binom_cdf(
    m: &Nombre,
    n: &Nombre,
    p: &Nombre,
    budget: &mut Budget,
) -> Result<Nombre, GenreErreur> {
    let n = compteur(n)?;
    let m = entier_signe(m)?;
    probabilite(p)?;
    if m < 0 {
        return Ok(Nombre::zero());
    }
    if m >= n || p.est_zero() {
        return Ok(Nombre::un());
    }
    if p.est_un() {
        return Ok(Nombre::zero());
    }
    let w = echelle_log(n);
    let q = Nombre::un().sub(p)?;
    let ln_q = ln_nombre(&q, w, budget)?;
    let rapport = ln_nombre(p, w, budget)? - &ln_q;
    somme_log(&ln_q * n, 0, m, w, budget, |k, b| {
        Ok(ln_entier(n - k, w, b)? - ln_entier(k + 1, w, b)? + &rapport)
    })
}

pub fn binom_moyenne(n: &Nombre, p: &Nombre) -> Result<Nombre, GenreErreur> {
    let n = compteur(n)?;
    probabilite(p)?;
    Nombre::depuis_i64(n).mul(p)
}

pub fn binom_variance(n: &Nombre, p: &Nombre) -> Result<Nombre, GenreErreur> {
    let n = compteur(n)?;
    probabilite(p)?;
    Nombre::depuis_i64(n).mul(p)?.mul(&Nombre::un().sub(p)?)
}

/* ------------------------ Loi hypergéométrique ------------------------ */

/// (total, succès, tirages) validés : succès <= total, tirages <= total.
fn hyper_params(
    total: &Nombre,
    succes: &Nombre,
    tirages: &Nombre,
) -> Result<(i64, i64, i64), GenreErreur> {
    let t = compteur(total)?;
    let s = compteur(succes)?;
    let n = compteur(tirages)?;
    if s > t || n > t {
        return Err(GenreErreur::UndefinedForArgumentDomain);
    }
    Ok((t, s, n))
}

/// Support [max(0, n+s-t), min(n, s)].
fn hyper_support(t: i64, s: i64, n: i64) -> (i64, i64) {
    ((n + s - t).max(0), n.min(s))
}

/// hyperpmf(count; total; hits; trials)
pub fn hyper_pmf(
    k: &Nombre,
    total: &Nombre,
    succes: &Nombre,
    tirages: &Nombre,
    budget: &mut Budget,
) -> Result<Nombre, GenreErreur> {
    let (t, s, n) = hyper_params(total, succes, tirages)?;
    let k = entier_signe(k)?;
    let (bas, haut) = hyper_support(t, s, n);
    if k < bas || k > haut {
        return Ok(Nombre::zero());
    }
    let w = echelle_log(t);
    let l = ln_binomial(s, k, w, budget)? + ln_binomial(t - s, n - k, w, budget)?
        - ln_binomial(t, n, w, budget)?;
    exp_fixe(&l, w, budget)
}

/// hypercdf(max; total; hits; trials)
pub fn hyper_cdf(
    m: &Nombre,
    total: &Nombre,
    succes: &Nombre,
    tirages: &Nombre,
    budget: &mut Budget,
) -> Result<Nombre, GenreErreur> {
    let (t, s, n) = hyper_params(total, succes, tirages)?;
    let m = entier_signe(m)?;
    let (bas, haut) = hyper_support(t, s, n);
    if m < bas {
        return Ok(Nombre::zero());
    }
    if m >= haut {
        return Ok(Nombre::un());
    }
    let w = echelle_log(t);
    let l0 = ln_binomial(s, bas, w, budget)? + ln_binomial(t - s, n - bas, w, budget)?
        - ln_binomial(t, n, w, budget)?;
    // p(k+1)/p(k) = (s-k)(n-k) / ((k+1)(t-s-n+k+1))
    somme_log(l0, bas, m, w, budget, |k, b| {
        Ok(ln_entier(s - k, w, b)? + ln_entier(n - k, w, b)?
            - ln_entier(k + 1, w, b)?
            - ln_entier(t - s - n + k + 1, w, b)?)
    })
}

/// hypermean(total; hits; trials) = n·s/t
pub fn hyper_moyenne(
    total: &Nombre,
    succes: &Nombre,
    tirages: &Nombre,
) -> Result<Nombre, GenreErreur> {
    let (t, s, n) = hyper_params(total, succes, tirages)?;
    if t == 0 {
        return Ok(Nombre::zero());
    }
    Nombre::depuis_i64(n)
        .mul(&Nombre::depuis_i64(s))?
        .div(&Nombre::depuis_i64(t))
}

/// hypervar(total; hits; trials) = n·(s/t)·(1-s/t)·(t-n)/(t-1)
pub fn hyper_variance(
    total: &Nombre,
    succes: &Nombre,
    tirages: &Nombre,
) -> Result<Nombre, GenreErreur> {
    let (t, s, n) = hyper_params(total, succes, tirages)?;
    if t <= 1 {
        return Ok(Nombre::zero());
    }
    let (t, s, n) = (
        Nombre::depuis_i64(t),
        Nombre::depuis_i64(s),
        Nombre::depuis_i64(n),
    );
    let un = Nombre::un();
    // numérateur entier exact, une seule division
    let num = n.mul(&s)?.mul(&t.sub(&s)?)?.mul(&t.sub(&n)?)?;
    let den = t.mul(&t)?.mul(&t.sub(&un)?)?;
    num.div(&den)
}

/* ------------------------ Loi de Poisson ------------------------ */

fn lambda(x: &Nombre) -> Result<(), GenreErreur> {
    if x.est_nan() {
        return Err(GenreErreur::DoesNotAcceptNaN);
    }
    if x.est_negatif() {
        return Err(GenreErreur::UndefinedForArgumentDomain);
    }
    Ok(())
}

fn echelle_poisson(k: i64, lam: &Nombre) -> u32 {
    let chiffres = lam.exposant_sci().map_or(0, |s| s.max(0) + 1);
    echelle_log(k).max(W + 10 + chiffres as u32)
}

/// poipmf(events; average_events)
pub fn poisson_pmf(k: &Nombre, lam: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    lambda(lam)?;
    let k = entier_signe(k)?;
    if k < 0 {
        return Ok(Nombre::zero());
    }
    if lam.est_zero() {
        return Ok(indicatrice(k == 0));
    }
    let w = echelle_poisson(k, lam);
    let l = ln_nombre(lam, w, budget)? * k - lam.vers_fixe(w) - ln_factorielle(k, w, budget)?;
    exp_fixe(&l, w, budget)
}

/// poicdf(events; average_events)
pub fn poisson_cdf(m: &Nombre, lam: &Nombre, budget: &mut Budget) -> Result<Nombre, GenreErreur> {
    lambda(lam)?;
    let m = entier_signe(m)?;
    if m < 0 {
        return Ok(Nombre::zero());
    }
    if lam.est_zero() {
        return Ok(Nombre::un());
    }
    let w = echelle_poisson(m, lam);
    let ln_lam = ln_nombre(lam, w, budget)?;
    somme_log(-lam.vers_fixe(w), 0, m, w, budget, |k, b| {
        Ok(&ln_lam - ln_entier(k + 1, w, b)?)
    })
}

/// poimean / poivar : λ validé.
pub fn poisson_moment(lam: &Nombre) -> Result<Nombre, GenreErreur> {
    lambda(lam)?;
    Ok(lam.clone())
}
