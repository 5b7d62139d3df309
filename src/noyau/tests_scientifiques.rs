//! Tests scientifiques (campagne) : invariants + robustesse + limites contrôlées.
//!
//! But : épingler le comportement observable du pipeline complet.
//! - exemples de référence (1/0, 2+2, x=5 puis x+1, sin(90), 0xFF, 2^2x)
//! - contagion NaN opérateur par opérateur, refus NaN des fonctions entières
//! - bornes de la plage (un cran au-delà => Overflow / Underflow)
//! - calculs démesurés rejetés en temps borné
//! - affectation tout-ou-rien

use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;

use super::erreur::{Erreur, GenreErreur};
use super::eval::evaluate;
use super::format::en_base;
use super::jetons::Base;
use super::nombre::Nombre;
use super::test_utils::init_test_logging;
use super::trig::ModeAngle;
use super::variables::Variables;

fn eval_env(expr: &str, env: &mut Variables) -> Result<Nombre, Erreur> {
    evaluate(expr, ModeAngle::Degre, env)
}

fn eval_ok(expr: &str) -> Nombre {
    eval_env(expr, &mut Variables::new()).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn eval_err(expr: &str) -> GenreErreur {
    match eval_env(expr, &mut Variables::new()) {
        Ok(v) => panic!("expr={expr:?} devait échouer, a donné {v}"),
        Err(e) => e.genre,
    }
}

fn n(s: &str) -> Nombre {
    Nombre::depuis_decimal(s).unwrap()
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Exemples de référence ------------------------ */

#[test]
fn sci_exemples_de_reference() {
    init_test_logging();
    assert_eq!(eval_err("1/0"), GenreErreur::DivisionByZero);
    assert_eq!(eval_ok("2+2"), n("4"));
    assert_eq!(eval_ok("0xFF"), n("255"));
    assert_eq!(eval_ok("sin(90)"), n("1"));

    let mut env = Variables::new();
    assert_eq!(eval_env("x=5", &mut env), Ok(n("5")));
    assert_eq!(eval_env("x+1", &mut env), Ok(n("6")));
}

#[test]
fn sci_multiplication_implicite_epinglee() {
    let mut env = Variables::new();
    eval_env("x = 3", &mut env).unwrap();
    // 2^2x = (2^2)·x ; 2x^2 = 2·(x^2)
    assert_eq!(eval_env("2^2x", &mut env), Ok(n("12")));
    assert_eq!(eval_env("2x^2", &mut env), Ok(n("18")));
    let r = eval_env("1/2x", &mut env).unwrap();
    assert!(r.to_string().starts_with("0.1666666666666666"), "1/2x = {r}");
    assert_eq!(eval_env("3(x+1)", &mut env), Ok(n("12")));
    assert_eq!(eval_env("(x)(x)", &mut env), Ok(n("9")));
    assert_eq!(eval_env("2sin(90)", &mut env), Ok(n("2")));
}

#[test]
fn sci_mode_angle() {
    let mut env = Variables::new();
    assert_eq!(evaluate("cos(60)", ModeAngle::Degre, &mut env), Ok(n("0.5")));
    assert_eq!(evaluate("asin(1)", ModeAngle::Degre, &mut env), Ok(n("90")));
    assert_eq!(evaluate("sin(pi)", ModeAngle::Radian, &mut env), Ok(Nombre::zero()));
    assert_eq!(evaluate("cos(pi)", ModeAngle::Radian, &mut env), Ok(n("-1")));
    let r = evaluate("sin(1)", ModeAngle::Radian, &mut env).unwrap();
    assert!(r.to_string().starts_with("0.84147098480789650665250232163029899962256306079"));
}

/* ------------------------ Idempotence ------------------------ */

#[test]
fn sci_idempotence() {
    let mut env = Variables::new();
    eval_env("y = 0.7", &mut env).unwrap();
    for expr in ["sin(y)+ln(2)", "gamma(y)*e", "y^y - sqrt(y)", "binompmf(2;5;y)"] {
        let a = eval_env(expr, &mut env);
        let b = eval_env(expr, &mut env);
        assert_eq!(a, b, "expr={expr:?}");
        assert!(a.is_ok(), "expr={expr:?}");
    }
    assert_eq!(env.len(), 1);
}

/* ------------------------ Bases ------------------------ */

#[test]
fn sci_bases_aller_retour() {
    for v in ["0", "1", "255", "4096", "123456789", "-5"] {
        for base in [Base::Binaire, Base::Octale, Base::Hexa] {
            let ecrit = en_base(&n(v), base);
            assert_eq!(eval_ok(&ecrit), n(v), "écrit={ecrit:?}");
        }
    }
    assert_eq!(eval_ok("0b1010 + 0o12 + 0xA"), n("30"));
    assert_eq!(eval_ok("0XfF"), n("255"));
}

/* ------------------------ NaN ------------------------ */

#[test]
fn sci_contagion_nan_operateurs() {
    let ops = [
        "+", "-", "*", "/", "^", "%", "&", "|", "^^", "<<", ">>", "==", "!=", "<", "<=", ">",
        ">=", "&&", "||",
    ];
    for op in ops {
        for expr in [format!("nan {op} 1"), format!("2 {op} nan"), format!("nan {op} nan")] {
            assert!(eval_ok(&expr).est_nan(), "expr={expr:?}");
        }
    }
    // fonctions numériques : NaN en entrée, NaN en sortie
    for expr in ["sqrt(nan)", "sin(nan)", "max(1;nan)", "sum(1;2;nan)", "round(nan;2)"] {
        assert!(eval_ok(expr).est_nan(), "expr={expr:?}");
    }
}

#[test]
fn sci_refus_nan() {
    for expr in [
        "idiv(nan;2)",
        "mod(7;nan)",
        "gcd(nan;4)",
        "and(nan;1)",
        "shl(1;nan)",
        "ncr(nan;2)",
        "binompmf(nan;5;0.5)",
        "poipmf(1;nan)",
    ] {
        assert_eq!(eval_err(expr), GenreErreur::DoesNotAcceptNaN, "expr={expr:?}");
    }
    for expr in ["!nan", "~nan", "nan!"] {
        assert_eq!(eval_err(expr), GenreErreur::CannotOperateOnNaN, "expr={expr:?}");
    }
}

/* ------------------------ Bornes ------------------------ */

#[test]
fn sci_bornes_de_plage() {
    assert!(eval_ok("1e99999").exposant_sci() == Some(99_999));
    assert!(eval_ok("1e-99999").exposant_sci() == Some(-99_999));
    assert_eq!(eval_err("1e100000"), GenreErreur::Overflow);
    assert_eq!(eval_err("1e-100000"), GenreErreur::Underflow);
    assert_eq!(eval_err("1e99999 * 10"), GenreErreur::Overflow);
    assert_eq!(eval_err("-1e99999 - 1e99999"), GenreErreur::Overflow);
    assert_eq!(eval_err("1e-99999 / 10"), GenreErreur::Underflow);
    assert_eq!(eval_err("10^100000"), GenreErreur::Overflow);
}

#[test]
fn sci_plafonds_entiers() {
    assert_eq!(eval_ok("1 << 100"), eval_ok("2^100"));
    assert_eq!(eval_err("1 << 256"), GenreErreur::LogicOverflow);
    assert_eq!(eval_err("2^300 & 1"), GenreErreur::LogicOverflow);
    assert_eq!(eval_err("idiv(1e400;1)"), GenreErreur::IntegerOverflow);
    assert_eq!(eval_ok("1e1000 % 7"), n("4"));

    // juste sous les plafonds : valeurs exactes
    assert_eq!(eval_ok("(1<<255)>>255"), n("1"));
    assert_eq!(eval_ok("((1<<200)|1) & 1"), n("1"));
    assert_eq!(eval_ok("mask(-1;256) ^^ (mask(-1;256)-1)"), n("1"));
    assert_eq!(
        en_base(&eval_ok("mask(-1;256)"), Base::Hexa),
        format!("0x{}", "F".repeat(64))
    );
    assert_eq!(eval_ok("(2^200+1) % 2"), n("1"));
    assert_eq!(eval_ok("idiv(2^200+1;1) - 2^200"), n("1"));
    assert_eq!(eval_ok("(2^1000+1) % 2"), n("1"));
    assert_eq!(eval_ok("idiv(2^1000+1;2)*2 - 2^1000"), n("0"));
    assert_eq!(eval_ok("gcd(2^1000;3*2^999) == 2^999"), n("1"));

    // au-delà de 1024 bits : arrondi à 50 chiffres, sans erreur
    assert_eq!(eval_ok("2^1100 + 1 - 2^1100"), n("0"));
}

/* ------------------------ Calculs démesurés ------------------------ */

#[test]
fn sci_calculs_demesures_bornes() {
    let start = Instant::now();
    let max = Duration::from_secs(20);

    assert_eq!(eval_err("ncr(1e30;1e29)"), GenreErreur::ComputationTooExpensive);
    budget(start, max);
    assert_eq!(eval_err("npr(1e30;1e29)"), GenreErreur::ComputationTooExpensive);
    budget(start, max);
    assert_eq!(eval_err("gcd(1e400;1)"), GenreErreur::IntegerOverflow);
    budget(start, max);

    // arbre large et peu profond : le coût par nœud épuise le budget
    let large = format!("sum({})", vec!["1"; 1_000_001].join(";"));
    assert_eq!(eval_err(&large), GenreErreur::ComputationTooExpensive);
    budget(start, max);

    // longue chaîne à plat : évaluée en boucle, pas de plafond de profondeur
    let plate = vec!["1"; 2_000].join("+");
    assert_eq!(eval_ok(&plate), n("2000"));
    let produit = vec!["2"; 257].join("*");
    assert_eq!(eval_ok(&produit), eval_ok("2^257"));
    budget(start, max);

    // imbrication trop profonde : refusée avant l’évaluation
    let profond = format!("{}1{}", "1+(".repeat(2_000), ")".repeat(2_000));
    assert_eq!(eval_err(&profond), GenreErreur::ComputationTooExpensive);
    budget(start, max);
}

/* ------------------------ Affectation ------------------------ */

#[test]
fn sci_affectation_tout_ou_rien() {
    let mut env = Variables::new();
    eval_env("a = 1", &mut env).unwrap();

    let e = eval_env("pi = 3", &mut env).unwrap_err();
    assert_eq!(e, Erreur::new(GenreErreur::ReservedName, 0));
    assert_eq!(eval_env("PI = 3", &mut env).unwrap_err().genre, GenreErreur::ReservedName);
    assert_eq!(eval_env("Sin = 3", &mut env).unwrap_err().genre, GenreErreur::ReservedName);

    assert_eq!(
        eval_env("a = b = ncr(1e30;1e29)", &mut env).unwrap_err().genre,
        GenreErreur::ComputationTooExpensive
    );
    assert_eq!(env.obtenir("a"), Some(&n("1")));
    assert_eq!(env.obtenir("b"), None);
    assert_eq!(env.len(), 1);

    // noms sensibles à la casse
    eval_env("A = 2", &mut env).unwrap();
    assert_eq!(eval_env("a + A", &mut env), Ok(n("3")));
}
