//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - invariants : jamais d’InternalError, position d’erreur dans le texte,
//!   même texte + même environnement => même résultat

use std::time::{Duration, Instant};

use super::erreur::{Erreur, GenreErreur};
use super::eval::evaluate;
use super::fonctions::list_functions;
use super::nombre::Nombre;
use super::trig::ModeAngle;
use super::variables::Variables;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}

impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        // LCG (constantes de Knuth)
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 33) as u32
    }

    fn pick(&mut self, n: usize) -> usize {
        if n == 0 {
            0
        } else {
            self.next_u32() as usize % n
        }
    }

    fn choisir<'a>(&mut self, v: &[&'a str]) -> &'a str {
        v[self.pick(v.len())]
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Invariants ------------------------ */

fn env_de_base() -> Variables {
    let mut env = Variables::new();
    let _ = evaluate("x = 2", ModeAngle::Degre, &mut env);
    let _ = evaluate("y = 0.25", ModeAngle::Degre, &mut env);
    env
}

/// Évalue deux fois sur deux copies de l’environnement et vérifie les invariants.
fn verifier(expr: &str, mode: ModeAngle) -> Result<Nombre, Erreur> {
    let mut env1 = env_de_base();
    let mut env2 = env1.clone();
    let r1 = evaluate(expr, mode, &mut env1);
    let r2 = evaluate(expr, mode, &mut env2);

    assert_eq!(r1, r2, "non déterministe: expr={expr:?}");
    if let Err(e) = &r1 {
        assert!(!e.genre.est_interne(), "erreur interne: expr={expr:?}");
        if let Some(p) = e.pos {
            assert!(p <= expr.len(), "position hors texte: expr={expr:?} pos={p}");
        }
        // échec => environnement intact
        assert_eq!(env1.lister(), env_de_base().lister(), "expr={expr:?}");
    }
    r1
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

const ATOMES: [&str; 16] = [
    "0", "1", "2", "3", "7", "9", "0.5", "2.25", "1e-3", "4e2", "0x1F", "0b101", "pi", "e", "x",
    "y",
];

const BINAIRES: [&str; 19] = [
    "+", "-", "*", "/", "^", "%", "&", "|", "^^", "<<", ">>", "==", "!=", "<", "<=", ">", ">=",
    "&&", "||",
];

fn gen_atome(rng: &mut Rng) -> String {
    match rng.pick(20) {
        0 => "nan".to_string(),
        1 => "z".to_string(), // inconnu
        _ => rng.choisir(&ATOMES).to_string(),
    }
}

fn gen_appel(rng: &mut Rng, profondeur: usize) -> String {
    let fonctions = list_functions();
    let f = fonctions[rng.pick(fonctions.len())];
    let max = f.arite_max.unwrap_or(f.arite_min + 3);
    // parfois une arité fausse
    let n = if rng.pick(10) == 0 {
        max + 1
    } else {
        f.arite_min + rng.pick(max - f.arite_min + 1)
    };
    let args: Vec<String> = (0..n).map(|_| gen_expr(rng, profondeur)).collect();
    format!("{}({})", f.nom, args.join(";"))
}

fn gen_expr(rng: &mut Rng, profondeur: usize) -> String {
    if profondeur == 0 {
        return gen_atome(rng);
    }
    let p = profondeur - 1;
    match rng.pick(8) {
        0 | 1 => gen_atome(rng),
        2 | 3 => {
            let op = rng.choisir(&BINAIRES);
            format!("({}{op}{})", gen_expr(rng, p), gen_expr(rng, p))
        }
        4 => {
            let op = rng.choisir(&["-", "+", "!", "~"]);
            format!("{op}({})", gen_expr(rng, p))
        }
        5 => format!("({})!", gen_atome(rng)),
        6 => format!("{}{}", rng.choisir(&["2", "3", "(1)"]), rng.choisir(&["x", "pi", "(y)"])),
        _ => gen_appel(rng, p),
    }
}

/// Texte quelconque à partir de fragments (syntaxe souvent invalide).
fn gen_bruit(rng: &mut Rng) -> String {
    const FRAGMENTS: [&str; 30] = [
        "1", "2.5", ".5", "1.", "0x1F", "0b2", "0o", "9e9", "e", "x", "pi", "nan", "sin", "sum",
        "mod", "(", ")", ";", ",", "+", "-", "*", "^", "!", "~", "<<", "=", "°", " ", "π",
    ];
    let n = 1 + rng.pick(12);
    (0..n).map(|_| rng.choisir(&FRAGMENTS)).collect()
}

/* ------------------------ Somme balancée (profondeur log n) ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        items = items
            .chunks(2)
            .map(|c| match c {
                [a, b] => format!("({a}+{b})"),
                [a] => a.clone(),
                _ => unreachable!(),
            })
            .collect();
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_expressions_bien_formees() {
    let t0 = Instant::now();
    let max = Duration::from_secs(30);

    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for i in 0..200 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 3);
        let mode = if i % 2 == 0 {
            ModeAngle::Degre
        } else {
            ModeAngle::Radian
        };
        match verifier(&expr, mode) {
            Ok(_) => seen_ok += 1,
            Err(_) => seen_err += 1,
        }
    }

    // un mix des deux, sinon le fuzz ne “balaye” rien
    assert!(seen_ok > 20, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_bruit() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    let mut rng = Rng::new(0xBADC0DE_u64);
    let mut lex = 0usize;

    for _ in 0..400 {
        budget(t0, max);

        let expr = gen_bruit(&mut rng);
        if let Err(e) = verifier(&expr, ModeAngle::Degre) {
            if matches!(e.genre, GenreErreur::Lex(_)) {
                lex += 1;
            }
        }
    }
    assert!(lex > 0, "aucune erreur de lexique vue");
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let expr = somme_balancee("1/2", 800);
    let v = verifier(&expr, ModeAngle::Degre).unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);

    // 800 * (1/2) = 400
    assert_eq!(v.to_string(), "400");
}
