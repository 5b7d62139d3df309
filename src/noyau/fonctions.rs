// src/noyau/fonctions.rs
//
// Registre des fonctions intégrées.
// - table construite une fois (OnceLock), en lecture seule ensuite
// - noms enregistrés en minuscules, recherche insensible à la casse
// - l’arité et la politique NaN sont vérifiées ici, avant la règle
//   (la règle ne voit jamais un nombre d’arguments invalide)

use std::collections::HashMap;
use std::sync::OnceLock;

use super::budget::Budget;
use super::constantes::NOMS_CONSTANTES;
use super::erreur::GenreErreur;
use super::logique::{self, OpBits};
use super::nombre::Nombre;
use super::stats;
use super::transcendantes as tr;
use super::trig::{degres, radians, trig, trig_inverse, ModeAngle, TrigFn, TrigInv};

/// Contexte passé aux règles : mode d’angle et budget de l’évaluation.
pub struct Contexte<'a> {
    pub mode: ModeAngle,
    pub budget: &'a mut Budget,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolitiqueNan {
    /// NaN en entrée => NaN en sortie, sans appeler la règle.
    Propage,
    /// NaN en entrée => DoesNotAcceptNaN.
    Rejette,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Categorie {
    Analyse,
    Trigonometrie,
    Hyperbolique,
    Logique,
    Statistique,
    Probabilite,
}

type Regle = fn(&[Nombre], &mut Contexte) -> Result<Nombre, GenreErreur>;

/// Descripteur de fonction (immuable).
#[derive(Clone, Copy, Debug)]
pub struct Fonction {
    pub nom: &'static str,
    pub arite_min: usize,
    /// None : variadique.
    pub arite_max: Option<usize>,
    pub description: &'static str,
    pub categorie: Categorie,
    pub nan: PolitiqueNan,
    regle: Regle,
}

impl Fonction {
    pub fn accepte(&self, n: usize) -> bool {
        match self.arite_max {
            Some(max) => (self.arite_min..=max).contains(&n),
            None => n >= self.arite_min,
        }
    }

    /// Arité lisible : `1`, `1..2`, `2..`.
    pub fn arite(&self) -> String {
        match self.arite_max {
            Some(max) if max == self.arite_min => max.to_string(),
            Some(max) => format!("{}..{}", self.arite_min, max),
            None => format!("{}..", self.arite_min),
        }
    }

    pub fn appliquer(&self, args: &[Nombre], ctx: &mut Contexte) -> Result<Nombre, GenreErreur> {
        if !self.accepte(args.len()) {
            return Err(GenreErreur::WrongNumberOfArguments);
        }
        if args.iter().any(Nombre::est_nan) {
            return match self.nan {
                PolitiqueNan::Propage => Ok(Nombre::Nan),
                PolitiqueNan::Rejette => Err(GenreErreur::DoesNotAcceptNaN),
            };
        }
        (self.regle)(args, ctx)
    }
}

/* ------------------------ Table ------------------------ */

static REGISTRE: OnceLock<HashMap<&'static str, Fonction>> = OnceLock::new();

fn registre() -> &'static HashMap<&'static str, Fonction> {
    REGISTRE.get_or_init(|| {
        let table = table();
        let mut map = HashMap::with_capacity(table.len());
        for f in table {
            map.insert(f.nom, f);
        }
        map
    })
}

/// Recherche insensible à la casse.
pub fn lookup(nom: &str) -> Option<&'static Fonction> {
    registre().get(nom.to_ascii_lowercase().as_str())
}

/// Fonctions et constantes : non affectables.
pub fn est_nom_reserve(nom: &str) -> bool {
    let bas = nom.to_ascii_lowercase();
    registre().contains_key(bas.as_str()) || NOMS_CONSTANTES.contains(&bas.as_str())
}

/// Toutes les fonctions, triées par nom.
pub fn list_functions() -> Vec<&'static Fonction> {
    let mut v: Vec<&'static Fonction> = registre().values().collect();
    v.sort_by_key(|f| f.nom);
    v
}

fn def(
    nom: &'static str,
    arite: (usize, Option<usize>),
    categorie: Categorie,
    nan: PolitiqueNan,
    description: &'static str,
    regle: Regle,
) -> Fonction {
    Fonction {
        nom,
        arite_min: arite.0,
        arite_max: arite.1,
        description,
        categorie,
        nan,
        regle,
    }
}

const UN: (usize, Option<usize>) = (1, Some(1));
const DEUX: (usize, Option<usize>) = (2, Some(2));
const TROIS: (usize, Option<usize>) = (3, Some(3));
const QUATRE: (usize, Option<usize>) = (4, Some(4));
const UN_OU_DEUX: (usize, Option<usize>) = (1, Some(2));
const AU_MOINS_UN: (usize, Option<usize>) = (1, None);
const AU_MOINS_DEUX: (usize, Option<usize>) = (2, None);

fn table() -> Vec<Fonction> {
    use Categorie::*;
    use PolitiqueNan::*;

    vec![
        // analyse
        def("abs", UN, Analyse, Propage, "Absolute Value", |a, _| Ok(a[0].abs())),
        def("sgn", UN, Analyse, Propage, "Signum", |a, _| Ok(a[0].signe())),
        def("int", UN, Analyse, Propage, "Integer Part", |a, _| Ok(a[0].tronquer())),
        def("trunc", UN_OU_DEUX, Analyse, Propage, "Truncation", |a, _| {
            a[0].tronquer_a(decimales(a.get(1))?)
        }),
        def("frac", UN, Analyse, Propage, "Fractional Part", |a, _| a[0].partie_frac()),
        def("floor", UN, Analyse, Propage, "Floor", |a, _| a[0].plancher()),
        def("ceil", UN, Analyse, Propage, "Ceiling", |a, _| a[0].plafond()),
        def("round", UN_OU_DEUX, Analyse, Propage, "Rounding", |a, _| {
            a[0].arrondi(decimales(a.get(1))?)
        }),
        def("sqrt", UN, Analyse, Propage, "Square Root", |a, _| a[0].racine_carree()),
        def("cbrt", UN, Analyse, Propage, "Cube Root", |a, c| tr::cbrt(&a[0], c.budget)),
        def("exp", UN, Analyse, Propage, "Exponential", |a, c| tr::exp(&a[0], c.budget)),
        def("ln", UN, Analyse, Propage, "Natural Logarithm", |a, c| tr::ln(&a[0], c.budget)),
        def("lg", UN, Analyse, Propage, "Base-10 Logarithm", |a, c| tr::log10(&a[0], c.budget)),
        def("log10", UN, Analyse, Propage, "Base-10 Logarithm", |a, c| {
            tr::log10(&a[0], c.budget)
        }),
        def("lb", UN, Analyse, Propage, "Base-2 Logarithm", |a, c| tr::log2(&a[0], c.budget)),
        def("log2", UN, Analyse, Propage, "Base-2 Logarithm", |a, c| tr::log2(&a[0], c.budget)),
        def("log", DEUX, Analyse, Propage, "Arbitrary-Base Logarithm", |a, c| {
            tr::log_base(&a[1], &a[0], c.budget)
        }),
        def("gamma", UN, Analyse, Propage, "Extension of Factorials [= (x-1)!]", |a, c| {
            tr::gamma(&a[0], c.budget)
        }),
        def("lngamma", UN, Analyse, Propage, "ln(abs(Gamma))", |a, c| {
            tr::ln_gamma(&a[0], c.budget)
        }),
        def("erf", UN, Analyse, Propage, "Error Function", |a, c| tr::erf(&a[0], c.budget)),
        def("erfc", UN, Analyse, Propage, "Complementary Error Function", |a, c| {
            tr::erfc(&a[0], c.budget)
        }),
        // trigonométrie
        def("sin", UN, Trigonometrie, Propage, "Sine", |a, c| circ(a, c, TrigFn::Sin)),
        def("cos", UN, Trigonometrie, Propage, "Cosine", |a, c| circ(a, c, TrigFn::Cos)),
        def("tan", UN, Trigonometrie, Propage, "Tangent", |a, c| circ(a, c, TrigFn::Tan)),
        def("cot", UN, Trigonometrie, Propage, "Cotangent", |a, c| circ(a, c, TrigFn::Cot)),
        def("sec", UN, Trigonometrie, Propage, "Secant", |a, c| circ(a, c, TrigFn::Sec)),
        def("csc", UN, Trigonometrie, Propage, "Cosecant", |a, c| circ(a, c, TrigFn::Csc)),
        def("asin", UN, Trigonometrie, Propage, "Arc Sine", |a, c| arc(a, c, TrigInv::Asin)),
        def("acos", UN, Trigonometrie, Propage, "Arc Cosine", |a, c| arc(a, c, TrigInv::Acos)),
        def("atan", UN, Trigonometrie, Propage, "Arc Tangent", |a, c| arc(a, c, TrigInv::Atan)),
        def("degrees", UN, Trigonometrie, Propage, "Degrees of Arc", |a, _| degres(&a[0])),
        def("radians", UN, Trigonometrie, Propage, "Radians", |a, _| radians(&a[0])),
        // hyperboliques
        def("sinh", UN, Hyperbolique, Propage, "Hyperbolic Sine", |a, c| {
            tr::sinh(&a[0], c.budget)
        }),
        def("cosh", UN, Hyperbolique, Propage, "Hyperbolic Cosine", |a, c| {
            tr::cosh(&a[0], c.budget)
        }),
        def("tanh", UN, Hyperbolique, Propage, "Hyperbolic Tangent", |a, c| {
            tr::tanh(&a[0], c.budget)
        }),
        def("asinh", UN, Hyperbolique, Propage, "Area Hyperbolic Sine", |a, c| {
            tr::asinh(&a[0], c.budget)
        }),
        def("acosh", UN, Hyperbolique, Propage, "Area Hyperbolic Cosine", |a, c| {
            tr::acosh(&a[0], c.budget)
        }),
        def("atanh", UN, Hyperbolique, Propage, "Area Hyperbolic Tangent", |a, c| {
            tr::atanh(&a[0], c.budget)
        }),
        // entiers et logique
        def("idiv", DEUX, Logique, Rejette, "Integer Quotient", |a, _| logique::idiv(&a[0], &a[1])),
        def("mod", DEUX, Logique, Rejette, "Modulo", |a, _| logique::modulo(&a[0], &a[1])),
        def("gcd", AU_MOINS_DEUX, Logique, Rejette, "Greatest Common Divisor", |a, c| {
            logique::pgcd(a, c.budget)
        }),
        def("ncr", DEUX, Logique, Rejette, "Combination (Binomial Coefficient)", |a, c| {
            stats::ncr(&a[0], &a[1], c.budget)
        }),
        def("npr", DEUX, Logique, Rejette, "Permutation (Arrangement)", |a, c| {
            stats::npr(&a[0], &a[1], c.budget)
        }),
        def("and", AU_MOINS_DEUX, Logique, Rejette, "Logical AND", |a, _| {
            logique::bits_liste(a, OpBits::Et)
        }),
        def("or", AU_MOINS_DEUX, Logique, Rejette, "Logical OR", |a, _| {
            logique::bits_liste(a, OpBits::Ou)
        }),
        def("xor", AU_MOINS_DEUX, Logique, Rejette, "Logical XOR", |a, _| {
            logique::bits_liste(a, OpBits::Xor)
        }),
        def("not", UN, Logique, Rejette, "Logical NOT", |a, _| logique::non(&a[0])),
        def("shl", DEUX, Logique, Rejette, "Arithmetic Shift Left", |a, _| {
            logique::decalage(&a[0], &a[1], true)
        }),
        def("shr", DEUX, Logique, Rejette, "Arithmetic Shift Right", |a, _| {
            logique::decalage(&a[0], &a[1], false)
        }),
        def("mask", DEUX, Logique, Rejette, "Mask to a bit size", |a, _| {
            logique::masque(&a[0], &a[1])
        }),
        def("unmask", DEUX, Logique, Rejette, "Sign-extent a value", |a, _| {
            logique::demasque(&a[0], &a[1])
        }),
        // statistiques
        def("sum", AU_MOINS_UN, Statistique, Propage, "Sum", |a, c| stats::somme(a, c.budget)),
        def("product", AU_MOINS_UN, Statistique, Propage, "Product", |a, c| {
            stats::produit(a, c.budget)
        }),
        def("average", AU_MOINS_UN, Statistique, Propage, "Average (Arithmetic Mean)", |a, c| {
            stats::moyenne(a, c.budget)
        }),
        def("geomean", AU_MOINS_UN, Statistique, Propage, "Geometric Mean", |a, c| {
            stats::moyenne_geometrique(a, c.budget)
        }),
        def("median", AU_MOINS_UN, Statistique, Propage, "Median Value (50th Percentile)", |a, c| {
            stats::mediane(a, c.budget)
        }),
        def("min", AU_MOINS_UN, Statistique, Propage, "Minimum", |a, _| stats::extremum(a, false)),
        def("max", AU_MOINS_UN, Statistique, Propage, "Maximum", |a, _| stats::extremum(a, true)),
        def("variance", AU_MOINS_UN, Statistique, Propage, "Variance", |a, c| {
            stats::variance(a, c.budget)
        }),
        def(
            "stddev",
            AU_MOINS_UN,
            Statistique,
            Propage,
            "Standard Deviation (Square Root of Variance)",
            |a, c| stats::ecart_type(a, c.budget),
        ),
        def("absdev", AU_MOINS_UN, Statistique, Propage, "Absolute Deviation", |a, c| {
            stats::ecart_absolu(a, c.budget)
        }),
        // probabilités
        def(
            "binompmf",
            TROIS,
            Probabilite,
            Rejette,
            "Binomial Probability Mass Function",
            |a, c| stats::binom_pmf(&a[0], &a[1], &a[2], c.budget),
        ),
        def(
            "binomcdf",
            TROIS,
            Probabilite,
            Rejette,
            "Binomial Cumulative Distribution Function",
            |a, c| stats::binom_cdf(&a[0], &a[1], &a[2], c.budget),
        ),
        def("binommean", DEUX, Probabilite, Rejette, "Binomial Distribution Mean", |a, _| {
            stats::binom_moyenne(&a[0], &a[1])
        }),
        def("binomvar", DEUX, Probabilite, Rejette, "Binomial Distribution Variance", |a, _| {
            stats::binom_variance(&a[0], &a[1])
        }),
        def(
            "hyperpmf",
            QUATRE,
            Probabilite,
            Rejette,
            "Hypergeometric Probability Mass Function",
            |a, c| stats::hyper_pmf(&a[0], &a[1], &a[2], &a[3], c.budget),
        ),
        def(
            "hypercdf",
            QUATRE,
            Probabilite,
            Rejette,
            "Hypergeometric Cumulative Distribution Function",
            |a, c| stats::hyper_cdf(&a[0], &a[1], &a[2], &a[3], c.budget),
        ),
        def("hypermean", TROIS, Probabilite, Rejette, "Hypergeometric Distribution Mean", |a, _| {
            stats::hyper_moyenne(&a[0], &a[1], &a[2])
        }),
        def(
            "hypervar",
            TROIS,
            Probabilite,
            Rejette,
            "Hypergeometric Distribution Variance",
            |a, _| stats::hyper_variance(&a[0], &a[1], &a[2]),
        ),
        def(
            "poipmf",
            DEUX,
            Probabilite,
            Rejette,
            "Poissonian Probability Mass Function",
            |a, c| stats::poisson_pmf(&a[0], &a[1], c.budget),
        ),
        def(
            "poicdf",
            DEUX,
            Probabilite,
            Rejette,
            "Poissonian Cumulative Distribution Function",
            |a, c| stats::poisson_cdf(&a[0], &a[1], c.budget),
        ),
        def("poimean", UN, Probabilite, Rejette, "Poissonian Distribution Mean", |a, _| {
            stats::poisson_moment(&a[0])
        }),
        def("poivar", UN, Probabilite, Rejette, "Poissonian Distribution Variance", |a, _| {
            stats::poisson_moment(&a[0])
        }),
    ]
}

/* ------------------------ Règles partagées ------------------------ */

fn circ(a: &[Nombre], c: &mut Contexte, f: TrigFn) -> Result<Nombre, GenreErreur> {
    trig(&a[0], f, c.mode, c.budget)
}

fn arc(a: &[Nombre], c: &mut Contexte, f: TrigInv) -> Result<Nombre, GenreErreur> {
    trig_inverse(&a[0], f, c.mode, c.budget)
}

/// Nombre de décimales de round / trunc (0 par défaut, entier requis).
fn decimales(n: Option<&Nombre>) -> Result<i64, GenreErreur> {
    let Some(n) = n else {
        return Ok(0);
    };
    if !n.est_entier() {
        return Err(GenreErreur::UndefinedForArgumentDomain);
    }
    // au-delà, le résultat ne change plus (ou vaut 0)
    const BORNE: i64 = 200_000;
    Ok(n.vers_i64().unwrap_or(if n.est_negatif() { -BORNE } else { BORNE })
        .clamp(-BORNE, BORNE))
}
