// src/noyau/format.rs
//
// Affichage d’un résultat.
// - général : décimal simple si l’exposant est dans [-5, PRECISION), scientifique sinon
// - mantisses limitées à PRECISION chiffres (un entier exact peut en porter plus)
// - fixe / scientifique / ingénieur, décimales automatiques ou imposées
// - bases 2, 8, 16 (préfixe 0b / 0o / 0x, partie fractionnaire tronquée)

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use super::jetons::Base;
use super::nombre::{arrondir, pow10, Nombre, PRECISION};
use super::reglages::{Notation, Reglages};

/// Exposant minimal de l’affichage simple en mode général.
const EXPOSANT_SIMPLE_MIN: i64 = -5;

/// Au-delà, le mode fixe bascule en scientifique (chaîne démesurée sinon).
const EXPOSANT_FIXE_MAX: i64 = 2 * PRECISION as i64;

/* ------------------------ Chiffres ------------------------ */

/// Signe, chiffres de |m| (sans zéros de queue) et exposant scientifique.
struct Chiffres {
    negatif: bool,
    chiffres: String,
    sci: i64,
}

impl Chiffres {
    fn de(m: &BigInt, e: i64) -> Chiffres {
        let brut = m.abs().to_string();
        let chiffres = brut.trim_end_matches('0');
        let chiffres = if chiffres.is_empty() { "0" } else { chiffres };
        Chiffres {
            negatif: m.is_negative(),
            chiffres: chiffres.to_string(),
            sci: e + brut.len() as i64 - 1,
        }
    }

    fn signe(&self) -> &'static str {
        if self.negatif {
            "-"
        } else {
            ""
        }
    }

    /// Écriture positionnelle, `decimales` chiffres après la virgule au minimum.
    fn simple(&self, decimales: usize) -> String {
        let d = &self.chiffres;
        let (entier, mut frac) = if self.sci >= 0 {
            let n = self.sci as usize + 1;
            if d.len() <= n {
                (format!("{d}{}", "0".repeat(n - d.len())), String::new())
            } else {
                (d[..n].to_string(), d[n..].to_string())
            }
        } else {
            (
                "0".to_string(),
                format!("{}{d}", "0".repeat((-self.sci - 1) as usize)),
            )
        };
        if frac.len() < decimales {
            frac.push_str(&"0".repeat(decimales - frac.len()));
        }
        if frac.is_empty() {
            format!("{}{entier}", self.signe())
        } else {
            format!("{}{entier}.{frac}", self.signe())
        }
    }

    /// Mantisse avec `avant` chiffres avant la virgule, puis exposant.
    fn mantisse(&self, avant: usize, decimales: usize, exposant: i64) -> String {
        let mut d = self.chiffres.clone();
        if d.len() < avant + decimales {
            d.push_str(&"0".repeat(avant + decimales - d.len()));
        }
        let (tete, queue) = d.split_at(avant);
        let exp = if exposant < 0 {
            format!("e{exposant}")
        } else {
            format!("e+{exposant}")
        };
        if queue.is_empty() {
            format!("{}{tete}{exp}", self.signe())
        } else {
            format!("{}{tete}.{queue}{exp}", self.signe())
        }
    }
}

/// Arrondi à `sig` chiffres significatifs (au pair).
fn chiffres_arrondis(m: &BigInt, e: i64, sig: usize) -> Chiffres {
    let (m, e) = arrondir(m.clone(), e, sig.max(1));
    Chiffres::de(&m, e)
}

/* ------------------------ Notations ------------------------ */

pub fn general(x: &Nombre, decimales: Option<usize>) -> String {
    let Nombre::Fini { m, e } = x else {
        return "NaN".to_string();
    };
    if m.is_zero() {
        return "0".to_string();
    }
    let c = Chiffres::de(m, *e);
    if c.sci >= EXPOSANT_SIMPLE_MIN && c.sci < PRECISION as i64 {
        return match decimales {
            None => c.simple(0),
            Some(k) => match x.arrondi(k as i64) {
                Ok(Nombre::Fini { m, e }) if !m.is_zero() => Chiffres::de(&m, e).simple(0),
                _ => "0".to_string(),
            },
        };
    }
    let c = chiffres_arrondis(m, *e, decimales.map_or(PRECISION, |k| k + 1));
    c.mantisse(1, 0, c.sci)
}

pub fn fixe(x: &Nombre, decimales: Option<usize>) -> String {
    let Nombre::Fini { m, e } = x else {
        return "NaN".to_string();
    };
    let sci = x.exposant_sci().unwrap_or(0);
    if sci.abs() > EXPOSANT_FIXE_MAX && !m.is_zero() {
        return scientifique(x, decimales);
    }
    let Some(k) = decimales else {
        return Chiffres::de(m, *e).simple(0);
    };
    match x.arrondi(k as i64) {
        Ok(Nombre::Fini { m, e }) => Chiffres::de(&m, e).simple(k),
        _ => Chiffres::de(&BigInt::zero(), 0).simple(k),
    }
}

pub fn scientifique(x: &Nombre, decimales: Option<usize>) -> String {
    let Nombre::Fini { m, e } = x else {
        return "NaN".to_string();
    };
    if m.is_zero() {
        return Chiffres::de(m, 0).mantisse(1, decimales.unwrap_or(0), 0);
    }
    match decimales {
        None => {
            let c = chiffres_arrondis(m, *e, PRECISION);
            c.mantisse(1, 0, c.sci)
        }
        Some(k) => {
            let c = chiffres_arrondis(m, *e, k + 1);
            c.mantisse(1, k, c.sci)
        }
    }
}

/// Exposant multiple de 3, de 1 à 3 chiffres avant la virgule.
pub fn ingenieur(x: &Nombre, decimales: Option<usize>) -> String {
    let Nombre::Fini { m, e } = x else {
        return "NaN".to_string();
    };
    if m.is_zero() {
        return Chiffres::de(m, 0).mantisse(1, decimales.unwrap_or(0), 0);
    }
    let mut c = chiffres_arrondis(m, *e, PRECISION);
    if let Some(k) = decimales {
        let avant = (c.sci.rem_euclid(3) + 1) as usize;
        c = chiffres_arrondis(m, *e, avant + k);
    }
    let exposant = c.sci - c.sci.rem_euclid(3);
    let avant = (c.sci - exposant + 1) as usize;
    match decimales {
        // la retenue a pu ajouter un chiffre avant la virgule : on en garde k après
        Some(k) => c.mantisse(avant, k, exposant),
        None => c.mantisse(avant, c.chiffres.len().saturating_sub(avant), exposant),
    }
}

/// Écriture en base 2 / 8 / 16. Partie fractionnaire tronquée à la précision du moteur.
pub fn en_base(x: &Nombre, base: Base) -> String {
    let Nombre::Fini { m, e } = x else {
        return "NaN".to_string();
    };
    let radix = base.radix();
    let signe = if m.is_negative() { "-" } else { "" };
    let a = m.abs();

    if *e >= 0 {
        let n = a * pow10(*e as usize);
        return format!("{signe}{}{}", base.prefixe(), n.to_str_radix(radix).to_uppercase());
    }

    let echelle = pow10((-e) as usize);
    let entier = &a / &echelle;
    let mut reste = &a % &echelle;
    // autant de chiffres qu’il en faut pour PRECISION chiffres décimaux
    let max =
        (PRECISION as f64 * std::f64::consts::LOG2_10 / (radix as f64).log2()).ceil() as usize;
    let mut frac = String::new();
    while !reste.is_zero() && frac.len() < max {
        reste *= radix;
        let chiffre = &reste / &echelle;
        reste %= &echelle;
        frac.push_str(&chiffre.to_str_radix(radix).to_uppercase());
    }
    let entier = entier.to_str_radix(radix).to_uppercase();
    if frac.is_empty() {
        format!("{signe}{}{entier}", base.prefixe())
    } else {
        format!("{signe}{}{entier}.{frac}", base.prefixe())
    }
}

/// Point d’entrée de l’affichage : base, puis notation.
pub fn formater(x: &Nombre, reglages: &Reglages) -> String {
    if reglages.base != Base::Decimale {
        return en_base(x, reglages.base);
    }
    let d = reglages.decimales();
    match reglages.notation {
        Notation::General => general(x, d),
        Notation::Fixe => fixe(x, d),
        Notation::Scientifique => scientifique(x, d),
        Notation::Ingenieur => ingenieur(x, d),
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
    fn general_simple_ou_scientifique() {
        assert_eq!(general(&n("2.50"), None), "2.5");
        assert_eq!(general(&n("-1234"), None), "-1234");
        assert_eq!(general(&n("0.00001"), None), "0.00001");
        assert_eq!(general(&n("0.000001"), None), "1e-6");
        assert_eq!(general(&n("1.5e60"), None), "1.5e+60");
        assert_eq!(general(&Nombre::Nan, None), "NaN");
        assert_eq!(general(&Nombre::zero(), None), "0");
        assert_eq!(general(&n("3.14159"), Some(2)), "3.14");
        assert_eq!(general(&n("1.23456e70"), Some(2)), "1.23e+70");

        // 2^200 exact (61 chiffres) : mantisse à 50 chiffres
        let p200 = Nombre::entier(num_bigint::BigInt::from(1) << 200u32).unwrap();
        assert_eq!(
            general(&p200, None),
            "1.6069380442589902755419620923411626025222029937828e+60"
        );
        assert_eq!(
            fixe(&p200, None),
            "1606938044258990275541962092341162602522202993782792835301376"
        );
    }

    #[test]
    fn fixe_avec_decimales() {
        assert_eq!(fixe(&n("2.5"), Some(3)), "2.500");
        assert_eq!(fixe(&n("-0.125"), Some(2)), "-0.13");
        assert_eq!(fixe(&n("1e-7"), None), "0.0000001");
        assert_eq!(fixe(&n("0.0001"), Some(2)), "0.00");
        assert_eq!(fixe(&n("1e300"), Some(1)), "1.0e+300");
    }

    #[test]
    fn scientifique_et_ingenieur() {
        assert_eq!(scientifique(&n("12345"), None), "1.2345e+4");
        assert_eq!(scientifique(&n("12345"), Some(2)), "1.23e+4");
        assert_eq!(scientifique(&n("9.999"), Some(2)), "1.00e+1");
        assert_eq!(scientifique(&n("-0.00012"), None), "-1.2e-4");
        assert_eq!(ingenieur(&n("12345"), None), "12.345e+3");
        assert_eq!(ingenieur(&n("0.00012"), None), "120e-6");
        assert_eq!(ingenieur(&n("999.96"), Some(1)), "1.0e+3");
    }

    #[test]
    fn bases() {
        assert_eq!(en_base(&n("255"), Base::Hexa), "0xFF");
        assert_eq!(en_base(&n("-5"), Base::Binaire), "-0b101");
        assert_eq!(en_base(&n("8"), Base::Octale), "0o10");
        assert_eq!(en_base(&n("2.5"), Base::Binaire), "0b10.1");
        assert_eq!(en_base(&n("1e3"), Base::Hexa), "0x3E8");
    }

    #[test]
    fn formater_selon_reglages() {
        let mut r = Reglages::default();
        assert_eq!(formater(&n("0.5"), &r), "0.5");
        r.base = Base::Hexa;
        assert_eq!(formater(&n("255"), &r), "0xFF");
        r.base = Base::Decimale;
        r.notation = Notation::Fixe;
        r.fixer_decimales(Some(2));
        assert_eq!(formater(&n("1"), &r), "1.00");
    }
}
