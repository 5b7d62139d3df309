// src/noyau/constantes.rs
//
// Deux choses distinctes :
// - les constantes évaluables (identifiants réservés) : pi, e, phi, nan
// - le catalogue des constantes (navigateur de constantes) : valeurs CODATA 2018 / UAI,
//   consultable mais non lié à des identifiants

use super::budget::Budget;
use super::erreur::GenreErreur;
use super::nombre::{pow10, Nombre};
use super::transcendantes::{exp_fixe, fsqrt, pi, W};

/// Identifiants des constantes évaluables (minuscules).
pub(crate) const NOMS_CONSTANTES: [&str; 4] = ["pi", "e", "phi", "nan"];

/// Valeur d’une constante évaluable (nom comparé sans casse).
pub fn valeur_constante(nom: &str) -> Option<Result<Nombre, GenreErreur>> {
    let nom = nom.to_ascii_lowercase();
    Some(match nom.as_str() {
        "pi" => Ok(pi()),
        "e" => {
            // budget propre : une constante ne coûte rien à l’expression
            exp_fixe(&pow10(W as usize), W, &mut Budget::default())
        }
        "phi" => {
            let s = pow10(W as usize);
            let rac5 = fsqrt(&(&s * 5u32), W);
            Nombre::depuis_fixe((s + rac5) >> 1u32, W)
        }
        "nan" => Ok(Nombre::Nan),
        _ => return None,
    })
}

/// Entrée du catalogue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfoConstante {
    pub nom: &'static str,
    pub categorie: &'static str,
    pub valeur: Nombre,
    pub unite: &'static str,
}

/* ------------------------ Catalogue ------------------------ */

const UNIVERSEL: &str = "Universal";
const PHYSIQUE: &str = "General Physics";
const ELECTRO: &str = "Electromagnetic";
const ATOMIQUE: &str = "Atomic & Nuclear";
const PHYSICO_CHIMIQUE: &str = "Physico-chemical";
const ASTRONOMIE: &str = "Astronomy";
const MASSE_MOLAIRE: &str = "Molar Mass";

// (nom, catégorie, valeur, unité)
const CATALOGUE: &[(&str, &str, &str, &str)] = &[
    (
        "Archimedes' constant Pi",
        UNIVERSEL,
        "3.1415926535897932384626433832795028841971693993751",
        "",
    ),
    ("Euler's number", UNIVERSEL, "2.7182818284590452353602874713526624977572470937", ""),
    ("Golden ratio", UNIVERSEL, "1.6180339887498948482045868343656381177203091798058", ""),
    //
    ("Characteristic Impedance of Vacuum", PHYSIQUE, "376.730313668", "Ω"),
    ("Dirac's Constant", PHYSIQUE, "1.054571817e-34", "J·s"),
    ("Electric Constant", PHYSIQUE, "8.8541878128e-12", "F/m"),
    ("Gravitation Constant", PHYSIQUE, "6.67430e-11", "m³/(kg·s²)"),
    ("Magnetic Constant", PHYSIQUE, "1.25663706212e-6", "N/A²"),
    ("Planck's Constant", PHYSIQUE, "6.62607015e-34", "J·s"),
    ("Speed of Light in Vacuum", PHYSIQUE, "299792458", "m/s"),
    //
    ("Bohr-Procopiu Magneton", ELECTRO, "9.2740100783e-24", "J/T"),
    ("Conductance Quantum", ELECTRO, "7.748091729e-5", "S"),
    ("Coulomb's Constant", ELECTRO, "8.9875517923e9", "N·m²/C²"),
    ("Elementary Charge", ELECTRO, "1.602176634e-19", "C"),
    ("Josephson Constant", ELECTRO, "4.835978484e14", "Hz/V"),
    ("Magnetic Flux Quantum", ELECTRO, "2.067833848e-15", "Wb"),
    ("Nuclear Magneton", ELECTRO, "5.0507837461e-27", "J/T"),
    ("Resistance Quantum", ELECTRO, "12906.40372", "Ω"),
    ("von Klitzing Constant", ELECTRO, "25812.80745", "Ω"),
    //
    ("Bohr Radius", ATOMIQUE, "5.29177210903e-11", "m"),
    ("Fermi Coupling Constant", ATOMIQUE, "1.1663787e-5", "GeV⁻²"),
    ("Fine-structure Constant", ATOMIQUE, "7.2973525693e-3", ""),
    ("Hartree Energy", ATOMIQUE, "4.3597447222071e-18", "J"),
    ("Quantum of Circulation", ATOMIQUE, "3.6369475516e-4", "m²/s"),
    ("Rydberg Constant", ATOMIQUE, "10973731.568160", "m⁻¹"),
    ("Thomson Cross Section", ATOMIQUE, "6.6524587321e-29", "m²"),
    ("Weak Mixing Angle", ATOMIQUE, "0.22290", ""),
    //
    ("Atomic Mass Unit", PHYSICO_CHIMIQUE, "1.66053906660e-27", "kg"),
    ("Avogadro's Number", PHYSICO_CHIMIQUE, "6.02214076e23", "mol⁻¹"),
    ("Boltzmann Constant", PHYSICO_CHIMIQUE, "1.380649e-23", "J/K"),
    ("Faraday Constant", PHYSICO_CHIMIQUE, "96485.33212", "C/mol"),
    ("First Radiation Constant", PHYSICO_CHIMIQUE, "3.741771852e-16", "W·m²"),
    ("Gas Constant", PHYSICO_CHIMIQUE, "8.314462618", "J/(mol·K)"),
    ("Loschmidt Constant", PHYSICO_CHIMIQUE, "2.686780111e25", "m⁻³"),
    ("Molar Planck Constant", PHYSICO_CHIMIQUE, "3.990312712e-10", "J·s/mol"),
    ("Second Radiation Constant", PHYSICO_CHIMIQUE, "1.438776877e-2", "m·K"),
    ("Stefan-Boltzmann Constant", PHYSICO_CHIMIQUE, "5.670374419e-8", "W/(m²·K⁴)"),
    //
    ("Astronomical Unit", ASTRONOMIE, "149597870700", "m"),
    ("Light Year", ASTRONOMIE, "9460730472580800", "m"),
    ("Parsec", ASTRONOMIE, "3.085677581491367e16", "m"),
    ("Gregorian Year", ASTRONOMIE, "365.2425", "days"),
    ("Julian Year", ASTRONOMIE, "365.25", "days"),
    ("Sidereal Year", ASTRONOMIE, "365.256363004", "days"),
    ("Tropical Year", ASTRONOMIE, "365.24219", "days"),
    ("Earth Mass", ASTRONOMIE, "5.9722e24", "kg"),
    ("Mean Earth Radius", ASTRONOMIE, "6371000", "m"),
    ("Sun Mass", ASTRONOMIE, "1.98847e30", "kg"),
    ("Sun Radius", ASTRONOMIE, "6.957e8", "m"),
    ("Sun Luminosity", ASTRONOMIE, "3.828e26", "W"),
    //
    ("Aluminium", MASSE_MOLAIRE, "26.9815385", "g/mol"),
    ("Argon", MASSE_MOLAIRE, "39.948", "g/mol"),
    ("Calcium", MASSE_MOLAIRE, "40.078", "g/mol"),
    ("Carbon", MASSE_MOLAIRE, "12.011", "g/mol"),
    ("Chlorine", MASSE_MOLAIRE, "35.45", "g/mol"),
    ("Copper", MASSE_MOLAIRE, "63.546", "g/mol"),
    ("Fluorine", MASSE_MOLAIRE, "18.998403163", "g/mol"),
    ("Gold", MASSE_MOLAIRE, "196.966569", "g/mol"),
    ("Helium", MASSE_MOLAIRE, "4.002602", "g/mol"),
    ("Hydrogen", MASSE_MOLAIRE, "1.008", "g/mol"),
    ("Iodine", MASSE_MOLAIRE, "126.90447", "g/mol"),
    ("Iron", MASSE_MOLAIRE, "55.845", "g/mol"),
    ("Lead", MASSE_MOLAIRE, "207.2", "g/mol"),
    ("Lithium", MASSE_MOLAIRE, "6.94", "g/mol"),
    ("Magnesium", MASSE_MOLAIRE, "24.305", "g/mol"),
    ("Mercury", MASSE_MOLAIRE, "200.592", "g/mol"),
    ("Neon", MASSE_MOLAIRE, "20.1797", "g/mol"),
    ("Nitrogen", MASSE_MOLAIRE, "14.007", "g/mol"),
    ("Oxygen", MASSE_MOLAIRE, "15.999", "g/mol"),
    ("Phosphorus", MASSE_MOLAIRE, "30.973761998", "g/mol"),
    ("Platinum", MASSE_MOLAIRE, "195.084", "g/mol"),
    ("Potassium", MASSE_MOLAIRE, "39.0983", "g/mol"),
    ("Silicon", MASSE_MOLAIRE, "28.085", "g/mol"),
    ("Silver", MASSE_MOLAIRE, "107.8682", "g/mol"),
    ("Sodium", MASSE_MOLAIRE, "22.98976928", "g/mol"),
    ("Sulfur", MASSE_MOLAIRE, "32.06", "g/mol"),
    ("Tin", MASSE_MOLAIRE, "118.710", "g/mol"),
    ("Titanium", MASSE_MOLAIRE, "47.867", "g/mol"),
    ("Uranium", MASSE_MOLAIRE, "238.02891", "g/mol"),
    ("Zinc", MASSE_MOLAIRE, "65.38", "g/mol"),
];

/// Catalogue complet, dans l’ordre des catégories.
pub fn list_constants() -> Vec<InfoConstante> {
    CATALOGUE
        .iter()
        .map(|&(nom, categorie, texte, unite)| InfoConstante {
            nom,
            categorie,
            valeur: Nombre::depuis_decimal(texte).unwrap_or(Nombre::Nan),
            unite,
        })
        .collect()
}
