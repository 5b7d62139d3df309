// src/main.rs
//
// Calculatrice scientifique: point d’entrée terminal
// ---------------------------------------------------
// But:
// - Une expression en argument : évaluer, afficher, code retour 1 sur erreur
// - Sans argument : boucle interactive sur stdin (voir app.rs)
// - Traces : RUST_LOG (défaut : warn), sur stderr

use std::io;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use calculatrice_sci::app::vue::rendu_demarche;
use calculatrice_sci::app::{base_depuis, boucle, Session};
use calculatrice_sci::noyau::{demarche, ModeAngle, Notation, Reglages};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Angle {
    Deg,
    Rad,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// Général
    G,
    /// Fixe
    F,
    /// Scientifique
    E,
    /// Ingénieur
    N,
}

/// Calculatrice scientifique (décimal 50 chiffres)
#[derive(Parser, Debug)]
#[command(name = "calculatrice", version)]
#[command(about = "Évalue des expressions scientifiques", long_about = None)]
struct Args {
    /// Unité d’angle des fonctions trigonométriques
    #[arg(short, long, value_enum, default_value_t = Angle::Deg)]
    angle: Angle,

    /// Notation du résultat
    #[arg(short, long, value_enum, default_value_t = Format::G)]
    format: Format,

    /// Décimales imposées (automatique sinon)
    #[arg(short, long)]
    decimales: Option<usize>,

    /// Base du résultat : 2, 8, 10 ou 16
    #[arg(short, long, default_value = "10", value_parser = ["2", "8", "10", "16"])]
    base: String,

    /// Affiche les jetons et l’arbre avant le résultat
    #[arg(long)]
    demarche: bool,

    /// Expression à évaluer (sinon : boucle interactive)
    #[arg(allow_hyphen_values = true)]
    expression: Vec<String>,
}

impl Args {
    fn reglages(&self) -> Reglages {
        let mut r = Reglages::default();
        r.mode_angle = match self.angle {
            Angle::Deg => ModeAngle::Degre,
            Angle::Rad => ModeAngle::Radian,
        };
        r.notation = match self.format {
            Format::G => Notation::General,
            Format::F => Notation::Fixe,
            Format::E => Notation::Scientifique,
            Format::N => Notation::Ingenieur,
        };
        r.base = base_depuis(&self.base).unwrap_or_default();
        r.fixer_decimales(self.decimales);
        r
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    use tracing_subscriber::{fmt, EnvFilter};

    // RUST_LOG, sinon WARN
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let mut session = Session::new(args.reglages());

    if args.expression.is_empty() {
        let stdin = io::stdin();
        return match boucle(&mut session, stdin.lock(), &mut io::stdout()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("erreur d’entrée/sortie : {e}");
                ExitCode::FAILURE
            }
        };
    }

    let texte = args.expression.join(" ");
    if args.demarche {
        if let Ok(d) = demarche(&texte) {
            println!("{}", rendu_demarche(&d));
        }
    }

    let r = session.evaluer(&texte);
    println!("{}", session.rendu());
    if r.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
