// src/app/vue.rs
//
// Vue (console)
// -------------
// Tout ce qui s'affiche passe par ici : menu, résultats, avis, erreurs.
// Une ligne par information, ASCII uniquement (terminaux sans Unicode).

use std::io::{self, BufRead, Write};

use crate::noyau::calcul::Avis;
use crate::noyau::erreur::CalcError;
use crate::noyau::eval::Evaluation;
use crate::noyau::expr::Expr;
use crate::noyau::format::format_liste;
use crate::noyau::geometrie::{ResultatGeometrie, OPERATIONS};

use super::actions::MENU;
use super::saisie::Console;

pub const BANNIERE: &str = "Advanced calculator (press Enter on empty choice to exit).";

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn afficher_banniere(&mut self) -> io::Result<()> {
        self.ecrire_ligne(BANNIERE)
    }

    pub fn afficher_menu(&mut self) -> io::Result<()> {
        self.ecrire_ligne("\nChoose an action:")?;
        for (cle, libelle, _) in MENU {
            self.ecrire_ligne(&format!("  {cle}. {libelle}"))?;
        }
        Ok(())
    }

    pub fn afficher_resultat(&mut self, e: &Expr) -> io::Result<()> {
        self.ecrire_ligne(&format!("Result: {e}"))
    }

    /// Forme exacte, puis lecture décimale si elle apporte quelque chose.
    pub fn afficher_evaluation(&mut self, ev: &Evaluation) -> io::Result<()> {
        self.afficher_resultat(&ev.expr)?;
        if let Some(l) = &ev.lecture {
            self.ecrire_ligne(&format!("Approximately: {l}"))?;
        }
        Ok(())
    }

    pub fn afficher_racines(&mut self, x1: &Expr, x2: &Expr) -> io::Result<()> {
        self.ecrire_ligne(&format!("Roots: {x1}, {x2}"))
    }

    pub fn afficher_operations_geometrie(&mut self) -> io::Result<()> {
        self.ecrire_ligne(&format!("Available operations: {}", OPERATIONS.join(", ")))
    }

    pub fn afficher_geometrie(&mut self, r: &ResultatGeometrie) -> io::Result<()> {
        self.ecrire_ligne(&format!("{}: {}", r.nom, r.valeur))
    }

    pub fn afficher_limite(&mut self, e: &Expr) -> io::Result<()> {
        self.ecrire_ligne(&format!("Limit: {e}"))
    }

    pub fn afficher_solutions(&mut self, v: &[Expr]) -> io::Result<()> {
        self.ecrire_ligne(&format!("Solutions: {}", format_liste(v)))
    }

    pub fn afficher_avis(&mut self, avis: &[Avis]) -> io::Result<()> {
        for a in avis {
            self.ecrire_ligne(&a.to_string())?;
        }
        Ok(())
    }

    /// Erreur de calcul : une ligne, sans trace.
    pub fn afficher_erreur(&mut self, e: &CalcError) -> io::Result<()> {
        self.ecrire_ligne(&format!("Error: {e}"))
    }

    pub fn afficher_inattendu(&mut self, message: &str) -> io::Result<()> {
        self.ecrire_ligne(&format!("Unexpected error: {message}"))
    }

    pub fn afficher_bilan(&mut self, operations: u64) -> io::Result<()> {
        self.ecrire_ligne(&format!("Operations performed: {operations}"))?;
        self.ecrire_ligne("Goodbye!")
    }
}
