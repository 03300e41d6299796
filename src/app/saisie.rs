//! src/app/saisie.rs
//!
//! Console : lecture des réponses (BufRead) et écriture (Write).
//!
//! Contrats :
//! - Aucune évaluation ici (pas de noyau, sauf le type d'erreur).
//! - Fin d'entrée = réponse vide (la boucle s'arrête au menu suivant).
//! - Les invites sont écrites sans retour à la ligne puis vidées (flush).

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::noyau::erreur::{CalcError, CalcResult};

/// Échec d'un traitement du menu.
#[derive(Debug, Error)]
pub enum Echec {
    #[error(transparent)]
    Calcul(#[from] CalcError),
    #[error("console: {0}")]
    Io(#[from] io::Error),
}

pub struct Console<R, W> {
    entree: R,
    sortie: W,
    fin: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(entree: R, sortie: W) -> Self {
        Self {
            entree,
            sortie,
            fin: false,
        }
    }

    /// Vrai une fois l'entrée épuisée.
    pub fn fin(&self) -> bool {
        self.fin
    }

    #[cfg(test)]
    pub fn into_sortie(self) -> W {
        self.sortie
    }

    /// Affiche `invite` et rend la réponse sans espaces de bord (vide en fin d'entrée).
    pub fn lire(&mut self, invite: &str) -> io::Result<String> {
        write!(self.sortie, "{invite}")?;
        self.sortie.flush()?;

        let mut ligne = String::new();
        if self.entree.read_line(&mut ligne)? == 0 {
            self.fin = true;
            // l'invite reste sans retour à la ligne : on en ajoute un
            writeln!(self.sortie)?;
        }
        Ok(ligne.trim().to_string())
    }

    /// Réponse obligatoire.
    pub fn lire_requis(&mut self, invite: &str) -> Result<String, Echec> {
        let v = self.lire(invite)?;
        if v.is_empty() {
            return Err(CalcError::Vide.into());
        }
        Ok(v)
    }

    pub fn ecrire_ligne(&mut self, texte: &str) -> io::Result<()> {
        writeln!(self.sortie, "{texte}")
    }
}

/// "k=v, k2=v2" -> [(k, v), (k2, v2)] ; fragments vides ignorés.
pub fn paires(brut: &str, quoi: &'static str) -> CalcResult<Vec<(String, String)>> {
    let mut out = Vec::new();
    for fragment in brut.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        let (cle, valeur) = fragment.split_once('=').ok_or_else(|| CalcError::Parametre {
            quoi,
            fragment: fragment.to_string(),
        })?;
        out.push((cle.trim().to_string(), valeur.trim().to_string()));
    }
    Ok(out)
}
