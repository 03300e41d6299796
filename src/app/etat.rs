//! src/app/etat.rs
//!
//! État de session (sans vue, sans console).
//!
//! Rôle : porter la calculatrice (et son compteur d'opérations) pour toute
//! la durée du processus, plus quelques totaux de session pour le journal.
//!
//! Contrats :
//! - Aucune lecture ni écriture ici.
//! - Rien n'est persisté : l'état meurt avec le processus.

use crate::config::Reglages;
use crate::noyau::calcul::Calculatrice;

#[derive(Debug)]
pub struct Session {
    pub calc: Calculatrice,
    /// Entrées du menu exécutées (réussies ou non).
    pub actions: u64,
    /// Entrées terminées sur une erreur (calcul ou panique).
    pub echecs: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&Reglages::default())
    }
}

impl Session {
    pub fn new(reglages: &Reglages) -> Self {
        Self {
            calc: Calculatrice::new(reglages.seuil_quasi_nul, reglages.decimales),
            actions: 0,
            echecs: 0,
        }
    }

    pub fn noter(&mut self, reussie: bool) {
        self.actions += 1;
        if !reussie {
            self.echecs += 1;
        }
    }
}
