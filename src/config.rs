// src/config.rs
//
// Réglages de session, lus dans l'environnement au démarrage.
// CALC_DECIMALES       : chiffres de la lecture décimale (0..=200, défaut 15)
// CALC_SEUIL_QUASI_NUL : seuil d'avertissement pour un diviseur (défaut 1e-10)
// CALC_LOG / RUST_LOG  : filtre tracing (défaut "warn")

use thiserror::Error;

use crate::noyau::calcul::{DECIMALES, SEUIL_QUASI_NUL};

pub const DECIMALES_MAX: usize = 200;
pub const FILTRE_LOG: &str = "warn";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{variable}: '{valeur}' is not a valid {attendu}")]
    Invalide {
        variable: &'static str,
        valeur: String,
        attendu: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reglages {
    pub decimales: usize,
    pub seuil_quasi_nul: f64,
    pub filtre_log: String,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            decimales: DECIMALES,
            seuil_quasi_nul: SEUIL_QUASI_NUL,
            filtre_log: FILTRE_LOG.to_string(),
        }
    }
}

impl Reglages {
    pub fn depuis_env() -> Result<Self, ConfigError> {
        Self::depuis(|cle| std::env::var(cle).ok())
    }

    /// `lire` rend la valeur brute d'une variable (None si absente).
    pub fn depuis(lire: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut r = Reglages::default();

        if let Some(v) = non_vide(lire("CALC_DECIMALES")) {
            let n: usize = v.parse().map_err(|_| ConfigError::Invalide {
                variable: "CALC_DECIMALES",
                valeur: v.clone(),
                attendu: "number of digits",
            })?;
            r.decimales = n.min(DECIMALES_MAX);
        }

        if let Some(v) = non_vide(lire("CALC_SEUIL_QUASI_NUL")) {
            let invalide = || ConfigError::Invalide {
                variable: "CALC_SEUIL_QUASI_NUL",
                valeur: v.clone(),
                attendu: "non-negative threshold",
            };
            let s: f64 = v.parse().map_err(|_| invalide())?;
            if !s.is_finite() || s < 0.0 {
                return Err(invalide());
            }
            r.seuil_quasi_nul = s;
        }

        if let Some(v) = non_vide(lire("CALC_LOG")).or_else(|| non_vide(lire("RUST_LOG"))) {
            r.filtre_log = v;
        }

        Ok(r)
    }
}

fn non_vide(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
