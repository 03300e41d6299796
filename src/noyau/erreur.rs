// src/noyau/erreur.rs
//
// Erreur unique du noyau : chaque variante porte un message lisible,
// affiché tel quel par la boucle (sans trace).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("Value cannot be empty.")]
    Vide,

    #[error("Input contains a forbidden pattern: '{motif}'")]
    MotifInterdit { motif: String },

    #[error("Could not parse '{litteral}': {cause}")]
    Analyse { litteral: String, cause: String },

    #[error("{role} must be a number, got '{valeur}'")]
    NonNumerique { role: String, valeur: String },

    #[error("{role} must be a real number, got '{valeur}'")]
    NonReel { role: String, valeur: String },

    #[error("{role} cannot be infinite")]
    Infini { role: String },

    #[error("{role} is undefined (NaN)")]
    Indefini { role: String },

    #[error("{role} cannot be zero")]
    Zero { role: String },

    #[error("Division by zero is not allowed")]
    DivisionParZero,

    #[error("{0}")]
    Domaine(String),

    #[error("Result is too large to be represented exactly")]
    TropGrand,

    #[error("Invalid {quoi}: {fragment}")]
    Parametre { quoi: &'static str, fragment: String },

    #[error("{0}")]
    NonResolu(String),

    #[error("{operation} failed: {source}")]
    Operation {
        operation: &'static str,
        #[source]
        source: Box<CalcError>,
    },
}

impl CalcError {
    pub fn domaine(msg: impl Into<String>) -> Self {
        CalcError::Domaine(msg.into())
    }

    pub fn non_resolu(msg: impl Into<String>) -> Self {
        CalcError::NonResolu(msg.into())
    }

    /// Préfixe une erreur survenue après validation par le nom de l'opération.
    /// Les erreurs de domaine (déjà explicites pour l'utilisateur) passent telles quelles.
    pub fn dans(self, operation: &'static str) -> Self {
        match self {
            CalcError::TropGrand | CalcError::Analyse { .. } | CalcError::NonResolu(_) => {
                CalcError::Operation {
                    operation,
                    source: Box::new(self),
                }
            }
            autre => autre,
        }
    }
}

pub type CalcResult<T> = Result<T, CalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_lisibles() {
        let e = CalcError::NonNumerique {
            role: "Second addend".into(),
            valeur: "x".into(),
        };
        assert_eq!(e.to_string(), "Second addend must be a number, got 'x'");

        let e = CalcError::MotifInterdit {
            motif: "import".into(),
        };
        assert_eq!(e.to_string(), "Input contains a forbidden pattern: 'import'");

        assert_eq!(CalcError::Vide.to_string(), "Value cannot be empty.");
    }

    #[test]
    fn prefixe_operation() {
        let e = CalcError::TropGrand.dans("Exponentiation");
        assert_eq!(
            e.to_string(),
            "Exponentiation failed: Result is too large to be represented exactly"
        );

        // les erreurs de domaine ne sont pas ré-emballées
        let e = CalcError::DivisionParZero.dans("Division");
        assert_eq!(e, CalcError::DivisionParZero);
    }
}
