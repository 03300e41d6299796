// src/noyau/validation.rs
//
// Mode numérique strict : une saisie doit être un nombre réel, fini et défini.
// Chaque refus nomme le rôle du paramètre ("Second addend", "Divisor", ...).

use num_traits::Signed;
use tracing::trace;

use super::approx::approx;
use super::erreur::{CalcError, CalcResult};
use super::eval::analyser;
use super::expr::Expr;

/// Contraintes supplémentaires sur un nombre.
#[derive(Clone, Copy, Debug, Default)]
pub struct Contraintes {
    pub non_nul: bool,
    pub positif: bool,
}

impl Contraintes {
    pub const AUCUNE: Contraintes = Contraintes {
        non_nul: false,
        positif: false,
    };
    pub const NON_NUL: Contraintes = Contraintes {
        non_nul: true,
        positif: false,
    };
    pub const POSITIF: Contraintes = Contraintes {
        non_nul: true,
        positif: true,
    };
}

/// Analyse `texte` et exige un nombre réel fini (forme exacte conservée).
pub fn nombre(texte: &str, role: &str, contraintes: Contraintes) -> CalcResult<Expr> {
    let e = analyser(texte)?;
    verifier(&e, texte, role, contraintes)?;
    trace!(role, valeur = %e, "nombre validé");
    Ok(e)
}

/// Même contrôle sur une expression déjà analysée.
pub fn verifier(e: &Expr, texte: &str, role: &str, contraintes: Contraintes) -> CalcResult<()> {
    if e.a_des_variables() {
        return Err(CalcError::NonNumerique {
            role: role.to_string(),
            valeur: texte.trim().to_string(),
        });
    }
    if e.contient_indefini() {
        return Err(CalcError::Indefini {
            role: role.to_string(),
        });
    }
    if e.contient_infini() {
        return Err(CalcError::Infini {
            role: role.to_string(),
        });
    }
    if e.contient_i() {
        return Err(CalcError::NonReel {
            role: role.to_string(),
            valeur: texte.trim().to_string(),
        });
    }
    if contraintes.non_nul && e.est_zero() {
        return Err(CalcError::Zero {
            role: role.to_string(),
        });
    }
    if contraintes.positif && signe(e) != Some(1) {
        return Err(CalcError::domaine(format!("{role} must be positive")));
    }
    Ok(())
}

/// Signe d'un nombre réel : exact pour un rationnel, approché sinon (loin de 0).
pub fn signe(e: &Expr) -> Option<i8> {
    match e {
        Expr::Rat(r) if r.is_positive() => Some(1),
        Expr::Rat(r) if r.is_negative() => Some(-1),
        Expr::Rat(_) => Some(0),
        _ => {
            let v = approx(e)?;
            if v > 1e-12 {
                Some(1)
            } else if v < -1e-12 {
                Some(-1)
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nombres_acceptes() {
        assert_eq!(
            nombre("3/4", "Base", Contraintes::AUCUNE).unwrap(),
            Expr::rat(3, 4)
        );
        assert!(nombre("sqrt(2) + pi", "Base", Contraintes::AUCUNE).is_ok());
        assert!(nombre("I*I", "Base", Contraintes::AUCUNE).is_ok());
    }

    #[test]
    fn refus_nommes() {
        let e = nombre("x", "Second addend", Contraintes::AUCUNE).unwrap_err();
        assert_eq!(e.to_string(), "Second addend must be a number, got 'x'");

        let e = nombre("oo", "Base", Contraintes::AUCUNE).unwrap_err();
        assert_eq!(e.to_string(), "Base cannot be infinite");

        let e = nombre("0/0", "Base", Contraintes::AUCUNE).unwrap_err();
        assert_eq!(e.to_string(), "Base is undefined (NaN)");

        let e = nombre("sqrt(-1)", "Radicand", Contraintes::AUCUNE).unwrap_err();
        assert_eq!(e.to_string(), "Radicand must be a real number, got 'sqrt(-1)'");

        let e = nombre("1 - 1", "Divisor", Contraintes::NON_NUL).unwrap_err();
        assert_eq!(e.to_string(), "Divisor cannot be zero");
    }

    #[test]
    fn positivite() {
        assert!(nombre("2", "radius", Contraintes::POSITIF).is_ok());
        assert!(nombre("pi - 3", "radius", Contraintes::POSITIF).is_ok());
        let e = nombre("-1", "radius", Contraintes::POSITIF).unwrap_err();
        assert_eq!(e.to_string(), "radius must be positive");
        assert!(nombre("0", "radius", Contraintes::POSITIF).is_err());
    }

    #[test]
    fn signes() {
        assert_eq!(signe(&Expr::rat(-1, 2)), Some(-1));
        assert_eq!(signe(&Expr::zero()), Some(0));
        assert_eq!(signe(&analyser("1 - sqrt(2)").unwrap()), Some(-1));
    }
}
