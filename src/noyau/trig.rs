// src/noyau/trig.rs
//
// Trig spéciale (angles “exactement reconnus”) pour sin/cos/tan
// -----------------------------------------------------------
// - Extraction coeff·π sur la forme canonique (0, π, c·π)
// - Réduction modulo 2π puis table sur n ∈ {1,2,3,4,6}
// - tan(π/2 + kπ) -> Indefini

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};
use tracing::trace;

use super::canon::canon_expr;
use super::expr::{Expr, Fonction};

/// Valeurs exactes de la table (avant signe).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Exact {
    Zero,
    Un,
    Demi,
    Racine2Sur2,
    Racine3Sur2,
    Racine3Sur3,
    Racine3,
    Indefini,
}

impl Exact {
    fn vers_expr(self, negatif: bool) -> Expr {
        let e = match self {
            Exact::Zero => return Expr::zero(),
            Exact::Indefini => return Expr::Indefini,
            Exact::Un => Expr::un(),
            Exact::Demi => Expr::rat(1, 2),
            Exact::Racine2Sur2 => Expr::mul(Expr::rat(1, 2), Expr::sqrt(Expr::entier(2))),
            Exact::Racine3Sur2 => Expr::mul(Expr::rat(1, 2), Expr::sqrt(Expr::entier(3))),
            Exact::Racine3Sur3 => Expr::mul(Expr::rat(1, 3), Expr::sqrt(Expr::entier(3))),
            Exact::Racine3 => Expr::sqrt(Expr::entier(3)),
        };
        let e = if negatif { Expr::neg(e) } else { e };
        canon_expr(e)
    }
}

/// Coefficient c tel que x = c·π (forme canonique attendue).
pub fn coeff_pi(x: &Expr) -> Option<BigRational> {
    match x {
        Expr::Rat(r) if r.is_zero() => Some(BigRational::zero()),
        Expr::Pi => Some(BigRational::one()),
        Expr::Mul(v) if v.len() == 2 && v[1] == Expr::Pi => v[0].comme_rat().cloned(),
        _ => None,
    }
}

/// Reconnaît sin/cos/tan d'un multiple rationnel « spécial » de π.
/// None si l'angle n'est pas dans la table.
pub fn valeur_speciale(f: Fonction, x: &Expr) -> Option<Expr> {
    let coeff = coeff_pi(x)?;
    let (k, n) = rational_to_small_kn(&coeff)?;

    // réduction modulo 2π : k mod 2n
    let k_mod = k.rem_euclid(2 * n);
    let (valeur, negatif) = table(f, k_mod, n)?;

    let out = valeur.vers_expr(negatif);
    trace!(fonction = f.nom(), k = k_mod, n, "angle spécial reconnu");
    Some(out)
}

/// (valeur, négatif) pour l'angle kπ/n, k ∈ [0, 2n).
fn table(f: Fonction, k: i64, n: i64) -> Option<(Exact, bool)> {
    use Exact::*;

    // angle dans [0, 2π) exprimé en douzièmes de tour·2 : a = k·12/n ∈ [0, 24)
    let a = k * 12 / n;

    let sin = |a: i64| -> (Exact, bool) {
        match a {
            0 | 12 => (Zero, false),
            2 | 10 => (Demi, false),
            3 | 9 => (Racine2Sur2, false),
            4 | 8 => (Racine3Sur2, false),
            6 => (Un, false),
            14 | 22 => (Demi, true),
            15 | 21 => (Racine2Sur2, true),
            16 | 20 => (Racine3Sur2, true),
            _ => (Un, true), // 18
        }
    };

    let out = match f {
        Fonction::Sin => sin(a),
        Fonction::Cos => {
            // cos(x) = sin(x + π/2)
            sin((a + 6) % 24)
        }
        Fonction::Tan => match a % 12 {
            0 => (Zero, false),
            2 => (Racine3Sur3, false),
            3 => (Un, false),
            4 => (Racine3, false),
            6 => (Indefini, false),
            8 => (Racine3, true),
            9 => (Un, true),
            _ => (Racine3Sur3, true), // 10
        },
        _ => return None,
    };
    Some(out)
}

/// Convertit un rationnel en (k,n) i64 réduit.
/// Accepte seulement n ∈ {1,2,3,4,6}.
fn rational_to_small_kn(r: &BigRational) -> Option<(i64, i64)> {
    let n = r.denom().to_i64()?;
    if ![1, 2, 3, 4, 6].contains(&n) {
        return None;
    }
    // le numérateur peut être énorme : on le réduit modulo 2n d'abord
    let k = (r.numer() % BigInt::from(2 * n)).to_i64()?;
    Some((k, n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn val(f: Fonction, k: i64, n: i64) -> String {
        let x = canon_expr(Expr::mul(Expr::rat(k, n), Expr::Pi));
        valeur_speciale(f, &x)
            .unwrap_or_else(|| panic!("angle {k}π/{n} non reconnu"))
            .to_string()
    }

    #[test]
    fn sinus_table() {
        assert_eq!(val(Fonction::Sin, 0, 1), "0");
        assert_eq!(val(Fonction::Sin, 1, 6), "1/2");
        assert_eq!(val(Fonction::Sin, 1, 4), "sqrt(2)/2");
        assert_eq!(val(Fonction::Sin, 1, 2), "1");
        assert_eq!(val(Fonction::Sin, 3, 2), "-1");
        assert_eq!(val(Fonction::Sin, -1, 4), "-sqrt(2)/2");
        assert_eq!(val(Fonction::Sin, 9, 4), "sqrt(2)/2");
    }

    #[test]
    fn cosinus_table() {
        assert_eq!(val(Fonction::Cos, 1, 3), "1/2");
        assert_eq!(val(Fonction::Cos, 1, 1), "-1");
        assert_eq!(val(Fonction::Cos, 1, 6), "sqrt(3)/2");
        assert_eq!(val(Fonction::Cos, 1, 2), "0");
        assert_eq!(val(Fonction::Cos, 7, 3), "1/2");
    }

    #[test]
    fn tangente_table() {
        assert_eq!(val(Fonction::Tan, 1, 6), "sqrt(3)/3");
        assert_eq!(val(Fonction::Tan, 1, 4), "1");
        assert_eq!(val(Fonction::Tan, 2, 3), "-sqrt(3)");
        assert_eq!(val(Fonction::Tan, 7, 6), "sqrt(3)/3");
        assert_eq!(val(Fonction::Tan, 1, 2), "nan");
        assert_eq!(val(Fonction::Tan, 3, 2), "nan");
    }

    #[test]
    fn angle_hors_table() {
        let x = canon_expr(Expr::mul(Expr::rat(1, 5), Expr::Pi));
        assert!(valeur_speciale(Fonction::Sin, &x).is_none());
        assert!(valeur_speciale(Fonction::Sin, &Expr::var("x")).is_none());
    }
}
