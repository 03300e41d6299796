// src/noyau/approx.rs
//
// Approximation flottante (f64) d'une expression RÉELLE.
// Sert à : décider le signe d'une constante (abs), sonder les côtés d'une limite,
// vérifier numériquement une racine candidate, repli de lecture décimale.
//
// None = pas de valeur réelle (I, variable libre, indéfini, domaine).

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use super::expr::{Expr, Fonction};

/// Valeur f64 d'une expression sans variable.
pub fn approx(e: &Expr) -> Option<f64> {
    approx_avec(e, &[])
}

/// Valeur f64 avec des liaisons `nom -> valeur` pour les variables.
pub fn approx_avec(e: &Expr, env: &[(&str, f64)]) -> Option<f64> {
    let v = eval_f64(e, env, 0)?;
    if v.is_nan() {
        None
    } else {
        Some(v)
    }
}

const PROFONDEUR_MAX: usize = 400;

fn eval_f64(e: &Expr, env: &[(&str, f64)], prof: usize) -> Option<f64> {
    if prof > PROFONDEUR_MAX {
        return None;
    }
    let rec = |x: &Expr| eval_f64(x, env, prof + 1);

    let v = match e {
        Expr::Rat(r) => r.to_f64()?,
        Expr::Pi => std::f64::consts::PI,
        Expr::E => std::f64::consts::E,
        Expr::Infini => f64::INFINITY,
        Expr::I | Expr::Indefini => return None,
        Expr::Var(nom) => env.iter().find(|(n, _)| n == nom).map(|(_, v)| *v)?,

        Expr::Add(v) => {
            let mut s = 0.0;
            for t in v {
                s += rec(t)?;
            }
            s
        }
        Expr::Mul(v) => {
            let mut p = 1.0;
            for t in v {
                p *= rec(t)?;
            }
            p
        }

        Expr::Pow(b, x) => {
            let xb = rec(b)?;
            let xx = rec(x)?;
            puissance_reelle(xb, xx, x)?
        }

        Expr::Fonc(f, x) => {
            let a = rec(x)?;
            match f {
                Fonction::Sin => a.sin(),
                Fonction::Cos => a.cos(),
                Fonction::Tan => a.tan(),
                Fonction::Abs => a.abs(),
                Fonction::Ln => {
                    if a < 0.0 {
                        return None;
                    }
                    a.ln()
                }
            }
        }
    };

    if v.is_nan() {
        None
    } else {
        Some(v)
    }
}

/// b^x réel. Base négative : seulement exposant entier, ou rationnel à dénominateur impair.
fn puissance_reelle(b: f64, x: f64, x_exact: &Expr) -> Option<f64> {
    if b >= 0.0 {
        return Some(b.powf(x));
    }
    if x.fract() == 0.0 {
        return Some(b.powf(x));
    }
    match x_exact {
        Expr::Rat(r) if est_impair(r.denom()) => {
            let impair_num = est_impair(r.numer());
            let m = (-b).powf(x);
            Some(if impair_num { -m } else { m })
        }
        _ => None,
    }
}

fn est_impair(n: &BigInt) -> bool {
    !(n % BigInt::from(2)).is_zero()
}
