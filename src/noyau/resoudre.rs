// src/noyau/resoudre.rs
//
// Mode équation : "gauche = droite" (ou "= 0" implicite), résolu pour une variable.
// 1) f = gauche − droite, réduit au même dénominateur (num / den)
// 2) num polynomial en x : degrés 1 et 2 (coefficients symboliques),
//    au-delà racines rationnelles puis substitution bicarrée
// 3) sinon isolement d'une occurrence unique (exp, log, puissances, racines, abs)
// 4) chaque candidat est vérifié sur l'équation de départ, les racines du
//    dénominateur sont exclues ; dédoublonnage puis tri

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use tracing::debug;

use super::approx::{approx, approx_avec};
use super::canon::{canon_expr, key_string};
use super::erreur::{CalcError, CalcResult};
use super::eval::{analyser, est_identifiant};
use super::expr::{Expr, Fonction};
use super::poly::{
    bicarre, coefficients, coeffs_rationnels, en_fraction, racines_quadratiques,
    racines_rationnelles,
};
use super::validation::signe;

const TOLERANCE: f64 = 1e-9;

/// Résout `equation` pour `var`. Solutions triées, sans doublon.
pub fn resoudre(equation: &str, var: &str) -> CalcResult<Vec<Expr>> {
    let var = var.trim();
    if !est_identifiant(var) {
        return Err(CalcError::Parametre {
            quoi: "variable",
            fragment: var.to_string(),
        });
    }

    let morceaux: Vec<&str> = equation.split('=').collect();
    let (gauche, droite) = match morceaux.as_slice() {
        [g] => (analyser(g)?, Expr::zero()),
        [g, d] => (analyser(g)?, analyser(d)?),
        _ => {
            return Err(CalcError::domaine(
                "Equation must contain at most one '=' sign",
            ))
        }
    };

    let f = canon_expr(Expr::sub(gauche, droite));
    debug!(f = %f, var, "équation réduite");

    if f.contient_indefini() {
        return Err(CalcError::Indefini {
            role: "Equation".into(),
        });
    }

    if !f.contient_var(var) {
        if f.est_zero() {
            return Err(CalcError::non_resolu(format!(
                "Equation is an identity: every value of {var} is a solution"
            )));
        }
        return Ok(Vec::new());
    }

    let (num, den) = en_fraction(&f);

    let candidats = match coefficients(&num, var) {
        // degré trop élevé pour une formule : isolement si x n'apparaît qu'une fois
        Some(c) => match polynome(&c, var) {
            Ok(v) => v,
            Err(e) => isoler(&f, &Expr::zero(), var, 0).ok_or(e)?,
        },
        None => isoler(&f, &Expr::zero(), var, 0).ok_or_else(|| {
            CalcError::non_resolu(format!("Unable to solve the equation for {var}"))
        })?,
    };

    let mut solutions: Vec<Expr> = Vec::new();
    for c in candidats {
        let c = canon_expr(c);
        if c.contient_indefini() || c.contient_infini() {
            continue;
        }
        if !verifie(&f, &den, var, &c) {
            debug!(candidat = %c, "candidat rejeté");
            continue;
        }
        let k = key_string(&c);
        if !solutions.iter().any(|s| key_string(s) == k) {
            solutions.push(c);
        }
    }

    solutions.sort_by(ordre_solutions);
    Ok(solutions)
}

/* ------------------------ Cas polynomial ------------------------ */

fn polynome(c: &[Expr], var: &str) -> CalcResult<Vec<Expr>> {
    match c.len() {
        0 | 1 => {
            if c.first().map_or(true, Expr::est_zero) {
                Err(CalcError::non_resolu(format!(
                    "Equation is an identity: every value of {var} is a solution"
                )))
            } else {
                Ok(Vec::new())
            }
        }
        2 => Ok(vec![canon_expr(Expr::neg(Expr::div(
            c[0].clone(),
            c[1].clone(),
        )))]),
        3 => {
            let (x1, x2) = racines_quadratiques(&c[2], &c[1], &c[0]);
            Ok(vec![x1, x2])
        }
        n => {
            if let Some(q) = coeffs_rationnels(c) {
                let (racines, reste) = racines_rationnelles(&q);
                let mut out: Vec<Expr> = racines.into_iter().map(Expr::Rat).collect();
                if reste.len() > 1 {
                    let reste: Vec<Expr> = reste.into_iter().map(Expr::Rat).collect();
                    out.extend(polynome_reduit(&reste, var, n - 1)?);
                }
                return Ok(out);
            }
            polynome_reduit(c, var, n - 1)
        }
    }
}

/// Quotient sans racine rationnelle : degré ≤ 2 ou bicarré, sinon refus.
fn polynome_reduit(c: &[Expr], var: &str, degre_initial: usize) -> CalcResult<Vec<Expr>> {
    if c.len() <= 3 {
        return polynome(c, var);
    }
    if let Some(y) = bicarre(c) {
        let mut out = Vec::new();
        for r in polynome(&y, var)? {
            let s = canon_expr(Expr::sqrt(r));
            out.push(s.clone());
            out.push(canon_expr(Expr::neg(s)));
        }
        return Ok(out);
    }
    Err(CalcError::non_resolu(format!(
        "Cannot solve polynomial equations of degree {degre_initial} exactly"
    )))
}

/* ------------------------ Isolement ------------------------ */

const PROFONDEUR_ISOLEMENT: usize = 32;

/// Résout `gauche = droite` quand `var` n'apparaît qu'à un endroit exploitable.
fn isoler(gauche: &Expr, droite: &Expr, var: &str, prof: usize) -> Option<Vec<Expr>> {
    use Expr::*;

    if prof > PROFONDEUR_ISOLEMENT {
        return None;
    }
    let suite = |g: &Expr, d: Expr| isoler(g, &canon_expr(d), var, prof + 1);

    match gauche {
        Var(v) if v == var => Some(vec![droite.clone()]),

        Add(termes) => {
            let (avec, sans): (Vec<&Expr>, Vec<&Expr>) =
                termes.iter().partition(|t| t.contient_var(var));
            if avec.len() != 1 {
                return None;
            }
            let reste = Add(sans.into_iter().cloned().collect());
            suite(avec[0], Expr::sub(droite.clone(), reste))
        }

        Mul(facteurs) => {
            let (avec, sans): (Vec<&Expr>, Vec<&Expr>) =
                facteurs.iter().partition(|f| f.contient_var(var));
            if avec.len() == 1 {
                let reste = Mul(sans.into_iter().cloned().collect());
                return suite(avec[0], Expr::div(droite.clone(), reste));
            }
            // produit nul : chaque facteur
            if droite.est_zero() {
                let mut out = Vec::new();
                for f in avec {
                    out.extend(suite(f, Expr::zero())?);
                }
                return Some(out);
            }
            None
        }

        Pow(b, n) => {
            let b_var = b.contient_var(var);
            let n_var = n.contient_var(var);
            match (b_var, n_var) {
                // u^n = d  ->  les n racines n-ièmes de d (n entier),
                // la racine principale d^(1/n) sinon
                (true, false) => {
                    if n.est_zero() {
                        return None;
                    }
                    let racines = match n.as_ref() {
                        Rat(q) if q.is_integer() => racines_n_iemes(droite, &q.to_integer())?,
                        _ => vec![Expr::pow(droite.clone(), Expr::inv((**n).clone()))],
                    };
                    let mut out = Vec::new();
                    for r in racines {
                        out.extend(suite(b, r)?);
                    }
                    Some(out)
                }
                // a^v = d  ->  v = ln(d)/ln(a)
                (false, true) => {
                    let v = if matches!(b.as_ref(), E) {
                        Expr::ln(droite.clone())
                    } else {
                        Expr::div(Expr::ln(droite.clone()), Expr::ln((**b).clone()))
                    };
                    suite(n, v)
                }
                _ => None,
            }
        }

        Fonc(Fonction::Ln, u) => suite(u, Expr::exp(droite.clone())),

        Fonc(Fonction::Abs, u) => {
            let mut out = suite(u, droite.clone())?;
            out.extend(suite(u, Expr::neg(droite.clone()))?);
            Some(out)
        }

        _ => None,
    }
}

/// Degré maximal pour l'énumération des racines n-ièmes.
const DEGRE_RACINES_MAX: i64 = 64;

/// Toutes les solutions complexes de u^n = d, n entier non nul.
/// None si l'ensemble complet ne peut pas être écrit (signe de d inconnu, n trop grand).
fn racines_n_iemes(d: &Expr, n: &BigInt) -> Option<Vec<Expr>> {
    let (d, n) = if n.is_negative() {
        (canon_expr(Expr::inv(d.clone())), -n)
    } else {
        (d.clone(), n.clone())
    };
    let n = n.to_i64().filter(|&n| n <= DEGRE_RACINES_MAX)?;

    if d.contient_indefini() {
        // u^-n = 0
        return Some(Vec::new());
    }
    if n == 1 || d.est_zero() {
        return Some(vec![d]);
    }
    if n == 2 {
        let r = canon_expr(Expr::sqrt(d));
        return Some(vec![r.clone(), canon_expr(Expr::neg(r))]);
    }

    // d = |d|·e^(iφ), φ ∈ {0, π} : racines |d|^(1/n)·e^(i(φ + 2kπ)/n)
    if d.contient_i() {
        return None;
    }
    let (module, decalage) = match signe(&d)? {
        1 => (d, 0),
        _ => (canon_expr(Expr::neg(d)), 1),
    };
    let module = canon_expr(Expr::pow(module, Expr::rat(1, n)));

    let racines = (0..n)
        .map(|k| {
            let angle = Expr::mul(Expr::rat(2 * k + decalage, n), Expr::Pi);
            let re = Expr::mul(module.clone(), Expr::fonc(Fonction::Cos, angle.clone()));
            let im = Expr::mul(
                Expr::mul(module.clone(), Expr::fonc(Fonction::Sin, angle)),
                Expr::I,
            );
            canon_expr(Expr::add(re, im))
        })
        .collect();
    Some(racines)
}

/* ------------------------ Vérification / ordre ------------------------ */

/// Le candidat annule f et pas le dénominateur. Indécidable (symbolique) = accepté.
fn verifie(f: &Expr, den: &Expr, var: &str, c: &Expr) -> bool {
    let d = canon_expr(den.substituer(var, c));
    if d.est_zero() || d.contient_indefini() {
        return false;
    }

    let v = canon_expr(f.substituer(var, c));
    if v.est_zero() {
        return true;
    }
    if v.contient_indefini() {
        return false;
    }
    match v {
        Expr::Rat(_) => false,
        autre => match approx(&autre) {
            Some(x) => x.abs() < TOLERANCE,
            None => true,
        },
    }
}

/// Ordre d'affichage : partie réelle puis partie imaginaire, sinon par clef.
fn ordre_solutions(a: &Expr, b: &Expr) -> Ordering {
    match (cle_numerique(a), cle_numerique(b)) {
        (Some(x), Some(y)) => x
            .0
            .partial_cmp(&y.0)
            .unwrap_or(Ordering::Equal)
            .then(x.1.partial_cmp(&y.1).unwrap_or(Ordering::Equal)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => key_string(a).cmp(&key_string(b)),
    }
}

/// (partie réelle, partie imaginaire) pour une forme a + b·I.
fn cle_numerique(e: &Expr) -> Option<(f64, f64)> {
    if !e.contient_i() {
        return approx(e).map(|v| (v, 0.0));
    }
    let s = i_vers_var(e);
    let re = approx_avec(&s, &[(VAR_I, 0.0)])?;
    let im = approx_avec(&s, &[(VAR_I, 1.0)])? - re;
    Some((re, im))
}

const VAR_I: &str = "_i";

fn i_vers_var(e: &Expr) -> Expr {
    match e {
        Expr::I => Expr::var(VAR_I),
        Expr::Add(v) => Expr::Add(v.iter().map(i_vers_var).collect()),
        Expr::Mul(v) => Expr::Mul(v.iter().map(i_vers_var).collect()),
        Expr::Pow(b, x) => Expr::pow(i_vers_var(b), i_vers_var(x)),
        Expr::Fonc(f, x) => Expr::fonc(*f, i_vers_var(x)),
        autre => autre.clone(),
    }
}
