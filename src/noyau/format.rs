// src/noyau/format.rs
//
// Affichage EXACT en ASCII (forme canonique attendue) :
// - sommes : "a + b - c"
// - produits : numérateur / dénominateur ("3*x/2", "sqrt(2)/2", "-oo")
// - puissances : sqrt(x), exp(x), x^n, 1/x
// - constantes : pi, E, I, oo, nan

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed};

use super::expr::Expr;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_expr(self))
    }
}

/* ------------------------ Helpers rationnels ------------------------ */

fn format_rat(r: &BigRational) -> String {
    let n = r.numer();
    let d = r.denom();
    if d.is_one() {
        format!("{n}")
    } else {
        format!("{n}/{d}")
    }
}

fn est_atome(e: &Expr) -> bool {
    match e {
        Expr::Rat(r) => r.is_integer() && !r.is_negative(),
        Expr::Pi | Expr::E | Expr::I | Expr::Infini | Expr::Indefini | Expr::Var(_) => true,
        Expr::Fonc(_, _) => true,
        _ => false,
    }
}

fn entre_parentheses(e: &Expr) -> String {
    let s = format_expr(e);
    if est_atome(e) {
        s
    } else {
        format!("({s})")
    }
}

/// Terme « négatif » pour l'affichage d'une somme (coefficient < 0).
fn coeff_negatif(e: &Expr) -> bool {
    match e {
        Expr::Rat(r) => r.is_negative(),
        Expr::Mul(v) => matches!(v.first(), Some(Expr::Rat(r)) if r.is_negative()),
        _ => false,
    }
}

/// Opposé d'un terme à coefficient négatif (sans repasser par canon).
fn oppose(e: &Expr) -> Expr {
    match e {
        Expr::Rat(r) => Expr::Rat(-r.clone()),
        Expr::Mul(v) => {
            let mut w = v.clone();
            if let Some(Expr::Rat(c)) = w.first() {
                let c = -c.clone();
                if c.is_one() {
                    w.remove(0);
                } else {
                    w[0] = Expr::Rat(c);
                }
            }
            if w.len() == 1 {
                w.pop().unwrap_or_else(Expr::un)
            } else {
                Expr::Mul(w)
            }
        }
        autre => autre.clone(),
    }
}

/* ------------------------ Affichage ------------------------ */

pub fn format_expr(e: &Expr) -> String {
    use Expr::*;

    match e {
        Rat(r) => format_rat(r),
        Pi => "pi".to_string(),
        E => "E".to_string(),
        I => "I".to_string(),
        Infini => "oo".to_string(),
        Indefini => "nan".to_string(),
        Var(s) => s.clone(),
        Add(v) => format_add(v),
        Mul(v) => format_mul(v),
        Pow(b, x) => format_pow(b, x),
        Fonc(f, x) => format!("{}({})", f.nom(), format_expr(x)),
    }
}

fn format_add(v: &[Expr]) -> String {
    let mut out = String::new();
    for (i, t) in v.iter().enumerate() {
        if i == 0 {
            out.push_str(&format_terme(t));
            continue;
        }
        if coeff_negatif(t) {
            out.push_str(" - ");
            out.push_str(&format_terme(&oppose(t)));
        } else {
            out.push_str(" + ");
            out.push_str(&format_terme(t));
        }
    }
    out
}

fn format_terme(t: &Expr) -> String {
    match t {
        Expr::Add(_) => format!("({})", format_expr(t)),
        _ => format_expr(t),
    }
}

/// Facteur d'un produit : parenthèses pour les sommes (et rationnels non entiers).
fn format_facteur(e: &Expr) -> String {
    match e {
        Expr::Add(_) => format!("({})", format_expr(e)),
        Expr::Rat(r) if !r.is_integer() || r.is_negative() => format!("({})", format_rat(r)),
        _ => format_expr(e),
    }
}

fn format_mul(v: &[Expr]) -> String {
    let mut coeff = BigRational::one();
    let mut num: Vec<String> = Vec::new();
    let mut den: Vec<(String, bool)> = Vec::new();

    for f in v {
        match f {
            Expr::Rat(r) => coeff *= r.clone(),
            Expr::Pow(b, x) => match exposant_negatif(x) {
                Some(pos) => {
                    let p = canon_affichage_pow(b, &pos);
                    let simple = pos.est_un() && est_atome(b);
                    den.push((p, simple));
                }
                None => num.push(format_facteur(f)),
            },
            autre => num.push(format_facteur(autre)),
        }
    }

    let negatif = coeff.is_negative();
    let c = coeff.abs();
    let n = c.numer();
    let d = c.denom();

    let mut parts: Vec<String> = Vec::new();
    if !n.is_one() || num.is_empty() {
        parts.push(n.to_string());
    }
    parts.extend(num);
    let mut s = parts.join("*");

    let mut dens: Vec<(String, bool)> = Vec::new();
    if !d.is_one() {
        dens.push((d.to_string(), true));
    }
    dens.extend(den);

    match dens.len() {
        0 => {}
        1 => {
            let (txt, simple) = &dens[0];
            if *simple || txt.starts_with("sqrt(") || txt.starts_with("exp(") {
                s = format!("{s}/{txt}");
            } else {
                s = format!("{s}/({txt})");
            }
        }
        _ => {
            let tous: Vec<String> = dens.into_iter().map(|(t, _)| t).collect();
            s = format!("{s}/({})", tous.join("*"));
        }
    }

    if negatif {
        format!("-{s}")
    } else {
        s
    }
}

/// Exposant strictement négatif -> son opposé (pour le passage au dénominateur).
fn exposant_negatif(x: &Expr) -> Option<Expr> {
    match x {
        Expr::Rat(r) if r.is_negative() => Some(Expr::Rat(-r.clone())),
        Expr::Mul(v) => match v.first() {
            Some(Expr::Rat(r)) if r.is_negative() => Some(oppose(x)),
            _ => None,
        },
        _ => None,
    }
}

fn canon_affichage_pow(b: &Expr, x: &Expr) -> String {
    if x.est_un() {
        format_expr(b)
    } else {
        format_pow(b, x)
    }
}

fn format_pow(b: &Expr, x: &Expr) -> String {
    if let Some(pos) = exposant_negatif(x) {
        let d = canon_affichage_pow(b, &pos);
        return if (pos.est_un() && est_atome(b)) || d.starts_with("sqrt(") {
            format!("1/{d}")
        } else {
            format!("1/({d})")
        };
    }

    if matches!(b, Expr::E) {
        return format!("exp({})", format_expr(x));
    }

    if let Expr::Rat(r) = x {
        if *r == BigRational::new(BigInt::one(), BigInt::from(2)) {
            return format!("sqrt({})", format_expr(b));
        }
    }

    let base = entre_parentheses(b);
    let expo = match x {
        Expr::Rat(r) if r.is_integer() && !r.is_negative() => format_rat(r),
        Expr::Var(_) | Expr::Pi | Expr::E => format_expr(x),
        _ => format!("({})", format_expr(x)),
    };
    format!("{base}^{expo}")
}

/// Liste "[a, b, c]".
pub fn format_liste(v: &[Expr]) -> String {
    let items: Vec<String> = v.iter().map(format_expr).collect();
    format!("[{}]", items.join(", "))
}
