// src/noyau/derivee.rs
//
// Dérivée symbolique d/dx (résultat canonique).
// Sert à L'Hôpital (limite.rs).

use super::canon::canon_expr;
use super::expr::{Expr, Fonction};

/// d(e)/d(var), simplifiée.
pub fn deriver(e: &Expr, var: &str) -> Expr {
    canon_expr(brute(e, var))
}

fn brute(e: &Expr, x: &str) -> Expr {
    use Expr::*;

    if !e.contient_var(x) {
        return if matches!(e, Indefini) {
            Indefini
        } else {
            Expr::zero()
        };
    }

    match e {
        Var(_) => Expr::un(),

        Add(v) => Add(v.iter().map(|t| brute(t, x)).collect()),

        // (f·g·h)' = f'·g·h + f·g'·h + f·g·h'
        Mul(v) => {
            let mut termes = Vec::new();
            for (i, fi) in v.iter().enumerate() {
                if !fi.contient_var(x) {
                    continue;
                }
                let mut prod: Vec<Expr> = Vec::with_capacity(v.len());
                for (j, fj) in v.iter().enumerate() {
                    if i == j {
                        prod.push(brute(fi, x));
                    } else {
                        prod.push(fj.clone());
                    }
                }
                termes.push(Mul(prod));
            }
            Add(termes)
        }

        Pow(b, n) => {
            let b_var = b.contient_var(x);
            let n_var = n.contient_var(x);
            match (b_var, n_var) {
                // (u^n)' = n·u^(n−1)·u'
                (true, false) => Mul(vec![
                    (**n).clone(),
                    Expr::pow((**b).clone(), Expr::add((**n).clone(), Expr::entier(-1))),
                    brute(b, x),
                ]),
                // (a^v)' = a^v·ln(a)·v'
                (false, true) => Mul(vec![e.clone(), Expr::ln((**b).clone()), brute(n, x)]),
                // (u^v)' = u^v·(v'·ln(u) + v·u'/u)
                _ => Mul(vec![
                    e.clone(),
                    Add(vec![
                        Mul(vec![brute(n, x), Expr::ln((**b).clone())]),
                        Mul(vec![(**n).clone(), brute(b, x), Expr::inv((**b).clone())]),
                    ]),
                ]),
            }
        }

        Fonc(f, u) => {
            let du = brute(u, x);
            let u = (**u).clone();
            let externe = match f {
                Fonction::Sin => Expr::fonc(Fonction::Cos, u),
                Fonction::Cos => Expr::neg(Expr::fonc(Fonction::Sin, u)),
                // 1/cos²(u)
                Fonction::Tan => Expr::pow(Expr::fonc(Fonction::Cos, u), Expr::entier(-2)),
                Fonction::Ln => Expr::inv(u),
                // |u|/u
                Fonction::Abs => Expr::div(Expr::fonc(Fonction::Abs, u.clone()), u),
            };
            Mul(vec![externe, du])
        }

        Rat(_) | Pi | E | I | Infini | Indefini => Expr::zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::eval::analyser;

    fn d(txt: &str) -> String {
        deriver(&analyser(txt).unwrap(), "x").to_string()
    }

    #[test]
    fn polynomes() {
        assert_eq!(d("x**3"), "3*x^2");
        assert_eq!(d("5"), "0");
        assert_eq!(d("2x + 1"), "2");
        assert_eq!(d("x*y"), "y");
    }

    #[test]
    fn fonctions_usuelles() {
        assert_eq!(d("sin(x)"), "cos(x)");
        assert_eq!(d("cos(x)"), "-sin(x)");
        assert_eq!(d("exp(x)"), "exp(x)");
        assert_eq!(d("log(x)"), "1/x");
        assert_eq!(d("exp(2x)"), "2*exp(2*x)");
    }

    #[test]
    fn produit_et_quotient() {
        let e = deriver(&analyser("x*sin(x)").unwrap(), "x");
        assert_eq!(e, analyser("sin(x) + x*cos(x)").unwrap());
        let e = deriver(&analyser("1/x").unwrap(), "x");
        assert_eq!(e, analyser("-1/x**2").unwrap());
    }
}
