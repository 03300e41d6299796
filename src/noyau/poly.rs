// src/noyau/poly.rs
//
// Outils polynomiaux sur Expr :
// - developper : distributivité (a+b)(c+d), (a+b)^n pour n entier positif borné
// - coefficients en une variable (coefficients symboliques permis)
// - en_fraction : réduction au même dénominateur (num, den)
// - racines du second degré (formule commune au mode quadratique et aux équations)
// - racines rationnelles (coefficients rationnels)

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::canon::{canon_add, canon_expr, canon_mul, key_string};
use super::expr::Expr;
use super::validation::signe;

/// Bornes de développement.
const MAX_TERMES: usize = 4096;
const MAX_PUISSANCE_DEV: i64 = 16;
pub const DEGRE_MAX: usize = 64;

/* ------------------------ Développement ------------------------ */

/// Développe produits et puissances entières de sommes (résultat canonique).
pub fn developper(e: &Expr) -> Expr {
    use Expr::*;

    match e {
        Add(v) => canon_add(v.iter().map(developper).collect()),
        Mul(v) => {
            let facteurs: Vec<Expr> = v.iter().map(developper).collect();
            let mut acc = vec![Expr::un()];
            for f in facteurs {
                let termes = match f {
                    Add(t) => t,
                    autre => vec![autre],
                };
                if acc.len() * termes.len() > MAX_TERMES {
                    return canon_expr(e.clone());
                }
                let mut suivant = Vec::with_capacity(acc.len() * termes.len());
                for a in &acc {
                    for t in &termes {
                        suivant.push(canon_mul(vec![a.clone(), t.clone()]));
                    }
                }
                acc = suivant;
            }
            canon_add(acc)
        }
        Pow(b, x) => {
            let b = developper(b);
            match (&b, x.as_ref()) {
                (Add(_), Rat(n)) if n.is_integer() && n.is_positive() => {
                    let k = n.to_integer().to_i64().unwrap_or(i64::MAX);
                    if k > MAX_PUISSANCE_DEV {
                        return canon_expr(e.clone());
                    }
                    let mut acc = Expr::un();
                    for _ in 0..k {
                        acc = developper(&Mul(vec![acc, b.clone()]));
                    }
                    acc
                }
                _ => canon_expr(Expr::pow(b, (**x).clone())),
            }
        }
        Fonc(f, x) => canon_expr(Expr::fonc(*f, developper(x))),
        autre => autre.clone(),
    }
}

/* ------------------------ Coefficients ------------------------ */

/// Degré de `x` dans un facteur (None si le facteur n'est pas monôme en x).
fn degre_facteur(f: &Expr, x: &str) -> Option<usize> {
    match f {
        Expr::Var(v) if v == x => Some(1),
        Expr::Pow(b, n) if matches!(b.as_ref(), Expr::Var(v) if v == x) => match n.as_ref() {
            Expr::Rat(r) if r.is_integer() && !r.is_negative() => r.to_integer().to_usize(),
            _ => None,
        },
        autre if !autre.contient_var(x) => Some(0),
        _ => None,
    }
}

/// Terme -> (degré, coefficient). None si non polynomial en x.
fn monome(t: &Expr, x: &str) -> Option<(usize, Expr)> {
    match t {
        Expr::Mul(v) => {
            let mut degre = 0usize;
            let mut coeff = Vec::new();
            for f in v {
                match degre_facteur(f, x)? {
                    0 => coeff.push(f.clone()),
                    k => degre += k,
                }
            }
            Some((degre, canon_mul(coeff)))
        }
        autre => match degre_facteur(autre, x)? {
            0 => Some((0, autre.clone())),
            k => Some((k, Expr::un())),
        },
    }
}

/// Coefficients [c0, c1, ..., cn] de `e` (développée) en la variable `x`.
/// None si `e` n'est pas un polynôme en x (ou degré > DEGRE_MAX).
pub fn coefficients(e: &Expr, x: &str) -> Option<Vec<Expr>> {
    let d = developper(e);
    let termes = match d {
        Expr::Add(v) => v,
        autre => vec![autre],
    };

    let mut par_degre: Vec<Vec<Expr>> = Vec::new();
    for t in &termes {
        let (k, c) = monome(t, x)?;
        if k > DEGRE_MAX {
            return None;
        }
        if par_degre.len() <= k {
            par_degre.resize(k + 1, Vec::new());
        }
        par_degre[k].push(c);
    }

    let mut coeffs: Vec<Expr> = par_degre.into_iter().map(canon_add).collect();
    while coeffs.len() > 1 && coeffs.last().is_some_and(Expr::est_zero) {
        coeffs.pop();
    }
    if coeffs.is_empty() {
        coeffs.push(Expr::zero());
    }
    Some(coeffs)
}

/* ------------------------ Même dénominateur ------------------------ */

/// Sépare un terme canonique en (numérateur, dénominateur).
fn fraction_terme(t: &Expr) -> (Expr, Expr) {
    match t {
        Expr::Pow(b, n) => match n.as_ref() {
            Expr::Rat(r) if r.is_negative() => (
                Expr::un(),
                canon_expr(Expr::pow((**b).clone(), Expr::Rat(-r.clone()))),
            ),
            _ => (t.clone(), Expr::un()),
        },
        Expr::Mul(v) => {
            let mut num = Vec::new();
            let mut den = Vec::new();
            for f in v {
                let (n, d) = fraction_terme(f);
                num.push(n);
                den.push(d);
            }
            (canon_mul(num), canon_mul(den))
        }
        autre => (autre.clone(), Expr::un()),
    }
}

/// e = num / den, avec num et den sans puissance négative au premier niveau.
pub fn en_fraction(e: &Expr) -> (Expr, Expr) {
    match e {
        Expr::Add(v) => {
            let parts: Vec<(Expr, Expr)> = v.iter().map(en_fraction).collect();

            // dénominateurs distincts
            let mut dens: Vec<(String, Expr)> = Vec::new();
            for (_, d) in &parts {
                if d.est_un() {
                    continue;
                }
                let k = key_string(d);
                if !dens.iter().any(|(kk, _)| *kk == k) {
                    dens.push((k, d.clone()));
                }
            }
            if dens.is_empty() {
                return (e.clone(), Expr::un());
            }

            let mut num = Vec::with_capacity(parts.len());
            for (n, d) in parts {
                let k = key_string(&d);
                let mut f = vec![n];
                for (kk, autre) in &dens {
                    if d.est_un() || *kk != k {
                        f.push(autre.clone());
                    }
                }
                num.push(canon_mul(f));
            }
            let den = canon_mul(dens.into_iter().map(|(_, d)| d).collect());
            (developper(&canon_add(num)), den)
        }
        autre => fraction_terme(autre),
    }
}

/* ------------------------ Second degré ------------------------ */

/// (x1, x2) = (−b ± √Δ) / 2a, chaque racine simplifiée ; la racine "+" d'abord.
pub fn racines_quadratiques(a: &Expr, b: &Expr, c: &Expr) -> (Expr, Expr) {
    let delta = discriminant(a, b, c);
    // Δ < 0 irrationnel : √Δ = √(−Δ)·I
    let racine = if !delta.contient_i() && signe(&delta) == Some(-1) {
        canon_expr(Expr::mul(Expr::sqrt(developper(&Expr::neg(delta))), Expr::I))
    } else {
        canon_expr(Expr::sqrt(delta))
    };
    let deux_a = canon_mul(vec![Expr::entier(2), a.clone()]);
    let moins_b = canon_mul(vec![Expr::entier(-1), b.clone()]);

    let plus = canon_expr(Expr::div(
        Expr::add(moins_b.clone(), racine.clone()),
        deux_a.clone(),
    ));
    let moins = canon_expr(Expr::div(Expr::sub(moins_b, racine), deux_a));
    (developper(&plus), developper(&moins))
}

/// Δ = b² − 4ac
pub fn discriminant(a: &Expr, b: &Expr, c: &Expr) -> Expr {
    developper(&Expr::sub(
        Expr::pow(b.clone(), Expr::entier(2)),
        Expr::Mul(vec![Expr::entier(4), a.clone(), c.clone()]),
    ))
}

/* ------------------------ Racines rationnelles ------------------------ */

/// Coefficients rationnels, si tous le sont.
pub fn coeffs_rationnels(c: &[Expr]) -> Option<Vec<BigRational>> {
    c.iter().map(|e| e.comme_rat().cloned()).collect()
}

fn evaluer(c: &[BigRational], x: &BigRational) -> BigRational {
    let mut acc = BigRational::zero();
    for k in c.iter().rev() {
        acc = acc * x + k;
    }
    acc
}

/// Division synthétique par (x − r) ; suppose r racine.
fn diviser(c: &[BigRational], r: &BigRational) -> Vec<BigRational> {
    let n = c.len() - 1;
    let mut q = vec![BigRational::zero(); n];
    let mut reste = BigRational::zero();
    for k in (0..=n).rev() {
        let v = &c[k] + &reste * r;
        if k > 0 {
            q[k - 1] = v.clone();
        }
        reste = v;
    }
    q
}

/// Diviseurs positifs (essais bornés ; None si trop grand).
fn diviseurs(n: &BigInt) -> Option<Vec<BigInt>> {
    let n = n.abs();
    if n.is_zero() {
        return Some(vec![]);
    }
    let borne = BigInt::from(1_000_000_000_000i64);
    if n > borne {
        return None;
    }
    let mut petits = Vec::new();
    let mut grands = Vec::new();
    let mut d = BigInt::one();
    while &d * &d <= n {
        if (&n % &d).is_zero() {
            petits.push(d.clone());
            let autre = &n / &d;
            if autre != d {
                grands.push(autre);
            }
        }
        d += 1;
    }
    grands.reverse();
    petits.extend(grands);
    Some(petits)
}

/// Extrait les racines rationnelles ; renvoie (racines, quotient restant).
pub fn racines_rationnelles(c: &[BigRational]) -> (Vec<BigRational>, Vec<BigRational>) {
    let mut reste: Vec<BigRational> = c.to_vec();
    let mut racines = Vec::new();

    // x = 0
    while reste.len() > 1 && reste[0].is_zero() {
        racines.push(BigRational::zero());
        reste.remove(0);
    }
    if reste.len() <= 1 {
        return (racines, reste);
    }

    // coefficients entiers : multiplie par le ppcm des dénominateurs
    let mut ppcm = BigInt::one();
    for k in &reste {
        let d = k.denom();
        ppcm = &ppcm * d / pgcd(&ppcm, d);
    }
    let entiers: Vec<BigInt> = reste
        .iter()
        .map(|k| (k * BigRational::from_integer(ppcm.clone())).to_integer())
        .collect();

    let (Some(ps), Some(qs)) = (
        diviseurs(&entiers[0]),
        entiers.last().and_then(diviseurs),
    ) else {
        return (racines, reste);
    };

    for p in &ps {
        for q in &qs {
            for signe in [1i64, -1] {
                let r = BigRational::new(p * BigInt::from(signe), q.clone());
                while reste.len() > 1 && evaluer(&reste, &r).is_zero() {
                    if !racines.contains(&r) {
                        racines.push(r.clone());
                    }
                    reste = diviser(&reste, &r);
                }
            }
        }
    }
    (racines, reste)
}

fn pgcd(a: &BigInt, b: &BigInt) -> BigInt {
    let mut a = a.abs();
    let mut b = b.abs();
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

/// Polynôme bicarré : seuls les degrés pairs -> coefficients en y = x².
pub fn bicarre(c: &[Expr]) -> Option<Vec<Expr>> {
    if c.len() < 5 {
        return None;
    }
    if c.iter().enumerate().any(|(k, e)| k % 2 == 1 && !e.est_zero()) {
        return None;
    }
    Some(c.iter().step_by(2).cloned().collect())
}
