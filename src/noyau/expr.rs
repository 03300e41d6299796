// src/noyau/expr.rs
//
// AST exact (sans flottants).
// - Rat      : rationnel exact
// - Pi, E, I : constantes (I = unité imaginaire)
// - Infini   : +∞ (−∞ s'écrit Mul[-1, Infini])
// - Indefini : résultat indéfini (0/0, tan(π/2), ∞−∞ ...)
// - Var      : variable symbolique
// - Add/Mul  : sommes et produits n-aires
// - Pow      : puissance générale (√x = x^(1/2), exp(x) = E^x)
// - Fonc     : fonctions unaires (sin, cos, tan, ln, abs)
//
// Conventions :
// - a - b  = Add[a, Mul[-1, b]]
// - a / b  = Mul[a, Pow(b, -1)]
// - Les constructeurs ci-dessous NE simplifient PAS : canon.rs s'en charge.

use std::collections::BTreeSet;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::canon::canon_expr;
use super::erreur::{CalcError, CalcResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Fonction {
    Sin,
    Cos,
    Tan,
    Ln,
    Abs,
}

impl Fonction {
    pub fn nom(self) -> &'static str {
        match self {
            Fonction::Sin => "sin",
            Fonction::Cos => "cos",
            Fonction::Tan => "tan",
            Fonction::Ln => "log",
            Fonction::Abs => "abs",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Rat(BigRational),
    Pi,
    E,
    I,
    Infini,
    Indefini,

    Var(String),

    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Fonc(Fonction, Box<Expr>),
}

/// Garde-fous (taille d'arbre, taille des rationnels).
pub const MAX_NOEUDS: usize = 100_000;
pub const MAX_BITS: u64 = 200_000;

impl Expr {
    /* ------------------------ Constructeurs (bruts) ------------------------ */

    pub fn entier(n: i64) -> Expr {
        Expr::Rat(BigRational::from_integer(BigInt::from(n)))
    }

    pub fn rat(n: i64, d: i64) -> Expr {
        Expr::Rat(BigRational::new(BigInt::from(n), BigInt::from(d)))
    }

    pub fn zero() -> Expr {
        Expr::Rat(BigRational::zero())
    }

    pub fn un() -> Expr {
        Expr::Rat(BigRational::one())
    }

    pub fn var(nom: &str) -> Expr {
        Expr::Var(nom.to_string())
    }

    pub fn moins_infini() -> Expr {
        Expr::Mul(vec![Expr::entier(-1), Expr::Infini])
    }

    pub fn add(a: Expr, b: Expr) -> Expr {
        Expr::Add(vec![a, b])
    }

    pub fn sub(a: Expr, b: Expr) -> Expr {
        Expr::Add(vec![a, Expr::neg(b)])
    }

    pub fn mul(a: Expr, b: Expr) -> Expr {
        Expr::Mul(vec![a, b])
    }

    pub fn div(a: Expr, b: Expr) -> Expr {
        Expr::Mul(vec![a, Expr::inv(b)])
    }

    pub fn neg(a: Expr) -> Expr {
        match a {
            Expr::Rat(r) => Expr::Rat(-r),
            autre => Expr::Mul(vec![Expr::entier(-1), autre]),
        }
    }

    pub fn inv(a: Expr) -> Expr {
        Expr::pow(a, Expr::entier(-1))
    }

    pub fn pow(a: Expr, b: Expr) -> Expr {
        Expr::Pow(Box::new(a), Box::new(b))
    }

    pub fn sqrt(a: Expr) -> Expr {
        Expr::pow(a, Expr::rat(1, 2))
    }

    pub fn exp(a: Expr) -> Expr {
        Expr::pow(Expr::E, a)
    }

    pub fn fonc(f: Fonction, a: Expr) -> Expr {
        Expr::Fonc(f, Box::new(a))
    }

    pub fn ln(a: Expr) -> Expr {
        Expr::fonc(Fonction::Ln, a)
    }

    /// Canonicalisation / simplification exacte (voir canon.rs).
    pub fn simplify(self) -> Expr {
        canon_expr(self)
    }

    /* ------------------------ Requêtes ------------------------ */

    pub fn comme_rat(&self) -> Option<&BigRational> {
        match self {
            Expr::Rat(r) => Some(r),
            _ => None,
        }
    }

    pub fn est_zero(&self) -> bool {
        matches!(self, Expr::Rat(r) if r.is_zero())
    }

    pub fn est_un(&self) -> bool {
        matches!(self, Expr::Rat(r) if r.is_one())
    }

    pub fn est_entier(&self) -> bool {
        matches!(self, Expr::Rat(r) if r.is_integer())
    }

    /// +1 pour +∞, -1 pour −∞ (forme canonique), None sinon.
    pub fn signe_infini(&self) -> Option<i8> {
        match self {
            Expr::Infini => Some(1),
            Expr::Mul(v) if v.len() == 2 && v[1] == Expr::Infini => match &v[0] {
                Expr::Rat(r) if r.is_negative() => Some(-1),
                Expr::Rat(r) if r.is_positive() => Some(1),
                _ => None,
            },
            _ => None,
        }
    }

    /// Parcours itératif : vrai si un noeud satisfait `pred`.
    /// Garde-fou : au-delà de MAX_NOEUDS on répond vrai (prudence).
    pub fn contient(&self, pred: impl Fn(&Expr) -> bool) -> bool {
        let mut pile: Vec<&Expr> = vec![self];
        let mut visites = 0usize;

        while let Some(e) = pile.pop() {
            visites += 1;
            if visites > MAX_NOEUDS {
                return true;
            }
            if pred(e) {
                return true;
            }
            pousse_enfants(e, &mut pile);
        }
        false
    }

    pub fn contient_var(&self, nom: &str) -> bool {
        self.contient(|e| matches!(e, Expr::Var(v) if v == nom))
    }

    pub fn a_des_variables(&self) -> bool {
        self.contient(|e| matches!(e, Expr::Var(_)))
    }

    pub fn contient_indefini(&self) -> bool {
        self.contient(|e| matches!(e, Expr::Indefini))
    }

    pub fn contient_infini(&self) -> bool {
        self.contient(|e| matches!(e, Expr::Infini))
    }

    pub fn contient_i(&self) -> bool {
        self.contient(|e| matches!(e, Expr::I))
    }

    /// Ensemble (trié) des variables libres.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        let mut pile: Vec<&Expr> = vec![self];
        while let Some(e) = pile.pop() {
            if let Expr::Var(v) = e {
                out.insert(v.clone());
            }
            pousse_enfants(e, &mut pile);
        }
        out
    }

    /// Nombre de noeuds (borné à MAX_NOEUDS + 1).
    pub fn taille(&self) -> usize {
        let mut pile: Vec<&Expr> = vec![self];
        let mut n = 0usize;
        while let Some(e) = pile.pop() {
            n += 1;
            if n > MAX_NOEUDS {
                break;
            }
            pousse_enfants(e, &mut pile);
        }
        n
    }

    /// Remplace chaque occurrence de la variable `nom` par `valeur` (sans simplifier).
    pub fn substituer(&self, nom: &str, valeur: &Expr) -> Expr {
        match self {
            Expr::Var(v) if v == nom => valeur.clone(),
            Expr::Rat(_)
            | Expr::Pi
            | Expr::E
            | Expr::I
            | Expr::Infini
            | Expr::Indefini
            | Expr::Var(_) => self.clone(),
            Expr::Add(v) => Expr::Add(v.iter().map(|t| t.substituer(nom, valeur)).collect()),
            Expr::Mul(v) => Expr::Mul(v.iter().map(|t| t.substituer(nom, valeur)).collect()),
            Expr::Pow(b, x) => Expr::pow(b.substituer(nom, valeur), x.substituer(nom, valeur)),
            Expr::Fonc(f, x) => Expr::fonc(*f, x.substituer(nom, valeur)),
        }
    }

    /// Substitution simultanée (x=y, y=x échange bien les deux).
    pub fn substituer_plusieurs(&self, liaisons: &[(String, Expr)]) -> Expr {
        match self {
            Expr::Var(v) => match liaisons.iter().find(|(n, _)| n == v) {
                Some((_, val)) => val.clone(),
                None => self.clone(),
            },
            Expr::Add(v) => Expr::Add(v.iter().map(|t| t.substituer_plusieurs(liaisons)).collect()),
            Expr::Mul(v) => Expr::Mul(v.iter().map(|t| t.substituer_plusieurs(liaisons)).collect()),
            Expr::Pow(b, x) => Expr::pow(
                b.substituer_plusieurs(liaisons),
                x.substituer_plusieurs(liaisons),
            ),
            Expr::Fonc(f, x) => Expr::fonc(*f, x.substituer_plusieurs(liaisons)),
            _ => self.clone(),
        }
    }

    /// Garde-fou de taille (arbre + rationnels) avant de rendre un résultat.
    pub fn verifier_taille(&self) -> CalcResult<()> {
        if self.taille() > MAX_NOEUDS {
            return Err(CalcError::TropGrand);
        }
        let trop_gros = self.contient(|e| match e {
            Expr::Rat(r) => r.numer().bits() > MAX_BITS || r.denom().bits() > MAX_BITS,
            _ => false,
        });
        if trop_gros {
            return Err(CalcError::TropGrand);
        }
        Ok(())
    }
}

fn pousse_enfants<'a>(e: &'a Expr, pile: &mut Vec<&'a Expr>) {
    match e {
        Expr::Add(v) | Expr::Mul(v) => pile.extend(v.iter()),
        Expr::Pow(b, x) => {
            pile.push(b.as_ref());
            pile.push(x.as_ref());
        }
        Expr::Fonc(_, x) => pile.push(x.as_ref()),
        _ => {}
    }
}

impl From<BigRational> for Expr {
    fn from(r: BigRational) -> Self {
        Expr::Rat(r)
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::entier(n)
    }
}

/* ------------------------ Outils rationnels (utilisés par canon / lecture) ------------------------ */

/// base^exp exact. None si le résultat dépasserait MAX_BITS.
pub(crate) fn rational_pow_int(base: &BigRational, exp: i64) -> Option<BigRational> {
    if exp == 0 {
        return Some(BigRational::one());
    }
    if base.is_zero() {
        return if exp > 0 {
            Some(BigRational::zero())
        } else {
            None
        };
    }

    let e = exp.unsigned_abs();
    let bits = base.numer().bits().max(base.denom().bits());
    if bits.saturating_mul(e) > MAX_BITS {
        return None;
    }

    let mut acc = BigRational::one();
    let mut b = base.clone();
    let mut k = e;
    while k > 0 {
        if (k & 1) == 1 {
            acc *= b.clone();
        }
        k >>= 1;
        if k > 0 {
            b *= b.clone();
        }
    }

    if exp < 0 {
        Some(acc.recip())
    } else {
        Some(acc)
    }
}

/// Racine k-ième exacte d'un entier >= 0, si elle existe.
pub(crate) fn racine_exacte(n: &BigInt, k: u32) -> Option<BigInt> {
    if n.is_negative() || k == 0 {
        return None;
    }
    let r = n.nth_root(k);
    if r.pow(k) == *n {
        Some(r)
    } else {
        None
    }
}

/// Décompose q > 0 en q = r^k avec k maximal (k >= 1).
pub(crate) fn puissance_parfaite(q: &BigRational) -> (BigRational, u32) {
    if !q.is_positive() || q.is_one() {
        return (q.clone(), 1);
    }
    let max_k = q.numer().bits().max(q.denom().bits()).min(256) as u32;
    for k in (2..=max_k).rev() {
        if let (Some(n), Some(d)) = (racine_exacte(q.numer(), k), racine_exacte(q.denom(), k)) {
            return (BigRational::new(n, d), k);
        }
    }
    (q.clone(), 1)
}
