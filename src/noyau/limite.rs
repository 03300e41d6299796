// src/noyau/limite.rs
//
// Limites en un point fini ou infini (droite, gauche, deux côtés).
// Tout se ramène à t -> 0+ :
//   x = p + t (droite), x = p − t (gauche), x = 1/t (+∞), x = −1/t (−∞)
// puis évaluation récursive sur la structure, en réels étendus :
// - substitution directe quand elle est définie
// - c/0 : signe obtenu par sondage numérique près de 0+
// - 0/0 et ∞/∞ : L'Hôpital
// - 0·∞ et ∞−∞ : réécrits en quotient
// - f^g = exp(g·ln f) quand base et exposant dépendent de t
// - (Σ c·t^e)^q = t^(p·q)·(Σ c·t^(e−p))^q avec p = min e (t > 0)
// - A + c·√B : conjugué (A² − c²B) / (A − c·√B) en dernier recours

use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use tracing::debug;

use super::approx::approx_avec;
use super::canon::{canon_expr, key_string};
use super::derivee::deriver;
use super::erreur::{CalcError, CalcResult};
use super::expr::{Expr, Fonction};
use super::poly::{developper, en_fraction};
use super::validation::signe;

const PROFONDEUR_MAX: usize = 40;
const TAILLE_MAX: usize = 5_000;
const SONDES: [f64; 4] = [1e-4, 1e-5, 1e-6, 1e-7];

/// Côté d'approche.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    DeuxCotes,
    Droite,
    Gauche,
}

impl FromStr for Direction {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "both" | "+-" => Ok(Direction::DeuxCotes),
            "plus" | "+" | "right" => Ok(Direction::Droite),
            "minus" | "-" | "left" => Ok(Direction::Gauche),
            _ => Err(CalcError::Parametre {
                quoi: "direction",
                fragment: s.trim().to_string(),
            }),
        }
    }
}

/// Limite en réels étendus.
#[derive(Clone, Debug)]
enum Lim {
    Fini(Expr),
    Infini(i8),
}

impl Lim {
    fn en_expr(self) -> Expr {
        match self {
            Lim::Fini(e) => e,
            Lim::Infini(s) if s > 0 => Expr::Infini,
            Lim::Infini(_) => Expr::moins_infini(),
        }
    }
}

fn indetermine() -> CalcError {
    CalcError::non_resolu("Unable to determine the limit")
}

/* ------------------------ Entrée ------------------------ */

/// lim_{var -> point} e
pub fn limite(e: &Expr, var: &str, point: &Expr, dir: Direction) -> CalcResult<Expr> {
    let point = canon_expr(point.clone());
    if point.contient_indefini() {
        return Err(CalcError::Indefini {
            role: "Limit point".into(),
        });
    }
    if point.contient_var(var) {
        return Err(CalcError::domaine(format!(
            "Limit point cannot depend on {var}"
        )));
    }
    if point.contient_i() {
        return Err(CalcError::NonReel {
            role: "Limit point".into(),
            valeur: point.to_string(),
        });
    }
    if !e.contient_var(var) {
        return constante(e).map(Lim::en_expr);
    }

    let t = variable_libre(e, &point);
    let tv = Expr::var(&t);

    // ±∞ : x = ±1/t, le sens est imposé
    if let Some(s) = point.signe_infini() {
        let x = canon_expr(Expr::mul(Expr::entier(i64::from(s)), Expr::inv(tv)));
        let f = canon_expr(e.substituer(var, &x));
        debug!(f = %f, "limite à l'infini");
        return lim0(&f, &t, 0).map(Lim::en_expr);
    }
    if point.contient_infini() {
        return Err(CalcError::domaine(format!(
            "Unsupported limit point: {point}"
        )));
    }

    let direct = canon_expr(e.substituer(var, &point));
    if !direct.contient_indefini() && !direct.contient_infini() {
        debug!(resultat = %direct, "limite par substitution");
        return Ok(direct);
    }

    let cote = |s: i64| -> CalcResult<Expr> {
        let x = canon_expr(Expr::add(point.clone(), Expr::mul(Expr::entier(s), tv.clone())));
        let f = canon_expr(e.substituer(var, &x));
        debug!(f = %f, cote = s, "limite latérale");
        lim0(&f, &t, 0).map(Lim::en_expr)
    };

    match dir {
        Direction::Droite => cote(1),
        Direction::Gauche => cote(-1),
        Direction::DeuxCotes => {
            let droite = cote(1)?;
            let gauche = cote(-1)?;
            if key_string(&droite) != key_string(&gauche) {
                return Err(CalcError::domaine(format!(
                    "The limit does not exist since left hand limit = {gauche} and right hand limit = {droite}"
                )));
            }
            Ok(droite)
        }
    }
}

fn variable_libre(e: &Expr, point: &Expr) -> String {
    let mut nom = String::from("_t");
    while e.contient_var(&nom) || point.contient_var(&nom) {
        nom.push('_');
    }
    nom
}

/* ------------------------ t -> 0+ ------------------------ */

fn lim0(f: &Expr, t: &str, prof: usize) -> CalcResult<Lim> {
    if prof > PROFONDEUR_MAX || f.taille() > TAILLE_MAX {
        return Err(indetermine());
    }
    if !f.contient_var(t) {
        return constante(f);
    }

    let direct = canon_expr(f.substituer(t, &Expr::zero()));
    if !direct.contient_indefini() && !direct.contient_infini() {
        return Ok(Lim::Fini(direct));
    }

    // |u| -> ±u, signe lu près de 0+
    if f.contient(|x| matches!(x, Expr::Fonc(Fonction::Abs, _))) {
        let mut change = false;
        let g = sans_abs(f, t, &mut change);
        if change {
            return lim0(&canon_expr(g), t, prof + 1);
        }
    }

    // sqrt(t^-2 + t^-1) -> t^-1·sqrt(1 + t)
    if f.contient(|x| matches!(x, Expr::Pow(_, n) if matches!(**n, Expr::Rat(ref q) if !q.is_integer()))) {
        let mut change = false;
        let g = radicaux_factorises(f, t, &mut change);
        if change {
            let g = canon_expr(g);
            debug!(f = %g, "puissance de t sortie d'un radical");
            return lim0(&g, t, prof + 1);
        }
    }

    match f {
        Expr::Add(termes) => somme(f, termes, t, prof),
        Expr::Mul(facteurs) => produit(facteurs, t, prof),
        Expr::Pow(b, n) => puissance(b, n, t, prof),
        Expr::Fonc(g, u) => fonction(f, *g, u, t, prof),
        _ => Err(indetermine()),
    }
}

/// Limite d'une expression sans t.
fn constante(f: &Expr) -> CalcResult<Lim> {
    if f.contient_indefini() {
        return Err(indetermine());
    }
    if let Some(s) = f.signe_infini() {
        return Ok(Lim::Infini(s));
    }
    if f.contient_infini() {
        return Err(indetermine());
    }
    Ok(Lim::Fini(f.clone()))
}

fn somme(f: &Expr, termes: &[Expr], t: &str, prof: usize) -> CalcResult<Lim> {
    let mut finis = Vec::with_capacity(termes.len());
    let mut plus = false;
    let mut moins = false;
    let mut echec = false;

    for terme in termes {
        match lim0(terme, t, prof + 1) {
            Ok(Lim::Fini(v)) => finis.push(v),
            Ok(Lim::Infini(s)) if s > 0 => plus = true,
            Ok(Lim::Infini(_)) => moins = true,
            Err(_) => echec = true,
        }
    }

    if !echec {
        match (plus, moins) {
            (false, false) => return Ok(Lim::Fini(canon_expr(Expr::Add(finis)))),
            (true, false) => return Ok(Lim::Infini(1)),
            (false, true) => return Ok(Lim::Infini(-1)),
            (true, true) => {}
        }
    }

    // ∞ − ∞ (ou terme rebelle) : même dénominateur
    let (num, den) = en_fraction(f);
    let essai = if den.est_un() {
        Err(indetermine())
    } else {
        debug!(num = %num, den = %den, "somme réduite au même dénominateur");
        quotient(&num, &den, t, prof + 1)
    };
    if essai.is_ok() {
        return essai;
    }

    match conjugue(termes, t) {
        Some((num, den)) => {
            debug!(num = %num, den = %den, "somme multipliée par le conjugué");
            quotient(&num, &den, t, prof + 1)
        }
        None => essai,
    }
}

/// A + c·√B = (A² − c²·B) / (A − c·√B), pour le premier radical en t.
fn conjugue(termes: &[Expr], t: &str) -> Option<(Expr, Expr)> {
    let racine_en_t =
        |x: &Expr| matches!(x, Expr::Pow(b, n) if b.contient_var(t) && **n == Expr::rat(1, 2));

    let (i, coeff, base) = termes.iter().enumerate().find_map(|(i, terme)| match terme {
        Expr::Pow(b, _) if racine_en_t(terme) => Some((i, Expr::un(), (**b).clone())),
        Expr::Mul(v) => {
            let k = v.iter().position(|x| racine_en_t(x))?;
            let Expr::Pow(b, _) = &v[k] else { return None };
            let reste: Vec<Expr> = v
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != k)
                .map(|(_, x)| x.clone())
                .collect();
            Some((i, canon_expr(Expr::Mul(reste)), (**b).clone()))
        }
        _ => None,
    })?;

    let a = canon_expr(Expr::Add(
        termes.iter().enumerate().filter(|(j, _)| *j != i).map(|(_, x)| x.clone()).collect(),
    ));
    let radical = Expr::mul(coeff.clone(), Expr::sqrt(base.clone()));
    let num = developper(&canon_expr(Expr::sub(
        Expr::pow(a.clone(), Expr::entier(2)),
        Expr::Mul(vec![Expr::pow(coeff, Expr::entier(2)), base]),
    )));
    let den = canon_expr(Expr::sub(a, radical));
    if den.est_zero() {
        return None;
    }
    Some((num, den))
}

fn produit(facteurs: &[Expr], t: &str, prof: usize) -> CalcResult<Lim> {
    let mut num = Vec::new();
    let mut den = Vec::new();
    for fa in facteurs {
        match fa {
            Expr::Pow(b, n) if b.contient_var(t) && matches!(**n, Expr::Rat(ref q) if q.is_negative()) => {
                den.push(canon_expr(Expr::pow((**b).clone(), Expr::neg((**n).clone()))));
            }
            autre => num.push(autre.clone()),
        }
    }
    if !den.is_empty() {
        let n = canon_expr(Expr::Mul(num));
        let d = canon_expr(Expr::Mul(den));
        return quotient(&n, &d, t, prof + 1);
    }

    let mut finis = Vec::with_capacity(facteurs.len());
    let mut nuls = Vec::new();
    let mut infinis = Vec::new();
    let mut autres = Vec::new();
    let mut signe_inf: i8 = 1;

    for fa in facteurs {
        match lim0(fa, t, prof + 1)? {
            Lim::Fini(v) => {
                if v.est_zero() {
                    nuls.push(fa.clone());
                } else {
                    autres.push(fa.clone());
                }
                finis.push(v);
            }
            Lim::Infini(s) => {
                signe_inf *= s;
                infinis.push(fa.clone());
            }
        }
    }

    if infinis.is_empty() {
        return Ok(Lim::Fini(canon_expr(Expr::Mul(finis))));
    }

    if !nuls.is_empty() {
        // 0·∞ : d'abord ∞ / (1/0), puis 0 / (1/∞)
        let inverse = |v: &[Expr]| canon_expr(Expr::Mul(v.iter().cloned().map(Expr::inv).collect()));
        let mut haut = infinis.clone();
        haut.extend(autres.iter().cloned());
        let essai = quotient(&canon_expr(Expr::Mul(haut)), &inverse(&nuls), t, prof + 1);
        if essai.is_ok() {
            return essai;
        }
        let mut haut = nuls;
        haut.extend(autres);
        return quotient(&canon_expr(Expr::Mul(haut)), &inverse(&infinis), t, prof + 1);
    }

    let c = canon_expr(Expr::Mul(finis));
    let s = signe(&c).ok_or_else(indetermine)?;
    Ok(Lim::Infini(signe_inf * s))
}

fn quotient(n: &Expr, d: &Expr, t: &str, prof: usize) -> CalcResult<Lim> {
    let ln = lim0(n, t, prof + 1)?;
    let ld = lim0(d, t, prof + 1)?;

    match (&ln, &ld) {
        (Lim::Fini(a), Lim::Fini(b)) if !b.est_zero() => {
            Ok(Lim::Fini(canon_expr(Expr::div(a.clone(), b.clone()))))
        }
        // c/0
        (Lim::Fini(a), Lim::Fini(_)) if !a.est_zero() => {
            let sa = signe(a).ok_or_else(indetermine)?;
            let sd = sonde(d, t).ok_or_else(|| {
                CalcError::domaine("The limit does not exist: the denominator changes sign")
            })?;
            Ok(Lim::Infini(sa * sd))
        }
        (Lim::Fini(_), Lim::Infini(_)) => Ok(Lim::Fini(Expr::zero())),
        (Lim::Infini(s), Lim::Fini(b)) => {
            let sb = if b.est_zero() { sonde(d, t) } else { signe(b) };
            Ok(Lim::Infini(s * sb.ok_or_else(indetermine)?))
        }
        // 0/0, ∞/∞
        _ => lhopital(n, d, t, prof),
    }
}

fn lhopital(n: &Expr, d: &Expr, t: &str, prof: usize) -> CalcResult<Lim> {
    let dn = deriver(n, t);
    let dd = deriver(d, t);
    if dd.est_zero() {
        return Err(indetermine());
    }
    let q = canon_expr(Expr::div(dn, dd));
    debug!(quotient = %q, "L'Hôpital");
    lim0(&q, t, prof + 1)
}

fn puissance(b: &Expr, n: &Expr, t: &str, prof: usize) -> CalcResult<Lim> {
    match (b.contient_var(t), n.contient_var(t)) {
        (true, false) => match lim0(b, t, prof + 1)? {
            Lim::Fini(v) if v.est_zero() => match n {
                Expr::Rat(q) if q.is_positive() => Ok(Lim::Fini(Expr::zero())),
                Expr::Rat(q) if (q.numer() % BigInt::from(2)).is_zero() => Ok(Lim::Infini(1)),
                // b^(−impair) garde le signe de b
                Expr::Rat(_) => sonde(b, t).map(Lim::Infini).ok_or_else(|| {
                    CalcError::domaine("The limit does not exist: the base changes sign")
                }),
                _ => match signe(n) {
                    Some(1) => Ok(Lim::Fini(Expr::zero())),
                    Some(-1) => Ok(Lim::Infini(1)),
                    _ => Err(indetermine()),
                },
            },
            Lim::Fini(v) => constante(&canon_expr(Expr::pow(v, n.clone()))),
            Lim::Infini(s) => match signe(n) {
                Some(-1) => Ok(Lim::Fini(Expr::zero())),
                Some(1) if s > 0 => Ok(Lim::Infini(1)),
                Some(1) => match n {
                    Expr::Rat(q) if q.is_integer() => {
                        let pair = (q.numer() % BigInt::from(2)).is_zero();
                        Ok(Lim::Infini(if pair { 1 } else { -1 }))
                    }
                    _ => Err(indetermine()),
                },
                _ => Err(indetermine()),
            },
        },

        (false, true) => {
            let x = lim0(n, t, prof + 1)?.en_expr();
            constante(&canon_expr(Expr::pow(b.clone(), x)))
        }

        // f^g = exp(g·ln f)
        _ => {
            let g = canon_expr(Expr::mul(n.clone(), Expr::ln(b.clone())));
            match lim0(&g, t, prof + 1)? {
                Lim::Fini(w) => Ok(Lim::Fini(canon_expr(Expr::exp(w)))),
                Lim::Infini(s) if s > 0 => Ok(Lim::Infini(1)),
                Lim::Infini(_) => Ok(Lim::Fini(Expr::zero())),
            }
        }
    }
}

fn fonction(f: &Expr, g: Fonction, u: &Expr, t: &str, prof: usize) -> CalcResult<Lim> {
    let lu = lim0(u, t, prof + 1)?;
    match (g, lu) {
        (Fonction::Sin | Fonction::Cos | Fonction::Tan, Lim::Infini(_)) => Err(CalcError::domaine(
            format!("The limit does not exist: {} oscillates", g.nom()),
        )),
        (Fonction::Tan, Lim::Fini(v)) => {
            let r = canon_expr(Expr::fonc(Fonction::Tan, v));
            if r.contient_indefini() {
                sonde(f, t).map(Lim::Infini).ok_or_else(indetermine)
            } else {
                constante(&r)
            }
        }
        (Fonction::Ln, Lim::Fini(v)) if v.est_zero() => Ok(Lim::Infini(-1)),
        (Fonction::Ln, Lim::Infini(s)) if s > 0 => Ok(Lim::Infini(1)),
        (Fonction::Ln, Lim::Infini(_)) => Err(CalcError::domaine(
            "The limit does not exist: logarithm of a negative value",
        )),
        (Fonction::Abs, Lim::Infini(_)) => Ok(Lim::Infini(1)),
        (_, Lim::Fini(v)) => constante(&canon_expr(Expr::fonc(g, v))),
    }
}

/* ------------------------ Outils ------------------------ */

/// Signe de `e` pour t -> 0+, s'il est stable sur les sondes.
fn sonde(e: &Expr, t: &str) -> Option<i8> {
    let mut vu: i8 = 0;
    for h in SONDES {
        let v = approx_avec(e, &[(t, h)])?;
        let s: i8 = if v > 0.0 {
            1
        } else if v < 0.0 {
            -1
        } else {
            return None;
        };
        if vu != 0 && s != vu {
            return None;
        }
        vu = s;
    }
    Some(vu)
}

fn sans_abs(e: &Expr, t: &str, change: &mut bool) -> Expr {
    match e {
        Expr::Fonc(Fonction::Abs, u) if u.contient_var(t) => {
            let u = sans_abs(u, t, change);
            match sonde(&u, t) {
                Some(s) => {
                    *change = true;
                    Expr::mul(Expr::entier(i64::from(s)), u)
                }
                None => Expr::fonc(Fonction::Abs, u),
            }
        }
        Expr::Add(v) => Expr::Add(v.iter().map(|x| sans_abs(x, t, change)).collect()),
        Expr::Mul(v) => Expr::Mul(v.iter().map(|x| sans_abs(x, t, change)).collect()),
        Expr::Pow(b, x) => Expr::pow(sans_abs(b, t, change), sans_abs(x, t, change)),
        Expr::Fonc(g, u) => Expr::fonc(*g, sans_abs(u, t, change)),
        autre => autre.clone(),
    }
}

/// Monôme c·t^e (c sans t) ; e = 0 pour une constante.
fn monome(terme: &Expr, t: &str) -> Option<(Expr, BigRational)> {
    let puissance_de_t = |x: &Expr| match x {
        Expr::Var(v) if v == t => Some(BigRational::from_integer(BigInt::from(1))),
        Expr::Pow(b, n) if matches!(**b, Expr::Var(ref v) if v == t) => n.comme_rat().cloned(),
        _ => None,
    };

    if !terme.contient_var(t) {
        return Some((terme.clone(), BigRational::zero()));
    }
    if let Some(e) = puissance_de_t(terme) {
        return Some((Expr::un(), e));
    }
    let Expr::Mul(v) = terme else { return None };
    let mut coeff = Vec::with_capacity(v.len());
    let mut exposant = None;
    for f in v {
        if !f.contient_var(t) {
            coeff.push(f.clone());
        } else if exposant.is_none() {
            exposant = Some(puissance_de_t(f)?);
        } else {
            return None;
        }
    }
    let coeff = if coeff.is_empty() { Expr::un() } else { canon_expr(Expr::Mul(coeff)) };
    Some((coeff, exposant?))
}

/// (Σ c·t^e)^q, q non entier : sort t^p, p = plus petit exposant non nul.
fn radicaux_factorises(e: &Expr, t: &str, change: &mut bool) -> Expr {
    match e {
        Expr::Pow(b, n) => {
            let b = radicaux_factorises(b, t, change);
            let n = radicaux_factorises(n, t, change);
            if let (Expr::Add(termes), Expr::Rat(q)) = (&b, &n) {
                if !q.is_integer() && b.contient_var(t) {
                    let monomes: Option<Vec<_>> = termes.iter().map(|x| monome(x, t)).collect();
                    if let Some(monomes) = monomes {
                        let p = monomes.iter().map(|(_, e)| e.clone()).min();
                        if let Some(p) = p.filter(|p| !p.is_zero()) {
                            *change = true;
                            let reste = monomes
                                .into_iter()
                                .map(|(c, e)| {
                                    Expr::mul(c, Expr::pow(Expr::var(t), Expr::Rat(e - &p)))
                                })
                                .collect();
                            return Expr::mul(
                                Expr::pow(Expr::var(t), Expr::Rat(p * q)),
                                Expr::pow(Expr::Add(reste), n.clone()),
                            );
                        }
                    }
                }
            }
            Expr::pow(b, n)
        }
        Expr::Add(v) => Expr::Add(v.iter().map(|x| radicaux_factorises(x, t, change)).collect()),
        Expr::Mul(v) => Expr::Mul(v.iter().map(|x| radicaux_factorises(x, t, change)).collect()),
        Expr::Fonc(g, u) => Expr::fonc(*g, radicaux_factorises(u, t, change)),
        autre => autre.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::eval::analyser;

    fn lim(e: &str, point: &str, dir: &str) -> CalcResult<String> {
        let e = analyser(e)?;
        let p = analyser(point)?;
        limite(&e, "x", &p, dir.parse()?).map(|r| r.to_string())
    }

    fn ok(e: &str, point: &str, dir: &str) -> String {
        lim(e, point, dir).unwrap_or_else(|err| panic!("lim {e} -> {point}: {err}"))
    }

    #[test]
    fn directions() {
        assert_eq!("".parse::<Direction>().unwrap(), Direction::DeuxCotes);
        assert_eq!("plus".parse::<Direction>().unwrap(), Direction::Droite);
        assert_eq!("-".parse::<Direction>().unwrap(), Direction::Gauche);
        let e = "up".parse::<Direction>().unwrap_err();
        assert_eq!(e.to_string(), "Invalid direction: up");
    }

    #[test]
    fn substitution_directe() {
        assert_eq!(ok("x**2 + 1", "2", "both"), "5");
        assert_eq!(ok("sin(x)", "pi/2", "both"), "1");
        assert_eq!(ok("7", "0", "both"), "7");
    }

    #[test]
    fn formes_zero_sur_zero() {
        assert_eq!(ok("sin(x)/x", "0", "both"), "1");
        assert_eq!(ok("(x**2 - 1)/(x - 1)", "1", "both"), "2");
        assert_eq!(ok("(exp(x) - 1)/x", "0", "both"), "1");
        assert_eq!(ok("(1 - cos(x))/x**2", "0", "both"), "1/2");
    }

    #[test]
    fn a_l_infini() {
        assert_eq!(ok("1/x", "oo", "both"), "0");
        assert_eq!(ok("x**2", "oo", "both"), "oo");
        assert_eq!(ok("x**2", "-oo", "both"), "oo");
        assert_eq!(ok("exp(x)", "-oo", "both"), "0");
        assert_eq!(ok("(2x + 1)/(x + 3)", "oo", "both"), "2");
        assert_eq!(ok("(1 + 1/x)**x", "oo", "both"), "E");
    }

    #[test]
    fn differences_de_radicaux() {
        assert_eq!(ok("sqrt(x**2 + x) - x", "oo", "both"), "1/2");
        assert_eq!(ok("sqrt(x**2 + 2x) - x", "oo", "both"), "1");
        assert_eq!(ok("x - sqrt(x**2 - 1)", "oo", "both"), "0");
        assert_eq!(ok("sqrt(x + 1) - sqrt(x)", "oo", "both"), "0");
        assert_eq!(ok("sqrt(x**2 + x) + x", "-oo", "both"), "-1/2");
    }

    #[test]
    fn conjugue_d_une_difference() {
        let f = analyser("sqrt(x + 1) - sqrt(x)").unwrap();
        let Expr::Add(termes) = &f else { panic!("{f}") };
        let (num, den) = conjugue(termes, "x").unwrap();
        assert!(matches!(num.to_string().as_str(), "1" | "-1"), "{num}");
        assert!(den.contient_var("x"), "{den}");
        assert!(conjugue(&[Expr::var("x"), Expr::un()], "x").is_none());
    }

    #[test]
    fn limites_laterales() {
        assert_eq!(ok("log(x)", "0", "plus"), "-oo");
        assert_eq!(ok("1/x", "0", "plus"), "oo");
        assert_eq!(ok("1/x", "0", "minus"), "-oo");
        assert_eq!(ok("x*log(x)", "0", "plus"), "0");
        assert_eq!(ok("abs(x)/x", "0", "minus"), "-1");
    }

    #[test]
    fn limites_inexistantes() {
        let e = lim("1/x", "0", "both").unwrap_err();
        assert!(e.to_string().starts_with("The limit does not exist"), "{e}");
        let e = lim("abs(x)/x", "0", "both").unwrap_err();
        assert!(e.to_string().contains("left hand limit = -1"), "{e}");
        assert!(lim("sin(x)", "oo", "both").is_err());
    }

    #[test]
    fn point_invalide() {
        assert!(lim("x", "0/0", "both").is_err());
        assert!(lim("x", "I", "both").is_err());
        assert!(lim("x", "x + 1", "both").is_err());
    }
}
