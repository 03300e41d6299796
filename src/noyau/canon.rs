// src/noyau/canon.rs
//
// Canonicalisation forte (déterministe) :
// - aplatissement Add et Mul
// - regroupement des rationnels et des termes semblables (2x + 3x -> 5x)
// - regroupement des bases (x * x^2 -> x^3, √2 * √3 -> √6)
// - puissances exactes : rationnels, racines (extraction des puissances parfaites),
//   I^n, (x^a)^n, (ab)^n
// - valeurs spéciales : trig (angles spéciaux), ln, abs
// - infinis : ∞ absorbe, ∞ − ∞ et 0·∞ -> indéfini
// - tri déterministe des termes/facteurs (ordre total)
//
// Règle d'or : on ne devine jamais une valeur pour Var.

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::approx::approx;
use super::expr::{puissance_parfaite, rational_pow_int, racine_exacte, Expr, Fonction};
use super::trig::valeur_speciale;

pub fn canon_expr(e: Expr) -> Expr {
    use Expr::*;

    match e {
        Rat(_) | Pi | E | I | Infini | Indefini | Var(_) => e,
        Add(v) => canon_add(v.into_iter().map(canon_expr).collect()),
        Mul(v) => canon_mul(v.into_iter().map(canon_expr).collect()),
        Pow(b, x) => canon_pow(canon_expr(*b), canon_expr(*x)),
        Fonc(f, x) => canon_fonc(f, canon_expr(*x)),
    }
}

/* ------------------------ clef de tri déterministe ------------------------ */

fn rang(e: &Expr) -> u8 {
    use Expr::*;
    match e {
        Rat(_) => 0,
        Pi | E => 1,
        Var(_) => 2,
        Pow(b, _) => rang(b).max(3),
        Fonc(_, _) => 4,
        // un produit se range comme son facteur principal (2x près de x)
        Mul(v) => v
            .iter()
            .filter(|f| !matches!(f, Rat(_)))
            .map(rang)
            .max()
            .unwrap_or(5),
        Add(_) => 6,
        I => 7,
        Infini => 8,
        Indefini => 255,
    }
}

pub(crate) fn key_string(e: &Expr) -> String {
    use Expr::*;
    match e {
        Rat(r) => format!("R{}/{}", r.numer(), r.denom()),
        Pi => "PI".to_string(),
        E => "E".to_string(),
        I => "I".to_string(),
        Infini => "INF".to_string(),
        Indefini => "NAN".to_string(),
        Var(s) => format!("VAR({s})"),
        Add(v) => format!("ADD({})", joint(v)),
        Mul(v) => format!("MUL({})", joint(v)),
        Pow(b, x) => format!("POW({},{})", key_string(b), key_string(x)),
        Fonc(f, x) => format!("{}({})", f.nom().to_uppercase(), key_string(x)),
    }
}

fn joint(v: &[Expr]) -> String {
    v.iter().map(key_string).collect::<Vec<_>>().join(",")
}

pub(crate) fn cmp_expr(a: &Expr, b: &Expr) -> Ordering {
    rang(a)
        .cmp(&rang(b))
        .then_with(|| key_string(a).cmp(&key_string(b)))
}

/* ------------------------ utilitaires ------------------------ */

fn rat(r: BigRational) -> Expr {
    Expr::Rat(r)
}

fn rat_i(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

/// Sépare un terme en (coefficient rationnel, reste). Reste None = terme purement rationnel.
fn split_coeff(t: Expr) -> (BigRational, Option<Expr>) {
    match t {
        Expr::Rat(r) => (r, None),
        Expr::Mul(mut v) => {
            if let Some(Expr::Rat(_)) = v.first() {
                let Expr::Rat(c) = v.remove(0) else {
                    unreachable!()
                };
                let reste = if v.len() == 1 {
                    v.pop()
                } else {
                    Some(Expr::Mul(v))
                };
                (c, reste)
            } else {
                (BigRational::one(), Some(Expr::Mul(v)))
            }
        }
        autre => (BigRational::one(), Some(autre)),
    }
}

/// coeff * reste, déjà sous forme canonique (le reste est canonique).
fn avec_coeff(c: BigRational, reste: Expr) -> Expr {
    if c.is_zero() {
        return Expr::zero();
    }
    if c.is_one() {
        return reste;
    }
    match reste {
        Expr::Mul(mut v) => {
            v.insert(0, rat(c));
            Expr::Mul(v)
        }
        autre => Expr::Mul(vec![rat(c), autre]),
    }
}

/* ------------------------ Add : aplatissement + termes semblables + tri ------------------------ */

pub(crate) fn canon_add(termes: Vec<Expr>) -> Expr {
    let mut plats: Vec<Expr> = Vec::with_capacity(termes.len());
    for t in termes {
        match t {
            Expr::Add(v) => plats.extend(v),
            autre => plats.push(autre),
        }
    }

    if plats.iter().any(|t| matches!(t, Expr::Indefini)) {
        return Expr::Indefini;
    }

    // ∞ : absorbe tout, sauf ∞ − ∞
    let signes: Vec<i8> = plats.iter().filter_map(|t| t.signe_infini()).collect();
    if !signes.is_empty() {
        let plus = signes.iter().any(|s| *s > 0);
        let moins = signes.iter().any(|s| *s < 0);
        return match (plus, moins) {
            (true, true) => Expr::Indefini,
            (true, false) => Expr::Infini,
            _ => Expr::moins_infini(),
        };
    }

    let mut somme_rat = BigRational::zero();
    let mut groupes: Vec<(String, BigRational, Expr)> = Vec::new();

    for t in plats {
        let (c, reste) = split_coeff(t);
        match reste {
            None => somme_rat += c,
            Some(m) => {
                let k = key_string(&m);
                match groupes.iter_mut().find(|(kk, _, _)| *kk == k) {
                    Some((_, cc, _)) => *cc += c,
                    None => groupes.push((k, c, m)),
                }
            }
        }
    }

    let mut v: Vec<Expr> = groupes
        .into_iter()
        .filter(|(_, c, _)| !c.is_zero())
        .map(|(_, c, m)| avec_coeff(c, m))
        .collect();

    v.sort_by(cmp_expr);
    if !somme_rat.is_zero() {
        v.insert(0, rat(somme_rat));
    }

    match v.len() {
        0 => Expr::zero(),
        1 => v.pop().unwrap_or_else(Expr::zero),
        _ => Expr::Add(v),
    }
}

/* ------------------------ Mul : aplatissement + bases + signe + tri ------------------------ */

pub(crate) fn canon_mul(facteurs: Vec<Expr>) -> Expr {
    let mut courant = facteurs;

    // Le regroupement peut faire apparaître de nouveaux facteurs (√-4 -> 2I) :
    // on itère jusqu'à stabilité (passes bornées).
    for _ in 0..4 {
        match passe_mul(courant) {
            PasseMul::Fini(e) => return e,
            PasseMul::Encore(v) => courant = v,
        }
    }
    construit_mul(BigRational::one(), courant)
}

enum PasseMul {
    Fini(Expr),
    Encore(Vec<Expr>),
}

fn passe_mul(facteurs: Vec<Expr>) -> PasseMul {
    use Expr::*;

    let mut plats: Vec<Expr> = Vec::with_capacity(facteurs.len());
    for f in facteurs {
        match f {
            Mul(v) => plats.extend(v),
            autre => plats.push(autre),
        }
    }

    if plats.iter().any(|f| matches!(f, Indefini)) {
        return PasseMul::Fini(Indefini);
    }

    let a_infini = plats.iter().any(|f| matches!(f, Infini));
    if plats.iter().any(|f| f.est_zero()) {
        return PasseMul::Fini(if a_infini { Indefini } else { Expr::zero() });
    }

    let mut coeff = BigRational::one();
    let mut groupes: Vec<(String, Expr, Vec<Expr>)> = Vec::new();
    let mut infini = false;

    for f in plats {
        match f {
            Rat(r) => coeff *= r,
            Infini => infini = true,
            autre => {
                let (base, expo) = match autre {
                    Pow(b, x) => (*b, *x),
                    b => (b, Expr::un()),
                };
                let k = key_string(&base);
                match groupes.iter_mut().find(|(kk, _, _)| *kk == k) {
                    Some((_, _, expos)) => expos.push(expo),
                    None => groupes.push((k, base, vec![expo])),
                }
            }
        }
    }

    if infini {
        // ∞ · c : seul le signe du coefficient compte
        let signe = if coeff.is_negative() { -1 } else { 1 };
        let mut reste: Vec<Expr> = groupes
            .into_iter()
            .map(|(_, b, xs)| canon_pow(b, canon_add(xs)))
            .collect();
        reste.sort_by(cmp_expr);
        reste.push(Infini);
        return PasseMul::Fini(construit_mul(rat_i(signe), reste));
    }

    // Bases rationnelles positives de même exposant fractionnaire : √2·√3 -> √6
    let mut par_exposant: Vec<(BigRational, BigRational)> = Vec::new();
    let mut autres: Vec<(Expr, Expr)> = Vec::new();
    for (_, base, expos) in groupes {
        let x = canon_add(expos);
        match (&base, &x) {
            (Rat(b), Rat(e)) if b.is_positive() && !e.is_integer() => {
                match par_exposant.iter_mut().find(|(ee, _)| ee == e) {
                    Some((_, bb)) => *bb *= b.clone(),
                    None => par_exposant.push((e.clone(), b.clone())),
                }
            }
            _ => autres.push((base, x)),
        }
    }
    for (e, b) in par_exposant {
        autres.push((rat(b), rat(e)));
    }

    let mut v: Vec<Expr> = Vec::new();
    let mut nouveaux = false;
    for (base, x) in autres {
        match canon_pow(base, x) {
            Rat(r) => coeff *= r,
            Mul(sous) => {
                nouveaux = true;
                for s in sous {
                    match s {
                        Rat(r) => coeff *= r,
                        Indefini => return PasseMul::Fini(Indefini),
                        autre => v.push(autre),
                    }
                }
            }
            Indefini => return PasseMul::Fini(Indefini),
            autre => v.push(autre),
        }
    }

    if coeff.is_zero() {
        return PasseMul::Fini(Expr::zero());
    }

    if nouveaux && a_doublons(&v) {
        let mut suite = vec![rat(coeff)];
        suite.extend(v);
        return PasseMul::Encore(suite);
    }

    v.sort_by(cmp_expr);

    // c · (a + b) -> c·a + c·b (coefficient rationnel seul devant une somme)
    if v.len() == 1 && !coeff.is_one() {
        if let Add(termes) = &v[0] {
            let distribue: Vec<Expr> = termes
                .iter()
                .map(|t| canon_mul(vec![rat(coeff.clone()), t.clone()]))
                .collect();
            return PasseMul::Fini(canon_add(distribue));
        }
    }

    PasseMul::Fini(construit_mul(coeff, v))
}

fn a_doublons(v: &[Expr]) -> bool {
    let mut bases: Vec<String> = v
        .iter()
        .map(|f| match f {
            Expr::Pow(b, _) => key_string(b),
            autre => key_string(autre),
        })
        .collect();
    bases.sort();
    bases.windows(2).any(|w| w[0] == w[1])
}

fn construit_mul(coeff: BigRational, mut v: Vec<Expr>) -> Expr {
    if coeff.is_zero() {
        return Expr::zero();
    }
    if v.is_empty() {
        return rat(coeff);
    }
    if !coeff.is_one() {
        v.insert(0, rat(coeff));
    }
    if v.len() == 1 {
        return v.pop().unwrap_or_else(Expr::un);
    }
    Expr::Mul(v)
}

/* ------------------------ Pow ------------------------ */

pub(crate) fn canon_pow(base: Expr, x: Expr) -> Expr {
    use Expr::*;

    if matches!(base, Indefini) || matches!(x, Indefini) {
        return Indefini;
    }
    if x.est_zero() {
        return Expr::un();
    }
    if x.est_un() {
        return base;
    }
    if base.est_un() {
        return if x.contient_infini() { Indefini } else { Expr::un() };
    }

    // exposant infini : seulement pour une base rationnelle positive ou E
    if let Some(s) = x.signe_infini() {
        let grande = match &base {
            Rat(b) if b.is_positive() => Some(*b > BigRational::one()),
            E | Pi => Some(true),
            Infini => Some(true),
            _ => None,
        };
        return match (grande, s > 0) {
            (Some(true), true) | (Some(false), false) => Infini,
            (Some(_), _) => Expr::zero(),
            (None, _) => Expr::pow(base, x),
        };
    }

    if base.est_zero() {
        return match &x {
            Rat(e) if e.is_positive() => Expr::zero(),
            Rat(_) => Indefini,
            _ => Expr::pow(base, x),
        };
    }

    if matches!(base, Infini) {
        return match &x {
            Rat(e) if e.is_positive() => Infini,
            Rat(_) => Expr::zero(),
            _ => Expr::pow(base, x),
        };
    }

    match (&base, &x) {
        (Rat(b), Rat(e)) => pow_rat_rat(b, e).unwrap_or_else(|| Expr::pow(base.clone(), x.clone())),

        (I, Rat(e)) if e.is_integer() => {
            let n = e.to_integer() % BigInt::from(4);
            let n = ((n + BigInt::from(4)) % BigInt::from(4)).to_i64().unwrap_or(0);
            match n {
                0 => Expr::un(),
                1 => I,
                2 => Expr::entier(-1),
                _ => Mul(vec![Expr::entier(-1), I]),
            }
        }

        // (b^y)^n = b^(y·n) pour n entier
        (Pow(bb, y), Rat(e)) if e.is_integer() => {
            let y2 = canon_mul(vec![(**y).clone(), x.clone()]);
            canon_pow((**bb).clone(), y2)
        }

        // (a·b)^n = a^n · b^n pour n entier ; facteurs positifs sortis pour n rationnel
        (Mul(fs), Rat(e)) => {
            if e.is_integer() {
                let v = fs.iter().map(|f| canon_pow(f.clone(), x.clone())).collect();
                return canon_mul(v);
            }
            let (positifs, reste): (Vec<Expr>, Vec<Expr>) =
                fs.iter().cloned().partition(est_positif_connu);
            if positifs.is_empty() {
                return Expr::pow(base.clone(), x.clone());
            }
            let mut v: Vec<Expr> = positifs
                .into_iter()
                .map(|f| canon_pow(f, x.clone()))
                .collect();
            if !reste.is_empty() {
                let r = if reste.len() == 1 {
                    reste.into_iter().next().unwrap_or_else(Expr::un)
                } else {
                    Mul(reste)
                };
                v.push(Expr::pow(r, x.clone()));
            }
            canon_mul(v)
        }

        // E^(ln y) = y
        (E, Fonc(Fonction::Ln, y)) => (**y).clone(),

        _ => Expr::pow(base, x),
    }
}

fn est_positif_connu(e: &Expr) -> bool {
    match e {
        Expr::Rat(r) => r.is_positive(),
        Expr::Pi | Expr::E => true,
        _ => false,
    }
}

/// b^e pour b, e rationnels. None : on garde la forme symbolique.
fn pow_rat_rat(b: &BigRational, e: &BigRational) -> Option<Expr> {
    if e.is_integer() {
        let n = e.to_integer().to_i64()?;
        return rational_pow_int(b, n).map(Expr::Rat);
    }

    let q = e.denom().to_u32()?;
    if q > 64 {
        return None;
    }

    if b.is_negative() {
        // (−r)^(p/2) = I^p · r^(p/2) ; autres dénominateurs : valeur principale complexe, on garde
        if q != 2 {
            return None;
        }
        let p = e.numer().to_i64()?;
        let r = -b.clone();
        let i_p = canon_pow(Expr::I, Expr::entier(p));
        let mag = canon_pow(Expr::Rat(r), Expr::Rat(e.clone()));
        return Some(canon_mul(vec![i_p, mag]));
    }

    // e = n + r/q avec 0 < r < q
    let n = e.floor().to_integer().to_i64()?;
    let r = (e.clone() - BigRational::from_integer(BigInt::from(n)))
        * BigRational::from_integer(BigInt::from(q));
    let r = r.to_integer().to_u32()?;

    let partie_entiere = rational_pow_int(b, n)?;

    // b^(r/q) = (N^r · D^(q−r))^(1/q) / D
    let num = b.numer();
    let den = b.denom();
    let bits = num.bits() * u64::from(r) + den.bits() * u64::from(q - r);
    if bits > 4096 {
        return None;
    }
    let m = num.pow(r) * den.pow(q - r);
    let (s, t) = extrait_puissance_parfaite(&m, q);

    let coeff = partie_entiere * BigRational::new(s, den.clone());
    if t.is_one() {
        return Some(Expr::Rat(coeff));
    }

    // forme déjà canonique : on ne repasse pas par canon_pow (point fixe)
    let racine = Expr::pow(
        Expr::Rat(BigRational::from_integer(t)),
        Expr::Rat(BigRational::new(BigInt::one(), BigInt::from(q))),
    );
    Some(construit_mul(coeff, vec![racine]))
}

/// Décompose n >= 1 en n = s^k · t, t sans facteur puissance k-ième (essais bornés).
fn extrait_puissance_parfaite(n: &BigInt, k: u32) -> (BigInt, BigInt) {
    if n.is_zero() || n.is_one() {
        return (BigInt::one(), n.clone());
    }
    if let Some(r) = racine_exacte(n, k) {
        return (r, BigInt::one());
    }

    let mut reste = n.clone();
    let mut s = BigInt::one();
    let mut p = BigInt::from(2);
    let limite = BigInt::from(100_000);

    while p <= limite && p.pow(k) <= reste {
        let pk = p.pow(k);
        while (&reste % &pk).is_zero() {
            reste /= &pk;
            s *= &p;
        }
        if p == BigInt::from(2) {
            p = BigInt::from(3);
        } else {
            p += 2;
        }
    }

    if let Some(r) = racine_exacte(&reste, k) {
        return (s * r, BigInt::one());
    }
    (s, reste)
}

/* ------------------------ Fonctions ------------------------ */

pub(crate) fn canon_fonc(f: Fonction, x: Expr) -> Expr {
    use Expr::*;

    if matches!(x, Indefini) {
        return Indefini;
    }

    match f {
        Fonction::Sin | Fonction::Cos | Fonction::Tan => {
            if let Some(v) = valeur_speciale(f, &x) {
                return v;
            }
            // parité : sin(−u) = −sin(u), cos(−u) = cos(u), tan(−u) = −tan(u)
            if coeff_negatif(&x) {
                let u = canon_mul(vec![Expr::entier(-1), x]);
                let fu = canon_fonc(f, u);
                return match f {
                    Fonction::Cos => fu,
                    _ => canon_mul(vec![Expr::entier(-1), fu]),
                };
            }
            Expr::fonc(f, x)
        }

        Fonction::Ln => canon_ln(x),

        Fonction::Abs => canon_abs(x),
    }
}

fn coeff_negatif(x: &Expr) -> bool {
    match x {
        Expr::Rat(r) => r.is_negative(),
        Expr::Mul(v) => matches!(v.first(), Some(Expr::Rat(r)) if r.is_negative()),
        _ => false,
    }
}

fn canon_ln(x: Expr) -> Expr {
    use Expr::*;

    match &x {
        _ if x.est_un() => Expr::zero(),
        _ if x.est_zero() => Indefini,
        E => Expr::un(),
        Infini => Infini,
        // ln(E^y) = y pour y rationnel (réel)
        Pow(b, y) if matches!(**b, E) && matches!(**y, Rat(_)) => (**y).clone(),
        // ln(r^y) = y·ln(r) pour r > 0 rationnel, y rationnel
        Pow(b, y) => match (&**b, &**y) {
            (Rat(r), Rat(_)) if r.is_positive() => {
                canon_mul(vec![(**y).clone(), canon_ln((**b).clone())])
            }
            _ => Expr::ln(x),
        },
        // ln(1/d) = −ln(d)
        Rat(r) if r.is_positive() && r.numer().is_one() => {
            let d = Rat(BigRational::from_integer(r.denom().clone()));
            canon_mul(vec![Expr::entier(-1), canon_ln(d)])
        }
        Rat(r) if r.is_positive() => {
            // ln(8) = 3·ln(2) ; pas de factorisation en premiers au-delà
            let (base, k) = puissance_parfaite(r);
            if k > 1 && base.is_integer() {
                canon_mul(vec![Expr::entier(i64::from(k)), Expr::ln(Rat(base))])
            } else {
                Expr::ln(x)
            }
        }
        _ => Expr::ln(x),
    }
}

fn canon_abs(x: Expr) -> Expr {
    use Expr::*;

    match x {
        Rat(r) => Rat(r.abs()),
        Pi | E | Infini => x,
        I => Expr::un(),
        Fonc(Fonction::Abs, _) => x,
        Mul(mut v) if matches!(v.first(), Some(Rat(_))) => {
            let Rat(c) = v.remove(0) else { unreachable!() };
            let reste = if v.len() == 1 {
                v.pop().unwrap_or_else(Expr::un)
            } else {
                Mul(v)
            };
            canon_mul(vec![Rat(c.abs()), canon_abs(reste)])
        }
        autre => {
            if autre.a_des_variables() || autre.contient_i() {
                return Expr::fonc(Fonction::Abs, autre);
            }
            // numérique réel : le signe se décide à l'approximation (loin de 0)
            match approx(&autre) {
                Some(v) if v > 1e-12 => autre,
                Some(v) if v < -1e-12 => canon_mul(vec![Expr::entier(-1), autre]),
                _ => Expr::fonc(Fonction::Abs, autre),
            }
        }
    }
}
