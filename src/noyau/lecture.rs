// src/noyau/lecture.rs
//
// Lecture décimale approchée ("≈ ...") d'un résultat EXACT numérique.
// - entiers scalés (×10^digits) : rationnels, π (Machin, cache), e (série),
//   sommes, produits, puissances rationnelles (racine n-ième entière)
// - repli f64 (approx.rs) pour le reste (trig, log, ...)

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};
use tracing::trace;

use super::approx::approx;
use super::expr::Expr;

/// Chiffres de garde pour amortir les troncatures intermédiaires.
const GARDE: usize = 10;
/// Chiffres affichés au plus par le repli f64.
const DIGITS_F64: usize = 12;

/* ------------------------ Décimal (scaled -> texte) ------------------------ */

fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// Convertit un entier “scalé” (×10^digits) en texte décimal.
pub fn scaled_to_decimal(mut scaled: BigInt, digits: usize) -> String {
    let neg = scaled.is_negative();
    if neg {
        scaled = -scaled;
    }

    let scale = pow10(digits);
    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;

    if digits == 0 {
        return if neg && !int_part.is_zero() {
            format!("-{int_part}")
        } else {
            format!("{int_part}")
        };
    }

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < digits {
        frac.insert(0, '0');
    }

    let signe = if neg && !scaled.is_zero() { "-" } else { "" };
    format!("{signe}{int_part}.{frac}")
}

/// "1.500" -> "1.5", "2.000" -> "2.0"
fn sans_zeros_finaux(s: String) -> String {
    match s.find('.') {
        None => s,
        Some(p) => {
            let t = s.trim_end_matches('0');
            if t.len() == p + 1 {
                format!("{t}0")
            } else {
                t.to_string()
            }
        }
    }
}

/// r -> entier “scalé” = trunc(r * 10^digits)
fn rational_scaled(r: &BigRational, digits: usize) -> BigInt {
    let scale = pow10(digits);
    (r.numer() * scale) / r.denom()
}

/* ------------------------ π (Machin) + cache ------------------------ */

/// arctan(1/q) en entier scalé (troncature) via série:
/// atan(z) = z - z^3/3 + z^5/5 - ...
fn arctan_inv_q_scaled(q: i64, scale: &BigInt) -> BigInt {
    let q = BigInt::from(q);

    let mut k: usize = 0;
    let mut sign_pos = true;

    // q^(2k+1)
    let mut q_pow = q.clone();
    let mut sum = BigInt::zero();

    loop {
        let denom = BigInt::from((2 * k + 1) as i64);
        let d = &q_pow * &denom;

        let term = scale / &d;
        if term.is_zero() {
            break;
        }

        if sign_pos {
            sum += &term;
        } else {
            sum -= &term;
        }

        q_pow *= &q;
        q_pow *= &q;

        sign_pos = !sign_pos;
        k += 1;
    }

    sum
}

fn pi_scaled_compute(digits: usize) -> BigInt {
    let extra = 10usize;
    let scale = pow10(digits + extra);

    // Machin : π = 16*atan(1/5) - 4*atan(1/239)
    let a = arctan_inv_q_scaled(5, &scale);
    let b = arctan_inv_q_scaled(239, &scale);

    let pi = BigInt::from(16) * a - BigInt::from(4) * b;
    pi / pow10(extra)
}

/// e = Σ 1/k! en entier scalé.
fn e_scaled_compute(digits: usize) -> BigInt {
    let extra = 10usize;
    let scale = pow10(digits + extra);

    let mut terme = scale.clone();
    let mut sum = BigInt::zero();
    let mut k = 1u64;
    while !terme.is_zero() {
        sum += &terme;
        terme /= k;
        k += 1;
    }
    sum / pow10(extra)
}

type Cache = OnceLock<Mutex<HashMap<usize, BigInt>>>;

static PI_CACHE: Cache = OnceLock::new();
static E_CACHE: Cache = OnceLock::new();

fn cached(cache: &'static Cache, digits: usize, calcul: fn(usize) -> BigInt) -> BigInt {
    let m = cache.get_or_init(|| Mutex::new(HashMap::new()));
    // un verrou empoisonné garde des valeurs valides
    let mut guard = m.lock().unwrap_or_else(|p| p.into_inner());

    if let Some(v) = guard.get(&digits) {
        return v.clone();
    }

    let v = calcul(digits);
    guard.insert(digits, v.clone());
    v
}

/* ------------------------ Racine n-ième scalée ------------------------ */

/// floor( x^(1/q) ) en scalé, x >= 0 déjà scalé (×10^digits).
fn racine_scaled(x: &BigInt, q: u32, digits: usize) -> BigInt {
    // y = (x · 10^(digits·(q−1)))^(1/q)
    let cible = x * pow10(digits * (q as usize - 1));
    cible.nth_root(q)
}

/* ------------------------ Évaluation scalée ------------------------ */

/// Évalue une expression en entier “scalé” (×10^digits).
/// Err si une partie n'a pas de forme scalée (repli f64 ensuite).
pub fn eval_scaled(expr: &Expr, digits: usize) -> Result<BigInt, String> {
    use Expr::*;

    let scale = pow10(digits);

    match expr {
        Indefini => Err("undefined".into()),
        Var(_) => Err("free variable".into()),
        I => Err("complex value".into()),
        Infini => Err("infinite value".into()),

        Rat(r) => Ok(rational_scaled(r, digits)),
        Pi => Ok(cached(&PI_CACHE, digits, pi_scaled_compute)),
        E => Ok(cached(&E_CACHE, digits, e_scaled_compute)),

        Add(v) => {
            let mut s = BigInt::zero();
            for t in v {
                s += eval_scaled(t, digits)?;
            }
            Ok(s)
        }

        Mul(v) => {
            let mut p = scale.clone();
            for t in v {
                p = (p * eval_scaled(t, digits)?) / &scale;
            }
            Ok(p)
        }

        Pow(b, x) => {
            let e = match &**x {
                Rat(e) => e,
                _ => return Err("symbolic exponent".into()),
            };
            let p = e.numer().to_i64().ok_or("exponent too large")?;
            let q = e.denom().to_u32().ok_or("exponent too large")?;
            if p.unsigned_abs() > 64 || q > 12 {
                return Err("exponent too large".into());
            }

            let sb = eval_scaled(b, digits)?;
            if sb.is_negative() && q != 1 {
                return Err("negative base".into());
            }

            // b^|p|
            let mut acc = scale.clone();
            for _ in 0..p.unsigned_abs() {
                acc = (acc * &sb) / &scale;
            }
            let racine = if q == 1 {
                acc
            } else {
                racine_scaled(&acc, q, digits)
            };

            if p < 0 {
                if racine.is_zero() {
                    return Err("division by zero".into());
                }
                Ok((&scale * &scale) / racine)
            } else {
                Ok(racine)
            }
        }

        Fonc(_, _) => Err("function value".into()),
    }
}

/* ------------------------ Lecture (API) ------------------------ */

/// Lecture décimale d'un résultat numérique réel, None si non applicable.
pub fn lecture_decimale(e: &Expr, digits: usize) -> Option<String> {
    if e.a_des_variables() || e.contient_i() || e.contient_infini() || e.contient_indefini() {
        return None;
    }

    match eval_scaled(e, digits + GARDE) {
        Ok(s) => {
            // arrondi au plus proche sur les chiffres de garde
            let g = pow10(GARDE);
            let demi = &g / BigInt::from(2);
            let arrondi = if s.is_negative() {
                -((-s + &demi) / &g)
            } else {
                (s + &demi) / &g
            };
            Some(sans_zeros_finaux(scaled_to_decimal(arrondi, digits)))
        }
        Err(raison) => {
            trace!(raison = %raison, "lecture scalée indisponible, repli f64");
            let v = approx(e)?;
            if !v.is_finite() {
                return None;
            }
            let d = digits.min(DIGITS_F64);
            Some(sans_zeros_finaux(format!("{v:.d$}")))
        }
    }
}

/// Vrai si l'expression mérite une lecture décimale (numérique, pas un entier).
pub fn lecture_utile(e: &Expr) -> bool {
    !e.est_entier() && !e.a_des_variables()
}
