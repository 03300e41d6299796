// src/noyau/jetons.rs
//
// Grammaire restreinte : tout ce qui n'est pas listé ici est refusé.
// - nombres : 12, 0.5, .5, 1e-10, 2.5E3
// - opérateurs : + - * / ** ^
// - parenthèses, virgule (arguments de fonction)
// - identifiants ASCII [a-zA-Z_][a-zA-Z0-9_]* (fonctions, constantes, variables)
// - multiplication implicite : 2x, 3(x+1), (a)(b), x(y+1), 2pi

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Pow};

/// Garde-fous de taille.
pub const MAX_JETONS: usize = 10_000;
pub const MAX_IMBRICATION: usize = 200;
const MAX_EXPOSANT_DECIMAL: i64 = 10_000;

/// Fonctions connues (comparées en minuscules).
pub const FONCTIONS: &[&str] = &[
    "sqrt", "cbrt", "exp", "ln", "log", "abs", "sin", "cos", "tan",
];

pub fn est_fonction(nom: &str) -> bool {
    let bas = nom.to_ascii_lowercase();
    FONCTIONS.contains(&bas.as_str())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tok {
    Num(BigRational),

    // Fonctions, constantes et variables : rpn.rs tranche selon le contexte.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ** ou ^

    LPar,
    RPar,
    Virgule,
}

/// Tokenize une chaîne normalisée en jetons (multiplication implicite incluse).
pub fn tokenize(s: &str) -> Result<Vec<Tok>, String> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;
    let mut profondeur = 0usize;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        match c {
            '(' => {
                profondeur += 1;
                if profondeur > MAX_IMBRICATION {
                    return Err("too many nested parentheses".into());
                }
                out.push(Tok::LPar);
                i += 1;
            }
            ')' => {
                profondeur = profondeur.saturating_sub(1);
                out.push(Tok::RPar);
                i += 1;
            }
            ',' => {
                out.push(Tok::Virgule);
                i += 1;
            }
            '+' => {
                out.push(Tok::Plus);
                i += 1;
            }
            '-' => {
                out.push(Tok::Minus);
                i += 1;
            }
            '*' => {
                if i + 1 < chars.len() && chars[i + 1] == '*' {
                    out.push(Tok::Caret);
                    i += 2;
                } else {
                    out.push(Tok::Star);
                    i += 1;
                }
            }
            '/' => {
                out.push(Tok::Slash);
                i += 1;
            }
            '^' => {
                out.push(Tok::Caret);
                i += 1;
            }

            _ if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                i += 1;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                out.push(Tok::Ident(word));
            }

            _ if c.is_ascii_digit() || c == '.' => {
                let (r, suite) = lire_nombre(&chars, i)?;
                out.push(Tok::Num(r));
                i = suite;
            }

            _ => return Err(format!("unexpected character '{c}'")),
        }

        if out.len() > MAX_JETONS {
            return Err("expression is too long".into());
        }
    }

    Ok(inserer_mul_implicite(out))
}

/// Lit un nombre décimal (avec exposant éventuel) à partir de `i`.
/// Renvoie (valeur exacte, indice suivant).
fn lire_nombre(chars: &[char], mut i: usize) -> Result<(BigRational, usize), String> {
    let debut_nombre = i;
    let mut chiffres = String::new();
    let mut decimales: i64 = 0;
    let mut point = false;

    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_digit() {
            chiffres.push(c);
            if point {
                decimales += 1;
            }
        } else if c == '.' && !point {
            point = true;
        } else {
            break;
        }
        i += 1;
    }

    if chiffres.is_empty() {
        return Err("invalid number '.'".into());
    }

    // exposant : e/E suivi d'un signe optionnel puis d'au moins un chiffre
    let mut exposant: i64 = 0;
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        let mut signe = 1i64;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            if chars[j] == '-' {
                signe = -1;
            }
            j += 1;
        }
        let debut = j;
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
        }
        if j > debut {
            let txt: String = chars[debut..j].iter().collect();
            let v: i64 = txt
                .parse()
                .map_err(|_| format!("exponent too large in '{txt}'"))?;
            if v > MAX_EXPOSANT_DECIMAL {
                return Err(format!("exponent too large in '{txt}'"));
            }
            exposant = signe * v;
            i = j;
        } else {
            // "2exp(1)" : 2 puis un identifiant ; "1e", "1e+", "1e)" : exposant sans chiffre
            let identifiant = chars
                .get(i + 1)
                .is_some_and(|c| c.is_ascii_alphanumeric() || *c == '_');
            if !identifiant {
                let brut: String = chars[debut_nombre..j].iter().collect();
                return Err(format!("missing exponent digits in '{brut}'"));
            }
        }
    }

    let mantisse =
        BigInt::parse_bytes(chiffres.as_bytes(), 10).ok_or_else(|| "invalid number".to_string())?;

    let puissance = exposant - decimales;
    let dix = BigInt::from(10);
    let r = if puissance >= 0 {
        BigRational::from_integer(mantisse * Pow::pow(&dix, puissance as u64))
    } else {
        BigRational::new(mantisse, Pow::pow(&dix, puissance.unsigned_abs()))
    };
    Ok((r, i))
}

/// Insère `*` là où la multiplication est implicite.
fn inserer_mul_implicite(jetons: Vec<Tok>) -> Vec<Tok> {
    let mut out: Vec<Tok> = Vec::with_capacity(jetons.len());

    for t in jetons {
        if let Some(prec) = out.last() {
            let gauche = match prec {
                Tok::Num(_) | Tok::RPar => true,
                Tok::Ident(nom) => !est_fonction(nom),
                _ => false,
            };
            let droite = matches!(t, Tok::Num(_) | Tok::Ident(_) | Tok::LPar);
            // "2 3" reste une erreur de syntaxe (deux nombres collés)
            let deux_nombres = matches!(prec, Tok::Num(_)) && matches!(t, Tok::Num(_));
            if gauche && droite && !deux_nombres {
                out.push(Tok::Star);
            }
        }
        out.push(t);
    }
    out
}

/// Liste de jetons en texte (journalisation).
pub fn format_tokens(tokens: &[Tok]) -> String {
    fn format_rat(r: &BigRational) -> String {
        let n = r.numer();
        let d = r.denom();
        if d.is_one() {
            format!("{n}")
        } else {
            format!("{n}/{d}")
        }
    }

    let mut out = Vec::new();
    for t in tokens {
        let s = match t {
            Tok::Num(r) => format_rat(r),
            Tok::Ident(name) => name.clone(),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Caret => "^".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
            Tok::Virgule => ",".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
