// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// - Convertir une suite de Tok en RPN (postfix), fonctions avec arité
// - Puis reconstruire Expr (brute, non simplifiée)
//
// Règles:
// - Ident suivi de '(' et connu (jetons::FONCTIONS) => appel de fonction
// - Ident seul => constante (pi, e/E, I, oo/inf) ou variable
// - Moins unaire => opérateur préfixe Neg, entre * / et ^ :
//   "-2^2" = -(2^2), "2^-1" = 2^(-1), "-2*3" = (-2)*3
// - '^' associatif à droite

use num_rational::BigRational;

use super::expr::{Expr, Fonction};
use super::jetons::{est_fonction, Tok};

/// Profondeur maximale de l'arbre construit.
pub const MAX_PROFONDEUR: usize = 200;

/// Élément de la notation polonaise inversée.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rpn {
    Num(BigRational),
    Atome(String),
    Op(Tok),
    Neg,
    Appel(String, usize),
}

/// Pile d'opérateurs du shunting-yard.
enum Pile {
    Op(Tok),
    Neg,
    LPar,
    LParAppel,
    Fonc(String),
}

const PREC_NEG: i32 = 3;

fn precedence(t: &Tok) -> i32 {
    match t {
        Tok::Plus | Tok::Minus => 1,
        Tok::Star | Tok::Slash => 2,
        Tok::Caret => 4,
        _ => 0,
    }
}

fn is_right_associative(t: &Tok) -> bool {
    matches!(t, Tok::Caret)
}

/// Convertit une suite de jetons en RPN.
///
/// Exemple:
///   tokens: [Ident("log"), LPar, Num(8), Virgule, Num(2), RPar]
///   rpn:    [Num(8), Num(2), Appel("log", 2)]
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<Rpn>, String> {
    let mut out: Vec<Rpn> = Vec::new();
    let mut ops: Vec<Pile> = Vec::new();
    let mut arites: Vec<usize> = Vec::new();

    // “valeur” = un atome ou une expression fermée (détecte le moins unaire)
    let mut prev_was_value = false;

    for (i, tok) in tokens.iter().enumerate() {
        match tok {
            Tok::Num(r) => {
                if prev_was_value {
                    return Err("missing operator between values".into());
                }
                out.push(Rpn::Num(r.clone()));
                prev_was_value = true;
            }

            Tok::Ident(name) => {
                if prev_was_value {
                    return Err("missing operator between values".into());
                }
                if est_fonction(name) {
                    if !matches!(tokens.get(i + 1), Some(Tok::LPar)) {
                        return Err(format!("function '{name}' needs parentheses"));
                    }
                    ops.push(Pile::Fonc(name.to_ascii_lowercase()));
                    prev_was_value = false;
                } else {
                    out.push(Rpn::Atome(name.clone()));
                    prev_was_value = true;
                }
            }

            Tok::LPar => {
                if prev_was_value {
                    return Err("missing operator before '('".into());
                }
                if matches!(ops.last(), Some(Pile::Fonc(_))) {
                    ops.push(Pile::LParAppel);
                    arites.push(1);
                } else {
                    ops.push(Pile::LPar);
                }
                prev_was_value = false;
            }

            Tok::Virgule => {
                if !prev_was_value {
                    return Err("unexpected ','".into());
                }
                loop {
                    match ops.last() {
                        Some(Pile::LParAppel) => break,
                        Some(Pile::LPar) | None => {
                            return Err("',' outside of a function call".into())
                        }
                        Some(_) => depile_vers(&mut ops, &mut out),
                    }
                }
                if let Some(n) = arites.last_mut() {
                    *n += 1;
                }
                prev_was_value = false;
            }

            Tok::RPar => {
                if !prev_was_value {
                    return Err("unexpected ')'".into());
                }
                loop {
                    match ops.pop() {
                        None => return Err("unbalanced parentheses".into()),
                        Some(Pile::LPar) => break,
                        Some(Pile::LParAppel) => {
                            let n = arites.pop().unwrap_or(1);
                            match ops.pop() {
                                Some(Pile::Fonc(f)) => out.push(Rpn::Appel(f, n)),
                                _ => return Err("malformed function call".into()),
                            }
                            break;
                        }
                        Some(autre) => sortie(autre, &mut out),
                    }
                }
                prev_was_value = true;
            }

            Tok::Minus if !prev_was_value => {
                ops.push(Pile::Neg);
            }

            // '+' unaire : sans effet
            Tok::Plus if !prev_was_value => {}

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                if !prev_was_value {
                    return Err(format!("missing operand before '{}'", symbole(tok)));
                }
                let p_tok = precedence(tok);
                while let Some(top) = ops.last() {
                    let p_top = match top {
                        Pile::Op(t) => precedence(t),
                        Pile::Neg => PREC_NEG,
                        _ => break,
                    };
                    let doit_pop = if is_right_associative(tok) {
                        p_top > p_tok
                    } else {
                        p_top >= p_tok
                    };
                    if !doit_pop {
                        break;
                    }
                    depile_vers(&mut ops, &mut out);
                }
                ops.push(Pile::Op(tok.clone()));
                prev_was_value = false;
            }
        }
    }

    if !prev_was_value {
        return Err("incomplete expression".into());
    }

    while let Some(op) = ops.pop() {
        match op {
            Pile::LPar | Pile::LParAppel => return Err("unbalanced parentheses".into()),
            autre => sortie(autre, &mut out),
        }
    }

    Ok(out)
}

fn depile_vers(ops: &mut Vec<Pile>, out: &mut Vec<Rpn>) {
    if let Some(op) = ops.pop() {
        sortie(op, out);
    }
}

fn sortie(op: Pile, out: &mut Vec<Rpn>) {
    match op {
        Pile::Op(t) => out.push(Rpn::Op(t)),
        Pile::Neg => out.push(Rpn::Neg),
        Pile::Fonc(f) => out.push(Rpn::Appel(f, 1)),
        Pile::LPar | Pile::LParAppel => {}
    }
}

fn symbole(t: &Tok) -> &'static str {
    match t {
        Tok::Plus => "+",
        Tok::Minus => "-",
        Tok::Star => "*",
        Tok::Slash => "/",
        Tok::Caret => "**",
        _ => "?",
    }
}

/// Constantes nommées ; tout autre identifiant est une variable.
fn atome(nom: &str) -> Expr {
    match nom {
        "I" => Expr::I,
        "e" | "E" => Expr::E,
        _ => match nom.to_ascii_lowercase().as_str() {
            "pi" => Expr::Pi,
            "oo" | "inf" | "infinity" => Expr::Infini,
            _ => Expr::Var(nom.to_string()),
        },
    }
}

/// Somme / produit à plat : une chaîne "1+1+...+1" reste de profondeur 1.
fn somme(a: Expr, b: Expr) -> Expr {
    match a {
        Expr::Add(mut v) => {
            v.push(b);
            Expr::Add(v)
        }
        autre => Expr::add(autre, b),
    }
}

fn produit(a: Expr, b: Expr) -> Expr {
    match a {
        Expr::Mul(mut v) => {
            v.push(b);
            Expr::Mul(v)
        }
        autre => Expr::mul(autre, b),
    }
}

fn appel(nom: &str, mut args: Vec<Expr>) -> Result<Expr, String> {
    let recus = args.len();

    if nom == "log" && recus == 2 {
        let b = args.pop().ok_or("log: missing base")?;
        let x = args.pop().ok_or("log: missing argument")?;
        return Ok(Expr::div(Expr::ln(x), Expr::ln(b)));
    }
    if recus != 1 {
        return Err(if nom == "log" {
            format!("log() expects 1 or 2 arguments, got {recus}")
        } else {
            format!("{nom}() expects 1 argument, got {recus}")
        });
    }
    let x = args.pop().ok_or("missing argument")?;

    let e = match nom {
        "sqrt" => Expr::sqrt(x),
        "cbrt" => Expr::pow(x, Expr::rat(1, 3)),
        "exp" => Expr::exp(x),
        "ln" | "log" => Expr::ln(x),
        "abs" => Expr::fonc(Fonction::Abs, x),
        "sin" => Expr::fonc(Fonction::Sin, x),
        "cos" => Expr::fonc(Fonction::Cos, x),
        "tan" => Expr::fonc(Fonction::Tan, x),
        _ => return Err(format!("unknown function '{nom}'")),
    };
    Ok(e)
}

/// Construit une Expr (brute) à partir d'une RPN.
pub fn from_rpn(rpn: &[Rpn]) -> Result<Expr, String> {
    // (expression, profondeur)
    let mut st: Vec<(Expr, usize)> = Vec::new();

    for item in rpn {
        let suivant = match item {
            Rpn::Num(r) => (Expr::Rat(r.clone()), 1),
            Rpn::Atome(nom) => (atome(nom), 1),

            Rpn::Neg => {
                let (a, p) = st.pop().ok_or("invalid expression")?;
                (Expr::neg(a), p + 1)
            }

            Rpn::Op(tok) => {
                let (b, pb) = st.pop().ok_or("invalid expression")?;
                let (a, pa) = st.pop().ok_or("invalid expression")?;
                // une chaîne à plat ne s'approfondit pas
                let a_plat = matches!(
                    (tok, &a),
                    (Tok::Plus | Tok::Minus, Expr::Add(_)) | (Tok::Star | Tok::Slash, Expr::Mul(_))
                );
                let p = if a_plat { pa.max(pb + 2) } else { pa.max(pb + 1) + 1 };
                let e = match tok {
                    Tok::Plus => somme(a, b),
                    Tok::Minus => somme(a, Expr::neg(b)),
                    Tok::Star => produit(a, b),
                    Tok::Slash => produit(a, Expr::inv(b)),
                    Tok::Caret => Expr::pow(a, b),
                    _ => return Err("unexpected token in RPN".into()),
                };
                (e, p)
            }

            Rpn::Appel(nom, n) => {
                if st.len() < *n {
                    return Err(format!("{nom}() is missing arguments"));
                }
                let args: Vec<(Expr, usize)> = st.split_off(st.len() - n);
                let p = args.iter().map(|(_, p)| *p).max().unwrap_or(0) + 1;
                let e = appel(nom, args.into_iter().map(|(e, _)| e).collect())?;
                (e, p)
            }
        };

        if suivant.1 > MAX_PROFONDEUR {
            return Err("expression is nested too deeply".into());
        }
        st.push(suivant);
    }

    if st.len() != 1 {
        return Err("invalid expression".into());
    }
    st.pop()
        .map(|(e, _)| e)
        .ok_or_else(|| "invalid expression".to_string())
}
