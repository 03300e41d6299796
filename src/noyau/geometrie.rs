// src/noyau/geometrie.rs
//
// Formules de géométrie plane, résultats exacts ("4*pi").
// Paramètres nommés (clé=valeur), tous des nombres strictement positifs.

use tracing::debug;

use super::canon::canon_expr;
use super::erreur::{CalcError, CalcResult};
use super::expr::Expr;
use super::validation::{nombre, signe, Contraintes};

/// Noms reconnus, dans l'ordre d'affichage du menu.
pub const OPERATIONS: [&str; 6] = [
    "circle_area",
    "circle_circumference",
    "rectangle_area",
    "rectangle_perimeter",
    "triangle_area",
    "triangle_perimeter",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultatGeometrie {
    pub nom: &'static str,
    pub valeur: Expr,
}

pub fn geometrie(operation: &str, params: &[(String, String)]) -> CalcResult<ResultatGeometrie> {
    let op = operation.trim();
    let (nom, cles): (&'static str, &[&str]) = match op {
        "circle_area" => ("Circle area", &["radius"]),
        "circle_circumference" => ("Circle circumference", &["radius"]),
        "rectangle_area" => ("Rectangle area", &["width", "height"]),
        "rectangle_perimeter" => ("Rectangle perimeter", &["width", "height"]),
        "triangle_area" => (
            "Triangle area",
            &["base", "height", "side_a", "side_b", "side_c"],
        ),
        "triangle_perimeter" => ("Triangle perimeter", &["side_a", "side_b", "side_c"]),
        _ => {
            return Err(CalcError::domaine(format!(
                "Unknown geometry operation: {op}"
            )))
        }
    };

    if let Some((k, _)) = params.iter().find(|(k, _)| !cles.contains(&k.as_str())) {
        return Err(CalcError::domaine(format!(
            "Unknown parameter '{k}' for {op}"
        )));
    }

    let present = |cle: &str| params.iter().any(|(k, _)| k == cle);
    // la dernière occurrence l'emporte
    let p = |cle: &str| -> CalcResult<Expr> {
        let brut = params
            .iter()
            .rev()
            .find(|(k, _)| k == cle)
            .map(|(_, v)| v.as_str())
            .ok_or_else(|| CalcError::domaine(format!("Missing parameter '{cle}' for {op}")))?;
        nombre(brut, cle, Contraintes::POSITIF)
    };

    let valeur = match op {
        "circle_area" => Expr::mul(Expr::Pi, Expr::pow(p("radius")?, Expr::entier(2))),
        "circle_circumference" => Expr::Mul(vec![Expr::entier(2), Expr::Pi, p("radius")?]),
        "rectangle_area" => Expr::mul(p("width")?, p("height")?),
        "rectangle_perimeter" => Expr::mul(Expr::entier(2), Expr::add(p("width")?, p("height")?)),
        "triangle_area" if present("base") || present("height") => {
            if ["side_a", "side_b", "side_c"].iter().any(|c| present(c)) {
                return Err(CalcError::domaine(
                    "Give either base and height or side_a, side_b, side_c for triangle_area, not both",
                ));
            }
            Expr::Mul(vec![Expr::rat(1, 2), p("base")?, p("height")?])
        }
        "triangle_area" => {
            let (a, b, c) = cotes(&p)?;
            heron(a, b, c)
        }
        _ => {
            let (a, b, c) = cotes(&p)?;
            Expr::Add(vec![a, b, c])
        }
    };

    let valeur = canon_expr(valeur);
    valeur.verifier_taille()?;
    debug!(operation = op, valeur = %valeur, "géométrie");
    Ok(ResultatGeometrie { nom, valeur })
}

/// Trois côtés validés, inégalité triangulaire stricte.
fn cotes(p: &dyn Fn(&str) -> CalcResult<Expr>) -> CalcResult<(Expr, Expr, Expr)> {
    let a = p("side_a")?;
    let b = p("side_b")?;
    let c = p("side_c")?;

    let ecarts = [
        Expr::Add(vec![b.clone(), c.clone(), Expr::neg(a.clone())]),
        Expr::Add(vec![a.clone(), c.clone(), Expr::neg(b.clone())]),
        Expr::Add(vec![a.clone(), b.clone(), Expr::neg(c.clone())]),
    ];
    for e in ecarts {
        if signe(&canon_expr(e)) != Some(1) {
            return Err(CalcError::domaine(
                "Invalid triangle: each side must be shorter than the sum of the other two",
            ));
        }
    }
    Ok((a, b, c))
}

/// √(s(s−a)(s−b)(s−c)), s = (a+b+c)/2
fn heron(a: Expr, b: Expr, c: Expr) -> Expr {
    let s = canon_expr(Expr::Mul(vec![
        Expr::rat(1, 2),
        Expr::Add(vec![a.clone(), b.clone(), c.clone()]),
    ]));
    let produit = Expr::Mul(vec![
        s.clone(),
        Expr::sub(s.clone(), a),
        Expr::sub(s.clone(), b),
        Expr::sub(s, c),
    ]);
    Expr::sqrt(produit)
}
