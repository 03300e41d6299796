// src/noyau/normalise.rs
//
// Normalisation de la saisie (avant jetons) :
// - trim + refus du vide
// - liste noire (insensible à la casse) : premier filtre grossier
// - alias Unicode -> ASCII
// - `^` -> `**` (sans toucher aux `**` déjà présents)
//
// La vraie garantie vient de la grammaire restreinte de jetons.rs :
// ici on refuse tôt ce qui ressemble à une injection, avec un message clair.

use tracing::debug;

use super::erreur::{CalcError, CalcResult};

/// Motifs refusés (comparés en minuscules).
const MOTIFS_INTERDITS: &[&str] = &[
    "__",
    "import",
    "exec(",
    "eval(",
    "compile(",
    "open(",
    "os.",
    "sys.",
    "subprocess",
    "lambda",
    "globals",
    "locals",
    "getattr",
    "setattr",
    "delattr",
    ";",
];

/// Alias Unicode (symbole, remplacement).
const ALIAS: &[(char, &str)] = &[
    ('×', "*"),
    ('·', "*"),
    ('÷', "/"),
    ('−', "-"),
    ('√', "sqrt"),
    ('π', "pi"),
    ('∞', "oo"),
    ('²', "**2"),
    ('³', "**3"),
];

/// Renvoie le premier motif interdit trouvé, s'il y en a un.
pub fn motif_interdit(texte: &str) -> Option<&'static str> {
    let bas = texte.to_lowercase();
    MOTIFS_INTERDITS.iter().copied().find(|m| bas.contains(m))
}

/// Normalise une saisie brute.
pub fn normaliser(brut: &str) -> CalcResult<String> {
    let s = brut.trim();
    if s.is_empty() {
        return Err(CalcError::Vide);
    }

    if let Some(motif) = motif_interdit(s) {
        debug!(motif, "saisie refusée (liste noire)");
        return Err(CalcError::MotifInterdit {
            motif: motif.to_string(),
        });
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match ALIAS.iter().find(|(u, _)| *u == c) {
            Some((_, rep)) => out.push_str(rep),
            None => out.push(c),
        }
    }

    Ok(remplace_caret(&out))
}

/// `^` -> `**`. Un `**` existant reste tel quel ; `^^` n'est pas réparé
/// (la grammaire le refusera).
fn remplace_caret(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if c == '^' {
            out.push_str("**");
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_unicode() {
        assert_eq!(normaliser(" 3 × 4 ").unwrap(), "3 * 4");
        assert_eq!(normaliser("8÷2").unwrap(), "8/2");
        assert_eq!(normaliser("√(2)").unwrap(), "sqrt(2)");
        assert_eq!(normaliser("2π").unwrap(), "2pi");
        assert_eq!(normaliser("-∞").unwrap(), "-oo");
        assert_eq!(normaliser("x²").unwrap(), "x**2");
    }

    #[test]
    fn caret_vers_double_etoile() {
        assert_eq!(normaliser("2^10").unwrap(), "2**10");
        assert_eq!(normaliser("2**3^2").unwrap(), "2**3**2");
    }

    #[test]
    fn vide_refuse() {
        assert_eq!(normaliser("   "), Err(CalcError::Vide));
    }

    #[test]
    fn liste_noire() {
        let e = normaliser("__import__('os')").unwrap_err();
        assert_eq!(
            e,
            CalcError::MotifInterdit {
                motif: "__".into()
            }
        );

        let e = normaliser("EXEC(1)").unwrap_err();
        assert!(matches!(e, CalcError::MotifInterdit { motif } if motif == "exec("));

        assert!(normaliser("os.system").is_err());
        assert!(normaliser("1; 2").is_err());
    }

    #[test]
    fn fonctions_legitimes_acceptees() {
        // "cos(" contient "os" mais pas "os."
        assert!(normaliser("cos(0) + exp(1)").is_ok());
    }
}
