// src/main.rs
//
// Calculatrice avancée — point d'entrée console
// ---------------------------------------------
// - Réglages lus dans l'environnement (config.rs)
// - Journal tracing sur stderr (filtre CALC_LOG / RUST_LOG, "warn" par défaut)
// - Boucle interactive sur stdin/stdout (app.rs)
//
// Code de sortie 0 sur choix vide ou fin d'entrée ; erreur de réglage ou
// d'E/S console : message anyhow et code non nul.

use std::io;

use anyhow::Context;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod noyau;

use app::{Console, Session};
use config::{Reglages, FILTRE_LOG};

fn installer_journal(filtre: &str) {
    let filtre = EnvFilter::try_new(filtre).unwrap_or_else(|_| EnvFilter::new(FILTRE_LOG));
    tracing_subscriber::fmt()
        .with_env_filter(filtre)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    // une panique dans une action est rattrapée par la boucle : on la journalise seulement
    std::panic::set_hook(Box::new(|info| {
        error!(%info, "panique");
    }));
}

fn main() -> anyhow::Result<()> {
    let reglages = Reglages::depuis_env().context("invalid configuration")?;
    installer_journal(&reglages.filtre_log);

    let mut session = Session::new(&reglages);
    let mut console = Console::new(io::stdin().lock(), io::stdout().lock());

    app::executer(&mut session, &mut console).context("console input/output failed")?;
    Ok(())
}
