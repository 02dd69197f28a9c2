use crate::Cli;
use crate::logging;
use notegen_core::config::loader::{ConfigLoader, default_config_path};
use notegen_core::vars::VarsMap;
use notegen_core::{GenerateError, Generated, NbStore, NoteRequest, generate};
use tracing::debug;

pub fn run(cli: Cli, vars: VarsMap) {
    let cfg = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(rc) => rc,
        Err(e) => {
            eprintln!("FAIL notegen");
            eprintln!("{e}");
            if cli.config.is_none() {
                eprintln!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    };

    logging::init(&cfg);
    debug!(
        "config: {}",
        cfg.source.as_ref().map_or("<defaults>".into(), |p| p.display().to_string())
    );

    let request = NoteRequest {
        template: cli.template,
        note: cli.note,
        date: cli.date,
        title: cli.title,
        remove_title: cli.remove_title,
        dry_run: cli.dry_run,
        vars,
    };

    let store = NbStore::new(cfg.store_program.as_str());
    debug!("note store program: {}", store.program());

    let code = match generate(&store, &request) {
        Ok(Generated::DryRun { content }) => {
            print!("{content}");
            if !content.ends_with('\n') {
                println!();
            }
            0
        }
        Ok(Generated::Committed { note, .. }) => {
            println!("OK   notegen");
            println!("template: {}", request.template);
            println!("note:     {note}");
            0
        }
        Err(GenerateError::Store(e)) => {
            debug!("note store call failed: {e}");
            eprintln!("{}", e.diagnostic());
            1
        }
        Err(e @ GenerateError::Render { .. }) => {
            eprintln!("{e}");
            1
        }
    };

    logging::flush();
    std::process::exit(code);
}
